use crate::BlockPos;

/// Number of cells in a Manhattan ball of `radius`, center included.
pub const fn ball_len(radius: u32) -> usize {
    let r = radius as usize;
    (2 * r + 1) * (2 * r * r + 2 * r + 3) / 3
}

/// Precomputed offsets of an L1 ball, sorted by non-decreasing distance.
///
/// The center (distance 0) is the first entry. Ties are broken by `(y, z, x)`
/// so enumeration order is stable across runs.
#[derive(Clone, Debug)]
pub struct ManhattanBall {
    radius: u32,
    offsets: Vec<(BlockPos, u32)>,
}

impl ManhattanBall {
    pub fn new(radius: u32) -> Self {
        let r = radius as i32;
        let mut offsets = Vec::with_capacity(ball_len(radius));
        for dy in -r..=r {
            let ry = r - dy.abs();
            for dz in -ry..=ry {
                let rx = ry - dz.abs();
                for dx in -rx..=rx {
                    let d = BlockPos::new(dx, dy, dz);
                    offsets.push((d, d.manhattan(BlockPos::ORIGIN)));
                }
            }
        }
        offsets.sort_by_key(|(d, dist)| (*dist, d.y, d.z, d.x));
        Self { radius, offsets }
    }

    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets and their distance from the center.
    pub fn offsets(&self) -> &[(BlockPos, u32)] {
        &self.offsets
    }

    /// World positions around `center` with their distance to it. Cells that
    /// would fall off the `i32` grid are skipped.
    pub fn around(&self, center: BlockPos) -> impl Iterator<Item = (BlockPos, u32)> + '_ {
        self.offsets
            .iter()
            .filter_map(move |&(d, dist)| Some((center.checked_add(d)?, dist)))
    }
}
