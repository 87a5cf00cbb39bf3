use patina_geom::BlockPos;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk containing `pos` for chunks of `(sx, sy, sz)` blocks.
    #[inline]
    pub fn containing(pos: BlockPos, sx: i32, sy: i32, sz: i32) -> Self {
        Self {
            cx: pos.x.div_euclid(sx),
            cy: pos.y.div_euclid(sy),
            cz: pos.z.div_euclid(sz),
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// World position of the chunk's minimum corner.
    #[inline]
    pub fn base(self, sx: i32, sy: i32, sz: i32) -> BlockPos {
        BlockPos::new(self.cx * sx, self.cy * sy, self.cz * sz)
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
