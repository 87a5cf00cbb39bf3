use patina_blocks::Block;
use patina_geom::BlockPos;

use crate::ChunkCoord;

/// Dense block storage for one chunk, indexed `(y * sz + z) * sx + x`.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    pub fn new_air(coord: ChunkCoord, sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            coord,
            sx,
            sy,
            sz,
            blocks: vec![Block::AIR; sx * sy * sz],
        }
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<Block>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, Block::AIR);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, b: Block) {
        let i = self.idx(x, y, z);
        self.blocks[i] = b;
    }

    #[inline]
    pub fn base(&self) -> BlockPos {
        self.coord
            .base(self.sx as i32, self.sy as i32, self.sz as i32)
    }

    #[inline]
    pub fn contains_world(&self, pos: BlockPos) -> bool {
        let base = self.base();
        pos.x >= base.x
            && pos.x < base.x + self.sx as i32
            && pos.y >= base.y
            && pos.y < base.y + self.sy as i32
            && pos.z >= base.z
            && pos.z < base.z + self.sz as i32
    }

    #[inline]
    fn local_of(&self, pos: BlockPos) -> Option<(usize, usize, usize)> {
        if !self.contains_world(pos) {
            return None;
        }
        let d = pos - self.base();
        Some((d.x as usize, d.y as usize, d.z as usize))
    }

    #[inline]
    pub fn get_world(&self, pos: BlockPos) -> Option<Block> {
        let (x, y, z) = self.local_of(pos)?;
        Some(self.get_local(x, y, z))
    }

    /// Returns false when `pos` lies outside this chunk.
    #[inline]
    pub fn set_world(&mut self, pos: BlockPos, b: Block) -> bool {
        match self.local_of(pos) {
            Some((x, y, z)) => {
                self.set_local(x, y, z, b);
                true
            }
            None => false,
        }
    }

    /// World position of a linear storage index.
    #[inline]
    pub fn world_of_index(&self, i: usize) -> BlockPos {
        let x = i % self.sx;
        let z = (i / self.sx) % self.sz;
        let y = i / (self.sx * self.sz);
        self.base().offset(x as i32, y as i32, z as i32)
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }
}
