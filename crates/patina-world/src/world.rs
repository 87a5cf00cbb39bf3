use std::collections::HashMap;

use patina_blocks::Block;
use patina_geom::BlockPos;

use crate::{BlockAccess, CHUNK_SIZE, ChunkBuf, ChunkCoord};

/// A block replacement decided during a tick and applied afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockChange {
    pub pos: BlockPos,
    pub from: Block,
    pub to: Block,
}

/// Sparse map of loaded chunks. Positions in unloaded chunks read as `None`.
#[derive(Clone, Debug)]
pub struct World {
    sx: i32,
    sy: i32,
    sz: i32,
    chunks: HashMap<ChunkCoord, ChunkBuf>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(CHUNK_SIZE, CHUNK_SIZE, CHUNK_SIZE)
    }
}

impl World {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx: sx.max(1) as i32,
            sy: sy.max(1) as i32,
            sz: sz.max(1) as i32,
            chunks: HashMap::new(),
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> (usize, usize, usize) {
        (self.sx as usize, self.sy as usize, self.sz as usize)
    }

    #[inline]
    pub fn chunk_key(&self, pos: BlockPos) -> ChunkCoord {
        ChunkCoord::containing(pos, self.sx, self.sy, self.sz)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkBuf> {
        self.chunks.get(&coord)
    }

    /// Loaded chunk coordinates in ascending order.
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        v.sort();
        v
    }

    pub fn chunks(&self) -> impl Iterator<Item = &ChunkBuf> {
        self.chunks.values()
    }

    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn insert_chunk(&mut self, buf: ChunkBuf) {
        self.chunks.insert(buf.coord, buf);
    }

    pub fn get(&self, pos: BlockPos) -> Option<Block> {
        self.chunks.get(&self.chunk_key(pos))?.get_world(pos)
    }

    /// Writes a block, loading an all-air chunk when needed. Returns the previous block.
    pub fn set(&mut self, pos: BlockPos, b: Block) -> Block {
        let key = self.chunk_key(pos);
        let (sx, sy, sz) = self.chunk_size();
        let chunk = self
            .chunks
            .entry(key)
            .or_insert_with(|| ChunkBuf::new_air(key, sx, sy, sz));
        let prev = chunk.get_world(pos).unwrap_or(Block::AIR);
        chunk.set_world(pos, b);
        prev
    }

    /// Applies changes in order, skipping any whose `from` no longer matches.
    /// Returns how many were written.
    pub fn apply_changes(&mut self, changes: &[BlockChange]) -> usize {
        let mut applied = 0;
        for c in changes {
            if self.get(c.pos) != Some(c.from) {
                continue;
            }
            self.set(c.pos, c.to);
            applied += 1;
        }
        applied
    }

    pub fn fill(&mut self, min: BlockPos, max: BlockPos, b: Block) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set(BlockPos::new(x, y, z), b);
                }
            }
        }
    }

    /// Every non-air block with its position.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (BlockPos, Block)> + '_ {
        self.chunks.values().flat_map(|c| {
            c.blocks
                .iter()
                .enumerate()
                .filter(|(_, b)| !b.is_air())
                .map(move |(i, b)| (c.world_of_index(i), *b))
        })
    }
}

impl BlockAccess for World {
    #[inline]
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.get(pos)
    }
}
