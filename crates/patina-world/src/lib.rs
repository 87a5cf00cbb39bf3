//! Read access to placed blocks, chunk buffers, and a sparse chunked world.
#![forbid(unsafe_code)]

mod chunk;
mod chunk_coord;
mod world;

pub use chunk::ChunkBuf;
pub use chunk_coord::ChunkCoord;
pub use world::{BlockChange, World};

use std::collections::HashMap;

use patina_blocks::Block;
use patina_geom::BlockPos;

pub const CHUNK_SIZE: usize = 16;

/// Read-only view of placed blocks.
///
/// `None` means nothing is known at `pos` (unloaded or outside the snapshot);
/// callers treat it the same as an unrelated block. Implementations must not
/// change between calls made during one evaluation.
pub trait BlockAccess {
    fn block_at(&self, pos: BlockPos) -> Option<Block>;
}

impl<T: BlockAccess + ?Sized> BlockAccess for &T {
    #[inline]
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        (**self).block_at(pos)
    }
}

impl BlockAccess for HashMap<BlockPos, Block> {
    #[inline]
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.get(&pos).copied()
    }
}
