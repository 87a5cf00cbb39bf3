use patina_blocks::{Block, BlockRegistry, BlockType};
use patina_geom::{BlockPos, Face};
use patina_world::BlockAccess;

/// Everything a capability may read while reacting at one position.
#[derive(Clone, Copy)]
pub struct BlockCtx<'a> {
    pub reg: &'a BlockRegistry,
    pub world: &'a dyn BlockAccess,
    pub pos: BlockPos,
    pub block: Block,
}

impl<'a> BlockCtx<'a> {
    pub fn new(
        reg: &'a BlockRegistry,
        world: &'a dyn BlockAccess,
        pos: BlockPos,
        block: Block,
    ) -> Self {
        Self {
            reg,
            world,
            pos,
            block,
        }
    }

    /// Context for whatever currently sits at `pos`; `None` when nothing is there.
    pub fn at(reg: &'a BlockRegistry, world: &'a dyn BlockAccess, pos: BlockPos) -> Option<Self> {
        let block = world.block_at(pos)?;
        Some(Self::new(reg, world, pos, block))
    }

    #[inline]
    pub fn ty(&self) -> Option<&'a BlockType> {
        self.reg.get(self.block.id)
    }

    #[inline]
    pub fn neighbor(&self, face: Face) -> Option<Block> {
        self.world.block_at(self.pos.relative(face)?)
    }

    #[inline]
    pub fn below(&self) -> Option<Block> {
        self.neighbor(Face::NegY)
    }

    /// Index of a state property's current value on this block.
    pub fn prop(&self, prop: &str) -> Option<usize> {
        self.ty()?.state_prop_index(self.block.state, prop)
    }

    /// This block with one property replaced.
    pub fn with_prop(&self, prop: &str, idx: usize) -> Block {
        match self.ty() {
            Some(ty) => Block::new(self.block.id, ty.with_prop_index(self.block.state, prop, idx)),
            None => self.block,
        }
    }
}
