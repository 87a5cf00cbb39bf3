use patina_aging::RandomSource;
use patina_blocks::{Block, BlockId};

use super::on_soil;
use crate::{
    BlockBehavior, BlockCtx, BonemealTarget, PlacementReaction, RandomTickReaction,
};

const AGE: &str = "age";

/// Grows through its `age` property on random ticks and bonemeal.
pub struct CropBlock {
    max_age: u8,
    growth_chance: f32,
    soil: Vec<BlockId>,
}

impl CropBlock {
    pub fn new(max_age: u8, growth_chance: f32, soil: Vec<BlockId>) -> Self {
        Self {
            max_age,
            growth_chance,
            soil,
        }
    }

    #[inline]
    fn age(&self, ctx: &BlockCtx<'_>) -> u8 {
        ctx.prop(AGE).unwrap_or(0).min(self.max_age as usize) as u8
    }

    #[inline]
    pub fn is_mature(&self, ctx: &BlockCtx<'_>) -> bool {
        self.age(ctx) >= self.max_age
    }
}

impl BlockBehavior for CropBlock {
    fn kind(&self) -> &'static str {
        "crop"
    }
    fn placement(&self) -> Option<&dyn PlacementReaction> {
        Some(self)
    }
    fn ticking(&self) -> Option<&dyn RandomTickReaction> {
        Some(self)
    }
    fn bonemeal(&self) -> Option<&dyn BonemealTarget> {
        Some(self)
    }
}

impl PlacementReaction for CropBlock {
    fn can_place_at(&self, ctx: &BlockCtx<'_>) -> bool {
        on_soil(ctx, &self.soil)
    }
}

impl RandomTickReaction for CropBlock {
    fn random_tick(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block> {
        if self.is_mature(ctx) {
            return None;
        }
        if rng.next_f32() >= self.growth_chance {
            return None;
        }
        Some(ctx.with_prop(AGE, self.age(ctx) as usize + 1))
    }
}

impl BonemealTarget for CropBlock {
    fn is_valid_target(&self, ctx: &BlockCtx<'_>) -> bool {
        !self.is_mature(ctx)
    }

    fn perform(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block> {
        let grown = self.age(ctx) as u32 + 2 + rng.next_below(4);
        let age = grown.min(self.max_age as u32) as usize;
        Some(ctx.with_prop(AGE, age))
    }
}
