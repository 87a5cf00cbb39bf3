use std::sync::Arc;

use patina_aging::{Aging, RandomSource};
use patina_blocks::{Block, FamilyMembership, Stage};

use crate::{BlockBehavior, BlockCtx, RandomTickReaction, Weathering};

pub struct WeatheringBlock {
    membership: FamilyMembership,
    aging: Arc<Aging>,
}

impl WeatheringBlock {
    pub fn new(membership: FamilyMembership, aging: Arc<Aging>) -> Self {
        Self { membership, aging }
    }
}

impl BlockBehavior for WeatheringBlock {
    fn kind(&self) -> &'static str {
        if self.membership.waxed {
            "waxed"
        } else {
            "weathering"
        }
    }

    fn ticking(&self) -> Option<&dyn RandomTickReaction> {
        if self.membership.waxed {
            None
        } else {
            Some(self)
        }
    }

    fn weathering(&self) -> Option<&dyn Weathering> {
        Some(self)
    }
}

impl RandomTickReaction for WeatheringBlock {
    fn random_tick(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block> {
        if self.membership.waxed {
            return None;
        }
        let next = self
            .aging
            .on_random_tick(ctx.pos, self.membership.stage, ctx.reg, ctx.world, rng)?;
        ctx.reg.restage(ctx.block, next, false)
    }
}

impl Weathering for WeatheringBlock {
    fn stage(&self) -> Stage {
        self.membership.stage
    }

    fn is_waxed(&self) -> bool {
        self.membership.waxed
    }

    fn next_block(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        ctx.reg.next_block(ctx.block)
    }

    fn scrape(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        ctx.reg.scraped_block(ctx.block)
    }

    fn wax(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        ctx.reg.waxed_block(ctx.block)
    }
}
