use std::sync::Arc;

use patina_aging::{Aging, AgingParams, RandomSource};
use patina_blocks::{Behavior, Block, BlockId, BlockRegistry};
use patina_geom::{BlockPos, Face};
use patina_world::BlockAccess;

use crate::blocks::{CauldronBlock, CropBlock, PlantBlock, SignalSourceBlock, WeatheringBlock};
use crate::{BlockBehavior, BlockCtx, Liquid};

/// Behaviors indexed by block id. Blocks without one are inert.
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    by_id: Vec<Option<Arc<dyn BlockBehavior>>>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self { by_id: Vec::new() }
    }

    /// Builds the built-in behavior for every block that declares one.
    pub fn from_registry(reg: &BlockRegistry, params: AgingParams) -> Self {
        let aging = Arc::new(Aging::new(params));
        let mut out = Self::new();
        for ty in &reg.blocks {
            let behavior: Arc<dyn BlockBehavior> = match &ty.behavior {
                Behavior::None => continue,
                Behavior::Weathering => match ty.family {
                    Some(m) => Arc::new(WeatheringBlock::new(m, aging.clone())),
                    None => continue,
                },
                Behavior::Crop {
                    max_age,
                    growth_chance,
                    soil,
                } => Arc::new(CropBlock::new(*max_age, *growth_chance, soil.clone())),
                Behavior::Plant { soil } => Arc::new(PlantBlock::new(soil.clone())),
                Behavior::SignalSource { power } => Arc::new(SignalSourceBlock::new(*power)),
                Behavior::Cauldron { max_level } => Arc::new(CauldronBlock::new(*max_level)),
            };
            out.register(ty.id, behavior);
        }
        log::debug!(
            "behavior registry: {} of {} block types have behaviors",
            out.by_id.iter().filter(|b| b.is_some()).count(),
            reg.blocks.len()
        );
        out
    }

    /// Installs or replaces the behavior for `id`.
    pub fn register(&mut self, id: BlockId, behavior: Arc<dyn BlockBehavior>) {
        let i = id as usize;
        if self.by_id.len() <= i {
            self.by_id.resize(i + 1, None);
        }
        self.by_id[i] = Some(behavior);
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&dyn BlockBehavior> {
        self.by_id.get(id as usize)?.as_deref()
    }

    #[inline]
    pub fn has_random_ticks(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|b| b.ticking().is_some())
    }

    pub fn random_tick(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block> {
        self.get(ctx.block.id)?.ticking()?.random_tick(ctx, rng)
    }

    /// Blocks without a placement rule can go anywhere.
    pub fn can_place_at(&self, ctx: &BlockCtx<'_>) -> bool {
        match self.get(ctx.block.id).and_then(|b| b.placement()) {
            Some(p) => p.can_place_at(ctx),
            None => true,
        }
    }

    pub fn neighbor_changed(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        self.get(ctx.block.id)?.placement()?.on_neighbor_changed(ctx)
    }

    /// Applies bonemeal: `None` when the block is not a valid target or the roll fails.
    pub fn apply_bonemeal(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block> {
        let target = self.get(ctx.block.id)?.bonemeal()?;
        if !target.is_valid_target(ctx) || !target.is_success(ctx, rng) {
            return None;
        }
        target.perform(ctx, rng)
    }

    pub fn place_liquid(&self, ctx: &BlockCtx<'_>, liquid: Liquid) -> Option<Block> {
        self.get(ctx.block.id)?
            .liquid_container()?
            .place_liquid(ctx, liquid)
    }

    pub fn pickup_liquid(&self, ctx: &BlockCtx<'_>) -> Option<(Block, Liquid)> {
        self.get(ctx.block.id)?.liquid_container()?.pickup_liquid(ctx)
    }

    /// Signal emitted by the block in `ctx` out of `face`; 0 for non-sources.
    pub fn signal(&self, ctx: &BlockCtx<'_>, face: Face) -> u8 {
        match self.get(ctx.block.id).and_then(|b| b.signal_source()) {
            Some(s) if s.is_signal_source() => s.signal(ctx, face),
            _ => 0,
        }
    }

    /// Strongest signal reaching `pos` from its six face neighbors.
    pub fn received_signal(&self, reg: &BlockRegistry, world: &dyn BlockAccess, pos: BlockPos) -> u8 {
        Face::ALL
            .iter()
            .filter_map(|&f| {
                let ctx = BlockCtx::at(reg, world, pos.relative(f)?)?;
                Some(self.signal(&ctx, f.opposite()))
            })
            .max()
            .unwrap_or(0)
    }

    pub fn scrape(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        self.get(ctx.block.id)?.weathering()?.scrape(ctx)
    }

    pub fn wax(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        self.get(ctx.block.id)?.weathering()?.wax(ctx)
    }
}
