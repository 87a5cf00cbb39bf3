use patina_blocks::Block;

use crate::{BlockBehavior, BlockCtx, Liquid, LiquidContainer};

const LEVEL: &str = "level";
const LIQUID: &str = "liquid";

/// Holds one liquid: accepts it when empty, gives it back when full.
///
/// Without a `liquid` state property the cauldron only holds water.
pub struct CauldronBlock {
    max_level: u8,
}

impl CauldronBlock {
    pub fn new(max_level: u8) -> Self {
        Self { max_level }
    }

    fn level(&self, ctx: &BlockCtx<'_>) -> u8 {
        ctx.prop(LEVEL).unwrap_or(0) as u8
    }

    fn liquid_slot(ctx: &BlockCtx<'_>, liquid: Liquid) -> Option<Option<usize>> {
        let ty = ctx.ty()?;
        let Some(&i) = ty.prop_index.get(LIQUID) else {
            return (liquid == Liquid::Water).then_some(None);
        };
        let slot = ty.state_fields[i]
            .values
            .iter()
            .position(|v| v == liquid.key())?;
        Some(Some(slot))
    }

    fn held(&self, ctx: &BlockCtx<'_>) -> Option<Liquid> {
        if self.level(ctx) == 0 {
            return None;
        }
        match ctx.ty()?.state_prop_value(ctx.block.state, LIQUID) {
            Some(v) => Liquid::from_key(v),
            None => Some(Liquid::Water),
        }
    }
}

impl BlockBehavior for CauldronBlock {
    fn kind(&self) -> &'static str {
        "cauldron"
    }
    fn liquid_container(&self) -> Option<&dyn LiquidContainer> {
        Some(self)
    }
}

impl LiquidContainer for CauldronBlock {
    fn can_place_liquid(&self, ctx: &BlockCtx<'_>, liquid: Liquid) -> bool {
        self.max_level > 0
            && self.level(ctx) == 0
            && Self::liquid_slot(ctx, liquid).is_some()
    }

    fn place_liquid(&self, ctx: &BlockCtx<'_>, liquid: Liquid) -> Option<Block> {
        if !self.can_place_liquid(ctx, liquid) {
            return None;
        }
        let filled = ctx.with_prop(LEVEL, self.max_level as usize);
        match Self::liquid_slot(ctx, liquid)? {
            Some(slot) => {
                let ty = ctx.ty()?;
                Some(Block::new(
                    filled.id,
                    ty.with_prop_index(filled.state, LIQUID, slot),
                ))
            }
            None => Some(filled),
        }
    }

    fn pickup_liquid(&self, ctx: &BlockCtx<'_>) -> Option<(Block, Liquid)> {
        if self.max_level == 0 || self.level(ctx) < self.max_level {
            return None;
        }
        let liquid = self.held(ctx)?;
        let ty = ctx.ty()?;
        let mut state = ty.with_prop_index(ctx.block.state, LEVEL, 0);
        state = ty.with_prop_index(state, LIQUID, 0);
        Some((Block::new(ctx.block.id, state), liquid))
    }
}
