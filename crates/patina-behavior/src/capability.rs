use patina_aging::RandomSource;
use patina_blocks::{Block, Stage};
use patina_geom::Face;

use crate::BlockCtx;

/// Placement rules and reactions to neighbor updates.
pub trait PlacementReaction: Send + Sync {
    fn can_place_at(&self, ctx: &BlockCtx<'_>) -> bool;

    /// Replacement after a neighbor changed. Defaults to breaking (air) once
    /// the placement rule no longer holds.
    fn on_neighbor_changed(&self, ctx: &BlockCtx<'_>) -> Option<Block> {
        if self.can_place_at(ctx) {
            None
        } else {
            Some(Block::AIR)
        }
    }
}

pub trait RandomTickReaction: Send + Sync {
    /// Replacement for this tick, if any.
    fn random_tick(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block>;
}

pub trait BonemealTarget: Send + Sync {
    fn is_valid_target(&self, ctx: &BlockCtx<'_>) -> bool;

    fn is_success(&self, _ctx: &BlockCtx<'_>, _rng: &mut dyn RandomSource) -> bool {
        true
    }

    fn perform(&self, ctx: &BlockCtx<'_>, rng: &mut dyn RandomSource) -> Option<Block>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Liquid {
    Water,
    Lava,
}

impl Liquid {
    pub fn key(self) -> &'static str {
        match self {
            Liquid::Water => "water",
            Liquid::Lava => "lava",
        }
    }

    pub fn from_key(s: &str) -> Option<Liquid> {
        match s {
            "water" => Some(Liquid::Water),
            "lava" => Some(Liquid::Lava),
            _ => None,
        }
    }
}

pub trait LiquidContainer: Send + Sync {
    fn can_place_liquid(&self, ctx: &BlockCtx<'_>, liquid: Liquid) -> bool;

    /// Filled replacement, or `None` when the liquid is refused.
    fn place_liquid(&self, ctx: &BlockCtx<'_>, liquid: Liquid) -> Option<Block>;

    /// Emptied replacement and the liquid taken out.
    fn pickup_liquid(&self, ctx: &BlockCtx<'_>) -> Option<(Block, Liquid)>;
}

pub trait SignalSource: Send + Sync {
    fn is_signal_source(&self) -> bool {
        true
    }

    /// Strength 0..=15 emitted out of `face` of this block.
    fn signal(&self, ctx: &BlockCtx<'_>, face: Face) -> u8;
}

/// Members of an aging family. Waxed twins share the stage but never age.
///
/// Every replacement keeps the state properties the target type shares with
/// the current block (facing, half, ...).
pub trait Weathering: Send + Sync {
    fn stage(&self) -> Stage;

    fn is_waxed(&self) -> bool;

    /// Block of the following stage; `None` at the terminal stage or when waxed.
    fn next_block(&self, ctx: &BlockCtx<'_>) -> Option<Block>;

    /// Scraping removes wax first, then walks back one stage.
    fn scrape(&self, ctx: &BlockCtx<'_>) -> Option<Block>;

    /// Waxed twin of this stage; `None` if already waxed or the chain has no twins.
    fn wax(&self, ctx: &BlockCtx<'_>) -> Option<Block>;
}

/// A block kind's behavior, exposing each capability it implements.
pub trait BlockBehavior: Send + Sync {
    fn kind(&self) -> &'static str;

    fn placement(&self) -> Option<&dyn PlacementReaction> {
        None
    }
    fn ticking(&self) -> Option<&dyn RandomTickReaction> {
        None
    }
    fn bonemeal(&self) -> Option<&dyn BonemealTarget> {
        None
    }
    fn liquid_container(&self) -> Option<&dyn LiquidContainer> {
        None
    }
    fn signal_source(&self) -> Option<&dyn SignalSource> {
        None
    }
    fn weathering(&self) -> Option<&dyn Weathering> {
        None
    }
}
