//! Built-in behaviors selected by `behavior = ...` in the blocks config.

mod cauldron;
mod crop;
mod plant;
mod signal;
mod weathering;

pub use cauldron::CauldronBlock;
pub use crop::CropBlock;
pub use plant::PlantBlock;
pub use signal::SignalSourceBlock;
pub use weathering::WeatheringBlock;

use patina_blocks::BlockId;

use crate::BlockCtx;

// Plants stand on one of `soil`, or on any solid block when `soil` is empty.
fn on_soil(ctx: &BlockCtx<'_>, soil: &[BlockId]) -> bool {
    let Some(below) = ctx.below() else {
        return false;
    };
    if soil.is_empty() {
        return ctx.reg.is_solid(below);
    }
    soil.contains(&below.id)
}
