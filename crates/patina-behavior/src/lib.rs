//! Per-block capabilities and the registry that dispatches them.
//!
//! Each block kind implements `BlockBehavior` and exposes the capabilities it
//! supports. Hosts look up behaviors by block id and call the capability
//! methods; every method returns a decision (usually a replacement block) and
//! never writes to the world itself.
#![forbid(unsafe_code)]

pub mod blocks;
mod capability;
mod context;
mod registry;

pub use capability::{
    BlockBehavior, BonemealTarget, Liquid, LiquidContainer, PlacementReaction,
    RandomTickReaction, SignalSource, Weathering,
};
pub use context::BlockCtx;
pub use registry::BehaviorRegistry;
