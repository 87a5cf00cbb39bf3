//! Block identity, packed state, material families, and the block registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod family;
pub mod registry;
pub mod types;

pub use family::{FamilyMembership, MaterialFamily, StageEntry};
pub use registry::{BlockRegistry, BlockType, RegistryError};
pub use types::{Behavior, Block, BlockId, BlockState, FamilyId, Stage};
