use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

// Compact voxel representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn new(id: BlockId, state: BlockState) -> Self {
        Self { id, state }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Block::AIR.id
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FamilyId(pub u16);

/// An age ordinal tagged with the family it belongs to.
///
/// Stages of different families are unordered: `partial_cmp` returns `None`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Stage {
    pub family: FamilyId,
    pub age: u8,
}

impl Stage {
    #[inline]
    pub const fn new(family: FamilyId, age: u8) -> Self {
        Self { family, age }
    }

    #[inline]
    pub fn same_family(self, other: Stage) -> bool {
        self.family == other.family
    }
}

impl PartialOrd for Stage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.family != other.family {
            return None;
        }
        Some(self.age.cmp(&other.age))
    }
}

/// Compiled per-block behavior selection; soil names are resolved to ids.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    None,
    Weathering,
    Crop {
        max_age: u8,
        growth_chance: f32,
        soil: Vec<BlockId>,
    },
    Plant {
        soil: Vec<BlockId>,
    },
    SignalSource {
        power: u8,
    },
    Cauldron {
        max_level: u8,
    },
}

impl Behavior {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Behavior::None)
    }
}
