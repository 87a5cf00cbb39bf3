use serde::Deserialize;
use std::collections::HashMap;

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Aging families; each lists its stage blocks from least to most progressed
    #[serde(default)]
    pub families: Vec<FamilyDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,

    #[serde(default)]
    pub state_schema: Option<HashMap<String, Vec<String>>>,

    // Behavior selection: a bare kind ("weathering") or a table with parameters
    #[serde(default)]
    pub behavior: Option<BehaviorConfig>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum BehaviorConfig {
    Simple(String),
    Detailed(BehaviorDetailed),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorDetailed {
    Weathering,
    Crop {
        #[serde(default = "default_crop_max_age")]
        max_age: u8,
        #[serde(default = "default_growth_chance")]
        growth_chance: f32,
        #[serde(default)]
        soil: Vec<String>,
    },
    Plant {
        #[serde(default)]
        soil: Vec<String>,
    },
    SignalSource {
        #[serde(default = "default_signal_power")]
        power: u8,
    },
    Cauldron {
        #[serde(default = "default_cauldron_max_level")]
        max_level: u8,
    },
}

#[derive(Deserialize, Debug, Clone)]
pub struct FamilyDef {
    pub name: String,
    #[serde(default = "default_chance_modifier")]
    pub chance_modifier: f32,
    pub stages: Vec<StageDef>,
    // Optional non-aging twins, one per stage, in the same order
    #[serde(default)]
    pub waxed: Vec<String>,
    // Further block chains (cut, stairs, ...) aging in lockstep with `stages`
    #[serde(default)]
    pub variants: Vec<VariantDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VariantDef {
    pub stages: Vec<String>,
    #[serde(default)]
    pub waxed: Vec<String>,
}

// A stage is either a block name or a table overriding the family modifier
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum StageDef {
    Name(String),
    Detailed {
        block: String,
        #[serde(default)]
        chance_modifier: Option<f32>,
    },
}

impl StageDef {
    pub fn block_name(&self) -> &str {
        match self {
            StageDef::Name(n) => n,
            StageDef::Detailed { block, .. } => block,
        }
    }
}

fn default_crop_max_age() -> u8 {
    7
}
fn default_growth_chance() -> f32 {
    0.25
}
fn default_signal_power() -> u8 {
    15
}
fn default_cauldron_max_level() -> u8 {
    3
}
fn default_chance_modifier() -> f32 {
    1.0
}
