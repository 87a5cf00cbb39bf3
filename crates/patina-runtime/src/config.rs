use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use patina_aging::AgingParams;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub aging: AgingParams,
    #[serde(default)]
    pub ticks: TickConfig,
}

impl RuntimeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TickConfig {
    // Positions sampled per loaded chunk each tick
    #[serde(default = "default_random_tick_speed")]
    pub random_tick_speed: u32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    // 0 lets rayon pick
    #[serde(default)]
    pub threads: usize,
    // Run one round of neighbor-update reactions after applying tick changes
    #[serde(default = "default_neighbor_updates")]
    pub neighbor_updates: bool,
}

fn default_random_tick_speed() -> u32 {
    3
}
fn default_chunk_size() -> usize {
    16
}
fn default_neighbor_updates() -> bool {
    true
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            random_tick_speed: default_random_tick_speed(),
            chunk_size: default_chunk_size(),
            threads: 0,
            neighbor_updates: default_neighbor_updates(),
        }
    }
}
