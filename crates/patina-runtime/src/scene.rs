//! Demo scene: a copper roof with a few pre-aged patches, a small farm and a signal source.

use std::collections::HashMap;
use std::error::Error;

use patina_blocks::{Block, BlockRegistry};
use patina_geom::BlockPos;
use patina_world::World;

/// Height of the copper roof above the stone floor.
pub const ROOF_Y: i32 = 1;

fn block(reg: &BlockRegistry, name: &str) -> Result<Block, Box<dyn Error>> {
    reg.make_block_by_name(name, None)
        .ok_or_else(|| format!("demo scene needs block '{name}'").into())
}

/// Builds the demo world. `size` is the roof edge length (at least 4).
pub fn build_demo(
    reg: &BlockRegistry,
    size: i32,
    chunk_size: usize,
) -> Result<World, Box<dyn Error>> {
    let n = size.max(4);
    let stone = block(reg, "stone")?;
    let copper = block(reg, "copper_block")?;
    let exposed = block(reg, "exposed_copper")?;
    let weathered = block(reg, "weathered_copper")?;
    let waxed = block(reg, "waxed_copper_block")?;
    let farmland = block(reg, "farmland")?;
    let wheat = block(reg, "wheat")?;
    let dirt = block(reg, "dirt")?;
    let poppy = block(reg, "poppy")?;
    let redstone = block(reg, "redstone_block")?;
    let cauldron = block(reg, "cauldron")?;

    let mut w = World::new(chunk_size, chunk_size, chunk_size);
    w.fill(BlockPos::new(0, 0, 0), BlockPos::new(n - 1, 0, n - 1), stone);
    w.fill(
        BlockPos::new(0, ROOF_Y, 0),
        BlockPos::new(n - 1, ROOF_Y, n - 1),
        copper,
    );

    // Pre-aged patches seed the spread.
    let q = n / 4;
    w.fill(
        BlockPos::new(q, ROOF_Y, q),
        BlockPos::new(q + 1, ROOF_Y, q + 1),
        exposed,
    );
    w.set(BlockPos::new(n - q - 1, ROOF_Y, n - q - 1), weathered);
    w.set(BlockPos::new(0, ROOF_Y, 0), waxed);
    w.set(BlockPos::new(n - 1, ROOF_Y, n - 1), waxed);

    // Farm strip alongside the roof.
    let fz = n + 2;
    w.fill(BlockPos::new(0, 0, fz), BlockPos::new(n - 1, 0, fz + 1), farmland);
    w.fill(
        BlockPos::new(0, 1, fz),
        BlockPos::new(n - 1, 1, fz + 1),
        wheat,
    );
    w.set(BlockPos::new(0, 0, fz + 3), dirt);
    w.set(BlockPos::new(0, 1, fz + 3), poppy);

    w.set(BlockPos::new(-2, 1, 0), redstone);
    let mut props = HashMap::new();
    props.insert("liquid".to_string(), "water".to_string());
    props.insert("level".to_string(), "3".to_string());
    let filled = reg.make_block_by_name("cauldron", Some(&props)).unwrap_or(cauldron);
    w.set(BlockPos::new(-2, 1, 2), filled);

    log::info!(
        "demo scene: {}x{} copper roof, {} chunks loaded",
        n,
        n,
        w.loaded_chunks()
    );
    Ok(w)
}
