use std::sync::Arc;

use patina_blocks::{Block, BlockRegistry};
use patina_geom::BlockPos;
use patina_runtime::scene::{ROOF_Y, build_demo};
use patina_runtime::{RuntimeConfig, TickRunner, block_counts, stage_histogram};
use patina_world::World;

const DEMO_BLOCKS: &str = include_str!("../../../assets/blocks.toml");

fn registry() -> Arc<BlockRegistry> {
    Arc::new(BlockRegistry::from_toml_str(DEMO_BLOCKS).expect("demo registry"))
}

fn config(extra: &str) -> RuntimeConfig {
    RuntimeConfig::from_toml_str(extra).expect("runtime config")
}

fn block(reg: &BlockRegistry, name: &str) -> Block {
    reg.make_block_by_name(name, None).unwrap()
}

fn snapshot(w: &World) -> Vec<(BlockPos, Block)> {
    let mut v: Vec<_> = w.iter_blocks().collect();
    v.sort_by_key(|(p, _)| *p);
    v
}

#[test]
fn demo_scene_histogram() {
    let reg = registry();
    let w = build_demo(&reg, 8, 16).unwrap();
    let copper = reg.family_by_name("copper").unwrap().id;
    // 64 roof blocks: a 2x2 exposed patch, one weathered, two waxed corners.
    assert_eq!(stage_histogram(&w, &reg, copper), vec![57, 4, 1, 0]);
    assert!(reg.family_by_name("cut_copper").is_none());
    let counts = block_counts(&w);
    assert_eq!(counts[&block(&reg, "waxed_copper_block").id], 2);
    assert_eq!(counts[&block(&reg, "redstone_block").id], 1);
}

#[test]
fn lone_copper_advances_once_per_tick() {
    let reg = registry();
    let cfg = config(
        "[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 200\nneighbor_updates = false\n",
    );
    let runner = TickRunner::new(reg.clone(), &cfg, 7).unwrap();
    let mut w = World::new(2, 2, 2);
    let p = BlockPos::new(0, 0, 0);
    w.set(p, block(&reg, "copper_block"));

    let report = runner.run_tick(&mut w, 0);
    assert_eq!(report.sampled, 200);
    assert!(report.evaluated > 0);
    assert_eq!(report.applied, 1);
    assert_eq!(w.get(p), Some(block(&reg, "exposed_copper")));

    for tick in 1..3 {
        runner.run_tick(&mut w, tick);
    }
    assert_eq!(w.get(p), Some(block(&reg, "oxidized_copper")));
    let report = runner.run_tick(&mut w, 3);
    assert!(report.changes.is_empty());
}

#[test]
fn stairs_age_in_place_keeping_their_facing() {
    let reg = registry();
    let cfg = config(
        "[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 200\nneighbor_updates = false\n",
    );
    let runner = TickRunner::new(reg.clone(), &cfg, 21).unwrap();
    let mut w = World::new(2, 2, 2);
    let p = BlockPos::new(0, 0, 0);
    let props = std::collections::HashMap::from([("facing".to_string(), "east".to_string())]);
    w.set(p, reg.make_block_by_name("copper_stairs", Some(&props)).unwrap());

    runner.run_tick(&mut w, 0);
    let got = w.get(p).unwrap();
    let ty = reg.get(got.id).unwrap();
    assert_eq!(ty.name, "exposed_copper_stairs");
    assert_eq!(ty.state_prop_value(got.state, "facing"), Some("east"));
    let copper = reg.family_by_name("copper").unwrap().id;
    assert_eq!(stage_histogram(&w, &reg, copper), vec![0, 1, 0, 0]);
}

#[test]
fn waxed_copper_never_changes() {
    let reg = registry();
    let cfg = config("[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 200\n");
    let runner = TickRunner::new(reg.clone(), &cfg, 3).unwrap();
    let mut w = World::new(2, 2, 2);
    let p = BlockPos::new(1, 1, 1);
    let waxed = block(&reg, "waxed_copper_block");
    w.set(p, waxed);
    for tick in 0..10 {
        let report = runner.run_tick(&mut w, tick);
        assert_eq!(report.evaluated, 0);
    }
    assert_eq!(w.get(p), Some(waxed));
}

#[test]
fn neighbor_updates_break_unsupported_crops() {
    let reg = registry();
    let setup = |w: &mut World| {
        w.set(BlockPos::new(0, 0, 0), block(&reg, "copper_block"));
        w.set(BlockPos::new(0, 1, 0), block(&reg, "wheat"));
    };
    let wheat = block(&reg, "wheat").id;

    let cfg = config("[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 200\n");
    let runner = TickRunner::new(reg.clone(), &cfg, 11).unwrap();
    let mut w = World::new(2, 2, 2);
    setup(&mut w);
    let report = runner.run_tick(&mut w, 0);
    assert!(report.cascaded >= 1);
    assert_eq!(w.get(BlockPos::new(0, 1, 0)), Some(Block::AIR));

    let cfg = config(
        "[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 200\nneighbor_updates = false\n",
    );
    let runner = TickRunner::new(reg.clone(), &cfg, 11).unwrap();
    let mut w = World::new(2, 2, 2);
    setup(&mut w);
    let report = runner.run_tick(&mut w, 0);
    assert_eq!(report.cascaded, 0);
    assert_eq!(w.get(BlockPos::new(0, 1, 0)).map(|b| b.id), Some(wheat));
}

#[test]
fn runs_are_deterministic_across_thread_counts() {
    let reg = registry();
    let mut worlds = Vec::new();
    for threads in [1, 4] {
        let cfg = config(&format!(
            "[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 64\nthreads = {threads}\n"
        ));
        let runner = TickRunner::new(reg.clone(), &cfg, 42).unwrap();
        let mut w = build_demo(&reg, 12, 8).unwrap();
        for tick in 0..25 {
            runner.run_tick(&mut w, tick);
        }
        worlds.push(snapshot(&w));
    }
    assert_eq!(worlds[0], worlds[1]);
}

#[test]
fn roof_ages_only_forward() {
    let reg = registry();
    let cfg = config("[aging]\ntick_chance = 1.0\n[ticks]\nrandom_tick_speed = 128\n");
    let runner = TickRunner::new(reg.clone(), &cfg, 5).unwrap();
    let copper = reg.family_by_name("copper").unwrap().id;
    let mut w = build_demo(&reg, 8, 16).unwrap();

    let total_age = |h: &[usize]| h.iter().enumerate().map(|(a, n)| a * n).sum::<usize>();
    let mut prev = stage_histogram(&w, &reg, copper);
    for tick in 0..30 {
        let report = runner.run_tick(&mut w, tick);
        assert_eq!(report.sampled, w.loaded_chunks() * 128);
        let h = stage_histogram(&w, &reg, copper);
        assert_eq!(h.iter().sum::<usize>(), 62);
        assert!(total_age(&h) >= total_age(&prev));
        prev = h;
    }
    assert_eq!(
        w.get(BlockPos::new(0, ROOF_Y, 0)),
        Some(block(&reg, "waxed_copper_block"))
    );
}
