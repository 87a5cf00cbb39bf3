use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use patina_blocks::BlockRegistry;
use patina_runtime::scene::build_demo;
use patina_runtime::{RuntimeConfig, TickRunner, block_counts, stage_histogram};
use patina_world::World;

#[derive(Parser, Debug)]
#[command(name = "patina", about = "Runs random ticks over a weathering demo scene")]
struct Args {
    /// Block and family definitions
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// Aging and tick settings; defaults apply when the file is missing
    #[arg(long, default_value = "assets/runtime.toml")]
    runtime: PathBuf,
    #[arg(long, default_value_t = 24_000)]
    ticks: u64,
    #[arg(long, default_value_t = 1337)]
    seed: u64,
    /// Edge length of the copper roof
    #[arg(long, default_value_t = 32)]
    size: i32,
    /// Log stage histograms every N ticks (0 = only at the end)
    #[arg(long, default_value_t = 1_000)]
    report_every: u64,
    /// Worker threads, overriding the runtime file (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();

    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    let mut cfg = if args.runtime.exists() {
        RuntimeConfig::load_from_path(&args.runtime)?
    } else {
        log::warn!("runtime config {:?} not found; using defaults", args.runtime);
        RuntimeConfig::default()
    };
    if let Some(t) = args.threads {
        cfg.ticks.threads = t;
    }

    let mut world = build_demo(&reg, args.size, cfg.ticks.chunk_size)?;
    let runner = TickRunner::new(reg.clone(), &cfg, args.seed)?;
    log::info!(
        "running {} ticks (seed {}, radius {}, tick chance {})",
        args.ticks,
        args.seed,
        cfg.aging.radius,
        cfg.aging.tick_chance
    );

    let mut applied = 0usize;
    let mut cascaded = 0usize;
    for tick in 0..args.ticks {
        let report = runner.run_tick(&mut world, tick);
        applied += report.applied;
        cascaded += report.cascaded;
        if args.report_every > 0 && (tick + 1) % args.report_every == 0 {
            log_histograms(&world, &reg, tick + 1);
        }
    }

    log_histograms(&world, &reg, args.ticks);
    log::info!("{} blocks replaced, {} by neighbor updates", applied, cascaded);
    let mut counts: Vec<_> = block_counts(&world).into_iter().collect();
    counts.sort();
    for (id, n) in counts {
        log::debug!("  {:<24} {}", reg.debug_name(id), n);
    }
    Ok(())
}

fn log_histograms(world: &World, reg: &BlockRegistry, tick: u64) {
    for fam in &reg.families {
        let h = stage_histogram(world, reg, fam.id);
        if h.iter().all(|&n| n == 0) {
            continue;
        }
        log::info!("tick {:>6} {:<12} {:?}", tick, fam.name, h);
    }
}
