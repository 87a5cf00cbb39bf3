use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashSet;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use patina_aging::RandomSource;
use patina_behavior::{BehaviorRegistry, BlockCtx};
use patina_blocks::BlockRegistry;
use patina_geom::BlockPos;
use patina_world::{BlockChange, ChunkBuf, ChunkCoord, World};

use crate::config::{RuntimeConfig, TickConfig};

/// Outcome of one random-tick sweep.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub tick: u64,
    /// Positions drawn across all chunks.
    pub sampled: usize,
    /// Sampled blocks that had a random-tick reaction.
    pub evaluated: usize,
    pub changes: Vec<BlockChange>,
    pub applied: usize,
    /// Replacements caused by neighbor updates after the sweep.
    pub cascaded: usize,
    pub t_eval_ms: u32,
    pub t_apply_ms: u32,
}

#[derive(Default)]
struct ChunkSweep {
    sampled: usize,
    evaluated: usize,
    changes: Vec<BlockChange>,
}

/// Drives random ticks over a `World`.
///
/// Every chunk of a tick reads the same snapshot; replacements are applied
/// only once the whole sweep is done.
pub struct TickRunner {
    reg: Arc<BlockRegistry>,
    behaviors: Arc<BehaviorRegistry>,
    cfg: TickConfig,
    seed: u64,
    pool: ThreadPool,
}

impl TickRunner {
    pub fn new(
        reg: Arc<BlockRegistry>,
        cfg: &RuntimeConfig,
        seed: u64,
    ) -> Result<Self, ThreadPoolBuildError> {
        let behaviors = Arc::new(BehaviorRegistry::from_registry(&reg, cfg.aging));
        Self::with_behaviors(reg, behaviors, cfg.ticks.clone(), seed)
    }

    pub fn with_behaviors(
        reg: Arc<BlockRegistry>,
        behaviors: Arc<BehaviorRegistry>,
        cfg: TickConfig,
        seed: u64,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(cfg.threads)
            .thread_name(|i| format!("patina-tick-{i}"))
            .build()?;
        log::debug!(
            "tick runner: {} threads, {} samples per chunk",
            pool.current_num_threads(),
            cfg.random_tick_speed
        );
        Ok(Self {
            reg,
            behaviors,
            cfg,
            seed,
            pool,
        })
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.reg
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn config(&self) -> &TickConfig {
        &self.cfg
    }

    pub fn run_tick(&self, world: &mut World, tick: u64) -> TickReport {
        let t0 = Instant::now();
        let coords = world.chunk_coords();
        let sweeps: Vec<ChunkSweep> = {
            let snapshot: &World = world;
            self.pool.install(|| {
                coords
                    .par_iter()
                    .filter_map(|&c| snapshot.chunk(c))
                    .map(|chunk| self.sweep_chunk(snapshot, chunk, tick))
                    .collect()
            })
        };
        let t_eval_ms = elapsed_ms(t0);

        let mut report = TickReport {
            tick,
            ..Default::default()
        };
        for s in sweeps {
            report.sampled += s.sampled;
            report.evaluated += s.evaluated;
            report.changes.extend(s.changes);
        }

        let t1 = Instant::now();
        report.applied = world.apply_changes(&report.changes);
        if self.cfg.neighbor_updates && report.applied > 0 {
            let cascade = self.neighbor_updates(world, &report.changes);
            report.cascaded = world.apply_changes(&cascade);
        }
        report.t_apply_ms = elapsed_ms(t1);

        log::debug!(
            "tick {}: {} chunks, {} sampled, {} evaluated, {} applied, {} cascaded ({}ms eval)",
            tick,
            coords.len(),
            report.sampled,
            report.evaluated,
            report.applied,
            report.cascaded,
            t_eval_ms
        );
        report.t_eval_ms = t_eval_ms;
        report
    }

    fn sweep_chunk(&self, world: &World, chunk: &ChunkBuf, tick: u64) -> ChunkSweep {
        let mut out = ChunkSweep::default();
        if chunk.is_all_air() {
            return out;
        }
        let mut rng = StdRng::seed_from_u64(chunk_seed(self.seed, tick, chunk.coord));
        let rng: &mut dyn RandomSource = &mut rng;
        let base = chunk.base();
        for _ in 0..self.cfg.random_tick_speed {
            let x = rng.next_below(chunk.sx as u32) as usize;
            let y = rng.next_below(chunk.sy as u32) as usize;
            let z = rng.next_below(chunk.sz as u32) as usize;
            out.sampled += 1;
            let block = chunk.get_local(x, y, z);
            if block.is_air() || !self.behaviors.has_random_ticks(block.id) {
                continue;
            }
            out.evaluated += 1;
            let pos = base + BlockPos::new(x as i32, y as i32, z as i32);
            let ctx = BlockCtx::new(&self.reg, world, pos, block);
            match self.behaviors.random_tick(&ctx, rng) {
                Some(to) if to != block => out.changes.push(BlockChange {
                    pos,
                    from: block,
                    to,
                }),
                _ => {}
            }
        }
        out
    }

    /// Replacements for face neighbors of changed positions, read against the updated world.
    fn neighbor_updates(&self, world: &World, changes: &[BlockChange]) -> Vec<BlockChange> {
        let mut seen: HashSet<BlockPos> = HashSet::new();
        let mut out = Vec::new();
        for c in changes {
            for n in c.pos.neighbors() {
                if !seen.insert(n) {
                    continue;
                }
                let Some(ctx) = BlockCtx::at(&self.reg, world, n) else {
                    continue;
                };
                if ctx.block.is_air() {
                    continue;
                }
                if let Some(to) = self.behaviors.neighbor_changed(&ctx) {
                    if to != ctx.block {
                        out.push(BlockChange {
                            pos: n,
                            from: ctx.block,
                            to,
                        });
                    }
                }
            }
        }
        out
    }
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

// splitmix64 finalizer over the tick and chunk coordinates
fn chunk_seed(seed: u64, tick: u64, c: ChunkCoord) -> u64 {
    let mut h = seed ^ tick.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    for v in [c.cx, c.cy, c.cz] {
        h = (h ^ (v as u32 as u64)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 31;
    }
    h = (h ^ (h >> 30)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}
