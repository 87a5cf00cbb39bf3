//! Stochastic neighbor-weighted aging of family blocks.
//!
//! A block advances to its family's next stage with probability
//! `((higher + 1) / (higher + lower + 1))² × chance_modifier`, where `higher`
//! counts more-aged same-family neighbors and `lower` counts same-aged ones
//! within a Manhattan ball. A less-aged same-family neighbor vetoes the roll.
#![forbid(unsafe_code)]

mod random;

pub use random::{RandomSource, ScriptedRandom};

use patina_blocks::{BlockRegistry, Stage};
use patina_geom::{BlockPos, ManhattanBall};
use patina_world::BlockAccess;
use serde::Deserialize;

pub const DEFAULT_RADIUS: u32 = 4;
pub const DEFAULT_TICK_CHANCE: f32 = 0.056_888_89;

/// The two independent gates: whether a random tick attempts aging at all,
/// and how far the neighborhood scan reaches.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AgingParams {
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_tick_chance")]
    pub tick_chance: f32,
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS
}
fn default_tick_chance() -> f32 {
    DEFAULT_TICK_CHANCE
}

impl Default for AgingParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            tick_chance: DEFAULT_TICK_CHANCE,
        }
    }
}

/// Same-family neighbor counts around a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neighborhood {
    /// A less-aged same-family block is in range.
    Vetoed,
    Tally { lower: u32, higher: u32 },
}

/// `(higher + 1) / (higher + lower + 1)`, always in `(0, 1]`.
#[inline]
pub fn progression_ratio(higher: u32, lower: u32) -> f32 {
    (higher as f32 + 1.0) / (higher as f32 + lower as f32 + 1.0)
}

/// `ratio² × chance_modifier`, always in `[0, chance_modifier]` for modifiers in `[0, 1]`.
#[inline]
pub fn advance_probability(higher: u32, lower: u32, chance_modifier: f32) -> f32 {
    let r = progression_ratio(higher, lower);
    r * r * chance_modifier
}

/// Aging evaluator with its neighborhood precomputed.
#[derive(Clone, Debug)]
pub struct Aging {
    params: AgingParams,
    ball: ManhattanBall,
}

impl Default for Aging {
    fn default() -> Self {
        Self::new(AgingParams::default())
    }
}

impl Aging {
    pub fn new(params: AgingParams) -> Self {
        Self {
            params,
            ball: ManhattanBall::new(params.radius),
        }
    }

    #[inline]
    pub fn params(&self) -> AgingParams {
        self.params
    }

    /// Scans the ball around `pos` (center excluded) and counts same-family neighbors.
    pub fn survey<W: BlockAccess + ?Sized>(
        &self,
        pos: BlockPos,
        current: Stage,
        reg: &BlockRegistry,
        world: &W,
    ) -> Neighborhood {
        let mut lower = 0u32;
        let mut higher = 0u32;
        for (npos, dist) in self.ball.around(pos) {
            if dist > self.params.radius {
                break;
            }
            if dist == 0 {
                continue;
            }
            let Some(block) = world.block_at(npos) else {
                continue;
            };
            let Some(stage) = reg.aging_stage(block) else {
                continue;
            };
            if !stage.same_family(current) {
                continue;
            }
            if stage.age < current.age {
                return Neighborhood::Vetoed;
            }
            if stage.age > current.age {
                higher += 1;
            } else {
                lower += 1;
            }
        }
        Neighborhood::Tally { lower, higher }
    }

    /// Decides whether the block at `pos`, currently at `current`, advances this tick.
    ///
    /// Draws exactly one value unless the neighborhood vetoes. Returns the next
    /// stage, which is `None` at a family's terminal stage regardless of the draw.
    pub fn maybe_advance<W, R>(
        &self,
        pos: BlockPos,
        current: Stage,
        reg: &BlockRegistry,
        world: &W,
        rng: &mut R,
    ) -> Option<Stage>
    where
        W: BlockAccess + ?Sized,
        R: RandomSource + ?Sized,
    {
        let family = reg.family(current.family)?;
        let (lower, higher) = match self.survey(pos, current, reg, world) {
            Neighborhood::Vetoed => return None,
            Neighborhood::Tally { lower, higher } => (lower, higher),
        };
        let p = advance_probability(higher, lower, family.chance_modifier(current));
        if rng.next_f32() < p {
            let next = family.next(current);
            if let Some(next) = next {
                log::trace!(
                    "aging {:?}: {} -> age {} (p={:.4}, lower={}, higher={})",
                    pos,
                    family.name,
                    next.age,
                    p,
                    lower,
                    higher
                );
            }
            next
        } else {
            None
        }
    }

    /// Random-tick entry point: gates on `tick_chance`, then runs `maybe_advance`.
    pub fn on_random_tick<W, R>(
        &self,
        pos: BlockPos,
        current: Stage,
        reg: &BlockRegistry,
        world: &W,
        rng: &mut R,
    ) -> Option<Stage>
    where
        W: BlockAccess + ?Sized,
        R: RandomSource + ?Sized,
    {
        if rng.next_f32() >= self.params.tick_chance {
            return None;
        }
        self.maybe_advance(pos, current, reg, world, rng)
    }
}
