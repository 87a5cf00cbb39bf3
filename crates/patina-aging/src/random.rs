use rand::Rng;

/// Uniform draws consumed by tick reactions.
pub trait RandomSource {
    /// Uniform in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform in `[0, n)`; returns 0 when `n == 0`.
    fn next_below(&mut self, n: u32) -> u32;
}

impl<R: rand::RngCore> RandomSource for R {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.r#gen::<f32>()
    }

    #[inline]
    fn next_below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.gen_range(0..n)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// `next_below` maps the next draw onto `[0, n)`. Useful for replaying a
/// decision with known rolls.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    draws: Vec<f32>,
    at: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl Into<Vec<f32>>) -> Self {
        Self {
            draws: draws.into(),
            at: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.at
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let v = self.draws[self.at % self.draws.len()];
        self.at += 1;
        v.clamp(0.0, f32::from_bits(0x3f7f_ffff))
    }

    fn next_below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        ((self.next_f32() * n as f32) as u32).min(n - 1)
    }
}
