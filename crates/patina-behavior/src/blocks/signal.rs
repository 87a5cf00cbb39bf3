use patina_geom::Face;

use crate::{BlockBehavior, BlockCtx, SignalSource};

/// Emits a constant signal out of every face.
pub struct SignalSourceBlock {
    power: u8,
}

impl SignalSourceBlock {
    pub fn new(power: u8) -> Self {
        Self {
            power: power.min(15),
        }
    }
}

impl BlockBehavior for SignalSourceBlock {
    fn kind(&self) -> &'static str {
        "signal_source"
    }
    fn signal_source(&self) -> Option<&dyn SignalSource> {
        Some(self)
    }
}

impl SignalSource for SignalSourceBlock {
    fn signal(&self, _ctx: &BlockCtx<'_>, _face: Face) -> u8 {
        self.power
    }
}
