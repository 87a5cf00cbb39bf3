use patina_blocks::BlockId;

use super::on_soil;
use crate::{BlockBehavior, BlockCtx, PlacementReaction};

pub struct PlantBlock {
    soil: Vec<BlockId>,
}

impl PlantBlock {
    pub fn new(soil: Vec<BlockId>) -> Self {
        Self { soil }
    }
}

impl BlockBehavior for PlantBlock {
    fn kind(&self) -> &'static str {
        "plant"
    }
    fn placement(&self) -> Option<&dyn PlacementReaction> {
        Some(self)
    }
}

impl PlacementReaction for PlantBlock {
    fn can_place_at(&self, ctx: &BlockCtx<'_>) -> bool {
        on_soil(ctx, &self.soil)
    }
}
