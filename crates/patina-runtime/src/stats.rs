use hashbrown::HashMap;

use patina_blocks::{BlockId, BlockRegistry, FamilyId};
use patina_world::World;

/// Count of aging blocks per stage of `family`, indexed by age. Waxed twins are not counted.
pub fn stage_histogram(world: &World, reg: &BlockRegistry, family: FamilyId) -> Vec<usize> {
    let len = reg.family(family).map(|f| f.len()).unwrap_or(0);
    let mut out = vec![0usize; len];
    for (_, b) in world.iter_blocks() {
        if let Some(stage) = reg.aging_stage(b) {
            if stage.family == family {
                if let Some(slot) = out.get_mut(stage.age as usize) {
                    *slot += 1;
                }
            }
        }
    }
    out
}

/// Non-air blocks per id.
pub fn block_counts(world: &World) -> HashMap<BlockId, usize> {
    let mut out = HashMap::new();
    for (_, b) in world.iter_blocks() {
        *out.entry(b.id).or_insert(0) += 1;
    }
    out
}
