use super::types::{BlockId, FamilyId, Stage};

/// One block of a variant chain at a given age.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageEntry {
    pub block: BlockId,
    pub waxed: Option<BlockId>,
}

/// Block variants sharing one aging progression.
///
/// Every chain lists one block per age (plain copper, cut copper, stairs ...),
/// so all members compare on the same age ordinal. Advancing stays inside the
/// block's own chain.
#[derive(Clone, Debug)]
pub struct MaterialFamily {
    pub id: FamilyId,
    pub name: String,
    // Per-age chance modifier, already clamped to [0, 1]
    pub modifiers: Vec<f32>,
    pub chains: Vec<Vec<StageEntry>>,
}

impl MaterialFamily {
    /// Number of ages in the progression.
    #[inline]
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    #[inline]
    pub fn variants(&self) -> usize {
        self.chains.len()
    }

    #[inline]
    pub fn stage(&self, age: u8) -> Stage {
        Stage::new(self.id, age)
    }

    fn contains(&self, stage: Stage) -> bool {
        stage.family == self.id && (stage.age as usize) < self.len()
    }

    pub fn entry(&self, stage: Stage, variant: u16) -> Option<&StageEntry> {
        if !self.contains(stage) {
            return None;
        }
        self.chains.get(variant as usize)?.get(stage.age as usize)
    }

    /// Following stage, or `None` at the terminal stage.
    pub fn next(&self, stage: Stage) -> Option<Stage> {
        if !self.contains(stage) {
            return None;
        }
        let next = self.stage(stage.age.checked_add(1)?);
        self.contains(next).then_some(next)
    }

    /// Preceding stage, or `None` at the first stage.
    pub fn previous(&self, stage: Stage) -> Option<Stage> {
        if !self.contains(stage) {
            return None;
        }
        Some(self.stage(stage.age.checked_sub(1)?))
    }

    pub fn chance_modifier(&self, stage: Stage) -> f32 {
        if !self.contains(stage) {
            return 0.0;
        }
        self.modifiers[stage.age as usize]
    }

    pub fn block_for(&self, stage: Stage, variant: u16) -> Option<BlockId> {
        self.entry(stage, variant).map(|e| e.block)
    }

    pub fn waxed_block_for(&self, stage: Stage, variant: u16) -> Option<BlockId> {
        self.entry(stage, variant).and_then(|e| e.waxed)
    }

    pub fn terminal(&self) -> Option<Stage> {
        let last = self.len().checked_sub(1)?;
        Some(self.stage(last as u8))
    }
}

/// How a block relates to the family it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FamilyMembership {
    pub stage: Stage,
    /// Index of the block's chain within the family.
    pub variant: u16,
    // Waxed twins carry the stage but never age
    pub waxed: bool,
}
