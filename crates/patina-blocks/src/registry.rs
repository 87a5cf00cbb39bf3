use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{
    BehaviorConfig, BehaviorDetailed, BlockDef, BlocksConfig, FamilyDef, StageDef, VariantDef,
};
use super::family::{FamilyMembership, MaterialFamily, StageEntry};
use super::types::{Behavior, Block, BlockId, BlockState, FamilyId, Stage};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegistryError {
    #[error("family `{family}` references unknown block `{block}`")]
    UnknownBlock { family: String, block: String },
    #[error("block `{block}` is listed by both `{first}` and `{second}`")]
    DuplicateMember {
        block: String,
        first: String,
        second: String,
    },
    #[error("family `{family}` has {stages} stages but {waxed} waxed blocks")]
    WaxedLengthMismatch {
        family: String,
        stages: usize,
        waxed: usize,
    },
    #[error("family `{family}` has {stages} stages but variant {variant} lists {found}")]
    VariantLengthMismatch {
        family: String,
        stages: usize,
        variant: usize,
        found: usize,
    },
    #[error("block id {id} is used by both `{first}` and `{second}`")]
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    #[error("family `{0}` has no stages")]
    EmptyFamily(String),
    #[error("family `{family}` has {stages} stages; at most 256 are supported")]
    TooManyStages { family: String, stages: usize },
}

/// Immutable table of block types and aging families, built once and shared by reference.
#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub families: Vec<MaterialFamily>,
    pub family_by_name: HashMap<String, FamilyId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
            families: Vec::new(),
            family_by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Ok(Self::from_config(cfg)?)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        let mut pending: Vec<(BlockId, Option<BehaviorConfig>)> = Vec::with_capacity(cfg.blocks.len());
        for def in cfg.blocks.into_iter() {
            let BlockDef {
                name,
                id,
                solid,
                state_schema,
                behavior,
            } = def;
            let id = id.unwrap_or(reg.blocks.len() as u16);
            let state_schema = state_schema.unwrap_or_default();
            let (state_fields, prop_index) = compute_state_layout(&state_schema);
            let ty = BlockType {
                id,
                name,
                solid: solid.unwrap_or(true),
                behavior: Behavior::None,
                family: None,
                state_schema,
                state_fields,
                prop_index,
            };
            while reg.blocks.len() <= id as usize {
                let gap = reg.blocks.len() as BlockId;
                reg.blocks.push(BlockType::placeholder(gap));
            }
            let slot = &mut reg.blocks[id as usize];
            if !slot.name.is_empty() {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: slot.name.clone(),
                    second: ty.name,
                });
            }
            *slot = ty;
            pending.push((id, behavior));
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();

        for def in cfg.families.into_iter() {
            reg.add_family(def)?;
        }

        for (id, behavior) in pending {
            let compiled = compile_behavior(&reg, id, behavior);
            reg.blocks[id as usize].behavior = compiled;
        }

        log::info!(
            "block registry: {} block types, {} aging families",
            reg.by_name.len(),
            reg.families.len()
        );
        Ok(reg)
    }

    fn add_family(&mut self, def: FamilyDef) -> Result<(), RegistryError> {
        let FamilyDef {
            name,
            chance_modifier,
            stages,
            waxed,
            variants,
        } = def;
        if stages.is_empty() {
            return Err(RegistryError::EmptyFamily(name));
        }
        if stages.len() > 256 {
            return Err(RegistryError::TooManyStages {
                family: name,
                stages: stages.len(),
            });
        }
        let modifiers: Vec<f32> = stages
            .iter()
            .map(|st| match st {
                StageDef::Detailed {
                    chance_modifier: Some(m),
                    ..
                } => *m,
                _ => chance_modifier,
            })
            .map(|m| m.clamp(0.0, 1.0))
            .collect();

        // The primary chain comes from `stages`/`waxed`, then each variant in order.
        let primary = VariantDef {
            stages: stages.iter().map(|st| st.block_name().to_string()).collect(),
            waxed,
        };
        let fid = FamilyId(self.families.len() as u16);
        let mut chains = Vec::with_capacity(1 + variants.len());
        for (vi, chain) in std::iter::once(&primary).chain(variants.iter()).enumerate() {
            if chain.stages.len() != stages.len() {
                return Err(RegistryError::VariantLengthMismatch {
                    family: name,
                    stages: stages.len(),
                    variant: vi,
                    found: chain.stages.len(),
                });
            }
            if !chain.waxed.is_empty() && chain.waxed.len() != chain.stages.len() {
                return Err(RegistryError::WaxedLengthMismatch {
                    family: name,
                    stages: chain.stages.len(),
                    waxed: chain.waxed.len(),
                });
            }
            let mut entries = Vec::with_capacity(chain.stages.len());
            for (age, block) in chain.stages.iter().enumerate() {
                let block = self.resolve_member(&name, block)?;
                let waxed = match chain.waxed.get(age) {
                    Some(w) => Some(self.resolve_member(&name, w)?),
                    None => None,
                };
                entries.push(StageEntry { block, waxed });
            }
            for (age, e) in entries.iter().enumerate() {
                let stage = Stage::new(fid, age as u8);
                let variant = vi as u16;
                self.join_family(e.block, stage, variant, false, &name)?;
                if let Some(w) = e.waxed {
                    self.join_family(w, stage, variant, true, &name)?;
                }
            }
            chains.push(entries);
        }
        log::debug!(
            "family `{}`: {} stages, {} variant chains",
            name,
            modifiers.len(),
            chains.len()
        );
        self.family_by_name.insert(name.clone(), fid);
        self.families.push(MaterialFamily {
            id: fid,
            name,
            modifiers,
            chains,
        });
        Ok(())
    }

    fn resolve_member(&self, family: &str, block: &str) -> Result<BlockId, RegistryError> {
        self.id_by_name(block)
            .ok_or_else(|| RegistryError::UnknownBlock {
                family: family.to_string(),
                block: block.to_string(),
            })
    }

    fn join_family(
        &mut self,
        id: BlockId,
        stage: Stage,
        variant: u16,
        waxed: bool,
        family: &str,
    ) -> Result<(), RegistryError> {
        if let Some(prev) = self.blocks[id as usize].family {
            // Earlier families are already pushed; the current one is not yet.
            let first = self
                .families
                .get(prev.stage.family.0 as usize)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| family.to_string());
            return Err(RegistryError::DuplicateMember {
                block: self.blocks[id as usize].name.clone(),
                first,
                second: family.to_string(),
            });
        }
        self.blocks[id as usize].family = Some(FamilyMembership {
            stage,
            variant,
            waxed,
        });
        Ok(())
    }

    #[inline]
    pub fn family(&self, id: FamilyId) -> Option<&MaterialFamily> {
        self.families.get(id.0 as usize)
    }

    pub fn family_by_name(&self, name: &str) -> Option<&MaterialFamily> {
        self.family_by_name.get(name).and_then(|&id| self.family(id))
    }

    #[inline]
    pub fn membership(&self, id: BlockId) -> Option<FamilyMembership> {
        self.get(id).and_then(|t| t.family)
    }

    /// Stage of a block that takes part in aging. Waxed twins return `None`.
    #[inline]
    pub fn aging_stage(&self, block: Block) -> Option<Stage> {
        match self.membership(block.id)? {
            FamilyMembership {
                waxed: false,
                stage,
                ..
            } => Some(stage),
            _ => None,
        }
    }

    /// Default-state block of `variant`'s chain at `stage`.
    pub fn block_for_stage(&self, stage: Stage, variant: u16) -> Option<Block> {
        let id = self.family(stage.family)?.block_for(stage, variant)?;
        Some(Block::new(id, 0))
    }

    pub fn waxed_block_for_stage(&self, stage: Stage, variant: u16) -> Option<Block> {
        let id = self.family(stage.family)?.waxed_block_for(stage, variant)?;
        Some(Block::new(id, 0))
    }

    /// `block` re-expressed as type `to`: properties both types declare keep
    /// their value, the rest take the first declared value.
    pub fn carry_state(&self, block: Block, to: BlockId) -> Block {
        let (Some(src), Some(dst)) = (self.get(block.id), self.get(to)) else {
            return Block::new(to, 0);
        };
        let mut state: BlockState = 0;
        for f in &dst.state_fields {
            let Some(value) = src.state_prop_value(block.state, &f.name) else {
                continue;
            };
            if let Some(idx) = f.values.iter().position(|v| v == value) {
                state = dst.with_prop_index(state, &f.name, idx);
            }
        }
        Block::new(to, state)
    }

    /// `block` moved to `stage` within its own variant chain, keeping its state.
    pub fn restage(&self, block: Block, stage: Stage, waxed: bool) -> Option<Block> {
        let m = self.membership(block.id)?;
        if m.stage.family != stage.family {
            return None;
        }
        let family = self.family(stage.family)?;
        let id = if waxed {
            family.waxed_block_for(stage, m.variant)?
        } else {
            family.block_for(stage, m.variant)?
        };
        Some(self.carry_state(block, id))
    }

    /// Next stage of an aging block; `None` when terminal or waxed.
    pub fn next_block(&self, block: Block) -> Option<Block> {
        let stage = self.aging_stage(block)?;
        let next = self.family(stage.family)?.next(stage)?;
        self.restage(block, next, false)
    }

    /// Scraping removes wax first, then walks back one stage.
    pub fn scraped_block(&self, block: Block) -> Option<Block> {
        let m = self.membership(block.id)?;
        if m.waxed {
            return self.restage(block, m.stage, false);
        }
        let prev = self.family(m.stage.family)?.previous(m.stage)?;
        self.restage(block, prev, false)
    }

    /// Waxed twin; `None` if already waxed or the chain has no twins.
    pub fn waxed_block(&self, block: Block) -> Option<Block> {
        let m = self.membership(block.id)?;
        if m.waxed {
            return None;
        }
        self.restage(block, m.stage, true)
    }

    pub fn make_block_by_name(
        &self,
        name: &str,
        props: Option<&HashMap<String, String>>,
    ) -> Option<Block> {
        let id = self.id_by_name(name)?;
        let state = if let Some(p) = props {
            self.get(id).map(|ty| ty.pack_state(p)).unwrap_or(0)
        } else {
            0
        };
        Some(Block { id, state })
    }

    pub fn is_solid(&self, block: Block) -> bool {
        self.get(block.id)
            .map(|t| t.is_solid(block.state))
            .unwrap_or(false)
    }

    pub fn debug_name(&self, id: BlockId) -> &str {
        self.get(id).map(|t| t.name.as_str()).unwrap_or("?")
    }
}

fn compile_behavior(reg: &BlockRegistry, id: BlockId, cfg: Option<BehaviorConfig>) -> Behavior {
    let ty = &reg.blocks[id as usize];
    let in_family = ty.family.is_some();
    let detailed = match cfg {
        None if in_family => return Behavior::Weathering,
        None => return Behavior::None,
        Some(BehaviorConfig::Simple(kind)) => match kind.as_str() {
            "none" => return Behavior::None,
            "weathering" => BehaviorDetailed::Weathering,
            "crop" => BehaviorDetailed::Crop {
                max_age: 7,
                growth_chance: 0.25,
                soil: Vec::new(),
            },
            "plant" => BehaviorDetailed::Plant { soil: Vec::new() },
            "signal_source" => BehaviorDetailed::SignalSource { power: 15 },
            "cauldron" => BehaviorDetailed::Cauldron { max_level: 3 },
            other => {
                log::warn!("block `{}`: unknown behavior `{}`", ty.name, other);
                return Behavior::None;
            }
        },
        Some(BehaviorConfig::Detailed(d)) => d,
    };
    let resolve_soil = |names: Vec<String>| -> Vec<BlockId> {
        names
            .into_iter()
            .filter_map(|n| {
                let found = reg.id_by_name(&n);
                if found.is_none() {
                    log::warn!("block `{}`: unknown soil block `{}`", ty.name, n);
                }
                found
            })
            .collect()
    };
    match detailed {
        BehaviorDetailed::Weathering if in_family => Behavior::Weathering,
        BehaviorDetailed::Weathering => {
            log::warn!(
                "block `{}` declares weathering but belongs to no family",
                ty.name
            );
            Behavior::None
        }
        BehaviorDetailed::Crop {
            max_age,
            growth_chance,
            soil,
        } => Behavior::Crop {
            max_age: clamp_to_prop(ty, "age", max_age),
            growth_chance: growth_chance.clamp(0.0, 1.0),
            soil: resolve_soil(soil),
        },
        BehaviorDetailed::Plant { soil } => Behavior::Plant {
            soil: resolve_soil(soil),
        },
        BehaviorDetailed::SignalSource { power } => Behavior::SignalSource {
            power: power.min(15),
        },
        BehaviorDetailed::Cauldron { max_level } => Behavior::Cauldron {
            max_level: clamp_to_prop(ty, "level", max_level),
        },
    }
}

// Highest index a state property can hold, warning when config asks for more.
fn clamp_to_prop(ty: &BlockType, prop: &str, want: u8) -> u8 {
    let avail = ty.prop_len(prop).saturating_sub(1).min(u8::MAX as usize) as u8;
    if want > avail {
        log::warn!(
            "block `{}`: `{}` has {} values, clamping {} to {}",
            ty.name,
            prop,
            ty.prop_len(prop),
            want,
            avail
        );
        return avail;
    }
    want
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub behavior: Behavior,
    pub family: Option<FamilyMembership>,
    pub state_schema: HashMap<String, Vec<String>>, // property name -> allowed values
    // Precomputed, sorted layout for fast state packing/unpacking
    pub state_fields: Vec<StateField>,
    pub prop_index: HashMap<String, usize>,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            behavior: Behavior::None,
            family: None,
            state_schema: HashMap::new(),
            state_fields: Vec::new(),
            prop_index: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StateField {
    pub name: String,
    pub values: Vec<String>,
    pub bits: u32,
    pub offset: u32,
}

impl StateField {
    #[inline]
    fn mask(&self) -> u32 {
        if self.bits >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits) - 1
        }
    }
}

fn compute_state_layout(
    schema: &HashMap<String, Vec<String>>,
) -> (Vec<StateField>, HashMap<String, usize>) {
    let mut keys: Vec<&String> = schema.keys().collect();
    keys.sort();
    let mut offset: u32 = 0;
    let mut fields: Vec<StateField> = Vec::with_capacity(keys.len());
    for k in keys.into_iter() {
        let vals = schema.get(k).cloned().unwrap_or_default();
        let vlen = vals.len() as u32;
        let bits: u32 = if vlen <= 1 {
            0
        } else {
            32 - (vlen - 1).leading_zeros()
        };
        fields.push(StateField {
            name: k.to_string(),
            values: vals,
            bits,
            offset,
        });
        offset = offset.saturating_add(bits);
    }
    let mut index: HashMap<String, usize> = HashMap::with_capacity(fields.len());
    for (i, f) in fields.iter().enumerate() {
        index.insert(f.name.clone(), i);
    }
    (fields, index)
}

impl BlockType {
    pub fn is_solid(&self, _state: BlockState) -> bool {
        self.solid
    }

    pub fn debug_name(&self) -> &str {
        &self.name
    }

    /// Number of allowed values for `prop`, 0 when the property is not declared.
    pub fn prop_len(&self, prop: &str) -> usize {
        self.prop_index
            .get(prop)
            .map(|&i| self.state_fields[i].values.len())
            .unwrap_or(0)
    }

    /// Index of the current value of `prop` within its declared values.
    pub fn state_prop_index(&self, state: BlockState, prop: &str) -> Option<usize> {
        let &i = self.prop_index.get(prop)?;
        let f = &self.state_fields[i];
        if f.bits == 0 {
            return if f.values.is_empty() { None } else { Some(0) };
        }
        let idx = (((state as u32) >> f.offset) & f.mask()) as usize;
        if idx < f.values.len() { Some(idx) } else { None }
    }

    pub fn state_prop_value<'a>(&'a self, state: BlockState, prop: &str) -> Option<&'a str> {
        let idx = self.state_prop_index(state, prop)?;
        let &i = self.prop_index.get(prop)?;
        self.state_fields[i].values.get(idx).map(|s| s.as_str())
    }

    /// Replace one property by value index; unknown props or out-of-range indices leave `state` unchanged.
    pub fn with_prop_index(&self, state: BlockState, prop: &str, idx: usize) -> BlockState {
        let Some(&i) = self.prop_index.get(prop) else {
            return state;
        };
        let f = &self.state_fields[i];
        if f.bits == 0 || idx >= f.values.len() {
            return state;
        }
        let cleared = (state as u32) & !(f.mask() << f.offset);
        (cleared | ((idx as u32) << f.offset)) as BlockState
    }

    pub fn pack_state(&self, props: &HashMap<String, String>) -> BlockState {
        if self.state_fields.is_empty() {
            return 0;
        }
        let mut acc: u32 = 0;
        for f in &self.state_fields {
            if f.bits == 0 {
                continue;
            }
            let sel_idx: u32 = match props.get(&f.name) {
                Some(val) => f.values.iter().position(|s| s == val).unwrap_or(0) as u32,
                None => 0,
            };
            acc |= (sel_idx & f.mask()) << f.offset;
        }
        acc as BlockState
    }
}
