use patina_blocks::config::{BlockDef, BlocksConfig, FamilyDef, StageDef, VariantDef};
use patina_blocks::registry::{BlockRegistry, RegistryError};
use patina_blocks::types::{Behavior, Block, Stage};
use proptest::prelude::*;
use std::collections::HashMap;

const DEMO_BLOCKS: &str = include_str!("../../../assets/blocks.toml");

fn plain(name: &str) -> BlockDef {
    BlockDef {
        name: name.into(),
        id: None,
        solid: Some(true),
        state_schema: None,
        behavior: None,
    }
}

fn family(name: &str, stages: &[&str], waxed: &[&str]) -> FamilyDef {
    FamilyDef {
        name: name.into(),
        chance_modifier: 1.0,
        stages: stages.iter().map(|s| StageDef::Name(s.to_string())).collect(),
        waxed: waxed.iter().map(|s| s.to_string()).collect(),
        variants: Vec::new(),
    }
}

fn variant(stages: &[&str], waxed: &[&str]) -> VariantDef {
    VariantDef {
        stages: stages.iter().map(|s| s.to_string()).collect(),
        waxed: waxed.iter().map(|s| s.to_string()).collect(),
    }
}

fn stairs(name: &str) -> BlockDef {
    let schema = HashMap::from([
        (
            "facing".to_string(),
            ["north", "south", "east", "west"].map(String::from).to_vec(),
        ),
        ("half".to_string(), vec!["bottom".into(), "top".into()]),
    ]);
    BlockDef {
        state_schema: Some(schema),
        ..plain(name)
    }
}

#[test]
fn pack_state_roundtrip_fixed() {
    // Fixed schema with 3 properties and varied cardinalities
    let schema: HashMap<String, Vec<String>> = HashMap::from([
        ("p0".into(), vec!["a".into(), "b".into()]),
        ("p1".into(), vec!["u".into()]),
        ("p2".into(), vec!["x".into(), "y".into(), "z".into()]),
    ]);
    let def = BlockDef {
        name: "t".into(),
        id: Some(0),
        solid: Some(true),
        state_schema: Some(schema),
        behavior: None,
    };
    let cfg = BlocksConfig {
        blocks: vec![def],
        families: Vec::new(),
    };
    let reg = BlockRegistry::from_config(cfg).expect("registry");
    let ty = reg.get(0).unwrap();
    assert_eq!(ty.state_schema["p2"], ["x", "y", "z"]);

    let props = HashMap::from([
        ("p0".into(), "b".into()),
        // omit p1 -> should default to first
        ("p2".into(), "z".into()),
    ]);
    let state = ty.pack_state(&props);
    assert_eq!(ty.state_prop_value(state, "p0"), Some("b"));
    assert_eq!(ty.state_prop_value(state, "p1"), Some("u"));
    assert_eq!(ty.state_prop_value(state, "p2"), Some("z"));
}

#[test]
fn demo_config_loads_with_families_and_behaviors() {
    let reg = BlockRegistry::from_toml_str(DEMO_BLOCKS).expect("demo registry");
    assert_eq!(reg.id_by_name("air"), Some(0));
    let copper = reg.family_by_name("copper").expect("copper family");
    assert_eq!(copper.len(), 4);
    assert_eq!(copper.chance_modifier(copper.stage(0)), 0.75);
    assert_eq!(copper.chance_modifier(copper.stage(1)), 1.0);

    let exposed = reg.make_block_by_name("exposed_copper", None).unwrap();
    assert_eq!(reg.aging_stage(exposed), Some(copper.stage(1)));
    let waxed = reg.make_block_by_name("waxed_exposed_copper", None).unwrap();
    assert_eq!(reg.aging_stage(waxed), None);
    assert!(reg.membership(waxed.id).unwrap().waxed);

    // Family members default to weathering without an explicit behavior
    assert_eq!(reg.get(exposed.id).unwrap().behavior, Behavior::Weathering);
    let wheat = reg.get(reg.id_by_name("wheat").unwrap()).unwrap();
    let farmland = reg.id_by_name("farmland").unwrap();
    assert_eq!(
        wheat.behavior,
        Behavior::Crop {
            max_age: 7,
            growth_chance: 0.25,
            soil: vec![farmland]
        }
    );
    let cauldron = reg.get(reg.id_by_name("cauldron").unwrap()).unwrap();
    assert_eq!(cauldron.behavior, Behavior::Cauldron { max_level: 3 });
}

#[test]
fn cut_copper_and_stairs_share_the_copper_progression() {
    let reg = BlockRegistry::from_toml_str(DEMO_BLOCKS).unwrap();
    let copper = reg.family_by_name("copper").unwrap();
    assert_eq!(copper.variants(), 3);
    assert!(reg.family_by_name("cut_copper").is_none());

    let stage_of = |name: &str| {
        reg.aging_stage(reg.make_block_by_name(name, None).unwrap())
            .unwrap()
    };
    let a = stage_of("exposed_copper");
    let b = stage_of("exposed_cut_copper");
    let c = stage_of("exposed_copper_stairs");
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert!(stage_of("cut_copper") < a);

    let variant_of = |name: &str| reg.membership(reg.id_by_name(name).unwrap()).unwrap().variant;
    assert_eq!(variant_of("exposed_copper"), 0);
    assert_eq!(variant_of("exposed_cut_copper"), 1);
    assert_eq!(variant_of("waxed_exposed_copper_stairs"), 2);
}

#[test]
fn block_for_stage_inverts_aging_stage() {
    let reg = BlockRegistry::from_toml_str(DEMO_BLOCKS).unwrap();
    for fam in &reg.families {
        for variant in 0..fam.variants() as u16 {
            for age in 0..fam.len() as u8 {
                let stage = Stage::new(fam.id, age);
                let block = reg.block_for_stage(stage, variant).unwrap();
                assert_eq!(reg.aging_stage(block), Some(stage));
                assert_eq!(reg.membership(block.id).unwrap().variant, variant);
            }
        }
    }
}

#[test]
fn next_block_stays_in_the_variant_chain() {
    let reg = BlockRegistry::from_toml_str(DEMO_BLOCKS).unwrap();
    let name = |b: Block| reg.debug_name(b.id).to_string();
    let cut = reg.make_block_by_name("cut_copper", None).unwrap();
    let next = reg.next_block(cut).unwrap();
    assert_eq!(name(next), "exposed_cut_copper");
    assert_eq!(name(reg.scraped_block(next).unwrap()), "cut_copper");
    // Cut copper has no waxed twins
    assert_eq!(reg.waxed_block(cut), None);
    let last = reg.make_block_by_name("oxidized_cut_copper", None).unwrap();
    assert_eq!(reg.next_block(last), None);
}

#[test]
fn stage_changes_keep_shared_state_properties() {
    let reg = BlockRegistry::from_toml_str(DEMO_BLOCKS).unwrap();
    let props = HashMap::from([
        ("facing".to_string(), "west".to_string()),
        ("half".to_string(), "top".to_string()),
    ]);
    let stairs = reg.make_block_by_name("copper_stairs", Some(&props)).unwrap();
    let check = |b: Block, expect: &str| {
        let ty = reg.get(b.id).unwrap();
        assert_eq!(ty.name, expect);
        assert_eq!(ty.state_prop_value(b.state, "facing"), Some("west"));
        assert_eq!(ty.state_prop_value(b.state, "half"), Some("top"));
    };

    let next = reg.next_block(stairs).unwrap();
    check(next, "exposed_copper_stairs");
    let waxed = reg.waxed_block(next).unwrap();
    check(waxed, "waxed_exposed_copper_stairs");
    let unwaxed = reg.scraped_block(waxed).unwrap();
    check(unwaxed, "exposed_copper_stairs");
    check(reg.scraped_block(unwaxed).unwrap(), "copper_stairs");
}

#[test]
fn carry_state_drops_undeclared_properties() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), stairs("s"), plain("cube")],
        families: Vec::new(),
    };
    let reg = BlockRegistry::from_config(cfg).unwrap();
    let s = reg.id_by_name("s").unwrap();
    let cube = reg.id_by_name("cube").unwrap();
    let props = HashMap::from([("facing".to_string(), "east".to_string())]);
    let east = reg.make_block_by_name("s", Some(&props)).unwrap();

    assert_eq!(reg.carry_state(east, cube), Block::new(cube, 0));
    // Missing source properties take the first declared value
    let back = reg.carry_state(Block::new(cube, 0), s);
    let ty = reg.get(s).unwrap();
    assert_eq!(ty.state_prop_value(back.state, "facing"), Some("north"));
    assert_eq!(reg.carry_state(east, s), east);
}

#[test]
fn restage_rejects_foreign_family() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("a0"), plain("a1"), plain("b0")],
        families: vec![family("a", &["a0", "a1"], &[]), family("b", &["b0"], &[])],
    };
    let reg = BlockRegistry::from_config(cfg).unwrap();
    let a0 = reg.make_block_by_name("a0", None).unwrap();
    let b = reg.family_by_name("b").unwrap().stage(0);
    assert_eq!(reg.restage(a0, b, false), None);
    let a1 = reg.family_by_name("a").unwrap().stage(1);
    assert_eq!(reg.restage(a0, a1, false), reg.make_block_by_name("a1", None));
    assert_eq!(reg.restage(a0, a1, true), None);
}

#[test]
fn family_with_unknown_block_is_rejected() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("a")],
        families: vec![family("f", &["a", "missing"], &[])],
    };
    let err = BlockRegistry::from_config(cfg).unwrap_err();
    assert_eq!(
        err,
        RegistryError::UnknownBlock {
            family: "f".into(),
            block: "missing".into()
        }
    );
}

#[test]
fn block_in_two_families_is_rejected() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("a"), plain("b")],
        families: vec![family("f", &["a", "b"], &[]), family("g", &["b"], &[])],
    };
    assert!(matches!(
        BlockRegistry::from_config(cfg),
        Err(RegistryError::DuplicateMember { .. })
    ));
}

#[test]
fn waxed_list_must_match_stage_count() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("a"), plain("b"), plain("wa")],
        families: vec![family("f", &["a", "b"], &["wa"])],
    };
    assert_eq!(
        BlockRegistry::from_config(cfg).unwrap_err(),
        RegistryError::WaxedLengthMismatch {
            family: "f".into(),
            stages: 2,
            waxed: 1
        }
    );
}

#[test]
fn variant_chain_must_match_stage_count() {
    let mut f = family("f", &["a", "b"], &[]);
    f.variants.push(variant(&["c"], &[]));
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("a"), plain("b"), plain("c")],
        families: vec![f],
    };
    assert_eq!(
        BlockRegistry::from_config(cfg).unwrap_err(),
        RegistryError::VariantLengthMismatch {
            family: "f".into(),
            stages: 2,
            variant: 1,
            found: 1
        }
    );
}

#[test]
fn variant_block_already_in_a_chain_is_rejected() {
    let mut f = family("f", &["a", "b"], &[]);
    f.variants.push(variant(&["c", "a"], &[]));
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("a"), plain("b"), plain("c")],
        families: vec![f],
    };
    assert!(matches!(
        BlockRegistry::from_config(cfg),
        Err(RegistryError::DuplicateMember { .. })
    ));
}

#[test]
fn colliding_explicit_ids_are_rejected() {
    let mut a = plain("a");
    a.id = Some(3);
    let mut b = plain("b");
    b.id = Some(3);
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), a, b],
        families: Vec::new(),
    };
    assert_eq!(
        BlockRegistry::from_config(cfg).unwrap_err(),
        RegistryError::DuplicateId {
            id: 3,
            first: "a".into(),
            second: "b".into()
        }
    );
}

#[test]
fn explicit_id_colliding_with_assigned_id_is_rejected() {
    let mut late = plain("late");
    late.id = Some(1);
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), plain("stone"), late],
        families: Vec::new(),
    };
    assert!(matches!(
        BlockRegistry::from_config(cfg),
        Err(RegistryError::DuplicateId { id: 1, .. })
    ));
}

#[test]
fn id_gaps_become_unnamed_placeholders() {
    let mut far = plain("far");
    far.id = Some(4);
    let cfg = BlocksConfig {
        blocks: vec![plain("air"), far, plain("next")],
        families: Vec::new(),
    };
    let reg = BlockRegistry::from_config(cfg).unwrap();
    assert_eq!(reg.id_by_name("next"), Some(5));
    for id in 1..4 {
        let ty = reg.get(id).unwrap();
        assert_eq!(ty.id, id);
        assert!(ty.name.is_empty());
    }
    assert_eq!(reg.by_name.len(), 3);
}

#[test]
fn empty_family_is_rejected() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air")],
        families: vec![family("f", &[], &[])],
    };
    assert_eq!(
        BlockRegistry::from_config(cfg).unwrap_err(),
        RegistryError::EmptyFamily("f".into())
    );
}

#[test]
fn crop_max_age_is_clamped_to_schema() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "air"
        solid = false

        [[blocks]]
        name = "sprout"
        solid = false
        state_schema = { age = ["0", "1", "2"] }
        behavior = { kind = "crop", max_age = 7 }
    "#,
    )
    .unwrap();
    let ty = reg.get(reg.id_by_name("sprout").unwrap()).unwrap();
    assert!(matches!(ty.behavior, Behavior::Crop { max_age: 2, .. }));
}

#[test]
fn unknown_names_resolve_to_none() {
    let reg = BlockRegistry::from_toml_str(DEMO_BLOCKS).unwrap();
    assert_eq!(reg.make_block_by_name("nope", None), None);
    assert_eq!(reg.aging_stage(Block::AIR), None);
    assert!(!reg.is_solid(Block::new(9999, 0)));
}

proptest! {
    // with_prop_index sets exactly one property and leaves the others untouched
    #[test]
    fn with_prop_index_is_local(a in 0usize..8, b in 0usize..3, c in 0usize..5) {
        let reg = BlockRegistry::from_toml_str(r#"
            [[blocks]]
            name = "multi"
            state_schema = { age = ["0","1","2","3","4","5","6","7"], level = ["0","1","2"], tint = ["a","b","c","d","e"] }
        "#).unwrap();
        let ty = reg.get(0).unwrap();
        let mut s = 0;
        s = ty.with_prop_index(s, "age", a);
        s = ty.with_prop_index(s, "level", b);
        s = ty.with_prop_index(s, "tint", c);
        prop_assert_eq!(ty.state_prop_index(s, "age"), Some(a));
        prop_assert_eq!(ty.state_prop_index(s, "level"), Some(b));
        prop_assert_eq!(ty.state_prop_index(s, "tint"), Some(c));
        let s2 = ty.with_prop_index(s, "level", (b + 1) % 3);
        prop_assert_eq!(ty.state_prop_index(s2, "age"), Some(a));
        prop_assert_eq!(ty.state_prop_index(s2, "tint"), Some(c));
        // Out-of-range indices are ignored
        prop_assert_eq!(ty.with_prop_index(s, "level", 3), s);
        prop_assert_eq!(ty.with_prop_index(s, "missing", 0), s);
    }
}
