// tests/schema/inference_test.rs
use cubist::model::{member_depth, Level, LevelNameSource, Member};
use cubist::schema::LevelInferenceEngine;

fn legacy_member(unique_name: &str, caption: &str) -> Member {
    Member::new("[D Clues]", "[D Clues].[Unidad médica]", unique_name, caption)
}

#[test]
fn test_depth_of_unique_names() {
    assert_eq!(member_depth("A"), 0);
    assert_eq!(member_depth("A.&[1]"), 1);
    assert_eq!(member_depth("A.&[1].&[2]"), 2);
}

#[test]
fn test_inferred_levels_count_non_root_levels() {
    let members = vec![
        legacy_member("A", "All"),
        legacy_member("A.&[1]", "Aguascalientes"),
        legacy_member("A.&[1].&[2]", "HG Aguascalientes"),
    ];
    let refs: Vec<&Member> = members.iter().collect();

    let levels = LevelInferenceEngine::new(50).infer(&refs, "[D Clues].[Unidad médica]");
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].depth, 1);
    assert_eq!(levels[1].depth, 2);
    assert!(!levels[0].explicit());
    assert!(!levels[1].explicit());
}

#[test]
fn test_inferred_first_level_name_recovered_from_path() {
    // The segment before the first separator names the first level when it
    // is not the hierarchy repeating itself.
    let members = vec![
        legacy_member("[D Clues].[Unidad médica].[Entidad].&[9]", "Aguascalientes"),
        legacy_member(
            "[D Clues].[Unidad médica].[Entidad].&[9].&[12]",
            "HG Aguascalientes",
        ),
    ];
    let refs: Vec<&Member> = members.iter().collect();

    let levels = LevelInferenceEngine::new(50).infer(&refs, "[D Clues].[Unidad médica]");
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].name, "Entidad");
    assert_eq!(levels[0].source, LevelNameSource::Recovered);
    assert_eq!(levels[1].name, "Level 2");
    assert_eq!(levels[1].source, LevelNameSource::Synthesized);
}

#[test]
fn test_inferred_level_name_not_recovered_when_it_repeats_hierarchy() {
    let members = vec![legacy_member(
        "[D Clues].[Unidad médica].&[9]",
        "Aguascalientes",
    )];
    let refs: Vec<&Member> = members.iter().collect();

    let levels = LevelInferenceEngine::new(50).infer(&refs, "[D Clues].[Unidad médica]");
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0], Level::synthesized(1));
}

#[test]
fn test_explicit_schema_levels_in_appearance_order() {
    let mk = |unique: &str, caption: &str, level: &str| {
        Member::new("[Geo]", "[Geo].[Zona]", unique, caption).with_level_name(level)
    };
    let members = vec![
        mk("[Geo].[Zona].[All]", "All", "(All)"),
        mk("[Geo].[Zona].&[1]", "Norte", "Entidad"),
        mk("[Geo].[Zona].&[1].&[2]", "Clinica 2", "Unidad"),
        mk("[Geo].[Zona].&[3]", "Sur", "Entidad"),
    ];
    let refs: Vec<&Member> = members.iter().collect();

    let levels = LevelInferenceEngine::new(50).infer(&refs, "[Geo].[Zona]");
    assert_eq!(
        levels,
        vec![Level::schema("Entidad", 1), Level::schema("Unidad", 2)]
    );
    assert!(levels.iter().all(|l| l.explicit()));
}

#[test]
fn test_empty_member_set_yields_empty_levels() {
    let levels = LevelInferenceEngine::new(50).infer(&[], "[Geo].[Zona]");
    assert!(levels.is_empty());
}

#[test]
fn test_sampling_still_finds_max_depth() {
    // Many shallow members plus a handful of deep ones; the longest-name
    // sample must still surface the full depth.
    let mut members: Vec<Member> = (0..200)
        .map(|i| legacy_member(&format!("[H].[X].&[{i}]"), &format!("m{i}")))
        .collect();
    members.push(legacy_member("[H].[X].&[1].&[2].&[3]", "deep"));
    let refs: Vec<&Member> = members.iter().collect();

    let levels = LevelInferenceEngine::new(50).infer(&refs, "[H].[X]");
    assert_eq!(levels.len(), 3);
}
