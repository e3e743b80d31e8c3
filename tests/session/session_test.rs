// tests/session/session_test.rs
use cubist::catalog::MemberCatalog;
use cubist::config::Settings;
use cubist::model::{MeasureSelection, Member};
use cubist::selection::ParsePolicy;
use cubist::session::{BuilderSession, SessionError, SessionState};

const CUBE: &str = "SIS 2023";

/// A small but complete catalog: one measure pseudo-dimension, a two-tier
/// variable dimension, a two-level geography and a flat year hierarchy.
fn snapshot() -> MemberCatalog {
    let var = |unique: &str, caption: &str| {
        Member::new("[D Variable]", "[D Variable].[Apartados]", unique, caption)
    };
    let geo = |unique: &str, caption: &str| {
        Member::new("[D Clues]", "[D Clues].[Unidad médica]", unique, caption)
    };
    MemberCatalog::new(
        "SIS_2023",
        vec![
            Member::new("[Measures]", "[Measures]", "[Measures].[Total]", "Total"),
            var("[D Variable].[Apartados].&[1]", "Consulta externa"),
            var("[D Variable].[Apartados].&[1].&[10]", "Primera vez"),
            var("[D Variable].[Apartados].&[1].&[11]", "Subsecuente"),
            geo("[D Clues].[Unidad médica].[All]", "All"),
            geo("[D Clues].[Unidad médica].[Entidad].&[9]", "Aguascalientes"),
            geo("[D Clues].[Unidad médica].[Entidad].&[9].&[12]", "HG Norte"),
            Member::new("[D Tiempo]", "[D Tiempo].[Año]", "[D Tiempo].[Año].[2023]", "2023"),
        ],
    )
}

fn measures() -> Vec<MeasureSelection> {
    vec![MeasureSelection::new("Total", "[Measures].[Total]")]
}

fn session(catalog: &MemberCatalog) -> BuilderSession<'_> {
    BuilderSession::new(catalog, CUBE, Settings::default())
}

#[test]
fn test_session_walks_the_full_state_machine() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    assert_eq!(session.state(), SessionState::SelectMeasure);

    session.select_measures(measures()).unwrap();
    assert_eq!(session.state(), SessionState::SelectGroup);

    session.select_groups_from("1", ParsePolicy::Strict).unwrap();
    assert_eq!(session.state(), SessionState::SelectVariable);

    session.select_variables_from("1-2", ParsePolicy::Strict).unwrap();
    assert_eq!(session.state(), SessionState::ConfigureAxes);

    session
        .add_row_dimension("[D Clues]", "[D Clues].[Unidad médica]", "Entidad")
        .unwrap();

    let query = session.finalize().unwrap();
    assert_eq!(session.state(), SessionState::Finalized);
    assert!(query.mdx.starts_with("SELECT\n"));
    assert!(query.mdx.contains("[D Variable].[Apartados].&[1].&[10]"));
    assert!(query.mdx.contains("CROSSJOIN([D Clues].[Unidad médica].[Entidad].MEMBERS,"));
    assert!(query.mdx.ends_with("FROM [SIS 2023]"));
    assert_eq!(query.estimate.rows, 1);
}

#[test]
fn test_operations_out_of_state_are_rejected() {
    let catalog = snapshot();
    let mut session = session(&catalog);

    let err = session.select_groups(Vec::new()).unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { .. }));

    let err = session
        .add_row_dimension("[D Tiempo]", "[D Tiempo].[Año]", "Año")
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { .. }));

    let err = session.finalize().unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { .. }));
}

#[test]
fn test_empty_measure_selection_is_rejected() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    let err = session.select_measures(Vec::new()).unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert_eq!(session.state(), SessionState::SelectMeasure);
}

#[test]
fn test_group_listing_and_child_variables() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();

    let groups = session.available_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].caption, "Consulta externa");

    session.select_groups(groups).unwrap();
    let variables = session.available_variables();
    let captions: Vec<&str> = variables.iter().map(|v| v.caption.as_str()).collect();
    assert_eq!(captions, vec!["Primera vez", "Subsecuente"]);
}

#[test]
fn test_variable_search_is_sanitized_and_case_insensitive() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1", ParsePolicy::Strict).unwrap();

    let hits = session.search_variables("primera");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].caption, "Primera vez");

    assert!(session.search_variables("primera; DROP").is_empty());
}

#[test]
fn test_strict_out_of_range_pick_is_an_error() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();

    let err = session.select_groups_from("7", ParsePolicy::Strict).unwrap_err();
    assert!(matches!(err, SessionError::IndexOutOfRange(7)));
}

#[test]
fn test_lenient_pick_skips_out_of_range_indices() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1,7", ParsePolicy::Lenient).unwrap();

    let variables = session.available_variables();
    assert_eq!(variables.len(), 2);
}

#[test]
fn test_row_dimension_cap_is_enforced() {
    let catalog = snapshot();
    let mut settings = Settings::default();
    settings.row_dimension_cap = 1;
    let mut session = BuilderSession::new(&catalog, CUBE, settings);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1", ParsePolicy::Strict).unwrap();
    session.select_variables_from("1", ParsePolicy::Strict).unwrap();

    session
        .add_row_dimension("[D Clues]", "[D Clues].[Unidad médica]", "Entidad")
        .unwrap();
    let err = session
        .add_row_dimension("[D Tiempo]", "[D Tiempo].[Año]", "Año")
        .unwrap_err();
    assert!(matches!(err, SessionError::RowDimensionCapReached(1)));
}

#[test]
fn test_duplicate_row_hierarchy_is_rejected_at_selection_time() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1", ParsePolicy::Strict).unwrap();
    session.select_variables_from("1", ParsePolicy::Strict).unwrap();

    session
        .add_row_dimension("[D Clues]", "[D Clues].[Unidad médica]", "Entidad")
        .unwrap();
    let err = session
        .add_row_dimension("[D Clues]", "[D Clues].[Unidad médica]", "Level 2")
        .unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
}

#[test]
fn test_unknown_level_is_a_resolution_error() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1", ParsePolicy::Strict).unwrap();
    session.select_variables_from("1", ParsePolicy::Strict).unwrap();

    let err = session
        .add_row_dimension("[D Clues]", "[D Clues].[Unidad médica]", "Municipio")
        .unwrap_err();
    assert!(matches!(err, SessionError::Resolution(_)));
}

#[test]
fn test_pseudo_dimensions_are_not_selectable_as_axes() {
    let catalog = snapshot();
    let session = session(&catalog);
    assert!(session
        .selectable_hierarchies()
        .iter()
        .all(|h| h.dimension != "[Measures]" && h.dimension != "[D Variable]"));
}

#[test]
fn test_flat_hierarchy_axis_addresses_the_hierarchy_itself() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1", ParsePolicy::Strict).unwrap();
    session.select_variables_from("1", ParsePolicy::Strict).unwrap();
    session
        .add_row_dimension("[D Tiempo]", "[D Tiempo].[Año]", "Año")
        .unwrap();

    let query = session.finalize().unwrap();
    assert!(query.mdx.contains("CROSSJOIN([D Tiempo].[Año].MEMBERS,"));
}

#[test]
fn test_filter_members_are_ordered_and_applied() {
    let catalog = snapshot();
    let mut session = session(&catalog);
    session.select_measures(measures()).unwrap();
    session.select_groups_from("1", ParsePolicy::Strict).unwrap();
    session.select_variables_from("1", ParsePolicy::Strict).unwrap();

    let candidates = session
        .members_for_filter("[D Clues]", "[D Clues].[Unidad médica]", "Entidad")
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].caption, "Aguascalientes");

    session
        .add_filter(
            "[D Clues]",
            "[D Clues].[Unidad médica]",
            vec![candidates[0].unique_name.clone()],
        )
        .unwrap();

    let query = session.finalize().unwrap();
    assert!(query
        .mdx
        .contains("CROSSJOIN({[D Clues].[Unidad médica].[Entidad].&[9]},"));
}
