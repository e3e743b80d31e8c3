// tests/schema/builder_test.rs
use cubist::catalog::MemberCatalog;
use cubist::model::{HierarchyKey, Level, Member};
use cubist::schema::{HierarchyCatalogBuilder, MarkerClassifier};

fn geo_member(unique: &str, caption: &str) -> Member {
    Member::new("[D Clues]", "[D Clues].[Unidad médica]", unique, caption)
}

fn snapshot(members: Vec<Member>) -> MemberCatalog {
    MemberCatalog::new("SIS_2023", members)
}

#[test]
fn test_build_resolves_one_hierarchy_per_pair() {
    let catalog = snapshot(vec![
        geo_member("[D Clues].[Unidad médica].[All]", "All"),
        geo_member("[D Clues].[Unidad médica].&[9]", "Aguascalientes"),
        geo_member("[D Clues].[Unidad médica].&[9].&[12]", "HG Norte"),
        Member::new("[D Tiempo]", "[D Tiempo].[Año]", "[D Tiempo].[Año].&[2023]", "2023"),
    ]);

    let schema = HierarchyCatalogBuilder::new(50).build(&catalog, &MarkerClassifier::default());

    assert_eq!(schema.len(), 2);
    let geo = &schema[&HierarchyKey::new("[D Clues]", "[D Clues].[Unidad médica]")];
    assert_eq!(geo.levels.len(), 2);
    let time = &schema[&HierarchyKey::new("[D Tiempo]", "[D Tiempo].[Año]")];
    assert_eq!(time.levels.len(), 1);
}

#[test]
fn test_build_skips_pseudo_dimensions() {
    let catalog = snapshot(vec![
        Member::new("[Measures]", "[Measures]", "[Measures].[Total]", "Total"),
        Member::new(
            "[D Variable]",
            "[D Variable].[Apartado]",
            "[D Variable].[Apartado].&[1]",
            "Consultas",
        ),
        geo_member("[D Clues].[Unidad médica].&[9]", "Aguascalientes"),
    ]);

    let schema = HierarchyCatalogBuilder::new(50).build(&catalog, &MarkerClassifier::default());

    assert_eq!(schema.len(), 1);
    assert!(schema.contains_key(&HierarchyKey::new("[D Clues]", "[D Clues].[Unidad médica]")));
}

#[test]
fn test_flat_hierarchy_gets_self_named_level() {
    // Every member at depth 0: address the hierarchy through one level named
    // after the hierarchy tail.
    let catalog = snapshot(vec![
        Member::new("[D Turno]", "[D Turno].[Turno]", "[D Turno].[Turno].[Matutino]", "Matutino"),
        Member::new("[D Turno]", "[D Turno].[Turno]", "[D Turno].[Turno].[Vespertino]", "Vespertino"),
    ]);

    let schema = HierarchyCatalogBuilder::new(50).build(&catalog, &MarkerClassifier::default());

    let turno = &schema[&HierarchyKey::new("[D Turno]", "[D Turno].[Turno]")];
    assert_eq!(turno.levels, vec![Level::recovered("Turno", 1)]);
}

#[test]
fn test_hierarchy_level_lookup() {
    let catalog = snapshot(vec![
        geo_member("[D Clues].[Unidad médica].[Entidad].&[9]", "Aguascalientes"),
        geo_member("[D Clues].[Unidad médica].[Entidad].&[9].&[12]", "HG Norte"),
    ]);

    let schema = HierarchyCatalogBuilder::new(50).build(&catalog, &MarkerClassifier::default());
    let geo = &schema[&HierarchyKey::new("[D Clues]", "[D Clues].[Unidad médica]")];

    let entidad = geo.level_by_name("Entidad").unwrap();
    assert_eq!(entidad.depth, 1);
    assert_eq!(geo.level_at_depth(2).unwrap().name, "Level 2");
    assert!(geo.level_by_name("Municipio").is_none());

    let deep = geo.level_at_depth(2).unwrap();
    let ancestors = geo.ancestors_of(deep);
    assert_eq!(ancestors.len(), 1);
    assert_eq!(ancestors[0].name, "Entidad");
}
