//! End-to-end resolution scenarios

use pretty_assertions::assert_eq;
use wayfinder_model::{
    ConfigEntry, EstablishmentId, NavItem, Role, RoleNavConfig, HOME_ITEM_ID, LOGOUT_ITEM_ID,
};
use wayfinder_resolve::{ConfigSource, NavForest, ResolutionIssue, Resolver};

fn root_ids(forest: &NavForest) -> Vec<String> {
    forest
        .roots()
        .iter()
        .filter_map(|idx| forest.item(*idx))
        .map(|item| item.id.to_string())
        .collect()
}

fn catalogue() -> Vec<NavItem> {
    vec![
        NavItem::route("dashboard", "Dashboard", "/dashboard"),
        NavItem::category("pedagogy", "Pedagogy"),
        NavItem::route("courses", "Courses", "/courses").with_parent("pedagogy"),
        NavItem::route("assignments", "Assignments", "/assignments").with_parent("pedagogy"),
        NavItem::route("messages", "Messages", "/messages"),
        NavItem::external("library", "Library", "https://library.example.org"),
    ]
}

#[test]
fn test_orphan_is_promoted_when_parent_row_is_missing() {
    // m2 hangs under m1, but m1 no longer exists in storage
    let items = vec![NavItem::route("m2", "Child", "/child").with_parent("m1")];
    let configs = vec![RoleNavConfig::new("student", Role::Student).with_items(["m1", "m2"])];

    let resolution = Resolver::new().resolve(Role::Student, None, &items, &configs);

    assert_eq!(root_ids(&resolution.forest), vec!["m2"]);
    assert_eq!(
        resolution.issues,
        vec![
            ResolutionIssue::StaleConfigReference {
                config_id: "student".into(),
                item_id: "m1".into(),
            },
            ResolutionIssue::OrphanPromoted {
                item_id: "m2".into(),
                missing_parent: "m1".into(),
            },
        ]
    );
}

#[test]
fn test_orphan_is_promoted_when_parent_is_not_configured() {
    let configs = vec![RoleNavConfig::new("student", Role::Student).with_items(["courses"])];

    let resolution = Resolver::new().resolve(Role::Student, None, &catalogue(), &configs);

    assert_eq!(root_ids(&resolution.forest), vec!["courses"]);
    assert!(matches!(
        &resolution.issues[..],
        [ResolutionIssue::OrphanPromoted { missing_parent, .. }] if missing_parent.as_str() == "pedagogy"
    ));
}

#[test]
fn test_specific_config_overrides_general() {
    let configs = vec![
        RoleNavConfig::new("professeur", Role::Professeur).with_items(["dashboard", "messages"]),
        RoleNavConfig::new("professeur-e1", Role::Professeur)
            .for_establishment("e1")
            .with_items(["pedagogy", "courses", "assignments"]),
    ];
    let e1 = EstablishmentId::new("e1");
    let e2 = EstablishmentId::new("e2");
    let resolver = Resolver::new();

    let in_e1 = resolver.resolve(Role::Professeur, Some(&e1), &catalogue(), &configs);
    assert_eq!(in_e1.source, ConfigSource::Specific);
    assert_eq!(root_ids(&in_e1.forest), vec!["pedagogy"]);
    let pedagogy = in_e1.forest.find("pedagogy").expect("pedagogy resolved");
    assert_eq!(in_e1.forest.children(pedagogy).len(), 2);

    let in_e2 = resolver.resolve(Role::Professeur, Some(&e2), &catalogue(), &configs);
    assert_eq!(in_e2.source, ConfigSource::General);
    assert_eq!(root_ids(&in_e2.forest), vec!["dashboard", "messages"]);
}

#[test]
fn test_missing_config_falls_back_to_default_set() {
    let configs = vec![RoleNavConfig::new("student", Role::Student).with_items(["dashboard"])];

    let resolution = Resolver::new().resolve(Role::Tutor, None, &catalogue(), &configs);

    assert!(resolution.is_default());
    assert_eq!(resolution.config_id, None);
    assert_eq!(root_ids(&resolution.forest), vec![HOME_ITEM_ID, LOGOUT_ITEM_ID]);
    assert_eq!(
        resolution.issues,
        vec![ResolutionIssue::FellBackToDefault {
            role: Role::Tutor,
            establishment_id: None,
        }]
    );
}

#[test]
fn test_empty_config_falls_back_to_default_set() {
    let configs = vec![RoleNavConfig::new("director", Role::Director)];

    let resolution = Resolver::new().resolve(Role::Director, None, &catalogue(), &configs);

    assert!(resolution.is_default());
    assert_eq!(root_ids(&resolution.forest), vec![HOME_ITEM_ID, LOGOUT_ITEM_ID]);
}

#[test]
fn test_positions_order_siblings() {
    let configs = vec![RoleNavConfig::new("student", Role::Student)
        .with_entry(ConfigEntry::at("pedagogy", 0))
        .with_entry(ConfigEntry::at("assignments", 1))
        .with_entry(ConfigEntry::at("courses", 2))
        .with_entry(ConfigEntry::at("dashboard", -1))];

    let resolution = Resolver::new().resolve(Role::Student, None, &catalogue(), &configs);
    let forest = &resolution.forest;

    assert_eq!(root_ids(forest), vec!["dashboard", "pedagogy"]);
    let pedagogy = forest.find("pedagogy").expect("pedagogy resolved");
    let children: Vec<String> = forest
        .children(pedagogy)
        .iter()
        .filter_map(|idx| forest.item(*idx))
        .map(|item| item.id.to_string())
        .collect();
    assert_eq!(children, vec!["assignments", "courses"]);
}

#[test]
fn test_self_parent_resolves_as_root_without_issue() {
    let items = vec![
        NavItem::category("loop", "Loop").with_parent("loop"),
        NavItem::route("inside", "Inside", "/inside").with_parent("loop"),
    ];
    let configs = vec![RoleNavConfig::new("tutor", Role::Tutor).with_items(["loop", "inside"])];

    let resolution = Resolver::new().resolve(Role::Tutor, None, &items, &configs);

    assert_eq!(root_ids(&resolution.forest), vec!["loop"]);
    assert!(resolution.issues.is_empty());
    let looped = resolution.forest.find("loop").unwrap();
    assert_eq!(resolution.forest.children(looped).len(), 1);
}

#[test]
fn test_parent_cycle_is_broken_at_first_configured_member() {
    let items = vec![
        NavItem::category("a", "A").with_parent("b"),
        NavItem::category("b", "B").with_parent("a"),
        NavItem::route("leaf", "Leaf", "/leaf").with_parent("b"),
    ];
    let configs = vec![RoleNavConfig::new("admin", Role::Administrator).with_items(["b", "a", "leaf"])];

    let resolution = Resolver::new().resolve(Role::Administrator, None, &items, &configs);

    assert_eq!(root_ids(&resolution.forest), vec!["b"]);
    assert_eq!(
        resolution.issues,
        vec![ResolutionIssue::CycleBroken { item_id: "b".into() }]
    );
    let tree = resolution.forest.to_tree();
    let under_b: Vec<&str> = tree[0].children.iter().map(|node| node.item.id.as_str()).collect();
    assert_eq!(under_b, vec!["a", "leaf"]);
}

#[test]
fn test_external_link_resolves_but_never_matches_routes() {
    let configs = vec![RoleNavConfig::new("student", Role::Student).with_items(["library", "dashboard"])];

    let resolution = Resolver::new().resolve(Role::Student, None, &catalogue(), &configs);

    assert_eq!(resolution.forest.len(), 2);
    let route = "/dashboard".parse().expect("valid route");
    let found = resolution.forest.find_by_route(&route).and_then(|idx| resolution.forest.item(idx));
    assert_eq!(found.map(|item| item.id.as_str()), Some("dashboard"));
}
