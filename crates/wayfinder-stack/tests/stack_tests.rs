use proptest::prelude::*;
use wayfinder_model::{Destination, NavItem, NavItemId};
use wayfinder_resolve::NavForest;
use wayfinder_stack::{
    allowed_transitions, is_allowed, Effect, Operation, StackController, StackError, StackState,
    StateKind, Surface,
};

fn campus() -> NavForest {
    NavForest::from_items([
        NavItem::category("a", "Administration"),
        NavItem::category("b", "Staff").with_parent("a"),
        NavItem::route("b1", "Directory", "/staff").with_parent("b"),
        NavItem::category("c", "Absences").with_parent("b"),
        NavItem::route("c1", "Today", "/absences/today").with_parent("c"),
        NavItem::route("r", "Reports", "/reports").with_parent("a"),
        NavItem::action("x", "Export").with_parent("a"),
        NavItem::category("empty", "Archive").with_parent("a"),
        NavItem::route("home", "Home", "/"),
    ])
}

const IDS: [&str; 10] = ["a", "b", "b1", "c", "c1", "r", "x", "empty", "home", "missing"];

#[derive(Debug, Clone)]
enum Step {
    Open(&'static str),
    Select(&'static str),
    Back,
    Close,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let id = proptest::sample::select(IDS.to_vec());
    prop_oneof![
        id.clone().prop_map(Step::Open),
        id.prop_map(Step::Select),
        Just(Step::Back),
        Just(Step::Close),
    ]
}

#[test]
fn test_open_select_category_back_returns_to_root() {
    let forest = campus();
    let mut stack = StackController::new(Surface::Desktop);

    stack.open(&forest, "a").unwrap();
    assert_eq!(stack.select_child(&forest, "b").unwrap(), None);
    stack.back();

    assert_eq!(stack.state(), &StackState::Showing(vec![NavItemId::new("a")]));
}

#[test]
fn test_open_select_route_emits_single_navigate_and_closes() {
    let forest = campus();
    let mut stack = StackController::new(Surface::Mobile);

    stack.open(&forest, "a").unwrap();
    let effects: Vec<Effect> = stack.select_child(&forest, "r").unwrap().into_iter().collect();

    assert_eq!(
        effects,
        vec![Effect::Navigate {
            item: "r".into(),
            destination: Destination::Internal("/reports".into()),
        }]
    );
    assert_eq!(stack.state(), &StackState::Closed);
}

#[test]
fn test_action_item_navigates_to_action() {
    let forest = campus();
    let mut stack = StackController::new(Surface::Desktop);

    stack.open(&forest, "a").unwrap();
    let effect = stack.select_child(&forest, "x").unwrap();

    assert_eq!(
        effect,
        Some(Effect::Navigate {
            item: "x".into(),
            destination: Destination::Action("x".into()),
        })
    );
}

#[test]
fn test_items_without_children_do_not_open() {
    let forest = campus();
    let mut stack = StackController::new(Surface::Desktop);

    assert_eq!(stack.open(&forest, "x"), Err(StackError::NotACategory("x".into())));
    assert_eq!(
        stack.open(&forest, "empty"),
        Err(StackError::NotACategory("empty".into()))
    );
    assert_eq!(stack.state(), &StackState::Closed);
}

#[test]
fn test_three_level_drill_down_and_unwind() {
    let forest = campus();
    let mut stack = StackController::new(Surface::Desktop);

    stack.open(&forest, "a").unwrap();
    stack.select_child(&forest, "b").unwrap();
    stack.select_child(&forest, "c").unwrap();
    assert_eq!(stack.breadcrumb(&forest), vec!["Administration", "Staff", "Absences"]);

    stack.back();
    stack.back();
    stack.back();
    assert_eq!(stack.kind(), StateKind::Closed);
    stack.back();
    assert_eq!(stack.kind(), StateKind::Closed);
}

#[test]
fn test_closed_state_offers_no_selection() {
    let selections: Vec<_> = allowed_transitions(StateKind::Closed)
        .into_iter()
        .filter(|(op, _)| matches!(op, Operation::SelectLeaf | Operation::SelectSubmenu))
        .collect();
    assert!(selections.is_empty());
}

proptest! {
    #[test]
    fn prop_observed_transitions_are_subset_of_allowed(
        steps in proptest::collection::vec(step_strategy(), 0..40)
    ) {
        let forest = campus();
        let mut stack = StackController::new(Surface::Desktop);

        for step in steps {
            let before = stack.state().clone();
            let from = before.kind();

            let (operation, succeeded, effect) = match step {
                Step::Open(id) => {
                    let ok = stack.open(&forest, id).is_ok();
                    (Operation::Open, ok, None)
                }
                Step::Select(id) => match stack.select_child(&forest, id) {
                    Ok(None) => (Operation::SelectSubmenu, true, None),
                    Ok(Some(effect)) => (Operation::SelectLeaf, true, Some(effect)),
                    Err(_) => (Operation::SelectLeaf, false, None),
                },
                Step::Back => {
                    stack.back();
                    (Operation::Back, true, None)
                }
                Step::Close => {
                    stack.close();
                    (Operation::Close, true, None)
                }
            };

            if succeeded {
                prop_assert!(is_allowed(from, operation, stack.kind()));
            } else {
                // Rejected operations never change state
                prop_assert_eq!(stack.state(), &before);
            }

            // Leaves close the menu; submenus keep it showing
            prop_assert_eq!(effect.is_some(), operation == Operation::SelectLeaf && succeeded);

            // The stack only ever holds submenus, each a child of the previous
            let ids = stack.stack();
            for pair in ids.windows(2) {
                let child = forest.find(pair[1].as_str()).unwrap();
                let parent = forest.find(pair[0].as_str()).unwrap();
                prop_assert_eq!(forest.parent(child), Some(parent));
            }
            for id in ids {
                let idx = forest.find(id.as_str()).unwrap();
                prop_assert!(forest.get(idx).unwrap().is_submenu());
            }
        }
    }
}
