use super::*;
use shared::domain::StepDraft;

fn tree_with_entries() -> (JourneyTree, StepId, StepId) {
    let tree = JourneyTree::new();
    let (tree, stage) = tree.add_stage("Purchase");
    let (tree, task) = tree.add_task(&stage, "Checkout", Vec::new()).expect("task");
    let (tree, step_1) = tree
        .add_step(
            &task,
            StepDraft {
                description: "Enter payment details".to_string(),
                pain_points: vec!["Form too long".to_string(), "No wallet support".to_string()],
                ..StepDraft::default()
            },
        )
        .expect("step");
    let (tree, step_2) = tree
        .add_step(
            &task,
            StepDraft {
                description: "Confirm order".to_string(),
                pain_points: vec!["Unclear totals".to_string(), "Hidden fees".to_string()],
                ..StepDraft::default()
            },
        )
        .expect("step");
    (tree, step_1, step_2)
}

#[test]
fn step_click_toggles_and_replaces() {
    let (_, step_1, step_2) = tree_with_entries();
    let mut engine = HighlightEngine::new();

    engine.click_step(step_1.clone());
    assert_eq!(
        engine.state(),
        &Highlight::StepSelected {
            step_id: step_1.clone()
        }
    );

    // Same step again: back to idle.
    engine.click_step(step_1.clone());
    assert_eq!(engine.state(), &Highlight::Idle);

    // Different step replaces, never accumulates.
    engine.click_step(step_1.clone());
    engine.click_step(step_2.clone());
    assert_eq!(engine.state(), &Highlight::StepSelected { step_id: step_2 });
}

#[test]
fn entry_click_selects_exactly_one_entry_and_notifies() {
    let (tree, step_1, step_2) = tree_with_entries();
    let mut engine = HighlightEngine::new();

    engine.click_step(step_1.clone());
    let detail = engine
        .click_entry(&tree, step_2.clone(), EntryKind::PainPoint, 1)
        .expect("new selection notifies");

    assert_eq!(
        engine.state(),
        &Highlight::ItemSelected {
            step_id: step_2.clone(),
            kind: EntryKind::PainPoint,
            index: 1,
        }
    );
    assert_eq!(detail.text, "Hidden fees");
    assert_eq!(detail.step_description, "Confirm order");
    assert_eq!(detail.stage_name, "Purchase");
    assert_eq!(detail.task_name, "Checkout");

    // Exact same entry again: toggles to idle, no notification.
    assert!(engine
        .click_entry(&tree, step_2, EntryKind::PainPoint, 1)
        .is_none());
    assert_eq!(engine.state(), &Highlight::Idle);
}

#[test]
fn escape_clears_from_any_state() {
    let (tree, step_1, ..) = tree_with_entries();
    let mut engine = HighlightEngine::new();

    engine.click_step(step_1.clone());
    engine.clear();
    assert_eq!(engine.state(), &Highlight::Idle);

    let _ = engine.click_entry(&tree, step_1, EntryKind::PainPoint, 0);
    engine.clear();
    assert_eq!(engine.state(), &Highlight::Idle);

    engine.clear();
    assert_eq!(engine.state(), &Highlight::Idle);
}

#[test]
fn unresolvable_entry_click_degrades_to_background_click() {
    let (tree, step_1, ..) = tree_with_entries();
    let mut engine = HighlightEngine::new();
    engine.click_step(step_1.clone());

    // Index past the end of the list: no such entry.
    let detail = engine.click_entry(&tree, step_1.clone(), EntryKind::PainPoint, 99);
    assert!(detail.is_none());
    assert_eq!(engine.state(), &Highlight::Idle);

    // Unknown step id behaves the same.
    engine.click_step(step_1);
    let detail = engine.click_entry(&tree, StepId::from("ghost"), EntryKind::Opportunity, 0);
    assert!(detail.is_none());
    assert_eq!(engine.state(), &Highlight::Idle);
}

#[test]
fn step_selection_highlights_every_entry_of_that_step() {
    let (tree, step_1, step_2) = tree_with_entries();
    let mut engine = HighlightEngine::new();

    engine.click_step(step_1.clone());
    assert!(engine.step_involved(&step_1));
    assert!(engine.entry_highlighted(&step_1, EntryKind::PainPoint, 0));
    assert!(engine.entry_highlighted(&step_1, EntryKind::PainPoint, 1));
    assert!(!engine.entry_highlighted(&step_2, EntryKind::PainPoint, 0));

    let _ = engine.click_entry(&tree, step_2.clone(), EntryKind::PainPoint, 0);
    assert!(engine.entry_highlighted(&step_2, EntryKind::PainPoint, 0));
    assert!(!engine.entry_highlighted(&step_2, EntryKind::PainPoint, 1));
    assert!(!engine.entry_highlighted(&step_1, EntryKind::PainPoint, 0));
}
