use super::*;
use shared::domain::StepDraft;

fn sample() -> (JourneyTree, StageId, TaskId, TaskId, StepId, StepId) {
    let tree = JourneyTree::new();
    let (tree, stage) = tree.add_stage("Stage");
    let (tree, task_a) = tree.add_task(&stage, "A", Vec::new()).expect("task");
    let (tree, task_b) = tree.add_task(&stage, "B", Vec::new()).expect("task");
    let (tree, step_1) = tree
        .add_step(
            &task_a,
            StepDraft {
                description: "first".to_string(),
                ..StepDraft::default()
            },
        )
        .expect("step");
    let (tree, step_2) = tree
        .add_step(
            &task_a,
            StepDraft {
                description: "second".to_string(),
                ..StepDraft::default()
            },
        )
        .expect("step");
    (tree, stage, task_a, task_b, step_1, step_2)
}

#[test]
fn container_id_round_trips() {
    let stage = StageId::fresh();
    let task = TaskId::fresh();
    let encoded = container_id(&stage, &task);
    let (decoded_stage, decoded_task) = parse_container_id(&encoded).expect("parse");
    assert_eq!(decoded_stage, stage);
    assert_eq!(decoded_task, task);

    assert!(parse_container_id("no-separator").is_none());
    assert!(parse_container_id("::missing-stage").is_none());
}

#[test]
fn drop_without_destination_is_ignored() {
    let (tree, stage, task_a, _, step_1, _) = sample();
    let result = apply_drop(
        &tree,
        &DropResult {
            dragged_id: step_1,
            source_container_id: container_id(&stage, &task_a),
            source_index: 0,
            dest_container_id: None,
            dest_index: 0,
        },
    );
    assert!(result.is_none());
}

#[test]
fn drop_at_identical_position_produces_no_new_tree() {
    let (tree, stage, task_a, _, step_1, _) = sample();
    let container = container_id(&stage, &task_a);
    let result = apply_drop(
        &tree,
        &DropResult {
            dragged_id: step_1,
            source_container_id: container.clone(),
            source_index: 0,
            dest_container_id: Some(container),
            dest_index: 0,
        },
    );
    assert!(result.is_none());
}

#[test]
fn drop_with_unparsable_container_is_silently_ignored() {
    let (tree, stage, task_a, _, step_1, _) = sample();
    let result = apply_drop(
        &tree,
        &DropResult {
            dragged_id: step_1,
            source_container_id: container_id(&stage, &task_a),
            source_index: 0,
            dest_container_id: Some("garbage".to_string()),
            dest_index: 0,
        },
    );
    assert!(result.is_none());
}

#[test]
fn drop_onto_unknown_task_is_silently_ignored() {
    let (tree, stage, task_a, _, step_1, _) = sample();
    let result = apply_drop(
        &tree,
        &DropResult {
            dragged_id: step_1,
            source_container_id: container_id(&stage, &task_a),
            source_index: 0,
            dest_container_id: Some(container_id(&stage, &TaskId::from("ghost"))),
            dest_index: 0,
        },
    );
    assert!(result.is_none());
}

#[test]
fn cross_task_drop_moves_the_step() {
    let (tree, stage, task_a, task_b, step_1, step_2) = sample();
    let next = apply_drop(
        &tree,
        &DropResult {
            dragged_id: step_1.clone(),
            source_container_id: container_id(&stage, &task_a),
            source_index: 0,
            dest_container_id: Some(container_id(&stage, &task_b)),
            dest_index: 0,
        },
    )
    .expect("move applies");

    assert!(next.find_step(&stage, &task_b, &step_1).is_some());
    let remaining = next.find_task(&stage, &task_a).expect("task");
    assert_eq!(remaining.steps.len(), 1);
    assert_eq!(remaining.steps[0].id, step_2);
}

#[test]
fn same_container_drop_reorders() {
    let (tree, stage, task_a, _, step_1, step_2) = sample();
    let container = container_id(&stage, &task_a);
    let next = apply_drop(
        &tree,
        &DropResult {
            dragged_id: step_1.clone(),
            source_container_id: container.clone(),
            source_index: 0,
            dest_container_id: Some(container),
            dest_index: 1,
        },
    )
    .expect("reorder applies");

    let task = next.find_task(&stage, &task_a).expect("task");
    let order: Vec<&StepId> = task.steps.iter().map(|step| &step.id).collect();
    assert_eq!(order, vec![&step_2, &step_1]);
}

#[test]
fn reorder_slice_moves_one_item() {
    let items = vec!["a", "b", "c", "d"];

    let next = reorder_slice(&items, 0, 2).expect("reorder");
    assert_eq!(next, vec!["b", "c", "a", "d"]);

    let next = reorder_slice(&items, 3, 0).expect("reorder");
    assert_eq!(next, vec!["d", "a", "b", "c"]);

    // Destination past the end clamps to the tail.
    let next = reorder_slice(&items, 1, 99).expect("reorder");
    assert_eq!(next, vec!["a", "c", "d", "b"]);
}

#[test]
fn reorder_slice_no_op_and_out_of_range_return_none() {
    let items = vec!["a", "b"];
    assert!(reorder_slice(&items, 1, 1).is_none());
    assert!(reorder_slice(&items, 5, 0).is_none());
    let empty: Vec<&str> = Vec::new();
    assert!(reorder_slice(&empty, 0, 0).is_none());
}
