use super::*;
use shared::domain::{PerformerId, StepDraft, StepPatch, TaskPatch};

fn draft(description: &str) -> StepDraft {
    StepDraft {
        description: description.to_string(),
        ..StepDraft::default()
    }
}

/// Two stages, one task each; the first task holds two steps.
fn sample_tree() -> (JourneyTree, StageId, TaskId, StepId, StepId, StageId, TaskId) {
    let tree = JourneyTree::new();
    let (tree, stage_a) = tree.add_stage("Awareness");
    let (tree, task_a) = tree.add_task(&stage_a, "Research", Vec::new()).expect("task");
    let (tree, step_1) = tree.add_step(&task_a, draft("Search the web")).expect("step");
    let (tree, step_2) = tree.add_step(&task_a, draft("Ask a friend")).expect("step");
    let (tree, stage_b) = tree.add_stage("Consideration");
    let (tree, task_b) = tree.add_task(&stage_b, "Compare", Vec::new()).expect("task");
    (tree, stage_a, task_a, step_1, step_2, stage_b, task_b)
}

#[test]
fn add_operations_mint_pairwise_distinct_ids() {
    let tree = JourneyTree::new();
    let (tree, s1) = tree.add_stage("One");
    let (tree, s2) = tree.add_stage("Two");
    let (tree, t1) = tree.add_task(&s1, "A", Vec::new()).expect("task");
    let (tree, t2) = tree.add_task(&s2, "B", Vec::new()).expect("task");
    let (tree, p1) = tree.add_step(&t1, draft("one")).expect("step");
    let (_, p2) = tree.add_step(&t2, draft("two")).expect("step");

    let ids = [
        s1.as_str().to_string(),
        s2.as_str().to_string(),
        t1.as_str().to_string(),
        t2.as_str().to_string(),
        p1.as_str().to_string(),
        p2.as_str().to_string(),
    ];
    for (i, a) in ids.iter().enumerate() {
        for b in ids.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn mutations_do_not_touch_the_previous_generation() {
    let (tree, stage_a, ..) = sample_tree();
    let snapshot = tree.clone();

    let renamed = tree.rename_stage(&stage_a, "Renamed").expect("rename");
    assert_eq!(tree, snapshot);
    assert_ne!(renamed, snapshot);
    assert_eq!(renamed.find_stage(&stage_a).expect("stage").name, "Renamed");
}

#[test]
fn delete_stage_cascades_to_tasks_and_steps() {
    let (tree, stage_a, ..) = sample_tree();
    assert_eq!(tree.step_count(), 2);

    let next = tree.delete_stage(&stage_a).expect("delete");
    assert_eq!(next.stages().len(), 1);
    assert_eq!(next.step_count(), 0);
}

#[test]
fn unknown_ids_fail_with_not_found_and_leave_the_tree_unchanged() {
    let (tree, stage_a, task_a, step_1, ..) = sample_tree();
    let snapshot = tree.clone();
    let ghost_stage = StageId::from("no-such-stage");
    let ghost_step = StepId::from("no-such-step");

    assert!(matches!(
        tree.rename_stage(&ghost_stage, "x"),
        Err(TreeError::NotFound { .. })
    ));
    assert!(matches!(
        tree.update_task(&stage_a, &TaskId::from("no-such-task"), TaskPatch::default()),
        Err(TreeError::NotFound { .. })
    ));
    assert!(matches!(
        tree.delete_step(&stage_a, &task_a, &ghost_step),
        Err(TreeError::NotFound { .. })
    ));
    assert_eq!(tree, snapshot);
    let _ = step_1;
}

#[test]
fn update_task_patches_only_named_fields() {
    let (tree, stage_a, task_a, ..) = sample_tree();
    let performers = vec![PerformerId::from("customer")];

    let next = tree
        .update_task(
            &stage_a,
            &task_a,
            TaskPatch {
                performer_ids: Some(performers.clone()),
                ..TaskPatch::default()
            },
        )
        .expect("update");

    let task = next.find_task(&stage_a, &task_a).expect("task");
    assert_eq!(task.name, "Research");
    assert_eq!(task.performer_ids, performers);
}

#[test]
fn update_step_preserves_id_and_untouched_fields() {
    let (tree, stage_a, task_a, step_1, ..) = sample_tree();
    let tree = tree
        .add_step_entry(&stage_a, &task_a, &step_1, EntryKind::PainPoint, "Slow")
        .expect("entry");

    let next = tree
        .update_step(
            &stage_a,
            &task_a,
            &step_1,
            StepPatch {
                insight: Some("Key moment".to_string()),
                ..StepPatch::default()
            },
        )
        .expect("update");

    let step = next.find_step(&stage_a, &task_a, &step_1).expect("step");
    assert_eq!(step.id, step_1);
    assert_eq!(step.description, "Search the web");
    assert_eq!(step.pain_points, vec!["Slow".to_string()]);
    assert_eq!(step.insight, "Key moment");
}

#[test]
fn move_step_conserves_count_and_payload() {
    let (tree, stage_a, task_a, step_1, _step_2, stage_b, task_b) = sample_tree();
    let tree = tree
        .update_step(
            &stage_a,
            &task_a,
            &step_1,
            StepPatch {
                pain_points: Some(vec!["Overwhelming".to_string()]),
                insight: Some("First touch".to_string()),
                ..StepPatch::default()
            },
        )
        .expect("update");
    let payload = tree
        .find_step(&stage_a, &task_a, &step_1)
        .expect("step")
        .clone();
    let before = tree.step_count();

    let next = tree
        .move_step(&MoveStep {
            step_id: step_1.clone(),
            source_stage_id: stage_a.clone(),
            source_task_id: task_a.clone(),
            source_index: 0,
            dest_stage_id: stage_b.clone(),
            dest_task_id: task_b.clone(),
            dest_index: 0,
        })
        .expect("move");

    assert_eq!(next.step_count(), before);
    assert_eq!(
        next.find_step(&stage_b, &task_b, &step_1).expect("moved"),
        &payload
    );
    assert!(next.find_step(&stage_a, &task_a, &step_1).is_none());
}

#[test]
fn move_step_within_a_task_is_a_pure_reorder() {
    let (tree, stage_a, task_a, step_1, step_2, ..) = sample_tree();

    let next = tree
        .move_step(&MoveStep {
            step_id: step_1.clone(),
            source_stage_id: stage_a.clone(),
            source_task_id: task_a.clone(),
            source_index: 0,
            dest_stage_id: stage_a.clone(),
            dest_task_id: task_a.clone(),
            dest_index: 1,
        })
        .expect("move");

    let task = next.find_task(&stage_a, &task_a).expect("task");
    let order: Vec<&StepId> = task.steps.iter().map(|step| &step.id).collect();
    assert_eq!(order, vec![&step_2, &step_1]);
}

#[test]
fn moving_the_only_step_out_leaves_an_empty_task_in_place() {
    let (tree, stage_a, task_a, step_1, step_2, stage_b, task_b) = sample_tree();
    let tree = tree.delete_step(&stage_a, &task_a, &step_2).expect("delete");

    let next = tree
        .move_step(&MoveStep {
            step_id: step_1.clone(),
            source_stage_id: stage_a.clone(),
            source_task_id: task_a.clone(),
            source_index: 0,
            dest_stage_id: stage_b.clone(),
            dest_task_id: task_b.clone(),
            dest_index: 0,
        })
        .expect("move");

    let task = next.find_task(&stage_a, &task_a).expect("task stays");
    assert!(task.steps.is_empty());
}

#[test]
fn move_step_to_unknown_destination_fails_with_invalid_reference() {
    let (tree, stage_a, task_a, step_1, ..) = sample_tree();
    let snapshot = tree.clone();

    let err = tree
        .move_step(&MoveStep {
            step_id: step_1.clone(),
            source_stage_id: stage_a.clone(),
            source_task_id: task_a.clone(),
            source_index: 0,
            dest_stage_id: StageId::from("no-such-stage"),
            dest_task_id: TaskId::from("no-such-task"),
            dest_index: 0,
        })
        .expect_err("must fail");

    assert!(matches!(err, TreeError::InvalidReference { .. }));
    assert_eq!(tree, snapshot);
}

#[test]
fn move_step_with_stale_source_index_fails_with_not_found() {
    let (tree, stage_a, task_a, step_1, _step_2, stage_b, task_b) = sample_tree();

    // Index 1 holds a different step than the named id.
    let err = tree
        .move_step(&MoveStep {
            step_id: step_1,
            source_stage_id: stage_a,
            source_task_id: task_a,
            source_index: 1,
            dest_stage_id: stage_b,
            dest_task_id: task_b,
            dest_index: 0,
        })
        .expect_err("must fail");
    assert!(matches!(err, TreeError::NotFound { .. }));
}

#[test]
fn entry_operations_edit_the_named_list_in_order() {
    let (tree, stage_a, task_a, step_1, ..) = sample_tree();

    let tree = tree
        .add_step_entry(&stage_a, &task_a, &step_1, EntryKind::Opportunity, "First")
        .expect("add");
    let tree = tree
        .add_step_entry(&stage_a, &task_a, &step_1, EntryKind::Opportunity, "Second")
        .expect("add");
    let tree = tree
        .update_step_entry(&stage_a, &task_a, &step_1, EntryKind::Opportunity, 0, "Edited")
        .expect("update");
    let tree = tree
        .reorder_step_entries(&stage_a, &task_a, &step_1, EntryKind::Opportunity, 0, 1)
        .expect("reorder");

    let step = tree.find_step(&stage_a, &task_a, &step_1).expect("step");
    assert_eq!(
        step.opportunities,
        vec!["Second".to_string(), "Edited".to_string()]
    );
    assert!(step.pain_points.is_empty());

    let tree = tree
        .remove_step_entry(&stage_a, &task_a, &step_1, EntryKind::Opportunity, 1)
        .expect("remove");
    let step = tree.find_step(&stage_a, &task_a, &step_1).expect("step");
    assert_eq!(step.opportunities, vec!["Second".to_string()]);
}

#[test]
fn entry_index_out_of_range_fails_with_not_found() {
    let (tree, stage_a, task_a, step_1, ..) = sample_tree();

    let err = tree
        .update_step_entry(&stage_a, &task_a, &step_1, EntryKind::PainPoint, 0, "x")
        .expect_err("empty list");
    assert!(matches!(err, TreeError::NotFound { .. }));
}

#[test]
fn locate_step_returns_full_ancestry() {
    let (tree, _stage_a, _task_a, step_1, ..) = sample_tree();

    let (stage, task, step) = tree.locate_step(&step_1).expect("located");
    assert_eq!(stage.name, "Awareness");
    assert_eq!(task.name, "Research");
    assert_eq!(step.description, "Search the web");
}
