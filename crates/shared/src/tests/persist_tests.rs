use super::*;

fn sample_document_json() -> &'static str {
    r##"{
        "savedAt": "2024-03-01T12:00:00Z",
        "performers": [
            {"id": "customer", "name": "Customer", "colorHex": "#e8590c", "isDefault": true}
        ],
        "stages": [
            {
                "id": "stage-awareness",
                "name": "Awareness",
                "tasks": [
                    {
                        "id": "task-research",
                        "name": "Research options",
                        "jobPerformerIds": ["customer"],
                        "steps": [
                            {
                                "id": "step-search",
                                "description": "Search the web",
                                "jobPerformerIds": ["customer"],
                                "painPoints": ["Too many tabs"],
                                "opportunities": ["Curated starting page"],
                                "currentExperiences": ["Uses a search engine"],
                                "insights": "Starts broad, narrows fast"
                            }
                        ]
                    }
                ]
            }
        ]
    }"##
}

#[test]
fn parses_full_document_wrapper() {
    let document = parse_document(sample_document_json()).expect("parse");

    assert!(document.saved_at.is_some());
    assert_eq!(document.performers.len(), 1);
    assert_eq!(document.performers[0].name, "Customer");
    assert!(document.performers[0].is_default);

    let stage = &document.stages[0];
    assert_eq!(stage.id.as_str(), "stage-awareness");
    assert_eq!(stage.name, "Awareness");

    let step = &stage.tasks[0].steps[0];
    assert_eq!(step.description, "Search the web");
    assert_eq!(step.insight, "Starts broad, narrows fast");
    assert_eq!(step.pain_points, vec!["Too many tabs".to_string()]);
}

#[test]
fn parses_bare_stage_array() {
    let json = r#"[
        {"id": "s1", "name": "Onboarding", "tasks": []}
    ]"#;

    let document = parse_document(json).expect("parse");
    assert!(document.saved_at.is_none());
    assert!(document.performers.is_empty());
    assert_eq!(document.stages.len(), 1);
    assert_eq!(document.stages[0].name, "Onboarding");
    assert!(document.stages[0].tasks.is_empty());
}

#[test]
fn folds_legacy_persona_id_into_performer_ids() {
    let json = r#"[
        {"id": "s1", "name": "Stage", "tasks": [
            {"id": "t1", "name": "Task", "steps": [
                {"id": "p1", "description": "Legacy step", "personaId": "persona-7"}
            ]}
        ]}
    ]"#;

    let document = parse_document(json).expect("parse");
    let step = &document.stages[0].tasks[0].steps[0];
    assert_eq!(step.performer_ids, vec![PerformerId("persona-7".into())]);
}

#[test]
fn job_performer_ids_win_over_persona_id() {
    let json = r#"[
        {"id": "s1", "name": "Stage", "tasks": [
            {"id": "t1", "name": "Task", "steps": [
                {
                    "id": "p1",
                    "description": "Mixed step",
                    "jobPerformerIds": ["a", "b"],
                    "personaId": "ignored"
                }
            ]}
        ]}
    ]"#;

    let document = parse_document(json).expect("parse");
    let step = &document.stages[0].tasks[0].steps[0];
    assert_eq!(
        step.performer_ids,
        vec![PerformerId("a".into()), PerformerId("b".into())]
    );
}

#[test]
fn normalizes_object_shaped_names_on_import() {
    let json = r#"[
        {"id": "s1", "name": {"name": "Wrapped stage"}, "tasks": [
            {"id": "t1", "name": {"name": "Wrapped task"}, "steps": []}
        ]}
    ]"#;

    let document = parse_document(json).expect("parse");
    assert_eq!(document.stages[0].name, "Wrapped stage");
    assert_eq!(document.stages[0].tasks[0].name, "Wrapped task");
}

#[test]
fn export_writes_normalized_shape() {
    let json = r#"[
        {"id": "s1", "name": {"name": "Wrapped"}, "tasks": [
            {"id": "t1", "name": "Task", "steps": [
                {"id": "p1", "description": "Step", "personaId": "persona-7"}
            ]}
        ]}
    ]"#;

    let document = parse_document(json).expect("parse");
    let rendered = render_document(&document).expect("render");

    // The legacy forms never survive a round trip.
    assert!(!rendered.contains("personaId"));
    assert!(rendered.contains(r#""name": "Wrapped""#));
    assert!(rendered.contains("jobPerformerIds"));
    assert!(rendered.contains("persona-7"));

    let reparsed = parse_document(&rendered).expect("reparse");
    assert_eq!(reparsed.stages, document.stages);
}

#[test]
fn missing_optional_fields_default_to_empty() {
    let json = r#"[
        {"id": "s1", "name": "Stage", "tasks": [
            {"id": "t1", "name": "Task", "steps": [
                {"id": "p1", "description": "Bare step"}
            ]}
        ]}
    ]"#;

    let document = parse_document(json).expect("parse");
    let step = &document.stages[0].tasks[0].steps[0];
    assert!(step.performer_ids.is_empty());
    assert!(step.pain_points.is_empty());
    assert!(step.opportunities.is_empty());
    assert!(step.current_experiences.is_empty());
    assert!(step.insight.is_empty());
}

#[test]
fn rejects_scalar_document() {
    let err = parse_document("42").expect_err("scalar should not parse");
    assert!(matches!(err, DocumentError::UnrecognizedShape));
}
