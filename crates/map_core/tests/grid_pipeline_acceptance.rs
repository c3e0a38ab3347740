//! End-to-end pass over the whole core: import a legacy document, mutate the
//! tree through the drag path, aggregate, and drive the highlight machine off
//! the aggregator output.

use map_core::{
    aggregate, apply_drop, container_id, Column, DropResult, HighlightEngine, JourneyTree,
    PerformerFilter, PerformerRegistry, PlaceholderReason,
};
use shared::{domain::EntryKind, persist};

const LEGACY_DOCUMENT: &str = r##"{
    "performers": [
        {"id": "customer", "name": "Customer", "colorHex": "#e8590c", "isDefault": true},
        {"id": "agent", "name": "Support agent", "colorHex": "#1c7ed6", "isDefault": false}
    ],
    "stages": [
        {
            "id": "stage-awareness",
            "name": {"name": "Awareness"},
            "tasks": [
                {
                    "id": "task-discover",
                    "name": "Discover the product",
                    "steps": [
                        {
                            "id": "step-ad",
                            "description": "See a social media ad",
                            "personaId": "customer",
                            "painPoints": ["Ad feels generic"],
                            "opportunities": ["Targeted landing page"]
                        },
                        {
                            "id": "step-review",
                            "description": "Read third-party reviews",
                            "jobPerformerIds": ["customer"],
                            "currentExperiences": ["Trusts aggregator sites"]
                        }
                    ]
                }
            ]
        },
        {
            "id": "stage-support",
            "name": "Support",
            "tasks": [
                {"id": "task-contact", "name": "Contact support", "steps": []}
            ]
        }
    ]
}"##;

#[test]
fn legacy_document_flows_through_drag_aggregate_and_highlight() {
    let document = persist::parse_document(LEGACY_DOCUMENT).expect("parse legacy document");
    let registry = PerformerRegistry::with_performers(document.performers.clone());
    let tree = JourneyTree::from_stages(document.stages.clone());

    // Normalization happened at the boundary: names are plain strings and the
    // legacy personaId is folded into the performer id list.
    assert_eq!(tree.stages()[0].name, "Awareness");
    let ad_step = &tree.stages()[0].tasks[0].steps[0];
    assert_eq!(ad_step.performer_ids.len(), 1);

    // Drag the ad step into the empty support task.
    let awareness = tree.stages()[0].id.clone();
    let discover = tree.stages()[0].tasks[0].id.clone();
    let support = tree.stages()[1].id.clone();
    let contact = tree.stages()[1].tasks[0].id.clone();
    let ad_step_id = ad_step.id.clone();

    let tree = apply_drop(
        &tree,
        &DropResult {
            dragged_id: ad_step_id.clone(),
            source_container_id: container_id(&awareness, &discover),
            source_index: 0,
            dest_container_id: Some(container_id(&support, &contact)),
            dest_index: 0,
        },
    )
    .expect("drop applies");
    assert_eq!(tree.step_count(), 2);

    // Aggregate unfiltered: one step column per remaining step, no
    // placeholders left because the support task gained a step.
    let layout = aggregate(&tree, &registry, &PerformerFilter::default());
    assert_eq!(layout.columns.len(), 2);
    assert_eq!(layout.stage_spans.len(), 2);
    assert!(layout
        .columns
        .iter()
        .all(|column| matches!(column, Column::Step { .. })));

    // Filter to the agent: every step belongs to the customer, so both tasks
    // collapse to filtered placeholders and the spans still tile.
    let mut filter = PerformerFilter::default();
    filter.toggle_performer(shared::domain::PerformerId::from("agent"));
    let layout = aggregate(&tree, &registry, &filter);
    assert_eq!(layout.columns.len(), 2);
    assert!(layout.columns.iter().all(|column| matches!(
        column,
        Column::Placeholder {
            reason: PlaceholderReason::Filtered,
            ..
        }
    )));
    let total: usize = layout.task_spans.iter().map(|span| span.width).sum();
    assert_eq!(total, layout.columns.len());

    // Click the moved step's pain point in the unfiltered layout; the detail
    // notification reflects its new ancestry.
    let mut engine = HighlightEngine::new();
    let detail = engine
        .click_entry(&tree, ad_step_id, EntryKind::PainPoint, 0)
        .expect("selection notifies");
    assert_eq!(detail.text, "Ad feels generic");
    assert_eq!(detail.stage_name, "Support");
    assert_eq!(detail.task_name, "Contact support");

    // Export round-trip keeps the mutated tree.
    let rendered = persist::render_document(&persist::MapDocument {
        saved_at: None,
        performers: registry.all().to_vec(),
        stages: tree.stages().to_vec(),
    })
    .expect("render");
    let reparsed = persist::parse_document(&rendered).expect("reparse");
    assert_eq!(reparsed.stages, tree.stages().to_vec());
}
