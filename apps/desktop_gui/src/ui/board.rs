//! Kanban board view: one column per stage, task groups inside, draggable
//! step cards. All edits are collected as actions during painting and applied
//! to the tree afterwards, so the painted frame always shows one consistent
//! tree generation.

use eframe::egui;
use map_core::{apply_drop, container_id, DropResult, PerformerRegistry};
use shared::domain::{Stage, StageId, Step, StepId, Task, TaskId};

use crate::ui::{
    app::{JourneyBoardApp, Modal},
    theme::{self, BoardPalette},
};

const STAGE_COLUMN_WIDTH: f32 = 280.0;
const CARD_INNER_WIDTH: f32 = 236.0;

/// Payload attached to a dragged step card.
#[derive(Debug, Clone)]
struct DragStep {
    step_id: StepId,
    container: String,
    index: usize,
}

enum BoardAction {
    AddStage,
    RenameStage(StageId, String),
    DeleteStage(StageId, String),
    AddTask(StageId),
    RenameTask(StageId, TaskId, String),
    DeleteTask(StageId, TaskId, String),
    AddStep(StageId, TaskId),
    EditStep(StageId, TaskId, StepId),
    DeleteStep(StageId, TaskId, StepId),
    Drop(DropResult),
}

impl JourneyBoardApp {
    pub(crate) fn show_board_central_panel(&mut self, ctx: &egui::Context) {
        let palette = theme::board_palette(self.theme.preset);
        let text_scale = self.text_scale;
        let stages = self.tree.stages().to_vec();
        let mut actions: Vec<BoardAction> = Vec::new();

        {
            let registry = &self.registry;
            egui::CentralPanel::default()
                .frame(
                    egui::Frame::new()
                        .fill(palette.canvas_bg)
                        .inner_margin(egui::Margin::same(10)),
                )
                .show(ctx, |ui| {
                    egui::ScrollArea::both()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.horizontal_top(|ui| {
                                for stage in &stages {
                                    show_stage_column(
                                        ui,
                                        stage,
                                        registry,
                                        &palette,
                                        text_scale,
                                        &mut actions,
                                    );
                                }
                                ui.vertical(|ui| {
                                    ui.set_width(160.0);
                                    if ui.button("➕ Add stage").clicked() {
                                        actions.push(BoardAction::AddStage);
                                    }
                                    if stages.is_empty() {
                                        ui.weak("Start by adding a stage.");
                                    }
                                });
                            });
                        });
                });
        }

        for action in actions {
            self.apply_board_action(action);
        }
    }

    fn apply_board_action(&mut self, action: BoardAction) {
        match action {
            BoardAction::AddStage => {
                self.modal = Some(Modal::StageName {
                    stage_id: None,
                    draft: String::new(),
                });
            }
            BoardAction::RenameStage(stage_id, current) => {
                self.modal = Some(Modal::StageName {
                    stage_id: Some(stage_id),
                    draft: current,
                });
            }
            BoardAction::DeleteStage(stage_id, name) => {
                self.modal = Some(Modal::ConfirmDeleteStage { stage_id, name });
            }
            BoardAction::AddTask(stage_id) => {
                self.modal = Some(Modal::TaskName {
                    stage_id,
                    task_id: None,
                    draft: String::new(),
                });
            }
            BoardAction::RenameTask(stage_id, task_id, current) => {
                self.modal = Some(Modal::TaskName {
                    stage_id,
                    task_id: Some(task_id),
                    draft: current,
                });
            }
            BoardAction::DeleteTask(stage_id, task_id, name) => {
                self.modal = Some(Modal::ConfirmDeleteTask {
                    stage_id,
                    task_id,
                    name,
                });
            }
            BoardAction::AddStep(stage_id, task_id) => {
                self.open_step_editor(stage_id, task_id, None);
            }
            BoardAction::EditStep(stage_id, task_id, step_id) => {
                self.open_step_editor(stage_id, task_id, Some(step_id));
            }
            BoardAction::DeleteStep(stage_id, task_id, step_id) => {
                let result = self.tree.delete_step(&stage_id, &task_id, &step_id);
                self.apply_tree(result);
            }
            BoardAction::Drop(drop) => {
                if let Some(next) = apply_drop(&self.tree, &drop) {
                    self.tree = next;
                }
            }
        }
    }
}

fn show_stage_column(
    ui: &mut egui::Ui,
    stage: &Stage,
    registry: &PerformerRegistry,
    palette: &BoardPalette,
    text_scale: f32,
    actions: &mut Vec<BoardAction>,
) {
    ui.vertical(|ui| {
        ui.set_width(STAGE_COLUMN_WIDTH);

        egui::Frame::new()
            .fill(palette.stage_header_bg)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&stage.name)
                            .color(palette.text_strong)
                            .strong()
                            .size(15.0 * text_scale),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text("Delete stage").clicked() {
                            actions.push(BoardAction::DeleteStage(
                                stage.id.clone(),
                                stage.name.clone(),
                            ));
                        }
                        if ui.small_button("✏").on_hover_text("Rename stage").clicked() {
                            actions.push(BoardAction::RenameStage(
                                stage.id.clone(),
                                stage.name.clone(),
                            ));
                        }
                    });
                });
            });

        ui.add_space(6.0);

        for task in &stage.tasks {
            show_task_group(ui, stage, task, registry, palette, text_scale, actions);
            ui.add_space(6.0);
        }

        if ui.button("➕ Task").clicked() {
            actions.push(BoardAction::AddTask(stage.id.clone()));
        }
    });
    ui.add_space(8.0);
}

fn show_task_group(
    ui: &mut egui::Ui,
    stage: &Stage,
    task: &Task,
    registry: &PerformerRegistry,
    palette: &BoardPalette,
    text_scale: f32,
    actions: &mut Vec<BoardAction>,
) {
    let container = container_id(&stage.id, &task.id);
    let frame = egui::Frame::new()
        .fill(palette.task_header_bg)
        .stroke(egui::Stroke::new(1.0, palette.card_stroke))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(6));

    let (inner, payload) = ui.dnd_drop_zone::<DragStep, Vec<egui::Rect>>(frame, |ui| {
        ui.set_width(STAGE_COLUMN_WIDTH - 16.0);

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(&task.name)
                    .color(palette.text_strong)
                    .size(13.0 * text_scale),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("🗑").on_hover_text("Delete task").clicked() {
                    actions.push(BoardAction::DeleteTask(
                        stage.id.clone(),
                        task.id.clone(),
                        task.name.clone(),
                    ));
                }
                if ui.small_button("✏").on_hover_text("Rename task").clicked() {
                    actions.push(BoardAction::RenameTask(
                        stage.id.clone(),
                        task.id.clone(),
                        task.name.clone(),
                    ));
                }
                if ui.small_button("➕").on_hover_text("Add step").clicked() {
                    actions.push(BoardAction::AddStep(stage.id.clone(), task.id.clone()));
                }
            });
        });

        let mut card_rects = Vec::with_capacity(task.steps.len());
        for (index, step) in task.steps.iter().enumerate() {
            let rect = show_step_card(
                ui, stage, task, step, index, &container, registry, palette, text_scale, actions,
            );
            card_rects.push(rect);
        }
        if task.steps.is_empty() {
            ui.weak("No steps yet — drop one here");
        }
        card_rects
    });

    if let Some(payload) = payload {
        let pointer_y = ui
            .ctx()
            .input(|i| i.pointer.latest_pos())
            .map(|pos| pos.y)
            .unwrap_or(f32::MAX);
        let card_rects = inner.inner;
        let mut dest_index = card_rects
            .iter()
            .filter(|rect| rect.center().y < pointer_y)
            .count();
        // Same-list drops report the index after removal.
        if payload.container == container && dest_index > payload.index {
            dest_index -= 1;
        }
        actions.push(BoardAction::Drop(DropResult {
            dragged_id: payload.step_id.clone(),
            source_container_id: payload.container.clone(),
            source_index: payload.index,
            dest_container_id: Some(container),
            dest_index,
        }));
    }
}

#[allow(clippy::too_many_arguments)]
fn show_step_card(
    ui: &mut egui::Ui,
    stage: &Stage,
    task: &Task,
    step: &Step,
    index: usize,
    container: &str,
    registry: &PerformerRegistry,
    palette: &BoardPalette,
    text_scale: f32,
    actions: &mut Vec<BoardAction>,
) -> egui::Rect {
    let source_id = egui::Id::new(("step_card", step.id.as_str()));
    let payload = DragStep {
        step_id: step.id.clone(),
        container: container.to_string(),
        index,
    };

    let response = ui
        .dnd_drag_source(source_id, payload, |ui| {
            egui::Frame::new()
                .fill(palette.card_bg)
                .stroke(egui::Stroke::new(1.0, palette.card_stroke))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(CARD_INNER_WIDTH);

                    let title = if step.description.is_empty() {
                        "(untitled step)"
                    } else {
                        step.description.as_str()
                    };
                    ui.label(
                        egui::RichText::new(title)
                            .color(palette.text_strong)
                            .size(13.0 * text_scale),
                    );

                    if !step.performer_ids.is_empty() {
                        ui.horizontal_wrapped(|ui| {
                            for id in &step.performer_ids {
                                if let Some(performer) = registry.get(id) {
                                    ui.label(
                                        egui::RichText::new(format!("● {}", performer.name))
                                            .color(theme::performer_color(&performer.color_hex))
                                            .size(11.0 * text_scale),
                                    );
                                }
                            }
                        });
                    }

                    ui.horizontal(|ui| {
                        entry_count_badge(ui, step.pain_points.len(), palette.pain_bg, "pain points");
                        entry_count_badge(
                            ui,
                            step.opportunities.len(),
                            palette.opportunity_bg,
                            "opportunities",
                        );
                        entry_count_badge(
                            ui,
                            step.current_experiences.len(),
                            palette.experience_bg,
                            "experiences",
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete step").clicked() {
                                actions.push(BoardAction::DeleteStep(
                                    stage.id.clone(),
                                    task.id.clone(),
                                    step.id.clone(),
                                ));
                            }
                            if ui.small_button("✏").on_hover_text("Edit step").clicked() {
                                actions.push(BoardAction::EditStep(
                                    stage.id.clone(),
                                    task.id.clone(),
                                    step.id.clone(),
                                ));
                            }
                        });
                    });
                });
        })
        .response;

    if response.double_clicked() {
        actions.push(BoardAction::EditStep(
            stage.id.clone(),
            task.id.clone(),
            step.id.clone(),
        ));
    }
    response.rect
}

fn entry_count_badge(ui: &mut egui::Ui, count: usize, fill: egui::Color32, hover: &str) {
    if count == 0 {
        return;
    }
    egui::Frame::new()
        .fill(fill)
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(5, 1))
        .show(ui, |ui| {
            ui.small(count.to_string());
        })
        .response
        .on_hover_text(hover);
}
