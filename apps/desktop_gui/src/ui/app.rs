//! App shell: state, update loop, menus, modals and the side detail panel.
//!
//! The board/grid canvases live in the sibling `board` and `grid` modules;
//! everything that mutates the tree funnels through the helpers here so a
//! rejected mutation surfaces in the status strip instead of panicking.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use map_core::{
    aggregate, EntryDetail, GridLayout, HighlightEngine, JourneyTree, PerformerFilter,
    PerformerRegistry, Size, ViewportController,
};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{
        EntryKind, Performer, PerformerId, StageId, StepDraft, StepId, StepPatch, TaskId, TaskPatch,
    },
    error::TreeError,
    persist::MapDocument,
};

use crate::{
    controller::{events::UiEvent, orchestration::dispatch_file_command},
    file_bridge::commands::FileCommand,
    ui::theme::{self, ThemePreset, ThemeSettings},
};

pub const SETTINGS_STORAGE_KEY: &str = "journey_board_desktop_settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewMode {
    Board,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    theme_preset: ThemePreset,
    accent_color: [u8; 4],
    panel_rounding: u8,
    text_scale: f32,
    show_detail_panel: bool,
    last_file: Option<PathBuf>,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        let theme = ThemeSettings::slate_default();
        Self {
            theme_preset: theme.preset,
            accent_color: [
                theme.accent_color.r(),
                theme.accent_color.g(),
                theme.accent_color.b(),
                theme.accent_color.a(),
            ],
            panel_rounding: theme.panel_rounding,
            text_scale: 1.0,
            show_detail_panel: true,
            last_file: None,
        }
    }
}

impl PersistedSettings {
    fn into_runtime(self) -> (ThemeSettings, f32, bool, Option<PathBuf>) {
        (
            ThemeSettings {
                preset: self.theme_preset,
                accent_color: egui::Color32::from_rgba_unmultiplied(
                    self.accent_color[0],
                    self.accent_color[1],
                    self.accent_color[2],
                    self.accent_color[3],
                ),
                panel_rounding: self.panel_rounding.min(16),
            },
            self.text_scale.clamp(0.8, 1.4),
            self.show_detail_panel,
            self.last_file,
        )
    }

    fn from_runtime(
        theme: ThemeSettings,
        text_scale: f32,
        show_detail_panel: bool,
        last_file: Option<PathBuf>,
    ) -> Self {
        Self {
            theme_preset: theme.preset,
            accent_color: [
                theme.accent_color.r(),
                theme.accent_color.g(),
                theme.accent_color.b(),
                theme.accent_color.a(),
            ],
            panel_rounding: theme.panel_rounding,
            text_scale: text_scale.clamp(0.8, 1.4),
            show_detail_panel,
            last_file,
        }
    }
}

pub(crate) struct StepEditorState {
    pub stage_id: StageId,
    pub task_id: TaskId,
    /// `None` while adding a new step.
    pub step_id: Option<StepId>,
    pub description: String,
    pub insight: String,
    pub performer_ids: Vec<PerformerId>,
    pub pain_points: Vec<String>,
    pub opportunities: Vec<String>,
    pub current_experiences: Vec<String>,
    pub new_entry_drafts: [String; 3],
}

impl StepEditorState {
    pub fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<String> {
        match kind {
            EntryKind::PainPoint => &mut self.pain_points,
            EntryKind::Opportunity => &mut self.opportunities,
            EntryKind::CurrentExperience => &mut self.current_experiences,
        }
    }

    fn new_entry_slot(&mut self, kind: EntryKind) -> &mut String {
        let slot = match kind {
            EntryKind::PainPoint => 0,
            EntryKind::Opportunity => 1,
            EntryKind::CurrentExperience => 2,
        };
        &mut self.new_entry_drafts[slot]
    }
}

pub(crate) enum Modal {
    StageName {
        stage_id: Option<StageId>,
        draft: String,
    },
    TaskName {
        stage_id: StageId,
        task_id: Option<TaskId>,
        draft: String,
    },
    StepEditor(StepEditorState),
    ConfirmDeleteStage {
        stage_id: StageId,
        name: String,
    },
    ConfirmDeleteTask {
        stage_id: StageId,
        task_id: TaskId,
        name: String,
    },
}

pub(crate) struct PerformerManagerState {
    pub drafts: Vec<Performer>,
    pub new_name: String,
    pub new_color: egui::Color32,
}

pub struct JourneyBoardApp {
    cmd_tx: Sender<FileCommand>,
    ui_rx: Receiver<UiEvent>,

    pub(crate) tree: JourneyTree,
    pub(crate) registry: PerformerRegistry,
    pub(crate) filter: PerformerFilter,
    pub(crate) highlight: HighlightEngine,
    pub(crate) viewport: ViewportController,

    pub(crate) view_mode: ViewMode,
    pub(crate) theme: ThemeSettings,
    pub(crate) text_scale: f32,
    applied_theme: Option<ThemeSettings>,

    pub(crate) current_file: Option<PathBuf>,
    pub(crate) status: String,
    pub(crate) modal: Option<Modal>,
    pub(crate) performer_manager: Option<PerformerManagerState>,
    pub(crate) entry_detail: Option<EntryDetail>,
    pub(crate) entry_draft: String,
    pub(crate) show_detail_panel: bool,

    /// Measured content/viewport sizes from the last grid paint, for
    /// fit-to-view.
    pub(crate) grid_content: Size,
    pub(crate) grid_viewport: Size,
}

impl JourneyBoardApp {
    pub fn new(
        cmd_tx: Sender<FileCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedSettings>,
        startup_file: Option<PathBuf>,
    ) -> Self {
        let (theme, text_scale, show_detail_panel, last_file) = persisted_settings
            .unwrap_or_default()
            .into_runtime();

        let mut app = Self {
            cmd_tx,
            ui_rx,
            tree: JourneyTree::new(),
            registry: PerformerRegistry::new(),
            filter: PerformerFilter::default(),
            highlight: HighlightEngine::new(),
            viewport: ViewportController::new(),
            view_mode: ViewMode::Board,
            theme,
            text_scale,
            applied_theme: None,
            current_file: None,
            status: "Ready".to_string(),
            modal: None,
            performer_manager: None,
            entry_detail: None,
            entry_draft: String::new(),
            show_detail_panel,
            grid_content: Size::default(),
            grid_viewport: Size::default(),
        };

        if let Some(path) = startup_file.or(last_file) {
            app.request_load(path);
        }
        app
    }

    // ----- events and file plumbing -----

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::DocumentLoaded { path, document } => {
                    self.tree = JourneyTree::from_stages(document.stages);
                    self.registry.replace_all(document.performers);
                    self.filter.clear();
                    self.highlight.clear();
                    self.entry_detail = None;
                    self.viewport.reset_zoom();
                    self.status = format!("Opened {}", path.display());
                    self.current_file = Some(path);
                }
                UiEvent::DocumentSaved { path, saved_at } => {
                    self.status = format!(
                        "Saved {} at {}",
                        path.display(),
                        saved_at.format("%H:%M:%S")
                    );
                    self.current_file = Some(path);
                }
                UiEvent::Error(err) => {
                    self.status = err.banner_text();
                }
            }
        }
    }

    fn document_from_state(&self) -> MapDocument {
        MapDocument {
            saved_at: None,
            performers: self.registry.all().to_vec(),
            stages: self.tree.stages().to_vec(),
        }
    }

    fn request_load(&mut self, path: PathBuf) {
        dispatch_file_command(
            &self.cmd_tx,
            FileCommand::LoadDocument { path },
            &mut self.status,
        );
    }

    fn request_save(&mut self, path: PathBuf) {
        dispatch_file_command(
            &self.cmd_tx,
            FileCommand::SaveDocument {
                path,
                document: self.document_from_state(),
            },
            &mut self.status,
        );
    }

    fn dialog_directory(&self) -> PathBuf {
        self.current_file
            .as_ref()
            .and_then(|path| path.parent().map(PathBuf::from))
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn open_map_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Journey map", &["json"])
            .set_directory(self.dialog_directory())
            .pick_file();
        if let Some(path) = picked {
            self.request_load(path);
        }
    }

    fn save_map(&mut self) {
        match self.current_file.clone() {
            Some(path) => self.request_save(path),
            None => self.save_map_as(),
        }
    }

    fn save_map_as(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Journey map", &["json"])
            .set_directory(self.dialog_directory())
            .set_file_name("journey-map.json")
            .save_file();
        if let Some(path) = picked {
            self.request_save(path);
        }
    }

    fn new_map(&mut self) {
        self.tree = JourneyTree::new();
        self.registry.replace_all(Vec::new());
        self.filter.clear();
        self.highlight.clear();
        self.entry_detail = None;
        self.viewport.reset_zoom();
        self.current_file = None;
        self.status = "New map".to_string();
    }

    // ----- tree mutation funnel -----

    pub(crate) fn apply_tree(&mut self, result: Result<JourneyTree, TreeError>) {
        match result {
            Ok(next) => self.tree = next,
            Err(err) => self.status = format!("Edit rejected: {err}"),
        }
    }

    pub(crate) fn open_entry_detail(&mut self, detail: EntryDetail) {
        self.entry_draft = detail.text.clone();
        self.entry_detail = Some(detail);
        self.show_detail_panel = true;
    }

    fn apply_entry_edit(&mut self) {
        let Some(detail) = self.entry_detail.clone() else {
            return;
        };
        let Some((stage_id, task_id)) = self
            .tree
            .locate_step(&detail.step_id)
            .map(|(stage, task, _)| (stage.id.clone(), task.id.clone()))
        else {
            self.status = "Entry no longer exists".to_string();
            self.entry_detail = None;
            return;
        };
        let result = self.tree.update_step_entry(
            &stage_id,
            &task_id,
            &detail.step_id,
            detail.kind,
            detail.index,
            self.entry_draft.clone(),
        );
        if result.is_ok() {
            if let Some(detail) = self.entry_detail.as_mut() {
                detail.text = self.entry_draft.clone();
            }
            self.status = "Entry updated".to_string();
        }
        self.apply_tree(result);
    }

    // ----- panels -----

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_top_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New map").clicked() {
                        self.new_map();
                        ui.close();
                    }
                    if ui.button("Open…").clicked() {
                        self.open_map_dialog();
                        ui.close();
                    }
                    if ui.button("Save").clicked() {
                        self.save_map();
                        ui.close();
                    }
                    if ui.button("Save as…").clicked() {
                        self.save_map_as();
                        ui.close();
                    }
                });

                ui.separator();

                if ui
                    .selectable_label(self.view_mode == ViewMode::Board, "Board")
                    .clicked()
                {
                    self.view_mode = ViewMode::Board;
                }
                if ui
                    .selectable_label(self.view_mode == ViewMode::Grid, "Grid")
                    .clicked()
                {
                    self.view_mode = ViewMode::Grid;
                }

                ui.separator();

                if ui.button("➕ Stage").clicked() {
                    self.modal = Some(Modal::StageName {
                        stage_id: None,
                        draft: String::new(),
                    });
                }
                if ui.button("Performers").clicked() {
                    self.toggle_performer_manager();
                }

                ui.separator();
                self.show_zoom_controls(ui);
                ui.separator();
                self.show_filter_chips(ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.menu_button("View", |ui| {
                        for preset in ThemePreset::all() {
                            if ui
                                .selectable_label(self.theme.preset == preset, preset.label())
                                .clicked()
                            {
                                self.theme.preset = preset;
                                ui.close();
                            }
                        }
                        ui.separator();
                        ui.add(
                            egui::Slider::new(&mut self.text_scale, 0.8..=1.4).text("Text scale"),
                        );
                        ui.checkbox(&mut self.show_detail_panel, "Detail panel");
                    });
                });
            });
        });
    }

    fn show_zoom_controls(&mut self, ui: &mut egui::Ui) {
        if ui.button("−").on_hover_text("Zoom out").clicked() {
            self.viewport.zoom_out();
        }
        ui.label(format!("{:.0}%", self.viewport.zoom() * 100.0));
        if ui.button("＋").on_hover_text("Zoom in").clicked() {
            self.viewport.zoom_in();
        }
        if ui.button("1:1").on_hover_text("Reset zoom").clicked() {
            self.viewport.reset_zoom();
        }
        if ui.button("Fit").on_hover_text("Fit map to window").clicked() {
            self.viewport.fit_to_view(self.grid_content, self.grid_viewport);
        }
    }

    fn show_filter_chips(&mut self, ui: &mut egui::Ui) {
        ui.label("Filter:");
        let performers: Vec<Performer> = self.registry.all().to_vec();
        for performer in performers {
            let selected = self.filter.ids.contains(&performer.id);
            let chip = egui::Button::new(
                egui::RichText::new(&performer.name).color(egui::Color32::WHITE),
            )
            .fill(if selected {
                theme::performer_color(&performer.color_hex)
            } else {
                theme::performer_color(&performer.color_hex).gamma_multiply(0.35)
            });
            if ui.add(chip).clicked() {
                self.filter.toggle_performer(performer.id.clone());
            }
        }
        if ui
            .selectable_label(self.filter.include_unassigned, "Unassigned")
            .clicked()
        {
            self.filter.toggle_unassigned();
        }
        if !self.filter.is_empty() && ui.small_button("✕ clear").clicked() {
            self.filter.clear();
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("app_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(egui::RichText::new(&self.status).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let counts = format!(
                        "{} stages · {} steps",
                        self.tree.stages().len(),
                        self.tree.step_count()
                    );
                    ui.small(counts);
                    if let Some(path) = &self.current_file {
                        ui.small(path.display().to_string());
                    }
                });
            });
        });
    }

    fn show_detail_side_panel(&mut self, ctx: &egui::Context) {
        if !self.show_detail_panel || self.entry_detail.is_none() {
            return;
        }
        egui::SidePanel::right("entry_detail_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                let Some(detail) = self.entry_detail.clone() else {
                    return;
                };
                ui.heading(detail.kind.label());
                ui.add_space(4.0);
                ui.weak(format!("{} › {}", detail.stage_name, detail.task_name));
                ui.label(egui::RichText::new(&detail.step_description).strong());
                ui.separator();

                ui.add(
                    egui::TextEdit::multiline(&mut self.entry_draft)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.apply_entry_edit();
                    }
                    if ui.button("Close").clicked() {
                        self.entry_detail = None;
                        self.highlight.clear();
                    }
                });
            });
    }

    // ----- performer manager -----

    fn toggle_performer_manager(&mut self) {
        self.performer_manager = match self.performer_manager {
            Some(_) => None,
            None => Some(PerformerManagerState {
                drafts: self.registry.all().to_vec(),
                new_name: String::new(),
                new_color: egui::Color32::from_rgb(0x4c, 0x6e, 0xf5),
            }),
        };
    }

    fn show_performer_manager(&mut self, ctx: &egui::Context) {
        let Some(state) = self.performer_manager.as_mut() else {
            return;
        };
        let mut open = true;
        let mut apply = false;
        egui::Window::new("Performers")
            .open(&mut open)
            .collapsible(false)
            .default_width(340.0)
            .show(ctx, |ui| {
                let mut remove_at = None;
                for (index, draft) in state.drafts.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        let mut color = theme::performer_color(&draft.color_hex);
                        if ui.color_edit_button_srgba(&mut color).changed() {
                            draft.color_hex = theme::hex_from_color(color);
                        }
                        ui.add(
                            egui::TextEdit::singleline(&mut draft.name).desired_width(140.0),
                        );
                        ui.checkbox(&mut draft.is_default, "default");
                        if ui.small_button("✕").clicked() {
                            remove_at = Some(index);
                        }
                    });
                }
                if let Some(index) = remove_at {
                    state.drafts.remove(index);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.color_edit_button_srgba(&mut state.new_color);
                    ui.add(
                        egui::TextEdit::singleline(&mut state.new_name)
                            .hint_text("New performer")
                            .desired_width(140.0),
                    );
                    if ui.button("Add").clicked() && !state.new_name.trim().is_empty() {
                        let name = state.new_name.trim().to_string();
                        state.drafts.push(Performer::new(
                            name,
                            theme::hex_from_color(state.new_color),
                        ));
                        state.new_name.clear();
                    }
                });

                ui.add_space(8.0);
                if ui.button("Apply changes").clicked() {
                    apply = true;
                }
            });

        if apply {
            let drafts = state.drafts.clone();
            self.registry.replace_all(drafts);
            self.status = "Performers updated".to_string();
        }
        if !open {
            self.performer_manager = None;
        }
    }

    // ----- modals -----

    pub(crate) fn open_step_editor(
        &mut self,
        stage_id: StageId,
        task_id: TaskId,
        step_id: Option<StepId>,
    ) {
        let state = match &step_id {
            Some(id) => {
                let Some(step) = self.tree.find_step(&stage_id, &task_id, id) else {
                    self.status = "Step no longer exists".to_string();
                    return;
                };
                StepEditorState {
                    stage_id,
                    task_id,
                    step_id: step_id.clone(),
                    description: step.description.clone(),
                    insight: step.insight.clone(),
                    performer_ids: step.performer_ids.clone(),
                    pain_points: step.pain_points.clone(),
                    opportunities: step.opportunities.clone(),
                    current_experiences: step.current_experiences.clone(),
                    new_entry_drafts: [String::new(), String::new(), String::new()],
                }
            }
            None => StepEditorState {
                stage_id,
                task_id,
                step_id: None,
                description: String::new(),
                insight: String::new(),
                performer_ids: Vec::new(),
                pain_points: Vec::new(),
                opportunities: Vec::new(),
                current_experiences: Vec::new(),
                new_entry_drafts: [String::new(), String::new(), String::new()],
            },
        };
        self.modal = Some(Modal::StepEditor(state));
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        match modal {
            Modal::StageName { stage_id, mut draft } => {
                let title = if stage_id.is_some() {
                    "Rename stage"
                } else {
                    "Add stage"
                };
                match show_name_modal(ctx, title, &mut draft) {
                    NameModalOutcome::Save => {
                        let name = draft.trim().to_string();
                        if name.is_empty() {
                            self.modal = Some(Modal::StageName { stage_id, draft });
                        } else {
                            match &stage_id {
                                Some(id) => {
                                    let result = self.tree.rename_stage(id, name);
                                    self.apply_tree(result);
                                }
                                None => {
                                    let (next, _) = self.tree.add_stage(name);
                                    self.tree = next;
                                }
                            }
                        }
                    }
                    NameModalOutcome::Cancel => {}
                    NameModalOutcome::Pending => {
                        self.modal = Some(Modal::StageName { stage_id, draft });
                    }
                }
            }
            Modal::TaskName {
                stage_id,
                task_id,
                mut draft,
            } => {
                let title = if task_id.is_some() {
                    "Rename task"
                } else {
                    "Add task"
                };
                match show_name_modal(ctx, title, &mut draft) {
                    NameModalOutcome::Save => {
                        let name = draft.trim().to_string();
                        if name.is_empty() {
                            self.modal = Some(Modal::TaskName {
                                stage_id,
                                task_id,
                                draft,
                            });
                        } else {
                            match &task_id {
                                Some(id) => {
                                    let result = self.tree.update_task(
                                        &stage_id,
                                        id,
                                        TaskPatch {
                                            name: Some(name),
                                            ..TaskPatch::default()
                                        },
                                    );
                                    self.apply_tree(result);
                                }
                                None => {
                                    let result = self
                                        .tree
                                        .add_task(&stage_id, name, Vec::new())
                                        .map(|(next, _)| next);
                                    self.apply_tree(result);
                                }
                            }
                        }
                    }
                    NameModalOutcome::Cancel => {}
                    NameModalOutcome::Pending => {
                        self.modal = Some(Modal::TaskName {
                            stage_id,
                            task_id,
                            draft,
                        });
                    }
                }
            }
            Modal::StepEditor(state) => self.show_step_editor(ctx, state),
            Modal::ConfirmDeleteStage { stage_id, name } => {
                match show_confirm_modal(ctx, "Delete stage", &name) {
                    ConfirmOutcome::Confirm => {
                        let result = self.tree.delete_stage(&stage_id);
                        self.apply_tree(result);
                    }
                    ConfirmOutcome::Cancel => {}
                    ConfirmOutcome::Pending => {
                        self.modal = Some(Modal::ConfirmDeleteStage { stage_id, name });
                    }
                }
            }
            Modal::ConfirmDeleteTask {
                stage_id,
                task_id,
                name,
            } => match show_confirm_modal(ctx, "Delete task", &name) {
                ConfirmOutcome::Confirm => {
                    let result = self.tree.delete_task(&stage_id, &task_id);
                    self.apply_tree(result);
                }
                ConfirmOutcome::Cancel => {}
                ConfirmOutcome::Pending => {
                    self.modal = Some(Modal::ConfirmDeleteTask {
                        stage_id,
                        task_id,
                        name,
                    });
                }
            },
        }
    }

    fn show_step_editor(&mut self, ctx: &egui::Context, mut state: StepEditorState) {
        let mut outcome = NameModalOutcome::Pending;
        let performers: Vec<Performer> = self.registry.all().to_vec();

        egui::Window::new(if state.step_id.is_some() {
            "Edit step"
        } else {
            "Add step"
        })
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.label("Description");
            ui.add(
                egui::TextEdit::multiline(&mut state.description)
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(6.0);
            ui.label("Performers");
            ui.horizontal_wrapped(|ui| {
                for performer in &performers {
                    let mut assigned = state.performer_ids.contains(&performer.id);
                    if ui.checkbox(&mut assigned, &performer.name).changed() {
                        if assigned {
                            state.performer_ids.push(performer.id.clone());
                        } else {
                            state.performer_ids.retain(|id| id != &performer.id);
                        }
                    }
                }
                if performers.is_empty() {
                    ui.weak("none defined yet");
                }
            });

            for kind in [
                EntryKind::PainPoint,
                EntryKind::Opportunity,
                EntryKind::CurrentExperience,
            ] {
                ui.add_space(6.0);
                ui.label(kind.label());
                show_entry_list_editor(ui, &mut state, kind);
            }

            ui.add_space(6.0);
            ui.label("Insight");
            ui.add(
                egui::TextEdit::multiline(&mut state.insight)
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    outcome = NameModalOutcome::Save;
                }
                if ui.button("Cancel").clicked() {
                    outcome = NameModalOutcome::Cancel;
                }
            });
        });

        match outcome {
            NameModalOutcome::Save => {
                match &state.step_id {
                    Some(step_id) => {
                        let result = self.tree.update_step(
                            &state.stage_id,
                            &state.task_id,
                            step_id,
                            StepPatch {
                                description: Some(state.description.clone()),
                                performer_ids: Some(state.performer_ids.clone()),
                                pain_points: Some(state.pain_points.clone()),
                                opportunities: Some(state.opportunities.clone()),
                                current_experiences: Some(state.current_experiences.clone()),
                                insight: Some(state.insight.clone()),
                            },
                        );
                        self.apply_tree(result);
                    }
                    None => {
                        let result = self
                            .tree
                            .add_step(
                                &state.task_id,
                                StepDraft {
                                    description: state.description.clone(),
                                    performer_ids: state.performer_ids.clone(),
                                    pain_points: state.pain_points.clone(),
                                    opportunities: state.opportunities.clone(),
                                    current_experiences: state.current_experiences.clone(),
                                    insight: state.insight.clone(),
                                },
                            )
                            .map(|(next, _)| next);
                        self.apply_tree(result);
                    }
                }
            }
            NameModalOutcome::Cancel => {}
            NameModalOutcome::Pending => self.modal = Some(Modal::StepEditor(state)),
        }
    }
}

enum NameModalOutcome {
    Save,
    Cancel,
    Pending,
}

enum ConfirmOutcome {
    Confirm,
    Cancel,
    Pending,
}

fn show_name_modal(ctx: &egui::Context, title: &str, draft: &mut String) -> NameModalOutcome {
    let mut outcome = NameModalOutcome::Pending;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::singleline(draft)
                    .hint_text("Name")
                    .desired_width(240.0),
            );
            response.request_focus();
            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() || enter {
                    outcome = NameModalOutcome::Save;
                }
                if ui.button("Cancel").clicked() {
                    outcome = NameModalOutcome::Cancel;
                }
            });
        });
    outcome
}

fn show_confirm_modal(ctx: &egui::Context, title: &str, name: &str) -> ConfirmOutcome {
    let mut outcome = ConfirmOutcome::Pending;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "Delete \"{name}\" and everything under it? This cannot be undone."
            ));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .button(egui::RichText::new("Delete").color(egui::Color32::LIGHT_RED))
                    .clicked()
                {
                    outcome = ConfirmOutcome::Confirm;
                }
                if ui.button("Cancel").clicked() {
                    outcome = ConfirmOutcome::Cancel;
                }
            });
        });
    outcome
}

fn show_entry_list_editor(ui: &mut egui::Ui, state: &mut StepEditorState, kind: EntryKind) {
    let mut reorder: Option<(usize, usize)> = None;
    let mut remove_at: Option<usize> = None;

    let len = state.entries_mut(kind).len();
    for index in 0..len {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(index > 0, egui::Button::new("↑").small())
                .clicked()
            {
                reorder = Some((index, index - 1));
            }
            if ui
                .add_enabled(index + 1 < len, egui::Button::new("↓").small())
                .clicked()
            {
                reorder = Some((index, index + 1));
            }
            if ui.small_button("✕").clicked() {
                remove_at = Some(index);
            }
            let entry = &mut state.entries_mut(kind)[index];
            ui.add(egui::TextEdit::singleline(entry).desired_width(f32::INFINITY));
        });
    }

    if let Some((from, to)) = reorder {
        let entries = state.entries_mut(kind);
        if let Some(next) = map_core::reorder_slice(entries, from, to) {
            *entries = next;
        }
    }
    if let Some(index) = remove_at {
        state.entries_mut(kind).remove(index);
    }

    ui.horizontal(|ui| {
        let draft = state.new_entry_slot(kind);
        let response = ui.add(
            egui::TextEdit::singleline(draft)
                .hint_text("Add…")
                .desired_width(220.0),
        );
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui.small_button("＋").clicked();
        if (submitted || clicked) && !draft.trim().is_empty() {
            let text = draft.trim().to_string();
            draft.clear();
            state.entries_mut(kind).push(text);
        }
    });
}

impl eframe::App for JourneyBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if self.applied_theme != Some(self.theme) {
            theme::apply_theme(ctx, self.theme);
            self.applied_theme = Some(self.theme);
        }

        // Escape closes the active modal first, then clears the highlight.
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if self.modal.is_some() {
                self.modal = None;
            } else if self.performer_manager.is_some() {
                self.performer_manager = None;
            } else {
                self.highlight.clear();
            }
        }

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_detail_side_panel(ctx);

        match self.view_mode {
            ViewMode::Board => self.show_board_central_panel(ctx),
            ViewMode::Grid => self.show_grid_central_panel(ctx),
        }

        self.show_modals(ctx);
        self.show_performer_manager(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings::from_runtime(
            self.theme,
            self.text_scale,
            self.show_detail_panel,
            self.current_file.clone(),
        );
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

/// The current aggregate layout; recomputed per frame, matching the render
/// pass contract of the aggregator.
impl JourneyBoardApp {
    pub(crate) fn current_layout(&self) -> GridLayout {
        aggregate(&self.tree, &self.registry, &self.filter)
    }
}
