//! Aggregate grid view: stage/task span header rows over one card column per
//! grid column, hand-painted under the viewport transform (translate then
//! scale, top-left origin). Clicks on cards and entries drive the highlight
//! engine; dragging the background pans; ctrl+wheel zooms around the cursor.

use eframe::egui;
use map_core::{Column, GridLayout, PlaceholderReason, Point, Size};
use shared::domain::{EntryKind, StepId};

use crate::ui::{
    app::JourneyBoardApp,
    theme::{self, BoardPalette},
};

const COL_W: f32 = 230.0;
const COL_GAP: f32 = 10.0;
const STAGE_ROW_H: f32 = 34.0;
const TASK_ROW_H: f32 = 26.0;
const ROW_GAP: f32 = 6.0;
const CARD_PAD: f32 = 8.0;
const PLACEHOLDER_H: f32 = 90.0;

enum GridHit {
    Step(StepId),
    Entry(StepId, EntryKind, usize),
}

fn card_radius(zoom: f32) -> egui::CornerRadius {
    egui::CornerRadius::same((6.0 * zoom).round().clamp(0.0, 255.0) as u8)
}

fn chip_radius(zoom: f32) -> egui::CornerRadius {
    egui::CornerRadius::same((4.0 * zoom).round().clamp(0.0, 255.0) as u8)
}

impl JourneyBoardApp {
    pub(crate) fn show_grid_central_panel(&mut self, ctx: &egui::Context) {
        let palette = theme::board_palette(self.theme.preset);
        let layout = self.current_layout();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(palette.canvas_bg))
            .show(ctx, |ui| {
                self.show_grid_canvas(ui, &layout, &palette);
            });
    }

    fn show_grid_canvas(&mut self, ui: &mut egui::Ui, layout: &GridLayout, palette: &BoardPalette) {
        let avail = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(avail, egui::Sense::click_and_drag());
        let painter = painter.with_clip_rect(response.rect);
        let origin = response.rect.min;
        self.grid_viewport = Size::new(avail.x as f64, avail.y as f64);

        // Modifier-wheel zoom anchored on the cursor. egui folds ctrl+wheel
        // (and pinch) into a multiplicative zoom_delta, so convert it back to
        // wheel ticks for the viewport.
        if ui.rect_contains_pointer(response.rect) {
            let (factor, hover) = ui.input(|i| (i.zoom_delta(), i.pointer.hover_pos()));
            if factor != 1.0 {
                if let Some(pos) = hover {
                    let anchor = Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
                    let ticks =
                        (factor as f64).ln() / map_core::viewport::WHEEL_ZOOM_FACTOR.ln();
                    self.viewport.wheel_zoom(anchor, ticks);
                }
            }
        }

        // Background drag panning. Cards are not drag targets in this view,
        // so every drag on the canvas pans.
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.viewport
                    .begin_drag(Point::new(pos.x as f64, pos.y as f64));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.viewport.drag_to(Point::new(pos.x as f64, pos.y as f64));
            }
        }
        if response.drag_stopped() {
            self.viewport.end_drag();
        }

        if layout.columns.is_empty() {
            painter.text(
                response.rect.center(),
                egui::Align2::CENTER_CENTER,
                "Add a stage and some steps, or open a map file.",
                egui::FontId::proportional(15.0),
                palette.text_weak,
            );
            self.grid_content = Size::default();
            return;
        }

        let zoom = self.viewport.zoom() as f32;
        let pan = self.viewport.pan();
        let to_screen = |x: f32, y: f32| {
            egui::pos2(
                origin.x + pan.x as f32 + x * zoom,
                origin.y + pan.y as f32 + y * zoom,
            )
        };
        let col_x = |index: usize| index as f32 * (COL_W + COL_GAP);

        let accent = self.theme.accent_color;
        let mut hits: Vec<(egui::Rect, GridHit)> = Vec::new();

        // Stage span header row.
        for span in &layout.stage_spans {
            let rect = egui::Rect::from_min_max(
                to_screen(col_x(span.start), 0.0),
                to_screen(col_x(span.start + span.width - 1) + COL_W, STAGE_ROW_H),
            );
            painter.rect_filled(rect, card_radius(zoom), palette.stage_header_bg);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &span.stage_name,
                egui::FontId::proportional(14.0 * self.text_scale * zoom),
                palette.text_strong,
            );
        }

        // Task span row.
        let task_y = STAGE_ROW_H + ROW_GAP;
        for span in &layout.task_spans {
            let rect = egui::Rect::from_min_max(
                to_screen(col_x(span.start), task_y),
                to_screen(col_x(span.start + span.width - 1) + COL_W, task_y + TASK_ROW_H),
            );
            painter.rect_filled(rect, chip_radius(zoom), palette.task_header_bg);
            let name = self
                .tree
                .stages()
                .iter()
                .flat_map(|stage| &stage.tasks)
                .find(|task| task.id == span.task_id)
                .map(|task| task.name.as_str())
                .unwrap_or("");
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                name,
                egui::FontId::proportional(12.0 * self.text_scale * zoom),
                palette.text_weak,
            );
        }

        // Card columns.
        let card_y = task_y + TASK_ROW_H + ROW_GAP;
        let mut max_bottom_content = card_y + PLACEHOLDER_H;
        for (index, column) in layout.columns.iter().enumerate() {
            let top_left = to_screen(col_x(index), card_y);
            let width = COL_W * zoom;

            match column {
                Column::Placeholder { reason, .. } => {
                    let rect =
                        egui::Rect::from_min_size(top_left, egui::vec2(width, PLACEHOLDER_H * zoom));
                    painter.rect_filled(rect, card_radius(zoom), palette.placeholder_bg);
                    painter.rect_stroke(
                        rect,
                        card_radius(zoom),
                        egui::Stroke::new(1.0, palette.placeholder_stroke),
                        egui::StrokeKind::Inside,
                    );
                    let label = match reason {
                        PlaceholderReason::Empty => "No steps",
                        PlaceholderReason::Filtered => "Filtered out",
                    };
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        label,
                        egui::FontId::proportional(12.0 * self.text_scale * zoom),
                        palette.text_weak,
                    );
                }
                Column::Step {
                    step, performers, ..
                } => {
                    let bottom = self.paint_step_column(
                        &painter, palette, accent, top_left, width, zoom, step, performers,
                        &mut hits,
                    );
                    let bottom_content = (bottom - origin.y - pan.y as f32) / zoom;
                    max_bottom_content = max_bottom_content.max(bottom_content);
                }
            }
        }

        let total_width = layout.columns.len() as f32 * (COL_W + COL_GAP) - COL_GAP;
        self.grid_content = Size::new(total_width as f64, max_bottom_content as f64);

        // Click routing: entries are recorded after their step card, so the
        // reverse scan finds the innermost hit; anywhere else is background.
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                match hits.iter().rev().find(|(rect, _)| rect.contains(pos)) {
                    Some((_, GridHit::Entry(step_id, kind, index))) => {
                        if let Some(detail) =
                            self.highlight
                                .click_entry(&self.tree, step_id.clone(), *kind, *index)
                        {
                            self.open_entry_detail(detail);
                        }
                    }
                    Some((_, GridHit::Step(step_id))) => {
                        self.highlight.click_step(step_id.clone());
                    }
                    None => self.highlight.clear(),
                }
            }
        }
    }

    /// Paints one step column card and returns its bottom y in screen space.
    #[allow(clippy::too_many_arguments)]
    fn paint_step_column(
        &self,
        painter: &egui::Painter,
        palette: &BoardPalette,
        accent: egui::Color32,
        top_left: egui::Pos2,
        width: f32,
        zoom: f32,
        step: &shared::domain::Step,
        performers: &[shared::domain::Performer],
        hits: &mut Vec<(egui::Rect, GridHit)>,
    ) -> f32 {
        let pad = CARD_PAD * zoom;
        let wrap = width - 2.0 * pad;
        let body_font = egui::FontId::proportional(13.0 * self.text_scale * zoom);
        let small_font = egui::FontId::proportional(11.0 * self.text_scale * zoom);

        let description = if step.description.is_empty() {
            "(untitled step)".to_string()
        } else {
            step.description.clone()
        };
        let description_galley =
            painter.layout(description, body_font.clone(), palette.text_strong, wrap);

        // Sections measured first so the card background can be painted
        // before its contents.
        struct EntrySection {
            kind: EntryKind,
            fill: egui::Color32,
            galleys: Vec<std::sync::Arc<egui::Galley>>,
        }
        let mut sections = Vec::new();
        for (kind, fill) in [
            (EntryKind::PainPoint, palette.pain_bg),
            (EntryKind::Opportunity, palette.opportunity_bg),
            (EntryKind::CurrentExperience, palette.experience_bg),
        ] {
            let entries = step.entries(kind);
            if entries.is_empty() {
                continue;
            }
            let galleys = entries
                .iter()
                .map(|text| {
                    painter.layout(
                        text.clone(),
                        small_font.clone(),
                        palette.text_strong,
                        wrap - 2.0 * pad,
                    )
                })
                .collect();
            sections.push(EntrySection {
                kind,
                fill,
                galleys,
            });
        }

        let entry_gap = 4.0 * zoom;
        let mut card_height = pad + description_galley.size().y;
        if !performers.is_empty() {
            card_height += entry_gap + 14.0 * self.text_scale * zoom;
        }
        for section in &sections {
            card_height += entry_gap + 13.0 * self.text_scale * zoom;
            for galley in &section.galleys {
                card_height += entry_gap + galley.size().y + 2.0 * pad * 0.5;
            }
        }
        if !step.insight.is_empty() {
            card_height += entry_gap + 13.0 * self.text_scale * zoom;
        }
        card_height += pad;

        let card_rect = egui::Rect::from_min_size(top_left, egui::vec2(width, card_height));
        painter.rect_filled(card_rect, card_radius(zoom), palette.card_bg);
        let stroke = if self.highlight.step_involved(&step.id) {
            egui::Stroke::new(2.0, accent)
        } else {
            egui::Stroke::new(1.0, palette.card_stroke)
        };
        painter.rect_stroke(card_rect, card_radius(zoom), stroke, egui::StrokeKind::Inside);
        hits.push((card_rect, GridHit::Step(step.id.clone())));

        let mut cursor_y = top_left.y + pad;
        painter.galley(
            egui::pos2(top_left.x + pad, cursor_y),
            description_galley.clone(),
            palette.text_strong,
        );
        cursor_y += description_galley.size().y;

        if !performers.is_empty() {
            cursor_y += entry_gap;
            let mut chip_x = top_left.x + pad;
            for performer in performers {
                let color = theme::performer_color(&performer.color_hex);
                let label = painter.layout_no_wrap(
                    format!("● {}", performer.name),
                    small_font.clone(),
                    color,
                );
                painter.galley(egui::pos2(chip_x, cursor_y), label.clone(), color);
                chip_x += label.size().x + 8.0 * zoom;
            }
            cursor_y += 14.0 * self.text_scale * zoom;
        }

        for section in &sections {
            cursor_y += entry_gap;
            painter.text(
                egui::pos2(top_left.x + pad, cursor_y),
                egui::Align2::LEFT_TOP,
                section.kind.label(),
                small_font.clone(),
                palette.text_weak,
            );
            cursor_y += 13.0 * self.text_scale * zoom;

            for (index, galley) in section.galleys.iter().enumerate() {
                cursor_y += entry_gap;
                let chip_rect = egui::Rect::from_min_size(
                    egui::pos2(top_left.x + pad, cursor_y),
                    egui::vec2(wrap, galley.size().y + pad),
                );
                let highlighted =
                    self.highlight
                        .entry_highlighted(&step.id, section.kind, index);
                painter.rect_filled(chip_rect, chip_radius(zoom), section.fill);
                if highlighted {
                    painter.rect_stroke(
                        chip_rect,
                        chip_radius(zoom),
                        egui::Stroke::new(2.0, accent),
                        egui::StrokeKind::Inside,
                    );
                }
                painter.galley(
                    egui::pos2(chip_rect.min.x + pad, chip_rect.min.y + pad * 0.5),
                    galley.clone(),
                    palette.text_strong,
                );
                hits.push((
                    chip_rect,
                    GridHit::Entry(step.id.clone(), section.kind, index),
                ));
                cursor_y += chip_rect.height();
            }
        }

        if !step.insight.is_empty() {
            cursor_y += entry_gap;
            painter.text(
                egui::pos2(top_left.x + pad, cursor_y),
                egui::Align2::LEFT_TOP,
                format!("💡 {}", step.insight),
                small_font,
                palette.text_weak,
            );
            cursor_y += 13.0 * self.text_scale * zoom;
        }

        card_rect.bottom().max(cursor_y + pad)
    }
}
