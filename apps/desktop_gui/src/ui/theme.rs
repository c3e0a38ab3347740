//! Theme presets and color helpers for the board surfaces.

use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemePreset {
    SlateDark,
    Paper,
}

impl ThemePreset {
    pub fn label(self) -> &'static str {
        match self {
            ThemePreset::SlateDark => "Slate (Dark)",
            ThemePreset::Paper => "Paper (Light)",
        }
    }

    pub fn all() -> [ThemePreset; 2] {
        [ThemePreset::SlateDark, ThemePreset::Paper]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSettings {
    pub preset: ThemePreset,
    pub accent_color: egui::Color32,
    pub panel_rounding: u8,
}

impl ThemeSettings {
    pub fn slate_default() -> Self {
        Self {
            preset: ThemePreset::SlateDark,
            accent_color: egui::Color32::from_rgb(76, 110, 245),
            panel_rounding: 8,
        }
    }
}

/// Colors for the hand-painted board/grid canvases.
#[derive(Debug, Clone, Copy)]
pub struct BoardPalette {
    pub canvas_bg: egui::Color32,
    pub stage_header_bg: egui::Color32,
    pub task_header_bg: egui::Color32,
    pub card_bg: egui::Color32,
    pub card_stroke: egui::Color32,
    pub placeholder_bg: egui::Color32,
    pub placeholder_stroke: egui::Color32,
    pub text_strong: egui::Color32,
    pub text_weak: egui::Color32,
    pub pain_bg: egui::Color32,
    pub opportunity_bg: egui::Color32,
    pub experience_bg: egui::Color32,
}

pub fn board_palette(preset: ThemePreset) -> BoardPalette {
    match preset {
        ThemePreset::SlateDark => BoardPalette {
            canvas_bg: egui::Color32::from_rgb(24, 26, 31),
            stage_header_bg: egui::Color32::from_rgb(45, 50, 62),
            task_header_bg: egui::Color32::from_rgb(38, 42, 52),
            card_bg: egui::Color32::from_rgb(33, 36, 44),
            card_stroke: egui::Color32::from_rgb(58, 63, 76),
            placeholder_bg: egui::Color32::from_rgb(28, 30, 36),
            placeholder_stroke: egui::Color32::from_rgb(70, 74, 86),
            text_strong: egui::Color32::from_rgb(226, 228, 233),
            text_weak: egui::Color32::from_rgb(148, 153, 165),
            pain_bg: egui::Color32::from_rgb(84, 42, 46),
            opportunity_bg: egui::Color32::from_rgb(38, 74, 52),
            experience_bg: egui::Color32::from_rgb(38, 58, 86),
        },
        ThemePreset::Paper => BoardPalette {
            canvas_bg: egui::Color32::from_rgb(246, 246, 243),
            stage_header_bg: egui::Color32::from_rgb(222, 224, 230),
            task_header_bg: egui::Color32::from_rgb(232, 233, 238),
            card_bg: egui::Color32::WHITE,
            card_stroke: egui::Color32::from_rgb(205, 208, 214),
            placeholder_bg: egui::Color32::from_rgb(240, 240, 238),
            placeholder_stroke: egui::Color32::from_rgb(190, 193, 200),
            text_strong: egui::Color32::from_rgb(40, 42, 48),
            text_weak: egui::Color32::from_rgb(120, 124, 133),
            pain_bg: egui::Color32::from_rgb(250, 216, 218),
            opportunity_bg: egui::Color32::from_rgb(214, 242, 222),
            experience_bg: egui::Color32::from_rgb(216, 230, 250),
        },
    }
}

pub fn apply_theme(ctx: &egui::Context, theme: ThemeSettings) {
    let mut visuals = match theme.preset {
        ThemePreset::SlateDark => egui::Visuals::dark(),
        ThemePreset::Paper => egui::Visuals::light(),
    };
    visuals.selection.bg_fill = theme.accent_color;
    let radius = egui::CornerRadius::same(theme.panel_rounding.min(16));
    visuals.widgets.inactive.corner_radius = radius;
    visuals.widgets.hovered.corner_radius = radius;
    visuals.widgets.active.corner_radius = radius;
    visuals.widgets.open.corner_radius = radius;
    visuals.widgets.noninteractive.corner_radius = radius;
    ctx.set_visuals(visuals);
}

/// Parses `#rrggbb` (with or without the leading `#`). Anything else renders
/// with a neutral fallback rather than failing.
pub fn parse_hex_color(hex: &str) -> Option<egui::Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(egui::Color32::from_rgb(r, g, b))
}

pub fn performer_color(hex: &str) -> egui::Color32 {
    parse_hex_color(hex).unwrap_or(egui::Color32::from_rgb(134, 142, 150))
}

pub fn hex_from_color(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors_with_and_without_hash() {
        assert_eq!(
            parse_hex_color("#e8590c"),
            Some(egui::Color32::from_rgb(0xe8, 0x59, 0x0c))
        );
        assert_eq!(
            parse_hex_color("1c7ed6"),
            Some(egui::Color32::from_rgb(0x1c, 0x7e, 0xd6))
        );
        assert!(parse_hex_color("#fff").is_none());
        assert!(parse_hex_color("not-a-color").is_none());
    }

    #[test]
    fn hex_round_trips_through_color32() {
        let hex = "#4c6ef5";
        let color = parse_hex_color(hex).expect("parse");
        assert_eq!(hex_from_color(color), hex);
    }
}
