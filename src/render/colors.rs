//! Palette for the terrain view.

use ratatui::style::Color;

use crate::session::{DetectionStatus, SessionStatus};

pub const BACKGROUND: Color = Color::Rgb(15, 15, 22);
pub const FREE: Color = Color::Rgb(45, 45, 55);
pub const OBSTACLE: Color = Color::Rgb(110, 95, 80);
pub const FLOWN: Color = Color::Rgb(0, 158, 115);
pub const PLANNED: Color = Color::Rgb(86, 180, 233);
pub const DRONE: Color = Color::Rgb(240, 228, 66);
pub const GOAL: Color = Color::Rgb(230, 159, 0);
pub const SOS: Color = Color::Rgb(255, 80, 80);

pub const BAR_BG: Color = Color::Rgb(25, 25, 35);
pub const LABEL: Color = Color::Rgb(100, 100, 120);
pub const VALUE: Color = Color::Rgb(180, 180, 200);
pub const ACCENT: Color = Color::Rgb(100, 200, 150);
pub const WARN: Color = Color::Rgb(255, 200, 80);

/// Color for the mission state label
pub fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Traversing => PLANNED,
        SessionStatus::Arrived => FLOWN,
        SessionStatus::NoPath => SOS,
    }
}

/// Goal marker color: red once an SOS has been confirmed there
pub fn goal_color(detection: &DetectionStatus) -> Color {
    if detection.found() {
        SOS
    } else {
        GOAL
    }
}
