use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::colors;
use super::grid::GridWidget;
use crate::navigation::heading_arrow;
use crate::session::{DetectionStatus, SessionStatus, SimulationSession};
use crate::signal::SEQUENCE_LEN;

/// Write `text` from `x`, stopping before `max_x`. Returns the next free column.
fn put_str(buf: &mut Buffer, mut x: u16, y: u16, max_x: u16, text: &str, style: Style) -> u16 {
    for ch in text.chars() {
        if x >= max_x {
            break;
        }
        buf[(x, y)].set_char(ch).set_style(style);
        x += 1;
    }
    x
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Traversing => "TRAVERSING",
        SessionStatus::Arrived => "ARRIVED",
        SessionStatus::NoPath => "NO PATH",
    }
}

/// Short detector summary and its color
fn detection_label(detection: &DetectionStatus, detector_ready: bool) -> (String, Color) {
    match detection {
        DetectionStatus::Pending if !detector_ready => ("SOS: no model".to_string(), colors::WARN),
        DetectionStatus::Pending => ("SOS: pending".to_string(), colors::LABEL),
        DetectionStatus::Classified { result } if result.found => (
            format!("SOS DETECTED {:.0}%", result.confidence * 100.0),
            colors::SOS,
        ),
        DetectionStatus::Classified { result } => (
            format!("no SOS {:.0}%", result.confidence * 100.0),
            colors::VALUE,
        ),
        DetectionStatus::Incomplete { samples } => (
            format!("SOS: {}/{} frames", samples, SEQUENCE_LEN),
            colors::WARN,
        ),
        DetectionStatus::Unavailable { .. } => ("SOS: offline".to_string(), colors::WARN),
    }
}

/// Status bar at the bottom of the screen
pub struct StatusBar<'a> {
    status: SessionStatus,
    detection: &'a DetectionStatus,
    detector_ready: bool,
    seed: u64,
    elapsed: Duration,
    steps: usize,
    total_steps: usize,
    heading: f32,
    paused: bool,
    speed: f32,
    fps: u32,
}

impl<'a> StatusBar<'a> {
    pub fn new(status: SessionStatus, detection: &'a DetectionStatus) -> Self {
        Self {
            status,
            detection,
            detector_ready: true,
            seed: 0,
            elapsed: Duration::ZERO,
            steps: 0,
            total_steps: 0,
            heading: 0.0,
            paused: false,
            speed: 1.0,
            fps: 30,
        }
    }

    pub fn steps(mut self, taken: usize, total: usize) -> Self {
        self.steps = taken;
        self.total_steps = total;
        self
    }

    /// Mission seed and simulated time since the mission started
    pub fn mission(mut self, seed: u64, elapsed: Duration) -> Self {
        self.seed = seed;
        self.elapsed = elapsed;
        self
    }

    pub fn detector_ready(mut self, ready: bool) -> Self {
        self.detector_ready = ready;
        self
    }

    pub fn heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height == 0 {
            return;
        }

        let bg_style = Style::default().bg(colors::BAR_BG);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let max_x = area.x + area.width - 1;
        let label_style = Style::default().fg(colors::LABEL);
        let value_style = Style::default().fg(colors::VALUE);
        let accent_style = Style::default()
            .fg(colors::ACCENT)
            .add_modifier(Modifier::BOLD);

        let mut x = put_str(buf, area.x + 1, area.y, max_x, "◈ DRONENAV", accent_style) + 2;

        let state_style = Style::default()
            .fg(colors::status_color(self.status))
            .add_modifier(Modifier::BOLD);
        x = put_str(buf, x, area.y, max_x, status_label(self.status), state_style) + 2;

        let mission = format!("Seed: {}  T+{:.1}s", self.seed, self.elapsed.as_secs_f32());
        x = put_str(buf, x, area.y, max_x, &mission, label_style) + 2;

        let steps = format!("Steps: {}/{}", self.steps, self.total_steps);
        x = put_str(buf, x, area.y, max_x, &steps, value_style) + 2;

        let heading = format!(
            "Heading: {} {:.0}°",
            heading_arrow(self.heading),
            self.heading
        );
        x = put_str(buf, x, area.y, max_x, &heading, value_style) + 2;

        let speed = format!("Speed: {:.2}x", self.speed);
        x = put_str(buf, x, area.y, max_x, &speed, label_style) + 2;

        if self.paused {
            let pause_style = Style::default()
                .fg(colors::WARN)
                .add_modifier(Modifier::BOLD);
            x = put_str(buf, x, area.y, max_x, "⏸ PAUSED", pause_style) + 2;
        }

        let (detection, color) = detection_label(self.detection, self.detector_ready);
        let mut detection_style = Style::default().fg(color);
        if self.detection.found() {
            detection_style = detection_style.add_modifier(Modifier::BOLD);
        }
        put_str(buf, x, area.y, max_x, &detection, detection_style);

        let hint = format!("{} fps  ?:help", self.fps);
        let hint_x = (area.x + area.width).saturating_sub(hint.chars().count() as u16 + 1);
        if hint_x > x {
            put_str(buf, hint_x, area.y, max_x, &hint, label_style);
        }
    }
}

/// One-line key to the grid glyphs
pub struct Legend;

impl Widget for Legend {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let max_x = area.x + area.width;
        let label_style = Style::default().fg(colors::LABEL);
        let entries = [
            ('█', colors::OBSTACLE, "obstacle"),
            ('•', colors::FLOWN, "flown"),
            ('∙', colors::PLANNED, "planned"),
            ('◎', colors::GOAL, "goal"),
            ('→', colors::DRONE, "drone"),
        ];

        let mut x = area.x + 1;
        for (glyph, color, label) in entries {
            if x >= max_x {
                break;
            }
            buf[(x, area.y)]
                .set_char(glyph)
                .set_style(Style::default().fg(color));
            x = put_str(buf, x + 2, area.y, max_x, label, label_style) + 3;
        }
    }
}

/// Help overlay widget
pub struct HelpOverlay;

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let box_width = 40u16;
        let box_height = 13u16;
        if area.width < box_width || area.height < box_height {
            return;
        }

        let box_x = area.x + (area.width - box_width) / 2;
        let box_y = area.y + (area.height - box_height) / 2;

        let box_bg = Style::default().bg(Color::Rgb(35, 35, 45));
        for y in box_y..box_y + box_height {
            for x in box_x..box_x + box_width {
                buf[(x, y)].set_char(' ').set_style(box_bg);
            }
        }

        let border_style = Style::default().fg(colors::ACCENT);
        for x in box_x..box_x + box_width {
            buf[(x, box_y)].set_char('─').set_style(border_style);
            buf[(x, box_y + box_height - 1)]
                .set_char('─')
                .set_style(border_style);
        }
        for y in box_y..box_y + box_height {
            buf[(box_x, y)].set_char('│').set_style(border_style);
            buf[(box_x + box_width - 1, y)]
                .set_char('│')
                .set_style(border_style);
        }
        buf[(box_x, box_y)].set_char('╭').set_style(border_style);
        buf[(box_x + box_width - 1, box_y)]
            .set_char('╮')
            .set_style(border_style);
        buf[(box_x, box_y + box_height - 1)]
            .set_char('╰')
            .set_style(border_style);
        buf[(box_x + box_width - 1, box_y + box_height - 1)]
            .set_char('╯')
            .set_style(border_style);

        let title = " DroneNav Controls ";
        let title_x = box_x + (box_width - title.len() as u16) / 2;
        let title_style = Style::default()
            .fg(colors::ACCENT)
            .add_modifier(Modifier::BOLD);
        put_str(buf, title_x, box_y, box_x + box_width - 1, title, title_style);

        let key_style = Style::default()
            .fg(Color::Rgb(200, 200, 100))
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::Rgb(180, 180, 190));
        let inner_end = box_x + box_width - 2;

        let controls = [
            ("q, Esc", "Quit"),
            ("r", "New terrain and goal"),
            ("n, .", "Step one cell"),
            ("g", "New goal from here"),
            ("Space", "Pause/Resume"),
            ("+/-", "Speed up/down"),
            ("?", "Toggle this help"),
        ];

        let mut y = box_y + 2;
        for (key, desc) in controls {
            put_str(buf, box_x + 3, y, inner_end, key, key_style);
            put_str(buf, box_x + 13, y, inner_end, desc, desc_style);
            y += 1;
        }

        let footer = "Press any key to close";
        let footer_x = box_x + (box_width - footer.len() as u16) / 2;
        let footer_style = Style::default().fg(colors::LABEL);
        put_str(buf, footer_x, box_y + box_height - 2, inner_end, footer, footer_style);
    }
}

/// Render the whole view: grid, legend, status bar and optional help
pub fn render_ui(area: Rect, buf: &mut Buffer, session: &SimulationSession, show_help: bool, fps: u32) {
    if area.height < 3 {
        return;
    }

    let grid_area = Rect::new(area.x, area.y, area.width, area.height - 2);
    let legend_area = Rect::new(area.x, area.y + area.height - 2, area.width, 1);
    let status_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

    GridWidget::new(session.grid(), session.controller(), session.goal())
        .detection(session.detection())
        .render(grid_area, buf);

    Legend.render(legend_area, buf);

    let controller = session.controller();
    StatusBar::new(session.status(), session.detection())
        .detector_ready(session.predictor_available())
        .mission(session.seed(), session.elapsed())
        .steps(controller.path_index(), controller.path().moves())
        .heading(controller.heading())
        .paused(session.is_paused())
        .speed(session.time_scale())
        .fps(fps)
        .render(status_area, buf);

    if show_help {
        HelpOverlay.render(area, buf);
    }
}
