use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::colors;
use crate::navigation::{heading_arrow, NavigationController};
use crate::session::DetectionStatus;
use crate::terrain::{Cell, CellState, TerrainGrid};

/// Terminal columns per grid cell; keeps cells roughly square
pub const CELL_WIDTH: u16 = 2;

/// Terrain, path, goal and drone in one widget.
///
/// Draw order is terrain, planned path, flown path, goal, drone. When the
/// grid is larger than the area the view scrolls to keep the drone visible.
pub struct GridWidget<'a> {
    grid: &'a TerrainGrid,
    controller: &'a NavigationController,
    goal: Cell,
    detection: Option<&'a DetectionStatus>,
}

impl<'a> GridWidget<'a> {
    pub fn new(grid: &'a TerrainGrid, controller: &'a NavigationController, goal: Cell) -> Self {
        Self {
            grid,
            controller,
            goal,
            detection: None,
        }
    }

    pub fn detection(mut self, detection: &'a DetectionStatus) -> Self {
        self.detection = Some(detection);
        self
    }

    /// First visible cell along one axis, keeping `focus` on screen
    fn scroll_offset(focus: usize, visible: usize, total: usize) -> usize {
        if visible == 0 || total <= visible {
            return 0;
        }
        focus.saturating_sub(visible / 2).min(total - visible)
    }

    /// Screen position of a cell, if it falls inside the viewport
    fn project(cell: Cell, origin: Cell, area: Rect, cols: usize, rows: usize) -> Option<(u16, u16)> {
        if cell.x < origin.x || cell.y < origin.y {
            return None;
        }
        let (vx, vy) = (cell.x - origin.x, cell.y - origin.y);
        if vx >= cols || vy >= rows {
            return None;
        }
        Some((area.x + vx as u16 * CELL_WIDTH, area.y + vy as u16))
    }

    fn draw(buf: &mut Buffer, pos: (u16, u16), glyph: char, style: Style) {
        let (x, y) = pos;
        buf[(x, y)].set_char(glyph).set_style(style);
        let filler = if glyph == '█' { '█' } else { ' ' };
        buf[(x + 1, y)].set_char(filler).set_style(style);
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = ((area.width / CELL_WIDTH) as usize).min(self.grid.width());
        let rows = (area.height as usize).min(self.grid.height());
        if cols == 0 || rows == 0 {
            return;
        }

        let drone = self.controller.position();
        let origin = Cell::new(
            Self::scroll_offset(drone.x, cols, self.grid.width()),
            Self::scroll_offset(drone.y, rows, self.grid.height()),
        );

        let free_style = Style::default().fg(colors::FREE).bg(colors::BACKGROUND);
        let obstacle_style = Style::default().fg(colors::OBSTACLE).bg(colors::BACKGROUND);

        for vy in 0..rows {
            for vx in 0..cols {
                let cell = Cell::new(origin.x + vx, origin.y + vy);
                let pos = (area.x + vx as u16 * CELL_WIDTH, area.y + vy as u16);
                match self.grid.state(cell) {
                    Ok(CellState::Obstacle) => Self::draw(buf, pos, '█', obstacle_style),
                    _ => Self::draw(buf, pos, '·', free_style),
                }
            }
        }

        let planned_style = Style::default().fg(colors::PLANNED).bg(colors::BACKGROUND);
        for &cell in self.controller.path().cells() {
            if let Some(pos) = Self::project(cell, origin, area, cols, rows) {
                Self::draw(buf, pos, '∙', planned_style);
            }
        }

        let flown_style = Style::default().fg(colors::FLOWN).bg(colors::BACKGROUND);
        for &cell in self.controller.visited() {
            if let Some(pos) = Self::project(cell, origin, area, cols, rows) {
                Self::draw(buf, pos, '•', flown_style);
            }
        }

        if let Some(pos) = Self::project(self.goal, origin, area, cols, rows) {
            let color = self
                .detection
                .map(colors::goal_color)
                .unwrap_or(colors::GOAL);
            let goal_style = Style::default()
                .fg(color)
                .bg(colors::BACKGROUND)
                .add_modifier(Modifier::BOLD);
            Self::draw(buf, pos, '◎', goal_style);
        }

        if let Some(pos) = Self::project(drone, origin, area, cols, rows) {
            let drone_style = Style::default()
                .fg(colors::DRONE)
                .bg(colors::BACKGROUND)
                .add_modifier(Modifier::BOLD);
            Self::draw(buf, pos, heading_arrow(self.controller.heading()), drone_style);
        }
    }
}
