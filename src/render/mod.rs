pub mod colors;
pub mod grid;
pub mod ui;

pub use ui::render_ui;
