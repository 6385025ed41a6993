pub mod controller;
pub mod heading;

pub use controller::{NavState, NavigationController, TickOutcome};
pub use heading::heading_arrow;
