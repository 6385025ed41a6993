use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Processed input events for the application
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Quit the application
    Quit,
    /// New terrain, new goal
    Reset,
    /// Move the drone one cell now
    Step,
    /// New goal on the current terrain, planned from the drone's cell
    Retarget,
    TogglePause,
    SpeedUp,
    SpeedDown,
    ToggleHelp,
    /// Close help (any key when help is shown)
    CloseHelp,
    Resize { width: u16, height: u16 },
    None,
}

/// Input handler for processing terminal events
pub struct InputHandler {
    help_visible: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            help_visible: false,
        }
    }

    /// Set help visibility state
    pub fn set_help_visible(&mut self, visible: bool) {
        self.help_visible = visible;
    }

    /// Poll for input events with timeout
    pub fn poll(&mut self, timeout: Duration) -> Option<InputEvent> {
        if event::poll(timeout).ok()? {
            match event::read().ok()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    Some(self.handle_key(key_event))
                }
                Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Handle keyboard input
    fn handle_key(&self, event: KeyEvent) -> InputEvent {
        if self.help_visible {
            return InputEvent::CloseHelp;
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                InputEvent::Quit
            }

            KeyCode::Char('r') => InputEvent::Reset,
            KeyCode::Char('n') | KeyCode::Char('.') => InputEvent::Step,
            KeyCode::Char('g') => InputEvent::Retarget,
            KeyCode::Char(' ') => InputEvent::TogglePause,

            KeyCode::Char('+') | KeyCode::Char('=') => InputEvent::SpeedUp,
            KeyCode::Char('-') | KeyCode::Char('_') => InputEvent::SpeedDown,

            KeyCode::Char('?') => InputEvent::ToggleHelp,

            _ => InputEvent::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
