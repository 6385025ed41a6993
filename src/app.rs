use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};

use crate::clock::FrameClock;
use crate::error::Result;
use crate::input::{InputEvent, InputHandler};
use crate::render::render_ui;
use crate::session::{MissionReport, SessionEvent, SessionStatus, SimulationSession};

/// Speed change per `+`/`-` press
const SPEED_STEP: f32 = 0.25;

/// Interactive terminal view over a simulation session
pub struct App {
    session: SimulationSession,
    clock: FrameClock,
    input_handler: InputHandler,
    show_help: bool,
    running: bool,
}

impl App {
    pub fn new(session: SimulationSession) -> Self {
        Self {
            session,
            clock: FrameClock::new(),
            input_handler: InputHandler::new(),
            show_help: false,
            running: true,
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal).await;

        // Restore the terminal even when the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while self.running {
            if let Some(event) = self.input_handler.poll(Duration::from_millis(1)) {
                self.handle_input(event)?;
            }

            if let Some(dt) = self.clock.tick() {
                let event = self.session.tick(dt);
                self.log_event(event);

                let fps = self.clock.fps();
                let show_help = self.show_help;
                let session = &self.session;
                terminal.draw(|frame| {
                    let area = frame.area();
                    render_ui(area, frame.buffer_mut(), session, show_help, fps);
                })?;
            }

            tokio::time::sleep(self.clock.wait()).await;
        }

        info!("Exiting after {} steps", self.session.steps_taken());
        Ok(())
    }

    /// Apply one input event to the session or the view
    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::Quit => self.running = false,

            InputEvent::Reset => {
                self.session.reset()?;
                info!("Mission reset, goal {}", self.session.goal());
            }

            InputEvent::Retarget => {
                if self.session.retarget()? == SessionStatus::NoPath {
                    warn!("New goal {} is unreachable", self.session.goal());
                }
            }

            InputEvent::Step => {
                let event = self.session.step();
                self.log_event(event);
            }

            InputEvent::TogglePause => self.session.toggle_pause(),

            InputEvent::SpeedUp => self.session.adjust_speed(SPEED_STEP),

            InputEvent::SpeedDown => self.session.adjust_speed(-SPEED_STEP),

            InputEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                self.input_handler.set_help_visible(self.show_help);
            }

            InputEvent::CloseHelp => {
                self.show_help = false;
                self.input_handler.set_help_visible(false);
            }

            // ratatui re-reads the terminal size on every draw
            InputEvent::Resize { .. } | InputEvent::None => {}
        }
        Ok(())
    }

    fn log_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Moved { from, to } => debug!("Step {} -> {}", from, to),
            SessionEvent::Arrived(detection) => {
                info!("Arrived at {}: {:?}", self.session.goal(), detection)
            }
            _ => {}
        }
    }

}

/// Drive a session with a fixed simulated frame step until it settles.
///
/// Stops on arrival (after detection has run), when no path exists, or after
/// `max_frames` frames.
pub fn run_headless(session: &mut SimulationSession, frame: Duration, max_frames: usize) -> MissionReport {
    session.set_paused(false);

    for _ in 0..max_frames {
        match session.tick(frame) {
            SessionEvent::NoPath => {
                warn!("Goal {} is unreachable", session.goal());
                break;
            }
            SessionEvent::Arrived(_) | SessionEvent::Finished => break,
            SessionEvent::Moved { from, to } => debug!("Step {} -> {}", from, to),
            SessionEvent::Waiting | SessionEvent::Paused => {}
        }
    }

    let report = session.report();
    info!(
        "Mission finished: {:?} after {} steps, detection {:?}",
        report.status, report.steps_taken, report.detection
    );
    report
}
