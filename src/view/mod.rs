//! TUI rendering and terminal management (impure shell)

mod camera;
mod canvas;
mod layout;
mod status;
mod styles;

pub use camera::Camera;
pub use canvas::{cell_to_surface, ChainCanvas};
pub use layout::{render_frame, FrameAreas};
pub use status::status_text;
pub use styles::{ChainStyles, ColorConfig};

use crate::config::keybindings::KeyBindings;
use crate::config::ResolvedConfig;
use crate::integration;
use crate::model::KeyAction;
use crate::render::NodeKey;
use crate::session::Session;
use crate::source::InputSource;
use crossterm::{
    event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input source error
    #[error("Input error: {0}")]
    Input(#[from] crate::model::InputError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    session: Session,
    input_source: InputSource,
    key_bindings: KeyBindings,
    camera: Camera,
    styles: ChainStyles,
    tick: Duration,
    /// Last rendered canvas area (for mouse click mapping)
    last_canvas_area: Option<Rect>,
    selected: Option<NodeKey>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        input_source: InputSource,
        config: &ResolvedConfig,
        colors: ColorConfig,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self::with_terminal(terminal, input_source, config, colors))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Each iteration waits up to one tick for a
    /// terminal event, then drains pending stream events.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.poll_input()?;
        self.draw()?;

        loop {
            let mut dirty = false;
            if event::poll(self.tick)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if self.poll_input()? || dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(
        terminal: Terminal<B>,
        input_source: InputSource,
        config: &ResolvedConfig,
        colors: ColorConfig,
    ) -> Self {
        let viewport = terminal
            .size()
            .map(|size| FrameAreas::split(Rect::new(0, 0, size.width, size.height)).viewport())
            .unwrap_or_default();
        let mut session = Session::new(config.layout, viewport);
        session.set_show_validators(config.show_validators);

        Self {
            terminal,
            session,
            input_source,
            key_bindings: KeyBindings::default().with_overrides(&config.keybindings),
            camera: Camera::new(),
            styles: ChainStyles::with_color_config(colors),
            tick: config.tick(),
            last_canvas_area: None,
            selected: None,
        }
    }

    /// Decode and apply pending stream events in arrival order.
    ///
    /// Returns `true` if anything arrived.
    fn poll_input(&mut self) -> Result<bool, TuiError> {
        let events = self.input_source.poll()?;
        if events.is_empty() {
            return Ok(false);
        }
        let count = events.len();
        let report = integration::process_events(&mut self.session, events);
        debug!(
            events = count,
            applied = report.applied,
            too_old = report.too_old,
            too_new = report.too_new,
            decode_errors = report.decode_errors,
            "Processed stream events"
        );
        Ok(true)
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        match action {
            KeyAction::Quit => return true,
            KeyAction::ToggleValidators => {
                let show = !self.session.show_validators();
                self.session.set_show_validators(show);
                if !show && matches!(self.selected, Some(NodeKey::Validator(_))) {
                    self.selected = None;
                }
            }
            _ => {
                let layout = self.session.layout();
                self.camera.apply(action, &layout.params(), layout.offset());
            }
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(area) = self.last_canvas_area else {
            return;
        };
        let origin = self.camera.origin(self.session.layout().offset());
        if let Some(point) = cell_to_surface(area, origin, mouse.column, mouse.row) {
            self.selected = self.session.node_clicked(point);
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Handling resize to {}x{}", width, height);
        let areas = FrameAreas::split(Rect::new(0, 0, width, height));
        self.session.set_viewport(areas.viewport());
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let areas = FrameAreas::split(Rect::new(0, 0, size.width, size.height));
        self.session.set_viewport(areas.viewport());

        let session = &self.session;
        let camera = &self.camera;
        let styles = self.styles;
        let selected = self.selected;
        self.terminal.draw(|frame| {
            render_frame(frame, session, camera, styles, selected);
        })?;

        self.last_canvas_area = Some(areas.canvas);
        Ok(())
    }
}

/// Initialize and run the TUI application with an input source and resolved config
///
/// This is the main entry point for the TUI. It handles terminal
/// setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_source(
    input_source: InputSource,
    config: &ResolvedConfig,
    colors: ColorConfig,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(input_source, config, colors)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
