use crate::command::{Action, Command, CommandInner};
use crate::document::VirtualDocument;
use crate::event::HostEvent;
use crate::geometry::Size;
use crate::model::Model;
use crate::render::paint_document;
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Output target for the terminal UI.
///
/// When your program's stdout is piped, switch to
/// [`Stderr`](OutputTarget::Stderr) so the UI goes to the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
}

/// Writer that wraps either stdout or stderr.
enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, teardown, or the log file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     fps: 30,
///     title: Some("Overlays".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second; the document clock advances once per frame
    /// (default: 60, max: 120).
    pub fps: u32,
    /// Start in alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse clicks, motion and wheel (default: true). Without it
    /// outside clicks and hover triggers never fire.
    pub mouse: bool,
    /// Set terminal title.
    pub title: Option<String>,
    /// Whether to catch panics and restore the terminal (default: true).
    pub catch_panics: bool,
    /// Whether to quit on Ctrl+C (default: true).
    pub handle_signals: bool,
    /// Send `tracing` output to this file.
    pub log_file: Option<std::path::PathBuf>,
    /// Output target: stdout (default) or stderr.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            output: OutputTarget::default(),
        }
    }
}

/// A cloneable handle to a running [`Program`] for external control.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<AtomicBool>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Send a message to the running program. Silently dropped after exit.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Force the program to exit at the next loop iteration.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// The terminal-independent half of the runtime: owns the model and its
/// document, routes host events and wakeups, and executes commands.
pub struct Driver<M: Model> {
    model: M,
    doc: VirtualDocument,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    should_quit: bool,
    needs_redraw: bool,
}

impl<M: Model> Driver<M> {
    /// Build the model inside a fresh document of the given size.
    pub fn new(flags: M::Flags, viewport: Size, msg_tx: mpsc::UnboundedSender<M::Message>) -> Self {
        let mut doc = VirtualDocument::new(viewport);
        let (model, init_cmd) = M::init(flags, &mut doc);
        let mut driver = Self {
            model,
            doc,
            msg_tx,
            should_quit: false,
            needs_redraw: true,
        };
        driver.execute_command(init_cmd);
        driver
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn doc(&self) -> &VirtualDocument {
        &self.doc
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Translate a terminal event and dispatch the resulting host events.
    pub fn terminal_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press
                && key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL)
            {
                tracing::debug!("ctrl+c pressed");
                self.should_quit = true;
                return;
            }
        }
        let events = match event {
            Event::Mouse(mouse) => self.doc.pointer_events(mouse),
            Event::Resize(width, height) => {
                vec![self.doc.resize(Size::new(f64::from(*width), f64::from(*height)))]
            }
            other => HostEvent::from_terminal(other).into_iter().collect(),
        };
        for event in events {
            self.dispatch(&event);
        }
    }

    /// Deliver `event` to every listener that hears it.
    pub fn dispatch(&mut self, event: &HostEvent) {
        let listeners = self.doc.dispatch(event);
        if listeners.is_empty() {
            return;
        }
        tracing::trace!(?event, listeners = listeners.len(), "dispatching host event");
        for listener in listeners {
            let cmd = self.model.handle_event(&mut self.doc, listener, event);
            self.execute_command(cmd);
        }
        self.needs_redraw = true;
    }

    /// Advance the document clock and deliver due frames and timers.
    pub fn tick(&mut self, elapsed: Duration) {
        let due = self.doc.advance(elapsed);
        if due.is_empty() {
            return;
        }
        for wakeup in due {
            let cmd = self.model.wake(&mut self.doc, wakeup);
            self.execute_command(cmd);
        }
        self.needs_redraw = true;
    }

    /// Run one update.
    pub fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(&mut self.doc, msg);
        self.execute_command(cmd);
        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    /// Tear the model down and hand it back.
    pub fn finish(mut self) -> M {
        self.model.destroy(&mut self.doc);
        self.model
    }
}

/// The program runtime: terminal setup, the event loop, and the
/// [`Model`] lifecycle.
///
/// Each loop iteration waits for terminal input, an injected message, or the
/// next frame tick. On every tick the document clock advances by the real
/// elapsed time, so timers and animation frames registered by components
/// fire at wall-clock pace, and the screen is redrawn when anything changed:
/// first [`Model::view`], then the document's nodes on top.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<Demo>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    driver: Driver<M>,
    terminal: Terminal<CrosstermBackend<Output>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    killed: Arc<AtomicBool>,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        if let Some(path) = &options.log_file {
            log_to_file(path)?;
        }
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let terminal = init_terminal(&options)?;
        let area = terminal.size()?;
        let viewport = Size::new(f64::from(area.width), f64::from(area.height));
        let driver = Driver::new(flags, viewport, msg_tx.clone());
        tracing::debug!(width = area.width, height = area.height, "program initialized");

        Ok(Self {
            driver,
            terminal,
            msg_tx,
            msg_rx,
            options,
            killed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get a handle for external control (send messages, force-kill).
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: self.killed.clone(),
        }
    }

    /// Run the program until quit. Returns the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;
        tracing::debug!("shutting down");
        restore_terminal(&self.options)?;
        result?;
        Ok(self.driver.finish())
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_tick = Instant::now();
        let mut events = EventStream::new();
        let handle_signals = self.options.handle_signals;

        loop {
            if self.killed.load(Ordering::SeqCst) || self.driver.should_quit() {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    tracing::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.driver.process_message(msg);
                    // drain whatever else is already queued
                    while let Ok(msg) = self.msg_rx.try_recv() {
                        self.driver.process_message(msg);
                    }
                }

                Some(event) = events.next() => {
                    match event {
                        Ok(event) => self.driver.terminal_event(&event),
                        Err(err) => tracing::warn!(%err, "terminal event stream error"),
                    }
                }

                _ = frame_interval.tick() => {
                    let now = Instant::now();
                    self.driver.tick(now - last_tick);
                    last_tick = now;
                    if self.driver.needs_redraw {
                        self.render()?;
                        self.driver.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        let driver = &self.driver;
        self.terminal.draw(|frame| {
            driver.model.view(frame);
            paint_document(&driver.doc, frame.buffer_mut());
        })?;
        Ok(())
    }
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    // Install panic hook that restores terminal (only once to avoid stacking)
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        let output_target = options.output;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen, output_target);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(options.output);

    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.mouse {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let backend = CrosstermBackend::new(writer);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    restore_terminal_minimal(options.alt_screen, options.output)?;
    Ok(())
}

fn restore_terminal_minimal(alt_screen: bool, output_target: OutputTarget) -> Result<(), std::io::Error> {
    // Best effort: keep restoring even if a step fails.
    let r1 = disable_raw_mode();
    let mut writer = Output::new(output_target);
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    r1
}

/// Send `tracing` output to a file, opened in append mode.
///
/// A terminal UI owns stdout, so diagnostics have to go elsewhere. Installs a
/// global `tracing-subscriber` fmt subscriber at `DEBUG` level; if a global
/// subscriber is already set the call only opens the file.
///
/// ```no_run
/// anchorage_core::runtime::log_to_file("overlay-debug.log").unwrap();
/// tracing::debug!("logged to the file");
/// ```
pub fn log_to_file(path: impl AsRef<std::path::Path>) -> Result<(), ProgramError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    Ok(())
}
