//! Arena Application.
//!
//! Wraps the [`ArenaEngine`] with line handling and terminal output.
//!
//! # Input Flow
//!
//! ```text
//! line ─▶ execute() ─┬─ ":" control ─▶ ReplCommand ─▶ engine op / render
//!                    │
//!                    └─ anything else ─▶ engine.handle_command() ─▶ render battle
//! ```
//!
//! Both modes go through [`ArenaApp::execute`]:
//!
//! | Mode | Input | Output |
//! |------|-------|--------|
//! | one-shot ([`run_command`](ArenaApp::run_command)) | CLI trailing words | stdout, or stderr on failure |
//! | interactive ([`run_interactive`](ArenaApp::run_interactive)) | rustyline thread | ExternalPrinter slot |

mod builder;
mod helper;

pub use builder::ArenaAppBuilder;

use crate::render::{Renderer, HELP_TEXT};
use crate::repl::{OpenTarget, ReplCommand};
use crate::{AppError, PrintResult, SharedPrinterSlot};
use arena_runtime::config::default_history_path;
use arena_runtime::engine::votable_battle_id;
use arena_runtime::{ArenaConfig, ArenaEngine, ConfigResolver, VoteState};
use arena_types::Persona;
use helper::ArenaHelper;
use rustyline::history::DefaultHistory;
use rustyline::ExternalPrinter as RustylineExternalPrinter;
use std::io::Write;
use std::path::PathBuf;

/// Control flow for the main input loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Rendered result of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// The line ended in a command, request or usage error.
    pub failed: bool,
}

impl Reply {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: true,
        }
    }

    fn new(text: String, failed: bool) -> Self {
        Self { text, failed }
    }
}

/// Event sent from the dedicated readline OS thread to the async main loop.
#[derive(Debug)]
enum ReadlineEvent {
    Line(String),
    /// Ctrl+D on an empty line.
    Eof,
    /// The editor could not be created.
    Failed(String),
}

type BoxedPrinter = Box<dyn RustylineExternalPrinter + Send>;

/// Arena Application.
pub struct ArenaApp {
    /// Loaded configuration (merged from all sources).
    pub(super) config: ArenaConfig,
    pub(super) engine: ArenaEngine,
    pub(super) renderer: Renderer,
    /// Shared with the tracing writer.
    pub(super) printer_slot: SharedPrinterSlot,
}

impl ArenaApp {
    #[must_use]
    pub fn builder(resolver: impl ConfigResolver + 'static) -> ArenaAppBuilder {
        ArenaAppBuilder::new(resolver)
    }

    #[must_use]
    pub fn engine(&self) -> &ArenaEngine {
        &self.engine
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Handles one input line and renders the resulting state.
    pub async fn execute(&self, line: &str) -> (LoopControl, Option<Reply>) {
        if line.trim().is_empty() {
            return (LoopControl::Continue, None);
        }

        let reply = match ReplCommand::parse(line) {
            None => self.battle_command(line).await,
            Some(Err(usage)) => Reply::failed(self.renderer.error(&usage)),
            Some(Ok(ReplCommand::Quit)) => {
                tracing::info!("Quit requested");
                return (LoopControl::Exit, None);
            }
            Some(Ok(cmd)) => self.control(cmd).await,
        };
        (LoopControl::Continue, Some(reply))
    }

    async fn battle_command(&self, line: &str) -> Reply {
        self.engine.handle_command(line).await;
        let state = self.engine.snapshot();
        let failed = state.command_error.is_some() || state.battle.error.is_some();
        Reply::new(self.renderer.command_outcome(&state), failed)
    }

    async fn control(&self, cmd: ReplCommand) -> Reply {
        match cmd {
            ReplCommand::Help => Reply::ok(HELP_TEXT),
            ReplCommand::New => {
                self.engine.new_battle();
                Reply::ok("Battle cleared. Type a topic to start a new one.\n")
            }
            ReplCommand::Scores => {
                let state = self.engine.snapshot();
                Reply::ok(self.renderer.scoreboard(&state.scoreboard))
            }
            ReplCommand::History => {
                self.engine.refresh_history().await;
                let state = self.engine.snapshot();
                Reply::new(
                    self.renderer.history(&state.history),
                    state.history.error.is_some(),
                )
            }
            ReplCommand::Refresh => {
                self.engine.initialize().await;
                let state = self.engine.snapshot();
                let text = format!(
                    "{}{}",
                    self.renderer.scoreboard(&state.scoreboard),
                    self.renderer.history(&state.history)
                );
                let failed = state.scoreboard.error.is_some() || state.history.error.is_some();
                Reply::new(text, failed)
            }
            ReplCommand::Vote(persona) => self.vote(persona).await,
            ReplCommand::Open(target) => self.open(target).await,
            ReplCommand::Quit => Reply::ok(""),
        }
    }

    async fn vote(&self, persona: Persona) -> Reply {
        let battle_id = votable_battle_id(&self.engine.snapshot()).map(str::to_string);
        let Some(battle_id) = battle_id else {
            return Reply::failed(self.renderer.error("No finished battle to vote on."));
        };

        self.engine.handle_vote(Some(&battle_id), persona).await;

        let state = self.engine.snapshot();
        let mut text = self.renderer.vote(&state.vote).unwrap_or_default();
        let failed = matches!(state.vote, VoteState::Error { .. });
        if !failed {
            text.push_str(&self.renderer.scoreboard(&state.scoreboard));
        }
        Reply::new(text, failed)
    }

    async fn open(&self, target: OpenTarget) -> Reply {
        let id = match target {
            OpenTarget::Id(id) => id,
            OpenTarget::Index(n) => {
                if self.engine.snapshot().history.entries.is_empty() {
                    self.engine.refresh_history().await;
                }
                let state = self.engine.snapshot();
                match state.history.entries.get(n - 1) {
                    Some(entry) => entry.id.clone(),
                    None => {
                        return Reply::failed(
                            self.renderer
                                .error(&format!("No battle #{n} in history. Try :history.")),
                        )
                    }
                }
            }
        };

        self.engine.select_from_history(Some(&id)).await;
        let state = self.engine.snapshot();
        Reply::new(
            self.renderer.battle_slice(&state.battle),
            state.battle.error.is_some(),
        )
    }

    /// Runs the application in non-interactive command mode.
    ///
    /// Executes a single line, waits for background refreshes and prints
    /// the result: stdout on success, stderr on failure.
    ///
    /// # Returns
    ///
    /// Exit code: 0 for success, 1 if the line failed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the result cannot be written.
    pub async fn run_command(&self, command: &str) -> Result<i32, AppError> {
        let (_, reply) = self.execute(command).await;
        self.engine.settle().await;
        self.engine.teardown();

        let Some(reply) = reply else {
            return Ok(0);
        };
        if reply.failed {
            let mut err = std::io::stderr().lock();
            err.write_all(reply.text.as_bytes())?;
            err.flush()?;
            Ok(1)
        } else {
            let mut out = std::io::stdout().lock();
            out.write_all(reply.text.as_bytes())?;
            out.flush()?;
            Ok(0)
        }
    }

    /// Runs the application in interactive mode.
    ///
    /// Uses a dedicated OS thread for rustyline (prompt, history, line editing)
    /// and communicates with the async main loop via channels.
    ///
    /// All terminal output during the loop goes through `ExternalPrinter`
    /// to avoid corrupting rustyline's raw-mode terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Readline`] if the line editor cannot start.
    pub async fn run_interactive(&self) -> Result<(), AppError> {
        tracing::info!(base_url = %self.config.api.base_url, "Starting interactive mode");

        self.emit(&Reply::ok(
            "Roast Arena. Type a topic to start a battle, :help for commands.\n",
        ));
        self.engine.initialize().await;
        let state = self.engine.snapshot();
        self.emit(&Reply::new(
            self.renderer.scoreboard(&state.scoreboard),
            state.scoreboard.error.is_some(),
        ));

        let (mut readline_rx, printer) = Self::spawn_readline_thread(self.history_path());
        if let Some(p) = printer {
            self.printer_slot.set(p);
        }

        let mut result = Ok(());
        while let Some(event) = readline_rx.recv().await {
            match event {
                ReadlineEvent::Line(line) => {
                    let (control, reply) = self.execute(&line).await;
                    if let Some(reply) = reply {
                        self.emit(&reply);
                    }
                    if control == LoopControl::Exit {
                        break;
                    }
                }
                ReadlineEvent::Eof => {
                    tracing::debug!("readline: EOF");
                    break;
                }
                ReadlineEvent::Failed(message) => {
                    result = Err(AppError::Readline(message));
                    break;
                }
            }
        }

        // Clear ExternalPrinter before shutdown output
        self.printer_slot.clear();
        self.engine.teardown();
        self.engine.settle().await;

        result
    }

    fn history_path(&self) -> PathBuf {
        default_history_path()
    }

    /// Prints through the ExternalPrinter if one is installed, else directly.
    fn emit(&self, reply: &Reply) {
        if reply.text.is_empty() {
            return;
        }
        match self.printer_slot.try_print(reply.text.clone()) {
            PrintResult::Sent => {}
            PrintResult::Dropped => tracing::debug!("Printer busy, output dropped"),
            PrintResult::NoPrinter if reply.failed => eprint!("{}", reply.text),
            PrintResult::NoPrinter => print!("{}", reply.text),
        }
    }

    /// Spawns a dedicated OS thread running rustyline for line editing.
    ///
    /// Returns:
    /// - `UnboundedReceiver<ReadlineEvent>` for the async loop to consume
    /// - `Option<Box<dyn ExternalPrinter>>` for terminal-safe output during readline
    ///
    /// The thread saves history to disk after each entered line.
    fn spawn_readline_thread(
        history_path: PathBuf,
    ) -> (
        tokio::sync::mpsc::UnboundedReceiver<ReadlineEvent>,
        Option<BoxedPrinter>,
    ) {
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
        let (printer_tx, printer_rx) = std::sync::mpsc::sync_channel::<Option<BoxedPrinter>>(1);

        if let Err(e) = std::thread::Builder::new()
            .name("arena-readline".into())
            .spawn(move || {
                let config = rustyline::Config::builder()
                    .auto_add_history(true)
                    .completion_type(rustyline::CompletionType::List)
                    .build();

                let mut rl =
                    match rustyline::Editor::<ArenaHelper, DefaultHistory>::with_config(config) {
                        Ok(editor) => editor,
                        Err(e) => {
                            let _ = event_tx.send(ReadlineEvent::Failed(e.to_string()));
                            let _ = printer_tx.send(None);
                            return;
                        }
                    };
                rl.set_helper(Some(ArenaHelper));

                if let Some(dir) = history_path.parent() {
                    let _ = std::fs::create_dir_all(dir);
                }
                if let Err(e) = rl.load_history(&history_path) {
                    tracing::debug!("History load: {e} (expected on first run)");
                }

                let printer = rl
                    .create_external_printer()
                    .ok()
                    .map(|p| Box::new(p) as BoxedPrinter);
                let _ = printer_tx.send(printer);

                loop {
                    match rl.readline("arena> ") {
                        Ok(line) => {
                            // Persist after each line so a killed process keeps it.
                            let _ = rl.save_history(&history_path);

                            if event_tx.send(ReadlineEvent::Line(line)).is_err() {
                                break;
                            }
                        }
                        Err(rustyline::error::ReadlineError::Interrupted) => continue,
                        Err(rustyline::error::ReadlineError::Eof) => {
                            let _ = event_tx.send(ReadlineEvent::Eof);
                            break;
                        }
                        Err(e) => {
                            tracing::error!("Readline error: {e}");
                            let _ = event_tx.send(ReadlineEvent::Eof);
                            break;
                        }
                    }
                }

                let _ = rl.save_history(&history_path);
            })
        {
            tracing::error!("failed to spawn readline thread: {e}");
        }

        // Block until the readline thread sends the printer (or fails)
        let printer = printer_rx.recv().ok().flatten();

        (event_rx, printer)
    }
}

impl std::fmt::Debug for ArenaApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaApp")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}
