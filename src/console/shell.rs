//! Operator shell
//!
//! Line-oriented event loop over the console. The loop task is the only
//! owner of the [`Console`]; session changes and profile lookups reach it as
//! messages, so input handling and resolution results are applied one at a
//! time in arrival order.

use crate::console::command::{Command, HELP};
use crate::console::render::{render_matrix, render_navigation, render_status};
use crate::console::state::{ApplyOutcome, Console, ConsoleStatus};
use crate::session::{ResolvedProfile, Session, SessionResolver, SharedSessionProvider};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capacity of the resolution result queue
const RESULT_BUFFER: usize = 16;

/// Whether the loop should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W> {
    console: Console,
    provider: SharedSessionProvider,
    resolver: SessionResolver,
    prompt: String,
    out: W,
}

impl<W> Shell<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(
        console: Console,
        provider: SharedSessionProvider,
        resolver: SessionResolver,
        out: W,
    ) -> Self {
        Self {
            console,
            provider,
            resolver,
            prompt: String::new(),
            out,
        }
    }

    /// Prompt printed before each command
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Run until `quit` or end of input, returning the final console state.
    ///
    /// At end of input any outstanding resolution is awaited so the returned
    /// state reflects the most recent session.
    pub async fn run<R>(mut self, input: R) -> anyhow::Result<Console>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(provider = self.provider.provider_name(), "Console started");

        let mut lines = input.lines();
        let mut sessions = self.provider.subscribe();
        let (results_tx, mut results) = mpsc::channel(RESULT_BUFFER);
        let mut feed_open = true;

        let initial = sessions.borrow_and_update().clone();
        self.start_resolution(initial, &results_tx);
        self.write_prompt().await?;

        loop {
            tokio::select! {
                changed = sessions.changed(), if feed_open => {
                    if changed.is_err() {
                        debug!("Session feed closed");
                        feed_open = false;
                        continue;
                    }
                    let session = sessions.borrow_and_update().clone();
                    self.start_resolution(session, &results_tx);
                }
                Some(resolved) = results.recv() => {
                    self.apply(resolved);
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("End of input");
                        break;
                    };
                    if self.handle_line(&line).await? == Flow::Quit {
                        break;
                    }
                    self.write_prompt().await?;
                }
            }
        }

        if feed_open && sessions.has_changed().unwrap_or(false) {
            let session = sessions.borrow_and_update().clone();
            self.start_resolution(session, &results_tx);
        }
        while self.console.status() == ConsoleStatus::Resolving {
            match results.recv().await {
                Some(resolved) => self.apply(resolved),
                None => break,
            }
        }

        self.out.flush().await?;
        info!("Console stopped");
        Ok(self.console)
    }

    fn start_resolution(
        &mut self,
        session: Option<Session>,
        results: &mpsc::Sender<ResolvedProfile>,
    ) {
        let ticket = self.console.begin_resolution();
        self.resolver.spawn(ticket, session, results.clone());
    }

    fn apply(&mut self, resolved: ResolvedProfile) {
        if self.console.apply_resolution(resolved) == ApplyOutcome::Applied {
            debug!(status = ?self.console.status(), "Session state updated");
        }
    }

    async fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                self.write(&format!("error: {}\n", e)).await?;
                return Ok(Flow::Continue);
            }
        };

        self.dispatch(command).await
    }

    async fn dispatch(&mut self, command: Command) -> anyhow::Result<Flow> {
        match command {
            Command::Login { email, password } => {
                match self.provider.sign_in_with_password(&email, &password).await {
                    Ok(session) => {
                        info!(user_id = %session.user_id, "Signed in with password");
                        self.write("Signed in. Resolving profile...\n").await?;
                    }
                    Err(e) => {
                        warn!(error = %e, "Password sign-in failed");
                        self.write(&format!("error: {}\n", e)).await?;
                    }
                }
            }
            Command::Token(token) => match self.provider.sign_in_with_token(token).await {
                Ok(session) => {
                    info!(user_id = %session.user_id, "Signed in with token");
                    self.write("Signed in. Resolving profile...\n").await?;
                }
                Err(e) => {
                    warn!(error = %e, "Token sign-in failed");
                    self.write(&format!("error: {}\n", e)).await?;
                }
            },
            Command::Logout => match self.provider.sign_out().await {
                Ok(()) => self.write("Signed out.\n").await?,
                Err(e) => self.write(&format!("error: {}\n", e)).await?,
            },
            Command::WhoAmI => {
                let text = render_status(&self.console);
                self.write(&text).await?;
            }
            Command::Nav => {
                let text = render_navigation(&self.console.navigation(), self.console.active_tab());
                self.write(&text).await?;
            }
            Command::Open(feature) => match self.console.open(feature) {
                Ok(tab) => self.write(&format!("Active: {}\n", tab)).await?,
                Err(e) => self.write(&format!("error: {}\n", e)).await?,
            },
            Command::Matrix => {
                let text = render_matrix(&self.console.permission_matrix());
                self.write(&text).await?;
            }
            Command::Toggle { role, feature } => match self.console.toggle(role, feature) {
                Ok(enabled) => {
                    let state = if enabled { "enabled" } else { "disabled" };
                    self.write(&format!("{} {} for {}\n", feature, state, role))
                        .await?;
                }
                Err(e) => self.write(&format!("error: {}\n", e)).await?,
            },
            Command::Help => self.write(&format!("{}\n", HELP)).await?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn write_prompt(&mut self) -> std::io::Result<()> {
        if self.prompt.is_empty() {
            return Ok(());
        }
        let prompt = self.prompt.clone();
        self.write(&prompt).await
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }
}
