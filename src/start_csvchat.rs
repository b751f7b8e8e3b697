//! Startup and event loop for the terminal chat client.
//!
//! Input lines and transport completions are handled on one task; transport
//! calls run on spawned tasks and report back over a channel.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::conversation::ConversationStore;
use crate::render::{Renderer, TerminalRenderer};
use crate::session::command::HELP;
use crate::session::{dispatch, ChatSession, Command, Completion, PendingRequest};
use crate::transport::{HttpTransport, Transport};

/// Notice for a `/switch` or `/delete` position past the end of the list.
const NO_SUCH_POSITION: &str = "Não existe conversa nessa posição.";

/// Run the client until `/quit` or end of input.
///
/// # Returns
/// `ExitCode::SUCCESS` on a clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(
        "Starting csvchat v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.base_url
    );

    let transport = match HttpTransport::new(&config) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            tracing::error!("Failed to create transport: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(event_loop(&config, transport)) {
        tracing::error!("Client error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

async fn event_loop<T>(config: &ClientConfig, transport: Arc<T>) -> anyhow::Result<()>
where
    T: Transport + 'static,
{
    let store = ConversationStore::with_capacity(config.history_limit);
    let session = ChatSession::new(store, TerminalRenderer::stdout());
    drive(session, BufReader::new(tokio::io::stdin()), transport).await?;
    Ok(())
}

/// Feed input lines and completions to the session.
///
/// `/quit` stops at once. At end of input the loop keeps waiting until every
/// request already sent has been applied.
async fn drive<I, R, T>(
    mut session: ChatSession<R>,
    input: I,
    transport: Arc<T>,
) -> anyhow::Result<ChatSession<R>>
where
    I: AsyncBufRead + Unpin,
    R: Renderer,
    T: Transport + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut in_flight = 0usize;

    while input_open || in_flight > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    tracing::debug!(in_flight, "input closed");
                    input_open = false;
                    continue;
                };
                if matches!(line.parse::<Command>(), Ok(Command::Quit)) {
                    break;
                }
                if let Some(request) = handle_line(&mut session, &line) {
                    spawn_request(Arc::clone(&transport), request, tx.clone());
                    in_flight += 1;
                }
            }
            Some(completion) = rx.recv() => {
                in_flight = in_flight.saturating_sub(1);
                session.apply(completion);
            }
        }
    }

    Ok(session)
}

fn spawn_request<T>(transport: Arc<T>, request: PendingRequest, tx: mpsc::UnboundedSender<Completion>)
where
    T: Transport + 'static,
{
    tokio::spawn(async move {
        let completion = dispatch(transport, request).await;
        if tx.send(completion).is_err() {
            tracing::debug!("session closed before completion arrived");
        }
    });
}

/// Apply one input line; returns a request to send, if any.
fn handle_line<R: Renderer>(session: &mut ChatSession<R>, line: &str) -> Option<PendingRequest> {
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(err) => {
            session.notify(&err.to_string());
            return None;
        }
    };

    match command {
        Command::Message(text) => session.submit_message(&text),
        Command::Upload(path) => session.submit_upload(path),
        Command::New => {
            session.new_conversation();
            None
        }
        Command::Switch(_) | Command::Delete(_) => {
            let Some(id) = command.list_index().and_then(|i| session.store().id_at(i)) else {
                session.notify(NO_SUCH_POSITION);
                return None;
            };
            let result = if matches!(command, Command::Switch(_)) {
                session.switch_to(id)
            } else {
                session.delete(id)
            };
            if let Err(err) = result {
                tracing::debug!(%err, "command refused");
            }
            None
        }
        Command::List => {
            session.render();
            None
        }
        Command::Help => {
            session.notify(HELP);
            None
        }
        Command::Quit => None,
    }
}
