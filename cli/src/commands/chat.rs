//! # Terminal Chat Widget
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! `chatterify chat` drives a `ChatSession` from the terminal the way the
//! floating widget drives it from the browser. Each line typed is a submit.
//! Slash commands map to the widget's buttons:
//!
//! | Command    | Widget action                                  |
//! |------------|------------------------------------------------|
//! | `/close`   | Close the panel (history kept)                 |
//! | `/open`    | Reopen it and show anything that arrived       |
//! | `/reset`   | Start a new conversation                       |
//! | `/history` | Print every record with its timestamp          |
//! | `/quit`    | Leave                                          |
//!
//! ## Architecture
//!
//! The event loop selects over stdin and a channel. A submit spawns the
//! completion call as a task, and the task posts the outcome back with its
//! round ticket, so input keeps flowing (and `/reset` or `/close` work)
//! while a reply is pending. At end of input the loop waits for an
//! in-flight reply before exiting.
//!
use crate::chat::{
    self,
    backend::CompletionBackend,
    message::{Message, TranscriptEntry},
    session::{ChatSession, PendingRound, RoundTicket, WidgetState},
};
use crate::core::config::AppConfig;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Chat with the assistant in the terminal.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Answer from the built-in response table instead of the remote endpoint.
    #[arg(long)]
    pub offline: bool,
}

/// Outcome of one spawned completion call.
struct Reply {
    ticket: RoundTicket,
    outcome: Result<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Renders the conversation incrementally. `shown` counts printed records.
struct Screen {
    shown: usize,
}

impl Screen {
    fn print_new(&mut self, session: &ChatSession) {
        for message in &session.messages()[self.shown.min(session.messages().len())..] {
            print_message(message);
        }
        self.shown = session.messages().len();
    }

    fn redraw(&mut self, session: &ChatSession) {
        self.shown = 0;
        self.print_new(session);
    }
}

fn print_message(message: &Message) {
    let who = if message.is_user() { "you" } else { "bot" };
    println!("{}> {}", who, message.text());
}

fn print_history(session: &ChatSession) {
    for message in session.messages() {
        let who = if message.is_user() { "you" } else { "bot" };
        println!(
            "[{}] {}> {}",
            message.timestamp().format("%Y-%m-%d %H:%M:%S"),
            who,
            message.text()
        );
    }
}

/// Entry point for `chatterify chat`.
pub async fn handle_chat(args: ChatArgs, config: &AppConfig) -> Result<()> {
    let backend = chat::backend_for(config, args.offline)?;
    let mut session = ChatSession::new(config.chat.fallback);
    info!(
        "Starting terminal chat with {} backend and {} fallback",
        backend.name(),
        session.fallback().as_str()
    );
    let mut screen = Screen { shown: 0 };
    let (tx, mut rx) = mpsc::channel::<Reply>(4);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    session.open();
    println!("Chatterify assistant. Commands: /close /open /reset /history /quit");
    screen.print_new(&session);

    loop {
        if !stdin_open && !session.is_typing() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => {
                        let flow = handle_line(&line, &mut session, &mut screen, &backend, &tx);
                        if flow == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        debug!("End of input");
                        stdin_open = false;
                    }
                }
            }
            Some(reply) = rx.recv() => {
                let appended = session
                    .complete(reply.ticket, reply.outcome)
                    .is_some();
                if appended {
                    if session.state() == WidgetState::Closed {
                        println!("(new reply while closed; /open to read it)");
                    } else {
                        screen.print_new(&session);
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_line(
    line: &str,
    session: &mut ChatSession,
    screen: &mut Screen,
    backend: &Arc<dyn CompletionBackend>,
    tx: &mpsc::Sender<Reply>,
) -> Flow {
    match line.trim() {
        "/quit" => return Flow::Quit,
        "/close" => {
            session.close();
            println!("(chat closed; /open to reopen)");
        }
        "/open" => {
            session.open();
            screen.print_new(session);
        }
        "/reset" => {
            if session.state() == WidgetState::Closed {
                println!("(chat is closed; /open first)");
            } else {
                session.reset();
                screen.redraw(session);
            }
        }
        "/history" => print_history(session),
        _ => {
            if session.state() == WidgetState::Closed {
                println!("(chat is closed; /open to continue)");
                return Flow::Continue;
            }
            session.set_input(line);
            match session.submit() {
                Some(PendingRound { ticket, transcript }) => {
                    screen.print_new(session);
                    println!("bot is typing...");
                    spawn_round(Arc::clone(backend), tx.clone(), ticket, transcript);
                }
                None if session.is_typing() => {
                    println!("(still waiting for the previous reply)");
                }
                None => {}
            }
        }
    }
    Flow::Continue
}

fn spawn_round(
    backend: Arc<dyn CompletionBackend>,
    tx: mpsc::Sender<Reply>,
    ticket: RoundTicket,
    transcript: Vec<TranscriptEntry>,
) {
    tokio::spawn(async move {
        debug!("Requesting reply from {} backend", backend.name());
        let outcome = backend.complete(&transcript).await;
        let reply = Reply { ticket, outcome };
        if tx.send(reply).await.is_err() {
            debug!("Chat loop ended before the reply arrived");
        }
    });
}
