use std::io::Write;

use anyhow::Result;
use tabble::prelude::*;
use tabble::{ContentPart, ThreadStatus};

use crate::cli::{ChatArgs, RenameArgs, ThreadArgs};

pub async fn list_threads(session: &ChatSession) -> Result<()> {
    let threads = session.threads().list().await?;
    if threads.is_empty() {
        println!("No threads");
        return Ok(());
    }

    for thread in threads {
        let marker = match thread.status {
            ThreadStatus::Regular => " ",
            ThreadStatus::Archived => "a",
        };
        println!("{} {}  {}", marker, thread.remote_id, thread.title);
    }
    Ok(())
}

pub async fn new_thread(session: &ChatSession) -> Result<()> {
    let thread = session.create_thread().await?;
    if let Some(remote_id) = thread.remote_id() {
        println!("{}", remote_id);
    }
    Ok(())
}

pub async fn chat(session: &ChatSession, args: ChatArgs) -> Result<()> {
    let mut thread = match (args.thread, args.local) {
        (Some(remote_id), _) => session.open_thread(remote_id).await?,
        (None, true) => session.thread(None),
        (None, false) => session.create_thread().await?,
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling turn");
            ctrl_c.cancel();
        }
    });

    let mut printer = SnapshotPrinter::default();
    let outcome = thread
        .run_turn(ThreadMessage::user(args.message.join(" ")), cancel, |snapshot| {
            printer.print(snapshot)
        })
        .await;
    println!();

    match outcome.state {
        TurnState::Complete => {
            if let Some(e) = &outcome.persist_error {
                eprintln!("warning: reply was not saved: {}", e);
            }
        }
        TurnState::Cancelled => eprintln!("(cancelled)"),
        _ => {
            if let Some(e) = &outcome.error {
                tracing::debug!("Turn error: {:?}", e);
            }
            eprintln!("{}", tabble::USER_FACING_MESSAGE);
        }
    }

    if let Some(remote_id) = thread.remote_id() {
        eprintln!("thread: {}", remote_id);
    }
    Ok(())
}

pub async fn history(session: &ChatSession, args: ThreadArgs) -> Result<()> {
    let thread = session.open_thread(args.thread).await?;

    for message in thread.messages() {
        println!("[{}]", message.role);
        for part in &message.content {
            match part {
                ContentPart::Text { text } => println!("{}", text),
                ContentPart::ToolCall(call) => {
                    println!("-> {}({})", call.tool_name, call.args);
                }
            }
        }
        println!();
    }
    Ok(())
}

pub async fn rename(session: &ChatSession, args: RenameArgs) -> Result<()> {
    session.threads().rename(&args.thread, &args.title).await?;
    Ok(())
}

pub async fn archive(session: &ChatSession, args: ThreadArgs) -> Result<()> {
    session.threads().archive(&args.thread).await?;
    Ok(())
}

pub async fn unarchive(session: &ChatSession, args: ThreadArgs) -> Result<()> {
    session.threads().unarchive(&args.thread).await?;
    Ok(())
}

pub async fn delete(session: &ChatSession, args: ThreadArgs) -> Result<()> {
    session.threads().delete(&args.thread).await?;
    Ok(())
}

/// Prints only what each snapshot adds to the previous one
#[derive(Default)]
struct SnapshotPrinter {
    text_len: usize,
    tool_calls: usize,
}

impl SnapshotPrinter {
    fn print(&mut self, snapshot: &TurnSnapshot) {
        let mut out = std::io::stdout().lock();

        for call in &snapshot.tool_calls[self.tool_calls..] {
            let _ = writeln!(out, "-> {}", call.tool_name);
        }
        self.tool_calls = snapshot.tool_calls.len();

        if let Some(delta) = snapshot.text.get(self.text_len..) {
            let _ = write!(out, "{}", delta);
        }
        self.text_len = snapshot.text.len();

        let _ = out.flush();
    }
}
