//! `relayclaw chat`: interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use relayclaw_agent::{Interrupt, TurnResult};
use relayclaw_core::message::{Conversation, Message};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::{Notify, mpsc};
use tracing::debug;

/// What the user typed, after REPL commands are recognised.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Clear,
    ListTools,
    Exit,
    Skip,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Skip,
        "exit" | "quit" | "/exit" | "/quit" => Input::Exit,
        "/clear" => Input::Clear,
        "/tools" => Input::ListTools,
        _ => Input::Message(line.to_string()),
    }
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, agent) = super::build_agent()?;
    let interrupt = Interrupt::new();
    let agent = agent.with_interrupt(interrupt.clone());

    if let Some(msg) = message {
        // Single message mode
        let mut conv = Conversation::new();
        conv.push(Message::user(msg));
        let result = agent.run_turn(&mut conv).await;
        println!("{}", result.text());
        if let TurnResult::Failed(reason) = result {
            return Err(reason.into());
        }
        return Ok(());
    }

    println!();
    println!("  RelayClaw: interactive mode");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Tools:     {}", agent.tools().names().join(", "));
    println!();
    println!("  Type your message and press Enter.");
    println!("  /clear starts a new conversation, /tools lists tools.");
    println!("  Type 'exit' or press Ctrl+C to quit.");
    println!();

    let busy = Arc::new(AtomicBool::new(false));
    let quit = Arc::new(Notify::new());
    spawn_ctrl_c_handler(busy.clone(), interrupt.clone(), quit.clone());

    let mut rx = spawn_stdin_reader();
    let mut conv = Conversation::new();

    loop {
        prompt()?;
        let line = tokio::select! {
            line = rx.recv() => line,
            _ = quit.notified() => None,
        };
        let Some(line) = line else { break };

        match parse_input(&line) {
            Input::Skip => continue,
            Input::Exit => break,
            Input::Clear => {
                conv = Conversation::new();
                println!("  (new conversation)");
                continue;
            }
            Input::ListTools => {
                for def in agent.tools().schemas() {
                    println!("  {:<22} {}", def.name, def.description);
                }
                continue;
            }
            Input::Message(text) => {
                conv.push(Message::user(text));
                interrupt.reset();
                busy.store(true, Ordering::SeqCst);
                let result = agent.run_turn(&mut conv).await;
                busy.store(false, Ordering::SeqCst);
                print_result(&result);
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_result(result: &TurnResult) {
    println!();
    for line in result.text().lines() {
        println!("  Assistant > {line}");
    }
    if let TurnResult::Failed(reason) = result {
        eprintln!("  [Error] {reason}");
    }
    println!();
}

/// Read stdin lines on a background task so the prompt never blocks the runtime.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF (Ctrl+D)
                Err(e) => {
                    debug!("stdin closed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Ctrl+C interrupts a running turn, or ends the session when idle.
fn spawn_ctrl_c_handler(busy: Arc<AtomicBool>, interrupt: Interrupt, quit: Arc<Notify>) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if busy.load(Ordering::SeqCst) {
                eprintln!("\n  [interrupt requested; stopping after the current step]");
                interrupt.raise();
            } else {
                quit.notify_one();
            }
        }
    });
}
