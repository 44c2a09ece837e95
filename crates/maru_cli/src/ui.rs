use colored::*;
use maru_core::{InstallUi, ProgressReporter};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io;
use std::sync::Arc;

use crate::progress::ConsoleReporter;

pub fn step(msg: &str) {
    println!("{} {}", ">>".cyan().bold(), msg.bright_white());
}

pub fn ok(msg: &str) {
    println!("{} {}", "✔".green().bold(), msg.green());
}

pub fn warn(msg: &str) {
    println!("{} {}", "⚠️".yellow().bold(), msg.yellow());
}

pub fn err(msg: &str) {
    eprintln!("{} {}", "[!]".red().bold(), msg.red());
}

/// Exit code for a run cut short by Ctrl-C.
pub const INTERRUPTED_EXIT: i32 = 130;

pub fn interrupted() -> ! {
    println!("{}", "\n\n>> Interrupted, exiting.".yellow().bold());
    std::process::exit(INTERRUPTED_EXIT);
}

/// What a prompt produced.
#[derive(Debug)]
enum Answer {
    Line(io::Result<String>),
    /// Ctrl-C at the prompt. rustyline swallows the signal, so the
    /// process-wide handler never sees it.
    Interrupted,
}

fn answer(result: Result<String, ReadlineError>) -> Answer {
    match result {
        Ok(line) => Answer::Line(Ok(line)),
        Err(ReadlineError::Interrupted) => Answer::Interrupted,
        Err(ReadlineError::Io(e)) => Answer::Line(Err(e)),
        Err(ReadlineError::Eof) => Answer::Line(Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"))),
        Err(e) => Answer::Line(Err(io::Error::other(e.to_string()))),
    }
}

/// Interactive terminal front end for an install run.
pub struct TerminalUi {
    reporter: Arc<ConsoleReporter>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            reporter: Arc::new(ConsoleReporter::new()),
        }
    }
}

impl InstallUi for TerminalUi {
    fn say(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn step(&mut self, msg: &str) {
        step(msg);
    }

    fn warn(&mut self, msg: &str) {
        warn(msg);
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut rl = DefaultEditor::new().map_err(|e| io::Error::other(e.to_string()))?;
        match answer(rl.readline(&prompt.cyan().to_string())) {
            Answer::Line(line) => line,
            Answer::Interrupted => interrupted(),
        }
    }

    fn progress(&self) -> Arc<dyn ProgressReporter> {
        self.reporter.clone()
    }
}
