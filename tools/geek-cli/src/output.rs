//! Output formatting for the CLI.
//!
//! Status lines go to stderr so stdout carries only command data (SQL,
//! hashes, JSON) and can be piped.

use console::{style, Term};

#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    fn status(&self, line: String) {
        if self.json {
            return;
        }
        let _ = self.term.write_line(&line);
    }

    pub fn info(&self, msg: &str) {
        self.status(format!("{} {}", style("ℹ").blue(), msg));
    }

    pub fn success(&self, msg: &str) {
        self.status(format!("{} {}", style("✓").green(), msg));
    }

    pub fn warn(&self, msg: &str) {
        self.status(format!("{} {}", style("⚠").yellow(), msg));
    }

    /// Errors are printed in JSON mode too, as `{"error": ...}`.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.status(format!("{} {}", style("→").dim(), style(msg).dim()));
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.status(format!("  {}: {}", style(key).dim(), value));
    }

    /// Command data on stdout.
    pub fn data(&self, text: &str) {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Whether prompts can be shown.
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}
