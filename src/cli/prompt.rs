//! Interactive confirmation of replacements on a terminal.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use colored::Colorize;

use crate::extract::{Decision, Prompter};

const QUESTION: &str = "Replace? [Y]es / [n]o / [t]ag as final / [N]ext file: ";

/// Prompter reading answers line by line.
///
/// End of input moves on to the next file, so a closed stdin never blocks.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, original: &str, replacement: &str) {
        let _ = writeln!(self.output, "{} {}", "-".red(), original.red());
        let _ = writeln!(self.output, "{} {}", "+".green(), replacement.green());
        let _ = write!(self.output, "{}", QUESTION.bold());
        let _ = self.output.flush();
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, original: &str, replacement: &str) -> Decision {
        self.show(original, replacement);
        loop {
            let mut answer = String::new();
            match self.input.read_line(&mut answer) {
                Ok(0) | Err(_) => {
                    let _ = writeln!(self.output);
                    return Decision::Next;
                }
                Ok(_) => {}
            }

            if let Some(decision) = Decision::from_answer(&answer) {
                return decision;
            }
            let _ = write!(
                self.output,
                "{} unknown answer {:?}. {}",
                "warning:".bold().yellow(),
                answer.trim(),
                QUESTION.bold()
            );
            let _ = self.output.flush();
        }
    }

    fn moving_to_next_file(&mut self) {
        let _ = writeln!(
            self.output,
            "{}",
            "Leaving the rest of this file unchanged.".dimmed()
        );
    }
}
