//! User interaction behind a trait so decision logic can run without a
//! terminal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{}", "=".repeat(60));
    println!(" {}", text);
    println!("{}", "=".repeat(60));
}

pub trait Prompter {
    /// Pick one of `items`, shown 1-based. `None` on invalid, out-of-range
    /// or missing input.
    fn choose(&mut self, prompt: &str, items: &[String]) -> Option<usize>;

    /// Yes/no question; an empty answer takes `default`
    fn confirm(&mut self, question: &str, default: bool) -> bool;

    /// Free-form answer, trimmed; `None` on end of input
    fn ask(&mut self, prompt: &str) -> Option<String>;
}

/// Line-based prompts over any reader/writer pair
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<BufReader<File>, io::Stdout> {
    /// Prompts on the terminal. Stdin is read one byte at a time so that
    /// lines typed ahead for `az login` or the deploy script stay unread.
    pub fn stdio() -> io::Result<Self> {
        Ok(Self::unbuffered(stdin_file()?, io::stdout()))
    }
}

impl<W: Write> TerminalPrompter<BufReader<File>, W> {
    pub fn unbuffered(input: File, output: W) -> Self {
        Self::new(BufReader::with_capacity(1, input), output)
    }
}

#[cfg(unix)]
fn stdin_file() -> io::Result<File> {
    use std::os::fd::AsFd;
    Ok(File::from(io::stdin().as_fd().try_clone_to_owned()?))
}

#[cfg(windows)]
fn stdin_file() -> io::Result<File> {
    use std::os::windows::io::AsHandle;
    Ok(File::from(io::stdin().as_handle().try_clone_to_owned()?))
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn into_input(self) -> R {
        self.input
    }

    fn read_answer(&mut self, prompt: &str) -> Option<String> {
        write!(self.output, "{}", prompt).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose(&mut self, prompt: &str, items: &[String]) -> Option<usize> {
        if items.is_empty() {
            return None;
        }

        writeln!(self.output).ok()?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "  [{:2}] {}", i + 1, item).ok()?;
        }
        writeln!(self.output).ok()?;

        let answer = self.read_answer(&format!("{} (1-{}): ", prompt, items.len()))?;
        let index = answer.parse::<usize>().ok()?;
        (1..=items.len()).contains(&index).then(|| index - 1)
    }

    fn confirm(&mut self, question: &str, default: bool) -> bool {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        let answer = match self.read_answer(&format!("{} {}: ", question, hint)) {
            Some(a) => a.to_lowercase(),
            None => return false,
        };

        if default {
            answer != "n" && answer != "no"
        } else {
            answer == "y" || answer == "yes"
        }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.read_answer(prompt)
    }
}
