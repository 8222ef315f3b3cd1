use std::io::{IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

/// Line-oriented questions on stdin/stdout.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one trimmed line. Closed input is an error.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        write_question(question).await?;
        self.read_line().await.map(|line| line.trim().to_string())
    }

    /// Like [`Prompt::ask`] but typed characters are not echoed. The answer is
    /// returned untrimmed.
    ///
    /// Piped input has no terminal to silence and is read as a plain line.
    pub async fn ask_secret(&mut self, question: &str) -> anyhow::Result<String> {
        write_question(question).await?;
        if !std::io::stdin().is_terminal() {
            return self.read_line().await;
        }
        tokio::task::spawn_blocking(read_hidden_line).await?
    }

    async fn read_line(&mut self) -> anyhow::Result<String> {
        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => anyhow::bail!("input closed before setup finished"),
        }
    }
}

async fn write_question(question: &str) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{question}: ").as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Restores cooked mode on every exit path.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Submit,
    Abort,
}

fn apply_key(buffer: &mut String, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyOutcome::Abort
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyOutcome::Continue
        }
        KeyCode::Backspace => {
            buffer.pop();
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

fn read_hidden_line() -> anyhow::Result<String> {
    let mut buffer = String::new();
    let outcome = {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                match apply_key(&mut buffer, key) {
                    KeyOutcome::Continue => continue,
                    outcome => break outcome,
                }
            }
        }
    };
    println!();
    std::io::stdout().flush()?;

    match outcome {
        KeyOutcome::Abort => anyhow::bail!("password entry cancelled"),
        _ => Ok(buffer),
    }
}
