use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copies through the terminal with an OSC 52 escape sequence, which most
/// terminal emulators (and tmux with `set-clipboard on`) forward to the
/// system clipboard.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps the last copied value in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
