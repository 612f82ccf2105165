//! The once-per-second tick.

use std::io::{self, Write};

/// Something that can play the tick from the start.
pub trait TickSound {
    /// Restart playback. Errors are reported, never retried.
    fn restart(&mut self) -> io::Result<()>;
}

impl<T: TickSound + ?Sized> TickSound for Box<T> {
    fn restart(&mut self) -> io::Result<()> {
        (**self).restart()
    }
}

/// Rings the terminal bell.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> TickSound for TerminalBell<W> {
    fn restart(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// No sound at all.
#[derive(Debug, Default)]
pub struct Muted;

impl TickSound for Muted {
    fn restart(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_writes_bel() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.restart().unwrap();
        bell.restart().unwrap();
        assert_eq!(bell.out, b"\x07\x07");
    }

    #[test]
    fn test_boxed_sound() {
        let mut sound: Box<dyn TickSound> = Box::new(Muted);
        assert!(sound.restart().is_ok());
    }
}
