/*!
 * Demo Console
 * Line-oriented output shared between the driver and its new-handler
 */

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};
use std::rc::Rc;

enum Sink {
    Stdout(io::Stdout),
    Captured(Vec<u8>),
}

/// Cloneable handle to the demo's output
///
/// Stdout lines are flushed immediately since a demo may abort right after
/// printing.
#[derive(Clone)]
pub struct Console {
    sink: Rc<RefCell<Sink>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::with_sink(Sink::Stdout(io::stdout()))
    }

    /// Console that records lines in memory
    pub fn captured() -> Self {
        Self::with_sink(Sink::Captured(Vec::new()))
    }

    fn with_sink(sink: Sink) -> Self {
        Self {
            sink: Rc::new(RefCell::new(sink)),
        }
    }

    /// Write one line
    pub fn line(&self, text: impl Display) -> io::Result<()> {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout(out) => {
                let mut out = out.lock();
                writeln!(out, "{}", text)?;
                out.flush()
            }
            Sink::Captured(buf) => writeln!(buf, "{}", text),
        }
    }

    /// Recorded output; empty for stdout consoles
    pub fn output(&self) -> String {
        match &*self.sink.borrow() {
            Sink::Stdout(_) => String::new(),
            Sink::Captured(buf) => String::from_utf8_lossy(buf).into_owned(),
        }
    }

    /// Recorded output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_owned).collect()
    }
}
