use std::cell::RefCell;
use std::fmt::Display;
use std::io::Write;
use std::rc::Rc;

/// Human-readable status output.
///
/// Cloning shares the same sink, so a scoped guard can hold its own handle
/// while the manager keeps writing.
#[derive(Debug, Clone)]
pub struct Console {
    sink: Sink,
}

#[derive(Debug, Clone)]
enum Sink {
    Stdout,
    Memory(Rc<RefCell<Vec<String>>>),
}

impl Console {
    pub fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Console that records lines instead of printing them
    pub fn memory() -> (Self, CapturedLines) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let console = Self {
            sink: Sink::Memory(Rc::clone(&lines)),
        };
        (console, CapturedLines { lines })
    }

    pub fn line(&self, text: impl Display) {
        match &self.sink {
            Sink::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{}", text);
            }
            Sink::Memory(lines) => lines.borrow_mut().push(text.to_string()),
        }
    }

    /// Like [`Console::line`] but leaves the cursor on the same line
    pub fn prompt(&self, text: impl Display) {
        match &self.sink {
            Sink::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = write!(out, "{}", text);
                let _ = out.flush();
            }
            Sink::Memory(lines) => lines.borrow_mut().push(text.to_string()),
        }
    }
}

/// Read side of [`Console::memory`]
#[derive(Debug, Clone)]
pub struct CapturedLines {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CapturedLines {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn count_of(&self, text: &str) -> usize {
        self.lines.borrow().iter().filter(|l| l.as_str() == text).count()
    }
}

pub const COMPLETION_NOTICE: &str = "Operation complete.";

/// Prints [`COMPLETION_NOTICE`] when dropped, on every exit path.
pub(crate) struct CompletionNotice {
    console: Console,
}

impl CompletionNotice {
    pub(crate) fn new(console: Console) -> Self {
        Self { console }
    }
}

impl Drop for CompletionNotice {
    fn drop(&mut self) {
        self.console.line(COMPLETION_NOTICE);
    }
}
