//! Input and output seams for the shell engine.
//!
//! The engine reads one line per prompt cycle through [`InputSource`] and
//! writes through the line-oriented [`OutputSink`]. Standard-stream
//! implementations are provided for interactive use; the scripted and
//! in-memory implementations drive the engine in tests and embeddings.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Source of user input lines.
pub trait InputSource {
    /// Reads one line, without its trailing newline. `Ok(None)` signals end
    /// of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Line input from standard input.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Pre-scripted input lines, consumed in order. End of script reads as end
/// of input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Creates a script from the given lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Line-oriented text sink.
pub trait OutputSink {
    /// Appends a message followed by a line break.
    fn append_line(&mut self, msg: &str);
    /// Appends a message without a line break.
    fn append(&mut self, msg: &str);
}

/// Sink writing to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn append_line(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn append(&mut self, msg: &str) {
        print!("{msg}");
        let _ = io::stdout().flush();
    }
}

/// In-memory sink sharing its buffer, so output written by a shell that
/// owns the sink stays inspectable from outside.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Rc<RefCell<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle onto the sink's buffer.
    pub fn buffer(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.buffer)
    }
}

impl OutputSink for MemorySink {
    fn append_line(&mut self, msg: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(msg);
        buffer.push('\n');
    }

    fn append(&mut self, msg: &str) {
        self.buffer.borrow_mut().push_str(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_drains_in_order() {
        let mut input = ScriptedInput::new(["a", "b"]);
        assert_eq!(input.read_line().unwrap(), Some("a".to_string()));
        assert_eq!(input.read_line().unwrap(), Some("b".to_string()));
        assert_eq!(input.read_line().unwrap(), None);
    }

    #[test]
    fn test_memory_sink_is_shared() {
        let mut sink = MemorySink::new();
        let buffer = sink.buffer();

        sink.append("a");
        sink.append_line("b");
        assert_eq!(*buffer.borrow(), "ab\n");
    }
}
