use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{BufRead, Cursor, Result as IoResult, Write};
use std::rc::Rc;

/// Where the dispatcher gets its lines from.
///
/// `read_line` blocks until a line is available and returns `Ok(None)` once the
/// source is exhausted. The returned line has no trailing newline.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Whether the source shows `prompt` itself. When it doesn't, the
    /// dispatcher writes the prompt to its output before each read.
    fn renders_prompt(&self) -> bool {
        false
    }
}

/// Interactive terminal input with line editing.
pub struct Editor {
    inner: DefaultEditor,
}

impl Editor {
    /// Open the terminal for line editing.
    pub fn new() -> Result<Self> {
        let inner = DefaultEditor::new().context("failed to set up line editor")?;
        Ok(Self { inner })
    }
}

fn editor_line(result: rustyline::Result<String>) -> Result<Option<String>> {
    match result {
        Ok(line) => Ok(Some(line)),
        // Ctrl-C abandons the current line, like an empty one.
        Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
        Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err).context("failed to read from the terminal"),
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        editor_line(self.inner.readline(prompt))
    }

    fn renders_prompt(&self) -> bool {
        true
    }
}

/// Line input from any buffered reader: piped stdin, a file, or a script.
pub struct LineReader<R> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineReader<Cursor<Vec<u8>>> {
    /// A source that yields `lines` in order and then reports end of input.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = Vec::new();
        for line in lines {
            buf.extend_from_slice(line.as_ref().as_bytes());
            buf.push(b'\n');
        }
        Self::new(Cursor::new(buf))
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("failed to read input line")?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Memory-backed writer for capturing what the dispatcher prints.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Create a writer together with a handle for reading back what it collected.
    pub fn with_handle() -> (Self, CapturedOutput) {
        let writer = MemWriter::new();
        let handle = CapturedOutput(Rc::clone(&writer.buf));
        (writer, handle)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Read side of a [`MemWriter`].
#[derive(Clone)]
pub struct CapturedOutput(Rc<RefCell<Vec<u8>>>);

impl CapturedOutput {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Collected output as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}
