//! Indented line reporter

/// Spaces emitted per indentation level
pub const TAB_SIZE: usize = 2;

/// Destination for formatted text
pub trait TextSink {
    fn write_str(&mut self, text: &str);
}

impl TextSink for String {
    fn write_str(&mut self, text: &str) {
        self.push_str(text);
    }
}

impl TextSink for Vec<String> {
    fn write_str(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

impl<T: TextSink + ?Sized> TextSink for &mut T {
    fn write_str(&mut self, text: &str) {
        (**self).write_str(text);
    }
}

/// Formats progress text and forwards it to a sink
///
/// Indentation is written once at the start of each line as its own segment.
/// When a prefix is set every segment handed to the sink is written as
/// `"<prefix>: <text>"`.
#[derive(Debug)]
pub struct Reporter<S> {
    sink: S,
    prefix: Option<String>,
    level: usize,
    line_start: bool,
}

impl<S: TextSink> Reporter<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            prefix: None,
            level: 0,
            line_start: true,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Current indentation level
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn indent(&mut self, levels: usize) {
        self.level += levels;
    }

    /// Decrease indentation, never below zero
    pub fn outdent(&mut self, levels: usize) {
        self.level = self.level.saturating_sub(levels);
    }

    /// Append text without ending the line
    pub fn write(&mut self, text: &str) {
        if self.line_start {
            if self.level > 0 {
                let padding = " ".repeat(self.level * TAB_SIZE);
                self.sink.write_str(&padding);
            }
            self.line_start = false;
        }

        match &self.prefix {
            Some(prefix) => self.sink.write_str(&format!("{prefix}: {text}")),
            None => self.sink.write_str(text),
        }
    }

    /// Append text and end the line
    pub fn write_line(&mut self, text: &str) {
        self.write(&format!("{text}\n"));
        self.line_start = true;
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}
