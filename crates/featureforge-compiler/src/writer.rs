//! Indentation-aware builder for the engine's configuration language

/// Default number of spaces per nesting level
pub const DEFAULT_INDENT: usize = 4;

/// Line-oriented writer for HOCON-style blocks.
///
/// Each `open` must be paired with a `close`; `finish` does not check this.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    buf: String,
    depth: usize,
    indent: usize,
}

impl ConfigWriter {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent(indent: usize) -> Self {
        Self {
            buf: String::new(),
            depth: 0,
            indent,
        }
    }

    /// Write one line at the current depth
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for _ in 0..self.depth * self.indent {
            self.buf.push(' ');
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
        self
    }

    /// Write an empty line
    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// `key: value`, value written as is
    pub fn field(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        self.line(format!("{}: {}", key, value.as_ref()))
    }

    /// `key: "value"`, value escaped
    pub fn quoted(&mut self, key: &str, value: &str) -> &mut Self {
        self.field(key, quote(value))
    }

    /// `key: {` and descend one level
    pub fn open(&mut self, key: &str) -> &mut Self {
        self.line(format!("{}: {{", key));
        self.depth += 1;
        self
    }

    /// `}` one level up
    pub fn close(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("}")
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for ConfigWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a string for the configuration language (JSON string escaping)
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// `[a,b,c]`
pub fn list<S: AsRef<str>>(items: &[S]) -> String {
    let joined: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
    format!("[{}]", joined.join(","))
}

/// `["a","b","c"]`
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s.as_ref())).collect();
    format!("[{}]", quoted.join(","))
}
