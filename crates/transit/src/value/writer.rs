//! Serialization of [`Value`] trees back into document text.

use std::fmt::Write as _;
use std::io;

use crate::models::Result;
use crate::value::Value;

/// Largest magnitude below which every integer is exactly representable.
pub(crate) const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Put every array item and object member on its own line.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }
}

impl WriteOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

/// Render `value` into a fresh string.
pub fn to_string(value: &Value, options: &WriteOptions) -> String {
    let mut out = String::new();
    Writer { out: &mut out, options }.write_value(value, 0);
    out
}

impl Value {
    /// Serialize into `writer`, followed by nothing (no trailing newline).
    pub fn write_to<W: io::Write>(&self, writer: &mut W, options: &WriteOptions) -> Result<()> {
        writer.write_all(to_string(self, options).as_bytes())?;
        Ok(())
    }
}

struct Writer<'a> {
    out: &'a mut String,
    options: &'a WriteOptions,
}

impl Writer<'_> {
    fn write_value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(*n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => {
                self.write_sequence('[', ']', items.iter(), depth, |w, item, depth| w.write_value(item, depth))
            }
            Value::Object(map) => self.write_sequence('{', '}', map.iter(), depth, |w, (key, item), depth| {
                w.write_string(key);
                w.out.push_str(if w.options.pretty { ": " } else { ":" });
                w.write_value(item, depth);
            }),
        }
    }

    fn write_sequence<T>(
        &mut self,
        open: char,
        close: char,
        items: impl ExactSizeIterator<Item = T>,
        depth: usize,
        mut write_item: impl FnMut(&mut Self, T, usize),
    ) {
        self.out.push(open);
        if items.len() == 0 {
            self.out.push(close);
            return;
        }

        for (i, item) in items.enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            write_item(self, item, depth + 1);
        }
        self.newline(depth);
        self.out.push(close);
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.push('\n');
            self.out.extend(std::iter::repeat(' ').take(depth * self.options.indent));
        }
    }

    fn write_number(&mut self, n: f64) {
        if !n.is_finite() {
            self.out.push_str("null");
        } else if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
            let _ = write!(self.out, "{}", n as i64);
        } else {
            // Display for f64 is the shortest text that reads back exactly
            let _ = write!(self.out, "{}", n);
        }
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}
