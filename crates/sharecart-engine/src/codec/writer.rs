use std::fmt::Write as _;
use std::io::{self, Write};

use sharecart_core::format::{
    FALSE_LITERAL, KEY_MISC, KEY_NAME, KEY_SWITCH, KEY_X, KEY_Y, LINE_BREAK, TITLE, TRUE_LITERAL,
    VALUE_DELIMITER,
};
use sharecart_core::Record;

/// Render a record in the `o_o.ini` text format.
///
/// Deterministic: the same record always yields the same bytes. The name is
/// written verbatim, without quoting or escaping.
pub fn encode(record: &Record) -> String {
    let mut out = String::with_capacity(256 + record.name.len());
    push_line(&mut out, TITLE);

    push_pair(&mut out, KEY_X, record.x);
    push_pair(&mut out, KEY_Y, record.y);
    for (key, value) in KEY_MISC.iter().zip(record.misc) {
        push_pair(&mut out, key, value);
    }
    push_pair(&mut out, KEY_NAME, &record.name);
    for (key, value) in KEY_SWITCH.iter().zip(record.switches) {
        push_pair(&mut out, key, bool_literal(value));
    }
    out
}

fn bool_literal(value: bool) -> &'static str {
    if value {
        TRUE_LITERAL
    } else {
        FALSE_LITERAL
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(LINE_BREAK);
}

fn push_pair(out: &mut String, key: &str, value: impl std::fmt::Display) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{key}{VALUE_DELIMITER}{value}{LINE_BREAK}");
}

/// Writes records to an owned sink; the sink is closed when the writer drops.
pub struct CartWriter<W: Write> {
    inner: W,
}

impl<W: Write> CartWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write the whole record and flush.
    pub fn write(&mut self, record: &Record) -> io::Result<()> {
        self.inner.write_all(encode(record).as_bytes())?;
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
