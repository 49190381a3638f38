use std::io::{self, BufRead};

use sharecart_core::constraints::{
    clamp_misc, clamp_name, clamp_x, clamp_y, valid_misc, valid_name, valid_x, valid_y,
};
use sharecart_core::format::{
    KEY_MISC, KEY_NAME, KEY_SWITCH, KEY_X, KEY_Y, QUOTE, TITLE, VALUE_DELIMITER,
};
use sharecart_core::{FormatError, ReadError, Record, ValueKind};

/// Parses the `o_o.ini` text format into a [`Record`].
///
/// Two policies:
/// * **strict** fails with a [`FormatError`] on the first malformed or
///   out-of-range token;
/// * **lenient** never fails on content: bad values fall back to `0` /
///   `false`, out-of-range values are clamped, invalid UTF-8 is replaced
///   with U+FFFD, and a missing line is tolerated by retrying the unmatched
///   token once against the next key.
///
/// The reader owns its input, which is released when the reader drops.
pub struct CartReader<R> {
    input: R,
    buf: Vec<u8>,
    line: usize,
    strict: bool,
    pending: Pending,
}

/// Token held back after it failed to match its expected key.
enum Pending {
    None,
    Retry { token: String, line: usize },
}

/// Why a read pass stopped early.
enum Stop {
    Eof { expected: &'static str },
    Fail(ReadError),
}

impl From<io::Error> for Stop {
    fn from(e: io::Error) -> Self {
        Stop::Fail(ReadError::Io(e))
    }
}

impl From<FormatError> for Stop {
    fn from(e: FormatError) -> Self {
        Stop::Fail(ReadError::Format(e))
    }
}

impl<R: BufRead> CartReader<R> {
    /// A lenient reader over `input`.
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: Vec::new(),
            line: 0,
            strict: false,
            pending: Pending::None,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Read one full record.
    ///
    /// In lenient mode only I/O failures are returned; running out of input
    /// leaves the remaining fields at their defaults.
    pub fn read(&mut self) -> Result<Record, ReadError> {
        let mut record = Record::default();
        match self.read_into(&mut record) {
            Ok(()) => Ok(record),
            Err(Stop::Eof { expected }) if self.strict => Err(FormatError::UnexpectedEof {
                line: self.line + 1,
                expected,
            }
            .into()),
            Err(Stop::Eof { expected }) => {
                tracing::debug!(expected, line = self.line, "sharecart file ended early");
                Ok(record)
            }
            Err(Stop::Fail(e)) => Err(e),
        }
    }

    fn read_into(&mut self, record: &mut Record) -> Result<(), Stop> {
        self.next_token(TITLE)?;

        let (x, line) = self.read_int(KEY_X)?;
        if !valid_x(x) {
            self.reject(KEY_X, x, line)?;
        }
        record.x = clamp_x(x);

        let (y, line) = self.read_int(KEY_Y)?;
        if !valid_y(y) {
            self.reject(KEY_Y, y, line)?;
        }
        record.y = clamp_y(y);

        for (slot, key) in record.misc.iter_mut().zip(KEY_MISC) {
            let (misc, line) = self.read_int(key)?;
            if !valid_misc(misc) {
                self.reject(key, misc, line)?;
            }
            *slot = clamp_misc(misc);
        }

        let name = self.read_value(KEY_NAME)?;
        if let Some((value, line)) = &name {
            if !valid_name(Some(value.as_str())) {
                self.reject(KEY_NAME, value, *line)?;
            }
        }
        record.name = clamp_name(name.as_ref().map(|(v, _)| v.as_str()));

        for (slot, key) in record.switches.iter_mut().zip(KEY_SWITCH) {
            *slot = self.read_bool(key)?;
        }
        Ok(())
    }

    /// Strict mode fails on a constraint violation; lenient mode lets the caller clamp.
    fn reject(
        &self,
        key: &'static str,
        value: impl ToString,
        line: usize,
    ) -> Result<(), FormatError> {
        if self.strict {
            return Err(FormatError::ConstraintViolation {
                line,
                key,
                value: value.to_string(),
            });
        }
        Ok(())
    }

    fn next_token(&mut self, expected: &'static str) -> Result<(String, usize), Stop> {
        self.buf.clear();
        if self.input.read_until(b'\n', &mut self.buf)? == 0 {
            return Err(Stop::Eof { expected });
        }
        self.line += 1;

        let mut raw = self.buf.as_slice();
        if let Some(rest) = raw.strip_suffix(b"\n") {
            raw = rest;
        }
        if let Some(rest) = raw.strip_suffix(b"\r") {
            raw = rest;
        }

        let token = match std::str::from_utf8(raw) {
            Ok(text) => text.to_string(),
            Err(_) if self.strict => {
                return Err(FormatError::InvalidEncoding {
                    line: self.line,
                    expected,
                }
                .into())
            }
            Err(_) => {
                tracing::debug!(line = self.line, "replacing invalid UTF-8 in sharecart token");
                String::from_utf8_lossy(raw).into_owned()
            }
        };
        Ok((token, self.line))
    }

    /// Value of the next `key=value` token, quotes stripped.
    ///
    /// `None` means the parameter is absent (lenient mode only).
    fn read_value(&mut self, key: &'static str) -> Result<Option<(String, usize)>, Stop> {
        loop {
            let (token, line, retried) = match std::mem::replace(&mut self.pending, Pending::None)
            {
                Pending::Retry { token, line } => (token, line, true),
                Pending::None => {
                    let (token, line) = self.next_token(key)?;
                    (token, line, false)
                }
            };

            let Some((found, value)) = split_pair(&token) else {
                if self.strict {
                    return Err(FormatError::InvalidDefinition {
                        line,
                        expected: key,
                        token,
                    }
                    .into());
                }
                return Ok(None);
            };

            if self.key_matches(found, key) {
                return Ok(Some((strip_quotes(value).to_string(), line)));
            }

            if self.strict {
                return Err(FormatError::UnexpectedKey {
                    line,
                    expected: key,
                    found: found.to_string(),
                }
                .into());
            }

            if retried {
                // Second miss in a row: the token is garbage, drop it and
                // try the following one for this key.
                tracing::debug!(line, token = %token, "discarding unmatched sharecart token");
                continue;
            }
            self.pending = Pending::Retry { token, line };
            return Ok(None);
        }
    }

    /// Integer value of `key`; `0` when missing or malformed in lenient mode.
    fn read_int(&mut self, key: &'static str) -> Result<(i64, usize), Stop> {
        let Some((value, line)) = self.read_value(key)? else {
            return Ok((0, self.line));
        };
        if !is_digits(&value) {
            if self.strict {
                return Err(FormatError::InvalidValue {
                    line,
                    key,
                    value,
                    kind: ValueKind::Integer,
                }
                .into());
            }
            return Ok((0, line));
        }
        // Digits only, so the sole failure is overflow.
        Ok((value.parse().unwrap_or(i64::MAX), line))
    }

    fn read_bool(&mut self, key: &'static str) -> Result<bool, Stop> {
        let Some((value, line)) = self.read_value(key)? else {
            return Ok(false);
        };
        if value.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return Ok(false);
        }
        if self.strict {
            return Err(FormatError::InvalidValue {
                line,
                key,
                value,
                kind: ValueKind::Boolean,
            }
            .into());
        }
        // Lenient: a numeric switch is on when non-zero.
        Ok(is_digits(&value) && value.bytes().any(|b| b != b'0'))
    }

    fn key_matches(&self, found: &str, key: &str) -> bool {
        if self.strict {
            found == key
        } else {
            found.eq_ignore_ascii_case(key)
        }
    }
}

/// Split `KEY=VALUE` at the first delimiter. `None` without a delimiter or with an empty key.
fn split_pair(token: &str) -> Option<(&str, &str)> {
    token
        .split_once(VALUE_DELIMITER)
        .filter(|(key, _)| !key.is_empty())
}

/// Drop one quote from each end, never reducing the value below one character.
fn strip_quotes(value: &str) -> &str {
    let mut value = value;
    if value.len() > 1 {
        if let Some(rest) = value.strip_prefix(QUOTE) {
            value = rest;
        }
    }
    if value.len() > 1 {
        if let Some(rest) = value.strip_suffix(QUOTE) {
            value = rest;
        }
    }
    value
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
