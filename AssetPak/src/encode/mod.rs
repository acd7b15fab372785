//! Escaping encoder
//!
//! Turns raw bytes into the body of a Rust byte-string literal, one `\xHH`
//! escape per byte. Long payloads are wrapped: after every `wrap_at`
//! escapes the writer emits a line continuation (a backslash, a newline and
//! the indent). Inside a byte-string literal the compiler drops the newline
//! and any leading whitespace that follows, so the wrapped literal has the
//! same value as the unwrapped one.
//!
//! [`StringWriter`] is an [`io::Write`] sink so it can sit behind another
//! writer. [`escape_gzip`] puts a GZIP encoder in front of it and the
//! compressed stream is escaped as it is produced.

use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";

/// Streaming byte-to-escape writer.
pub struct StringWriter<W: Write> {
    inner: W,
    indent: String,
    wrap_at: usize,
    written: usize,
}

impl<W: Write> StringWriter<W> {
    /// Wrap `inner`; a `wrap_at` of zero disables line breaks.
    pub fn new(inner: W, indent: impl Into<String>, wrap_at: usize) -> Self {
        Self {
            inner,
            indent: indent.into(),
            wrap_at,
            written: 0,
        }
    }

    /// Number of bytes escaped so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for StringWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut escape = [b'\\', b'x', 0, 0];

        for &byte in buf {
            escape[2] = LOWER_HEX[usize::from(byte >> 4)];
            escape[3] = LOWER_HEX[usize::from(byte & 0x0f)];
            self.inner.write_all(&escape)?;
            self.written += 1;

            if self.wrap_at != 0 && self.written % self.wrap_at == 0 {
                write!(self.inner, "\\\n{}", self.indent)?;
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Escape `data` without compression.
pub fn escape(data: &[u8], indent: &str, wrap_at: usize) -> String {
    let mut out = Vec::with_capacity(data.len() * 4);
    let mut writer = StringWriter::new(&mut out, indent, wrap_at);
    // Writes into a Vec cannot fail.
    let _ = writer.write_all(data);
    into_ascii(out)
}

/// GZIP `data` at `level` and escape the compressed stream.
///
/// # Errors
/// Returns an error if the compressor fails.
pub fn escape_gzip(data: &[u8], level: u32, indent: &str, wrap_at: usize) -> io::Result<String> {
    let mut out = Vec::with_capacity(data.len() * 2);
    {
        let writer = StringWriter::new(&mut out, indent, wrap_at);
        let mut gz = GzEncoder::new(writer, Compression::new(level));
        gz.write_all(data)?;
        gz.finish()?.flush()?;
    }
    Ok(into_ascii(out))
}

/// A complete `b"..."` literal for `data`.
pub fn quote(data: &[u8], indent: &str, wrap_at: usize) -> String {
    format!("b\"{}\"", escape(data, indent, wrap_at))
}

fn into_ascii(bytes: Vec<u8>) -> String {
    // Only hex digits, `\`, `x`, newlines and the whitespace indent are written.
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Decode a literal body produced by [`escape`], undoing continuations.
///
/// Returns `None` on anything that is not an escape or a continuation.
pub fn unescape(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 4);
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            return None;
        }
        match bytes.get(i + 1)? {
            b'x' => {
                let hex = text.get(i + 2..i + 4)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 4;
            }
            b'\n' => {
                i += 2;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
            }
            _ => return None,
        }
    }

    Some(out)
}
