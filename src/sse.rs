// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of json-scan, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

//! Resumable extraction of `data:` payloads from a Server-Sent-Events
//! stream.
//!
//! The extractor shares the tokenizer's discipline for growing buffers: a
//! line is only consumed once its terminating `\n` is in the buffer, and an
//! incomplete trailing line is re-read from its first byte on the next call.

use memchr::memchr;

/// Returns the payload of the next `data:` line at or after `*pos`.
///
/// Complete lines that are empty, comments, or carry another field name are
/// skipped. The payload has one optional leading space stripped after the
/// colon and no trailing `\r`; an empty payload (`data:`) is valid. On
/// `Some`, `*pos` is one past the line's `\n`.
///
/// `None` means no complete `data` line remains. `*pos` is then left at the
/// start of the unterminated trailing line (clamped to the buffer length),
/// so calling again with a longer buffer re-reads that line whole.
pub fn next_data<'a>(input: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    let mut start = (*pos).min(input.len());
    loop {
        let Some(lf) = memchr(b'\n', &input[start..]) else {
            *pos = start;
            return None;
        };
        let mut line = &input[start..start + lf];
        start += lf + 1;
        if let [head @ .., b'\r'] = line {
            line = head;
        }
        if let Some(payload) = data_payload(line) {
            *pos = start;
            return Some(payload);
        }
    }
}

/// Returns the payload when `line` is a `data` field.
fn data_payload(line: &[u8]) -> Option<&[u8]> {
    let rest = line.strip_prefix(b"data")?;
    match rest {
        // A bare field name carries an empty value.
        [] => Some(b""),
        [b':', b' ', payload @ ..] => Some(payload),
        [b':', payload @ ..] => Some(payload),
        // Some longer field name, such as `database`.
        _ => None,
    }
}
