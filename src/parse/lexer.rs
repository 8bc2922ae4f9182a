// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of json-scan, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

//! Lexical recognizers for the non-structural lexemes: strings, numbers, and
//! the three literals.
//!
//! Each recognizer is a pure function of the buffer and a start offset. It
//! never writes tokens and never touches parser state, so a [`Scanned::More`]
//! outcome needs no rewind: the driver simply leaves its cursor at the start
//! of the lexeme and the next call re-scans it from the first byte.

/// Outcome of one lexical recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Scanned {
    /// The lexeme ends at the contained offset (exclusive).
    End(usize),
    /// The buffer ends before the lexeme can be decided.
    More,
    /// The byte at the contained offset violates the grammar.
    Bad(usize),
}

/// Returns whether `b` is insignificant whitespace.
#[inline(always)]
pub(super) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Returns whether `b` may legally follow a number or literal.
#[inline(always)]
fn is_delimiter(b: u8) -> bool {
    matches!(b, b',' | b']' | b'}') || is_space(b)
}

#[inline(always)]
fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Scans a string whose opening quote is at `at`.
///
/// The returned end covers the closing quote, so the value bytes are
/// `at + 1 .. end - 1`. Escape sequences are validated, not decoded; a
/// `\uXXXX` escape is exactly four hex digits, with surrogate halves
/// accepted independently.
pub(super) fn scan_string(input: &[u8], at: usize) -> Scanned {
    debug_assert_eq!(input[at], b'"', "not at a string");
    let mut i = at + 1;
    loop {
        let Some(&b) = input.get(i) else {
            return Scanned::More;
        };
        match b {
            b'"' => return Scanned::End(i + 1),
            // Raw control characters are never legal inside a string.
            0x00..=0x1f => return Scanned::Bad(i),
            b'\\' => {
                let Some(&esc) = input.get(i + 1) else {
                    return Scanned::More;
                };
                match esc {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => i += 2,
                    b'u' => {
                        for j in i + 2..i + 6 {
                            match input.get(j).copied() {
                                None => return Scanned::More,
                                Some(d) if !is_hex(d) => return Scanned::Bad(j),
                                Some(_) => {}
                            }
                        }
                        i += 6;
                    }
                    _ => return Scanned::Bad(i + 1),
                }
            }
            _ => i += 1,
        }
    }
}

/// Scans a number starting at `at` (a `-` or a digit).
///
/// The grammar is `-? int frac? exp?`; `leading_zeros` tolerates digits after
/// a leading `0`. A number is never committed at the end of the buffer, since
/// more digits may still follow; the byte after it must be a delimiter.
pub(super) fn scan_number(input: &[u8], at: usize, leading_zeros: bool) -> Scanned {
    let mut i = at;
    if input.get(i).copied() == Some(b'-') {
        i += 1;
    }
    match input.get(i).copied() {
        None => return Scanned::More,
        Some(b'0') => {
            i += 1;
            if leading_zeros {
                i = eat_digits(input, i);
            } else if input.get(i).is_some_and(u8::is_ascii_digit) {
                return Scanned::Bad(i);
            }
        }
        Some(b'1'..=b'9') => i = eat_digits(input, i + 1),
        Some(_) => return Scanned::Bad(i),
    }
    if input.get(i).copied() == Some(b'.') {
        i += 1;
        match input.get(i).copied() {
            None => return Scanned::More,
            Some(b'0'..=b'9') => i = eat_digits(input, i + 1),
            Some(_) => return Scanned::Bad(i),
        }
    }
    if matches!(input.get(i).copied(), Some(b'e' | b'E')) {
        i += 1;
        if matches!(input.get(i).copied(), Some(b'+' | b'-')) {
            i += 1;
        }
        match input.get(i).copied() {
            None => return Scanned::More,
            Some(b'0'..=b'9') => i = eat_digits(input, i + 1),
            Some(_) => return Scanned::Bad(i),
        }
    }
    match input.get(i).copied() {
        None => Scanned::More,
        Some(b) if is_delimiter(b) => Scanned::End(i),
        Some(_) => Scanned::Bad(i),
    }
}

#[inline(always)]
fn eat_digits(input: &[u8], mut i: usize) -> usize {
    while input.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

/// Scans the literal `lit` (`true`, `false`, or `null`) starting at `at`.
///
/// The byte after the literal must be a delimiter; exhaustion there is still
/// indecisive, since a longer buffer could continue the lexeme.
pub(super) fn scan_literal(input: &[u8], at: usize, lit: &'static [u8]) -> Scanned {
    for (j, &expect) in lit.iter().enumerate() {
        match input.get(at + j).copied() {
            None => return Scanned::More,
            Some(b) if b != expect => return Scanned::Bad(at + j),
            Some(_) => {}
        }
    }
    let end = at + lit.len();
    match input.get(end).copied() {
        None => Scanned::More,
        Some(b) if is_delimiter(b) => Scanned::End(end),
        Some(_) => Scanned::Bad(end),
    }
}
