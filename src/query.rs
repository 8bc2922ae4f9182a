// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of json-scan, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

//! Navigation over a token array produced by a successful parse.
//!
//! Every function takes the input buffer and the token slice the parser
//! filled, and works with token indices. Nothing here recurses: a subtree is
//! delimited by byte offsets alone, so walking one is a linear scan.

use std::fmt::{self, Debug, Formatter};

use bstr::ByteSlice;
use thiserror::Error;

use crate::token::{Token, TokenKind};

/// One step of a path through a document.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Descend into the member with this key. The key is compared against
    /// the raw token bytes, so escaped keys match their escaped spelling.
    Key(&'a [u8]),
    /// Descend into the n-th element.
    Index(usize),
}

impl Debug for Step<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Step::Key(key) => write!(f, "Key({:?})", key.as_bstr()),
            Step::Index(n) => write!(f, "Index({n})"),
        }
    }
}

/// An error from decoding a primitive token's bytes.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum DecodeError {
    #[error("token is not a primitive")]
    NotPrimitive,
    #[error("not an integer literal")]
    NotAnInteger,
    #[error("integer does not fit in 64 bits")]
    Overflow,
    #[error("not a boolean literal")]
    NotABool,
}

/// Returns the index one past `index` and its entire subtree.
///
/// Tokens appear in input order, so the subtree of `index` is exactly the
/// following tokens whose ranges start before `tokens[index]` ends.
pub fn sibling(tokens: &[Token], index: usize) -> usize {
    let end = tokens[index].end;
    let mut next = index + 1;
    while next < tokens.len() && tokens[next].start < end {
        next += 1;
    }
    next
}

/// Returns the index of the value for `key` in the object at `object`, or
/// `None` when `object` is not an object or the key is absent.
pub fn member(input: &[u8], tokens: &[Token], object: usize, key: &[u8]) -> Option<usize> {
    if tokens[object].kind != TokenKind::Object {
        return None;
    }
    let mut at = object + 1;
    for _ in 0..tokens[object].size {
        let value = at + 1;
        if tokens[at].bytes(input) == key {
            return Some(value);
        }
        at = sibling(tokens, value);
    }
    None
}

/// Returns the index of the `n`-th element of the array at `array`, or
/// `None` when `array` is not an array or has fewer elements.
pub fn element(tokens: &[Token], array: usize, n: usize) -> Option<usize> {
    if tokens[array].kind != TokenKind::Array || n >= tokens[array].size {
        return None;
    }
    let mut at = array + 1;
    for _ in 0..n {
        at = sibling(tokens, at);
    }
    Some(at)
}

/// Walks `steps` down from the root token and returns the destination index.
pub fn locate(input: &[u8], tokens: &[Token], steps: &[Step<'_>]) -> Option<usize> {
    if tokens.is_empty() {
        return None;
    }
    let mut at = 0;
    for &step in steps {
        at = match step {
            Step::Key(key) => member(input, tokens, at, key)?,
            Step::Index(n) => element(tokens, at, n)?,
        };
    }
    Some(at)
}

/// Decodes a primitive token as a signed 64-bit integer.
///
/// Only the integer production is accepted: an optional `-` and digits.
/// Fractions, exponents, and values outside `i64` are errors.
pub fn to_i64(input: &[u8], token: &Token) -> Result<i64, DecodeError> {
    if token.kind != TokenKind::Primitive {
        return Err(DecodeError::NotPrimitive);
    }
    let bytes = token.bytes(input);
    let (negative, digits) = match bytes.split_first() {
        Some((&b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(DecodeError::NotAnInteger);
    }
    // Fold in the negative range, which holds one more value than the
    // positive one, so that i64::MIN parses.
    let mut value = 0i64;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(DecodeError::NotAnInteger);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub((b - b'0') as i64))
            .ok_or(DecodeError::Overflow)?;
    }
    if negative {
        Ok(value)
    } else {
        value.checked_neg().ok_or(DecodeError::Overflow)
    }
}

/// Decodes a `true` or `false` token.
pub fn to_bool(input: &[u8], token: &Token) -> Result<bool, DecodeError> {
    if token.kind != TokenKind::Primitive {
        return Err(DecodeError::NotPrimitive);
    }
    match token.bytes(input) {
        b"true" => Ok(true),
        b"false" => Ok(false),
        _ => Err(DecodeError::NotABool),
    }
}

/// Returns whether the token is the `null` literal.
pub fn is_null(input: &[u8], token: &Token) -> bool {
    token.kind == TokenKind::Primitive && token.bytes(input) == b"null"
}
