// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of json-scan, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

//! Single-pass, zero-allocation JSON tokenizer and structural validator for
//! hostile, embedded, and streaming input.
//!
//! [`Parser`] scans a byte buffer once and emits a flat array of [`Token`]s,
//! each referring to a byte range of the caller's buffer. Nothing is decoded
//! and nothing is allocated during the scan; string unescaping, number
//! decoding, and navigation over the token array are deferred to [`query`]
//! and [`unescape`]. A buffer that ends mid-document yields
//! [`Status::Partial`](parse::Status), and the same parser resumes when
//! called again with a longer buffer.

mod token;
pub mod parse;
pub mod query;
pub mod sse;
mod unescape;

pub use parse::{ParseError, Parser, Relaxed, Status};
pub use token::{Token, TokenKind};
pub use unescape::{unescape, UnescapeError};
