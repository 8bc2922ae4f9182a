// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of json-scan, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

mod frame;
mod lexer;
mod parser;

pub use parser::*;

/// Result of a parser call. [`Status::Partial`] is not a failure, so it sits
/// inside the `Ok` arm; the `Err` arm is terminal for the parse session.
pub type PResult<T> = Result<Status<T>, ParseError>;
