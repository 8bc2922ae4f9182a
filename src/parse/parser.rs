// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of json-scan, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use std::fmt::{self, Debug, Formatter};

use enumflags2::{bitflags, BitFlags};
use static_assertions::assert_impl_all;
use thiserror::Error;

use crate::{
    parse::{
        frame::{Container, Expect, Frame, FrameStack},
        lexer::{self, Scanned},
        PResult,
    },
    token::{Token, TokenKind},
};

/// The default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Sentinel for the `end` of a container whose closer has not been seen yet.
const OPEN_END: usize = usize::MAX;

/// A resumable, non-recursive JSON tokenizer.
///
/// The parser reads the input buffer once, in order, and emits a flat array
/// of [`Token`]s describing byte ranges of that buffer. It allocates nothing:
/// the caller owns the input and the token slice, and the open-container
/// bookkeeping lives in an inline stack of `MAX_DEPTH` frames.
///
/// When the buffer ends mid-document, [`Parser::parse`] returns
/// [`Status::Partial`] and the parser remembers exactly how far it got.
/// Calling it again with the same buffer extended by more bytes (and the
/// same token slice) continues the scan and produces the same tokens as a
/// one-shot parse of the full input.
///
/// ```
/// use json_scan::{Parser, Status, Token, TokenKind};
///
/// let input = b"{\"a\":[1,2]}";
/// let mut tokens = [Token::default(); 8];
/// let mut parser: Parser = Parser::new();
/// let status = parser.parse(input, &mut tokens)?;
/// assert_eq!(status, Status::Complete(5));
/// assert_eq!(tokens[0].kind, TokenKind::Object);
/// assert_eq!(tokens[1].bytes(input), b"a");
/// # Ok::<(), json_scan::ParseError>(())
/// ```
#[derive(Clone)]
pub struct Parser<const MAX_DEPTH: usize = DEFAULT_MAX_DEPTH> {
    /// The next byte offset to examine.
    pos: usize,
    /// The next token index to allocate; the token count on completion.
    next_token: usize,
    /// Accepted deviations from RFC 8259.
    relaxed: BitFlags<Relaxed>,
    /// Whether a top-level value has been accepted.
    root_done: bool,
    /// The currently-open containers, innermost last.
    frames: FrameStack<MAX_DEPTH>,
}

assert_impl_all!(Parser: Send, Sync);
assert_impl_all!(Token: Send, Sync, Copy);

/// The outcome of a parse call that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status<T> {
    /// The buffer held a complete document.
    Complete(T),
    /// The buffer ends inside the document. Extend it and call again.
    Partial,
}

/// A terminal parse failure. The contained offset is the failing byte,
/// best-effort.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// The caller's token slice is full.
    #[error("token slice full at byte {0}")]
    TokenLimit(usize),
    /// The input violates the JSON grammar.
    #[error("invalid JSON at byte {0}")]
    Syntax(usize),
    /// Nesting exceeds the parser's depth limit.
    #[error("nesting too deep at byte {0}")]
    DepthLimit(usize),
}

/// Deviations from RFC 8259 accepted by [`Parser::relaxed`].
#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxed {
    /// Permit digits after a leading `0` in numbers.
    LeadingZeros,
    /// Permit multiple whitespace-separated top-level values.
    MultipleValues,
}

impl<T> Status<T> {
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Complete(_))
    }

    #[inline]
    pub fn is_partial(&self) -> bool {
        matches!(self, Status::Partial)
    }

    /// Returns the completed value.
    ///
    /// # Panics
    ///
    /// Panics when the status is [`Status::Partial`].
    #[inline]
    pub fn unwrap(self) -> T {
        match self {
            Status::Complete(value) => value,
            Status::Partial => panic!("incomplete parse"),
        }
    }
}

impl ParseError {
    /// The byte offset the failure was detected at.
    #[inline]
    pub fn pos(&self) -> usize {
        match *self {
            ParseError::TokenLimit(pos) | ParseError::Syntax(pos) | ParseError::DepthLimit(pos) => {
                pos
            }
        }
    }
}

/// Destination for emitted tokens. The driver runs the same grammar in both
/// modes; only the emitter differs.
enum Sink<'t> {
    /// Write tokens into the caller's slice.
    Fill(&'t mut [Token]),
    /// Only count the tokens a fill-mode parse would produce.
    Count,
}

impl Sink<'_> {
    /// The token at `index`, when this sink writes tokens at all.
    #[inline(always)]
    fn token_mut(&mut self, index: Option<usize>) -> Option<&mut Token> {
        match self {
            Sink::Fill(tokens) => index.map(|i| &mut tokens[i]),
            Sink::Count => None,
        }
    }
}

impl<const MAX_DEPTH: usize> Parser<MAX_DEPTH> {
    /// Creates a parser that accepts strict RFC 8259 input only.
    #[inline]
    pub fn new() -> Self {
        Parser::relaxed(BitFlags::empty())
    }

    /// Creates a parser that additionally accepts the given deviations.
    #[inline]
    pub fn relaxed(relaxed: BitFlags<Relaxed>) -> Self {
        Parser {
            pos: 0,
            next_token: 0,
            relaxed,
            root_done: false,
            frames: FrameStack::new(),
        }
    }

    /// Re-initializes the parser for a new document. The relaxations are
    /// kept.
    #[inline]
    pub fn reset(&mut self) {
        *self = Parser::relaxed(self.relaxed);
    }

    /// The byte offset the parser will examine next.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The number of currently-open containers.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Tokenizes `input` into `tokens` and returns the number of tokens used.
    ///
    /// On [`Status::Partial`], call again with the same buffer extended by
    /// more bytes (the length must never shrink) and the same token slice;
    /// already-emitted tokens are kept and the scan continues where it left
    /// off. An incomplete trailing value leaves no trace: the parser state is
    /// exactly that of a buffer ending just before the value.
    ///
    /// An `Err` is terminal for the session; [`Parser::reset`] starts a new
    /// one.
    pub fn parse(&mut self, input: &[u8], tokens: &mut [Token]) -> PResult<usize> {
        self.run(input, &mut Sink::Fill(tokens))
    }

    /// Counts the tokens [`Parser::parse`] would emit, writing none.
    ///
    /// The count for any input equals fill-mode's, so a count-only pass can
    /// size the token slice for a second full pass. Count-only mode never
    /// fails with [`ParseError::TokenLimit`].
    pub fn count(&mut self, input: &[u8]) -> PResult<usize> {
        self.run(input, &mut Sink::Count)
    }

    fn run(&mut self, input: &[u8], sink: &mut Sink) -> PResult<usize> {
        while self.pos < input.len() {
            match input[self.pos] {
                b if lexer::is_space(b) => self.pos += 1,
                b'{' => self.open(sink, Container::Object)?,
                b'[' => self.open(sink, Container::Array)?,
                b'}' => self.close(sink, Container::Object)?,
                b']' => self.close(sink, Container::Array)?,
                b':' => self.colon()?,
                b',' => self.comma()?,
                b'"' if self.expecting_key() => {
                    if self.key(input, sink)?.is_partial() {
                        return Ok(Status::Partial);
                    }
                }
                _ => {
                    if self.value(input, sink)?.is_partial() {
                        return Ok(Status::Partial);
                    }
                }
            }
        }
        if self.frames.is_empty() && self.root_done {
            Ok(Status::Complete(self.next_token))
        } else {
            Ok(Status::Partial)
        }
    }

    /// Whether a `"` at the cursor starts an object key rather than a value.
    #[inline]
    fn expecting_key(&self) -> bool {
        matches!(
            self.frames.top(),
            Some(top) if top.container == Container::Object
                && matches!(top.expect, Expect::KeyOrEnd | Expect::Key)
        )
    }

    /// Opens a container. The opener is itself a value for the enclosing
    /// context.
    fn open(&mut self, sink: &mut Sink, container: Container) -> Result<(), ParseError> {
        self.accept_value(sink)?;
        let tok = self.emit(sink, container.kind(), self.pos, OPEN_END)?;
        if !self.frames.try_push(Frame::open(container, tok)) {
            return Err(ParseError::DepthLimit(self.pos));
        }
        self.pos += 1;
        Ok(())
    }

    /// Closes a container, finalizing its token's end offset.
    fn close(&mut self, sink: &mut Sink, container: Container) -> Result<(), ParseError> {
        let Some(top) = self.frames.pop() else {
            return Err(ParseError::Syntax(self.pos));
        };
        // A closer is legal only where a first child or a comma could
        // appear; a dangling key, colon, or comma rejects it.
        let closeable = matches!(
            top.expect,
            Expect::KeyOrEnd | Expect::ValueOrEnd | Expect::CommaOrEnd
        );
        if top.container != container || !closeable {
            return Err(ParseError::Syntax(self.pos));
        }
        if let Some(token) = sink.token_mut(top.tok) {
            token.end = self.pos + 1;
        }
        self.pos += 1;
        if self.frames.is_empty() {
            self.root_done = true;
        }
        Ok(())
    }

    fn colon(&mut self) -> Result<(), ParseError> {
        match self.frames.top_mut() {
            Some(top) if top.container == Container::Object && top.expect == Expect::Colon => {
                top.expect = Expect::Value;
                self.pos += 1;
                Ok(())
            }
            _ => Err(ParseError::Syntax(self.pos)),
        }
    }

    fn comma(&mut self) -> Result<(), ParseError> {
        match self.frames.top_mut() {
            Some(top) if top.expect == Expect::CommaOrEnd => {
                top.expect = match top.container {
                    Container::Object => Expect::Key,
                    Container::Array => Expect::Value,
                };
                self.pos += 1;
                Ok(())
            }
            _ => Err(ParseError::Syntax(self.pos)),
        }
    }

    /// Parses a string in key position and emits its token.
    fn key(&mut self, input: &[u8], sink: &mut Sink) -> PResult<()> {
        match lexer::scan_string(input, self.pos) {
            Scanned::End(end) => {
                self.emit(sink, TokenKind::String, self.pos + 1, end - 1)?;
                // The key's colon comes next. Size is counted when the
                // member's value is accepted, not here.
                if let Some(top) = self.frames.top_mut() {
                    top.expect = Expect::Colon;
                }
                self.pos = end;
                Ok(Status::Complete(()))
            }
            Scanned::More => Ok(Status::Partial),
            Scanned::Bad(at) => Err(ParseError::Syntax(at)),
        }
    }

    /// Parses one value (string, number, or literal) at the cursor,
    /// validating its placement first.
    ///
    /// When the buffer ends inside the value, every side effect of accepting
    /// it is undone, so the parser is left as if the buffer had ended just
    /// before the value started.
    fn value(&mut self, input: &[u8], sink: &mut Sink) -> PResult<()> {
        let saved_expect = self.frames.top().map(|top| top.expect);
        let saved_root_done = self.root_done;
        self.accept_value(sink)?;

        let leading_zeros = self.relaxed.contains(Relaxed::LeadingZeros);
        let scanned = match input[self.pos] {
            b'"' => lexer::scan_string(input, self.pos),
            b't' => lexer::scan_literal(input, self.pos, b"true"),
            b'f' => lexer::scan_literal(input, self.pos, b"false"),
            b'n' => lexer::scan_literal(input, self.pos, b"null"),
            b'-' | b'0'..=b'9' => lexer::scan_number(input, self.pos, leading_zeros),
            _ => Scanned::Bad(self.pos),
        };
        match scanned {
            Scanned::End(end) => {
                if input[self.pos] == b'"' {
                    self.emit(sink, TokenKind::String, self.pos + 1, end - 1)?;
                } else {
                    self.emit(sink, TokenKind::Primitive, self.pos, end)?;
                }
                self.pos = end;
                Ok(Status::Complete(()))
            }
            Scanned::More => {
                // Undo accept_value: restore the container's expectation and
                // its size, or the root marker. The cursor never moved.
                if let (Some(expect), Some(top)) = (saved_expect, self.frames.top_mut()) {
                    top.expect = expect;
                    let tok = top.tok;
                    if let Some(token) = sink.token_mut(tok) {
                        token.size -= 1;
                    }
                }
                self.root_done = saved_root_done;
                Ok(Status::Partial)
            }
            Scanned::Bad(at) => Err(ParseError::Syntax(at)),
        }
    }

    /// Validates that a value may appear at the cursor and counts it in its
    /// container, exactly once per accepted child.
    fn accept_value(&mut self, sink: &mut Sink) -> Result<(), ParseError> {
        let Some(top) = self.frames.top_mut() else {
            if self.root_done && !self.relaxed.contains(Relaxed::MultipleValues) {
                return Err(ParseError::Syntax(self.pos));
            }
            self.root_done = true;
            return Ok(());
        };
        match (top.container, top.expect) {
            (Container::Array, Expect::ValueOrEnd | Expect::Value)
            | (Container::Object, Expect::Value) => {
                top.expect = Expect::CommaOrEnd;
                let tok = top.tok;
                if let Some(token) = sink.token_mut(tok) {
                    token.size += 1;
                }
                Ok(())
            }
            _ => Err(ParseError::Syntax(self.pos)),
        }
    }

    /// Allocates the next token slot, or only advances the counter in
    /// count-only mode.
    fn emit(
        &mut self,
        sink: &mut Sink,
        kind: TokenKind,
        start: usize,
        end: usize,
    ) -> Result<Option<usize>, ParseError> {
        match sink {
            Sink::Fill(tokens) => {
                let Some(slot) = tokens.get_mut(self.next_token) else {
                    return Err(ParseError::TokenLimit(self.pos));
                };
                *slot = Token {
                    kind,
                    start,
                    end,
                    size: 0,
                    #[cfg(feature = "parent-links")]
                    parent: self.frames.top().and_then(|top| top.tok),
                };
                let index = self.next_token;
                self.next_token += 1;
                Ok(Some(index))
            }
            Sink::Count => {
                self.next_token += 1;
                Ok(None)
            }
        }
    }
}

impl<const MAX_DEPTH: usize> Default for Parser<MAX_DEPTH> {
    fn default() -> Self {
        Parser::new()
    }
}

impl<const MAX_DEPTH: usize> Debug for Parser<MAX_DEPTH> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("pos", &self.pos)
            .field("next_token", &self.next_token)
            .field("relaxed", &self.relaxed)
            .field("root_done", &self.root_done)
            .field("frames", &self.frames)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use bstr::ByteSlice;

    use super::*;

    /// Inputs that parse to completion in strict mode, exercising every
    /// grammar production. Each ends at a byte where no trailing value could
    /// still grow.
    const CORPUS: &[&[u8]] = &[
        b"{}",
        b"[]",
        b"[[]]",
        b"{\"a\":{}}",
        b"[1,2,3]",
        b"\"lone string\"",
        b"{\"a\":[1,{\"b\":\"c\"}]}",
        b"{\"async\":\"working\",\"num\":1234}",
        b" { \"a\" : [ true , false , null ] } ",
        b"[-1,0,2.5,1e10,1.25e-3,0.0]",
        b"{\"esc\":\"a\\n\\\"b\\\"\\u00e9\",\"deep\":[[[{\"x\":[]}]]]}",
        b"[\"\",{},[],\"x\"]",
        b"123 ",
        b"true\n",
    ];

    fn parse_all(input: &[u8]) -> Vec<Token> {
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        let mut tokens = vec![Token::default(); input.len() + 1];
        let count = match parser.parse(input, &mut tokens) {
            Ok(Status::Complete(count)) => count,
            other => panic!("{:?}: {other:?}", input.as_bstr()),
        };
        tokens.truncate(count);
        tokens
    }

    /// Asserts `(kind, start, end, size)` for every token of `input`.
    fn assert_tokens(input: &[u8], expect: &[(TokenKind, usize, usize, usize)]) {
        let tokens = parse_all(input);
        let got: Vec<_> = tokens
            .iter()
            .map(|t| (t.kind, t.start, t.end, t.size))
            .collect();
        assert_eq!(got, expect, "{:?}", input.as_bstr());
    }

    use TokenKind::*;

    #[test]
    fn empty_object() {
        assert_tokens(b"{}", &[(Object, 0, 2, 0)]);
    }

    #[test]
    fn flat_array() {
        assert_tokens(
            b"[1,2,3]",
            &[
                (Array, 0, 7, 3),
                (Primitive, 1, 2, 0),
                (Primitive, 3, 4, 0),
                (Primitive, 5, 6, 0),
            ],
        );
    }

    #[test]
    fn nested_containers() {
        // Keys and string values exclude their quotes.
        assert_tokens(
            b"{\"a\":[1,{\"b\":\"c\"}]}",
            &[
                (Object, 0, 19, 1),
                (String, 2, 3, 0),
                (Array, 5, 18, 2),
                (Primitive, 6, 7, 0),
                (Object, 8, 17, 1),
                (String, 10, 11, 0),
                (String, 14, 15, 0),
            ],
        );
    }

    #[test]
    fn string_escapes_stay_escaped() {
        let input = b"{\"k\":\"a\\u00e9\\n\"}";
        let tokens = parse_all(input);
        assert_eq!(tokens[2].bytes(input), b"a\\u00e9\\n");
    }

    #[test]
    fn keys_alternate_with_values() {
        let input = b"{\"a\":1,\"b\":[2],\"c\":{\"d\":null}}";
        let tokens = parse_all(input);
        assert_eq!(tokens[0].size, 3);
        let mut at = 1;
        for _ in 0..tokens[0].size {
            assert_eq!(tokens[at].kind, String, "key at {at}");
            at = crate::query::sibling(&tokens, at + 1);
        }
        assert_eq!(at, tokens.len());
    }

    #[test]
    fn offsets_stay_in_bounds() {
        for &input in CORPUS {
            for token in parse_all(input) {
                assert!(token.start <= token.end, "{:?}", input.as_bstr());
                assert!(token.end <= input.len(), "{:?}", input.as_bstr());
            }
        }
    }

    #[test]
    fn every_split_point_agrees_with_one_shot() {
        for &input in CORPUS {
            let expect = parse_all(input);

            // A fresh parser on every proper prefix either needs more input
            // or already agrees with the one-shot parse.
            for k in 0..input.len() {
                let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
                let mut tokens = vec![Token::default(); input.len() + 1];
                match parser.parse(&input[..k], &mut tokens) {
                    Ok(Status::Partial) => {}
                    Ok(Status::Complete(count)) => {
                        tokens.truncate(count);
                        assert_eq!(tokens, expect, "{:?} split {k}", input.as_bstr());
                    }
                    Err(err) => panic!("{:?} split {k}: {err}", input.as_bstr()),
                }
            }

            // One parser fed the growing buffer byte by byte converges on
            // the identical token array.
            let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
            let mut tokens = vec![Token::default(); input.len() + 1];
            for k in 0..input.len() {
                let status = parser.parse(&input[..k], &mut tokens).unwrap();
                assert!(
                    status.is_partial() || parse_all(&input[..k]) == expect[..],
                    "{:?} grown to {k}",
                    input.as_bstr(),
                );
            }
            let count = parser.parse(input, &mut tokens).unwrap().unwrap();
            tokens.truncate(count);
            assert_eq!(tokens, expect, "{:?} grown", input.as_bstr());
        }
    }

    #[test]
    fn count_mode_matches_fill_mode() {
        for &input in CORPUS {
            let mut counter = Parser::<DEFAULT_MAX_DEPTH>::new();
            let count = counter.count(input).unwrap().unwrap();
            assert_eq!(count, parse_all(input).len(), "{:?}", input.as_bstr());

            // Also at every split point, where both modes must agree on
            // Partial versus Complete.
            for k in 0..input.len() {
                let mut filler = Parser::<DEFAULT_MAX_DEPTH>::new();
                let mut counter = Parser::<DEFAULT_MAX_DEPTH>::new();
                let mut tokens = vec![Token::default(); input.len() + 1];
                let filled = filler.parse(&input[..k], &mut tokens);
                let counted = counter.count(&input[..k]);
                assert_eq!(filled, counted, "{:?} split {k}", input.as_bstr());
            }
        }
    }

    #[test]
    fn count_mode_matches_fill_mode_on_errors() {
        for input in [
            &b"{\"a\" 1}"[..],
            b"[1 2]",
            b"{,}",
            b"[,1]",
            b"{\"a\":}",
            b"[1,]",
            b"]",
            b"}",
            b":",
            b",",
            b"{]",
            b"[}",
            b"{\"a\":1]",
            b"01",
            b"x",
            b"\"\x01\"",
            b"\"\\q\"",
            b"{} []",
        ] {
            let mut filler = Parser::<DEFAULT_MAX_DEPTH>::new();
            let mut counter = Parser::<DEFAULT_MAX_DEPTH>::new();
            let mut tokens = vec![Token::default(); input.len() + 2];
            let filled = filler.parse(input, &mut tokens);
            let counted = counter.count(input);
            assert_eq!(filled, counted, "{:?}", input.as_bstr());
            assert!(matches!(filled, Err(ParseError::Syntax(_))), "{:?}", input.as_bstr());
        }
    }

    #[test]
    fn partial_is_idempotent() {
        for (input, expect_pos) in [
            (&b"{\"a\":[1,{\"b\""[..], 12),
            (b"{\"async\":\"work", 9),
            (b"[1,2,", 5),
            (b"\"a\\u12", 0),
            (b"-", 0),
            (b"  ", 2),
            (b"", 0),
        ] {
            let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
            let mut tokens = [Token::default(); 8];
            assert_eq!(parser.parse(input, &mut tokens), Ok(Status::Partial));
            let (pos, depth, next_token, root_done) = (
                parser.pos,
                parser.depth(),
                parser.next_token,
                parser.root_done,
            );
            assert_eq!(pos, expect_pos, "{:?}", input.as_bstr());

            // Retrying without new bytes changes nothing.
            assert_eq!(parser.parse(input, &mut tokens), Ok(Status::Partial));
            assert_eq!(parser.pos, pos);
            assert_eq!(parser.depth(), depth);
            assert_eq!(parser.next_token, next_token);
            assert_eq!(parser.root_done, root_done);
        }
    }

    #[test]
    fn incomplete_value_rolls_back_container_size() {
        let full = b"[1, 23]";
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        let mut tokens = [Token::default(); 4];

        // `23` may still grow, so it is not accepted and the array size
        // stays at the one committed element.
        assert_eq!(parser.parse(&full[..6], &mut tokens), Ok(Status::Partial));
        assert_eq!(tokens[0].size, 1);
        assert_eq!(parser.next_token, 2);

        assert_eq!(parser.parse(full, &mut tokens), Ok(Status::Complete(3)));
        assert_eq!(tokens[0].size, 2);
        assert_eq!(tokens[2].bytes(full), b"23");
    }

    #[test]
    fn resumed_scenario_splits() {
        let input = b"{\"async\":\"working\",\"num\":1234}";
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        let mut tokens = [Token::default(); 8];
        for split in [6, 16, 25] {
            assert_eq!(
                parser.parse(&input[..split], &mut tokens),
                Ok(Status::Partial),
                "split {split}",
            );
        }
        assert_eq!(parser.parse(input, &mut tokens), Ok(Status::Complete(5)));
        assert_eq!(tokens[0].size, 2);
        assert_eq!(tokens[4].bytes(input), b"1234");
    }

    #[test]
    fn empty_input_needs_more() {
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        assert_eq!(parser.count(b""), Ok(Status::Partial));
        assert_eq!(parser.count(b" \t\r\n"), Ok(Status::Partial));
    }

    #[test]
    fn depth_limit_is_exact() {
        let mut nested = Vec::new();
        nested.extend_from_slice(&[b'['; 8]);
        nested.extend_from_slice(&[b']'; 8]);
        let mut parser = Parser::<8>::new();
        let mut tokens = [Token::default(); 8];
        assert_eq!(parser.parse(&nested, &mut tokens), Ok(Status::Complete(8)));
        assert_eq!(tokens[0].range(), 0..16);

        let mut parser = Parser::<8>::new();
        assert_eq!(parser.count(&[b'['; 9]), Err(ParseError::DepthLimit(8)));
    }

    #[test]
    fn token_capacity_is_exact() {
        let input = b"[1,2,3]";
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        let mut three = [Token::default(); 3];
        assert_eq!(
            parser.parse(input, &mut three),
            Err(ParseError::TokenLimit(5)),
        );

        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        let mut four = [Token::default(); 4];
        assert_eq!(parser.parse(input, &mut four), Ok(Status::Complete(4)));
    }

    #[test]
    fn strict_rejects_leading_zeros() {
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        assert_eq!(parser.count(b"01"), Err(ParseError::Syntax(1)));

        // Relaxed, the same bytes are one number still waiting for its
        // delimiter, then a complete parse.
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::relaxed(Relaxed::LeadingZeros.into());
        assert_eq!(parser.count(b"01"), Ok(Status::Partial));
        assert_eq!(parser.count(b"01 "), Ok(Status::Complete(1)));
    }

    #[test]
    fn strict_rejects_second_root() {
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
        assert_eq!(parser.count(b"{} []"), Err(ParseError::Syntax(3)));
    }

    #[test]
    fn relaxed_accepts_multiple_roots() {
        let input = b"{} []";
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::relaxed(Relaxed::MultipleValues.into());
        let mut tokens = [Token::default(); 2];
        assert_eq!(parser.parse(input, &mut tokens), Ok(Status::Complete(2)));
        assert_eq!(tokens[0].range(), 0..2);
        assert_eq!(tokens[1].range(), 3..5);
        assert_eq!(tokens[1].kind, Array);
    }

    #[test]
    fn error_offsets_point_at_the_failing_byte() {
        for (input, at) in [
            (&b"{\"a\" 1}"[..], 5),
            (b"[1 2]", 3),
            (b"{\"a\":}", 5),
            (b"[1,]", 3),
            (b"tru3,", 3),
            (b"falsey]", 5),
            (b"\"\x02\"", 1),
            (b"\"\\q\"", 2),
            (b"\"\\u12g4\"", 5),
            (b"1ex", 2),
        ] {
            let mut parser = Parser::<DEFAULT_MAX_DEPTH>::new();
            match parser.count(input) {
                Err(err) => assert_eq!(err.pos(), at, "{:?}", input.as_bstr()),
                ok => panic!("{:?}: {ok:?}", input.as_bstr()),
            }
        }
    }

    #[test]
    fn reset_starts_a_new_session() {
        let mut parser = Parser::<DEFAULT_MAX_DEPTH>::relaxed(Relaxed::LeadingZeros.into());
        assert_eq!(parser.count(b"[1,"), Ok(Status::Partial));
        parser.reset();
        assert_eq!(parser.count(b"07 "), Ok(Status::Complete(1)));
    }

    #[cfg(feature = "parent-links")]
    #[test]
    fn parent_links_point_at_enclosing_container() {
        let input = b"{\"a\":[1]}";
        let tokens = parse_all(input);
        let parents: Vec<_> = tokens.iter().map(|t| t.parent).collect();
        assert_eq!(parents, [None, Some(0), Some(0), Some(2)]);
    }
}
