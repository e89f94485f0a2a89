//! Tokenizer and scalar scanners over a chunked input stream.
//!
//! The [`Lexer`] copies the current chunk of its [`InputStream`] into an
//! internal buffer and consumes from there. When it is dropped, whatever is
//! left of that chunk is handed back with [`InputStream::back_up`], so the
//! stream ends up positioned exactly after the last consumed byte.
//!
//! Single-byte tokens are only consumed on request (`eat == true`). Number
//! starts are never consumed by [`Lexer::read_token`]; the literals `true`,
//! `false` and `null` are always consumed whole.
//!
//! ## Examples
//!
//! ```rust
//! use protojs::lexer::{Lexer, Token};
//! use protojs::stream::SliceInput;
//!
//! let mut input = SliceInput::with_chunk_size(br#"[ "7", -1.5e3 ]"#, 2);
//! let mut lexer = Lexer::new(&mut input);
//!
//! assert_eq!(lexer.read_token(true).unwrap(), Token::ArrayOpen);
//! assert_eq!(lexer.read_token(false).unwrap(), Token::StringStart);
//! assert_eq!(lexer.read_number_from_string().unwrap(), "7");
//! assert_eq!(lexer.read_token(true).unwrap(), Token::Comma);
//! assert_eq!(lexer.read_token(false).unwrap(), Token::NumberStart);
//! assert_eq!(lexer.read_number().unwrap(), "-1.5e3");
//! assert_eq!(lexer.read_token(true).unwrap(), Token::ArrayClose);
//! ```

use std::fmt;

use crate::stream::InputStream;
use crate::{Error, Result};

/// Longest numeric literal accepted, in bytes.
pub const MAX_NUMBER_LEN: usize = 64;

/// Deepest nesting [`Lexer::skip_value`] will follow.
pub const MAX_SKIP_DEPTH: usize = 128;

/// Classification of the next bytes of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Colon,
    Comma,
    StringStart,
    NumberStart,
    Null,
    True,
    False,
    /// End of input, or a byte that starts no token.
    None,
}

impl Token {
    /// Token for a byte that is consumed only on request.
    fn single_byte(b: u8) -> Option<Token> {
        match b {
            b'{' => Some(Token::ObjectOpen),
            b'}' => Some(Token::ObjectClose),
            b'[' => Some(Token::ArrayOpen),
            b']' => Some(Token::ArrayClose),
            b':' => Some(Token::Colon),
            b',' => Some(Token::Comma),
            b'"' => Some(Token::StringStart),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::ObjectOpen => "`{`",
            Token::ObjectClose => "`}`",
            Token::ArrayOpen => "`[`",
            Token::ArrayClose => "`]`",
            Token::Colon => "`:`",
            Token::Comma => "`,`",
            Token::StringStart => "string",
            Token::NumberStart => "number",
            Token::Null => "`null`",
            Token::True => "`true`",
            Token::False => "`false`",
            Token::None => "no token",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberState {
    Start,
    Minus,
    Zero,
    Integer,
    Dot,
    Fraction,
    Exp,
    ExpSign,
    ExpDigits,
}

impl NumberState {
    fn next(self, b: u8) -> Option<NumberState> {
        use NumberState::*;
        match (self, b) {
            (Start, b'-') => Some(Minus),
            (Start | Minus, b'0') => Some(Zero),
            (Start | Minus, b'1'..=b'9') => Some(Integer),
            (Integer, b'0'..=b'9') => Some(Integer),
            (Zero | Integer, b'.') => Some(Dot),
            (Dot | Fraction, b'0'..=b'9') => Some(Fraction),
            (Zero | Integer | Fraction, b'e' | b'E') => Some(Exp),
            (Exp, b'+' | b'-') => Some(ExpSign),
            (Exp | ExpSign | ExpDigits, b'0'..=b'9') => Some(ExpDigits),
            _ => None,
        }
    }

    fn is_accepting(self) -> bool {
        matches!(
            self,
            NumberState::Zero
                | NumberState::Integer
                | NumberState::Fraction
                | NumberState::ExpDigits
        )
    }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

#[inline]
fn ends_number(b: u8) -> bool {
    matches!(b, b'"' | b',' | b'}' | b']') || is_whitespace(b)
}

/// Pull tokenizer over an [`InputStream`].
pub struct Lexer<'a, I: InputStream + ?Sized> {
    input: &'a mut I,
    chunk: Vec<u8>,
    pos: usize,
    /// Bytes consumed before the current chunk.
    base: usize,
}

impl<'a, I: InputStream + ?Sized> Lexer<'a, I> {
    pub fn new(input: &'a mut I) -> Self {
        Lexer {
            input,
            chunk: Vec::new(),
            pos: 0,
            base: 0,
        }
    }

    /// Bytes consumed since the lexer was created.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn fill(&mut self) -> Result<bool> {
        self.base += self.chunk.len();
        self.chunk.clear();
        self.pos = 0;
        let data = self.input.next_chunk()?;
        self.chunk.extend_from_slice(data);
        Ok(!self.chunk.is_empty())
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        if self.pos == self.chunk.len() && !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.chunk[self.pos]))
    }

    #[inline]
    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Consumes JSON whitespace.
    pub fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(b) = self.peek_byte()? {
            if !is_whitespace(b) {
                break;
            }
            self.bump();
        }
        Ok(())
    }

    /// Returns `true` if only whitespace remains.
    pub fn is_at_end(&mut self) -> Result<bool> {
        self.skip_whitespace()?;
        Ok(self.peek_byte()?.is_none())
    }

    /// Classifies the next token after any whitespace.
    ///
    /// With `eat`, a single-byte token is consumed; without it the stream
    /// stays in front of that byte.
    ///
    /// # Errors
    ///
    /// Fails on a partial or misspelled `true`/`false`/`null`, and when the
    /// stream fails.
    pub fn read_token(&mut self, eat: bool) -> Result<Token> {
        self.skip_whitespace()?;
        let Some(b) = self.peek_byte()? else {
            return Ok(Token::None);
        };
        if let Some(token) = Token::single_byte(b) {
            if eat {
                self.bump();
            }
            return Ok(token);
        }
        match b {
            b'-' | b'0'..=b'9' => Ok(Token::NumberStart),
            b't' => self.literal(b"true", Token::True),
            b'f' => self.literal(b"false", Token::False),
            b'n' => self.literal(b"null", Token::Null),
            _ => Ok(Token::None),
        }
    }

    fn literal(&mut self, text: &'static [u8], token: Token) -> Result<Token> {
        for &expected in text {
            match self.peek_byte()? {
                Some(b) if b == expected => self.bump(),
                Some(b) => {
                    return Err(Error::syntax(
                        self.offset(),
                        format!("unexpected byte {:?} in {token}", char::from(b)),
                    ))
                }
                None => return Err(Error::unexpected_eof(self.offset(), token.to_string())),
            }
        }
        Ok(token)
    }

    /// Consumes the next token and checks that it is `expected`.
    pub fn expect(&mut self, expected: Token) -> Result<()> {
        let found = self.read_token(true)?;
        if found == expected {
            Ok(())
        } else {
            Err(self.unexpected(found, &expected.to_string()))
        }
    }

    /// Builds the error for `found` appearing where `expected` was required.
    pub fn unexpected(&mut self, found: Token, expected: &str) -> Error {
        let at_end = found == Token::None && matches!(self.peek_byte(), Ok(None));
        if at_end {
            Error::unexpected_eof(self.offset(), expected)
        } else {
            Error::syntax(self.offset(), format!("expected {expected}, found {found}"))
        }
    }

    /// Reads string content after the opening quote.
    ///
    /// Returns the raw bytes up to the closing quote, which is consumed.
    /// Escape pairs are copied verbatim.
    pub fn read_string(&mut self) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        loop {
            match self.peek_byte()? {
                Some(b'"') => {
                    self.bump();
                    return Ok(raw);
                }
                Some(b'\\') => {
                    self.bump();
                    raw.push(b'\\');
                    let escaped = self
                        .peek_byte()?
                        .ok_or_else(|| Error::unexpected_eof(self.offset(), "escape character"))?;
                    self.bump();
                    raw.push(escaped);
                }
                Some(b) => {
                    self.bump();
                    raw.push(b);
                }
                None => return Err(Error::unexpected_eof(self.offset(), "closing `\"`")),
            }
        }
    }

    /// Reads one JSON number.
    ///
    /// Stops in front of `"`, `,`, `}`, `]` or whitespace.
    ///
    /// # Errors
    ///
    /// Fails on text outside the JSON number grammar, on end of input, and on
    /// numbers longer than [`MAX_NUMBER_LEN`].
    pub fn read_number(&mut self) -> Result<String> {
        let start = self.offset();
        let mut text = String::new();
        let mut state = NumberState::Start;
        loop {
            let Some(b) = self.peek_byte()? else {
                return Err(Error::unexpected_eof(self.offset(), "end of number"));
            };
            if ends_number(b) {
                if state.is_accepting() {
                    return Ok(text);
                }
                return Err(Error::invalid_number(start, "number", text));
            }
            state = match state.next(b) {
                Some(next) => next,
                None => {
                    text.push(char::from(b));
                    return Err(Error::invalid_number(start, "number", text));
                }
            };
            if text.len() == MAX_NUMBER_LEN {
                return Err(Error::NumberTooLong {
                    offset: start,
                    limit: MAX_NUMBER_LEN,
                });
            }
            text.push(char::from(b));
            self.bump();
        }
    }

    /// Reads a number wrapped in double quotes, as used for 64-bit integers.
    pub fn read_number_from_string(&mut self) -> Result<String> {
        match self.peek_byte()? {
            Some(b'"') => self.bump(),
            Some(_) => {
                return Err(Error::syntax(self.offset(), "expected quoted number"));
            }
            None => return Err(Error::unexpected_eof(self.offset(), "quoted number")),
        }
        let text = self.read_number()?;
        // read_number only stops in front of a terminator
        match self.peek_byte()? {
            Some(b'"') => {
                self.bump();
                Ok(text)
            }
            _ => Err(Error::syntax(self.offset(), "expected `\"` after number")),
        }
    }

    /// Consumes one complete value whose first token has been peeked.
    ///
    /// `token` is the result of `read_token(false)`.
    ///
    /// # Errors
    ///
    /// Fails on malformed values and on nesting deeper than
    /// [`MAX_SKIP_DEPTH`].
    pub fn skip_value(&mut self, token: Token, depth: usize) -> Result<()> {
        match token {
            Token::Null | Token::True | Token::False => Ok(()),
            Token::NumberStart => self.read_number().map(drop),
            Token::StringStart => {
                self.bump();
                self.read_string().map(drop)
            }
            Token::ObjectOpen | Token::ArrayOpen => {
                if depth >= MAX_SKIP_DEPTH {
                    return Err(Error::DepthLimitExceeded(MAX_SKIP_DEPTH));
                }
                self.bump();
                if token == Token::ObjectOpen {
                    self.skip_members(depth)
                } else {
                    self.skip_elements(depth)
                }
            }
            other => Err(self.unexpected(other, "value")),
        }
    }

    fn skip_members(&mut self, depth: usize) -> Result<()> {
        if self.read_token(false)? == Token::ObjectClose {
            self.bump();
            return Ok(());
        }
        loop {
            self.expect(Token::StringStart)?;
            self.read_string()?;
            self.expect(Token::Colon)?;
            let token = self.read_token(false)?;
            self.skip_value(token, depth + 1)?;
            match self.read_token(true)? {
                Token::Comma => continue,
                Token::ObjectClose => return Ok(()),
                other => return Err(self.unexpected(other, "`,` or `}`")),
            }
        }
    }

    fn skip_elements(&mut self, depth: usize) -> Result<()> {
        if self.read_token(false)? == Token::ArrayClose {
            self.bump();
            return Ok(());
        }
        loop {
            let token = self.read_token(false)?;
            self.skip_value(token, depth + 1)?;
            match self.read_token(true)? {
                Token::Comma => continue,
                Token::ArrayClose => return Ok(()),
                other => return Err(self.unexpected(other, "`,` or `]`")),
            }
        }
    }
}

impl<I: InputStream + ?Sized> Drop for Lexer<'_, I> {
    fn drop(&mut self) {
        let unread = self.chunk.len() - self.pos;
        if unread > 0 {
            self.input.back_up(unread);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceInput;

    fn tokens(text: &[u8], chunk: usize) -> Vec<Token> {
        let mut input = SliceInput::with_chunk_size(text, chunk);
        let mut lexer = Lexer::new(&mut input);
        let mut out = Vec::new();
        loop {
            let token = lexer.read_token(true).unwrap();
            match token {
                Token::None => return out,
                Token::NumberStart => {
                    lexer.read_number().unwrap();
                }
                Token::StringStart => {
                    lexer.read_string().unwrap();
                }
                _ => {}
            }
            out.push(token);
        }
    }

    #[test]
    fn test_token_sequence_independent_of_chunking() {
        let text = br#" { "a" : [ true , false , null , 12 ] } "#;
        let expected = vec![
            Token::ObjectOpen,
            Token::StringStart,
            Token::Colon,
            Token::ArrayOpen,
            Token::True,
            Token::Comma,
            Token::False,
            Token::Comma,
            Token::Null,
            Token::Comma,
            Token::NumberStart,
            Token::ArrayClose,
            Token::ObjectClose,
        ];
        for chunk in [1, 2, 3, 7, text.len()] {
            assert_eq!(tokens(text, chunk), expected, "chunk size {chunk}");
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut input = SliceInput::new(b"[1]");
        let mut lexer = Lexer::new(&mut input);
        assert_eq!(lexer.read_token(false).unwrap(), Token::ArrayOpen);
        assert_eq!(lexer.read_token(false).unwrap(), Token::ArrayOpen);
        assert_eq!(lexer.offset(), 0);
        assert_eq!(lexer.read_token(true).unwrap(), Token::ArrayOpen);
        assert_eq!(lexer.offset(), 1);
        assert_eq!(lexer.read_token(true).unwrap(), Token::NumberStart);
        assert_eq!(lexer.offset(), 1);
    }

    #[test]
    fn test_bad_literals() {
        for text in [&b"tru"[..], b"nul", b"f"] {
            let mut input = SliceInput::with_chunk_size(text, 1);
            let err = Lexer::new(&mut input).read_token(true).unwrap_err();
            assert!(err.is_eof(), "{err}");
        }
        for text in [&b"trve"[..], b"nil", b"falsy"] {
            let mut input = SliceInput::new(text);
            let err = Lexer::new(&mut input).read_token(true).unwrap_err();
            assert!(matches!(err, Error::Syntax { .. }), "{err}");
        }
    }

    #[test]
    fn test_unknown_byte_is_none() {
        let mut input = SliceInput::new(b"x");
        let mut lexer = Lexer::new(&mut input);
        assert_eq!(lexer.read_token(true).unwrap(), Token::None);
        assert_eq!(lexer.offset(), 0);
    }

    fn number(text: &[u8]) -> Result<String> {
        let mut input = SliceInput::with_chunk_size(text, 1);
        let result = Lexer::new(&mut input).read_number();
        result
    }

    #[test]
    fn test_number_grammar() {
        for ok in ["0", "-0", "12", "-3.25", "1e5", "1E+5", "2.5e-3", "0.0"] {
            let text = format!("{ok},");
            assert_eq!(number(text.as_bytes()).unwrap(), ok);
        }
        for bad in ["01,", "-,", "1.,", ".5,", "1e,", "1e+,", "+1,", "1x,", "--1,"] {
            assert!(
                matches!(number(bad.as_bytes()), Err(Error::InvalidNumber { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_number_needs_terminator() {
        assert!(number(b"12").unwrap_err().is_eof());
        assert_eq!(number(b"12 ").unwrap(), "12");
        assert_eq!(number(b"12]").unwrap(), "12");
        assert_eq!(number(b"12}").unwrap(), "12");
    }

    #[test]
    fn test_number_too_long() {
        let long = format!("{},", "1".repeat(MAX_NUMBER_LEN + 1));
        assert!(matches!(
            number(long.as_bytes()),
            Err(Error::NumberTooLong { limit: MAX_NUMBER_LEN, .. })
        ));
        let fits = format!("{},", "1".repeat(MAX_NUMBER_LEN));
        assert_eq!(number(fits.as_bytes()).unwrap().len(), MAX_NUMBER_LEN);
    }

    #[test]
    fn test_quoted_number() {
        let mut input = SliceInput::with_chunk_size(br#""-9223372036854775808""#, 1);
        let mut lexer = Lexer::new(&mut input);
        assert_eq!(lexer.read_number_from_string().unwrap(), "-9223372036854775808");

        let mut input = SliceInput::new(b"42,");
        assert!(Lexer::new(&mut input).read_number_from_string().is_err());

        let mut input = SliceInput::new(br#""42x""#);
        assert!(Lexer::new(&mut input).read_number_from_string().is_err());
    }

    #[test]
    fn test_read_string_keeps_escapes() {
        let mut input = SliceInput::with_chunk_size(br#"a\"b\\"rest"#, 1);
        let mut lexer = Lexer::new(&mut input);
        assert_eq!(lexer.read_string().unwrap(), br#"a\"b\\"#);
        assert_eq!(lexer.offset(), 7);

        let mut input = SliceInput::new(br#"never closed"#);
        assert!(Lexer::new(&mut input).read_string().unwrap_err().is_eof());
    }

    #[test]
    fn test_skip_value() {
        let text = br#"{"a":[1,{"b":null},"x\"y"],"c":{}} ,"#;
        for chunk in [1, 4, text.len()] {
            let mut input = SliceInput::with_chunk_size(text, chunk);
            let mut lexer = Lexer::new(&mut input);
            let token = lexer.read_token(false).unwrap();
            lexer.skip_value(token, 0).unwrap();
            assert_eq!(lexer.read_token(true).unwrap(), Token::Comma);
        }
    }

    #[test]
    fn test_skip_value_depth_limit() {
        let deep = "[".repeat(MAX_SKIP_DEPTH + 1);
        let mut input = SliceInput::new(deep.as_bytes());
        let mut lexer = Lexer::new(&mut input);
        let token = lexer.read_token(false).unwrap();
        assert_eq!(
            lexer.skip_value(token, 0),
            Err(Error::DepthLimitExceeded(MAX_SKIP_DEPTH))
        );
    }

    #[test]
    fn test_drop_backs_up_unread_bytes() {
        let mut input = SliceInput::new(b"[] tail");
        {
            let mut lexer = Lexer::new(&mut input);
            lexer.expect(Token::ArrayOpen).unwrap();
            lexer.expect(Token::ArrayClose).unwrap();
        }
        assert_eq!(input.position(), 2);
        assert_eq!(input.remaining(), b" tail");
    }
}
