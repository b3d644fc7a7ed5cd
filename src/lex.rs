use std::io::{self, Read};

use crate::error::PdfResult;

const FORM_FEED: u8 = b'\x0C';
const BACKSPACE: u8 = b'\x08';

/// Bytes requested from the underlying reader per refill
const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct LexerOptions {
    /// Whether a number starting with `0` keeps consuming digits. When
    /// disabled, `007` lexes as three separate numbers.
    pub zero_continues_number: bool,

    /// Text beyond this many bytes is dropped from a token
    pub max_token_len: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            zero_continues_number: true,
            max_token_len: u16::MAX as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f32),

    /// Literal `( )` or hex `< >` string, already decoded
    String(Vec<u8>),

    /// Includes the leading `/`
    Name(String),

    /// Includes the leading `$`
    Variable(String),
    Keyword(String),

    /// A lone `R`, as used in `1 0 R`
    ObjectReference,
    ArrayStart,
    ArrayEnd,
    DictionaryStart,
    DictionaryEnd,
    Whitespace,

    /// Comment text, without the `%` and the terminating CRLF
    Comment(Vec<u8>),
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Name,
    Variable,
    Keyword,
    ObjectReference,
    ArrayStart,
    ArrayEnd,
    DictionaryStart,
    DictionaryEnd,
    Whitespace,
    Comment,
    EndOfInput,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(..) => TokenKind::Number,
            Token::String(..) => TokenKind::String,
            Token::Name(..) => TokenKind::Name,
            Token::Variable(..) => TokenKind::Variable,
            Token::Keyword(..) => TokenKind::Keyword,
            Token::ObjectReference => TokenKind::ObjectReference,
            Token::ArrayStart => TokenKind::ArrayStart,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::DictionaryStart => TokenKind::DictionaryStart,
            Token::DictionaryEnd => TokenKind::DictionaryEnd,
            Token::Whitespace => TokenKind::Whitespace,
            Token::Comment(..) => TokenKind::Comment,
            Token::EndOfInput => TokenKind::EndOfInput,
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment(..))
    }
}

/// Buffered byte source that keeps every byte after the oldest saved
/// position, so the lexer can roll back.
struct Source<R> {
    reader: R,
    buffer: Vec<u8>,
    cursor: usize,

    /// Absolute offset of `buffer[0]` in the stream
    offset: usize,
    eof: bool,
    marks: Vec<usize>,
}

impl<R: Read> Source<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            cursor: 0,
            offset: 0,
            eof: false,
            marks: Vec::new(),
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.marks.is_empty() && self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.offset += self.cursor;
            self.cursor = 0;
        }

        let mut chunk = [0; CHUNK_SIZE];

        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        while self.cursor >= self.buffer.len() {
            if self.eof {
                return Ok(None);
            }
            self.fill()?;
        }

        Ok(Some(self.buffer[self.cursor]))
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let b = self.peek_byte()?;
        if b.is_some() {
            self.cursor += 1;
        }
        Ok(b)
    }

    fn position(&self) -> usize {
        self.offset + self.cursor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Free,
    Whitespace,
    Comment,
    Keyword,
    Number,
    AfterAngleOpen,
    AfterAngleClose,
    HexString,
    String,
    Variable,
}

/// Tokenizer for the script grammar. Lexical anomalies never produce errors:
/// malformed numbers become keywords and unterminated strings are returned
/// as-is at end of input, flagged by [`ScriptLexer::last_token_unterminated`].
/// Only I/O failures are reported.
pub struct ScriptLexer<R> {
    source: Source<R>,
    options: LexerOptions,

    /// Text of the token being built
    text: Vec<u8>,
    truncated: bool,

    /// The last string token ran into end of input before its closing
    /// delimiter
    unterminated: bool,
}

impl<'a> ScriptLexer<&'a [u8]> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: Read> ScriptLexer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, LexerOptions::default())
    }

    pub fn with_options(reader: R, options: LexerOptions) -> Self {
        Self {
            source: Source::new(reader),
            options,
            text: Vec::new(),
            truncated: false,
            unterminated: false,
        }
    }

    /// Absolute byte offset of the next unread byte
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Whether the most recently read token was a literal or hex string cut
    /// off by end of input
    pub fn last_token_unterminated(&self) -> bool {
        self.unterminated
    }

    /// Remember the current position. Saved positions nest.
    pub fn save_position(&mut self) {
        let position = self.source.position();
        self.source.marks.push(position);
    }

    /// Roll back to the most recently saved position
    pub fn restore_position(&mut self) {
        if let Some(position) = self.source.marks.pop() {
            self.source.cursor = position - self.source.offset;
        }
    }

    /// Forget the most recently saved position without moving
    pub fn discard_position(&mut self) {
        self.source.marks.pop();
    }

    /// Whitespace chars are defined as
    ///
    /// * NUL             0x0
    /// * Horizontal tab  0x9
    /// * Line feed       0xa
    /// * Form feed       0xc
    /// * Carriage return 0xd
    /// * Space           0x20
    ///
    fn is_whitespace(b: u8) -> bool {
        matches!(b, b'\0' | 0x9 | b'\n' | FORM_FEED | b'\r' | b' ')
    }

    fn is_delimiter(b: u8) -> bool {
        matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'$' | b'#'
        )
    }

    fn is_regular(b: u8) -> bool {
        !Self::is_whitespace(b) && !Self::is_delimiter(b)
    }

    fn peek_byte(&mut self) -> PdfResult<Option<u8>> {
        Ok(self.source.peek_byte()?)
    }

    fn next_byte(&mut self) -> PdfResult<Option<u8>> {
        Ok(self.source.next_byte()?)
    }

    fn push(&mut self, b: u8) {
        if self.text.len() < self.options.max_token_len {
            self.text.push(b);
        } else if !self.truncated {
            self.truncated = true;
            log::warn!(
                "token at offset {} exceeds {} bytes and was truncated",
                self.source.position(),
                self.options.max_token_len
            );
        }
    }

    fn take_text(&mut self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }

    fn finish_keyword(&mut self) -> Token {
        let text = self.take_text();

        if text.starts_with('/') {
            Token::Name(text)
        } else if text == "R" {
            Token::ObjectReference
        } else {
            Token::Keyword(text)
        }
    }

    fn finish_number(&mut self) -> Token {
        let text = self.take_text();

        match text.parse::<f32>() {
            Ok(n) if n.is_finite() => Token::Number(n),
            _ => Token::Keyword(text),
        }
    }

    fn hex_digit(b: u8) -> u8 {
        match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => 0,
        }
    }

    /// Unpacks the buffered hex digits pairwise. Characters below `'0'` are
    /// skipped and a trailing odd digit is treated as if followed by `0`.
    fn finish_hex_string(&mut self) -> Token {
        let mut decoded = Vec::with_capacity(self.text.len() / 2);
        let mut high = None;

        for &b in self.text.iter().filter(|&&b| b >= b'0') {
            let nibble = Self::hex_digit(b);
            match high.take() {
                Some(h) => decoded.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }

        if let Some(h) = high {
            decoded.push(h << 4);
        }

        Token::String(decoded)
    }

    /// Reads the next token, including whitespace and comment tokens
    pub fn read(&mut self) -> PdfResult<Token> {
        self.text.clear();
        self.truncated = false;
        self.unterminated = false;

        let mut state = State::Free;

        // string sub-state
        let mut depth = 0_i32;
        let mut escape = false;
        let mut octal: Option<(u8, u8)> = None;
        let mut prev_cr = false;

        loop {
            let b = self.peek_byte()?;

            match state {
                State::Free => {
                    let b = match b {
                        Some(b) => b,
                        None => return Ok(Token::EndOfInput),
                    };
                    self.next_byte()?;

                    state = match b {
                        b if Self::is_whitespace(b) => State::Whitespace,
                        b'%' => State::Comment,
                        b'(' => State::String,
                        b'<' => State::AfterAngleOpen,
                        b'>' => State::AfterAngleClose,
                        b'[' => return Ok(Token::ArrayStart),
                        b']' => return Ok(Token::ArrayEnd),
                        b'$' => {
                            self.push(b);
                            State::Variable
                        }
                        b'+' | b'-' | b'.' | b'0'..=b'9' => {
                            self.push(b);
                            State::Number
                        }
                        b'#' | b'{' | b'}' | b')' => {
                            self.push(b);
                            return Ok(self.finish_keyword());
                        }
                        b => {
                            self.push(b);
                            State::Keyword
                        }
                    };
                }
                State::Whitespace => match b {
                    Some(b) if Self::is_whitespace(b) => {
                        self.next_byte()?;
                    }
                    _ => return Ok(Token::Whitespace),
                },
                // only the LF of a CRLF pair ends a comment
                State::Comment => match b {
                    Some(b'\n') if prev_cr => {
                        self.next_byte()?;
                        // the CR is missing from a truncated comment
                        if self.text.last() == Some(&b'\r') {
                            self.text.pop();
                        }
                        return Ok(Token::Comment(std::mem::take(&mut self.text)));
                    }
                    Some(b) => {
                        self.next_byte()?;
                        prev_cr = b == b'\r';
                        self.push(b);
                    }
                    None => return Ok(Token::Comment(std::mem::take(&mut self.text))),
                },
                State::Keyword => match b {
                    Some(b) if Self::is_regular(b) => {
                        self.next_byte()?;
                        self.push(b);
                    }
                    _ => return Ok(self.finish_keyword()),
                },
                State::Number => match b {
                    Some(b'.') if !self.text.contains(&b'.') => {
                        self.next_byte()?;
                        self.push(b'.');
                    }
                    Some(d @ b'0'..=b'9') => {
                        if !self.options.zero_continues_number && self.text == b"0" {
                            return Ok(self.finish_number());
                        }
                        self.next_byte()?;
                        self.push(d);
                    }
                    _ => return Ok(self.finish_number()),
                },
                State::AfterAngleOpen => match b {
                    Some(b'<') => {
                        self.next_byte()?;
                        return Ok(Token::DictionaryStart);
                    }
                    _ => state = State::HexString,
                },
                State::AfterAngleClose => match b {
                    Some(b'>') => {
                        self.next_byte()?;
                        return Ok(Token::DictionaryEnd);
                    }
                    // a stray `>` starts a keyword together with the byte after
                    // it, even a delimiter. Whitespace still ends the keyword.
                    Some(b) if !Self::is_whitespace(b) => {
                        self.next_byte()?;
                        self.push(b'>');
                        self.push(b);
                        state = State::Keyword;
                    }
                    _ => {
                        self.push(b'>');
                        return Ok(self.finish_keyword());
                    }
                },
                State::HexString => match b {
                    Some(b'>') => {
                        self.next_byte()?;
                        return Ok(self.finish_hex_string());
                    }
                    Some(b) => {
                        self.next_byte()?;
                        self.push(b);
                    }
                    None => {
                        self.unterminated = true;
                        return Ok(self.finish_hex_string());
                    }
                },
                State::String => {
                    let b = match b {
                        Some(b) => b,
                        None => {
                            if let Some((value, _)) = octal {
                                self.push(value);
                            }
                            self.unterminated = true;
                            return Ok(Token::String(std::mem::take(&mut self.text)));
                        }
                    };
                    self.next_byte()?;

                    if escape {
                        escape = false;
                        match b {
                            b'n' => self.push(b'\n'),
                            b'r' => self.push(b'\r'),
                            b't' => self.push(b'\t'),
                            b'b' => self.push(BACKSPACE),
                            b'f' => self.push(FORM_FEED),
                            b'0'..=b'7' => octal = Some((b - b'0', 1)),
                            b => self.push(b),
                        }
                        continue;
                    }

                    if let Some((value, count)) = octal {
                        if matches!(b, b'0'..=b'7') {
                            let value = value.wrapping_mul(8).wrapping_add(b - b'0');
                            if count + 1 == 3 {
                                self.push(value);
                                octal = None;
                            } else {
                                octal = Some((value, count + 1));
                            }
                            continue;
                        }

                        self.push(value);
                        octal = None;
                    }

                    let was_cr = prev_cr;
                    prev_cr = b == b'\r';

                    match b {
                        b'\\' => escape = true,
                        b'(' => {
                            depth += 1;
                            self.push(b);
                        }
                        b')' => {
                            depth -= 1;
                            if depth < 0 {
                                return Ok(Token::String(std::mem::take(&mut self.text)));
                            }
                            self.push(b);
                        }
                        b'\r' => self.push(b'\n'),
                        b'\n' if was_cr => {}
                        b => self.push(b),
                    }
                }
                State::Variable => match b {
                    Some(b) if b.is_ascii_alphanumeric() || b == b'_' => {
                        self.next_byte()?;
                        self.push(b);
                    }
                    _ => return Ok(Token::Variable(self.take_text())),
                },
            }
        }
    }

    /// Reads the next token that is not whitespace or a comment
    pub fn read_significant(&mut self) -> PdfResult<Token> {
        loop {
            let token = self.read()?;
            if !token.is_trivia() {
                return Ok(token);
            }
        }
    }

    /// Returns the next significant token without consuming it
    pub fn peek_significant(&mut self) -> PdfResult<Token> {
        self.save_position();
        let token = self.read_significant();
        self.restore_position();
        token
    }
}
