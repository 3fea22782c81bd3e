//! Tokenizer shared by the Turtle and SPARQL Update parsers.

use crate::error::{GraphError, GraphResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `<...>`, unresolved.
    Iri(String),
    PrefixedName { prefix: String, local: String },
    BlankNode(String),
    String(String),
    LangTag(String),
    DoubleCaret,
    Integer(String),
    Decimal(String),
    Double(String),
    /// A bare word without a colon: `a`, `true`, `PREFIX`, `INSERT`, ...
    Word(String),
    /// `@prefix` or `@base`.
    AtWord(String),
    Variable(String),
    Dot,
    Semicolon,
    Comma,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

/// Split `input` into tokens. `first_line` is the line number of the first
/// character, so incremental callers keep accurate diagnostics.
pub(crate) fn tokenize(input: &str, first_line: usize) -> GraphResult<Vec<Token>> {
    let mut lexer = Lexer {
        chars: input.chars().collect(),
        pos: 0,
        line: first_line,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '%' | '\\') || !c.is_ascii()
}

impl Lexer {
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }

    fn error(&self, message: impl Into<String>) -> GraphError {
        GraphError::syntax(self.line, message)
    }

    fn run(&mut self) -> GraphResult<()> {
        while let Some(c) = self.peek_at(0) {
            let line = self.line;
            match c {
                '\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                c if c.is_whitespace() => self.pos += 1,
                '#' => {
                    while let Some(c) = self.peek_at(0) {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                '<' => {
                    let iri = self.read_iri()?;
                    self.push(TokenKind::Iri(iri), line);
                }
                '"' | '\'' => {
                    let value = self.read_string(c)?;
                    self.push(TokenKind::String(value), line);
                }
                '@' => {
                    self.pos += 1;
                    let word = self.read_while(|c| c.is_ascii_alphanumeric() || c == '-');
                    if word.is_empty() {
                        return Err(self.error("expected a word after '@'"));
                    }
                    let after_literal = matches!(
                        self.tokens.last(),
                        Some(Token {
                            kind: TokenKind::String(_),
                            ..
                        })
                    );
                    if after_literal {
                        self.push(TokenKind::LangTag(word), line);
                    } else {
                        self.push(TokenKind::AtWord(word), line);
                    }
                }
                '^' => {
                    if self.peek_at(1) != Some('^') {
                        return Err(self.error("expected '^^'"));
                    }
                    self.pos += 2;
                    self.push(TokenKind::DoubleCaret, line);
                }
                '_' if self.peek_at(1) == Some(':') => {
                    self.pos += 2;
                    let label = self.read_name();
                    if label.is_empty() {
                        return Err(self.error("empty blank node label"));
                    }
                    self.push(TokenKind::BlankNode(label), line);
                }
                '?' | '$' => {
                    self.pos += 1;
                    let name = self.read_while(|c| c.is_alphanumeric() || c == '_');
                    self.push(TokenKind::Variable(name), line);
                }
                '.' => {
                    self.pos += 1;
                    self.push(TokenKind::Dot, line);
                }
                ';' => {
                    self.pos += 1;
                    self.push(TokenKind::Semicolon, line);
                }
                ',' => {
                    self.pos += 1;
                    self.push(TokenKind::Comma, line);
                }
                '{' | '}' | '[' | ']' | '(' | ')' => {
                    self.pos += 1;
                    let kind = match c {
                        '{' => TokenKind::OpenBrace,
                        '}' => TokenKind::CloseBrace,
                        '[' => TokenKind::OpenBracket,
                        ']' => TokenKind::CloseBracket,
                        '(' => TokenKind::OpenParen,
                        _ => TokenKind::CloseParen,
                    };
                    self.push(kind, line);
                }
                c if c.is_ascii_digit()
                    || (matches!(c, '+' | '-')
                        && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    let kind = self.read_number();
                    self.push(kind, line);
                }
                c if c.is_alphabetic() || c == ':' || c == '_' || !c.is_ascii() => {
                    let name = self.read_name();
                    let kind = match name.split_once(':') {
                        Some((prefix, local)) => TokenKind::PrefixedName {
                            prefix: prefix.to_string(),
                            local: unescape_local(local),
                        },
                        None => TokenKind::Word(name),
                    };
                    self.push(kind, line);
                }
                other => return Err(self.error(format!("unexpected character {other:?}"))),
            }
        }
        Ok(())
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek_at(0).is_some_and(&accept) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Prefixed names and blank node labels may contain dots but never end
    /// with one; a trailing dot is the statement terminator.
    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_at(0) {
            if c == '\\' {
                self.pos += 2;
            } else if is_name_char(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos = self.pos.min(self.chars.len());
        while self.pos > start && self.chars[self.pos - 1] == '.' {
            self.pos -= 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn read_number(&mut self) -> TokenKind {
        let start = self.pos;
        if matches!(self.peek_at(0), Some('+' | '-')) {
            self.pos += 1;
        }
        self.read_while(|c| c.is_ascii_digit());
        let mut decimal = false;
        if self.peek_at(0) == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            decimal = true;
            self.pos += 1;
            self.read_while(|c| c.is_ascii_digit());
        }
        let mut double = false;
        if matches!(self.peek_at(0), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_at(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                double = true;
                self.pos += digit_at;
                self.read_while(|c| c.is_ascii_digit());
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if double {
            TokenKind::Double(text)
        } else if decimal {
            TokenKind::Decimal(text)
        } else {
            TokenKind::Integer(text)
        }
    }

    fn read_iri(&mut self) -> GraphResult<String> {
        self.pos += 1;
        let mut iri = String::new();
        loop {
            match self.peek_at(0) {
                None => return Err(self.error("unterminated IRI")),
                Some('>') => {
                    self.pos += 1;
                    return Ok(iri);
                }
                Some(c) if c.is_whitespace() || c == '<' || c == '"' => {
                    return Err(self.error(format!("invalid character {c:?} in IRI")));
                }
                Some('\\') => {
                    self.pos += 1;
                    let escaped = self.read_escape()?;
                    iri.push(escaped);
                }
                Some(c) => {
                    iri.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn read_string(&mut self, quote: char) -> GraphResult<String> {
        let long = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if long { 3 } else { 1 };
        let mut value = String::new();
        loop {
            match self.peek_at(0) {
                None => return Err(self.error("unterminated string literal")),
                Some(c) if c == quote => {
                    if !long {
                        self.pos += 1;
                        return Ok(value);
                    }
                    if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                        self.pos += 3;
                        return Ok(value);
                    }
                    value.push(c);
                    self.pos += 1;
                }
                Some('\n') if !long => {
                    return Err(self.error("line break in single-quoted string literal"));
                }
                Some('\\') => {
                    self.pos += 1;
                    let escaped = self.read_escape()?;
                    value.push(escaped);
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    /// Read the escape sequence following a backslash.
    fn read_escape(&mut self) -> GraphResult<char> {
        let c = self
            .peek_at(0)
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        self.pos += 1;
        let escaped = match c {
            't' => '\t',
            'b' => '\u{8}',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{c}',
            '"' | '\'' | '\\' => c,
            'u' | 'U' => {
                let len = if c == 'u' { 4 } else { 8 };
                let hex: String = (0..len).filter_map(|i| self.peek_at(i)).collect();
                if hex.len() != len {
                    return Err(self.error("truncated unicode escape"));
                }
                self.pos += len;
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(format!("invalid unicode escape \\{c}{hex}")))?
            }
            other => return Err(self.error(format!("invalid escape sequence \\{other}"))),
        };
        Ok(escaped)
    }
}

fn unescape_local(local: &str) -> String {
    let mut out = String::with_capacity(local.len());
    let mut chars = local.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte offset just past the last top-level statement terminator in `text`,
/// or `None` if no complete statement is buffered yet.
///
/// A `.` terminates a statement only when followed by whitespace or a
/// comment; dots inside IRIs, strings, comments, names and decimals do not.
/// Scanning stops at the first construct that may continue in a later chunk.
pub(crate) fn last_statement_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut end = None;
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'#' => match bytes[i..].iter().position(|&b| b == b'\n') {
                Some(offset) => i += offset + 1,
                None => return end,
            },
            b'<' => match bytes[i + 1..].iter().position(|&b| b == b'>') {
                Some(offset) => i += offset + 2,
                None => return end,
            },
            quote @ (b'"' | b'\'') => {
                if i + 2 >= len {
                    return end;
                }
                let long = bytes[i + 1] == quote && bytes[i + 2] == quote;
                let mut j = if long { i + 3 } else { i + 1 };
                let mut closed = None;
                while j < len {
                    if bytes[j] == b'\\' {
                        j += 2;
                    } else if long {
                        if j + 2 < len && bytes[j..j + 3] == [quote; 3] {
                            closed = Some(j + 3);
                            break;
                        }
                        j += 1;
                    } else if bytes[j] == quote {
                        closed = Some(j + 1);
                        break;
                    } else {
                        j += 1;
                    }
                }
                match closed {
                    Some(next) => i = next,
                    None => return end,
                }
            }
            b'.' => match bytes.get(i + 1) {
                None => return end,
                Some(next) if next.is_ascii_whitespace() || *next == b'#' => {
                    end = Some(i + 1);
                    i += 1;
                }
                Some(_) => i += 1,
            },
            _ => i += 1,
        }
    }
    end
}
