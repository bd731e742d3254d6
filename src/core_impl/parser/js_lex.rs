use super::cursor::Cursor;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    UshrAssign,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    AndAnd,
    OrOr,
    Not,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Shl,
    Shr,
    Ushr,
    Inc,
    Dec,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    String(String),
    Regex { pattern: String, flags: String },
    Punct(Punct),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// A line terminator occurred between the previous token and this one;
    /// the parser consults this for automatic semicolon insertion.
    pub newline_before: bool,
    pub pos: usize,
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b == b'_' || b == b'$' || b.is_ascii_alphabetic()
}

pub(crate) fn is_ident_char(b: u8) -> bool {
    b == b'_' || b == b'$' || b.is_ascii_alphanumeric()
}

/// Restartable tokenizer. The parser drives it one token at a time and
/// tells it whether a leading `/` may start a regex literal at the current
/// position (a value cannot syntactically precede a regex literal).
#[derive(Debug)]
pub(crate) struct JsLexer<'a> {
    cursor: Cursor<'a>,
    legacy_octal: bool,
}

impl<'a> JsLexer<'a> {
    pub(crate) fn new(src: &'a str, legacy_octal: bool) -> Self {
        Self {
            cursor: Cursor::new(src),
            legacy_octal,
        }
    }

    pub(crate) fn next_token(&mut self, regex_allowed: bool) -> Result<Token> {
        let newline_before = self.skip_trivia()?;
        let pos = self.cursor.pos();
        let Some(b) = self.cursor.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                newline_before,
                pos,
            });
        };

        let kind = if is_ident_start(b) {
            self.scan_identifier()
        } else if b.is_ascii_digit() || (b == b'.' && matches!(self.cursor.peek_at(1), Some(d) if d.is_ascii_digit()))
        {
            self.scan_number()?
        } else if b == b'\'' || b == b'"' {
            self.scan_string()?
        } else if b == b'/' && regex_allowed {
            self.scan_regex()?
        } else {
            self.scan_punct()?
        };

        Ok(Token {
            kind,
            newline_before,
            pos,
        })
    }

    /// Skip whitespace and comments; report whether a line terminator was
    /// crossed (including one buried in a block comment).
    fn skip_trivia(&mut self) -> Result<bool> {
        let mut saw_newline = false;
        loop {
            match self.cursor.peek() {
                Some(b'\n') | Some(b'\r') => {
                    saw_newline = true;
                    self.cursor.advance();
                }
                Some(b) if b.is_ascii_whitespace() => {
                    self.cursor.advance();
                }
                Some(b'/') if self.cursor.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.cursor.peek() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.cursor.advance_char();
                    }
                }
                Some(b'/') if self.cursor.peek_at(1) == Some(b'*') => {
                    let start = self.cursor.pos();
                    self.cursor.advance();
                    self.cursor.advance();
                    let mut closed = false;
                    while let Some(c) = self.cursor.advance_char() {
                        if c == '\n' || c == '\r' {
                            saw_newline = true;
                        }
                        if c == '*' && self.cursor.peek() == Some(b'/') {
                            self.cursor.advance();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(Error::ScriptParse(format!(
                            "unterminated comment at offset {start}"
                        )));
                    }
                }
                Some(_) if !self.cursor.peek_char().is_some_and(|c| c.is_ascii()) => {
                    let c = self.cursor.peek_char().unwrap_or('\0');
                    if c == '\u{2028}' || c == '\u{2029}' {
                        saw_newline = true;
                        self.cursor.advance_char();
                    } else if c.is_whitespace() {
                        self.cursor.advance_char();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(saw_newline)
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        while matches!(self.cursor.peek(), Some(b) if is_ident_char(b)) {
            self.cursor.advance();
        }
        TokenKind::Ident(self.cursor.src[start..self.cursor.pos()].to_string())
    }

    fn scan_number(&mut self) -> Result<TokenKind> {
        let start = self.cursor.pos();

        if self.cursor.peek() == Some(b'0')
            && matches!(self.cursor.peek_at(1), Some(b'x') | Some(b'X'))
        {
            self.cursor.advance();
            self.cursor.advance();
            let digits_start = self.cursor.pos();
            let mut value = 0.0_f64;
            while let Some(b) = self.cursor.peek() {
                if !b.is_ascii_hexdigit() {
                    break;
                }
                let digit = (b as char).to_digit(16).unwrap_or(0);
                value = value * 16.0 + f64::from(digit);
                self.cursor.advance();
            }
            if self.cursor.pos() == digits_start {
                return Err(Error::ScriptParse(format!(
                    "missing hex digits at offset {start}"
                )));
            }
            return Ok(TokenKind::Number(value));
        }

        // Leading zero: octal unless a digit 8/9 demotes the whole literal
        // to decimal, and only while no fraction/exponent follows.
        if self.cursor.peek() == Some(b'0')
            && matches!(self.cursor.peek_at(1), Some(d) if d.is_ascii_digit())
        {
            let digits_start = self.cursor.pos();
            while matches!(self.cursor.peek(), Some(d) if d.is_ascii_digit()) {
                self.cursor.advance();
            }
            let is_plain_run =
                !matches!(self.cursor.peek(), Some(b'.') | Some(b'e') | Some(b'E'));
            if is_plain_run {
                let run = &self.cursor.src[digits_start..self.cursor.pos()];
                let value = if self.legacy_octal && run.bytes().all(|b| (b'0'..=b'7').contains(&b))
                {
                    run.bytes()
                        .fold(0.0_f64, |acc, b| acc * 8.0 + f64::from(b - b'0'))
                } else {
                    run.parse::<f64>().unwrap_or(f64::NAN)
                };
                return Ok(TokenKind::Number(value));
            }
            // Fraction or exponent follows: rewind and rescan as decimal.
            self.cursor.i = digits_start;
        }

        while matches!(self.cursor.peek(), Some(d) if d.is_ascii_digit()) {
            self.cursor.advance();
        }
        if self.cursor.peek() == Some(b'.') {
            self.cursor.advance();
            while matches!(self.cursor.peek(), Some(d) if d.is_ascii_digit()) {
                self.cursor.advance();
            }
        }
        if matches!(self.cursor.peek(), Some(b'e') | Some(b'E')) {
            let exp_mark = self.cursor.pos();
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some(b'+') | Some(b'-')) {
                self.cursor.advance();
            }
            let mut exp_digits = 0usize;
            while matches!(self.cursor.peek(), Some(d) if d.is_ascii_digit()) {
                exp_digits += 1;
                self.cursor.advance();
            }
            if exp_digits == 0 {
                self.cursor.i = exp_mark;
            }
        }

        let text = &self.cursor.src[start..self.cursor.pos()];
        let value = text.parse::<f64>().map_err(|_| {
            Error::ScriptParse(format!("bad numeric literal '{text}' at offset {start}"))
        })?;
        Ok(TokenKind::Number(value))
    }

    fn scan_string(&mut self) -> Result<TokenKind> {
        let start = self.cursor.pos();
        let quote = self.cursor.advance().unwrap_or(b'"');
        let mut out = String::new();

        loop {
            let Some(c) = self.cursor.peek_char() else {
                return Err(Error::ScriptParse(format!(
                    "unterminated string at offset {start}"
                )));
            };
            if c == '\n' || c == '\r' {
                return Err(Error::ScriptParse(format!(
                    "unterminated string at offset {start}"
                )));
            }
            self.cursor.advance_char();
            if c as u32 == u32::from(quote) {
                break;
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some(esc) = self.cursor.advance_char() else {
                return Err(Error::ScriptParse(format!(
                    "unterminated string at offset {start}"
                )));
            };
            match esc {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{C}'),
                'v' => out.push('\u{B}'),
                '0' if !matches!(self.cursor.peek(), Some(d) if d.is_ascii_digit()) => {
                    out.push('\0');
                }
                'x' => match self.scan_hex_escape(2) {
                    Some(code) => out.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
                    // Bad hex digits: the escape is taken literally.
                    None => out.push('x'),
                },
                'u' => match self.scan_hex_escape(4) {
                    Some(code) => out.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
                    None => out.push('u'),
                },
                '\n' => {}
                '\r' => {
                    self.cursor.consume_byte(b'\n');
                }
                other => out.push(other),
            }
        }
        Ok(TokenKind::String(out))
    }

    fn scan_hex_escape(&mut self, len: usize) -> Option<u32> {
        let start = self.cursor.pos();
        let mut value = 0u32;
        for _ in 0..len {
            let b = self.cursor.peek()?;
            if !b.is_ascii_hexdigit() {
                self.cursor.i = start;
                return None;
            }
            value = value * 16 + (b as char).to_digit(16).unwrap_or(0);
            self.cursor.advance();
        }
        Some(value)
    }

    fn scan_regex(&mut self) -> Result<TokenKind> {
        let start = self.cursor.pos();
        self.cursor.expect_byte(b'/')?;
        let body_start = self.cursor.pos();
        let mut in_class = false;

        loop {
            let Some(c) = self.cursor.peek_char() else {
                return Err(Error::ScriptParse(format!(
                    "unterminated regular expression at offset {start}"
                )));
            };
            if c == '\n' || c == '\r' {
                return Err(Error::ScriptParse(format!(
                    "unterminated regular expression at offset {start}"
                )));
            }
            match c {
                '\\' => {
                    self.cursor.advance_char();
                    if self.cursor.peek_char().is_some() {
                        self.cursor.advance_char();
                    }
                }
                '[' => {
                    in_class = true;
                    self.cursor.advance_char();
                }
                ']' if in_class => {
                    in_class = false;
                    self.cursor.advance_char();
                }
                '/' if !in_class => break,
                _ => {
                    self.cursor.advance_char();
                }
            }
        }

        let pattern = self.cursor.src[body_start..self.cursor.pos()].to_string();
        self.cursor.expect_byte(b'/')?;
        let flags_start = self.cursor.pos();
        while matches!(self.cursor.peek(), Some(b) if is_ident_char(b)) {
            self.cursor.advance();
        }
        let flags = self.cursor.src[flags_start..self.cursor.pos()].to_string();
        Ok(TokenKind::Regex { pattern, flags })
    }

    fn scan_punct(&mut self) -> Result<TokenKind> {
        let pos = self.cursor.pos();
        let b = self.cursor.advance().unwrap_or(0);
        let peek = self.cursor.peek();
        let punct = match b {
            b'(' => Punct::LParen,
            b')' => Punct::RParen,
            b'{' => Punct::LBrace,
            b'}' => Punct::RBrace,
            b'[' => Punct::LBracket,
            b']' => Punct::RBracket,
            b';' => Punct::Semi,
            b',' => Punct::Comma,
            b'.' => Punct::Dot,
            b'?' => Punct::Question,
            b':' => Punct::Colon,
            b'~' => Punct::BitNot,
            b'+' => match peek {
                Some(b'+') => self.take(Punct::Inc),
                Some(b'=') => self.take(Punct::PlusAssign),
                _ => Punct::Plus,
            },
            b'-' => match peek {
                Some(b'-') => self.take(Punct::Dec),
                Some(b'=') => self.take(Punct::MinusAssign),
                _ => Punct::Minus,
            },
            b'*' => match peek {
                Some(b'=') => self.take(Punct::StarAssign),
                _ => Punct::Star,
            },
            b'/' => match peek {
                Some(b'=') => self.take(Punct::SlashAssign),
                _ => Punct::Slash,
            },
            b'%' => match peek {
                Some(b'=') => self.take(Punct::PercentAssign),
                _ => Punct::Percent,
            },
            b'=' => match peek {
                Some(b'=') => {
                    self.cursor.advance();
                    if self.cursor.consume_byte(b'=') {
                        Punct::StrictEq
                    } else {
                        Punct::Eq
                    }
                }
                _ => Punct::Assign,
            },
            b'!' => match peek {
                Some(b'=') => {
                    self.cursor.advance();
                    if self.cursor.consume_byte(b'=') {
                        Punct::StrictNotEq
                    } else {
                        Punct::NotEq
                    }
                }
                _ => Punct::Not,
            },
            b'<' => match peek {
                Some(b'=') => self.take(Punct::LessEq),
                Some(b'<') => {
                    self.cursor.advance();
                    if self.cursor.consume_byte(b'=') {
                        Punct::ShlAssign
                    } else {
                        Punct::Shl
                    }
                }
                _ => Punct::Less,
            },
            b'>' => match peek {
                Some(b'=') => self.take(Punct::GreaterEq),
                Some(b'>') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some(b'>') => {
                            self.cursor.advance();
                            if self.cursor.consume_byte(b'=') {
                                Punct::UshrAssign
                            } else {
                                Punct::Ushr
                            }
                        }
                        Some(b'=') => {
                            self.cursor.advance();
                            Punct::ShrAssign
                        }
                        _ => Punct::Shr,
                    }
                }
                _ => Punct::Greater,
            },
            b'&' => match peek {
                Some(b'&') => self.take(Punct::AndAnd),
                Some(b'=') => self.take(Punct::AndAssign),
                _ => Punct::BitAnd,
            },
            b'|' => match peek {
                Some(b'|') => self.take(Punct::OrOr),
                Some(b'=') => self.take(Punct::OrAssign),
                _ => Punct::BitOr,
            },
            b'^' => match peek {
                Some(b'=') => self.take(Punct::XorAssign),
                _ => Punct::BitXor,
            },
            other => {
                return Err(Error::ScriptParse(format!(
                    "unexpected character '{}' at offset {pos}",
                    other as char
                )));
            }
        };
        Ok(TokenKind::Punct(punct))
    }

    fn take(&mut self, punct: Punct) -> Punct {
        self.cursor.advance();
        punct
    }
}
