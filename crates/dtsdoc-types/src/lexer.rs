//! Lexer for JSDoc / Closure type expressions.

use std::iter::Peekable;
use std::str::CharIndices;

/// Token kinds for JSDoc type expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An identifier or namepath: `Foo`, `Foo.Bar`, `module:pkg/sub~Item`.
    Ident(String),
    StringLiteral(String),
    NumberLiteral(String),

    // Keywords
    Function,
    Null_,
    Undefined_,
    True_,
    False_,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    LAngle,    // <
    RAngle,    // >
    Comma,     // ,
    Colon,     // :
    Dot,       // .
    DotDotDot, // ...
    Question,  // ?
    Bang,      // !
    Pipe,      // |
    Eq,        // =
    Star,      // *

    Eof,
}

/// A token with its kind and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Namepath prefixes that take a `:` separator, e.g. `module:foo`.
const NAMEPATH_PREFIXES: &[&str] = &["module", "external", "event"];

/// Lexer for JSDoc type expressions.
pub struct Lexer<'src> {
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            pos: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// The character after the one returned by `peek`.
    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();
            Some(ch)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, quote: char) -> String {
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('\\') => {
                    if let Some(escaped) = self.advance() {
                        match escaped {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            '\\' => s.push('\\'),
                            '"' => s.push('"'),
                            '\'' => s.push('\''),
                            _ => {
                                s.push('\\');
                                s.push(escaped);
                            }
                        }
                    }
                }
                Some(c) if c == quote => break,
                Some(c) => s.push(c),
                None => break,
            }
        }
        s
    }

    fn read_number(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '.' {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        s
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);
        let mut module_path = false;
        while let Some(ch) = self.peek() {
            let continues = match ch {
                c if is_ident_char(c) => true,
                // `Foo.Bar`, `Foo~inner`, `Foo#member`; `Array.<T>` leaves the dot.
                '.' | '~' | '#' => self.peek_second().is_some_and(is_ident_start),
                ':' if NAMEPATH_PREFIXES.contains(&s.as_str()) => {
                    module_path = s == "module";
                    self.peek_second().is_some_and(|c| !c.is_whitespace())
                }
                '/' | '-' | '@' if module_path => true,
                _ => false,
            };
            if !continues {
                break;
            }
            if matches!(ch, '~' | '#') {
                module_path = false;
            }
            s.push(ch);
            self.advance();
        }
        s
    }

    fn keyword_or_ident(&self, s: &str) -> TokenKind {
        match s {
            "function" => TokenKind::Function,
            "null" => TokenKind::Null_,
            "undefined" => TokenKind::Undefined_,
            "true" => TokenKind::True_,
            "false" => TokenKind::False_,
            _ => TokenKind::Ident(s.to_string()),
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.pos;

            let ch = match self.advance() {
                Some(c) => c,
                None => return Token::new(TokenKind::Eof, start, start),
            };

            let kind = match ch {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '<' => TokenKind::LAngle,
                '>' => TokenKind::RAngle,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                '?' => TokenKind::Question,
                '!' => TokenKind::Bang,
                '|' => TokenKind::Pipe,
                '=' => TokenKind::Eq,
                '*' => TokenKind::Star,
                '.' => {
                    if self.peek() == Some('.') && self.peek_second() == Some('.') {
                        self.advance();
                        self.advance();
                        TokenKind::DotDotDot
                    } else {
                        TokenKind::Dot
                    }
                }
                '"' | '\'' => {
                    let s = self.read_string(ch);
                    TokenKind::StringLiteral(s)
                }
                '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                    let n = self.read_number(ch);
                    TokenKind::NumberLiteral(n)
                }
                c if c.is_ascii_digit() => {
                    let n = self.read_number(c);
                    TokenKind::NumberLiteral(n)
                }
                c if is_ident_start(c) => {
                    let ident = self.read_ident(c);
                    self.keyword_or_ident(&ident)
                }
                _ => {
                    // Skip unknown characters
                    continue;
                }
            };

            return Token::new(kind, start, self.pos);
        }
    }

    /// Collect all tokens into a vector.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
