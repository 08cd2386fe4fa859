use crate::error::Span;
use crate::token::{lookup_identifier, Token, TokenKind};

/// On-demand tokenizer with a single character of lookahead.
///
/// `next_token` can be called indefinitely: once the input is exhausted every
/// call yields an `EOF` token. Lexing never fails, characters that start no
/// token come back as `ILLEGAL` for the parser to reject.
pub struct Lexer {
    source: String,
    /// Byte offset of `ch`.
    position: usize,
    /// Byte offset of the character after `ch`.
    read_position: usize,
    ch: Option<char>,
    finished: bool,
}

impl Lexer {
    pub fn new(source: impl Into<String>) -> Self {
        let mut lexer = Self {
            source: source.into(),
            position: 0,
            read_position: 0,
            ch: None,
            finished: false,
        };
        lexer.read_char();
        lexer
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.ch else {
            return Token::eof(self.source.len());
        };

        let token = match c {
            '=' => self.one_or_two(TokenKind::Eq, TokenKind::EqEq),
            '!' => self.one_or_two(TokenKind::Bang, TokenKind::BangEq),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            '.' => self.single(TokenKind::Dot),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Asterisk),
            '/' => self.single(TokenKind::Slash),
            '<' => self.single(TokenKind::Lt),
            '>' => self.single(TokenKind::Gt),
            '"' => self.string(),
            c if is_identifier_start(c) => {
                let text = self.read_while(is_identifier_char);
                Token::new(lookup_identifier(&text), text, Span::new(start, self.position))
            }
            c if c.is_ascii_digit() => {
                let text = self.read_while(|c| c.is_ascii_digit());
                Token::new(TokenKind::Number, text, Span::new(start, self.position))
            }
            _ => self.single(TokenKind::Illegal),
        };

        tracing::trace!(kind = %token.kind, text = %token.text, "token");
        token
    }

    fn read_char(&mut self) {
        self.position = self.read_position;
        self.ch = self.source[self.read_position..].chars().next();
        if let Some(c) = self.ch {
            self.read_position += c.len_utf8();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.read_position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\n' | '\t' | '\r')) {
            self.read_char();
        }
    }

    /// Token for the current character alone; moves past it.
    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.position;
        self.read_char();
        Token::new(kind, &self.source[start..self.position], Span::new(start, self.position))
    }

    /// `one` for the current character, or `two` when it is followed by `=`.
    fn one_or_two(&mut self, one: TokenKind, two: TokenKind) -> Token {
        if self.peek_char() == Some('=') {
            let start = self.position;
            self.read_char();
            self.read_char();
            Token::new(two, &self.source[start..self.position], Span::new(start, self.position))
        } else {
            self.single(one)
        }
    }

    /// Consumes characters while `predicate` holds and returns them. Leaves the
    /// cursor on the first character that does not match.
    fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.ch.is_some_and(&predicate) {
            self.read_char();
        }
        self.source[start..self.position].to_string()
    }

    fn string(&mut self) -> Token {
        let start = self.position;
        self.read_char();
        let content_start = self.position;
        while self.ch.is_some_and(|c| c != '"') {
            self.read_char();
        }

        if self.ch.is_none() {
            return Token::new(
                TokenKind::Illegal,
                &self.source[start..],
                Span::new(start, self.position),
            );
        }

        let content_end = self.position;
        // closing quote
        self.read_char();
        Token::new(
            TokenKind::String,
            &self.source[content_start..content_end],
            Span::new(start, self.position),
        )
    }
}

/// Yields every token up to and including the first `EOF`.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
