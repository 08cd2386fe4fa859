use crate::error::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Dot,
    Semicolon,
    Plus,
    Minus,
    Slash,
    Asterisk,

    // One or two character tokens
    Eq,
    EqEq,
    Bang,
    BangEq,
    Lt,
    Gt,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    Function,
    Const,
    Let,
    Var,
    True,
    False,
    If,
    Else,
    Return,
    While,
    For,
    Null,
    Class,
    Undefined,
    Interface,
    This,
    As,
    Type,

    // Special
    Illegal,
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Slash => "SLASH",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Eq => "EQ",
            TokenKind::EqEq => "EQ_EQ",
            TokenKind::Bang => "BANG",
            TokenKind::BangEq => "BANG_EQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Function => "FUNCTION",
            TokenKind::Const => "CONST",
            TokenKind::Let => "LET",
            TokenKind::Var => "VAR",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Null => "NULL",
            TokenKind::Class => "CLASS",
            TokenKind::Undefined => "UNDEFINED",
            TokenKind::Interface => "INTERFACE",
            TokenKind::This => "THIS",
            TokenKind::As => "AS",
            TokenKind::Type => "TYPE",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify identifier-shaped text: keywords get their own kind, anything
/// else is a plain identifier.
pub fn lookup_identifier(text: &str) -> TokenKind {
    match text {
        "fn" | "function" => TokenKind::Function,
        "const" => TokenKind::Const,
        "let" => TokenKind::Let,
        "var" => TokenKind::Var,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "null" => TokenKind::Null,
        "class" => TokenKind::Class,
        "undefined" => TokenKind::Undefined,
        "interface" => TokenKind::Interface,
        "this" => TokenKind::This,
        "as" => TokenKind::As,
        "type" => TokenKind::Type,
        _ => TokenKind::Identifier,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn eof(pos: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::empty(pos))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}
