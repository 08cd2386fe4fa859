// Monkey Language Interpreter Library
//
// Lexer, Pratt parser and tree-walking evaluator for a small
// expression-oriented scripting language with first-class closures.

// Public modules
pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod stack;
pub mod symbol;
pub mod token;

// Re-export commonly used items
pub use ast::{BlockStatement, Expr, Identifier, Program, Stmt};
pub use environment::{Env, Environment};
pub use error::{Diagnostic, Span};
pub use evaluator::{evaluate, Evaluator};
pub use lexer::Lexer;
pub use object::Object;
pub use parser::Parser;
pub use token::{Token, TokenKind};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;

/// Tokens of `source`, produced on demand and ending with a single `EOF`.
pub fn tokenize(source: &str) -> Lexer {
    Lexer::new(source)
}

/// Parses a token stream into a program plus the messages of every syntax
/// error found along the way.
pub fn parse<T: IntoIterator<Item = Token>>(tokens: T) -> (Program, Vec<String>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.errors())
}
