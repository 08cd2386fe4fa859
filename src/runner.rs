use crate::error::{Diagnostic, Span};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;
use std::io::{self, Write};

/// What the driver echoes besides diagnostics.
#[derive(Debug, Clone)]
pub struct Options {
    pub show_tokens: bool,
    pub show_ast: bool,
    pub show_result: bool,
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_tokens: false,
            show_ast: false,
            show_result: true,
            max_depth: Evaluator::DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Evaluation finished; `None` when the program produced nothing.
    Completed(Option<Object>),
    /// The source had syntax errors and was not evaluated.
    ParseFailed(Vec<Diagnostic>),
    /// Evaluation stopped on an error value.
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

/// Runs a whole source file in a fresh global environment, echoing to stdout.
pub fn run(source: &str, filename: Option<&str>, options: &Options) -> io::Result<Outcome> {
    let evaluator = Evaluator::new().with_max_depth(options.max_depth);
    let stdout = io::stdout();
    execute(source, filename, &evaluator, options, &mut stdout.lock())
}

/// Lexes, parses and evaluates `source` against `evaluator`'s environment.
/// Whatever `options` asks to echo goes to `output`; diagnostics go to stderr.
pub fn execute<W: Write>(
    source: &str,
    filename: Option<&str>,
    evaluator: &Evaluator,
    options: &Options,
    output: &mut W,
) -> io::Result<Outcome> {
    if options.show_tokens {
        for token in Lexer::new(source) {
            writeln!(output, "{}", token)?;
        }
    }

    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    let diagnostics = parser.into_diagnostics();

    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            diagnostic.report(source, filename);
        }
        return Ok(Outcome::ParseFailed(diagnostics));
    }

    if options.show_ast {
        writeln!(output, "{}", program)?;
    }

    let outcome = match evaluator.evaluate_program(&program) {
        Some(Object::Error(message)) => {
            Diagnostic::runtime_error(Span::new(0, source.len()), message.clone())
                .report(source, filename);
            Outcome::Failed(message)
        }
        result => {
            if options.show_result {
                if let Some(value) = &result {
                    writeln!(output, "{}", value)?;
                }
            }
            Outcome::Completed(result)
        }
    };
    Ok(outcome)
}
