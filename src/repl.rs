use crate::evaluator::Evaluator;
use crate::runner::{self, Options};
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = ">>> ";

/// Line-oriented shell. Every line is parsed and evaluated on its own, while
/// `const` bindings persist for the rest of the session.
pub fn start(options: &Options) {
    println!("Monkey Interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(error) = run_session(stdin.lock(), &mut stdout, options) {
        eprintln!("Error reading input: {}", error);
    }
}

/// Drives one session over arbitrary input, so it can be tested without a
/// terminal. Prompts and echoed results go to `output`, diagnostics to stderr.
pub fn run_session<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    options: &Options,
) -> io::Result<usize> {
    // Create a persistent evaluator to maintain state between lines
    let evaluator = Evaluator::new().with_max_depth(options.max_depth);
    let mut evaluated = 0;

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF reached (Ctrl+D or piped input ended)
            writeln!(output)?;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            writeln!(output, "Goodbye!")?;
            break;
        }

        let outcome = runner::execute(line, None, &evaluator, options, output)?;
        tracing::debug!(success = outcome.is_success(), "evaluated line");
        evaluated += 1;
    }

    Ok(evaluated)
}
