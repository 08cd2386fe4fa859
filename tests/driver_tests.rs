use monkey::evaluator::Evaluator;
use monkey::object::Object;
use monkey::repl::{self, PROMPT};
use monkey::runner::{self, Options, Outcome};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn quiet() -> Options {
    Options {
        show_result: false,
        ..Options::default()
    }
}

#[test]
fn run_completes_with_the_last_value() {
    let outcome = runner::run("const a = 1; a + 2", Some("test.mk"), &quiet()).unwrap();
    assert_eq!(outcome, Outcome::Completed(Some(Object::Integer(3))));
    assert!(outcome.is_success());
}

#[test]
fn run_completes_without_a_value() {
    assert_eq!(runner::run("", None, &quiet()).unwrap(), Outcome::Completed(None));
    assert_eq!(
        runner::run("if (false) { 1 }", None, &quiet()).unwrap(),
        Outcome::Completed(None)
    );
}

#[test]
fn run_stops_on_syntax_errors() {
    match runner::run("const x 1; 1 +", None, &quiet()).unwrap() {
        Outcome::ParseFailed(diagnostics) => {
            let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
            assert_eq!(
                messages,
                vec![
                    "expected next token to be EQ, got NUMBER instead",
                    "no prefix parse function for EOF found",
                ]
            );
        }
        other => panic!("expected a parse failure, got {other:?}"),
    }
}

#[test]
fn run_reports_runtime_errors() {
    let outcome = runner::run("const f = fn(x) { x / 0 }; f(1)", None, &quiet()).unwrap();
    assert_eq!(outcome, Outcome::Failed("division by zero".to_string()));
    assert!(!outcome.is_success());
}

#[test]
fn run_honours_the_call_depth_option() {
    let options = Options {
        max_depth: 4,
        ..quiet()
    };
    let source = "const down = fn(n) { if (n == 0) { return 0; } down(n - 1) }; down(3)";
    assert_eq!(
        runner::run(source, None, &options).unwrap(),
        Outcome::Completed(Some(Object::Integer(0)))
    );

    let source = "const down = fn(n) { if (n == 0) { return 0; } down(n - 1) }; down(4)";
    assert_eq!(
        runner::run(source, None, &options).unwrap(),
        Outcome::Failed("maximum call depth of 4 exceeded".to_string())
    );
}

#[test]
fn default_options() {
    let options = Options::default();
    assert!(options.show_result);
    assert!(!options.show_tokens);
    assert!(!options.show_ast);
    assert_eq!(options.max_depth, Evaluator::DEFAULT_MAX_DEPTH);
}

#[test]
fn session_keeps_bindings_between_lines() {
    let input = Cursor::new("const a = 2;\nconst double = fn(x) { x * 2 };\n\ndouble(a)\nexit\nnever evaluated\n");
    let mut output = Vec::new();

    let evaluated = repl::run_session(input, &mut output, &quiet()).unwrap();

    assert_eq!(evaluated, 3);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        format!("{PROMPT}{PROMPT}{PROMPT}{PROMPT}{PROMPT}Goodbye!\n")
    );
}

#[test]
fn session_survives_bad_lines() {
    let input = Cursor::new("1 +\nfoo\n1 / 0\n7\nquit\n");
    let mut output = Vec::new();

    let evaluated = repl::run_session(input, &mut output, &quiet()).unwrap();

    assert_eq!(evaluated, 4);
}

#[test]
fn session_ends_at_end_of_input() {
    let input = Cursor::new("1\n");
    let mut output = Vec::new();

    let evaluated = repl::run_session(input, &mut output, &quiet()).unwrap();

    assert_eq!(evaluated, 1);
    assert_eq!(String::from_utf8(output).unwrap(), format!("{PROMPT}{PROMPT}\n"));
}

/// Runs `source` in a fresh environment and returns what was echoed.
fn echo(source: &str, options: &Options) -> (Outcome, String) {
    let evaluator = Evaluator::new();
    let mut output = Vec::new();
    let outcome = runner::execute(source, None, &evaluator, options, &mut output).unwrap();
    (outcome, String::from_utf8(output).unwrap())
}

#[test]
fn execute_echoes_the_result() {
    let (outcome, output) = echo("const a = 20; a + 1", &Options::default());
    assert_eq!(outcome, Outcome::Completed(Some(Object::Integer(21))));
    assert_eq!(output, "21\n");

    let (_, output) = echo("if (false) { 1 }", &Options::default());
    assert_eq!(output, "");
}

#[test]
fn execute_echoes_tokens_and_ast_on_request() {
    let options = Options {
        show_tokens: true,
        show_ast: true,
        ..Options::default()
    };
    let (_, output) = echo("-a * b", &options);
    assert_eq!(
        output,
        [
            "MINUS(\"-\")",
            "IDENTIFIER(\"a\")",
            "ASTERISK(\"*\")",
            "IDENTIFIER(\"b\")",
            "EOF(\"\")",
            "((-a) * b)",
            "",
        ]
        .join("\n")
    );
}

#[test]
fn execute_prints_nothing_for_failures() {
    let (outcome, output) = echo("1 +", &Options::default());
    assert!(matches!(outcome, Outcome::ParseFailed(_)));
    assert_eq!(output, "");

    let (outcome, output) = echo("1 / 0", &Options::default());
    assert_eq!(outcome, Outcome::Failed("division by zero".to_string()));
    assert_eq!(output, "");
}

#[test]
fn session_output_interleaves_prompts_and_results() {
    let input = Cursor::new("const a = 2;\na * 3\nmissing\nexit\n");
    let mut output = Vec::new();

    let evaluated = repl::run_session(input, &mut output, &Options::default()).unwrap();

    assert_eq!(evaluated, 3);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        format!("{PROMPT}2\n{PROMPT}6\n{PROMPT}{PROMPT}Goodbye!\n")
    );
}
