use monkey::lexer::Lexer;
use monkey::token::TokenKind;
use pretty_assertions::assert_eq;

fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
    Lexer::new(source)
        .map(|token| (token.kind, token.text))
        .collect()
}

fn expected(pairs: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    pairs
        .iter()
        .map(|(kind, text)| (*kind, text.to_string()))
        .collect()
}

#[test]
fn const_statements() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("const six = 6;\nconst seven = 7;"),
        expected(&[
            (Const, "const"),
            (Identifier, "six"),
            (Eq, "="),
            (Number, "6"),
            (Semicolon, ";"),
            (Const, "const"),
            (Identifier, "seven"),
            (Eq, "="),
            (Number, "7"),
            (Semicolon, ";"),
            (Eof, ""),
        ])
    );
}

#[test]
fn single_character_tokens() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("=;,:.[](){}+-*/<>!"),
        expected(&[
            (Eq, "="),
            (Semicolon, ";"),
            (Comma, ","),
            (Colon, ":"),
            (Dot, "."),
            (LeftBracket, "["),
            (RightBracket, "]"),
            (LeftParen, "("),
            (RightParen, ")"),
            (LeftBrace, "{"),
            (RightBrace, "}"),
            (Plus, "+"),
            (Minus, "-"),
            (Asterisk, "*"),
            (Slash, "/"),
            (Lt, "<"),
            (Gt, ">"),
            (Bang, "!"),
            (Eof, ""),
        ])
    );
}

#[test]
fn two_character_operators_are_matched_greedily() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("a == b != !c = d"),
        expected(&[
            (Identifier, "a"),
            (EqEq, "=="),
            (Identifier, "b"),
            (BangEq, "!="),
            (Bang, "!"),
            (Identifier, "c"),
            (Eq, "="),
            (Identifier, "d"),
            (Eof, ""),
        ])
    );
}

#[test]
fn function_definition_and_call() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("const add = fn(x, y) { return x + y; };\nadd(five, ten);"),
        expected(&[
            (Const, "const"),
            (Identifier, "add"),
            (Eq, "="),
            (Function, "fn"),
            (LeftParen, "("),
            (Identifier, "x"),
            (Comma, ","),
            (Identifier, "y"),
            (RightParen, ")"),
            (LeftBrace, "{"),
            (Return, "return"),
            (Identifier, "x"),
            (Plus, "+"),
            (Identifier, "y"),
            (Semicolon, ";"),
            (RightBrace, "}"),
            (Semicolon, ";"),
            (Identifier, "add"),
            (LeftParen, "("),
            (Identifier, "five"),
            (Comma, ","),
            (Identifier, "ten"),
            (RightParen, ")"),
            (Semicolon, ";"),
            (Eof, ""),
        ])
    );
}

#[test]
fn keywords_are_classified() {
    use TokenKind::*;

    let source = "function fn if else return true false null let var while for class this as type interface undefined";
    let kinds: Vec<TokenKind> = Lexer::new(source).map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Function, Function, If, Else, Return, True, False, Null, Let, Var, While, For, Class,
            This, As, Type, Interface, Undefined, Eof,
        ]
    );
}

#[test]
fn identifiers_take_underscores_and_trailing_digits() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("_tmp foo_bar2 consts 42abc"),
        expected(&[
            (Identifier, "_tmp"),
            (Identifier, "foo_bar2"),
            (Identifier, "consts"),
            (Number, "42"),
            (Identifier, "abc"),
            (Eof, ""),
        ])
    );
}

#[test]
fn numbers_have_no_sign_or_fraction() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("-12.5"),
        expected(&[
            (Minus, "-"),
            (Number, "12"),
            (Dot, "."),
            (Number, "5"),
            (Eof, ""),
        ])
    );
}

#[test]
fn string_literals() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts(r#""hello world" "" "a""#),
        expected(&[
            (String, "hello world"),
            (String, ""),
            (String, "a"),
            (Eof, ""),
        ])
    );
}

#[test]
fn unterminated_string_is_illegal() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts(r#"x "abc"#),
        expected(&[(Identifier, "x"), (Illegal, "\"abc"), (Eof, "")])
    );
}

#[test]
fn unknown_characters_are_illegal_and_lexing_continues() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("1 @ 2 # é"),
        expected(&[
            (Number, "1"),
            (Illegal, "@"),
            (Number, "2"),
            (Illegal, "#"),
            (Identifier, "é"),
            (Eof, ""),
        ])
    );
}

#[test]
fn whitespace_is_skipped() {
    use TokenKind::*;

    assert_eq!(
        kinds_and_texts("  \n\t x \r\n  "),
        expected(&[(Identifier, "x"), (Eof, "")])
    );
}

#[test]
fn eof_repeats_forever() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    for _ in 0..5 {
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.text, "");
    }
}

#[test]
fn tokenize_stops_after_the_first_eof() {
    let tokens: Vec<_> = monkey::tokenize("a + 1").collect();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
    assert_eq!(tokens[1].to_string(), "PLUS(\"+\")");
}

#[test]
fn empty_input_is_just_eof() {
    assert_eq!(kinds_and_texts(""), expected(&[(TokenKind::Eof, "")]));
}

#[test]
fn spans_cover_the_token_text() {
    let source = "const answer = 42;";
    for token in Lexer::new(source) {
        if token.kind != TokenKind::Eof {
            assert_eq!(&source[token.span.start..token.span.end], token.text);
        }
    }

    let strings: Vec<_> = Lexer::new(r#"  "hi""#).collect();
    assert_eq!((strings[0].span.start, strings[0].span.end), (2, 6));
}
