use crate::ast::{BlockStatement, Expr, Identifier, InfixOp, PrefixOp, Program, Stmt};
use crate::error::{Diagnostic, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenKind};

/// Binding strength of an operator, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EqEq | TokenKind::BangEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
            TokenKind::LeftParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParseFn<I> = fn(&mut Parser<I>) -> Option<Expr>;
type InfixParseFn<I> = fn(&mut Parser<I>, Option<Expr>) -> Option<Expr>;

/// Pratt parser over any token source.
///
/// Syntax errors never stop the parse: the construct being parsed is dropped,
/// the error is recorded, and parsing resumes at the next statement. When the
/// token source runs dry the parser behaves as if it kept yielding `EOF`.
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: I,
    current: Token,
    peek: Token,
    errors: Vec<Diagnostic>,
    /// Expressions currently open around the cursor.
    depth: usize,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Deepest expression nesting accepted. Operands of prefix operators,
    /// groups, blocks and each link of an infix or call chain all count.
    pub const MAX_NESTING_DEPTH: usize = 256;

    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next().unwrap_or_else(|| Token::eof(0));
        let end = current.span.end;
        let peek = tokens.next().unwrap_or_else(|| Token::eof(end));
        Self {
            tokens,
            current,
            peek,
            errors: Vec::new(),
            depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        let program = Program { statements };
        tracing::trace!(%program, errors = self.errors.len(), "parsed program");
        program
    }

    /// Messages of every recorded syntax error, in the order found.
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.message.clone()).collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.errors
    }

    fn next_token(&mut self) {
        let end = self.peek.span.end;
        let next = self.tokens.next().unwrap_or_else(|| Token::eof(end));
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    /// Advances when the next token is `kind`; otherwise records an error and
    /// leaves the cursor where it is.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let message = format!(
            "expected next token to be {}, got {} instead",
            expected, self.peek.kind
        );
        self.error(self.peek.span, message);
    }

    fn error(&mut self, span: Span, message: String) {
        tracing::debug!(%message, ?span, "parse error");
        self.errors.push(Diagnostic::parse_error(span, message));
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.kind {
            TokenKind::Const => self.parse_const_statement(),
            TokenKind::Return => Some(self.parse_return_statement()),
            _ => Some(self.parse_expression_statement()),
        }
    }

    fn parse_const_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::Identifier) {
            return None;
        }
        let name = Identifier::new(self.current.clone());

        if !self.expect_peek(TokenKind::Eq) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Const { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Stmt {
        let token = self.current.clone();

        // `return;` and a bare `return` at the end of a block carry no value
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
            return Stmt::Return { token, value: None };
        }
        if self.peek_is(TokenKind::RightBrace) || self.peek_is(TokenKind::Eof) {
            return Stmt::Return { token, value: None };
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Stmt::Return { token, value }
    }

    fn parse_expression_statement(&mut self) -> Stmt {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest);

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Stmt::Expression { token, expression }
    }

    /// Expects the current token to be `{`. Stops on the matching `}`.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.next_token();

        while !self.current_is(TokenKind::RightBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        if self.current_is(TokenKind::Eof) {
            self.errors.push(Diagnostic::parse_error_with_help(
                token.span,
                "expected '}' to close block, found end of input".to_string(),
                "every '{' needs a matching '}'".to_string(),
            ));
        }

        BlockStatement { token, statements }
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        if !self.enter_nesting() {
            return None;
        }
        let expression = ensure_sufficient_stack(|| self.parse_expression_inner(precedence));
        self.depth -= 1;
        expression
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expr> {
        let Some(prefix) = prefix_parser::<I>(self.current.kind) else {
            let message = format!("no prefix parse function for {} found", self.current.kind);
            self.error(self.current.span, message);
            return None;
        };

        let mut left = prefix(self);
        let mut chained = 0;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = infix_parser::<I>(self.peek.kind) else {
                break;
            };
            // every infix or call wraps `left` one level deeper
            if !self.enter_nesting() {
                left = None;
                break;
            }
            chained += 1;
            self.next_token();
            left = infix(self, left);
        }

        self.depth -= chained;
        left
    }

    /// Opens one nesting level, or records an error when that would exceed
    /// `MAX_NESTING_DEPTH`.
    fn enter_nesting(&mut self) -> bool {
        if self.depth >= Self::MAX_NESTING_DEPTH {
            self.error(self.current.span, "expression nested too deeply".to_string());
            return false;
        }
        self.depth += 1;
        true
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Identifier(Identifier::new(self.current.clone())))
    }

    fn parse_number_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        match token.text.parse::<i64>() {
            Ok(value) => Some(Expr::Number { token, value }),
            Err(_) => {
                let message = format!("could not parse {} as integer", token.text);
                self.error(token.span, message);
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let value = token.text.clone();
        Some(Expr::String { token, value })
    }

    fn parse_boolean_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let value = token.is(TokenKind::True);
        Some(Expr::Boolean { token, value })
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let operator = match token.kind {
            TokenKind::Bang => PrefixOp::Not,
            TokenKind::Minus => PrefixOp::Negate,
            kind => unreachable!("prefix operator dispatched for {kind}"),
        };

        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix).map(Box::new);

        Some(Expr::Prefix {
            token,
            operator,
            operand,
        })
    }

    fn parse_infix_expression(&mut self, left: Option<Expr>) -> Option<Expr> {
        let token = self.current.clone();
        let operator = match token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Subtract,
            TokenKind::Asterisk => InfixOp::Multiply,
            TokenKind::Slash => InfixOp::Divide,
            TokenKind::Lt => InfixOp::Less,
            TokenKind::Gt => InfixOp::Greater,
            TokenKind::EqEq => InfixOp::Equal,
            TokenKind::BangEq => InfixOp::NotEqual,
            kind => unreachable!("infix operator dispatched for {kind}"),
        };

        let precedence = Precedence::of(token.kind);
        self.next_token();
        let right = self.parse_expression(precedence).map(Box::new);

        Some(Expr::Infix {
            token,
            left: left.map(Box::new),
            operator,
            right,
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest);

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }

        expression
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest).map(Box::new);

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LeftBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expr::Function {
            token,
            parameters,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RightParen) {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenKind::Identifier) {
            return None;
        }
        parameters.push(Identifier::new(self.current.clone()));

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            if !self.expect_peek(TokenKind::Identifier) {
                return None;
            }
            parameters.push(Identifier::new(self.current.clone()));
        }

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_call_expression(&mut self, callee: Option<Expr>) -> Option<Expr> {
        let token = self.current.clone();
        let arguments = self.parse_call_arguments()?;
        Some(Expr::Call {
            token,
            callee: callee.map(Box::new),
            arguments,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Option<Expr>>> {
        let mut arguments = Vec::new();

        if self.peek_is(TokenKind::RightParen) {
            self.next_token();
            return Some(arguments);
        }

        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest));

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest));
        }

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }

        Some(arguments)
    }
}

fn prefix_parser<I: Iterator<Item = Token>>(kind: TokenKind) -> Option<PrefixParseFn<I>> {
    let parse: PrefixParseFn<I> = match kind {
        TokenKind::Identifier => Parser::parse_identifier,
        TokenKind::Number => Parser::parse_number_literal,
        TokenKind::String => Parser::parse_string_literal,
        TokenKind::True | TokenKind::False => Parser::parse_boolean_literal,
        TokenKind::Bang | TokenKind::Minus => Parser::parse_prefix_expression,
        TokenKind::LeftParen => Parser::parse_grouped_expression,
        TokenKind::If => Parser::parse_if_expression,
        TokenKind::Function => Parser::parse_function_literal,
        _ => return None,
    };
    Some(parse)
}

fn infix_parser<I: Iterator<Item = Token>>(kind: TokenKind) -> Option<InfixParseFn<I>> {
    let parse: InfixParseFn<I> = match kind {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::EqEq
        | TokenKind::BangEq => Parser::parse_infix_expression,
        TokenKind::LeftParen => Parser::parse_call_expression,
        _ => return None,
    };
    Some(parse)
}
