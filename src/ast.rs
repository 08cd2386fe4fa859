use crate::error::Span;
use crate::token::Token;
use std::fmt;

/// A parsed program: the top-level statements in source order.
///
/// Statements that failed to parse are not part of the tree; their errors
/// live on the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Text of the first statement's defining token, or empty.
    pub fn literal(&self) -> &str {
        self.statements.first().map_or("", Stmt::literal)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Const {
        token: Token,
        name: Identifier,
        value: Option<Expr>,
    },
    Return {
        token: Token,
        value: Option<Expr>,
    },
    Expression {
        token: Token,
        expression: Option<Expr>,
    },
    Block(BlockStatement),
}

impl Stmt {
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Const { token, .. } => token,
            Stmt::Return { token, .. } => token,
            Stmt::Expression { token, .. } => token,
            Stmt::Block(block) => &block.token,
        }
    }

    pub fn literal(&self) -> &str {
        &self.token().text
    }

    pub fn span(&self) -> Span {
        self.token().span
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Const { token, name, value } => {
                write!(f, "{} {} = ", token.text, name)?;
                write_optional(f, value.as_ref())?;
                write!(f, ";")
            }
            Stmt::Return { token, value } => {
                write!(f, "{}", token.text)?;
                if let Some(value) = value {
                    write!(f, " {}", value)?;
                }
                write!(f, ";")
            }
            Stmt::Expression { expression, .. } => write_optional(f, expression.as_ref()),
            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}

/// `{ ... }`, the body of functions and `if` branches.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

impl BlockStatement {
    pub fn literal(&self) -> &str {
        &self.token.text
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let name = token.text.clone();
        Self { token, name }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Identifier),
    Number {
        token: Token,
        value: i64,
    },
    String {
        token: Token,
        value: String,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Prefix {
        token: Token,
        operator: PrefixOp,
        operand: Option<Box<Expr>>,
    },
    Infix {
        token: Token,
        left: Option<Box<Expr>>,
        operator: InfixOp,
        right: Option<Box<Expr>>,
    },
    If {
        token: Token,
        condition: Option<Box<Expr>>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    /// `token` is the opening parenthesis.
    Call {
        token: Token,
        callee: Option<Box<Expr>>,
        arguments: Vec<Option<Expr>>,
    },
}

impl Expr {
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(identifier) => &identifier.token,
            Expr::Number { token, .. } => token,
            Expr::String { token, .. } => token,
            Expr::Boolean { token, .. } => token,
            Expr::Prefix { token, .. } => token,
            Expr::Infix { token, .. } => token,
            Expr::If { token, .. } => token,
            Expr::Function { token, .. } => token,
            Expr::Call { token, .. } => token,
        }
    }

    pub fn literal(&self) -> &str {
        &self.token().text
    }

    pub fn span(&self) -> Span {
        self.token().span
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Identifier(identifier) => write!(f, "{}", identifier),
            Expr::Number { token, .. } | Expr::Boolean { token, .. } => {
                write!(f, "{}", token.text)
            }
            Expr::String { value, .. } => write!(f, "\"{}\"", value),
            Expr::Prefix {
                operator, operand, ..
            } => {
                write!(f, "({}", operator)?;
                write_optional(f, operand.as_deref())?;
                write!(f, ")")
            }
            Expr::Infix {
                left,
                operator,
                right,
                ..
            } => {
                write!(f, "(")?;
                write_optional(f, left.as_deref())?;
                write!(f, " {} ", operator)?;
                write_optional(f, right.as_deref())?;
                write!(f, ")")
            }
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if")?;
                write_optional(f, condition.as_deref())?;
                write!(f, " {}", consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Expr::Function {
                token,
                parameters,
                body,
            } => {
                write!(f, "{}(", token.text)?;
                write_list(f, parameters.iter().map(Some))?;
                write!(f, ") {}", body)
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                write_optional(f, callee.as_deref())?;
                write!(f, "(")?;
                write_list(f, arguments.iter().map(Option::as_ref))?;
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Negate,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Less,
    Greater,
    Equal,
    NotEqual,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            InfixOp::Add => "+",
            InfixOp::Subtract => "-",
            InfixOp::Multiply => "*",
            InfixOp::Divide => "/",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::Equal => "==",
            InfixOp::NotEqual => "!=",
        })
    }
}

// Missing children come from parse failures and render as nothing.
fn write_optional<T: fmt::Display>(f: &mut fmt::Formatter, node: Option<&T>) -> fmt::Result {
    match node {
        Some(node) => write!(f, "{}", node),
        None => Ok(()),
    }
}

fn write_list<'a, T, I>(f: &mut fmt::Formatter, items: I) -> fmt::Result
where
    T: fmt::Display + 'a,
    I: Iterator<Item = Option<&'a T>>,
{
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_optional(f, item)?;
    }
    Ok(())
}
