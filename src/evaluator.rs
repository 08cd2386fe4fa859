use crate::ast::{BlockStatement, Expr, Identifier, InfixOp, PrefixOp, Program, Stmt};
use crate::environment::{Env, Environment};
use crate::object::{Function, Object};
use crate::stack::ensure_sufficient_stack;
use std::cell::Cell;
use std::rc::Rc;

/// Tree-walking evaluator.
///
/// Every evaluation step returns `Option<Object>`: `None` means "nothing was
/// produced", which happens for an `if` without a taken branch and for nodes
/// that lost a child to a parse error. Failures are `Object::Error` values and
/// early exits are `Object::ReturnValue` values; both are checked for and
/// passed upward at every point where results are combined.
pub struct Evaluator {
    environment: Env,
    max_depth: usize,
    depth: Cell<usize>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    pub fn with_environment(environment: Env) -> Self {
        Self {
            environment,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            depth: Cell::new(0),
        }
    }

    /// Limits how many function calls may be active at once.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The global frame; bindings made by `const` at top level land here.
    pub fn environment(&self) -> &Env {
        &self.environment
    }

    pub fn evaluate_program(&self, program: &Program) -> Option<Object> {
        self.eval_program(program, &self.environment)
    }

    pub fn evaluate_statement(&self, statement: &Stmt) -> Option<Object> {
        self.eval_statement(statement, &self.environment)
    }

    pub fn evaluate_expression(&self, expression: &Expr) -> Option<Object> {
        self.eval_expression(expression, &self.environment)
    }

    fn eval_program(&self, program: &Program, env: &Env) -> Option<Object> {
        let mut result = None;

        for statement in &program.statements {
            result = self.eval_statement(statement, env);

            match result {
                Some(Object::ReturnValue(value)) => return Some(*value),
                Some(Object::Error(message)) => {
                    tracing::debug!(%message, "program stopped on error");
                    return Some(Object::Error(message));
                }
                _ => {}
            }
        }

        result
    }

    fn eval_block(&self, block: &BlockStatement, env: &Env) -> Option<Object> {
        let mut result = None;

        for statement in &block.statements {
            result = self.eval_statement(statement, env);

            if result.as_ref().is_some_and(Object::is_signal) {
                return result;
            }
        }

        result
    }

    fn eval_statement(&self, statement: &Stmt, env: &Env) -> Option<Object> {
        match statement {
            Stmt::Expression { expression, .. } => self.eval_optional(expression.as_ref(), env),
            Stmt::Block(block) => self.eval_block(block, env),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expression) => self.eval_expression(expression, env)?,
                    None => Object::NULL,
                };
                if value.is_signal() {
                    return Some(value);
                }
                Some(Object::ReturnValue(Box::new(value)))
            }
            Stmt::Const { name, value, .. } => {
                let value = self.eval_optional(value.as_ref(), env)?;
                if value.is_signal() {
                    return Some(value);
                }
                Some(env.borrow_mut().define(name.name.as_str(), value))
            }
        }
    }

    fn eval_optional(&self, expression: Option<&Expr>, env: &Env) -> Option<Object> {
        self.eval_expression(expression?, env)
    }

    fn eval_expression(&self, expression: &Expr, env: &Env) -> Option<Object> {
        ensure_sufficient_stack(|| self.eval_expression_inner(expression, env))
    }

    fn eval_expression_inner(&self, expression: &Expr, env: &Env) -> Option<Object> {
        match expression {
            Expr::Number { value, .. } => Some(Object::Integer(*value)),
            Expr::String { value, .. } => Some(Object::String(value.clone())),
            Expr::Boolean { value, .. } => Some(Object::boolean(*value)),
            Expr::Identifier(identifier) => Some(eval_identifier(identifier, env)),
            Expr::Prefix {
                operator, operand, ..
            } => {
                let operand = self.eval_optional(operand.as_deref(), env)?;
                if operand.is_signal() {
                    return Some(operand);
                }
                Some(eval_prefix(*operator, operand))
            }
            Expr::Infix {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.eval_optional(left.as_deref(), env)?;
                if left.is_signal() {
                    return Some(left);
                }
                let right = self.eval_optional(right.as_deref(), env)?;
                if right.is_signal() {
                    return Some(right);
                }
                Some(eval_infix(*operator, left, right))
            }
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = self.eval_optional(condition.as_deref(), env)?;
                if condition.is_signal() {
                    return Some(condition);
                }
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    None
                }
            }
            Expr::Function {
                parameters, body, ..
            } => Some(Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            }))),
            Expr::Call {
                callee, arguments, ..
            } => {
                let function = self.eval_optional(callee.as_deref(), env)?;
                if function.is_signal() {
                    return Some(function);
                }

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    let value = self.eval_optional(argument.as_ref(), env)?;
                    if value.is_signal() {
                        return Some(value);
                    }
                    values.push(value);
                }

                Some(self.apply_function(function, values))
            }
        }
    }

    fn apply_function(&self, function: Object, arguments: Vec<Object>) -> Object {
        let function = match function {
            Object::Function(function) => function,
            other => return Object::error(format!("not a function: {}", other.kind())),
        };

        if function.parameters.len() != arguments.len() {
            return Object::error(format!(
                "wrong number of arguments: expected {}, got {}",
                function.parameters.len(),
                arguments.len()
            ));
        }

        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Object::error(format!("maximum call depth of {} exceeded", self.max_depth));
        }

        tracing::trace!(depth, body = %function.body, "call");

        let local = Environment::new_enclosed(&function.env);
        {
            let mut frame = local.borrow_mut();
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                frame.define(parameter.name.as_str(), argument);
            }
        }

        self.depth.set(depth + 1);
        let result = self.eval_block(&function.body, &local);
        self.depth.set(depth);

        match result {
            Some(Object::ReturnValue(value)) => *value,
            Some(value) => value,
            None => Object::NULL,
        }
    }
}

/// Evaluates `program` against `env`, with a top-level return unwrapped.
pub fn evaluate(program: &Program, env: &Env) -> Option<Object> {
    Evaluator::with_environment(Rc::clone(env)).evaluate_program(program)
}

fn eval_identifier(identifier: &Identifier, env: &Env) -> Object {
    env.borrow()
        .get(&identifier.name)
        .unwrap_or_else(|| Object::error(format!("identifier not found: {}", identifier.name)))
}

fn eval_prefix(operator: PrefixOp, operand: Object) -> Object {
    match operator {
        PrefixOp::Not => Object::boolean(!operand.is_truthy()),
        PrefixOp::Negate => match operand {
            Object::Integer(value) => value
                .checked_neg()
                .map_or_else(|| Object::error("integer overflow"), Object::Integer),
            other => Object::error(format!("unknown operator: -{}", other.kind())),
        },
    }
}

fn eval_infix(operator: InfixOp, left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, l, r),
        (left, right) if left.kind() != right.kind() => Object::error(format!(
            "type mismatch: {} {} {}",
            left.kind(),
            operator,
            right.kind()
        )),
        (left, right) => match operator {
            InfixOp::Equal => Object::boolean(left == right),
            InfixOp::NotEqual => Object::boolean(left != right),
            _ => Object::error(format!(
                "unknown operator: {} {} {}",
                left.kind(),
                operator,
                right.kind()
            )),
        },
    }
}

fn eval_integer_infix(operator: InfixOp, left: i64, right: i64) -> Object {
    let arithmetic = match operator {
        InfixOp::Add => left.checked_add(right),
        InfixOp::Subtract => left.checked_sub(right),
        InfixOp::Multiply => left.checked_mul(right),
        InfixOp::Divide => {
            if right == 0 {
                return Object::error("division by zero");
            }
            left.checked_div(right)
        }
        InfixOp::Less => return Object::boolean(left < right),
        InfixOp::Greater => return Object::boolean(left > right),
        InfixOp::Equal => return Object::boolean(left == right),
        InfixOp::NotEqual => return Object::boolean(left != right),
    };

    arithmetic.map_or_else(|| Object::error("integer overflow"), Object::Integer)
}
