use std::cmp::Ordering;
use std::io::{self, Write};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error};
use crate::language::ast::{Expr, ExprKind, ExprVisitor, SlotId, Stmt, StmtVisitor};
use crate::language::token::{Literal, Token, TokenKind};


// Largest integer an f64 holds exactly (2^53)
const MAX_BITWISE_OPERAND: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{} Error at '{}': {}", .token.span(), .token.lexeme(), .message)]
    Operation {
        token: Token,
        message: String,
    },
    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> RuntimeError {
        RuntimeError::Operation { token: token.clone(), message: message.into() }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Tree-walking evaluator. `print` output goes to `out`.
///
/// Variable values live in a slot table indexed by [`SlotId`]; a slot that was never written
/// reads as `nil`.
pub struct Interpreter<W: Write> {
    out: W,
    slots: Vec<Literal>,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Interpreter<W> {
        Interpreter {
            out,
            slots: Vec::new(),
        }
    }

    /// Executes `statements` in order, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        for stmt in statements {
            if let Err(err) = self.execute(stmt) {
                error!("{}", err);
                return Err(err);
            }
        }

        self.out.flush()?;
        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<()> {
        stmt.accept(self)
    }

    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Literal> {
        expr.accept(self)
    }

    pub fn load(&self, slot: SlotId) -> Literal {
        self.slots.get(slot.index()).cloned().unwrap_or_default()
    }

    pub fn store(&mut self, slot: SlotId, value: Literal) {
        let index = slot.index();

        if index >= self.slots.len() {
            self.slots.resize(index + 1, Literal::Nil);
        }

        self.slots[index] = value;
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn assign(&mut self, target: &Expr, operator: &Token, value: &Expr) -> RuntimeResult<Literal> {
        let slot = match target.as_variable() {
            Some((_, slot)) => slot,
            None => return Err(RuntimeError::new(operator, "Invalid assignment target")),
        };

        let value = self.evaluate(value)?;

        let result = match operator.kind().compound_operator() {
            Some(kind) => binary(operator, kind, self.load(slot), value)?,
            None => value,
        };

        self.store(slot, result.clone());
        Ok(result)
    }

    fn increment(&mut self, operator: &Token, target: &Expr, prefix: bool) -> RuntimeResult<Literal> {
        if !target.is(ExprKind::Variable) {
            return Err(RuntimeError::new(operator,
                format!("Operand of '{}' must be a variable, got {}", operator.lexeme(), target.kind())));
        }

        let (_, slot) = target.expect_variable();

        let current = match self.load(slot) {
            Literal::Number(value) => value,
            _ => return Err(RuntimeError::new(operator, "Operand must be a number")),
        };

        let updated = if operator.is(TokenKind::PlusPlus) { current + 1.0 } else { current - 1.0 };
        self.store(slot, Literal::Number(updated));

        Ok(Literal::Number(if prefix { updated } else { current }))
    }
}

impl<W: Write> ExprVisitor for Interpreter<W> {
    type Output = RuntimeResult<Literal>;

    fn visit_variable(&mut self, _name: &Token, slot: SlotId) -> RuntimeResult<Literal> {
        Ok(self.load(slot))
    }

    fn visit_infix(&mut self, left: &Rc<Expr>, operator: &Token, right: &Rc<Expr>) -> RuntimeResult<Literal> {
        if operator.kind().is_assignment() {
            return self.assign(left, operator, right);
        }

        // Both operands are always evaluated, even for `&&` and `||`
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        binary(operator, operator.kind(), left, right)
    }

    fn visit_group(&mut self, expr: &Rc<Expr>) -> RuntimeResult<Literal> {
        self.evaluate(expr)
    }

    fn visit_prefix(&mut self, operator: &Token, right: &Rc<Expr>) -> RuntimeResult<Literal> {
        if matches!(operator.kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            return self.increment(operator, right, true);
        }

        let value = self.evaluate(right)?;

        match operator.kind() {
            TokenKind::Minus => match value {
                Literal::Number(value) => Ok(Literal::Number(-value)),
                _ => Err(RuntimeError::new(operator, "Operand must be a number")),
            },
            TokenKind::Plus => match value {
                Literal::Number(_) => Ok(value),
                _ => Err(RuntimeError::new(operator, "Operand must be a number")),
            },
            TokenKind::Bang => Ok(Literal::Boolean(!value.is_truthy())),
            _ => Err(RuntimeError::new(operator, "Unknown prefix operator")),
        }
    }

    fn visit_postfix(&mut self, left: &Rc<Expr>, operator: &Token) -> RuntimeResult<Literal> {
        self.increment(operator, left, false)
    }

    fn visit_literal(&mut self, value: &Literal) -> RuntimeResult<Literal> {
        Ok(value.clone())
    }

    fn visit_ternary(&mut self, condition: &Rc<Expr>, then: &Rc<Expr>, otherwise: &Rc<Expr>) -> RuntimeResult<Literal> {
        if self.evaluate(condition)?.is_truthy() {
            self.evaluate(then)
        } else {
            self.evaluate(otherwise)
        }
    }
}

impl<W: Write> StmtVisitor for Interpreter<W> {
    type Output = RuntimeResult<()>;

    fn visit_expression_stmt(&mut self, expr: &Rc<Expr>) -> RuntimeResult<()> {
        let value = self.evaluate(expr)?;
        debug!("Expression result: {}", value.stringify());
        Ok(())
    }

    fn visit_print_stmt(&mut self, expr: &Rc<Expr>) -> RuntimeResult<()> {
        let value = self.evaluate(expr)?;
        writeln!(self.out, "{}", value)?;
        Ok(())
    }

    fn visit_variable_stmt(&mut self, keyword: &Token, name: &Token, initializer: Option<&Rc<Expr>>) -> RuntimeResult<()> {
        let value = match initializer {
            Some(expr) => self.evaluate(expr)?,
            None => Literal::Nil,
        };

        debug!("{} {} = {}", keyword.lexeme(), name.lexeme(), value.stringify());
        Ok(())
    }
}

/// Applies the infix operator `kind` to two evaluated operands.
///
/// `kind` differs from the kind of `operator` for compound assignments, where `operator` is
/// `+=` and friends and only serves as the error location.
fn binary(operator: &Token, kind: TokenKind, left: Literal, right: Literal) -> RuntimeResult<Literal> {
    match kind {
        TokenKind::EqualEqual => Ok(Literal::Boolean(left == right)),
        TokenKind::BangEqual => Ok(Literal::Boolean(left != right)),

        TokenKind::Greater => compare(operator, &left, &right).map(|ord| Literal::Boolean(ord == Some(Ordering::Greater))),
        TokenKind::GreaterEqual => compare(operator, &left, &right)
            .map(|ord| Literal::Boolean(matches!(ord, Some(Ordering::Greater | Ordering::Equal)))),
        TokenKind::Less => compare(operator, &left, &right).map(|ord| Literal::Boolean(ord == Some(Ordering::Less))),
        TokenKind::LessEqual => compare(operator, &left, &right)
            .map(|ord| Literal::Boolean(matches!(ord, Some(Ordering::Less | Ordering::Equal)))),

        TokenKind::Plus => add(operator, left, right),
        TokenKind::Minus => number_operation(operator, left, right, |left, right| left - right),
        TokenKind::Star => number_operation(operator, left, right, |left, right| left * right),
        TokenKind::Slash => number_operation(operator, left, right, |left, right| left / right),
        TokenKind::StarStar => number_operation(operator, left, right, f64::powf),
        TokenKind::Percent => remainder(operator, left, right),

        TokenKind::Ampersand | TokenKind::Pipe | TokenKind::Caret
        | TokenKind::LessLess | TokenKind::GreaterGreater => bitwise(operator, kind, &left, &right),

        TokenKind::AmpersandAmpersand => Ok(Literal::Boolean(left.is_truthy() && right.is_truthy())),
        TokenKind::PipePipe => Ok(Literal::Boolean(left.is_truthy() || right.is_truthy())),

        _ => Err(RuntimeError::new(operator, format!("Unknown infix operator {}", kind))),
    }
}

fn number_operation<F>(operator: &Token, left: Literal, right: Literal, op: F) -> RuntimeResult<Literal>
where
    F: Fn(f64, f64) -> f64,
{
    match (left, right) {
        (Literal::Number(left), Literal::Number(right)) => Ok(Literal::Number(op(left, right))),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers")),
    }
}

fn add(operator: &Token, left: Literal, right: Literal) -> RuntimeResult<Literal> {
    match (left, right) {
        (Literal::Number(left), Literal::Number(right)) => Ok(Literal::Number(left + right)),
        (Literal::String(left), Literal::String(right)) => Ok(Literal::String(left + &right)),
        (left @ Literal::Number(_), Literal::String(right)) => Ok(Literal::String(format!("{}{}", left, right))),
        (Literal::String(left), right @ Literal::Number(_)) => Ok(Literal::String(format!("{}{}", left, right))),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers or strings")),
    }
}

fn remainder(operator: &Token, left: Literal, right: Literal) -> RuntimeResult<Literal> {
    let (left, right) = match (left, right) {
        (Literal::Number(left), Literal::Number(right)) => (left.trunc() as i64, right.trunc() as i64),
        _ => return Err(RuntimeError::new(operator, "Operands must be numbers")),
    };

    if right == 0 {
        return Err(RuntimeError::new(operator, "Division by zero"));
    }

    Ok(Literal::Number(left.wrapping_rem(right) as f64))
}

fn compare(operator: &Token, left: &Literal, right: &Literal) -> RuntimeResult<Option<Ordering>> {
    match (left, right) {
        (Literal::Number(left), Literal::Number(right)) => Ok(left.partial_cmp(right)),
        (Literal::String(left), Literal::String(right)) => Ok(Some(left.cmp(right))),
        _ => Err(RuntimeError::new(operator, "Operands must be two numbers or two strings")),
    }
}

fn bitwise(operator: &Token, kind: TokenKind, left: &Literal, right: &Literal) -> RuntimeResult<Literal> {
    let left = bitwise_operand(operator, left)?;
    let right = bitwise_operand(operator, right)?;

    let result = match kind {
        TokenKind::Ampersand => left & right,
        TokenKind::Pipe => left | right,
        TokenKind::Caret => left ^ right,
        TokenKind::LessLess | TokenKind::GreaterGreater => {
            if right >= u64::BITS as u64 {
                return Err(RuntimeError::new(operator, format!("Shift amount {} is out of range", right)));
            }

            if kind == TokenKind::LessLess { left << right } else { left >> right }
        },
        _ => return Err(RuntimeError::new(operator, format!("Unknown bitwise operator {}", kind))),
    };

    Ok(Literal::Number(result as f64))
}

fn bitwise_operand(operator: &Token, value: &Literal) -> RuntimeResult<u64> {
    match value {
        Literal::Number(value) if *value >= 0.0 && value.fract() == 0.0 && *value <= MAX_BITWISE_OPERAND => Ok(*value as u64),
        _ => Err(RuntimeError::new(operator, "Operands must be non-negative whole numbers")),
    }
}
