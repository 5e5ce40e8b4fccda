use std::io::Write;
use std::rc::Rc;
use crate::language::ast::{Expr, ExprVisitor, SlotId, Stmt, StmtVisitor};
use crate::language::token::{Literal, Token};

/// Renders syntax trees as S-expressions, e.g. `1 + 2 * 3` as `(+ 1 (* 2 3))`.
///
/// Only used for inspection, never for evaluation.
pub struct AstPrinter;

impl AstPrinter {
    pub fn new() -> AstPrinter {
        AstPrinter
    }

    pub fn print_expr(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }

    pub fn write_program(&mut self, statements: &[Stmt], out: &mut impl Write) -> Result<(), std::io::Error> {
        for stmt in statements {
            writeln!(out, "{}", self.print_stmt(stmt))?;
        }

        Ok(())
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Rc<Expr>]) -> String {
        let mut result = format!("({}", name);

        for expr in exprs {
            result.push(' ');
            result.push_str(&expr.accept(self));
        }

        result.push(')');
        result
    }
}

impl Default for AstPrinter {
    fn default() -> Self {
        AstPrinter::new()
    }
}

impl ExprVisitor for AstPrinter {
    type Output = String;

    fn visit_variable(&mut self, name: &Token, _slot: SlotId) -> String {
        name.lexeme().to_owned()
    }

    fn visit_infix(&mut self, left: &Rc<Expr>, operator: &Token, right: &Rc<Expr>) -> String {
        self.parenthesize(operator.lexeme(), &[left, right])
    }

    fn visit_group(&mut self, expr: &Rc<Expr>) -> String {
        self.parenthesize("group", &[expr])
    }

    fn visit_prefix(&mut self, operator: &Token, right: &Rc<Expr>) -> String {
        self.parenthesize(operator.lexeme(), &[right])
    }

    fn visit_postfix(&mut self, left: &Rc<Expr>, operator: &Token) -> String {
        format!("({} {})", left.accept(self), operator.lexeme())
    }

    fn visit_literal(&mut self, value: &Literal) -> String {
        value.stringify()
    }

    fn visit_ternary(&mut self, condition: &Rc<Expr>, then: &Rc<Expr>, otherwise: &Rc<Expr>) -> String {
        self.parenthesize("?", &[condition, then, otherwise])
    }
}

impl StmtVisitor for AstPrinter {
    type Output = String;

    fn visit_expression_stmt(&mut self, expr: &Rc<Expr>) -> String {
        self.parenthesize("expr", &[expr])
    }

    fn visit_print_stmt(&mut self, expr: &Rc<Expr>) -> String {
        self.parenthesize("print", &[expr])
    }

    fn visit_variable_stmt(&mut self, keyword: &Token, name: &Token, initializer: Option<&Rc<Expr>>) -> String {
        let value = match initializer {
            Some(expr) => expr.accept(self),
            None => String::from("nil"),
        };

        format!("({} {} {})", keyword.lexeme(), name.lexeme(), value)
    }
}

pub fn print_expr(expr: &Expr) -> String {
    AstPrinter::new().print_expr(expr)
}

pub fn print_stmt(stmt: &Stmt) -> String {
    AstPrinter::new().print_stmt(stmt)
}
