use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::language::token::{Literal, Token};

#[cfg(test)]
mod tests;

/// Index of a variable's value slot in the interpreter's slot table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    pub fn new(index: usize) -> SlotId {
        SlotId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Variable {
        name: Token,
        slot: SlotId,
    },
    Infix {
        left: Rc<Expr>,
        operator: Token,
        right: Rc<Expr>,
    },
    Group(Rc<Expr>),
    Prefix {
        operator: Token,
        right: Rc<Expr>,
    },
    Postfix {
        left: Rc<Expr>,
        operator: Token,
    },
    Literal(Literal),
    Ternary {
        condition: Rc<Expr>,
        then: Rc<Expr>,
        otherwise: Rc<Expr>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Variable, Infix, Group, Prefix, Postfix, Literal, Ternary,
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprKind::Variable => write!(f, "variable"),
            ExprKind::Infix => write!(f, "infix expression"),
            ExprKind::Group => write!(f, "group"),
            ExprKind::Prefix => write!(f, "prefix expression"),
            ExprKind::Postfix => write!(f, "postfix expression"),
            ExprKind::Literal => write!(f, "literal"),
            ExprKind::Ternary => write!(f, "ternary expression"),
        }
    }
}

pub trait ExprVisitor {
    type Output;

    fn visit_variable(&mut self, name: &Token, slot: SlotId) -> Self::Output;
    fn visit_infix(&mut self, left: &Rc<Expr>, operator: &Token, right: &Rc<Expr>) -> Self::Output;
    fn visit_group(&mut self, expr: &Rc<Expr>) -> Self::Output;
    fn visit_prefix(&mut self, operator: &Token, right: &Rc<Expr>) -> Self::Output;
    fn visit_postfix(&mut self, left: &Rc<Expr>, operator: &Token) -> Self::Output;
    fn visit_literal(&mut self, value: &Literal) -> Self::Output;
    fn visit_ternary(&mut self, condition: &Rc<Expr>, then: &Rc<Expr>, otherwise: &Rc<Expr>) -> Self::Output;
}

impl Expr {
    pub fn variable(name: Token, slot: SlotId) -> Rc<Expr> {
        Rc::new(Expr::Variable { name, slot })
    }

    pub fn infix(left: Rc<Expr>, operator: Token, right: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::Infix { left, operator, right })
    }

    pub fn group(expr: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::Group(expr))
    }

    pub fn prefix(operator: Token, right: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::Prefix { operator, right })
    }

    pub fn postfix(left: Rc<Expr>, operator: Token) -> Rc<Expr> {
        Rc::new(Expr::Postfix { left, operator })
    }

    pub fn literal(value: Literal) -> Rc<Expr> {
        Rc::new(Expr::Literal(value))
    }

    pub fn ternary(condition: Rc<Expr>, then: Rc<Expr>, otherwise: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::Ternary { condition, then, otherwise })
    }

    /// Calls the visitor method matching this node's variant.
    pub fn accept<V: ExprVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Variable { name, slot } => visitor.visit_variable(name, *slot),
            Expr::Infix { left, operator, right } => visitor.visit_infix(left, operator, right),
            Expr::Group(expr) => visitor.visit_group(expr),
            Expr::Prefix { operator, right } => visitor.visit_prefix(operator, right),
            Expr::Postfix { left, operator } => visitor.visit_postfix(left, operator),
            Expr::Literal(value) => visitor.visit_literal(value),
            Expr::Ternary { condition, then, otherwise } => visitor.visit_ternary(condition, then, otherwise),
        }
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Variable { .. } => ExprKind::Variable,
            Expr::Infix { .. } => ExprKind::Infix,
            Expr::Group(_) => ExprKind::Group,
            Expr::Prefix { .. } => ExprKind::Prefix,
            Expr::Postfix { .. } => ExprKind::Postfix,
            Expr::Literal(_) => ExprKind::Literal,
            Expr::Ternary { .. } => ExprKind::Ternary,
        }
    }

    pub fn is(&self, kind: ExprKind) -> bool {
        self.kind() == kind
    }

    pub fn as_variable(&self) -> Option<(&Token, SlotId)> {
        match self {
            Expr::Variable { name, slot } => Some((name, *slot)),
            _ => None,
        }
    }

    /// Like [`Expr::as_variable`], for callers that already checked the tag.
    ///
    /// # Panics
    /// If this node is not a variable.
    pub fn expect_variable(&self) -> (&Token, SlotId) {
        match self.as_variable() {
            Some(variable) => variable,
            None => panic!("Internal error: expected variable, got {}", self.kind()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expression(Rc<Expr>),
    Print(Rc<Expr>),
    Variable {
        // `var` or `val`
        keyword: Token,
        name: Token,
        initializer: Option<Rc<Expr>>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Expression, Print, Variable,
}

pub trait StmtVisitor {
    type Output;

    fn visit_expression_stmt(&mut self, expr: &Rc<Expr>) -> Self::Output;
    fn visit_print_stmt(&mut self, expr: &Rc<Expr>) -> Self::Output;
    fn visit_variable_stmt(&mut self, keyword: &Token, name: &Token, initializer: Option<&Rc<Expr>>) -> Self::Output;
}

impl Stmt {
    pub fn accept<V: StmtVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Stmt::Expression(expr) => visitor.visit_expression_stmt(expr),
            Stmt::Print(expr) => visitor.visit_print_stmt(expr),
            Stmt::Variable { keyword, name, initializer } => visitor.visit_variable_stmt(keyword, name, initializer.as_ref()),
        }
    }

    pub fn kind(&self) -> StmtKind {
        match self {
            Stmt::Expression(_) => StmtKind::Expression,
            Stmt::Print(_) => StmtKind::Print,
            Stmt::Variable { .. } => StmtKind::Variable,
        }
    }

    pub fn is(&self, kind: StmtKind) -> bool {
        self.kind() == kind
    }

    /// The expression a statement evaluates, if any.
    pub fn expr(&self) -> Option<&Rc<Expr>> {
        match self {
            Stmt::Expression(expr) | Stmt::Print(expr) => Some(expr),
            Stmt::Variable { initializer, .. } => initializer.as_ref(),
        }
    }
}
