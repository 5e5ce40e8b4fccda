use super::*;
use crate::language::token::{TokenKind, TokenSpan};

fn identifier(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name.to_owned(), Literal::Nil, TokenSpan::new(1, 0, name.len() as u32))
}

#[test]
pub fn test_kind() {
    let variable = Expr::variable(identifier("a"), SlotId::new(3));
    let group = Expr::group(Rc::clone(&variable));

    assert!(variable.is(ExprKind::Variable));
    assert!(group.is(ExprKind::Group));
    assert_eq!("group", group.kind().to_string());

    assert!(Stmt::Print(group).is(StmtKind::Print));
}

#[test]
pub fn test_as_variable() {
    let variable = Expr::variable(identifier("a"), SlotId::new(3));

    let (name, slot) = variable.expect_variable();
    assert_eq!("a", name.lexeme());
    assert_eq!(3, slot.index());

    assert_eq!(None, Expr::literal(Literal::Nil).as_variable());
}

#[test]
#[should_panic(expected = "Internal error: expected variable, got literal")]
pub fn test_expect_variable_panics() {
    Expr::literal(Literal::Number(1.0)).expect_variable();
}

#[test]
pub fn test_shared_children() {
    let one = Expr::literal(Literal::Number(1.0));
    let plus = Token::new(TokenKind::Plus, String::from("+"), Literal::Nil, TokenSpan::new(1, 2, 3));
    let stmt = Stmt::Expression(Expr::infix(Rc::clone(&one), plus, Rc::clone(&one)));

    assert_eq!(3, Rc::strong_count(&one));

    match stmt.expr().map(|expr| &**expr) {
        Some(Expr::Infix { left, right, .. }) => assert!(Rc::ptr_eq(left, right)),
        other => panic!("expected infix expression, got {:?}", other),
    }
}
