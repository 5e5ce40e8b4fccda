use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error};
use crate::language::ast::{Expr, SlotId, Stmt};
use crate::language::printer;
use crate::language::token::{Literal, Token, TokenKind};


#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{} Error at '{}': {}", .token.span(), .token.lexeme(), .message)]
    UnexpectedToken {
        token: Token,
        message: String,
    },
    #[error("{} Error at end: {}", .token.span(), .message)]
    UnexpectedEof {
        token: Token,
        message: String,
    },
    // The lexer already put a position-qualified message into the token
    #[error("{}", .token.lexeme())]
    Lexical {
        token: Token,
    },
}

impl ParseError {
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { token, .. } => token,
            ParseError::UnexpectedEof { token, .. } => token,
            ParseError::Lexical { token } => token,
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Operator precedence, from tightest (`Primary`) to loosest (`Assignment`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    None = 0,
    Primary = 1,
    Unary = 2,
    Exponent = 3,
    Factor = 4,
    Term = 5,
    Shift = 6,
    Comparison = 7,
    Equality = 8,
    BitAnd = 9,
    BitXor = 10,
    BitOr = 11,
    And = 12,
    Or = 13,
    Assignment = 14,
}

impl Precedence {
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Inverts the rank so that tighter operators bind stronger.
    pub fn binding_power(self) -> u8 {
        match self {
            Precedence::None => 0,
            _ => Precedence::Assignment.rank() + 1 - self.rank(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseRule {
    pub precedence: Precedence,
    pub associativity: Associativity,
    pub prefix: bool,
    pub infix: bool,
}

impl ParseRule {
    const fn new(precedence: Precedence, associativity: Associativity, prefix: bool, infix: bool) -> ParseRule {
        ParseRule { precedence, associativity, prefix, infix }
    }

    const fn binary(precedence: Precedence) -> ParseRule {
        ParseRule::new(precedence, Associativity::Left, false, true)
    }

    pub fn of(kind: TokenKind) -> ParseRule {
        match kind {
            TokenKind::Number | TokenKind::String | TokenKind::Identifier
            | TokenKind::True | TokenKind::False | TokenKind::Nil
            | TokenKind::ParenthesisLeft => ParseRule::new(Precedence::Primary, Associativity::Left, true, false),

            // Prefix and postfix forms
            TokenKind::PlusPlus | TokenKind::MinusMinus => ParseRule::new(Precedence::Unary, Associativity::Right, true, true),
            TokenKind::Bang => ParseRule::new(Precedence::Unary, Associativity::Right, true, false),

            TokenKind::StarStar => ParseRule::new(Precedence::Exponent, Associativity::Right, false, true),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => ParseRule::binary(Precedence::Factor),
            // `+` and `-` also have a prefix form
            TokenKind::Plus | TokenKind::Minus => ParseRule::new(Precedence::Term, Associativity::Left, true, true),
            TokenKind::LessLess | TokenKind::GreaterGreater => ParseRule::binary(Precedence::Shift),
            TokenKind::Greater | TokenKind::GreaterEqual
            | TokenKind::Less | TokenKind::LessEqual => ParseRule::binary(Precedence::Comparison),
            TokenKind::EqualEqual | TokenKind::BangEqual => ParseRule::binary(Precedence::Equality),
            TokenKind::Ampersand => ParseRule::binary(Precedence::BitAnd),
            TokenKind::Caret => ParseRule::binary(Precedence::BitXor),
            TokenKind::Pipe => ParseRule::binary(Precedence::BitOr),
            TokenKind::AmpersandAmpersand => ParseRule::binary(Precedence::And),
            TokenKind::PipePipe => ParseRule::binary(Precedence::Or),

            TokenKind::Question | TokenKind::Equal
            | TokenKind::PlusEqual | TokenKind::MinusEqual
            | TokenKind::StarEqual | TokenKind::SlashEqual => ParseRule::new(Precedence::Assignment, Associativity::Right, false, true),

            _ => ParseRule::new(Precedence::None, Associativity::Left, false, false),
        }
    }

    pub fn binding_power(&self) -> u8 {
        self.precedence.binding_power()
    }

    /// Whether this operator may take the expression parsed so far as its left operand
    /// while parsing at `threshold`.
    ///
    /// Associativity only shows up in the threshold the right operand is parsed at, see
    /// [`ParseRule::right_threshold`].
    pub fn binds_at(&self, threshold: u8) -> bool {
        self.infix && self.binding_power() >= threshold
    }

    /// Threshold for the right operand: the operator's own power if it is right-associative,
    /// one above it otherwise, so an equal operator on the right stops the operand.
    pub fn right_threshold(&self) -> u8 {
        match self.associativity {
            Associativity::Right => self.binding_power(),
            Associativity::Left => self.binding_power() + 1,
        }
    }
}

/// Precedence-climbing parser for Krypton statements.
///
/// Variable slot ids keep counting across calls to [`Parser::parse`], so trees produced by one
/// parser can share a single interpreter without their variables aliasing.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,

    next_slot: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new() -> Parser {
        Parser {
            tokens: Vec::new(),
            current: 0,
            next_slot: 0,
            errors: Vec::new(),
        }
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors of the last [`Parser::parse`] call, in source order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    // Declaration parsing

    pub fn parse(&mut self, mut tokens: Vec<Token>) -> Vec<Stmt> {
        if !tokens.last().is_some_and(|token| token.is(TokenKind::Eof)) {
            let (line, column) = tokens.last().map(|token| (token.line(), token.span().end)).unwrap_or((1, 0));
            tokens.push(Token::eof(line, column));
        }

        self.tokens = tokens;
        self.current = 0;
        self.errors.clear();

        let mut statements = Vec::new();

        while !self.is_eof() {
            let start = self.current;

            match self.parse_declaration() {
                Ok(stmt) => {
                    debug!("Parsed {}", printer::print_stmt(&stmt));
                    statements.push(stmt);
                },
                Err(err) => {
                    error!("{}", err);
                    self.errors.push(err);

                    // Always make progress, even if the offending token starts a statement
                    if self.current == start {
                        self.advance();
                    }

                    self.synchronize();
                },
            }
        }

        statements
    }

    fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        if self.matches_any(&[TokenKind::Var, TokenKind::Val]) {
            let keyword = self.previous().clone();
            return self.parse_variable_declaration(keyword);
        }

        self.parse_statement()
    }

    fn parse_variable_declaration(&mut self, keyword: Token) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expected variable name")?;

        let initializer = if self.matches(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::Variable { keyword, name, initializer })
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenKind::Print) {
            let expr = self.parse_expression()?;
            self.consume(TokenKind::Semicolon, "Expected ';' after value")?;

            return Ok(Stmt::Print(expr));
        }

        let expr = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after expression")?;

        Ok(Stmt::Expression(expr))
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Rc<Expr>> {
        self.parse_precedence(0)
    }

    fn parse_precedence(&mut self, threshold: u8) -> ParseResult<Rc<Expr>> {
        if !ParseRule::of(self.peek().kind()).prefix {
            return Err(self.error_at_current("Expected expression"));
        }

        let token = self.advance();
        let mut left = self.parse_prefix(token)?;

        loop {
            let rule = ParseRule::of(self.peek().kind());

            if !rule.binds_at(threshold) {
                break;
            }

            let operator = self.advance();
            left = self.parse_infix(left, operator, rule)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self, token: Token) -> ParseResult<Rc<Expr>> {
        match token.kind() {
            TokenKind::Number | TokenKind::String => Ok(Expr::literal(token.literal().clone())),
            TokenKind::True => Ok(Expr::literal(Literal::Boolean(true))),
            TokenKind::False => Ok(Expr::literal(Literal::Boolean(false))),
            TokenKind::Nil => Ok(Expr::literal(Literal::Nil)),
            TokenKind::Identifier => {
                let slot = self.allocate_slot();
                Ok(Expr::variable(token, slot))
            },
            TokenKind::ParenthesisLeft => {
                let expr = self.parse_expression()?;
                self.consume(TokenKind::ParenthesisRight, "Expected ')' after expression")?;

                Ok(Expr::group(expr))
            },
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang
            | TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let right = self.parse_precedence(Precedence::Unary.binding_power())?;
                Ok(Expr::prefix(token, right))
            },
            _ => Err(ParseError::UnexpectedToken { token, message: String::from("Expected expression") }),
        }
    }

    fn parse_infix(&mut self, left: Rc<Expr>, operator: Token, rule: ParseRule) -> ParseResult<Rc<Expr>> {
        match operator.kind() {
            TokenKind::Question => {
                let then = self.parse_expression()?;
                self.consume(TokenKind::Colon, "Expected ':' after then branch of ternary expression")?;
                let otherwise = self.parse_precedence(rule.right_threshold())?;

                Ok(Expr::ternary(left, then, otherwise))
            },
            TokenKind::PlusPlus | TokenKind::MinusMinus => Ok(Expr::postfix(left, operator)),
            _ => {
                let right = self.parse_precedence(rule.right_threshold())?;
                Ok(Expr::infix(left, operator, right))
            },
        }
    }

    fn allocate_slot(&mut self) -> SlotId {
        let slot = SlotId::new(self.next_slot);
        self.next_slot += 1;
        slot
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(self.error_at_current(message))
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();

        if !self.is_eof() {
            self.current += 1;
        }

        token
    }

    fn matches(&mut self, kind: TokenKind) -> bool { // Should be called "match", but that's a keyword
        if !self.check(kind) {
            return false;
        }

        self.advance();
        true
    }

    fn matches_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.matches(*kind))
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    // Error handling

    fn synchronize(&mut self) {
        while !self.is_eof() {
            if self.previous().is(TokenKind::Semicolon) {
                return;
            }

            if self.peek().kind().starts_statement() {
                return;
            }

            self.advance();
        }
    }

    fn error_at_current(&self, message: &str) -> ParseError {
        let token = self.peek().clone();

        match token.kind() {
            TokenKind::Error => ParseError::Lexical { token },
            TokenKind::Eof => ParseError::UnexpectedEof { token, message: message.to_owned() },
            _ => ParseError::UnexpectedToken { token, message: message.to_owned() },
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}
