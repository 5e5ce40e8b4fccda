use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use lazy_static::lazy_static;
use crate::util;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("if", TokenKind::If), ("or", TokenKind::Or),
        ("var", TokenKind::Var), ("val", TokenKind::Val),
        ("and", TokenKind::And), ("for", TokenKind::For),
        ("nil", TokenKind::Nil), ("try", TokenKind::Try),
        ("case", TokenKind::Case), ("else", TokenKind::Else),
        ("true", TokenKind::True), ("this", TokenKind::This),
        ("init", TokenKind::Init), ("while", TokenKind::While),
        ("break", TokenKind::Break), ("catch", TokenKind::Catch),
        ("class", TokenKind::Class), ("const", TokenKind::Const),
        ("false", TokenKind::False), ("print", TokenKind::Print),
        ("throw", TokenKind::Throw), ("super", TokenKind::Super),
        ("switch", TokenKind::Switch), ("return", TokenKind::Return),
        ("finally", TokenKind::Finally), ("continue", TokenKind::Continue),
        ("func", TokenKind::Function),
    ]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl TokenSpan {
    pub fn new(line: u32, start: u32, end: u32) -> TokenSpan {
        TokenSpan { line, start, end }
    }
}

impl Display for TokenSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}, column {}]", self.line, self.start)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // Literals
    Number, Identifier, String,

    // Single-character tokens
    ParenthesisLeft, ParenthesisRight,
    BraceLeft, BraceRight,
    BracketLeft, BracketRight,
    Comma, Dot, Semicolon, Question, Colon,
    Percent, Dollar, Caret, Tilde,

    // One or two character tokens
    Bang, BangEqual,
    Equal, EqualEqual,
    Greater, GreaterEqual, GreaterGreater,
    Less, LessEqual, LessLess,
    Ampersand, AmpersandAmpersand,
    Pipe, PipePipe,
    Plus, PlusPlus, PlusEqual,
    Minus, MinusMinus, MinusEqual,
    Star, StarStar, StarEqual,
    Slash, SlashEqual,

    // Keywords
    If, Or, Var, Val, And, For, Nil, Try,
    Case, Else, True, This, Init, While,
    Break, Catch, Class, Const, False, Print,
    Throw, Super, Switch, Return, Finally, Continue,
    Function,

    Eof,
    Error,
}

impl TokenKind {
    pub fn keyword(name: &str) -> Option<TokenKind> {
        KEYWORDS.get(name).copied()
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, TokenKind::Equal | TokenKind::PlusEqual | TokenKind::MinusEqual
            | TokenKind::StarEqual | TokenKind::SlashEqual)
    }

    /// The arithmetic operator a compound assignment applies, e.g. `+` for `+=`.
    pub fn compound_operator(&self) -> Option<TokenKind> {
        match self {
            TokenKind::PlusEqual => Some(TokenKind::Plus),
            TokenKind::MinusEqual => Some(TokenKind::Minus),
            TokenKind::StarEqual => Some(TokenKind::Star),
            TokenKind::SlashEqual => Some(TokenKind::Slash),
            _ => None,
        }
    }

    /// Kinds a statement can start with; the parser resynchronizes in front of them.
    pub fn starts_statement(&self) -> bool {
        matches!(self, TokenKind::Class | TokenKind::Function | TokenKind::Var | TokenKind::Val
            | TokenKind::For | TokenKind::If | TokenKind::While | TokenKind::Print | TokenKind::Return)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",

            TokenKind::ParenthesisLeft => "LEFT_PAREN",
            TokenKind::ParenthesisRight => "RIGHT_PAREN",
            TokenKind::BraceLeft => "LEFT_BRACE",
            TokenKind::BraceRight => "RIGHT_BRACE",
            TokenKind::BracketLeft => "LEFT_BRACKET",
            TokenKind::BracketRight => "RIGHT_BRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Question => "QUESTION",
            TokenKind::Colon => "COLON",
            TokenKind::Percent => "PERCENT",
            TokenKind::Dollar => "DOLLAR",
            TokenKind::Caret => "CARET",
            TokenKind::Tilde => "TILDE",

            TokenKind::Bang => "BANG",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::GreaterGreater => "GREATER_GREATER",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::LessLess => "LESS_LESS",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::AmpersandAmpersand => "AMPERSAND_AMPERSAND",
            TokenKind::Pipe => "PIPE",
            TokenKind::PipePipe => "PIPE_PIPE",
            TokenKind::Plus => "PLUS",
            TokenKind::PlusPlus => "PLUS_PLUS",
            TokenKind::PlusEqual => "PLUS_EQUAL",
            TokenKind::Minus => "MINUS",
            TokenKind::MinusMinus => "MINUS_MINUS",
            TokenKind::MinusEqual => "MINUS_EQUAL",
            TokenKind::Star => "STAR",
            TokenKind::StarStar => "STAR_STAR",
            TokenKind::StarEqual => "STAR_EQUAL",
            TokenKind::Slash => "SLASH",
            TokenKind::SlashEqual => "SLASH_EQUAL",

            TokenKind::If => "IF",
            TokenKind::Or => "OR",
            TokenKind::Var => "VAR",
            TokenKind::Val => "VAL",
            TokenKind::And => "AND",
            TokenKind::For => "FOR",
            TokenKind::Nil => "NIL",
            TokenKind::Try => "TRY",
            TokenKind::Case => "CASE",
            TokenKind::Else => "ELSE",
            TokenKind::True => "TRUE",
            TokenKind::This => "THIS",
            TokenKind::Init => "INIT",
            TokenKind::While => "WHILE",
            TokenKind::Break => "BREAK",
            TokenKind::Catch => "CATCH",
            TokenKind::Class => "CLASS",
            TokenKind::Const => "CONST",
            TokenKind::False => "FALSE",
            TokenKind::Print => "PRINT",
            TokenKind::Throw => "THROW",
            TokenKind::Super => "SUPER",
            TokenKind::Switch => "SWITCH",
            TokenKind::Return => "RETURN",
            TokenKind::Finally => "FINALLY",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Function => "FUNCTION",

            TokenKind::Eof => "EOF",
            TokenKind::Error => "ERROR",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value, also used as the payload of literal tokens.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    #[default]
    Nil,
}

impl Literal {
    pub fn is_number(&self) -> bool { matches!(self, Literal::Number(_)) }
    pub fn is_string(&self) -> bool { matches!(self, Literal::String(_)) }
    pub fn is_bool(&self) -> bool { matches!(self, Literal::Boolean(_)) }
    pub fn is_nil(&self) -> bool { matches!(self, Literal::Nil) }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Nil => false,
            Literal::Boolean(value) => *value,
            Literal::Number(value) => *value != 0.0,
            Literal::String(value) => !value.is_empty(),
        }
    }

    /// Canonical form with quoted strings, as shown in token dumps and syntax trees.
    pub fn stringify(&self) -> String {
        match self {
            Literal::String(value) => format!("\"{}\"", value),
            _ => self.to_string(),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(value) => f.write_str(&util::format_number(*value)),
            Literal::String(value) => f.write_str(value),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Nil => f.write_str("nil"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    literal: Literal,
    span: TokenSpan,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, literal: Literal, span: TokenSpan) -> Token {
        Token {
            kind, lexeme,
            literal, span,
        }
    }

    pub fn eof(line: u32, column: u32) -> Token {
        Token::new(TokenKind::Eof, String::new(), Literal::Nil, TokenSpan::new(line, column, column))
    }

    pub fn kind(&self) -> TokenKind { self.kind }
    pub fn lexeme(&self) -> &str { &self.lexeme }
    pub fn literal(&self) -> &Literal { &self.literal }
    pub fn span(&self) -> &TokenSpan { &self.span }
    pub fn line(&self) -> u32 { self.span.line }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({}, `{}`, {}, [line {}({}:{})])", self.kind, self.lexeme,
               self.literal.stringify(), self.span.line, self.span.start, self.span.end)
    }
}
