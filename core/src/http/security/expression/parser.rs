//! Expression parser.
//!
//! Recursive descent over a small token stream:
//!
//! ```text
//! or      := and (("or" | "||") and)*
//! and     := unary (("and" | "&&") unary)*
//! unary   := ("not" | "!") unary | primary
//! primary := "true" | "false" | "(" or ")" | ident "(" args? ")"
//! args    := arg ("," arg)*
//! arg     := quoted string | ident
//! ```

use std::iter::{Enumerate, Peekable};
use std::str::Chars;

use derive_more::{Display, Error};

use super::ast::Expression;
use super::evaluator::{EvaluationError, ExpressionEvaluator};
use super::root::EvaluationContext;

/// Error raised when an expression string cannot be parsed. Positions
/// count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseError {
    #[display("empty expression")]
    Empty,
    #[display("unexpected end of expression")]
    UnexpectedEnd,
    #[display("unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },
    #[display("unexpected token '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[display("unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },
    #[display("expected '(' after '{name}' at position {position}")]
    MissingArguments { name: String, position: usize },
}

/// Turns expression source text into a [`SecurityExpression`].
///
/// # Spring Security Equivalent
/// `org.springframework.expression.ExpressionParser`
pub trait ExpressionParser: Send + Sync {
    fn parse_expression(&self, source: &str) -> Result<SecurityExpression, ParseError>;
}

/// The built-in grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpressionParser;

impl ExpressionParser for DefaultExpressionParser {
    fn parse_expression(&self, source: &str) -> Result<SecurityExpression, ParseError> {
        SecurityExpression::parse(source)
    }
}

/// A parsed expression together with its source text.
///
/// ```
/// use actix_messaging_security_core::http::security::expression::SecurityExpression;
///
/// let expr = SecurityExpression::parse("hasRole('ADMIN') or hasAuthority('write')").unwrap();
/// assert_eq!(expr.source(), "hasRole('ADMIN') or hasAuthority('write')");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityExpression {
    source: String,
    ast: Expression,
}

impl SecurityExpression {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let ast = Parser { tokens, pos: 0 }.parse()?;
        Ok(SecurityExpression {
            source: source.to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expression {
        &self.ast
    }

    /// Evaluates the expression with `evaluator`.
    pub fn evaluate(
        &self,
        evaluator: &ExpressionEvaluator,
        ctx: &EvaluationContext<'_>,
    ) -> Result<bool, EvaluationError> {
        evaluator.evaluate(&self.ast, ctx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str(String),
    LParen,
    RParen,
    Comma,
    And,
    Or,
    Not,
    Bool(bool),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

impl Token {
    fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) => s.clone(),
            TokenKind::Str(s) => format!("'{}'", s),
            TokenKind::LParen => "(".into(),
            TokenKind::RParen => ")".into(),
            TokenKind::Comma => ",".into(),
            TokenKind::And => "and".into(),
            TokenKind::Or => "or".into(),
            TokenKind::Not => "not".into(),
            TokenKind::Bool(b) => b.to_string(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().enumerate().peekable();

    while let Some(&(position, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => single(&mut chars, TokenKind::LParen),
            ')' => single(&mut chars, TokenKind::RParen),
            ',' => single(&mut chars, TokenKind::Comma),
            '!' => single(&mut chars, TokenKind::Not),
            '&' | '|' => {
                chars.next();
                match chars.next() {
                    Some((_, next)) if next == c => {
                        if c == '&' {
                            TokenKind::And
                        } else {
                            TokenKind::Or
                        }
                    }
                    _ => return Err(ParseError::UnexpectedChar { found: c, position }),
                }
            }
            '\'' | '"' => read_string(&mut chars)?,
            c if c.is_alphabetic() || c == '_' => read_word(&mut chars),
            _ => return Err(ParseError::UnexpectedChar { found: c, position }),
        };
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

fn single(chars: &mut Peekable<Enumerate<Chars<'_>>>, kind: TokenKind) -> TokenKind {
    chars.next();
    kind
}

fn read_string(chars: &mut Peekable<Enumerate<Chars<'_>>>) -> Result<TokenKind, ParseError> {
    let Some((start, quote)) = chars.next() else {
        return Err(ParseError::UnexpectedEnd);
    };
    let mut value = String::new();

    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(TokenKind::Str(value)),
            Some((_, '\\')) => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => return Err(ParseError::UnterminatedString { position: start }),
            },
            Some((_, c)) => value.push(c),
            None => return Err(ParseError::UnterminatedString { position: start }),
        }
    }
}

fn read_word(chars: &mut Peekable<Enumerate<Chars<'_>>>) -> TokenKind {
    let mut word = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !(c.is_alphanumeric() || c == '_') {
            break;
        }
        word.push(c);
        chars.next();
    }

    match word.to_ascii_lowercase().as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        _ => TokenKind::Ident(word),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn parse(mut self) -> Result<Expression, ParseError> {
        let expr = self.parse_or()?;
        match self.tokens.get(self.pos) {
            None => Ok(expr),
            Some(token) => Err(unexpected(token)),
        }
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(unexpected(&token)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_and()?;
        while self.peek_kind() == Some(&TokenKind::Or) {
            self.pos += 1;
            left = Expression::or(left, self.parse_and()?);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        while self.peek_kind() == Some(&TokenKind::And) {
            self.pos += 1;
            left = Expression::and(left, self.parse_unary()?);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.peek_kind() == Some(&TokenKind::Not) {
            self.pos += 1;
            return Ok(Expression::not(self.parse_unary()?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.next().ok_or(ParseError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Bool(value) => Ok(Expression::Literal(value)),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if self.peek_kind() != Some(&TokenKind::LParen) {
                    return Err(ParseError::MissingArguments {
                        name,
                        position: token.position,
                    });
                }
                self.pos += 1;
                let args = self.parse_args()?;
                Ok(Expression::Call { name, args })
            }
            _ => Err(unexpected(&token)),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<String>, ParseError> {
        let mut args = Vec::new();
        if self.peek_kind() == Some(&TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }

        loop {
            let token = self.next().ok_or(ParseError::UnexpectedEnd)?;
            match token.kind {
                TokenKind::Str(value) | TokenKind::Ident(value) => args.push(value),
                _ => return Err(unexpected(&token)),
            }

            let separator = self.next().ok_or(ParseError::UnexpectedEnd)?;
            match separator.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => return Ok(args),
                _ => return Err(unexpected(&separator)),
            }
        }
    }
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.describe(),
        position: token.position,
    }
}
