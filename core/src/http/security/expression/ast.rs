//! Abstract syntax tree for access-control expressions.

use std::fmt;

/// A parsed access-control expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `true` / `false`
    Literal(bool),
    /// `hasRole('ADMIN')` -> `Call { name: "hasRole", args: ["ADMIN"] }`
    Call { name: String, args: Vec<String> },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

impl Expression {
    pub fn call(name: impl Into<String>, args: Vec<String>) -> Self {
        Expression::Call {
            name: name.into(),
            args,
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expression) -> Self {
        Expression::Not(Box::new(expr))
    }

    /// Names of every function the expression calls, in source order.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Call { name, .. } => names.push(name),
            Expression::And(left, right) | Expression::Or(left, right) => {
                left.collect_names(names);
                right.collect_names(names);
            }
            Expression::Not(inner) => inner.collect_names(names),
        }
    }
}

/// Renders a fully parenthesised canonical form.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Call { name, args } => {
                let args: Vec<String> = args.iter().map(|a| format!("'{}'", a)).collect();
                write!(f, "{}({})", name, args.join(", "))
            }
            Expression::And(left, right) => write!(f, "({} and {})", left, right),
            Expression::Or(left, right) => write!(f, "({} or {})", left, right),
            Expression::Not(inner) => write!(f, "not {}", inner),
        }
    }
}
