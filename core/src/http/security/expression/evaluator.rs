//! Expression evaluator.

use std::sync::Arc;

use derive_more::{Display, Error};

use super::ast::Expression;
use super::root::{DefaultExpressionRoot, EvaluationContext, ExpressionRoot};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EvaluationError {
    /// The root does not know the function, or rejected its arguments.
    #[display("unknown function or invalid arguments: '{name}'")]
    UnknownFunction { name: String },
}

/// Evaluates expression trees against an [`EvaluationContext`].
///
/// # Spring Security Equivalent
/// `SecurityExpressionHandler`
#[derive(Clone)]
pub struct ExpressionEvaluator {
    root: Arc<dyn ExpressionRoot>,
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        ExpressionEvaluator {
            root: Arc::new(DefaultExpressionRoot::new()),
        }
    }

    /// Uses a custom root, typically one that falls back to [`DefaultExpressionRoot`].
    pub fn with_root<R: ExpressionRoot + 'static>(root: R) -> Self {
        ExpressionEvaluator {
            root: Arc::new(root),
        }
    }

    /// Evaluates `expr`. `and` / `or` short-circuit, so an unknown function
    /// on a branch that is never reached is not reported.
    pub fn evaluate(
        &self,
        expr: &Expression,
        ctx: &EvaluationContext<'_>,
    ) -> Result<bool, EvaluationError> {
        match expr {
            Expression::Literal(value) => Ok(*value),
            Expression::Call { name, args } => self
                .root
                .evaluate_function(name, args, ctx)
                .ok_or_else(|| EvaluationError::UnknownFunction { name: name.clone() }),
            Expression::And(left, right) => {
                Ok(self.evaluate(left, ctx)? && self.evaluate(right, ctx)?)
            }
            Expression::Or(left, right) => {
                Ok(self.evaluate(left, ctx)? || self.evaluate(right, ctx)?)
            }
            Expression::Not(inner) => Ok(!self.evaluate(inner, ctx)?),
        }
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExpressionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionEvaluator").finish_non_exhaustive()
    }
}
