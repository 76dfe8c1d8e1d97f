//! Voting-based access decisions.
//!
//! # Spring Security Equivalent
//! `AccessDecisionVoter`, `AffirmativeBased`, `ConsensusBased`,
//! `UnanimousBased`, `MessageExpressionVoter`, `WebExpressionVoter`

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use derive_more::{Display, Error};

use crate::http::security::expression::{EvaluationContext, ExpressionEvaluator};
use crate::http::security::User;

use super::attribute::ConfigAttribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Granted,
    Abstain,
    Denied,
}

/// Raised when a decision manager refuses access.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Access is denied")]
pub struct AccessDeniedError;

pub trait AccessDecisionVoter<T: ?Sized>: Send + Sync {
    /// Casts a vote for `user` accessing `object` guarded by `attributes`.
    fn vote(&self, user: Option<&User>, object: &T, attributes: &[ConfigAttribute]) -> Vote;
}

/// A secured object that can describe itself to the expression language.
pub trait ExpressionTarget {
    fn evaluation_context<'a>(&'a self, user: Option<&'a User>) -> EvaluationContext<'a>;
}

/// Votes with the first expression attribute found.
///
/// Abstains when no expression attribute is present. An expression that
/// fails to evaluate counts as a denial.
pub struct ExpressionVoter<T: ?Sized> {
    evaluator: ExpressionEvaluator,
    _target: PhantomData<fn(&T)>,
}

impl<T: ?Sized> ExpressionVoter<T> {
    pub fn new() -> Self {
        Self::with_evaluator(ExpressionEvaluator::new())
    }

    pub fn with_evaluator(evaluator: ExpressionEvaluator) -> Self {
        ExpressionVoter {
            evaluator,
            _target: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for ExpressionVoter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ExpressionVoter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionVoter")
            .field("evaluator", &self.evaluator)
            .finish()
    }
}

impl<T: ExpressionTarget + ?Sized> AccessDecisionVoter<T> for ExpressionVoter<T> {
    fn vote(&self, user: Option<&User>, object: &T, attributes: &[ConfigAttribute]) -> Vote {
        let Some(attribute) = attributes.iter().find_map(ConfigAttribute::as_expression) else {
            return Vote::Abstain;
        };

        let ctx = object.evaluation_context(user);
        match attribute.expression().evaluate(&self.evaluator, &ctx) {
            Ok(true) => Vote::Granted,
            Ok(false) => Vote::Denied,
            Err(e) => {
                log::warn!(
                    "Failed to evaluate expression '{}': {}",
                    attribute.source(),
                    e
                );
                Vote::Denied
            }
        }
    }
}

/// How the votes are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionRule {
    /// Any grant allows; otherwise any denial denies.
    #[default]
    Affirmative,
    /// The majority wins; a tie allows.
    Consensus,
    /// Any denial denies; otherwise any grant allows.
    Unanimous,
}

/// Polls its voters and applies a [`DecisionRule`].
///
/// When every voter abstains the outcome is `allow_if_all_abstain`,
/// which defaults to `false`.
pub struct AccessDecisionManager<T: ?Sized> {
    voters: Vec<Arc<dyn AccessDecisionVoter<T>>>,
    rule: DecisionRule,
    allow_if_all_abstain: bool,
}

impl<T: ?Sized> AccessDecisionManager<T> {
    pub fn new(rule: DecisionRule) -> Self {
        AccessDecisionManager {
            voters: Vec::new(),
            rule,
            allow_if_all_abstain: false,
        }
    }

    /// Affirmative decisions with a single voter.
    pub fn affirmative<V: AccessDecisionVoter<T> + 'static>(voter: V) -> Self {
        Self::new(DecisionRule::Affirmative).voter(voter)
    }

    pub fn voter<V: AccessDecisionVoter<T> + 'static>(mut self, voter: V) -> Self {
        self.voters.push(Arc::new(voter));
        self
    }

    pub fn allow_if_all_abstain(mut self, allow: bool) -> Self {
        self.allow_if_all_abstain = allow;
        self
    }

    pub fn rule(&self) -> DecisionRule {
        self.rule
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn decide(
        &self,
        user: Option<&User>,
        object: &T,
        attributes: &[ConfigAttribute],
    ) -> Result<(), AccessDeniedError> {
        let mut granted = 0usize;
        let mut denied = 0usize;

        for voter in &self.voters {
            match voter.vote(user, object, attributes) {
                Vote::Granted => {
                    if self.rule == DecisionRule::Affirmative {
                        return Ok(());
                    }
                    granted += 1;
                }
                Vote::Denied => {
                    if self.rule == DecisionRule::Unanimous {
                        return Err(AccessDeniedError);
                    }
                    denied += 1;
                }
                Vote::Abstain => {}
            }
        }

        let allowed = match self.rule {
            DecisionRule::Affirmative if denied > 0 => false,
            DecisionRule::Consensus if granted + denied > 0 => granted >= denied,
            DecisionRule::Unanimous if granted > 0 => true,
            _ => self.allow_if_all_abstain,
        };

        if allowed {
            Ok(())
        } else {
            Err(AccessDeniedError)
        }
    }
}

impl<T: ?Sized> fmt::Debug for AccessDecisionManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessDecisionManager")
            .field("voters", &self.voters.len())
            .field("rule", &self.rule)
            .field("allow_if_all_abstain", &self.allow_if_all_abstain)
            .finish()
    }
}
