//! Ambient security context for the current task.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.core.context.SecurityContextHolder`
//!
//! # Overview
//! The context is task-local. A scope is opened with [`SecurityContext::run_with`]
//! (async) or [`SecurityContext::sync_scope`] (blocking code such as the
//! inbound message channel). Inside a scope, interceptors may push a user
//! for the duration of a dispatch and restore the previous one afterwards.
//!
//! ```ignore
//! use actix_messaging_security_core::http::security::SecurityContext;
//!
//! SecurityContext::sync_scope(Some(user), || {
//!     assert!(SecurityContext::is_authenticated());
//! });
//! ```

use std::cell::RefCell;
use std::future::Future;

use crate::http::security::User;

tokio::task_local! {
    static SECURITY_CONTEXT: RefCell<ContextState>;
}

#[derive(Default)]
struct ContextState {
    current: Option<User>,
    saved: Vec<Option<User>>,
}

impl ContextState {
    fn new(user: Option<User>) -> Self {
        ContextState {
            current: user,
            saved: Vec::new(),
        }
    }
}

/// Holder for the current security context.
///
/// # Spring Security Equivalent
/// `SecurityContextHolder`
pub struct SecurityContext;

impl SecurityContext {
    /// Returns the current user, or `None` when anonymous or outside a scope.
    pub fn get_user() -> Option<User> {
        SECURITY_CONTEXT
            .try_with(|ctx| ctx.borrow().current.clone())
            .ok()
            .flatten()
    }

    pub fn get_username() -> Option<String> {
        Self::get_user().map(|u| u.get_username().to_string())
    }

    pub fn is_authenticated() -> bool {
        Self::get_user().is_some()
    }

    pub fn has_role(role: &str) -> bool {
        Self::get_user().is_some_and(|u| u.has_role(role))
    }

    pub fn has_authority(authority: &str) -> bool {
        Self::get_user().is_some_and(|u| u.has_authority(authority))
    }

    /// Returns `true` when called inside a context scope.
    pub fn in_scope() -> bool {
        SECURITY_CONTEXT.try_with(|_| ()).is_ok()
    }

    /// Runs a future with `user` as the ambient identity.
    pub async fn run_with<F, R>(user: Option<User>, f: F) -> R
    where
        F: Future<Output = R>,
    {
        SECURITY_CONTEXT.scope(RefCell::new(ContextState::new(user)), f).await
    }

    /// Runs a closure with `user` as the ambient identity.
    pub fn sync_scope<F, R>(user: Option<User>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        SECURITY_CONTEXT.sync_scope(RefCell::new(ContextState::new(user)), f)
    }

    /// Replaces the current user. No effect outside a scope.
    pub fn set_user(user: Option<User>) {
        let _ = SECURITY_CONTEXT.try_with(|ctx| {
            ctx.borrow_mut().current = user;
        });
    }

    /// Saves the current user and installs `user`.
    ///
    /// Returns `false` outside a scope, in which case nothing was saved.
    pub fn push(user: Option<User>) -> bool {
        SECURITY_CONTEXT
            .try_with(|ctx| {
                let mut state = ctx.borrow_mut();
                let previous = state.current.take();
                state.saved.push(previous);
                state.current = user;
            })
            .is_ok()
    }

    /// Restores the user saved by the matching [`SecurityContext::push`].
    pub fn pop() {
        let _ = SECURITY_CONTEXT.try_with(|ctx| {
            let mut state = ctx.borrow_mut();
            state.current = state.saved.pop().flatten();
        });
    }

    /// Clears the current user.
    pub fn clear() {
        Self::set_user(None);
    }
}
