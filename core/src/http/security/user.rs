//! Principal model carried by HTTP requests and inbound messages.
//!
//! # Spring Equivalent
//! `Authentication` / `UserDetails`

use std::fmt;

use serde::{Deserialize, Serialize};

const ROLE_PREFIX: &str = "ROLE_";

/// An authenticated principal with roles and authorities.
///
/// Roles may be given with or without the `ROLE_` prefix; `has_role("ADMIN")`
/// and `has_role("ROLE_ADMIN")` are equivalent.
///
/// # Example
/// ```
/// use actix_messaging_security_core::http::security::User;
///
/// let user = User::new("admin")
///     .roles(&["ADMIN", "USER"])
///     .authorities(&["messages:write"]);
///
/// assert!(user.has_role("ROLE_ADMIN"));
/// assert!(user.has_authority("messages:write"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    roles: Vec<String>,
    authorities: Vec<String>,
}

impl User {
    /// Creates a user without roles or authorities.
    pub fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
            roles: Vec::new(),
            authorities: Vec::new(),
        }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn get_authorities(&self) -> &[String] {
        &self.authorities
    }

    /// Adds roles (builder pattern). The `ROLE_` prefix is stripped.
    pub fn roles(mut self, roles: &[&str]) -> Self {
        for role in roles {
            let role = strip_role_prefix(role).to_string();
            if !self.roles.contains(&role) {
                self.roles.push(role);
            }
        }
        self
    }

    /// Adds authorities (builder pattern).
    pub fn authorities(mut self, authorities: &[&str]) -> Self {
        for authority in authorities {
            if !self.authorities.iter().any(|a| a == authority) {
                self.authorities.push(authority.to_string());
            }
        }
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        let role = strip_role_prefix(role);
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Checks an authority. `ROLE_`-prefixed authorities also match roles.
    pub fn has_authority(&self, authority: &str) -> bool {
        if self.authorities.iter().any(|a| a == authority) {
            return true;
        }
        authority.starts_with(ROLE_PREFIX) && self.has_role(authority)
    }

    pub fn has_any_authority<S: AsRef<str>>(&self, authorities: &[S]) -> bool {
        authorities
            .iter()
            .any(|authority| self.has_authority(authority.as_ref()))
    }
}

fn strip_role_prefix(role: &str) -> &str {
    role.strip_prefix(ROLE_PREFIX).unwrap_or(role)
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{ username: {}, roles: {:?}, authorities: {:?} }}",
            self.username, self.roles, self.authorities
        )
    }
}
