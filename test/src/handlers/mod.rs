//! HTTP handlers of the chat demo.

pub mod admin;
pub mod csrf;
pub mod stomp;
