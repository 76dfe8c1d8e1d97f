//! Security for STOMP-style message brokers served by Actix Web.

pub mod http;
