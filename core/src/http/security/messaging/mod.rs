//! Message-level security for the client inbound channel.
//!
//! # Overview
//!
//! ```text
//! frame --> InboundChannel::send
//!             |-- SecurityContextChannelInterceptor  (message user -> ambient user)
//!             |-- CsrfChannelInterceptor             (CONNECT only)
//!             |-- ChannelSecurityInterceptor         (expression decision)
//!             |-- application interceptors
//!             `-> handler
//! ```
//!
//! # Spring Security Comparison
//!
//! | Spring Security | Actix Messaging Security |
//! |-----------------|--------------------------|
//! | `MessageSecurityMetadataSourceRegistry` | [`MessageSecurityMetadataSourceRegistry`] |
//! | `ChannelRegistration` | [`ChannelRegistration`] |
//! | `ExecutorSubscribableChannel` | [`InboundChannel`] |
//! | `SimpMessageType` | [`SimpMessageType`] |
//! | `@AuthenticationPrincipal` | [`MessagePrincipal`] |

mod attributes;
mod channel;
mod error;
mod interceptor;
mod matcher;
mod message;
mod principal;
mod registry;

pub use attributes::SessionAttributes;
pub use channel::{ChannelInterceptor, ChannelRegistration, InboundChannel};
pub use error::MessageSecurityError;
pub use interceptor::{
    ChannelSecurityInterceptor, CsrfChannelInterceptor, SecurityContextChannelInterceptor,
};
pub use matcher::{ExpressionBasedMessageSecurityMetadataSource, MessageMatcher};
pub use message::{Message, MessageBuilder, SimpMessageType, UnknownMessageType};
pub use principal::MessagePrincipal;
pub use registry::{Constraint, MessageSecurityMetadataSourceRegistry};
