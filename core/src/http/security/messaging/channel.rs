//! Inbound message channel with an ordered interceptor chain.
//!
//! # Spring Equivalent
//! `ChannelInterceptor`, `ChannelRegistration`, `ExecutorSubscribableChannel`

use std::fmt;
use std::sync::Arc;

use crate::http::security::context::SecurityContext;

use super::error::MessageSecurityError;
use super::message::Message;

/// Hook around every message sent on the inbound channel.
pub trait ChannelInterceptor: Send + Sync {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Inspects or rewrites `message` before it is handled. An error stops
    /// the dispatch.
    fn pre_send(&self, _message: &mut Message) -> Result<(), MessageSecurityError> {
        Ok(())
    }

    /// Called in reverse order once the dispatch is over, for every
    /// interceptor whose `pre_send` succeeded.
    fn after_send_completion(&self, _message: &Message, _sent: bool) {}
}

/// Interceptors to install on the client inbound channel.
///
/// Registration appends; earlier registrations keep their position.
#[derive(Clone, Default)]
pub struct ChannelRegistration {
    interceptors: Vec<Arc<dyn ChannelInterceptor>>,
}

impl ChannelRegistration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interceptors<I>(&mut self, interceptors: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn ChannelInterceptor>>,
    {
        self.interceptors.extend(interceptors);
        self
    }

    pub fn interceptor<T: ChannelInterceptor + 'static>(&mut self, interceptor: T) -> &mut Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn get_interceptors(&self) -> &[Arc<dyn ChannelInterceptor>] {
        &self.interceptors
    }

    pub fn has_interceptors(&self) -> bool {
        !self.interceptors.is_empty()
    }

    pub fn into_channel(self) -> InboundChannel {
        InboundChannel {
            interceptors: Arc::new(self.interceptors),
        }
    }
}

impl fmt::Debug for ChannelRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.interceptors.iter().map(|i| i.name()).collect();
        f.debug_struct("ChannelRegistration")
            .field("interceptors", &names)
            .finish()
    }
}

/// The client inbound channel. Cheap to clone and share between sessions.
#[derive(Clone, Default)]
pub struct InboundChannel {
    interceptors: Arc<Vec<Arc<dyn ChannelInterceptor>>>,
}

impl InboundChannel {
    pub fn interceptors(&self) -> &[Arc<dyn ChannelInterceptor>] {
        &self.interceptors
    }

    /// Dispatches `message` to `handler` through the interceptor chain.
    ///
    /// Runs inside a fresh security context scope, so interceptors that set
    /// the ambient user never leak it into the caller.
    pub fn send<F, R>(&self, message: Message, handler: F) -> Result<R, MessageSecurityError>
    where
        F: FnOnce(&Message) -> R,
    {
        SecurityContext::sync_scope(None, move || {
            let mut message = message;

            for (applied, interceptor) in self.interceptors.iter().enumerate() {
                if let Err(e) = interceptor.pre_send(&mut message) {
                    log::debug!(
                        "{} rejected {} message: {}",
                        interceptor.name(),
                        message.message_type(),
                        e
                    );
                    self.after_send_completion(&message, false, applied);
                    return Err(e);
                }
            }

            let result = handler(&message);
            self.after_send_completion(&message, true, self.interceptors.len());
            Ok(result)
        })
    }

    fn after_send_completion(&self, message: &Message, sent: bool, applied: usize) {
        for interceptor in self.interceptors[..applied].iter().rev() {
            interceptor.after_send_completion(message, sent);
        }
    }
}

impl fmt::Debug for InboundChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.interceptors.iter().map(|i| i.name()).collect();
        f.debug_struct("InboundChannel")
            .field("interceptors", &names)
            .finish()
    }
}
