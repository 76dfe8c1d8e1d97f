//! Message-broker security configuration.
//!
//! # Spring Equivalent
//! `AbstractSecurityWebSocketMessageBrokerConfigurer`
//!
//! Applications implement [`MessageBrokerSecurityConfigurer`] and hand it
//! to [`WebSocketMessageBrokerSecurity`], which installs the inbound
//! channel interceptors in a fixed order:
//!
//! ```text
//! SecurityContextChannelInterceptor   always
//! CsrfChannelInterceptor              unless same-origin enforcement is off
//! ChannelSecurityInterceptor          when configure_inbound added a mapping
//! <customize_client_inbound_channel>  application interceptors
//! ```
//!
//! Once every endpoint is registered, [`WebSocketMessageBrokerSecurity::after_singletons_instantiated`]
//! puts a [`CsrfTokenHandshakeInterceptor`] in front of every endpoint's
//! handshake chain so that the CONNECT frame can be checked against the
//! HTTP session's token.
//!
//! # Example
//! ```
//! use actix_messaging_security_core::http::security::beans::ApplicationContext;
//! use actix_messaging_security_core::http::security::messaging::MessageSecurityMetadataSourceRegistry;
//! use actix_messaging_security_core::http::security::websocket::{
//!     MessageBrokerSecurityConfigurer, StompEndpointRegistry, WebSocketMessageBrokerSecurity,
//! };
//!
//! struct ChatSecurity;
//!
//! impl MessageBrokerSecurityConfigurer for ChatSecurity {
//!     fn configure_inbound(&self, messages: &mut MessageSecurityMetadataSourceRegistry) {
//!         messages
//!             .simp_dest_matchers(&["/app/admin/**"]).has_role("ADMIN")
//!             .any_message().authenticated();
//!     }
//!
//!     fn register_stomp_endpoints(&self, registry: &mut StompEndpointRegistry) {
//!         registry.add_endpoint(&["/ws"]);
//!     }
//! }
//!
//! let security = WebSocketMessageBrokerSecurity::new(ChatSecurity);
//! let channel = security.client_inbound_channel().unwrap();
//! assert_eq!(channel.interceptors().len(), 3);
//!
//! let mut context = ApplicationContext::new();
//! security.register_stomp_endpoints(&mut context);
//! security.after_singletons_instantiated(&mut context).unwrap();
//! ```

use std::sync::Arc;

use crate::http::security::access::{AccessDecisionManager, ExpressionVoter};
use crate::http::security::beans::ApplicationContext;
use crate::http::security::error::ConfigurationError;
use crate::http::security::expression::ExpressionEvaluator;
use crate::http::security::messaging::{
    ChannelRegistration, ChannelSecurityInterceptor, CsrfChannelInterceptor,
    ExpressionBasedMessageSecurityMetadataSource, InboundChannel,
    MessageSecurityMetadataSourceRegistry, SecurityContextChannelInterceptor,
};

use super::handler::{
    HttpRequestHandler, SockJsHttpRequestHandler, TransportHandlingSockJsService,
    WebSocketHttpRequestHandler,
};
use super::handshake::{CsrfTokenHandshakeInterceptor, HandshakeInterceptor};
use super::mapping::{SimpleUrlHandlerMapping, StompEndpointRegistry, STOMP_HANDLER_MAPPING_BEAN};

/// Application hooks. Every method has a default.
pub trait MessageBrokerSecurityConfigurer {
    /// When `false`, neither the CONNECT token check nor the handshake
    /// token copy is installed. Only disable this for clients that cannot
    /// send the token, such as non-browser clients.
    fn same_origin_enforced(&self) -> bool {
        true
    }

    /// Declares the authorization rules for inbound messages.
    fn configure_inbound(&self, _messages: &mut MessageSecurityMetadataSourceRegistry) {}

    /// Runs after the security interceptors were added.
    fn customize_client_inbound_channel(&self, _registration: &mut ChannelRegistration) {}

    fn register_stomp_endpoints(&self, _registry: &mut StompEndpointRegistry) {}
}

/// Settings of [`WebSocketMessageBrokerSecurity`].
#[derive(Debug, Clone)]
pub struct MessageBrokerSecurityConfig {
    handler_mapping_bean: String,
    allow_if_all_abstain: bool,
    expression_evaluator: ExpressionEvaluator,
}

impl Default for MessageBrokerSecurityConfig {
    fn default() -> Self {
        MessageBrokerSecurityConfig {
            handler_mapping_bean: STOMP_HANDLER_MAPPING_BEAN.to_string(),
            allow_if_all_abstain: false,
            expression_evaluator: ExpressionEvaluator::new(),
        }
    }
}

impl MessageBrokerSecurityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name under which the handler mapping is registered and looked up.
    pub fn handler_mapping_bean(mut self, name: &str) -> Self {
        self.handler_mapping_bean = name.to_string();
        self
    }

    pub fn allow_if_all_abstain(mut self, allow: bool) -> Self {
        self.allow_if_all_abstain = allow;
        self
    }

    /// Evaluator used by the expression voter, e.g. one with a custom root.
    pub fn expression_evaluator(mut self, evaluator: ExpressionEvaluator) -> Self {
        self.expression_evaluator = evaluator;
        self
    }

    pub fn bean_name(&self) -> &str {
        &self.handler_mapping_bean
    }
}

/// Fixed wiring around a [`MessageBrokerSecurityConfigurer`].
pub struct WebSocketMessageBrokerSecurity<C> {
    configurer: C,
    config: MessageBrokerSecurityConfig,
    inbound_registry: MessageSecurityMetadataSourceRegistry,
}

impl<C: MessageBrokerSecurityConfigurer> WebSocketMessageBrokerSecurity<C> {
    pub fn new(configurer: C) -> Self {
        Self::with_config(configurer, MessageBrokerSecurityConfig::default())
    }

    /// Collects the inbound rules once; later calls reuse them.
    pub fn with_config(configurer: C, config: MessageBrokerSecurityConfig) -> Self {
        let mut inbound_registry = MessageSecurityMetadataSourceRegistry::new();
        configurer.configure_inbound(&mut inbound_registry);
        WebSocketMessageBrokerSecurity {
            configurer,
            config,
            inbound_registry,
        }
    }

    pub fn configurer(&self) -> &C {
        &self.configurer
    }

    pub fn config(&self) -> &MessageBrokerSecurityConfig {
        &self.config
    }

    pub fn inbound_registry(&self) -> &MessageSecurityMetadataSourceRegistry {
        &self.inbound_registry
    }

    pub fn security_context_channel_interceptor(&self) -> SecurityContextChannelInterceptor {
        SecurityContextChannelInterceptor::new()
    }

    pub fn csrf_channel_interceptor(&self) -> CsrfChannelInterceptor {
        CsrfChannelInterceptor::new()
    }

    pub fn inbound_message_security_metadata_source(
        &self,
    ) -> Result<ExpressionBasedMessageSecurityMetadataSource, ConfigurationError> {
        self.inbound_registry.create_metadata_source()
    }

    /// Channel security backed by an affirmative decision over one
    /// expression voter.
    pub fn inbound_channel_security(&self) -> Result<ChannelSecurityInterceptor, ConfigurationError> {
        let voter = ExpressionVoter::with_evaluator(self.config.expression_evaluator.clone());
        let manager = AccessDecisionManager::affirmative(voter)
            .allow_if_all_abstain(self.config.allow_if_all_abstain);
        Ok(ChannelSecurityInterceptor::new(
            self.inbound_message_security_metadata_source()?,
            manager,
        ))
    }

    /// Appends the security interceptors, then the application's.
    ///
    /// # Errors
    /// Any failure to build the metadata source, e.g. an expression that
    /// does not parse.
    pub fn configure_client_inbound_channel(
        &self,
        registration: &mut ChannelRegistration,
    ) -> Result<(), ConfigurationError> {
        let channel_security = self.inbound_channel_security()?;

        registration.interceptor(self.security_context_channel_interceptor());
        if self.configurer.same_origin_enforced() {
            registration.interceptor(self.csrf_channel_interceptor());
        }
        if self.inbound_registry.contains_mapping() {
            registration.interceptor(channel_security);
        }
        self.configurer.customize_client_inbound_channel(registration);
        Ok(())
    }

    pub fn client_inbound_channel(&self) -> Result<InboundChannel, ConfigurationError> {
        let mut registration = ChannelRegistration::new();
        self.configure_client_inbound_channel(&mut registration)?;
        log::debug!("Client inbound channel configured: {:?}", registration);
        Ok(registration.into_channel())
    }

    /// Builds the endpoint handler mapping and registers it under the
    /// configured bean name.
    pub fn register_stomp_endpoints(&self, context: &mut ApplicationContext) {
        let mut registry = StompEndpointRegistry::new();
        self.configurer.register_stomp_endpoints(&mut registry);
        context.register_bean(&self.config.handler_mapping_bean, registry.handler_mapping());
    }

    /// Prepends a [`CsrfTokenHandshakeInterceptor`] to every endpoint.
    ///
    /// Does nothing when same-origin enforcement is off. Every handler is
    /// validated before any is changed, so on error the mapping is left
    /// untouched.
    ///
    /// # Errors
    /// - `NoSuchBean` / `BeanNotOfRequiredType` for the handler mapping bean
    /// - `UnexpectedHandler` for a handler that is neither a WebSocket nor a SockJS handler
    /// - `UnexpectedSockJsService` for a SockJS service without transport handling
    pub fn after_singletons_instantiated(
        &self,
        context: &mut ApplicationContext,
    ) -> Result<(), ConfigurationError> {
        if !self.configurer.same_origin_enforced() {
            return Ok(());
        }

        let bean = self.config.handler_mapping_bean.as_str();
        let mapping = context.get_bean_mut::<SimpleUrlHandlerMapping>(bean)?;

        for (_, handler) in mapping.handlers() {
            validate_handler(bean, handler)?;
        }
        for (pattern, handler) in mapping.handlers_mut() {
            add_csrf_token_interceptor(handler);
            log::debug!("Added CsrfTokenHandshakeInterceptor to {} at '{}'", handler.name(), pattern);
        }
        Ok(())
    }
}

fn validate_handler(
    bean: &str,
    handler: &(dyn HttpRequestHandler + 'static),
) -> Result<(), ConfigurationError> {
    let handler_any = handler.as_any();
    if handler_any.is::<WebSocketHttpRequestHandler>() {
        return Ok(());
    }
    let Some(sock_js) = handler_any.downcast_ref::<SockJsHttpRequestHandler>() else {
        return Err(ConfigurationError::UnexpectedHandler {
            bean: bean.to_string(),
            handler: handler.name().to_string(),
        });
    };
    let service = sock_js.sock_js_service();
    if service.as_any().is::<TransportHandlingSockJsService>() {
        Ok(())
    } else {
        Err(ConfigurationError::UnexpectedSockJsService {
            service: service.name().to_string(),
        })
    }
}

fn add_csrf_token_interceptor(handler: &mut (dyn HttpRequestHandler + 'static)) {
    if let Some(ws) = handler
        .as_any_mut()
        .downcast_mut::<WebSocketHttpRequestHandler>()
    {
        let patched = with_csrf_token_interceptor(ws.handshake_interceptors());
        ws.set_handshake_interceptors(patched);
        return;
    }
    if let Some(sock_js) = handler
        .as_any_mut()
        .downcast_mut::<SockJsHttpRequestHandler>()
    {
        if let Some(service) = sock_js
            .sock_js_service_mut()
            .as_any_mut()
            .downcast_mut::<TransportHandlingSockJsService>()
        {
            let patched = with_csrf_token_interceptor(service.handshake_interceptors());
            service.set_handshake_interceptors(patched);
        }
    }
}

fn with_csrf_token_interceptor(
    existing: &[Arc<dyn HandshakeInterceptor>],
) -> Vec<Arc<dyn HandshakeInterceptor>> {
    let mut interceptors: Vec<Arc<dyn HandshakeInterceptor>> = Vec::with_capacity(existing.len() + 1);
    interceptors.push(Arc::new(CsrfTokenHandshakeInterceptor::default()));
    interceptors.extend(existing.iter().cloned());
    interceptors
}
