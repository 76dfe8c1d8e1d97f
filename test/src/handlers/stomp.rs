//! WebSocket endpoint: handshake through the mapped handler, then one JSON
//! frame per text message through the secured inbound channel.

use std::sync::Arc;

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use actix_ws::Message as WsMessage;
use futures_util::StreamExt;

use actix_messaging_security_core::http::security::websocket::WebSocketSecurityError;
use actix_messaging_security_core::http::security::User;

use crate::chat::{handle_frame, next_session_id, ChatState};

pub async fn connect(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<ChatState>,
) -> Result<HttpResponse, actix_web::Error> {
    let handler = state
        .endpoints
        .get_handler(req.path())
        .ok_or_else(|| WebSocketSecurityError::NoHandler {
            path: req.path().to_string(),
        })?;
    let attributes = Arc::new(handler.handshake(&req)?);
    let user = req.extensions().get::<User>().cloned();

    let (response, mut session, mut frames) = actix_ws::handle(&req, stream)?;

    let channel = state.channel.clone();
    let session_id = next_session_id();
    log::info!(
        "WebSocket session {} opened for {}",
        session_id,
        user.as_ref().map(|u| u.get_username()).unwrap_or("anonymous")
    );

    actix_web::rt::spawn(async move {
        while let Some(Ok(frame)) = frames.next().await {
            match frame {
                WsMessage::Text(text) => {
                    let reply = handle_frame(&channel, &text, &session_id, &attributes, user.clone());
                    if session.text(reply).await.is_err() {
                        break;
                    }
                }
                WsMessage::Ping(bytes) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                WsMessage::Close(_) => break,
                _ => {}
            }
        }
        log::info!("WebSocket session {} closed", session_id);
        let _ = session.close(None).await;
    });

    Ok(response)
}
