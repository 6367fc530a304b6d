// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Telegram Bot API transport.
//!
//! Outbound messages go through the object-safe [`ChatTransport`] trait so
//! tests can substitute a recording sink. Inbound updates are long-polled
//! by a dedicated task that forwards parsed [`CommandEvent`]s over a
//! bounded channel; malformed or non-command updates are logged and
//! skipped, never fatal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::commands::{Command, CommandEvent};
use crate::core::constants::limits;
use crate::core::errors::ConsoleError;

/// Outbound message sink.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ConsoleError>;
}

// ---------------------------------------------------------------------------
// Wire types (the subset of the Bot API we consume)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub text: Option<String>,
    pub from: Option<Sender>,
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct MenuCommand {
    command: &'static str,
    description: &'static str,
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

pub struct TelegramApi {
    http: reqwest::Client,
    base: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(limits::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConsoleError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base: format!("https://api.telegram.org/bot{token}"),
        })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<T, ConsoleError> {
        let url = format!("{}/{}", self.base, method);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ConsoleError::Transport(format!("{method}: {e}")))?;
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ConsoleError::Transport(format!("{method}: {e}")))?;
        if !envelope.ok {
            let reason = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(ConsoleError::Transport(format!("{method}: {reason}")));
        }
        envelope
            .result
            .ok_or_else(|| ConsoleError::Transport(format!("{method}: empty result")))
    }

    /// Publish the full command surface to the chat client menu. The menu
    /// shows every command to every user; entitlement is enforced at
    /// dispatch, not by hiding entries.
    pub async fn set_my_commands(&self) -> Result<(), ConsoleError> {
        let menu: Vec<MenuCommand> = Command::ALL
            .iter()
            .map(|c| MenuCommand {
                command: c.name(),
                description: c.description(),
            })
            .collect();
        let _: bool = self
            .call("setMyCommands", &json!({ "commands": menu }))
            .await?;
        Ok(())
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ConsoleError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": limits::POLL_TIMEOUT_SECS,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }
}

#[async_trait]
impl ChatTransport for TelegramApi {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ConsoleError> {
        debug!(chat_id, "sending message");
        let _: Message = self
            .call("sendMessage", &json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Inbound poller
// ---------------------------------------------------------------------------

/// Spawns the background task that long-polls updates and forwards parsed
/// command events. The task ends when the receiving side closes.
pub fn spawn_update_poller(api: Arc<TelegramApi>, tx: mpsc::Sender<CommandEvent>) {
    tokio::spawn(async move {
        let mut offset: i64 = 0;
        loop {
            let updates = match api.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("getUpdates failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(limits::POLL_RETRY_SECS)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(event) = parse_update(update) else {
                    continue;
                };
                if tx.send(event).await.is_err() {
                    debug!("console closed, stopping poller");
                    return;
                }
            }
        }
    });
}

/// Convert one update into a command event. Non-command chatter and
/// messages without a sender are skipped.
fn parse_update(update: Update) -> Option<CommandEvent> {
    let message = update.message?;
    let text = message.text?;
    let (command, argument) = match Command::parse(&text) {
        Some(parsed) => parsed,
        None => {
            debug!(%text, "ignoring non-command message");
            return None;
        }
    };
    // The principal identity is the sender id; private chats carry the
    // same value as the chat id.
    let caller_id = message
        .from
        .map(|s| s.id)
        .unwrap_or(message.chat.id)
        .to_string();
    Some(CommandEvent {
        caller_id,
        command,
        argument,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(text: &str, from: i64) -> Update {
        Update {
            update_id: 7,
            message: Some(Message {
                text: Some(text.to_string()),
                from: Some(Sender { id: from }),
                chat: Chat { id: from },
            }),
        }
    }

    #[test]
    fn update_parses_into_event() {
        let event = parse_update(update("/aprobar 200", 100)).unwrap();
        assert_eq!(event.caller_id, "100");
        assert_eq!(event.command, Command::Aprobar);
        assert_eq!(event.argument.as_deref(), Some("200"));
    }

    #[test]
    fn chatter_is_skipped() {
        assert!(parse_update(update("buenos días", 100)).is_none());
        let empty = Update {
            update_id: 8,
            message: None,
        };
        assert!(parse_update(empty).is_none());
    }
}
