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

//! Console dispatcher.
//!
//! The coordinator of the whole console: consumes inbound command events
//! from the transport channel, routes `/start` through the registration
//! flow, passes everything else through the access gate, executes the
//! handler, and replies. Events are processed one at a time; the registry
//! itself serializes its read-modify-persist sequences.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::console::notify::Notifier;
use crate::console::transport::ChatTransport;
use crate::core::commands::{Command, CommandEvent};
use crate::core::errors::ConsoleError;
use crate::core::gate::{self, GateDecision};
use crate::core::lifecycle::{self, RoleChange};
use crate::core::registry::UserRegistry;
use crate::core::roles::Caller;
use crate::reports::ReportRunner;

const OFFLINE_REPLY: &str = "⚠️ La base de datos académica no está configurada.";

pub struct Console {
    registry: UserRegistry,
    transport: Arc<dyn ChatTransport>,
    notifier: Notifier,
    reports: Option<ReportRunner>,
}

impl Console {
    pub fn new(
        registry: UserRegistry,
        transport: Arc<dyn ChatTransport>,
        reports: Option<ReportRunner>,
    ) -> Self {
        let notifier = Notifier::new(transport.clone(), registry.creator_id().to_string());
        Self {
            registry,
            transport,
            notifier,
            reports,
        }
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Main loop: run until the channel closes or ctrl-c.
    pub async fn run(&self, mut rx: mpsc::Receiver<CommandEvent>) {
        info!("console started");
        loop {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Some(event) => self.handle(event).await,
                        None => {
                            info!("event channel closed, shutting down");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("received ctrl-c, shutting down");
                    break;
                }
            }
        }
    }

    /// Process one inbound command to completion.
    pub async fn handle(&self, event: CommandEvent) {
        let caller = self.registry.resolve(&event.caller_id).await;

        // /start is the registration flow and answers every principal;
        // everything else must pass the gate first.
        if event.command != Command::Start {
            if let GateDecision::Deny { reply } = gate::authorize(
                &caller,
                &event.caller_id,
                self.registry.creator_id(),
                event.command,
            ) {
                warn!(
                    caller = %event.caller_id,
                    command = event.command.name(),
                    "command denied"
                );
                self.reply(&event.caller_id, &reply).await;
                return;
            }
        }

        let reply = match self.dispatch(&event, &caller).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    ConsoleError::Persistence(_)
                    | ConsoleError::Report(_)
                    | ConsoleError::Transport(_) => {
                        error!(command = event.command.name(), "command failed: {}", e)
                    }
                    _ => warn!(command = event.command.name(), "command rejected: {}", e),
                }
                e.user_message()
            }
        };
        self.reply(&event.caller_id, &reply).await;
    }

    async fn dispatch(
        &self,
        event: &CommandEvent,
        caller: &Caller,
    ) -> Result<String, ConsoleError> {
        let target = event.argument.as_deref();
        match event.command {
            Command::Start => self.handle_start(&event.caller_id, caller).await,
            Command::Aprobar => self.apply_change(caller, target, RoleChange::Approve).await,
            Command::Bloquear => self.apply_change(caller, target, RoleChange::Block).await,
            Command::Promover => self.apply_change(caller, target, RoleChange::Promote).await,
            Command::Revocar => self.apply_change(caller, target, RoleChange::Revoke).await,
            Command::Eliminar => {
                let outcome = lifecycle::delete(&self.registry, caller, target).await?;
                Ok(outcome.confirmation)
            }
            Command::Listar => lifecycle::list(&self.registry, caller).await,
            Command::Db => Ok(self.db_health().await),
            Command::Usuario
            | Command::Areas
            | Command::Semestres
            | Command::GruposSinDocente => self.report(event.command, target).await,
        }
    }

    /// Registration flow. The creator alert is attempted on success of the
    /// registry write and independently of whether the caller reply can be
    /// delivered.
    async fn handle_start(
        &self,
        caller_id: &str,
        caller: &Caller,
    ) -> Result<String, ConsoleError> {
        if let Caller::Creator = caller {
            return Ok(format!(
                "👑 Bienvenido Creador.\nTu chat.id es: {caller_id}\nRol: Creador"
            ));
        }
        let (role, is_new) = self.registry.register_if_absent(caller_id).await?;
        if is_new {
            self.notifier
                .creator_alert(&format!(
                    "🚨 Nuevo usuario detectado\nID: {caller_id}\nEstado: pendiente"
                ))
                .await;
            Ok(format!(
                "👋 Hola! Tu chat.id es: {caller_id}\nRol actual: PENDIENTE.\nEspera aprobación del Creador."
            ))
        } else {
            Ok(format!(
                "✅ Ya estás registrado.\nTu chat.id es: {caller_id}\nRol actual: {}",
                role.label()
            ))
        }
    }

    async fn apply_change(
        &self,
        caller: &Caller,
        target: Option<&str>,
        change: RoleChange,
    ) -> Result<String, ConsoleError> {
        let outcome = lifecycle::change_role(&self.registry, caller, target, change).await?;
        if let Some(notice) = &outcome.target_notice {
            self.notifier
                .principal_notice(&notice.principal_id, &notice.text)
                .await;
        }
        Ok(outcome.confirmation)
    }

    async fn report(
        &self,
        command: Command,
        argument: Option<&str>,
    ) -> Result<String, ConsoleError> {
        match &self.reports {
            Some(runner) => runner.run(command, argument).await,
            None => Ok(OFFLINE_REPLY.to_string()),
        }
    }

    async fn db_health(&self) -> String {
        match &self.reports {
            Some(runner) => {
                if runner.healthcheck().await {
                    "✅ DB OK".to_string()
                } else {
                    "❌ DB no respondió.".to_string()
                }
            }
            None => OFFLINE_REPLY.to_string(),
        }
    }

    /// Reply to the caller. Delivery failure is logged; it does not undo
    /// the already-persisted effect of the command.
    async fn reply(&self, chat_id: &str, text: &str) {
        if let Err(e) = self.transport.send_message(chat_id, text).await {
            warn!(chat_id, "reply delivery failed: {}", e);
        }
    }
}
