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

//! Lifecycle operations.
//!
//! The creator-invoked transitions: approve, block, delete, promote,
//! revoke, list. Handlers return outcome data (confirmation reply plus the
//! optional target notification); the console layer performs the sends.
//! Validation order: authorization, then argument presence, then target
//! validity. Authorization never touches the registry.

use crate::core::errors::ConsoleError;
use crate::core::registry::UserRegistry;
use crate::core::roles::{Caller, Role};

/// The role-changing transitions. Delete is separate: it destroys the
/// record instead of rewriting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Approve,
    Block,
    Promote,
    Revoke,
}

impl RoleChange {
    fn target_role(&self) -> Role {
        match self {
            RoleChange::Approve => Role::Approved,
            RoleChange::Block => Role::Blocked,
            RoleChange::Promote => Role::Admin,
            RoleChange::Revoke => Role::Approved,
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            RoleChange::Approve => "/aprobar <chat_id>",
            RoleChange::Block => "/bloquear <chat_id>",
            RoleChange::Promote => "/promover <chat_id>",
            RoleChange::Revoke => "/revocar <chat_id>",
        }
    }

    fn confirmation(&self, target: &str) -> String {
        match self {
            RoleChange::Approve => format!("✅ Usuario {target} aprobado."),
            RoleChange::Block => format!("⛔ Usuario {target} bloqueado."),
            RoleChange::Promote => format!("👑 Usuario {target} promovido a administrador."),
            RoleChange::Revoke => format!("↩️ Usuario {target} ya no es administrador."),
        }
    }

    fn notice(&self) -> &'static str {
        match self {
            RoleChange::Approve => {
                "✅ Tu cuenta ha sido aprobada. Ya puedes usar los comandos de consulta."
            }
            RoleChange::Block => "⛔ Tu cuenta ha sido bloqueada.",
            RoleChange::Promote => "👑 Ahora eres administrador.",
            RoleChange::Revoke => {
                "↩️ Tu rol de administrador fue revocado. Sigues siendo usuario aprobado."
            }
        }
    }
}

/// Best-effort notification to the affected principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetNotice {
    pub principal_id: String,
    pub text: String,
}

/// Result of a successful lifecycle operation.
#[derive(Debug, Clone)]
pub struct LifecycleOutcome {
    /// Reply to the invoking creator
    pub confirmation: String,
    /// Notification for the affected principal; absent for delete, whose
    /// record no longer represents a reachable current state
    pub target_notice: Option<TargetNotice>,
}

fn ensure_creator(caller: &Caller) -> Result<(), ConsoleError> {
    match caller {
        Caller::Creator => Ok(()),
        Caller::Registered(_) => Err(ConsoleError::NotAuthorized),
    }
}

fn require_target<'a>(
    target: Option<&'a str>,
    usage: &'static str,
) -> Result<&'a str, ConsoleError> {
    match target {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ConsoleError::MissingArgument { usage }),
    }
}

/// Apply one of the role-changing transitions to `target`.
pub async fn change_role(
    registry: &UserRegistry,
    caller: &Caller,
    target: Option<&str>,
    change: RoleChange,
) -> Result<LifecycleOutcome, ConsoleError> {
    ensure_creator(caller)?;
    let target = require_target(target, change.usage())?;
    registry.set_role(target, change.target_role()).await?;
    Ok(LifecycleOutcome {
        confirmation: change.confirmation(target),
        target_notice: Some(TargetNotice {
            principal_id: target.to_string(),
            text: change.notice().to_string(),
        }),
    })
}

/// Destroy the target's record. An absent record is an explicit
/// not-found, consistently.
pub async fn delete(
    registry: &UserRegistry,
    caller: &Caller,
    target: Option<&str>,
) -> Result<LifecycleOutcome, ConsoleError> {
    ensure_creator(caller)?;
    let target = require_target(target, "/eliminar <chat_id>")?;
    if !registry.remove(target).await? {
        return Err(ConsoleError::UnknownTarget(target.to_string()));
    }
    Ok(LifecycleOutcome {
        confirmation: format!("🗑 Usuario {target} eliminado."),
        target_notice: None,
    })
}

/// Format the full registry snapshot: every record exactly once, stable
/// order within one call.
pub async fn list(registry: &UserRegistry, caller: &Caller) -> Result<String, ConsoleError> {
    ensure_creator(caller)?;
    let records = registry.list().await;
    if records.is_empty() {
        return Ok("No hay usuarios registrados.".to_string());
    }
    let mut report = String::from("👥 Usuarios registrados:");
    for (id, role) in records {
        report.push_str(&format!("\n{id} — {}", role.label()));
    }
    Ok(report)
}
