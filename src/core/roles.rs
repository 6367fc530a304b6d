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

//! Role policy.
//!
//! The closed role enumeration for stored records, the caller
//! classification that distinguishes the creator, and the single
//! command-set mapping consulted by both the access gate and the menu.
//! This mapping is the only place entitlement is defined.

use serde::{Deserialize, Serialize};

use crate::core::commands::Command;

/// Role of a registered (non-creator) principal.
///
/// The creator is never stored in the registry and therefore has no
/// variant here; see [`Caller`]. Serialized as the lowercase role string
/// in the persisted registry; any other string fails deserialization and
/// is treated as corruption by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pending,
    Approved,
    Admin,
    Blocked,
}

impl Role {
    /// The persisted wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pending => "pending",
            Role::Approved => "approved",
            Role::Admin => "admin",
            Role::Blocked => "blocked",
        }
    }

    /// Parse a persisted role string. `None` signals corruption.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "pending" => Some(Role::Pending),
            "approved" => Some(Role::Approved),
            "admin" => Some(Role::Admin),
            "blocked" => Some(Role::Blocked),
            _ => None,
        }
    }

    /// User-facing display name.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Pending => "Pendiente de aprobación",
            Role::Approved => "Usuario aprobado",
            Role::Admin => "Administrador",
            Role::Blocked => "Bloqueado",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of an inbound caller.
///
/// The creator is configured at startup and never appears in the registry,
/// so a role lookup alone can never authorize it; it is a distinguished
/// variant rather than an ambient id comparison scattered through handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Creator,
    Registered(Role),
}

/// Reporting-tier commands available to approved users and admins.
const REPORTING_TIER: &[Command] = &[
    Command::Usuario,
    Command::Areas,
    Command::Semestres,
    Command::GruposSinDocente,
    Command::Db,
];

impl Caller {
    pub fn label(&self) -> &'static str {
        match self {
            Caller::Creator => "Creador",
            Caller::Registered(role) => role.label(),
        }
    }

    /// Whether this caller may invoke `command`.
    ///
    /// `/start` is not part of this mapping: it is the registration flow
    /// and answers every principal, so the dispatcher routes it before the
    /// gate runs.
    pub fn allowed(&self, command: Command) -> bool {
        match self {
            Caller::Creator => true,
            Caller::Registered(Role::Admin) | Caller::Registered(Role::Approved) => {
                REPORTING_TIER.contains(&command)
            }
            Caller::Registered(Role::Pending) | Caller::Registered(Role::Blocked) => false,
        }
    }

    /// Role-specific denial text returned by the gate.
    pub fn denial_reply(&self) -> &'static str {
        match self {
            Caller::Registered(Role::Pending) => {
                "⏳ Tu cuenta está PENDIENTE de aprobación. Espera al Creador."
            }
            Caller::Registered(Role::Blocked) => "⛔ Tu cuenta está bloqueada.",
            _ => "❌ No tienes permisos para usar este comando.",
        }
    }
}
