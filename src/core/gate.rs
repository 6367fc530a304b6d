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

//! Access gate.
//!
//! Every inbound command except `/start` passes through [`authorize`]
//! before its handler runs. Denials carry the reply text; handlers never
//! see a request the gate rejected.

use crate::core::commands::Command;
use crate::core::roles::Caller;

/// The gate's verdict on one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny { reply: String },
}

/// Authorize one command invocation.
///
/// Creator-only commands additionally require exact identity equality
/// against the configured creator id. The creator is never stored in the
/// registry, so a role lookup alone cannot authorize it; this check is
/// independent of the classification in `caller`.
pub fn authorize(
    caller: &Caller,
    caller_id: &str,
    creator_id: &str,
    command: Command,
) -> GateDecision {
    if !caller.allowed(command) {
        return GateDecision::Deny {
            reply: caller.denial_reply().to_string(),
        };
    }
    if command.is_creator_only() && caller_id != creator_id {
        return GateDecision::Deny {
            reply: "❌ No tienes permisos para usar este comando.".to_string(),
        };
    }
    GateDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roles::Role;

    #[test]
    fn creator_passes_creator_only_commands() {
        let decision = authorize(&Caller::Creator, "100", "100", Command::Aprobar);
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn identity_check_is_independent_of_classification() {
        // A caller classified as Creator but with a mismatched id must
        // still be denied on creator-only commands.
        let decision = authorize(&Caller::Creator, "200", "100", Command::Eliminar);
        assert!(matches!(decision, GateDecision::Deny { .. }));
    }

    #[test]
    fn admin_denied_on_mutations_allowed_on_reports() {
        let admin = Caller::Registered(Role::Admin);
        assert!(matches!(
            authorize(&admin, "300", "100", Command::Bloquear),
            GateDecision::Deny { .. }
        ));
        assert_eq!(
            authorize(&admin, "300", "100", Command::Semestres),
            GateDecision::Allow
        );
    }

    #[test]
    fn denial_text_matches_role() {
        let pending = Caller::Registered(Role::Pending);
        let blocked = Caller::Registered(Role::Blocked);
        match authorize(&pending, "200", "100", Command::Areas) {
            GateDecision::Deny { reply } => assert!(reply.contains("PENDIENTE")),
            other => panic!("expected Deny, got {:?}", other),
        }
        match authorize(&blocked, "200", "100", Command::Areas) {
            GateDecision::Deny { reply } => assert!(reply.contains("bloqueada")),
            other => panic!("expected Deny, got {:?}", other),
        }
    }
}
