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

//! Command surface of the console.
//!
//! The closed set of commands, their parsing from chat text, and the
//! static menu descriptions published to the transport. Entitlement is
//! enforced at dispatch by the access gate, never by hiding menu entries.

/// Every command the console understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Registration flow; answers every principal with its current state
    Start,
    Aprobar,
    Bloquear,
    Eliminar,
    Promover,
    Revocar,
    Listar,
    Usuario,
    Areas,
    Semestres,
    GruposSinDocente,
    Db,
}

/// An inbound command invocation as the gate consumes it.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    /// Transport-supplied numeric principal id, rendered as a string
    pub caller_id: String,
    pub command: Command,
    pub argument: Option<String>,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::Start,
        Command::Aprobar,
        Command::Bloquear,
        Command::Eliminar,
        Command::Promover,
        Command::Revocar,
        Command::Listar,
        Command::Usuario,
        Command::Areas,
        Command::Semestres,
        Command::GruposSinDocente,
        Command::Db,
    ];

    /// Wire name without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Aprobar => "aprobar",
            Command::Bloquear => "bloquear",
            Command::Eliminar => "eliminar",
            Command::Promover => "promover",
            Command::Revocar => "revocar",
            Command::Listar => "listar",
            Command::Usuario => "usuario",
            Command::Areas => "areas",
            Command::Semestres => "semestres",
            Command::GruposSinDocente => "grupos_sin_docente",
            Command::Db => "db",
        }
    }

    /// Static menu description, independent of the caller's entitlement.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Iniciar y ver tu rol",
            Command::Aprobar => "Aprobar usuario (Creador)",
            Command::Bloquear => "Bloquear usuario (Creador)",
            Command::Eliminar => "Eliminar usuario (Creador)",
            Command::Promover => "Promover a admin (Creador)",
            Command::Revocar => "Revocar admin (Creador)",
            Command::Listar => "Listar usuarios (Creador)",
            Command::Usuario => "Consultar usuario por documento",
            Command::Areas => "Listar áreas y asignaturas",
            Command::Semestres => "Ver semestres con resumen",
            Command::GruposSinDocente => "Grupos sin docente",
            Command::Db => "Verificar la base de datos",
        }
    }

    /// Commands that mutate the registry or list it; require the creator.
    pub fn is_creator_only(&self) -> bool {
        matches!(
            self,
            Command::Aprobar
                | Command::Bloquear
                | Command::Eliminar
                | Command::Promover
                | Command::Revocar
                | Command::Listar
        )
    }

    fn from_name(name: &str) -> Option<Command> {
        Command::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Parse a chat message into a command and its optional argument.
    ///
    /// Accepts the `/comando@botname arg` form. Returns `None` for plain
    /// text and for command names outside the closed set; the dispatcher
    /// ignores those.
    pub fn parse(text: &str) -> Option<(Command, Option<String>)> {
        let rest = text.strip_prefix('/')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let head = parts.next()?;
        // "/listar@celador_bot" addresses this bot through a group chat
        let name = head.split('@').next().unwrap_or(head);
        let command = Command::from_name(name)?;
        let argument = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some((command, argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_argument() {
        let (cmd, arg) = Command::parse("/aprobar 200").unwrap();
        assert_eq!(cmd, Command::Aprobar);
        assert_eq!(arg.as_deref(), Some("200"));
    }

    #[test]
    fn parses_bot_suffix_and_no_argument() {
        let (cmd, arg) = Command::parse("/listar@celador_bot").unwrap();
        assert_eq!(cmd, Command::Listar);
        assert!(arg.is_none());
    }

    #[test]
    fn whitespace_only_argument_is_absent() {
        let (_, arg) = Command::parse("/aprobar   ").unwrap();
        assert!(arg.is_none());
    }

    #[test]
    fn rejects_plain_text_and_unknown_commands() {
        assert!(Command::parse("hola").is_none());
        assert!(Command::parse("/desconocido").is_none());
    }

    #[test]
    fn menu_names_are_unique() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
