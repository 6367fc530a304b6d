// Domain error types - user-visible text never leaks internal detail

use thiserror::Error;

/// Main error type for the console.
///
/// Notification delivery failure is deliberately not represented here: a
/// best-effort side message that cannot be delivered is logged by the
/// notifier and never surfaces as the command's failure.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Caller failed the role or identity check; no mutation attempted
    #[error("not authorized")]
    NotAuthorized,

    /// Malformed invocation: the operation requires a target argument
    #[error("missing argument, usage: {usage}")]
    MissingArgument { usage: &'static str },

    /// Lifecycle operation aimed at the creator's own identifier
    #[error("invalid target: {0} is the creator")]
    InvalidTarget(String),

    /// Delete of a principal that has no record
    #[error("unknown target: {0}")]
    UnknownTarget(String),

    /// Registry store unreachable or unwritable; fatal to the operation
    #[error("persistence failure: {0}")]
    Persistence(#[source] std::io::Error),

    /// Registry content unreadable on load; startup-fatal
    #[error("corrupt registry: {0}")]
    CorruptRegistry(String),

    /// Chat transport call failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Reporting database failure
    #[error("report error: {0}")]
    Report(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ConsoleError {
    /// User-facing reply text for a failed command.
    ///
    /// Internal failures map to a generic service message; the cause goes
    /// to the logs, not to the chat.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::NotAuthorized => {
                "❌ No tienes permisos para usar este comando.".to_string()
            }
            ConsoleError::MissingArgument { usage } => format!("Uso: {usage}"),
            ConsoleError::InvalidTarget(_) => {
                "⚠️ El Creador no puede ser objetivo de esta operación.".to_string()
            }
            ConsoleError::UnknownTarget(id) => {
                format!("⚠️ No existe registro para {id}.")
            }
            ConsoleError::Persistence(_) => {
                "⚠️ Error interno guardando el registro. Intenta de nuevo.".to_string()
            }
            ConsoleError::CorruptRegistry(_) => "⚠️ Error interno.".to_string(),
            ConsoleError::Transport(_) => "⚠️ Error de comunicación.".to_string(),
            ConsoleError::Report(_) => "❌ La consulta no está disponible en este momento.".to_string(),
            ConsoleError::Configuration(_) => "⚠️ Error interno.".to_string(),
        }
    }
}
