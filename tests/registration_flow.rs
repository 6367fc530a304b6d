//! Integration tests for the /start registration flow
//! Covers:
//! - First contact creates exactly one pending record and alerts the creator
//! - Re-registration is idempotent and echoes the persisted role
//! - Delete followed by /start reproduces the unseen-principal flow

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use celador::console::dispatcher::Console;
use celador::console::transport::ChatTransport;
use celador::core::commands::{Command, CommandEvent};
use celador::core::errors::ConsoleError;
use celador::core::registry::UserRegistry;
use celador::core::roles::{Caller, Role};
use celador::core::store::MemoryStore;

// --- Helpers ---

const CREATOR: &str = "100";

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ConsoleError> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

impl RecordingTransport {
    fn sent_to(&self, chat_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

fn build_console() -> (Console, Arc<RecordingTransport>) {
    let registry =
        UserRegistry::open(CREATOR.to_string(), Arc::new(MemoryStore::new())).expect("open");
    let transport = Arc::new(RecordingTransport::default());
    (Console::new(registry, transport.clone(), None), transport)
}

fn event(caller: &str, command: Command, argument: Option<&str>) -> CommandEvent {
    CommandEvent {
        caller_id: caller.to_string(),
        command,
        argument: argument.map(str::to_string),
    }
}

// --- Tests ---

#[tokio::test]
async fn first_start_creates_pending_and_alerts_creator() {
    let (console, transport) = build_console();

    console.handle(event("200", Command::Start, None)).await;

    let replies = transport.sent_to("200");
    assert_eq!(replies.len(), 1);
    assert!(
        replies[0].contains("PENDIENTE"),
        "FAIL: expected pending status in reply, got {:?}",
        replies[0]
    );

    let alerts = transport.sent_to(CREATOR);
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("Nuevo usuario"));
    assert!(alerts[0].contains("200"));

    assert_eq!(
        console.registry().list().await,
        vec![("200".to_string(), Role::Pending)]
    );
}

#[tokio::test]
async fn second_start_reports_current_role_without_new_record() {
    let (console, transport) = build_console();

    console.handle(event("200", Command::Start, None)).await;
    transport.clear();
    console.handle(event("200", Command::Start, None)).await;

    let replies = transport.sent_to("200");
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Ya estás registrado"));
    assert!(replies[0].contains(Role::Pending.label()));

    // no second creator alert, no second record
    assert!(transport.sent_to(CREATOR).is_empty());
    assert_eq!(console.registry().list().await.len(), 1);
}

#[tokio::test]
async fn start_echoes_role_after_approval() {
    let (console, transport) = build_console();

    console.handle(event("200", Command::Start, None)).await;
    console
        .handle(event(CREATOR, Command::Aprobar, Some("200")))
        .await;
    transport.clear();

    console.handle(event("200", Command::Start, None)).await;
    let replies = transport.sent_to("200");
    assert_eq!(replies.len(), 1);
    assert!(
        replies[0].contains("Usuario aprobado"),
        "FAIL: expected approved label, got {:?}",
        replies[0]
    );
}

#[tokio::test]
async fn creator_start_leaves_registry_untouched() {
    let (console, transport) = build_console();

    console.handle(event(CREATOR, Command::Start, None)).await;

    let replies = transport.sent_to(CREATOR);
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Bienvenido Creador"));
    assert!(console.registry().list().await.is_empty());
    assert_eq!(console.registry().resolve(CREATOR).await, Caller::Creator);
}

#[tokio::test]
async fn delete_then_start_reproduces_unseen_flow() {
    let (console, transport) = build_console();

    console.handle(event("200", Command::Start, None)).await;
    console
        .handle(event(CREATOR, Command::Aprobar, Some("200")))
        .await;
    console
        .handle(event(CREATOR, Command::Eliminar, Some("200")))
        .await;
    transport.clear();

    console.handle(event("200", Command::Start, None)).await;

    let replies = transport.sent_to("200");
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("PENDIENTE"));

    // the creator is alerted again, as for any unseen principal
    let alerts = transport.sent_to(CREATOR);
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("Nuevo usuario"));

    assert_eq!(
        console.registry().list().await,
        vec![("200".to_string(), Role::Pending)]
    );
}

#[tokio::test]
async fn blocked_principal_start_reports_blocked() {
    let (console, transport) = build_console();

    console.handle(event("200", Command::Start, None)).await;
    console
        .handle(event(CREATOR, Command::Bloquear, Some("200")))
        .await;
    transport.clear();

    console.handle(event("200", Command::Start, None)).await;
    let replies = transport.sent_to("200");
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains(Role::Blocked.label()));
}
