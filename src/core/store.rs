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

//! Registry persistence.
//!
//! The registry document round-trips as JSON:
//! `{ "creator": "<id>", "users": { "<id>": { "role": "<role>" } } }`.
//! Unknown role strings fail deserialization and surface as corruption,
//! which the caller treats as startup-fatal. The store trait exists so
//! tests can inject an in-memory implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::core::errors::ConsoleError;
use crate::core::roles::Role;

/// One registry entry. Minimal on purpose; extend here, not ad hoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub role: Role,
}

/// The full persisted document. A `BTreeMap` keeps listings stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub creator: String,
    pub users: BTreeMap<String, UserRecord>,
}

/// Durable backing for the user registry.
///
/// `persist` must complete durably before returning: the registry replies
/// to the operator only after this call succeeds.
pub trait RegistryStore: Send + Sync {
    fn load(&self) -> Result<Option<RegistryDocument>, ConsoleError>;
    fn persist(&self, doc: &RegistryDocument) -> Result<(), ConsoleError>;
}

/// JSON file store. Writes go to a sibling temp file first and are moved
/// into place with a rename, so a crash mid-write never truncates the
/// source of truth.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<Option<RegistryDocument>, ConsoleError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path).map_err(ConsoleError::Persistence)?;
        let doc: RegistryDocument = serde_json::from_str(&raw).map_err(|e| {
            ConsoleError::CorruptRegistry(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(doc))
    }

    fn persist(&self, doc: &RegistryDocument) -> Result<(), ConsoleError> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| ConsoleError::CorruptRegistry(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes()).map_err(ConsoleError::Persistence)?;
        std::fs::rename(&tmp, &self.path).map_err(ConsoleError::Persistence)?;
        Ok(())
    }
}

/// Ephemeral store. Used by tests and by `--offline` experimentation;
/// contents die with the process.
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<Option<RegistryDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> Result<Option<RegistryDocument>, ConsoleError> {
        Ok(self.doc.lock().expect("memory store lock").clone())
    }

    fn persist(&self, doc: &RegistryDocument) -> Result<(), ConsoleError> {
        *self.doc.lock().expect("memory store lock") = Some(doc.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> RegistryDocument {
        let mut users = BTreeMap::new();
        users.insert("200".to_string(), UserRecord { role: Role::Pending });
        users.insert("300".to_string(), UserRecord { role: Role::Admin });
        RegistryDocument {
            creator: "100".to_string(),
            users,
        }
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("users.json"));

        assert!(store.load().unwrap().is_none());

        store.persist(&sample_doc()).unwrap();
        let loaded = store.load().unwrap().expect("document after persist");
        assert_eq!(loaded.creator, "100");
        assert_eq!(loaded.users.len(), 2);
        assert_eq!(loaded.users["200"].role, Role::Pending);
        assert_eq!(loaded.users["300"].role, Role::Admin);
    }

    #[test]
    fn unknown_role_string_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"{ "creator": "100", "users": { "200": { "role": "superuser" } } }"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        match store.load() {
            Err(ConsoleError::CorruptRegistry(_)) => {}
            other => panic!("expected CorruptRegistry, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn creator_role_string_is_corrupt() {
        // "creator" is a caller classification, never a stored role
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"{ "creator": "100", "users": { "200": { "role": "creator" } } }"#,
        )
        .unwrap();

        assert!(matches!(
            JsonFileStore::new(&path).load(),
            Err(ConsoleError::CorruptRegistry(_))
        ));
    }

    #[test]
    fn malformed_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::new(&path).load(),
            Err(ConsoleError::CorruptRegistry(_))
        ));
    }
}
