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

//! User registry.
//!
//! The single shared mutable resource of the console. One mutex
//! serializes every read-modify-persist sequence: the store write happens
//! inside the critical section, so a confirmation reply can never be
//! observed before the registry change is durable, and two concurrent
//! registrations of the same unseen principal collapse to one record.
//!
//! # Invariants
//! - The creator id is never a key in the map.
//! - A registered principal has exactly one record; absence means the
//!   principal never contacted the console (or was deleted, which is
//!   indistinguishable by design).

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::core::errors::ConsoleError;
use crate::core::roles::{Caller, Role};
use crate::core::store::{RegistryDocument, RegistryStore, UserRecord};

pub struct UserRegistry {
    creator_id: String,
    store: Arc<dyn RegistryStore>,
    users: Mutex<BTreeMap<String, UserRecord>>,
}

impl UserRegistry {
    /// Load the registry from `store`.
    ///
    /// Corruption (unreadable document, unknown role string, or the
    /// configured creator appearing as a map key) is returned as an error;
    /// the process must not run with an unreadable source of truth. The
    /// configured creator id is authoritative over the persisted field.
    pub fn open(creator_id: String, store: Arc<dyn RegistryStore>) -> Result<Self, ConsoleError> {
        let users = match store.load()? {
            Some(doc) => {
                if doc.users.contains_key(&creator_id) {
                    return Err(ConsoleError::CorruptRegistry(format!(
                        "creator id {creator_id} appears as a registered user"
                    )));
                }
                doc.users
            }
            None => BTreeMap::new(),
        };
        info!(users = users.len(), "registro de usuarios cargado");
        Ok(Self {
            creator_id,
            store,
            users: Mutex::new(users),
        })
    }

    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }

    /// Classify a principal. Read-only: an unseen principal resolves to
    /// `Registered(Pending)` without creating a record.
    pub async fn resolve(&self, principal_id: &str) -> Caller {
        if principal_id == self.creator_id {
            return Caller::Creator;
        }
        let users = self.users.lock().await;
        match users.get(principal_id) {
            Some(record) => Caller::Registered(record.role),
            None => Caller::Registered(Role::Pending),
        }
    }

    /// Idempotent registration. Creates a `pending` record if the
    /// principal is unseen; reports `(role, is_new)`.
    pub async fn register_if_absent(
        &self,
        principal_id: &str,
    ) -> Result<(Role, bool), ConsoleError> {
        if principal_id == self.creator_id {
            return Err(ConsoleError::InvalidTarget(principal_id.to_string()));
        }
        let mut users = self.users.lock().await;
        if let Some(record) = users.get(principal_id) {
            return Ok((record.role, false));
        }
        users.insert(
            principal_id.to_string(),
            UserRecord {
                role: Role::Pending,
            },
        );
        if let Err(e) = self.persist_locked(&users) {
            users.remove(principal_id);
            return Err(e);
        }
        info!(principal = principal_id, "nuevo usuario registrado como pendiente");
        Ok((Role::Pending, true))
    }

    /// Overwrite-or-create, persisted before returning.
    pub async fn set_role(&self, principal_id: &str, role: Role) -> Result<(), ConsoleError> {
        if principal_id == self.creator_id {
            return Err(ConsoleError::InvalidTarget(principal_id.to_string()));
        }
        let mut users = self.users.lock().await;
        let previous = users.insert(principal_id.to_string(), UserRecord { role });
        if let Err(e) = self.persist_locked(&users) {
            // keep memory and store in agreement
            match previous {
                Some(record) => users.insert(principal_id.to_string(), record),
                None => users.remove(principal_id),
            };
            return Err(e);
        }
        info!(principal = principal_id, role = role.as_str(), "rol actualizado");
        Ok(())
    }

    /// Delete-if-present, persisted before returning; reports whether a
    /// record existed.
    pub async fn remove(&self, principal_id: &str) -> Result<bool, ConsoleError> {
        if principal_id == self.creator_id {
            return Err(ConsoleError::InvalidTarget(principal_id.to_string()));
        }
        let mut users = self.users.lock().await;
        let Some(record) = users.remove(principal_id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist_locked(&users) {
            users.insert(principal_id.to_string(), record);
            return Err(e);
        }
        info!(principal = principal_id, "registro eliminado");
        Ok(true)
    }

    /// Full consistent snapshot in stable (sorted) order.
    pub async fn list(&self) -> Vec<(String, Role)> {
        let users = self.users.lock().await;
        users
            .iter()
            .map(|(id, record)| (id.clone(), record.role))
            .collect()
    }

    fn persist_locked(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), ConsoleError> {
        let doc = RegistryDocument {
            creator: self.creator_id.clone(),
            users: users.clone(),
        };
        self.store.persist(&doc)
    }
}
