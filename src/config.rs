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

use std::env;
use std::path::PathBuf;

use crate::core::constants::{env as env_keys, registry};
use crate::core::errors::ConsoleError;

/// Connection parameters for the read-only academic database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub ssl: bool,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    /// Identifier of the single operator-designated creator
    pub creator_id: String,
    pub users_file: PathBuf,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
    /// Absent when the reporting database is not configured
    pub db: Option<DbConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConsoleError> {
        let telegram_token = Self::require(env_keys::TELEGRAM_TOKEN)?;
        let creator_id = Self::require(env_keys::CREATOR_ID)?;
        if creator_id.parse::<i64>().is_err() {
            return Err(ConsoleError::Configuration(format!(
                "{} must be a numeric chat id",
                env_keys::CREATOR_ID
            )));
        }

        Ok(Self {
            telegram_token,
            creator_id,
            users_file: env::var(env_keys::USERS_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(registry::DEFAULT_USERS_FILE)),
            log_level: Self::get_or(env_keys::LOG_LEVEL, "info"),
            log_format: Self::get_or(env_keys::LOG_FORMAT, "text"),
            db: Self::db_from_env()?,
        })
    }

    /// The reporting database is optional: without `DB_USER` and `DB_NAME`
    /// the console runs with the reporting commands disabled.
    fn db_from_env() -> Result<Option<DbConfig>, ConsoleError> {
        let user = env::var(env_keys::DB_USER).ok().filter(|v| !v.is_empty());
        let dbname = env::var(env_keys::DB_NAME).ok().filter(|v| !v.is_empty());
        let (user, dbname) = match (user, dbname) {
            (Some(user), Some(dbname)) => (user, dbname),
            _ => return Ok(None),
        };

        let port = Self::get_or(env_keys::DB_PORT, "5432")
            .parse::<u16>()
            .map_err(|_| {
                ConsoleError::Configuration(format!("{} must be a port number", env_keys::DB_PORT))
            })?;

        Ok(Some(DbConfig {
            host: Self::get_or(env_keys::DB_HOST, "db"),
            port,
            user,
            password: Self::get_or(env_keys::DB_PASSWORD, ""),
            dbname,
            ssl: Self::get_or(env_keys::DB_SSL, "false") == "true",
        }))
    }

    fn require(key: &str) -> Result<String, ConsoleError> {
        env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConsoleError::Configuration(format!("{key} not set")))
    }

    fn get_or(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }
}
