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

//! celador constants - single source of truth for configuration values.

/// Configuration environment variables
pub mod env {
    pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
    pub const CREATOR_ID: &str = "CREATOR_ID";
    pub const USERS_FILE: &str = "USERS_FILE";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";
    pub const DB_NAME: &str = "DB_NAME";
    pub const DB_SSL: &str = "DB_SSL";
}

/// Transport and channel limits
pub mod limits {
    /// Capacity of the inbound event channel between poller and console
    pub const EVENT_CHANNEL_CAPACITY: usize = 32;
    /// Long-poll timeout passed to getUpdates, in seconds
    pub const POLL_TIMEOUT_SECS: u64 = 30;
    /// HTTP client timeout; must exceed the long-poll timeout
    pub const HTTP_TIMEOUT_SECS: u64 = 40;
    /// Backoff after a failed getUpdates call, in seconds
    pub const POLL_RETRY_SECS: u64 = 5;
    /// Maximum connections in the reporting database pool
    pub const DB_POOL_MAX: u32 = 5;
}

/// Registry file defaults
pub mod registry {
    /// Default path of the persisted user registry
    pub const DEFAULT_USERS_FILE: &str = "./users.json";
}
