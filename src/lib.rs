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

//! celador: a role-gated chat administration console.
//!
//! This library provides the core logic for the celador console bot:
//! a user-lifecycle registry with a single operator-designated creator,
//! the access gate every inbound command must pass before its handler
//! runs, and the read-only reporting executor over the academic database.

pub mod config;
pub mod console;
pub mod core;
pub mod reports;
