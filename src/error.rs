//  Copyright 2024 Foyer Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use thiserror::Error;

/// Errors surfaced while recognizing construction-time configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unrecognized eviction policy: {0}")]
    UnknownPolicy(String),
}

/// Observable outcomes of [`crate::cache::Cache::insert`].
///
/// Lookup, remove, scan, and clear are total over their inputs and never
/// fail; only insert has a distinguishable failure surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    #[error("key must not be empty")]
    EmptyKey,
    #[error("key already present")]
    Duplicate,
    #[error("allocation failed")]
    Allocation,
}
