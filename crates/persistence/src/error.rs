// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entity of this kind with this id.
    NotFound {
        /// Entity kind, e.g. "building".
        kind: &'static str,
        /// The identifier looked up.
        id: String,
    },
    /// Serialization/deserialization error.
    SerializationError(String),
    /// The dataset could not be loaded.
    InvalidDataset(String),
    /// A writer panicked while holding the store lock.
    LockPoisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InvalidDataset(msg) => write!(f, "Invalid dataset: {msg}"),
            Self::LockPoisoned => write!(f, "Store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
