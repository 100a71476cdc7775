// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory key-value store.
//!
//! Values are JSON documents under string keys (see [`crate::keys`]). Every
//! `set` is announced on a broadcast channel so observers such as a live
//! results view can follow changes without polling.

use crate::error::StoreError;
use crate::store::{Dataset, EntityStore, keys};
use parking_lottery::LotterySession;
use parking_lottery_domain::{Building, ParkingSpot, Participant};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Buffered change notifications per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Notification that a key was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
}

/// Thread-safe in-memory store.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    /// Creates a store holding every entity of a dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity cannot be encoded.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, StoreError> {
        let store: Self = Self::new();
        for building in &dataset.buildings {
            store.set_as(&keys::building(&building.id), building)?;
        }
        for participant in &dataset.participants {
            store.set_as(
                &keys::participant(&participant.building_id, &participant.id),
                participant,
            )?;
        }
        for spot in &dataset.parking_spots {
            store.set_as(&keys::parking_spot(&spot.building_id, &spot.id), spot)?;
        }

        info!(
            buildings = dataset.buildings.len(),
            participants = dataset.participants.len(),
            parking_spots = dataset.parking_spots.len(),
            "Loaded dataset into store"
        );
        Ok(store)
    }

    /// Reads a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// Writes a raw value and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        {
            let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
            entries.insert(key.to_string(), value);
        }
        debug!(key, "Stored value");
        // No subscribers is fine.
        let _ = self.events.send(StoreEvent {
            key: key.to_string(),
        });
        Ok(())
    }

    /// Reads and decodes a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or the value does not decode.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.get(key)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    /// Encodes and writes a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or the value does not encode.
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set(key, serde_json::to_value(value)?)
    }

    /// Decodes every value whose key starts with `prefix`, in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or a value does not decode.
    pub fn values_with_prefix<T: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<T>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| serde_json::from_value(value.clone()).map_err(StoreError::from))
            .collect()
    }

    /// Subscribes to change notifications for every later `set`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn require<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        id: &str,
        key: &str,
    ) -> Result<T, StoreError> {
        self.get_as(key)?.ok_or_else(|| StoreError::NotFound {
            kind,
            id: id.to_string(),
        })
    }
}

impl EntityStore for MemoryStore {
    fn building(&self, id: &str) -> Result<Building, StoreError> {
        self.require("building", id, &keys::building(id))
    }

    fn participants(&self, building_id: &str) -> Result<Vec<Participant>, StoreError> {
        self.values_with_prefix(&keys::participants(building_id))
    }

    fn parking_spots(&self, building_id: &str) -> Result<Vec<ParkingSpot>, StoreError> {
        self.values_with_prefix(&keys::parking_spots(building_id))
    }

    fn save_session(&self, session: &LotterySession) -> Result<(), StoreError> {
        self.set_as(&keys::session(&session.id), session)?;
        info!(session_id = %session.id, "Saved lottery session");
        Ok(())
    }

    fn session(&self, id: &str) -> Result<LotterySession, StoreError> {
        self.require("session", id, &keys::session(id))
    }
}
