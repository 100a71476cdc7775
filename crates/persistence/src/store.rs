// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use parking_lottery::LotterySession;
use parking_lottery_domain::{Building, ParkingSpot, Participant};
use serde::{Deserialize, Serialize};

/// Read/write access to the entities a draw consumes and produces.
///
/// Only the operations the lottery needs; the store behind it is free to
/// hold anything else.
pub trait EntityStore {
    /// Loads a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the building does not exist or cannot be decoded.
    fn building(&self, id: &str) -> Result<Building, StoreError>;

    /// Loads every participant of a building, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored participant cannot be decoded.
    fn participants(&self, building_id: &str) -> Result<Vec<Participant>, StoreError>;

    /// Loads every parking spot of a building regardless of status, ordered
    /// by id.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored spot cannot be decoded.
    fn parking_spots(&self, building_id: &str) -> Result<Vec<ParkingSpot>, StoreError>;

    /// Stores a session, replacing any previous version with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be encoded.
    fn save_session(&self, session: &LotterySession) -> Result<(), StoreError>;

    /// Loads a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or cannot be decoded.
    fn session(&self, id: &str) -> Result<LotterySession, StoreError>;
}

/// A JSON document holding the entities of one or more buildings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub parking_spots: Vec<ParkingSpot>,
}

impl Dataset {
    /// Parses a dataset document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid dataset JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|err| StoreError::InvalidDataset(err.to_string()))
    }
}

/// Store key layout.
pub mod keys {
    #[must_use]
    pub fn building(id: &str) -> String {
        format!("buildings/{id}")
    }

    /// Prefix shared by all participants of a building.
    #[must_use]
    pub fn participants(building_id: &str) -> String {
        format!("participants/{building_id}/")
    }

    #[must_use]
    pub fn participant(building_id: &str, id: &str) -> String {
        format!("{}{id}", participants(building_id))
    }

    /// Prefix shared by all parking spots of a building.
    #[must_use]
    pub fn parking_spots(building_id: &str) -> String {
        format!("parkingSpots/{building_id}/")
    }

    #[must_use]
    pub fn parking_spot(building_id: &str, id: &str) -> String {
        format!("{}{id}", parking_spots(building_id))
    }

    #[must_use]
    pub fn session(id: &str) -> String {
        format!("sessions/{id}")
    }

    /// Where the public projection of a building's latest draw lives.
    #[must_use]
    pub fn public(company_tag: &str, building_id: &str) -> String {
        format!("public/{company_tag}/{building_id}")
    }
}
