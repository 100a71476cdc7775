// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A sector label resolved from an optional stored string.
///
/// `Unassigned` is a wildcard: it matches every sector filter. It is never
/// treated as a sector literally named "null" or "".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Sector {
    /// A named sector.
    Named(String),
    /// No sector recorded.
    #[default]
    Unassigned,
}

impl Sector {
    /// Resolves a stored sector label. Blank labels are `Unassigned`.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some(name) if !name.is_empty() => Self::Named(name.to_string()),
            _ => Self::Unassigned,
        }
    }

    /// Returns the sector name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Unassigned => None,
        }
    }

    /// Returns whether this sector passes a filter for `sector`.
    ///
    /// Unassigned sectors pass every filter.
    #[must_use]
    pub fn admits(&self, sector: &str) -> bool {
        match self {
            Self::Named(name) => name == sector,
            Self::Unassigned => true,
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Unassigned => write!(f, "(unassigned)"),
        }
    }
}

/// A category tag carried by a parking spot.
///
/// Tags arrive as free-form strings from the store. Known tags are parsed
/// case-insensitively, with or without the "Vaga " prefix; anything else is
/// preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpotType {
    /// Accessible spot reserved for PcD participants.
    Pcd,
    /// Spot intended for elderly residents.
    Elderly,
    /// Large spot.
    Large,
    /// Small spot.
    Small,
    /// Motorcycle spot.
    Motorcycle,
    /// Linked ("presa") spot, blocked by or blocking another spot.
    Linked,
    /// Free-access ("livre") spot.
    Free,
    /// Common spot.
    Common,
    /// Legacy coverage tag "Vaga Coberta".
    Covered,
    /// Legacy coverage tag "Vaga Descoberta".
    Uncovered,
    /// Unrecognized tag, kept as stored.
    Other(String),
}

impl SpotType {
    /// Returns the canonical stored label for this tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pcd => "PcD",
            Self::Elderly => "Idoso",
            Self::Large => "Grande",
            Self::Small => "Pequena",
            Self::Motorcycle => "Motocicleta",
            Self::Linked => "Presa",
            Self::Free => "Livre",
            Self::Common => "Comum",
            Self::Covered => "Vaga Coberta",
            Self::Uncovered => "Vaga Descoberta",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for SpotType {
    fn from(label: String) -> Self {
        let lowered: String = label.trim().to_lowercase();
        let bare: &str = lowered.strip_prefix("vaga ").unwrap_or(&lowered).trim();
        match bare {
            "pcd" => Self::Pcd,
            "idoso" => Self::Elderly,
            "grande" => Self::Large,
            "pequena" => Self::Small,
            "motocicleta" | "moto" => Self::Motorcycle,
            "presa" => Self::Linked,
            "livre" => Self::Free,
            "comum" => Self::Common,
            "coberta" => Self::Covered,
            "descoberta" => Self::Uncovered,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for SpotType {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<SpotType> for String {
    fn from(spot_type: SpotType) -> Self {
        spot_type.as_str().to_string()
    }
}

/// Occupancy status of a parking spot. Only `Available` spots enter a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    /// Free to be drawn.
    #[default]
    Available,
    /// Already taken outside the draw.
    Occupied,
    /// Held back by management.
    Reserved,
}

impl SpotStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Allocation priority tier of a participant.
///
/// Variants are declared from highest to lowest priority, so the derived
/// `Ord` sorts higher tiers first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityTier {
    /// Participant with special needs.
    Pcd,
    /// Elderly participant.
    Elderly,
    /// Participant explicitly up to date on dues.
    UpToDate,
    /// Everyone else.
    Normal,
}

impl PriorityTier {
    /// Converts this tier to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pcd => "pcd",
            Self::Elderly => "elderly",
            Self::UpToDate => "up-to-date",
            Self::Normal => "normal",
        }
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A condominium building whose spots are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Store identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Declared sector names, in display order.
    #[serde(default)]
    pub sectors: Vec<String>,
    /// Home sector → nearby sectors, nearest first.
    #[serde(default)]
    pub sector_proximity: BTreeMap<String, Vec<String>>,
}

impl Building {
    /// Creates a building with no declared sectors.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sectors: Vec::new(),
            sector_proximity: BTreeMap::new(),
        }
    }
}

const fn default_number_of_spots() -> u32 {
    1
}

/// A resident taking part in a draw.
///
/// Read-only while a draw runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Participant {
    /// Store identifier.
    pub id: String,
    /// Building this participant belongs to.
    pub building_id: String,
    /// Block or tower label.
    #[serde(default)]
    pub block: String,
    /// Unit number.
    #[serde(default)]
    pub unit: String,
    /// Resident name.
    pub name: String,
    /// PcD flag.
    #[serde(default)]
    pub has_special_needs: bool,
    #[serde(default)]
    pub is_elderly: bool,
    /// `Some(false)` marks a defaulter; absent means unknown, not a defaulter.
    #[serde(default)]
    pub is_up_to_date: Option<bool>,
    #[serde(default)]
    pub has_small_car: bool,
    #[serde(default)]
    pub has_large_car: bool,
    #[serde(default)]
    pub has_motorcycle: bool,
    #[serde(default)]
    pub prefers_common_spot: bool,
    #[serde(default)]
    pub prefers_covered: bool,
    #[serde(default)]
    pub prefers_uncovered: bool,
    #[serde(default)]
    pub prefers_linked_spot: bool,
    #[serde(default)]
    pub prefers_unlinked_spot: bool,
    #[serde(default)]
    pub prefers_small_spot: bool,
    /// Number of spots requested.
    #[serde(default = "default_number_of_spots")]
    pub number_of_spots: u32,
    /// Acceptable floors; order carries no meaning.
    #[serde(default)]
    pub preferred_floors: BTreeSet<String>,
    /// Preferred sectors, most preferred first.
    #[serde(default)]
    pub preferred_sectors: Vec<String>,
    /// Home sector.
    #[serde(default)]
    pub sector: Option<String>,
    /// Co-allocation group. Informational only.
    #[serde(default)]
    pub group_id: Option<String>,
}

impl Participant {
    /// Creates a participant with one requested spot and no flags set.
    #[must_use]
    pub fn new(id: &str, building_id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            building_id: building_id.to_string(),
            block: String::new(),
            unit: String::new(),
            name: name.to_string(),
            has_special_needs: false,
            is_elderly: false,
            is_up_to_date: None,
            has_small_car: false,
            has_large_car: false,
            has_motorcycle: false,
            prefers_common_spot: false,
            prefers_covered: false,
            prefers_uncovered: false,
            prefers_linked_spot: false,
            prefers_unlinked_spot: false,
            prefers_small_spot: false,
            number_of_spots: default_number_of_spots(),
            preferred_floors: BTreeSet::new(),
            preferred_sectors: Vec::new(),
            sector: None,
            group_id: None,
        }
    }

    /// Returns a display label such as "Bloco A / 101 - Maria".
    #[must_use]
    pub fn label(&self) -> String {
        match (self.block.is_empty(), self.unit.is_empty()) {
            (true, true) => self.name.clone(),
            (true, false) => format!("{} - {}", self.unit, self.name),
            (false, true) => format!("{} - {}", self.block, self.name),
            (false, false) => format!("{} / {} - {}", self.block, self.unit, self.name),
        }
    }
}

/// A parking spot as stored.
///
/// Coverage is recorded twice for historical reasons: as a tag in `spot_type`
/// and as the `is_covered`/`is_uncovered` booleans. Use
/// [`crate::SpotCoverage`] to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    /// Store identifier.
    pub id: String,
    /// Building this spot belongs to.
    pub building_id: String,
    /// Painted spot number.
    pub number: String,
    /// Floor label.
    #[serde(default)]
    pub floor: String,
    /// Sector label; blank or absent means wildcard.
    #[serde(default)]
    pub sector: Option<String>,
    /// Category tags.
    #[serde(rename = "type", default)]
    pub spot_type: BTreeSet<SpotType>,
    #[serde(default)]
    pub is_covered: bool,
    #[serde(default)]
    pub is_uncovered: bool,
    #[serde(default)]
    pub status: SpotStatus,
    #[serde(default)]
    pub size: Option<String>,
}

impl ParkingSpot {
    /// Creates an available spot with no tags, sector or coverage.
    #[must_use]
    pub fn new(id: &str, building_id: &str, number: &str) -> Self {
        Self {
            id: id.to_string(),
            building_id: building_id.to_string(),
            number: number.to_string(),
            floor: String::new(),
            sector: None,
            spot_type: BTreeSet::new(),
            is_covered: false,
            is_uncovered: false,
            status: SpotStatus::Available,
            size: None,
        }
    }

    /// Returns whether this spot carries the given tag.
    #[must_use]
    pub fn has_type(&self, spot_type: &SpotType) -> bool {
        self.spot_type.contains(spot_type)
    }
}
