// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidBuilding(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid building: test");

    let err: DomainError = DomainError::InvalidParticipant {
        participant_id: String::from("p-1"),
        reason: String::from("Name cannot be empty"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid participant 'p-1': Name cannot be empty"
    );

    let err: DomainError = DomainError::InvalidSpot {
        spot_id: String::from("s-1"),
        reason: String::from("Spot number cannot be empty"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid parking spot 's-1': Spot number cannot be empty"
    );

    let err: DomainError = DomainError::DuplicateParticipantId(String::from("p-1"));
    assert_eq!(format!("{err}"), "Participant 'p-1' appears more than once");

    let err: DomainError = DomainError::DuplicateSpotId(String::from("s-1"));
    assert_eq!(format!("{err}"), "Parking spot 's-1' appears more than once");

    let err: DomainError = DomainError::BuildingMismatch {
        entity_id: String::from("s-1"),
        expected: String::from("b-1"),
        found: String::from("b-2"),
    };
    assert_eq!(
        format!("{err}"),
        "'s-1' belongs to building 'b-2', expected 'b-1'"
    );
}
