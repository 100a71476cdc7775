// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a change: a syndic
/// running the draw, a manager editing a published session, or the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "syndic", "manager", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor used for unattended runs.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., assembly minute, ticket).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`RunDraw`", "`ReassignSpot`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact textual snapshot of session state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A `key=value` rendering of the relevant state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// What an audit event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditScope {
    /// The building whose spots were drawn.
    pub building_id: String,
    /// The lottery session, once one exists.
    pub session_id: Option<String>,
}

impl AuditScope {
    /// Scope for a specific session.
    #[must_use]
    pub fn session(building_id: &str, session_id: &str) -> Self {
        Self {
            building_id: building_id.to_string(),
            session_id: Some(session_id.to_string()),
        }
    }
}

/// An immutable audit event representing a change to lottery state.
///
/// Every completed draw and every applied session edit produces exactly one
/// audit event capturing who, why, what, and the state before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The actor who initiated this change.
    pub actor: Actor,
    /// The cause or reason for this change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the change.
    pub before: StateSnapshot,
    /// The state after the change.
    pub after: StateSnapshot,
    /// The building and session this event belongs to.
    pub scope: AuditScope,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        scope: AuditScope,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            scope,
        }
    }
}
