// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage and publishing for the parking lottery.
//!
//! ## Store
//!
//! [`EntityStore`] is the narrow interface the lottery reads inputs from and
//! saves sessions to. [`MemoryStore`] implements it over a key-value map of
//! JSON documents with change subscription; a [`Dataset`] file seeds it.
//!
//! ## Publishing
//!
//! [`Publisher`] writes a [`PublicSnapshot`] of a completed session.
//! [`StorePublisher`] writes it back into the store under
//! `public/{companyTag}/{buildingId}`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod memory;
mod publish;
mod store;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreEvent};
pub use publish::{PublicEntry, PublicSnapshot, PublishOutcome, Publisher, StorePublisher};
pub use store::{Dataset, EntityStore, keys};
