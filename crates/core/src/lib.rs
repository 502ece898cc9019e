//! Core business logic for fieldshare.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All share-split rules and period aggregation live here; data access and
//! configuration storage are collaborators reached through traits.
//!
//! # Modules
//!
//! - `share` - Farmer/owner share-split calculation
//! - `period` - Date windows and period aggregation
//! - `statement` - Field statements built from collaborator sources

pub mod period;
pub mod share;
pub mod statement;
