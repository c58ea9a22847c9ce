//! Contact and group domain model.
//!
//! # Responsibility
//! - Define the two persisted record shapes and their editable draft.
//! - Own identifier and display-color generation.
//!
//! # Invariants
//! - Every record is identified by a stable id that is never reassigned.
//! - A contact's `group_id` is a soft reference; dangling values are legal.

pub mod contact;
pub mod group;
pub mod id;
pub mod palette;
