//! Query services over the entity store.
//!
//! # Responsibility
//! - Compose store lookups into the dispatch views consumed by callers.
//! - Keep age classification and grouping rules in one place.

pub mod age;
pub mod dispatch_service;
pub mod dto;
