//! Core types and algorithms for the rota duty roster.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the roster data model, the assignment engine that fills a three-month
//! window of Sundays from eligibility pools, and the duplicate checker that
//! validates a hand-edited roster. Persistence and rendering are reached only
//! through the [`store::RosterStore`] and [`render::RosterRenderer`] traits.

pub mod calendar;
pub mod duplicates;
pub mod editor;
pub mod engine;
pub mod error;
pub mod fairness;
pub mod field;
pub mod lookup;
pub mod month;
pub mod person;
pub mod pool;
pub mod render;
pub mod role;
pub mod row;
pub mod selector;
pub mod snapshot;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
