//! This crate implements the Gottesdienst formatter for the Boyens Medien bulletin.
//! It converts church-service schedules, either a spreadsheet export or events from
//! the ChurchDesk calendar API, into the plain-text format the newspaper prints.
//!
//! The remote events are read from <https://api2.churchdesk.com/api/v3.0.0>.

pub mod boyens;
pub mod churchdesk_client;
pub mod error;
pub mod event;
pub mod spreadsheet;

pub use error::{GdfError, Result};
