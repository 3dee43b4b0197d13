//! Core types for the Project Lens calendar feed.
//!
//! This crate provides everything the feed server needs apart from HTTP:
//! - `record` types for the rows read from the project database
//! - `ics` calendar document output via the `icalendar` crate
//! - `feed` builder that turns joined records into a calendar document
//! - `store` port for reading records, with a PostgREST implementation

pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod ics;
pub mod record;
pub mod status;
pub mod store;
pub mod window;

pub use error::{LensError, LensResult};
pub use record::{ClientRef, DateRecord, OwnerProfile, ProjectRef};
