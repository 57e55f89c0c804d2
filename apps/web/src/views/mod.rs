//! View-models: everything the pages display, derived from job snapshots
//! and backend payloads. Nothing here performs I/O.

pub mod aggregate;
pub mod charts;
pub mod layout;
pub mod pages;
pub mod table;
