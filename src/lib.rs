// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod records;

#[cfg(test)]
mod test_utils;

pub use crate::core::db::{bootstrap, Cursor, Database, Row, Transaction, Value};
pub use crate::core::{HotelDbError, Result};
