/// Database Module
///
/// This module provides the SQLite access layer for hoteldb, organized into
/// focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): the `Database` lifecycle,
///   auto-commit execution and scoped transactions
/// - **Query Results** (`query.rs`): `Value`, `Row` and `Cursor`
/// - **Schema** (`schema.rs`): the hotel DDL bootstrap and introspection
///
/// ## Error Handling
///
/// All operations return `HotelDbError`. Driver failures are passed through
/// as `HotelDbError::Database` without rewording.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
