/// # Test Utilities Module
///
/// Fixtures for unit tests: each `DatabaseFixture` owns a temporary directory
/// holding its own database file, so tests never share state.

use crate::core::db::{bootstrap, Database};
use tempfile::TempDir;

/// Isolated, connected database in a temporary directory
pub struct DatabaseFixture {
    pub db: Database,
    // Keeps the directory alive for the fixture's lifetime
    _dir: TempDir,
}

impl DatabaseFixture {
    /// Connected database with no tables
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut db = Database::new(dir.path().join("hotel.db"));
        db.connect().expect("connect to fixture database");
        DatabaseFixture { db, _dir: dir }
    }

    /// Connected database with the six hotel tables
    pub fn bootstrapped() -> Self {
        let fixture = Self::new();
        bootstrap(&fixture.db).expect("bootstrap schema");
        fixture
    }

    /// Bootstrapped database with one hotel, room type, service and room
    pub fn with_sample_data() -> Self {
        let fixture = Self::bootstrapped();
        fixture
            .db
            .execute(
                "INSERT INTO Hotels (name, address, phone_number, email, description) VALUES (?, ?, ?, ?, ?)",
                ("Grand", "1 Main St", 5551234, "a@b.com", "Seafront"),
            )
            .expect("insert hotel");
        fixture
            .db
            .execute(
                "INSERT INTO Types (name, area, single_beds, double_beds, price) VALUES (?, ?, ?, ?, ?)",
                ("Double", 24, 0, 1, 89.5),
            )
            .expect("insert type");
        fixture
            .db
            .execute(
                "INSERT INTO Services (breakfast, wifi, fridge, price) VALUES (?, ?, ?, ?)",
                (true, true, false, 12.0),
            )
            .expect("insert service");
        fixture
            .db
            .execute(
                "INSERT INTO Rooms (id_hotels, id_types, id_services, room_number) VALUES (?, ?, ?, ?)",
                (1, 1, 1, 101),
            )
            .expect("insert room");
        fixture
    }
}
