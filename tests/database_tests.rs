//! Integration tests for the hotel database access layer
//!
//! These run against real database files in temporary directories and cover
//! the lifecycle, auto-commit persistence, empty results and foreign-key
//! enforcement on Rooms.

use hoteldb::core::db::{bootstrap, table_names, TABLES};
use hoteldb::{Database, HotelDbError, Value};
use rusqlite::ErrorCode;
use tempfile::TempDir;

fn bootstrapped_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::new(dir.path().join("hotel.db"));
    db.connect().unwrap();
    bootstrap(&db).unwrap();
    (dir, db)
}

fn insert_hotel(db: &Database) -> i64 {
    db.execute(
        "INSERT INTO Hotels (name, address, phone_number, email) VALUES (?, ?, ?, ?)",
        ("Grand", "1 Main St", 5551234, "a@b.com"),
    )
    .unwrap()
    .last_insert_rowid()
}

#[test]
fn test_insert_then_fetch_round_trip() {
    let (_dir, db) = bootstrapped_db();

    let cursor = db
        .execute(
            "INSERT INTO Hotels (name, address, phone_number, email) VALUES (?, ?, ?, ?)",
            ("Grand", "1 Main St", 5551234, "a@b.com"),
        )
        .unwrap();
    assert_eq!(cursor.rows_affected(), 1);

    let row = db
        .fetchone("SELECT name FROM Hotels WHERE id_hotels = ?", (1,))
        .unwrap()
        .expect("hotel row");
    assert_eq!(row["name"], Value::Text("Grand".to_string()));
}

#[test]
fn test_empty_results() {
    let (_dir, db) = bootstrapped_db();

    let rows = db.fetchall("SELECT * FROM Rooms WHERE room_number = ?", [404]).unwrap();
    assert!(rows.is_empty());

    let row = db.fetchone("SELECT * FROM Hotels WHERE id_hotels = ?", [1]).unwrap();
    assert!(row.is_none());
}

#[test]
fn test_fetchall_preserves_order() {
    let (_dir, db) = bootstrapped_db();
    for name in ["Alpha", "Bravo", "Charlie"] {
        db.execute(
            "INSERT INTO Hotels (name, address, phone_number, email) VALUES (?, ?, ?, ?)",
            (name, "addr", 1, "x@y.z"),
        )
        .unwrap();
    }

    let names: Vec<String> = db
        .fetchall("SELECT name FROM Hotels ORDER BY name DESC", [])
        .unwrap()
        .iter()
        .map(|row| row.get_as("name").unwrap())
        .collect();
    assert_eq!(names, ["Charlie", "Bravo", "Alpha"]);
}

#[test]
fn test_writes_persist_across_reconnect() {
    let (_dir, mut db) = bootstrapped_db();
    insert_hotel(&db);
    db.close().unwrap();

    let mut reopened = Database::new(db.path());
    reopened.connect().unwrap();
    let row = reopened.fetchone("SELECT email FROM Hotels", []).unwrap().unwrap();
    assert_eq!(row["email"].as_str(), Some("a@b.com"));
}

#[test]
fn test_bootstrap_twice_keeps_one_of_each_table() {
    let (_dir, db) = bootstrapped_db();
    insert_hotel(&db);
    bootstrap(&db).unwrap();

    let names = table_names(&db).unwrap();
    for (table, _) in TABLES {
        assert_eq!(names.iter().filter(|n| *n == table).count(), 1, "table {table}");
    }
    // Existing data survives a second bootstrap
    assert_eq!(db.fetchall("SELECT * FROM Hotels", []).unwrap().len(), 1);
}

#[test]
fn test_room_with_unknown_hotel_is_rejected() {
    let (_dir, db) = bootstrapped_db();

    let err = db
        .execute(
            "INSERT INTO Rooms (id_hotels, id_types, id_services, room_number) VALUES (?, ?, ?, ?)",
            (99, 1, 1, 101),
        )
        .unwrap_err();
    assert_eq!(err.sqlite_code(), Some(ErrorCode::ConstraintViolation));
    assert!(err.to_string().contains("FOREIGN KEY"));
    assert!(db.fetchall("SELECT * FROM Rooms", []).unwrap().is_empty());
}

#[test]
fn test_room_insert_in_transaction() {
    let (_dir, mut db) = bootstrapped_db();

    let room_id = db
        .transaction(|tx| {
            let hotel = tx
                .execute(
                    "INSERT INTO Hotels (name, address, phone_number, email) VALUES (?, ?, ?, ?)",
                    ("Grand", "1 Main St", 5551234, "a@b.com"),
                )?
                .last_insert_rowid();
            let room_type = tx
                .execute(
                    "INSERT INTO Types (name, area, single_beds, double_beds, price) VALUES (?, ?, ?, ?, ?)",
                    ("Single", 14, 1, 0, 49.0),
                )?
                .last_insert_rowid();
            let service = tx
                .execute(
                    "INSERT INTO Services (breakfast, wifi, fridge, price) VALUES (?, ?, ?, ?)",
                    (false, true, true, 5.5),
                )?
                .last_insert_rowid();
            Ok(tx
                .execute(
                    "INSERT INTO Rooms (id_hotels, id_types, id_services, room_number) VALUES (?, ?, ?, ?)",
                    (hotel, room_type, service, 12),
                )?
                .last_insert_rowid())
        })
        .unwrap();
    assert_eq!(room_id, 1);

    // A failing room rolls back the hotel inserted with it
    let result = db.transaction(|tx| {
        tx.execute(
            "INSERT INTO Hotels (name, address, phone_number, email) VALUES (?, ?, ?, ?)",
            ("Annex", "2 Main St", 5550000, "b@b.com"),
        )?;
        tx.execute(
            "INSERT INTO Rooms (id_hotels, id_types, id_services, room_number) VALUES (?, ?, ?, ?)",
            (1, 77, 1, 13),
        )?;
        Ok(())
    });
    assert!(matches!(result, Err(HotelDbError::Database(_))));
    assert_eq!(db.fetchall("SELECT * FROM Hotels", []).unwrap().len(), 1);
    assert_eq!(db.fetchall("SELECT * FROM Rooms", []).unwrap().len(), 1);
}

#[test]
fn test_driver_errors_are_unchanged() {
    let (_dir, db) = bootstrapped_db();

    let err = db.execute("SELEC name FROM Hotels", []).unwrap_err();
    match &err {
        HotelDbError::Database(inner) => assert_eq!(err.to_string(), inner.to_string()),
        other => panic!("Expected Database error, got {other:?}"),
    }

    let err = db
        .execute("INSERT INTO Hotels (name) VALUES (?)", ["Nameless"])
        .unwrap_err();
    assert_eq!(err.sqlite_code(), Some(ErrorCode::ConstraintViolation));
}

#[test]
fn test_multiple_statements_run_nothing() {
    let (_dir, db) = bootstrapped_db();

    let err = db.execute("CREATE TABLE a (x); CREATE TABLE b (y)", []).unwrap_err();
    assert!(matches!(err, HotelDbError::Database(rusqlite::Error::MultipleStatement)));

    let names = table_names(&db).unwrap();
    assert!(!names.iter().any(|n| n == "a" || n == "b"));
}

#[test]
fn test_empty_text_returns_empty_cursor() {
    let (_dir, db) = bootstrapped_db();
    insert_hotel(&db);

    for sql in ["", "-- nothing"] {
        let cursor = db.execute(sql, []).unwrap();
        assert_eq!(cursor.rows_affected(), 0);
        assert!(cursor.fetchall().is_empty());
        assert!(db.fetchone(sql, []).unwrap().is_none());
    }
}

#[test]
fn test_invalid_text_surfaces_driver_error() {
    let (_dir, db) = bootstrapped_db();

    let err = db.fetchone("SELECT CAST(X'FF41' AS TEXT) AS t", []).unwrap_err();
    assert!(matches!(err, HotelDbError::Database(rusqlite::Error::FromSqlConversionFailure(..))));
}
