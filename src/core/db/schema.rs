/// Schema Module
///
/// The hotel-booking schema: static DDL for the six tables, an idempotent
/// bootstrap, and read-only introspection of what a database file contains.

use crate::core::db::connection::Database;
use crate::core::Result;
use std::collections::BTreeMap;
use tracing::info;

pub const EMPLOYEES_DDL: &str = "
CREATE TABLE IF NOT EXISTS Employees (
    id_employees INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    sex TEXT NOT NULL,
    birthday TEXT NOT NULL,
    email TEXT NOT NULL,
    phone_number INTEGER NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL
)";

pub const CUSTOMERS_DDL: &str = "
CREATE TABLE IF NOT EXISTS Customers (
    id_customers INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    sex TEXT NOT NULL,
    birthday TEXT NOT NULL,
    email TEXT NOT NULL,
    phone_number INTEGER NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL
)";

pub const HOTELS_DDL: &str = "
CREATE TABLE IF NOT EXISTS Hotels (
    id_hotels INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    phone_number INTEGER NOT NULL,
    email TEXT NOT NULL,
    description TEXT
)";

pub const TYPES_DDL: &str = "
CREATE TABLE IF NOT EXISTS Types (
    id_types INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    area INTEGER NOT NULL,
    single_beds INTEGER NOT NULL,
    double_beds INTEGER NOT NULL,
    price REAL NOT NULL,
    description TEXT
)";

pub const SERVICES_DDL: &str = "
CREATE TABLE IF NOT EXISTS Services (
    id_services INTEGER PRIMARY KEY AUTOINCREMENT,
    breakfast BOOLEAN NOT NULL,
    wifi BOOLEAN NOT NULL,
    fridge BOOLEAN NOT NULL,
    price REAL NOT NULL,
    description TEXT
)";

pub const ROOMS_DDL: &str = "
CREATE TABLE IF NOT EXISTS Rooms (
    id_rooms INTEGER PRIMARY KEY AUTOINCREMENT,
    id_hotels INTEGER NOT NULL,
    id_types INTEGER NOT NULL,
    id_services INTEGER NOT NULL,
    room_number INTEGER NOT NULL,
    FOREIGN KEY (id_hotels) REFERENCES Hotels(id_hotels),
    FOREIGN KEY (id_types) REFERENCES Types(id_types),
    FOREIGN KEY (id_services) REFERENCES Services(id_services)
)";

/// Table names paired with their DDL, parents before Rooms.
pub const TABLES: [(&str, &str); 6] = [
    ("Employees", EMPLOYEES_DDL),
    ("Customers", CUSTOMERS_DDL),
    ("Hotels", HOTELS_DDL),
    ("Types", TYPES_DDL),
    ("Services", SERVICES_DDL),
    ("Rooms", ROOMS_DDL),
];

/// Creates any of the six hotel tables that do not exist yet.
///
/// Safe to run repeatedly against the same file.
pub fn bootstrap(db: &Database) -> Result<()> {
    for (name, ddl) in TABLES {
        db.execute(ddl, [])?;
        info!(table = name, "table ready");
    }
    Ok(())
}

/// Names of all user tables, sorted.
pub fn table_names(db: &Database) -> Result<Vec<String>> {
    db.fetchall(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
        [],
    )?
    .iter()
    .map(|row| row.get_as::<String>("name"))
    .collect()
}

/// Represents a foreign key relationship
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// The column in this table that is the foreign key
    pub from_column: String,
    /// The table this foreign key references
    pub referenced_table: String,
    /// The referenced column; `None` when the key targets the primary key implicitly
    pub to_column: Option<String>,
}

/// Represents a table column with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Declared type (e.g., "INTEGER", "TEXT", "REAL", "BOOLEAN")
    pub type_name: String,
    pub notnull: bool,
    /// Whether this column is part of the primary key
    pub pk: bool,
    pub dflt_value: Option<String>,
}

/// Represents a table with its columns and outgoing foreign keys
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Introspects `name` through the table-valued pragma functions.
    pub fn load(db: &Database, name: &str) -> Result<Self> {
        let columns = db
            .fetchall(
                r#"SELECT name, type, "notnull", dflt_value, pk
                   FROM pragma_table_info(?1) ORDER BY cid"#,
                [name],
            )?
            .iter()
            .map(|row| {
                Ok(Column {
                    name: row.get_as("name")?,
                    type_name: row.get_as("type")?,
                    notnull: row.get_as::<i64>("notnull")? != 0,
                    pk: row.get_as::<i64>("pk")? != 0,
                    dflt_value: row.get_as("dflt_value")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let foreign_keys = db
            .fetchall(
                r#"SELECT "from", "table", "to"
                   FROM pragma_foreign_key_list(?1) ORDER BY id, seq"#,
                [name],
            )?
            .iter()
            .map(|row| {
                Ok(ForeignKey {
                    from_column: row.get_as("from")?,
                    referenced_table: row.get_as("table")?,
                    to_column: row.get_as("to")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Table {
            name: name.to_string(),
            columns,
            foreign_keys,
        })
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Every user table in a database, keyed by name
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    pub fn from_database(db: &Database) -> Result<Self> {
        let mut tables = BTreeMap::new();
        for name in table_names(db)? {
            let table = Table::load(db, &name)?;
            tables.insert(name, table);
        }
        Ok(Schema { tables })
    }
}
