//! Typed records for the hotel tables.
//!
//! Each struct mirrors one table and decodes from a `Row` whose columns use
//! the table's names. Select the columns explicitly or use `SELECT *`.

use crate::core::db::{Database, Row};
use crate::core::Result;
use serde::Serialize;

/// Decoding of a result row into a typed record
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

/// Runs `query` and decodes every row as `T`.
pub fn fetch_all_as<T: FromRow, P: rusqlite::Params>(db: &Database, query: &str, params: P) -> Result<Vec<T>> {
    db.fetchall(query, params)?.iter().map(T::from_row).collect()
}

/// Runs `query` and decodes the first row as `T`, if there is one.
pub fn fetch_one_as<T: FromRow, P: rusqlite::Params>(db: &Database, query: &str, params: P) -> Result<Option<T>> {
    db.fetchone(query, params)?.as_ref().map(T::from_row).transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id_employees: i64,
    pub name: String,
    pub sex: String,
    pub birthday: String,
    pub email: String,
    pub phone_number: i64,
    pub username: String,
    pub password: String,
}

impl FromRow for Employee {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Employee {
            id_employees: row.get_as("id_employees")?,
            name: row.get_as("name")?,
            sex: row.get_as("sex")?,
            birthday: row.get_as("birthday")?,
            email: row.get_as("email")?,
            phone_number: row.get_as("phone_number")?,
            username: row.get_as("username")?,
            password: row.get_as("password")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id_customers: i64,
    pub name: String,
    pub sex: String,
    pub birthday: String,
    pub email: String,
    pub phone_number: i64,
    pub username: String,
    pub password: String,
}

impl FromRow for Customer {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Customer {
            id_customers: row.get_as("id_customers")?,
            name: row.get_as("name")?,
            sex: row.get_as("sex")?,
            birthday: row.get_as("birthday")?,
            email: row.get_as("email")?,
            phone_number: row.get_as("phone_number")?,
            username: row.get_as("username")?,
            password: row.get_as("password")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotel {
    pub id_hotels: i64,
    pub name: String,
    pub address: String,
    pub phone_number: i64,
    pub email: String,
    pub description: Option<String>,
}

impl FromRow for Hotel {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Hotel {
            id_hotels: row.get_as("id_hotels")?,
            name: row.get_as("name")?,
            address: row.get_as("address")?,
            phone_number: row.get_as("phone_number")?,
            email: row.get_as("email")?,
            description: row.get_as("description")?,
        })
    }
}

/// A room category (table `Types`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomType {
    pub id_types: i64,
    pub name: String,
    pub area: i64,
    pub single_beds: i64,
    pub double_beds: i64,
    pub price: f64,
    pub description: Option<String>,
}

impl FromRow for RoomType {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(RoomType {
            id_types: row.get_as("id_types")?,
            name: row.get_as("name")?,
            area: row.get_as("area")?,
            single_beds: row.get_as("single_beds")?,
            double_beds: row.get_as("double_beds")?,
            price: row.get_as("price")?,
            description: row.get_as("description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id_services: i64,
    pub breakfast: bool,
    pub wifi: bool,
    pub fridge: bool,
    pub price: f64,
    pub description: Option<String>,
}

impl FromRow for Service {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Service {
            id_services: row.get_as("id_services")?,
            breakfast: row.get_as("breakfast")?,
            wifi: row.get_as("wifi")?,
            fridge: row.get_as("fridge")?,
            price: row.get_as("price")?,
            description: row.get_as("description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id_rooms: i64,
    pub id_hotels: i64,
    pub id_types: i64,
    pub id_services: i64,
    pub room_number: i64,
}

impl FromRow for Room {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Room {
            id_rooms: row.get_as("id_rooms")?,
            id_hotels: row.get_as("id_hotels")?,
            id_types: row.get_as("id_types")?,
            id_services: row.get_as("id_services")?,
            room_number: row.get_as("room_number")?,
        })
    }
}
