//! Schema literals for the registry's three importable entities.

use std::fmt;
use std::str::FromStr;

use crate::types::{ColumnSpec, EntitySchema, FieldKind};

/// Registered owners. Every row gets a fresh identifier.
pub fn owners() -> EntitySchema {
    EntitySchema {
        table: "owners".to_string(),
        generate_id: true,
        natural_key: keys(&["name", "country", "state", "city"]),
        columns: vec![
            ColumnSpec::new("name", FieldKind::String),
            ColumnSpec::new("country", FieldKind::String),
            ColumnSpec::new("state", FieldKind::String),
            ColumnSpec::new("city", FieldKind::String),
        ],
    }
}

/// Individual cars, with factory, shipping and first-sale details.
pub fn cars() -> EntitySchema {
    EntitySchema {
        table: "cars".to_string(),
        generate_id: true,
        natural_key: keys(&["vin", "edition_id", "sequence"]),
        columns: vec![
            ColumnSpec::new("vin", FieldKind::String),
            ColumnSpec::new("color", FieldKind::String),
            ColumnSpec::new("edition_id", FieldKind::Reference),
            ColumnSpec::new("sequence", FieldKind::Integer),
            ColumnSpec::new("destroyed", FieldKind::Boolean),
            ColumnSpec::new("manufacture_date", FieldKind::Timestamp),
            ColumnSpec::new("shipping_date", FieldKind::Timestamp),
            ColumnSpec::new("shipping_location", FieldKind::String),
            ColumnSpec::new("shipping_vessel", FieldKind::String),
            ColumnSpec::new("sale_date", FieldKind::Timestamp),
            ColumnSpec::new("sale_location", FieldKind::String),
            ColumnSpec::new("sale_dealer", FieldKind::String),
            ColumnSpec::new("sale_msrp", FieldKind::Decimal),
            ColumnSpec::new("current_owner_id", FieldKind::Reference),
        ],
    }
}

/// Ownership history. A join between cars and owners, keyed by both ids.
pub fn car_owners() -> EntitySchema {
    EntitySchema {
        table: "car_owners".to_string(),
        generate_id: false,
        natural_key: Vec::new(),
        columns: vec![
            ColumnSpec::new("car_id", FieldKind::Reference),
            ColumnSpec::new("owner_id", FieldKind::Reference),
            ColumnSpec::new("date_start", FieldKind::Timestamp),
            ColumnSpec::new("date_end", FieldKind::Timestamp),
        ],
    }
}

fn keys(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// The built-in entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinEntity {
    Owners,
    Cars,
    CarOwners,
}

impl BuiltinEntity {
    pub fn all() -> &'static [BuiltinEntity] {
        &[Self::Owners, Self::Cars, Self::CarOwners]
    }

    /// Command-line name of the entity.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Owners => "owners",
            Self::Cars => "cars",
            Self::CarOwners => "car-owners",
        }
    }

    pub fn schema(&self) -> EntitySchema {
        match self {
            Self::Owners => owners(),
            Self::Cars => cars(),
            Self::CarOwners => car_owners(),
        }
    }
}

impl fmt::Display for BuiltinEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owners" | "owner" => Ok(Self::Owners),
            "cars" | "car" => Ok(Self::Cars),
            "car-owners" | "car_owners" | "carowners" => Ok(Self::CarOwners),
            other => Err(format!(
                "unknown entity '{other}' (expected owners, cars or car-owners)"
            )),
        }
    }
}
