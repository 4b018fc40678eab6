//! Tabular rows and the entities derived from them.

use serde::{Deserialize, Serialize};

/// Header names expected in the tabular source (exact, case-sensitive).
pub mod headers {
    pub const DRIVER_ID: &str = "DRIVER ID";
    pub const DRIVER_NAME: &str = "DRIVER NAME";
    pub const TRAILER_TYPE: &str = "TRAILER TYPE";
    pub const CARRIER_ID: &str = "CARRIER ID";
    pub const CARRIER_NAME: &str = "CARRIER NAME";

    /// All headers in canonical column order.
    pub const ALL: [&str; 5] = [DRIVER_ID, DRIVER_NAME, TRAILER_TYPE, CARRIER_ID, CARRIER_NAME];
}

/// One row of the tabular source. Any column may be absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub driver_id: Option<String>,
    pub driver_name: Option<String>,
    pub trailer_type: Option<String>,
    pub carrier_id: Option<String>,
    pub carrier_name: Option<String>,
}

impl RawRecord {
    /// Build a record from plain string slices; empty strings become `None`.
    pub fn from_fields(
        driver_id: &str,
        driver_name: &str,
        trailer_type: &str,
        carrier_id: &str,
        carrier_name: &str,
    ) -> Self {
        Self {
            driver_id: non_empty(driver_id),
            driver_name: non_empty(driver_name),
            trailer_type: non_empty(trailer_type),
            carrier_id: non_empty(carrier_id),
            carrier_name: non_empty(carrier_name),
        }
    }

    /// The driver described by this row, if both id and name are present.
    pub fn driver(&self) -> Option<Driver> {
        let id = present(&self.driver_id)?;
        let name = present(&self.driver_name)?;
        Some(Driver {
            id: id.to_string(),
            name: name.to_string(),
            trailer_type: self.trailer_type.clone().unwrap_or_default(),
        })
    }

    /// The carrier described by this row, if both id and name are present.
    pub fn carrier(&self) -> Option<Carrier> {
        let id = present(&self.carrier_id)?;
        let name = present(&self.carrier_name)?;
        Some(Carrier {
            id: id.to_string(),
            name: name.to_string(),
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// An entity keyed by a stable identifier.
pub trait Keyed {
    fn key(&self) -> &str;

    /// Text shown in a selection control.
    fn label(&self) -> String;
}

/// A driver as offered in the driver selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub trailer_type: String,
}

impl Keyed for Driver {
    fn key(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.trailer_type)
    }
}

/// A carrier as offered in the carrier selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: String,
    pub name: String,
}

impl Keyed for Carrier {
    fn key(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
