//! The load draft being edited in the form panel.

use serde::Serialize;

use loaddesk_core::Directory;

/// Two-letter codes offered by the origin/destination state pickers.
pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Free-form draft fields. Nothing is parsed or persisted; saving only logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDraft {
    pub load_id: String,
    /// Selected carrier id; empty when nothing is selected.
    pub carrier: String,
    /// Selected driver id; empty when nothing is selected.
    pub driver: String,
    pub driver_rate: String,
    pub broker_rate: String,
    pub zip_from: String,
    pub state_from: String,
    pub zip_to: String,
    pub state_to: String,
    pub loaded_miles: String,
    pub empty_miles: String,
    pub total_miles: String,
    pub price_per_mile: String,
    pub pick_date: String,
    pub delivery_date: String,
    pub notes: String,
}

impl LoadDraft {
    /// Drop selections that the (re)loaded directory no longer offers.
    pub fn retain_known(&mut self, directory: &Directory) {
        if !self.carrier.is_empty() && directory.carrier(&self.carrier).is_none() {
            self.carrier.clear();
        }
        if !self.driver.is_empty() && directory.driver(&self.driver).is_none() {
            self.driver.clear();
        }
    }

    /// One-line summary for the console.
    pub fn summary(&self, directory: &Directory) -> String {
        let carrier = directory
            .carrier(&self.carrier)
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        let driver = directory
            .driver(&self.driver)
            .map(|d| d.name.as_str())
            .unwrap_or("-");
        let load = if self.load_id.is_empty() {
            "(no id)"
        } else {
            self.load_id.as_str()
        };
        format!("Draft {}: carrier {}, driver {}", load, carrier, driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loaddesk_core::{deduplicate, RawRecord};

    fn directory() -> Directory {
        let rows = [
            RawRecord::from_fields("D1", "Alice", "Reefer", "C1", "Acme"),
            RawRecord::from_fields("D2", "Bob", "", "C2", "Bolt"),
        ];
        deduplicate(&rows)
    }

    #[test]
    fn test_retain_known_clears_stale_selection() {
        let mut draft = LoadDraft {
            carrier: "C9".into(),
            driver: "D2".into(),
            ..Default::default()
        };
        draft.retain_known(&directory());
        assert_eq!(draft.carrier, "");
        assert_eq!(draft.driver, "D2");
    }

    #[test]
    fn test_summary_uses_names() {
        let draft = LoadDraft {
            load_id: "L-100".into(),
            carrier: "C1".into(),
            driver: "D1".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.summary(&directory()),
            "Draft L-100: carrier Acme, driver Alice"
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(LoadDraft::default()).unwrap();
        assert!(json.get("pricePerMile").is_some());
        assert!(json.get("deliveryDate").is_some());
    }
}
