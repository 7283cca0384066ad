use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored prices are integer subunits; callers supply decimal units on write.
pub const SUBUNITS_PER_UNIT: f64 = 100.0;

/// Convert a decimal price into the integer subunits the store persists.
pub fn to_subunits(units: f64) -> i64 {
    (units * SUBUNITS_PER_UNIT).round() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A listing as stored. `cost_per_night` is in subunits and is never scaled
/// back on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: Option<String>,
    pub cover_photo_url: Option<String>,
    pub cost_per_night: i64,
    pub parking_spaces: i64,
    pub number_of_bathrooms: i64,
    pub number_of_bedrooms: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

impl Property {
    /// Nightly price in decimal units.
    pub fn nightly_price(&self) -> f64 {
        self.cost_per_night as f64 / SUBUNITS_PER_UNIT
    }
}

/// Input for a new listing. `cost_per_night` is in decimal units and is
/// multiplied by 100 before it is written.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_photo_url: Option<String>,
    #[serde(default)]
    pub cover_photo_url: Option<String>,
    pub cost_per_night: f64,
    #[serde(default)]
    pub parking_spaces: Option<i64>,
    #[serde(default)]
    pub number_of_bathrooms: Option<i64>,
    #[serde(default)]
    pub number_of_bedrooms: Option<i64>,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// A property together with its average review rating. Unreviewed properties
/// carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One of a guest's reservations, joined with the reserved property and the
/// average rating left on that reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestReservation {
    pub reservation: Reservation,
    pub property: Property,
    pub average_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subunits_round_instead_of_truncating() {
        assert_eq!(to_subunits(75.0), 7500);
        assert_eq!(to_subunits(19.99), 1999);
    }

    #[test]
    fn new_property_defaults_optional_fields() {
        let json = r#"{
            "owner_id": 1,
            "title": "Speed lamp",
            "cost_per_night": 93.61,
            "country": "Canada",
            "street": "536 Namsub Highway",
            "city": "Sotboske",
            "province": "Quebec",
            "post_code": "28142"
        }"#;
        let p: NewProperty = serde_json::from_str(json).unwrap();
        assert_eq!(p.description, None);
        assert_eq!(p.parking_spaces, None);
        assert_eq!(to_subunits(p.cost_per_night), 9361);
    }

    #[test]
    fn listing_serializes_flat() {
        let listing = PropertyListing {
            property: Property {
                id: 7,
                owner_id: 2,
                title: "Loft".into(),
                description: None,
                thumbnail_photo_url: None,
                cover_photo_url: None,
                cost_per_night: 12050,
                parking_spaces: 1,
                number_of_bathrooms: 1,
                number_of_bedrooms: 2,
                country: "Canada".into(),
                street: "1 Main St".into(),
                city: "Vancouver".into(),
                province: "BC".into(),
                post_code: "V5K".into(),
                active: true,
            },
            average_rating: Some(4.5),
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["cost_per_night"], 12050);
        assert_eq!(value["average_rating"], 4.5);
        assert_eq!(listing.property.nightly_price(), 120.5);
    }
}
