/// Row mapping between SQLite result rows and the lightbnb-types records.
/// Column lists and mappers live side by side so their order cannot drift.
use lightbnb_types::{Property, Reservation, User};
use rusqlite::Row;

pub(crate) const USER_COLUMNS: &str = "users.id, users.name, users.email, users.password";

pub(crate) const PROPERTY_COLUMNS: &str = "properties.id, properties.owner_id, properties.title,
    properties.description, properties.thumbnail_photo_url, properties.cover_photo_url,
    properties.cost_per_night, properties.parking_spaces, properties.number_of_bathrooms,
    properties.number_of_bedrooms, properties.country, properties.street, properties.city,
    properties.province, properties.post_code, properties.active";

/// Same columns as `PROPERTY_COLUMNS`, unqualified for `RETURNING`.
pub(crate) const PROPERTY_RETURNING: &str = "id, owner_id, title, description,
    thumbnail_photo_url, cover_photo_url, cost_per_night, parking_spaces,
    number_of_bathrooms, number_of_bedrooms, country, street, city, province, post_code, active";

pub(crate) const PROPERTY_WIDTH: usize = 16;

pub(crate) const RESERVATION_COLUMNS: &str = "reservations.id, reservations.guest_id,
    reservations.property_id, reservations.start_date, reservations.end_date";

pub(crate) const RESERVATION_WIDTH: usize = 5;

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

/// Read a property whose columns start at `at`.
pub(crate) fn property_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(at)?,
        owner_id: row.get(at + 1)?,
        title: row.get(at + 2)?,
        description: row.get(at + 3)?,
        thumbnail_photo_url: row.get(at + 4)?,
        cover_photo_url: row.get(at + 5)?,
        cost_per_night: row.get(at + 6)?,
        parking_spaces: row.get(at + 7)?,
        number_of_bathrooms: row.get(at + 8)?,
        number_of_bedrooms: row.get(at + 9)?,
        country: row.get(at + 10)?,
        street: row.get(at + 11)?,
        city: row.get(at + 12)?,
        province: row.get(at + 13)?,
        post_code: row.get(at + 14)?,
        active: row.get(at + 15)?,
    })
}

pub(crate) fn reservation_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(at)?,
        guest_id: row.get(at + 1)?,
        property_id: row.get(at + 2)?,
        start_date: row.get(at + 3)?,
        end_date: row.get(at + 4)?,
    })
}
