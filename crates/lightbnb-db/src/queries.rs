use lightbnb_types::models::to_subunits;
use lightbnb_types::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, PropertySearch, User,
};
use rusqlite::{Connection, OptionalExtension, ToSql, params, params_from_iter};
use tracing::debug;

use crate::listing::ListingQuery;
use crate::models::{
    PROPERTY_COLUMNS, PROPERTY_RETURNING, PROPERTY_WIDTH, RESERVATION_COLUMNS, RESERVATION_WIDTH,
    USER_COLUMNS, property_from_row, reservation_from_row, user_from_row,
};
use crate::{Database, Result};

impl Database {
    // -- Users --

    pub fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| find_user_by_email(conn, email))
    }

    pub fn get_user_with_id(&self, id: i64) -> Result<Option<User>> {
        self.with_conn(|conn| query_user(conn, "users.id = ?1", &id))
    }

    /// Insert a user and return the stored row. Duplicate emails are left to
    /// the UNIQUE constraint.
    pub fn add_user(&self, user: &NewUser) -> Result<User> {
        self.with_conn_mut(|conn| insert_user(conn, user))
    }

    // -- Reservations --

    pub fn get_all_reservations(&self, guest_id: i64, limit: u32) -> Result<Vec<GuestReservation>> {
        self.with_conn(|conn| query_reservations(conn, guest_id, limit))
    }

    // -- Properties --

    pub fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: u32,
    ) -> Result<Vec<PropertyListing>> {
        let (sql, values) = ListingQuery::from_search(search).finish(limit);
        debug!("Property listing query with {} params: {}", values.len(), sql);

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), |row| {
                    Ok(PropertyListing {
                        property: property_from_row(row, 0)?,
                        average_rating: row.get(PROPERTY_WIDTH)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Insert a listing. The supplied nightly cost is stored in subunits.
    pub fn add_property(&self, property: &NewProperty) -> Result<Property> {
        self.with_conn_mut(|conn| insert_property(conn, property))
    }

    // -- Health --

    /// Titles of the first few listings. Cheap round trip used at startup to
    /// confirm the pool can reach the store.
    pub fn probe(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT title FROM properties ORDER BY id LIMIT 10")?;
            let titles = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(titles)
        })
    }

    pub fn property_count(&self) -> Result<u64> {
        self.with_conn(count_properties)
    }
}

// Connection-level statements, shared by the pooled methods above and by
// callers batching several writes in one transaction.

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_user(conn, "users.email = ?1", &email)
}

pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<User> {
    let row = conn.query_row(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)
         RETURNING id, name, email, password",
        params![user.name, user.email, user.password],
        user_from_row,
    )?;
    Ok(row)
}

pub fn insert_property(conn: &Connection, property: &NewProperty) -> Result<Property> {
    let sql = format!(
        "INSERT INTO properties (
            owner_id, title, description, thumbnail_photo_url, cover_photo_url,
            cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
            country, street, city, province, post_code
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         RETURNING {PROPERTY_RETURNING}"
    );
    let row = conn.query_row(
        &sql,
        params![
            property.owner_id,
            property.title,
            property.description,
            property.thumbnail_photo_url,
            property.cover_photo_url,
            to_subunits(property.cost_per_night),
            property.parking_spaces.unwrap_or_default(),
            property.number_of_bathrooms.unwrap_or_default(),
            property.number_of_bedrooms.unwrap_or_default(),
            property.country,
            property.street,
            property.city,
            property.province,
            property.post_code,
        ],
        |row| property_from_row(row, 0),
    )?;
    Ok(row)
}

pub fn count_properties(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM properties", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn query_user(conn: &Connection, predicate: &str, key: &dyn ToSql) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt.query_row([key], user_from_row).optional()?;
    Ok(row)
}

fn query_reservations(conn: &Connection, guest_id: i64, limit: u32) -> Result<Vec<GuestReservation>> {
    // Reviews are grouped per reservation so each row carries its own average.
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS}, {PROPERTY_COLUMNS},
                AVG(property_reviews.rating) AS average_rating
         FROM reservations
         JOIN properties ON properties.id = reservations.property_id
         LEFT JOIN property_reviews ON property_reviews.reservation_id = reservations.id
         WHERE reservations.guest_id = ?1
         GROUP BY reservations.id, properties.id
         ORDER BY reservations.start_date ASC, reservations.id ASC
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![guest_id, limit], |row| {
            Ok(GuestReservation {
                reservation: reservation_from_row(row, 0)?,
                property: property_from_row(row, RESERVATION_WIDTH)?,
                average_rating: row.get(RESERVATION_WIDTH + PROPERTY_WIDTH)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
