use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS properties (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id            INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title               TEXT NOT NULL,
                description         TEXT,
                thumbnail_photo_url TEXT,
                cover_photo_url     TEXT,
                cost_per_night      INTEGER NOT NULL DEFAULT 0,
                parking_spaces      INTEGER NOT NULL DEFAULT 0,
                number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
                number_of_bedrooms  INTEGER NOT NULL DEFAULT 0,
                country             TEXT NOT NULL,
                street              TEXT NOT NULL,
                city                TEXT NOT NULL,
                province            TEXT NOT NULL,
                post_code           TEXT NOT NULL,
                active              INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_properties_owner
                ON properties(owner_id);

            CREATE TABLE IF NOT EXISTS reservations (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                start_date  TEXT NOT NULL,
                end_date    TEXT NOT NULL,
                property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
                guest_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_reservations_guest
                ON reservations(guest_id);

            CREATE TABLE IF NOT EXISTS property_reviews (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                guest_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                property_id     INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
                reservation_id  INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
                rating          SMALLINT NOT NULL DEFAULT 0 CHECK (rating BETWEEN 0 AND 5),
                message         TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_reviews_property
                ON property_reviews(property_id);
            CREATE INDEX IF NOT EXISTS idx_reviews_reservation
                ON property_reviews(reservation_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
