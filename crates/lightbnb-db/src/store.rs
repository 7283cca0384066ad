use std::sync::Arc;

use lightbnb_types::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, PropertySearch, User,
};
use rusqlite::Transaction;
use tracing::error;

use crate::{Database, Result, StoreError};

/// Rows returned by the listing operations when the caller gives no limit.
pub const DEFAULT_LIMIT: u32 = 10;

/// Async handle over a shared [`Database`].
///
/// Each call runs its statement on the blocking pool so the async runtime is
/// never stalled on SQLite. Failures are logged where they happen and then
/// returned; "no rows" is `Ok(None)` or an empty list, never an error.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn from_shared(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    async fn run<F, T>(&self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let outcome = tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(StoreError::from)
            .and_then(|result| result);

        if let Err(e) = &outcome {
            error!(operation, "Query failed: {}", e);
        }
        outcome
    }

    // -- Users --

    pub async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_owned();
        self.run("get_user_with_email", move |db| db.get_user_with_email(&email))
            .await
    }

    pub async fn get_user_with_id(&self, id: i64) -> Result<Option<User>> {
        self.run("get_user_with_id", move |db| db.get_user_with_id(id))
            .await
    }

    pub async fn add_user(&self, user: NewUser) -> Result<User> {
        self.run("add_user", move |db| db.add_user(&user)).await
    }

    // -- Reservations --

    pub async fn get_all_reservations(
        &self,
        guest_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<GuestReservation>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        self.run("get_all_reservations", move |db| {
            db.get_all_reservations(guest_id, limit)
        })
        .await
    }

    // -- Properties --

    pub async fn get_all_properties(
        &self,
        search: PropertySearch,
        limit: Option<u32>,
    ) -> Result<Vec<PropertyListing>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        self.run("get_all_properties", move |db| {
            db.get_all_properties(&search, limit)
        })
        .await
    }

    pub async fn add_property(&self, property: NewProperty) -> Result<Property> {
        self.run("add_property", move |db| db.add_property(&property))
            .await
    }

    /// Run several statements as one writer transaction. Nothing `f` wrote
    /// survives if it returns an error.
    pub async fn transaction<F, T>(&self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(operation, move |db| db.with_transaction(f)).await
    }

    pub async fn probe(&self) -> Result<Vec<String>> {
        self.run("probe", |db| db.probe()).await
    }

    pub async fn property_count(&self) -> Result<u64> {
        self.run("property_count", |db| db.property_count()).await
    }
}
