//! Seed data for a fresh store.
//!
//! Fixture documents are JSON, either an object keyed by id
//! (`{"1": {...}, "2": {...}}`) or a plain array. Records are seeded through
//! the same insert statements the store uses, so they get fresh ids and the
//! usual price conversion.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use lightbnb_db::{Store, queries};
use lightbnb_types::models::SUBUNITS_PER_UNIT;
use lightbnb_types::{NewProperty, NewUser};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A property as written in the fixture files. `cost_per_night` is already in
/// subunits there.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureProperty {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_photo_url: Option<String>,
    #[serde(default)]
    pub cover_photo_url: Option<String>,
    pub cost_per_night: i64,
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

impl FixtureProperty {
    fn into_new_property(self, owner_id: i64) -> NewProperty {
        NewProperty {
            owner_id,
            title: self.title,
            description: self.description,
            thumbnail_photo_url: self.thumbnail_photo_url,
            cover_photo_url: self.cover_photo_url,
            cost_per_night: self.cost_per_night as f64 / SUBUNITS_PER_UNIT,
            parking_spaces: self.parking_spaces,
            number_of_bathrooms: self.number_of_bathrooms,
            number_of_bedrooms: self.number_of_bedrooms,
            country: self.country,
            street: self.street,
            city: self.city,
            province: self.province,
            post_code: self.post_code,
        }
    }
}

trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for FixtureUser {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for FixtureProperty {
    fn key(&self) -> i64 {
        self.id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document<T> {
    Keyed(HashMap<String, T>),
    List(Vec<T>),
}

fn parse<T: DeserializeOwned + Keyed>(json: &str) -> Result<Vec<T>> {
    let mut records = match serde_json::from_str::<Document<T>>(json)? {
        Document::Keyed(map) => map.into_values().collect::<Vec<_>>(),
        Document::List(list) => list,
    };
    records.sort_by_key(|record| record.key());
    Ok(records)
}

pub fn parse_users(json: &str) -> Result<Vec<FixtureUser>> {
    parse(json).context("invalid users fixture")
}

pub fn parse_properties(json: &str) -> Result<Vec<FixtureProperty>> {
    parse(json).context("invalid properties fixture")
}

pub fn load_users(path: &Path) -> Result<Vec<FixtureUser>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_users(&json)
}

pub fn load_properties(path: &Path) -> Result<Vec<FixtureProperty>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_properties(&json)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub properties: usize,
}

/// Insert fixture users, then their properties, in one writer transaction.
/// Does nothing if the store already has listings. Users whose email is
/// already taken are reused. If any insert fails nothing is kept, so the next
/// run starts from the same empty state.
pub async fn seed(
    store: &Store,
    users: Vec<FixtureUser>,
    properties: Vec<FixtureProperty>,
) -> Result<SeedReport> {
    let report = store
        .transaction("seed", move |tx| {
            let mut report = SeedReport::default();

            if queries::count_properties(tx)? > 0 {
                info!("Store already has properties, skipping seed");
                return Ok(report);
            }

            // fixture user id -> stored user id
            let mut owners: HashMap<i64, i64> = HashMap::with_capacity(users.len());
            for user in users {
                let stored = match queries::find_user_by_email(tx, &user.email)? {
                    Some(existing) => existing,
                    None => {
                        report.users += 1;
                        queries::insert_user(
                            tx,
                            &NewUser {
                                name: user.name,
                                email: user.email,
                                password: user.password,
                            },
                        )?
                    }
                };
                owners.insert(user.id, stored.id);
            }

            for property in properties {
                let Some(&owner_id) = owners.get(&property.owner_id) else {
                    warn!(
                        "Skipping fixture property {} with unknown owner {}",
                        property.id, property.owner_id
                    );
                    continue;
                };
                queries::insert_property(tx, &property.into_new_property(owner_id))?;
                report.properties += 1;
            }

            Ok(report)
        })
        .await
        .context("seeding fixtures")?;

    if report.properties > 0 || report.users > 0 {
        info!(
            "Seeded {} users and {} properties",
            report.users, report.properties
        );
    }
    Ok(report)
}
