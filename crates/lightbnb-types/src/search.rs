use serde::Deserialize;

/// Optional filters for the property listing. Every present filter narrows
/// the result; absent ones are ignored.
///
/// The price bounds are decimal units and only apply when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertySearch {
    pub city: Option<String>,
    pub owner_id: Option<i64>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
}

impl PropertySearch {
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn price_between(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum_price_per_night = Some(minimum);
        self.maximum_price_per_night = Some(maximum);
        self
    }

    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Both price bounds, if both were supplied.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.minimum_price_per_night
            .zip(self.maximum_price_per_night)
    }
}
