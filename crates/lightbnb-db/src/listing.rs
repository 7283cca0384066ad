use lightbnb_types::PropertySearch;
use lightbnb_types::models::to_subunits;
use rusqlite::types::Value;

use crate::FOLD_CASE_FN;
use crate::models::PROPERTY_COLUMNS;

/// Accumulates filter clauses for the property listing.
///
/// Every clause receives its placeholders from [`ListingQuery::bind`], which
/// pushes the value and hands back the matching `?N`. Clause text and the
/// parameter list therefore stay in step no matter which filters are present.
#[derive(Debug, Default)]
pub struct ListingQuery {
    row_filters: Vec<String>,
    group_filters: Vec<String>,
    params: Vec<Value>,
}

impl ListingQuery {
    pub fn from_search(search: &PropertySearch) -> Self {
        let mut query = Self::default();

        if let Some(city) = search.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            // Same folding function on both sides, so non-ASCII letters match too.
            let pattern = query.bind(format!("%{}%", escape_like(city)));
            query.filter(format!(
                "{FOLD_CASE_FN}(properties.city) LIKE {FOLD_CASE_FN}({pattern}) ESCAPE '\\'"
            ));
        }

        if let Some(owner_id) = search.owner_id {
            let owner = query.bind(owner_id);
            query.filter(format!("properties.owner_id = {owner}"));
        }

        if let Some((minimum, maximum)) = search.price_range() {
            let low = query.bind(to_subunits(minimum));
            let high = query.bind(to_subunits(maximum));
            query.filter(format!("properties.cost_per_night BETWEEN {low} AND {high}"));
        }

        // Depends on the aggregate, so it belongs in HAVING.
        if let Some(rating) = search.minimum_rating {
            let rating = query.bind(rating);
            query.group_filters.push(format!("AVG(property_reviews.rating) >= {rating}"));
        }

        query
    }

    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        self.params.push(value.into());
        format!("?{}", self.params.len())
    }

    pub fn filter(&mut self, clause: String) {
        self.row_filters.push(clause);
    }

    pub fn is_unfiltered(&self) -> bool {
        self.row_filters.is_empty() && self.group_filters.is_empty()
    }

    /// Render the statement. The limit is always the last parameter.
    pub fn finish(mut self, limit: u32) -> (String, Vec<Value>) {
        let mut sql = format!(
            "SELECT {PROPERTY_COLUMNS}, AVG(property_reviews.rating) AS average_rating
             FROM properties
             LEFT JOIN property_reviews ON property_reviews.property_id = properties.id"
        );

        if !self.row_filters.is_empty() {
            sql.push_str("\n WHERE ");
            sql.push_str(&self.row_filters.join(" AND "));
        }

        sql.push_str("\n GROUP BY properties.id");

        if !self.group_filters.is_empty() {
            sql.push_str("\n HAVING ");
            sql.push_str(&self.group_filters.join(" AND "));
        }

        let limit = self.bind(i64::from(limit));
        sql.push_str("\n ORDER BY properties.cost_per_night ASC, properties.id ASC");
        sql.push_str(&format!("\n LIMIT {limit}"));

        (sql, self.params)
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
