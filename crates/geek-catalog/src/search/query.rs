//! Product query builder.

use crate::ids::{CategoryId, ProductId};
use crate::search::Filter;
use serde::{Deserialize, Serialize};

pub(crate) const PRODUCT_COLUMNS: &str = "p.id AS id, p.name AS name, \
     p.price_cents AS price_cents, p.description AS description, p.image_url AS image_url, \
     p.category_id AS category_id, p.created_at AS created_at, p.updated_at AS updated_at";

/// Most recently changed first. Ties fall back to insertion order so results
/// are stable across calls.
const PRODUCT_ORDER: &str = "p.updated_at DESC, p.rowid DESC";

/// A products query: filters are ANDed together.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductQuery {
    pub filters: Vec<Filter>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text filter. Blank input adds nothing.
    pub fn with_text(mut self, query: &str) -> Self {
        let query = query.trim();
        if !query.is_empty() {
            self.filters.push(Filter::text(query));
        }
        self
    }

    pub fn in_category(mut self, id: CategoryId) -> Self {
        self.filters.push(Filter::category(id));
        self
    }

    pub fn with_ids(mut self, ids: Vec<ProductId>) -> Self {
        self.filters.push(Filter::Ids(ids));
        self
    }

    pub fn build_where_clause(&self) -> (String, Vec<String>) {
        if self.filters.is_empty() {
            return ("1 = 1".to_string(), vec![]);
        }

        let mut clauses = Vec::with_capacity(self.filters.len());
        let mut values = Vec::new();
        for filter in &self.filters {
            let (clause, filter_values) = filter.to_sql();
            clauses.push(format!("({clause})"));
            values.extend(filter_values);
        }
        (clauses.join(" AND "), values)
    }

    pub fn build_sql(&self) -> (String, Vec<String>) {
        let (where_clause, values) = self.build_where_clause();
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN categories c ON c.id = p.category_id \
             WHERE {where_clause} ORDER BY {PRODUCT_ORDER}"
        );
        (sql, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let (sql, values) = ProductQuery::new().build_sql();
        assert!(sql.contains("WHERE 1 = 1"));
        assert!(sql.ends_with("ORDER BY p.updated_at DESC, p.rowid DESC"));
        assert!(values.is_empty());
    }

    #[test]
    fn test_blank_text_is_ignored() {
        assert!(ProductQuery::new().with_text("   ").filters.is_empty());
    }

    #[test]
    fn test_combined_filters() {
        let query = ProductQuery::new()
            .with_text("caneca")
            .in_category(CategoryId::new("c1"))
            .with_ids(vec![ProductId::new("p1"), ProductId::new("p2")]);

        let (sql, values) = query.build_sql();
        assert!(sql.contains(") AND (p.category_id = ?) AND ("));
        assert!(sql.ends_with("ORDER BY p.updated_at DESC, p.rowid DESC"));
        assert_eq!(values, vec!["%caneca%", "%caneca%", "c1", "p1", "p2"]);
    }
}
