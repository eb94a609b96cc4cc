//! Product filters.

use crate::ids::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Substring of the product name or of its category name,
    /// ASCII case-insensitive.
    Text(String),
    Category(CategoryId),
    Ids(Vec<ProductId>),
}

impl Filter {
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    pub fn category(id: CategoryId) -> Self {
        Filter::Category(id)
    }

    /// Build the WHERE clause component and its parameters.
    ///
    /// Columns are qualified with `p` (products) and `c` (categories).
    pub fn to_sql(&self) -> (String, Vec<String>) {
        match self {
            Filter::Text(query) => {
                let pattern = format!("%{}%", escape_like(query));
                (
                    r"p.name LIKE ? ESCAPE '\' OR c.name LIKE ? ESCAPE '\'".to_string(),
                    vec![pattern.clone(), pattern],
                )
            }
            Filter::Category(id) => ("p.category_id = ?".to_string(), vec![id.to_string()]),
            Filter::Ids(ids) if ids.is_empty() => ("0 = 1".to_string(), vec![]),
            Filter::Ids(ids) => {
                let placeholders = vec!["?"; ids.len()].join(", ");
                (
                    format!("p.id IN ({placeholders})"),
                    ids.iter().map(ToString::to_string).collect(),
                )
            }
        }
    }
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
