//! Typed admin request bodies.

use serde::Deserialize;
use serde_json::Value;

use super::schema::{Rule, Schema, ValidationError};
use super::shape::{FieldType, ShapeValidator};
use crate::ids::ProductId;
use crate::price::Price;

pub const PRODUCT_SHAPE: ShapeValidator = ShapeValidator::new(&[
    ("name", FieldType::String),
    ("price", FieldType::Number),
    ("description", FieldType::String),
    ("base64Image", FieldType::String),
    ("categoryName", FieldType::String),
]);

pub const CATEGORY_SHAPE: ShapeValidator = ShapeValidator::new(&[("name", FieldType::String)]);

pub const PRODUCT_CREATE: Schema = Schema::new(
    "Produto inválido",
    PRODUCT_SHAPE,
    &[
        ("name", &[Rule::MinLength(1)]),
        ("price", &[Rule::PositivePrice]),
        ("description", &[Rule::MinLength(1)]),
        ("base64Image", &[Rule::MinLength(1)]),
        ("categoryName", &[Rule::MinLength(1)]),
    ],
);

pub const PRODUCT_UPDATE: Schema = PRODUCT_CREATE.partial();

pub const CATEGORY_CREATE: Schema = Schema::new(
    "Categoria inválida",
    CATEGORY_SHAPE,
    &[("name", &[Rule::MinLength(1)])],
);

pub const CATEGORY_UPDATE: Schema = CATEGORY_CREATE.partial();

pub const PRODUCT_MOVE: Schema = Schema::new(
    "Requisição inválida",
    ShapeValidator::new(&[
        ("productIds", FieldType::Array),
        ("categoryName", FieldType::String),
    ]),
    &[
        ("productIds", &[Rule::MinItems(1), Rule::Uuids]),
        ("categoryName", &[Rule::MinLength(1)]),
    ],
);

pub const PRODUCT_REMOVAL: Schema = Schema::new(
    "Requisição inválida",
    ShapeValidator::new(&[("productIds", FieldType::Array)]),
    &[("productIds", &[Rule::MinItems(1), Rule::Uuids])],
);

/// Body of `POST /api/product`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub price: Price,
    pub description: String,
    /// Image as a `data:image/...;base64,` URI.
    pub base64_image: String,
    pub category_name: String,
}

impl ProductCreate {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        PRODUCT_CREATE.check(body)?;
        let parsed: Self = PRODUCT_CREATE.deserialize(body)?;
        Ok(Self {
            name: parsed.name.trim().to_string(),
            description: parsed.description.trim().to_string(),
            category_name: parsed.category_name.trim().to_string(),
            ..parsed
        })
    }
}

/// Body of `PUT|PATCH /api/product/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub base64_image: Option<String>,
    pub category_name: Option<String>,
}

impl ProductUpdate {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        PRODUCT_UPDATE.check(body)?;
        let parsed: Self = PRODUCT_UPDATE.deserialize(body)?;
        Ok(Self {
            name: trimmed(parsed.name),
            description: trimmed(parsed.description),
            category_name: trimmed(parsed.category_name),
            ..parsed
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /api/category`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

impl CategoryCreate {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        CATEGORY_CREATE.check(body)?;
        let parsed: Self = CATEGORY_CREATE.deserialize(body)?;
        Ok(Self {
            name: parsed.name.trim().to_string(),
        })
    }
}

/// Body of `PUT|PATCH /api/category/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
}

impl CategoryUpdate {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        CATEGORY_UPDATE.check(body)?;
        let parsed: Self = CATEGORY_UPDATE.deserialize(body)?;
        Ok(Self {
            name: trimmed(parsed.name),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProductIds {
    product_ids: Vec<String>,
    category_name: Option<String>,
}

/// Body of `POST /api/products/move`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMove {
    pub product_ids: Vec<ProductId>,
    pub category_name: String,
}

impl ProductMove {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        PRODUCT_MOVE.check(body)?;
        let raw: RawProductIds = PRODUCT_MOVE.deserialize(body)?;
        Ok(Self {
            product_ids: unique_ids(&raw.product_ids),
            category_name: raw.category_name.unwrap_or_default().trim().to_string(),
        })
    }
}

/// Body of `POST /api/products/remove`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRemoval {
    pub product_ids: Vec<ProductId>,
}

impl ProductRemoval {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        PRODUCT_REMOVAL.check(body)?;
        let raw: RawProductIds = PRODUCT_REMOVAL.deserialize(body)?;
        Ok(Self {
            product_ids: unique_ids(&raw.product_ids),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// Normalized ids in first-seen order, duplicates dropped.
fn unique_ids(raw: &[String]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = Vec::with_capacity(raw.len());
    for id in raw.iter().filter_map(|s| ProductId::parse(s)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
