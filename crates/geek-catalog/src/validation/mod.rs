//! Admin request validation.
//!
//! Two layers: [`ShapeValidator`] is the type gate (which keys may appear and
//! with which JSON types), [`Schema`] adds per-field rules and produces the
//! Portuguese messages returned to the admin forms. Typed bodies such as
//! [`ProductCreate`] are only built from JSON that passed both.

mod requests;
mod schema;
mod shape;

pub use requests::{
    CategoryCreate, CategoryUpdate, ProductCreate, ProductMove, ProductRemoval, ProductUpdate,
    CATEGORY_CREATE, CATEGORY_SHAPE, CATEGORY_UPDATE, PRODUCT_CREATE, PRODUCT_MOVE,
    PRODUCT_REMOVAL, PRODUCT_SHAPE, PRODUCT_UPDATE,
};
pub use schema::{FieldErrors, Rule, Schema, ValidationError, BODY_ERRORS};
pub use shape::{type_name, FieldType, ShapeValidator};
