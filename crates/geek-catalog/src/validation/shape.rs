//! Type-level gate for incoming JSON bodies.

use serde_json::Value;

/// The JSON types a body field can be declared as.
///
/// `Object` follows JavaScript `typeof`: it also matches `null` and arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    /// A JSON array. Only arrays match.
    Array,
}

impl FieldType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object() || value.is_array() || value.is_null(),
            FieldType::Array => value.is_array(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

/// Name of the JSON type of `value`, as reported in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declared field types of a request body.
#[derive(Debug, Clone, Copy)]
pub struct ShapeValidator {
    fields: &'static [(&'static str, FieldType)],
}

impl ShapeValidator {
    pub const fn new(fields: &'static [(&'static str, FieldType)]) -> Self {
        Self { fields }
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, ty)| *ty)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldType)> + '_ {
        self.fields.iter().copied()
    }

    /// Check `body` against the declared types.
    ///
    /// With `all_required` every declared field must be present with its
    /// type. Without it, every field present in the body must be declared
    /// and carry its declared type, and absent fields are fine. Anything
    /// that is not a JSON object fails.
    pub fn validate(&self, body: &Value, all_required: bool) -> bool {
        let Some(object) = body.as_object() else {
            return false;
        };

        if all_required {
            self.fields.iter().all(|(name, ty)| {
                object.get(*name).map(|value| ty.matches(value)).unwrap_or(false)
            })
        } else {
            object.iter().all(|(name, value)| {
                self.field_type(name)
                    .map(|ty| ty.matches(value))
                    .unwrap_or(false)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const PRODUCT: ShapeValidator = ShapeValidator::new(&[
        ("name", FieldType::String),
        ("price", FieldType::Number),
        ("description", FieldType::String),
        ("base64Image", FieldType::String),
        ("categoryName", FieldType::String),
    ]);

    fn full_product() -> Value {
        json!({
            "name": "Controle Xbox",
            "price": 349.9,
            "description": "Sem fio",
            "base64Image": "data:image/png;base64,AAAA",
            "categoryName": "Consoles"
        })
    }

    #[test]
    fn test_all_required_accepts_complete_body() {
        assert!(PRODUCT.validate(&full_product(), true));
    }

    #[test]
    fn test_all_required_rejects_missing_field() {
        let mut body = full_product();
        body.as_object_mut().unwrap().remove("categoryName");
        assert!(!PRODUCT.validate(&body, true));
    }

    #[test]
    fn test_all_required_ignores_extra_fields() {
        let mut body = full_product();
        body["featured"] = json!(true);
        assert!(PRODUCT.validate(&body, true));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"price": 10}))]
    #[case(json!({"name": "Novo nome", "description": "Nova"}))]
    fn test_partial_accepts(#[case] body: Value) {
        assert!(PRODUCT.validate(&body, false));
    }

    #[rstest]
    #[case(json!({"price": "10"}))]
    #[case(json!({"name": null}))]
    #[case(json!({"featured": true}))]
    #[case(json!([]))]
    #[case(json!("name"))]
    #[case(Value::Null)]
    fn test_partial_rejects(#[case] body: Value) {
        assert!(!PRODUCT.validate(&body, false));
    }

    #[test]
    fn test_object_type_matches_null_and_arrays() {
        assert!(FieldType::Object.matches(&Value::Null));
        assert!(FieldType::Object.matches(&json!([1])));
        assert!(FieldType::Object.matches(&json!({})));
        assert!(!FieldType::Array.matches(&json!({})));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(1.5)), "number");
        assert_eq!(type_name(&Value::Null), "null");
        assert_eq!(type_name(&json!([])), "array");
    }
}
