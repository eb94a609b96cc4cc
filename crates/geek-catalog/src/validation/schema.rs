//! Field rules layered over a [`ShapeValidator`], with per-field messages.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::shape::{type_name, ShapeValidator};
use crate::price::Price;

/// Key under which errors that belong to the body as a whole are reported.
pub const BODY_ERRORS: &str = "_errors";

/// A constraint on a field whose type already matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed string length, in characters.
    MinLength(usize),
    /// A number that rounds to at least one centavo.
    PositivePrice,
    MinItems(usize),
    /// Every array element is a UUID string.
    Uuids,
}

impl Rule {
    fn check(&self, value: &Value) -> Option<String> {
        match self {
            Rule::MinLength(min) => {
                let len = value.as_str().map(|s| s.trim().chars().count()).unwrap_or(0);
                (len < *min).then(|| format!("A string deve conter no mínimo {min} caractere(s)"))
            }
            Rule::PositivePrice => {
                let valid = value.as_f64().and_then(Price::from_decimal).is_some();
                (!valid).then(|| "O número deve ser maior que 0".to_string())
            }
            Rule::MinItems(min) => {
                let len = value.as_array().map(Vec::len).unwrap_or(0);
                (len < *min).then(|| format!("A lista deve conter no mínimo {min} item(s)"))
            }
            Rule::Uuids => value.as_array().and_then(|items| {
                items
                    .iter()
                    .position(|item| {
                        item.as_str()
                            .map(|s| uuid::Uuid::parse_str(s.trim()).is_err())
                            .unwrap_or(true)
                    })
                    .map(|index| format!("Identificador inválido na posição {index}"))
            }),
        }
    }
}

/// Messages per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A rejected request body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: &'static str,
    pub fields: FieldErrors,
}

/// The full set of checks for one kind of request body.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    message: &'static str,
    shape: ShapeValidator,
    rules: &'static [(&'static str, &'static [Rule])],
    partial: bool,
}

impl Schema {
    pub const fn new(
        message: &'static str,
        shape: ShapeValidator,
        rules: &'static [(&'static str, &'static [Rule])],
    ) -> Self {
        Self {
            message,
            shape,
            rules,
            partial: false,
        }
    }

    /// The same schema with every field optional.
    pub const fn partial(self) -> Self {
        Self {
            message: self.message,
            shape: self.shape,
            rules: self.rules,
            partial: true,
        }
    }

    pub fn shape(&self) -> &ShapeValidator {
        &self.shape
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Validate `body`.
    ///
    /// Passes exactly when the shape gate passes (all fields required unless
    /// the schema is partial) and every rule holds for the present fields.
    pub fn check(&self, body: &Value) -> Result<(), ValidationError> {
        if self.shape.validate(body, !self.partial) && self.rules_hold(body) {
            return Ok(());
        }
        Err(self.error(self.collect_errors(body)))
    }

    /// Deserialize a body that already passed [`check`](Self::check).
    pub fn deserialize<T: DeserializeOwned>(&self, body: &Value) -> Result<T, ValidationError> {
        serde_json::from_value(body.clone()).map_err(|e| {
            let mut fields = FieldErrors::default();
            fields.add(BODY_ERRORS, e.to_string());
            self.error(fields)
        })
    }

    fn error(&self, fields: FieldErrors) -> ValidationError {
        ValidationError {
            message: self.message,
            fields,
        }
    }

    fn rules_for(&self, field: &str) -> &'static [Rule] {
        self.rules
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rules)| *rules)
            .unwrap_or(&[])
    }

    fn rules_hold(&self, body: &Value) -> bool {
        self.shape.fields().all(|(name, _)| match body.get(name) {
            Some(value) => self.rules_for(name).iter().all(|rule| rule.check(value).is_none()),
            None => true,
        })
    }

    fn collect_errors(&self, body: &Value) -> FieldErrors {
        let mut errors = FieldErrors::default();

        let Some(object) = body.as_object() else {
            errors.add(
                BODY_ERRORS,
                format!("Tipo esperado era object, porém foi recebido {}", type_name(body)),
            );
            return errors;
        };

        if self.partial {
            let unknown: Vec<&str> = object
                .keys()
                .map(String::as_str)
                .filter(|key| self.shape.field_type(key).is_none())
                .collect();
            if !unknown.is_empty() {
                errors.add(
                    BODY_ERRORS,
                    format!("Chave(s) não reconhecida(s) no objeto: {}", unknown.join(", ")),
                );
            }
        }

        for (name, ty) in self.shape.fields() {
            match object.get(name) {
                None if !self.partial => errors.add(name, "Obrigatório"),
                None => {}
                Some(value) if !ty.matches(value) => errors.add(
                    name,
                    format!(
                        "Tipo esperado era {}, porém foi recebido {}",
                        ty.name(),
                        type_name(value)
                    ),
                ),
                Some(value) => {
                    for message in self.rules_for(name).iter().filter_map(|rule| rule.check(value)) {
                        errors.add(name, message);
                    }
                }
            }
        }

        errors
    }
}
