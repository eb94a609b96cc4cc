//! API errors and their JSON bodies.

use geek_auth::AuthError;
use geek_catalog::validation::ValidationError;
use geek_catalog::CatalogError;
use serde_json::{json, Value};
use thiserror::Error;

use crate::response::ApiResponse;

pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";
pub const CATEGORY_NOT_FOUND: &str = "Categoria não encontrada";
pub const CATEGORY_MISSING: &str = "Categoria não existe, selecione uma categoria existente ou crie uma nova antes de adicionar o produto";
pub const CATEGORY_IN_USE: &str =
    "A categoria possui produtos, mova ou exclua os produtos antes de excluí-la";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Rota não encontrada")]
    RouteNotFound,

    #[error("O método HTTP {method} não é suportado nessa rota")]
    MethodNotAllowed {
        method: String,
        allowed: Vec<&'static str>,
    },

    #[error("O corpo da requisição excede o limite de {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("JSON inválido")]
    InvalidJson,

    #[error("Não autorizado")]
    Unauthorized,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Identificador inválido")]
    InvalidId,

    #[error("{message}")]
    NotFound {
        message: &'static str,
        id: Option<String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store refused the write.
    #[error("Ação inválida")]
    InvalidAction(String),

    #[error("Erro desconhecido ao fazer upload da imagem")]
    ImageUpload(String),

    /// `message` is returned to the client, `cause` only logged.
    #[error("{message}")]
    Internal { message: String, cause: String },
}

/// What a failed store call was acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Product,
    Category,
}

impl Subject {
    fn name(self) -> &'static str {
        match self {
            Subject::Product => "produto",
            Subject::Category => "categoria",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn product_not_found(id: impl ToString) -> Self {
        ApiError::NotFound {
            message: PRODUCT_NOT_FOUND,
            id: Some(id.to_string()),
        }
    }

    pub fn category_not_found(id: impl ToString) -> Self {
        ApiError::NotFound {
            message: CATEGORY_NOT_FOUND,
            id: Some(id.to_string()),
        }
    }

    pub fn internal(message: impl Into<String>, cause: impl ToString) -> Self {
        ApiError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Map a store failure. Not-found and conflict errors keep their
    /// meaning; anything else is an unknown error about `subject`.
    pub fn from_catalog(err: CatalogError, subject: Subject) -> Self {
        match err {
            CatalogError::ProductNotFound(id) => ApiError::product_not_found(id),
            CatalogError::CategoryNotFound(id) => ApiError::category_not_found(id),
            CatalogError::CategoryInUse { .. } => ApiError::InvalidAction(CATEGORY_IN_USE.into()),
            CatalogError::DuplicateProduct(_) | CatalogError::DuplicateCategory(_) => {
                ApiError::InvalidAction(err.to_string())
            }
            CatalogError::Validation(e) => ApiError::Validation(e),
            CatalogError::Database(e) if e.is_constraint_violation() => {
                ApiError::InvalidAction(e.to_string())
            }
            other => ApiError::internal(
                format!("Erro desconhecido ao realizar ação com {}", subject.name()),
                other,
            ),
        }
    }

    pub fn from_auth(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            e if e.is_auth_failure() => ApiError::Unauthorized,
            other => ApiError::internal("Erro desconhecido ao autenticar", other),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::RouteNotFound | ApiError::NotFound { .. } => 404,
            ApiError::MethodNotAllowed { .. } => 405,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::Unauthorized | ApiError::InvalidCredentials => 401,
            ApiError::InvalidJson
            | ApiError::InvalidId
            | ApiError::BadRequest(_)
            | ApiError::Validation(_)
            | ApiError::InvalidAction(_) => 400,
            ApiError::ImageUpload(_) | ApiError::Internal { .. } => 500,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            ApiError::Validation(e) => json!({ "error": e.message, "fields": e.fields }),
            ApiError::InvalidAction(message) => {
                json!({ "error": self.to_string(), "message": message })
            }
            ApiError::NotFound { message, id: Some(id) } => json!({ "error": message, "id": id }),
            _ => json!({ "error": self.to_string() }),
        }
    }

    /// Detail worth logging beyond the client message.
    pub fn cause(&self) -> Option<&str> {
        match self {
            ApiError::Internal { cause, .. } | ApiError::ImageUpload(cause) => Some(cause),
            ApiError::InvalidAction(message) => Some(message),
            _ => None,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let mut response = ApiResponse::json(self.status(), &self.body());
        if let ApiError::MethodNotAllowed { allowed, .. } = &self {
            response = response.with_header("allow", allowed.join(", "));
        }
        response
    }
}
