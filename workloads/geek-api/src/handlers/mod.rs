//! Endpoint handlers.

mod auth;
mod categories;
mod pages;
mod products;

use geek_auth::AuthSession;
use geek_observability::StructuredLogger;
use serde::Serialize;

use crate::app::App;
use crate::error::ApiError;
use crate::pages::Revalidated;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::router::Endpoint;

/// What a handler gets to work with.
pub struct Context<'a> {
    pub app: &'a App,
    pub request: &'a ApiRequest,
    pub logger: &'a StructuredLogger,
    /// Present on admin endpoints.
    pub session: Option<&'a AuthSession>,
}

/// A written record with the outcome of revalidating its pages.
#[derive(Debug, Serialize)]
pub struct Mutated<'a, T: Serialize> {
    #[serde(flatten)]
    pub record: &'a T,
    pub revalidated: Revalidated,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl<'a, T: Serialize> Mutated<'a, T> {
    pub fn new(record: &'a T, revalidated: Revalidated) -> Self {
        Self {
            record,
            revalidated,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<&'static str>) -> Self {
        self.warning = warning;
        self
    }
}

pub async fn dispatch(ctx: &Context<'_>, endpoint: Endpoint) -> Result<ApiResponse, ApiError> {
    match endpoint {
        Endpoint::ListProducts => products::list(ctx).await,
        Endpoint::SearchProducts => products::search(ctx).await,
        Endpoint::GetProduct(id) => products::get(ctx, &id).await,
        Endpoint::CreateProduct => products::create(ctx).await,
        Endpoint::UpdateProduct(id) => products::update(ctx, &id).await,
        Endpoint::DeleteProduct(id) => products::delete(ctx, &id).await,
        Endpoint::MoveProducts => products::move_to_category(ctx).await,
        Endpoint::RemoveProducts => products::remove(ctx).await,
        Endpoint::ListCategories => categories::list(ctx).await,
        Endpoint::GetCategory(id) => categories::get(ctx, &id).await,
        Endpoint::CreateCategory => categories::create(ctx).await,
        Endpoint::UpdateCategory(id) => categories::update(ctx, &id).await,
        Endpoint::DeleteCategory(id) => categories::delete(ctx, &id).await,
        Endpoint::HomePage => pages::home(ctx).await,
        Endpoint::CategoryPage(id) => pages::category(ctx, &id).await,
        Endpoint::ProductPage(id) => pages::product(ctx, &id).await,
        Endpoint::Login => auth::login(ctx).await,
        Endpoint::Logout => auth::logout(ctx).await,
        Endpoint::Session => auth::session(ctx).await,
    }
}

impl Context<'_> {
    /// Log pages that could not be revalidated. The mutation stands.
    pub fn report_revalidation(&self, revalidated: &Revalidated) {
        if !revalidated.all_ok() {
            self.logger
                .warn_builder("Page revalidation failed")
                .field_bool("home", revalidated.home)
                .field_bool("product", revalidated.product.unwrap_or(true))
                .field_bool("category", revalidated.category.unwrap_or(true))
                .emit();
        }
    }

    /// Admin email for audit fields.
    pub fn admin(&self) -> &str {
        self.session.map(|s| s.email.as_str()).unwrap_or("-")
    }
}
