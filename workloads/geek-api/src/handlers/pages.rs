//! Page data endpoints, served from the page cache when fresh.

use std::future::Future;

use geek_catalog::{CatalogError, CategoryId, CategoryWithProducts, Product, ProductId};
use serde::Serialize;
use serde_json::Value;

use super::Context;
use crate::error::{ApiError, Subject};
use crate::pages::{category_path, product_path, HOME_PATH};
use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
struct HomePage {
    categories: Vec<CategoryWithProducts>,
}

#[derive(Debug, Serialize)]
struct ProductPage {
    product: Product,
    /// The product's category with its products, shown as similar items.
    category: CategoryWithProducts,
}

fn store_error(err: CatalogError) -> ApiError {
    ApiError::from_catalog(err, Subject::Category)
}

pub async fn home(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    serve(ctx, HOME_PATH, move || async move {
        let categories = ctx
            .app
            .catalog
            .list_categories_with_products()
            .await
            .map_err(store_error)?;
        Ok(HomePage { categories })
    })
    .await
}

pub async fn category(ctx: &Context<'_>, id: &CategoryId) -> Result<ApiResponse, ApiError> {
    serve(ctx, &category_path(id), move || async move {
        ctx.app
            .catalog
            .get_category_with_products(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| ApiError::category_not_found(id))
    })
    .await
}

pub async fn product(ctx: &Context<'_>, id: &ProductId) -> Result<ApiResponse, ApiError> {
    serve(ctx, &product_path(id), move || async move {
        let catalog = &ctx.app.catalog;
        let product = catalog
            .get_product(id)
            .await
            .map_err(|e| ApiError::from_catalog(e, Subject::Product))?
            .ok_or_else(|| ApiError::product_not_found(id))?;
        let category = catalog
            .get_category_with_products(&product.category_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| ApiError::category_not_found(&product.category_id))?;
        Ok(ProductPage { product, category })
    })
    .await
}

/// Answer from the cache, or load, cache and answer. Cache failures are
/// logged and served as misses.
async fn serve<T, F, Fut>(ctx: &Context<'_>, path: &str, load: F) -> Result<ApiResponse, ApiError>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let pages = &ctx.app.pages;
    let cache_control = format!("public, s-maxage={}", pages.ttl().num_seconds());

    match pages.cached::<Value>(path) {
        Ok(Some(page)) => {
            return Ok(ApiResponse::ok(&page)
                .with_header("cache-control", cache_control)
                .with_header("x-cache", "HIT"));
        }
        Ok(None) => {}
        Err(err) => ctx
            .logger
            .warn_builder("Page cache read failed")
            .field("path", path)
            .field("error", err.to_string())
            .emit(),
    }

    let page = load().await?;
    if let Err(err) = pages.store(path, &page) {
        ctx.logger
            .warn_builder("Page cache write failed")
            .field("path", path)
            .field("error", err.to_string())
            .emit();
    }
    Ok(ApiResponse::ok(&page)
        .with_header("cache-control", cache_control)
        .with_header("x-cache", "MISS"))
}
