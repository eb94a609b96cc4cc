//! Category endpoints.

use chrono::Utc;
use geek_catalog::validation::{CategoryCreate, CategoryUpdate};
use geek_catalog::{CatalogError, Category, CategoryId};

use super::{Context, Mutated};
use crate::error::{ApiError, Subject};
use crate::pages::{category_path, Revalidated, HOME_PATH};
use crate::response::ApiResponse;

pub const CATEGORY_EXISTS: &str = "Categoria já existente";
pub const CATEGORY_NAME_TAKEN: &str = "Categoria com mesmo nome já existe";

fn store_error(err: CatalogError) -> ApiError {
    ApiError::from_catalog(err, Subject::Category)
}

/// `?withProducts=true` nests each category's products.
pub async fn list(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let catalog = &ctx.app.catalog;
    if ctx.request.query_param("withProducts") == Some("true") {
        let categories = catalog
            .list_categories_with_products()
            .await
            .map_err(store_error)?;
        Ok(ApiResponse::ok(&categories))
    } else {
        let categories = catalog.list_categories().await.map_err(store_error)?;
        Ok(ApiResponse::ok(&categories))
    }
}

pub async fn get(ctx: &Context<'_>, id: &CategoryId) -> Result<ApiResponse, ApiError> {
    let category = ctx
        .app
        .catalog
        .get_category_with_products(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| ApiError::category_not_found(id))?;
    Ok(ApiResponse::ok(&category))
}

pub async fn create(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let input = CategoryCreate::parse(&ctx.request.json()?)?;
    let catalog = &ctx.app.catalog;
    if catalog
        .find_category_by_name(&input.name)
        .await
        .map_err(store_error)?
        .is_some()
    {
        return Err(ApiError::bad_request(CATEGORY_EXISTS));
    }

    let category = Category::new(input.name, Utc::now());
    catalog.insert_category(&category).await.map_err(store_error)?;

    ctx.logger
        .info_builder("Category created")
        .field("category_id", category.id.as_str())
        .field("admin", ctx.admin())
        .emit();
    let revalidated = revalidate(ctx, &category.id);
    Ok(ApiResponse::created(&Mutated::new(&category, revalidated)))
}

pub async fn update(ctx: &Context<'_>, id: &CategoryId) -> Result<ApiResponse, ApiError> {
    let input = CategoryUpdate::parse(&ctx.request.json()?)?;
    let catalog = &ctx.app.catalog;
    let mut category = catalog.require_category(id).await.map_err(store_error)?;

    let now = Utc::now();
    match input.name {
        Some(name) => {
            let clash = catalog.find_category_by_name(&name).await.map_err(store_error)?;
            if clash.is_some_and(|other| other.id != category.id) {
                return Err(ApiError::bad_request(CATEGORY_NAME_TAKEN));
            }
            category.rename(name, now);
        }
        None => category.updated_at = now,
    }
    catalog.update_category(&category).await.map_err(store_error)?;

    ctx.logger
        .info_builder("Category updated")
        .field("category_id", category.id.as_str())
        .field("admin", ctx.admin())
        .emit();
    let revalidated = revalidate(ctx, &category.id);
    Ok(ApiResponse::ok(&Mutated::new(&category, revalidated)))
}

pub async fn delete(ctx: &Context<'_>, id: &CategoryId) -> Result<ApiResponse, ApiError> {
    let category = ctx.app.catalog.delete_category(id).await.map_err(store_error)?;

    ctx.logger
        .info_builder("Category deleted")
        .field("category_id", category.id.as_str())
        .field("admin", ctx.admin())
        .emit();
    let revalidated = revalidate(ctx, &category.id);
    Ok(ApiResponse::ok(&Mutated::new(&category, revalidated)))
}

fn revalidate(ctx: &Context<'_>, id: &CategoryId) -> Revalidated {
    let pages = &ctx.app.pages;
    let revalidated = Revalidated {
        home: pages.revalidate(HOME_PATH),
        product: None,
        category: Some(pages.revalidate(&category_path(id))),
    };
    ctx.report_revalidation(&revalidated);
    revalidated
}
