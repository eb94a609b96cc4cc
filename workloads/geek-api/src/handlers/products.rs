//! Product endpoints.
//!
//! Writes that replace or drop an image follow one order: upload the new
//! image, write the record, then destroy the image the record no longer
//! points at. A failed write destroys the fresh upload; a failed cleanup
//! leaves the old image behind and is reported as a warning.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use futures::future::join_all;
use geek_catalog::validation::{
    FieldErrors, ProductCreate, ProductMove, ProductRemoval, ProductUpdate, ValidationError,
};
use geek_catalog::{
    CatalogError, CategoryId, Product, ProductChanges, ProductId, ProductQuery,
};
use geek_media::{ImageData, UploadedImage};
use serde::Serialize;

use super::{Context, Mutated};
use crate::error::{ApiError, Subject, CATEGORY_MISSING, CATEGORY_NOT_FOUND};
use crate::pages::{category_path, product_path, Revalidated, HOME_PATH};
use crate::response::ApiResponse;

pub const PRODUCT_EXISTS: &str = "Produto já existente";
pub const PRODUCT_NAME_TAKEN: &str = "Produto com mesmo nome já existe";
pub const INVALID_SEARCH: &str =
    "Parâmetros da URL inválidos, o parâmetro precisa ser `q=VALOR`";
pub const OLD_IMAGE_KEPT: &str =
    "Produto atualizado, porém sua imagem antiga não pôde ser excluída";
pub const IMAGE_KEPT: &str = "Produto deletado, porém sua imagem não pôde ser excluída";

fn store_error(err: CatalogError) -> ApiError {
    ApiError::from_catalog(err, Subject::Product)
}

pub async fn list(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let products = ctx.app.catalog.list_products().await.map_err(store_error)?;
    Ok(ApiResponse::ok(&products))
}

pub async fn search(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let query = ctx
        .request
        .query_param("q")
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request(INVALID_SEARCH))?;
    let products = ctx
        .app
        .catalog
        .search_products(query)
        .await
        .map_err(store_error)?;
    ctx.logger
        .debug_builder("Search")
        .field("query", query)
        .field_i64("results", products.len() as i64)
        .emit();
    Ok(ApiResponse::ok(&products))
}

pub async fn get(ctx: &Context<'_>, id: &ProductId) -> Result<ApiResponse, ApiError> {
    let product = ctx
        .app
        .catalog
        .get_product(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| ApiError::product_not_found(id))?;
    Ok(ApiResponse::ok(&product))
}

pub async fn create(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let input = ProductCreate::parse(&ctx.request.json()?)?;
    let catalog = &ctx.app.catalog;

    if catalog
        .find_product_by_name(&input.name)
        .await
        .map_err(store_error)?
        .is_some()
    {
        return Err(ApiError::bad_request(PRODUCT_EXISTS));
    }
    let category_id = category_by_name(ctx, &input.category_name).await?;
    let image = parse_image(&input.base64_image)?;
    let uploaded = upload(ctx, &image).await?;

    let product = Product::new(
        input.name,
        input.price,
        input.description,
        uploaded.url.clone(),
        category_id,
        Utc::now(),
    );
    if let Err(err) = catalog.insert_product(&product).await {
        discard_upload(ctx, &uploaded).await;
        return Err(store_error(err));
    }

    ctx.logger
        .info_builder("Product created")
        .field("product_id", product.id.as_str())
        .field("admin", ctx.admin())
        .emit();
    let revalidated = revalidate(ctx, &product, None);
    Ok(ApiResponse::created(&Mutated::new(&product, revalidated)))
}

pub async fn update(ctx: &Context<'_>, id: &ProductId) -> Result<ApiResponse, ApiError> {
    let input = ProductUpdate::parse(&ctx.request.json()?)?;
    let catalog = &ctx.app.catalog;
    let current = catalog.require_product(id).await.map_err(store_error)?;

    if let Some(name) = &input.name {
        let clash = catalog.find_product_by_name(name).await.map_err(store_error)?;
        if clash.is_some_and(|other| other.id != current.id) {
            return Err(ApiError::bad_request(PRODUCT_NAME_TAKEN));
        }
    }
    let category_id = match &input.category_name {
        Some(name) => Some(category_by_name(ctx, name).await?),
        None => None,
    };
    let uploaded = match &input.base64_image {
        Some(data_uri) => Some(upload(ctx, &parse_image(data_uri)?).await?),
        None => None,
    };

    let changes = ProductChanges {
        name: input.name,
        price: input.price,
        description: input.description,
        image_url: uploaded.as_ref().map(|image| image.url.clone()),
        category_id,
    };
    let updated = current.with_changes(changes, Utc::now());
    if let Err(err) = catalog.update_product(&updated).await {
        if let Some(uploaded) = &uploaded {
            discard_upload(ctx, uploaded).await;
        }
        return Err(store_error(err));
    }

    let mut warning = None;
    if uploaded.is_some() && !destroy_image(ctx, &current.image_url).await {
        warning = Some(OLD_IMAGE_KEPT);
    }

    ctx.logger
        .info_builder("Product updated")
        .field("product_id", updated.id.as_str())
        .field_bool("image_replaced", uploaded.is_some())
        .field("admin", ctx.admin())
        .emit();
    let previous_category =
        (current.category_id != updated.category_id).then_some(&current.category_id);
    let revalidated = revalidate(ctx, &updated, previous_category);
    Ok(ApiResponse::ok(
        &Mutated::new(&updated, revalidated).with_warning(warning),
    ))
}

pub async fn delete(ctx: &Context<'_>, id: &ProductId) -> Result<ApiResponse, ApiError> {
    let product = ctx.app.catalog.delete_product(id).await.map_err(store_error)?;
    let revalidated = revalidate(ctx, &product, None);
    let warning = (!destroy_image(ctx, &product.image_url).await).then_some(IMAGE_KEPT);

    ctx.logger
        .info_builder("Product deleted")
        .field("product_id", product.id.as_str())
        .field("admin", ctx.admin())
        .emit();
    Ok(ApiResponse::ok(
        &Mutated::new(&product, revalidated).with_warning(warning),
    ))
}

#[derive(Debug, Serialize)]
struct Moved {
    products: Vec<Product>,
    revalidated: BTreeMap<String, bool>,
}

pub async fn move_to_category(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let input = ProductMove::parse(&ctx.request.json()?)?;
    let catalog = &ctx.app.catalog;

    let category = catalog
        .find_category_by_name(&input.category_name)
        .await
        .map_err(store_error)?
        .ok_or(ApiError::NotFound {
            message: CATEGORY_NOT_FOUND,
            id: None,
        })?;
    let before = require_all(ctx, &input.product_ids).await?;

    catalog
        .move_products(&input.product_ids, &category.id, Utc::now())
        .await
        .map_err(store_error)?;
    let products = catalog
        .find_products(&ProductQuery::new().with_ids(input.product_ids.clone()))
        .await
        .map_err(store_error)?;

    let mut paths = BTreeSet::from([HOME_PATH.to_string(), category_path(&category.id)]);
    for product in &before {
        paths.insert(product_path(&product.id));
        paths.insert(category_path(&product.category_id));
    }
    let revalidated = ctx.app.pages.revalidate_all(paths);

    ctx.logger
        .info_builder("Products moved")
        .field("category_id", category.id.as_str())
        .field_i64("products", products.len() as i64)
        .field("admin", ctx.admin())
        .emit();
    Ok(ApiResponse::ok(&Moved {
        products,
        revalidated,
    }))
}

#[derive(Debug, Serialize)]
struct Removed {
    products: Vec<Product>,
    warnings: Vec<String>,
    revalidated: BTreeMap<String, bool>,
}

pub async fn remove(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let input = ProductRemoval::parse(&ctx.request.json()?)?;
    let products = require_all(ctx, &input.product_ids).await?;

    ctx.app
        .catalog
        .delete_products(&input.product_ids)
        .await
        .map_err(store_error)?;

    let mut paths = BTreeSet::from([HOME_PATH.to_string()]);
    for product in &products {
        paths.insert(product_path(&product.id));
        paths.insert(category_path(&product.category_id));
    }
    let revalidated = ctx.app.pages.revalidate_all(paths);

    // Image cleanups are independent of each other.
    let destroyed = join_all(
        products
            .iter()
            .map(|product| destroy_image(ctx, &product.image_url)),
    )
    .await;
    let warnings: Vec<String> = products
        .iter()
        .zip(destroyed)
        .filter(|(_, gone)| !gone)
        .map(|(product, _)| format!("{}: {IMAGE_KEPT}", product.name))
        .collect();

    ctx.logger
        .info_builder("Products removed")
        .field_i64("products", products.len() as i64)
        .field_i64("warnings", warnings.len() as i64)
        .field("admin", ctx.admin())
        .emit();
    Ok(ApiResponse::ok(&Removed {
        products,
        warnings,
        revalidated,
    }))
}

/// Load every product in `ids`, failing on the first one that is missing.
async fn require_all(ctx: &Context<'_>, ids: &[ProductId]) -> Result<Vec<Product>, ApiError> {
    let found = ctx
        .app
        .catalog
        .find_products(&ProductQuery::new().with_ids(ids.to_vec()))
        .await
        .map_err(store_error)?;
    let mut by_id: BTreeMap<ProductId, Product> =
        found.into_iter().map(|p| (p.id.clone(), p)).collect();
    ids.iter()
        .map(|id| by_id.remove(id).ok_or_else(|| ApiError::product_not_found(id)))
        .collect()
}

async fn category_by_name(ctx: &Context<'_>, name: &str) -> Result<CategoryId, ApiError> {
    ctx.app
        .catalog
        .find_category_by_name(name)
        .await
        .map_err(store_error)?
        .map(|category| category.id)
        .ok_or_else(|| ApiError::bad_request(CATEGORY_MISSING))
}

/// A bad data URI is reported against the `base64Image` field.
fn parse_image(data_uri: &str) -> Result<ImageData, ApiError> {
    ImageData::parse(data_uri).map_err(|err| {
        let mut fields = FieldErrors::default();
        fields.add("base64Image", err.to_string());
        ApiError::Validation(ValidationError {
            message: "Produto inválido",
            fields,
        })
    })
}

async fn upload(ctx: &Context<'_>, image: &ImageData) -> Result<UploadedImage, ApiError> {
    let uploaded = ctx
        .app
        .images
        .upload(image)
        .await
        .map_err(|err| ApiError::ImageUpload(err.to_string()))?;
    ctx.logger
        .debug_builder("Image uploaded")
        .field("public_id", uploaded.public_id.as_str())
        .field_i64("bytes", image.size_bytes() as i64)
        .emit();
    Ok(uploaded)
}

/// Drop an upload whose record was never written.
async fn discard_upload(ctx: &Context<'_>, uploaded: &UploadedImage) {
    if let Err(err) = ctx.app.images.destroy(&uploaded.public_id).await {
        ctx.logger
            .warn_builder("Failed to discard uploaded image")
            .field("public_id", uploaded.public_id.as_str())
            .field("error", err.to_string())
            .emit();
    }
}

/// Destroy the image behind `url`, reporting whether it is gone.
async fn destroy_image(ctx: &Context<'_>, url: &str) -> bool {
    match ctx.app.images.destroy_url(url).await {
        Ok(_) => true,
        Err(err) => {
            ctx.logger
                .warn_builder("Failed to destroy image")
                .field("image_url", url)
                .field("error", err.to_string())
                .emit();
            false
        }
    }
}

/// Home, the product page and its category page. When the product left a
/// category, that category's page counts too.
fn revalidate(
    ctx: &Context<'_>,
    product: &Product,
    previous_category: Option<&CategoryId>,
) -> Revalidated {
    let pages = &ctx.app.pages;
    let mut category = pages.revalidate(&category_path(&product.category_id));
    if let Some(previous) = previous_category {
        category &= pages.revalidate(&category_path(previous));
    }
    let revalidated = Revalidated {
        home: pages.revalidate(HOME_PATH),
        product: Some(pages.revalidate(&product_path(&product.id))),
        category: Some(category),
    };
    ctx.report_revalidation(&revalidated);
    revalidated
}
