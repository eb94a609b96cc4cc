//! Spin HTTP entry point.

use std::sync::Arc;

use geek_cache::{Cache, SpinStore};
use geek_catalog::CatalogStore;
use geek_db::SpinDb;
use geek_media::CloudinaryHost;
use geek_observability::{RequestId, StructuredLogger};
use spin_sdk::http::{IntoResponse, Method as SpinMethod, Request, Response};
use spin_sdk::http_component;

use crate::app::{App, WORKLOAD};
use crate::config::{AppConfig, SpinVariables};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

#[http_component]
async fn handle_geek_api(req: Request) -> anyhow::Result<impl IntoResponse> {
    let request = into_api_request(&req);
    let response = match build_app().await {
        Ok(app) => app.handle(request).await,
        Err(err) => {
            StructuredLogger::new(RequestId::from_header(request.header("x-request-id")))
                .with_workload(WORKLOAD)
                .with_route(request.path.clone())
                .error_builder("Component setup failed")
                .field("error", format!("{err:#}"))
                .emit();
            ApiError::internal("Erro interno do servidor", &err).into_response()
        }
    };
    Ok(into_spin_response(response))
}

async fn build_app() -> anyhow::Result<App> {
    let config = AppConfig::load(&SpinVariables)?;
    let catalog = CatalogStore::new(SpinDb::open_default()?);
    catalog.migrate().await?;
    let cache = Cache::new(Arc::new(SpinStore::open_default()?));
    let images = Arc::new(CloudinaryHost::new(config.cloudinary.clone()));
    Ok(App::new(config, catalog, images, cache))
}

fn into_api_request(req: &Request) -> ApiRequest {
    let method = match req.method() {
        SpinMethod::Get => http::Method::GET,
        SpinMethod::Head => http::Method::HEAD,
        SpinMethod::Post => http::Method::POST,
        SpinMethod::Put => http::Method::PUT,
        SpinMethod::Patch => http::Method::PATCH,
        SpinMethod::Delete => http::Method::DELETE,
        SpinMethod::Options => http::Method::OPTIONS,
        SpinMethod::Connect => http::Method::CONNECT,
        SpinMethod::Trace => http::Method::TRACE,
        // No route accepts TRACE, so an unparsable method ends in 405.
        SpinMethod::Other(other) => {
            http::Method::from_bytes(other.as_bytes()).unwrap_or(http::Method::TRACE)
        }
    };

    let mut request =
        ApiRequest::new(method, req.path_and_query().unwrap_or("/")).with_body(req.body().to_vec());
    for (name, value) in req.headers() {
        if let Some(value) = value.as_str() {
            request = request.with_header(name, value);
        }
    }
    request
}

fn into_spin_response(response: ApiResponse) -> Response {
    let mut builder = Response::builder();
    builder.status(response.status);
    for (name, value) in &response.headers {
        builder.header(name.as_str(), value.as_str());
    }
    builder.body(response.body).build()
}
