//! The request pipeline shared by the Spin component and the tests.

use std::sync::Arc;

use geek_auth::{session_token, AuthSession, SessionStore};
use geek_cache::Cache;
use geek_catalog::CatalogStore;
use geek_media::ImageHost;
use geek_observability::{LogSink, RequestId, StructuredLogger};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{self, Context};
use crate::pages::PageCache;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::router::Endpoint;

pub const WORKLOAD: &str = "geek-api";

pub struct App {
    pub(crate) config: AppConfig,
    pub(crate) catalog: CatalogStore,
    pub(crate) images: Arc<dyn ImageHost>,
    pub(crate) pages: PageCache,
    pub(crate) sessions: SessionStore,
    log_sink: LogSink,
}

impl App {
    /// Sessions and page data share one key-value cache under different
    /// key prefixes.
    pub fn new(
        config: AppConfig,
        catalog: CatalogStore,
        images: Arc<dyn ImageHost>,
        cache: Cache,
    ) -> Self {
        Self {
            pages: PageCache::new(cache.clone(), config.page_ttl),
            sessions: SessionStore::new(cache, config.session_ttl),
            config,
            catalog,
            images,
            log_sink: LogSink::Stderr,
        }
    }

    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pages(&self) -> &PageCache {
        &self.pages
    }

    /// Handle one request. Failures become JSON error responses; this never
    /// fails itself.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let logger = StructuredLogger::new(RequestId::from_header(request.header("x-request-id")))
            .with_workload(WORKLOAD)
            .with_route(request.path.clone())
            .with_min_level(self.config.log_level)
            .with_format(self.config.log_format)
            .with_sink(self.log_sink.clone());

        logger
            .info_builder("Request started")
            .field("method", request.method.as_str())
            .emit();

        let response = match self.dispatch(&request, &logger).await {
            Ok(response) => response,
            Err(err) => {
                log_failure(&logger, &err);
                err.into_response()
            }
        };

        logger
            .info_builder("Request completed")
            .field_i64("status", i64::from(response.status))
            .field_i64("elapsed_us", logger.elapsed_us() as i64)
            .emit();

        response.with_header("x-request-id", logger.request_id().to_string())
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        logger: &StructuredLogger,
    ) -> Result<ApiResponse, ApiError> {
        let endpoint = Endpoint::resolve(&request.method, &request.path)?;
        logger
            .debug_builder("Route matched")
            .field("endpoint", endpoint.name())
            .emit();

        if endpoint.has_body() && request.body.len() > self.config.max_body_bytes {
            return Err(ApiError::PayloadTooLarge {
                limit: self.config.max_body_bytes,
            });
        }

        let session = if endpoint.requires_admin() {
            Some(self.authenticate(request)?)
        } else {
            None
        };

        let ctx = Context {
            app: self,
            request,
            logger,
            session: session.as_ref(),
        };
        handlers::dispatch(&ctx, endpoint).await
    }

    /// The admin session behind the request's bearer token or cookie.
    pub(crate) fn authenticate(&self, request: &ApiRequest) -> Result<AuthSession, ApiError> {
        let token = session_token(request.header("authorization"), request.header("cookie"))
            .ok_or(ApiError::Unauthorized)?;
        self.sessions.get(&token).map_err(ApiError::from_auth)
    }
}

fn log_failure(logger: &StructuredLogger, err: &ApiError) {
    let status = err.status();
    let builder = if status >= 500 {
        logger.error_builder("Request failed")
    } else {
        logger.warn_builder("Request rejected")
    };
    let builder = builder
        .field_i64("status", i64::from(status))
        .field("error", err.to_string());
    match err.cause() {
        Some(cause) => builder.field("cause", cause).emit(),
        None => builder.emit(),
    }
}
