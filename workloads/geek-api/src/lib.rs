//! AluraGeek catalog HTTP API.
//!
//! A JSON API over the catalog store, served as a Spin component. The
//! request pipeline ([`App::handle`]) is transport-independent: the Spin
//! entry point converts to and from [`ApiRequest`]/[`ApiResponse`], and the
//! integration tests drive it natively with in-memory backends.
//!
//! ```rust,ignore
//! let app = App::new(config, catalog, Arc::new(MemoryImageHost::new()), cache);
//! let response = app.handle(ApiRequest::get("/api/pages/home")).await;
//! assert_eq!(response.header("x-cache"), Some("MISS"));
//! ```

pub mod app;
pub mod config;
pub mod error;
mod handlers;
pub mod pages;
pub mod request;
pub mod response;
pub mod router;

#[cfg(target_arch = "wasm32")]
mod spin;

pub use app::App;
pub use config::{AppConfig, ConfigError, EnvVariables, MapVariables, VariableSource};
pub use error::ApiError;
pub use pages::{PageCache, Revalidated};
pub use request::ApiRequest;
pub use response::ApiResponse;
pub use router::Endpoint;
