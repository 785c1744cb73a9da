//! DocBay - minimal documentation hosting server
//!
//! DocBay accepts zipped documentation bundles uploaded per
//! (project, version) pair, extracts them onto a filesystem hierarchy,
//! and serves their static contents back over HTTP.
//!
//! The domain core is [`store::ProjectStore`], which owns the on-disk
//! layout (`<data_dir>/proj/<project>/<version>/...`) and the staged
//! ingestion of uploaded archives. Everything else is the HTTP surface
//! around it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docbay::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     docbay::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Endpoints
//!
//! - `GET /` - index page: project listing and upload form
//! - `POST /_/upload` - multipart archive upload (project, version, content)
//! - `GET /_/delete?project=P&version=V` - delete a version
//! - `GET /{project}` - redirect to the project's `latest` version
//! - `GET /{project}/{version}/...` - serve the version's static files
//! - `GET /health` - liveness probe

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{ServerError, ServerResult, StoreError};
pub use server::{build_router, start_server};
pub use state::AppState;
pub use store::ProjectStore;
