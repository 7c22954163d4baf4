//! # stockroom-api: REST Network Boundary
//!
//! Everything that crosses the wire lives in this crate: the typed REST
//! contract as per-domain traits, the reqwest implementation, error
//! normalization, and the multipart image-upload plumbing.
//!
//! ## Modules
//!
//! - [`config`] - Environment-driven connection settings
//! - [`error`] - The normalized `{ status, description }` error shape
//! - [`traits`] - `InventoryApi` / `ReservationApi` / `UserDirectoryApi` /
//!   `SessionApi` seams the stores are generic over
//! - [`client`] - `HttpApi`, the reqwest implementation of all four traits
//! - [`upload`] - Cancellation tokens and progress streams for uploads
//!
//! ## Error Contract
//! Every failure arrives as [`ApiError`] with an HTTP-like `status`
//! (500 when the transport supplied none, 499 for a cancelled upload)
//! and a human-readable `description`. Call sites branch on status.

pub mod client;
pub mod config;
pub mod error;
pub mod traits;
pub mod upload;

pub use client::HttpApi;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, STATUS_CANCELLED};
pub use traits::{
    CreateAccountOptions, InventoryApi, ReservationApi, ReservationChange, SessionApi,
    UserDirectoryApi,
};
pub use upload::{CancelToken, ProgressFn, UploadImageRequest};
