//! REST API access: the HTTP client and response-shape normalization.
//!
//! Resource collections live under the configured API root:
//! `GET/POST <root>/<resource>` and `GET/PUT/PATCH/DELETE
//! <root>/<resource>/<id>`.

pub mod client;
pub mod envelope;

pub use client::ApiClient;
