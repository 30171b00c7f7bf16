//! # optica-client
//!
//! Data layer for an optical-shop management front-end. Each screen of the
//! shop (clients, appointments, sales, invoices, promotions, medical
//! history, prescriptions) is backed by a remote REST collection; this
//! crate loads those collections, keeps a local copy, derives filtered and
//! sorted views from it, and applies create/update/delete operations
//! against the backend before reconciling the local copy.
//!
//! ## Architecture
//!
//! ```text
//! Screen / CLI
//!     │
//!     ├── ViewQuery ──► derive_view (view/)
//!     │
//!     ├── ResourceService<R> (service/)
//!     │       ├── CollectionStore<R> + change events (store/)
//!     │       └── NoticeBoard (notice/)
//!     │
//!     ├── ApiClient (api/)
//!     │
//!     └── REST backend  (or the in-memory sandbox/)
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod notice;
pub mod sandbox;
pub mod service;
pub mod store;
pub mod view;
