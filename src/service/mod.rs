//! Service layer: loader, collection and mutator orchestration.
//!
//! [`ResourceService`] ties an [`crate::api::ApiClient`] to a
//! [`crate::store::CollectionStore`], reconciles the local collection
//! after each successful call and posts every failure to the
//! [`crate::notice::NoticeBoard`].

pub mod resource_service;

pub use resource_service::{LoadState, ResourceService};
