//! Local collection state: snapshot store and change notifications.

pub mod collection;
pub mod collection_event;

pub use collection::CollectionStore;
pub use collection_event::CollectionEvent;
