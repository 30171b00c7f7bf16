//! Domain layer: record identity, the resource catalog and typed models.
//!
//! Records are transient mirrors of backend rows. The only invariant
//! enforced locally is that every record carries an identifier.

pub mod lenient;
pub mod models;
pub mod record;
pub mod record_id;
pub mod resource;

pub use models::{
    Appointment, Client, EyeMeasurement, Invoice, MedicalHistoryEntry, Prescription, Promotion,
    Sale, SaleLine,
};
pub use record::{Fetched, Record, merge_patch};
pub use record_id::RecordId;
pub use resource::{InsertPosition, Resource};
