//! One typed model per remote resource.
//!
//! Every model keeps the fields it does not name in a flattened `extra`
//! map, so serializing a decoded record reproduces the backend document.

pub mod appointment;
pub mod client;
pub mod invoice;
pub mod medical_history;
pub mod prescription;
pub mod promotion;
pub mod sale;

pub use appointment::Appointment;
pub use client::Client;
pub use invoice::Invoice;
pub use medical_history::MedicalHistoryEntry;
pub use prescription::{EyeMeasurement, Prescription};
pub use promotion::Promotion;
pub use sale::{Sale, SaleLine};
