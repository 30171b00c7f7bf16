//! Appointment (`citas`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{InsertPosition, Record, RecordId, Resource};

/// An eye-exam or fitting appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Backend identifier.
    pub id: RecordId,
    /// Client the appointment belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    /// Denormalized client name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nombre: Option<String>,
    /// Scheduled day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    /// Scheduled time of day (`HH:MM`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora: Option<String>,
    /// Reason for the visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
    /// Attending optometrist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optometrista: Option<String>,
    /// `pendiente`, `confirmada`, `completada` or `cancelada`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Appointment {
    const RESOURCE: Resource = Resource::Appointments;
    // Agenda screens read chronologically.
    const INSERT_AT: InsertPosition = InsertPosition::Append;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.cliente_nombre, &self.motivo, &self.optometrista]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.estado.as_deref()
    }

    fn date(&self) -> Option<&str> {
        self.fecha.as_deref()
    }
}
