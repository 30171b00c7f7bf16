//! Clinical history entry (`historial-medico`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Record, RecordId, Resource};

/// One consultation recorded in a client's clinical history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    /// Backend identifier.
    pub id: RecordId,
    /// Patient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    /// Denormalized patient name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nombre: Option<String>,
    /// Consultation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    /// Consultation kind (`control`, `primera_vez`, `urgencia`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    /// Chief complaint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivo_consulta: Option<String>,
    /// Relevant medical background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antecedentes: Option<String>,
    /// Diagnosis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostico: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for MedicalHistoryEntry {
    const RESOURCE: Resource = Resource::MedicalHistory;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.cliente_nombre, &self.motivo_consulta, &self.diagnostico]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.tipo.as_deref()
    }

    fn date(&self) -> Option<&str> {
        self.fecha.as_deref()
    }
}
