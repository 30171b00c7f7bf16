//! Lens prescription (`recetas`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::lenient;
use crate::domain::{Record, RecordId, Resource};

/// Refraction values for one eye.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeMeasurement {
    /// Sphere, in diopters.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub esfera: Option<f64>,
    /// Cylinder, in diopters.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub cilindro: Option<f64>,
    /// Cylinder axis, in degrees.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub eje: Option<f64>,
    /// Near addition, in diopters.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub adicion: Option<f64>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A lens prescription written after an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    /// Backend identifier.
    pub id: RecordId,
    /// Patient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    /// Denormalized patient name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nombre: Option<String>,
    /// Prescribing optometrist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optometrista: Option<String>,
    /// Exam date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    /// `monofocal`, `bifocal`, `progresivo` or `contacto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_lente: Option<String>,
    /// Right eye (oculus dexter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub od: Option<EyeMeasurement>,
    /// Left eye (oculus sinister).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oi: Option<EyeMeasurement>,
    /// Interpupillary distance, in millimetres.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub distancia_pupilar: Option<f64>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Prescription {
    const RESOURCE: Resource = Resource::Prescriptions;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.cliente_nombre, &self.optometrista, &self.tipo_lente]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.tipo_lente.as_deref()
    }

    fn date(&self) -> Option<&str> {
        self.fecha.as_deref()
    }
}
