//! Promotion (`promociones`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::lenient;
use crate::domain::{Record, RecordId, Resource};

/// A discount campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// Backend identifier.
    pub id: RecordId,
    /// Campaign name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    /// Coupon code typed at the counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    /// Campaign description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// `porcentaje` or `monto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    /// Discount value, interpreted according to `tipo`.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub descuento: Option<f64>,
    /// First valid day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<String>,
    /// Last valid day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<String>,
    /// `activa` or `inactiva`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Promotion {
    const RESOURCE: Resource = Resource::Promotions;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.nombre, &self.codigo, &self.descripcion]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.estado.as_deref()
    }

    fn date(&self) -> Option<&str> {
        self.fecha_inicio.as_deref()
    }

    fn amount(&self) -> Option<f64> {
        self.descuento
    }
}
