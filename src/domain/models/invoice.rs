//! Invoice (`facturas`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::lenient;
use crate::domain::{Record, RecordId, Resource};

/// A tax invoice issued for a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Backend identifier.
    pub id: RecordId,
    /// Fiscal number (`F001-000045`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    /// Sale the invoice was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venta_id: Option<RecordId>,
    /// Denormalized customer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nombre: Option<String>,
    /// Customer tax number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruc: Option<String>,
    /// Issue date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_emision: Option<String>,
    /// `emitida`, `pagada` or `anulada`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Amount before tax.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtotal: Option<f64>,
    /// Tax amount.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub impuesto: Option<f64>,
    /// Amount due.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<f64>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Invoice {
    const RESOURCE: Resource = Resource::Invoices;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.numero, &self.cliente_nombre, &self.ruc]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.estado.as_deref()
    }

    fn date(&self) -> Option<&str> {
        self.fecha_emision.as_deref()
    }

    fn amount(&self) -> Option<f64> {
        self.total
    }
}
