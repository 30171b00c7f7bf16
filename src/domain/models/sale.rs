//! Sale (`ventas`) and its line items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::lenient;
use crate::domain::{Record, RecordId, Resource};

/// A point-of-sale transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Backend identifier.
    pub id: RecordId,
    /// Human-facing sale code (`V-000123`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    /// Buyer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    /// Denormalized buyer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nombre: Option<String>,
    /// Staff member who closed the sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendedor: Option<String>,
    /// Sale date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    /// `pendiente`, `pagada` or `anulada`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Payment method (`efectivo`, `tarjeta`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metodo_pago: Option<String>,
    /// Discount applied to the whole sale.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub descuento: Option<f64>,
    /// Amount charged.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<f64>,
    /// Line items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detalles: Vec<SaleLine>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One product line of a [`Sale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Product sold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<RecordId>,
    /// Product description as printed on the receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Units sold.
    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub cantidad: Option<u32>,
    /// Price per unit.
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub precio_unitario: Option<f64>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SaleLine {
    /// `cantidad * precio_unitario`, treating missing values as zero.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.cantidad.unwrap_or(0)) * self.precio_unitario.unwrap_or(0.0)
    }
}

impl Sale {
    /// Sum of the line totals minus the sale-level discount.
    #[must_use]
    pub fn computed_total(&self) -> f64 {
        let gross: f64 = self.detalles.iter().map(SaleLine::line_total).sum();
        gross - self.descuento.unwrap_or(0.0)
    }
}

impl Record for Sale {
    const RESOURCE: Resource = Resource::Sales;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.codigo, &self.cliente_nombre, &self.vendedor]
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

    /// The charged total, or the line-item total when the backend left
    /// `total` out.
    fn amount(&self) -> Option<f64> {
        self.total
            .or_else(|| (!self.detalles.is_empty()).then(|| self.computed_total()))
    }
}
