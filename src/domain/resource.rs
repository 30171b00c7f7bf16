//! Catalog of remote resource collections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A remote resource collection exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Shop clients (`clientes`).
    Clients,
    /// Eye-exam and fitting appointments (`citas`).
    Appointments,
    /// Point-of-sale transactions (`ventas`).
    Sales,
    /// Issued invoices (`facturas`).
    Invoices,
    /// Discount campaigns (`promociones`).
    Promotions,
    /// Clinical history entries (`historial-medico`).
    MedicalHistory,
    /// Lens prescriptions (`recetas`).
    Prescriptions,
}

/// Where a freshly created record lands in the local collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Newest first.
    Prepend,
    /// Newest last.
    Append,
}

impl Resource {
    /// Every resource, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Clients,
        Self::Appointments,
        Self::Sales,
        Self::Invoices,
        Self::Promotions,
        Self::MedicalHistory,
        Self::Prescriptions,
    ];

    /// URL path segment of the collection, relative to the API root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Clients => "clientes",
            Self::Appointments => "citas",
            Self::Sales => "ventas",
            Self::Invoices => "facturas",
            Self::Promotions => "promociones",
            Self::MedicalHistory => "historial-medico",
            Self::Prescriptions => "recetas",
        }
    }

    /// Looks a resource up by its URL path segment.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = String;

    /// Accepts the path segment (`ventas`) or the snake_case name (`sales`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if let Some(resource) = Self::from_path(&normalized) {
            return Ok(resource);
        }
        match normalized.as_str() {
            "clients" => Ok(Self::Clients),
            "appointments" => Ok(Self::Appointments),
            "sales" => Ok(Self::Sales),
            "invoices" => Ok(Self::Invoices),
            "promotions" => Ok(Self::Promotions),
            "medical_history" | "medical-history" | "historial_medico" => {
                Ok(Self::MedicalHistory)
            }
            "prescriptions" => Ok(Self::Prescriptions),
            other => Err(format!("unknown resource: {other}")),
        }
    }
}
