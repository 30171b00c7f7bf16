//! Shop client (`clientes`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Record, RecordId, Resource};

/// A registered client of the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Backend identifier.
    pub id: RecordId,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    /// National identity document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    /// Contact e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    /// Account status (`activo`, `inactivo`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Registration date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_registro: Option<String>,
    /// Backend fields this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Given and family name joined by a space, skipping absent parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.nombre.as_deref(), self.apellido.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Record for Client {
    const RESOURCE: Resource = Resource::Clients;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [
            &self.nombre,
            &self.apellido,
            &self.documento,
            &self.telefono,
            &self.email,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect()
    }

    fn category(&self) -> Option<&str> {
        self.estado.as_deref()
    }

    fn date(&self) -> Option<&str> {
        self.fecha_registro.as_deref()
    }
}
