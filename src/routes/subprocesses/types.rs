use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::subprocesos;
use crate::validation::{input, EntityKind, Record, ValidationError};

/// Status stored when a subprocess is created without one
pub const DEFAULT_ESTATUS: &str = "0";

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubprocessPayload {
    #[serde(default, deserialize_with = "input::text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub descripcion: Option<String>,
    /// Decimal with up to 2 fractional digits
    #[serde(default, deserialize_with = "input::text")]
    #[schema(value_type = String, example = "25.50")]
    pub valor_referencia: Option<String>,
    /// Decimal with up to 4 fractional digits
    #[serde(default, deserialize_with = "input::text")]
    #[schema(value_type = String, example = "0.0012")]
    pub incertidumbre_patron: Option<String>,
    #[serde(default, deserialize_with = "input::status")]
    pub estatus: Option<String>,
}

impl Record for SubprocessPayload {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "nombre" => self.nombre.as_deref(),
            "descripcion" => self.descripcion.as_deref(),
            "valor_referencia" => self.valor_referencia.as_deref(),
            "incertidumbre_patron" => self.incertidumbre_patron.as_deref(),
            "estatus" => self.estatus.as_deref(),
            _ => None,
        }
    }
}

impl SubprocessPayload {
    /// Validate and convert into an active model. Ids and the parent link
    /// are left for the caller to set.
    ///
    /// A missing `estatus` is left unset so updates keep the stored value.
    ///
    /// # Errors
    ///
    /// Returns every missing field and every malformed decimal.
    pub fn into_active_model(self) -> Result<subprocesos::ActiveModel, ValidationError> {
        EntityKind::Subprocess.validate(&self)?;

        Ok(subprocesos::ActiveModel {
            id: NotSet,
            id_subproceso: NotSet,
            proceso_id: NotSet,
            nombre: Set(self.nombre.unwrap_or_default()),
            descripcion: Set(self.descripcion.unwrap_or_default()),
            valor_referencia: Set(self.valor_referencia.unwrap_or_default()),
            incertidumbre_patron: Set(self.incertidumbre_patron.unwrap_or_default()),
            estatus: self.estatus.map_or(NotSet, Set),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubprocessResponse {
    pub id: i32,
    pub id_subproceso: Option<i32>,
    pub proceso_id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub valor_referencia: String,
    pub incertidumbre_patron: String,
    pub estatus: String,
}

impl From<subprocesos::Model> for SubprocessResponse {
    fn from(s: subprocesos::Model) -> Self {
        Self {
            id: s.id,
            id_subproceso: s.id_subproceso,
            proceso_id: s.proceso_id,
            nombre: s.nombre,
            descripcion: s.descripcion,
            valor_referencia: s.valor_referencia,
            incertidumbre_patron: s.incertidumbre_patron,
            estatus: s.estatus,
        }
    }
}
