use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::procesos;
use crate::validation::{input, EntityKind, Record, ValidationError};

/// Process body for create and full replace
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessPayload {
    #[serde(default, deserialize_with = "input::text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub estandar: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub marca: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub modelo: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub serie: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub resolucion: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub intervalo_indicacion: Option<String>,
    /// `dd/mm/yyyy`
    #[serde(default, deserialize_with = "input::text")]
    pub calibrado_patron: Option<String>,
    /// `dd/mm/yyyy`
    #[serde(default, deserialize_with = "input::text")]
    pub prox_calibracion_patron: Option<String>,
    /// `dd/mm/yyyy`
    #[serde(default, deserialize_with = "input::text")]
    pub fecha_verificacion: Option<String>,
    /// `dd/mm/yyyy`
    #[serde(default, deserialize_with = "input::text")]
    pub proxima_verificacion: Option<String>,
}

impl Record for ProcessPayload {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "nombre" => self.nombre.as_deref(),
            "descripcion" => self.descripcion.as_deref(),
            "estandar" => self.estandar.as_deref(),
            "marca" => self.marca.as_deref(),
            "modelo" => self.modelo.as_deref(),
            "serie" => self.serie.as_deref(),
            "resolucion" => self.resolucion.as_deref(),
            "intervalo_indicacion" => self.intervalo_indicacion.as_deref(),
            "calibrado_patron" => self.calibrado_patron.as_deref(),
            "prox_calibracion_patron" => self.prox_calibracion_patron.as_deref(),
            "fecha_verificacion" => self.fecha_verificacion.as_deref(),
            "proxima_verificacion" => self.proxima_verificacion.as_deref(),
            _ => None,
        }
    }
}

impl ProcessPayload {
    /// Validate and convert into an active model with an unset id.
    ///
    /// # Errors
    ///
    /// Returns every missing field.
    pub fn into_active_model(self) -> Result<procesos::ActiveModel, ValidationError> {
        EntityKind::Process.validate(&self)?;

        Ok(procesos::ActiveModel {
            id: NotSet,
            nombre: Set(self.nombre.unwrap_or_default()),
            descripcion: Set(self.descripcion.unwrap_or_default()),
            estandar: Set(self.estandar.unwrap_or_default()),
            marca: Set(self.marca.unwrap_or_default()),
            modelo: Set(self.modelo.unwrap_or_default()),
            serie: Set(self.serie.unwrap_or_default()),
            resolucion: Set(self.resolucion.unwrap_or_default()),
            intervalo_indicacion: Set(self.intervalo_indicacion.unwrap_or_default()),
            calibrado_patron: Set(self.calibrado_patron.unwrap_or_default()),
            prox_calibracion_patron: Set(self.prox_calibracion_patron.unwrap_or_default()),
            fecha_verificacion: Set(self.fecha_verificacion.unwrap_or_default()),
            proxima_verificacion: Set(self.proxima_verificacion.unwrap_or_default()),
        })
    }
}

/// Dates rendered as `dd mm yyyy`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProcessDates {
    pub calibrado_patron: String,
    pub prox_calibracion_patron: String,
    pub fecha_verificacion: String,
    pub proxima_verificacion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProcessResponse {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub estandar: String,
    pub marca: String,
    pub modelo: String,
    pub serie: String,
    pub resolucion: String,
    pub intervalo_indicacion: String,
    pub calibrado_patron: String,
    pub prox_calibracion_patron: String,
    pub fecha_verificacion: String,
    pub proxima_verificacion: String,
    pub display: ProcessDates,
}

impl From<procesos::Model> for ProcessResponse {
    fn from(p: procesos::Model) -> Self {
        let display = ProcessDates {
            calibrado_patron: display_date(&p.calibrado_patron),
            prox_calibracion_patron: display_date(&p.prox_calibracion_patron),
            fecha_verificacion: display_date(&p.fecha_verificacion),
            proxima_verificacion: display_date(&p.proxima_verificacion),
        };

        Self {
            id: p.id,
            nombre: p.nombre,
            descripcion: p.descripcion,
            estandar: p.estandar,
            marca: p.marca,
            modelo: p.modelo,
            serie: p.serie,
            resolucion: p.resolucion,
            intervalo_indicacion: p.intervalo_indicacion,
            calibrado_patron: p.calibrado_patron,
            prox_calibracion_patron: p.prox_calibracion_patron,
            fecha_verificacion: p.fecha_verificacion,
            proxima_verificacion: p.proxima_verificacion,
            display,
        }
    }
}

/// Convert a stored `dd/mm/yyyy` date into `dd mm yyyy`, keeping each part as written.
#[must_use]
pub fn display_date(stored: &str) -> String {
    stored.split('/').collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessDeletedResponse {
    pub message: String,
    pub eliminados: crate::services::cascade::DeletedRows,
}
