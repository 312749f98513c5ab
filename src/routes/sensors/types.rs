use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::sensores;
use crate::validation::{input, mac, EntityKind, Record, ValidationError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SensorPayload {
    /// Target process; defaults to the single stored process
    #[serde(default, deserialize_with = "input::id")]
    pub id_proceso: Option<i32>,
    #[serde(default, deserialize_with = "input::text")]
    pub nombre_sensor: Option<String>,
    /// 12 hex digits, with or without `:`/`-`/`.` separators
    #[serde(default, deserialize_with = "input::text")]
    pub mac_address: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub instrumento: Option<String>,
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
    #[serde(default, deserialize_with = "input::text")]
    pub emp: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub temp_inicial: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub temp_final: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub humedad_relativa_inicial: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub humedad_relativa_final: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub presion_atmosferica: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub numero_informe: Option<String>,
}

impl Record for SensorPayload {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "nombre_sensor" => self.nombre_sensor.as_deref(),
            "mac_address" => self.mac_address.as_deref(),
            "instrumento" => self.instrumento.as_deref(),
            "marca" => self.marca.as_deref(),
            "modelo" => self.modelo.as_deref(),
            "serie" => self.serie.as_deref(),
            "resolucion" => self.resolucion.as_deref(),
            "intervalo_indicacion" => self.intervalo_indicacion.as_deref(),
            "emp" => self.emp.as_deref(),
            "temp_inicial" => self.temp_inicial.as_deref(),
            "temp_final" => self.temp_final.as_deref(),
            "humedad_relativa_inicial" => self.humedad_relativa_inicial.as_deref(),
            "humedad_relativa_final" => self.humedad_relativa_final.as_deref(),
            "presion_atmosferica" => self.presion_atmosferica.as_deref(),
            "numero_informe" => self.numero_informe.as_deref(),
            _ => None,
        }
    }
}

impl SensorPayload {
    /// Validate, normalize the MAC address and convert into an active model.
    /// The process link is left unset.
    ///
    /// # Errors
    ///
    /// Returns every missing field and a malformed MAC address.
    pub fn into_active_model(self) -> Result<sensores::ActiveModel, ValidationError> {
        EntityKind::Sensor.validate(&self)?;

        let mac_address = self
            .mac_address
            .as_deref()
            .and_then(mac::normalize)
            .unwrap_or_default();

        Ok(sensores::ActiveModel {
            id: NotSet,
            id_proceso: NotSet,
            nombre_sensor: Set(self.nombre_sensor),
            mac_address: Set(mac_address),
            instrumento: Set(self.instrumento.unwrap_or_default()),
            marca: Set(self.marca.unwrap_or_default()),
            modelo: Set(self.modelo.unwrap_or_default()),
            serie: Set(self.serie.unwrap_or_default()),
            resolucion: Set(self.resolucion.unwrap_or_default()),
            intervalo_indicacion: Set(self.intervalo_indicacion.unwrap_or_default()),
            emp: Set(self.emp.unwrap_or_default()),
            temp_inicial: Set(self.temp_inicial.unwrap_or_default()),
            temp_final: Set(self.temp_final.unwrap_or_default()),
            humedad_relativa_inicial: Set(self.humedad_relativa_inicial.unwrap_or_default()),
            humedad_relativa_final: Set(self.humedad_relativa_final.unwrap_or_default()),
            presion_atmosferica: Set(self.presion_atmosferica.unwrap_or_default()),
            numero_informe: Set(self.numero_informe.unwrap_or_default()),
        })
    }
}

/// `POST /sensores` accepts one sensor or an array of them
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SensorBatch {
    Many(Vec<SensorPayload>),
    One(SensorPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SensorResponse {
    pub id: i32,
    pub id_proceso: Option<i32>,
    pub nombre_sensor: Option<String>,
    pub mac_address: String,
    pub instrumento: String,
    pub marca: String,
    pub modelo: String,
    pub serie: String,
    pub resolucion: String,
    pub intervalo_indicacion: String,
    pub emp: String,
    pub temp_inicial: String,
    pub temp_final: String,
    pub humedad_relativa_inicial: String,
    pub humedad_relativa_final: String,
    pub presion_atmosferica: String,
    pub numero_informe: String,
}

impl From<sensores::Model> for SensorResponse {
    fn from(s: sensores::Model) -> Self {
        Self {
            id: s.id,
            id_proceso: s.id_proceso,
            nombre_sensor: s.nombre_sensor,
            mac_address: s.mac_address,
            instrumento: s.instrumento,
            marca: s.marca,
            modelo: s.modelo,
            serie: s.serie,
            resolucion: s.resolucion,
            intervalo_indicacion: s.intervalo_indicacion,
            emp: s.emp,
            temp_inicial: s.temp_inicial,
            temp_final: s.temp_final,
            humedad_relativa_inicial: s.humedad_relativa_inicial,
            humedad_relativa_final: s.humedad_relativa_final,
            presion_atmosferica: s.presion_atmosferica,
            numero_informe: s.numero_informe,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorCountResponse {
    pub cantidad: u64,
    pub limite: u64,
}
