//! The "cadena": the positional text export consumed by Avimex.
//!
//! Records are kept as tagged entity rows until [`Chain::encode`] turns them
//! into text, so the wire layout lives in one place:
//!
//! ```text
//! <process fields>,$<subprocess fields>,$...!<sensor fields>,!<sensor fields>,
//! ```
//!
//! Every field is followed by `,`. Process and subprocess records end with
//! `$`; sensor records start with `!`. Field names are never written, the
//! receiver parses by position.

mod loader;

pub use loader::{build_for_all, build_for_process};

use std::fmt;

use crate::entity::{procesos, sensores, subprocesos};

pub const FIELD_SEPARATOR: char = ',';
pub const RECORD_TERMINATOR: char = '$';
pub const SENSOR_PREFIX: char = '!';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainRecord {
    Process(procesos::Model),
    Subprocess(subprocesos::Model),
    Sensor(sensores::Model),
}

impl ChainRecord {
    /// Field values in wire order. Null columns become empty strings.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::Process(p) => vec![
                p.id.to_string(),
                p.nombre.clone(),
                p.descripcion.clone(),
                p.estandar.clone(),
                p.marca.clone(),
                p.modelo.clone(),
                p.serie.clone(),
                p.resolucion.clone(),
                p.intervalo_indicacion.clone(),
                p.calibrado_patron.clone(),
                p.prox_calibracion_patron.clone(),
                p.fecha_verificacion.clone(),
                p.proxima_verificacion.clone(),
            ],
            Self::Subprocess(s) => vec![
                s.id.to_string(),
                s.nombre.clone(),
                s.descripcion.clone(),
                s.valor_referencia.clone(),
                s.incertidumbre_patron.clone(),
                s.estatus.clone(),
            ],
            Self::Sensor(s) => vec![
                s.id.to_string(),
                s.nombre_sensor.clone().unwrap_or_default(),
                s.mac_address.clone(),
                s.instrumento.clone(),
                s.marca.clone(),
                s.modelo.clone(),
                s.serie.clone(),
                s.resolucion.clone(),
                s.intervalo_indicacion.clone(),
                s.emp.clone(),
                s.temp_inicial.clone(),
                s.temp_final.clone(),
                s.humedad_relativa_inicial.clone(),
                s.humedad_relativa_final.clone(),
                s.presion_atmosferica.clone(),
                s.numero_informe.clone(),
            ],
        }
    }

    fn encode_into(&self, out: &mut String) {
        if matches!(self, Self::Sensor(_)) {
            out.push(SENSOR_PREFIX);
        }
        for field in self.fields() {
            out.push_str(&field);
            out.push(FIELD_SEPARATOR);
        }
        if !matches!(self, Self::Sensor(_)) {
            out.push(RECORD_TERMINATOR);
        }
    }
}

/// An ordered sequence of chain records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    records: Vec<ChainRecord>,
}

impl Chain {
    /// Chain for one process. Children keep the order they are given in.
    #[must_use]
    pub fn new(
        process: procesos::Model,
        subprocesses: Vec<subprocesos::Model>,
        sensors: Vec<sensores::Model>,
    ) -> Self {
        let mut records = Vec::with_capacity(1 + subprocesses.len() + sensors.len());
        records.push(ChainRecord::Process(process));
        records.extend(subprocesses.into_iter().map(ChainRecord::Subprocess));
        records.extend(sensors.into_iter().map(ChainRecord::Sensor));
        Self { records }
    }

    /// Append another chain after this one.
    pub fn append(&mut self, other: Chain) {
        self.records.extend(other.records);
    }

    #[must_use]
    pub fn records(&self) -> &[ChainRecord] {
        &self.records
    }

    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            record.encode_into(&mut out);
        }
        out
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
