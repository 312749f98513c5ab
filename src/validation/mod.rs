//! Field checks applied to request payloads before any write.
//!
//! Every violation is collected before reporting, so a client sees all
//! missing or malformed fields of a payload in one response.

pub mod input;
pub mod mac;

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Optional minus, digits, up to 2 fractional digits
static TWO_DECIMALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d{1,2})?$").expect("valid decimal pattern"));

/// Optional minus, digits, up to 4 fractional digits
static FOUR_DECIMALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d{1,4})?$").expect("valid decimal pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Process,
    Subprocess,
    Sensor,
}

impl EntityKind {
    /// Fields that must be present and non-empty.
    #[must_use]
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Process => &[
                "nombre",
                "descripcion",
                "estandar",
                "marca",
                "modelo",
                "serie",
                "resolucion",
                "intervalo_indicacion",
                "calibrado_patron",
                "prox_calibracion_patron",
                "fecha_verificacion",
                "proxima_verificacion",
            ],
            Self::Subprocess => &[
                "nombre",
                "descripcion",
                "valor_referencia",
                "incertidumbre_patron",
            ],
            Self::Sensor => &[
                "mac_address",
                "instrumento",
                "marca",
                "modelo",
                "serie",
                "resolucion",
                "intervalo_indicacion",
                "emp",
                "temp_inicial",
                "temp_final",
                "humedad_relativa_inicial",
                "humedad_relativa_final",
                "presion_atmosferica",
                "numero_informe",
            ],
        }
    }

    /// Fields that may be omitted but are still checked when present.
    #[must_use]
    pub fn optional_fields(self) -> &'static [&'static str] {
        match self {
            Self::Process => &[],
            Self::Subprocess => &["estatus"],
            Self::Sensor => &["nombre_sensor"],
        }
    }

    /// Width of the column a field is stored in, `None` for unbounded text.
    ///
    /// The MAC address is bounded by its format check instead.
    #[must_use]
    pub fn max_len(self, field: &str) -> Option<usize> {
        match (self, field) {
            (_, "descripcion") | (Self::Sensor, "mac_address") => None,
            (
                Self::Process,
                "calibrado_patron"
                | "prox_calibracion_patron"
                | "fecha_verificacion"
                | "proxima_verificacion",
            ) => Some(64),
            (Self::Subprocess, "valor_referencia" | "incertidumbre_patron" | "estatus") => Some(32),
            (
                Self::Sensor,
                "emp"
                | "temp_inicial"
                | "temp_final"
                | "humedad_relativa_inicial"
                | "humedad_relativa_final"
                | "presion_atmosferica",
            ) => Some(64),
            _ => Some(255),
        }
    }

    /// Check a record of this kind, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` listing each missing or malformed field.
    pub fn validate<R: Record + ?Sized>(self, record: &R) -> Result<(), ValidationError> {
        let mut violations: Vec<FieldViolation> = self
            .required_fields()
            .iter()
            .copied()
            .filter(|name| record.field(name).is_none())
            .map(FieldViolation::missing)
            .collect();

        let format_checks: &[(&'static str, FieldFormat)] = match self {
            Self::Process => &[],
            Self::Subprocess => &[
                ("valor_referencia", FieldFormat::TwoDecimals),
                ("incertidumbre_patron", FieldFormat::FourDecimals),
            ],
            Self::Sensor => &[("mac_address", FieldFormat::MacAddress)],
        };

        for &(name, format) in format_checks {
            if let Some(value) = record.field(name)
                && !format.matches(value)
            {
                violations.push(FieldViolation {
                    field: name,
                    problem: Problem::Format(format),
                });
            }
        }

        // One violation per field: a malformed value is not also reported as too long
        for &name in self.required_fields().iter().chain(self.optional_fields()) {
            if violations.iter().any(|v| v.field == name) {
                continue;
            }
            if let Some(violation) = record
                .field(name)
                .and_then(|value| self.check_len(name, value))
            {
                violations.push(violation);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations,
                item: None,
            })
        }
    }
}

impl EntityKind {
    /// Length check for a single field value.
    #[must_use]
    pub fn check_len(self, field: &'static str, value: &str) -> Option<FieldViolation> {
        let max = self.max_len(field)?;
        (value.chars().count() > max).then_some(FieldViolation {
            field,
            problem: Problem::TooLong(max),
        })
    }
}

/// A payload whose fields can be looked up by name.
pub trait Record {
    /// The field's value, or `None` when it was not provided.
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    TwoDecimals,
    FourDecimals,
    MacAddress,
}

impl FieldFormat {
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::TwoDecimals => TWO_DECIMALS.is_match(value),
            Self::FourDecimals => FOUR_DECIMALS.is_match(value),
            Self::MacAddress => mac::normalize(value).is_some(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::TwoDecimals => "must be a decimal number with up to 2 decimals",
            Self::FourDecimals => "must be a decimal number with up to 4 decimals",
            Self::MacAddress => "must be a MAC address of 12 hex digits",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Missing,
    Format(FieldFormat),
    /// Longer than the column allows, in characters
    TooLong(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub problem: Problem,
}

impl FieldViolation {
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            problem: Problem::Missing,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            Problem::Missing => write!(f, "{} is required", self.field),
            Problem::Format(format) => write!(f, "{} {}", self.field, format.describe()),
            Problem::TooLong(max) => {
                write!(f, "{} must be at most {max} characters", self.field)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
    /// Position of the offending record when a batch was submitted
    pub item: Option<usize>,
}

impl ValidationError {
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    #[must_use]
    pub fn at_item(mut self, index: usize) -> Self {
        self.item = Some(index);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        match self.item {
            Some(index) => write!(f, "Invalid payload at item {index}: {}", parts.join("; ")),
            None => write!(f, "Invalid payload: {}", parts.join("; ")),
        }
    }
}

impl std::error::Error for ValidationError {}
