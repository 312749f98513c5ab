use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of handing a chain to Avimex, returned to the caller as `envio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ForwardReport {
    /// Whether Avimex accepted the chain with a 2xx status
    pub entregado: bool,
    /// HTTP status returned by Avimex, if a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_http: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForwardReport {
    #[must_use]
    pub fn delivered(status: u16) -> Self {
        Self {
            entregado: true,
            estado_http: Some(status),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(status: Option<u16>, error: String) -> Self {
        Self {
            entregado: false,
            estado_http: status,
            error: Some(error),
        }
    }
}
