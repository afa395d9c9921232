use serde_json::{Value, json};
use thiserror::Error;

/// Suggestion appended when the provider cannot place an address.
const ADDRESS_HINT: &str = "Try a more standard address form, e.g. \"123 Main St, City, ST 12345\"";

/// Failures of the geocoding provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The provider answered but had no candidate for the address.
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Transport, status or payload failure talking to the provider.
    #[error("Geocoding provider error: {0}")]
    Provider(String),
}

/// Per-request lookup failures. None of these are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{0}")]
    Validation(String),

    #[error("Address not found: {0}. {hint}", hint = ADDRESS_HINT)]
    AddressNotFound(String),

    #[error("Geocoding failed: {0}")]
    Provider(String),

    /// The address was located, but outside every known district.
    #[error("District not found")]
    DistrictNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GeocodeError> for LookupError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::AddressNotFound(address) => LookupError::AddressNotFound(address),
            GeocodeError::Provider(message) => LookupError::Provider(message),
        }
    }
}

/// Response classification handed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    ClientError,
    NotFound,
    Internal,
}

impl Status {
    /// Conventional HTTP status code for this classification.
    pub fn code(self) -> u16 {
        match self {
            Status::Success => 200,
            Status::ClientError => 400,
            Status::NotFound => 404,
            Status::Internal => 500,
        }
    }
}

impl LookupError {
    pub fn status(&self) -> Status {
        match self {
            LookupError::Validation(_)
            | LookupError::AddressNotFound(_)
            | LookupError::Provider(_) => Status::ClientError,
            LookupError::DistrictNotFound => Status::NotFound,
            LookupError::Internal(_) => Status::Internal,
        }
    }

    /// Error payload: `{ "error": "<message>" }`.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_errors_map_one_to_one() {
        let err: LookupError = GeocodeError::AddressNotFound("zzz".into()).into();
        assert_eq!(err, LookupError::AddressNotFound("zzz".into()));

        let err: LookupError = GeocodeError::Provider("timeout".into()).into();
        assert_eq!(err, LookupError::Provider("timeout".into()));
    }

    #[test]
    fn status_classification() {
        assert_eq!(LookupError::Validation("invalid address".into()).status(), Status::ClientError);
        assert_eq!(LookupError::AddressNotFound("x".into()).status(), Status::ClientError);
        assert_eq!(LookupError::Provider("x".into()).status(), Status::ClientError);
        assert_eq!(LookupError::DistrictNotFound.status(), Status::NotFound);
        assert_eq!(LookupError::Internal("x".into()).status().code(), 500);
        assert_eq!(Status::NotFound.code(), 404);
    }

    #[test]
    fn error_payloads() {
        assert_eq!(
            LookupError::Validation("invalid address".into()).to_json(),
            json!({ "error": "invalid address" })
        );
        assert_eq!(LookupError::DistrictNotFound.to_json(), json!({ "error": "District not found" }));

        let message = LookupError::AddressNotFound("zzz not an address zzz".into()).to_string();
        assert!(message.starts_with("Address not found: zzz not an address zzz."));
        assert!(message.contains("standard address form"));
    }
}
