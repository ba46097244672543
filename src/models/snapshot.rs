use std::collections::HashMap;

use serde::Deserialize;

use crate::models::error::{FetchError, FetchErrorClass};

/// Wire shape served by the rates provider for one date.
#[derive(Deserialize, Debug)]
pub struct RatesPayload {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub date: String,
    pub base_unit: String,
    pub rate: f64,
}

/// Decodes a provider payload and keeps only the `unit` rate.
pub fn parse(raw: &[u8], unit: &str) -> Result<Snapshot, FetchError> {
    let payload: RatesPayload = serde_json::from_slice(raw).map_err(|e| {
        FetchError::new(
            FetchErrorClass::Decode,
            format!("malformed payload: {}", e),
        )
    })?;

    let rate = payload.rates.get(unit).copied().unwrap_or_default();
    validate(rate, unit)?;

    Ok(Snapshot {
        date: payload.date,
        base_unit: payload.base,
        rate,
    })
}

fn validate(rate: f64, unit: &str) -> Result<(), FetchError> {
    if rate == 0.0 {
        return Err(FetchError::new(
            FetchErrorClass::Validation,
            format!("invalid snapshot: {} rate must not be 0", unit),
        ));
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(FetchError::new(
            FetchErrorClass::Validation,
            format!("invalid snapshot: {} rate {} is implausible", unit, rate),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tracked_unit() {
        let raw = br#"{"rates":{"GBP":0.8978,"USD":1.17},"base":"EUR","date":"2026-10-18"}"#;
        let snapshot = parse(raw, "GBP").unwrap();
        assert_eq!(
            snapshot,
            Snapshot {
                date: "2026-10-18".to_string(),
                base_unit: "EUR".to_string(),
                rate: 0.8978,
            }
        );
    }

    #[test]
    fn base_and_date_are_optional() {
        let snapshot = parse(br#"{"rates":{"GBP":1.5}}"#, "GBP").unwrap();
        assert!(snapshot.date.is_empty());
        assert!(snapshot.base_unit.is_empty());
    }

    #[test]
    fn zero_rate_is_a_validation_error() {
        let err = parse(br#"{"rates":{"GBP":0},"base":"EUR","date":""}"#, "GBP").unwrap_err();
        assert_eq!(err.class, FetchErrorClass::Validation);
    }

    #[test]
    fn missing_unit_is_a_validation_error() {
        let err = parse(br#"{"rates":{"USD":1.17}}"#, "GBP").unwrap_err();
        assert_eq!(err.class, FetchErrorClass::Validation);
    }

    #[test]
    fn negative_rate_is_rejected() {
        let err = parse(br#"{"rates":{"GBP":-0.5}}"#, "GBP").unwrap_err();
        assert_eq!(err.class, FetchErrorClass::Validation);
    }

    #[test]
    fn empty_body_is_a_decode_error() {
        let err = parse(b"", "GBP").unwrap_err();
        assert_eq!(err.class, FetchErrorClass::Decode);
    }

    #[test]
    fn wrongly_typed_rate_is_a_decode_error() {
        let err = parse(br#"{"rates":{"GBP":"high"}}"#, "GBP").unwrap_err();
        assert_eq!(err.class, FetchErrorClass::Decode);
    }
}
