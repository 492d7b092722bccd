//! Field-by-field reading of JSON request bodies.
//!
//! A body that is not a JSON object, or that lacks its required field, is
//! rejected with the endpoint's own "missing" message.  A field that is
//! present with the wrong type is rejected with a message naming it.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::error::ApiError;

/// Top-level members of a JSON object body.
#[derive(Debug)]
pub(crate) struct JsonFields(Map<String, Value>);

impl JsonFields {
    pub(crate) fn parse(body: &[u8], missing: &str) -> Result<Self, ApiError> {
        match serde_json::from_slice(body) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(ApiError::bad_request(missing)),
        }
    }

    /// Absent and `null` both read as `None`.
    pub(crate) fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ApiError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| ApiError::bad_request(format!("Invalid '{name}': {e}"))),
        }
    }

    pub(crate) fn required<T: DeserializeOwned>(
        &self,
        name: &str,
        missing: &str,
    ) -> Result<T, ApiError> {
        self.optional(name)?
            .ok_or_else(|| ApiError::bad_request(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn fields(body: &str) -> JsonFields {
        JsonFields::parse(body.as_bytes(), "Missing x").unwrap()
    }

    #[test]
    fn non_object_bodies_are_missing() {
        for body in ["", "not json", "[1,2]", "\"text\"", "null"] {
            let err = JsonFields::parse(body.as_bytes(), "Missing x").unwrap_err();
            assert_eq!(err, ApiError::bad_request("Missing x"), "{body:?}");
        }
    }

    #[test]
    fn absent_and_null_are_none() {
        let f = fields(r#"{"a": null}"#);
        assert_eq!(f.optional::<f64>("a").unwrap(), None);
        assert_eq!(f.optional::<f64>("b").unwrap(), None);
        assert_eq!(
            f.required::<String>("a", "Missing a").unwrap_err().message,
            "Missing a"
        );
    }

    #[test]
    fn integers_read_as_floats_but_not_the_reverse() {
        let f = fields(r#"{"speed": 2, "rate": 22050.0}"#);
        assert_eq!(f.optional::<f64>("speed").unwrap(), Some(2.0));
        assert!(f.optional::<i64>("rate").is_err());
    }

    #[test]
    fn wrong_type_names_the_field() {
        let err = fields(r#"{"speed": "1.5"}"#).optional::<f64>("speed").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.starts_with("Invalid 'speed': "), "{}", err.message);
    }
}
