//! Response decoders, one per returns directive.
//!
//! Generated client methods end with a call to exactly one of these. All but
//! `decode_raw` reject non-2xx responses.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Deserialize a JSON response body.
pub fn decode_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Return the response body as text.
pub fn decode_text(response: HttpResponse) -> Result<String, ApiError> {
    check_status(&response)?;
    Ok(response.body)
}

/// Hand back the response untouched, whatever its status.
pub fn decode_raw(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    Ok(response)
}

/// Discard the body of a successful response.
pub fn decode_unit(response: HttpResponse) -> Result<(), ApiError> {
    check_status(&response)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn json_success() {
        let user: User = decode_json(response(200, r#"{"id":1,"name":"Ada"}"#)).unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Ada".to_string()
            }
        );
    }

    #[test]
    fn json_bad_body() {
        let err = decode_json::<User>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn json_not_found() {
        let err = decode_json::<User>(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn text_wrong_status() {
        let err = decode_text(response(500, "internal error")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn raw_keeps_error_responses() {
        let resp = decode_raw(response(503, "busy")).unwrap();
        assert_eq!(resp.status, 503);
        assert_eq!(resp.body, "busy");
    }

    #[test]
    fn unit_accepts_no_content() {
        assert!(decode_unit(response(204, "")).is_ok());
    }
}
