use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::shared::error::AuthenticationError;
use crate::shared::structs::AppState;
use crate::shared::structs::config::Configuration;
use crate::shared::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

const SIGNATURE_LENGTH: usize = 64;
const PUBLIC_KEY_LENGTH: usize = 32;

pub async fn validate_interaction(
    State(app_state): State<AppState>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let now = chrono::Utc::now().timestamp();

    match authenticate_request(&app_state.config, request, now).await {
        Ok(request) => next.run(request).await,
        Err(e) => e,
    }
}

/// Runs every check against `request` and hands it back with its body
/// buffered, or returns the rejection response for the first failed check.
/// Header and declared size checks run before the body is read.
pub async fn authenticate_request(
    config: &Configuration,
    request: axum::extract::Request,
    now: i64,
) -> Result<axum::extract::Request, Response> {
    let authenticator = RequestAuthenticator::from_config(config);

    authenticator
        .check_preamble(request.headers())
        .map_err(reject)?;

    let (parts, body) = request.into_parts();
    let bytes = buffer_request_body(body, authenticator.max_body_size).await?;

    authenticator
        .authenticate(&parts.headers, &bytes, now)
        .map_err(reject)?;

    Ok(axum::extract::Request::from_parts(parts, Body::from(bytes)))
}

async fn buffer_request_body(body: Body, max_body_size: usize) -> Result<Bytes, Response> {
    match Limited::new(body, max_body_size).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(reject(AuthenticationError::PayloadTooLarge))
        }
        Err(e) => {
            let error_msg = format!("Internal server error when collecting body bytes: {e:?}");
            tracing::error!("{}", &error_msg);
            Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, error_msg).into_response())
        }
    }
}

fn reject(error: AuthenticationError) -> Response {
    tracing::warn!("Rejected interaction request: {error}");
    error.into_response()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub signature: String,
    pub timestamp: String,
}

/// Checks a single inbound request in a fixed order: header presence, declared
/// size, signature, then freshness. The timestamp is only trusted once the
/// signature covering it has been verified.
#[derive(Debug, Clone, Copy)]
pub struct RequestAuthenticator<'a> {
    pub public_key: Option<&'a str>,
    pub max_body_size: usize,
    pub timestamp_tolerance_secs: i64,
}

impl<'a> RequestAuthenticator<'a> {
    pub fn from_config(config: &'a Configuration) -> Self {
        RequestAuthenticator {
            public_key: config.application_public_key.as_deref(),
            max_body_size: config.max_body_size,
            timestamp_tolerance_secs: config.timestamp_tolerance_secs,
        }
    }

    pub fn check_headers(&self, headers: &HeaderMap) -> Result<SignedHeaders, AuthenticationError> {
        let signature = header_value(headers, SIGNATURE_HEADER);
        let timestamp = header_value(headers, TIMESTAMP_HEADER);

        match (signature, timestamp, self.public_key) {
            (Some(signature), Some(timestamp), Some(_)) => Ok(SignedHeaders {
                signature,
                timestamp,
            }),
            _ => Err(AuthenticationError::Unauthorized),
        }
    }

    /// Rejects on the declared `Content-Length` alone. A missing or
    /// unparsable length counts as too large.
    pub fn check_declared_size(&self, headers: &HeaderMap) -> Result<(), AuthenticationError> {
        let declared = header_value(headers, CONTENT_LENGTH.as_str())
            .and_then(|v| v.trim().parse::<usize>().ok());

        match declared {
            Some(length) if length <= self.max_body_size => Ok(()),
            _ => Err(AuthenticationError::PayloadTooLarge),
        }
    }

    /// Steps that only need the headers: presence, then declared size.
    pub fn check_preamble(
        &self,
        headers: &HeaderMap,
    ) -> Result<SignedHeaders, AuthenticationError> {
        let signed_headers = self.check_headers(headers)?;
        self.check_declared_size(headers)?;
        Ok(signed_headers)
    }

    pub fn verify_signature(
        &self,
        signed_headers: &SignedHeaders,
        body: &[u8],
    ) -> Result<(), AuthenticationError> {
        let public_key = self.public_key.ok_or(AuthenticationError::Unauthorized)?;

        let public_key_bytes =
            hex::decode(public_key.trim()).map_err(|_| AuthenticationError::InvalidSignature)?;
        let signature_bytes = hex::decode(&signed_headers.signature)
            .map_err(|_| AuthenticationError::InvalidSignature)?;

        if public_key_bytes.len() != PUBLIC_KEY_LENGTH || signature_bytes.len() != SIGNATURE_LENGTH
        {
            return Err(AuthenticationError::InvalidSignature);
        }

        let mut message = Vec::with_capacity(signed_headers.timestamp.len() + body.len());
        message.extend_from_slice(signed_headers.timestamp.as_bytes());
        message.extend_from_slice(body);

        match nacl::sign::verify(&signature_bytes, &message, &public_key_bytes) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthenticationError::InvalidSignature),
            Err(e) => {
                tracing::debug!("Signature verification errored: {e:?}");
                Err(AuthenticationError::InvalidSignature)
            }
        }
    }

    pub fn check_freshness(&self, timestamp: &str, now: i64) -> Result<(), AuthenticationError> {
        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| AuthenticationError::InvalidTimestamp)?;

        let tolerance = self.timestamp_tolerance_secs.max(0) as u64;
        if now.abs_diff(timestamp) > tolerance {
            Err(AuthenticationError::StaleRequest)
        } else {
            Ok(())
        }
    }

    /// All four checks against an already buffered body.
    pub fn authenticate(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: i64,
    ) -> Result<(), AuthenticationError> {
        let signed_headers = self.check_preamble(headers)?;
        if body.len() > self.max_body_size {
            return Err(AuthenticationError::PayloadTooLarge);
        }
        self.verify_signature(&signed_headers, body)?;
        self.check_freshness(&signed_headers.timestamp, now)
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().map(ToString::to_string).ok())
}


#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, StatusCode};

    use super::testing::*;
    use super::*;

    const BODY: &[u8] = br#"{"type":1}"#;

    fn authenticator(config: &Configuration) -> RequestAuthenticator<'_> {
        RequestAuthenticator::from_config(config)
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn correctly_signed_fresh_request_passes() {
        let config = test_config();
        let headers = signed_headers(TEST_NOW, BODY);
        assert_eq!(authenticator(&config).authenticate(&headers, BODY, TEST_NOW), Ok(()));
    }

    #[test]
    fn missing_headers_or_key_are_unauthorized() {
        let config = test_config();
        let complete = signed_headers(TEST_NOW, BODY);

        for header in [SIGNATURE_HEADER, TIMESTAMP_HEADER] {
            let mut headers = complete.clone();
            headers.remove(header);
            assert_eq!(
                authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
                Err(AuthenticationError::Unauthorized)
            );
        }

        let keyless = Configuration::new();
        assert_eq!(
            authenticator(&keyless).authenticate(&complete, BODY, TEST_NOW),
            Err(AuthenticationError::Unauthorized)
        );
    }

    #[test]
    fn declared_oversize_is_rejected_before_signature_check() {
        let config = test_config();
        let mut headers = signed_headers(TEST_NOW, BODY);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(8193usize));
        headers.insert(header_name(SIGNATURE_HEADER), HeaderValue::from_static("not-hex"));

        assert_eq!(
            authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
            Err(AuthenticationError::PayloadTooLarge)
        );
    }

    #[test]
    fn declared_size_at_the_limit_is_accepted() {
        let config = test_config();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(8192usize));
        assert_eq!(authenticator(&config).check_declared_size(&headers), Ok(()));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(
            authenticator(&config).check_declared_size(&headers),
            Err(AuthenticationError::PayloadTooLarge)
        );

        headers.remove(CONTENT_LENGTH);
        assert_eq!(
            authenticator(&config).check_declared_size(&headers),
            Err(AuthenticationError::PayloadTooLarge)
        );
    }

    #[test]
    fn flipping_any_signature_byte_is_invalid() {
        let config = test_config();
        let headers = signed_headers(TEST_NOW, BODY);
        let signature = hex::decode(headers[SIGNATURE_HEADER].to_str().unwrap()).unwrap();

        for index in [0, 31, 63] {
            let mut tampered = signature.clone();
            tampered[index] ^= 0x01;
            let mut headers = headers.clone();
            headers.insert(
                header_name(SIGNATURE_HEADER),
                HeaderValue::from_str(&hex::encode(tampered)).unwrap(),
            );

            assert_eq!(
                authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
                Err(AuthenticationError::InvalidSignature)
            );
        }
    }

    #[test]
    fn flipping_any_body_byte_is_invalid() {
        let config = test_config();
        let headers = signed_headers(TEST_NOW, BODY);

        for index in 0..BODY.len() {
            let mut body = BODY.to_vec();
            body[index] ^= 0x01;
            assert_eq!(
                authenticator(&config).authenticate(&headers, &body, TEST_NOW),
                Err(AuthenticationError::InvalidSignature)
            );
        }
    }

    #[test]
    fn malformed_signature_encoding_is_invalid() {
        let config = test_config();
        let mut headers = signed_headers(TEST_NOW, BODY);

        for bad in ["zz", "abcd", ""] {
            headers.insert(header_name(SIGNATURE_HEADER), HeaderValue::from_static(bad));
            assert_eq!(
                authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
                Err(AuthenticationError::InvalidSignature)
            );
        }
    }

    #[test]
    fn malformed_public_key_is_invalid_signature() {
        let mut config = test_config();
        config.application_public_key = Some("not a key".into());
        let headers = signed_headers(TEST_NOW, BODY);
        assert_eq!(
            authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
            Err(AuthenticationError::InvalidSignature)
        );
    }

    #[test]
    fn signed_but_unparsable_timestamp_is_invalid_timestamp() {
        let config = test_config();
        let mut headers = signed_headers(TEST_NOW, BODY);
        headers.insert(header_name(TIMESTAMP_HEADER), HeaderValue::from_static("yesterday"));
        headers.insert(
            header_name(SIGNATURE_HEADER),
            HeaderValue::from_str(&sign("yesterday", BODY)).unwrap(),
        );

        assert_eq!(
            authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
            Err(AuthenticationError::InvalidTimestamp)
        );
    }

    #[test]
    fn unsigned_garbage_timestamp_fails_the_signature_first() {
        let config = test_config();
        let mut headers = signed_headers(TEST_NOW, BODY);
        headers.insert(header_name(TIMESTAMP_HEADER), HeaderValue::from_static("yesterday"));

        assert_eq!(
            authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
            Err(AuthenticationError::InvalidSignature)
        );
    }

    #[test]
    fn timestamps_outside_the_window_are_stale() {
        let config = test_config();

        for timestamp in [TEST_NOW - 10, TEST_NOW + 10, TEST_NOW - 6] {
            let headers = signed_headers(timestamp, BODY);
            assert_eq!(
                authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
                Err(AuthenticationError::StaleRequest)
            );
        }
    }

    #[test]
    fn timestamps_at_the_window_edge_are_fresh() {
        let config = test_config();

        for timestamp in [TEST_NOW - 5, TEST_NOW + 5] {
            let headers = signed_headers(timestamp, BODY);
            assert_eq!(
                authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
                Ok(())
            );
        }
    }

    #[test]
    fn tolerance_is_configurable() {
        let mut config = test_config();
        config.timestamp_tolerance_secs = 60;
        let headers = signed_headers(TEST_NOW - 30, BODY);
        assert_eq!(
            authenticator(&config).authenticate(&headers, BODY, TEST_NOW),
            Ok(())
        );
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let config = test_config();
        assert_eq!(
            authenticator(&config).check_freshness(&i64::MIN.to_string(), TEST_NOW),
            Err(AuthenticationError::StaleRequest)
        );
    }

    #[tokio::test]
    async fn authenticated_request_keeps_its_body() {
        let config = test_config();
        let request = build_request(signed_headers(TEST_NOW, BODY), BODY.to_vec());

        let request = authenticate_request(&config, request, TEST_NOW)
            .await
            .unwrap();
        let bytes = request.into_body().collect().await.unwrap().to_bytes();

        assert_eq!(&bytes[..], BODY);
    }

    #[tokio::test]
    async fn rejection_maps_to_status_and_plain_text() {
        let config = test_config();
        let request = build_request(signed_headers(TEST_NOW - 10, BODY), BODY.to_vec());

        let response = authenticate_request(&config, request, TEST_NOW)
            .await
            .unwrap_err();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Stale request timestamp");
    }

    async fn served_rejection(headers: HeaderMap, body: Vec<u8>) -> (StatusCode, String) {
        let request = build_request(headers, body);
        let response = authenticate_request(&test_config(), request, TEST_NOW)
            .await
            .unwrap_err();
        (response.status(), body_text(response).await)
    }

    #[tokio::test]
    async fn missing_content_length_is_payload_too_large() {
        let mut headers = signed_headers(TEST_NOW, BODY);
        headers.remove(CONTENT_LENGTH);

        assert_eq!(
            served_rejection(headers, BODY.to_vec()).await,
            (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
        );
    }

    #[tokio::test]
    async fn understated_content_length_is_caught_while_reading() {
        let body = vec![b' '; 8193];
        let mut headers = signed_headers(TEST_NOW, &body);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(16usize));

        assert_eq!(
            served_rejection(headers, body).await,
            (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
        );
    }

    #[tokio::test]
    async fn served_path_checks_size_before_signature() {
        let mut headers = signed_headers(TEST_NOW, BODY);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(8193usize));
        headers.insert(header_name(SIGNATURE_HEADER), HeaderValue::from_static("not-hex"));

        assert_eq!(
            served_rejection(headers, BODY.to_vec()).await,
            (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
        );
    }

    #[tokio::test]
    async fn served_path_rejects_tampered_bodies() {
        let headers = signed_headers(TEST_NOW, BODY);
        let mut body = BODY.to_vec();
        body[2] ^= 0x01;

        assert_eq!(
            served_rejection(headers, body).await,
            (StatusCode::UNAUTHORIZED, "Invalid request signature".to_string())
        );
    }

    #[tokio::test]
    async fn served_path_checks_signature_before_timestamp() {
        let mut headers = signed_headers(TEST_NOW, BODY);
        headers.insert(header_name(TIMESTAMP_HEADER), HeaderValue::from_static("yesterday"));

        assert_eq!(
            served_rejection(headers.clone(), BODY.to_vec()).await,
            (StatusCode::UNAUTHORIZED, "Invalid request signature".to_string())
        );

        headers.insert(
            header_name(SIGNATURE_HEADER),
            HeaderValue::from_str(&sign("yesterday", BODY)).unwrap(),
        );
        assert_eq!(
            served_rejection(headers, BODY.to_vec()).await,
            (StatusCode::UNAUTHORIZED, "Invalid request timestamp".to_string())
        );
    }

    #[tokio::test]
    async fn served_path_accepts_the_window_edge() {
        for timestamp in [TEST_NOW - 5, TEST_NOW + 5] {
            let request = build_request(signed_headers(timestamp, BODY), BODY.to_vec());
            assert!(
                authenticate_request(&test_config(), request, TEST_NOW)
                    .await
                    .is_ok()
            );
        }
    }

    #[tokio::test]
    async fn missing_headers_reject_with_unauthorized_body() {
        let config = test_config();
        let request = build_request(HeaderMap::new(), BODY.to_vec());

        let response = authenticate_request(&config, request, TEST_NOW)
            .await
            .unwrap_err();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Unauthorized");
    }
}
