//! Conversions from external infrastructure errors into domain errors.

use forgeprops_domain::WrapperError;
use reqwest::header::HeaderMap;
use reqwest::{Error as HttpError, StatusCode};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WrapperError);

impl From<InfraError> for WrapperError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WrapperError> for InfraError {
    fn from(value: WrapperError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWrapperError {
    fn into_wrapper_error(self) -> WrapperError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → WrapperError */
/* -------------------------------------------------------------------------- */

/// Map a non-success status to the wrapper error taxonomy.
///
/// GitHub signals exhausted rate limits with a 403 and
/// `x-ratelimit-remaining: 0`; that case is reported as rate limiting rather
/// than an authorization failure.
pub fn status_to_wrapper_error(
    status: StatusCode,
    headers: &HeaderMap,
    context: &str,
) -> WrapperError {
    let code = status.as_u16();
    let message = format!(
        "HTTP {} {} ({context})",
        code,
        status.canonical_reason().unwrap_or("unknown status")
    );

    let rate_limit_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|remaining| remaining.trim() == "0");

    match code {
        403 if rate_limit_exhausted => WrapperError::RateLimited(message),
        401 | 403 => WrapperError::Auth(message),
        404 => WrapperError::NotFound(message),
        429 => WrapperError::RateLimited(message),
        _ => WrapperError::Upstream(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WrapperError */
/* -------------------------------------------------------------------------- */

impl IntoWrapperError for HttpError {
    fn into_wrapper_error(self) -> WrapperError {
        if self.is_timeout() {
            return WrapperError::Upstream("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WrapperError::Upstream("HTTP connection failure".into());
        }

        if self.is_decode() {
            return WrapperError::InvalidResponse(format!("failed to decode response body: {self}"));
        }

        if let Some(status) = self.status() {
            let context = self.url().map_or_else(String::new, |url| url.path().to_string());
            return status_to_wrapper_error(status, &HeaderMap::new(), &context);
        }

        WrapperError::Upstream(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_wrapper_error())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → WrapperError */
/* -------------------------------------------------------------------------- */

impl IntoWrapperError for serde_json::Error {
    fn into_wrapper_error(self) -> WrapperError {
        WrapperError::InvalidResponse(format!("unexpected response shape: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_wrapper_error())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn status_error(status: StatusCode) -> HttpError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err()
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let mapped: WrapperError = InfraError::from(status_error(StatusCode::UNAUTHORIZED).await).into();
        match mapped {
            WrapperError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_404_maps_to_not_found() {
        let mapped: WrapperError = InfraError::from(status_error(StatusCode::NOT_FOUND).await).into();
        assert!(matches!(mapped, WrapperError::NotFound(_)), "got {mapped:?}");
    }

    #[tokio::test]
    async fn http_status_429_maps_to_rate_limited() {
        let mapped: WrapperError =
            InfraError::from(status_error(StatusCode::TOO_MANY_REQUESTS).await).into();
        assert!(matches!(mapped, WrapperError::RateLimited(_)), "got {mapped:?}");
    }

    #[tokio::test]
    async fn decode_failure_maps_to_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client
            .get(server.uri())
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();

        let mapped: WrapperError = InfraError::from(error).into();
        assert!(matches!(mapped, WrapperError::InvalidResponse(_)), "got {mapped:?}");
    }

    #[test]
    fn exhausted_rate_limit_on_403_is_not_an_auth_error() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));

        let mapped = status_to_wrapper_error(StatusCode::FORBIDDEN, &headers, "/repos/o/r");
        assert!(matches!(mapped, WrapperError::RateLimited(_)));

        let mapped = status_to_wrapper_error(StatusCode::FORBIDDEN, &HeaderMap::new(), "/repos/o/r");
        assert!(matches!(mapped, WrapperError::Auth(_)));
    }

    #[test]
    fn server_errors_map_to_upstream() {
        let mapped =
            status_to_wrapper_error(StatusCode::BAD_GATEWAY, &HeaderMap::new(), "/projects/1");
        match mapped {
            WrapperError::Upstream(msg) => {
                assert!(msg.contains("502"));
                assert!(msg.contains("/projects/1"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
