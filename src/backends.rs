//! Backend client registry and the single outbound call path.
//!
//! [`BackendRegistry`] holds one [`BackendClient`] per backend service,
//! each bound to a base URL resolved once at startup and sharing the
//! process-wide connection pool. [`BackendClient::request`] is the only
//! place outbound calls are made, so every forwarder gets the same
//! failure normalization: transport errors and timeouts become
//! [`Outcome::ServiceUnavailable`], non-2xx responses become
//! [`Outcome::UpstreamError`] with the backend's own status, and 2xx
//! responses pass through as [`Outcome::Success`].

use std::time::{Duration, Instant};

use axum::http::Method;
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::Full;
use serde::Serialize;
use url::Url;

use crate::outcome::{summarize_body, Outcome};
use crate::server::HttpClient;

/// Versioned API root shared by all backend resource endpoints.
/// Health probes hit `/health` on the bare base URL instead.
pub const API_ROOT: &str = "/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    Account,
    File,
    Statement,
    Tag,
}

impl ServiceName {
    pub const ALL: [Self; 4] = [Self::Account, Self::File, Self::Statement, Self::Tag];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::File => "file",
            Self::Statement => "statement",
            Self::Tag => "tag",
        }
    }

    /// Environment variable carrying this backend's base URL.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Account => "ACCOUNT_SERVICE_URL",
            Self::File => "FILE_SERVICE_URL",
            Self::Statement => "STATEMENT_SERVICE_URL",
            Self::Tag => "TAG_SERVICE_URL",
        }
    }

    /// Key used for this backend's entry in the composite health report.
    #[must_use]
    pub const fn report_key(self) -> &'static str {
        match self {
            Self::Account => "account_service",
            Self::File => "file_service",
            Self::Statement => "statement_service",
            Self::Tag => "tag_service",
        }
    }
}

impl std::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four backend base URLs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BackendUrls {
    pub account: Url,
    pub file: Url,
    pub statement: Url,
    pub tag: Url,
}

/// One persistent client bound to a single backend's base URL.
///
/// Cloning the inner hyper client is a cheap handle copy — all
/// `BackendClient`s share the same connection pool.
#[derive(Clone)]
pub struct BackendClient {
    name: ServiceName,
    base_url: Url,
    http: HttpClient,
    timeout: Duration,
}

impl BackendClient {
    #[must_use]
    pub const fn name(&self) -> ServiceName {
        self.name
    }

    pub async fn get(&self, path: &str) -> Outcome {
        self.request(Method::GET, path, None, Bytes::new()).await
    }

    /// GET with a typed filter object appended as a query string.
    ///
    /// Unset (`None`) fields are pruned so the backend's own defaulting
    /// behavior is preserved — no `null`s or empty keys are ever sent.
    pub async fn get_filtered<T: Serialize>(&self, path: &str, filters: &T) -> Outcome {
        let query = query_string(filters);
        let path_and_query = if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        };
        self.request(Method::GET, &path_and_query, None, Bytes::new())
            .await
    }

    pub async fn send_json<T: Serialize>(&self, method: Method, path: &str, payload: &T) -> Outcome {
        let body = match serde_json::to_vec(payload) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                return Outcome::ServiceUnavailable {
                    service: self.name,
                    message: format!(
                        "{} service request could not be serialized: {e}",
                        self.name
                    ),
                }
            }
        };
        self.request(method, path, Some("application/json"), body)
            .await
    }

    pub async fn delete(&self, path: &str) -> Outcome {
        self.request(Method::DELETE, path, None, Bytes::new()).await
    }

    /// POST a file as a single-field (`file`) multipart body.
    pub async fn upload(&self, path: &str, file_name: &str, content: Bytes) -> Outcome {
        let boundary = format!("fingate-{}", uuid::Uuid::new_v4().simple());
        let body = encode_multipart(&boundary, "file", file_name, &content);
        let content_type = format!("multipart/form-data; boundary={boundary}");
        self.request(Method::POST, path, Some(&content_type), body)
            .await
    }

    /// Issue one outbound call and normalize its outcome.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Outcome {
        let uri = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path_and_query
        );

        let mut builder = hyper::Request::builder().method(method.clone()).uri(&uri);
        if let Some(ct) = content_type {
            builder = builder.header(hyper::header::CONTENT_TYPE, ct);
        }
        let req = match builder.body(Full::new(body)) {
            Ok(r) => r,
            Err(e) => {
                return Outcome::ServiceUnavailable {
                    service: self.name,
                    message: format!("{} service is unavailable: {e}", self.name),
                }
            }
        };

        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.http.request(req)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Err(_) => {
                tracing::warn!(service = %self.name, uri = %uri, latency_ms, "backend timed out");
                Outcome::ServiceUnavailable {
                    service: self.name,
                    message: format!(
                        "{} service is unavailable: request timed out after {}ms",
                        self.name,
                        self.timeout.as_millis()
                    ),
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(service = %self.name, uri = %uri, error = %e, latency_ms, "backend unreachable");
                Outcome::ServiceUnavailable {
                    service: self.name,
                    message: format!("{} service is unavailable: {e}", self.name),
                }
            }
            Ok(Ok(response)) => {
                let status = response.status();
                match response.into_body().collect().await {
                    Err(e) => {
                        tracing::warn!(service = %self.name, uri = %uri, error = %e, latency_ms, "backend body read failed");
                        Outcome::ServiceUnavailable {
                            service: self.name,
                            message: format!(
                                "{} service is unavailable: body read error: {e}",
                                self.name
                            ),
                        }
                    }
                    Ok(collected) => {
                        let body = collected.to_bytes();
                        if status.is_success() {
                            tracing::debug!(
                                service = %self.name,
                                method = %method,
                                uri = %uri,
                                status = status.as_u16(),
                                latency_ms,
                                "backend responded"
                            );
                            Outcome::Success { status, body }
                        } else {
                            tracing::warn!(
                                service = %self.name,
                                method = %method,
                                uri = %uri,
                                status = status.as_u16(),
                                latency_ms,
                                "backend rejected request"
                            );
                            Outcome::UpstreamError {
                                status,
                                detail: format!(
                                    "{} service returned {}: {}",
                                    self.name,
                                    status,
                                    summarize_body(&body)
                                ),
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Immutable-after-init registry of backend clients.
///
/// Constructed once before serving begins and shared read-only by every
/// request task — no locking is needed after initialization.
pub struct BackendRegistry {
    account: BackendClient,
    file: BackendClient,
    statement: BackendClient,
    tag: BackendClient,
}

impl BackendRegistry {
    #[must_use]
    pub fn new(urls: BackendUrls, http: HttpClient, timeout: Duration) -> Self {
        let client = |name: ServiceName, base_url: Url| BackendClient {
            name,
            base_url,
            http: http.clone(),
            timeout,
        };
        Self {
            account: client(ServiceName::Account, urls.account),
            file: client(ServiceName::File, urls.file),
            statement: client(ServiceName::Statement, urls.statement),
            tag: client(ServiceName::Tag, urls.tag),
        }
    }

    /// Infallible lookup — the registry always holds a client for every
    /// service name it was initialized with.
    #[must_use]
    pub const fn client_for(&self, name: ServiceName) -> &BackendClient {
        match name {
            ServiceName::Account => &self.account,
            ServiceName::File => &self.file,
            ServiceName::Statement => &self.statement,
            ServiceName::Tag => &self.tag,
        }
    }
}

/// Re-encode one inbound path parameter for the outbound URI.
///
/// Axum's `Path` extractor percent-decodes parameters, so an id-or-name
/// containing a space, `?`, `#`, `%`, or `/` would otherwise truncate or
/// corrupt the outbound path (hyper rejects raw spaces outright). The
/// form-urlencoded set escapes everything outside unreserved characters;
/// only the `+`-for-space convention has to be normalized for path use.
pub fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Serialize a filter object into a query string, dropping unset fields.
pub fn query_string<T: Serialize>(filters: &T) -> String {
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(filters) else {
        return String::new();
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &map {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        serializer.append_pair(key, &text);
    }
    serializer.finish()
}

/// Encode a single file as a `multipart/form-data` body.
fn encode_multipart(boundary: &str, field: &str, file_name: &str, content: &[u8]) -> Bytes {
    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Bytes::from(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Filters {
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        account_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    }

    #[test]
    fn query_string_prunes_unset_fields() {
        let filters = Filters {
            tag: Some("food".into()),
            account_id: None,
            limit: None,
        };
        assert_eq!(query_string(&filters), "tag=food");
    }

    #[test]
    fn query_string_renders_numbers_unquoted() {
        let filters = Filters {
            tag: None,
            account_id: None,
            limit: Some(25),
        };
        assert_eq!(query_string(&filters), "limit=25");
    }

    #[test]
    fn query_string_empty_when_nothing_set() {
        let filters = Filters {
            tag: None,
            account_id: None,
            limit: None,
        };
        assert_eq!(query_string(&filters), "");
    }

    #[test]
    fn query_string_percent_encodes_values() {
        let filters = Filters {
            tag: Some("food & drink".into()),
            account_id: None,
            limit: None,
        };
        assert_eq!(query_string(&filters), "tag=food+%26+drink");
    }

    #[test]
    fn path_segment_reencodes_decoded_space() {
        assert_eq!(encode_path_segment("weekly shop"), "weekly%20shop");
    }

    #[test]
    fn path_segment_escapes_uri_delimiters() {
        assert_eq!(encode_path_segment("a?b"), "a%3Fb");
        assert_eq!(encode_path_segment("a#b"), "a%23b");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("50%"), "50%25");
    }

    #[test]
    fn path_segment_preserves_literal_plus() {
        assert_eq!(encode_path_segment("c+d"), "c%2Bd");
    }

    #[test]
    fn path_segment_leaves_plain_ids_alone() {
        assert_eq!(encode_path_segment("a-1.b_c"), "a-1.b_c");
    }

    #[test]
    fn multipart_body_frames_content() {
        let body = encode_multipart("b0undary", "file", "report.csv", b"a;b;c");
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("--b0undary\r\n"));
        assert!(text.contains("name=\"file\"; filename=\"report.csv\""));
        assert!(text.contains("\r\n\r\na;b;c\r\n"));
        assert!(text.ends_with("--b0undary--\r\n"));
    }

    #[test]
    fn service_name_metadata_is_consistent() {
        for name in ServiceName::ALL {
            assert!(name.env_var().starts_with(&name.as_str().to_uppercase()));
            assert_eq!(name.report_key(), format!("{name}_service"));
        }
    }
}
