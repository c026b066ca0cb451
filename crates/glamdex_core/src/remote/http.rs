//! HTTP transport for a realtime-database style REST document store.
//!
//! Requests go to `{endpoint_url}/{path}.json`, with the credential passed as
//! the `auth` query parameter. Each path segment is percent-encoded on its own,
//! so `?`, `%` and `/` inside an encoded key never change the addressed node.

use super::DocumentTransport;
use crate::config::RemoteConfig;
use crate::repo::error::{PersistenceError, PersistenceResult};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde_json::Value;
use std::time::{Duration, Instant};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Blocking HTTP client bound to one remote endpoint.
#[derive(Clone)]
pub struct HttpDocumentTransport {
    base_url: Url,
    credential: String,
    client: Client,
}

impl std::fmt::Debug for HttpDocumentTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDocumentTransport")
            .field("base_url", &self.base_url.as_str())
            .field("credential", &"<redacted>")
            .finish()
    }
}

impl HttpDocumentTransport {
    /// Builds a transport from connection parameters.
    ///
    /// # Errors
    /// - `Unreachable` when the endpoint is not an http(s) URL or the HTTP
    ///   client cannot be constructed.
    pub fn new(config: &RemoteConfig) -> PersistenceResult<Self> {
        let base_url = Url::parse(config.endpoint_url.trim())
            .map_err(|err| PersistenceError::Unreachable(format!("invalid endpoint url: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(PersistenceError::Unreachable(format!(
                "unsupported endpoint scheme `{}`",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(PersistenceError::Unreachable(
                "endpoint url cannot carry a path".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| PersistenceError::Unreachable(err.without_url().to_string()))?;

        Ok(Self {
            base_url,
            credential: config.credential.expose().to_string(),
            client,
        })
    }

    fn url_for(&self, path: &str) -> Url {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let last = segments.pop().map(|segment| format!("{segment}.json"));

        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut parts) = url.path_segments_mut() {
            parts.pop_if_empty();
            parts.extend(segments);
            parts.extend(last.as_deref());
        }
        url
    }

    fn send(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> PersistenceResult<reqwest::blocking::Response> {
        let started_at = Instant::now();
        let request = if self.credential.is_empty() {
            request
        } else {
            request.query(&[("auth", self.credential.as_str())])
        };

        let response = request.send().map_err(|err| {
            warn!(
                "event=remote_request module=remote status=error method={method} duration_ms={} error_code=store_unreachable",
                started_at.elapsed().as_millis()
            );
            PersistenceError::Unreachable(err.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=remote_request module=remote status=error method={method} duration_ms={} http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            let body = response.text().unwrap_or_default();
            return Err(PersistenceError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        debug!(
            "event=remote_request module=remote status=ok method={method} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(response)
    }
}

impl DocumentTransport for HttpDocumentTransport {
    fn get_json(&self, path: &str) -> PersistenceResult<Option<Value>> {
        let response = self.send("GET", self.client.get(self.url_for(path)))?;
        let document: Value = response
            .json()
            .map_err(|err| PersistenceError::InvalidData(err.without_url().to_string()))?;
        Ok(match document {
            Value::Null => None,
            other => Some(other),
        })
    }

    fn put_json(&self, path: &str, document: &Value) -> PersistenceResult<()> {
        self.send("PUT", self.client.put(self.url_for(path)).json(document))?;
        Ok(())
    }

    fn patch_json(&self, path: &str, fields: &Value) -> PersistenceResult<()> {
        self.send("PATCH", self.client.patch(self.url_for(path)).json(fields))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HttpDocumentTransport;
    use crate::config::{Credential, RemoteConfig};
    use crate::remote::encode_key;
    use crate::repo::error::PersistenceError;

    fn config(endpoint_url: &str) -> RemoteConfig {
        RemoteConfig {
            endpoint_url: endpoint_url.to_string(),
            credential: Credential::new("secret-token"),
            namespace: "users".to_string(),
            timeout_secs: 3,
        }
    }

    #[test]
    fn builds_paths_under_endpoint() {
        let transport = HttpDocumentTransport::new(&config("https://db.example.com/")).unwrap();
        assert_eq!(
            transport
                .url_for("/users/ada,l@example,com/inventory")
                .as_str(),
            "https://db.example.com/users/ada,l@example,com/inventory.json"
        );

        let nested = HttpDocumentTransport::new(&config("https://db.example.com/v1")).unwrap();
        assert_eq!(
            nested.url_for("users").as_str(),
            "https://db.example.com/v1/users.json"
        );
    }

    #[test]
    fn reserved_email_characters_stay_inside_one_segment() {
        let transport = HttpDocumentTransport::new(&config("https://db.example.com")).unwrap();

        for (email, expected_key) in [
            ("a?b@x.com", "a?b@x,com"),
            ("a$b@x.com", "a%24b@x,com"),
            ("a/b@x.com", "a%2Fb@x,com"),
        ] {
            let path = format!("users/{}/inventory", encode_key(email));
            let url = transport.url_for(&path);

            assert_eq!(url.query(), None, "email {email}");
            let segments: Vec<String> = url
                .path_segments()
                .unwrap()
                .map(|segment| percent_decode(segment))
                .collect();
            assert_eq!(
                segments,
                vec!["users", expected_key, "inventory.json"],
                "email {email}"
            );
        }
    }

    // Decodes `%XX` escapes the way the server reads a path segment.
    fn percent_decode(segment: &str) -> String {
        let bytes = segment.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut index = 0;
        while index < bytes.len() {
            if bytes[index] == b'%' {
                let hex = &segment[index + 1..index + 3];
                out.push(u8::from_str_radix(hex, 16).unwrap());
                index += 3;
            } else {
                out.push(bytes[index]);
                index += 1;
            }
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = HttpDocumentTransport::new(&config("ftp://db.example.com")).unwrap_err();
        assert!(matches!(err, PersistenceError::Unreachable(_)));
    }

    #[test]
    fn debug_output_redacts_credential() {
        let transport = HttpDocumentTransport::new(&config("https://db.example.com")).unwrap();
        let rendered = format!("{transport:?}");
        assert!(!rendered.contains("secret-token"));
    }
}
