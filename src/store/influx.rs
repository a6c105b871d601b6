//! HTTP client for the InfluxDB v2 API.
//!
//! One client serves both the write and the query path; it is constructed
//! eagerly at startup and shared by both operations for the lifetime of the
//! process. There is no pooling or reconnection policy: a connection failure
//! surfaces as a backend error on the next attempted operation.

use async_trait::async_trait;
use chrono::Duration;
use hyper::client::HttpConnector;
use hyper::{header, Body, Client, Method, Request, Response, StatusCode};
use hyper_tls::HttpsConnector;
use serde::Deserialize;
use url::Url;

use crate::config::InfluxConfig;
use crate::error::{AppResult, PipelogError};
use crate::export::ExportRow;
use crate::measurement::MeasurementPoint;
use crate::store::{flux, line_protocol, MeasurementStore};

/// InfluxDB v2 client speaking line protocol for writes and Flux for
/// queries.
pub struct InfluxClient {
    http: Client<HttpsConnector<HttpConnector>>,
    token: String,
    bucket: String,
    write_url: Url,
    query_url: Url,
}

impl InfluxClient {
    /// Build a client from the static connection parameters. Both API
    /// endpoints are derived up front; no network contact happens here.
    pub fn new(config: &InfluxConfig) -> AppResult<Self> {
        let mut base = Url::parse(&config.url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let mut write_url = base.join("api/v2/write")?;
        write_url
            .query_pairs_mut()
            .append_pair("org", &config.org)
            .append_pair("bucket", &config.bucket)
            .append_pair("precision", "ns");

        let mut query_url = base.join("api/v2/query")?;
        query_url.query_pairs_mut().append_pair("org", &config.org);

        let http = Client::builder().build(HttpsConnector::new());

        Ok(Self {
            http,
            token: config.token.clone(),
            bucket: config.bucket.clone(),
            write_url,
            query_url,
        })
    }

    async fn send(&self, request: Request<Body>) -> AppResult<hyper::body::Bytes> {
        let response = self
            .http
            .request(request)
            .await
            .map_err(|e| PipelogError::Backend(e.to_string()))?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response<Body>) -> AppResult<hyper::body::Bytes> {
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| PipelogError::Backend(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(PipelogError::Backend(decode_error_body(status, &body)))
        }
    }
}

#[async_trait]
impl MeasurementStore for InfluxClient {
    async fn write_point(&self, point: &MeasurementPoint) -> AppResult<()> {
        let line = line_protocol::encode_point(point);
        tracing::debug!(%line, "writing point");

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.write_url.as_str())
            .header(header::AUTHORIZATION, format!("Token {}", self.token))
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from(line))?;

        self.send(request).await?;
        Ok(())
    }

    async fn query_window(&self, lookback: Duration) -> AppResult<Vec<ExportRow>> {
        let query = flux::window_query(&self.bucket, lookback);
        let payload = serde_json::json!({
            "query": query,
            "dialect": { "header": true, "annotations": [] },
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.query_url.as_str())
            .header(header::AUTHORIZATION, format!("Token {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/csv")
            .body(Body::from(serde_json::to_vec(&payload)?))?;

        let body = self.send(request).await?;
        flux::parse_query_response(&String::from_utf8_lossy(&body))
    }
}

/// Unwrap InfluxDB's JSON error body to its message; surface a non-JSON
/// body raw, prefixed with the status code.
fn decode_error_body(status: StatusCode, body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }

    match serde_json::from_slice::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) => format!("{}: {}", status, String::from_utf8_lossy(body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> InfluxConfig {
        InfluxConfig {
            url: "http://localhost:8086".to_string(),
            token: "secret".to_string(),
            org: "acme org".to_string(),
            bucket: "pipes".to_string(),
        }
    }

    #[test]
    fn endpoints_carry_org_bucket_and_precision() {
        let client = InfluxClient::new(&sample_config()).unwrap();
        assert_eq!(
            client.write_url.as_str(),
            "http://localhost:8086/api/v2/write?org=acme+org&bucket=pipes&precision=ns"
        );
        assert_eq!(
            client.query_url.as_str(),
            "http://localhost:8086/api/v2/query?org=acme+org"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let mut config = sample_config();
        config.url = "http://localhost:8086/influx".to_string();
        let client = InfluxClient::new(&config).unwrap();
        assert!(client
            .write_url
            .as_str()
            .starts_with("http://localhost:8086/influx/api/v2/write"));
    }

    #[test]
    fn json_error_body_is_unwrapped_to_message() {
        let message = decode_error_body(
            StatusCode::UNAUTHORIZED,
            br#"{"code":"unauthorized","message":"unauthorized access"}"#,
        );
        assert_eq!(message, "unauthorized access");
    }

    #[test]
    fn non_json_error_body_is_surfaced_raw() {
        let message = decode_error_body(StatusCode::BAD_GATEWAY, b"upstream unreachable");
        assert_eq!(message, "502 Bad Gateway: upstream unreachable");
    }

    #[test]
    fn invalid_url_is_rejected_at_construction() {
        let mut config = sample_config();
        config.url = "not a url".to_string();
        assert!(InfluxClient::new(&config).is_err());
    }
}
