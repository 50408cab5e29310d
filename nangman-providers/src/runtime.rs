use crate::request::{Body, HttpRequest, redact_url};
use anyhow::{Context, anyhow};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Response body as lossy UTF-8, trimmed to `max` chars for error messages.
    pub fn body_snippet(&self, max: usize) -> String {
        String::from_utf8_lossy(&self.body).chars().take(max).collect()
    }
}

pub async fn execute(req: &HttpRequest) -> anyhow::Result<HttpResponse> {
    execute_with_timeout(req, DEFAULT_REQUEST_TIMEOUT).await
}

pub async fn execute_with_timeout(
    req: &HttpRequest,
    timeout: Duration,
) -> anyhow::Result<HttpResponse> {
    // Without an explicit timeout a broken endpoint can hang the caller indefinitely.
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .timeout(timeout)
        .build()
        .context("build http client")?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .with_context(|| format!("invalid header name: {k}"))?;
        let value =
            HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
        headers.insert(name, value);
    }

    let builder = match req.method.as_str() {
        "GET" => client.get(&req.url),
        "POST" => client.post(&req.url),
        other => return Err(anyhow!("unsupported method: {other}")),
    }
    .headers(headers);

    let builder = match &req.body {
        Body::Empty => builder,
        Body::Json(s) => builder.body(s.clone()),
    };

    // reqwest errors embed the URL; strip it so bot tokens never reach logs.
    let resp = builder
        .send()
        .await
        .map_err(|e| anyhow!("{}", e.without_url()))
        .with_context(|| format!("http request failed: {}", redact_url(&req.url)))?;
    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("content-type", "application/json"))
            .and(body_string("{\"a\":1}"))
            .respond_with(ResponseTemplate::new(201).set_body_string("ok"))
            .mount(&server)
            .await;

        let req = HttpRequest {
            method: "POST".into(),
            url: format!("{}/echo", server.uri()),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Body::Json("{\"a\":1}".into()),
        };
        let resp = execute(&req).await.unwrap();
        assert_eq!(resp.status, 201);
        assert!(resp.is_success());
        assert_eq!(resp.body, b"ok");
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let req = HttpRequest {
            method: "GET".into(),
            url: server.uri(),
            headers: vec![],
            body: Body::Empty,
        };
        let err = execute_with_timeout(&req, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("http request failed"));
    }

    #[tokio::test]
    async fn rejects_unknown_method() {
        let req = HttpRequest {
            method: "PATCH".into(),
            url: "http://127.0.0.1:9".into(),
            headers: vec![],
            body: Body::Empty,
        };
        assert!(execute(&req).await.is_err());
    }
}
