//! Request description shared by every probe call

use bytes::Bytes;
use pacebench_core::{BenchError, BenchResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};

/// One request, built once and replayed per token
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestTemplate {
    /// GET `target` after normalising it with [`normalize_url`]
    pub fn get(target: &str) -> BenchResult<Self> {
        Self::new("GET", target)
    }

    /// Request with an explicit method
    pub fn new(method: &str, target: &str) -> BenchResult<Self> {
        let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| BenchError::config(format!("invalid HTTP method: {method:?}")))?;
        let normalized = normalize_url(target.trim());
        let url = Url::parse(&normalized)
            .map_err(|e| BenchError::config(format!("invalid URL {normalized:?}: {e}")))?;

        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Add a header given as `Name: value`
    pub fn with_header_line(mut self, line: &str) -> BenchResult<Self> {
        let (name, value) = parse_header(line)?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Add every header in `lines`
    pub fn with_header_lines<I, S>(self, lines: I) -> BenchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .try_fold(self, |template, line| template.with_header_line(line.as_ref()))
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Extra headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body, if any
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Attach this request to `client`
    pub(crate) fn build(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let request = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());
        match &self.body {
            // Bytes clones share the buffer
            Some(body) => request.body(body.clone()),
            None => request,
        }
    }
}

/// Complete a partial target into an absolute URL
///
/// `:8080/x` and `/x` address the local host; anything without a scheme is
/// taken as plain HTTP.
pub fn normalize_url(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else if target.starts_with(':') || target.starts_with('/') {
        format!("http://127.0.0.1{target}")
    } else {
        format!("http://{target}")
    }
}

/// Parse a `Name: value` header line
pub fn parse_header(line: &str) -> BenchResult<(HeaderName, HeaderValue)> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| BenchError::config(format!("header must be 'Name: value': {line:?}")))?;

    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| BenchError::config(format!("invalid header name in {line:?}")))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|_| BenchError::config(format!("invalid header value in {line:?}")))?;

    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url(":8080/ping"), "http://127.0.0.1:8080/ping");
        assert_eq!(normalize_url("/ping"), "http://127.0.0.1/ping");
        assert_eq!(normalize_url("example.com/a"), "http://example.com/a");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("Content-Type:  application/json ").unwrap();
        assert_eq!(name, "content-type");
        assert_eq!(value, "application/json");

        // only the first colon separates
        let (name, value) = parse_header("X-Forwarded-Host: a.example:8080").unwrap();
        assert_eq!(name, "x-forwarded-host");
        assert_eq!(value, "a.example:8080");
    }

    #[test]
    fn test_parse_header_rejects_garbage() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header("bad name: x").is_err());
        assert!(parse_header("X-Ok: line\nbreak").is_err());
    }

    #[test]
    fn test_template() {
        let template = RequestTemplate::new("post", ":9000/submit")
            .unwrap()
            .with_header_lines(["Accept: */*", "X-Trace: 1"])
            .unwrap()
            .with_body("payload");

        assert_eq!(template.method(), &Method::POST);
        assert_eq!(template.url().as_str(), "http://127.0.0.1:9000/submit");
        assert_eq!(template.headers().len(), 2);
        assert_eq!(template.body().map(|b| b.len()), Some(7));
    }

    #[test]
    fn test_template_rejects_bad_input() {
        assert!(RequestTemplate::new("GE T", "/x").is_err());
        assert!(RequestTemplate::get("http://").is_err());
        assert!(RequestTemplate::get("/x")
            .unwrap()
            .with_header_line("nope")
            .is_err());
    }
}
