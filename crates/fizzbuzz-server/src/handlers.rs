use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse};
use fizzbuzz::Options;
use serde::Deserialize;

use crate::configuration::ServerConfig;
use crate::error::ApiError;
use crate::query_params::{query_int, query_string};
use crate::signature::query_values;
use crate::stats::{StatsRecord, StatsRepository};

pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_FIZZ_MULTIPLE: i64 = 3;
pub const DEFAULT_FIZZ_STRING: &str = "fizz";
pub const DEFAULT_BUZZ_MULTIPLE: i64 = 5;
pub const DEFAULT_BUZZ_STRING: &str = "buzz";

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
	<head>
		<title>Fizzbuzz</title>
	</head>
	<body>
		<h1>Fizzbuzz !</h1>
		<p>Try <a href="/fizzbuzz">api</a> or <a href="/stats/all">stats</a></p>
	</body>
</html>"#;

/// Shared state handed to every handler and to the stats middleware.
#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<dyn StatsRepository + Send + Sync>,
    pub config: Arc<ServerConfig>,
}

/// Parameters of one fizzbuzz call, as accepted by `POST /fizzbuzz`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FizzbuzzRequest {
    pub limit: i64,
    #[serde(rename = "int1")]
    pub fizz_multiple: i64,
    #[serde(rename = "str1")]
    pub fizz_string: String,
    #[serde(rename = "int2")]
    pub buzz_multiple: i64,
    #[serde(rename = "str2")]
    pub buzz_string: String,
}

impl FizzbuzzRequest {
    /// Replace unset or non-positive values with the defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.limit < 1 {
            self.limit = DEFAULT_LIMIT;
        }
        if self.fizz_multiple <= 0 {
            self.fizz_multiple = DEFAULT_FIZZ_MULTIPLE;
        }
        if self.fizz_string.is_empty() {
            self.fizz_string = DEFAULT_FIZZ_STRING.to_string();
        }
        if self.buzz_multiple <= 0 {
            self.buzz_multiple = DEFAULT_BUZZ_MULTIPLE;
        }
        if self.buzz_string.is_empty() {
            self.buzz_string = DEFAULT_BUZZ_STRING.to_string();
        }
        self
    }

    fn options(&self, max_limit: i64) -> Result<Options, ApiError> {
        if self.limit > max_limit {
            return Err(ApiError::InvalidRequest(format!(
                "limit {} exceeds maximum {}",
                self.limit, max_limit
            )));
        }
        Ok(Options::default()
            .to(self.limit)
            .fizz(self.fizz_multiple, self.fizz_string.clone())
            .buzz(self.buzz_multiple, self.buzz_string.clone()))
    }
}

/// Decode a `POST /fizzbuzz` body. An empty body or a JSON `null` sets no field.
pub fn parse_request(body: &[u8]) -> Result<FizzbuzzRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FizzbuzzRequest::default());
    }
    let req: Option<FizzbuzzRequest> =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Ok(req.unwrap_or_default())
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn get_fizzbuzz(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<impl IntoResponse, ApiError> {
    let query = query_values(&uri);
    let req = FizzbuzzRequest {
        limit: query_int(&query, "limit", DEFAULT_LIMIT),
        fizz_multiple: query_int(&query, "int1", DEFAULT_FIZZ_MULTIPLE),
        fizz_string: query_string(&query, "str1", DEFAULT_FIZZ_STRING),
        buzz_multiple: query_int(&query, "int2", DEFAULT_BUZZ_MULTIPLE),
        buzz_string: query_string(&query, "str2", DEFAULT_BUZZ_STRING),
    };

    let body = fizzbuzz::to_string(&req.options(state.config.max_limit)?)?;
    Ok((
        StatusCode::ACCEPTED,
        [(header::CONTENT_TYPE, PLAIN_TEXT)],
        body,
    ))
}

pub async fn post_fizzbuzz(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req = parse_request(&body)?.with_defaults();

    let body = fizzbuzz::to_string(&req.options(state.config.max_limit)?)?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, PLAIN_TEXT)], body))
}

pub async fn stats_all(State(state): State<AppState>) -> Json<Vec<StatsRecord>> {
    Json(state.stats.all())
}

pub async fn stats_most_used(State(state): State<AppState>) -> Json<Option<StatsRecord>> {
    Json(state.stats.most_used())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_defaults_fills_missing_values() {
        let req = FizzbuzzRequest {
            limit: 0,
            fizz_multiple: -1,
            fizz_string: String::new(),
            buzz_multiple: 7,
            buzz_string: "bar".to_string(),
        }
        .with_defaults();
        assert_eq!(req.limit, DEFAULT_LIMIT);
        assert_eq!(req.fizz_multiple, DEFAULT_FIZZ_MULTIPLE);
        assert_eq!(req.fizz_string, DEFAULT_FIZZ_STRING);
        assert_eq!(req.buzz_multiple, 7);
        assert_eq!(req.buzz_string, "bar");
    }

    #[test]
    fn request_fields_use_wire_names() {
        let req: FizzbuzzRequest =
            serde_json::from_str(r#"{"limit":15,"int1":2,"str1":"a"}"#).unwrap();
        assert_eq!(req.limit, 15);
        assert_eq!(req.fizz_multiple, 2);
        assert_eq!(req.fizz_string, "a");
        assert_eq!(req.buzz_multiple, 0);
        assert!(req.buzz_string.is_empty());
    }

    #[test]
    fn parse_request_treats_null_and_empty_as_unset() {
        for body in ["null", "", "  \n", "{}"] {
            let req = parse_request(body.as_bytes()).unwrap().with_defaults();
            assert_eq!(req.limit, DEFAULT_LIMIT);
            assert_eq!(req.fizz_string, DEFAULT_FIZZ_STRING);
            assert_eq!(req.buzz_multiple, DEFAULT_BUZZ_MULTIPLE);
        }
    }

    #[test]
    fn parse_request_rejects_non_json() {
        assert!(matches!(
            parse_request(b"not json"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            parse_request(b"42"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn options_reject_limit_above_maximum() {
        let req = FizzbuzzRequest {
            limit: 11,
            ..FizzbuzzRequest::default()
        }
        .with_defaults();
        assert!(matches!(req.options(10), Err(ApiError::InvalidRequest(_))));
        assert_eq!(req.options(11).unwrap().to, 11);
    }
}
