//! Derive the statistics signature of an inbound request.

use std::collections::{BTreeMap, HashMap};

use axum::body::{Body, Bytes};
use axum::extract::{Query, Request};
use axum::http::Uri;

/// Reserved parameter name under which a non-empty request body is recorded.
pub const BODY_PARAM: &str = "body";

/// Endpoint identity plus flattened parameters of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    pub api: String,
    pub params: HashMap<String, String>,
}

/// Build a signature from already extracted request parts.
///
/// Repeated query parameters are sorted and joined with `,`; a non-empty body is
/// stored as text under [`BODY_PARAM`].
pub fn encode(
    method: &str,
    uri: &str,
    query: &BTreeMap<String, Vec<String>>,
    body: &[u8],
) -> RequestSignature {
    let mut params = HashMap::with_capacity(query.len() + 1);
    for (name, values) in query {
        if values.is_empty() {
            continue;
        }
        let mut values = values.clone();
        values.sort();
        params.insert(name.clone(), values.join(","));
    }

    if !body.is_empty() {
        params.insert(
            BODY_PARAM.to_string(),
            String::from_utf8_lossy(body).into_owned(),
        );
    }

    RequestSignature {
        api: format!("{method} {uri}"),
        params,
    }
}

/// Group the query string of `uri` by parameter name, keeping every value.
pub fn query_values(uri: &Uri) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    // An undecodable query string contributes no parameters.
    if let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(uri) {
        for (name, value) in pairs {
            grouped.entry(name).or_default().push(value);
        }
    }
    grouped
}

/// Buffer the body of `request` and put an identical copy back.
///
/// Returns the rebuilt request together with the buffered bytes so downstream
/// handlers still see the full body.
pub async fn buffer_body(
    request: Request,
    max_bytes: usize,
) -> Result<(Request, Bytes), axum::Error> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, max_bytes).await?;
    let request = Request::from_parts(parts, Body::from(bytes.clone()));
    Ok((request, bytes))
}

/// Encode `request` without consuming it.
pub async fn encode_request(
    request: Request,
    max_bytes: usize,
) -> Result<(RequestSignature, Request), axum::Error> {
    let (request, body) = buffer_body(request, max_bytes).await?;
    let query = query_values(request.uri());
    let signature = encode(
        request.method().as_str(),
        &request.uri().to_string(),
        &query,
        &body,
    );
    Ok((signature, request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: &str, values: &[&str]) -> BTreeMap<String, Vec<String>> {
        let mut q = BTreeMap::new();
        q.insert(
            name.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        q
    }

    #[test]
    fn display_key_is_method_and_uri() {
        let sig = encode("GET", "/fizzbuzz/?limit=3", &BTreeMap::new(), b"");
        assert_eq!(sig.api, "GET /fizzbuzz/?limit=3");
        assert!(sig.params.is_empty());
    }

    #[test]
    fn repeated_values_are_sorted_and_joined() {
        let sig = encode("GET", "/", &query("x", &["2", "1"]), b"");
        assert_eq!(sig.params.get("x").map(String::as_str), Some("1,2"));

        let again = encode("GET", "/", &query("x", &["1", "2"]), b"");
        assert_eq!(sig, again);
    }

    #[test]
    fn empty_value_list_is_skipped() {
        let sig = encode("GET", "/", &query("x", &[]), b"");
        assert!(sig.params.is_empty());
    }

    #[test]
    fn body_is_recorded_under_reserved_key() {
        let sig = encode("POST", "/fizzbuzz", &BTreeMap::new(), br#"{"limit":10}"#);
        assert_eq!(
            sig.params.get(BODY_PARAM).map(String::as_str),
            Some(r#"{"limit":10}"#)
        );
    }

    #[test]
    fn query_values_groups_repeated_names() {
        let uri: Uri = "/fizzbuzz?x=2&limit=5&x=1".parse().unwrap();
        let grouped = query_values(&uri);
        assert_eq!(grouped.get("x"), Some(&vec!["2".to_string(), "1".to_string()]));
        assert_eq!(grouped.get("limit"), Some(&vec!["5".to_string()]));
    }

    #[tokio::test]
    async fn encode_request_leaves_body_readable() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/fizzbuzz?b=2&a=1")
            .body(Body::from("payload"))
            .unwrap();

        let (sig, request) = encode_request(request, 1024).await.unwrap();
        assert_eq!(sig.api, "POST /fizzbuzz?b=2&a=1");
        assert_eq!(sig.params.get("a").map(String::as_str), Some("1"));
        assert_eq!(sig.params.get("b").map(String::as_str), Some("2"));
        assert_eq!(sig.params.get(BODY_PARAM).map(String::as_str), Some("payload"));

        let again = axum::body::to_bytes(request.into_body(), 1024).await.unwrap();
        assert_eq!(&again[..], b"payload");
    }

    #[tokio::test]
    async fn encode_request_rejects_oversized_body() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/fizzbuzz")
            .body(Body::from(vec![b'a'; 64]))
            .unwrap();
        assert!(encode_request(request, 16).await.is_err());
    }
}
