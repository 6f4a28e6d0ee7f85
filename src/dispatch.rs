//! Request dispatch for the Nimbus CLI client.
//!
//! The dispatcher executes a composed request, transparently follows
//! continuation links across pages, strips transport annotations from the
//! payload, and yields raw property bags ready for typing. All status-code
//! classification lives here, so every operation shares one error mapping:
//! 404 and 403 are recoverable conditions the caller may absorb, 409 is a
//! write conflict, anything else non-successful is a fatal transport error
//! carrying the original status.

use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, trace};

use crate::client::{HttpClient, RawResponse};
use crate::nimbus_v1::ApiError;

/// Envelope key carrying the page payload.
const ENVELOPE_VALUE_KEY: &str = "value";
/// Envelope key carrying the continuation link.
const ENVELOPE_NEXT_LINK_KEY: &str = "@odata.nextLink";

/// A composed request description. Built fresh per call; immutable once
/// dispatched.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub uri: String,
    pub body: Option<Value>,
    pub content_type: Option<String>,
}

impl RequestSpec {
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            uri: uri.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn post(uri: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            uri: uri.into(),
            body: Some(body),
            content_type: Some(mime::APPLICATION_JSON.to_string()),
        }
    }

    pub fn patch(uri: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PATCH,
            uri: uri.into(),
            body: Some(body),
            content_type: Some(mime::APPLICATION_JSON.to_string()),
        }
    }

    pub fn put(uri: impl Into<String>, body: Value, content_type: &str) -> Self {
        Self {
            method: Method::PUT,
            uri: uri.into(),
            body: Some(body),
            content_type: Some(content_type.to_string()),
        }
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            uri: uri.into(),
            body: None,
            content_type: None,
        }
    }
}

/// Optional post-filter applied to collection results before they are
/// yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemPostFilter {
    #[default]
    All,
    FoldersOnly,
    FilesOnly,
}

impl ItemPostFilter {
    pub fn admits(&self, raw: &Value) -> bool {
        match self {
            ItemPostFilter::All => true,
            ItemPostFilter::FoldersOnly => raw.get("folder").is_some(),
            ItemPostFilter::FilesOnly => raw.get("folder").is_none(),
        }
    }
}

/// Classify a non-success response into the shared error taxonomy.
pub(crate) fn status_error(response: &RawResponse, uri: &str) -> ApiError {
    let detail = error_detail(&response.body);
    match response.status {
        404 => ApiError::NotFound(uri.to_string()),
        403 => ApiError::Forbidden(uri.to_string()),
        409 => ApiError::Conflict(detail.unwrap_or_else(|| uri.to_string())),
        status => ApiError::Transport {
            status,
            detail: detail.unwrap_or_else(|| "no error detail in response".to_string()),
        },
    }
}

/// Pull the human-readable message out of a service error payload.
fn error_detail(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Remove transport and protocol metadata from a property bag: envelope and
/// context markers, media-type markers, and any other `@`-prefixed or
/// `@odata`-qualified annotation, at every nesting level.
pub(crate) fn strip_annotations(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !key.starts_with('@') && !key.contains("@odata"));
            for nested in map.values_mut() {
                strip_annotations(nested);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_annotations(item);
            }
        }
        _ => {}
    }
}

/// Split a response envelope into its page payload and continuation link.
/// A bare object (single-resource response) is one page of one element.
pub(crate) fn extract_page(mut envelope: Value) -> (Vec<Value>, Option<String>) {
    let next_link = envelope
        .get(ENVELOPE_NEXT_LINK_KEY)
        .and_then(Value::as_str)
        .map(str::to_string);

    let payload = envelope.get_mut(ENVELOPE_VALUE_KEY).map(Value::take);
    let items = match payload {
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
        None => match envelope {
            Value::Null => Vec::new(),
            other => vec![other],
        },
    };

    (items, next_link)
}

/// Execute a request that addresses a single resource.
///
/// The annotated transport metadata is stripped before the property bag is
/// returned. Status classification is shared with collection fetches.
pub async fn dispatch_single(
    http: &HttpClient,
    access_token: Option<&str>,
    spec: RequestSpec,
) -> Result<Value, ApiError> {
    let response = http
        .invoke(
            spec.method.clone(),
            &spec.uri,
            spec.body.as_ref(),
            spec.content_type.as_deref(),
            access_token,
        )
        .await?;

    if !response.is_success() {
        return Err(status_error(&response, &spec.uri));
    }

    let mut body = response.body;
    strip_annotations(&mut body);
    Ok(body)
}

/// State carried across the pagination loop.
enum PageCursor {
    First(RequestSpec),
    Continue(String),
    Done,
}

/// Execute a collection request as a lazy, finite sequence of pages.
///
/// The continuation link of each response envelope drives follow-up
/// requests transparently; the caller simply keeps pulling. The sequence is
/// not restartable — a fresh dispatch re-queries from the start. Dropping
/// the stream abandons the remaining pages, which is the only cancellation
/// mechanism.
pub fn dispatch_pages<'a>(
    http: &'a HttpClient,
    access_token: Option<&'a str>,
    spec: RequestSpec,
) -> impl Stream<Item = Result<Vec<Value>, ApiError>> + 'a {
    stream::try_unfold(PageCursor::First(spec), move |state| async move {
        let (method, uri, body, content_type) = match state {
            PageCursor::First(spec) => (spec.method, spec.uri, spec.body, spec.content_type),
            PageCursor::Continue(next) => (Method::GET, next, None, None),
            PageCursor::Done => return Ok(None),
        };

        let response = http
            .invoke(
                method,
                &uri,
                body.as_ref(),
                content_type.as_deref(),
                access_token,
            )
            .await?;

        if !response.is_success() {
            return Err(status_error(&response, &uri));
        }

        let (mut items, next_link) = extract_page(response.body);
        for item in items.iter_mut() {
            strip_annotations(item);
        }
        trace!("Fetched page of {} result(s) from {}", items.len(), uri);

        let next_state = match next_link {
            Some(link) => {
                debug!("Following continuation link");
                PageCursor::Continue(link)
            }
            None => PageCursor::Done,
        };

        Ok(Some((items, next_state)))
    })
}

/// Execute a collection request and yield individual results, applying the
/// post-filter before anything reaches the caller. An empty page sequence
/// yields nothing; absence of qualifying children is not an error.
pub fn dispatch_collection<'a>(
    http: &'a HttpClient,
    access_token: Option<&'a str>,
    spec: RequestSpec,
    filter: ItemPostFilter,
) -> impl Stream<Item = Result<Value, ApiError>> + 'a {
    dispatch_pages(http, access_token, spec)
        .map_ok(move |page| {
            stream::iter(
                page.into_iter()
                    .filter(move |raw| filter.admits(raw))
                    .map(Ok),
            )
        })
        .try_flatten()
}

/// Drain a collection dispatch into memory. Most operations sort their
/// results before returning, which requires the full sequence anyway.
pub async fn collect_collection(
    http: &HttpClient,
    access_token: Option<&str>,
    spec: RequestSpec,
    filter: ItemPostFilter,
) -> Result<Vec<Value>, ApiError> {
    dispatch_collection(http, access_token, spec, filter)
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_annotations_removes_envelope_markers() {
        let mut value = json!({
            "@odata.context": "https://api.example.com/$metadata#items",
            "@odata.etag": "\"1\"",
            "id": "01BYE5RZ",
            "name": "report.pdf",
            "content@odata.mediaContentType": "application/pdf",
            "file": { "mimeType": "application/pdf", "@odata.type": "#file" }
        });

        strip_annotations(&mut value);

        assert_eq!(
            value,
            json!({
                "id": "01BYE5RZ",
                "name": "report.pdf",
                "file": { "mimeType": "application/pdf" }
            })
        );
    }

    #[test]
    fn test_extract_page_with_continuation() {
        let envelope = json!({
            "@odata.context": "...",
            "@odata.nextLink": "https://api.example.com/v1/users?$skiptoken=x",
            "value": [ { "id": "1" }, { "id": "2" } ]
        });

        let (items, next_link) = extract_page(envelope);
        assert_eq!(items.len(), 2);
        assert_eq!(
            next_link.as_deref(),
            Some("https://api.example.com/v1/users?$skiptoken=x")
        );
    }

    #[test]
    fn test_extract_page_single_object() {
        let envelope = json!({ "id": "1", "name": "ada" });
        let (items, next_link) = extract_page(envelope);
        assert_eq!(items.len(), 1);
        assert!(next_link.is_none());
    }

    #[test]
    fn test_extract_page_empty_body() {
        let (items, next_link) = extract_page(Value::Null);
        assert!(items.is_empty());
        assert!(next_link.is_none());
    }

    #[test]
    fn test_status_error_mapping() {
        let not_found = RawResponse {
            status: 404,
            body: Value::Null,
        };
        let forbidden = RawResponse {
            status: 403,
            body: Value::Null,
        };
        let conflict = RawResponse {
            status: 409,
            body: json!({ "error": { "message": "name already exists" } }),
        };
        let server_error = RawResponse {
            status: 503,
            body: json!({ "error": { "message": "try again later" } }),
        };

        assert!(matches!(
            status_error(&not_found, "items/x"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            status_error(&forbidden, "items/x"),
            ApiError::Forbidden(_)
        ));
        match status_error(&conflict, "items/x") {
            ApiError::Conflict(detail) => assert_eq!(detail, "name already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
        match status_error(&server_error, "items/x") {
            ApiError::Transport { status, detail } => {
                assert_eq!(status, 503);
                assert_eq!(detail, "try again later");
            }
            other => panic!("expected transport, got {:?}", other),
        }
    }

    #[test]
    fn test_post_filter() {
        let folder = json!({ "id": "1", "folder": { "childCount": 3 } });
        let file = json!({ "id": "2", "file": { "mimeType": "text/plain" } });

        assert!(ItemPostFilter::All.admits(&folder));
        assert!(ItemPostFilter::All.admits(&file));
        assert!(ItemPostFilter::FoldersOnly.admits(&folder));
        assert!(!ItemPostFilter::FoldersOnly.admits(&file));
        assert!(ItemPostFilter::FilesOnly.admits(&file));
        assert!(!ItemPostFilter::FilesOnly.admits(&folder));
    }
}
