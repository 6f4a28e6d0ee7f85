//! Request URI composition for the Nimbus CLI client.
//!
//! Takes a canonical resource path produced by resolution and the caller's
//! query options (property selection, free-text search, wildcard name
//! filters) and builds the final request URI. Query shapes the server has
//! no safe translation for are rejected here, before any request is sent.

use crate::nimbus_v1::ApiError;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::warn;

/// Caller-supplied query options for list and search operations.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Explicit property projection (`$select`).
    pub select: Option<Vec<String>>,
    /// Free-text search term; may carry prefix/suffix wildcards.
    pub search: Option<String>,
    /// Wildcard name filter translated to a server-side `$filter`.
    pub include: Option<String>,
    /// Restrict to the shared-with-me view.
    pub shared_with_me: bool,
}

impl QueryOptions {
    pub fn with_select(mut self, select: Option<Vec<String>>) -> Self {
        self.select = select;
        self
    }

    pub fn with_include(mut self, include: Option<String>) -> Self {
        self.include = include;
        self
    }
}

/// Compose the request URI for a canonical path and the given options.
///
/// A search term scoped to a resolvable folder becomes a
/// `search(q='{term}')` route on that folder; combined with the
/// shared-with-me view there is no server-side equivalent and the
/// combination is rejected up front.
pub fn compose(canonical_path: &str, options: &QueryOptions) -> Result<String, ApiError> {
    if options.search.is_some() && options.shared_with_me {
        warn!("Free-text search cannot be applied to the shared-with-me view; no request was sent");
        return Err(ApiError::UnsupportedQuery(
            "free-text search cannot be combined with shared-with-me".to_string(),
        ));
    }

    let mut uri = match &options.search {
        Some(term) => format!("{}/search(q='{}')", canonical_path, encode_search_term(term)),
        None => canonical_path.to_string(),
    };

    let mut query_parts: Vec<String> = Vec::new();

    if let Some(pattern) = &options.include {
        if let Some(filter) = include_filter(pattern)? {
            query_parts.push(format!("$filter={}", filter));
        }
    }

    if let Some(select) = &options.select {
        if !select.is_empty() {
            query_parts.push(format!("$select={}", select.join(",")));
        }
    }

    if !query_parts.is_empty() {
        uri.push('?');
        uri.push_str(&query_parts.join("&"));
    }

    Ok(uri)
}

/// Translate a wildcard include pattern into a server-side filter
/// expression.
///
/// Supported shapes are a trailing wildcard (`token*` → `startswith`), a
/// leading wildcard (`*token` → `endswith`) and no wildcard at all (exact
/// name match). A contains pattern (`*token*`) or an interior wildcard has
/// no server-side equivalent; rather than issue a wrong query, the pattern
/// is rejected with a capability warning.
pub fn include_filter(pattern: &str) -> Result<Option<String>, ApiError> {
    if pattern.is_empty() {
        return Ok(None);
    }

    let wildcard_count = pattern.matches('*').count();
    let filter = if wildcard_count == 0 {
        format!("name eq '{}'", escape_quotes(pattern))
    } else if wildcard_count == 1 && pattern.ends_with('*') {
        let token = &pattern[..pattern.len() - 1];
        format!("startswith(name,'{}')", escape_quotes(token))
    } else if wildcard_count == 1 && pattern.starts_with('*') {
        let token = &pattern[1..];
        format!("endswith(name,'{}')", escape_quotes(token))
    } else {
        warn!(
            "Include pattern {:?} has no server-side translation; only prefix (token*) and suffix (*token) wildcards are supported",
            pattern
        );
        return Err(ApiError::UnsupportedQuery(format!(
            "unsupported wildcard pattern: {}",
            pattern
        )));
    };

    Ok(Some(filter))
}

/// Double embedded single quotes per the filter expression grammar, then
/// percent-encode for URI embedding.
fn encode_search_term(term: &str) -> String {
    utf8_percent_encode(&escape_quotes(term), NON_ALPHANUMERIC).to_string()
}

fn escape_quotes(token: &str) -> String {
    token.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_composes_unchanged() {
        let uri = compose("containers/b!x/root/children", &QueryOptions::default()).unwrap();
        assert_eq!(uri, "containers/b!x/root/children");
    }

    #[test]
    fn test_select_clause() {
        let options = QueryOptions::default()
            .with_select(Some(vec!["id".to_string(), "name".to_string()]));
        let uri = compose("users", &options).unwrap();
        assert_eq!(uri, "users?$select=id,name");
    }

    #[test]
    fn test_prefix_wildcard_becomes_startswith() {
        assert_eq!(
            include_filter("budget*").unwrap(),
            Some("startswith(name,'budget')".to_string())
        );
    }

    #[test]
    fn test_suffix_wildcard_becomes_endswith() {
        assert_eq!(
            include_filter("*.pdf").unwrap(),
            Some("endswith(name,'.pdf')".to_string())
        );
    }

    #[test]
    fn test_no_wildcard_is_exact_match() {
        assert_eq!(
            include_filter("report.pdf").unwrap(),
            Some("name eq 'report.pdf'".to_string())
        );
    }

    #[test]
    fn test_contains_wildcard_is_unsupported() {
        assert!(matches!(
            include_filter("*budget*"),
            Err(ApiError::UnsupportedQuery(_))
        ));
    }

    #[test]
    fn test_interior_wildcard_is_unsupported() {
        assert!(matches!(
            include_filter("bud*get"),
            Err(ApiError::UnsupportedQuery(_))
        ));
    }

    #[test]
    fn test_include_filter_in_composed_uri() {
        let options = QueryOptions::default().with_include(Some("budget*".to_string()));
        let uri = compose("containers/b!x/root/children", &options).unwrap();
        assert_eq!(
            uri,
            "containers/b!x/root/children?$filter=startswith(name,'budget')"
        );
    }

    #[test]
    fn test_search_route() {
        let options = QueryOptions {
            search: Some("quarterly budget".to_string()),
            ..Default::default()
        };
        let uri = compose("containers/b!x/root", &options).unwrap();
        assert_eq!(
            uri,
            "containers/b!x/root/search(q='quarterly%20budget')"
        );
    }

    #[test]
    fn test_search_term_quotes_are_escaped() {
        let options = QueryOptions {
            search: Some("ada's notes".to_string()),
            ..Default::default()
        };
        let uri = compose("containers/b!x/root", &options).unwrap();
        assert!(uri.contains("ada''s") || uri.contains("ada%27%27s"), "{}", uri);
    }

    #[test]
    fn test_search_with_shared_is_rejected_before_dispatch() {
        let options = QueryOptions {
            search: Some("budget".to_string()),
            shared_with_me: true,
            ..Default::default()
        };
        assert!(matches!(
            compose("me/container/sharedWithMe", &options),
            Err(ApiError::UnsupportedQuery(_))
        ));
    }
}
