//! Blocking HTTP plumbing: authenticated GETs and `Link`-header pagination.

use std::collections::VecDeque;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use issuepress_shared::{IssuePressError, Result};

/// User-Agent string for API requests (GitHub rejects requests without one).
const USER_AGENT: &str = concat!("issuepress/", env!("CARGO_PKG_VERSION"));

/// Media type recommended by the GitHub REST API.
const GITHUB_JSON: &str = "application/vnd.github+json";

pub(crate) struct Http {
    client: Client,
    base: Url,
    per_page: u32,
}

impl Http {
    pub(crate) fn new(token: &str, base: Url, timeout_secs: u64, per_page: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        if !token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| IssuePressError::validation("token contains invalid characters"))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IssuePressError::Tracker(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            per_page,
        })
    }

    /// Build an API URL from a path relative to the base and query pairs.
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| IssuePressError::validation(format!("bad API path {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Like [`Http::endpoint`], with `per_page` appended.
    pub(crate) fn paged_endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.endpoint(path, query)?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    /// GET `url` and decode the JSON body. Also returns the next-page URL, if any.
    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<(T, Option<Url>)> {
        trace!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| IssuePressError::Tracker(format!("{url}: {e}")))?;

        let response = check_status(url, response)?;
        let next = next_page(response.headers());
        let body = response
            .text()
            .map_err(|e| IssuePressError::Tracker(format!("{url}: failed to read body: {e}")))?;
        let value = serde_json::from_str(&body)
            .map_err(|e| IssuePressError::parse(format!("{url}: {e}")))?;
        Ok((value, next))
    }

    /// Lazily walk every page starting at `first`.
    pub(crate) fn pages<T: DeserializeOwned>(&self, first: Result<Url>) -> Pages<'_, T> {
        let (next, pending_error) = match first {
            Ok(url) => (Some(url), None),
            Err(e) => (None, Some(e)),
        };
        Pages {
            http: self,
            next,
            buffer: VecDeque::new(),
            pending_error,
        }
    }
}

fn check_status(url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(IssuePressError::NotFound(url.path().to_string()));
    }
    if !status.is_success() {
        return Err(IssuePressError::Tracker(format!("{url}: HTTP {status}")));
    }
    Ok(response)
}

/// Extract the `rel="next"` target from a `Link` header.
fn next_page(headers: &HeaderMap) -> Option<Url> {
    static NEXT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("valid regex"));

    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(link, &NEXT_RE)
}

fn parse_next_link(link: &str, re: &Regex) -> Option<Url> {
    let caps = re.captures(link)?;
    Url::parse(&caps[1]).ok()
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Forward-only iterator over a paginated listing, one request per page.
///
/// A failed request is yielded once as `Err` and ends the iteration.
pub(crate) struct Pages<'a, T> {
    http: &'a Http,
    next: Option<Url>,
    buffer: VecDeque<T>,
    pending_error: Option<IssuePressError>,
}

impl<T: DeserializeOwned> Iterator for Pages<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.pending_error.take() {
            return Some(Err(e));
        }

        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            let url = self.next.take()?;
            match self.http.get_json::<Vec<T>>(&url) {
                Ok((items, next)) => {
                    debug!(%url, count = items.len(), "fetched page");
                    self.buffer.extend(items);
                    self.next = next;
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
