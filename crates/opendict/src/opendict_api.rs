// https://opendict.korean.go.kr - 우리말샘 open API, search and view endpoints, XML responses only

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DictionaryError;

const SEARCH_URL: &str = "https://opendict.korean.go.kr/api/search";
const VIEW_URL: &str = "https://opendict.korean.go.kr/api/view";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: String,
    pub search_url: String,
    pub view_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            search_url: SEARCH_URL.to_owned(),
            view_url: VIEW_URL.to_owned(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which slice of the dictionary a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    /// Only the query and the result count.
    Plain,
    /// Exact headword match over vocabulary, dictionary order.
    Words,
    /// Proverbs containing the query, most searched first.
    Proverbs,
}

impl SearchFilter {
    fn params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            SearchFilter::Plain => &[],
            SearchFilter::Words => &[
                ("advanced", "y"),
                ("target", "1"),
                ("method", "exact"),
                ("sort", "dict"),
            ],
            SearchFilter::Proverbs => &[
                ("advanced", "y"),
                ("target", "1"),
                ("method", "include"),
                ("type1", "proverb"),
                ("sort", "popular"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    pub filter: SearchFilter,
}

impl SearchRequest {
    pub fn plain(query: &str, limit: usize) -> Self {
        Self::new(query, limit, SearchFilter::Plain)
    }

    pub fn words(query: &str, limit: usize) -> Self {
        Self::new(query, limit, SearchFilter::Words)
    }

    pub fn proverbs(query: &str, limit: usize) -> Self {
        Self::new(query, limit, SearchFilter::Proverbs)
    }

    fn new(query: &str, limit: usize, filter: SearchFilter) -> Self {
        Self {
            query: query.to_owned(),
            limit,
            filter,
        }
    }
}

pub(crate) async fn fetch_search(
    client: &reqwest::Client,
    config: &ApiConfig,
    request: &SearchRequest,
) -> Result<String, DictionaryError> {
    let req = client
        .get(&config.search_url)
        .query(&[
            ("key", &config.key[..]),
            ("q", &request.query[..]),
            ("req_type", "xml"),
        ])
        .query(&[("num", request.limit)])
        .query(request.filter.params());
    let body = send(req).await?;
    debug!(
        query = %request.query,
        filter = ?request.filter,
        bytes = body.len(),
        "search response received"
    );
    Ok(body)
}

pub(crate) async fn fetch_detail(
    client: &reqwest::Client,
    config: &ApiConfig,
    target_code: &str,
) -> Result<String, DictionaryError> {
    let req = client.get(&config.view_url).query(&[
        ("key", &config.key[..]),
        ("method", "target_code"),
        ("q", target_code),
        ("req_type", "xml"),
    ]);
    let body = send(req).await?;
    debug!(target_code, bytes = body.len(), "view response received");
    Ok(body)
}

async fn send(req: reqwest::RequestBuilder) -> Result<String, DictionaryError> {
    let res: reqwest::Response = req.send().await?;
    let body = res.error_for_status()?.text().await?;
    Ok(body)
}
