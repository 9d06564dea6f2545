use opendict_api::{fetch_detail, fetch_search};
use thiserror::Error;

mod dictionary;
mod grouping;
mod normalize;
mod opendict_api;

pub use dictionary::{GroupedDefinition, SearchHit, WordDetail, WordGroup, WordGroups};
pub use grouping::{
    definition_from_detail, group_hits, pos_abbreviation, DEFAULT_POS, DEFAULT_POS_ABBR, MAX_EXAMPLES,
};
pub use normalize::{
    normalize_detail, normalize_proverbs, normalize_search, replace_placeholder,
    truncate_definition, truncate_display, DEFINITION_LIMIT,
};
pub use opendict_api::{ApiConfig, SearchFilter, SearchRequest};

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed dictionary response: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("no usable entries for {0:?}")]
    EmptyResult(String),
    #[error("response for {0:?} lacks wordInfo or senseInfo")]
    MissingSubtree(String),
}

/// Anything that can answer searches and detail lookups like the open dictionary API.
#[allow(async_fn_in_trait)]
pub trait DictionarySource {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, DictionaryError>;

    async fn get_detail(&self, target_code: &str) -> Result<WordDetail, DictionaryError>;
}

pub struct Dictionary {
    client: reqwest::Client,
    config: ApiConfig,
}

impl Dictionary {
    pub fn new(config: ApiConfig) -> Result<Self, DictionaryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl DictionarySource for Dictionary {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, DictionaryError> {
        let body = fetch_search(&self.client, &self.config, request).await?;
        let hits = match request.filter {
            SearchFilter::Proverbs => normalize_proverbs(&body)?,
            SearchFilter::Plain | SearchFilter::Words => normalize_search(&body)?,
        };
        if hits.is_empty() {
            return Err(DictionaryError::EmptyResult(request.query.clone()));
        }
        Ok(hits)
    }

    async fn get_detail(&self, target_code: &str) -> Result<WordDetail, DictionaryError> {
        let body = fetch_detail(&self.client, &self.config, target_code).await?;
        normalize_detail(&body)?
            .ok_or_else(|| DictionaryError::MissingSubtree(target_code.to_owned()))
    }
}
