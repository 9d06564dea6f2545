use opendict::{
    group_hits, DictionaryError, DictionarySource, SearchHit, SearchRequest, WordDetail, WordGroups,
};
use tracing::{debug, warn};

use crate::config::LookupConfig;
use crate::storage::FallbackStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Api,
    Local,
}

#[derive(Debug)]
pub enum LookupOutcome {
    Present {
        source: ResultSource,
        groups: WordGroups,
    },
    NoResults,
}

#[derive(Debug, Default)]
pub struct SearchListing {
    pub words: Vec<SearchHit>,
    pub proverbs: Vec<SearchHit>,
}

impl SearchListing {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.proverbs.is_empty()
    }
}

/// Runs one request against the open dictionary, falling back to the local store.
///
/// Failures never escape: every [`DictionaryError`] is logged and treated as
/// "nothing found", and a failing local store ends in [`LookupOutcome::NoResults`].
pub struct Lookup<'a, S> {
    source: &'a S,
    store: &'a FallbackStore,
    config: &'a LookupConfig,
}

impl<'a, S: DictionarySource> Lookup<'a, S> {
    pub fn new(source: &'a S, store: &'a FallbackStore, config: &'a LookupConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Headword groups for `query`, live when possible, local otherwise.
    pub async fn meaning(&self, query: &str) -> LookupOutcome {
        let query = query.trim();
        if query.is_empty() {
            return LookupOutcome::NoResults;
        }

        let groups = self.live_groups(query).await;
        if !groups.is_empty() {
            debug!(query, groups = groups.len(), "grouped live results");
            return LookupOutcome::Present {
                source: ResultSource::Api,
                groups,
            };
        }

        debug!(query, "no live results, trying local store");
        match self.store.lookup(query).await {
            Ok(groups) if !groups.is_empty() => LookupOutcome::Present {
                source: ResultSource::Local,
                groups,
            },
            Ok(_) => LookupOutcome::NoResults,
            Err(error) => {
                warn!(query, %error, "local lookup failed");
                LookupOutcome::NoResults
            }
        }
    }

    /// Headword hits and proverb hits for the result list.
    pub async fn listing(&self, query: &str) -> SearchListing {
        let query = query.trim();
        if query.is_empty() {
            return SearchListing::default();
        }
        SearchListing {
            words: self
                .search_or_empty(&SearchRequest::words(query, self.config.word_limit))
                .await,
            proverbs: self
                .search_or_empty(&SearchRequest::proverbs(query, self.config.proverb_limit))
                .await,
        }
    }

    /// Detail of the `index`-th (1-based) headword hit for `query`.
    pub async fn word_detail(&self, query: &str, index: usize) -> Option<WordDetail> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let hits = self
            .search_or_empty(&SearchRequest::words(query, self.config.word_limit))
            .await;
        let hit = hits.get(index.checked_sub(1)?)?;
        self.detail_or_none(&hit.target_code).await
    }

    async fn live_groups(&self, query: &str) -> WordGroups {
        let hits = self
            .search_or_empty(&SearchRequest::plain(query, self.config.plain_limit))
            .await;
        let hits = &hits[..hits.len().min(self.config.max_grouped_items)];
        group_hits(hits, |target_code| async move {
            self.detail_or_none(&target_code).await
        })
        .await
    }

    async fn search_or_empty(&self, request: &SearchRequest) -> Vec<SearchHit> {
        match self.source.search(request).await {
            Ok(hits) => hits,
            Err(error) => {
                report(&error);
                Vec::new()
            }
        }
    }

    async fn detail_or_none(&self, target_code: &str) -> Option<WordDetail> {
        match self.source.get_detail(target_code).await {
            Ok(detail) => Some(detail),
            Err(error) => {
                report(&error);
                None
            }
        }
    }
}

fn report(error: &DictionaryError) {
    match error {
        DictionaryError::EmptyResult(query) => debug!(query, "dictionary has no entries"),
        other => warn!(error = %other, "dictionary lookup degraded to empty"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use opendict::{ApiConfig, Dictionary, SearchFilter};
    use tempfile::TempDir;

    use super::*;

    #[derive(Default)]
    struct StubSource {
        hits: Vec<SearchHit>,
        proverbs: Vec<SearchHit>,
        details: HashMap<String, WordDetail>,
    }

    impl DictionarySource for StubSource {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, DictionaryError> {
            let hits = match request.filter {
                SearchFilter::Proverbs => &self.proverbs,
                SearchFilter::Plain | SearchFilter::Words => &self.hits,
            };
            if hits.is_empty() {
                return Err(DictionaryError::EmptyResult(request.query.clone()));
            }
            Ok(hits.iter().take(request.limit).cloned().collect())
        }

        async fn get_detail(&self, target_code: &str) -> Result<WordDetail, DictionaryError> {
            self.details
                .get(target_code)
                .cloned()
                .ok_or_else(|| DictionaryError::MissingSubtree(target_code.to_owned()))
        }
    }

    fn hit(word: &str, target_code: &str, order: usize) -> SearchHit {
        SearchHit {
            word: word.to_owned(),
            target_code: target_code.to_owned(),
            definition: String::new(),
            pos: "명사".to_owned(),
            kind: "일반어".to_owned(),
            category: String::new(),
            origin: String::new(),
            order,
        }
    }

    fn detail(word: &str, definition: &str) -> WordDetail {
        WordDetail {
            word: word.to_owned(),
            pronunciation: word.to_owned(),
            definition: definition.to_owned(),
            pos: "명사".to_owned(),
            word_type: "고유어".to_owned(),
            sense_type: "일반어".to_owned(),
            ..WordDetail::default()
        }
    }

    async fn seeded_store() -> (TempDir, FallbackStore) {
        let tmp = TempDir::new().unwrap();
        let store = FallbackStore::initialize(&tmp.path().join("korean_dict.db"))
            .await
            .unwrap();
        (tmp, store)
    }

    /// A dictionary whose endpoint accepts connections and never answers.
    async fn stalled_dictionary() -> Dictionary {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        Dictionary::new(ApiConfig {
            key: "test-key".to_owned(),
            search_url: url.clone(),
            view_url: url,
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn live_hits_group_under_one_headword() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource {
            hits: vec![hit("가을", "1001", 1), hit("가을", "1002", 2)],
            details: HashMap::from([
                ("1001".to_owned(), detail("가을", "여름과 겨울 사이의 계절.")),
                ("1002".to_owned(), detail("가을", "곡식이 익는 때.")),
            ]),
            ..StubSource::default()
        };
        let outcome = Lookup::new(&source, &store, &config).meaning("가을").await;
        let LookupOutcome::Present { source, groups } = outcome else {
            panic!("expected live results");
        };
        assert_eq!(source, ResultSource::Api);
        assert_eq!(groups.words().collect::<Vec<_>>(), ["가을"]);
        let meanings: Vec<&str> = groups.get("가을").unwrap().definitions.iter().map(|d| &d.meaning[..]).collect();
        assert_eq!(meanings, ["여름과 겨울 사이의 계절.", "곡식이 익는 때."]);
        assert_eq!(groups.get("가을").unwrap().pronunciation, "[가을]");
    }

    #[tokio::test]
    async fn grouping_is_capped_to_configured_hits() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let words = ["가", "나", "다", "라", "마", "바", "사"];
        let source = StubSource {
            hits: words.iter().enumerate().map(|(i, w)| hit(w, "", i + 1)).collect(),
            ..StubSource::default()
        };
        let LookupOutcome::Present { groups, .. } =
            Lookup::new(&source, &store, &config).meaning("가").await
        else {
            panic!("expected live results");
        };
        assert_eq!(groups.words().collect::<Vec<_>>(), ["가", "나", "다", "라", "마"]);
    }

    #[tokio::test]
    async fn timeout_with_no_local_row_is_no_results() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let dict = stalled_dictionary().await;
        let outcome = Lookup::new(&dict, &store, &config).meaning("없는단어").await;
        assert!(matches!(outcome, LookupOutcome::NoResults));
    }

    #[tokio::test]
    async fn timeout_falls_back_to_local_store() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let dict = stalled_dictionary().await;
        let outcome = Lookup::new(&dict, &store, &config).meaning("학교").await;
        let LookupOutcome::Present { source, groups } = outcome else {
            panic!("expected local results");
        };
        assert_eq!(source, ResultSource::Local);
        assert_eq!(groups.get("학교").unwrap().pronunciation, "[학꾜]");
    }

    #[tokio::test]
    async fn empty_api_uses_local_row() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource::default();
        let outcome = Lookup::new(&source, &store, &config).meaning("학교").await;
        let LookupOutcome::Present { source, groups } = outcome else {
            panic!("expected local results");
        };
        assert_eq!(source, ResultSource::Local);
        let group = groups.get("학교").unwrap();
        assert_eq!(group.pronunciation, "[학꾜]");
        assert_eq!(group.origin, "한자어");
    }

    #[tokio::test]
    async fn hits_without_details_still_count_as_live() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource {
            hits: vec![hit("학교", "404", 1)],
            ..StubSource::default()
        };
        let outcome = Lookup::new(&source, &store, &config).meaning("학교").await;
        let LookupOutcome::Present { source, groups } = outcome else {
            panic!("expected live results");
        };
        assert_eq!(source, ResultSource::Api);
        assert!(groups.get("학교").unwrap().definitions.is_empty());
    }

    #[tokio::test]
    async fn blank_query_has_no_results() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource::default();
        let lookup = Lookup::new(&source, &store, &config);
        assert!(matches!(lookup.meaning("   ").await, LookupOutcome::NoResults));
        assert!(lookup.listing("").await.is_empty());
    }

    #[tokio::test]
    async fn listing_combines_words_and_proverbs() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource {
            hits: vec![hit("말", "1", 1)],
            proverbs: vec![hit("가는 말이 고와야 오는 말이 곱다", "2", 1)],
            ..StubSource::default()
        };
        let listing = Lookup::new(&source, &store, &config).listing("말").await;
        assert_eq!(listing.words.len(), 1);
        assert_eq!(listing.proverbs.len(), 1);
        assert!(!listing.is_empty());
    }

    #[tokio::test]
    async fn word_detail_validates_index() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource {
            hits: vec![hit("눈", "1", 1), hit("눈", "2", 2)],
            details: HashMap::from([("2".to_owned(), detail("눈", "대기 중의 수증기가 얼어서 내리는 것."))]),
            ..StubSource::default()
        };
        let lookup = Lookup::new(&source, &store, &config);
        assert!(lookup.word_detail("눈", 0).await.is_none());
        assert!(lookup.word_detail("눈", 3).await.is_none());
        assert!(lookup.word_detail("눈", 1).await.is_none());
        let found = lookup.word_detail("눈", 2).await.unwrap();
        assert_eq!(found.definition, "대기 중의 수증기가 얼어서 내리는 것.");
    }

    #[tokio::test]
    async fn blank_query_has_no_detail() {
        let (_tmp, store) = seeded_store().await;
        let config = LookupConfig::default();
        let source = StubSource {
            hits: vec![hit("눈", "1", 1)],
            details: HashMap::from([("1".to_owned(), detail("눈", "사람의 감각 기관."))]),
            ..StubSource::default()
        };
        let lookup = Lookup::new(&source, &store, &config);
        assert!(lookup.word_detail("  ", 1).await.is_none());
        assert!(lookup.word_detail("", 1).await.is_none());
        assert!(lookup.word_detail(" 눈 ", 1).await.is_some());
    }
}
