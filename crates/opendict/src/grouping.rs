use std::future::Future;

use crate::{GroupedDefinition, SearchHit, WordDetail, WordGroups};

pub const MAX_EXAMPLES: usize = 3;
pub const DEFAULT_POS: &str = "명사";
pub const DEFAULT_POS_ABBR: &str = "명";

/// Groups hits by headword, fetching the detail of every hit to build its definition.
///
/// Pronunciation and origin are taken from the first detail that carries
/// them. Every fetched detail appends one definition; hits whose detail
/// cannot be fetched still seed their group.
pub async fn group_hits<F, Fut>(hits: &[SearchHit], mut fetch_detail: F) -> WordGroups
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Option<WordDetail>>,
{
    let mut groups = WordGroups::new();
    for hit in hits {
        groups.entry(&hit.word);
        if hit.target_code.is_empty() {
            continue;
        }
        let Some(detail) = fetch_detail(hit.target_code.clone()).await else {
            continue;
        };
        let group = groups.entry(&hit.word);
        if group.pronunciation.is_empty() && !detail.pronunciation.is_empty() {
            group.pronunciation = format!("[{}]", detail.pronunciation);
        }
        if group.origin.is_empty() && !detail.word_type.is_empty() {
            group.origin = detail.word_type.clone();
        }
        group.definitions.push(definition_from_detail(detail));
    }
    groups
}

pub fn definition_from_detail(detail: WordDetail) -> GroupedDefinition {
    let pos = if detail.pos.is_empty() {
        DEFAULT_POS.to_owned()
    } else {
        detail.pos
    };
    GroupedDefinition {
        pos_abbr: pos_abbreviation(&pos),
        pos,
        meaning: detail.definition,
        examples: detail.examples.into_iter().take(MAX_EXAMPLES).collect(),
        word_type: detail.sense_type,
    }
}

/// First character of a part of speech, e.g. `명` for `명사`.
pub fn pos_abbreviation(pos: &str) -> String {
    pos.chars()
        .next()
        .map(String::from)
        .unwrap_or_else(|| DEFAULT_POS_ABBR.to_owned())
}
