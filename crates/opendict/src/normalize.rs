use roxmltree::{Document, Node};
use tracing::debug;

use crate::{DictionaryError, SearchHit, WordDetail};

pub const DEFINITION_LIMIT: usize = 80;

const PROVERB_KIND: &str = "속담";
const SYNONYM_RELATION: &str = "유의어";
const RELATED_RELATIONS: [&str; 2] = ["참고어휘", "관련어"];

/// Cuts `text` down to [`DEFINITION_LIMIT`] characters, marking the cut with `...`.
pub fn truncate_definition(text: &str) -> String {
    match text.char_indices().nth(DEFINITION_LIMIT) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_owned(),
    }
}

/// Shortens text for display, keeping `max_length - 1` characters and a `…`.
pub fn truncate_display(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_length.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn normalize_search(xml: &str) -> Result<Vec<SearchHit>, DictionaryError> {
    let document = Document::parse(xml)?;
    let mut hits = Vec::new();
    for (item, sense) in first_senses(&document) {
        let word = headword(item);
        hits.push(SearchHit {
            target_code: child_text(sense, "target_code"),
            definition: truncate_definition(&child_text(sense, "definition")),
            pos: child_text(sense, "pos"),
            kind: text_or_item(sense, item, "type"),
            category: text_or_item(sense, item, "cat"),
            origin: text_or_item(sense, item, "origin"),
            order: hits.len() + 1,
            word,
        });
    }
    Ok(hits)
}

pub fn normalize_proverbs(xml: &str) -> Result<Vec<SearchHit>, DictionaryError> {
    let document = Document::parse(xml)?;
    let mut hits = Vec::new();
    for (item, sense) in first_senses(&document) {
        hits.push(SearchHit {
            word: headword(item),
            target_code: child_text(sense, "target_code"),
            definition: child_text(sense, "definition"),
            pos: String::new(),
            kind: PROVERB_KIND.to_owned(),
            category: String::new(),
            origin: String::new(),
            order: hits.len() + 1,
        });
    }
    Ok(hits)
}

/// Builds the detail record of a view response.
///
/// Returns `Ok(None)` when the response lacks either `wordInfo` or
/// `senseInfo`; a record is never built from half a response.
pub fn normalize_detail(xml: &str) -> Result<Option<WordDetail>, DictionaryError> {
    let document = Document::parse(xml)?;
    let root = document.root_element();
    let (Some(word_info), Some(sense_info)) = (
        descendant(root, "wordInfo"),
        descendant(root, "senseInfo"),
    ) else {
        return Ok(None);
    };

    let word = headword(word_info);
    let pronunciation = children(word_info, "pronunciation_info")
        .next()
        .map(|info| child_text(info, "pronunciation"))
        .unwrap_or_default();

    let mut synonyms = Vec::new();
    let mut related_words = Vec::new();
    for relation in children(sense_info, "relation_info") {
        let kind = child_text(relation, "type");
        let link = child_text(relation, "link_target_code");
        if link.trim().is_empty() {
            continue;
        }
        if kind == SYNONYM_RELATION {
            synonyms.push(link);
        } else if RELATED_RELATIONS.contains(&&kind[..]) {
            related_words.push(link);
        }
    }

    let examples = placeholder_texts(sense_info, "example_info", "example", &word);
    let proverbs = placeholder_texts(sense_info, "proverb_info", "proverb", &word);

    Ok(Some(WordDetail {
        pronunciation,
        definition: child_text(sense_info, "definition"),
        norm_type: child_text(sense_info, "norm_grade"),
        pos: child_text(sense_info, "pos"),
        type2: child_text(sense_info, "type2"),
        word_type: child_text(word_info, "word_type"),
        sense_type: child_text(sense_info, "type"),
        synonyms,
        related_words,
        examples,
        proverbs,
        word,
    }))
}

/// Replaces every `{headword}` token with the bare headword.
pub fn replace_placeholder(text: &str, word: &str) -> String {
    if word.is_empty() {
        return text.to_owned();
    }
    text.replace(&format!("{{{word}}}"), word)
}

fn first_senses<'a, 'input>(
    document: &'a Document<'input>,
) -> impl Iterator<Item = (Node<'a, 'input>, Node<'a, 'input>)> {
    document
        .descendants()
        .filter(|node| node.has_tag_name("item"))
        .filter_map(|item| {
            if headword(item).is_empty() {
                debug!("skipping item without a headword");
                return None;
            }
            child(item, "sense").map(|sense| (item, sense))
        })
}

fn placeholder_texts(parent: Node, info: &str, field: &str, word: &str) -> Vec<String> {
    children(parent, info)
        .map(|node| child_text(node, field))
        .filter(|text| !text.trim().is_empty())
        .map(|text| replace_placeholder(&text, word))
        .collect()
}

fn text_or_item(sense: Node, item: Node, name: &str) -> String {
    let text = child_text(sense, name);
    if text.trim().is_empty() {
        child_text(item, name)
    } else {
        text
    }
}

fn descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants().find(|node| node.has_tag_name(name))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|node| node.has_tag_name(name))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |node| node.has_tag_name(name))
}

/// Text of the `word` child with surrounding whitespace removed.
fn headword(node: Node) -> String {
    child_text(node, "word").trim().to_owned()
}

fn child_text(node: Node, name: &str) -> String {
    child(node, name)
        .and_then(|node| node.text())
        .map(str::to_owned)
        .unwrap_or_default()
}
