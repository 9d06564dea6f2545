use indexmap::IndexMap;

/// One row of a search response. Only the first sense of an item is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub word: String,
    pub target_code: String,
    pub definition: String,
    pub pos: String,
    pub kind: String,
    pub category: String,
    pub origin: String,
    /// 1-based position among the hits of one response.
    pub order: usize,
}


#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordDetail {
    pub word: String,
    pub pronunciation: String,
    pub definition: String,
    pub norm_type: String,
    pub pos: String,
    pub type2: String,
    /// Origin class of the headword (고유어, 한자어, 외래어, ...).
    pub word_type: String,
    /// Class of the sense (일반어, 전문어, ...).
    pub sense_type: String,
    pub synonyms: Vec<String>,
    pub related_words: Vec<String>,
    pub examples: Vec<String>,
    pub proverbs: Vec<String>,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGroup {
    pub word: String,
    pub pronunciation: String,
    pub origin: String,
    pub definitions: Vec<GroupedDefinition>,
}

impl WordGroup {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_owned(),
            pronunciation: String::new(),
            origin: String::new(),
            definitions: Vec::new(),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedDefinition {
    pub pos: String,
    pub pos_abbr: String,
    pub meaning: String,
    pub examples: Vec<String>,
    pub word_type: String,
}

/// Headword groups in the order their headwords were first seen.
#[derive(Debug, Clone, Default)]
pub struct WordGroups {
    groups: IndexMap<String, WordGroup>,
}

impl WordGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group for `word`, seeding an empty one on first sight.
    pub fn entry(&mut self, word: &str) -> &mut WordGroup {
        self.groups
            .entry(word.to_owned())
            .or_insert_with(|| WordGroup::new(word))
    }

    pub fn get(&self, word: &str) -> Option<&WordGroup> {
        self.groups.get(word)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(|word| &word[..])
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, WordGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a WordGroups {
    type Item = &'a WordGroup;
    type IntoIter = indexmap::map::Values<'a, String, WordGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for WordGroups {
    type Item = WordGroup;
    type IntoIter = indexmap::map::IntoValues<String, WordGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_values()
    }
}
