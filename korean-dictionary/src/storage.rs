use std::path::Path;

use opendict::{GroupedDefinition, WordGroups, DEFAULT_POS, DEFAULT_POS_ABBR};
use sqlx::{query_as, sqlite::SqliteConnectOptions, Connection, FromRow, SqliteConnection};
use tracing::debug;

const DEFAULT_WORD_TYPE: &str = "일반어";

#[derive(Debug, FromRow)]
pub struct LocalEntry {
    pub word: String,
    pub pronunciation: Option<String>,
    pub origin: Option<String>,
    pub meaning: Option<String>,
    pub example: Option<String>,
    pub pos_name: Option<String>,
    pub abbreviation: Option<String>,
}

/// Pre-seeded local word table consulted when the open dictionary has nothing.
///
/// Every call opens its own connection and closes it before returning.
pub struct FallbackStore {
    options: SqliteConnectOptions,
}

impl FallbackStore {
    pub async fn initialize(path: &Path) -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await?;
        sqlx::migrate!().run(&mut conn).await?;
        conn.close().await?;
        Ok(Self { options })
    }
}

impl FallbackStore {
    /// Finds every stored word whose headword or meaning contains `needle`, case-sensitively.
    pub async fn lookup(&self, needle: &str) -> sqlx::Result<WordGroups> {
        let mut conn = SqliteConnection::connect_with(&self.options).await?;
        let entries: Vec<LocalEntry> = query_as(
            "
            SELECT DISTINCT w.word, w.pronunciation, w.origin,
                   d.meaning, d.example, p.name AS pos_name, p.abbreviation, d.order_num
            FROM words w
            LEFT JOIN definitions d ON w.id = d.word_id
            LEFT JOIN parts_of_speech p ON d.part_of_speech_id = p.id
            WHERE instr(w.word, ?1) > 0 OR instr(d.meaning, ?1) > 0
            ORDER BY w.word, d.order_num;
            ",
        )
        .bind(needle)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        debug!(needle, rows = entries.len(), "local lookup finished");
        Ok(group_entries(entries))
    }
}

fn group_entries(entries: Vec<LocalEntry>) -> WordGroups {
    let mut groups = WordGroups::new();
    for entry in entries {
        let group = groups.entry(&entry.word);
        if group.pronunciation.is_empty() {
            group.pronunciation = entry.pronunciation.unwrap_or_default();
        }
        if group.origin.is_empty() {
            group.origin = entry.origin.unwrap_or_default();
        }
        let Some(meaning) = entry.meaning else {
            continue;
        };
        group.definitions.push(GroupedDefinition {
            pos: entry.pos_name.unwrap_or_else(|| DEFAULT_POS.to_owned()),
            pos_abbr: entry
                .abbreviation
                .unwrap_or_else(|| DEFAULT_POS_ABBR.to_owned()),
            meaning,
            examples: entry.example.into_iter().collect(),
            word_type: DEFAULT_WORD_TYPE.to_owned(),
        });
    }
    groups
}
