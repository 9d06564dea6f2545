use config::AppConfig;
use lookup::{Lookup, LookupOutcome, ResultSource, SearchListing};
use opendict::{truncate_display, Dictionary, WordDetail, WordGroups};
use storage::FallbackStore;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utilities::{input, split_indexed_query};

mod config;
mod lookup;
mod storage;
mod utilities;

const LIST_DEFINITION_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.debug);
    info!(port = config.port, debug = config.debug, "starting korean dictionary");

    let store = FallbackStore::initialize(&config.database_path).await?;
    let dict = Dictionary::new(config.api.clone())?;
    let lookup = Lookup::new(&dict, &store, &config.lookup);
    loop {
        let Some(line) = input(">> ")? else {
            break;
        };
        let line = line.trim();
        let mut command_parts = line.split_whitespace();
        if let Some(command) = command_parts.next() {
            let args = command_parts.collect::<Vec<&str>>();
            match command {
                "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                    break;
                }
                "meaning" | "m" | "define" => {
                    let query = args.join(" ");
                    print_meaning(&query, lookup.meaning(&query).await);
                }
                "search" | "find" | "s" => {
                    let query = args.join(" ");
                    print_listing(&query, &lookup.listing(&query).await);
                }
                "view" | "v" => match split_indexed_query(&args) {
                    Some((query, index)) => match lookup.word_detail(&query, index).await {
                        Some(detail) => print_detail(&detail),
                        None => println!("단어를 찾을 수 없습니다."),
                    },
                    None => println!("Usage: view <query> <number>"),
                },
                _ => {
                    println!("Unknown command {command}.");
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_meaning(query: &str, outcome: LookupOutcome) {
    match outcome {
        LookupOutcome::Present { source, groups } => print_groups(query, source, &groups),
        LookupOutcome::NoResults => print_no_results(query),
    }
}

fn print_groups(query: &str, source: ResultSource, groups: &WordGroups) {
    println!("\"{query}\" 검색결과 ({}개)", groups.len());
    for group in groups {
        let mut heading = group.word.clone();
        for extra in [&group.pronunciation, &group.origin] {
            if !extra.is_empty() {
                heading.push(' ');
                heading.push_str(extra);
            }
        }
        println!("{heading}");
        for (index, definition) in group.definitions.iter().enumerate() {
            println!(
                "    {}. 「{}」 {}",
                index + 1,
                definition.pos_abbr,
                definition.meaning
            );
            for example in &definition.examples {
                println!("          예) {example}");
            }
        }
    }
    match source {
        ResultSource::Api => println!("자료 출처: 우리말샘 API"),
        ResultSource::Local => println!("자료 출처: 로컬 데이터베이스"),
    }
}

fn print_listing(query: &str, listing: &SearchListing) {
    if listing.is_empty() {
        print_no_results(query);
        return;
    }
    for hit in &listing.words {
        let origin = if hit.origin.is_empty() {
            String::new()
        } else {
            format!("({})", hit.origin)
        };
        println!(
            "[{}] {}{origin} 「{}」 {}",
            hit.order,
            hit.word,
            hit.pos,
            truncate_display(&hit.definition, LIST_DEFINITION_WIDTH)
        );
    }
    if !listing.proverbs.is_empty() {
        println!("속담:");
        for hit in &listing.proverbs {
            println!("    {}: {}", hit.word, hit.definition);
        }
    }
}

fn print_detail(detail: &WordDetail) {
    println!("Showing definition for '{}' [{}]:", detail.word, detail.pronunciation);
    println!("    「{}」 {}", detail.pos, detail.definition);
    if !detail.norm_type.is_empty() || !detail.type2.is_empty() {
        println!("    {} {}", detail.norm_type, detail.type2);
    }
    for example in &detail.examples {
        println!("          example: {example}");
    }
    if !detail.synonyms.is_empty() {
        println!("      synonyms: {}", detail.synonyms.join(", "));
    }
    if !detail.related_words.is_empty() {
        println!("      related: {}", detail.related_words.join(", "));
    }
    for proverb in &detail.proverbs {
        println!("      proverb: {proverb}");
    }
}

fn print_no_results(query: &str) {
    println!("\"{query}\"에 대한 검색 결과가 없습니다.");
    println!("다른 검색어로 시도해보세요.");
    println!("검색 팁:");
    println!("    - 단어의 정확한 표기를 확인해보세요");
    println!("    - 유사한 의미의 다른 단어로 검색해보세요");
    println!("    - 단어의 일부만으로 검색해보세요");
}
