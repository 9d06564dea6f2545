use std::io::{self, BufRead, Write};

/// Prompts on stdout and reads one line of stdin. `None` once stdin is closed.
pub fn input(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    read_line(io::stdin().lock())
}

fn read_line(mut reader: impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Splits `<query...> <index>` into the query and its 1-based index.
pub fn split_indexed_query(args: &[&str]) -> Option<(String, usize)> {
    let (last, query) = args.split_last()?;
    let index = last.parse::<usize>().ok()?;
    if query.is_empty() {
        return None;
    }
    Some((query.join(" "), index))
}
