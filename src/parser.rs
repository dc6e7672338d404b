use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Splits pasted text into member names: one per line, trimmed, blanks dropped.
/// Duplicates are kept; two members may share a name.
pub fn parse_member_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads member names from a file.
///
/// `.csv` files take the column headed "name" (any case). Without such a
/// header the first column is used and the first row counts as a name.
/// Anything else is treated as one name per line.
pub fn load_member_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if !is_csv {
        return Ok(parse_member_names(&fs::read_to_string(path)?));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut records = reader.records().peekable();

    let header_col = match records.peek() {
        Some(Ok(first)) => first.iter().position(|h| h.trim().eq_ignore_ascii_case("name")),
        _ => None,
    };
    if header_col.is_some() {
        records.next();
    }
    let name_col = header_col.unwrap_or(0);

    let mut names = Vec::new();
    for result in records {
        let record = result?;
        let name = record.get(name_col).unwrap_or("").trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_trimmed_and_blanks_dropped() {
        let names = parse_member_names("  Tanaka \n\n\tSuzuki\r\n   \nSato");
        assert_eq!(names, vec!["Tanaka", "Suzuki", "Sato"]);
    }

    #[test]
    fn duplicates_are_kept() {
        assert_eq!(parse_member_names("Aki\nAki"), vec!["Aki", "Aki"]);
    }

    #[test]
    fn blank_text_gives_nothing() {
        assert!(parse_member_names(" \n \n").is_empty());
    }

    #[test]
    fn csv_uses_name_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.csv");
        fs::write(&path, "team,Name\nred, Aki \ngreen,\nred,Ben\n").unwrap();
        assert_eq!(load_member_names(&path).unwrap(), vec!["Aki", "Ben"]);
    }

    #[test]
    fn csv_without_name_header_keeps_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.CSV");
        fs::write(&path, "Aki,driver\nBen,\nChie,passenger\n").unwrap();
        assert_eq!(load_member_names(&path).unwrap(), vec!["Aki", "Ben", "Chie"]);
    }

    #[test]
    fn single_column_csv_of_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.csv");
        fs::write(&path, "Aki\nBen\nChie\n").unwrap();
        assert_eq!(load_member_names(&path).unwrap(), vec!["Aki", "Ben", "Chie"]);
    }

    #[test]
    fn plain_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.txt");
        fs::write(&path, "Aki\n\nBen\n").unwrap();
        assert_eq!(load_member_names(&path).unwrap(), vec!["Aki", "Ben"]);
    }
}
