use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads every row of a headed CSV table. A missing file is an empty table.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> csv::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    reader.deserialize().collect()
}

/// Rewrites the whole table: header first, then every row in order.
///
/// The rows go to a `.part` sibling which replaces `path` only after a
/// successful flush, so a failed write leaves the previous table intact.
pub fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> csv::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let part = part_path(path);
    let result = write_to(&part, headers, rows);
    if result.is_err() {
        let _ = fs::remove_file(&part);
        return result;
    }
    fs::rename(&part, path)?;
    Ok(())
}

/// Appends one row, writing the header first when the file is new.
pub fn append_row<T: Serialize>(path: &Path, headers: &[&str], row: &T) -> csv::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let is_new = !path.exists();
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(headers)?;
    }
    writer.serialize(row)?;
    writer.flush()?;
    Ok(())
}

fn write_to<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(rename = "Key")]
        key: String,
        #[serde(rename = "Value")]
        value: String,
    }

    fn row(key: &str, value: &str) -> Row {
        Row {
            key: key.into(),
            value: value.into(),
        }
    }

    const HEADERS: &[&str] = &["Key", "Value"];

    #[test]
    fn test_missing_file_reads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let rows: Vec<Row> = read_rows(&tmp.path().join("nope.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("t.csv");
        write_rows(&path, HEADERS, &[row("b", "2"), row("a", "1")]).unwrap();
        let rows: Vec<Row> = read_rows(&path).unwrap();
        assert_eq!(rows, vec![row("b", "2"), row("a", "1")]);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("t.csv");
        write_rows::<Row>(&path, HEADERS, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Key,Value\n");
    }

    #[test]
    fn test_write_leaves_no_part_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("t.csv");
        write_rows(&path, HEADERS, &[row("a", "1")]).unwrap();
        assert!(!tmp.path().join("t.csv.part").exists());
    }

    #[test]
    fn test_append_writes_header_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sub").join("t.csv");
        append_row(&path, HEADERS, &row("a", "1")).unwrap();
        append_row(&path, HEADERS, &row("b", "2")).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Key,Value\na,1\nb,2\n"
        );
    }

    #[test]
    fn test_read_trims_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("t.csv");
        fs::write(&path, "Key,Value\n a , 1 \n").unwrap();
        let rows: Vec<Row> = read_rows(&path).unwrap();
        assert_eq!(rows, vec![row("a", "1")]);
    }

    #[test]
    fn test_read_rejects_missing_column() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("t.csv");
        fs::write(&path, "Key\na\n").unwrap();
        assert!(read_rows::<Row>(&path).is_err());
    }
}
