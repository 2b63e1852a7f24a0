// 📤 Document writers for the downstream loader

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{IngestError, Result};
use crate::pipeline::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON document per line
    #[default]
    Jsonl,
    /// A single JSON array
    Json,
}

fn io_error(source: std::io::Error) -> IngestError {
    IngestError::Io {
        path: "<output>".to_string(),
        source,
    }
}

/// Write one document per line; returns how many were written
pub fn write_json_lines<I, W>(documents: I, mut writer: W) -> Result<usize>
where
    I: IntoIterator<Item = Document>,
    W: Write,
{
    let mut count = 0;
    for doc in documents {
        serde_json::to_writer(&mut writer, &doc)?;
        writer.write_all(b"\n").map_err(io_error)?;
        count += 1;
    }
    writer.flush().map_err(io_error)?;
    Ok(count)
}

/// Write every document as one JSON array
pub fn write_json_array<I, W>(documents: I, mut writer: W, pretty: bool) -> Result<usize>
where
    I: IntoIterator<Item = Document>,
    W: Write,
{
    let documents: Vec<Document> = documents.into_iter().collect();
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &documents)?;
    } else {
        serde_json::to_writer(&mut writer, &documents)?;
    }
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    Ok(documents.len())
}

pub fn write_documents<I, W>(
    documents: I,
    writer: W,
    format: OutputFormat,
    pretty: bool,
) -> Result<usize>
where
    I: IntoIterator<Item = Document>,
    W: Write,
{
    match format {
        OutputFormat::Jsonl => write_json_lines(documents, writer),
        OutputFormat::Json => write_json_array(documents, writer, pretty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(id: &str, pmid: i64) -> Document {
        Document {
            id: id.to_string(),
            biomuta: json!({"pmid": pmid}).as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_write_json_lines() {
        let mut buf = Vec::new();
        let count = write_json_lines(vec![doc("a", 1), doc("b", 2)], &mut buf).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, json!({"_id": "a", "biomuta": {"pmid": 1}}));
    }

    #[test]
    fn test_write_json_array() {
        let mut buf = Vec::new();
        let count =
            write_documents(vec![doc("a", 1)], &mut buf, OutputFormat::Json, true).unwrap();
        assert_eq!(count, 1);

        let parsed: Vec<Document> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, vec![doc("a", 1)]);
    }

    #[test]
    fn test_empty_input() {
        let mut buf = Vec::new();
        assert_eq!(write_json_lines(Vec::new(), &mut buf).unwrap(), 0);
        assert!(buf.is_empty());
    }
}
