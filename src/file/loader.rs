//! Document loading.
//!
//! Files are read as JSON, JSON Lines or YAML depending on their extension,
//! after stripping an optional `.gz` suffix. Gzipped content is decompressed
//! transparently.

use crate::document::parser::{parse_json, parse_value, parse_yaml};
use crate::document::value::Value;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// On-disk document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    JsonLines,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from a file name, ignoring a trailing `.gz`.
    /// Unknown extensions are read as JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use pathquill::file::loader::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("data.yml.gz"), DocumentFormat::Yaml);
    /// assert_eq!(DocumentFormat::from_path("events.ndjson"), DocumentFormat::JsonLines);
    /// assert_eq!(DocumentFormat::from_path("config"), DocumentFormat::Json);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_lowercase();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".yaml") || base.ends_with(".yml") {
            DocumentFormat::Yaml
        } else if base.ends_with(".jsonl") || base.ends_with(".ndjson") {
            DocumentFormat::JsonLines
        } else {
            DocumentFormat::Json
        }
    }

    /// Parses a `--format` style name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            "jsonl" | "ndjson" => Some(DocumentFormat::JsonLines),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

/// Returns true when the file name ends in `.gz`, in any case.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Loads a document from the filesystem.
///
/// ```no_run
/// use pathquill::file::loader::load_file;
///
/// let value = load_file("library.json").unwrap();
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();

    let content = if is_gzip_path(path) {
        read_gzipped_file(path)?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?
    };

    parse_content(&content, DocumentFormat::from_path(path))
}

/// Loads a document from standard input.
///
/// Gzip input is detected by its magic bytes. The content is tried as JSON,
/// then JSON Lines, then YAML.
pub fn load_from_stdin() -> Result<Value> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    load_from_bytes(&buffer)
}

/// Same detection as [`load_from_stdin`], over an in-memory buffer.
pub fn load_from_bytes(bytes: &[u8]) -> Result<Value> {
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };

    if let Ok(value) = parse_json(&content) {
        return Ok(value);
    }
    if let Ok(value) = parse_json_lines(&content) {
        return Ok(value);
    }
    parse_yaml(&content).context("Input is neither JSON, JSON Lines nor YAML")
}

pub fn parse_content(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => parse_json(content),
        DocumentFormat::JsonLines => parse_json_lines(content),
        DocumentFormat::Yaml => parse_yaml(content),
    }
}

/// Parses newline-delimited JSON into an array with one element per line.
///
/// Blank lines are skipped; at least one value is required.
pub fn parse_json_lines(content: &str) -> Result<Value> {
    let mut lines = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", line_num + 1))?;
        lines.push(parse_value(&value));
    }

    if lines.is_empty() {
        anyhow::bail!("No valid JSON found in JSON Lines content");
    }

    Ok(Value::Array(lines))
}

fn read_gzipped_file(path: &Path) -> Result<String> {
    use flate2::read::GzDecoder;

    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open gzipped file {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
