//! Document saving.
//!
//! Output is rendered in full, validated, then written to a temporary file
//! that is renamed over the target. Targets ending in `.gz` are compressed.

use super::loader::{is_gzip_path, DocumentFormat};
use crate::config::Config;
use crate::document::serialize::{to_json_string, to_yaml_string, SerializeOptions};
use crate::document::value::Value;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Creates a backup of the file by copying it to `<name>.bak`.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Output format for `path`: its extension when it names one, otherwise the
/// configured `output_format`.
pub fn output_format_for(path: &Path, config: &Config) -> DocumentFormat {
    let by_extension = DocumentFormat::from_path(path);
    if by_extension != DocumentFormat::Json {
        return by_extension;
    }

    let path_str = path.to_string_lossy().to_lowercase();
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);
    if base.ends_with(".json") {
        DocumentFormat::Json
    } else {
        DocumentFormat::from_name(&config.output_format).unwrap_or(DocumentFormat::Json)
    }
}

/// Renders `value` as text in `format`, ending with a newline.
pub fn render(value: &Value, format: DocumentFormat, options: SerializeOptions) -> Result<String> {
    let mut output = match format {
        DocumentFormat::Json => {
            let json = to_json_string(value, options)?;
            // Catches serialization bugs before they reach the disk.
            serde_json::from_str::<serde_json::Value>(&json)
                .context("Generated invalid JSON")?;
            json
        }
        DocumentFormat::JsonLines => render_json_lines(value, options)?,
        DocumentFormat::Yaml => to_yaml_string(value, options.sort_keys)?,
    };

    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

/// One compact line per array element; any other root is a single line.
fn render_json_lines(value: &Value, options: SerializeOptions) -> Result<String> {
    let compact = SerializeOptions {
        indent: 0,
        ..options
    };
    let lines: &[Value] = match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };

    let mut output = String::new();
    for line in lines {
        output.push_str(&to_json_string(line, compact)?);
        output.push('\n');
    }
    Ok(output)
}

/// Saves `value` to `path`.
///
/// The format comes from the file name or, failing that, from the config.
/// When `config.create_backup` is set and the file exists, it is first
/// copied to `<name>.bak`.
///
/// ```no_run
/// use pathquill::config::Config;
/// use pathquill::document::value::Value;
/// use pathquill::file::saver::save_file;
///
/// save_file("out.yaml", &Value::from("hello"), &Config::default()).unwrap();
/// ```
pub fn save_file<P: AsRef<Path>>(path: P, value: &Value, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let format = output_format_for(path, config);
    save_file_as(path, value, format, config)
}

/// Saves `value` to `path` in an explicit format.
pub fn save_file_as<P: AsRef<Path>>(
    path: P,
    value: &Value,
    format: DocumentFormat,
    config: &Config,
) -> Result<()> {
    let path = path.as_ref();
    let should_compress = is_gzip_path(path);

    let output = render(value, format, config.serialize_options())?;

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    write_file_atomic(path, output.as_bytes(), should_compress)
}

/// Writes data via a temporary file and rename.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::from(vec![
            vec![("b", Value::from(1)), ("a", Value::from(2))]
                .into_iter()
                .collect::<Value>(),
            Value::from("x"),
        ])
    }

    #[test]
    fn test_render_json_ends_with_newline() {
        let output = render(&Value::from(1), DocumentFormat::Json, SerializeOptions::default());
        assert_eq!(output.unwrap(), "1\n");
    }

    #[test]
    fn test_render_json_lines() {
        let output = render(
            &sample(),
            DocumentFormat::JsonLines,
            SerializeOptions::default(),
        )
        .unwrap();
        assert_eq!(output, "{\"a\":2,\"b\":1}\n\"x\"\n");
    }

    #[test]
    fn test_render_rejects_non_finite() {
        let value = Value::Float(f64::INFINITY);
        assert!(render(&value, DocumentFormat::Json, SerializeOptions::default()).is_err());
    }

    #[test]
    fn test_output_format_for() {
        let yaml = Config {
            output_format: "yaml".to_string(),
            ..Config::default()
        };
        assert_eq!(
            output_format_for(Path::new("a.json"), &yaml),
            DocumentFormat::Json
        );
        assert_eq!(
            output_format_for(Path::new("a.out"), &yaml),
            DocumentFormat::Yaml
        );
        assert_eq!(
            output_format_for(Path::new("a.yml.gz"), &Config::default()),
            DocumentFormat::Yaml
        );
        assert_eq!(
            output_format_for(Path::new("a.out"), &Config::default()),
            DocumentFormat::Json
        );
    }
}
