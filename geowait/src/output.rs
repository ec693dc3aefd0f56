use anyhow::Result;
use serde_json::Value as JsonValue;
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
    Raw,
}

pub fn render(fmt: &OutputFormat, data: &JsonValue) -> Result<String> {
    let s = match fmt {
        OutputFormat::Yaml => serde_yaml::to_string(data)?.trim_end().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Raw => match data {
            JsonValue::String(s) => s.clone(),
            // one value per line, so a batch of waits pipes cleanly
            JsonValue::Array(items) => items
                .iter()
                .map(|v| match v {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        },
    };
    Ok(s)
}

pub fn emit_data(fmt: &OutputFormat, data: &JsonValue) -> Result<()> {
    let s = render(fmt, data)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", s)?;
    out.flush()?;
    Ok(())
}

/// Structured error map: the top-level message plus its cause chain.
pub fn error_value(err: &anyhow::Error) -> JsonValue {
    let mut map = serde_json::Map::new();
    map.insert("error".into(), JsonValue::String(err.to_string()));
    let causes: Vec<JsonValue> = err
        .chain()
        .skip(1)
        .map(|c| JsonValue::String(c.to_string()))
        .collect();
    if !causes.is_empty() {
        map.insert("causes".into(), JsonValue::Array(causes));
    }
    JsonValue::Object(map)
}

pub fn emit_error(err: &anyhow::Error) -> Result<()> {
    let s = serde_yaml::to_string(&error_value(err))?;
    let _ = writeln!(io::stderr(), "{}", s.trim_end());
    Ok(())
}
