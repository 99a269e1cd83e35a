use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cgm_merge::MergeOptions;

/// Load merge options, picking the format from the file extension.
/// Unknown extensions are tried as TOML, then YAML, then JSON.
pub fn load_options(path: &Path) -> Result<MergeOptions> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading merge config '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => {
            toml::from_str(&data).context("parsing merge config toml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing merge config yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing merge config json")
        }
        _ => toml::from_str(&data)
            .ok()
            .or_else(|| serde_yaml::from_str(&data).ok())
            .map(Ok)
            .unwrap_or_else(|| serde_json::from_str(&data))
            .context("parsing merge config"),
    }
}
