/// Configuration system for taxidash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::TaxidashConfig::default()`]
/// 2. **User global config**: `~/.taxidash/config.toml`
/// 3. **Project local config**: `.taxidash.toml` in the current working directory
/// 4. **Environment variables**: `TAXIDASH_*` overrides (highest precedence)
///
/// Later layers override earlier ones key by key: a file that only sets
/// `[display] hourly_chart = false` leaves everything else untouched.
///
/// # Usage
///
/// ```rust,ignore
/// use taxidash::config;
///
/// let cfg = config::load();
/// let client = BackendClient::from_config(&cfg.backend);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::TaxidashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Unreadable or malformed files are skipped so a broken config never
/// blocks the dashboard.
pub fn load() -> TaxidashConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files, in order, on top of the defaults.
///
/// A layer that parses but would not deserialize once merged (a value of the
/// wrong type, say) is dropped on its own; earlier layers keep their effect.
fn load_layers(paths: &[Option<PathBuf>]) -> TaxidashConfig {
    let mut config = TaxidashConfig::default();
    let Ok(mut merged) = toml::Value::try_from(&config) else {
        return config;
    };

    for path in paths.iter().flatten() {
        let Some(layer) = load_toml_value(path) else {
            continue;
        };
        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        let resolved: Result<TaxidashConfig, _> = candidate.clone().try_into();
        if let Ok(resolved) = resolved {
            merged = candidate;
            config = resolved;
        }
    }

    config
}

/// Read a TOML file as an untyped value, if it exists and parses.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Deep-merge `overlay` into `base`: tables merge recursively, anything else
/// in the overlay replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.taxidash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".taxidash").join("config.toml"))
}

/// Path to the project local config: `.taxidash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".taxidash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `TAXIDASH_BACKEND_URL`: analytics API root
/// - `TAXIDASH_PAGE_SIZE`: trips per page
/// - `TAXIDASH_TIMEOUT_MS`: request timeout, `0` for none
/// - `TAXIDASH_DIAGNOSTICS`: diagnostics log on/off (`1`/`true`/`yes`/`on`)
/// - `TAXIDASH_WEB_ADDR`: listen address for `taxidash web`
fn apply_env_overrides(config: &mut TaxidashConfig) {
    if let Ok(val) = std::env::var("TAXIDASH_BACKEND_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("TAXIDASH_PAGE_SIZE")
        && let Ok(n) = val.parse::<u32>()
    {
        config.backend.page_size = n;
    }
    if let Ok(val) = std::env::var("TAXIDASH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("TAXIDASH_DIAGNOSTICS") {
        config.diagnostics.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("TAXIDASH_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.taxidash/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.taxidash/ directory")?;
    }

    fs::write(&path, TaxidashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `backend.base_url`. The new value is parsed
/// according to the type of the value it replaces.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(TaxidashConfig::default())
            .context("failed to serialize default config")?
    };

    // Keys missing from a sparse file are still valid if the defaults know them.
    let defaults = toml::Value::try_from(TaxidashConfig::default())
        .context("failed to serialize default config")?;
    set_toml_value(&mut root, &defaults, key, value)?;

    // Reject values that would no longer deserialize.
    let _: TaxidashConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': '{value}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// `defaults` is consulted for the value type when the key is absent from
/// `root`, and decides whether the key is known at all.
fn set_toml_value(
    root: &mut toml::Value,
    defaults: &toml::Value,
    key: &str,
    raw_value: &str,
) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    let mut template = Some(defaults);
    for &part in sections {
        template = template.and_then(|t| t.get(part));
        if template.is_none() && current.get(part).is_none() {
            anyhow::bail!("config key not found: section '{part}' in '{key}'");
        }
        let table = current
            .as_table_mut()
            .with_context(|| format!("expected table above '{part}' in '{key}'"))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table for '{key}'"))?;

    let existing = table
        .get(*leaf)
        .cloned()
        .or_else(|| template.and_then(|t| t.get(*leaf)).cloned());

    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None if *leaf == "path" => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
