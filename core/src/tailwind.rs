//! Cleans the Tailwind config produced from Style Dictionary output into a
//! small theme document and a TypeScript `tailwind.config.ts`.

use std::{fs, path::Path};

use serde_json::{json, Map, Value};

use crate::{
    error::{Result, TokenError},
    files,
};

/// Keys containing any of these are transformer noise.
pub const NOISE_FRAGMENTS: [&str; 7] = [
    "youCanHaveMultipleValuesInASingleSpacingToken",
    "readMoreOnTheseHttpsDocs",
    "tokens",
    "studioAvailableTokens",
    "tokensTransformedGlobalTokens",
    "objectObject",
    "spacingMultiValue",
];

/// `theme.extend` properties carried into the cleaned config.
pub const THEME_PROPERTIES: [&str; 11] = [
    "dimension",
    "spacing",
    "borderRadius",
    "colors",
    "opacity",
    "fontFamilies",
    "lineHeights",
    "letterSpacing",
    "paragraphSpacing",
    "fontWeights",
    "fontSizes",
];

pub const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Depth below which keys are no longer pruned. `None` skips pruning.
    pub max_depth: Option<usize>,
    pub remove_source: bool,
}
impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            remove_source: true,
        }
    }
}

pub fn is_noise_key(key: &str) -> bool {
    NOISE_FRAGMENTS.iter().any(|fragment| key.contains(fragment))
        || key.contains('_')
        || (!key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()))
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Drops noise keys and containers left empty by that, down to `max_depth`.
pub fn prune(value: Value, max_depth: usize) -> Value {
    prune_at(value, max_depth, 0)
}

fn prune_at(value: Value, max_depth: usize, depth: usize) -> Value {
    if depth >= max_depth {
        return value;
    }
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| prune_at(item, max_depth, depth + 1))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .filter(|(key, _)| !is_noise_key(key))
            .filter_map(|(key, child)| {
                if child.is_object() || child.is_array() {
                    let child = prune_at(child, max_depth, depth + 1);
                    (!is_empty_container(&child)).then_some((key, child))
                } else {
                    Some((key, child))
                }
            })
            .collect::<Map<_, _>>()
            .into(),
        scalar => scalar,
    }
}

/// Keeps the allow-listed `theme.extend` properties and wraps them in the
/// app's fixed content/darkMode settings.
pub fn clean_config(config: &Value) -> Value {
    let mut extend = Map::new();
    if let Some(source) = config.pointer("/theme/extend").and_then(Value::as_object) {
        for property in THEME_PROPERTIES {
            match source.get(property) {
                Some(value @ (Value::Object(_) | Value::Array(_))) => {
                    extend.insert(property.to_string(), value.clone());
                }
                Some(_) => log::debug!("dropping non-object theme.extend.{property}"),
                None => {}
            }
        }
    }
    json!({
        "content": ["./src/**/*.{ts,tsx}"],
        "darkMode": "class",
        "theme": { "extend": extend },
    })
}

pub fn render_typescript(config: &Value) -> String {
    let body = serde_json::to_string_pretty(config).unwrap_or_else(|_| config.to_string());
    format!(
        "import type {{ Config }} from 'tailwindcss';\n\nconst config: Config = {body};\n\nexport default config;\n"
    )
}

/// Cleans `input` into `theme_json` and `typescript`, then removes `input`
/// unless told to keep it.
pub fn clean_file(
    input: &Path,
    theme_json: &Path,
    typescript: &Path,
    options: &CleanOptions,
) -> Result<Value> {
    let raw = files::read_json(input)?;
    let raw = match options.max_depth {
        Some(depth) => prune(raw, depth),
        None => raw,
    };
    let cleaned = clean_config(&raw);

    files::write_text(theme_json, &files::to_pretty_json(&cleaned))?;
    files::write_text(typescript, &render_typescript(&cleaned))?;
    log::info!("Wrote {} and {}", theme_json.display(), typescript.display());

    if options.remove_source {
        fs::remove_file(input).map_err(|e| TokenError::io(input, e))?;
        log::debug!("removed {}", input.display());
    }
    Ok(cleaned)
}
