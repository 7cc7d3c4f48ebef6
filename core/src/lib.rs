use std::{collections::BTreeMap, path::Path};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;

mod error;
mod expression;
pub mod files;
pub mod splice;
pub mod split;
pub mod stylesheet;
pub mod tailwind;
pub mod theme;

pub use error::{Result, TokenError};

/// Top-level keys that carry metadata and never become part of a token path.
pub const RESERVED_KEYS: [&str; 2] = ["$metadata", "$themes"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// CSS custom-property name → value. Iterates in lexicographic name order.
pub type VarMap = BTreeMap<String, String>;

/// A token record. `deny_unknown_fields` is the leaf predicate: a node with a
/// `value` and any key outside `value`/`type`/`description` fails here and is
/// read as a group instead.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenLeaf {
    pub value: Value,
    #[serde(rename = "type")]
    pub type_: Option<Value>,
    pub description: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenOrGroup {
    Token(TokenLeaf),
    Group(IndexMap<String, TokenOrGroup>),
    /// Scalars and arrays outside a token record. Skipped by the walk.
    Other(Value),
}

/// How a leaf's `value` is turned into CSS text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueStyle {
    /// The value coerced to text, untouched.
    #[default]
    Literal,
    /// `{group.token}` references become `var(--group-token)` and math
    /// between them becomes `calc(…)`.
    CssReferences,
}

impl TokenOrGroup {
    pub fn from_json(value: Value, origin: &Path) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| TokenError::json(origin, e))
    }
    pub fn empty() -> Self {
        TokenOrGroup::Group(IndexMap::new())
    }
    pub fn is_empty(&self) -> bool {
        matches!(self, TokenOrGroup::Group(group) if group.is_empty())
    }

    pub fn flatten(&self, prefix: Option<&str>) -> VarMap {
        self.flatten_with(prefix, ValueStyle::Literal)
    }
    pub fn flatten_with(&self, prefix: Option<&str>, style: ValueStyle) -> VarMap {
        let prefix = prefix.filter(|p| !p.is_empty());
        let mut vars = VarMap::new();
        let mut path: Vec<&str> = prefix.into_iter().collect();
        self.walk(&mut path, prefix, style, &mut vars);
        vars
    }
    fn walk<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        prefix: Option<&str>,
        style: ValueStyle,
        vars: &mut VarMap,
    ) {
        match self {
            TokenOrGroup::Token(leaf) => {
                vars.insert(css_var_name(path.as_slice()), leaf.to_css(prefix, style));
            }
            TokenOrGroup::Group(group) => {
                for (key, child) in group.iter().filter(|(key, _)| !is_reserved(key)) {
                    path.push(key);
                    child.walk(path, prefix, style, vars);
                    path.pop();
                }
            }
            TokenOrGroup::Other(_) => {}
        }
    }
}

impl TokenLeaf {
    fn to_css(&self, prefix: Option<&str>, style: ValueStyle) -> String {
        let text = value_text(&self.value);
        match style {
            ValueStyle::Literal => text,
            ValueStyle::CssReferences => expression::render_css(&text, prefix),
        }
    }
}

pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn css_var_name<S: AsRef<str>>(segments: &[S]) -> String {
    format!("--{}", segments.iter().map(|s| s.as_ref()).join("-"))
}

/// `name: value;` lines in name order, each prefixed with `indent`.
pub fn declarations(vars: &VarMap, indent: &str) -> String {
    vars.iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree(value: Value) -> TokenOrGroup {
        TokenOrGroup::from_json(value, Path::new("test.json")).unwrap()
    }

    #[test]
    fn flattens_single_color() {
        let vars = tree(json!({"colors": {"brand": {"value": "#ff0000"}}})).flatten(None);
        assert_eq!(
            vars,
            VarMap::from([("--colors-brand".to_string(), "#ff0000".to_string())])
        );
    }

    #[test]
    fn leaf_predicate() {
        let vars = tree(json!({
            "a": {"value": "x", "type": "color", "description": "primary"},
            "b": {"value": "x", "extra": "y"},
        }))
        .flatten(None);
        assert_eq!(vars.get("--a").map(String::as_str), Some("x"));
        // `b` is a group; its scalar children are not tokens.
        assert!(!vars.keys().any(|k| k.starts_with("--b")));
    }

    #[test]
    fn walks_into_value_of_non_leaf() {
        let vars = tree(json!({
            "b": {"value": {"inner": {"value": "1px"}}, "extra": "y"},
        }))
        .flatten(None);
        assert_eq!(vars.get("--b-value-inner").map(String::as_str), Some("1px"));
    }

    #[test]
    fn skips_reserved_keys() {
        let vars = tree(json!({
            "$metadata": {"tokenSetOrder": {"value": "global"}},
            "$themes": [],
            "spacing": {"sm": {"value": 4, "type": "spacing"}},
        }))
        .flatten(None);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["--spacing-sm"], "4");
    }

    #[test]
    fn applies_prefix() {
        let vars = tree(json!({"radius": {"md": {"value": "8px"}}})).flatten(Some("tw"));
        assert_eq!(vars["--tw-radius-md"], "8px");
        let vars = tree(json!({"radius": {"md": {"value": "8px"}}})).flatten(Some(""));
        assert_eq!(vars["--radius-md"], "8px");
    }

    #[test]
    fn coerces_scalars_to_text() {
        let vars = tree(json!({
            "n": {"value": 1.5},
            "b": {"value": true},
            "z": {"value": null},
        }))
        .flatten(None);
        assert_eq!(vars["--n"], "1.5");
        assert_eq!(vars["--b"], "true");
        assert_eq!(vars["--z"], "null");
    }

    #[test]
    fn output_order_is_lexicographic() {
        let a = tree(json!({"z": {"value": "1"}, "a": {"value": "2"}, "m": {"value": "3"}}));
        let b = tree(json!({"m": {"value": "3"}, "z": {"value": "1"}, "a": {"value": "2"}}));
        let block = declarations(&a.flatten(None), "  ");
        assert_eq!(block, "  --a: 2;\n  --m: 3;\n  --z: 1;");
        assert_eq!(block, declarations(&b.flatten(None), "  "));
    }

    #[test]
    fn dashed_segments_can_collide() {
        // Known limitation: `a.b` and `a-b` produce the same name; the later
        // entry in document order wins.
        let vars = tree(json!({
            "a": {"b": {"value": "first"}},
            "a-b": {"value": "second"},
        }))
        .flatten(None);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["--a-b"], "second");
    }

    #[test]
    fn empty_and_scalar_documents_flatten_to_nothing() {
        assert!(tree(json!({})).flatten(None).is_empty());
        assert!(tree(json!({})).is_empty());
        assert!(tree(json!("just text")).flatten(None).is_empty());
        assert!(tree(json!([{"value": "1"}])).flatten(None).is_empty());
    }

    #[test]
    fn css_reference_style() {
        let vars = tree(json!({
            "colors": {"brand": {"value": "#ff0000"}},
            "button": {"bg": {"value": "{colors.brand}"}},
        }))
        .flatten_with(None, ValueStyle::CssReferences);
        assert_eq!(vars["--button-bg"], "var(--colors-brand)");
        assert_eq!(vars["--colors-brand"], "#ff0000");
    }
}
