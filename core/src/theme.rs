//! CSS variables from one branch of a Tailwind theme configuration.

use std::path::Path;

use convert_case::{Boundary, Case, Converter};
use serde_json::{Map, Value};

use crate::{css_var_name, error::Result, files, VarMap};

pub const COLORS_BRANCH: [&str; 3] = ["theme", "extend", "colors"];
pub const COLOR_PREFIX: &str = "color";

/// Follows `branch` from the top of `config`.
pub fn select_branch<'a>(config: &'a Value, branch: &[&str]) -> Option<&'a Value> {
    branch.iter().try_fold(config, |node, key| node.get(key))
}

/// Walks a Tailwind-style branch: objects are groups, strings are values.
/// `DEFAULT` keys name their parent, and camelCase keys become kebab-case.
pub fn flatten_branch(branch: &Map<String, Value>, prefix: &str) -> VarMap {
    let converter = Converter::new()
        .set_boundaries(&[Boundary::LowerUpper])
        .to_case(Case::Kebab);
    let mut vars = VarMap::new();
    let mut path = vec![prefix.to_string()];
    walk(branch, &converter, &mut path, &mut vars);
    vars
}

fn walk(
    node: &Map<String, Value>,
    converter: &Converter,
    path: &mut Vec<String>,
    vars: &mut VarMap,
) {
    for (key, value) in node {
        let named = key != "DEFAULT";
        if named {
            path.push(converter.convert(key));
        }
        match value {
            Value::Object(child) => walk(child, converter, path, vars),
            Value::String(color) => {
                vars.insert(css_var_name(path.as_slice()), color.clone());
            }
            other => log::debug!(
                "skipping non-string value {other} at {}",
                css_var_name(path.as_slice())
            ),
        }
        if named {
            path.pop();
        }
    }
}

/// Reads `config` and flattens the object at `branch`. A missing file or
/// invalid JSON is an error; an absent branch is only a warning.
pub fn vars_from_file(config: &Path, branch: &[&str], prefix: &str) -> Result<VarMap> {
    let document = files::read_json(config)?;
    match select_branch(&document, branch) {
        Some(Value::Object(map)) => Ok(flatten_branch(map, prefix)),
        Some(_) => {
            log::warn!(
                "`{}` in {} is not an object; no variables generated.",
                branch.join("."),
                config.display()
            );
            Ok(VarMap::new())
        }
        None => {
            log::warn!(
                "No `{}` found in {}; no variables generated.",
                branch.join("."),
                config.display()
            );
            Ok(VarMap::new())
        }
    }
}
