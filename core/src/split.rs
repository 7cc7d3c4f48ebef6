use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::{
    error::{Result, TokenError},
    files, is_reserved,
};

/// One top-level token set, ready to be written as `<name>-tokens.json`.
#[derive(Debug, PartialEq)]
pub struct TokenSet {
    pub name: String,
    pub tokens: Value,
}
impl TokenSet {
    pub fn file_name(&self) -> String {
        format!("{}-tokens.json", self.name)
    }

    /// Where this set lands under `out_dir`. The name must stay a single
    /// plain file name, so it can never resolve outside `out_dir`.
    pub fn path_in(&self, out_dir: &Path) -> Result<PathBuf> {
        let file_name = self.file_name();
        let mut components = Path::new(&file_name).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if self.name.is_empty() || self.name.contains(['/', '\\']) || !single {
            return Err(TokenError::InvalidSetName(self.name.clone()));
        }
        Ok(out_dir.join(file_name))
    }
}

/// Partitions an aggregate document into its non-reserved top-level sets, in
/// document order.
pub fn token_sets(document: Map<String, Value>) -> Vec<TokenSet> {
    document
        .into_iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(name, tokens)| TokenSet { name, tokens })
        .collect()
}

/// Splits `input` into `out_dir`. Returns the files written; an empty list
/// means the document had no token sets and nothing was touched.
pub fn split_file(input: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let document = match files::read_json(input)? {
        Value::Object(map) => map,
        _ => return Err(TokenError::NotAnObject(input.to_path_buf())),
    };
    let sets = token_sets(document);
    if sets.is_empty() {
        log::warn!("No top-level token sets found to split.");
        return Ok(Vec::new());
    }

    let paths = sets
        .iter()
        .map(|set| set.path_in(out_dir))
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(out_dir).map_err(|e| TokenError::io(out_dir, e))?;
    for (set, path) in sets.iter().zip(&paths) {
        files::write_text(path, &files::to_pretty_json(&set.tokens))?;
        log::info!("Wrote {}", path.display());
    }
    Ok(paths)
}
