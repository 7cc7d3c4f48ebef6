use std::path::Path;

use crate::{declarations, error::Result, files, TokenOrGroup, ValueStyle, VarMap};

const TEMPLATE: &str = include_str!("templates/globals.css");
const ROOT_SLOT: &str = "{{root_vars}}";
const DARK_SLOT: &str = "{{dark_vars}}";

fn read_tree(path: &Path) -> Result<TokenOrGroup> {
    match files::read_json_optional(path)? {
        Some(value) => TokenOrGroup::from_json(value, path),
        None => Ok(TokenOrGroup::empty()),
    }
}

/// The generated global stylesheet: fixed boilerplate plus a `:root` block
/// for the light tokens and a `.dark` block for the overlay.
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub root: VarMap,
    pub dark: VarMap,
}

impl Stylesheet {
    /// Flattens the light document and the dark overlay. Either may be
    /// missing or blank, which leaves its block empty; malformed JSON is an
    /// error.
    pub fn from_files(light: &Path, dark: &Path, style: ValueStyle) -> Result<Self> {
        let light_tree = read_tree(light)?;
        if light_tree.is_empty() {
            log::warn!(
                "No light tokens in {}; the :root block will be empty.",
                light.display()
            );
        }
        let dark_tree = read_tree(dark)?;
        if dark_tree.is_empty() {
            log::warn!(
                "No dark tokens in {}; the .dark block will be empty.",
                dark.display()
            );
        }
        Ok(Stylesheet {
            root: light_tree.flatten_with(None, style),
            dark: dark_tree.flatten_with(None, style),
        })
    }

    /// Fills both variable blocks in one pass, so token values are never
    /// themselves searched for placeholders.
    pub fn to_css(&self) -> String {
        let slots = TEMPLATE.split_once(ROOT_SLOT).and_then(|(head, rest)| {
            rest.split_once(DARK_SLOT).map(|(middle, tail)| (head, middle, tail))
        });
        match slots {
            Some((head, middle, tail)) => format!(
                "{head}{}{middle}{}{tail}",
                declarations(&self.root, "    "),
                declarations(&self.dark, "    ")
            ),
            None => TEMPLATE.to_string(),
        }
    }

    /// Overwrites `output` with the full stylesheet.
    pub fn write(&self, output: &Path) -> Result<()> {
        files::write_text(output, &self.to_css())?;
        log::info!(
            "Generated {} using {} :root vars and {} dark vars from tokens.",
            output.display(),
            self.root.len(),
            self.dark.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::TokenError;

    #[test]
    fn renders_both_blocks_sorted() {
        let sheet = Stylesheet {
            root: VarMap::from([
                ("--spacing-sm".to_string(), "4px".to_string()),
                ("--colors-brand".to_string(), "#ff0000".to_string()),
            ]),
            dark: VarMap::from([("--colors-brand".to_string(), "#880000".to_string())]),
        };
        let css = sheet.to_css();
        assert!(css.starts_with("@tailwind base;\n"));
        assert!(css.contains(
            "  :root {\n    --colors-brand: #ff0000;\n    --spacing-sm: 4px;\n  }\n  .dark {\n    --colors-brand: #880000;\n  }\n"
        ));
        assert!(css.contains("::-webkit-scrollbar-thumb {"));
        assert!(!css.contains("{{"));
    }

    #[test]
    fn dark_overlay_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let light = dir.path().join("global-tokens.json");
        fs::write(&light, r#"{"colors": {"bg": {"value": "white"}}}"#).unwrap();
        let dark = dir.path().join("dark-tokens.json");

        let sheet = Stylesheet::from_files(&light, &dark, ValueStyle::Literal).unwrap();
        assert_eq!(sheet.root.len(), 1);
        assert!(sheet.dark.is_empty());

        fs::write(&dark, "  \n").unwrap();
        let sheet = Stylesheet::from_files(&light, &dark, ValueStyle::Literal).unwrap();
        assert!(sheet.dark.is_empty());
        assert!(sheet.to_css().contains("  .dark {\n\n  }"));
    }

    #[test]
    fn malformed_tokens_abort_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let light = dir.path().join("global-tokens.json");
        fs::write(&light, r#"{"colors": {"bg": {"value": "white"}}}"#).unwrap();
        let dark = dir.path().join("dark-tokens.json");
        fs::write(&dark, "{ nope").unwrap();

        let err = Stylesheet::from_files(&light, &dark, ValueStyle::Literal).unwrap_err();
        assert!(matches!(err, TokenError::Json { .. }));
    }

    #[test]
    fn blank_or_missing_light_tokens_leave_root_empty() {
        let dir = tempfile::tempdir().unwrap();
        let light = dir.path().join("global-tokens.json");
        fs::write(&light, "").unwrap();
        let dark = dir.path().join("dark-tokens.json");
        fs::write(&dark, r#"{"colors": {"bg": {"value": "black"}}}"#).unwrap();

        let sheet = Stylesheet::from_files(&light, &dark, ValueStyle::Literal).unwrap();
        assert!(sheet.root.is_empty());
        assert_eq!(sheet.dark.len(), 1);
        assert!(sheet.to_css().contains("  :root {\n\n  }"));

        let missing = dir.path().join("missing.json");
        let sheet = Stylesheet::from_files(&missing, &dark, ValueStyle::Literal).unwrap();
        assert!(sheet.root.is_empty());
    }

    #[test]
    fn placeholders_in_values_stay_literal() {
        let sheet = Stylesheet {
            root: VarMap::from([("--odd".to_string(), "{{dark_vars}}".to_string())]),
            dark: VarMap::from([("--bg".to_string(), "black".to_string())]),
        };
        let css = sheet.to_css();
        assert!(css.contains("    --odd: {{dark_vars}};"));
        assert_eq!(css.matches("--bg: black;").count(), 1);
    }

    #[test]
    fn write_overwrites_target() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("app").join("globals.css");
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(&output, "stale").unwrap();

        Stylesheet::default().write(&output).unwrap();
        let css = fs::read_to_string(&output).unwrap();
        assert!(!css.contains("stale"));
        assert!(css.contains("@layer base {"));
    }
}
