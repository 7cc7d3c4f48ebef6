use std::path::{Path, PathBuf};

use design_tokens_core::{
    declarations, files, splice, split,
    stylesheet::Stylesheet,
    tailwind::{self, CleanOptions},
    theme, Result, TokenError, ValueStyle, VarMap,
};
use serde::Deserialize;
use serde_json::Value;

/// Optional per-project overrides of [`ProjectPaths`], at the project root.
pub const CONFIG_FILE: &str = "tokens.config.json";

/// Every file the pipeline reads or writes, relative to the project root
/// until [`ProjectPaths::load`] resolves them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPaths {
    pub tokens: PathBuf,
    pub transformed_dir: PathBuf,
    pub light_tokens: PathBuf,
    pub dark_tokens: PathBuf,
    pub stylesheet: PathBuf,
    pub tailwind_generated: PathBuf,
    pub theme_config: PathBuf,
    pub tailwind_typescript: PathBuf,
}
impl Default for ProjectPaths {
    fn default() -> Self {
        let transformed = Path::new("tokens").join("transformed");
        ProjectPaths {
            tokens: Path::new("tokens").join("tokens.json"),
            light_tokens: transformed.join("global-tokens.json"),
            dark_tokens: transformed.join("dark-tokens.json"),
            transformed_dir: transformed,
            stylesheet: Path::new("app").join("globals.css"),
            tailwind_generated: PathBuf::from("tailwind.generated.json"),
            theme_config: PathBuf::from("tailwind.theme.json"),
            tailwind_typescript: PathBuf::from("tailwind.config.ts"),
        }
    }
}
impl ProjectPaths {
    /// Defaults, overridden by `tokens.config.json` when present, resolved
    /// against `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        let paths = match files::read_json_optional(&config_path)? {
            Some(value) => serde_json::from_value(value).map_err(|source| TokenError::Json {
                path: config_path.clone(),
                source,
            })?,
            None => ProjectPaths::default(),
        };
        Ok(paths.resolve(root))
    }
    fn resolve(self, root: &Path) -> Self {
        ProjectPaths {
            tokens: root.join(self.tokens),
            transformed_dir: root.join(self.transformed_dir),
            light_tokens: root.join(self.light_tokens),
            dark_tokens: root.join(self.dark_tokens),
            stylesheet: root.join(self.stylesheet),
            tailwind_generated: root.join(self.tailwind_generated),
            theme_config: root.join(self.theme_config),
            tailwind_typescript: root.join(self.tailwind_typescript),
        }
    }
}

/// The nearest ancestor of `start` holding a `package.json`, else `start`.
pub fn detect_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// The pipeline stages, bound to one project's paths.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub paths: ProjectPaths,
}
impl Pipeline {
    pub fn new(paths: ProjectPaths) -> Self {
        Pipeline { paths }
    }

    pub fn split(&self) -> Result<Vec<PathBuf>> {
        split::split_file(&self.paths.tokens, &self.paths.transformed_dir)
    }

    pub fn globals(&self, style: ValueStyle) -> Result<Stylesheet> {
        let sheet = Stylesheet::from_files(
            &self.paths.light_tokens,
            &self.paths.dark_tokens,
            style,
        )?;
        sheet.write(&self.paths.stylesheet)?;
        Ok(sheet)
    }

    pub fn inject_colors(&self) -> Result<VarMap> {
        let vars = theme::vars_from_file(
            &self.paths.theme_config,
            &theme::COLORS_BRANCH,
            theme::COLOR_PREFIX,
        )?;
        splice::splice_file(&self.paths.stylesheet, &declarations(&vars, "  "))?;
        log::info!(
            "Injected {} color variables into {}",
            vars.len(),
            self.paths.stylesheet.display()
        );
        Ok(vars)
    }

    pub fn tailwind_config(&self, options: &CleanOptions) -> Result<Value> {
        tailwind::clean_file(
            &self.paths.tailwind_generated,
            &self.paths.theme_config,
            &self.paths.tailwind_typescript,
            options,
        )
    }

    /// split → globals → inject-colors. Color injection only runs when the
    /// theme configuration exists.
    pub fn build(&self, style: ValueStyle) -> Result<()> {
        self.split()?;
        self.globals(style)?;
        if self.paths.theme_config.exists() {
            self.inject_colors()?;
        } else {
            log::info!(
                "Skipping color injection: {} not found",
                self.paths.theme_config.display()
            );
        }
        Ok(())
    }
}
