//! In-place editing of a sentinel-delimited region inside `@theme inline`.
//!
//! Everything outside the region is kept byte for byte. Brace matching is a
//! depth counter over the stylesheet that ignores braces inside comments and
//! quoted strings.

use std::path::Path;

use crate::{
    error::{Result, TokenError},
    files,
};

pub const START_MARKER: &str = "/* AUTO-GENERATED COLORS START */";
pub const END_MARKER: &str = "/* AUTO-GENERATED COLORS END */";
pub const THEME_RULE: &str = "@theme inline";

/// Marks which bytes of a stylesheet are code, as opposed to comment or
/// string contents.
struct Scanner<'a> {
    css: &'a str,
    code: Vec<bool>,
}

impl<'a> Scanner<'a> {
    fn new(css: &'a str) -> Self {
        let bytes = css.as_bytes();
        let mut code = vec![true; bytes.len()];
        let mut i = 0;
        while i < bytes.len() {
            let end = match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'*') => css[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |p| i + 2 + p + 2),
                quote @ (b'"' | b'\'') => {
                    let mut j = i + 1;
                    while j < bytes.len() && bytes[j] != quote {
                        if bytes[j] == b'\\' {
                            j += 1;
                        }
                        j += 1;
                    }
                    (j + 1).min(bytes.len())
                }
                _ => {
                    i += 1;
                    continue;
                }
            };
            code[i..end].iter_mut().for_each(|c| *c = false);
            i = end;
        }
        Scanner { css, code }
    }

    fn is_code(&self, pos: usize) -> bool {
        self.code.get(pos).copied().unwrap_or(false)
    }

    fn find(&self, needle: &str, from: usize) -> Option<usize> {
        self.css[from..]
            .match_indices(needle)
            .map(|(pos, _)| from + pos)
            .find(|&pos| self.is_code(pos))
    }

    /// Byte offset of the `{` opening a rule whose prelude ends at `from`.
    /// Only whitespace and comments may come between the two.
    fn block_open(&self, from: usize) -> Option<usize> {
        self.css
            .bytes()
            .enumerate()
            .skip(from)
            .find(|&(pos, byte)| self.is_code(pos) && !byte.is_ascii_whitespace())
            .filter(|&(_, byte)| byte == b'{')
            .map(|(pos, _)| pos)
    }

    /// Byte offset of the `}` closing the `{` at `open`.
    fn matching_brace(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (pos, byte) in self.css.bytes().enumerate().skip(open) {
            if !self.is_code(pos) {
                continue;
            }
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Byte range of the first `:root { … }` rule at nesting depth zero.
    fn top_level_root(&self) -> Result<Option<(usize, usize)>> {
        let bytes = self.css.as_bytes();
        let mut depth = 0usize;
        for pos in 0..bytes.len() {
            if !self.is_code(pos) {
                continue;
            }
            match bytes[pos] {
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b':' if depth == 0 && self.css[pos..].starts_with(":root") => {
                    let after = pos + ":root".len();
                    let rest = &self.css[after..];
                    if !rest.trim_start().starts_with('{') {
                        continue;
                    }
                    let open = after + (rest.len() - rest.trim_start().len());
                    let close =
                        self.matching_brace(open)
                            .ok_or_else(|| TokenError::UnbalancedBraces {
                                rule: ":root".to_string(),
                                offset: open,
                            })?;
                    return Ok(Some((pos, close)));
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

/// The sentinel pair with `declarations` between them, indented for a rule
/// body.
fn marker_block(declarations: &str) -> String {
    format!("  {START_MARKER}{}{END_MARKER}", region(declarations))
}

fn region(declarations: &str) -> String {
    if declarations.is_empty() {
        "\n  ".to_string()
    } else {
        format!("\n{declarations}\n  ")
    }
}

/// Places `declarations` between the sentinels of the `@theme inline` rule in
/// `css`, creating the rule or the sentinels when they are missing.
pub fn splice(css: &str, declarations: &str) -> Result<String> {
    let scanner = Scanner::new(css);

    let Some(rule_at) = scanner.find(THEME_RULE, 0) else {
        let rule = format!("{THEME_RULE} {{\n{}\n}}", marker_block(declarations));
        return Ok(match scanner.top_level_root()? {
            Some((_, close)) => {
                log::debug!("inserting `{THEME_RULE}` after :root");
                format!("{}\n\n{rule}{}", &css[..=close], &css[close + 1..])
            }
            None => {
                log::debug!("appending `{THEME_RULE}` at end of file");
                let mut out = css.to_string();
                if !out.is_empty() {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push('\n');
                }
                out.push_str(&rule);
                out.push('\n');
                out
            }
        });
    };

    let open = scanner
        .block_open(rule_at + THEME_RULE.len())
        .ok_or_else(|| TokenError::UnterminatedRule {
            rule: THEME_RULE.to_string(),
            offset: rule_at,
        })?;
    let close = scanner
        .matching_brace(open)
        .ok_or_else(|| TokenError::UnbalancedBraces {
            rule: THEME_RULE.to_string(),
            offset: open,
        })?;

    let body_start = open + 1;
    let body = &css[body_start..close];
    let markers = body.find(START_MARKER).and_then(|start| {
        let inner = start + START_MARKER.len();
        body[inner..].find(END_MARKER).map(|end| (inner, inner + end))
    });

    let out = match markers {
        Some((inner, end)) => format!(
            "{}{}{}",
            &css[..body_start + inner],
            region(declarations),
            &css[body_start + end..]
        ),
        None if body.trim().is_empty() => format!(
            "{}\n{}\n{}",
            &css[..body_start],
            marker_block(declarations),
            &css[close..]
        ),
        None => format!(
            "{}\n{}{}",
            &css[..body_start],
            marker_block(declarations),
            &css[body_start..]
        ),
    };
    Ok(out)
}

/// Rewrites `path` with `declarations` spliced in. The file must exist.
pub fn splice_file(path: &Path, declarations: &str) -> Result<()> {
    let css = files::read_required(path)?;
    let updated = splice(&css, declarations)?;
    files::write_text(path, &updated)
}
