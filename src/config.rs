//! Effective configuration resolution.
//!
//! Values are layered, lowest precedence first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. Override files (`key=value` lines) filling keys the process left unset
//! 3. Process environment variables
//! 4. A JSON [`BatchFile`], field by field ([`Config::apply_file`])
//!
//! Layers 2 and 3 are captured in an [`Environment`] snapshot. Loading it never
//! writes back to the process environment, so resolution can be driven
//! entirely from test data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};
use tracing::debug;

use crate::batch::BatchFile;
use crate::color::{Rgb8, hex_to_rgb, rgb_to_hex};
use crate::error::{OgError, OgResult};

pub const ENV_FONT_DIR: &str = "OG_FONT_DIR";
pub const ENV_BRAND_TEXT: &str = "OG_BRAND_TEXT";
pub const ENV_ACCENT_COLOR: &str = "OG_ACCENT_COLOR";
pub const ENV_BG_COLOR: &str = "OG_BG_COLOR";
pub const ENV_EMOJI_FONT: &str = "OG_EMOJI_FONT";

pub const DEFAULT_BRAND_TEXT: &str = "Steps · getsteps.app";
/// `#ED772F`
pub const DEFAULT_ACCENT: Rgb8 = (0xED, 0x77, 0x2F);
/// `#1A1A1A`
pub const DEFAULT_BACKGROUND: Rgb8 = (0x1A, 0x1A, 0x1A);

const DEFAULT_FONT_SUBDIR: &str = "Bricolage_Grotesque/static";

// ============================================================================
// Environment
// ============================================================================

/// A snapshot of environment variables merged with override files.
///
/// Keys already present are never replaced: process variables are captured
/// first, then files are merged from highest to lowest priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        Self::from_pairs(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Captures the process environment and merges the standard override
    /// files from [`override_file_paths`].
    pub fn load() -> OgResult<Self> {
        let mut env = Self::from_process();
        for path in override_file_paths() {
            env.merge_file(&path)?;
        }
        Ok(env)
    }

    /// Returns the value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Merges an override file. Missing files are skipped.
    ///
    /// Returns `true` if the file existed and was read.
    pub fn merge_file(&mut self, path: &Path) -> OgResult<bool> {
        if !path.is_file() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(path).map_err(|e| OgError::io(path, e))?;
        let added = self.merge_str(&contents);
        debug!(path = %path.display(), added, "merged override file");
        Ok(true)
    }

    /// Merges `key=value` lines, keeping any value already present.
    ///
    /// Returns the number of keys added.
    pub fn merge_str(&mut self, contents: &str) -> usize {
        let mut added = 0;
        for (key, value) in contents.lines().filter_map(parse_override_line) {
            if !self.vars.contains_key(key) {
                self.vars.insert(key.to_string(), value.to_string());
                added += 1;
            }
        }
        added
    }
}

/// Parses one override file line.
///
/// Blank lines, `#` comments and lines without `=` yield `None`. Surrounding
/// single and double quotes are stripped from the value.
pub fn parse_override_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
    Some((key.trim(), value))
}

/// The override file locations, highest priority first.
///
/// The invocation directory comes first, followed by the per-user files.
pub fn override_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".env")];
    if let Some(base) = BaseDirs::new() {
        let home = base.home_dir();
        paths.push(home.join(".claude").join("skills").join(".env"));
        paths.push(home.join(".claude").join(".env"));
    }
    paths
}

// ============================================================================
// Config
// ============================================================================

/// The effective rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the Bricolage Grotesque static faces.
    pub font_dir: PathBuf,
    /// Footer text.
    pub brand_text: String,
    /// Badge and bar color.
    pub accent: Rgb8,
    /// Canvas base color.
    pub background: Rgb8,
    /// Explicit color-emoji font; `None` uses the platform default.
    pub emoji_font: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_dir: default_font_dir(),
            brand_text: DEFAULT_BRAND_TEXT.to_string(),
            accent: DEFAULT_ACCENT,
            background: DEFAULT_BACKGROUND,
            emoji_font: None,
        }
    }
}

impl Config {
    /// Applies an environment snapshot over the defaults.
    pub fn resolve(env: &Environment) -> OgResult<Self> {
        let mut config = Self::default();

        if let Some(dir) = env.get(ENV_FONT_DIR) {
            config.font_dir = PathBuf::from(dir);
        }
        if let Some(text) = env.get(ENV_BRAND_TEXT) {
            config.brand_text = text.to_string();
        }
        if let Some(hex) = env.get(ENV_ACCENT_COLOR) {
            config.accent = hex_to_rgb(hex)?;
        }
        if let Some(hex) = env.get(ENV_BG_COLOR) {
            config.background = hex_to_rgb(hex)?;
        }
        if let Some(path) = env.get(ENV_EMOJI_FONT) {
            config.emoji_font = Some(PathBuf::from(path));
        }

        debug!(
            font_dir = %config.font_dir.display(),
            accent = %rgb_to_hex(config.accent),
            background = %rgb_to_hex(config.background),
            "resolved config from environment"
        );
        Ok(config)
    }

    /// Overrides fields present in a batch file.
    pub fn apply_file(&mut self, file: &BatchFile) -> OgResult<()> {
        if let Some(dir) = &file.font_dir {
            self.font_dir = dir.clone();
        }
        if let Some(text) = &file.brand_text {
            self.brand_text = text.clone();
        }
        if let Some(hex) = &file.accent_color {
            self.accent = hex_to_rgb(hex)?;
        }
        if let Some(hex) = &file.bg_color {
            self.background = hex_to_rgb(hex)?;
        }
        if let Some(path) = &file.emoji_font {
            self.emoji_font = Some(path.clone());
        }
        Ok(())
    }
}

/// Loads the process environment and override files, then resolves.
pub fn get_config() -> OgResult<Config> {
    Config::resolve(&Environment::load()?)
}

/// `<downloads>/Bricolage_Grotesque/static`, falling back to
/// `~/Downloads`, then to a relative path when no home directory is known.
pub fn default_font_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .or_else(|| BaseDirs::new().map(|base| base.home_dir().join("Downloads")))
        .unwrap_or_default()
        .join(DEFAULT_FONT_SUBDIR)
}
