//! Command-line front end.
//!
//! Two invocation modes:
//!
//! ```text
//! og-renderer --config batch.json [--output-dir public/og]
//! og-renderer --title T --emoji E --desc S --filename F [--output-dir public/og]
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use tracing::debug;

use crate::batch::{BatchFile, ImageItem};
use crate::composer::Composer;
use crate::config::{Config, get_config};
use crate::error::{OgError, OgResult};

pub const DEFAULT_OUTPUT_DIR: &str = "public/og";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "og-renderer", version, about = "Generate Open Graph preview images")]
pub struct Cli {
    /// JSON batch file with settings and an `items` list.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["title", "emoji", "desc", "filename"])]
    pub config: Option<PathBuf>,

    /// Directory the PNG files are written to.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Title of a single image.
    #[arg(long)]
    pub title: Option<String>,

    /// Emoji shown in the badge of a single image.
    #[arg(long)]
    pub emoji: Option<String>,

    /// Description of a single image.
    #[arg(long)]
    pub desc: Option<String>,

    /// Output filename of a single image.
    #[arg(long)]
    pub filename: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What the arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    Batch(PathBuf),
    Single(ImageItem),
}

impl Cli {
    /// Picks the invocation mode, preferring `--config`.
    pub fn mode(&self) -> OgResult<InvocationMode> {
        if let Some(path) = self.config.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            return Ok(InvocationMode::Batch(path.clone()));
        }

        // An empty value counts as missing.
        let given = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        match (given(&self.title), given(&self.emoji), given(&self.desc), given(&self.filename)) {
            (Some(title), Some(emoji), Some(desc), Some(filename)) => Ok(InvocationMode::Single(
                ImageItem::new(filename, title, emoji, desc),
            )),
            _ => Err(OgError::usage(
                "provide --config <path>, or all of --title, --emoji, --desc and --filename",
            )),
        }
    }

    /// Default log directive for the verbosity count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Resolves the effective config and the items to render for a mode.
pub fn plan(mode: InvocationMode) -> OgResult<(Config, Vec<ImageItem>)> {
    let mut config = get_config()?;
    let items = match mode {
        InvocationMode::Batch(path) => {
            let file = BatchFile::load(&path)?;
            config.apply_file(&file)?;
            debug!(path = %path.display(), items = file.items.len(), "loaded batch file");
            file.items
        }
        InvocationMode::Single(item) => vec![item],
    };
    Ok((config, items))
}

/// Renders `items` in order, writing one report line per image to `out`.
///
/// Fonts and the emoji source are only loaded when there is something to
/// render. Stops at the first failure; files already written stay.
pub fn generate_all(
    config: Config,
    items: &[ImageItem],
    output_dir: &Path,
    out: &mut impl Write,
) -> OgResult<usize> {
    if !items.is_empty() {
        let composer = Composer::new(config)?;
        for item in items {
            let path = composer.generate(item, output_dir)?;
            report(&path, out)?;
        }
    }

    writeln!(out).map_err(|e| OgError::io("<stdout>", e))?;
    writeln!(out, "Done! {} image(s) generated.", items.len()).map_err(|e| OgError::io("<stdout>", e))?;
    Ok(items.len())
}

fn report(path: &Path, out: &mut impl Write) -> OgResult<()> {
    let bytes = std::fs::metadata(path).map_err(|e| OgError::io(path, e))?.len();
    writeln!(out, "{}", report_line(path, bytes)).map_err(|e| OgError::io("<stdout>", e))
}

/// Sizes are whole kilobytes; ties round to even.
fn report_line(path: &Path, bytes: u64) -> String {
    format!("Generated: {} ({:.0} KB)", path.display(), bytes as f64 / 1024.0)
}
