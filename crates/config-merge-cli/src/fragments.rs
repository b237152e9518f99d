use std::{
    fs,
    path::{Path, PathBuf},
};

use config_merge::{
    document::{self, merge_documents},
    provisioning::Config,
};
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read fragment {path:?}"))]
    ReadFragment {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("invalid fragment {path:?}"))]
    ParseFragment {
        source: document::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to merge fragment {path:?} onto the preceding fragments"))]
    MergeFragment {
        source: document::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to render the merged document as {format}"))]
    Render {
        source: document::Error,
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Serializes the document, always terminated by a newline.
    pub fn render(self, config: &Config) -> Result<String> {
        let mut rendered = match self {
            Self::Yaml => document::to_yaml(config),
            Self::Json => document::to_json(config),
        }
        .context(RenderSnafu { format: self })?;

        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

/// Reads and parses a single provisioning document.
pub fn load(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).context(ReadFragmentSnafu { path })?;
    document::parse(&raw).context(ParseFragmentSnafu { path })
}

/// Merges fragments from the most general (first) to the most specific (last).
///
/// Returns [`None`] if `paths` is empty.
pub fn merge_files(paths: &[PathBuf]) -> Result<Option<Config>> {
    let mut merged: Option<Config> = None;
    for path in paths {
        let fragment = load(path)?;
        merged = Some(match merged {
            None => fragment,
            Some(parent) => {
                merge_documents(&parent, &fragment).context(MergeFragmentSnafu { path })?
            }
        });
        tracing::debug!(fragment = %path.display(), "merged fragment");
    }
    Ok(merged)
}

/// Validates a document by merging it onto itself.
///
/// This surfaces the problems that would otherwise only show up once the document is layered with others,
/// such as the same key appearing twice in one document. Unlike a merge with a different document, it
/// reaches every nested list.
pub fn check(path: &Path) -> Result<()> {
    let config = load(path)?;
    merge_documents(&config, &config).context(MergeFragmentSnafu { path })?;
    Ok(())
}
