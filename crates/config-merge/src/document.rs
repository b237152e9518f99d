//! Versioned configuration documents.
//!
//! A [`Document`] is the root of a configuration schema. Merging is only defined between two documents of the
//! same schema version, since fields can change meaning between versions. There is no migration between
//! versions here, a document of any other version is rejected.
use serde::{Serialize, de::DeserializeOwned};
use snafu::{OptionExt, ResultExt, Snafu, ensure};

use crate::merge::{Merge, MergeError, merge};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse document"))]
    ParseDocument { source: serde_yaml::Error },

    #[snafu(display("document does not declare a schema version"))]
    MissingVersion,

    #[snafu(display("schema version must be a string, found {found}"))]
    InvalidVersion { found: String },

    #[snafu(display("unsupported schema version {found:?}, expected {expected:?}"))]
    UnsupportedVersion {
        found: String,
        expected: &'static str,
    },

    #[snafu(display(
        "cannot merge documents of different schema versions (parent {parent:?}, child {child:?})"
    ))]
    VersionMismatch { parent: String, child: String },

    #[snafu(display("failed to merge documents"))]
    MergeDocuments { source: MergeError },

    #[snafu(display("at least one document is required"))]
    NoSources,

    #[snafu(display("failed to serialize document as YAML"))]
    SerializeYaml { source: serde_yaml::Error },

    #[snafu(display("failed to serialize document as JSON"))]
    SerializeJson { source: serde_json::Error },
}

/// The root type of a versioned configuration schema.
pub trait Document: Merge + Serialize + DeserializeOwned {
    /// The schema version described by this type
    const VERSION: &'static str;

    /// The schema version declared by this document
    fn version(&self) -> &str;

    /// Locates the declared schema version in a document that has not been deserialized yet
    fn raw_version(raw: &serde_yaml::Value) -> Option<&serde_yaml::Value>;
}

/// Parses a document from YAML (or JSON, which is a subset of YAML).
///
/// The schema version is checked before the rest of the document, so that documents of other versions are
/// reported as such rather than as (potentially confusing) deserialization errors.
pub fn parse<D: Document>(input: &str) -> Result<D> {
    let raw: serde_yaml::Value = serde_yaml::from_str(input).context(ParseDocumentSnafu)?;
    let version = D::raw_version(&raw).ok_or(Error::MissingVersion)?;
    let version = version.as_str().with_context(|| InvalidVersionSnafu {
        found: describe(version),
    })?;
    ensure!(
        version == D::VERSION,
        UnsupportedVersionSnafu {
            found: version,
            expected: D::VERSION,
        }
    );
    serde_yaml::from_value(raw).context(ParseDocumentSnafu)
}

/// Renders a raw YAML value for error messages.
fn describe(value: &serde_yaml::Value) -> String {
    serde_yaml::to_string(value).map_or_else(
        |_| format!("{value:?}"),
        |rendered| rendered.trim_end().to_owned(),
    )
}

/// Merges `child` on top of `parent`.
///
/// Both documents must declare the same schema version, which must be the version of `D`.
#[tracing::instrument(skip_all, fields(version = D::VERSION))]
pub fn merge_documents<D: Document>(parent: &D, child: &D) -> Result<D> {
    ensure!(
        parent.version() == child.version(),
        VersionMismatchSnafu {
            parent: parent.version(),
            child: child.version(),
        }
    );
    ensure!(
        parent.version() == D::VERSION,
        UnsupportedVersionSnafu {
            found: parent.version(),
            expected: D::VERSION,
        }
    );
    merge(parent, child).context(MergeDocumentsSnafu)
}

/// Parses and merges an ordered list of raw documents, from the most general (first) to the most
/// specific (last).
#[tracing::instrument(skip_all, fields(version = D::VERSION))]
pub fn merge_sources<'a, D: Document>(sources: impl IntoIterator<Item = &'a str>) -> Result<D> {
    let mut sources = sources.into_iter();
    let first = sources.next().ok_or(Error::NoSources)?;
    let mut merged = parse::<D>(first)?;
    for (index, source) in sources.enumerate() {
        let child = parse::<D>(source)?;
        merged = merge_documents(&merged, &child)?;
        tracing::debug!(layer = index + 1, "merged document layer");
    }
    Ok(merged)
}

pub fn to_yaml<D: Document>(document: &D) -> Result<String> {
    serde_yaml::to_string(document).context(SerializeYamlSnafu)
}

pub fn to_json<D: Document>(document: &D) -> Result<String> {
    serde_json::to_string_pretty(document).context(SerializeJsonSnafu)
}
