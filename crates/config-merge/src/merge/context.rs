use std::fmt::{Display, Write};

use snafu::Snafu;

/// Locates the value currently being merged, for generating merge errors
///
/// Constructed internally in [`merge`](super::merge)
pub struct MergeContext<'a> {
    ident: Option<&'a dyn Display>,
    parent: Option<&'a MergeContext<'a>>,
}

impl MergeContext<'static> {
    /// Creates a `MergeContext` for the root of a document
    pub fn root() -> Self {
        Self {
            ident: None,
            parent: None,
        }
    }
}

impl<'a> MergeContext<'a> {
    /// Creates a `MergeContext` for a subfield (or list element) of the current value
    pub fn field<'b>(&'b self, ident: &'b dyn Display) -> MergeContext<'b> {
        MergeContext {
            ident: Some(ident),
            parent: Some(self),
        }
    }

    fn error_problem(&self, problem: MergeProblem) -> MergeError {
        let mut idents = Vec::new();
        let mut curr = Some(self);
        while let Some(curr_some) = curr {
            if let Some(ident) = curr_some.ident {
                idents.push(ident.to_string());
            }
            curr = curr_some.parent;
        }
        MergeError {
            path: FieldPath { idents },
            problem,
        }
    }

    /// Returns an error indicating that two list elements on the same `side` share the same `key`
    pub fn error_duplicate_key(
        &self,
        side: Side,
        handle: &str,
        key: &str,
        first_field: &'static str,
        second_field: &'static str,
    ) -> MergeError {
        self.error_problem(MergeProblem::DuplicateKey {
            side,
            handle: handle.to_owned(),
            key: key.to_owned(),
            first_field,
            second_field,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FieldPath {
    idents: Vec<String>,
}
impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.idents.is_empty() {
            return f.write_str("<root>");
        }
        for (i, ident) in self.idents.iter().rev().enumerate() {
            if i > 0 {
                f.write_char('.')?;
            }
            f.write_str(ident)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display("failed to merge {path}"))]
/// An error that occurred while merging two values.
///
/// It is constructed by calling one of the `error_*` methods on [`MergeContext`], such as [`MergeContext::error_duplicate_key`].
pub struct MergeError {
    path: FieldPath,
    #[snafu(source)]
    problem: MergeProblem,
}

impl MergeError {
    /// The dotted path from the document root to the value that failed to merge
    pub fn path(&self) -> String {
        self.path.to_string()
    }

    pub fn problem(&self) -> &MergeProblem {
        &self.problem
    }
}

/// Which of the two merged values a problem was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Parent,
    Child,
}

/// A problem that was discovered while merging, with no additional context.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum MergeProblem {
    #[snafu(display(
        "{side} contains the key {key:?} more than once under the handle {handle:?} (in {first_field:?} and {second_field:?})"
    ))]
    DuplicateKey {
        side: Side,
        handle: String,
        key: String,
        first_field: &'static str,
        second_field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_path_is_built_from_the_root() {
        let root = MergeContext::root();
        let storage = root.field(&"storage");
        let key = "/etc/hosts".to_owned();
        let file = storage.field(&key);
        let err = file.error_duplicate_key(Side::Child, "path", "x", "files", "links");

        assert_eq!(err.path(), "storage./etc/hosts");
        assert_eq!(err.to_string(), "failed to merge storage./etc/hosts");
        assert_eq!(
            err.problem().to_string(),
            r#"child contains the key "x" more than once under the handle "path" (in "files" and "links")"#
        );
    }

    #[test]
    fn root_path_has_a_name() {
        let err = MergeContext::root().error_duplicate_key(Side::Parent, "a", "b", "a", "a");
        assert_eq!(err.path(), "<root>");
    }
}
