/// Derives the identity of a list element.
///
/// Two elements of a correlated list describe the same logical entity if (and only if) their keys are equal,
/// in which case they are merged instead of being kept side by side. For example, two files are the same
/// file if they have the same path.
///
/// The key must be a pure function of the element's contents.
///
/// Elements without a natural identity return [`None`] (the default) or an empty key, and are never
/// correlated: parent elements are always kept, and child elements are always appended.
///
/// Primitive types are keyed by their own value, and derived structs can declare their key field with
/// `#[merge(key = "field")]`.
pub trait Keyed {
    fn key(&self) -> Option<String> {
        None
    }
}
