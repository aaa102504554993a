//! Conflict-aware class merging.
//!
//! [`ClassList`] is the structured form: an ordered set of utility tokens with
//! at most one token per [`MergeKey`]. Pushing a token whose key is already
//! present overwrites the value *in place*, so the output keeps the order in
//! which each key first appeared while the last token for that key wins.
//! Components carry `ClassList`s around and only turn them into a class string
//! when they hand them to a host.

use crate::classify::{classify, MergeKey};
use std::collections::HashMap;
use std::fmt;

/// An ordered, conflict-resolved list of utility classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    entries: Vec<(MergeKey, String)>,
    index: HashMap<MergeKey, usize>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace-separated class string.
    pub fn parse(classes: &str) -> Self {
        let mut list = Self::new();
        list.push_str(classes);
        list
    }

    /// Keep a fixed class string as written: its tokens never override each
    /// other or tokens pushed later. Only exact duplicates collapse.
    pub fn verbatim(classes: &str) -> Self {
        let mut list = Self::new();
        for token in classes.split_whitespace() {
            list.insert(MergeKey::verbatim(token), token);
        }
        list
    }

    /// Add a single token, overriding any earlier token with the same key.
    pub fn push(&mut self, token: &str) {
        self.insert(classify(token), token);
    }

    fn insert(&mut self, key: MergeKey, token: &str) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = token.to_string(),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, token.to_string()));
            }
        }
    }

    /// Add every whitespace-separated token of `classes`, left to right.
    pub fn push_str(&mut self, classes: &str) {
        for token in classes.split_whitespace() {
            self.push(token);
        }
    }

    /// Builder form of [`push_str`](Self::push_str).
    pub fn with(mut self, classes: &str) -> Self {
        self.push_str(classes);
        self
    }

    /// Merge another list into this one, as if its tokens were pushed in order.
    pub fn extend_from(&mut self, other: &ClassList) {
        for token in other.iter() {
            self.push(token);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the exact token survived.
    pub fn contains(&self, token: &str) -> bool {
        self.entries.iter().any(|(_, value)| value == token)
    }

    /// The surviving token for a key.
    pub fn get(&self, key: &MergeKey) -> Option<&str> {
        self.index.get(key).map(|&slot| self.entries[slot].1.as_str())
    }

    /// Surviving tokens in first-insertion order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for ClassList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = ClassList::new();
        for classes in iter {
            list.push_str(classes);
        }
        list
    }
}

/// Merge class strings, later tokens overriding earlier ones in the same group.
///
/// `None` and empty entries are skipped. With no usable input the result is
/// the empty string.
///
/// ```
/// use anchorage_core::merge::merge;
///
/// assert_eq!(merge(["bg-blue-600", "bg-red-600"]), "bg-red-600");
/// assert_eq!(merge([Some("px-4"), None, Some("pl-2")]), "px-4 pl-2");
/// ```
pub fn merge<'a, I, S>(classes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<Option<&'a str>>,
{
    classes
        .into_iter()
        .filter_map(Into::into)
        .collect::<ClassList>()
        .to_string()
}

/// Join class strings with single spaces, skipping `None` and empty entries.
/// No conflict resolution is applied.
pub fn join<'a, I, S>(classes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<Option<&'a str>>,
{
    classes
        .into_iter()
        .filter_map(Into::into)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merge `base` with every entry whose flag is set, in order.
pub fn conditional(base: &str, conditionals: &[(&str, bool)]) -> String {
    let active = conditionals
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(classes, _)| *classes);
    std::iter::once(base).chain(active).collect::<ClassList>().to_string()
}

/// Variadic [`merge`]: each argument may be a `&str` or an `Option<&str>`.
///
/// ```
/// use anchorage_core::tw_merge;
///
/// let active = true;
/// assert_eq!(tw_merge!("p-4 text-sm", active.then_some("p-8")), "p-8 text-sm");
/// ```
#[macro_export]
macro_rules! tw_merge {
    ($($classes:expr),* $(,)?) => {
        $crate::merge::merge([$(::core::convert::Into::<::core::option::Option<&str>>::into($classes)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_last() {
        assert_eq!(merge(["bg-blue-600", "bg-red-600"]), "bg-red-600");
        assert_eq!(merge(["p-4", "p-8"]), "p-8");
        assert_eq!(merge(["rounded", "rounded-lg"]), "rounded-lg");
        assert_eq!(merge(["block", "flex"]), "flex");
    }

    #[test]
    fn unaffected_groups_keep_first_arrival_order() {
        let merged = merge(["text-sm text-red-500", "text-sm"]);
        assert_eq!(merged, "text-sm text-red-500");
        assert_eq!(merged.matches("text-sm").count(), 1);
    }

    #[test]
    fn overwrite_keeps_original_slot() {
        assert_eq!(merge(["p-4 m-2", "p-8"]), "p-8 m-2");
    }

    #[test]
    fn prefixes_isolate_conflicts() {
        assert_eq!(
            merge(["bg-blue-600", "hover:bg-red-600"]),
            "bg-blue-600 hover:bg-red-600"
        );
        assert_eq!(merge(["p-4", "md:p-4", "md:p-8"]), "p-4 md:p-8");
        assert_eq!(
            merge(["md:hover:bg-blue-500", "md:hover:bg-red-500"]),
            "md:hover:bg-red-500"
        );
    }

    #[test]
    fn directional_spacing_never_collides_with_shorthand() {
        let sides = ["t", "r", "b", "l", "x", "y"];
        for kind in ["p", "m"] {
            for side in sides {
                let shorthand = format!("{kind}-4");
                let directional = format!("{kind}{side}-2");
                let merged = merge([shorthand.as_str(), directional.as_str()]);
                assert_eq!(merged, format!("{shorthand} {directional}"));
            }
        }
        assert_eq!(merge(["px-4", "pl-2"]), "px-4 pl-2");
    }

    #[test]
    fn falsy_inputs_are_ignored() {
        assert_eq!(merge([Some("p-4"), None, Some(""), Some("m-2")]), "p-4 m-2");
        assert_eq!(merge(Vec::<&str>::new()), "");
        assert_eq!(merge([None::<&str>, None]), "");
    }

    #[test]
    fn whitespace_is_normalized() {
        assert_eq!(merge(["  p-4\n\tm-2  "]), "p-4 m-2");
    }

    #[test]
    fn unknown_classes_are_all_kept() {
        assert_eq!(merge(["custom-class", "another-custom"]), "custom-class another-custom");
        assert_eq!(merge(["custom-class", "custom-class"]), "custom-class");
    }

    #[test]
    fn join_skips_falsy_without_merging() {
        assert_eq!(join([Some("p-4"), None, Some("m-2")]), "p-4 m-2");
        assert_eq!(join(["p-4", "p-8"]), "p-4 p-8");
        assert_eq!(join([None::<&str>, None]), "");
    }

    #[test]
    fn conditional_applies_enabled_entries() {
        let result = conditional(
            "base-class",
            &[("active-class", true), ("inactive-class", false)],
        );
        assert_eq!(result, "base-class active-class");
        assert_eq!(conditional("p-4", &[("p-8", true)]), "p-8");
        assert_eq!(conditional("base-class", &[("a", false)]), "base-class");
    }

    #[test]
    fn macro_accepts_mixed_arguments() {
        let open = false;
        assert_eq!(
            tw_merge!("px-4 py-2", open.then_some("bg-blue-600"), "py-3"),
            "px-4 py-3"
        );
    }

    #[test]
    fn verbatim_lists_keep_every_token() {
        let header = "px-4 border-b border-slate-200";
        assert_eq!(ClassList::parse(header).to_string(), "px-4 border-slate-200");

        let mut list = ClassList::verbatim(header);
        assert_eq!(list.to_string(), header);
        list.push("border-red-500");
        assert_eq!(list.to_string(), "px-4 border-b border-slate-200 border-red-500");
    }

    #[test]
    fn class_list_lookup_and_extend() {
        let mut list = ClassList::parse("p-4 text-white");
        assert!(list.contains("p-4"));
        assert_eq!(list.get(&classify("p-2")), Some("p-4"));

        list.extend_from(&ClassList::parse("p-2 shadow"));
        assert_eq!(list.to_string(), "p-2 text-white shadow");
        assert_eq!(list.len(), 3);
    }
}
