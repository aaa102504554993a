//! Utility-class classification.
//!
//! Every utility token is assigned to the semantic property group it affects
//! (`px-4` → `padding-x`, `bg-red-500` → `background`). Two tokens conflict
//! only when they share both the group and the variant prefix, which together
//! form their [`MergeKey`].

use regex::RegexSet;
use std::fmt;
use std::sync::LazyLock;

/// Ordered pattern → group table. The first matching pattern wins, so more
/// specific patterns sit above the broad prefixes they overlap with
/// (`text-sm` before `text-*`, border width before border color). Sides and
/// axes share one group: `border-t-4` overrides `border-2`.
const GROUP_PATTERNS: &[(&str, &str)] = &[
    // Layout
    (
        r"^(block|inline|inline-block|flex|inline-flex|grid|inline-grid|hidden|contents|flow-root)$",
        "display",
    ),
    (r"^(static|fixed|absolute|relative|sticky)$", "position"),
    (r"^(visible|invisible|collapse)$", "visibility"),
    (r"^overflow-", "overflow"),
    (r"^z-", "z-index"),
    // Flexbox & grid
    (r"^flex-", "flex"),
    (r"^(grow|shrink)-?", "flex-grow-shrink"),
    (r"^basis-", "flex-basis"),
    (r"^justify-", "justify"),
    (r"^items-", "items"),
    (r"^self-", "self"),
    (r"^content-", "content"),
    (r"^place-", "place"),
    (r"^gap-", "gap"),
    (r"^(grid-cols|col-span|col-start|col-end)-", "grid-cols"),
    (r"^(grid-rows|row-span|row-start|row-end)-", "grid-rows"),
    // Spacing: each direction is its own group
    (r"^px-", "padding-x"),
    (r"^py-", "padding-y"),
    (r"^pt-", "padding-top"),
    (r"^pr-", "padding-right"),
    (r"^pb-", "padding-bottom"),
    (r"^pl-", "padding-left"),
    (r"^p-", "padding"),
    (r"^mx-", "margin-x"),
    (r"^my-", "margin-y"),
    (r"^mt-", "margin-top"),
    (r"^mr-", "margin-right"),
    (r"^mb-", "margin-bottom"),
    (r"^ml-", "margin-left"),
    (r"^m-", "margin"),
    (r"^space-x-", "space-x"),
    (r"^space-y-", "space-y"),
    // Sizing
    (r"^w-", "width"),
    (r"^min-w-", "min-width"),
    (r"^max-w-", "max-width"),
    (r"^h-", "height"),
    (r"^min-h-", "min-height"),
    (r"^max-h-", "max-height"),
    (r"^size-", "size"),
    // Typography
    (
        r"^text-(xs|sm|base|lg|xl|2xl|3xl|4xl|5xl|6xl|7xl|8xl|9xl)",
        "font-size",
    ),
    (r"^text-(left|center|right|justify|start|end)$", "text-align"),
    (r"^text-", "text-color"),
    (
        r"^font-(thin|extralight|light|normal|medium|semibold|bold|extrabold|black)$",
        "font-weight",
    ),
    (r"^font-", "font-family"),
    (r"^leading-", "line-height"),
    (r"^tracking-", "letter-spacing"),
    (r"^(uppercase|lowercase|capitalize|normal-case)$", "text-transform"),
    (r"^(underline|overline|line-through|no-underline)$", "text-decoration"),
    (r"^(truncate|text-ellipsis|text-clip)$", "text-overflow"),
    (r"^(whitespace|break)-", "whitespace"),
    // Backgrounds
    (r"^bg-", "background"),
    (r"^from-", "gradient-from"),
    (r"^via-", "gradient-via"),
    (r"^to-", "gradient-to"),
    // Borders
    (
        r"^border($|-[blrtxy]?-?\d|-(solid|dashed|dotted|double|hidden|none))",
        "border-width",
    ),
    (r"^border-", "border-color"),
    (r"^rounded(-|$)", "border-radius"),
    (r"^ring-", "ring"),
    // Effects
    (r"^shadow(-|$)", "shadow"),
    (r"^opacity-", "opacity"),
    (r"^blur(-|$)", "blur"),
    // Transitions & animation
    (r"^transition(-|$)", "transition"),
    (r"^duration-", "duration"),
    (r"^ease-", "ease"),
    (r"^delay-", "delay"),
    (r"^animate-", "animate"),
    // Transforms
    (r"^scale-", "scale"),
    (r"^rotate-", "rotate"),
    (r"^translate-", "translate"),
    (r"^skew-", "skew"),
    (r"^origin-", "transform-origin"),
    // Interactivity
    (r"^cursor-", "cursor"),
    (r"^(pointer-events|select|resize|scroll)-", "interactivity"),
    (r"^(outline|ring)-", "outline-ring"),
];

static GROUP_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(GROUP_PATTERNS.iter().map(|(pattern, _)| *pattern))
        .expect("class group patterns are valid regexes")
});

/// A utility token split into its variant prefix and base class.
///
/// `md:hover:bg-blue-600` has the prefix `md:hover` and the base class
/// `bg-blue-600`. The prefix is kept verbatim: it takes part in conflict
/// detection but never in group determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtilityToken<'a> {
    pub variant_prefix: &'a str,
    pub base_class: &'a str,
}

impl<'a> UtilityToken<'a> {
    pub fn parse(token: &'a str) -> Self {
        match token.rsplit_once(':') {
            Some((variant_prefix, base_class)) => Self {
                variant_prefix,
                base_class,
            },
            None => Self {
                variant_prefix: "",
                base_class: token,
            },
        }
    }

    /// The individual variants, outermost first.
    pub fn variants(&self) -> impl Iterator<Item = &'a str> {
        self.variant_prefix.split(':').filter(|v| !v.is_empty())
    }
}

/// The semantic bucket a base class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassGroup<'a> {
    /// One of the recognized utility groups.
    Known(&'static str),
    /// An unrecognized class, grouped only with identical text.
    Literal(&'a str),
}

impl ClassGroup<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            ClassGroup::Known(group) => group,
            ClassGroup::Literal(text) => text,
        }
    }
}

impl fmt::Display for ClassGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the group of an unprefixed class.
pub fn group_of(base_class: &str) -> ClassGroup<'_> {
    GROUP_SET
        .matches(base_class)
        .iter()
        .next()
        .map(|index| ClassGroup::Known(GROUP_PATTERNS[index].1))
        .unwrap_or(ClassGroup::Literal(base_class))
}

/// The conflict key of a token: `prefix:group`, or `group` when unprefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeKey(String);

impl MergeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A key only `token` itself can hold. Classified keys never contain
    /// whitespace, so the leading space keeps the two apart.
    pub(crate) fn verbatim(token: &str) -> Self {
        MergeKey(format!(" {token}"))
    }
}

impl fmt::Display for MergeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classify a full token into its merge key.
pub fn classify(token: &str) -> MergeKey {
    let token = UtilityToken::parse(token);
    let group = group_of(token.base_class);
    if token.variant_prefix.is_empty() {
        MergeKey(group.as_str().to_string())
    } else {
        MergeKey(format!("{}:{}", token.variant_prefix, group))
    }
}
