//! Individual verification rules.
//!
//! Every rule appends to a [`Findings`](crate::issue::Findings) list and never
//! fails; ordering of the calls in [`crate::verify`] decides report order.

pub(crate) mod fields;
pub(crate) mod guidance;
pub(crate) mod layout;
pub(crate) mod references;
pub(crate) mod workflow;

/// Reference categories allowed directly under `references/`.
pub const REFERENCE_TAXONOMY: [&str; 10] = [
    "api",
    "architecture",
    "examples",
    "hooks",
    "migration",
    "misc",
    "patterns",
    "performance",
    "types",
    "validation",
];

/// Line count of a text using the same rules as `str::lines`.
pub(crate) fn line_count(text: &str) -> usize {
    text.lines().count()
}

/// Relative path rendered with `/` separators.
pub(crate) fn posix(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
