//! Variety detection in free-text questions.

/// Keywords that mark a question as asking for general or enumerative
/// information rather than a single variety.
const BROAD_KEYWORDS: &[&str] = &[
    "সব",
    "সবগুলি",
    "সমস্ত",
    "ধরনের",
    "প্রকার",
    "varieties",
    "variety",
    "জাত",
    "কিভাবে",
    "কেমন",
    "overall",
    "চাষ",
    "abadh",
    "production",
    "process",
    "প্রসঙ্গ",
    "list",
    "enumerate",
    "ধাপ",
    "করব",
    "প্রয়োজন",
];

/// First catalog name, in catalog order, that occurs verbatim in `question`.
///
/// Matching is a case-sensitive substring test. Empty names never match.
pub fn match_variety<'a, S: AsRef<str>>(question: &str, catalog: &'a [S]) -> Option<&'a str> {
    catalog
        .iter()
        .map(AsRef::as_ref)
        .find(|name| !name.is_empty() && question.contains(name))
}

/// Whether the question reads as a broad query. Keywords match
/// case-sensitively, like variety names.
pub fn is_broad_question(question: &str) -> bool {
    BROAD_KEYWORDS.iter().any(|kw| question.contains(kw))
}
