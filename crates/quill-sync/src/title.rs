//! The "New Story {n}" title convention.
//!
//! Freshly created stories are numbered from a session counter seeded
//! off whatever numbered titles already exist remotely, so a new title
//! never collides with a loaded one and never repeats within a session.

/// Prefix of convention-generated titles
pub const NEW_STORY_PREFIX: &str = "New Story ";

/// Build the title for story number `n`
#[must_use]
pub fn new_story_title(n: u64) -> String {
    format!("{NEW_STORY_PREFIX}{n}")
}

/// Extract `n` from a title matching exactly "New Story {n}"
///
/// Anything after the prefix must be all digits; renamed or suffixed
/// titles do not count toward the numbering.
#[must_use]
pub fn story_number(title: &str) -> Option<u64> {
    let suffix = title.strip_prefix(NEW_STORY_PREFIX)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Counter seed for a set of existing titles: highest matching `n`
/// plus one, or 1 when nothing matches
pub fn next_story_number<'a>(titles: impl Iterator<Item = &'a str>) -> u64 {
    titles
        .filter_map(story_number)
        .max()
        .map_or(1, |max| max + 1)
}
