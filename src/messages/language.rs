//! Preferred-language list normalization

use crate::types::LanguageTag;

/// Normalizes a requester's language preferences
///
/// The result keeps the given order, drops duplicates and inserts each tag's
/// base language right after it (`en-gb` is followed by `en`). An empty list
/// becomes `["en"]`.
pub fn normalize_languages<I, T>(tags: I) -> Vec<LanguageTag>
where
    I: IntoIterator<Item = T>,
    T: Into<LanguageTag>,
{
    let mut normalized: Vec<LanguageTag> = Vec::new();
    for tag in tags {
        let tag: LanguageTag = tag.into();
        if tag.as_str().is_empty() {
            continue;
        }
        let base = LanguageTag::new(tag.base());

        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
        if !normalized.contains(&base) {
            normalized.push(base);
        }
    }

    if normalized.is_empty() {
        normalized.push(LanguageTag::new(LanguageTag::DEFAULT));
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tags: &[LanguageTag]) -> Vec<&str> {
        tags.iter().map(LanguageTag::as_str).collect()
    }

    #[test]
    fn test_empty_defaults_to_english() {
        let tags = normalize_languages(Vec::<String>::new());
        assert_eq!(names(&tags), vec!["en"]);
    }

    #[test]
    fn test_base_is_inserted_after_tag() {
        let tags = normalize_languages(["nl-BE", "de"]);
        assert_eq!(names(&tags), vec!["nl-be", "nl", "de"]);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let tags = normalize_languages(["en", "en-GB", "EN", "en-us"]);
        assert_eq!(names(&tags), vec!["en", "en-gb", "en-us"]);
    }

    #[test]
    fn test_blank_tags_are_ignored() {
        let tags = normalize_languages(["", "  "]);
        assert_eq!(names(&tags), vec!["en"]);
    }
}
