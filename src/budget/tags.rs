//! Transaction tags
//!
//! The backend stores tags as one string joined with `", "`. A tag that
//! itself contains a comma cannot survive that round trip, so joining
//! refuses it.

use crate::error::{Error, Result};

const DELIMITER: char = ',';

/// Split a raw tag string into trimmed, non-empty tags
pub fn split(raw: &str) -> Vec<String> {
    raw.split(DELIMITER)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags into the stored form
pub fn join<S: AsRef<str>>(tags: &[S]) -> Result<String> {
    let mut cleaned = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            return Err(Error::invalid_input("tags cannot be empty"));
        }
        if tag.contains(DELIMITER) {
            return Err(Error::invalid_input(format!(
                "tag {:?} contains the delimiter '{}'",
                tag, DELIMITER
            )));
        }
        cleaned.push(tag);
    }
    Ok(cleaned.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_matches_backend_join() {
        assert_eq!(split("courses, loisirs,  vacances "), vec!["courses", "loisirs", "vacances"]);
        assert_eq!(split(""), Vec::<String>::new());
        assert_eq!(split(", ,"), Vec::<String>::new());
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["courses", " loisirs "]).unwrap(), "courses, loisirs");
        assert_eq!(join::<&str>(&[]).unwrap(), "");
    }

    #[test]
    fn test_join_rejects_ambiguous_tags() {
        assert!(matches!(join(&["a,b"]), Err(Error::InvalidInput(_))));
        assert!(matches!(join(&["ok", "  "]), Err(Error::InvalidInput(_))));
    }
}
