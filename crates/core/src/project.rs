//! Project field constants and validation.

use crate::error::CoreError;

/// Lowest accepted project priority.
pub const MIN_PRIORITY: i32 = 1;

/// Highest accepted project priority.
pub const MAX_PRIORITY: i32 = 10;

/// Priority assigned when none is supplied on create.
pub const DEFAULT_PRIORITY: i32 = 5;

/// Media host folder for project cover images.
pub const PROJECT_IMAGE_FOLDER: &str = "projects";

/// Media host folder for project-detail main images.
pub const DETAILS_IMAGE_FOLDER: &str = "project-details";

/// Validate that `priority` lies within `MIN_PRIORITY..=MAX_PRIORITY`.
pub fn validate_priority(priority: i32) -> Result<(), CoreError> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}, got {priority}"
        )))
    }
}

/// Parse a priority from its textual form (multipart fields arrive as text).
pub fn parse_priority(raw: &str) -> Result<i32, CoreError> {
    let priority: i32 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("Priority must be an integer, got '{raw}'")))?;
    validate_priority(priority)?;
    Ok(priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_priority_accepts_full_range() {
        for p in MIN_PRIORITY..=MAX_PRIORITY {
            assert!(validate_priority(p).is_ok());
        }
    }

    #[test]
    fn validate_priority_rejects_out_of_range() {
        assert!(validate_priority(0).is_err());
        let err = validate_priority(11).unwrap_err();
        assert!(err.to_string().contains("between 1 and 10"));
    }

    #[test]
    fn parse_priority_trims_whitespace() {
        assert_eq!(parse_priority(" 7 ").unwrap(), 7);
    }

    #[test]
    fn parse_priority_rejects_non_numeric() {
        let err = parse_priority("high").unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn default_priority_is_in_range() {
        assert!(validate_priority(DEFAULT_PRIORITY).is_ok());
    }
}
