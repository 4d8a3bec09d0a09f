use crate::error::DomainError;

/// Trimmed value of a required text field.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

pub(crate) fn max_chars(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// One `@`, something on both sides of it.
pub(crate) fn email(value: &str) -> Result<(), DomainError> {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::validation("email address is malformed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("title", "  hi ").unwrap(), "hi");
        assert!(required("title", "   ").is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(email("a@b.io").is_ok());
        assert!(email("ab.io").is_err());
        assert!(email("@b.io").is_err());
        assert!(email("a@").is_err());
        assert!(email("a@b@c").is_err());
    }

    #[test]
    fn test_max_chars_counts_chars_not_bytes() {
        assert!(max_chars("username", "ééé", 3).is_ok());
        assert!(max_chars("username", "éééé", 3).is_err());
    }
}
