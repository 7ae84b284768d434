use crate::domain::error::DomainError;

/// npm rejects package names longer than this.
const MAX_PROJECT_NAME_LEN: usize = 214;

/// Centralized domain validation.
pub struct DomainValidator;

impl DomainValidator {
    /// Validate a schematic name such as `user`, `blog-post` or `Order Item`.
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let first = name.chars().next().ok_or_else(|| invalid("name is empty"))?;
        if !first.is_ascii_alphabetic() {
            return Err(invalid("must start with a letter"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ')))
        {
            return Err(invalid(&format!("character '{bad}' is not allowed")));
        }
        Ok(())
    }

    /// Validate a project name, which doubles as directory and package name.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let first = name.chars().next().ok_or_else(|| invalid("name is empty"))?;
        if !first.is_ascii_alphabetic() {
            return Err(invalid("must start with a letter"));
        }
        if name.len() > MAX_PROJECT_NAME_LEN {
            return Err(invalid("longer than 214 characters"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("character '{bad}' is not allowed")));
        }
        Ok(())
    }
}
