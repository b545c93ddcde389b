use crate::utils::error::{Result, ServiceError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// launchd labels are reverse-DNS style; anything that would split a
/// service specifier or a file name is rejected.
pub fn validate_service_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if let Some(bad) = name
        .chars()
        .find(|c| c.is_whitespace() || *c == '/' || *c == '\0')
    {
        return Err(ServiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!("Service name may not contain {:?}", bad),
        });
    }

    if name == "." || name == ".." {
        return Err(ServiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Service name may not be a relative path component".to_string(),
        });
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ServiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ServiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ServiceError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_service_name() {
        assert!(validate_service_name("service.name", "com.example.agent").is_ok());
        assert!(validate_service_name("service.name", "homebrew.mxcl.redis").is_ok());
        assert!(validate_service_name("service.name", "").is_err());
        assert!(validate_service_name("service.name", "   ").is_err());
        assert!(validate_service_name("service.name", "com.example agent").is_err());
        assert!(validate_service_name("service.name", "gui/501/com.example").is_err());
        assert!(validate_service_name("service.name", "..").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("service.definition_dir", "/Library/LaunchDaemons").is_ok());
        assert!(validate_path("service.definition_dir", "").is_err());
        assert!(validate_path("service.definition_dir", "/tmp/\0bad").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let absent: Option<u32> = None;
        assert_eq!(*validate_required_field("uid", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("uid", &absent),
            Err(ServiceError::MissingConfigError { .. })
        ));
    }
}
