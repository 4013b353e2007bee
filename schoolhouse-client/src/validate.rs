//! Form validation traits.
//!
//! Client-side checks run before a request is built; a failed check blocks
//! submission and never reaches the wire.

use schoolhouse_core::ValidationError;

pub type ValidationResult = Result<(), ValidationError>;

/// Non-empty string check for required form fields.
pub trait ValidateNonEmpty {
    /// Fails with `RequiredFieldMissing` when the value is empty or
    /// whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ValidationResult;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ValidationResult {
        if self.trim().is_empty() {
            return Err(ValidationError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ValidationResult {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ValidationResult {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ValidationError::missing_field(field_name)),
        }
    }
}

/// Numeric range checks for form fields.
pub trait ValidateRange {
    fn validate_positive(&self, field_name: &str) -> ValidationResult;

    fn validate_range(&self, field_name: &str, min: Self, max: Self) -> ValidationResult
    where
        Self: Sized;
}

macro_rules! impl_validate_range {
    ($($t:ty),*) => {
        $(
            impl ValidateRange for $t {
                fn validate_positive(&self, field_name: &str) -> ValidationResult {
                    if *self <= 0 as $t {
                        return Err(ValidationError::OutOfRange {
                            field: field_name.to_string(),
                            min: 1,
                            max: <$t>::MAX as i64,
                        });
                    }
                    Ok(())
                }

                fn validate_range(&self, field_name: &str, min: Self, max: Self) -> ValidationResult {
                    if *self < min || *self > max {
                        return Err(ValidationError::OutOfRange {
                            field: field_name.to_string(),
                            min: min as i64,
                            max: max as i64,
                        });
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_validate_range!(i8, i16, i32, i64, u8, u16, u32);

/// Minimal shape check: one `@`, non-empty local part and domain, and a dot
/// in the domain. The server performs the authoritative check.
pub fn validate_email(value: &str, field_name: &str) -> ValidationResult {
    value.validate_non_empty(field_name)?;
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::invalid_value(
            field_name,
            "must be an email address",
        ));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || value.contains(' ') {
        return Err(ValidationError::invalid_value(
            field_name,
            "must be an email address",
        ));
    }
    Ok(())
}

/// Length bounds for free-text fields.
pub fn validate_length(
    value: &str,
    field_name: &str,
    min: usize,
    max: usize,
) -> ValidationResult {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field_name.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field_name.to_string(),
            max,
        });
    }
    Ok(())
}
