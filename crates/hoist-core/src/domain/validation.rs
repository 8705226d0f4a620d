use crate::domain::{error::DomainError, value_objects::ByteSize};

/// Centralized validation of raw command-line and manifest values.
///
/// Everything here runs before the first remote call.
pub struct DomainValidator;

impl DomainValidator {
    /// Instance counts below one are rejected.
    pub fn instance_count(count: i64) -> Result<u32, DomainError> {
        if count < 1 {
            return Err(DomainError::InvalidInstanceCount { count });
        }
        u32::try_from(count).map_err(|_| DomainError::InvalidInstanceCount { count })
    }

    /// Whole seconds, non-negative.
    pub fn timeout_seconds(input: &str) -> Result<u32, DomainError> {
        input
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidTimeout {
                input: input.to_string(),
            })
    }

    /// A unit-suffixed quantity such as `256M` or `1G`, in megabytes.
    pub fn megabytes(input: &str) -> Result<u64, DomainError> {
        input.parse::<ByteSize>().map(ByteSize::megabytes)
    }

    /// `null` and `default` reset a buildpack or start command to the
    /// platform default, which the platform spells as the empty string.
    pub fn resettable(value: &str) -> String {
        match value {
            "null" | "default" => String::new(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_count_must_be_positive() {
        assert_eq!(DomainValidator::instance_count(3), Ok(3));
        assert_eq!(
            DomainValidator::instance_count(0),
            Err(DomainError::InvalidInstanceCount { count: 0 })
        );
        assert_eq!(
            DomainValidator::instance_count(-2),
            Err(DomainError::InvalidInstanceCount { count: -2 })
        );
    }

    #[test]
    fn timeout_rejects_non_numbers() {
        assert_eq!(DomainValidator::timeout_seconds("120"), Ok(120));
        assert!(matches!(
            DomainValidator::timeout_seconds("soon"),
            Err(DomainError::InvalidTimeout { .. })
        ));
        assert!(DomainValidator::timeout_seconds("-5").is_err());
    }

    #[test]
    fn megabytes_requires_unit() {
        assert_eq!(DomainValidator::megabytes("1G"), Ok(1024));
        assert_eq!(DomainValidator::megabytes("256M"), Ok(256));
        assert!(DomainValidator::megabytes("256").is_err());
    }

    #[test]
    fn null_and_default_reset_to_empty() {
        assert_eq!(DomainValidator::resettable("null"), "");
        assert_eq!(DomainValidator::resettable("default"), "");
        assert_eq!(DomainValidator::resettable("bin/web"), "bin/web");
    }
}
