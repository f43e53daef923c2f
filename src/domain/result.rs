//! Result type alias
//!
//! Convenience Result alias using SentinelError as the error type.

use super::errors::SentinelError;

/// Result type alias for core operations
///
/// # Examples
///
/// ```
/// use sentinel::domain::result::Result;
/// use sentinel::domain::errors::SentinelError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SentinelError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SentinelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SentinelError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(SentinelError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
