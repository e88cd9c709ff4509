use super::{ReportError, TokenError};

impl From<&'static str> for TokenError {
    fn from(message: &'static str) -> Self {
        TokenError::TestExpectation { message }
    }
}

impl From<String> for TokenError {
    fn from(value: String) -> Self {
        TokenError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ReportError {
    fn from(message: &'static str) -> Self {
        ReportError::TestExpectation { message }
    }
}

impl From<String> for ReportError {
    fn from(value: String) -> Self {
        ReportError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
