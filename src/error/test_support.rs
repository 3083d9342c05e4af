use super::{PipelineError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for PipelineError {
    fn from(message: &'static str) -> Self {
        PipelineError::TestExpectation { message }
    }
}

impl From<String> for PipelineError {
    fn from(value: String) -> Self {
        PipelineError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
