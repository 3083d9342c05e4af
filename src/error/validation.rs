use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid label '{value}'. Expected 'key value'.")]
    InvalidLabelFormat { value: String },
    #[error("Label '{value}' must not contain ',' or spaces.")]
    LabelReservedCharacter { value: String },
    #[error("Label catalog must hold between 1 and {max} entries, found {found}.")]
    LabelCatalogSize { max: usize, found: usize },
    #[error("Bound list must not be empty.")]
    BoundsEmpty,
    #[error("Bound {value} must be a finite number.")]
    BoundNotFinite { value: f64 },
    #[error("Invalid bound '{value}': {source}")]
    InvalidBound {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Base metric name must not be empty or contain ',' or spaces.")]
    InvalidMetricName,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL is missing host.")]
    UrlMissingHost,
    #[error("Query URL '{url}' must end with a 'query=' parameter.")]
    QueryUrlMissingParameter { url: String },
    #[error("--aws-sigv4 requires credentials (--basic-auth or AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY).")]
    AwsSigv4RequiresCredentials,
    #[error("Expected format username:password.")]
    AuthPairInvalidFormat,
    #[error("Auth username must not be empty.")]
    AuthUsernameEmpty,
    #[error("Invalid aws-sigv4 format. Expected aws:amz:region:service.")]
    AwsSigv4InvalidFormat,
    #[error("aws-sigv4 region/service must not be empty.")]
    AwsSigv4EmptyRegionOrService,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
