use std::fmt::Display;

pub trait GetErrorSeverity {
    fn get_severity(&self) -> ErrorSeverity;
}

/// How loudly a dispatch failure should be handled: low-severity results
/// are expected noise (wrong prefix, unknown command) and only logged at
/// debug level; high-severity ones are reported.
#[derive(PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    High,
}

#[derive(Debug)]
/// An error when pre-processing the message.
pub enum PreParseError {
    /// Message does not start with the correct prefix.
    MessageNotPrefixed(String),
    /// Invocating user is a bot or webhook.
    UserIsBotOrWebhook(Option<u64>),
    /// Other unknown failure. Unexpected error with high severity.
    Failure(String),
}

impl Display for PreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MessageNotPrefixed(prefix) => {
                write!(f, "Message does not start with correct prefix ({prefix})")
            },
            Self::UserIsBotOrWebhook(id) => {
                write!(f, "User is a bot or webhook ({})", id.unwrap_or(0))
            },
            Self::Failure(message) => {
                write!(f, "Preprocessor failure: {message}")
            },
        }
    }
}

impl GetErrorSeverity for PreParseError {
    fn get_severity(&self) -> ErrorSeverity {
        match self {
            PreParseError::Failure(_) => ErrorSeverity::High,
            _ => ErrorSeverity::Low,
        }
    }
}
impl std::error::Error for PreParseError {}
