use thiserror::Error;

use crate::lead::FieldName;
use crate::messages;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),
    #[error("{field} must not be empty")]
    EmptyField { field: FieldName },
}

impl DomainError {
    /// Re-prompt shown to the user; the pending field stays unchanged.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => messages::INVALID_EMAIL,
            Self::EmptyField { field } => field.prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::DomainError;
    use crate::lead::FieldName;
    use crate::messages;

    #[test]
    fn invalid_email_maps_to_fixed_reprompt() {
        let error = DomainError::InvalidEmail("not-an-email".to_owned());
        assert_eq!(error.user_message(), messages::INVALID_EMAIL);
        assert!(error.to_string().contains("not-an-email"));
    }

    #[test]
    fn empty_field_reasks_the_same_field() {
        let error = DomainError::EmptyField { field: FieldName::Platform };
        assert_eq!(error.user_message(), messages::ASK_PLATFORM);
        assert_eq!(error.to_string(), "platform must not be empty");
    }
}
