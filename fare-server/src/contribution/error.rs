//! Contribution error types.

/// Errors from submitting a contribution.
#[derive(Debug, thiserror::Error)]
pub enum ContributionError {
    /// A required form field was missing or blank
    #[error("Start station, end station, and price are required")]
    MissingField(&'static str),

    /// Price was not a positive number
    #[error("Price must be a positive number")]
    InvalidPrice,

    /// The multipart body could not be read
    #[error("Invalid form data: {0}")]
    Form(String),

    /// An integration needed for this submission is not set up
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// The image host rejected or failed an upload
    #[error("Failed to upload {slot}: {message}")]
    Upload { slot: String, message: String },

    /// The email could not be delivered
    #[error("Failed to send email: {0}")]
    Notify(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ContributionError {
    /// Whether the submitter is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ContributionError::MissingField(_)
                | ContributionError::InvalidPrice
                | ContributionError::Form(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ContributionError::MissingField("price").to_string(),
            "Start station, end station, and price are required"
        );
        assert_eq!(
            ContributionError::NotConfigured("Admin email").to_string(),
            "Admin email not configured"
        );
        let err = ContributionError::Upload {
            slot: "start station image".into(),
            message: "413".into(),
        };
        assert_eq!(err.to_string(), "Failed to upload start station image: 413");
        assert!(ContributionError::InvalidPrice.is_client_error());
        assert!(!ContributionError::Notify("down".into()).is_client_error());
    }
}
