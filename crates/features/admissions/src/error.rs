use campus_storage::StorageError;
use std::borrow::Cow;

const NETWORK_MESSAGE: &str =
    "Unable to reach the server. Check your internet connection and try again.";
const FALLBACK_MESSAGE: &str = "Registration failed. Please try again.";

/// Error types specific to the admissions feature.
#[campus_derive::campus_error]
pub enum AdmissionsError {
    #[error("Draft storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Serde serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("HTTP client error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Attachment I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The backend answered with a non-success status.
    #[error("Request rejected with status {status}{}", format_context(.context))]
    Rejected {
        status: u16,
        /// `message` field of the response body, when the backend sent one.
        message: Option<Cow<'static, str>>,
        context: Option<Cow<'static, str>>,
    },

    /// No response at all: connection refused, DNS failure or timeout.
    #[error("Server unreachable{}: {message}", format_context(.context))]
    Unreachable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown form field{}: {message}", format_context(.context))]
    UnknownField { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal admissions error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl AdmissionsError {
    /// The single message shown to the operator for a failed request.
    ///
    /// Priority: the server's own `message`, then the status table, then the network-absence
    /// text, then a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            Self::Rejected { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            },
            Self::Rejected { status, .. } => {
                Cow::Borrowed(status_message(*status).unwrap_or(FALLBACK_MESSAGE))
            },
            Self::Unreachable { .. } => Cow::Borrowed(NETWORK_MESSAGE),
            _ => Cow::Borrowed(FALLBACK_MESSAGE),
        }
    }
}

const fn status_message(status: u16) -> Option<&'static str> {
    Some(match status {
        400 => "The submitted information is invalid. Please review the form and try again.",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to register students.",
        404 => "The registration service could not be found.",
        409 => "A student with the same details already exists.",
        422 => "Some fields could not be processed. Please check your input.",
        500 => "The server encountered an error. Please try again later.",
        _ => return None,
    })
}
