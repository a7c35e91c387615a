//! Error types for authentication operations.
//!
//! The auth service reports failures as string codes such as
//! `auth/wrong-password`. [`auth_error_message`] turns them into the text
//! shown to the user.

use thiserror::Error;

/// Message used when the service gave no code at all.
const UNEXPECTED_ERROR: &str = "Ocorreu um erro inesperado.";

/// Message used for codes without a dedicated text.
const UNKNOWN_ERROR: &str = "Erro desconhecido.";

const MESSAGES: &[(&str, &str)] = &[
    (
        "auth/invalid-credential",
        "As credenciais fornecidas são inválidas.",
    ),
    ("auth/email-already-in-use", "Este email já está em uso."),
    ("auth/invalid-email", "Email inválido."),
    ("auth/user-not-found", "Usuário não encontrado."),
    ("auth/wrong-password", "Senha incorreta."),
    (
        "auth/too-many-requests",
        "Muitas tentativas. Tente novamente mais tarde.",
    ),
    (
        "auth/network-request-failed",
        "Falha na conexão. Verifique sua internet.",
    ),
    ("auth/weak-password", "A senha é muito fraca."),
];

/// Returns the user-facing message for an auth error code.
///
/// A missing code yields a generic "unexpected error" text and an
/// unrecognized code yields "unknown error".
#[must_use]
pub fn auth_error_message(code: Option<&str>) -> &'static str {
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return UNEXPECTED_ERROR;
    };

    MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(UNKNOWN_ERROR, |(_, message)| *message)
}

/// Error type for authentication operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No user is signed in.
    #[error("No user is signed in")]
    NotSignedIn,

    /// The auth service rejected the operation.
    #[error("{}", auth_error_message(code.as_deref()))]
    Service {
        /// Service error code, if one was provided.
        code: Option<String>,
    },
}

impl AuthError {
    /// Creates a service error from its code.
    #[must_use]
    pub fn service(code: impl Into<String>) -> Self {
        Self::Service {
            code: Some(code.into()),
        }
    }
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
