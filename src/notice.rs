//! Transient user-facing notices.
//!
//! Every user action ends in a [`Notice`]: a short success or error message
//! the UI shows briefly. Errors never escape an action handler; they are
//! turned into error notices here.

use crate::config::Locale;

/// Kind of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The action completed.
    Success,
    /// The action failed; state may be partially updated.
    Error,
}

/// A transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or error.
    pub kind: NoticeKind,
    /// Localized message.
    pub message: String,
}

impl Notice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Returns whether this notice reports a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

/// Fixed notice texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    RequestSent,
    RequestSendFailed,
    DuplicateRequest,
    InvalidSearchTerm,
    NoUserFound,
    SearchFailed,
    ContactAdded,
    AcceptFailed,
    RequestRejected,
    RejectFailed,
    NotificationsLoadFailed,
    NotificationMissing,
    ProfileSaved,
    ProfileSaveFailed,
    PhoneInUse,
    NameRequired,
    NotSignedIn,
}

impl Message {
    /// Returns the text of this message in the given locale.
    #[must_use]
    pub const fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::PtBr => match self {
                Self::RequestSent => "Solicitação de contato enviada!",
                Self::RequestSendFailed => "Erro ao enviar solicitação",
                Self::DuplicateRequest => "Você já enviou uma solicitação para este usuário!",
                Self::InvalidSearchTerm => "Digite um email válido ou telefone",
                Self::NoUserFound => "Nenhum usuário encontrado",
                Self::SearchFailed => "Erro ao buscar usuário",
                Self::ContactAdded => "Contato adicionado com sucesso!",
                Self::AcceptFailed => "Erro ao aceitar solicitação",
                Self::RequestRejected => "Solicitação rejeitada",
                Self::RejectFailed => "Erro ao rejeitar solicitação",
                Self::NotificationsLoadFailed => "Erro ao carregar notificações",
                Self::NotificationMissing => "Notificação não encontrada",
                Self::ProfileSaved => "Perfil atualizado com sucesso!",
                Self::ProfileSaveFailed => "Erro ao salvar perfil",
                Self::PhoneInUse => "Este telefone já está em uso.",
                Self::NameRequired => "Nome obrigatório",
                Self::NotSignedIn => "Você precisa estar logado.",
            },
            Locale::En => match self {
                Self::RequestSent => "Contact request sent!",
                Self::RequestSendFailed => "Failed to send request",
                Self::DuplicateRequest => "You already sent a request to this user!",
                Self::InvalidSearchTerm => "Enter a valid email or phone",
                Self::NoUserFound => "No user found",
                Self::SearchFailed => "Failed to search for user",
                Self::ContactAdded => "Contact added!",
                Self::AcceptFailed => "Failed to accept request",
                Self::RequestRejected => "Request rejected",
                Self::RejectFailed => "Failed to reject request",
                Self::NotificationsLoadFailed => "Failed to load notifications",
                Self::NotificationMissing => "Notification not found",
                Self::ProfileSaved => "Profile updated!",
                Self::ProfileSaveFailed => "Failed to save profile",
                Self::PhoneInUse => "This phone number is already in use.",
                Self::NameRequired => "Name is required",
                Self::NotSignedIn => "You need to be signed in.",
            },
        }
    }

    /// Builds a success notice with this text.
    #[must_use]
    pub fn success(self, locale: Locale) -> Notice {
        Notice::success(self.text(locale))
    }

    /// Builds an error notice with this text.
    #[must_use]
    pub fn error(self, locale: Locale) -> Notice {
        Notice::error(self.text(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_error_kinds() {
        assert!(!Notice::success("ok").is_error());
        assert!(Notice::error("fail").is_error());
    }

    #[test]
    fn message_texts_per_locale() {
        assert_eq!(
            Message::DuplicateRequest.text(Locale::PtBr),
            "Você já enviou uma solicitação para este usuário!"
        );
        assert_eq!(Message::ContactAdded.text(Locale::En), "Contact added!");
        assert_eq!(Message::NameRequired.text(Locale::PtBr), "Nome obrigatório");
        assert_eq!(Message::NameRequired.text(Locale::En), "Name is required");
    }

    #[test]
    fn message_builds_notices() {
        let notice = Message::RejectFailed.error(Locale::PtBr);
        assert!(notice.is_error());
        assert_eq!(notice.message, "Erro ao rejeitar solicitação");

        let notice = Message::RequestRejected.success(Locale::En);
        assert_eq!(notice.kind, NoticeKind::Success);
    }
}
