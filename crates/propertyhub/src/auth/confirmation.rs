use serde::{Deserialize, Serialize};

use super::notice::Notice;

/// Reasons the email confirmation link can fail, as carried in `?error=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationFailure {
    NoToken,
    InvalidToken,
    ExpiredToken,
    AlreadyVerified,
    UpdateFailed,
    DbError,
    InternalError,
    Unknown,
}

impl ConfirmationFailure {
    pub const fn recognized() -> [Self; 7] {
        [
            Self::NoToken,
            Self::InvalidToken,
            Self::ExpiredToken,
            Self::AlreadyVerified,
            Self::UpdateFailed,
            Self::DbError,
            Self::InternalError,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::NoToken => "no_token",
            Self::InvalidToken => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::AlreadyVerified => "already_verified",
            Self::UpdateFailed => "update_failed",
            Self::DbError => "db_error",
            Self::InternalError => "internal_error",
            Self::Unknown => "unknown",
        }
    }

    /// Missing or unrecognized codes resolve to [`ConfirmationFailure::Unknown`].
    pub fn from_query(error: Option<&str>) -> Self {
        error
            .map(str::trim)
            .and_then(|code| {
                Self::recognized()
                    .into_iter()
                    .find(|failure| failure.code() == code)
            })
            .unwrap_or(Self::Unknown)
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::NoToken => "Link konfirmasi tidak lengkap. Token tidak ditemukan.",
            Self::InvalidToken => "Link konfirmasi tidak valid. Silakan minta link baru.",
            Self::ExpiredToken => "Link konfirmasi sudah kedaluwarsa. Silakan minta link baru.",
            Self::AlreadyVerified => "Email Anda sudah dikonfirmasi sebelumnya. Silakan login.",
            Self::UpdateFailed => "Gagal memperbarui status akun Anda. Silakan coba lagi.",
            Self::DbError => "Terjadi kesalahan pada database. Silakan coba beberapa saat lagi.",
            Self::InternalError => "Terjadi kesalahan pada server. Silakan coba beberapa saat lagi.",
            Self::Unknown => "Terjadi kesalahan saat mengkonfirmasi email Anda.",
        }
    }

    pub fn notice(self) -> Notice {
        Notice::new("Konfirmasi Email Gagal", self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationFailurePage {
    pub code: ConfirmationFailure,
    #[serde(flatten)]
    pub notice: Notice,
    pub can_resend: bool,
}

impl From<ConfirmationFailure> for ConfirmationFailurePage {
    fn from(code: ConfirmationFailure) -> Self {
        Self {
            code,
            notice: code.notice(),
            can_resend: matches!(
                code,
                ConfirmationFailure::InvalidToken | ConfirmationFailure::ExpiredToken
            ),
        }
    }
}
