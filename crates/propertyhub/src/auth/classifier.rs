//! Maps raw authentication and network error text onto fixed user copy.
//!
//! Rules are evaluated in table order and the first rule with any matching
//! phrase wins. Matching is ASCII case-insensitive. Text that matches no
//! rule falls back to [`ErrorKind::Unknown`], echoing the raw message.

use serde::Serialize;

use super::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCredentials,
    AlreadyRegistered,
    UserNotFound,
    EmailNotConfirmed,
    PermissionDenied,
    Network,
    Unknown,
}

impl ErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::AlreadyRegistered => "already_registered",
            Self::UserNotFound => "user_not_found",
            Self::EmailNotConfirmed => "email_not_confirmed",
            Self::PermissionDenied => "permission_denied",
            Self::Network => "network",
            Self::Unknown => "unknown",
        }
    }
}

struct Rule {
    kind: ErrorKind,
    phrases: &'static [&'static str],
    title: &'static str,
    message: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        kind: ErrorKind::InvalidCredentials,
        phrases: &["Invalid login credentials"],
        title: "Login Gagal",
        message: "Email atau password yang Anda masukkan salah. Silakan coba lagi.",
    },
    Rule {
        kind: ErrorKind::AlreadyRegistered,
        phrases: &["already registered"],
        title: "Email Sudah Terdaftar",
        message: "Email ini sudah terdaftar. Silakan login atau gunakan email lain.",
    },
    Rule {
        kind: ErrorKind::UserNotFound,
        phrases: &["user not found"],
        title: "Akun Tidak Ditemukan",
        message: "Tidak ada akun yang terdaftar dengan email tersebut.",
    },
    Rule {
        kind: ErrorKind::EmailNotConfirmed,
        phrases: &["Email not confirmed"],
        title: "Email Belum Dikonfirmasi",
        message: "Silakan cek inbox Anda dan konfirmasi email sebelum login.",
    },
    Rule {
        kind: ErrorKind::PermissionDenied,
        phrases: &["permission denied"],
        title: "Akses Ditolak",
        message: "Anda tidak memiliki izin untuk mengakses halaman ini.",
    },
    Rule {
        kind: ErrorKind::Network,
        phrases: &["Failed to fetch", "Network Error"],
        title: "Koneksi Bermasalah",
        message: "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.",
    },
];

const FALLBACK_TITLE: &str = "Terjadi Kesalahan";
const FALLBACK_MESSAGE: &str = "Terjadi kesalahan yang tidak diketahui. Silakan coba lagi.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: ErrorKind,
    #[serde(flatten)]
    pub notice: Notice,
}

/// Total over all inputs: every string yields exactly one classification.
pub fn classify(raw: &str) -> Classification {
    let haystack = raw.to_ascii_lowercase();

    RULES
        .iter()
        .find(|rule| {
            rule.phrases
                .iter()
                .any(|phrase| haystack.contains(&phrase.to_ascii_lowercase()))
        })
        .map(|rule| Classification {
            kind: rule.kind,
            notice: Notice::new(rule.title, rule.message),
        })
        .unwrap_or_else(|| fallback(raw))
}

/// Copy for a known kind, independent of any raw text.
pub fn notice_for(kind: ErrorKind) -> Notice {
    RULES
        .iter()
        .find(|rule| rule.kind == kind)
        .map(|rule| Notice::new(rule.title, rule.message))
        .unwrap_or_else(|| Notice::new(FALLBACK_TITLE, FALLBACK_MESSAGE))
}

fn fallback(raw: &str) -> Classification {
    let trimmed = raw.trim();
    let message = if trimmed.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    };

    Classification {
        kind: ErrorKind::Unknown,
        notice: Notice::new(FALLBACK_TITLE, message),
    }
}
