use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::{classify, notice_for, Classification, ErrorKind};
use super::notice::Notice;
use super::popup::ErrorPopup;

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw error text surfaced by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct AuthFailure(pub String);

/// External authentication session. Implementations own the network calls.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthFailure>;
    async fn sign_out(&self);
    fn error(&self) -> Option<String>;
    fn is_authenticated(&self) -> bool;
    fn is_admin(&self) -> bool;
    fn loading(&self) -> bool;
    fn clear_error(&self);
}

/// Creates one auth session per login attempt.
pub trait AuthSessionFactory: Send + Sync {
    type Session: AuthProvider;

    fn session(&self) -> Self::Session;
}

pub trait ToastSink: Send + Sync {
    fn show_error(&self, title: &str, message: &str);
    fn show_success(&self, title: &str, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    #[serde(flatten)]
    pub notice: Notice,
}

/// Toast sink that keeps every toast in memory.
#[derive(Debug, Default, Clone)]
pub struct ToastLog {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastLog {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, level: ToastLevel, title: &str, message: &str) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Toast {
                level,
                notice: Notice::new(title, message),
            });
    }
}

impl ToastSink for ToastLog {
    fn show_error(&self, title: &str, message: &str) {
        self.push(ToastLevel::Error, title, message);
    }

    fn show_success(&self, title: &str, message: &str) {
        self.push(ToastLevel::Success, title, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    SignedIn { admin: bool },
    Failed(Classification),
}

impl LoginOutcome {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, LoginOutcome::SignedIn { .. })
    }
}

/// Login page orchestration over an auth session and a toast sink.
pub struct LoginFlow<A, T> {
    auth: A,
    toasts: T,
    popup: Option<ErrorPopup>,
}

impl<A, T> LoginFlow<A, T>
where
    A: AuthProvider,
    T: ToastSink,
{
    pub fn new(auth: A, toasts: T) -> Self {
        Self {
            auth,
            toasts,
            popup: None,
        }
    }

    /// Route failures to an auto-dismissing popup instead of an error toast.
    pub fn with_popup(mut self, popup: ErrorPopup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub async fn login(&self, credentials: &Credentials) -> LoginOutcome {
        match self.authenticate(credentials).await {
            Ok(()) => {
                let admin = self.auth.is_admin();
                info!(email = %credentials.email, admin, "user signed in");
                self.toasts
                    .show_success("Login Berhasil", "Selamat datang kembali!");
                LoginOutcome::SignedIn { admin }
            }
            Err(classification) => self.fail(classification),
        }
    }

    /// As [`LoginFlow::login`], but a session without admin rights is signed
    /// out and reported as permission denied.
    pub async fn admin_login(&self, credentials: &Credentials) -> LoginOutcome {
        let classification = match self.authenticate(credentials).await {
            Ok(()) if self.auth.is_admin() => {
                info!(email = %credentials.email, "admin signed in");
                self.toasts
                    .show_success("Login Berhasil", "Selamat datang di panel admin.");
                return LoginOutcome::SignedIn { admin: true };
            }
            Ok(()) => {
                self.auth.sign_out().await;
                Classification {
                    kind: ErrorKind::PermissionDenied,
                    notice: notice_for(ErrorKind::PermissionDenied),
                }
            }
            Err(classification) => classification,
        };

        warn!(
            email = %credentials.email,
            kind = classification.kind.code(),
            "admin login failed"
        );
        self.fail(classification)
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<(), Classification> {
        self.auth.clear_error();

        match self.auth.sign_in(credentials).await {
            Ok(()) if self.auth.is_authenticated() => Ok(()),
            Ok(()) => Err(classify(&self.auth.error().unwrap_or_default())),
            Err(failure) => {
                let raw = self.auth.error().unwrap_or(failure.0);
                Err(classify(&raw))
            }
        }
    }

    fn fail(&self, classification: Classification) -> LoginOutcome {
        let notice = &classification.notice;
        match &self.popup {
            Some(popup) => {
                popup.show(notice.clone());
            }
            None => self.toasts.show_error(&notice.title, &notice.message),
        }
        LoginOutcome::Failed(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct ScriptedSession {
        result: Result<bool, &'static str>,
        authenticated: AtomicBool,
        admin: AtomicBool,
        error: Mutex<Option<String>>,
        cleared: AtomicBool,
    }

    impl ScriptedSession {
        /// `Ok(admin)` signs in, `Err(raw)` fails with that provider error.
        fn new(result: Result<bool, &'static str>) -> Self {
            Self {
                result,
                authenticated: AtomicBool::new(false),
                admin: AtomicBool::new(false),
                error: Mutex::new(Some("stale error".to_string())),
                cleared: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for ScriptedSession {
        async fn sign_in(&self, _credentials: &Credentials) -> Result<(), AuthFailure> {
            match self.result {
                Ok(admin) => {
                    self.authenticated.store(true, Ordering::SeqCst);
                    self.admin.store(admin, Ordering::SeqCst);
                    Ok(())
                }
                Err(raw) => {
                    *self.error.lock().unwrap() = Some(raw.to_string());
                    Err(AuthFailure(raw.to_string()))
                }
            }
        }

        async fn sign_out(&self) {
            self.authenticated.store(false, Ordering::SeqCst);
            self.admin.store(false, Ordering::SeqCst);
        }

        fn error(&self) -> Option<String> {
            self.error.lock().unwrap().clone()
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated.load(Ordering::SeqCst)
        }

        fn is_admin(&self) -> bool {
            self.admin.load(Ordering::SeqCst)
        }

        fn loading(&self) -> bool {
            false
        }

        fn clear_error(&self) {
            self.cleared.store(true, Ordering::SeqCst);
            *self.error.lock().unwrap() = None;
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "admin@propertyhub.test".to_string(),
            password: "rahasia".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_login_shows_success_toast() {
        let toasts = ToastLog::default();
        let flow = LoginFlow::new(ScriptedSession::new(Ok(false)), toasts.clone());

        let outcome = flow.login(&credentials()).await;

        assert_eq!(outcome, LoginOutcome::SignedIn { admin: false });
        assert!(flow.auth().cleared.load(Ordering::SeqCst));
        let shown = toasts.toasts();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn failed_login_classifies_provider_error() {
        let toasts = ToastLog::default();
        let flow = LoginFlow::new(
            ScriptedSession::new(Err("AuthApiError: Invalid login credentials")),
            toasts.clone(),
        );

        let outcome = flow.login(&credentials()).await;

        match outcome {
            LoginOutcome::Failed(classification) => {
                assert_eq!(classification.kind, ErrorKind::InvalidCredentials);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        let shown = toasts.toasts();
        assert_eq!(shown[0].level, ToastLevel::Error);
        assert_eq!(shown[0].notice.title, "Login Gagal");
    }

    #[tokio::test]
    async fn admin_login_rejects_non_admin_sessions() {
        let toasts = ToastLog::default();
        let flow = LoginFlow::new(ScriptedSession::new(Ok(false)), toasts.clone());

        let outcome = flow.admin_login(&credentials()).await;

        match outcome {
            LoginOutcome::Failed(classification) => {
                assert_eq!(classification.kind, ErrorKind::PermissionDenied);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!flow.auth().is_authenticated(), "non-admin is signed out");
    }

    #[tokio::test]
    async fn admin_login_accepts_admins() {
        let flow = LoginFlow::new(ScriptedSession::new(Ok(true)), ToastLog::default());
        assert_eq!(
            flow.admin_login(&credentials()).await,
            LoginOutcome::SignedIn { admin: true }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failures_go_to_popup_when_configured() {
        let toasts = ToastLog::default();
        let popup = ErrorPopup::new(Duration::from_millis(5_000));
        let flow = LoginFlow::new(ScriptedSession::new(Err("Failed to fetch")), toasts.clone())
            .with_popup(popup.clone());

        flow.login(&credentials()).await;

        assert!(toasts.toasts().is_empty());
        assert_eq!(
            popup.current().map(|notice| notice.title),
            Some("Koneksi Bermasalah".to_string())
        );

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert!(!popup.is_open());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("rahasia"));
    }
}
