//! Authentication-facing copy and orchestration: error classification, the
//! login flow over an external auth session, the error popup, and the email
//! confirmation failure page.

pub mod classifier;
pub mod confirmation;
pub mod login;
pub mod notice;
pub mod popup;
pub mod router;

pub use classifier::{classify, notice_for, Classification, ErrorKind};
pub use confirmation::{ConfirmationFailure, ConfirmationFailurePage};
pub use login::{
    AuthFailure, AuthProvider, AuthSessionFactory, Credentials, LoginFlow, LoginOutcome, Toast,
    ToastLevel, ToastLog, ToastSink,
};
pub use notice::Notice;
pub use popup::{ErrorPopup, PopupTicket};
pub use router::auth_router;
