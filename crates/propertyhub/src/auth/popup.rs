use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::notice::Notice;

#[derive(Debug, Default)]
struct PopupState {
    current: Option<(u64, Notice)>,
    shown: u64,
}

/// Identifies one opening of the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupTicket(u64);

/// Error popup holding at most one notice, closed either manually or by a
/// timer started when the notice was shown.
///
/// A timer only ever closes the notice it was started for, so a late timer
/// cannot dismiss a newer notice. Closing is idempotent.
#[derive(Debug, Clone)]
pub struct ErrorPopup {
    state: Arc<Mutex<PopupState>>,
    auto_close: Duration,
}

impl ErrorPopup {
    pub fn new(auto_close: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(PopupState::default())),
            auto_close,
        }
    }

    pub fn auto_close(&self) -> Duration {
        self.auto_close
    }

    fn lock(&self) -> MutexGuard<'_, PopupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the popup and start its auto-dismiss timer. Outside a tokio
    /// runtime no timer is started and the notice stays until closed.
    pub fn show(&self, notice: Notice) -> PopupTicket {
        let ticket = {
            let mut state = self.lock();
            state.shown += 1;
            let ticket = PopupTicket(state.shown);
            state.current = Some((ticket.0, notice));
            ticket
        };

        let delay = self.auto_close;
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(?delay, "no tokio runtime; error popup will not auto-dismiss");
                return ticket;
            }
        };

        let popup = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if popup.close_ticket(ticket) {
                debug!(?delay, "error popup auto-dismissed");
            }
        });

        ticket
    }

    pub fn current(&self) -> Option<Notice> {
        self.lock().current.as_ref().map(|(_, notice)| notice.clone())
    }

    pub fn is_open(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Returns whether a notice was actually closed.
    pub fn close(&self) -> bool {
        self.lock().current.take().is_some()
    }

    fn close_ticket(&self, ticket: PopupTicket) -> bool {
        let mut state = self.lock();
        match state.current {
            Some((id, _)) if id == ticket.0 => {
                state.current = None;
                true
            }
            _ => false,
        }
    }
}
