//! Interaction status tracking
//!
//! Holds the single authoritative "interaction in progress" value and
//! publishes it through a `tokio::sync::watch` channel. Every event is applied
//! at most once and no-op transitions are never republished.

use authgate_domain::{EventMessage, EventType, InteractionStatus, InteractionType};
use tokio::sync::watch;
use tracing::{debug, trace};

/// Status the client would move to after `message`, or `None` to stay put.
///
/// Start events claim the status. End events release it to
/// [`InteractionStatus::None`] only when they close the interaction that is
/// currently recorded, so a late end event from one flow cannot unlock another.
#[must_use]
pub fn infer_status(
    message: &EventMessage,
    current: InteractionStatus,
) -> Option<InteractionStatus> {
    let interactive = message.interaction_type.is_some_and(InteractionType::is_interactive);

    match message.event_type {
        EventType::LoginStart => Some(InteractionStatus::Login),
        EventType::SsoSilentStart => Some(InteractionStatus::SsoSilent),
        EventType::AcquireTokenStart if interactive => Some(InteractionStatus::AcquireToken),
        EventType::HandleRedirectStart => Some(InteractionStatus::HandleRedirect),
        EventType::LogoutStart => Some(InteractionStatus::Logout),
        EventType::SsoSilentSuccess | EventType::SsoSilentFailure
            if current == InteractionStatus::SsoSilent =>
        {
            Some(InteractionStatus::None)
        }
        EventType::LogoutEnd if current == InteractionStatus::Logout => {
            Some(InteractionStatus::None)
        }
        EventType::HandleRedirectEnd if current == InteractionStatus::HandleRedirect => {
            Some(InteractionStatus::None)
        }
        EventType::LoginSuccess
        | EventType::LoginFailure
        | EventType::AcquireTokenSuccess
        | EventType::AcquireTokenFailure
        | EventType::RestoreFromBfcache
            if interactive
                && matches!(
                    current,
                    InteractionStatus::Login | InteractionStatus::AcquireToken
                ) =>
        {
            Some(InteractionStatus::None)
        }
        _ => None,
    }
}

/// Owner of the published [`InteractionStatus`].
#[derive(Debug)]
pub struct InteractionStatusTracker {
    status: watch::Sender<InteractionStatus>,
}

impl InteractionStatusTracker {
    /// New tracker in [`InteractionStatus::Startup`].
    #[must_use]
    pub fn new() -> Self {
        let (status, _) = watch::channel(InteractionStatus::Startup);
        Self { status }
    }

    #[must_use]
    pub fn current(&self) -> InteractionStatus {
        *self.status.borrow()
    }

    /// Observe status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InteractionStatus> {
        self.status.subscribe()
    }

    /// Apply one event.
    ///
    /// Returns the new status when it changed. Inference and write happen
    /// under the channel's lock so concurrent events cannot interleave.
    pub fn apply(&self, message: &EventMessage) -> Option<InteractionStatus> {
        let mut updated = None;
        self.status.send_if_modified(|current| match infer_status(message, *current) {
            Some(next) if next != *current => {
                trace!(from = %current, to = %next, event = %message.event_type, "interaction status");
                *current = next;
                updated = Some(next);
                true
            }
            _ => false,
        });
        updated
    }

    /// Force the status back to idle.
    ///
    /// Used when startup settles so a redirect that never reported its end
    /// cannot block interactive operations for the rest of the session.
    pub fn force_reset(&self) -> bool {
        let changed = self.status.send_if_modified(|current| {
            if *current == InteractionStatus::None {
                false
            } else {
                *current = InteractionStatus::None;
                true
            }
        });
        if changed {
            debug!("interaction status reset to none");
        }
        changed
    }

    /// Put the status back to [`InteractionStatus::Startup`] for a new
    /// install cycle. Returns whether it changed.
    pub fn restart(&self) -> bool {
        self.status.send_if_modified(|current| {
            if *current == InteractionStatus::Startup {
                false
            } else {
                *current = InteractionStatus::Startup;
                true
            }
        })
    }
}

impl Default for InteractionStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
