//! Account list and active account state
//!
//! The list is published as an `Arc<Vec<_>>` and replaced wholesale, so a
//! reader can tell a real change apart from a re-query by pointer identity.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use authgate_domain::{account_lists_equal, AccountInfo};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::ports::AuthClient;

/// Published account list.
pub type AccountSet = Arc<Vec<AccountInfo>>;

/// Known accounts and the active one.
///
/// Written only by the plugin's event handlers; any number of readers may
/// subscribe.
pub struct AccountStateStore {
    client: Arc<dyn AuthClient>,
    accounts: watch::Sender<AccountSet>,
    active: watch::Sender<Option<AccountInfo>>,
    revision: AtomicU64,
}

impl AccountStateStore {
    /// Seed the store from the client's current cache.
    pub fn new(client: Arc<dyn AuthClient>) -> Self {
        let initial = dedupe(client.get_all_accounts());
        let active = client
            .get_active_account()
            .filter(|active| initial.iter().any(|account| account.same_identity(active)))
            .or_else(|| initial.first().cloned());
        let (accounts, _) = watch::channel(Arc::new(initial));
        let (active, _) = watch::channel(active);
        Self { client, accounts, active, revision: AtomicU64::new(0) }
    }

    /// Current account list.
    #[must_use]
    pub fn accounts(&self) -> AccountSet {
        Arc::clone(&self.accounts.borrow())
    }

    #[must_use]
    pub fn active_account(&self) -> Option<AccountInfo> {
        self.active.borrow().clone()
    }

    #[must_use]
    pub fn subscribe_accounts(&self) -> watch::Receiver<AccountSet> {
        self.accounts.subscribe()
    }

    #[must_use]
    pub fn subscribe_active(&self) -> watch::Receiver<Option<AccountInfo>> {
        self.active.subscribe()
    }

    /// Number of times the list has been replaced.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Re-read the client's cache and reconcile against it.
    pub fn refresh(&self) -> bool {
        self.reconcile_accounts(self.client.get_all_accounts())
    }

    /// Replace the stored list if `fresh` differs from it.
    ///
    /// Lists are compared position by position on the identity triple.
    /// Returns whether the published list changed. The active-account
    /// invariant is re-checked either way.
    pub fn reconcile_accounts(&self, fresh: Vec<AccountInfo>) -> bool {
        let fresh = dedupe(fresh);
        let changed = self.accounts.send_if_modified(|stored| {
            if account_lists_equal(stored, &fresh) {
                false
            } else {
                *stored = Arc::new(fresh);
                true
            }
        });
        if changed {
            let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
            info!(count = self.accounts.borrow().len(), revision, "accounts updated");
        }
        self.ensure_active();
        changed
    }

    /// Re-derive the active account from the client's live list.
    ///
    /// Called after a logout ends. An empty list clears the active account,
    /// otherwise the first entry becomes active.
    pub fn reset_active_account(&self) {
        let fresh = self.client.get_all_accounts();
        match fresh.into_iter().next() {
            Some(first) => self.promote(first),
            None => {
                self.client.set_active_account(None);
                self.set_local_active(None);
            }
        }
    }

    /// Make `account` active in both the client and local state.
    pub fn promote(&self, account: AccountInfo) {
        debug!(username = %account.username, "promoting active account");
        self.client.set_active_account(Some(account.clone()));
        self.set_local_active(Some(account));
    }

    /// Empty list clears the active account; a missing or stale active
    /// account is replaced by the first entry.
    fn ensure_active(&self) {
        let accounts = self.accounts();
        let Some(first) = accounts.first() else {
            self.set_local_active(None);
            return;
        };
        let current_is_listed = self
            .active
            .borrow()
            .as_ref()
            .is_some_and(|active| accounts.iter().any(|account| account.same_identity(active)));
        if !current_is_listed {
            self.promote(first.clone());
        }
    }

    fn set_local_active(&self, next: Option<AccountInfo>) {
        self.active.send_if_modified(|current| {
            let same = match (current.as_ref(), next.as_ref()) {
                (Some(a), Some(b)) => a.same_identity(b),
                (None, None) => true,
                _ => false,
            };
            if same {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Keep the first occurrence of each `home_account_id`.
fn dedupe(accounts: Vec<AccountInfo>) -> Vec<AccountInfo> {
    let mut seen = HashSet::new();
    accounts.into_iter().filter(|account| seen.insert(account.home_account_id.clone())).collect()
}
