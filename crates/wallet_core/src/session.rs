use std::sync::Arc;

use shared::domain::Address;
use tokio::sync::watch;

/// The connected wallet account, observable by any number of readers.
///
/// Clones share the same underlying state. Only the controller in this crate
/// can write to it; everything else reads through [`Session::account`] or
/// waits for changes via [`Session::subscribe`].
#[derive(Clone)]
pub struct Session {
    account: Arc<watch::Sender<Option<Address>>>,
}

impl Session {
    pub fn new() -> Self {
        let (account, _) = watch::channel(None);
        Self {
            account: Arc::new(account),
        }
    }

    pub fn account(&self) -> Option<Address> {
        *self.account.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.account.subscribe()
    }

    /// Returns whether the stored account changed.
    pub(crate) fn set_account(&self, account: Address) -> bool {
        self.account.send_if_modified(|current| {
            if *current == Some(account) {
                return false;
            }
            *current = Some(account);
            true
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
