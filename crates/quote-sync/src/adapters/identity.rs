//! Wallet identity adapter.
//!
//! Holds the connected account and publishes every change on a watch channel.

use crate::domain::Address;
use crate::ports::IdentityProvider;
use tokio::sync::watch;
use tracing::info;

/// Connected wallet account.
pub struct WalletIdentity {
    sender: watch::Sender<Option<Address>>,
}

impl WalletIdentity {
    /// Disconnected wallet.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Wallet already connected to `address`.
    pub fn with_address(address: Address) -> Self {
        let (sender, _) = watch::channel(Some(address));
        Self { sender }
    }

    /// Connect or switch to `address`.
    pub fn connect(&self, address: Address) {
        info!(address = %address, "Wallet connected");
        self.sender.send_replace(Some(address));
    }

    /// Disconnect.
    pub fn disconnect(&self) {
        info!("Wallet disconnected");
        self.sender.send_replace(None);
    }
}

impl Default for WalletIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for WalletIdentity {
    fn current(&self) -> Option<Address> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.sender.subscribe()
    }
}
