//! Auth slice: the signed-in user and their account data.

use bazaar_core::AddressId;
use secrecy::SecretString;

use crate::api::{Address, Order, User};

#[derive(Debug, Clone)]
pub enum AuthAction {
    LoginUser { user: User, jwt: SecretString },
    UserAddresses(Vec<Address>),
    UserOrders(Vec<Order>),
    SelectCheckoutAddress(Address),
    RemoveCheckoutAddress,
    ClientSecret(SecretString),
    RemoveClientSecretAndAddress,
    LogOut,
}

/// Auth state.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
    pub jwt: Option<SecretString>,
    pub client_secret: Option<SecretString>,
    pub selected_checkout_address: Option<Address>,
}

impl AuthState {
    /// State for a session that starts with a previously persisted token.
    #[must_use]
    pub fn with_token(jwt: Option<SecretString>) -> Self {
        Self {
            jwt,
            ..Self::default()
        }
    }

    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::LoginUser { user, jwt } => {
                self.user = Some(user);
                self.jwt = Some(jwt);
            }
            AuthAction::UserAddresses(addresses) => {
                // A selection that no longer exists server-side is dropped
                if let Some(selected) = &self.selected_checkout_address
                    && !addresses.iter().any(|a| a.address_id == selected.address_id)
                {
                    self.selected_checkout_address = None;
                }
                self.addresses = addresses;
            }
            AuthAction::UserOrders(orders) => self.orders = orders,
            AuthAction::SelectCheckoutAddress(address) => {
                self.selected_checkout_address = Some(address);
            }
            AuthAction::RemoveCheckoutAddress => self.selected_checkout_address = None,
            AuthAction::ClientSecret(secret) => self.client_secret = Some(secret),
            AuthAction::RemoveClientSecretAndAddress => {
                self.client_secret = None;
                self.selected_checkout_address = None;
            }
            AuthAction::LogOut => *self = Self::default(),
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn address(&self, address_id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.address_id == address_id)
    }

    #[must_use]
    pub fn selected_address_id(&self) -> Option<AddressId> {
        self.selected_checkout_address
            .as_ref()
            .map(|a| a.address_id)
    }
}
