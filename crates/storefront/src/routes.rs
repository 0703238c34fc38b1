//! Client-side route table and access guards.

use std::fmt;

/// Every page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Products,
    About,
    Contact,
    Cart,
    Checkout,
    Login,
    Register,
    Profile,
    Orders,
}

/// Who may visit a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Signed-in users only; guests go to the login page.
    Private,
    /// Guests only; signed-in users go home.
    GuestOnly,
}

/// Outcome of checking a route against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(Route),
}

impl Route {
    pub const ALL: [Self; 10] = [
        Self::Home,
        Self::Products,
        Self::About,
        Self::Contact,
        Self::Cart,
        Self::Checkout,
        Self::Login,
        Self::Register,
        Self::Profile,
        Self::Orders,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Products => "/products",
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Cart => "/cart",
            Self::Checkout => "/checkout",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Profile => "/profile",
            Self::Orders => "/profile/orders",
        }
    }

    /// Route for a path; a trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Checkout | Self::Profile | Self::Orders => Access::Private,
            Self::Login | Self::Register => Access::GuestOnly,
            Self::Home | Self::Products | Self::About | Self::Contact | Self::Cart => {
                Access::Public
            }
        }
    }

    /// Check the route for a session that is (or is not) signed in.
    #[must_use]
    pub const fn guard(self, logged_in: bool) -> Guard {
        match (self.access(), logged_in) {
            (Access::Private, false) => Guard::Redirect(Self::Login),
            (Access::GuestOnly, true) => Guard::Redirect(Self::Home),
            _ => Guard::Allow,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
