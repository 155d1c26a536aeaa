//! Where the authentication token lives.
//!
//! The login flow writes the token; this crate only reads it, except for an
//! explicit sign-out.

/// localStorage key the login screen stores the token under.
pub const TOKEN_KEY: &str = "token";

pub trait Session {
    /// The current token, if the user is signed in. Empty tokens count as absent.
    fn token(&self) -> Option<String>;

    fn clear_token(&self);
}

/// Reads the token from the browser's localStorage.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSession;

impl BrowserSession {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl Session for BrowserSession {
    fn token(&self) -> Option<String> {
        let token = Self::storage()?.get_item(TOKEN_KEY).ok().flatten()?;
        (!token.is_empty()).then_some(token)
    }

    fn clear_token(&self) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(TOKEN_KEY).is_err() {
                tracing::warn!("could not remove the session token from localStorage");
            }
        }
    }
}
