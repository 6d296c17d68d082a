// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the session manager.

/// Session lifecycle state.
///
/// Use [`super::SessionManager::state()`] to check the current state or
/// [`super::SessionManager::state_receiver()`] to watch for changes.
///
/// ```text
/// (no credentials) → Unauthenticated
/// (credentials)    → Authenticating → Authenticated | Failed
///                    any 401 → Reauthenticating → Authenticated | Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credentials configured; the static base URL is used
    Unauthenticated,
    /// First login pending or in flight
    Authenticating,
    /// Login succeeded, tenant base URL memoized
    Authenticated,
    /// Replacement login after an authorization failure
    Reauthenticating,
    /// Latest login failed; waiters received the error
    Failed,
}

impl SessionState {
    /// A login is pending or in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Authenticating | Self::Reauthenticating)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Authenticated => write!(f, "Authenticated"),
            Self::Reauthenticating => write!(f, "Reauthenticating"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}
