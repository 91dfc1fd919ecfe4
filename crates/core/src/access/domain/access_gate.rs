use super::credential_verifier::CredentialVerifier;

/// Whether the administrative screens are unlocked.
///
/// Starts locked. A successful login unlocks until `logout`.
pub struct AccessGate {
    verifier: Box<dyn CredentialVerifier>,
    logged_in: bool,
}

impl AccessGate {
    pub fn new(verifier: Box<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            logged_in: false,
        }
    }

    /// Returns whether the credentials were accepted. Both fields are
    /// trimmed. A failed attempt does not lock an already unlocked gate.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let ok = self.verifier.verify(username.trim(), password.trim());
        if ok {
            log::info!("Administrator {} logged in", username.trim());
            self.logged_in = true;
        } else {
            log::warn!("Rejected login attempt for {:?}", username.trim());
        }
        ok
    }

    pub fn logout(&mut self) {
        if self.logged_in {
            log::info!("Administrator logged out");
        }
        self.logged_in = false;
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Swaps the verifier, e.g. after the credentials were edited.
    /// The current login state is kept.
    pub fn set_verifier(&mut self, verifier: Box<dyn CredentialVerifier>) {
        self.verifier = verifier;
    }
}
