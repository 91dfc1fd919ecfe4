use crate::access::domain::credential_verifier::CredentialVerifier;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// A single fixed username/password pair, typically read from settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        !self.username.is_empty() && username == self.username && password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password123", true)]
    #[case("admin", "password", false)]
    #[case("Admin", "password123", false)]
    #[case("", "", false)]
    fn test_default_credentials(#[case] user: &str, #[case] pass: &str, #[case] ok: bool) {
        assert_eq!(StaticCredentials::default().verify(user, pass), ok);
    }

    #[test]
    fn test_empty_username_never_verifies() {
        let creds = StaticCredentials::new("", "");
        assert!(!creds.verify("", ""));
    }
}
