use secrecy::SecretString;

/// Which authentication strategy a session uses.
///
/// Marker enum (no data) -- the actual secrets live in [`Credentials`].
/// Useful for branching on auth flow without carrying secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// API key appended as a query parameter to every request.
    ApiKey,
    /// `JSESSIONID_AV` cookie obtained by posting to `login`.
    Session,
}

impl std::fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey => f.write_str("api key"),
            Self::Session => f.write_str("credentials"),
        }
    }
}

/// Credentials for authenticating with a UniFi Video NVR.
///
/// Resolved once at construction; the request pipeline matches on the
/// variant rather than re-inspecting configuration on every call.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// API key generated in the NVR's user settings. Never rotated, so a
    /// 401 in this mode is final.
    ApiKey { key: SecretString },

    /// Username/password pair exchanged for a session cookie.
    Session {
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::ApiKey { .. } => AuthStrategy::ApiKey,
            Self::Session { .. } => AuthStrategy::Session,
        }
    }
}
