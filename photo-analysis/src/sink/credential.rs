/// Picks the bearer token for a delivery: the message's own credential
/// first, then the process-wide fallback.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    fallback: Option<String>,
}

impl CredentialResolver {
    pub fn new(fallback: Option<String>) -> Self {
        Self { fallback }
    }

    pub fn resolve<'a>(&'a self, from_message: Option<&'a str>) -> Option<&'a str> {
        from_message
            .filter(|token| !token.is_empty())
            .or(self.fallback.as_deref())
    }
}
