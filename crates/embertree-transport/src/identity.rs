use async_trait::async_trait;

/// Source of the identity token attached to requests as the `auth`
/// parameter. Implement this over the host application's auth handle; the
/// current user's token is fetched per request so refreshes are picked up.
///
/// `None` is not an error — the request simply proceeds unauthenticated.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn id_token(&self) -> Option<String>;
}

/// Identity provider for unauthenticated access.
pub struct Anonymous;

#[async_trait]
impl IdentityProvider for Anonymous {
    async fn id_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, useful for database secrets and tests.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl IdentityProvider for StaticToken {
    async fn id_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}
