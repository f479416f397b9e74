use async_trait::async_trait;
use dashmap::DashMap;

use matchwire_core::error::{MatchwireError, Result};
use matchwire_core::types::{MatchId, UserId};

/// Resolves which two users belong to a match.
///
/// Match membership lives in the relational store owned by the HTTP layer;
/// the gateway queries it per fan-out and never caches the answer. Whatever
/// owns the store provides the production implementation.
#[async_trait]
pub trait MatchDirectory: Send + Sync {
    /// Both participants of `match_id`. `UnknownMatch` when it does not
    /// resolve.
    async fn participants(&self, match_id: &MatchId) -> Result<(UserId, UserId)>;
}

/// DashMap-backed directory for development and tests.
#[derive(Default)]
pub struct InMemoryMatchDirectory {
    matches: DashMap<MatchId, (UserId, UserId)>,
}

impl InMemoryMatchDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        match_id: impl Into<MatchId>,
        a: impl Into<UserId>,
        b: impl Into<UserId>,
    ) {
        self.matches.insert(match_id.into(), (a.into(), b.into()));
    }
}

#[async_trait]
impl MatchDirectory for InMemoryMatchDirectory {
    async fn participants(&self, match_id: &MatchId) -> Result<(UserId, UserId)> {
        self.matches
            .get(match_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| MatchwireError::UnknownMatch(match_id.to_string()))
    }
}
