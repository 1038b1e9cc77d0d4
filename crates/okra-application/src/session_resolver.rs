//! Session identifier resolution.

use crate::batch::FetchStrategy;
use okra_core::model::Session;
use okra_core::payload::unwrap_collection;
use okra_core::{OkraError, Result};
use okra_infrastructure::dto::{SessionDto, parse_records};

const SESSIONS_PATH: &str = "/sessions";

/// Maps user-supplied session names or IDs onto session records.
pub struct SessionResolver<'a> {
    strategy: &'a FetchStrategy,
}

impl<'a> SessionResolver<'a> {
    pub fn new(strategy: &'a FetchStrategy) -> Self {
        Self { strategy }
    }

    /// Fetches every session visible to the account.
    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        let response = self.strategy.get(SESSIONS_PATH).await?;
        let payload = response.json()?;
        let items = unwrap_collection(&payload)
            .ok_or_else(|| OkraError::malformed(SESSIONS_PATH, "unrecognized collection shape"))?;
        Ok(parse_records::<SessionDto>(items, "session")
            .into_iter()
            .map(Session::from)
            .collect())
    }

    /// Resolves `identifiers` in order.
    ///
    /// Each identifier matches a session ID exactly, or else a session name
    /// case-insensitively. Resolution is all-or-nothing: if any identifier
    /// fails, one error names every failure and lists the available sessions.
    pub async fn resolve(&self, identifiers: &[String]) -> Result<Vec<Session>> {
        let wanted: Vec<&str> = identifiers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if wanted.is_empty() {
            return Err(OkraError::config("no target sessions configured"));
        }

        let available = self.list_sessions().await?;
        let (resolved, unresolved) = match_identifiers(&available, &wanted);

        if !unresolved.is_empty() {
            return Err(OkraError::UnresolvedIdentifiers {
                unresolved,
                available: available.iter().map(|s| s.name.clone()).collect(),
            });
        }

        tracing::info!(
            "[SessionResolver] Resolved {} session(s): {}",
            resolved.len(),
            resolved
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(resolved)
    }
}

/// Splits `wanted` into matched sessions (first occurrence wins) and
/// identifiers that matched nothing.
fn match_identifiers(available: &[Session], wanted: &[&str]) -> (Vec<Session>, Vec<String>) {
    let mut resolved: Vec<Session> = Vec::new();
    let mut unresolved = Vec::new();

    for identifier in wanted {
        let found = available
            .iter()
            .find(|s| s.id == *identifier)
            .or_else(|| {
                available
                    .iter()
                    .find(|s| s.name.to_lowercase() == identifier.to_lowercase())
            });
        match found {
            Some(session) if resolved.iter().any(|r| r.id == session.id) => {
                tracing::debug!(
                    "[SessionResolver] '{}' resolves to an already selected session",
                    identifier
                );
            }
            Some(session) => resolved.push(session.clone()),
            None => unresolved.push(identifier.to_string()),
        }
    }

    (resolved, unresolved)
}
