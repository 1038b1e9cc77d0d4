//! Owner display-name resolution.

use crate::batch::FetchStrategy;
use crate::batch::adapters::collect_by_id;
use okra_core::api::encode_list;
use okra_core::model::{UserRecord, synthetic_user_label};
use okra_core::payload::unwrap_collection;
use okra_core::{OkraError, Result};
use okra_infrastructure::dto::{UserDto, parse_records, unwrap_record};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Run-scoped, write-once cache of user display names.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct UserNameCache {
    names: Arc<RwLock<HashMap<String, String>>>,
}

impl UserNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<String> {
        self.names.read().await.get(id).cloned()
    }

    /// Stores a name unless one is already cached for `id`.
    ///
    /// Returns true when the name was stored.
    pub async fn insert(&self, id: String, display_name: String) -> bool {
        let mut names = self.names.write().await;
        if names.contains_key(&id) {
            return false;
        }
        names.insert(id, display_name);
        true
    }

    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }
}

/// Resolves user IDs to display names. Lookups never fail a run.
pub struct UserDirectory {
    cache: UserNameCache,
    bulk_size: usize,
    bulk_enabled: bool,
}

impl UserDirectory {
    pub fn new(cache: UserNameCache, bulk_size: usize, bulk_enabled: bool) -> Self {
        Self {
            cache,
            bulk_size: bulk_size.max(1),
            bulk_enabled,
        }
    }

    /// Returns a display name for every ID in `ids`.
    ///
    /// Resolution order: cache, bulk endpoint, per-user endpoint, synthetic
    /// `"User <id>"` label. Synthetic labels are not cached.
    pub async fn resolve(
        &self,
        strategy: &FetchStrategy,
        ids: &BTreeSet<String>,
    ) -> HashMap<String, String> {
        let mut names = HashMap::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match self.cache.get(id).await {
                Some(name) => {
                    names.insert(id.clone(), name);
                }
                None => missing.push(id.clone()),
            }
        }
        if missing.is_empty() {
            return names;
        }

        if self.bulk_enabled {
            for chunk in missing.chunks(self.bulk_size) {
                for record in self.fetch_bulk(strategy, chunk).await {
                    self.remember(&mut names, record).await;
                }
            }
            missing.retain(|id| !names.contains_key(id));
        }

        if !missing.is_empty() {
            tracing::debug!(
                "[UserDirectory] Looking up {} user(s) individually",
                missing.len()
            );
            for record in self.fetch_individually(strategy, &missing).await {
                self.remember(&mut names, record).await;
            }
        }

        for id in ids {
            if !names.contains_key(id) {
                tracing::warn!("[UserDirectory] No name for user '{}'; using label", id);
                names.insert(id.clone(), synthetic_user_label(id));
            }
        }
        tracing::debug!(
            "[UserDirectory] Resolved {} user(s); {} name(s) cached",
            names.len(),
            self.cache.len().await
        );
        names
    }

    async fn remember(&self, names: &mut HashMap<String, String>, record: UserRecord) {
        self.cache
            .insert(record.id.clone(), record.display_name.clone())
            .await;
        names.insert(record.id, record.display_name);
    }

    async fn fetch_bulk(&self, strategy: &FetchStrategy, ids: &[String]) -> Vec<UserRecord> {
        let path = format!("/users?ids={}", encode_list(ids));
        let records = async {
            let response = strategy.get(&path).await?;
            let payload = response.json()?;
            let items = unwrap_collection(&payload)
                .ok_or_else(|| OkraError::malformed(&path, "unrecognized collection shape"))?;
            Ok::<_, OkraError>(
                parse_records::<UserDto>(items, "user")
                    .into_iter()
                    .filter_map(UserDto::into_record)
                    .collect::<Vec<_>>(),
            )
        }
        .await;

        records.unwrap_or_else(|e| {
            tracing::warn!(
                "[UserDirectory] Bulk lookup of {} user(s) failed: {}",
                ids.len(),
                e
            );
            Vec::new()
        })
    }

    async fn fetch_individually(&self, strategy: &FetchStrategy, ids: &[String]) -> Vec<UserRecord> {
        let found = collect_by_id(
            strategy,
            "user",
            ids,
            |id| format!("/users/{}", id),
            |response| {
                let payload = response.json()?;
                let user: UserDto = serde_json::from_value(unwrap_record(&payload).clone())
                    .map_err(|e| OkraError::malformed(&response.path, e.to_string()))?;
                user.into_record()
                    .ok_or_else(|| OkraError::malformed(&response.path, "user has no name"))
            },
        )
        .await;

        match found {
            Ok(map) => map.into_values().collect(),
            Err(e) => {
                tracing::warn!("[UserDirectory] Individual lookups failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_is_write_once() {
        let cache = UserNameCache::new();
        assert!(cache.insert("u1".to_string(), "Ada".to_string()).await);
        assert!(!cache.insert("u1".to_string(), "Someone else".to_string()).await);
        assert_eq!(cache.get("u1").await.as_deref(), Some("Ada"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = UserNameCache::new();
        let shared = cache.clone();
        shared.insert("u2".to_string(), "Lin".to_string()).await;
        assert_eq!(cache.get("u2").await.as_deref(), Some("Lin"));
    }
}
