/// Keyed store of last-known-good server responses.
///
/// Provides:
/// - One entry per `QueryKey`, stored as JSON with a content hash
/// - Explicit staleness per key (`StalePolicy`), no background refresh
/// - Invalidation declared by each `Mutation`
/// - Thread-safe access via `Mutex`
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Court search parameters; empty values are omitted from the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CourtQuery {
    pub search_term: String,
    pub court_type: Option<String>,
    pub region: Option<String>,
}

impl CourtQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if !self.search_term.trim().is_empty() {
            out.push(("searchTerm", self.search_term.trim()));
        }
        if let Some(t) = self.court_type.as_deref() {
            out.push(("courtType", t));
        }
        if let Some(r) = self.region.as_deref() {
            out.push(("region", r));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    RecentDocuments,
    AllDocuments,
    Document(String),
    Analysis(String),
    Jurisdiction(String),
    Summary(String),
    Stats,
    Courts(CourtQuery),
    Activities,
    RecentActivities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalePolicy {
    /// Fresh for the cache TTL after the last fetch.
    Ttl,
    /// Fresh until a mutation invalidates it.
    UntilInvalidated,
}

impl QueryKey {
    /// REST path the key is read from (without query string).
    pub fn path(&self) -> String {
        match self {
            QueryKey::RecentDocuments => "/api/documents/recent".to_string(),
            QueryKey::AllDocuments => "/api/documents".to_string(),
            QueryKey::Document(id) => format!("/api/documents/{}", encode_segment(id)),
            QueryKey::Analysis(id) => format!("/api/documents/{}/analysis", encode_segment(id)),
            QueryKey::Jurisdiction(id) => {
                format!("/api/documents/{}/jurisdiction", encode_segment(id))
            }
            QueryKey::Summary(id) => format!("/api/documents/{}/summary", encode_segment(id)),
            QueryKey::Stats => "/api/stats".to_string(),
            QueryKey::Courts(_) => "/api/courts".to_string(),
            QueryKey::Activities => "/api/activities".to_string(),
            QueryKey::RecentActivities => "/api/activities/recent".to_string(),
        }
    }

    pub fn stale_policy(&self) -> StalePolicy {
        match self {
            QueryKey::Document(_)
            | QueryKey::Analysis(_)
            | QueryKey::Jurisdiction(_)
            | QueryKey::Summary(_) => StalePolicy::UntilInvalidated,
            _ => StalePolicy::Ttl,
        }
    }

    /// Document id this key is scoped to, if any.
    pub fn document_id(&self) -> Option<&str> {
        match self {
            QueryKey::Document(id)
            | QueryKey::Analysis(id)
            | QueryKey::Jurisdiction(id)
            | QueryKey::Summary(id) => Some(id),
            _ => None,
        }
    }

    fn is_document_list(&self) -> bool {
        matches!(self, QueryKey::RecentDocuments | QueryKey::AllDocuments)
    }

    fn is_activity_list(&self) -> bool {
        matches!(self, QueryKey::Activities | QueryKey::RecentActivities)
    }
}

/// Percent-encode one path segment (RFC 3986 unreserved characters pass through).
pub fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// A successful write operation and the read keys it makes stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Upload,
    Delete(String),
    Analyze(String),
    Translate(String),
    FindJurisdiction(String),
}

impl Mutation {
    pub fn invalidates(&self, key: &QueryKey) -> bool {
        match self {
            Mutation::Upload => {
                key.is_document_list() || key.is_activity_list() || *key == QueryKey::Stats
            }
            Mutation::Delete(id) => {
                key.is_document_list()
                    || key.is_activity_list()
                    || *key == QueryKey::Stats
                    || key.document_id() == Some(id.as_str())
            }
            Mutation::Analyze(id) => {
                key.is_document_list()
                    || key.is_activity_list()
                    || *key == QueryKey::Stats
                    || matches!(key, QueryKey::Document(d) | QueryKey::Analysis(d) | QueryKey::Summary(d) if d == id)
            }
            Mutation::Translate(id) => {
                key.is_activity_list() || matches!(key, QueryKey::Document(d) if d == id)
            }
            Mutation::FindJurisdiction(id) => {
                key.is_activity_list() || matches!(key, QueryKey::Jurisdiction(d) if d == id)
            }
        }
    }
}

struct CachedEntry {
    data: serde_json::Value,
    fetched_at: SystemTime,
    data_hash: String, // SHA256 of the serialized payload
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    Inserted,
    Unchanged,
    Replaced,
}

pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, CachedEntry>>,
    ttl_seconds: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL_SECONDS)
    }

    pub fn with_ttl(ttl_seconds: u64) -> Self {
        QueryCache {
            entries: Mutex::new(HashMap::new()),
            ttl_seconds,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CachedEntry>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_fresh_entry(&self, key: &QueryKey, entry: &CachedEntry) -> bool {
        match key.stale_policy() {
            StalePolicy::UntilInvalidated => true,
            StalePolicy::Ttl => {
                let age = SystemTime::now()
                    .duration_since(entry.fetched_at)
                    .unwrap_or(Duration::from_secs(self.ttl_seconds + 1));
                age.as_secs() < self.ttl_seconds
            }
        }
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        let entries = self.lock();
        entries
            .get(key)
            .map(|e| self.is_fresh_entry(key, e))
            .unwrap_or(false)
    }

    /// Fresh cached value for `key`, decoded as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if !self.is_fresh_entry(key, entry) {
            tracing::debug!(path = %key.path(), "cache stale");
            return None;
        }
        match serde_json::from_value(entry.data.clone()) {
            Ok(v) => {
                tracing::debug!(path = %key.path(), "cache hit");
                Some(v)
            }
            Err(e) => {
                tracing::debug!(path = %key.path(), err = %e, "cache entry has unexpected shape; dropping");
                entries.remove(key);
                None
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<CacheWrite, AppError> {
        let data = serde_json::to_value(value).map_err(|e| {
            AppError::new("CACHE_ENCODE_FAILED", "Failed to encode cache entry")
                .with_details(e.to_string())
        })?;
        let data_hash = compute_payload_hash(&data);

        let mut entries = self.lock();
        let write = match entries.get(&key) {
            None => CacheWrite::Inserted,
            Some(prev) if prev.data_hash == data_hash => CacheWrite::Unchanged,
            Some(_) => CacheWrite::Replaced,
        };
        entries.insert(
            key,
            CachedEntry {
                data,
                fetched_at: SystemTime::now(),
                data_hash,
            },
        );
        Ok(write)
    }

    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop every entry the mutation declares stale. Returns how many were dropped.
    pub fn invalidate_for(&self, mutation: &Mutation) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|k, _| !mutation.invalidates(k));
        let dropped = before - entries.len();
        tracing::debug!(mutation = ?mutation, dropped, "cache invalidated");
        dropped
    }

    pub fn invalidate_all(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.lock().len(),
            ttl_seconds: self.ttl_seconds,
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub ttl_seconds: u64,
}

/// SHA256 of a JSON payload, hex encoded.
pub fn compute_payload_hash(value: &serde_json::Value) -> String {
    use hex::encode;
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cache_hit() {
        let cache = QueryCache::new();
        cache
            .put(QueryKey::RecentDocuments, &vec!["a".to_string()])
            .expect("put");
        let got: Option<Vec<String>> = cache.get(&QueryKey::RecentDocuments);
        assert_eq!(got, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_ttl_zero_expires_list_but_not_document() {
        let cache = QueryCache::with_ttl(0);
        cache.put(QueryKey::AllDocuments, &1u32).expect("put");
        cache
            .put(QueryKey::Document("d1".to_string()), &2u32)
            .expect("put");

        assert_eq!(cache.get::<u32>(&QueryKey::AllDocuments), None);
        assert_eq!(cache.get::<u32>(&QueryKey::Document("d1".to_string())), Some(2));
    }

    #[test]
    fn test_put_reports_content_change() {
        let cache = QueryCache::new();
        assert_eq!(cache.put(QueryKey::Stats, &1u32).expect("put"), CacheWrite::Inserted);
        assert_eq!(cache.put(QueryKey::Stats, &1u32).expect("put"), CacheWrite::Unchanged);
        assert_eq!(cache.put(QueryKey::Stats, &2u32).expect("put"), CacheWrite::Replaced);
    }

    #[test]
    fn test_shape_mismatch_is_a_miss() {
        let cache = QueryCache::new();
        cache.put(QueryKey::Stats, &"text").expect("put");
        assert_eq!(cache.get::<u32>(&QueryKey::Stats), None);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_upload_invalidates_lists_only() {
        let cache = QueryCache::new();
        for key in [
            QueryKey::RecentDocuments,
            QueryKey::AllDocuments,
            QueryKey::Stats,
            QueryKey::Activities,
            QueryKey::Document("d1".to_string()),
            QueryKey::Courts(CourtQuery::default()),
        ] {
            cache.put(key, &0u8).expect("put");
        }
        assert_eq!(cache.invalidate_for(&Mutation::Upload), 4);
        assert!(cache.is_fresh(&QueryKey::Document("d1".to_string())));
        assert!(cache.is_fresh(&QueryKey::Courts(CourtQuery::default())));
        assert!(!cache.is_fresh(&QueryKey::RecentDocuments));
    }

    #[test]
    fn test_delete_invalidates_every_key_of_that_document() {
        let m = Mutation::Delete("d1".to_string());
        assert!(m.invalidates(&QueryKey::Analysis("d1".to_string())));
        assert!(m.invalidates(&QueryKey::Jurisdiction("d1".to_string())));
        assert!(!m.invalidates(&QueryKey::Analysis("d2".to_string())));
        assert!(!m.invalidates(&QueryKey::Courts(CourtQuery::default())));
    }

    #[test]
    fn test_jurisdiction_lookup_leaves_analysis_alone() {
        let m = Mutation::FindJurisdiction("d1".to_string());
        assert!(m.invalidates(&QueryKey::Jurisdiction("d1".to_string())));
        assert!(!m.invalidates(&QueryKey::Analysis("d1".to_string())));
        assert!(!m.invalidates(&QueryKey::AllDocuments));
    }

    #[test]
    fn test_paths_encode_ids() {
        assert_eq!(
            QueryKey::Analysis("a b/c".to_string()).path(),
            "/api/documents/a%20b%2Fc/analysis"
        );
        assert_eq!(encode_segment("dé~1"), "d%C3%A9~1");
        assert_eq!(QueryKey::RecentActivities.path(), "/api/activities/recent");
    }

    #[test]
    fn test_court_query_pairs_skip_empty_search() {
        let q = CourtQuery {
            search_term: "  ".to_string(),
            court_type: Some("district".to_string()),
            region: None,
        };
        assert_eq!(q.query_pairs(), vec![("courtType", "district")]);
    }
}
