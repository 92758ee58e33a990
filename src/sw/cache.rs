use super::SwResponse;
use std::collections::HashMap;

/// Named-bucket response store, one bucket per deployed version. Stands in
/// for the browser's Cache Storage API.
#[derive(Debug, Default)]
pub struct CacheStorage {
    buckets: HashMap<String, HashMap<String, SwResponse>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-if-absent.
    pub fn open(&mut self, name: &str) {
        self.buckets.entry(name.to_string()).or_default();
    }

    pub fn names(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.buckets.remove(name).is_some()
    }

    pub fn put(&mut self, bucket: &str, url: &str, response: SwResponse) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    pub fn match_url(&self, bucket: &str, url: &str) -> Option<&SwResponse> {
        self.buckets.get(bucket)?.get(url)
    }

    pub fn len(&self, bucket: &str) -> usize {
        self.buckets.get(bucket).map(HashMap::len).unwrap_or(0)
    }
}
