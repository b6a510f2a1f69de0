use async_trait::async_trait;
use ohmytime_protocol::{LocationIndex, LocationRecord, ProtocolError, RecordId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// Build a record whose language tag equals its region.
pub fn record(id: &str, name: &str, body: &str, timezone: &str) -> LocationRecord {
    LocationRecord {
        id: id.to_string(),
        name: name.to_string(),
        body: body.to_string(),
        timezone: timezone.to_string(),
        lang: body.to_string(),
    }
}

/// In-memory index with scripted hits and call recording.
///
/// Without a scripted hit list, a query matches records whose name equals it
/// case-insensitively, in insertion order.
#[derive(Default)]
pub struct StubIndex {
    records: Vec<LocationRecord>,
    hits: HashMap<String, Vec<RecordId>>,
    fail_search: bool,
    delay: Option<Duration>,
    searches: Mutex<Vec<String>>,
    fetches: Mutex<Vec<String>>,
}

impl StubIndex {
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Script the hits returned for a query.
    pub fn with_hits(mut self, query: impl Into<String>, ids: Vec<&str>) -> Self {
        self.hits
            .insert(query.into(), ids.into_iter().map(str::to_string).collect());
        self
    }

    /// Make every search fail.
    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Sleep before answering each search.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl LocationIndex for StubIndex {
    async fn search(&self, query: &str) -> Result<Vec<RecordId>, ProtocolError> {
        self.searches.lock().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_search {
            return Err(ProtocolError::IndexUnavailable("stub failure".to_string()));
        }
        if let Some(ids) = self.hits.get(query) {
            return Ok(ids.clone());
        }
        Ok(self
            .records
            .iter()
            .filter(|record| record.name.eq_ignore_ascii_case(query))
            .map(|record| record.id.clone())
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<LocationRecord, ProtocolError> {
        self.fetches.lock().push(id.to_string());
        self.records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| ProtocolError::RecordNotFound(id.to_string()))
    }
}
