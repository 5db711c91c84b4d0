use dashmap::DashMap;
use parking_lot::RwLock;
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use crate::election::election::{Election, ElectionId, ElectionSummary};
use crate::utils::metrics::{ELECTIONS_CREATED, METRICS};
use crate::utils::{ElectionError, Result};

/// Owns every election plus the "current" selection used when a request
/// does not name one explicitly.
pub struct ElectionManager {
    elections: DashMap<ElectionId, Arc<Election>>,
    current: RwLock<Option<ElectionId>>,
    seq: AtomicU64,
    default_difficulty: u32,
    max_difficulty: u32,
}

impl ElectionManager {
    pub fn new(default_difficulty: u32, max_difficulty: u32) -> Self {
        Self {
            elections: DashMap::new(),
            current: RwLock::new(None),
            seq: AtomicU64::new(0),
            default_difficulty: default_difficulty.min(max_difficulty),
            max_difficulty,
        }
    }

    pub fn default_difficulty(&self) -> u32 {
        self.default_difficulty
    }

    /// Create an election and make it current.
    pub fn create_election(&self, name: &str, difficulty: Option<u32>) -> Result<Arc<Election>> {
        let difficulty = difficulty.unwrap_or(self.default_difficulty);
        if difficulty > self.max_difficulty {
            return Err(ElectionError::InvalidInput(format!(
                "difficulty {difficulty} exceeds the configured maximum of {}",
                self.max_difficulty
            )));
        }
        let number = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut suffix = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut suffix);
        let id = format!("election_{number}_{}", hex::encode(suffix));

        let election = Arc::new(Election::new(id.clone(), number, name, difficulty)?);
        self.elections.insert(id.clone(), election.clone());
        *self.current.write() = Some(id.clone());

        METRICS.inc_counter(ELECTIONS_CREATED);
        info!(election = %id, name = election.name(), difficulty, "election created");
        Ok(election)
    }

    pub fn switch(&self, id: &str) -> Result<Arc<Election>> {
        let election = self.get(id)?;
        *self.current.write() = Some(id.to_string());
        info!(election = id, "switched current election");
        Ok(election)
    }

    pub fn current_id(&self) -> Option<ElectionId> {
        self.current.read().clone()
    }

    pub fn get(&self, id: &str) -> Result<Arc<Election>> {
        self.elections
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| ElectionError::NotFound(format!("election {id}")))
    }

    /// An explicit id wins; otherwise fall back to the current selection.
    pub fn resolve(&self, id: Option<&str>) -> Result<Arc<Election>> {
        match id.filter(|s| !s.is_empty()) {
            Some(id) => self.get(id),
            None => {
                let current = self
                    .current_id()
                    .ok_or_else(|| ElectionError::NotFound("no election selected".into()))?;
                self.get(&current)
            }
        }
    }

    /// Summaries in creation order.
    pub fn list(&self) -> Vec<ElectionSummary> {
        let mut all: Vec<Arc<Election>> = self.elections.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|e| e.number);
        all.iter().map(|e| e.summary()).collect()
    }

    pub fn len(&self) -> usize {
        self.elections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_sets_current_and_formats_id() {
        let m = ElectionManager::new(2, 4);
        assert!(m.current_id().is_none());
        let e = m.create_election("First", None).unwrap();
        assert!(e.id().starts_with("election_1_"));
        assert_eq!(e.id().len(), "election_1_".len() + 8);
        assert_eq!(e.difficulty(), 2);
        assert_eq!(m.current_id().as_deref(), Some(e.id()));

        let second = m.create_election("Second", Some(1)).unwrap();
        assert!(second.id().starts_with("election_2_"));
        assert_eq!(m.current_id().as_deref(), Some(second.id()));
    }

    #[test]
    fn difficulty_is_capped() {
        let m = ElectionManager::new(2, 3);
        assert!(matches!(m.create_election("x", Some(4)), Err(ElectionError::InvalidInput(_))));
        assert!(m.is_empty());
        assert_eq!(ElectionManager::new(9, 3).default_difficulty(), 3);
    }

    #[test]
    fn resolve_prefers_explicit_id() {
        let m = ElectionManager::new(1, 4);
        assert!(matches!(m.resolve(None), Err(ElectionError::NotFound(_))));
        let a = m.create_election("A", None).unwrap();
        let b = m.create_election("B", None).unwrap();
        assert_eq!(m.resolve(None).unwrap().id(), b.id());
        assert_eq!(m.resolve(Some(a.id())).unwrap().id(), a.id());
        assert_eq!(m.resolve(Some("")).unwrap().id(), b.id());
        assert!(matches!(m.resolve(Some("election_9_deadbeef")), Err(ElectionError::NotFound(_))));
    }

    #[test]
    fn switch_and_list() {
        let m = ElectionManager::new(1, 4);
        let a = m.create_election("A", None).unwrap();
        m.create_election("B", None).unwrap();
        m.switch(a.id()).unwrap();
        assert_eq!(m.current_id().as_deref(), Some(a.id()));
        assert!(matches!(m.switch("nope"), Err(ElectionError::NotFound(_))));
        let names: Vec<_> = m.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["A", "B"]);
    }
}
