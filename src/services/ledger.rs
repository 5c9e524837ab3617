//! Mission history storage

use ahash::AHashMap;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::types::PlayerId;
use crate::espionage::result::MissionResult;

/// Durable home for resolved missions
///
/// The store assigns each mission its id. Lookups return newest missions first.
pub trait MissionStore {
    fn record(&mut self, result: MissionResult) -> Result<Uuid>;

    fn get(&self, id: Uuid) -> Option<&MissionResult>;

    /// Missions launched by `attacker`, newest first
    fn by_attacker(&self, attacker: PlayerId, limit: usize) -> Vec<MissionResult>;

    /// Missions aimed at `target`, newest first
    fn by_target(&self, target: PlayerId, limit: usize) -> Vec<MissionResult>;
}

/// Mission log kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryMissionLog {
    missions: Vec<MissionResult>,
    ids: AHashMap<Uuid, usize>,
    by_attacker: AHashMap<PlayerId, Vec<usize>>,
    by_target: AHashMap<PlayerId, Vec<usize>>,
}

impl InMemoryMissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    fn newest_first(&self, indices: Option<&Vec<usize>>, limit: usize) -> Vec<MissionResult> {
        let Some(indices) = indices else {
            return Vec::new();
        };

        let mut ordered: Vec<usize> = indices.clone();
        // Later insertions win ties on identical timestamps
        ordered.sort_by(|&a, &b| {
            let (ra, rb) = (&self.missions[a], &self.missions[b]);
            rb.resolved_at().cmp(&ra.resolved_at()).then(b.cmp(&a))
        });

        ordered
            .into_iter()
            .take(limit)
            .map(|i| self.missions[i].clone())
            .collect()
    }
}

impl MissionStore for InMemoryMissionLog {
    fn record(&mut self, result: MissionResult) -> Result<Uuid> {
        let index = self.missions.len();
        let id = Uuid::new_v4();
        self.ids.insert(id, index);
        self.by_attacker
            .entry(result.attacker().id)
            .or_default()
            .push(index);
        self.by_target.entry(result.target().id).or_default().push(index);

        tracing::debug!(
            mission = %id,
            attacker = %result.attacker().id,
            target = %result.target().id,
            "Recorded mission"
        );
        self.missions.push(result);
        Ok(id)
    }

    fn get(&self, id: Uuid) -> Option<&MissionResult> {
        self.ids.get(&id).map(|&i| &self.missions[i])
    }

    fn by_attacker(&self, attacker: PlayerId, limit: usize) -> Vec<MissionResult> {
        self.newest_first(self.by_attacker.get(&attacker), limit)
    }

    fn by_target(&self, target: PlayerId, limit: usize) -> Vec<MissionResult> {
        self.newest_first(self.by_target.get(&target), limit)
    }
}
