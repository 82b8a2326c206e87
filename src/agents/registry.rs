use crate::agents::{AgentId, AiAgent};
use indexmap::IndexMap;
use std::ops::{Deref, DerefMut};

/// Just a storage for AI agents used across the simulation.
///
/// This wraps an internal IndexMap<AgentId, AiAgent> but hides the concrete
/// map type from end-users, allowing to evolve internals without breaking
/// public APIs. Insertion order is preserved, which keeps agent iteration
/// (and therefore tick results) deterministic for a fixed input sequence.
/// It implements Deref/DerefMut to the underlying map so it can be passed to
/// functions that expect `&IndexMap<AgentId, AiAgent>` or the mutable form.
#[derive(Debug, Default)]
pub struct AgentsRegistry(IndexMap<AgentId, AiAgent>);

impl AgentsRegistry {
    /// Create empty agents registry
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert an agent by its id (agent.id is used as the key)
    pub fn insert_agent(&mut self, agent: AiAgent) {
        let id = agent.id;
        self.0.insert(id, agent);
    }

    /// Removes an agent while preserving the iteration order of the rest.
    /// Returns the removed agent if it was present.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<AiAgent> {
        // shift_remove keeps order stable; swap_remove would make tick
        // iteration depend on removal history.
        self.0.shift_remove(&id)
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Immutable iterator over (&AgentId, &AiAgent)
    pub fn iter(&self) -> indexmap::map::Iter<'_, AgentId, AiAgent> {
        self.0.iter()
    }

    /// Mutable iterator over (&AgentId, &mut AiAgent)
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, AgentId, AiAgent> {
        self.0.iter_mut()
    }

    /// Convenience: values iterator
    pub fn values(&self) -> indexmap::map::Values<'_, AgentId, AiAgent> {
        self.0.values()
    }

    /// Convenience: mutable values iterator
    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, AgentId, AiAgent> {
        self.0.values_mut()
    }
}

// Allow transparent access to IndexMap API and deref-coercions in function calls
impl Deref for AgentsRegistry {
    type Target = IndexMap<AgentId, AiAgent>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for AgentsRegistry {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// Make `for (id, a) in &registry { .. }` work like for &IndexMap
impl<'a> IntoIterator for &'a AgentsRegistry {
    type Item = (&'a AgentId, &'a AiAgent);
    type IntoIter = indexmap::map::Iter<'a, AgentId, AiAgent>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Mutable iteration with `for (id, a) in &mut registry { .. }`
impl<'a> IntoIterator for &'a mut AgentsRegistry {
    type Item = (&'a AgentId, &'a mut AiAgent);
    type IntoIter = indexmap::map::IterMut<'a, AgentId, AiAgent>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AiAgent;

    #[test]
    fn test_insert_and_remove_preserves_order() {
        let mut registry = AgentsRegistry::new();
        for id in [3u64, 1, 7, 5] {
            registry.insert_agent(AiAgent::new(id).build());
        }
        registry.remove_agent(1);
        let order: Vec<AgentId> = registry.keys().copied().collect();
        assert_eq!(order, vec![3, 7, 5], "Removal must not reorder agents");
    }

    #[test]
    fn test_deref_to_indexmap() {
        let mut registry = AgentsRegistry::new();
        registry.insert_agent(AiAgent::new(42).build());
        assert!(registry.contains_key(&42));
        assert_eq!(registry.len(), 1);
    }
}
