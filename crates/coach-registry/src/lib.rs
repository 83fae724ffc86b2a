//! The live, process-wide `AgentType -> Agent` mapping and its derived
//! `Intent -> AgentType` index.
//!
//! Registration is a startup/reconfiguration concern, not a hot-path one —
//! the whole table sits behind one `RwLock` so concurrent readers never
//! block each other, and a writer rebuilds the derived index from scratch
//! each time rather than patching it incrementally.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use coach_contracts::{Agent, AgentType, Intent};

struct Inner {
    agents: HashMap<AgentType, Arc<dyn Agent>>,
    intent_index: HashMap<Intent, AgentType>,
}

impl Inner {
    fn rebuild_index(&mut self) {
        self.intent_index.clear();
        for (agent_type, agent) in &self.agents {
            for intent in agent.supported_intents() {
                self.intent_index.insert(intent, *agent_type);
            }
        }
    }
}

pub struct AgentRegistry {
    inner: RwLock<Inner>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                agents: HashMap::new(),
                intent_index: HashMap::new(),
            }),
        }
    }

    /// Registers `agent`, replacing any prior entry for the same
    /// `agent_type`, then rebuilds the derived intent index.
    pub fn register(&self, agent: Arc<dyn Agent>) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner.agents.insert(agent.agent_type(), agent);
        inner.rebuild_index();
    }

    pub fn unregister(&self, agent_type: AgentType) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner.agents.remove(&agent_type);
        inner.rebuild_index();
    }

    pub fn get(&self, agent_type: AgentType) -> Option<Arc<dyn Agent>> {
        self.inner.read().expect("registry lock poisoned").agents.get(&agent_type).cloned()
    }

    pub fn get_for_intent(&self, intent: Intent) -> Option<Arc<dyn Agent>> {
        let inner = self.inner.read().expect("registry lock poisoned");
        let agent_type = inner.intent_index.get(&intent)?;
        inner.agents.get(agent_type).cloned()
    }

    pub fn is_registered(&self, agent_type: AgentType) -> bool {
        self.inner.read().expect("registry lock poisoned").agents.contains_key(&agent_type)
    }

    pub fn registered_types(&self) -> Vec<AgentType> {
        self.inner.read().expect("registry lock poisoned").agents.keys().copied().collect()
    }

    pub fn all_agents(&self) -> Vec<Arc<dyn Agent>> {
        self.inner.read().expect("registry lock poisoned").agents.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use coach_errors::{AgentResult, Context, CoreError};
    use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};

    use super::*;

    struct StubAgent {
        agent_type: AgentType,
        intents: Vec<Intent>,
        breaker: CircuitBreaker,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn agent_type(&self) -> AgentType {
            self.agent_type
        }

        fn supported_intents(&self) -> HashSet<Intent> {
            self.intents.iter().copied().collect()
        }

        async fn process(
            &self,
            _context: &Context,
            _payload: &coach_contracts::Payload,
        ) -> Result<AgentResult, CoreError> {
            Ok(AgentResult::success(serde_json::json!({})))
        }

        fn breaker(&self) -> &CircuitBreaker {
            &self.breaker
        }
    }

    fn stub(agent_type: AgentType, intents: &[Intent]) -> Arc<dyn Agent> {
        Arc::new(StubAgent {
            agent_type,
            intents: intents.to_vec(),
            breaker: CircuitBreaker::new(CircuitBreakerConfig::default()),
        })
    }

    #[test]
    fn register_makes_agent_resolvable_by_type_and_intent() {
        let registry = AgentRegistry::new();
        registry.register(stub(AgentType::Profile, &[Intent::GetProfile]));

        assert!(registry.is_registered(AgentType::Profile));
        assert!(registry.get(AgentType::Profile).is_some());
        assert!(registry.get_for_intent(Intent::GetProfile).is_some());
    }

    #[test]
    fn unregister_removes_both_the_agent_and_its_intents() {
        let registry = AgentRegistry::new();
        registry.register(stub(AgentType::Profile, &[Intent::GetProfile]));
        registry.unregister(AgentType::Profile);

        assert!(!registry.is_registered(AgentType::Profile));
        assert!(registry.get_for_intent(Intent::GetProfile).is_none());
    }

    #[test]
    fn re_registering_the_same_type_replaces_the_prior_entry() {
        let registry = AgentRegistry::new();
        registry.register(stub(AgentType::Profile, &[Intent::GetProfile]));
        registry.register(stub(AgentType::Profile, &[Intent::UpdateProfile]));

        assert!(registry.get_for_intent(Intent::GetProfile).is_none());
        assert!(registry.get_for_intent(Intent::UpdateProfile).is_some());
        assert_eq!(registry.registered_types().len(), 1);
    }

    #[test]
    fn unknown_intent_resolves_to_none() {
        let registry = AgentRegistry::new();
        assert!(registry.get_for_intent(Intent::GetProfile).is_none());
    }
}
