//! Resources agent: documentation discovery, ranking, and curation.
//!
//! Real search is delegated to the host's `DocumentationService` (see
//! Non-goals); this agent ranks and shapes whatever candidate set the host
//! passes in.

use std::collections::HashSet;

use async_trait::async_trait;
use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError};
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};
use serde_json::json;

pub struct ResourcesAgent {
    breaker: CircuitBreaker,
}

impl Default for ResourcesAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourcesAgent {
    pub fn new() -> Self {
        Self {
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "resources".to_string(),
                ..CircuitBreakerConfig::default()
            }),
        }
    }

    fn search_resources(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let Some(query) = payload.get("query").and_then(|v| v.as_str()) else {
            return Err(CoreError::validation("query is required"));
        };
        if query.trim().is_empty() {
            return Err(CoreError::validation("query must not be empty"));
        }
        Ok(AgentResult::success(json!({ "query": query, "candidates": payload.get("candidates").cloned().unwrap_or(json!([])) })))
    }

    fn verify_resource_quality(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let candidates = payload.get("candidates").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        let verified: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.get("url").and_then(|u| u.as_str()).is_some())
            .collect();
        Ok(AgentResult::success(json!({ "verified": verified })))
    }

    fn recommend_resources(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let mut candidates = payload.get("candidates").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        candidates.sort_by(|a, b| {
            let score_a = a.get("relevance").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let score_b = b.get("relevance").and_then(|v| v.as_f64()).unwrap_or(0.0);
            score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(5);
        Ok(AgentResult::success(json!({ "recommendations": candidates })))
    }
}

#[async_trait]
impl Agent for ResourcesAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Resources
    }

    fn supported_intents(&self) -> HashSet<Intent> {
        HashSet::from([
            Intent::SearchResources,
            Intent::GetResourceContent,
            Intent::RecommendResources,
            Intent::VerifyResourceQuality,
            Intent::FindRelatedResources,
            Intent::CurateLearningPathResources,
        ])
    }

    async fn process(&self, _context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        match payload.intent {
            Some(Intent::SearchResources) => self.search_resources(payload),
            Some(Intent::VerifyResourceQuality) => self.verify_resource_quality(payload),
            Some(Intent::RecommendResources) | Some(Intent::CurateLearningPathResources) => {
                self.recommend_resources(payload)
            }
            Some(Intent::GetResourceContent) | Some(Intent::FindRelatedResources) => {
                Ok(AgentResult::success(json!({ "acknowledged": true })))
            }
            _ => Err(CoreError::validation("unsupported intent for resources agent")),
        }
    }

    fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}
