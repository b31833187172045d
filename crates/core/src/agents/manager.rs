//! Agent manager for a single crew run.
//!
//! The `AgentManager` is responsible for:
//! - Holding the run's agents in pipeline order
//! - Looking up agents by key
//! - Resolving a free-form coworker name picked by the crew manager

use crate::agents::base::{Agent, AgentError, AgentEventStream, ExecutionContext};
use std::sync::Arc;

/// Registry of the agents taking part in a run.
#[derive(Default)]
pub struct AgentManager {
    agents: Vec<Arc<dyn Agent>>,
}

impl AgentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. A later agent with the same key replaces the earlier one.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        match self.agents.iter_mut().find(|a| a.key() == agent.key()) {
            Some(slot) => *slot = agent,
            None => self.agents.push(agent),
        }
    }

    /// Get an agent by key.
    pub fn get_agent(&self, key: &str) -> Option<Arc<dyn Agent>> {
        self.agents.iter().find(|a| a.key() == key).cloned()
    }

    /// Resolve a coworker named in free text.
    ///
    /// An exact, case-insensitive match on key or role wins. Otherwise the
    /// agent whose key or role is mentioned earliest in the text is chosen;
    /// on a tie (one name containing another) the longer name wins.
    pub fn find_coworker(&self, reply: &str) -> Option<Arc<dyn Agent>> {
        let wanted = reply
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(agent) = self
            .agents
            .iter()
            .find(|a| names_of(a.as_ref()).contains(&wanted))
        {
            return Some(agent.clone());
        }

        let text = reply.to_lowercase();
        self.agents
            .iter()
            .filter_map(|agent| {
                names_of(agent.as_ref())
                    .into_iter()
                    .filter(|name| !name.is_empty())
                    .filter_map(|name| text.find(name.as_str()).map(|at| (at, name.len())))
                    .min_by_key(|&(at, len)| (at, std::cmp::Reverse(len)))
                    .map(|(at, len)| (at, len, agent))
            })
            .min_by_key(|&(at, len, _)| (at, std::cmp::Reverse(len)))
            .map(|(_, _, agent)| agent.clone())
    }

    /// Execute an instruction with the agent registered under `key`.
    pub async fn execute(
        &self,
        key: &str,
        context: &ExecutionContext,
    ) -> Result<AgentEventStream, AgentError> {
        match self.get_agent(key) {
            Some(agent) => agent.execute(context).await,
            None => Err(AgentError::NotFound(format!(
                "Agent '{}' not found in registry",
                key
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Agent>> {
        self.agents.iter()
    }
}

fn names_of(agent: &dyn Agent) -> [String; 2] {
    [agent.key().trim().to_lowercase(), agent.role().trim().to_lowercase()]
}

impl FromIterator<Arc<dyn Agent>> for AgentManager {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Agent>>>(iter: I) -> Self {
        let mut manager = Self::new();
        for agent in iter {
            manager.register(agent);
        }
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::base::AgentEvent;
    use async_trait::async_trait;
    use tokio_stream::StreamExt;

    struct StubAgent {
        key: &'static str,
        role: &'static str,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn key(&self) -> &str {
            self.key
        }

        fn role(&self) -> &str {
            self.role
        }

        async fn execute(&self, _context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
            let answer = format!("{} done", self.key);
            Ok(Box::pin(tokio_stream::iter(vec![Ok(AgentEvent::Completed(answer))])))
        }
    }

    fn manager() -> AgentManager {
        [
            ("researcher", "Senior Data Researcher"),
            ("analyst", "Analyst"),
            ("coding_agent", "Developer"),
            ("overlord", "Project Manager"),
        ]
        .into_iter()
        .map(|(key, role)| Arc::new(StubAgent { key, role }) as Arc<dyn Agent>)
        .collect()
    }

    fn keys(manager: &AgentManager) -> Vec<&str> {
        manager.iter().map(|a| a.key()).collect()
    }

    #[test]
    fn test_register_keeps_pipeline_order() {
        let manager = manager();
        assert_eq!(keys(&manager), vec!["researcher", "analyst", "coding_agent", "overlord"]);
        assert!(manager.get_agent("analyst").is_some());
        assert!(manager.get_agent("ghost").is_none());
    }

    #[test]
    fn test_register_replaces_same_key() {
        let mut manager = manager();
        manager.register(Arc::new(StubAgent {
            key: "analyst",
            role: "Lead Analyst",
        }));
        assert_eq!(keys(&manager).len(), 4);
        let analyst = manager.get_agent("analyst").expect("registered");
        assert_eq!(analyst.role(), "Lead Analyst");
    }

    #[test]
    fn test_find_coworker_exact() {
        let manager = manager();
        let pick = |reply: &str| manager.find_coworker(reply).map(|a| a.key().to_string());

        assert_eq!(pick("coding_agent").as_deref(), Some("coding_agent"));
        assert_eq!(pick("  DEVELOPER. ").as_deref(), Some("coding_agent"));
        assert_eq!(pick("\"Project Manager\"").as_deref(), Some("overlord"));
    }

    #[test]
    fn test_find_coworker_in_sentence() {
        let manager = manager();
        let agent = manager
            .find_coworker("I would give this to the Senior Data Researcher because...")
            .expect("should match");
        assert_eq!(agent.key(), "researcher");
    }

    #[test]
    fn test_find_coworker_prefers_first_mention() {
        let manager = manager();
        let pick = |reply: &str| manager.find_coworker(reply).map(|a| a.key().to_string());

        assert_eq!(
            pick("coding_agent should implement this, building on what the analyst produced.")
                .as_deref(),
            Some("coding_agent")
        );
        assert_eq!(
            pick("The Project Manager, not the Senior Data Researcher.").as_deref(),
            Some("overlord")
        );
    }

    #[test]
    fn test_find_coworker_no_match() {
        let manager = manager();
        assert!(manager.find_coworker("nobody fits").is_none());
        assert!(manager.find_coworker("  ...  ").is_none());
    }

    #[tokio::test]
    async fn test_execute_by_key() {
        let manager = manager();
        let context = ExecutionContext::new("test instruction".to_string());

        let stream = manager.execute("overlord", &context).await.unwrap();
        let events: Vec<_> = stream.collect().await;
        assert_eq!(events, vec![Ok(AgentEvent::Completed("overlord done".to_string()))]);
    }

    #[tokio::test]
    async fn test_execute_not_found() {
        let manager = manager();
        let context = ExecutionContext::new("test instruction".to_string());

        let result = manager.execute("nonexistent", &context).await;
        assert!(matches!(result, Err(AgentError::NotFound(_))));
    }
}
