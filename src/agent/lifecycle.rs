use super::api::{AgentObject, AgentsApi, ClientFactory, PromptAgentDefinition};
use super::response::extract_output_text;
use super::{AgentSummary, CreatedAgent};
use crate::error::{FoundryError, Result};
use crate::prompt::Prompter;

/// What to create; display fields are carried into the result
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub description: String,
    pub resource_group: String,
    pub project_name: String,
}

/// Agent operations against a single project endpoint
pub struct AgentLifecycle {
    factory: Box<dyn ClientFactory>,
    client: Option<Box<dyn AgentsApi>>,
    /// Total create attempts when names collide; 0 means unbounded
    max_name_attempts: u32,
}

impl AgentLifecycle {
    pub fn new(factory: Box<dyn ClientFactory>, max_name_attempts: u32) -> Self {
        Self {
            factory,
            client: None,
            max_name_attempts,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.factory.endpoint()
    }

    fn client(&mut self) -> Result<&dyn AgentsApi> {
        if self.client.is_none() {
            self.client = Some(self.factory.connect()?);
        }
        self.client
            .as_deref()
            .ok_or_else(|| FoundryError::InvalidConfig("agents client unavailable".to_string()))
    }

    /// Drop the current client so a stale handle is never reused
    fn reconnect(&mut self) -> Result<()> {
        self.client = Some(self.factory.connect()?);
        Ok(())
    }

    /// Create a prompt agent, asking for a new name on collisions, then
    /// confirm it exists with an independent read.
    pub fn create(
        &mut self,
        request: &CreateRequest,
        prompter: &mut dyn Prompter,
    ) -> Result<CreatedAgent> {
        println!("\n📦 Creating agent '{}'...", request.name);
        println!("   Model: {}", request.model);

        let definition = PromptAgentDefinition::new(&request.model, &request.instructions);
        let mut current = request.name.clone();
        let mut attempts: u32 = 0;

        let created = loop {
            attempts += 1;
            let result = self
                .client()?
                .create_agent(&current, &request.description, &definition);

            match result {
                Ok(agent) => break agent,
                Err(FoundryError::NameConflict(_)) => {
                    println!("\n⚠️  Agent '{}' already exists.", current);
                    if self.max_name_attempts > 0 && attempts >= self.max_name_attempts {
                        tracing::warn!(attempts, "giving up after repeated name conflicts");
                        return Err(FoundryError::NameConflict(current));
                    }

                    let answer = prompter.ask("Enter a different name (or 'q' to cancel): ");
                    match answer {
                        Some(name) if !name.is_empty() && !name.eq_ignore_ascii_case("q") => {
                            current = name;
                        }
                        _ => {
                            return Err(FoundryError::Cancelled(format!(
                                "Agent creation cancelled - name '{}' already exists.",
                                current
                            )))
                        }
                    }

                    println!("\n📦 Trying with name '{}'...", current);
                    self.reconnect()?;
                }
                Err(e) => return Err(e),
            }
        };

        let verified = self.verify(&current)?;
        println!("\n✅ Verified agent '{}' exists", current);

        let agent_id = created
            .id
            .filter(|id| !id.is_empty())
            .or(verified.id)
            .unwrap_or_default();

        Ok(CreatedAgent {
            agent_id,
            name: created.name.unwrap_or(current),
            model: request.model.clone(),
            endpoint: self.endpoint().to_string(),
            resource_group: request.resource_group.clone(),
            project_name: request.project_name.clone(),
        })
    }

    fn verify(&mut self, name: &str) -> Result<AgentObject> {
        match self.client()?.get_agent(name) {
            Ok(agent) if agent.has_id() => Ok(agent),
            Ok(_) => Err(FoundryError::Verification(
                name.to_string(),
                "creation could not be verified".to_string(),
            )),
            Err(e) => Err(FoundryError::Verification(name.to_string(), e.to_string())),
        }
    }

    pub fn get(&mut self, name: &str) -> Result<AgentObject> {
        self.client()?.get_agent(name)
    }

    /// Existing agents; failures are logged and yield an empty list
    pub fn list(&mut self) -> Vec<AgentSummary> {
        match self.client().and_then(|c| c.list_agents()) {
            Ok(agents) => agents.into_iter().map(AgentSummary::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "could not list agents");
                Vec::new()
            }
        }
    }

    /// Best-effort delete; `false` if it failed
    pub fn delete(&mut self, id: &str) -> bool {
        match self.client().and_then(|c| c.delete_agent(id)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(id, error = %e, "could not delete agent");
                false
            }
        }
    }

    /// One exchange with the agent, propagating failures
    pub fn chat(&mut self, agent_name: &str, message: &str) -> Result<String> {
        let response = self.client()?.create_response(agent_name, message)?;
        Ok(extract_output_text(&response))
    }

    /// One exchange with the agent; failures come back as the reply text
    pub fn test(&mut self, agent_name: &str, message: &str) -> String {
        self.chat(agent_name, message)
            .unwrap_or_else(|e| format!("Error: {}", e))
    }
}
