#![allow(dead_code)]

use foundry_agent::agent::{AgentObject, AgentsApi, ClientFactory, PromptAgentDefinition};
use foundry_agent::azure::{
    AzureProject, AzureResource, ControlPlane, ModelDeployment, Provisioner, QuotaUsage,
    SignedInUser, Subscription,
};
use foundry_agent::commands::test::{LineReader, ReadLine};
use foundry_agent::error::{FoundryError, Result};
use foundry_agent::prompt::Prompter;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub fn project(resource: &str, name: &str) -> AzureProject {
    AzureProject {
        name: name.to_string(),
        resource_name: resource.to_string(),
        resource_group: "rg".to_string(),
        location: "eastus".to_string(),
    }
}

pub fn deployment(name: &str, model: &str) -> ModelDeployment {
    ModelDeployment {
        deployment_name: name.to_string(),
        model_name: model.to_string(),
        version: "2024-07-18".to_string(),
    }
}

pub fn usage(name: &str, current: i64, limit: i64) -> QuotaUsage {
    QuotaUsage {
        name: name.to_string(),
        current_value: current,
        limit,
    }
}

/// Deployments shared between the control plane and the provisioner
pub type SharedDeployments = Rc<RefCell<Vec<ModelDeployment>>>;

pub struct MockPlane {
    pub projects: Vec<AzureProject>,
    pub deployments: SharedDeployments,
    /// `None` makes the usage query fail
    pub usages: Option<Vec<QuotaUsage>>,
    pub logged_in: bool,
    pub user: Option<SignedInUser>,
    pub roles: Vec<String>,
    pub deployment_queries: RefCell<usize>,
}

impl MockPlane {
    pub fn new(projects: Vec<AzureProject>, deployments: Vec<ModelDeployment>) -> Self {
        Self {
            projects,
            deployments: Rc::new(RefCell::new(deployments)),
            usages: Some(Vec::new()),
            logged_in: true,
            user: Some(SignedInUser {
                id: "00000000-user".to_string(),
                upn: Some("dev@contoso.com".to_string()),
            }),
            roles: vec!["Azure AI User".to_string()],
            deployment_queries: RefCell::new(0),
        }
    }

    pub fn with_usages(mut self, usages: Option<Vec<QuotaUsage>>) -> Self {
        self.usages = usages;
        self
    }
}

impl ControlPlane for MockPlane {
    fn cli_version(&self) -> Result<String> {
        Ok("azure-cli 2.67.0".to_string())
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn login_device_code(&self) -> Result<bool> {
        Ok(true)
    }

    fn subscription(&self) -> Result<Subscription> {
        Ok(Subscription {
            name: "Dev".to_string(),
            id: "sub-1".to_string(),
        })
    }

    fn list_resources(&self, _filter: &str) -> Result<Vec<AzureResource>> {
        Ok(Vec::new())
    }

    fn list_projects(&self, filter: &str) -> Result<Vec<AzureProject>> {
        Ok(self
            .projects
            .iter()
            .filter(|p| {
                foundry_agent::azure::matches_filter(
                    filter,
                    &[p.resource_name.as_str(), p.name.as_str(), p.resource_group.as_str()],
                )
            })
            .cloned()
            .collect())
    }

    fn list_deployments(&self, _resource_name: &str, _resource_group: &str) -> Vec<ModelDeployment> {
        *self.deployment_queries.borrow_mut() += 1;
        self.deployments.borrow().clone()
    }

    fn api_key(&self, _resource_name: &str, _resource_group: &str) -> Option<String> {
        None
    }

    fn quota_usages(&self, _location: &str) -> Result<Vec<QuotaUsage>> {
        self.usages
            .clone()
            .ok_or_else(|| FoundryError::tool("az", "usage query failed"))
    }

    fn signed_in_user(&self) -> Option<SignedInUser> {
        self.user.clone()
    }

    fn role_assignments(&self, _user_id: &str, _scope: &str) -> Vec<String> {
        self.roles.clone()
    }
}

/// Records deploy calls and adds `adds` to the shared deployments on success
pub struct MockProvisioner {
    pub deployments: SharedDeployments,
    pub adds: Vec<ModelDeployment>,
    pub succeed: bool,
    pub calls: RefCell<Vec<(String, String)>>,
}

impl MockProvisioner {
    pub fn new(plane: &MockPlane, adds: Vec<ModelDeployment>, succeed: bool) -> Self {
        Self {
            deployments: Rc::clone(&plane.deployments),
            adds,
            succeed,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Provisioner for MockProvisioner {
    fn deploy(&self, resource_name: &str, model: &str) -> bool {
        self.calls
            .borrow_mut()
            .push((resource_name.to_string(), model.to_string()));
        if self.succeed {
            self.deployments.borrow_mut().extend(self.adds.clone());
        }
        self.succeed
    }
}

/// Answers prompts from queues; an unexpected prompt panics
#[derive(Default)]
pub struct ScriptedPrompter {
    pub choices: VecDeque<Option<usize>>,
    pub confirms: VecDeque<bool>,
    pub answers: VecDeque<Option<String>>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_confirms(confirms: &[bool]) -> Self {
        Self {
            confirms: confirms.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn with_choices(choices: &[Option<usize>]) -> Self {
        Self {
            choices: choices.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn with_answers(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Self::default()
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.choices.is_empty() && self.confirms.is_empty() && self.answers.is_empty()
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, prompt: &str, items: &[String]) -> Option<usize> {
        self.asked.push(prompt.to_string());
        let choice = self
            .choices
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected choice prompt: {}", prompt));
        choice.filter(|i| *i < items.len())
    }

    fn confirm(&mut self, question: &str, _default: bool) -> bool {
        self.asked.push(question.to_string());
        self.confirms
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected confirmation: {}", question))
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected question: {}", prompt))
    }
}

#[derive(Default)]
pub struct AgentStore {
    pub existing: Vec<String>,
    /// (client handle, name, description, model)
    pub creates: Vec<(usize, String, String, String)>,
    pub connects: usize,
    /// Read-back returns an agent without an id
    pub unverifiable: bool,
    pub fail_list: bool,
    pub reply: Value,
    pub deleted: Vec<String>,
    /// Messages sent through `create_response`
    pub messages: Vec<String>,
}

pub type SharedStore = Rc<RefCell<AgentStore>>;

pub struct MockAgents {
    handle: usize,
    store: SharedStore,
}

impl AgentsApi for MockAgents {
    fn create_agent(
        &self,
        name: &str,
        description: &str,
        definition: &PromptAgentDefinition,
    ) -> Result<AgentObject> {
        let mut store = self.store.borrow_mut();
        store.creates.push((
            self.handle,
            name.to_string(),
            description.to_string(),
            definition.model.clone(),
        ));
        if store.existing.iter().any(|n| n == name) {
            return Err(FoundryError::NameConflict(name.to_string()));
        }
        store.existing.push(name.to_string());
        Ok(AgentObject {
            id: Some(name.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    fn get_agent(&self, name: &str) -> Result<AgentObject> {
        let store = self.store.borrow();
        if !store.existing.iter().any(|n| n == name) {
            return Err(FoundryError::Http {
                status: 404,
                body: format!("Agent {} not found", name),
            });
        }
        Ok(AgentObject {
            id: (!store.unverifiable).then(|| name.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    fn list_agents(&self) -> Result<Vec<AgentObject>> {
        let store = self.store.borrow();
        if store.fail_list {
            return Err(FoundryError::Http {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(store
            .existing
            .iter()
            .map(|n| AgentObject {
                id: Some(n.clone()),
                name: Some(n.clone()),
                versions: Some(json!({"latest": {"definition": {"model": "gpt-4o-mini"}}})),
                ..Default::default()
            })
            .collect())
    }

    fn delete_agent(&self, id: &str) -> Result<()> {
        let mut store = self.store.borrow_mut();
        let before = store.existing.len();
        store.existing.retain(|n| n != id);
        if store.existing.len() == before {
            return Err(FoundryError::Http {
                status: 404,
                body: "not found".to_string(),
            });
        }
        store.deleted.push(id.to_string());
        Ok(())
    }

    fn create_response(&self, agent_name: &str, message: &str) -> Result<Value> {
        let mut store = self.store.borrow_mut();
        store.messages.push(message.to_string());
        if !store.existing.iter().any(|n| n == agent_name) {
            return Err(FoundryError::Http {
                status: 404,
                body: format!("Agent {} not found", agent_name),
            });
        }
        Ok(store.reply.clone())
    }
}

pub struct MockFactory {
    pub endpoint: String,
    pub store: SharedStore,
}

impl MockFactory {
    pub fn new(store: &SharedStore) -> Self {
        Self {
            endpoint: "https://r.services.ai.azure.com/api/projects/p".to_string(),
            store: Rc::clone(store),
        }
    }
}

impl ClientFactory for MockFactory {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connect(&self) -> Result<Box<dyn AgentsApi>> {
        let handle = {
            let mut store = self.store.borrow_mut();
            store.connects += 1;
            store.connects
        };
        Ok(Box::new(MockAgents {
            handle,
            store: Rc::clone(&self.store),
        }))
    }
}

pub fn store_with(existing: &[&str]) -> SharedStore {
    Rc::new(RefCell::new(AgentStore {
        existing: existing.iter().map(|s| s.to_string()).collect(),
        reply: json!({"output": [{"type": "message", "content": [{"type": "output_text", "text": "Arrr!"}]}]}),
        ..Default::default()
    }))
}

/// Chat input fed from a fixed script, ending with `end`
pub struct ScriptedReader {
    pub lines: VecDeque<ReadLine>,
    pub prompts: usize,
}

impl ScriptedReader {
    pub fn new(lines: &[&str], end: ReadLine) -> Self {
        let mut lines: VecDeque<ReadLine> =
            lines.iter().map(|l| ReadLine::Line(l.to_string())).collect();
        lines.push_back(end);
        Self { lines, prompts: 0 }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadLine> {
        self.prompts += 1;
        Ok(self.lines.pop_front().unwrap_or(ReadLine::Eof))
    }
}
