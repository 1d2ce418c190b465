mod common;

use common::{store_with, MockFactory, ScriptedPrompter};
use foundry_agent::agent::{sidecar, AgentLifecycle, CreateRequest};
use foundry_agent::error::FoundryError;
use serde_json::json;

fn request(name: &str) -> CreateRequest {
    CreateRequest {
        model: "gpt-4o-mini".to_string(),
        name: name.to_string(),
        instructions: "Talk like a pirate.".to_string(),
        description: "Pirate".to_string(),
        resource_group: "rg".to_string(),
        project_name: "proj".to_string(),
    }
}

#[test]
fn test_create_and_verify() {
    let store = store_with(&[]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);
    let mut prompter = ScriptedPrompter::silent();

    let created = lifecycle.create(&request("bot"), &mut prompter).unwrap();
    assert_eq!(created.name, "bot");
    assert_eq!(created.agent_id, "bot");
    assert_eq!(created.model, "gpt-4o-mini");
    assert_eq!(created.project_name, "proj");
    assert_eq!(
        created.endpoint,
        "https://r.services.ai.azure.com/api/projects/p"
    );

    let store = store.borrow();
    assert_eq!(store.creates.len(), 1);
    assert_eq!(store.creates[0].2, "Pirate");
}

#[test]
fn test_name_conflict_retries_once_with_fresh_client() {
    let store = store_with(&["bot"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);
    let mut prompter = ScriptedPrompter::with_answers(&[Some("bot-2")]);

    let created = lifecycle.create(&request("bot"), &mut prompter).unwrap();
    assert_eq!(created.name, "bot-2");
    assert!(prompter.is_exhausted());

    let store = store.borrow();
    let names: Vec<&str> = store.creates.iter().map(|c| c.1.as_str()).collect();
    assert_eq!(names, vec!["bot", "bot-2"]);
    assert_ne!(store.creates[0].0, store.creates[1].0);
}

#[test]
fn test_name_conflict_cancelled_with_q() {
    let store = store_with(&["bot"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);
    let mut prompter = ScriptedPrompter::with_answers(&[Some("Q")]);

    let result = lifecycle.create(&request("bot"), &mut prompter);
    assert!(matches!(result, Err(FoundryError::Cancelled(_))));
    assert_eq!(store.borrow().creates.len(), 1);
}

#[test]
fn test_name_conflict_cancelled_on_empty_or_eof() {
    for answer in [Some(""), None] {
        let store = store_with(&["bot"]);
        let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);
        let mut prompter = ScriptedPrompter::with_answers(&[answer]);

        let result = lifecycle.create(&request("bot"), &mut prompter);
        assert!(matches!(result, Err(FoundryError::Cancelled(_))));
    }
}

#[test]
fn test_name_attempts_are_bounded() {
    let store = store_with(&["bot", "bot-2", "bot-3"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 3);
    let mut prompter = ScriptedPrompter::with_answers(&[Some("bot-2"), Some("bot-3")]);

    let result = lifecycle.create(&request("bot"), &mut prompter);
    match result {
        Err(FoundryError::NameConflict(name)) => assert_eq!(name, "bot-3"),
        other => panic!("expected NameConflict, got {:?}", other.map(|a| a.name)),
    }
    assert_eq!(store.borrow().creates.len(), 3);
    assert!(prompter.is_exhausted());
}

#[test]
fn test_zero_attempts_means_unbounded() {
    let store = store_with(&["a", "b", "c", "d", "e", "f"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 0);
    let mut prompter = ScriptedPrompter::with_answers(&[
        Some("b"),
        Some("c"),
        Some("d"),
        Some("e"),
        Some("f"),
        Some("g"),
    ]);

    let created = lifecycle.create(&request("a"), &mut prompter).unwrap();
    assert_eq!(created.name, "g");
}

#[test]
fn test_unverifiable_create_is_error() {
    let store = store_with(&[]);
    store.borrow_mut().unverifiable = true;
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);
    let mut prompter = ScriptedPrompter::silent();

    let result = lifecycle.create(&request("bot"), &mut prompter);
    assert!(matches!(result, Err(FoundryError::Verification(name, _)) if name == "bot"));
}

#[test]
fn test_list_reads_model_from_latest_version() {
    let store = store_with(&["bot", "pirate"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);

    let agents = lifecycle.list();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].name, "bot");
    assert_eq!(agents[0].model, "gpt-4o-mini");
}

#[test]
fn test_list_failure_is_empty() {
    let store = store_with(&["bot"]);
    store.borrow_mut().fail_list = true;
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);

    assert!(lifecycle.list().is_empty());
}

#[test]
fn test_delete() {
    let store = store_with(&["bot"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);

    assert!(lifecycle.delete("bot"));
    assert!(!lifecycle.delete("bot"));
    assert_eq!(store.borrow().deleted, vec!["bot".to_string()]);
}

#[test]
fn test_agent_reply_text() {
    let store = store_with(&["bot"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);

    assert_eq!(lifecycle.test("bot", "Hello!"), "Arrr!");

    store.borrow_mut().reply = json!({"output_text": "Ahoy"});
    assert_eq!(lifecycle.chat("bot", "Hello!").unwrap(), "Ahoy");
}

#[test]
fn test_reply_errors_are_inline() {
    let store = store_with(&[]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);

    let reply = lifecycle.test("ghost", "Hello!");
    assert!(reply.starts_with("Error: "), "{}", reply);
    assert!(lifecycle.chat("ghost", "Hello!").is_err());
}

#[test]
fn test_sidecar_records_renamed_agent() {
    let dir = tempfile::tempdir().unwrap();
    let definition = dir.path().join("bot.md");

    let store = store_with(&["bot"]);
    let mut lifecycle = AgentLifecycle::new(Box::new(MockFactory::new(&store)), 5);
    let mut prompter = ScriptedPrompter::with_answers(&[Some("bot-2")]);
    let created = lifecycle.create(&request("bot"), &mut prompter).unwrap();

    let path = sidecar::write(&definition, &created, "2025-11-15-preview").unwrap();
    let (name, endpoint) = sidecar::read(&path).unwrap();
    assert_eq!(name, "bot-2");
    assert_eq!(endpoint, created.endpoint);
}
