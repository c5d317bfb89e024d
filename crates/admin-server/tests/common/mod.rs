//! Shared fixtures for the gateway integration tests
//!
//! [`FakeRouter`] stands in for the router: it keeps a hotspot user table in
//! memory, records every command it receives and can be told to refuse
//! connections or reject particular user names.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hotspot_admin_server::{AdminIdentity, AppState, GatewayConfig, MemoryCredentialStore};
use hotspot_routeros::{Command, Record, RouterConnector, RouterError, RouterSession, hotspot};
use serde_json::{Value, json};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

#[derive(Debug, Default)]
struct RouterState {
    users: Vec<Record>,
    next_id: u32,
    commands: Vec<Command>,
    rejected_names: HashSet<String>,
    refuse_connect: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeRouter {
    state: Arc<Mutex<RouterState>>,
    connects: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl FakeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, name: &str, password: &str, profile: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            insert_user(&mut state, name, password, profile);
        }
        self
    }

    /// Makes `add` fail for `name` with a router trap
    pub fn reject_name(&self, name: &str) {
        self.state.lock().unwrap().rejected_names.insert(name.to_string());
    }

    pub fn refuse_connections(&self) {
        self.state.lock().unwrap().refuse_connect = true;
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Names of every `add` command received, in order
    pub fn added_names(&self) -> Vec<String> {
        self.commands()
            .iter()
            .filter(|c| c.path() == hotspot::USER_ADD)
            .filter_map(|c| c.get("name").map(str::to_string))
            .collect()
    }

    pub fn user_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .filter_map(|u| u.get("name").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    pub fn user_id(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|u| u.get(".id").and_then(Value::as_str).map(str::to_string))
    }
}

fn insert_user(state: &mut RouterState, name: &str, password: &str, profile: &str) -> String {
    state.next_id += 1;
    let id = format!("*{:X}", state.next_id);
    let record = json!({
        ".id": id,
        "name": name,
        "password": password,
        "profile": profile,
        "uptime": "0s",
    });
    if let Value::Object(map) = record {
        state.users.push(map);
    }
    id
}

#[async_trait]
impl RouterConnector for FakeRouter {
    async fn connect(&self) -> Result<Box<dyn RouterSession>, RouterError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().unwrap().refuse_connect {
            return Err(RouterError::Connect("connection refused".to_string()));
        }
        Ok(Box::new(FakeSession {
            router: self.clone(),
        }))
    }
}

struct FakeSession {
    router: FakeRouter,
}

#[async_trait]
impl RouterSession for FakeSession {
    async fn write(&mut self, command: &Command) -> Result<Vec<Record>, RouterError> {
        let mut state = self.router.state.lock().unwrap();
        state.commands.push(command.clone());

        match command.path() {
            hotspot::USER_PRINT => Ok(state.users.clone()),
            hotspot::USER_ADD => {
                let name = command.get("name").unwrap_or_default().to_string();
                let taken = state
                    .users
                    .iter()
                    .any(|u| u.get("name").and_then(Value::as_str) == Some(name.as_str()));
                if taken || state.rejected_names.contains(&name) {
                    return Err(RouterError::Trap(
                        "failure: already have user with this name for this server".to_string(),
                    ));
                }
                let password = command.get("password").unwrap_or_default().to_string();
                let profile = command.get("profile").unwrap_or_default().to_string();
                let id = insert_user(&mut state, &name, &password, &profile);
                let mut reply = Record::new();
                reply.insert("ret".to_string(), Value::String(id));
                Ok(vec![reply])
            }
            hotspot::USER_REMOVE => {
                let id = command.get("numbers").unwrap_or_default();
                let before = state.users.len();
                state
                    .users
                    .retain(|u| u.get(".id").and_then(Value::as_str) != Some(id));
                if state.users.len() == before {
                    return Err(RouterError::Trap("no such item".to_string()));
                }
                Ok(Vec::new())
            }
            other => Err(RouterError::Trap(format!("no such command: {}", other))),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), RouterError> {
        self.router.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_config(report_dir: &Path) -> GatewayConfig {
    GatewayConfig {
        admin: AdminIdentity {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
        report_dir: report_dir.to_path_buf(),
        import_pacing_ms: 0,
        ..GatewayConfig::default()
    }
}

pub fn test_state(router: &FakeRouter, report_dir: &Path) -> AppState {
    AppState::new(
        &test_config(report_dir),
        Arc::new(router.clone()),
        Arc::new(MemoryCredentialStore::new()),
    )
}
