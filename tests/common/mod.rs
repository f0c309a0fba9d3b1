#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lifehub_client::config::ClientOptions;
use lifehub_client::error::Result;
use lifehub_client::session::{CredentialStore, MemoryCredentialStore, Session};
use lifehub_client::LifeHub;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Memory store that counts how often it was cleared
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryCredentialStore,
    clears: AtomicUsize,
}

impl CountingStore {
    pub fn holding(token: &str) -> Self {
        Self {
            inner: MemoryCredentialStore::with_session(Session::new(
                token.to_string(),
                "bearer".to_string(),
                None,
            )),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn load(&self) -> Result<Option<Session>> {
        self.inner.load()
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.inner.save(session)
    }

    fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

pub fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::default()
        .with_base_url(&format!("{}/api", server.uri()))
        .with_request_timeout(Duration::from_secs(2))
}

/// A client with no session
pub fn anonymous(server: &MockServer) -> (LifeHub, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    let hub = LifeHub::with_store(options(server), store.clone()).unwrap();
    (hub, store)
}

/// A client holding [`TOKEN`]
pub fn signed_in(server: &MockServer) -> (LifeHub, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::holding(TOKEN));
    let hub = LifeHub::with_store(options(server), store.clone()).unwrap();
    hub.session().init().unwrap();
    (hub, store)
}

const CREATED: &str = "2024-05-01T09:30:00";

pub fn task_json(id: i64, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "priority": "medium",
        "status": if completed { "completed" } else { "pending" },
        "completed": completed,
        "due_date": null,
        "completed_at": null,
        "created_at": CREATED,
        "updated_at": CREATED,
        "user_id": 1
    })
}

pub fn item_json(id: i64, name: &str, completed: bool, actual_price: Option<f64>) -> Value {
    json!({
        "id": id,
        "name": name,
        "quantity": 1,
        "unit": "pièce",
        "estimated_price": 3.0,
        "actual_price": actual_price,
        "category": "épicerie",
        "notes": null,
        "completed": completed,
        "purchased_at": null,
        "created_at": CREATED,
        "updated_at": CREATED,
        "user_id": 1,
        "total_estimated_cost": 3.0,
        "total_actual_cost": actual_price.unwrap_or(0.0)
    })
}

pub fn summary_json(total: i64, completed: i64) -> Value {
    json!({
        "total_items": total,
        "completed_items": completed,
        "pending_items": total - completed,
        "completion_rate": if total == 0 { 0.0 } else { completed as f64 * 100.0 / total as f64 }
    })
}

pub fn overview_json(total: f64, spent: f64) -> Value {
    json!({
        "total_budget": total,
        "total_spent": spent,
        "remaining_budget": total - spent,
        "categories": []
    })
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "email": "alice@example.com",
        "username": "alice",
        "first_name": "Alice",
        "last_name": "Martin",
        "full_name": "Alice Martin",
        "avatar_url": null,
        "is_active": true,
        "is_superuser": false,
        "timezone": "Europe/Paris",
        "created_at": CREATED,
        "updated_at": CREATED
    })
}

pub fn login_json(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": {
            "id": 1,
            "email": "alice@example.com",
            "username": "alice",
            "full_name": "Alice Martin",
            "avatar_url": null
        }
    })
}
