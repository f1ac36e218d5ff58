use std::sync::Arc;

use configs::{IdStrategy, StoreConfig};
use models::user::{self, NewUser, User};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Records loaded at startup when seeding is enabled.
const SEED: [(&str, &str); 3] = [
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
    ("Bob Johnson", "bob@example.com"),
];

struct Records {
    users: Vec<User>,
    /// Highest id ever handed out, used by `IdStrategy::Monotonic`.
    high_water: u64,
}

impl Records {
    fn next_id(&self, strategy: IdStrategy) -> u64 {
        match strategy {
            IdStrategy::CountPlusOne => self.users.len() as u64 + 1,
            IdStrategy::Monotonic => self.high_water + 1,
        }
    }

    fn push(&mut self, strategy: IdStrategy, new: NewUser) -> User {
        let user = User::new(self.next_id(strategy), new);
        self.high_water = self.high_water.max(user.id);
        self.users.push(user.clone());
        user
    }
}

/// Index of the first record with the given id.
fn position_of(users: &[User], id: u64) -> Option<usize> {
    users.iter().position(|u| u.id == id)
}

/// Ordered in-memory user collection.
///
/// Cloning yields another handle to the same records. Every operation runs
/// under one lock, so concurrent creates never observe the same count.
#[derive(Clone)]
pub struct UserStore {
    inner: Arc<RwLock<Records>>,
    id_strategy: IdStrategy,
}

impl UserStore {
    /// Empty store.
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Records { users: Vec::new(), high_water: 0 })),
            id_strategy,
        }
    }

    /// Store holding the three startup records, ids 1..=3.
    pub fn seeded(id_strategy: IdStrategy) -> Self {
        let mut records = Records { users: Vec::with_capacity(SEED.len()), high_water: 0 };
        for (name, email) in SEED {
            records.push(id_strategy, NewUser { name: name.into(), email: email.into() });
        }
        Self { inner: Arc::new(RwLock::new(records)), id_strategy }
    }

    pub fn from_config(cfg: &StoreConfig) -> Self {
        if cfg.seed {
            Self::seeded(cfg.id_strategy)
        } else {
            Self::new(cfg.id_strategy)
        }
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    /// All records in storage order.
    pub async fn list(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: u64) -> Result<User, ServiceError> {
        let records = self.inner.read().await;
        match position_of(&records.users, id) {
            Some(idx) => Ok(records.users[idx].clone()),
            None => {
                debug!(id, "user lookup missed");
                Err(ServiceError::not_found("user"))
            }
        }
    }

    /// Validate `input` and append a new record.
    pub async fn create(&self, input: &Map<String, Value>) -> Result<User, ServiceError> {
        let new = user::validate_create(input).map_err(log_rejected)?;
        let mut records = self.inner.write().await;
        let created = records.push(self.id_strategy, new);
        info!(id = created.id, "user created");
        Ok(created)
    }

    /// Validate `input`, then overwrite only the fields it carries.
    ///
    /// Validation runs before the lookup, so a bad body against a missing id
    /// reports the validation failure.
    pub async fn update(&self, id: u64, input: &Map<String, Value>) -> Result<User, ServiceError> {
        let patch = user::validate_update(input).map_err(log_rejected)?;
        let mut records = self.inner.write().await;
        let idx = position_of(&records.users, id).ok_or_else(|| {
            debug!(id, "update target missing");
            ServiceError::not_found("user")
        })?;
        let existing = &mut records.users[idx];
        existing.apply(patch);
        info!(id, "user updated");
        Ok(existing.clone())
    }

    /// Remove a record, closing the gap, and return it as it was.
    pub async fn delete(&self, id: u64) -> Result<User, ServiceError> {
        let mut records = self.inner.write().await;
        let idx = position_of(&records.users, id).ok_or_else(|| {
            debug!(id, "delete target missing");
            ServiceError::not_found("user")
        })?;
        let removed = records.users.remove(idx);
        info!(id, remaining = records.users.len(), "user deleted");
        Ok(removed)
    }
}

fn log_rejected(err: models::errors::ModelError) -> ServiceError {
    let err = ServiceError::from(err);
    if let ServiceError::Validation(errors) = &err {
        let fields: Vec<&str> = errors.fields().collect();
        debug!(?fields, "user input rejected");
    }
    err
}
