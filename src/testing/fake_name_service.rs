use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::domain::{AppError, Endpoint};
use crate::ports::NameServiceLookup;

/// Answers name service queries from a `(endpoint, query) -> result` table.
#[derive(Clone, Default)]
pub struct FakeNameService {
    answers: Arc<Mutex<HashMap<(String, String), String>>>,
    unreachable: Arc<Mutex<HashSet<String>>>,
    pub lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeNameService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(self, endpoint: &str, query: &str, result: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert((endpoint.to_string(), query.to_string()), result.to_string());
        self
    }

    pub fn unreachable(self, endpoint: &str) -> Self {
        self.unreachable.lock().unwrap().insert(endpoint.to_string());
        self
    }
}

impl NameServiceLookup for FakeNameService {
    fn lookup(&self, endpoint: &Endpoint, query: &str) -> Result<String, AppError> {
        let key = (endpoint.to_string(), query.to_string());
        self.lookups.lock().unwrap().push(key.clone());
        if self.unreachable.lock().unwrap().contains(&key.0) {
            return Err(AppError::Discovery {
                endpoint: key.0,
                details: "connection refused".to_string(),
            });
        }
        Ok(self.answers.lock().unwrap().get(&key).cloned().unwrap_or_default())
    }
}
