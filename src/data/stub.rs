//! In-memory fetcher for tests.

use std::collections::HashMap;
use std::time::Duration;

use crate::data::fetch::Fetch;
use crate::error::LoadError;

pub(crate) struct StubFetcher {
    bodies: HashMap<&'static str, Result<&'static str, LoadError>>,
    delays: HashMap<&'static str, Duration>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    pub(crate) fn with(mut self, name: &'static str, body: Result<&'static str, LoadError>) -> Self {
        self.bodies.insert(name, body);
        self
    }

    pub(crate) fn delayed(mut self, name: &'static str, delay: Duration) -> Self {
        self.delays.insert(name, delay);
        self
    }
}

impl Fetch for StubFetcher {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        if let Some(delay) = self.delays.get(resource) {
            std::thread::sleep(*delay);
        }
        match self.bodies.get(resource) {
            Some(Ok(body)) => Ok(body.as_bytes().to_vec()),
            Some(Err(e)) => Err(e.clone()),
            None => Err(LoadError::Status(404)),
        }
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}
