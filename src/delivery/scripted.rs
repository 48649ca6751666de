//! Scripted in-process deliverer for tests.

use super::{DeliveryRequest, Deliverer};
use crate::error::{PushqError, PushqResult};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::time::Instant;

/// One scripted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Status(u16),
    Refused,
}

/// Answers from a per-path script, falling back to a default step.
/// Records every request it sees together with the (tokio) time it arrived.
pub struct ScriptedDeliverer {
    fallback: Step,
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<(DeliveryRequest, Instant)>>,
}

impl ScriptedDeliverer {
    pub fn always(step: Step) -> Self {
        Self {
            fallback: step,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue outcomes for requests whose URL ends with `path`.
    pub fn script(self, path: &str, steps: impl IntoIterator<Item = Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), steps.into_iter().collect());
        self
    }

    pub fn calls(&self) -> Vec<(DeliveryRequest, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths in the order they were delivered.
    pub fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| {
                let after_scheme = request.url.trim_start_matches("http://");
                let start = after_scheme.find('/').unwrap_or(after_scheme.len());
                after_scheme[start..].to_string()
            })
            .collect()
    }

    fn next_step(&self, url: &str) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        scripts
            .iter_mut()
            .find(|(path, _)| url.ends_with(path.as_str()))
            .and_then(|(_, steps)| steps.pop_front())
            .unwrap_or(self.fallback)
    }
}

#[async_trait]
impl Deliverer for ScriptedDeliverer {
    async fn deliver(&self, request: &DeliveryRequest) -> PushqResult<u16> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));

        match self.next_step(&request.url) {
            Step::Status(status) => Ok(status),
            Step::Refused => Err(PushqError::transport(
                "connection refused",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            )),
        }
    }
}
