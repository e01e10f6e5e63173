/*!
 * Mock generator implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `working()` - always succeeds with a canned payload
 * - `failing()` - always fails with an API error
 * - `fail_on_calls()` - fails on specific call indices
 * - scripted JSON queues for driving Director and pipeline tests
 *
 * Each mock can record its calls into a shared journal so tests can assert
 * the order in which a router tried its drivers.
 */

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::errors::ProviderError;
use crate::providers::{decode_json_response, ImageGenerator, TextGenerator, VoiceGenerator};

/// Shared call journal recording which mock handled each call
pub type CallJournal = Arc<Mutex<Vec<String>>>;

/// Create an empty call journal
pub fn call_journal() -> CallJournal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Behavior mode shared by the mock generators
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an API error
    Failing,
    /// Fails on the given 0-based call indices, succeeds otherwise
    FailOnCalls(Vec<usize>),
}

fn simulated_failure(label: &str) -> ProviderError {
    ProviderError::Api {
        status_code: 503,
        message: format!("simulated failure from {}", label),
    }
}

/// Mock text generator
#[derive(Debug)]
pub struct MockTextGenerator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Canned response for generate calls
    response: String,
    /// Scripted raw responses consumed by generate_json, in order
    json_script: Mutex<VecDeque<String>>,
    /// Label used in journal entries and error messages
    label: String,
    /// Call counter
    calls: AtomicUsize,
    /// Optional shared call journal
    journal: Option<CallJournal>,
}

impl MockTextGenerator {
    /// Create a mock with the given behavior and canned response
    pub fn new(behavior: MockBehavior, response: impl Into<String>) -> Self {
        Self {
            behavior,
            response: response.into(),
            json_script: Mutex::new(VecDeque::new()),
            label: "mock-text".to_string(),
            calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// A mock that always succeeds with the given text
    pub fn working(response: impl Into<String>) -> Self {
        Self::new(MockBehavior::Working, response)
    }

    /// A mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, "")
    }

    /// Set the label recorded in journals and failures
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Record calls into a shared journal
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Queue raw responses for generate_json; each call pops one and decodes
    /// it exactly like a real provider's text output
    pub fn with_json_script<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut script = self.json_script.lock();
            for response in responses {
                script.push_back(response.into());
            }
        }
        self
    }

    fn record_call(&self) -> usize {
        if let Some(journal) = &self.journal {
            journal.lock().push(self.label.clone());
        }
        self.calls.fetch_add(1, Ordering::SeqCst)
    }

    fn check_behavior(&self, call: usize) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Working => Ok(()),
            MockBehavior::Failing => Err(simulated_failure(&self.label)),
            MockBehavior::FailOnCalls(indices) if indices.contains(&call) => {
                Err(simulated_failure(&self.label))
            }
            MockBehavior::FailOnCalls(_) => Ok(()),
        }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        let call = self.record_call();
        self.check_behavior(call)?;
        Ok(self.response.clone())
    }

    async fn generate_json(&self, _prompt: &str) -> Result<serde_json::Value, ProviderError> {
        let call = self.record_call();
        self.check_behavior(call)?;

        let raw = self
            .json_script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.response.clone());
        decode_json_response(&raw)
    }
}

/// Mock image generator
#[derive(Debug)]
pub struct MockImageGenerator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Canned payload for successful calls
    payload: Bytes,
    /// Label used in journal entries and error messages
    label: String,
    /// Call counter
    calls: AtomicUsize,
    /// Optional shared call journal
    journal: Option<CallJournal>,
}

impl MockImageGenerator {
    /// Create a mock with the given behavior and payload
    pub fn new(behavior: MockBehavior, payload: impl Into<Bytes>) -> Self {
        Self {
            behavior,
            payload: payload.into(),
            label: "mock-image".to_string(),
            calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// A mock that always succeeds with the given payload
    pub fn working(payload: impl Into<Bytes>) -> Self {
        Self::new(MockBehavior::Working, payload)
    }

    /// A mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, Bytes::new())
    }

    /// A mock that fails on the given 0-based call indices
    pub fn fail_on_calls(indices: Vec<usize>, payload: impl Into<Bytes>) -> Self {
        Self::new(MockBehavior::FailOnCalls(indices), payload)
    }

    /// Set the label recorded in journals and failures
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Record calls into a shared journal
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Bytes, ProviderError> {
        if let Some(journal) = &self.journal {
            journal.lock().push(self.label.clone());
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(self.payload.clone()),
            MockBehavior::Failing => Err(simulated_failure(&self.label)),
            MockBehavior::FailOnCalls(indices) if indices.contains(&call) => {
                Err(simulated_failure(&self.label))
            }
            MockBehavior::FailOnCalls(_) => Ok(self.payload.clone()),
        }
    }
}

/// Mock voice generator
#[derive(Debug)]
pub struct MockVoiceGenerator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Canned payload for successful calls
    payload: Bytes,
    /// Label used in journal entries and error messages
    label: String,
    /// Call counter
    calls: AtomicUsize,
    /// Optional shared call journal
    journal: Option<CallJournal>,
}

impl MockVoiceGenerator {
    /// Create a mock with the given behavior and payload
    pub fn new(behavior: MockBehavior, payload: impl Into<Bytes>) -> Self {
        Self {
            behavior,
            payload: payload.into(),
            label: "mock-voice".to_string(),
            calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// A mock that always succeeds with the given payload
    pub fn working(payload: impl Into<Bytes>) -> Self {
        Self::new(MockBehavior::Working, payload)
    }

    /// A mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, Bytes::new())
    }

    /// Set the label recorded in journals and failures
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Record calls into a shared journal
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }
}

#[async_trait]
impl VoiceGenerator for MockVoiceGenerator {
    async fn generate(&self, _text: &str) -> Result<Bytes, ProviderError> {
        if let Some(journal) = &self.journal {
            journal.lock().push(self.label.clone());
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(self.payload.clone()),
            MockBehavior::Failing => Err(simulated_failure(&self.label)),
            MockBehavior::FailOnCalls(indices) if indices.contains(&call) => {
                Err(simulated_failure(&self.label))
            }
            MockBehavior::FailOnCalls(_) => Ok(self.payload.clone()),
        }
    }
}
