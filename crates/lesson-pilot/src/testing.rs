//! Scripted in-memory driver for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::driver::{UiDriver, UrlPattern};
use crate::error::{PilotError, PilotResult};

/// Polls an unbounded wait gets before giving up.
const UNBOUNDED_WAIT_POLLS: usize = 1_000;

/// How long an element stays on the page.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Presence {
    Always,
    /// Present for the next `n` clicks on it.
    Times(usize),
}

/// Something the engine did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Navigate(String),
    Click(String),
    ClickText { scope: String, text: String },
    Type { selector: String, text: String },
    Evaluate(String),
}

/// Makes `target` appear once `on` has been clicked or typed into for the
/// `occurrence`-th time.
struct Trigger {
    on: String,
    occurrence: usize,
    target: String,
    presence: Presence,
}

#[derive(Default)]
struct FakeState {
    present: HashMap<String, Presence>,
    texts: HashMap<String, Vec<String>>,
    triggers: Vec<Trigger>,
    trigger_counts: HashMap<String, usize>,
    // Revealed elements only render once the engine starts waiting again.
    pending: Vec<(String, Presence)>,
    evaluations: VecDeque<Value>,
    responses: VecDeque<(String, Value)>,
    actions: Vec<Action>,
}

/// A fake page whose elements are declared up front.
#[derive(Default)]
pub(crate) struct FakeDriver {
    state: Mutex<FakeState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, selector: &str) -> Self {
        self.with_presence(selector, Presence::Always)
    }

    pub fn with_presence(self, selector: &str, presence: Presence) -> Self {
        self.state
            .lock()
            .unwrap()
            .present
            .insert(selector.to_string(), presence);
        self
    }

    /// Elements under `scope` carrying these visible texts.
    pub fn with_texts(self, scope: &str, texts: &[&str]) -> Self {
        self.state.lock().unwrap().texts.insert(
            scope.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Clicking `selector` makes `revealed` appear.
    pub fn on_click_reveal(mut self, selector: &str, revealed: &[&str]) -> Self {
        for target in revealed {
            self = self.on_action(selector, 1, target, Presence::Always);
        }
        self
    }

    /// The `occurrence`-th action on `on` makes `target` appear.
    pub fn on_action(self, on: &str, occurrence: usize, target: &str, presence: Presence) -> Self {
        self.state.lock().unwrap().triggers.push(Trigger {
            on: on.to_string(),
            occurrence,
            target: target.to_string(),
            presence,
        });
        self
    }

    pub fn with_evaluation(self, value: Value) -> Self {
        self.state.lock().unwrap().evaluations.push_back(value);
        self
    }

    pub fn with_response(self, url: &str, body: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back((url.to_string(), body));
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().unwrap().actions.clone()
    }

    /// Every click or typed input, leaving out navigation and evaluation.
    pub fn activations(&self) -> Vec<Action> {
        self.actions()
            .into_iter()
            .filter(|a| !matches!(a, Action::Navigate(_) | Action::Evaluate(_)))
            .collect()
    }

    fn render_pending(&self) {
        let mut state = self.state.lock().unwrap();
        let pending = std::mem::take(&mut state.pending);
        state.present.extend(pending);
    }

    fn is_present(&self, selector: &str) -> bool {
        match self.state.lock().unwrap().present.get(selector) {
            Some(Presence::Always) => true,
            Some(Presence::Times(n)) => *n > 0,
            None => false,
        }
    }
}

pub(crate) fn click(selector: &str) -> Action {
    Action::Click(selector.to_string())
}

pub(crate) fn click_text(scope: &str, text: &str) -> Action {
    Action::ClickText {
        scope: scope.to_string(),
        text: text.to_string(),
    }
}

pub(crate) fn type_text(selector: &str, text: &str) -> Action {
    Action::Type {
        selector: selector.to_string(),
        text: text.to_string(),
    }
}

impl FakeState {
    fn record(&mut self, action: Action, selector: &str) {
        self.actions.push(action);
        let count = self.trigger_counts.entry(selector.to_string()).or_default();
        *count += 1;
        let count = *count;
        for t in &self.triggers {
            if t.on == selector && t.occurrence == count {
                self.pending.push((t.target.clone(), t.presence));
            }
        }
    }
}

#[async_trait]
impl UiDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> PilotResult<()> {
        self.state
            .lock()
            .unwrap()
            .actions
            .push(Action::Navigate(url.to_string()));
        Ok(())
    }

    async fn exists(&self, selector: &str) -> PilotResult<bool> {
        Ok(self.is_present(selector))
    }

    async fn wait_for(&self, selector: &str, timeout: Option<Duration>) -> PilotResult<()> {
        self.render_pending();
        if self.is_present(selector) {
            return Ok(());
        }
        if let Some(after) = timeout {
            return Err(PilotError::timeout(selector, after));
        }
        for _ in 0..UNBOUNDED_WAIT_POLLS {
            tokio::task::yield_now().await;
            if self.is_present(selector) {
                return Ok(());
            }
        }
        Err(PilotError::timeout(selector, Duration::ZERO))
    }

    async fn click(&self, selector: &str) -> PilotResult<()> {
        let mut state = self.state.lock().unwrap();
        match state.present.get_mut(selector) {
            Some(Presence::Always) => {}
            Some(Presence::Times(n)) if *n > 0 => *n -= 1,
            _ => return Err(PilotError::ElementNotFound(selector.to_string())),
        }
        state.record(click(selector), selector);
        Ok(())
    }

    async fn click_text(&self, scope: &str, text: &str) -> PilotResult<bool> {
        let mut state = self.state.lock().unwrap();
        let found = state
            .texts
            .get(scope)
            .is_some_and(|texts| texts.iter().any(|t| t == text));
        if found {
            state.actions.push(click_text(scope, text));
        }
        Ok(found)
    }

    async fn type_text(&self, selector: &str, text: &str) -> PilotResult<()> {
        let mut state = self.state.lock().unwrap();
        if !matches!(
            state.present.get(selector),
            Some(Presence::Always) | Some(Presence::Times(1..))
        ) {
            return Err(PilotError::ElementNotFound(selector.to_string()));
        }
        state.record(type_text(selector, text), selector);
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> PilotResult<Value> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Evaluate(script.to_string()));
        Ok(state.evaluations.pop_front().unwrap_or(Value::Null))
    }

    async fn wait_for_response(
        &self,
        pattern: &UrlPattern,
        timeout: Duration,
    ) -> PilotResult<Value> {
        let mut state = self.state.lock().unwrap();
        match state.responses.iter().position(|(url, _)| pattern.matches(url)) {
            Some(i) => {
                let (_, body) = state.responses.remove(i).unwrap_or_default();
                Ok(body)
            }
            None => Err(PilotError::timeout(format!("response {pattern}"), timeout)),
        }
    }
}
