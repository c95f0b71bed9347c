//! Live evaluation sessions.
//!
//! A `Session` holds per-editor-instance state: raw source text, the last
//! generated code, and the last classified result. Every edit re-transpiles
//! and re-evaluates synchronously; sources referencing a volatile function
//! additionally get a fixed-interval refresh task that re-transpiles and
//! re-evaluates without mutating the raw source, so values like a live
//! timestamp visibly update.
//!
//! Sessions with volatile sources must live inside a Tokio runtime; the
//! refresh task is spawned on the ambient runtime and aborted when the
//! volatile reference disappears, when the store closes the session, or on
//! drop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::eval;
use crate::settings::Settings;
use crate::transpile::{is_volatile, transpile};
use crate::types::LanguageSpec;

/// Lifecycle phase of a session.
///
/// `Faulted` is reached from `Evaluated` when execution raises; it retains
/// the generated code but blanks the result. A classification of "no result"
/// is a normal `Evaluated` outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Generated,
    Evaluated,
    Faulted,
}

#[derive(Debug)]
struct SessionState {
    source: String,
    generated: String,
    result: Option<String>,
    phase: SessionPhase,
}

impl SessionState {
    fn new() -> Self {
        Self {
            source: String::new(),
            generated: String::new(),
            result: None,
            phase: SessionPhase::Empty,
        }
    }
}

/// Mutable per-editor-instance evaluation state.
#[derive(Debug)]
pub struct Session {
    lang: &'static LanguageSpec,
    settings: Settings,
    state: Arc<Mutex<SessionState>>,
    refresh: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn new(lang: &'static LanguageSpec) -> Self {
        Self::with_settings(lang, Settings::default())
    }

    pub fn with_settings(lang: &'static LanguageSpec, settings: Settings) -> Self {
        Self {
            lang,
            settings,
            state: Arc::new(Mutex::new(SessionState::new())),
            refresh: Mutex::new(None),
        }
    }

    /// Replace the raw source text, synchronously re-transpiling and
    /// re-evaluating, then arm or disarm the refresh timer based on whether
    /// the source references a volatile function.
    pub fn set_source(&self, source: &str) {
        {
            let mut state = self.state.lock().unwrap();
            state.source = source.to_string();
            refresh_state(self.lang, &self.settings, &mut state);
        }
        if is_volatile(self.lang, source) {
            self.arm_refresh();
        } else {
            self.disarm_refresh();
        }
    }

    /// Re-transpile and re-evaluate the current source without mutating it.
    /// This is what each refresh tick runs.
    pub fn refresh(&self) {
        let mut state = self.state.lock().unwrap();
        refresh_state(self.lang, &self.settings, &mut state);
    }

    pub fn source(&self) -> String {
        self.state.lock().unwrap().source.clone()
    }

    /// The generated code for the current source, surfaced to the user
    /// verbatim. Always the deterministic transpilation of the raw source.
    pub fn generated_code(&self) -> String {
        self.state.lock().unwrap().generated.clone()
    }

    /// The last classified result; `None` renders as "no result".
    pub fn result(&self) -> Option<String> {
        self.state.lock().unwrap().result.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().unwrap().phase
    }

    /// Whether a refresh task is currently armed.
    pub fn refresh_armed(&self) -> bool {
        self.refresh
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn arm_refresh(&self) {
        let mut guard = self.refresh.lock().unwrap();
        if guard.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let lang = self.lang;
        let settings = self.settings.clone();
        let state = Arc::clone(&self.state);
        let interval = self.settings.refresh.interval();
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; set_source already
            // evaluated, so skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut state = state.lock().unwrap();
                refresh_state(lang, &settings, &mut state);
            }
        }));
    }

    fn disarm_refresh(&self) {
        if let Some(handle) = self.refresh.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.disarm_refresh();
    }
}

fn refresh_state(lang: &LanguageSpec, settings: &Settings, state: &mut SessionState) {
    if state.source.trim().is_empty() {
        state.generated.clear();
        state.result = None;
        state.phase = SessionPhase::Empty;
        return;
    }
    state.generated = transpile(lang, &state.source);
    state.phase = SessionPhase::Generated;
    match eval::run(&state.generated, &settings.render) {
        Ok(result) => {
            state.result = result;
            state.phase = SessionPhase::Evaluated;
        }
        Err(err) => {
            tracing::debug!(error = %err, "session evaluation failed");
            state.result = None;
            state.phase = SessionPhase::Faulted;
        }
    }
}

/// Identifier handed out by a `SessionStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

/// Thread-safe storage for live sessions, one per editor mount.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Session>>,
    next_id: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session against `lang`.
    pub fn open(&self, lang: &'static LanguageSpec, settings: Settings) -> (SessionId, Arc<Session>) {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(Session::with_settings(lang, settings));
        self.sessions.insert(id, Arc::clone(&session));
        (id, session)
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Close a session, deterministically cancelling any pending refresh
    /// even if other handles to it are still alive.
    pub fn close(&self, id: SessionId) {
        if let Some((_, session)) = self.sessions.remove(&id) {
            session.disarm_refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RefreshSettings;
    use crate::types::outsystems;
    use std::time::Duration;

    fn fast_settings() -> Settings {
        Settings {
            refresh: RefreshSettings { interval_ms: 25 },
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn lifecycle_phases() {
        let session = Session::new(outsystems());
        assert_eq!(session.phase(), SessionPhase::Empty);

        session.set_source("Abs(-10.89)");
        assert_eq!(session.phase(), SessionPhase::Evaluated);
        assert_eq!(session.generated_code(), "math.abs(-10.89)");
        assert_eq!(session.result(), Some("10.89".to_string()));

        session.set_source("");
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.generated_code(), "");
        assert_eq!(session.result(), None);
    }

    #[tokio::test]
    async fn faulted_retains_generated_code() {
        let session = Session::new(outsystems());
        session.set_source("1 +");
        assert_eq!(session.phase(), SessionPhase::Faulted);
        assert_eq!(session.generated_code(), "1 +");
        assert_eq!(session.result(), None);

        // Becoming evaluable again leaves the fault behind.
        session.set_source("1 + 2");
        assert_eq!(session.phase(), SessionPhase::Evaluated);
        assert_eq!(session.result(), Some("3".to_string()));
    }

    #[tokio::test]
    async fn no_result_is_not_a_fault() {
        let session = Session::new(outsystems());
        session.set_source("nil");
        assert_eq!(session.phase(), SessionPhase::Evaluated);
        assert_eq!(session.result(), None);
    }

    #[tokio::test]
    async fn volatile_source_arms_refresh_and_updates() {
        let session = Session::with_settings(outsystems(), fast_settings());
        session.set_source("CurrDateTime()");
        assert!(session.refresh_armed());

        let first = session.result().expect("initial evaluation");
        tokio::time::sleep(Duration::from_millis(120)).await;
        let second = session.result().expect("refreshed evaluation");
        assert_ne!(first, second, "refresh ticks should re-embed wall-clock text");
    }

    #[tokio::test]
    async fn refresh_disarms_when_volatile_reference_disappears() {
        let session = Session::with_settings(outsystems(), fast_settings());
        session.set_source("CurrDateTime()");
        assert!(session.refresh_armed());

        session.set_source("Abs(-1)");
        assert!(!session.refresh_armed());
        assert_eq!(session.result(), Some("1".to_string()));
    }

    #[tokio::test]
    async fn non_volatile_source_never_arms() {
        let session = Session::new(outsystems());
        session.set_source("CurrDate()");
        assert!(!session.refresh_armed());
    }

    #[tokio::test]
    async fn store_open_get_close() {
        let store = SessionStore::new();
        let (id, session) = store.open(outsystems(), Settings::default());
        session.set_source("Mod(10, 3)");
        assert_eq!(
            store.get(id).and_then(|s| s.result()),
            Some("1".to_string())
        );

        store.close(id);
        assert!(store.get(id).is_none());
        assert!(!session.refresh_armed());
    }

    #[tokio::test]
    async fn closing_a_volatile_session_cancels_its_timer() {
        let store = SessionStore::new();
        let (id, session) = store.open(outsystems(), fast_settings());
        session.set_source("CurrDateTime()");
        assert!(session.refresh_armed());

        store.close(id);
        assert!(!session.refresh_armed());
    }
}
