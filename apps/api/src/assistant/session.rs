//! Session Manager: owns one `Assistant` per chat session and evicts idle ones.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::assistant::orchestrator::{Assistant, ChatReply};
use crate::llm_client::CompletionService;

struct SessionSlot {
    assistant: Arc<tokio::sync::Mutex<Assistant>>,
    last_active: Instant,
}

/// Maps session ids to assistants.
///
/// Each assistant sits behind an async mutex held for a whole turn, so turns
/// within a session run one at a time while sessions stay independent.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, SessionSlot>>,
    llm: Arc<dyn CompletionService>,
    call_timeout: Duration,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(llm: Arc<dyn CompletionService>, call_timeout: Duration, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            llm,
            call_timeout,
            ttl,
        }
    }

    /// Runs one chat turn for `session_id`, creating the session on first use.
    pub async fn chat(&self, session_id: &str, message: &str) -> ChatReply {
        let assistant = self.checkout(session_id);
        let reply = assistant.lock().await.chat(message).await;
        self.touch(session_id);
        reply
    }

    /// Empties a session's history. Returns false when the session is unknown.
    pub async fn clear_history(&self, session_id: &str) -> bool {
        let assistant = {
            let sessions = self.lock_sessions();
            match sessions.get(session_id) {
                Some(slot) => slot.assistant.clone(),
                None => return false,
            }
        };
        assistant.lock().await.clear_history();
        self.touch(session_id);
        true
    }

    /// Drops sessions idle for longer than the TTL. Sessions with a turn in
    /// flight are kept. Returns how many were evicted.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.lock_sessions();
        let before = sessions.len();
        sessions.retain(|_, slot| {
            let in_use = Arc::strong_count(&slot.assistant) > 1;
            in_use || now.duration_since(slot.last_active) <= self.ttl
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock_sessions().len()
    }

    /// Periodically evicts idle sessions until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle();
                if evicted > 0 {
                    info!(
                        "Evicted {evicted} idle chat sessions, {} remain",
                        self.len()
                    );
                }
            }
        })
    }

    fn checkout(&self, session_id: &str) -> Arc<tokio::sync::Mutex<Assistant>> {
        let now = Instant::now();
        let mut sessions = self.lock_sessions();

        let expired = sessions.get(session_id).is_some_and(|slot| {
            Arc::strong_count(&slot.assistant) == 1
                && now.duration_since(slot.last_active) > self.ttl
        });
        if expired {
            debug!("Session {session_id} expired, starting fresh");
            sessions.remove(session_id);
        }

        let slot = sessions.entry(session_id.to_string()).or_insert_with(|| {
            info!("Created new assistant for session {session_id}");
            SessionSlot {
                assistant: Arc::new(tokio::sync::Mutex::new(Assistant::new(
                    self.llm.clone(),
                    self.call_timeout,
                ))),
                last_active: now,
            }
        });
        slot.last_active = now;
        slot.assistant.clone()
    }

    fn touch(&self, session_id: &str) {
        if let Some(slot) = self.lock_sessions().get_mut(session_id) {
            slot.last_active = Instant::now();
        }
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, SessionSlot>> {
        // The map is only touched in short non-panicking sections.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
