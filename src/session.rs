//! Per-session synchronization state and its derived snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use conversation_api::{CancellationSignal, StreamClient};
use derived_views::{
    reconcile_notifications, ContextLedger, CorrelationIndex, TaskBoard, TaskNotification,
};
use message_log::{MessageStore, StreamBatch, SubagentInfo};

/// All read-models derived from one log snapshot.
///
/// Rebuilt as a whole after every successful merge; holds no state a replay
/// of the log from scratch would not reproduce.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub correlation: CorrelationIndex,
    pub tasks: TaskBoard,
    pub context: ContextLedger,
    pub notifications: Vec<TaskNotification>,
}

impl Snapshot {
    fn empty(budget: u64) -> Self {
        Self::rebuild(&[], &[], budget)
    }

    fn rebuild(
        log: &[message_log::ConversationMessage],
        subagents: &[SubagentInfo],
        budget: u64,
    ) -> Self {
        let mut correlation = CorrelationIndex::build(log);
        correlation.set_subagents(subagents);
        let notifications = reconcile_notifications(log, &correlation);

        Self {
            tasks: TaskBoard::build(log),
            context: ContextLedger::build(log, budget),
            correlation,
            notifications,
        }
    }
}

/// Handle for one opened session.
///
/// Carries the generation that guards the store against stale writes and the
/// cancellation signal the transport loop polls. Cloning is cheap; all clones
/// refer to the same open.
#[derive(Debug, Clone)]
pub struct SessionTicket {
    session_id: String,
    generation: u64,
    cancel: CancellationSignal,
}

impl SessionTicket {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn cancel_signal(&self) -> &CancellationSignal {
        &self.cancel
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

/// Synchronization state for the active session.
///
/// Exactly one session is active at a time. Opening a session cancels the
/// previous handle before the new one exists, so no two transport loops for
/// one logical session can be live simultaneously, and a batch produced under
/// a superseded handle is dropped rather than merged.
#[derive(Debug)]
pub struct SessionSync {
    session_id: Option<String>,
    generation: u64,
    budget: u64,
    store: MessageStore,
    subagents: Vec<SubagentInfo>,
    snapshot: Snapshot,
    active_cancel: Option<CancellationSignal>,
}

impl SessionSync {
    #[must_use]
    pub fn new(context_budget: u64) -> Self {
        Self {
            session_id: None,
            generation: 0,
            budget: context_budget,
            store: MessageStore::new(),
            subagents: Vec::new(),
            snapshot: Snapshot::empty(context_budget),
            active_cancel: None,
        }
    }

    /// Switches to `session_id`: tears down the previous handle, resets the
    /// store and offset, and hands back the ticket for the new transport
    /// loop.
    pub fn open_session(&mut self, session_id: impl Into<String>) -> SessionTicket {
        self.invalidate_active_handle();

        let session_id = session_id.into();
        self.generation += 1;
        self.session_id = Some(session_id.clone());
        self.store.reset();
        self.subagents.clear();
        self.snapshot = Snapshot::empty(self.budget);

        let cancel = Arc::new(AtomicBool::new(false));
        self.active_cancel = Some(Arc::clone(&cancel));

        SessionTicket {
            session_id,
            generation: self.generation,
            cancel,
        }
    }

    /// Tears down the active session without opening another.
    pub fn close(&mut self) {
        self.invalidate_active_handle();
        self.generation += 1;
        self.session_id = None;
        self.store.reset();
        self.subagents.clear();
        self.snapshot = Snapshot::empty(self.budget);
    }

    fn invalidate_active_handle(&mut self) {
        if let Some(cancel) = self.active_cancel.take() {
            cancel.store(true, Ordering::Release);
        }
    }

    /// Merges one decoded batch and rebuilds the snapshot.
    ///
    /// Returns false — dropping the batch unmerged — when the ticket's
    /// generation has been superseded by a session switch.
    pub fn apply_batch(&mut self, ticket: &SessionTicket, batch: StreamBatch) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                session_id = %ticket.session_id,
                "dropping batch for superseded session handle"
            );
            return false;
        }

        self.store.merge(batch.messages);
        self.store.advance_offset(batch.offset);
        self.rebuild_snapshot();
        true
    }

    /// Installs the once-per-open subagent feed; stale feeds are dropped.
    pub fn install_subagents(&mut self, ticket: &SessionTicket, infos: Vec<SubagentInfo>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                session_id = %ticket.session_id,
                "dropping subagent feed for superseded session handle"
            );
            return false;
        }

        self.subagents = infos;
        self.rebuild_snapshot();
        true
    }

    fn rebuild_snapshot(&mut self) {
        self.snapshot = Snapshot::rebuild(self.store.messages(), &self.subagents, self.budget);
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.store.offset()
    }

    #[must_use]
    pub fn messages(&self) -> &[message_log::ConversationMessage] {
        self.store.messages()
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Drives the transport loop for one ticket, merging every batch that
/// arrives while the ticket is current. Returns when the ticket is
/// cancelled by a session switch or close.
pub async fn drive(client: &StreamClient, sync: &Mutex<SessionSync>, ticket: &SessionTicket) {
    let start_offset = lock_unpoisoned(sync).offset();
    client
        .run(
            ticket.session_id(),
            start_offset,
            Some(ticket.cancel_signal()),
            |batch| {
                lock_unpoisoned(sync).apply_batch(ticket, batch);
            },
        )
        .await;
}

/// Fetches the session's subagent correlation rows and installs them if the
/// ticket is still current. Fetch failures leave the map empty; the view
/// simply lacks subagent labels until the next open.
pub async fn load_subagents(
    client: &StreamClient,
    sync: &Mutex<SessionSync>,
    ticket: &SessionTicket,
) {
    match client.fetch_subagents(ticket.session_id()).await {
        Ok(infos) => {
            lock_unpoisoned(sync).install_subagents(ticket, infos);
        }
        Err(error) => {
            tracing::warn!(
                session_id = %ticket.session_id,
                %error,
                "subagent fetch failed"
            );
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
