//! Cooperative scheduler for suspended continuations.
//!
//! The game runs on a single logical thread. Pauses (initial peek, inspect,
//! miss flip-back) and periodic work (timer tick, autosave) are modelled as
//! tasks due at a point in virtual time. The owner advances time explicitly
//! and dispatches each due task in `(due time, scheduling order)` order.
//!
//! Every task carries the [`SessionId`] it was scheduled for. Teardown
//! cancels a session's tasks, and the dispatcher still checks the ID before
//! acting, so a stale continuation can never touch a newer board.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Identity of one game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    /// The ID following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// Handle of a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// What a task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Conceal all tiles and enable input.
    EndInitialPeek,
    /// Judge the pair under inspection.
    EndInspection,
    /// Conceal a missed pair.
    FlipBack,
    /// Advance the elapsed-time counter.
    TimerTick,
    /// Persist a snapshot.
    Autosave,
}

/// A task waiting in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub session: SessionId,
    pub kind: TaskKind,
    /// Virtual time (ms) at which the task fires.
    pub due_ms: u64,
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Task IDs grow monotonically, so they break ties by scheduling order.
        (self.due_ms, self.id).cmp(&(other.due_ms, other.id))
    }
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual-time task queue.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    queue: BinaryHeap<Reverse<ScheduledTask>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `kind` to fire `delay_ms` from now.
    pub fn schedule(&mut self, session: SessionId, kind: TaskKind, delay_ms: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(ScheduledTask {
            id,
            session,
            kind,
            due_ms: self.now_ms.saturating_add(delay_ms),
        }));
        id
    }

    /// Drop one task. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|Reverse(task)| task.id != id);
        self.queue.len() != before
    }

    /// Drop every task of a session. Returns how many were dropped.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(task)| task.session != session);
        before - self.queue.len()
    }

    /// Drop every task of `session` with the given kind.
    pub fn cancel_kind(&mut self, session: SessionId, kind: TaskKind) -> usize {
        let before = self.queue.len();
        self.queue
            .retain(|Reverse(task)| task.session != session || task.kind != kind);
        before - self.queue.len()
    }

    /// True if `session` has a queued task of `kind`.
    #[must_use]
    pub fn has_pending(&self, session: SessionId, kind: TaskKind) -> bool {
        self.queue
            .iter()
            .any(|Reverse(task)| task.session == session && task.kind == kind)
    }

    /// Virtual time of the earliest queued task.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(task)| task.due_ms)
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock
    /// to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<ScheduledTask> {
        match self.queue.peek() {
            Some(Reverse(task)) if task.due_ms <= until_ms => {}
            _ => return None,
        }
        let Reverse(task) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(task.due_ms);
        Some(task)
    }

    /// Move the clock forward to `until_ms` (never backwards).
    pub fn settle_at(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
