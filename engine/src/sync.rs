use crate::config::DEBOUNCE_WINDOW_MS;

/// Work the session must perform when a debounce window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Serialize the full region set into the local cache.
    WriteCache,
    /// Send the pending regions to the remote store.
    FlushRemote,
}

/// Debounce timers for the two persistence paths. Cache writes and remote
/// flushes are armed together on every insert but fire independently, so a
/// failed flush never blocks the cache from staying current.
///
/// The controller only decides *when*; executing the actions (and rolling the
/// pending queue forward) is the session's job. Times are caller-supplied
/// millisecond timestamps, same clock as the animator.
#[derive(Debug, Clone)]
pub struct SyncController {
    debounce_ms: f64,
    cache_deadline: Option<f64>,
    flush_deadline: Option<f64>,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW_MS)
    }
}

impl SyncController {
    pub fn new(debounce_ms: f64) -> Self {
        Self {
            debounce_ms,
            cache_deadline: None,
            flush_deadline: None,
        }
    }

    /// A region changed: push both deadlines a full window out. Bursts of
    /// inserts keep sliding the deadlines forward and coalesce into one cache
    /// write and one flush.
    pub fn note_mutation(&mut self, now: f64) {
        self.cache_deadline = Some(now + self.debounce_ms);
        self.flush_deadline = Some(now + self.debounce_ms);
    }

    /// Deadlines that have come due, in execution order. Due deadlines are
    /// disarmed; polling is otherwise free of side effects.
    pub fn poll(&mut self, now: f64) -> Vec<SyncAction> {
        let mut actions = Vec::new();
        if self.cache_deadline.is_some_and(|at| now >= at) {
            self.cache_deadline = None;
            actions.push(SyncAction::WriteCache);
        }
        if self.flush_deadline.is_some_and(|at| now >= at) {
            self.flush_deadline = None;
            actions.push(SyncAction::FlushRemote);
        }
        actions
    }

    /// A failed flush re-arms the timer one window out so the batch is retried
    /// at a steady cadence. Successful flushes arm nothing.
    pub fn note_flush_result(&mut self, ok: bool, now: f64) {
        if !ok {
            self.flush_deadline = Some(now + self.debounce_ms);
        }
    }

    /// Session teardown: skip the remaining wait and run both paths now.
    pub fn teardown(&mut self) -> Vec<SyncAction> {
        self.cache_deadline = None;
        self.flush_deadline = None;
        vec![SyncAction::WriteCache, SyncAction::FlushRemote]
    }

    pub fn is_idle(&self) -> bool {
        self.cache_deadline.is_none() && self.flush_deadline.is_none()
    }

    #[cfg(test)]
    fn deadlines(&self) -> (Option<f64>, Option<f64>) {
        (self.cache_deadline, self.flush_deadline)
    }
}
