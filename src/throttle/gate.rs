use dashmap::DashMap;

use super::fingerprint::Fingerprint;

/// First wait window, before any backoff has accumulated.
pub const BASE_WAIT_MS: u64 = 1_000;

/// Ceiling on the computed wait window: two hours.
pub const MAX_WAIT_MS: u64 = 2 * 60 * 60 * 1_000;

/// Fixed short window applied when a fingerprint cannot be derived at all
/// (fail closed, not open).
pub const MALFORMED_CALLER_WAIT_SECS: u64 = 60;

/// Attempt counts above this qualify for the idle-forgiveness reset.
const FORGIVENESS_THRESHOLD: u32 = 5;

/// Per-fingerprint admission record.
#[derive(Debug, Clone, Copy)]
pub struct RateState {
    pub last_attempt_ms: u64,
    pub consecutive_attempts: u32,
}

/// Outcome of an admission check. `Deny` is a normal result carrying the
/// remaining wait, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny { retry_after_secs: u64 },
}

/// Admission gate with binary exponential backoff per caller fingerprint.
///
/// The policy penalizes frequency, not failure: every allowed call through
/// the gate escalates the next wait window, successful or not, because
/// repeated use of a sensitive endpoint is itself the signal being guarded
/// against. A denied call never escalates its own penalty - escalation only
/// compounds on calls that reach the gate after a window already elapsed.
pub struct AdmissionGate {
    states: DashMap<Fingerprint, RateState>,
    base_wait_ms: u64,
    max_wait_ms: u64,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::with_limits(BASE_WAIT_MS, MAX_WAIT_MS)
    }

    pub fn with_limits(base_wait_ms: u64, max_wait_ms: u64) -> Self {
        Self {
            states: DashMap::new(),
            base_wait_ms,
            max_wait_ms,
        }
    }

    /// Decides whether a caller may proceed now.
    pub fn admit(&self, fingerprint: &Fingerprint) -> Admission {
        self.admit_at(fingerprint, now_ms())
    }

    /// Clock-injected admission check; `admit` is the production entry
    /// point.
    pub fn admit_at(&self, fingerprint: &Fingerprint, now: u64) -> Admission {
        // entry() holds the shard lock for the whole read-modify-write,
        // serializing concurrent calls from the same fingerprint.
        let mut entry = self
            .states
            .entry(fingerprint.clone())
            .or_insert(RateState {
                last_attempt_ms: 0,
                consecutive_attempts: 0,
            });
        let state = entry.value_mut();

        let window = self.wait_window(state.consecutive_attempts);
        let elapsed = now.saturating_sub(state.last_attempt_ms);
        if elapsed < window {
            let retry_after_secs = (window - elapsed).div_ceil(1_000);
            tracing::debug!(
                "Denied {}: {} attempts, {}ms window, retry in {}s",
                fingerprint,
                state.consecutive_attempts,
                window,
                retry_after_secs
            );
            return Admission::Deny { retry_after_secs };
        }

        if state.consecutive_attempts > FORGIVENESS_THRESHOLD {
            // Long-idle forgiveness: the caller has proven many completed
            // waits, start the ladder over.
            state.consecutive_attempts = 0;
        } else {
            state.consecutive_attempts += 1;
        }
        state.last_attempt_ms = now;
        Admission::Allow
    }

    /// `min(base * 2^attempts, max)`, saturating well before the shift can
    /// overflow.
    pub fn wait_window(&self, attempts: u32) -> u64 {
        let exponent = attempts.min(63);
        self.base_wait_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_wait_ms)
    }

    /// Drops every fingerprint idle longer than the maximum wait window.
    /// An evicted caller re-enters as fresh. Returns the number of dropped
    /// entries.
    pub fn purge_idle(&self, now: u64) -> usize {
        let before = self.states.len();
        self.states
            .retain(|_, state| now.saturating_sub(state.last_attempt_ms) <= self.max_wait_ms);
        before - self.states.len()
    }

    /// Number of fingerprints currently tracked.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
