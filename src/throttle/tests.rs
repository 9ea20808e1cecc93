//! Throttle Module Tests
//!
//! Validates the admission state machine against its documented policy,
//! including the parts that diverge from textbook backoff on purpose: the
//! escalation on allowed calls and the attempts-above-five forgiveness rule.
//!
//! ## Test Scopes
//! - **Timeline**: the allow/deny sequence for a single caller.
//! - **Escalation & forgiveness**: how the window grows and resets.
//! - **Bounds**: the window ceiling and state-map eviction.
//! - **Fingerprints**: derivation determinism and isolation.

#[cfg(test)]
mod tests {
    use crate::throttle::fingerprint::Fingerprint;
    use crate::throttle::gate::{Admission, AdmissionGate, BASE_WAIT_MS, MAX_WAIT_MS};

    // A realistic clock origin; the epoch itself would sit inside the very
    // first wait window.
    const T0: u64 = 10_000_000;

    fn fp(label: &str) -> Fingerprint {
        Fingerprint::derive("203.0.113.7", label)
    }

    fn deny_secs(admission: Admission) -> u64 {
        match admission {
            Admission::Deny { retry_after_secs } => retry_after_secs,
            Admission::Allow => panic!("expected Deny, got Allow"),
        }
    }

    // ============================================================
    // TIMELINE
    // ============================================================

    #[test]
    fn test_fresh_caller_is_allowed() {
        let gate = AdmissionGate::new();
        assert_eq!(gate.admit_at(&fp("fresh"), T0), Admission::Allow);
    }

    #[test]
    fn test_backoff_timeline() {
        let gate = AdmissionGate::new();
        let caller = fp("timeline");

        // First call: allowed, attempts becomes 1.
        assert_eq!(gate.admit_at(&caller, T0), Admission::Allow);

        // 500ms later: window is now 2000ms, 1500ms remain -> wait 2s.
        let denied = gate.admit_at(&caller, T0 + 500);
        assert_eq!(deny_secs(denied), 2);

        // After the window elapsed: allowed again, attempts becomes 2.
        assert_eq!(gate.admit_at(&caller, T0 + 2_100), Admission::Allow);

        // The next window is 4000ms from the last allowed call.
        let denied = gate.admit_at(&caller, T0 + 2_100 + 1_000);
        assert_eq!(deny_secs(denied), 3);
        assert_eq!(gate.admit_at(&caller, T0 + 2_100 + 4_000), Admission::Allow);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let gate = AdmissionGate::new();
        let caller = fp("rounding");

        gate.admit_at(&caller, T0);
        // 1999ms remain of the 2000ms window: still a full 2 seconds.
        assert_eq!(deny_secs(gate.admit_at(&caller, T0 + 1)), 2);
        // 1ms remains: rounds up to 1 second, never 0.
        assert_eq!(deny_secs(gate.admit_at(&caller, T0 + 1_999)), 1);
    }

    // ============================================================
    // ESCALATION & FORGIVENESS
    // ============================================================

    #[test]
    fn test_denied_calls_do_not_escalate() {
        let gate = AdmissionGate::new();
        let caller = fp("hammering");

        gate.admit_at(&caller, T0);

        // Hammering inside the window: the quoted wait never grows.
        for _ in 0..10 {
            assert_eq!(deny_secs(gate.admit_at(&caller, T0 + 500)), 2);
        }

        // The window after the denials is still the attempts=1 window.
        assert_eq!(gate.admit_at(&caller, T0 + 2_000), Admission::Allow);
    }

    #[test]
    fn test_allowed_calls_escalate() {
        let gate = AdmissionGate::new();
        let caller = fp("frequent");

        // Patient caller waiting out every window still escalates: the
        // policy penalizes frequency, not failure.
        let mut now = T0;
        for attempts in 1..=4u32 {
            assert_eq!(gate.admit_at(&caller, now), Admission::Allow);
            let window = BASE_WAIT_MS * (1 << attempts);
            assert_eq!(
                deny_secs(gate.admit_at(&caller, now + window - 1_000)),
                1,
                "window after {attempts} allowed calls should be {window}ms"
            );
            now += window;
        }
    }

    #[test]
    fn test_forgiveness_above_five_attempts() {
        let gate = AdmissionGate::new();
        let caller = fp("reformed");

        // Six allowed calls, each after its full window: attempts reaches 6.
        let mut now = T0;
        for attempts in 1..=6u32 {
            assert_eq!(gate.admit_at(&caller, now), Admission::Allow);
            now += BASE_WAIT_MS * (1 << attempts);
        }

        // Attempts is above the threshold: the next eligible call resets the
        // ladder to zero instead of climbing to 7.
        assert_eq!(gate.admit_at(&caller, now), Admission::Allow);

        // Proof of the reset: the following window is the base window again,
        // not the 128-second window a seventh attempt would produce.
        assert_eq!(gate.admit_at(&caller, now + BASE_WAIT_MS), Admission::Allow);
    }

    #[test]
    fn test_no_forgiveness_at_or_below_five() {
        let gate = AdmissionGate::new();
        let caller = fp("unforgiven");

        // Three allowed calls; a long idle period does not reset the ladder
        // while attempts is at or below five.
        let mut now = T0;
        for _ in 0..3 {
            assert_eq!(gate.admit_at(&caller, now), Admission::Allow);
            now += MAX_WAIT_MS;
        }

        // Fourth call after the idle gap: attempts continues to 4, so the
        // window is 16 seconds, not the base window.
        assert_eq!(gate.admit_at(&caller, now), Admission::Allow);
        assert_eq!(deny_secs(gate.admit_at(&caller, now + 8_000)), 8);
    }

    // ============================================================
    // BOUNDS
    // ============================================================

    #[test]
    fn test_wait_window_is_capped() {
        let gate = AdmissionGate::new();

        assert_eq!(gate.wait_window(0), BASE_WAIT_MS);
        assert_eq!(gate.wait_window(3), 8 * BASE_WAIT_MS);
        // 2^23 seconds is already past two hours.
        assert_eq!(gate.wait_window(23), MAX_WAIT_MS);
        assert_eq!(gate.wait_window(63), MAX_WAIT_MS);
        // Shift exponents beyond 63 must not overflow.
        assert_eq!(gate.wait_window(u32::MAX), MAX_WAIT_MS);
    }

    #[test]
    fn test_purge_idle_drops_stale_fingerprints() {
        let gate = AdmissionGate::new();
        let stale = fp("stale");
        let active = fp("active");

        gate.admit_at(&stale, T0);
        gate.admit_at(&active, T0 + MAX_WAIT_MS);
        assert_eq!(gate.tracked(), 2);

        let now = T0 + MAX_WAIT_MS + 1;
        assert_eq!(gate.purge_idle(now), 1);
        assert_eq!(gate.tracked(), 1);

        // The surviving caller keeps its accumulated state.
        assert_eq!(deny_secs(gate.admit_at(&active, now)), 2);
    }

    #[test]
    fn test_purge_idle_keeps_everything_fresh() {
        let gate = AdmissionGate::new();
        gate.admit_at(&fp("a"), T0);
        gate.admit_at(&fp("b"), T0);

        assert_eq!(gate.purge_idle(T0 + 1_000), 0);
        assert_eq!(gate.tracked(), 2);
    }

    // ============================================================
    // FINGERPRINTS
    // ============================================================

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = Fingerprint::derive("198.51.100.4", "agent/1.0");
        let b = Fingerprint::derive("198.51.100.4", "agent/1.0");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_by_input() {
        let base = Fingerprint::derive("198.51.100.4", "agent/1.0");
        assert_ne!(base, Fingerprint::derive("198.51.100.5", "agent/1.0"));
        assert_ne!(base, Fingerprint::derive("198.51.100.4", "agent/2.0"));
    }

    #[test]
    fn test_fingerprints_are_isolated() {
        let gate = AdmissionGate::new();
        let first = fp("first");
        let second = fp("second");

        gate.admit_at(&first, T0);
        // A cooling first caller does not affect a fresh second one.
        assert!(matches!(
            gate.admit_at(&first, T0 + 100),
            Admission::Deny { .. }
        ));
        assert_eq!(gate.admit_at(&second, T0 + 100), Admission::Allow);
    }
}
