//! Integration tests for the remote analysis kill-switch.

use sentinel_app::{ENV_REMOTE_ENABLED, remote_enabled_from_env};

#[test]
fn remote_kill_switch_tests_disables_remote_when_env_is_false() {
    // Safety:
    // - This test binary has a single test that mutates process env.
    // - We reset the variable before returning.
    unsafe { std::env::set_var(ENV_REMOTE_ENABLED, "OFF") };
    assert!(!remote_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::set_var(ENV_REMOTE_ENABLED, "yes") };
    assert!(remote_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::remove_var(ENV_REMOTE_ENABLED) };
    assert!(remote_enabled_from_env());
}
