// ─── Exclusivity Controller ───
// Plans and dispatches the toggle operations that keep at most one mod
// enabled per hero bucket.

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{ModError, ModResult};
use crate::core::mods::Mod;

/// One desired state change for the external toggle mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOp {
    pub mod_id: String,
    pub desired_enabled: bool,
}

/// The seam to the mechanism that actually moves files around. Assumed
/// idempotent and atomic per mod.
#[async_trait]
pub trait ModToggler: Send + Sync {
    async fn set_enabled(&self, mod_id: &str, enabled: bool) -> ModResult<()>;
}

/// A toggle that the external mechanism rejected. Carried inside the batch
/// outcome, never propagated as the batch's own error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFailure {
    pub mod_id: String,
    pub error: ModError,
}

/// Outcome of one dispatched batch. Mods are independent files, so failing
/// to disable one does not invalidate enabling another; partial application
/// is surfaced, not rolled back.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBatchOutcome {
    pub applied: Vec<ToggleOp>,
    pub failures: Vec<ToggleFailure>,
}

impl ToggleBatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compute the minimal operation set that leaves exactly `target` enabled in
/// the bucket, or nothing enabled when `target` is `None`.
///
/// Pure set difference: every enabled mod other than the target gets a
/// disable op; the target gets an enable op only if it isn't already
/// enabled. Calling this again after the ops were applied yields an empty
/// list (idempotent no-op).
pub fn plan_exclusive(bucket: &[Mod], target: Option<&str>) -> Vec<ToggleOp> {
    let mut ops = Vec::new();

    for mod_item in bucket {
        if mod_item.enabled && target != Some(mod_item.id.as_str()) {
            ops.push(ToggleOp {
                mod_id: mod_item.id.clone(),
                desired_enabled: false,
            });
        }
    }

    if let Some(target_id) = target {
        let needs_enable = bucket
            .iter()
            .any(|m| m.id == target_id && !m.enabled);
        if needs_enable {
            ops.push(ToggleOp {
                mod_id: target_id.to_string(),
                desired_enabled: true,
            });
        }
    }

    ops
}

/// Dispatch a planned batch against the toggle mechanism, fan-out/fan-in.
///
/// All operations are issued concurrently; there is no ordering dependency
/// between disabling the others and enabling the target, and a failure never
/// short-circuits the rest of the batch.
pub async fn apply_toggle_batch(
    toggler: &dyn ModToggler,
    ops: Vec<ToggleOp>,
) -> ToggleBatchOutcome {
    if ops.is_empty() {
        return ToggleBatchOutcome::default();
    }

    info!(count = ops.len(), "dispatching toggle batch");

    let results = join_all(
        ops.iter()
            .map(|op| toggler.set_enabled(&op.mod_id, op.desired_enabled)),
    )
    .await;

    let mut outcome = ToggleBatchOutcome::default();
    for (op, result) in ops.into_iter().zip(results) {
        match result {
            Ok(()) => outcome.applied.push(op),
            Err(error) => {
                warn!(mod_id = %op.mod_id, %error, "toggle failed");
                outcome.failures.push(ToggleFailure {
                    mod_id: op.mod_id,
                    error,
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    fn mod_entry(id: &str, enabled: bool) -> Mod {
        Mod {
            id: id.to_string(),
            name: id.to_string(),
            file_name: format!("{id}.vpk"),
            path: format!("/addons/{id}.vpk"),
            enabled,
            priority: 50,
            size: 0,
            installed_at: Utc::now(),
            description: None,
            thumbnail_url: None,
            game_banana_id: None,
            category_id: None,
            source_section: None,
        }
    }

    struct FakeToggler {
        state: Mutex<HashMap<String, bool>>,
        failing: HashSet<String>,
    }

    impl FakeToggler {
        fn new(bucket: &[Mod]) -> Self {
            Self {
                state: Mutex::new(
                    bucket.iter().map(|m| (m.id.clone(), m.enabled)).collect(),
                ),
                failing: HashSet::new(),
            }
        }

        fn failing(mut self, id: &str) -> Self {
            self.failing.insert(id.to_string());
            self
        }

        fn snapshot(&self, bucket: &[Mod]) -> Vec<Mod> {
            let state = self.state.lock().unwrap();
            bucket
                .iter()
                .map(|m| {
                    let mut m = m.clone();
                    m.enabled = state[&m.id];
                    m
                })
                .collect()
        }
    }

    #[async_trait]
    impl ModToggler for FakeToggler {
        async fn set_enabled(&self, mod_id: &str, enabled: bool) -> ModResult<()> {
            if self.failing.contains(mod_id) {
                return Err(ModError::ModNotFound(mod_id.to_string()));
            }
            self.state
                .lock()
                .unwrap()
                .insert(mod_id.to_string(), enabled);
            Ok(())
        }
    }

    #[test]
    fn switch_disables_other_and_enables_target() {
        let bucket = vec![mod_entry("a", true), mod_entry("b", false)];
        let ops = plan_exclusive(&bucket, Some("b"));
        assert_eq!(
            ops,
            vec![
                ToggleOp {
                    mod_id: "a".into(),
                    desired_enabled: false
                },
                ToggleOp {
                    mod_id: "b".into(),
                    desired_enabled: true
                },
            ]
        );
    }

    #[test]
    fn sole_enabled_target_is_a_no_op() {
        let bucket = vec![mod_entry("a", true), mod_entry("b", false)];
        assert!(plan_exclusive(&bucket, Some("a")).is_empty());
    }

    #[test]
    fn deactivation_disables_everything() {
        let bucket = vec![mod_entry("a", true)];
        let ops = plan_exclusive(&bucket, None);
        assert_eq!(
            ops,
            vec![ToggleOp {
                mod_id: "a".into(),
                desired_enabled: false
            }]
        );
    }

    #[tokio::test]
    async fn applied_batch_is_idempotent() {
        let bucket = vec![mod_entry("a", true), mod_entry("b", false), mod_entry("c", true)];
        let toggler = FakeToggler::new(&bucket);

        let ops = plan_exclusive(&bucket, Some("b"));
        let outcome = apply_toggle_batch(&toggler, ops).await;
        assert!(outcome.is_complete());

        let bucket = toggler.snapshot(&bucket);
        let enabled: Vec<&str> = bucket
            .iter()
            .filter(|m| m.enabled)
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(enabled, vec!["b"]);

        // Second plan against the converged state is empty.
        assert!(plan_exclusive(&bucket, Some("b")).is_empty());
    }

    #[tokio::test]
    async fn partial_failure_is_reported_not_fatal() {
        let bucket = vec![mod_entry("a", true), mod_entry("b", false)];
        let toggler = FakeToggler::new(&bucket).failing("a");

        let outcome = apply_toggle_batch(&toggler, plan_exclusive(&bucket, Some("b"))).await;

        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].mod_id, "a");
        // The independent enable still went through.
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.applied[0].mod_id, "b");
        let bucket = toggler.snapshot(&bucket);
        assert!(bucket.iter().find(|m| m.id == "b").unwrap().enabled);
    }

    #[tokio::test]
    async fn sequential_switches_keep_at_most_one_enabled() {
        let mut bucket = vec![mod_entry("a", true), mod_entry("b", false), mod_entry("c", false)];
        let toggler = FakeToggler::new(&bucket);

        for target in ["b", "c", "c", "a"] {
            let ops = plan_exclusive(&bucket, Some(target));
            let outcome = apply_toggle_batch(&toggler, ops).await;
            assert!(outcome.is_complete());
            bucket = toggler.snapshot(&bucket);
            assert!(bucket.iter().filter(|m| m.enabled).count() <= 1);
        }
    }
}
