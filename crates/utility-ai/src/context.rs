//! Per-evaluation scope.
//!
//! An [`EvaluationContext`] lives for exactly one evaluator invocation. It
//! holds the memo table that makes considerations idempotent within that
//! invocation and the ordered trace reported to the diagnostics sink.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::consideration::ConsiderationId;
use crate::diagnostics::ConsiderationRecord;
use crate::error::{Result, UtilityError};

/// Which value of a consideration a memo entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Output of the raw-measurement function.
    Raw,
    /// Output of the response curve.
    Utility,
}

/// Memo table key.
///
/// Keys come from consideration identity, never from display names, so two
/// considerations sharing a name cannot overwrite each other's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub id: ConsiderationId,
    pub kind: ValueKind,
}

impl MemoKey {
    /// Key of the raw measurement.
    #[inline]
    pub const fn raw(id: ConsiderationId) -> Self {
        Self {
            id,
            kind: ValueKind::Raw,
        }
    }

    /// Key of the curve output.
    #[inline]
    pub const fn utility(id: ConsiderationId) -> Self {
        Self {
            id,
            kind: ValueKind::Utility,
        }
    }
}

/// Memoization and trace scope for a single evaluation.
///
/// Created by [`UtilityEvaluator::evaluate`](crate::UtilityEvaluator::evaluate)
/// and dropped before it returns. Build one directly to evaluate
/// considerations outside an evaluator.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    memo: HashMap<MemoKey, f64>,
    trace: Vec<ConsiderationRecord>,
    names: HashMap<String, ConsiderationId>,
    strict_names: bool,
}

impl EvaluationContext {
    /// A lenient context: shared names are only logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that rejects two distinct considerations sharing a
    /// display name with [`UtilityError::AmbiguousKey`].
    pub fn strict() -> Self {
        Self {
            strict_names: true,
            ..Self::default()
        }
    }

    /// Value stored under `key`, if any.
    #[inline]
    pub fn cached(&self, key: MemoKey) -> Option<f64> {
        self.memo.get(&key).copied()
    }

    /// Stores `value` under `key`, replacing any earlier value.
    #[inline]
    pub fn store(&mut self, key: MemoKey, value: f64) {
        self.memo.insert(key, value);
    }

    /// Appends a trace record for `id`.
    pub fn record(&mut self, id: ConsiderationId, name: &str, raw: f64, utility: f64) -> Result<()> {
        match self.names.entry(name.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
            Entry::Occupied(slot) if *slot.get() != id => {
                if self.strict_names {
                    return Err(UtilityError::AmbiguousKey {
                        name: name.to_owned(),
                    });
                }
                tracing::warn!(
                    name,
                    first = %slot.get(),
                    second = %id,
                    "consideration name shared by distinct considerations"
                );
            }
            Entry::Occupied(_) => {}
        }

        self.trace.push(ConsiderationRecord {
            name: name.to_owned(),
            raw,
            utility,
        });
        Ok(())
    }

    /// Records in evaluation order.
    pub fn trace(&self) -> &[ConsiderationRecord] {
        &self.trace
    }

    /// Consumes the context, keeping only the trace.
    pub fn into_trace(self) -> Vec<ConsiderationRecord> {
        self.trace
    }

    /// Number of trace records.
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_and_utility_keys_are_distinct() {
        let id = ConsiderationId::next();
        let mut scope = EvaluationContext::new();
        scope.store(MemoKey::raw(id), 0.2);
        scope.store(MemoKey::utility(id), 0.8);

        assert_eq!(scope.cached(MemoKey::raw(id)), Some(0.2));
        assert_eq!(scope.cached(MemoKey::utility(id)), Some(0.8));
        assert_eq!(scope.cached(MemoKey::utility(ConsiderationId::next())), None);
    }

    #[test]
    fn shared_names_are_tolerated_by_default() {
        let mut scope = EvaluationContext::new();
        scope.record(ConsiderationId::next(), "hunger", 1.0, 1.0).unwrap();
        scope.record(ConsiderationId::next(), "hunger", 0.0, 0.0).unwrap();
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn strict_scope_rejects_shared_names() {
        let mut scope = EvaluationContext::strict();
        let id = ConsiderationId::next();
        scope.record(id, "hunger", 1.0, 1.0).unwrap();
        // Same consideration recorded again is fine.
        scope.record(id, "hunger", 1.0, 1.0).unwrap();

        let err = scope
            .record(ConsiderationId::next(), "hunger", 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, UtilityError::AmbiguousKey { ref name } if name == "hunger"));
        assert_eq!(scope.len(), 2);
    }
}
