//! Transforms applied to slice values.
//!
//! A transform is a forward/inverse pair. The forward half (`inbound`)
//! runs when a slice is persisted; the inverse half (`outbound`) runs when
//! it is restored. During restoration inverses run in reverse configuration
//! order, so for `[A, B]` the value passes through `B.outbound` then
//! `A.outbound`.

use crate::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// A reversible operation on one slice's value.
pub trait Transform: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        "transform"
    }

    /// Forward operation, applied before persisting.
    fn inbound(&self, value: Value, _slice: &str) -> Result<Value> {
        Ok(value)
    }

    /// Inverse operation, applied while restoring.
    fn outbound(&self, value: Value, slice: &str) -> Result<Value>;
}

/// Run every transform's inverse over `value`, last-configured first.
///
/// Stops at the first failure.
pub fn apply_outbound(transforms: &[Arc<dyn Transform>], value: Value, slice: &str) -> Result<Value> {
    transforms
        .iter()
        .rev()
        .try_fold(value, |value, transform| transform.outbound(value, slice))
}

/// Run every transform's forward operation over `value`, in configuration order.
pub fn apply_inbound(transforms: &[Arc<dyn Transform>], value: Value, slice: &str) -> Result<Value> {
    transforms
        .iter()
        .try_fold(value, |value, transform| transform.inbound(value, slice))
}
