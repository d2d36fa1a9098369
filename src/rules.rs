//! Rule-set contracts and lookup.
//!
//! A rule-set bundles the validation rules for one model type. The bridge
//! never interprets rules itself; it runs rule-sets through [`RuleSet::run`]
//! and maps the resulting failures onto field locations. Rule-sets are
//! looked up per call through a [`RuleSetProvider`], keyed by the model's
//! exact runtime type name; [`RuleSetRegistry`] is the standard startup-built
//! provider.

use crate::error::RuleSetError;
use crate::model::{ModelNode, ModelRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A single validation failure reported by a rule-set: the property path of
/// the offending value (relative to the validated model) and a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    /// Dotted/indexed property path, e.g. `Orders[2].Total`.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl RuleFailure {
    /// Creates a failure for the given path and message.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Evaluation context handed to a rule-set run: the model to validate and an
/// optional restriction to a single member name.
pub struct RuleContext {
    model: ModelRef,
    member_filter: Option<String>,
}

impl RuleContext {
    /// Context for a full-model run: every rule applies.
    pub fn whole_model(model: ModelRef) -> Self {
        Self {
            model,
            member_filter: None,
        }
    }

    /// Context restricted to rules targeting the named member.
    pub fn for_member(model: ModelRef, member: impl Into<String>) -> Self {
        Self {
            model,
            member_filter: Some(member.into()),
        }
    }

    /// The model instance to validate.
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// The member restriction, if any.
    pub fn member_filter(&self) -> Option<&str> {
        self.member_filter.as_deref()
    }

    /// Whether rules targeting the named member should run under this
    /// context. True when the context is unrestricted.
    pub fn applies_to(&self, member: &str) -> bool {
        match &self.member_filter {
            Some(filter) => filter == member,
            None => true,
        }
    }
}

/// A bundle of validation rules for one model type.
///
/// Implementations must be side-effect-free on the model and safe to invoke
/// concurrently with themselves and with other rule-sets on the same
/// instance. Rules may await external state (e.g. uniqueness checks).
///
/// Implementations must honor [`RuleContext::applies_to`]: under a
/// member-restricted context, only rules targeting that member may report
/// failures.
#[async_trait]
pub trait RuleSet: Send + Sync {
    /// Runs the applicable rules and returns their failures.
    ///
    /// # Errors
    ///
    /// A fault aborts the owning validation flow; it is never downgraded to
    /// a failure message.
    async fn run(&self, ctx: &RuleContext) -> Result<Vec<RuleFailure>, RuleSetError>;
}

/// Resolves the rule-sets applicable to a model instance.
///
/// Resolution is by the model's exact runtime type on every call; the bridge
/// neither caches nor assumes caching.
pub trait RuleSetProvider: Send + Sync {
    /// Returns the rule-sets applicable to the given instance.
    fn rule_sets_for(&self, model: &dyn ModelNode) -> Vec<Arc<dyn RuleSet>>;
}

/// Startup-built table mapping type names to rule-set instances.
///
/// Process-lifetime, read-only during validation.
#[derive(Default)]
pub struct RuleSetRegistry {
    by_type: HashMap<&'static str, Vec<Arc<dyn RuleSet>>>,
}

impl RuleSetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule-set for the named model type. Multiple rule-sets may
    /// be registered for the same type.
    pub fn register(&mut self, type_name: &'static str, rule_set: Arc<dyn RuleSet>) {
        self.by_type.entry(type_name).or_default().push(rule_set);
    }
}

impl RuleSetProvider for RuleSetRegistry {
    fn rule_sets_for(&self, model: &dyn ModelNode) -> Vec<Arc<dyn RuleSet>> {
        self.by_type
            .get(model.type_name())
            .cloned()
            .unwrap_or_default()
    }
}
