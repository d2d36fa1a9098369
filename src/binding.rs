//! Validation orchestration.
//!
//! Two entry points drive the error store: [`validate_model`] re-validates
//! the whole model graph, [`validate_field`] re-validates a single changed
//! field. [`ValidationBinding::attach`] wires both to an edit surface's
//! event stream through a single-consumer actor task, which serializes the
//! flows so their store mutations can never interleave.
//!
//! Within one flow the ordering guarantee is: clear notification
//! happens-before repopulate, which happens-before exactly one final change
//! notification.

use crate::error::{ValidateError, ValidateResult};
use crate::model::{DescriptorRegistry, ModelRef};
use crate::path;
use crate::rules::{RuleContext, RuleFailure, RuleSet, RuleSetProvider};
use crate::store::FieldErrorStore;
use crate::surface::{EditSurface, SurfaceEvent};
use futures::future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Optional substitution of the object to validate, in place of the raw
/// edited model. Must be a pure function of the model; it is re-applied on
/// every flow invocation and never cached.
pub type ModelTransform = Arc<dyn Fn(ModelRef) -> ModelRef + Send + Sync>;

/// Callback receiving errors from flows run by the binding actor.
pub type ErrorSink = Arc<dyn Fn(ValidateError) + Send + Sync>;

/// Configuration for a [`ValidationBinding`].
#[derive(Clone, Default)]
pub struct BindingOptions {
    /// Property names the host considers required. Carried opaquely for the
    /// host's own use; the validation flows never read it.
    pub required_properties: Vec<String>,
    /// Optional model transform applied before every validation.
    pub transform: Option<ModelTransform>,
    /// Receives errors from flows the actor ran. Aborted flows are also
    /// logged at `warn` level.
    pub on_error: Option<ErrorSink>,
}

/// A live subscription binding an edit surface's events to the two
/// validation flows.
pub struct ValidationBinding {
    task: JoinHandle<()>,
    options: BindingOptions,
}

impl ValidationBinding {
    /// Subscribes to the surface's events and spawns the actor task that
    /// runs validation flows one at a time, in event order.
    ///
    /// Attach exactly once per edit-surface lifetime: attaching twice opens
    /// a second subscription and every event then triggers two validation
    /// runs. This is not guarded internally.
    pub fn attach(
        surface: Arc<dyn EditSurface>,
        store: Arc<dyn FieldErrorStore>,
        provider: Arc<dyn RuleSetProvider>,
        registry: Arc<DescriptorRegistry>,
        options: BindingOptions,
    ) -> Self {
        let mut events = surface.subscribe();
        let actor_options = options.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let transform = actor_options.transform.as_ref();
                let result = match &event {
                    SurfaceEvent::ValidationRequested => {
                        validate_model(&surface, &store, &provider, &registry, transform).await
                    }
                    SurfaceEvent::FieldChanged(field_path) => {
                        validate_field(&surface, &store, field_path, &provider, &registry, transform)
                            .await
                    }
                };
                if let Err(err) = result {
                    warn!(?event, error = %err, "validation flow aborted");
                    if let Some(sink) = &actor_options.on_error {
                        sink(err);
                    }
                }
            }
        });
        Self { task, options }
    }

    /// The opaque required-properties passthrough this binding was
    /// configured with.
    pub fn required_properties(&self) -> &[String] {
        &self.options.required_properties
    }

    /// Stops the actor task. The original integration never unsubscribes;
    /// call this only when tearing the surface down early.
    pub fn detach(self) {
        self.task.abort();
    }
}

/// Validates the whole model graph and republishes every field's errors.
///
/// Clears the entire store (observers may transiently see an all-clear
/// state), runs every applicable rule-set concurrently against the
/// (optionally transformed) model, maps each failure's path to its field
/// location, and accumulates messages without deduplication. Failures whose
/// path resolves to an absent parent are dropped with a debug diagnostic.
///
/// # Errors
///
/// `MissingModel` before any store mutation; rule-set faults and
/// path-resolution errors abort the flow, leaving the store in its
/// post-clear state ("validation did not complete").
pub async fn validate_model(
    surface: &Arc<dyn EditSurface>,
    store: &Arc<dyn FieldErrorStore>,
    provider: &Arc<dyn RuleSetProvider>,
    registry: &DescriptorRegistry,
    transform: Option<&ModelTransform>,
) -> ValidateResult<()> {
    let model = surface.model().ok_or(ValidateError::MissingModel)?;

    store.clear_all();
    store.notify_changed();

    let target = apply_transform(model, transform);
    let rule_sets = provider.rule_sets_for(target.as_ref());
    debug!(
        type_name = target.type_name(),
        rule_sets = rule_sets.len(),
        "running full-model validation"
    );

    let ctx = RuleContext::whole_model(target.clone());
    let failures = run_rule_sets(&rule_sets, &ctx).await?;

    for failure in &failures {
        match path::resolve(&target, &failure.path, registry)? {
            Some(location) => store.add_message(&location, &failure.message),
            None => debug!(
                path = %failure.path,
                "dropping failure: path has no addressable parent"
            ),
        }
    }

    store.notify_changed();
    Ok(())
}

/// Re-validates a single changed field and refreshes only its messages.
///
/// Resolves the field's path against the (optionally transformed) model,
/// clears only that location, runs the applicable rule-sets under a context
/// restricted to the leaf member name, and adds the failure messages
/// deduplicated by exact string equality. A field path whose parent is
/// absent from the live graph makes the flow a logged no-op.
///
/// # Errors
///
/// Same conditions as [`validate_model`].
pub async fn validate_field(
    surface: &Arc<dyn EditSurface>,
    store: &Arc<dyn FieldErrorStore>,
    field_path: &str,
    provider: &Arc<dyn RuleSetProvider>,
    registry: &DescriptorRegistry,
    transform: Option<&ModelTransform>,
) -> ValidateResult<()> {
    let model = surface.model().ok_or(ValidateError::MissingModel)?;
    let target = apply_transform(model, transform);

    let Some(location) = path::resolve(&target, field_path, registry)? else {
        debug!(path = field_path, "ignoring field change: no addressable parent");
        return Ok(());
    };

    store.clear_field(&location);
    store.notify_changed();

    let rule_sets = provider.rule_sets_for(target.as_ref());
    debug!(
        field = %location,
        rule_sets = rule_sets.len(),
        "running field-level validation"
    );

    let ctx = RuleContext::for_member(target.clone(), location.property());
    let failures = run_rule_sets(&rule_sets, &ctx).await?;

    // Unlike the full-model flow, identical messages collapse to one.
    let mut messages: Vec<&str> = Vec::new();
    for failure in &failures {
        if !messages.contains(&failure.message.as_str()) {
            messages.push(&failure.message);
        }
    }
    for message in messages {
        store.add_message(&location, message);
    }

    store.notify_changed();
    Ok(())
}

fn apply_transform(model: ModelRef, transform: Option<&ModelTransform>) -> ModelRef {
    match transform {
        Some(f) => f(model),
        None => model,
    }
}

/// Runs rule-sets concurrently and concatenates their failures. Rule-sets
/// are independent, so order across them is insignificant; the first fault
/// aborts the whole run.
async fn run_rule_sets(
    rule_sets: &[Arc<dyn RuleSet>],
    ctx: &RuleContext,
) -> ValidateResult<Vec<RuleFailure>> {
    let runs = rule_sets.iter().map(|rule_set| rule_set.run(ctx));
    let results = future::try_join_all(runs).await?;
    Ok(results.into_iter().flatten().collect())
}
