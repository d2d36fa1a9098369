//! Bridges a declarative validation-rule engine to an interactive
//! form-editing surface.
//!
//! Given an edit surface holding a model graph and a pool of rule-sets keyed
//! by model type, the bridge drives the surface's per-field error state:
//!
//! ```text
//! surface event ──► orchestrator ──► rule-sets ──► failures (path, message)
//!                                                     │
//!                         path resolver ◄─────────────┘
//!                              │
//!                              ▼
//!                  error store keyed by (owner object, property name)
//! ```
//!
//! The pieces:
//! - [`ModelNode`] / [`TypeDescriptor`] / [`DescriptorRegistry`] — the
//!   capability layer model types implement so the bridge can walk the
//!   graph without reflection
//! - [`path::resolve`] — maps dotted/indexed paths like `Orders[2].Total`
//!   to a [`FieldLocation`]
//! - [`RuleSet`] / [`RuleSetProvider`] / [`RuleSetRegistry`] — the rule
//!   engine boundary
//! - [`FieldErrorStore`] / [`InMemoryErrorStore`] — where messages land
//! - [`EditSurface`] / [`FormSurface`] — the event source
//! - [`ValidationBinding`] plus [`validate_model`] / [`validate_field`] —
//!   the orchestrator
//!
//! # Quick Start
//!
//! Implement [`ModelNode`] for your model types, register their descriptors
//! and rule-sets at startup, then attach:
//!
//! ```text
//! let binding = ValidationBinding::attach(
//!     surface, store, rules, descriptors, BindingOptions::default(),
//! );
//! surface.notify_field_changed("Address.City");
//! ```
//!
//! Flows triggered through the binding run strictly one at a time, so a
//! field-level run can never interleave with an in-flight full-model run.

pub mod binding;
pub mod error;
pub mod model;
pub mod path;
pub mod rules;
pub mod store;
pub mod surface;

pub use binding::{
    BindingOptions, ErrorSink, ModelTransform, ValidationBinding, validate_field, validate_model,
};
pub use error::{RuleSetError, ValidateError, ValidateResult};
pub use model::{
    DescriptorRegistry, FieldLocation, MemberDecl, MemberKind, MemberValue, ModelNode, ModelRef,
    TypeDescriptor,
};
pub use path::{PathSegment, PropertyPath};
pub use rules::{RuleContext, RuleFailure, RuleSet, RuleSetProvider, RuleSetRegistry};
pub use store::{FieldErrorStore, InMemoryErrorStore};
pub use surface::{EditSurface, FormSurface, SurfaceEvent};
