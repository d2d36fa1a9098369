//! Model capability layer.
//!
//! The bridge never reflects over model types at runtime. Instead, each model
//! type implements [`ModelNode`] (member access by name) and publishes a
//! static [`TypeDescriptor`] (member names, kinds, declared types). The
//! descriptors are collected once at startup into a [`DescriptorRegistry`],
//! which lets the path resolver keep walking by declared type when an
//! intermediate object is absent from the live graph.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a node in the model graph.
pub type ModelRef = Arc<dyn ModelNode>;

/// Capability implemented by every model type the bridge can walk.
pub trait ModelNode: Send + Sync {
    /// Static metadata for this node's type.
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Fetches the current value of a member by name.
    /// Returns `None` if the type has no such member.
    fn member(&self, name: &str) -> Option<MemberValue>;

    /// Name of this node's runtime type, used for rule-set lookup and
    /// diagnostics.
    fn type_name(&self) -> &'static str {
        self.descriptor().type_name
    }
}

/// The fetched value of a model member.
pub enum MemberValue {
    /// An editable leaf value. The resolver never descends into scalars.
    Scalar,
    /// A nested object, possibly absent.
    Object(Option<ModelRef>),
    /// An ordered collection of nested objects.
    List(Vec<ModelRef>),
}

/// Kind of a declared member, as recorded in a [`TypeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Scalar,
    Object,
    List,
}

/// Declared metadata for one member of a model type.
#[derive(Debug, Clone)]
pub struct MemberDecl {
    /// Member name as it appears in property paths.
    pub name: &'static str,
    /// Whether the member is a scalar, a nested object, or a collection.
    pub kind: MemberKind,
    /// Declared type name of the member (element type for lists).
    /// `None` for scalars.
    pub declared_type: Option<&'static str>,
}

/// Static metadata for one model type: its name and declared members.
///
/// Built once per type (typically in a `OnceLock`) and registered in a
/// [`DescriptorRegistry`] at startup.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// The type's name, matched exactly by rule-set lookup.
    pub type_name: &'static str,
    members: HashMap<&'static str, MemberDecl>,
}

impl TypeDescriptor {
    /// Creates an empty descriptor for the named type.
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            members: HashMap::new(),
        }
    }

    /// Declares a scalar member.
    #[must_use]
    pub fn scalar(self, name: &'static str) -> Self {
        self.member_decl(name, MemberKind::Scalar, None)
    }

    /// Declares a nested-object member with the given declared type.
    #[must_use]
    pub fn object(self, name: &'static str, declared_type: &'static str) -> Self {
        self.member_decl(name, MemberKind::Object, Some(declared_type))
    }

    /// Declares an ordered-collection member with the given element type.
    #[must_use]
    pub fn list(self, name: &'static str, element_type: &'static str) -> Self {
        self.member_decl(name, MemberKind::List, Some(element_type))
    }

    fn member_decl(
        mut self,
        name: &'static str,
        kind: MemberKind,
        declared_type: Option<&'static str>,
    ) -> Self {
        self.members.insert(
            name,
            MemberDecl {
                name,
                kind,
                declared_type,
            },
        );
        self
    }

    /// Looks up a declared member by name.
    pub fn member(&self, name: &str) -> Option<&MemberDecl> {
        self.members.get(name)
    }
}

/// Startup-built table of type descriptors, keyed by type name.
///
/// Read-only during validation. The path resolver consults it to continue
/// walking by declared type across absent intermediate objects.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    by_name: HashMap<&'static str, &'static TypeDescriptor>,
}

impl DescriptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type descriptor. Later registrations for the same type
    /// name replace earlier ones.
    pub fn register(&mut self, descriptor: &'static TypeDescriptor) {
        self.by_name.insert(descriptor.type_name, descriptor);
    }

    /// Looks up a descriptor by type name.
    pub fn descriptor(&self, type_name: &str) -> Option<&'static TypeDescriptor> {
        self.by_name.get(type_name).copied()
    }
}

/// Address of exactly one editable field: (owner object, property name).
///
/// This is the unit the error store is keyed by. Two locations are equal iff
/// they refer to the same owner object (pointer identity, not value equality)
/// and the same property name.
#[derive(Clone)]
pub struct FieldLocation {
    owner: ModelRef,
    property: String,
}

impl FieldLocation {
    /// Creates a location for the named property on the given owner.
    pub fn new(owner: ModelRef, property: impl Into<String>) -> Self {
        Self {
            owner,
            property: property.into(),
        }
    }

    /// The object owning the field.
    pub fn owner(&self) -> &ModelRef {
        &self.owner
    }

    /// The field's property name on the owner.
    pub fn property(&self) -> &str {
        &self.property
    }

    fn owner_addr(&self) -> usize {
        Arc::as_ptr(&self.owner) as *const u8 as usize
    }
}

impl PartialEq for FieldLocation {
    fn eq(&self, other: &Self) -> bool {
        self.owner_addr() == other.owner_addr() && self.property == other.property
    }
}

impl Eq for FieldLocation {}

impl Hash for FieldLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner_addr().hash(state);
        self.property.hash(state);
    }
}

impl fmt::Debug for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.type_name(), self.property)
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.type_name(), self.property)
    }
}
