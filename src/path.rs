//! Property-path parsing and resolution.
//!
//! A property path is a dot-delimited string like `Orders[2].Total`: each
//! segment names a member, optionally followed by a bracketed integer index
//! meaning "descend into the ordered collection at this member, then take
//! the element at this index". Resolution walks the live model graph and
//! produces the [`FieldLocation`] the error store is keyed by.

use crate::error::{ValidateError, ValidateResult};
use crate::model::{DescriptorRegistry, FieldLocation, MemberKind, MemberValue, ModelRef};

/// One parsed path segment: a member name and an optional collection index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment<'a> {
    pub name: &'a str,
    pub index: Option<usize>,
}

/// A parsed property path. Always contains at least one segment; the final
/// segment names the leaf property on the resolved parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath<'a> {
    segments: Vec<PathSegment<'a>>,
}

impl<'a> PropertyPath<'a> {
    /// Parses a dot-delimited path string.
    ///
    /// # Errors
    ///
    /// `MalformedPath` for an empty path, an empty segment, or a bare index
    /// with no member name; `BadIndexSyntax` for an unterminated bracket or
    /// a non-integer index.
    pub fn parse(raw: &'a str) -> ValidateResult<Self> {
        if raw.is_empty() {
            return Err(ValidateError::MalformedPath {
                path: raw.to_string(),
            });
        }
        let mut segments = Vec::new();
        for part in raw.split('.') {
            segments.push(parse_segment(part, raw)?);
        }
        Ok(Self { segments })
    }

    /// All segments, leaf last.
    pub fn segments(&self) -> &[PathSegment<'a>] {
        &self.segments
    }

    /// The final segment, naming the leaf property.
    pub fn leaf(&self) -> PathSegment<'a> {
        self.segments[self.segments.len() - 1]
    }
}

fn parse_segment<'a>(part: &'a str, raw: &str) -> ValidateResult<PathSegment<'a>> {
    if part.is_empty() {
        return Err(ValidateError::MalformedPath {
            path: raw.to_string(),
        });
    }
    let Some(open) = part.find('[') else {
        return Ok(PathSegment {
            name: part,
            index: None,
        });
    };
    if open == 0 {
        return Err(ValidateError::MalformedPath {
            path: raw.to_string(),
        });
    }
    if !part.ends_with(']') {
        return Err(ValidateError::BadIndexSyntax {
            segment: part.to_string(),
        });
    }
    let inner = &part[open + 1..part.len() - 1];
    let index = inner
        .parse::<usize>()
        .map_err(|_| ValidateError::BadIndexSyntax {
            segment: part.to_string(),
        })?;
    Ok(PathSegment {
        name: &part[..open],
        index: Some(index),
    })
}

/// Walk state: either a live object, or an absent value known only by its
/// declared type (`None` when even the declared type is unknowable, e.g.
/// after descending into a scalar).
enum Cursor {
    Present(ModelRef),
    Absent(Option<&'static str>),
}

/// Resolves a path against a model graph to the (parent, leaf property)
/// location the error store addresses.
///
/// Returns `Ok(None)` when every segment was legal but the parent object is
/// absent from the live graph: an absent intermediate does not short-circuit
/// the walk (lookup continues by declared type), and the final parent may
/// legitimately be missing. Callers treat that as "cannot localize", not as
/// an error.
///
/// # Errors
///
/// Parse errors, unknown members, indexing a non-collection, and indexes out
/// of range all abort the caller's validation flow; see [`ValidateError`].
pub fn resolve(
    root: &ModelRef,
    path: &str,
    registry: &DescriptorRegistry,
) -> ValidateResult<Option<FieldLocation>> {
    let parsed = PropertyPath::parse(path)?;
    let segments = parsed.segments();
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| ValidateError::MalformedPath {
            path: path.to_string(),
        })?;

    let mut cursor = Cursor::Present(root.clone());
    for segment in parents {
        cursor = step(cursor, *segment, registry)?;
    }

    // Indexes are not expected on the leaf in practice, but if present they
    // are stripped: only the member name addresses the field.
    match cursor {
        Cursor::Present(owner) => Ok(Some(FieldLocation::new(owner, leaf.name))),
        Cursor::Absent(_) => Ok(None),
    }
}

fn step(
    cursor: Cursor,
    segment: PathSegment<'_>,
    registry: &DescriptorRegistry,
) -> ValidateResult<Cursor> {
    match cursor {
        Cursor::Present(obj) => {
            let type_name = obj.type_name();
            let value =
                obj.member(segment.name)
                    .ok_or_else(|| ValidateError::UnknownMember {
                        property: segment.name.to_string(),
                        type_name: type_name.to_string(),
                    })?;
            match (value, segment.index) {
                (MemberValue::List(items), Some(index)) => match items.get(index) {
                    // The element's own runtime type governs what comes next,
                    // not the member's declared element type.
                    Some(element) => Ok(Cursor::Present(element.clone())),
                    None => Err(ValidateError::IndexOutOfRange {
                        property: segment.name.to_string(),
                        index,
                        len: items.len(),
                    }),
                },
                (_, Some(_)) => Err(ValidateError::NotIndexable {
                    property: segment.name.to_string(),
                    type_name: type_name.to_string(),
                }),
                (MemberValue::Object(Some(child)), None) => Ok(Cursor::Present(child)),
                (MemberValue::Object(None) | MemberValue::Scalar, None) => {
                    // Absent or non-object value: keep walking by the
                    // member's declared type rather than short-circuiting.
                    let declared = obj
                        .descriptor()
                        .member(segment.name)
                        .and_then(|decl| decl.declared_type);
                    Ok(Cursor::Absent(declared))
                }
                // A collection reached without an index is not an object;
                // its element type never governs, so any further member
                // lookup raises UnknownMember.
                (MemberValue::List(_), None) => Ok(Cursor::Absent(None)),
            }
        }
        Cursor::Absent(declared) => {
            let unknown = |type_name: &str| ValidateError::UnknownMember {
                property: segment.name.to_string(),
                type_name: type_name.to_string(),
            };
            let Some(type_name) = declared else {
                return Err(unknown("<unknown>"));
            };
            let descriptor = registry.descriptor(type_name).ok_or_else(|| unknown(type_name))?;
            let decl = descriptor
                .member(segment.name)
                .ok_or_else(|| unknown(type_name))?;
            match segment.index {
                Some(index) => {
                    if decl.kind == MemberKind::List {
                        // An absent collection has no elements.
                        Err(ValidateError::IndexOutOfRange {
                            property: segment.name.to_string(),
                            index,
                            len: 0,
                        })
                    } else {
                        Err(ValidateError::NotIndexable {
                            property: segment.name.to_string(),
                            type_name: type_name.to_string(),
                        })
                    }
                }
                None if decl.kind == MemberKind::List => Ok(Cursor::Absent(None)),
                None => Ok(Cursor::Absent(decl.declared_type)),
            }
        }
    }
}
