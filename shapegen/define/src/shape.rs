//! Shape definitions.
//!
//! A shape is a named schema entity: a primitive, a structure, a list or a
//! map. The set of kinds is closed; [`ShapeKind`] is matched exhaustively
//! everywhere downstream so a new kind is a compile-time gap rather than a
//! silent fallback.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Deserialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::SchemaError;
use crate::ordered::OrderedMap;

/// Primitive shape types.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use shapegen_define::PrimitiveKind;
///
/// assert_eq!(PrimitiveKind::from_str("long").unwrap(), PrimitiveKind::Long);
/// assert_eq!(PrimitiveKind::Blob.to_string(), "blob");
/// assert!(PrimitiveKind::from_str("structure").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    /// Carried as text in whatever format the service uses.
    Timestamp,
    Integer,
    Long,
    Float,
    Double,
    /// Raw bytes.
    Blob,
    Boolean,
}

impl PrimitiveKind {
    /// Whether values of this kind have a total order, which map keys need.
    pub fn is_orderable(self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }
}

/// Where a structure member lives on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Location {
    /// An HTTP header named by the member's wire-name.
    Header,
    /// A `{placeholder}` in the operation's request URI.
    Uri,
    /// A query-string parameter.
    #[strum(serialize = "querystring")]
    QueryString,
    /// The body or flattened parameter table.
    #[default]
    Payload,
}

/// A reference from a structure, list or map to another shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Name of the referenced shape.
    pub shape: String,
    /// Placement of the member (only meaningful inside structures).
    pub location: Location,
    /// Wire-name override.
    pub location_name: Option<String>,
    /// Free-text documentation, usually HTML.
    pub documentation: Option<String>,
}

impl Member {
    /// Creates a payload-located member referencing `shape`.
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            location: Location::Payload,
            location_name: None,
            documentation: None,
        }
    }

    /// Sets the wire-name override.
    pub fn with_location_name(mut self, name: impl Into<String>) -> Self {
        self.location_name = Some(name.into());
        self
    }

    /// Sets the member location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// A structure shape: ordered members plus the required subset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureShape {
    /// Members in document order.
    pub members: Vec<(String, Member)>,
    /// Names of members that must always be present.
    pub required: BTreeSet<String>,
    /// Member carried as the raw request body, if any.
    pub payload: Option<String>,
}

impl StructureShape {
    /// Whether `member` is in the required set.
    pub fn is_required(&self, member: &str) -> bool {
        self.required.contains(member)
    }

    /// Looks up a member by its schema name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|(member_name, _)| member_name == name)
            .map(|(_, member)| member)
    }
}

/// A list shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListShape {
    pub member: Member,
}

/// A map shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapShape {
    pub key: Member,
    pub value: Member,
}

/// The closed set of shape kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Primitive(PrimitiveKind),
    Structure(StructureShape),
    List(ListShape),
    Map(MapShape),
}

impl ShapeKind {
    /// The schema `type` keyword for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.into(),
            Self::Structure(_) => "structure",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

/// A named shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    pub documentation: Option<String>,
}

impl Shape {
    /// Creates an undocumented shape.
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            documentation: None,
        }
    }

    /// Returns the primitive kind, if this is a primitive shape.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match &self.kind {
            ShapeKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns the structure definition, if this is a structure.
    pub fn as_structure(&self) -> Option<&StructureShape> {
        match &self.kind {
            ShapeKind::Structure(structure) => Some(structure),
            _ => None,
        }
    }

    /// Returns the list definition, if this is a list.
    pub fn as_list(&self) -> Option<&ListShape> {
        match &self.kind {
            ShapeKind::List(list) => Some(list),
            _ => None,
        }
    }

    /// Names of every shape this one references directly.
    pub fn references(&self) -> Vec<&str> {
        match &self.kind {
            ShapeKind::Primitive(_) => Vec::new(),
            ShapeKind::Structure(structure) => structure
                .members
                .iter()
                .map(|(_, member)| member.shape.as_str())
                .collect(),
            ShapeKind::List(list) => vec![list.member.shape.as_str()],
            ShapeKind::Map(map) => vec![map.key.shape.as_str(), map.value.shape.as_str()],
        }
    }
}

// --- Raw document form -----------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMember {
    shape: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    documentation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawShape {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    members: Option<OrderedMap<RawMember>>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    payload: Option<String>,
    #[serde(default)]
    member: Option<RawMember>,
    #[serde(default)]
    key: Option<RawMember>,
    #[serde(default)]
    value: Option<RawMember>,
    #[serde(default)]
    documentation: Option<String>,
}

impl RawMember {
    fn into_member(self, shape: &str, member: &str) -> Result<Member, SchemaError> {
        let location = match self.location.as_deref() {
            None => Location::Payload,
            Some(text) => {
                Location::from_str(text).map_err(|_| SchemaError::UnknownLocation {
                    shape: shape.to_string(),
                    member: member.to_string(),
                    location: text.to_string(),
                })?
            }
        };
        Ok(Member {
            shape: self.shape,
            location,
            location_name: self.location_name,
            documentation: self.documentation,
        })
    }
}

impl RawShape {
    /// Converts the document form into a typed [`Shape`], checking the
    /// invariants that only need the shape itself.
    pub(crate) fn into_shape(self, name: &str) -> Result<Shape, SchemaError> {
        let kind = match self.kind.as_str() {
            "structure" => ShapeKind::Structure(Self::structure(
                name,
                self.members.unwrap_or_default(),
                self.required,
                self.payload,
            )?),
            "list" => {
                let member = self.member.ok_or(SchemaError::MissingShapeField {
                    shape: name.to_string(),
                    kind: "list",
                    field: "member",
                })?;
                ShapeKind::List(ListShape {
                    member: member.into_member(name, "member")?,
                })
            }
            "map" => {
                let key = self.key.ok_or(SchemaError::MissingShapeField {
                    shape: name.to_string(),
                    kind: "map",
                    field: "key",
                })?;
                let value = self.value.ok_or(SchemaError::MissingShapeField {
                    shape: name.to_string(),
                    kind: "map",
                    field: "value",
                })?;
                ShapeKind::Map(MapShape {
                    key: key.into_member(name, "key")?,
                    value: value.into_member(name, "value")?,
                })
            }
            other => ShapeKind::Primitive(PrimitiveKind::from_str(other).map_err(|_| {
                SchemaError::UnknownShapeKind {
                    shape: name.to_string(),
                    kind: other.to_string(),
                }
            })?),
        };

        Ok(Shape {
            name: name.to_string(),
            kind,
            documentation: self.documentation,
        })
    }

    fn structure(
        name: &str,
        raw_members: OrderedMap<RawMember>,
        required: Vec<String>,
        payload: Option<String>,
    ) -> Result<StructureShape, SchemaError> {
        let mut members: Vec<(String, Member)> = Vec::with_capacity(raw_members.len());
        for (member_name, raw) in raw_members {
            if members.iter().any(|(existing, _)| *existing == member_name) {
                return Err(SchemaError::DuplicateMember {
                    shape: name.to_string(),
                    member: member_name,
                });
            }
            let member = raw.into_member(name, &member_name)?;
            members.push((member_name, member));
        }

        let structure = StructureShape {
            members,
            required: required.into_iter().collect(),
            payload,
        };

        if let Some(unknown) = structure
            .required
            .iter()
            .find(|required| structure.member(required).is_none())
        {
            return Err(SchemaError::UnknownRequiredMember {
                shape: name.to_string(),
                member: unknown.clone(),
            });
        }

        if let Some(payload) = &structure.payload
            && structure.member(payload).is_none()
        {
            return Err(SchemaError::UnknownPayloadMember {
                shape: name.to_string(),
                member: payload.clone(),
            });
        }

        Ok(structure)
    }
}
