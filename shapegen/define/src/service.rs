//! The loaded service description.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SchemaError;
use crate::metadata::Metadata;
use crate::operation::{Operation, RawOperation};
use crate::shape::{RawShape, Shape, ShapeKind};

/// A complete, validated service description.
///
/// Shapes and operations are kept in name order, which fixes the order of
/// everything generated from them. The value is immutable once loaded.
///
/// ## Examples
///
/// ```
/// use shapegen_define::ServiceDefinition;
///
/// let service = ServiceDefinition::from_json(r#"{
///     "metadata": {"endpointPrefix": "widgets", "protocol": "rest-xml"},
///     "operations": {
///         "DescribeWidget": {"http": {"method": "GET", "requestUri": "/"}, "output": {"shape": "Widget"}}
///     },
///     "shapes": {
///         "Widget": {"type": "structure", "members": {"Id": {"shape": "String"}}},
///         "String": {"type": "string"}
///     }
/// }"#).unwrap();
///
/// assert_eq!(service.operations.len(), 1);
/// assert!(service.shape("Widget").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub metadata: Metadata,
    pub operations: BTreeMap<String, Operation>,
    pub shapes: BTreeMap<String, Shape>,
}

#[derive(Debug, Deserialize)]
struct RawService {
    metadata: Metadata,
    #[serde(default)]
    operations: BTreeMap<String, RawOperation>,
    #[serde(default)]
    shapes: BTreeMap<String, RawShape>,
}

impl ServiceDefinition {
    /// Parses and validates a service description from JSON text.
    ///
    /// ## Errors
    ///
    /// Returns a [`SchemaError`] naming the offending shape, member or
    /// operation when the document breaks any loading invariant.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let raw: RawService = serde_json::from_str(text)?;

        let shapes = raw
            .shapes
            .into_iter()
            .map(|(name, shape)| shape.into_shape(&name).map(|shape| (name, shape)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let operations = raw
            .operations
            .into_iter()
            .map(|(name, op)| op.into_operation(&name).map(|op| (name, op)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let service = Self {
            metadata: raw.metadata,
            operations,
            shapes,
        };
        service.check_references()?;
        Ok(service)
    }

    /// Reads and parses a service description file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Looks up a shape by its schema name.
    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// Returns the protocol named in the metadata, if any.
    pub fn protocol(&self) -> Option<&str> {
        self.metadata.protocol.as_deref()
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        for shape in self.shapes.values() {
            match &shape.kind {
                ShapeKind::Primitive(_) => {}
                ShapeKind::Structure(structure) => {
                    for (member_name, member) in &structure.members {
                        self.resolve(&format!("{}.{}", shape.name, member_name), &member.shape)?;
                    }
                }
                ShapeKind::List(list) => {
                    self.resolve(&format!("{}.member", shape.name), &list.member.shape)?;
                }
                ShapeKind::Map(map) => {
                    self.resolve(&format!("{}.key", shape.name), &map.key.shape)?;
                    self.resolve(&format!("{}.value", shape.name), &map.value.shape)?;
                }
            }
        }

        for op in self.operations.values() {
            if let Some(input) = &op.input {
                self.resolve(&format!("operation {} input", op.name), input)?;
            }
            if let Some(output) = &op.output {
                self.resolve(&format!("operation {} output", op.name), output)?;
            }
        }

        Ok(())
    }

    fn resolve(&self, owner: &str, reference: &str) -> Result<(), SchemaError> {
        if self.shapes.contains_key(reference) {
            Ok(())
        } else {
            Err(SchemaError::DanglingReference {
                owner: owner.to_string(),
                reference: reference.to_string(),
            })
        }
    }
}
