//! Pre-generation validation.
//!
//! Everything the emitters assume about the model is checked here, before
//! any code is generated, so a bad schema fails with an error naming the
//! shape, member or operation at fault instead of producing code that does
//! not compile.
//!
//! ## Validation Checks
//!
//! - **Locations**: header, uri and querystring members reference primitives
//! - **Map keys**: keys are primitives with a total order
//! - **Recursion**: no structure contains itself without a list or map in between
//! - **Naming collisions**: generated types, codecs, fields, wire-names and
//!   methods are unique after renaming
//! - **Codec coverage**: every encoder or decoder only calls codecs that are
//!   generated

use std::collections::{BTreeMap, BTreeSet};

use shapegen_define::{Location, ServiceDefinition, Shape, ShapeKind, StructureShape};
use tracing::debug;

use crate::codec::decoder_dependencies;
use crate::codegen::encoder::is_raw_payload;
use crate::codegen::operations::CLIENT_METHODS;
use crate::codegen::GenContext;
use crate::errors::GeneratorError;
use crate::naming::NameResolver;

/// Validates a service before code generation.
///
/// ## Errors
///
/// Returns the first problem found, in the order of the checks listed in
/// the module documentation.
pub fn validate_service(ctx: &GenContext<'_>) -> Result<(), GeneratorError> {
    for shape in ctx.service.shapes.values() {
        match &shape.kind {
            ShapeKind::Structure(structure) => check_locations(ctx, shape, structure)?,
            ShapeKind::Map(map) => {
                let orderable = ctx
                    .shape(&map.key.shape)?
                    .primitive()
                    .is_some_and(|kind| kind.is_orderable());
                if !orderable {
                    return Err(GeneratorError::InvalidMapKey {
                        shape: shape.name.clone(),
                        key: map.key.shape.clone(),
                    });
                }
            }
            ShapeKind::Primitive(_) | ShapeKind::List(_) => {}
        }
    }

    check_recursion(ctx.service)?;
    check_type_names(ctx)?;
    for shape in ctx.service.shapes.values() {
        if let Some(structure) = shape.as_structure() {
            check_members(ctx, shape, structure)?;
        }
    }
    check_codecs(ctx)?;
    check_methods(ctx)?;

    debug!(
        shapes = ctx.service.shapes.len(),
        operations = ctx.service.operations.len(),
        "service validated"
    );
    Ok(())
}

fn check_locations(
    ctx: &GenContext<'_>,
    shape: &Shape,
    structure: &StructureShape,
) -> Result<(), GeneratorError> {
    for (name, member) in &structure.members {
        if member.location == Location::Payload {
            continue;
        }
        let target = ctx.shape(&member.shape)?;
        if target.primitive().is_none() {
            return Err(GeneratorError::UnsupportedLocation {
                shape: shape.name.clone(),
                member: name.clone(),
                location: member.location.to_string(),
                target: target.name.clone(),
            });
        }
    }
    Ok(())
}

/// Rejects structures that contain themselves by value.
fn check_recursion(service: &ServiceDefinition) -> Result<(), GeneratorError> {
    let mut finished = BTreeSet::new();
    for shape in service.shapes.values() {
        if shape.as_structure().is_some() {
            visit_structure(service, &shape.name, &mut Vec::new(), &mut finished)?;
        }
    }
    Ok(())
}

fn visit_structure<'s>(
    service: &'s ServiceDefinition,
    name: &'s str,
    path: &mut Vec<&'s str>,
    finished: &mut BTreeSet<&'s str>,
) -> Result<(), GeneratorError> {
    if finished.contains(name) {
        return Ok(());
    }
    if let Some(start) = path.iter().position(|seen| *seen == name) {
        let mut cycle = path[start..].to_vec();
        cycle.push(name);
        return Err(GeneratorError::RecursiveShape {
            shape: name.to_string(),
            path: cycle.join(" -> "),
        });
    }
    let Some(structure) = service.shape(name).and_then(Shape::as_structure) else {
        return Ok(());
    };

    path.push(name);
    for (_, member) in &structure.members {
        visit_structure(service, &member.shape, path, finished)?;
    }
    path.pop();
    finished.insert(name);
    Ok(())
}

/// Every generated item name must be unique in the output module.
fn check_type_names(ctx: &GenContext<'_>) -> Result<(), GeneratorError> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    let mut claim = |rust_name: String, owner: &str| match seen.get(&rust_name) {
        Some(first) => Err(GeneratorError::NameCollision {
            first: first.clone(),
            second: owner.to_string(),
            rust_name,
        }),
        None => {
            seen.insert(rust_name, owner.to_string());
            Ok(())
        }
    };

    for shape in ctx.service.shapes.values() {
        if !NameResolver::is_native_string(shape) {
            claim(ctx.names.type_name(&shape.name)?, &shape.name)?;
        }
        if ctx.has_encoder(&shape.name) {
            claim(ctx.names.encoder_name(&shape.name)?, &shape.name)?;
        }
        if ctx.has_decoder(&shape.name) {
            claim(ctx.names.decoder_name(&shape.name)?, &shape.name)?;
        }
    }
    claim(ctx.names.client_name(), "(client)")
}

/// Field names and body wire-names must be unique within a structure.
fn check_members(
    ctx: &GenContext<'_>,
    shape: &Shape,
    structure: &StructureShape,
) -> Result<(), GeneratorError> {
    let mut fields: BTreeMap<String, &str> = BTreeMap::new();
    let mut wires: BTreeMap<String, &str> = BTreeMap::new();

    for (name, member) in &structure.members {
        let field = ctx.names.field_name(name)?;
        if let Some(first) = fields.insert(field.clone(), name.as_str()) {
            return Err(GeneratorError::FieldCollision {
                shape: shape.name.clone(),
                first: first.to_string(),
                second: name.clone(),
                field,
            });
        }

        if member.location == Location::Header {
            continue;
        }
        let wire = ctx.wire_name(name, member)?;
        if let Some(first) = wires.insert(wire.clone(), name.as_str()) {
            return Err(GeneratorError::WireNameCollision {
                shape: shape.name.clone(),
                first: first.to_string(),
                second: name.clone(),
                wire_name: wire,
            });
        }
    }
    Ok(())
}

/// Shapes an encoder for `shape` calls into.
fn encoder_dependencies<'s>(
    ctx: &GenContext<'s>,
    shape: &'s Shape,
) -> Result<Vec<(String, &'s str)>, GeneratorError> {
    let dependencies = match &shape.kind {
        ShapeKind::Primitive(_) => Vec::new(),
        ShapeKind::Structure(structure) => ctx
            .member_plans(structure)?
            .iter()
            .filter(|plan| plan.member.location == Location::Payload)
            .filter(|plan| !is_raw_payload(ctx, structure, plan))
            .map(|plan| (plan.name.to_string(), plan.member.shape.as_str()))
            .collect(),
        ShapeKind::List(list) => vec![("member".to_string(), list.member.shape.as_str())],
        ShapeKind::Map(map) => vec![
            ("key".to_string(), map.key.shape.as_str()),
            ("value".to_string(), map.value.shape.as_str()),
        ],
    };
    Ok(dependencies)
}

fn check_codecs(ctx: &GenContext<'_>) -> Result<(), GeneratorError> {
    for shape in ctx.service.shapes.values() {
        if ctx.has_encoder(&shape.name) {
            for (position, referenced) in encoder_dependencies(ctx, shape)? {
                if !ctx.has_encoder(referenced) {
                    return Err(GeneratorError::MissingCodec {
                        shape: format!("{}.{}", shape.name, position),
                        referenced: referenced.to_string(),
                        codec: "encoder",
                    });
                }
            }
        }
        if ctx.has_decoder(&shape.name) {
            for (position, referenced) in decoder_dependencies(shape) {
                if !ctx.has_decoder(referenced) {
                    return Err(GeneratorError::MissingCodec {
                        shape: format!("{}.{}", shape.name, position),
                        referenced: referenced.to_string(),
                        codec: "decoder",
                    });
                }
            }
        }
    }

    for operation in ctx.service.operations.values() {
        if let Some(input) = &operation.input
            && !ctx.has_encoder(input)
        {
            return Err(GeneratorError::MissingCodec {
                shape: format!("operation {}", operation.name),
                referenced: input.clone(),
                codec: "encoder",
            });
        }
        if let Some(output) = &operation.output
            && !ctx.has_decoder(output)
        {
            return Err(GeneratorError::MissingCodec {
                shape: format!("operation {}", operation.name),
                referenced: output.clone(),
                codec: "decoder",
            });
        }
    }
    Ok(())
}

fn check_methods(ctx: &GenContext<'_>) -> Result<(), GeneratorError> {
    let mut methods: BTreeMap<String, &str> = CLIENT_METHODS
        .iter()
        .map(|method| (method.to_string(), "(client)"))
        .collect();

    for operation in ctx.service.operations.values() {
        let method = ctx.names.method_name(&operation.name)?;
        if let Some(first) = methods.insert(method.clone(), operation.name.as_str()) {
            return Err(GeneratorError::MethodCollision {
                first: first.to_string(),
                second: operation.name.clone(),
                method,
            });
        }
    }
    Ok(())
}
