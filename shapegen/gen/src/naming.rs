//! Schema identifiers to Rust identifiers.
//!
//! ## Rules
//!
//! - Members and operations become `snake_case` fields and methods. A result
//!   that is a Rust keyword or starts with a digit gets the configured field
//!   prefix (`type` becomes `field_type`).
//! - Shapes keep their PascalCase names. A name in the reserved set gets the
//!   service identifier as a prefix (`Message` becomes `WidgetsMessage`).
//! - The native string shape (named `String`, of kind string) stays `String`.
//!
//! Every rule is a pure function of its input and the configuration, so the
//! same schema always yields the same names.

use shapegen_define::{Metadata, PrimitiveKind, ServiceDefinition, Shape};

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;

/// Strict, reserved and 2024-edition keywords.
pub const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Returns `true` if `ident` is a Rust keyword.
pub fn is_keyword(ident: &str) -> bool {
    RUST_KEYWORDS.contains(&ident)
}

/// Converts a CamelCase schema name to `snake_case`.
///
/// A separator goes before an uppercase letter that follows a lowercase
/// letter or digit, and before the last uppercase letter of an acronym run
/// when a lowercase letter follows it. Characters that cannot appear in an
/// identifier become `_`.
///
/// ## Examples
///
/// ```
/// use shapegen_gen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("BucketName"), "bucket_name");
/// assert_eq!(to_snake_case("ETag"), "e_tag");
/// assert_eq!(to_snake_case("Ipv6Address"), "ipv6_address");
/// assert_eq!(to_snake_case("SSEKMSKeyId"), "ssekms_key_id");
/// assert_eq!(to_snake_case("x-amz-meta"), "x_amz_meta");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);

    for (i, &current) in chars.iter().enumerate() {
        if current.is_ascii_uppercase() {
            let boundary = match i.checked_sub(1).map(|j| chars[j]) {
                Some(prev) if prev.is_ascii_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_ascii_uppercase() => {
                    chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase())
                }
                _ => false,
            };
            if boundary && !snake.ends_with('_') {
                snake.push('_');
            }
            snake.push(current.to_ascii_lowercase());
        } else if current.is_ascii_alphanumeric() || current == '_' {
            snake.push(current);
        } else {
            snake.push('_');
        }
    }

    snake
}

/// Converts a name to PascalCase, dropping characters that cannot appear in
/// an identifier and capitalising the letter after each of them.
///
/// ## Examples
///
/// ```
/// use shapegen_gen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("dynamodb"), "Dynamodb");
/// assert_eq!(to_pascal_case("Elastic Load Balancing"), "ElasticLoadBalancing");
/// assert_eq!(to_pascal_case("widget-store"), "WidgetStore");
/// assert_eq!(to_pascal_case("ETag"), "ETag");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn check_ident(original: &str, ident: &str) -> Result<(), GeneratorError> {
    syn::parse_str::<syn::Ident>(ident)
        .map(|_| ())
        .map_err(|e| GeneratorError::InvalidIdentifier {
            name: original.to_string(),
            reason: format!("'{ident}' is not a valid identifier ({e})"),
        })
}

/// Derives the service identifier used for the client and reserved-name prefixes.
///
/// Resolution order: explicit override, `serviceId`, `serviceAbbreviation`
/// without its `Amazon`/`AWS` prefix, then `endpointPrefix`.
pub fn service_identifier(
    metadata: &Metadata,
    override_name: Option<&str>,
) -> Result<String, GeneratorError> {
    let raw = override_name
        .map(str::to_string)
        .or_else(|| metadata.service_id.clone())
        .or_else(|| {
            metadata.service_abbreviation.as_deref().map(|abbreviation| {
                abbreviation
                    .trim_start_matches("Amazon")
                    .trim_start_matches("AWS")
                    .trim()
                    .to_string()
            })
        })
        .filter(|name| !to_pascal_case(name).is_empty())
        .unwrap_or_else(|| metadata.endpoint_prefix.clone());

    let ident = to_pascal_case(&raw);
    if ident.is_empty() {
        return Err(GeneratorError::InvalidIdentifier {
            name: raw,
            reason: "service name has no letters or digits".to_string(),
        });
    }
    check_ident(&raw, &ident)?;
    Ok(ident)
}

/// Resolves every generated name for one service.
#[derive(Debug, Clone)]
pub struct NameResolver<'a> {
    service: &'a ServiceDefinition,
    config: &'a GeneratorConfig,
    service_ident: String,
}

impl<'a> NameResolver<'a> {
    pub fn new(
        service: &'a ServiceDefinition,
        config: &'a GeneratorConfig,
    ) -> Result<Self, GeneratorError> {
        let service_ident =
            service_identifier(&service.metadata, config.service_name.as_deref())?;
        Ok(Self {
            service,
            config,
            service_ident,
        })
    }

    /// PascalCase service identifier, e.g. `Widgets`.
    pub fn service_ident(&self) -> &str {
        &self.service_ident
    }

    /// Name of the generated client struct.
    pub fn client_name(&self) -> String {
        format!("{}Client", self.service_ident)
    }

    /// Whether `shape` maps onto Rust's own `String` and gets no alias.
    pub fn is_native_string(shape: &Shape) -> bool {
        to_pascal_case(&shape.name) == "String"
            && shape.primitive() == Some(PrimitiveKind::String)
    }

    /// Rust type name for the shape called `shape_name`.
    pub fn type_name(&self, shape_name: &str) -> Result<String, GeneratorError> {
        let pascal = to_pascal_case(shape_name);
        if pascal.is_empty() {
            return Err(GeneratorError::InvalidIdentifier {
                name: shape_name.to_string(),
                reason: "shape name has no letters or digits".to_string(),
            });
        }

        let native = self
            .service
            .shape(shape_name)
            .is_some_and(Self::is_native_string);
        let name = if native {
            pascal
        } else if pascal == "String"
            || self.config.reserved_names.contains(&pascal)
            || pascal.starts_with(|c: char| c.is_ascii_digit())
        {
            format!("{}{}", self.service_ident, pascal)
        } else {
            pascal
        };

        check_ident(shape_name, &name)?;
        Ok(name)
    }

    pub fn encoder_name(&self, shape_name: &str) -> Result<String, GeneratorError> {
        Ok(format!("{}Encoder", self.type_name(shape_name)?))
    }

    pub fn decoder_name(&self, shape_name: &str) -> Result<String, GeneratorError> {
        Ok(format!("{}Decoder", self.type_name(shape_name)?))
    }

    /// Field name for a structure member.
    pub fn field_name(&self, member_name: &str) -> Result<String, GeneratorError> {
        self.snake_ident(member_name)
    }

    /// Method name for an operation.
    pub fn method_name(&self, operation_name: &str) -> Result<String, GeneratorError> {
        self.snake_ident(operation_name)
    }

    fn snake_ident(&self, name: &str) -> Result<String, GeneratorError> {
        let snake = to_snake_case(name);
        if snake.chars().all(|c| c == '_') {
            return Err(GeneratorError::InvalidIdentifier {
                name: name.to_string(),
                reason: "name has no letters or digits".to_string(),
            });
        }

        let ident = if is_keyword(&snake) || snake.starts_with(|c: char| c.is_ascii_digit()) {
            format!("{}{}", self.config.field_prefix, snake)
        } else {
            snake
        };

        check_ident(name, &ident)?;
        Ok(ident)
    }
}
