//! Client generation.
//!
//! Generates one client struct per service, generic over the transport:
//!
//! ```ignore
//! #[derive(Debug, Clone)]
//! pub struct WidgetsClient<D> {
//!     dispatcher: D,
//!     region: String,
//! }
//!
//! impl<D: DispatchRequest> WidgetsClient<D> {
//!     pub const ENDPOINT_PREFIX: &'static str = "widgets";
//!
//!     pub async fn get_widget(&self, input: &GetWidgetRequest) -> Result<Widget, OperationError> {
//!         let mut request = ServiceRequest::new("GET", Self::ENDPOINT_PREFIX, &self.region, "/widgets/{WidgetId}");
//!         GetWidgetRequestEncoder::encode(&mut request, "", input);
//!         let response = self.dispatcher.dispatch(&request).await?;
//!         match response.status {
//!             200..=299 => { /* protocol decode */ }
//!             status => Err(OperationError::service("GetWidget", status, &response.body)),
//!         }
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use shapegen_define::Operation;

use super::GenContext;
use crate::docs::doc_attrs;
use crate::errors::GeneratorError;

/// Methods every client has, which operations must not shadow.
pub const CLIENT_METHODS: &[&str] = &["new", "region"];

/// Generates the client struct with one method per operation, in name order.
pub fn generate_client(ctx: &GenContext<'_>) -> Result<TokenStream, GeneratorError> {
    let client = format_ident!("{}", ctx.names.client_name());
    let endpoint_prefix = &ctx.service.metadata.endpoint_prefix;
    let service_doc = format!(
        " Client for {}.",
        ctx.service
            .metadata
            .service_full_name
            .as_deref()
            .unwrap_or(ctx.names.service_ident())
    );

    let methods = ctx
        .service
        .operations
        .values()
        .map(|operation| generate_method(ctx, operation))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        #[doc = #service_doc]
        #[derive(Debug, Clone)]
        pub struct #client<D> {
            dispatcher: D,
            region: String,
        }

        impl<D: DispatchRequest> #client<D> {
            pub const ENDPOINT_PREFIX: &'static str = #endpoint_prefix;

            pub fn new(dispatcher: D, region: impl Into<String>) -> Self {
                Self {
                    dispatcher,
                    region: region.into(),
                }
            }

            pub fn region(&self) -> &str {
                &self.region
            }

            #(#methods)*
        }
    })
}

fn generate_method(
    ctx: &GenContext<'_>,
    operation: &Operation,
) -> Result<TokenStream, GeneratorError> {
    let method = format_ident!("{}", ctx.names.method_name(&operation.name)?);
    let docs = doc_attrs(operation.documentation.as_deref());
    let http_method = operation.method.as_str();
    let request_uri = &operation.request_uri;
    let operation_name = &operation.name;

    let setup = ctx.protocol.request_setup(ctx, operation);

    let (input_param, encode) = match &operation.input {
        Some(input) => {
            let ty = ctx.types().reference(input)?;
            let encoder = ctx.encoder_ident(input)?;
            (
                quote! { , input: &#ty },
                quote! { #encoder::encode(&mut request, "", input); },
            )
        }
        None => (TokenStream::new(), TokenStream::new()),
    };

    let (output_ty, success) = match &operation.output {
        Some(output) => {
            let decode = ctx.protocol.response_decode(ctx, ctx.shape(output)?)?;
            (ctx.types().reference(output)?, quote! { { #decode } })
        }
        None => (quote! { () }, quote! { Ok(()) }),
    };

    let binding = if setup.is_empty() && encode.is_empty() {
        quote! { let request }
    } else {
        quote! { let mut request }
    };

    Ok(quote! {
        #docs
        pub async fn #method(&self #input_param) -> Result<#output_ty, OperationError> {
            #binding = ServiceRequest::new(#http_method, Self::ENDPOINT_PREFIX, &self.region, #request_uri);
            #setup
            #encode
            let response = self.dispatcher.dispatch(&request).await?;
            match response.status {
                200..=299 => #success,
                status => Err(OperationError::service(#operation_name, status, &response.body)),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_utils::{assert_code_contains, format_generated_code, load_service};

    const SERVICE: &str = r#"{
        "metadata": {
            "endpointPrefix": "widgets",
            "serviceId": "Widgets",
            "serviceFullName": "Widget Store",
            "protocol": "rest-xml"
        },
        "operations": {
            "GetWidget": {
                "name": "GetWidget",
                "http": {"method": "GET", "requestUri": "/widgets/{WidgetId}"},
                "input": {"shape": "GetWidgetRequest"},
                "output": {"shape": "Widget"},
                "documentation": "<p>Fetches one widget.</p>"
            },
            "DescribeWidget": {
                "name": "DescribeWidget",
                "http": {"method": "GET", "requestUri": "/widget"},
                "output": {"shape": "Widget"}
            },
            "DeleteWidget": {
                "name": "DeleteWidget",
                "http": {"method": "DELETE", "requestUri": "/widgets/{WidgetId}"},
                "input": {"shape": "GetWidgetRequest"}
            }
        },
        "shapes": {
            "String": {"type": "string"},
            "GetWidgetRequest": {
                "type": "structure",
                "required": ["Id"],
                "members": {"Id": {"shape": "String", "location": "uri", "locationName": "WidgetId"}}
            },
            "Widget": {"type": "structure", "members": {"Id": {"shape": "String"}}}
        }
    }"#;

    fn client_code(protocol: &str) -> String {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default().with_protocol(protocol);
        let ctx = GenContext::new(&service, &config).unwrap();
        format_generated_code(&generate_client(&ctx).unwrap()).unwrap()
    }

    #[test]
    fn client_struct_is_generic_over_dispatcher() {
        let code = client_code("rest-xml");
        assert_code_contains(&code, "/// Client for Widget Store.");
        assert_code_contains(&code, "pub struct WidgetsClient<D>");
        assert_code_contains(&code, "impl<D: DispatchRequest> WidgetsClient<D>");
        assert_code_contains(&code, r#"pub const ENDPOINT_PREFIX: &'static str = "widgets";"#);
        assert_code_contains(&code, "pub fn new(dispatcher: D, region: impl Into<String>) -> Self");
    }

    #[test]
    fn method_with_input_and_output() {
        let code = client_code("rest-xml");
        assert_code_contains(&code, "/// Fetches one widget.");
        assert_code_contains(
            &code,
            "pub async fn get_widget(&self, input: &GetWidgetRequest) -> Result<Widget, OperationError>",
        );
        assert_code_contains(
            &code,
            r#"let mut request = ServiceRequest::new("GET", Self::ENDPOINT_PREFIX, &self.region, "/widgets/{WidgetId}");"#,
        );
        assert_code_contains(&code, r#"GetWidgetRequestEncoder::encode(&mut request, "", input);"#);
        assert_code_contains(&code, "let response = self.dispatcher.dispatch(&request).await?;");
        assert_code_contains(&code, "200..=299 =>");
        assert_code_contains(
            &code,
            r#"status => Err(OperationError::service("GetWidget", status, &response.body))"#,
        );
    }

    #[test]
    fn method_without_input_binds_immutably() {
        let code = client_code("rest-xml");
        assert_code_contains(
            &code,
            "pub async fn describe_widget(&self) -> Result<Widget, OperationError>",
        );
        assert_code_contains(
            &code,
            r#"let request = ServiceRequest::new("GET", Self::ENDPOINT_PREFIX, &self.region, "/widget");"#,
        );
    }

    #[test]
    fn method_without_output_returns_unit() {
        let code = client_code("rest-xml");
        assert_code_contains(
            &code,
            "pub async fn delete_widget(&self, input: &GetWidgetRequest) -> Result<(), OperationError>",
        );
        assert_code_contains(&code, "200..=299 => Ok(())");
    }

    #[test]
    fn json_methods_carry_protocol_setup() {
        let code = client_code("json");
        assert_code_contains(&code, r#"request.params_mut().put("Action", "DescribeWidget");"#);
        assert_code_contains(&code, "let value = parse_json(&response.body)?;");
        assert!(!code.contains("let request ="));
    }

    #[test]
    fn methods_follow_operation_name_order() {
        let code = client_code("rest-xml");
        let delete = code.find("fn delete_widget").unwrap();
        let describe = code.find("fn describe_widget").unwrap();
        let get = code.find("fn get_widget").unwrap();
        assert!(delete < describe && describe < get);
    }
}
