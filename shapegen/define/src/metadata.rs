use serde::Deserialize;

/// Service-level metadata, consumed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Host prefix for the service endpoint (`<prefix>.<region>.amazonaws.com`).
    pub endpoint_prefix: String,
    /// Wire protocol name, e.g. `rest-xml` or `json`.
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub service_full_name: Option<String>,
    #[serde(default)]
    pub service_abbreviation: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    /// Prefix for the `X-Amz-Target` header of JSON services.
    #[serde(default)]
    pub target_prefix: Option<String>,
    /// Version suffix of the JSON content type.
    #[serde(default)]
    pub json_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_prefix_is_required() {
        let result: Result<Metadata, _> = serde_json::from_str(r#"{"protocol": "json"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn reads_camel_case_fields() {
        let metadata: Metadata = serde_json::from_str(
            r#"{
                "endpointPrefix": "dynamodb",
                "protocol": "json",
                "apiVersion": "2012-08-10",
                "serviceAbbreviation": "DynamoDB",
                "targetPrefix": "DynamoDB_20120810",
                "jsonVersion": "1.0",
                "signatureVersion": "v4"
            }"#,
        )
        .unwrap();

        assert_eq!(metadata.endpoint_prefix, "dynamodb");
        assert_eq!(metadata.api_version.as_deref(), Some("2012-08-10"));
        assert_eq!(metadata.target_prefix.as_deref(), Some("DynamoDB_20120810"));
        assert_eq!(metadata.json_version.as_deref(), Some("1.0"));
        assert!(metadata.service_id.is_none());
    }
}
