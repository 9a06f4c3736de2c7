//! UTCP manual data model: tools, schemas and invocation descriptors

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Manual format version published on the discovery endpoint
pub const MANUAL_VERSION: &str = "0.1.0";

/// A versioned, ordered collection of tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manual {
    pub version: String,
    pub tools: Vec<Tool>,
}

impl Manual {
    /// Create an empty manual with the current format version
    pub fn new() -> Self {
        Self {
            version: MANUAL_VERSION.to_string(),
            tools: Vec::new(),
        }
    }

    /// Append a tool; insertion order is the published order
    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    /// Append every tool from an iterator, preserving order
    pub fn extend<I: IntoIterator<Item = Tool>>(&mut self, tools: I) {
        self.tools.extend(tools);
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a manual from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

impl Default for Manual {
    fn default() -> Self {
        Self::new()
    }
}

/// One externally callable operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name, unique within one manual
    pub name: String,
    pub description: String,
    pub inputs: Schema,
    pub outputs: Schema,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Typical response size in bytes, as a hint for callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_response_size: Option<u64>,
    /// How a caller reaches this tool directly
    pub tool_provider: ToolProvider,
}

impl Tool {
    /// Create a tool with empty object schemas
    pub fn new<N: Into<String>, D: Into<String>>(
        name: N,
        description: D,
        tool_provider: ToolProvider,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            inputs: Schema::object(),
            outputs: Schema::object(),
            tags: Vec::new(),
            average_response_size: None,
            tool_provider,
        }
    }

    pub fn inputs(mut self, inputs: Schema) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn outputs(mut self, outputs: Schema) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn average_response_size(mut self, bytes: u64) -> Self {
        self.average_response_size = Some(bytes);
        self
    }
}

/// Input or output schema of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Schema {
    /// Create a schema of the given JSON type
    pub fn new<T: Into<String>>(schema_type: T) -> Self {
        Self {
            schema_type: schema_type.into(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            description: None,
            title: None,
        }
    }

    pub fn object() -> Self {
        Self::new("object")
    }

    pub fn array() -> Self {
        Self::new("array")
    }

    /// Add a named property
    pub fn property<N: Into<String>>(mut self, name: N, property: Property) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Mark properties as required
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn described<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn titled<T: Into<String>>(mut self, title: T) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A single property in a schema
///
/// `default` tracks presence separately from value: `Some(Value::Bool(false))`
/// is serialized, only `None` is omitted. An explicit `null` default read from
/// JSON stays present as `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
}

impl Property {
    pub fn new<T: Into<String>, D: Into<String>>(property_type: T, description: D) -> Self {
        Self {
            property_type: property_type.into(),
            description: description.into(),
            enum_values: None,
            default: None,
        }
    }

    pub fn string<D: Into<String>>(description: D) -> Self {
        Self::new("string", description)
    }

    pub fn integer<D: Into<String>>(description: D) -> Self {
        Self::new("integer", description)
    }

    pub fn boolean<D: Into<String>>(description: D) -> Self {
        Self::new("boolean", description)
    }

    pub fn array<D: Into<String>>(description: D) -> Self {
        Self::new("array", description)
    }

    pub fn object<D: Into<String>>(description: D) -> Self {
        Self::new("object", description)
    }

    /// Set a default value; falsy values are kept
    pub fn with_default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the property to a set of values
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Present keys always map to `Some`, including an explicit `null`
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Invocation descriptor: tells a caller how to reach a tool directly
///
/// Keys this model does not know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolProvider {
    /// Transport kind, e.g. "http"
    pub provider_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Target URL; may embed `${name}` placeholders filled from tool inputs
    pub url: String,
    pub http_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthPlaceholder>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolProvider {
    /// Describe an HTTP endpoint
    pub fn http<I, U, M>(provider_id: I, url: U, http_method: M, auth: AuthPlaceholder) -> Self
    where
        I: Into<String>,
        U: Into<String>,
        M: Into<String>,
    {
        Self {
            provider_type: "http".to_string(),
            provider_id: Some(provider_id.into()),
            url: url.into(),
            http_method: http_method.into(),
            auth: Some(auth),
            extra: Map::new(),
        }
    }

    /// Names of the `${...}` placeholders embedded in the URL, in order
    pub fn url_placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.url.as_str();
        while let Some(start) = rest.find("${") {
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        names
    }
}

/// Authentication instructions for the caller
///
/// Secret-bearing fields hold `$ENV_VAR` references that the calling agent
/// resolves; literal credentials are never published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "auth_type", rename_all = "snake_case")]
pub enum AuthPlaceholder {
    Basic {
        username: String,
        password: String,
    },
    ApiKey {
        api_key: String,
        var_name: String,
    },
    PersonalToken {
        token: String,
        header_name: String,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        client_id: String,
        client_secret: String,
        token_url: String,
    },
}

impl AuthPlaceholder {
    pub fn basic(username_env: &str, password_env: &str) -> Self {
        Self::Basic {
            username: env_ref(username_env),
            password: env_ref(password_env),
        }
    }

    pub fn api_key<V: Into<String>>(api_key_env: &str, var_name: V) -> Self {
        Self::ApiKey {
            api_key: env_ref(api_key_env),
            var_name: var_name.into(),
        }
    }

    pub fn personal_token<H: Into<String>>(token_env: &str, header_name: H) -> Self {
        Self::PersonalToken {
            token: env_ref(token_env),
            header_name: header_name.into(),
        }
    }

    pub fn oauth2(client_id_env: &str, client_secret_env: &str, token_url_env: &str) -> Self {
        Self::OAuth2 {
            client_id: env_ref(client_id_env),
            client_secret: env_ref(client_secret_env),
            token_url: env_ref(token_url_env),
        }
    }

    /// Wire tag of this variant
    pub fn auth_type(&self) -> &'static str {
        match self {
            AuthPlaceholder::Basic { .. } => "basic",
            AuthPlaceholder::ApiKey { .. } => "api_key",
            AuthPlaceholder::PersonalToken { .. } => "personal_token",
            AuthPlaceholder::OAuth2 { .. } => "oauth2",
        }
    }
}

fn env_ref(var: &str) -> String {
    format!("${}", var)
}

/// Environment variable prefix derived from a provider instance name
///
/// `jira` becomes `JIRA`, `jira-prod` becomes `JIRA_PROD`.
pub fn env_var_prefix(instance_name: &str) -> String {
    instance_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
