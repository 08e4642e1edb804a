//! Typed per-kind node settings.
//!
//! The editor persists each node's configuration as a camelCase JSON bag.
//! Every node kind gets its own payload type here so that downstream
//! consumers match on concrete fields instead of digging through a map.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{FlowplanError, Result, model::node::NodeKind};

/// Output format of an agent node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// HTTP method of an API call node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// Settings of a start node. The editor stores nothing here today.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StartSettings {}

/// Settings of an agent (language-model call) node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSettings {
    pub name: String,
    /// Instruction text sent as the system prompt.
    pub instruction: String,
    /// Whether prior conversation turns are attached to the call.
    pub include_history: bool,
    /// Model identifier.
    pub model: String,
    /// Requested output format.
    pub output: OutputFormat,
    /// Output schema, used when `output` is json.
    pub schema: Option<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            instruction: String::new(),
            include_history: true,
            model: "gemini-flash-1.5".to_string(),
            output: OutputFormat::default(),
            schema: None,
        }
    }
}

/// Settings of an if/else branch node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IfElseSettings {
    /// Boolean-valued condition expression deciding the branch.
    pub if_condition: String,
}

/// Settings of a while loop node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WhileSettings {
    /// Condition expression evaluated before each iteration.
    pub while_condition: String,
}

/// Settings of a user approval checkpoint node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserApprovalSettings {
    pub name: String,
    /// Prompt shown to the human approver.
    pub message: String,
}

/// Settings of an API call node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiCallSettings {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    /// Whether the stored API key is attached to the request.
    pub include_api_key: bool,
    pub api_key: Option<String>,
    /// Request body template, used for POST requests.
    pub body_params: Option<String>,
}

impl Default for ApiCallSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            method: HttpMethod::default(),
            url: String::new(),
            include_api_key: true,
            api_key: None,
            body_params: None,
        }
    }
}

/// Settings of an end node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EndSettings {
    /// Output schema of the whole workflow.
    pub schema: Option<String>,
}

/// Variant-specific configuration, one payload per node kind.
///
/// Serializes untagged: the JSON form is the bare settings bag, as the
/// editor persists it. Deserialization goes through
/// [`NodeSettings::from_value`] because the kind tag lives on the node,
/// not inside the bag.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum NodeSettings {
    Start(StartSettings),
    Agent(AgentSettings),
    IfElse(IfElseSettings),
    While(WhileSettings),
    UserApproval(UserApprovalSettings),
    ApiCall(ApiCallSettings),
    End(EndSettings),
}

impl NodeSettings {
    /// Parses a raw settings value for the given node kind.
    ///
    /// A null or absent bag yields the kind's default payload; nodes that
    /// were never configured in the editor have no settings saved yet.
    pub fn from_value(
        kind: NodeKind,
        value: serde_json::Value,
    ) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default_for(kind));
        }

        let settings = match kind {
            NodeKind::Start => NodeSettings::Start(parse(kind, value)?),
            NodeKind::Agent => NodeSettings::Agent(parse(kind, value)?),
            NodeKind::IfElse => NodeSettings::IfElse(parse(kind, value)?),
            NodeKind::While => NodeSettings::While(parse(kind, value)?),
            NodeKind::UserApproval => NodeSettings::UserApproval(parse(kind, value)?),
            NodeKind::ApiCall => NodeSettings::ApiCall(parse(kind, value)?),
            NodeKind::End => NodeSettings::End(parse(kind, value)?),
        };
        Ok(settings)
    }

    /// The default payload for a node kind.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => NodeSettings::Start(StartSettings::default()),
            NodeKind::Agent => NodeSettings::Agent(AgentSettings::default()),
            NodeKind::IfElse => NodeSettings::IfElse(IfElseSettings::default()),
            NodeKind::While => NodeSettings::While(WhileSettings::default()),
            NodeKind::UserApproval => NodeSettings::UserApproval(UserApprovalSettings::default()),
            NodeKind::ApiCall => NodeSettings::ApiCall(ApiCallSettings::default()),
            NodeKind::End => NodeSettings::End(EndSettings::default()),
        }
    }

    /// The node kind this payload belongs to.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeSettings::Start(_) => NodeKind::Start,
            NodeSettings::Agent(_) => NodeKind::Agent,
            NodeSettings::IfElse(_) => NodeKind::IfElse,
            NodeSettings::While(_) => NodeKind::While,
            NodeSettings::UserApproval(_) => NodeKind::UserApproval,
            NodeSettings::ApiCall(_) => NodeKind::ApiCall,
            NodeSettings::End(_) => NodeKind::End,
        }
    }
}

fn parse<T: DeserializeOwned>(
    kind: NodeKind,
    value: serde_json::Value,
) -> Result<T> {
    serde_json::from_value(value).map_err(|e| FlowplanError::Node(format!("invalid {} settings: {}", kind.as_ref(), e)))
}
