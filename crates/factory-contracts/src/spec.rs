//! The declarative agent specification consumed by the compiler.
//!
//! These types mirror the spec YAML authors write. The compiler assumes an
//! external schema validator has already run, but every optional field is
//! still modelled as `Option` and defaulted at compile time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Placeholder tag recorded when an action has no `type` key at all.
pub const MISSING_ACTION_TAG: &str = "<missing>";

/// A complete agent specification.
///
/// `name` is the only field without a default; the compiler rejects a spec
/// that lacks it rather than emitting a blank root schema name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// System instructions for the generative orchestrator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Overrides the Conversation Start and Greeting messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_message: Option<String>,
    /// Capability names, e.g. "generative_actions".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SpecMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
    /// User-defined topics, compiled in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<TopicSpec>>,
}

impl AgentSpec {
    /// The `metadata.language` tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.metadata.as_ref()?.language.as_deref()
    }

    /// The `metadata.cloud` tag, if any.
    pub fn cloud(&self) -> Option<&str> {
        self.metadata.as_ref()?.cloud.as_deref()
    }

    /// The `security.authentication.mode` value, if any.
    pub fn authentication_mode(&self) -> Option<&str> {
        self.security
            .as_ref()?
            .authentication
            .as_ref()?
            .mode
            .as_deref()
    }

    /// Iterate the user-defined topics, empty when none are declared.
    pub fn topics(&self) -> impl Iterator<Item = &TopicSpec> {
        self.topics.iter().flatten()
    }
}

/// Descriptive metadata about the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecMetadata {
    /// Locale tag such as "en-US".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Sovereign cloud tag: commercial, gcc, gcch or dod.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Security {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// One user-defined conversational topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicSpec {
    /// Display name; sanitized to derive the topic's schema name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Triggers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionSpec>>,
}

impl TopicSpec {
    /// Trigger phrases, empty when none are declared.
    pub fn phrases(&self) -> &[String] {
        self.triggers.as_ref().map(|t| t.phrases.as_slice()).unwrap_or(&[])
    }

    /// Declared actions, empty when none are declared.
    pub fn actions(&self) -> &[ActionSpec] {
        self.actions.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triggers {
    #[serde(default)]
    pub phrases: Vec<String>,
}

/// A spec action whose `type` tag the compiler understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Send literal text to the user.
    Message {
        #[serde(default)]
        text: String,
    },
    /// Ask the user something and store the answer in a topic variable.
    Question {
        #[serde(default)]
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variable: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity: Option<String>,
    },
    /// Ordered `if`/`then` branches with an optional `else` list.
    Condition {
        #[serde(default)]
        conditions: Vec<ConditionBranch>,
        #[serde(default, rename = "else", skip_serializing_if = "Option::is_none")]
        otherwise: Option<Vec<ActionSpec>>,
    },
    SetVariable {
        variable: String,
        #[serde(default)]
        value: Value,
    },
    /// Jump to another topic by its display name.
    CallTopic { topic: String },
    CallConnector {
        connector: String,
        operation: String,
        #[serde(default)]
        inputs: Map<String, Value>,
    },
    CallFlow {
        flow: String,
        #[serde(default)]
        inputs: Map<String, Value>,
    },
    GenerativeAnswer,
    EndConversation,
    Escalate,
}

impl Action {
    /// Every `type` tag that deserializes into an [`Action`].
    pub const TAGS: [&'static str; 10] = [
        "message",
        "question",
        "condition",
        "set_variable",
        "call_topic",
        "call_connector",
        "call_flow",
        "generative_answer",
        "end_conversation",
        "escalate",
    ];

    /// The wire tag of this action.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Message { .. } => "message",
            Action::Question { .. } => "question",
            Action::Condition { .. } => "condition",
            Action::SetVariable { .. } => "set_variable",
            Action::CallTopic { .. } => "call_topic",
            Action::CallConnector { .. } => "call_connector",
            Action::CallFlow { .. } => "call_flow",
            Action::GenerativeAnswer => "generative_answer",
            Action::EndConversation => "end_conversation",
            Action::Escalate => "escalate",
        }
    }
}

/// One `if`/`then` pair inside a `condition` action.
///
/// The predicate is an opaque expression string; it is never parsed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionBranch {
    #[serde(rename = "if")]
    pub condition: String,
    #[serde(default)]
    pub then: Vec<ActionSpec>,
}

/// An action as written in the spec, recognized or not.
///
/// Deserialization never rejects a single action. An unknown `type` is kept
/// as `Unrecognized`, and a known `type` whose fields do not fit is kept as
/// `Malformed` with the decoding error, so the compiler can emit a
/// placeholder for either and keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionSpec {
    Known(Action),
    Unrecognized { kind: String, body: Value },
    Malformed { kind: String, body: Value, reason: String },
}

impl ActionSpec {
    /// Build an unrecognized action carrying only its tag.
    pub fn unrecognized(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let body = serde_json::json!({ "type": kind });
        ActionSpec::Unrecognized { kind, body }
    }

    /// The `type` tag as written in the spec.
    pub fn tag(&self) -> &str {
        match self {
            ActionSpec::Known(action) => action.tag(),
            ActionSpec::Unrecognized { kind, .. } | ActionSpec::Malformed { kind, .. } => kind,
        }
    }
}

impl From<Action> for ActionSpec {
    fn from(action: Action) -> Self {
        ActionSpec::Known(action)
    }
}

impl Serialize for ActionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionSpec::Known(action) => action.serialize(serializer),
            ActionSpec::Unrecognized { body, .. } | ActionSpec::Malformed { body, .. } => {
                body.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for ActionSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = Value::deserialize(deserializer)?;
        let kind = body.get("type").and_then(Value::as_str).map(str::to_owned);

        match kind {
            Some(kind) if Action::TAGS.contains(&kind.as_str()) => {
                Ok(match serde_json::from_value(body.clone()) {
                    Ok(action) => ActionSpec::Known(action),
                    Err(e) => ActionSpec::Malformed { kind, body, reason: e.to_string() },
                })
            }
            Some(kind) => Ok(ActionSpec::Unrecognized { kind, body }),
            None => Ok(ActionSpec::Unrecognized {
                kind: MISSING_ACTION_TAG.to_string(),
                body,
            }),
        }
    }
}
