//! The bot-definition template produced by the compiler.
//!
//! Key names are fixed by the consuming runtime, which parses the document
//! structurally. Every serde rename in this module is load-bearing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The `kind` of every compiled document.
pub const BOT_DEFINITION_KIND: &str = "BotDefinition";

/// The root of a compiled template: one bot entity plus its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDocument {
    /// Always [`BOT_DEFINITION_KIND`].
    pub kind: String,
    pub environment_id: String,
    pub entity: BotEntity,
    /// System topics first, then user topics in spec order.
    pub components: Vec<Component>,
}

impl TargetDocument {
    /// Iterate every dialog component in document order.
    pub fn dialogs(&self) -> impl Iterator<Item = &DialogComponent> {
        self.components.iter().filter_map(|c| match c {
            Component::DialogComponent(dialog) => Some(dialog),
            Component::Instructions(_) => None,
        })
    }

    /// Find a component by its schema name.
    pub fn component(&self, schema_name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.schema_name() == schema_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedProperties {
    pub is_customizable: bool,
}

/// Root metadata for the bot: identity, auth, locale and runtime flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotEntity {
    pub managed_properties: ManagedProperties,
    pub display_name: String,
    pub schema_name: String,
    pub component_id_unique: Uuid,
    pub cds_bot_id: Uuid,
    pub access_control_policy: String,
    pub authentication_mode: String,
    pub authentication_trigger: String,
    pub configuration: BotConfiguration,
    pub synchronization_status: SynchronizationStatus,
    pub template: String,
    /// Windows LCID, e.g. 1033 for en-US.
    pub language: u32,
    pub runtime_provider: String,
    pub state: String,
    pub status: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfiguration {
    pub settings: BotSettings,
    pub bot_speech_settings: BotSpeechSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotSettings {
    #[serde(rename = "GenerativeActionsEnabled")]
    pub generative_actions_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSpeechSettings {
    pub is_domain_language_model_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynchronizationStatus {
    pub content_version: u32,
    pub current_synchronization_state: SynchronizationState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynchronizationState {
    pub provisioning_status: String,
    pub state: String,
}

/// A top-level component of the bot definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Component {
    DialogComponent(DialogComponent),
    /// GPT instructions, carried by the runtime as an opaque legacy component.
    #[serde(rename = "LegacyOrUnknownComponent")]
    Instructions(InstructionsComponent),
}

impl Component {
    /// The document-wide primary key of this component.
    pub fn schema_name(&self) -> &str {
        match self {
            Component::DialogComponent(c) => &c.schema_name,
            Component::Instructions(c) => &c.schema_name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Component::DialogComponent(c) => &c.display_name,
            Component::Instructions(c) => &c.display_name,
        }
    }
}

/// One conversational topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogComponent {
    pub managed_properties: ManagedProperties,
    pub display_name: String,
    pub parent_bot_id: Uuid,
    pub description: String,
    pub share_context: Map<String, Value>,
    pub state: String,
    pub status: String,
    pub schema_name: String,
    pub dialog: Dialog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_behavior: Option<StartBehavior>,
    pub begin_dialog: Trigger,
}

/// How a topic interacts with topics already running when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartBehavior {
    CancelOtherTopics,
    UseLatestPublishedContentAndCancelOtherTopics,
}

/// The root node of a dialog graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub actions: Vec<ActionNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    OnConversationStart,
    OnRecognizedIntent,
    OnUnknownIntent,
    OnEscalate,
    OnError,
}

/// Phrase-based recognition for a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub display_name: String,
    pub include_in_on_select_intent: bool,
    pub trigger_queries: Vec<String>,
}

/// Answer types a question node can expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityKind {
    BooleanPrebuiltEntity,
    NumberPrebuiltEntity,
    DateTimePrebuiltEntity,
    EmailPrebuiltEntity,
    PhoneNumberPrebuiltEntity,
    #[default]
    StringPrebuiltEntity,
    ClosedListEntity,
}

/// Message payload of a `SendActivity` node.
///
/// Both shapes are accepted by the runtime; the start and greeting system
/// topics use the structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activity {
    Text(String),
    Structured { text: Vec<String> },
}

impl Activity {
    /// The first line of text carried by this activity.
    pub fn text(&self) -> &str {
        match self {
            Activity::Text(text) => text,
            Activity::Structured { text } => text.first().map(String::as_str).unwrap_or(""),
        }
    }
}

/// A single node in a dialog's action list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ActionNode {
    SendActivity {
        id: String,
        #[serde(
            rename = "conversationOutcome",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        conversation_outcome: Option<String>,
        activity: Activity,
    },
    Question {
        id: String,
        variable: String,
        prompt: String,
        entity: EntityKind,
    },
    ConditionGroup {
        id: String,
        conditions: Vec<ConditionItem>,
        #[serde(rename = "elseActions", default)]
        else_actions: Vec<ActionNode>,
    },
    SetVariable {
        id: String,
        variable: String,
        value: Value,
    },
    BeginDialog {
        id: String,
        /// Schema name of the target topic.
        dialog: String,
    },
    InvokeConnectorAction {
        id: String,
        #[serde(rename = "connectionReference")]
        connection_reference: String,
        #[serde(rename = "operationId")]
        operation_id: String,
        inputs: Map<String, Value>,
    },
    InvokeFlowAction {
        id: String,
        #[serde(rename = "flowId")]
        flow_id: String,
        inputs: Map<String, Value>,
    },
    SearchAndSummarizeContent {
        id: String,
        #[serde(rename = "userInput")]
        user_input: String,
        variable: String,
    },
    EndConversation {
        id: String,
    },
    CancelAllDialogs {
        id: String,
    },
}

impl ActionNode {
    pub fn id(&self) -> &str {
        match self {
            ActionNode::SendActivity { id, .. }
            | ActionNode::Question { id, .. }
            | ActionNode::ConditionGroup { id, .. }
            | ActionNode::SetVariable { id, .. }
            | ActionNode::BeginDialog { id, .. }
            | ActionNode::InvokeConnectorAction { id, .. }
            | ActionNode::InvokeFlowAction { id, .. }
            | ActionNode::SearchAndSummarizeContent { id, .. }
            | ActionNode::EndConversation { id }
            | ActionNode::CancelAllDialogs { id } => id,
        }
    }

    /// The wire `kind` of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionNode::SendActivity { .. } => "SendActivity",
            ActionNode::Question { .. } => "Question",
            ActionNode::ConditionGroup { .. } => "ConditionGroup",
            ActionNode::SetVariable { .. } => "SetVariable",
            ActionNode::BeginDialog { .. } => "BeginDialog",
            ActionNode::InvokeConnectorAction { .. } => "InvokeConnectorAction",
            ActionNode::InvokeFlowAction { .. } => "InvokeFlowAction",
            ActionNode::SearchAndSummarizeContent { .. } => "SearchAndSummarizeContent",
            ActionNode::EndConversation { .. } => "EndConversation",
            ActionNode::CancelAllDialogs { .. } => "CancelAllDialogs",
        }
    }
}

/// One predicate/actions pair inside a `ConditionGroup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionItem {
    pub id: String,
    /// Opaque runtime expression, passed through verbatim.
    pub condition: String,
    pub actions: Vec<ActionNode>,
}

/// GPT instructions for the bot's generative orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionsComponent {
    pub managed_properties: ManagedProperties,
    pub display_name: String,
    pub parent_bot_id: Uuid,
    pub share_context: Map<String, Value>,
    pub state: String,
    pub status: String,
    pub component_type_int: u32,
    pub schema_name: String,
    /// YAML rendering of a [`GptComponentMetadata`].
    pub data: String,
}

/// The payload embedded as YAML text in an [`InstructionsComponent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GptComponentMetadata {
    pub kind: String,
    pub instructions: String,
    pub gpt_capabilities: Map<String, Value>,
}
