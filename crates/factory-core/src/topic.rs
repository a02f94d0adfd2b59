//! Topic compiler: one spec topic to one dialog component.

use serde_json::Map;
use tracing::debug;
use uuid::Uuid;

use factory_contracts::{
    error::{ForgeError, ForgeResult},
    spec::TopicSpec,
    template::{
        ActionNode, Component, Dialog, DialogComponent, Intent, ManagedProperties, StartBehavior,
        Trigger, TriggerKind,
    },
};

use crate::{
    action::compile_actions,
    context::CompileContext,
    naming::{sanitize_schema_name, topic_schema_name},
};

/// Id of every dialog's root trigger node.
pub const TRIGGER_ID: &str = "main";

pub(crate) const ACTIVE: &str = "Active";

/// Compile a user-defined topic into a phrase-triggered dialog component.
///
/// `index` is the topic's position in the spec, used only for error
/// messages. Fails when the topic name has no characters usable in a schema
/// name.
pub fn compile_topic(
    topic: &TopicSpec,
    index: usize,
    bot_id: Uuid,
    ctx: &mut CompileContext<'_>,
) -> ForgeResult<Component> {
    if sanitize_schema_name(&topic.name).is_empty() {
        return Err(ForgeError::InvalidName {
            field: format!("topics[{index}].name"),
            value: topic.name.clone(),
        });
    }
    let schema_name = topic_schema_name(ctx.prefix, &topic.name);

    let path = format!("topic '{}' > actions", topic.name);
    let actions = compile_actions(topic.actions(), ctx, &path);

    debug!(
        topic = %topic.name,
        schema_name = %schema_name,
        phrases = topic.phrases().len(),
        actions = actions.len(),
        "compiled topic"
    );

    Ok(dialog_component(
        bot_id,
        &topic.name,
        topic.description.as_deref().unwrap_or_default(),
        schema_name,
        None,
        Trigger {
            kind: TriggerKind::OnRecognizedIntent,
            id: TRIGGER_ID.to_string(),
            intent: Some(intent(&topic.name, topic.phrases())),
            actions,
        },
    ))
}

/// Phrase recognition for a trigger, excluded from intent-selection prompts.
pub(crate) fn intent<S: AsRef<str>>(display_name: &str, phrases: &[S]) -> Intent {
    Intent {
        display_name: display_name.to_string(),
        include_in_on_select_intent: false,
        trigger_queries: phrases.iter().map(|p| p.as_ref().to_string()).collect(),
    }
}

/// A root trigger without phrase recognition.
pub(crate) fn event_trigger(kind: TriggerKind, actions: Vec<ActionNode>) -> Trigger {
    Trigger { kind, id: TRIGGER_ID.to_string(), intent: None, actions }
}

/// Wrap a trigger in the component envelope shared by every topic.
pub(crate) fn dialog_component(
    bot_id: Uuid,
    display_name: &str,
    description: &str,
    schema_name: String,
    start_behavior: Option<StartBehavior>,
    begin_dialog: Trigger,
) -> Component {
    Component::DialogComponent(DialogComponent {
        managed_properties: ManagedProperties { is_customizable: false },
        display_name: display_name.to_string(),
        parent_bot_id: bot_id,
        description: description.to_string(),
        share_context: Map::new(),
        state: ACTIVE.to_string(),
        status: ACTIVE.to_string(),
        schema_name,
        dialog: Dialog { start_behavior, begin_dialog },
    })
}
