//! The built-in system topics every bot receives.
//!
//! Seven topics are synthesized unconditionally and always in the same
//! order. Consumers may rely on them preceding the user's topics.

use uuid::Uuid;

use factory_contracts::{
    spec::AgentSpec,
    template::{
        ActionNode, Activity, Component, ConditionItem, StartBehavior, Trigger, TriggerKind,
    },
};

use crate::{
    context::CompileContext,
    naming::topic_schema_name,
    topic::{dialog_component, event_trigger, intent, TRIGGER_ID},
};

/// Schema-name stem of the escalation topic, targeted by `escalate` actions
/// and the fallback topic.
pub const ESCALATE_TOPIC: &str = "Escalate";

/// Schema-name stems of the system topics, in emission order.
pub const SYSTEM_TOPICS: [&str; 7] = [
    "ConversationStart",
    "Greeting",
    "Fallback",
    ESCALATE_TOPIC,
    "Goodbye",
    "Thankyou",
    "OnError",
];

/// Fallback replays its message while the runtime's counter is below this.
pub const FALLBACK_RETRY_LIMIT: u32 = 3;

pub const DEFAULT_GREETING: &str = "Hello, how can I help you today?";
pub const DEFAULT_FALLBACK: &str =
    "I'm sorry, I'm not sure how to help with that. Can you try rephrasing?";
pub const DEFAULT_ESCALATION: &str =
    "Escalating to a representative is not currently configured. \
     Is there anything else I can help you with?";
pub const GOODBYE_MESSAGE: &str = "Goodbye! Have a great day.";
pub const THANKS_MESSAGE: &str = "You're welcome.";
pub const ERROR_MESSAGE: &str = "An error has occurred. Please try again.";

const GREETING_PHRASES: [&str; 5] = ["Good afternoon", "Good morning", "Hello", "Hey", "Hi"];

const ESCALATE_PHRASES: [&str; 7] = [
    "Talk to agent",
    "Talk to a person",
    "Talk to someone",
    "Can I speak to a representative",
    "Customer service",
    "I need help from a person",
    "Connect me to a live agent",
];

const GOODBYE_PHRASES: [&str; 4] = ["Bye", "Bye for now", "Good bye", "See you later"];

const THANKS_PHRASES: [&str; 4] = ["thanks", "thank you", "thanks so much", "ty"];

/// The greeting sent when a conversation starts and no override is given.
pub fn default_start_message(agent_name: &str) -> String {
    format!("Hello, I'm {agent_name}. How can I help you today?")
}

/// Synthesize the seven system topics for `spec`.
///
/// `agent_name` is the spec's validated name.
pub fn system_topics(
    agent_name: &str,
    spec: &AgentSpec,
    bot_id: Uuid,
    ctx: &mut CompileContext<'_>,
) -> Vec<Component> {
    vec![
        conversation_start(agent_name, spec, bot_id, ctx),
        greeting(spec, bot_id, ctx),
        fallback(spec, bot_id, ctx),
        escalate(spec, bot_id, ctx),
        goodbye(bot_id, ctx),
        thank_you(bot_id, ctx),
        on_error(bot_id, ctx),
    ]
}

fn send(ctx: &mut CompileContext<'_>, activity: Activity) -> ActionNode {
    ActionNode::SendActivity {
        id: ctx.node_id("sendMessage"),
        conversation_outcome: None,
        activity,
    }
}

fn cancel_all(ctx: &mut CompileContext<'_>) -> ActionNode {
    ActionNode::CancelAllDialogs { id: ctx.node_id("cancelAllDialogs") }
}

fn phrase_trigger(
    kind: TriggerKind,
    display_name: &str,
    phrases: &[&str],
    actions: Vec<ActionNode>,
) -> Trigger {
    Trigger {
        kind,
        id: TRIGGER_ID.to_string(),
        intent: Some(intent(display_name, phrases)),
        actions,
    }
}

fn conversation_start(
    agent_name: &str,
    spec: &AgentSpec,
    bot_id: Uuid,
    ctx: &mut CompileContext<'_>,
) -> Component {
    let text = spec
        .greeting
        .clone()
        .unwrap_or_else(|| default_start_message(agent_name));
    let actions = vec![send(ctx, Activity::Structured { text: vec![text] })];

    dialog_component(
        bot_id,
        "Conversation Start",
        "This system topic triggers when the agent receives an Activity indicating \
         the beginning of a new conversation.",
        topic_schema_name(ctx.prefix, SYSTEM_TOPICS[0]),
        None,
        event_trigger(TriggerKind::OnConversationStart, actions),
    )
}

fn greeting(spec: &AgentSpec, bot_id: Uuid, ctx: &mut CompileContext<'_>) -> Component {
    let text = spec
        .greeting
        .clone()
        .unwrap_or_else(|| DEFAULT_GREETING.to_string());
    let actions = vec![
        send(ctx, Activity::Structured { text: vec![text] }),
        cancel_all(ctx),
    ];

    dialog_component(
        bot_id,
        "Greeting",
        "This topic is triggered when the user greets the agent.",
        topic_schema_name(ctx.prefix, SYSTEM_TOPICS[1]),
        None,
        phrase_trigger(TriggerKind::OnRecognizedIntent, "Greeting", &GREETING_PHRASES, actions),
    )
}

/// Replays the fallback message a few times, then hands off to Escalate.
///
/// The counter lives in the runtime; only the expression is emitted here.
fn fallback(spec: &AgentSpec, bot_id: Uuid, ctx: &mut CompileContext<'_>) -> Component {
    let text = spec
        .fallback_message
        .clone()
        .unwrap_or_else(|| DEFAULT_FALLBACK.to_string());

    let group_id = ctx.node_id("conditionGroup");
    let item_id = ctx.node_id("conditionItem");
    let retry = send(ctx, Activity::Text(text));
    let handoff = ActionNode::BeginDialog {
        id: ctx.bare_id(),
        dialog: topic_schema_name(ctx.prefix, ESCALATE_TOPIC),
    };

    let actions = vec![ActionNode::ConditionGroup {
        id: group_id,
        conditions: vec![ConditionItem {
            id: item_id,
            condition: format!("=System.FallbackCount < {FALLBACK_RETRY_LIMIT}"),
            actions: vec![retry],
        }],
        else_actions: vec![handoff],
    }];

    dialog_component(
        bot_id,
        "Fallback",
        "This system topic triggers when the user's utterance does not match any existing topics.",
        topic_schema_name(ctx.prefix, SYSTEM_TOPICS[2]),
        None,
        event_trigger(TriggerKind::OnUnknownIntent, actions),
    )
}

fn escalate(spec: &AgentSpec, bot_id: Uuid, ctx: &mut CompileContext<'_>) -> Component {
    let text = spec
        .escalation_message
        .clone()
        .unwrap_or_else(|| DEFAULT_ESCALATION.to_string());
    let actions = vec![ActionNode::SendActivity {
        id: ctx.node_id("sendMessage"),
        conversation_outcome: Some("Escalated".to_string()),
        activity: Activity::Text(text),
    }];

    dialog_component(
        bot_id,
        "Escalate",
        "This system topic is triggered when the user indicates they would like \
         to speak to a representative.",
        topic_schema_name(ctx.prefix, ESCALATE_TOPIC),
        Some(StartBehavior::CancelOtherTopics),
        phrase_trigger(TriggerKind::OnEscalate, "Escalate", &ESCALATE_PHRASES, actions),
    )
}

fn goodbye(bot_id: Uuid, ctx: &mut CompileContext<'_>) -> Component {
    let actions = vec![
        send(ctx, Activity::Text(GOODBYE_MESSAGE.to_string())),
        ActionNode::EndConversation { id: ctx.node_id("endConversation") },
    ];

    dialog_component(
        bot_id,
        "Goodbye",
        "This topic triggers when the user says goodbye.",
        topic_schema_name(ctx.prefix, SYSTEM_TOPICS[4]),
        Some(StartBehavior::CancelOtherTopics),
        phrase_trigger(TriggerKind::OnRecognizedIntent, "Goodbye", &GOODBYE_PHRASES, actions),
    )
}

fn thank_you(bot_id: Uuid, ctx: &mut CompileContext<'_>) -> Component {
    let actions = vec![send(ctx, Activity::Text(THANKS_MESSAGE.to_string()))];

    dialog_component(
        bot_id,
        "Thank you",
        "This topic triggers when the user says thank you.",
        topic_schema_name(ctx.prefix, SYSTEM_TOPICS[5]),
        None,
        phrase_trigger(TriggerKind::OnRecognizedIntent, "Thank you", &THANKS_PHRASES, actions),
    )
}

fn on_error(bot_id: Uuid, ctx: &mut CompileContext<'_>) -> Component {
    let actions = vec![
        send(ctx, Activity::Text(ERROR_MESSAGE.to_string())),
        cancel_all(ctx),
    ];

    dialog_component(
        bot_id,
        "On Error",
        "This system topic triggers when the agent encounters an error.",
        topic_schema_name(ctx.prefix, SYSTEM_TOPICS[6]),
        Some(StartBehavior::UseLatestPublishedContentAndCancelOtherTopics),
        event_trigger(TriggerKind::OnError, actions),
    )
}
