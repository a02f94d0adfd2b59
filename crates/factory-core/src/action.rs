//! Action compiler: spec actions to dialog action nodes.
//!
//! Each `ActionSpec` compiles to exactly one `ActionNode`. Conditions
//! recurse into their branch lists element by element, preserving order.
//!
//! Nothing in here can fail. An unrecognized action tag, or a known tag whose
//! fields could not be read, becomes a visible placeholder message plus a
//! diagnostic, and compilation of its siblings carries on. An unknown entity
//! type falls back to a string answer.

use tracing::{debug, warn};

use factory_contracts::{
    diagnostics::codes,
    spec::{Action, ActionSpec, ConditionBranch},
    template::{ActionNode, Activity, ConditionItem, EntityKind},
};

use crate::{
    context::CompileContext,
    mapping::try_entity_type,
    naming::{sanitize_variable_name, topic_schema_name, topic_variable},
    system::ESCALATE_TOPIC,
};

/// Variable a question stores its answer in when none is named.
pub const DEFAULT_VARIABLE: &str = "Response";

/// Input expression bound to generative answers.
pub const CURRENT_TURN_INPUT: &str = "=System.Activity.Text";

/// Output variable of generative answers.
pub const ANSWER_VARIABLE: &str = "Topic.Answer";

/// Compile every action in `actions`, in order.
///
/// `path` locates the list for diagnostics, e.g. "topic 'Billing' > actions".
pub fn compile_actions(
    actions: &[ActionSpec],
    ctx: &mut CompileContext<'_>,
    path: &str,
) -> Vec<ActionNode> {
    actions
        .iter()
        .enumerate()
        .map(|(index, action)| compile_action(action, ctx, &format!("{path}[{index}]")))
        .collect()
}

/// Compile a single action. `path` locates the action itself.
pub fn compile_action(
    action: &ActionSpec,
    ctx: &mut CompileContext<'_>,
    path: &str,
) -> ActionNode {
    match action {
        ActionSpec::Known(action) => compile_known(action, ctx, path),
        ActionSpec::Unrecognized { kind, .. } => {
            warn!(
                action_type = %kind,
                context = %path,
                "unknown action type, emitting placeholder"
            );
            ctx.diagnostics.warn(
                codes::UNKNOWN_ACTION,
                path,
                format!("unknown action type '{kind}' replaced with a placeholder message"),
            );
            placeholder(ctx, format!("[Unknown action: {kind}]"))
        }
        ActionSpec::Malformed { kind, reason, .. } => {
            warn!(
                action_type = %kind,
                context = %path,
                error = %reason,
                "malformed action, emitting placeholder"
            );
            ctx.diagnostics.warn(
                codes::MALFORMED_ACTION,
                path,
                format!("'{kind}' action is malformed ({reason}), replaced with a placeholder"),
            );
            placeholder(ctx, format!("[Malformed action: {kind}]"))
        }
    }
}

fn placeholder(ctx: &mut CompileContext<'_>, text: String) -> ActionNode {
    ActionNode::SendActivity {
        id: ctx.node_id("sendMessage"),
        conversation_outcome: None,
        activity: Activity::Text(text),
    }
}

fn compile_known(action: &Action, ctx: &mut CompileContext<'_>, path: &str) -> ActionNode {
    debug!(action_type = action.tag(), context = %path, "compiling action");

    match action {
        Action::Message { text } => ActionNode::SendActivity {
            id: ctx.node_id("sendMessage"),
            conversation_outcome: None,
            activity: Activity::Text(text.clone()),
        },

        Action::Question { prompt, variable, entity } => {
            let variable = resolve_variable(variable.as_deref(), ctx, path);
            let entity = resolve_entity(entity.as_deref(), ctx, path);
            ActionNode::Question {
                id: ctx.node_id("question"),
                variable: topic_variable(&variable),
                prompt: prompt.clone(),
                entity,
            }
        }

        Action::Condition { conditions, otherwise } => compile_condition(
            conditions,
            otherwise.as_deref().unwrap_or(&[]),
            ctx,
            path,
        ),

        Action::SetVariable { variable, value } => {
            let variable = resolve_variable(Some(variable), ctx, path);
            ActionNode::SetVariable {
                id: ctx.node_id("setVariable"),
                variable: topic_variable(&variable),
                value: value.clone(),
            }
        }

        // Targets are not resolved here; the post-pass in `analysis`
        // reports references to topics the document does not define.
        Action::CallTopic { topic } => ActionNode::BeginDialog {
            id: ctx.bare_id(),
            dialog: topic_schema_name(ctx.prefix, topic),
        },

        Action::CallConnector { connector, operation, inputs } => {
            ActionNode::InvokeConnectorAction {
                id: ctx.node_id("connector"),
                connection_reference: connector.clone(),
                operation_id: operation.clone(),
                inputs: inputs.clone(),
            }
        }

        Action::CallFlow { flow, inputs } => ActionNode::InvokeFlowAction {
            id: ctx.node_id("flow"),
            flow_id: flow.clone(),
            inputs: inputs.clone(),
        },

        Action::GenerativeAnswer => ActionNode::SearchAndSummarizeContent {
            id: ctx.node_id("search"),
            user_input: CURRENT_TURN_INPUT.to_string(),
            variable: ANSWER_VARIABLE.to_string(),
        },

        // Trailing actions after this node are kept as written.
        Action::EndConversation => ActionNode::EndConversation {
            id: ctx.node_id("endConversation"),
        },

        Action::Escalate => ActionNode::BeginDialog {
            id: ctx.bare_id(),
            dialog: topic_schema_name(ctx.prefix, ESCALATE_TOPIC),
        },
    }
}

fn compile_condition(
    branches: &[ConditionBranch],
    otherwise: &[ActionSpec],
    ctx: &mut CompileContext<'_>,
    path: &str,
) -> ActionNode {
    let id = ctx.node_id("conditionGroup");

    let conditions = branches
        .iter()
        .enumerate()
        .map(|(index, branch)| ConditionItem {
            id: ctx.node_id("conditionItem"),
            // Expressions are opaque here; syntax errors surface at runtime.
            condition: branch.condition.clone(),
            actions: compile_actions(
                &branch.then,
                ctx,
                &format!("{path}.conditions[{index}].then"),
            ),
        })
        .collect();

    let else_actions = compile_actions(otherwise, ctx, &format!("{path}.else"));

    ActionNode::ConditionGroup { id, conditions, else_actions }
}

/// Sanitize a variable name, falling back to [`DEFAULT_VARIABLE`] when
/// nothing usable remains.
fn resolve_variable(name: Option<&str>, ctx: &mut CompileContext<'_>, path: &str) -> String {
    let raw = name.unwrap_or(DEFAULT_VARIABLE);
    let sanitized = sanitize_variable_name(raw);
    if !sanitized.is_empty() {
        return sanitized;
    }

    warn!(variable = %raw, context = %path, "variable name sanitizes to nothing, using default");
    ctx.diagnostics.warn(
        codes::INVALID_VARIABLE_NAME,
        path,
        format!("variable name '{raw}' has no usable characters; using '{DEFAULT_VARIABLE}'"),
    );
    DEFAULT_VARIABLE.to_string()
}

fn resolve_entity(entity: Option<&str>, ctx: &mut CompileContext<'_>, path: &str) -> EntityKind {
    let Some(tag) = entity else {
        return EntityKind::default();
    };

    try_entity_type(tag).unwrap_or_else(|| {
        warn!(entity_type = %tag, context = %path, "unknown entity type, expecting a string");
        ctx.diagnostics.warn(
            codes::UNKNOWN_ENTITY_TYPE,
            path,
            format!("unknown entity type '{tag}' mapped to StringPrebuiltEntity"),
        );
        EntityKind::default()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use factory_contracts::{
        diagnostics::{codes, Diagnostics},
        spec::{Action, ActionSpec, ConditionBranch},
        template::{ActionNode, Activity, EntityKind},
    };

    use super::{compile_action, compile_actions};
    use crate::{context::CompileContext, ids::SequentialIds};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Compile one action with prefix "af" and a fresh deterministic
    /// generator, returning the node and the diagnostics it produced.
    fn compile(action: ActionSpec) -> (ActionNode, Diagnostics) {
        let mut ids = SequentialIds::new();
        let mut diagnostics = Diagnostics::new();
        let node = {
            let mut ctx = CompileContext::new("af", &mut ids, &mut diagnostics);
            compile_action(&action, &mut ctx, "topic 'T' > actions[0]")
        };
        (node, diagnostics)
    }

    fn message(text: &str) -> ActionSpec {
        Action::Message { text: text.to_string() }.into()
    }

    // ── Leaf actions ──────────────────────────────────────────────────────────

    #[test]
    fn message_becomes_send_activity() {
        let (node, diagnostics) = compile(message("Your order shipped."));

        match node {
            ActionNode::SendActivity { id, activity, conversation_outcome } => {
                assert_eq!(id, "sendMessage_00000001");
                assert_eq!(activity, Activity::Text("Your order shipped.".to_string()));
                assert!(conversation_outcome.is_none());
            }
            other => panic!("expected SendActivity, got {:?}", other),
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn question_namespaces_and_sanitizes_variable() {
        let (node, _) = compile(
            Action::Question {
                prompt: "What's your email?".to_string(),
                variable: Some("user email".to_string()),
                entity: Some("email".to_string()),
            }
            .into(),
        );

        match node {
            ActionNode::Question { variable, prompt, entity, .. } => {
                assert_eq!(variable, "init:Topic.useremail");
                assert_eq!(prompt, "What's your email?");
                assert_eq!(entity, EntityKind::EmailPrebuiltEntity);
            }
            other => panic!("expected Question, got {:?}", other),
        }
    }

    #[test]
    fn question_defaults_variable_and_entity() {
        let (node, diagnostics) = compile(
            Action::Question { prompt: "Anything else?".to_string(), variable: None, entity: None }
                .into(),
        );

        match node {
            ActionNode::Question { variable, entity, .. } => {
                assert_eq!(variable, "init:Topic.Response");
                assert_eq!(entity, EntityKind::StringPrebuiltEntity);
            }
            other => panic!("expected Question, got {:?}", other),
        }
        assert!(diagnostics.is_empty(), "absent fields are not worth a warning");
    }

    #[test]
    fn unknown_entity_type_warns_and_defaults() {
        let (node, diagnostics) = compile(
            Action::Question {
                prompt: "Where?".to_string(),
                variable: Some("City".to_string()),
                entity: Some("geography".to_string()),
            }
            .into(),
        );

        assert!(matches!(
            node,
            ActionNode::Question { entity: EntityKind::StringPrebuiltEntity, .. }
        ));
        let warning = diagnostics.with_code(codes::UNKNOWN_ENTITY_TYPE).next().unwrap();
        assert_eq!(warning.context, "topic 'T' > actions[0]");
        assert!(warning.message.contains("geography"));
    }

    #[test]
    fn set_variable_passes_value_through() {
        let (node, _) = compile(
            Action::SetVariable { variable: "Total".to_string(), value: json!("={Topic.Sum * 2}") }
                .into(),
        );

        match node {
            ActionNode::SetVariable { id, variable, value } => {
                assert!(id.starts_with("setVariable_"));
                assert_eq!(variable, "init:Topic.Total");
                assert_eq!(value, json!("={Topic.Sum * 2}"));
            }
            other => panic!("expected SetVariable, got {:?}", other),
        }
    }

    #[test]
    fn unusable_variable_name_falls_back() {
        let (node, diagnostics) = compile(
            Action::SetVariable { variable: "???".to_string(), value: json!(1) }.into(),
        );

        assert!(matches!(
            node,
            ActionNode::SetVariable { ref variable, .. } if variable == "init:Topic.Response"
        ));
        assert_eq!(diagnostics.with_code(codes::INVALID_VARIABLE_NAME).count(), 1);
    }

    #[test]
    fn call_topic_references_sanitized_schema_name() {
        let (node, _) = compile(Action::CallTopic { topic: "Order Status".to_string() }.into());

        match node {
            ActionNode::BeginDialog { id, dialog } => {
                assert_eq!(id, "00000001", "BeginDialog ids carry no stem");
                assert_eq!(dialog, "af_topic_OrderStatus");
            }
            other => panic!("expected BeginDialog, got {:?}", other),
        }
    }

    #[test]
    fn connector_and_flow_copy_inputs_verbatim() {
        let inputs = json!({ "to": "=Topic.Email", "retries": 3 })
            .as_object()
            .cloned()
            .unwrap();

        let (connector, _) = compile(
            Action::CallConnector {
                connector: "shared_office365".to_string(),
                operation: "SendEmailV2".to_string(),
                inputs: inputs.clone(),
            }
            .into(),
        );
        let (flow, _) = compile(
            Action::CallFlow { flow: "5f1c-flow".to_string(), inputs: inputs.clone() }.into(),
        );

        match connector {
            ActionNode::InvokeConnectorAction {
                connection_reference, operation_id, inputs: copied, ..
            } => {
                assert_eq!(connection_reference, "shared_office365");
                assert_eq!(operation_id, "SendEmailV2");
                assert_eq!(copied, inputs);
            }
            other => panic!("expected InvokeConnectorAction, got {:?}", other),
        }
        match flow {
            ActionNode::InvokeFlowAction { flow_id, inputs: copied, .. } => {
                assert_eq!(flow_id, "5f1c-flow");
                assert_eq!(copied, inputs);
            }
            other => panic!("expected InvokeFlowAction, got {:?}", other),
        }
    }

    #[test]
    fn generative_answer_has_fixed_shape() {
        let (node, _) = compile(Action::GenerativeAnswer.into());

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "kind": "SearchAndSummarizeContent",
                "id": "search_00000001",
                "userInput": "=System.Activity.Text",
                "variable": "Topic.Answer"
            })
        );
    }

    #[test]
    fn escalate_targets_escalate_system_topic() {
        let (node, _) = compile(Action::Escalate.into());
        assert!(matches!(
            node,
            ActionNode::BeginDialog { ref dialog, .. } if dialog == "af_topic_Escalate"
        ));
    }

    #[test]
    fn end_conversation_keeps_trailing_actions() {
        let mut ids = SequentialIds::new();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = CompileContext::new("af", &mut ids, &mut diagnostics);

        let nodes = compile_actions(
            &[Action::EndConversation.into(), message("never sent")],
            &mut ctx,
            "topic 'T' > actions",
        );

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind(), "EndConversation");
        assert_eq!(nodes[1].kind(), "SendActivity");
    }

    // ── Degradation ───────────────────────────────────────────────────────────

    #[test]
    fn unknown_action_becomes_placeholder() {
        let (node, diagnostics) = compile(ActionSpec::unrecognized("bogus"));

        match node {
            ActionNode::SendActivity { activity, .. } => {
                assert_eq!(activity.text(), "[Unknown action: bogus]");
            }
            other => panic!("expected placeholder SendActivity, got {:?}", other),
        }
        let warning = diagnostics.with_code(codes::UNKNOWN_ACTION).next().unwrap();
        assert!(warning.message.contains("bogus"));
    }

    #[test]
    fn unknown_action_does_not_stop_siblings() {
        let mut ids = SequentialIds::new();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = CompileContext::new("af", &mut ids, &mut diagnostics);

        let nodes = compile_actions(
            &[message("before"), ActionSpec::unrecognized("bogus"), message("after")],
            &mut ctx,
            "topic 'T' > actions",
        );

        let texts: Vec<&str> = nodes
            .iter()
            .map(|n| match n {
                ActionNode::SendActivity { activity, .. } => activity.text(),
                other => panic!("unexpected node {:?}", other),
            })
            .collect();
        assert_eq!(texts, vec!["before", "[Unknown action: bogus]", "after"]);
        assert_eq!(
            diagnostics.iter().next().unwrap().context,
            "topic 'T' > actions[1]"
        );
    }

    #[test]
    fn malformed_action_becomes_placeholder() {
        let action: ActionSpec =
            serde_json::from_value(json!({ "type": "call_topic", "topic": 7 })).unwrap();
        let (node, diagnostics) = compile(action);

        match node {
            ActionNode::SendActivity { activity, .. } => {
                assert_eq!(activity.text(), "[Malformed action: call_topic]");
            }
            other => panic!("expected placeholder SendActivity, got {:?}", other),
        }
        let warning = diagnostics.with_code(codes::MALFORMED_ACTION).next().unwrap();
        assert_eq!(warning.context, "topic 'T' > actions[0]");
        assert!(warning.message.contains("call_topic"));
        assert!(diagnostics.with_code(codes::UNKNOWN_ACTION).next().is_none());
    }

    // ── Conditions ────────────────────────────────────────────────────────────

    #[test]
    fn condition_compiles_branches_in_order() {
        let action: ActionSpec = Action::Condition {
            conditions: vec![ConditionBranch {
                condition: "=Topic.Age >= 18".to_string(),
                then: vec![message("adult"), Action::GenerativeAnswer.into()],
            }],
            otherwise: Some(vec![Action::Escalate.into()]),
        }
        .into();

        let (node, _) = compile(action);

        match node {
            ActionNode::ConditionGroup { id, conditions, else_actions } => {
                assert!(id.starts_with("conditionGroup_"));
                assert_eq!(conditions.len(), 1);
                assert!(conditions[0].id.starts_with("conditionItem_"));
                assert_eq!(conditions[0].condition, "=Topic.Age >= 18");

                let then_kinds: Vec<&str> =
                    conditions[0].actions.iter().map(|a| a.kind()).collect();
                assert_eq!(then_kinds, vec!["SendActivity", "SearchAndSummarizeContent"]);

                let else_kinds: Vec<&str> = else_actions.iter().map(|a| a.kind()).collect();
                assert_eq!(else_kinds, vec!["BeginDialog"]);
            }
            other => panic!("expected ConditionGroup, got {:?}", other),
        }
    }

    #[test]
    fn condition_without_else_has_empty_else_actions() {
        let (node, _) = compile(
            Action::Condition {
                conditions: vec![ConditionBranch {
                    condition: "not even an expression (".to_string(),
                    then: vec![],
                }],
                otherwise: None,
            }
            .into(),
        );

        match node {
            ActionNode::ConditionGroup { conditions, else_actions, .. } => {
                assert_eq!(conditions[0].condition, "not even an expression (");
                assert!(else_actions.is_empty());
            }
            other => panic!("expected ConditionGroup, got {:?}", other),
        }
    }

    #[test]
    fn nested_call_topic_resolves_identically_at_any_depth() {
        let call = || -> ActionSpec { Action::CallTopic { topic: "Billing".to_string() }.into() };
        let nested: ActionSpec = Action::Condition {
            conditions: vec![ConditionBranch {
                condition: "=true".to_string(),
                then: vec![Action::Condition {
                    conditions: vec![],
                    otherwise: Some(vec![call()]),
                }
                .into()],
            }],
            otherwise: None,
        }
        .into();

        let (node, diagnostics) = compile(nested);

        let ActionNode::ConditionGroup { conditions, .. } = node else {
            panic!("expected outer ConditionGroup");
        };
        let ActionNode::ConditionGroup { else_actions, .. } = &conditions[0].actions[0] else {
            panic!("expected inner ConditionGroup");
        };
        assert!(matches!(
            &else_actions[0],
            ActionNode::BeginDialog { dialog, .. } if dialog == "af_topic_Billing"
        ));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn nested_unknown_action_reports_its_branch_path() {
        let (_, diagnostics) = compile(
            Action::Condition {
                conditions: vec![ConditionBranch {
                    condition: "=true".to_string(),
                    then: vec![message("ok"), ActionSpec::unrecognized("carousel")],
                }],
                otherwise: Some(vec![ActionSpec::unrecognized("map")]),
            }
            .into(),
        );

        let contexts: Vec<&str> = diagnostics.iter().map(|d| d.context.as_str()).collect();
        assert_eq!(
            contexts,
            vec![
                "topic 'T' > actions[0].conditions[0].then[1]",
                "topic 'T' > actions[0].else[0]",
            ]
        );
    }
}
