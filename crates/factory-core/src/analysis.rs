//! Post-pass checks over an assembled document.
//!
//! These never fail a compilation. Topic references are resolved by schema
//! name only after every component exists, so forward references between
//! user topics are fine.

use std::collections::HashSet;

use tracing::warn;

use factory_contracts::{
    diagnostics::{codes, Diagnostics},
    template::{ActionNode, TargetDocument},
};

/// Report dangling `BeginDialog` targets and actions after `EndConversation`.
pub fn check_document(document: &TargetDocument, diagnostics: &mut Diagnostics) {
    let known: HashSet<&str> = document.components.iter().map(|c| c.schema_name()).collect();

    for dialog in document.dialogs() {
        let context = format!("topic '{}' > actions", dialog.display_name);
        check_actions(&dialog.dialog.begin_dialog.actions, &known, &context, diagnostics);
    }
}

fn check_actions(
    actions: &[ActionNode],
    known: &HashSet<&str>,
    path: &str,
    diagnostics: &mut Diagnostics,
) {
    let mut ended_at = None;

    for (index, action) in actions.iter().enumerate() {
        let here = format!("{path}[{index}]");

        if let Some(end) = ended_at {
            diagnostics.info(
                codes::UNREACHABLE_ACTION,
                &here,
                format!(
                    "{} follows EndConversation at index {end} and will never run",
                    action.kind()
                ),
            );
        }

        match action {
            ActionNode::BeginDialog { dialog, .. } if !known.contains(dialog.as_str()) => {
                warn!(target_topic = %dialog, context = %here, "topic reference does not resolve");
                diagnostics.warn(
                    codes::UNRESOLVED_TOPIC_REFERENCE,
                    &here,
                    format!("no topic with schema name '{dialog}' exists in this document"),
                );
            }
            ActionNode::ConditionGroup { conditions, else_actions, .. } => {
                for (branch, item) in conditions.iter().enumerate() {
                    let nested = format!("{here}.conditions[{branch}].then");
                    check_actions(&item.actions, known, &nested, diagnostics);
                }
                check_actions(else_actions, known, &format!("{here}.else"), diagnostics);
            }
            ActionNode::EndConversation { .. } if ended_at.is_none() => ended_at = Some(index),
            _ => {}
        }
    }
}
