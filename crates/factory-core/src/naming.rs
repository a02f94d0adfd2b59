//! Deterministic schema and variable naming.
//!
//! Schema names are primary keys in the target runtime, so every function
//! here is a pure function of its input: the same name always yields the
//! same schema name.

/// Strip every character outside `[A-Za-z0-9]`.
pub fn sanitize_schema_name(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Strip every character outside `[A-Za-z0-9_]`.
pub fn sanitize_variable_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// `{prefix}_{name}` for the bot entity.
pub fn bot_schema_name(prefix: &str, agent_name: &str) -> String {
    format!("{prefix}_{}", sanitize_schema_name(agent_name))
}

/// `{prefix}_{name}_gpt_default` for the GPT instructions component.
pub fn instructions_schema_name(prefix: &str, agent_name: &str) -> String {
    format!("{prefix}_{}_gpt_default", sanitize_schema_name(agent_name))
}

/// `{prefix}_topic_{name}` for a dialog component.
pub fn topic_schema_name(prefix: &str, topic_name: &str) -> String {
    format!("{prefix}_topic_{}", sanitize_schema_name(topic_name))
}

/// A topic-scoped variable initialized on first assignment.
pub fn topic_variable(sanitized: &str) -> String {
    format!("init:Topic.{sanitized}")
}
