//! Starter specs for `af init`.

use factory_contracts::spec::{Action, AgentSpec, SpecMetadata, TopicSpec, Triggers};

/// Slug used when `init` is given no name.
pub const DEFAULT_AGENT_SLUG: &str = "my-agent";

/// Title-case a dashed slug: `"my-agent"` becomes `"My Agent"`.
pub fn display_name_of(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A new starter spec for the agent `slug` (default [`DEFAULT_AGENT_SLUG`])
/// targeting `cloud`.
///
/// Built fresh on every call; callers are free to mutate the result.
pub fn starter_spec(slug: Option<&str>, cloud: &str) -> AgentSpec {
    let slug = slug.unwrap_or(DEFAULT_AGENT_SLUG);

    AgentSpec {
        name: Some(display_name_of(slug)),
        instructions: Some("You are a helpful assistant.".to_string()),
        capabilities: Some(vec!["q_and_a".to_string(), "generative_actions".to_string()]),
        metadata: Some(SpecMetadata {
            language: Some("en-US".to_string()),
            cloud: Some(cloud.to_string()),
            version: Some("1.0.0".to_string()),
            description: Some("Description of what this agent does".to_string()),
        }),
        topics: Some(vec![TopicSpec {
            name: "Getting Started".to_string(),
            description: Some("Explains what the agent can help with.".to_string()),
            triggers: Some(Triggers {
                phrases: vec![
                    "get started".to_string(),
                    "what can you do".to_string(),
                    "help".to_string(),
                ],
            }),
            actions: Some(vec![
                Action::Message {
                    text: "I can answer questions. What would you like to know?".to_string(),
                }
                .into(),
                Action::GenerativeAnswer.into(),
            ]),
        }]),
        ..AgentSpec::default()
    }
}
