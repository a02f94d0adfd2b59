//! The built-in JSON Schema for agent spec documents.
//!
//! Deliberately permissive: it checks the shape the compiler relies on and
//! leaves unknown action types and extra keys alone, since the compiler
//! recovers from those itself.

use serde_json::{json, Value};

/// `$id` of the built-in schema.
pub const AGENT_SPEC_SCHEMA_ID: &str = "https://agentfactory.dev/schemas/agent-spec.json";

/// Build the built-in agent spec schema.
pub fn agent_spec_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": AGENT_SPEC_SCHEMA_ID,
        "title": "Agent spec",
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "instructions": { "type": "string" },
            "greeting": { "type": "string" },
            "fallbackMessage": { "type": "string" },
            "escalationMessage": { "type": "string" },
            "capabilities": {
                "type": "array",
                "items": { "type": "string" }
            },
            "metadata": {
                "type": "object",
                "properties": {
                    "language": { "type": "string" },
                    "cloud": { "type": "string" },
                    "version": { "type": "string" },
                    "description": { "type": "string" }
                }
            },
            "security": {
                "type": "object",
                "properties": {
                    "authentication": {
                        "type": "object",
                        "properties": { "mode": { "type": "string" } }
                    }
                }
            },
            "topics": {
                "type": "array",
                "items": { "$ref": "#/$defs/topic" }
            }
        },
        "$defs": {
            "topic": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "description": { "type": "string" },
                    "triggers": {
                        "type": "object",
                        "properties": {
                            "phrases": {
                                "type": "array",
                                "items": { "type": "string" }
                            }
                        }
                    },
                    "actions": { "$ref": "#/$defs/actions" }
                }
            },
            "actions": {
                "type": "array",
                "items": { "$ref": "#/$defs/action" }
            },
            "action": {
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": { "type": "string" },
                    "conditions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["if"],
                            "properties": {
                                "if": { "type": "string" },
                                "then": { "$ref": "#/$defs/actions" }
                            }
                        }
                    },
                    "else": { "$ref": "#/$defs/actions" }
                }
            }
        }
    })
}
