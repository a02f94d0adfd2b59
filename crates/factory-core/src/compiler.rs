//! The document assembler: one agent spec in, one bot definition out.
//!
//! A compilation runs in a fixed order:
//!
//!   Entity → Instructions → System topics → User topics → Uniqueness → Post-pass
//!
//! Every identifier comes from the `IdGenerator` passed to the call, and every
//! degraded input is recorded in the returned `Diagnostics`. The compiler
//! holds nothing but immutable options and can be shared across threads.
//!
//! The entity's `cdsBotId` is the same uuid every component carries as
//! `parentBotId`, so a document links its components to its bot without a
//! lookup table. Only `componentIdUnique` is drawn separately.

use std::collections::HashMap;

use serde_json::Map;
use tracing::{debug, info, warn};
use uuid::Uuid;

use factory_contracts::{
    diagnostics::{codes, Diagnostics},
    error::{ForgeError, ForgeResult},
    options::{CloudSettings, CompileOptions},
    spec::AgentSpec,
    template::{
        BotConfiguration, BotEntity, BotSettings, BotSpeechSettings, Component,
        GptComponentMetadata, InstructionsComponent, ManagedProperties, SynchronizationState,
        SynchronizationStatus, TargetDocument, BOT_DEFINITION_KIND,
    },
};

use crate::{
    analysis::check_document,
    context::CompileContext,
    ids::RandomIds,
    mapping::{cloud_settings_of, try_cloud_settings, try_locale_code, DEFAULT_LCID},
    naming::{bot_schema_name, instructions_schema_name, sanitize_schema_name},
    system::system_topics,
    topic::{compile_topic, ACTIVE},
    traits::IdGenerator,
};

/// Capability that turns on the generative orchestrator.
pub const GENERATIVE_ACTIONS: &str = "generative_actions";

/// Authentication mode used when the spec names none.
pub const DEFAULT_AUTHENTICATION_MODE: &str = "Integrated";

/// `componentTypeInt` of the GPT instructions component.
pub const INSTRUCTIONS_COMPONENT_TYPE: u32 = 15;

const GPT_COMPONENT_KIND: &str = "GptComponentMetadata";

/// The output of one successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub document: TargetDocument,
    /// Every recovered-from problem, in the order it was found.
    pub diagnostics: Diagnostics,
    /// The effective cloud, resolved from the spec or the options.
    pub cloud: CloudSettings,
}

/// Compiles agent specs into bot-definition templates.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `spec` with fresh random identifiers.
    pub fn compile(&self, spec: &AgentSpec) -> ForgeResult<Compilation> {
        self.compile_with(spec, &mut RandomIds::new())
    }

    /// Compile `spec`, drawing every identifier from `ids`.
    ///
    /// # Errors
    ///
    /// - `MissingField` when the spec has no `name`
    /// - `InvalidName` when the agent or a topic name sanitizes to nothing
    /// - `ConfigError` when the configured prefix is empty or not alphanumeric
    /// - `DuplicateSchemaName` when two components collide
    /// - `Serialization` when the instructions payload cannot be rendered
    ///
    /// Unknown actions, entity types, locales and clouds are not errors.
    pub fn compile_with(
        &self,
        spec: &AgentSpec,
        ids: &mut dyn IdGenerator,
    ) -> ForgeResult<Compilation> {
        let name = spec
            .name
            .as_deref()
            .ok_or_else(|| ForgeError::MissingField { field: "name".to_string() })?;
        if sanitize_schema_name(name).is_empty() {
            return Err(ForgeError::InvalidName {
                field: "name".to_string(),
                value: name.to_string(),
            });
        }
        let prefix = self.options.prefix.as_str();
        validate_prefix(prefix)?;

        let mut diagnostics = Diagnostics::new();
        let language = resolve_language(spec, &mut diagnostics);
        let cloud = self.resolve_cloud(spec, &mut diagnostics);

        let bot_id = ids.uuid();
        let component_id = ids.uuid();
        let entity = bot_entity(spec, name, prefix, bot_id, component_id, language);

        debug!(agent = %name, schema_name = %entity.schema_name, "assembling bot definition");

        let mut ctx = CompileContext::new(prefix, ids, &mut diagnostics);
        let mut components = Vec::new();

        if let Some(instructions) = spec.instructions.as_deref() {
            components.push(instructions_component(name, prefix, instructions, bot_id)?);
        }

        components.extend(system_topics(name, spec, bot_id, &mut ctx));

        for (index, topic) in spec.topics().enumerate() {
            components.push(compile_topic(topic, index, bot_id, &mut ctx)?);
        }

        ensure_unique_schema_names(&components)?;

        let document = TargetDocument {
            kind: BOT_DEFINITION_KIND.to_string(),
            environment_id: self.options.environment_id.clone(),
            entity,
            components,
        };

        if self.options.check_references {
            check_document(&document, &mut diagnostics);
        }

        info!(
            agent = %name,
            components = document.components.len(),
            topics = spec.topics().count(),
            diagnostics = diagnostics.len(),
            cloud = %cloud.cloud_name,
            "compiled agent spec"
        );

        Ok(Compilation { document, diagnostics, cloud })
    }

    fn resolve_cloud(&self, spec: &AgentSpec, diagnostics: &mut Diagnostics) -> CloudSettings {
        let tag = spec.cloud().unwrap_or(&self.options.cloud);
        try_cloud_settings(tag).unwrap_or_else(|| {
            warn!(cloud = %tag, "unknown cloud, using commercial");
            diagnostics.warn(
                codes::UNKNOWN_CLOUD,
                "metadata.cloud",
                format!("unknown cloud '{tag}' mapped to the commercial cloud"),
            );
            cloud_settings_of(tag)
        })
    }
}

/// The prefix is spliced into every schema name unsanitized, so it must
/// already be a valid identifier fragment.
pub fn validate_prefix(prefix: &str) -> ForgeResult<()> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ForgeError::ConfigError {
            reason: format!("prefix '{prefix}' must be non-empty and ASCII alphanumeric"),
        });
    }
    Ok(())
}

fn resolve_language(spec: &AgentSpec, diagnostics: &mut Diagnostics) -> u32 {
    let Some(tag) = spec.language() else {
        return DEFAULT_LCID;
    };
    try_locale_code(tag).unwrap_or_else(|| {
        warn!(language = %tag, "unknown locale, using en-US");
        diagnostics.warn(
            codes::UNKNOWN_LOCALE,
            "metadata.language",
            format!("unknown locale '{tag}' mapped to LCID {DEFAULT_LCID}"),
        );
        DEFAULT_LCID
    })
}

fn generative_actions_enabled(spec: &AgentSpec) -> bool {
    spec.capabilities
        .as_ref()
        .map_or(true, |caps| caps.iter().any(|c| c == GENERATIVE_ACTIONS))
}

fn bot_entity(
    spec: &AgentSpec,
    name: &str,
    prefix: &str,
    bot_id: Uuid,
    component_id: Uuid,
    language: u32,
) -> BotEntity {
    BotEntity {
        managed_properties: ManagedProperties { is_customizable: false },
        display_name: name.to_string(),
        schema_name: bot_schema_name(prefix, name),
        component_id_unique: component_id,
        cds_bot_id: bot_id,
        access_control_policy: "ChatbotReaders".to_string(),
        authentication_mode: spec
            .authentication_mode()
            .unwrap_or(DEFAULT_AUTHENTICATION_MODE)
            .to_string(),
        authentication_trigger: "Always".to_string(),
        configuration: BotConfiguration {
            settings: BotSettings {
                generative_actions_enabled: generative_actions_enabled(spec),
            },
            bot_speech_settings: BotSpeechSettings { is_domain_language_model_enabled: false },
        },
        synchronization_status: SynchronizationStatus {
            content_version: 1,
            current_synchronization_state: SynchronizationState {
                provisioning_status: "NotProvisioned".to_string(),
                state: "NotStarted".to_string(),
            },
        },
        template: "default-2.1.0".to_string(),
        language,
        runtime_provider: "PowerVirtualAgents".to_string(),
        state: ACTIVE.to_string(),
        status: 1,
    }
}

fn instructions_component(
    name: &str,
    prefix: &str,
    instructions: &str,
    bot_id: Uuid,
) -> ForgeResult<Component> {
    let metadata = GptComponentMetadata {
        kind: GPT_COMPONENT_KIND.to_string(),
        instructions: instructions.to_string(),
        gpt_capabilities: Map::new(),
    };
    let data = serde_yaml::to_string(&metadata)
        .map_err(|e| ForgeError::Serialization { reason: e.to_string() })?;

    Ok(Component::Instructions(InstructionsComponent {
        managed_properties: ManagedProperties { is_customizable: false },
        display_name: name.to_string(),
        parent_bot_id: bot_id,
        share_context: Map::new(),
        state: ACTIVE.to_string(),
        status: ACTIVE.to_string(),
        component_type_int: INSTRUCTIONS_COMPONENT_TYPE,
        schema_name: instructions_schema_name(prefix, name),
        data,
    }))
}

/// Reject the document if any two components share a schema name.
fn ensure_unique_schema_names(components: &[Component]) -> ForgeResult<()> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(components.len());
    for component in components {
        if let Some(first) = seen.insert(component.schema_name(), component.display_name()) {
            return Err(ForgeError::DuplicateSchemaName {
                schema_name: component.schema_name().to_string(),
                first: first.to_string(),
                second: component.display_name().to_string(),
            });
        }
    }
    Ok(())
}
