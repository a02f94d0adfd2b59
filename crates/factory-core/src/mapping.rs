//! Lookup tables from spec-level tags to target-schema values.
//!
//! Each table has a total function that falls back to a documented default
//! and a `try_` variant that returns `None` for unrecognized input, which the
//! compiler uses to report the fallback as a diagnostic.

use factory_contracts::{options::CloudSettings, template::EntityKind};

/// LCID for en-US, used for unrecognized or absent locale tags.
pub const DEFAULT_LCID: u32 = 1033;

const ENTITY_TYPES: &[(&str, EntityKind)] = &[
    ("boolean", EntityKind::BooleanPrebuiltEntity),
    ("number", EntityKind::NumberPrebuiltEntity),
    ("date", EntityKind::DateTimePrebuiltEntity),
    ("email", EntityKind::EmailPrebuiltEntity),
    ("phone", EntityKind::PhoneNumberPrebuiltEntity),
    ("string", EntityKind::StringPrebuiltEntity),
    ("choice", EntityKind::ClosedListEntity),
];

const LOCALES: &[(&str, u32)] = &[
    ("en-US", 1033),
    ("en-GB", 2057),
    ("es-ES", 3082),
    ("fr-FR", 1036),
    ("de-DE", 1031),
    ("ja-JP", 1041),
    ("zh-CN", 2052),
];

// (tag, cloud name, API endpoint). The first entry is the default.
const CLOUDS: &[(&str, &str, &str)] = &[
    ("commercial", "Public", "https://api.powerplatform.com"),
    ("gcc", "USGov", "https://api.gov.powerplatform.microsoft.us"),
    ("gcch", "USGovHigh", "https://api.high.powerplatform.microsoft.us"),
    ("dod", "USGovDoD", "https://api.appsplatform.us"),
];

pub fn try_entity_type(domain_type: &str) -> Option<EntityKind> {
    ENTITY_TYPES
        .iter()
        .find(|(tag, _)| *tag == domain_type)
        .map(|(_, kind)| *kind)
}

/// Map a question's answer type; unknown types expect a plain string.
pub fn entity_type_of(domain_type: &str) -> EntityKind {
    try_entity_type(domain_type).unwrap_or_default()
}

pub fn try_locale_code(language_tag: &str) -> Option<u32> {
    LOCALES
        .iter()
        .find(|(tag, _)| *tag == language_tag)
        .map(|(_, lcid)| *lcid)
}

/// Map a locale tag to its Windows LCID, defaulting to en-US.
pub fn locale_code_of(language_tag: &str) -> u32 {
    try_locale_code(language_tag).unwrap_or(DEFAULT_LCID)
}

pub fn try_cloud_settings(cloud_tag: &str) -> Option<CloudSettings> {
    CLOUDS
        .iter()
        .find(|(tag, _, _)| *tag == cloud_tag)
        .map(|(_, name, endpoint)| CloudSettings {
            cloud_name: name.to_string(),
            api_endpoint: endpoint.to_string(),
        })
}

/// Map a cloud tag to its settings, defaulting to the commercial cloud.
pub fn cloud_settings_of(cloud_tag: &str) -> CloudSettings {
    let (_, name, endpoint) = CLOUDS[0];
    try_cloud_settings(cloud_tag).unwrap_or_else(|| CloudSettings {
        cloud_name: name.to_string(),
        api_endpoint: endpoint.to_string(),
    })
}
