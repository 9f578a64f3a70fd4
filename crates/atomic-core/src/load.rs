//! Loader boundary: JSON documents → typed catalog and configuration.
//!
//! All shape checks happen here, once. A wrong JSON type is a
//! [`BuildError::Type`]; a missing required key, an unknown definition kind
//! or an empty document is a [`BuildError::Invalid`].

use serde_json::{Map, Value};

use crate::config::{Config, ConfigEntry, Settings, SETTINGS_KEY};
use crate::format::ValueFormat;
use crate::model::{
    Build, Catalog, ConfigGroup, CustomPatternDefinition, Declarations, Definition, Kind,
    PatternDefinition, PatternRule, RuleDefinition,
};
use crate::BuildError;

impl Catalog {
    /// Parse a catalog from JSON source.
    pub fn from_json(source: &str) -> Result<Catalog, BuildError> {
        Catalog::from_value(&parse_json(source, "catalog")?)
    }

    /// Convert a JSON value into a catalog.
    pub fn from_value(value: &Value) -> Result<Catalog, BuildError> {
        let items = match value {
            Value::Null => return Err(BuildError::invalid("catalog is required")),
            Value::Array(items) => items,
            other => {
                return Err(BuildError::type_error(format!(
                    "catalog must be an array, got {}",
                    type_name(other)
                )))
            }
        };
        if items.is_empty() {
            return Err(BuildError::invalid("catalog is empty"));
        }

        let definitions = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_definition(index, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Catalog::new(definitions))
    }
}

impl Config {
    /// Parse a configuration from JSON source.
    pub fn from_json(source: &str) -> Result<Config, BuildError> {
        Config::from_value(&parse_json(source, "config")?)
    }

    /// Convert a JSON value into a configuration.
    pub fn from_value(value: &Value) -> Result<Config, BuildError> {
        let object = match value {
            Value::Null => return Err(BuildError::invalid("config is required")),
            Value::Object(object) => object,
            other => {
                return Err(BuildError::type_error(format!(
                    "config must be an object, got {}",
                    type_name(other)
                )))
            }
        };
        if object.is_empty() {
            return Err(BuildError::invalid("config is empty"));
        }

        let mut config = Config::new();
        for (key, value) in object {
            if key == SETTINGS_KEY {
                config.settings = Some(parse_settings(value)?);
            } else {
                config.entries.insert(key.clone(), parse_entry(key, value)?);
            }
        }
        Ok(config)
    }
}

fn parse_json(source: &str, what: &str) -> Result<Value, BuildError> {
    serde_json::from_str(source)
        .map_err(|e| BuildError::invalid(format!("{what} is not valid JSON: {e}")))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =========================================================================
// Catalog
// =========================================================================

fn parse_definition(index: usize, value: &Value) -> Result<Definition, BuildError> {
    let Value::Object(obj) = value else {
        return Err(BuildError::type_error(format!(
            "catalog entry {index} must be an object, got {}",
            type_name(value)
        )));
    };

    let id = match obj.get("id") {
        Some(Value::String(id)) => id.clone(),
        _ => {
            return Err(BuildError::type_error(format!(
                "catalog entry {index}: `id` must be a string"
            )))
        }
    };
    let tag = match obj.get("type").or_else(|| obj.get("kind")) {
        Some(Value::String(tag)) => tag.as_str(),
        _ => {
            return Err(BuildError::type_error(format!(
                "`{id}`: `type` must be a string"
            )))
        }
    };
    let kind = Kind::parse(tag)
        .ok_or_else(|| BuildError::invalid(format!("`{id}`: unknown definition type `{tag}`")))?;
    let name = optional_string(obj, "name", &id)?;

    match kind {
        Kind::Rule => {
            let rule = match obj.get("rule") {
                Some(Value::Object(rule)) => parse_build(rule, &id)?,
                _ => {
                    return Err(BuildError::type_error(format!(
                        "`{id}`: `rule` must be an object"
                    )))
                }
            };
            Ok(Definition::Rule(RuleDefinition { id, name, rule }))
        }
        Kind::Pattern => {
            let properties = match obj.get("properties") {
                Some(value @ Value::Array(_)) => string_list(value, &id, "properties")?,
                _ => {
                    return Err(BuildError::type_error(format!(
                        "`{id}`: `properties` must be an array"
                    )))
                }
            };
            let prefix = required_string(obj, "prefix", &id)?;
            let rules = optional_rules(obj, &id)?;
            let allow_custom = match obj.get("allowCustom") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(b)) => *b,
                Some(_) => {
                    return Err(BuildError::type_error(format!(
                        "`{id}`: `allowCustom` must be a boolean"
                    )))
                }
            };
            Ok(Definition::Pattern(PatternDefinition {
                id,
                name,
                prefix,
                properties,
                rules,
                allow_custom,
            }))
        }
        Kind::CustomPattern => {
            let prefix = required_string(obj, "prefix", &id)?;
            let suffix_type = required_string(obj, "suffixType", &id)?;
            let format = match obj.get("format") {
                Some(value @ Value::Array(_)) => string_list(value, &id, "format")?
                    .iter()
                    .map(|name| {
                        ValueFormat::from_name(name).ok_or_else(|| {
                            BuildError::type_error(format!("`{id}`: unknown format `{name}`"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                _ => {
                    return Err(BuildError::type_error(format!(
                        "`{id}`: `format` must be an array"
                    )))
                }
            };
            let rules = optional_rules(obj, &id)?;
            Ok(Definition::CustomPattern(CustomPatternDefinition {
                id,
                name,
                prefix,
                suffix_type,
                format,
                rules,
            }))
        }
    }
}

fn required_string(obj: &Map<String, Value>, key: &str, id: &str) -> Result<String, BuildError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(BuildError::type_error(format!(
            "`{id}`: `{key}` must be a string"
        ))),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    key: &str,
    id: &str,
) -> Result<Option<String>, BuildError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(BuildError::type_error(format!(
            "`{id}`: `{key}` must be a string"
        ))),
    }
}

fn string_list(value: &Value, id: &str, what: &str) -> Result<Vec<String>, BuildError> {
    let Value::Array(items) = value else {
        return Err(BuildError::type_error(format!(
            "`{id}`: `{what}` must be an array"
        )));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(BuildError::type_error(format!(
                "`{id}`: `{what}` must only contain strings, found {}",
                type_name(other)
            ))),
        })
        .collect()
}

fn optional_rules(obj: &Map<String, Value>, id: &str) -> Result<Vec<PatternRule>, BuildError> {
    match obj.get("rules") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => parse_rules(value, id, "rules"),
    }
}

fn parse_rules(value: &Value, id: &str, what: &str) -> Result<Vec<PatternRule>, BuildError> {
    let Value::Array(items) = value else {
        return Err(BuildError::type_error(format!(
            "`{id}`: `{what}` must be an array"
        )));
    };
    items.iter().map(|item| parse_rule(item, id)).collect()
}

fn parse_rule(value: &Value, id: &str) -> Result<PatternRule, BuildError> {
    let Value::Object(obj) = value else {
        return Err(BuildError::type_error(format!(
            "`{id}`: rule entries must be objects"
        )));
    };
    let (Some(suffix), Some(values)) = (obj.get("suffix"), obj.get("values")) else {
        return Err(BuildError::invalid(format!(
            "`{id}`: rule entries need both `suffix` and `values`"
        )));
    };
    let Value::String(suffix) = suffix else {
        return Err(BuildError::type_error(format!(
            "`{id}`: rule `suffix` must be a string"
        )));
    };
    let values = string_list(values, id, "values")?;
    Ok(PatternRule {
        suffix: suffix.clone(),
        values,
    })
}

fn parse_build(obj: &Map<String, Value>, id: &str) -> Result<Build, BuildError> {
    let mut build = Build::new();
    for (selector, block) in obj {
        let Value::Object(block) = block else {
            return Err(BuildError::type_error(format!(
                "`{id}`: block for `{selector}` must be an object"
            )));
        };
        let mut declarations = Declarations::new();
        for (property, value) in block {
            let Value::String(value) = value else {
                return Err(BuildError::type_error(format!(
                    "`{id}`: `{selector}` value for `{property}` must be a string"
                )));
            };
            declarations.insert(property.clone(), value.clone());
        }
        build.insert(selector.clone(), declarations);
    }
    Ok(build)
}

// =========================================================================
// Config
// =========================================================================

fn parse_settings(value: &Value) -> Result<Settings, BuildError> {
    if !value.is_object() {
        return Err(BuildError::type_error(format!(
            "`{SETTINGS_KEY}` must be an object, got {}",
            type_name(value)
        )));
    }
    serde_json::from_value(value.clone())
        .map_err(|e| BuildError::type_error(format!("`{SETTINGS_KEY}`: {e}")))
}

fn parse_entry(id: &str, value: &Value) -> Result<ConfigEntry, BuildError> {
    match value {
        Value::Bool(on) => Ok(ConfigEntry::Toggle(*on)),
        Value::Object(obj) => {
            let mut enabled = std::collections::BTreeMap::new();
            let mut custom = None;
            for (key, value) in obj {
                if key == "custom" {
                    custom = Some(parse_rules(value, id, "custom")?);
                    continue;
                }
                let Value::Bool(on) = value else {
                    return Err(BuildError::type_error(format!(
                        "config `{id}`: `{key}` must be a boolean"
                    )));
                };
                enabled.insert(key.clone(), *on);
            }
            Ok(ConfigEntry::Suffixes { enabled, custom })
        }
        Value::Array(items) => items
            .iter()
            .map(|item| parse_group(id, item))
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigEntry::Groups),
        other => Err(BuildError::type_error(format!(
            "config `{id}` must be a boolean, an object or an array, got {}",
            type_name(other)
        ))),
    }
}

fn parse_group(id: &str, value: &Value) -> Result<ConfigGroup, BuildError> {
    let Value::Object(obj) = value else {
        return Err(BuildError::type_error(format!(
            "config `{id}`: groups must be objects, got {}",
            type_name(value)
        )));
    };
    obj.iter()
        .map(|(suffix, values)| Ok((suffix.clone(), string_list(values, id, suffix)?)))
        .collect()
}
