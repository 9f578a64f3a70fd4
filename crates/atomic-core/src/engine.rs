//! The rule engine.
//!
//! Owns the build table and expands each catalog definition into it,
//! consulting the configuration for gates, custom entries and override
//! groups. Construction runs the whole catalog, so a successfully built
//! engine always holds a complete build.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, instrument, trace};

use crate::config::Config;
use crate::format::ValueFormat;
use crate::label::{SchemeRegistry, MAX_GROUPS};
use crate::model::{Build, Catalog, ConfigGroup, Declarations, Definition, PatternRule};
use crate::BuildError;

/// Read view of the build returned by [`Engine::build_view`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildView<'a> {
    Plain(&'a Build),
    /// The whole build nested one level under the namespace selector.
    Namespaced { namespace: &'a str, build: &'a Build },
}

impl<'a> BuildView<'a> {
    pub fn build(&self) -> &'a Build {
        match self {
            BuildView::Plain(build) => build,
            BuildView::Namespaced { build, .. } => build,
        }
    }

    pub fn namespace(&self) -> Option<&'a str> {
        match self {
            BuildView::Plain(_) => None,
            BuildView::Namespaced { namespace, .. } => Some(namespace),
        }
    }
}

impl Serialize for BuildView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BuildView::Plain(build) => build.serialize(serializer),
            BuildView::Namespaced { namespace, build } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(namespace, build)?;
                map.end()
            }
        }
    }
}

/// Expands a catalog into a build table.
#[derive(Debug, Default)]
pub struct Engine {
    catalog: Arc<Catalog>,
    config: Option<Config>,
    schemes: SchemeRegistry,
    build: Build,
}

impl Engine {
    /// Load `catalog` and `config` and run the full expansion.
    pub fn new(catalog: Catalog, config: Config) -> Result<Self, BuildError> {
        Self::with_schemes(catalog, config, SchemeRegistry::default())
    }

    /// Like [`Engine::new`], resolving `suffixType` against `schemes`.
    pub fn with_schemes(
        catalog: Catalog,
        config: Config,
        schemes: SchemeRegistry,
    ) -> Result<Self, BuildError> {
        if catalog.is_empty() {
            return Err(BuildError::invalid("catalog is empty"));
        }
        if config.is_empty() {
            return Err(BuildError::invalid("config is empty"));
        }

        let mut engine = Engine {
            catalog: Arc::new(catalog),
            config: Some(config),
            schemes,
            build: Build::new(),
        };
        engine.run()?;
        Ok(engine)
    }

    /// An engine with no catalog and no configuration.
    ///
    /// Gated operations and [`Engine::build_view`] fail until a configuration
    /// is present; custom-pattern expansion works, as it is ungated.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// An engine with a configuration but no catalog, for targeted injection.
    pub fn with_config(config: Config) -> Self {
        Engine {
            config: Some(config),
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// The raw build table, never namespaced.
    pub fn build(&self) -> &Build {
        &self.build
    }

    /// Empty the build table.
    pub fn flush(&mut self) {
        self.build.clear();
    }

    /// The finished build, wrapped under the configured namespace if any.
    pub fn build_view(&self) -> Result<BuildView<'_>, BuildError> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| BuildError::type_error("config has not been loaded"))?;
        Ok(match config.namespace() {
            Some(namespace) => BuildView::Namespaced {
                namespace,
                build: &self.build,
            },
            None => BuildView::Plain(&self.build),
        })
    }

    /// Run every catalog definition through its expansion, in order.
    #[instrument(skip(self), fields(definitions = self.catalog.len()))]
    pub fn run(&mut self) -> Result<(), BuildError> {
        let catalog = Arc::clone(&self.catalog);
        for definition in catalog.iter() {
            debug!(id = definition.id(), kind = %definition.kind(), "expanding definition");
            match definition {
                Definition::Rule(def) => {
                    self.add_rule(&def.rule, &def.id)?;
                }
                Definition::Pattern(def) => {
                    self.add_pattern_rules(&def.rules, &def.id, &def.properties, &def.prefix, false)?;

                    let custom = self
                        .config
                        .as_ref()
                        .and_then(|c| c.entry(&def.id))
                        .and_then(|entry| entry.custom())
                        .map(<[PatternRule]>::to_vec);
                    if let Some(custom) = custom {
                        if !def.allow_custom {
                            return Err(BuildError::invalid(format!(
                                "custom not permitted for `{}`",
                                def.id
                            )));
                        }
                        self.add_pattern_rules(&custom, &def.id, &def.properties, &def.prefix, true)?;
                    }
                }
                Definition::CustomPattern(def) => {
                    let groups = self
                        .config
                        .as_ref()
                        .and_then(|c| c.entry(&def.id))
                        .map(|entry| entry.groups().to_vec())
                        .unwrap_or_default();
                    self.add_custom_pattern_rules(
                        &groups,
                        &def.rules,
                        &def.id,
                        &def.prefix,
                        &def.suffix_type,
                        &def.format,
                    )?;
                }
            }
        }
        debug!(selectors = self.build.len(), "build finished");
        Ok(())
    }

    /// Expand pattern rules into `prefix + suffix` selectors.
    ///
    /// Unless `is_custom`, a rule is only materialized when the configuration
    /// enables `id`'s `suffix`. Returns whether anything was written.
    pub fn add_pattern_rules(
        &mut self,
        rules: &[PatternRule],
        id: &str,
        properties: &[String],
        prefix: &str,
        is_custom: bool,
    ) -> Result<bool, BuildError> {
        if rules.is_empty() {
            return Ok(false);
        }

        let entry = if is_custom {
            None
        } else {
            let config = self
                .config
                .as_ref()
                .ok_or_else(|| BuildError::type_error("config has not been loaded"))?;
            Some(config.entry(id).ok_or_else(|| {
                BuildError::type_error(format!("config has no entry for `{id}`"))
            })?)
        };

        let mut accepted = Vec::new();
        for rule in rules {
            if rule.values.len() != properties.len() {
                return Err(BuildError::invalid(format!(
                    "`{id}`: rule `{}` has {} values for {} properties",
                    rule.suffix,
                    rule.values.len(),
                    properties.len()
                )));
            }
            if entry.is_some_and(|entry| !entry.suffix_on(&rule.suffix)) {
                continue;
            }
            let declarations: Declarations = properties
                .iter()
                .cloned()
                .zip(rule.values.iter().cloned())
                .collect();
            accepted.push((format!("{prefix}{}", rule.suffix), declarations));
        }

        let added = !accepted.is_empty();
        for (selector, declarations) in accepted {
            trace!(%selector, "pattern rule");
            self.build.insert(selector, declarations);
        }
        Ok(added)
    }

    /// Expand `rules` once per config group into
    /// `prefix + suffix + "--" + label` selectors.
    ///
    /// Each rule's `values` name the properties; the group's entry under the
    /// rule's suffix supplies their values. Every override value is split on
    /// whitespace and token `i` must satisfy `format[i]`.
    pub fn add_custom_pattern_rules(
        &mut self,
        config_group: &[ConfigGroup],
        rules: &[PatternRule],
        id: &str,
        prefix: &str,
        suffix_type: &str,
        format: &[ValueFormat],
    ) -> Result<bool, BuildError> {
        if config_group.is_empty() || rules.is_empty() {
            return Ok(false);
        }
        if config_group.len() > MAX_GROUPS {
            return Err(BuildError::Range(format!(
                "`{id}`: {} groups given, at most {MAX_GROUPS} allowed",
                config_group.len()
            )));
        }
        let scheme = self.schemes.get(suffix_type).ok_or_else(|| {
            BuildError::type_error(format!("`{id}`: unknown suffixType `{suffix_type}`"))
        })?;
        if config_group.len() > scheme.capacity() {
            return Err(BuildError::Range(format!(
                "`{id}`: {} groups given, `{suffix_type}` labels at most {}",
                config_group.len(),
                scheme.capacity()
            )));
        }

        let mut accepted = Vec::with_capacity(config_group.len() * rules.len());
        for (index, group) in config_group.iter().enumerate() {
            let label = scheme.label(index).ok_or_else(|| {
                BuildError::Range(format!("`{id}`: no `{suffix_type}` label for group {index}"))
            })?;
            for rule in rules {
                let overrides = group.get(&rule.suffix).ok_or_else(|| {
                    BuildError::invalid(format!(
                        "`{id}`: group {index} has no values for `{}`",
                        rule.suffix
                    ))
                })?;
                if overrides.len() != rule.values.len() {
                    return Err(BuildError::invalid(format!(
                        "`{id}`: group {index} has {} values for `{}`, expected {}",
                        overrides.len(),
                        rule.suffix,
                        rule.values.len()
                    )));
                }
                for value in overrides {
                    check_format(id, index, &rule.suffix, value, format)?;
                }

                let declarations: Declarations = rule
                    .values
                    .iter()
                    .cloned()
                    .zip(overrides.iter().cloned())
                    .collect();
                accepted.push((format!("{prefix}{}--{label}", rule.suffix), declarations));
            }
        }

        let added = !accepted.is_empty();
        for (selector, declarations) in accepted {
            trace!(%selector, "custom pattern rule");
            self.build.insert(selector, declarations);
        }
        Ok(added)
    }

    /// Merge a literal rule block, gated by the configuration's `id` toggle.
    pub fn add_rule(&mut self, rule: &Build, id: &str) -> Result<bool, BuildError> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| BuildError::type_error("config has not been loaded"))?;
        let entry = config
            .entry(id)
            .ok_or_else(|| BuildError::type_error(format!("config has no entry for `{id}`")))?;
        if !entry.is_on() {
            return Ok(false);
        }

        for (selector, declarations) in rule {
            trace!(%selector, "rule");
            self.build.insert(selector.clone(), declarations.clone());
        }
        Ok(true)
    }
}

fn check_format(
    id: &str,
    group: usize,
    suffix: &str,
    value: &str,
    format: &[ValueFormat],
) -> Result<(), BuildError> {
    let tokens: Vec<&str> = value.split_ascii_whitespace().collect();
    if tokens.len() != format.len() {
        return Err(BuildError::invalid(format!(
            "`{id}`: group {group} value `{value}` for `{suffix}` has {} parts, format expects {}",
            tokens.len(),
            format.len()
        )));
    }
    for (position, (token, expected)) in tokens.iter().zip(format).enumerate() {
        if !expected.matches(token) {
            return Err(BuildError::invalid(format!(
                "`{id}`: group {group} value `{value}` for `{suffix}`: `{token}` at position {position} is not a valid {}",
                expected.name()
            )));
        }
    }
    Ok(())
}
