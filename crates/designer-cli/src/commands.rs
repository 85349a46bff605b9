use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, warn};

use designer_model::{Domain, FieldConfig, PropertyType, Severity, route_exception};
use designer_wire::{create_domain, create_exception};

use crate::cli::{
    AddFieldArgs, AttributeArgs, DomainArgs, RemoveFieldArgs, ReorderArgs, SetTypeArgs, TypesArgs,
};
use crate::settings::DesignerSettings;

/// What a command produced, for [`crate::summary::print_outcome`].
#[derive(Debug)]
pub enum CommandOutcome {
    /// Domain to describe as a table.
    Inspected(Domain),
    /// Domain after validation; its exception holds the findings.
    Validated(Domain),
    /// Types offered for one field.
    Types {
        domain: Domain,
        field: usize,
        types: Vec<PropertyType>,
    },
    /// Edited domain to print as service JSON.
    Edited(Domain),
    /// Domains after a server exception was attached to one of them.
    Attributed(Vec<Domain>),
}

impl CommandOutcome {
    /// Whether the command found blocking errors.
    pub fn has_errors(&self) -> bool {
        match self {
            CommandOutcome::Validated(domain) => domain.error_count() > 0,
            CommandOutcome::Attributed(domains) => domains.iter().any(|domain| {
                domain
                    .exception
                    .as_ref()
                    .is_some_and(|exception| exception.has_errors())
            }),
            _ => false,
        }
    }
}

pub fn run_inspect(args: &DomainArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domain = load_domain(&args.file, settings)?;
    Ok(CommandOutcome::Inspected(domain))
}

pub fn run_validate(args: &DomainArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domain = load_domain(&args.file, settings)?
        .validate()
        .check_field_names();
    info!(
        domain = %domain.name,
        errors = domain.error_count(),
        warnings = domain.warning_count(),
        "validation complete"
    );
    Ok(CommandOutcome::Validated(domain))
}

pub fn run_types(args: &TypesArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domain = load_domain(&args.file, settings)?;
    let options = settings.type_options(args.app_only, args.hide_file);
    let types = domain.field_type_options(args.field, options)?;
    Ok(CommandOutcome::Types {
        domain,
        field: args.field,
        types,
    })
}

pub fn run_reorder(args: &ReorderArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domain = ensure_editable(load_domain(&args.file, settings)?, settings)?;
    let reordered = domain.reorder(args.from, args.to, args.expanded)?;
    if let Some(expanded) = reordered.expanded {
        info!(expanded, "expanded row after move");
    }
    Ok(CommandOutcome::Edited(reordered.domain))
}

pub fn run_add_field(args: &AddFieldArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domain = ensure_editable(load_domain(&args.file, settings)?, settings)?;
    let mut config = FieldConfig::named(args.name.as_str());
    if let Some(name) = &args.data_type {
        config.data_type = Some(parse_creatable_type(name)?);
    }
    if domain.field_index(&args.name).is_some() {
        warn!(field = %args.name, "domain already has a field with this name");
    }
    Ok(CommandOutcome::Edited(domain.add_field(Some(config))))
}

pub fn run_remove_field(
    args: &RemoveFieldArgs,
    settings: &DesignerSettings,
) -> Result<CommandOutcome> {
    let domain = ensure_editable(load_domain(&args.file, settings)?, settings)?;
    let field = domain.field(args.index)?;
    if !field.can_remove() {
        bail!(
            "field '{}' is {} and cannot be removed",
            field.name,
            field.lock_type
        );
    }
    Ok(CommandOutcome::Edited(domain.remove_field(args.index)?))
}

pub fn run_set_type(args: &SetTypeArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domain = ensure_editable(load_domain(&args.file, settings)?, settings)?;
    let data_type = parse_creatable_type(&args.data_type)?;
    let options = settings.type_options(args.app_only, false);
    Ok(CommandOutcome::Edited(domain.change_field_type(
        args.field, data_type, options,
    )?))
}

pub fn run_attribute(args: &AttributeArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    let domains = match read_json(&args.domain_file)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| domain_from_value(item, settings))
            .collect::<Result<Vec<_>>>()?,
        single => vec![domain_from_value(single, settings)?],
    };
    let exception = create_exception(read_json(&args.exception_file)?, Severity::Error)
        .context("decode server exception")?;
    Ok(CommandOutcome::Attributed(route_exception(
        &domains, &exception,
    )))
}

pub fn run_normalize(args: &DomainArgs, settings: &DesignerSettings) -> Result<CommandOutcome> {
    Ok(CommandOutcome::Edited(load_domain(&args.file, settings)?))
}

/// Read a domain file through the wire codec, adding the configured
/// mandatory field names.
pub fn load_domain(path: &Path, settings: &DesignerSettings) -> Result<Domain> {
    let value = read_json(path)?;
    domain_from_value(value, settings).with_context(|| format!("load domain {}", path.display()))
}

fn domain_from_value(mut value: Value, settings: &DesignerSettings) -> Result<Domain> {
    if !settings.mandatory_field_names.is_empty()
        && let Some(object) = value.as_object_mut()
    {
        let entry = object
            .entry("mandatoryFieldNames")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Some(names) = entry.as_array_mut() {
            names.extend(
                settings
                    .mandatory_field_names
                    .iter()
                    .cloned()
                    .map(Value::String),
            );
        }
    }
    Ok(create_domain(value)?)
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("parse JSON {}", path.display()))?;
    info!(path = %path.display(), "read input");
    Ok(value)
}

fn parse_creatable_type(name: &str) -> Result<PropertyType> {
    let Some(data_type) = PropertyType::from_name(name) else {
        bail!("unknown type '{name}'");
    };
    if !data_type.is_creatable() {
        bail!("type '{}' cannot be chosen for a field", data_type.name());
    }
    Ok(data_type)
}

fn ensure_editable(domain: Domain, settings: &DesignerSettings) -> Result<Domain> {
    if let Some(current) = settings.current_container.as_deref()
        && domain.is_shared(current)
    {
        bail!(
            "domain '{}' is defined in {} and is read-only from {current}",
            domain.name,
            domain.container.as_deref().unwrap_or_default()
        );
    }
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_creatable_types_parse() {
        assert_eq!(parse_creatable_type("int").unwrap(), PropertyType::Integer);
        assert_eq!(parse_creatable_type("MULTILINE").unwrap(), PropertyType::Multiline);
        assert!(parse_creatable_type("date").is_err());
        assert!(parse_creatable_type("blob").is_err());
    }

    #[test]
    fn settings_add_mandatory_names() {
        let settings = DesignerSettings {
            mandatory_field_names: vec!["Visit".to_string()],
            ..DesignerSettings::default()
        };
        let domain = domain_from_value(
            serde_json::json!({"name": "d", "fields": [{"name": "visit"}, {"name": "other"}]}),
            &settings,
        )
        .unwrap();
        assert!(domain.fields[0].is_partially_locked());
        assert!(!domain.fields[1].is_partially_locked());
    }

    #[test]
    fn shared_domains_are_read_only() {
        let settings = DesignerSettings {
            current_container: Some("/home".to_string()),
            ..DesignerSettings::default()
        };
        let shared = domain_from_value(
            serde_json::json!({"name": "d", "container": "/shared"}),
            &settings,
        )
        .unwrap();
        assert!(ensure_editable(shared, &settings).is_err());
        let local = domain_from_value(
            serde_json::json!({"name": "d", "container": "/home"}),
            &settings,
        )
        .unwrap();
        assert!(ensure_editable(local, &settings).is_ok());
    }
}
