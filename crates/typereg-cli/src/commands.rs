//! Command execution against the local store.

use std::path::Path;

use tracing::{info, warn};
use typereg_core::{
    BatchOutcome, EnumDef, EnumTypeStore, SearchFilter, SledTypeVertexStore, StoreConfig,
};

use crate::formatter::Formatter;
use crate::Command;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Execute one command and return the formatted output.
pub fn execute(config: &StoreConfig, command: Command, formatter: &dyn Formatter) -> CliResult<String> {
    let vertices = SledTypeVertexStore::open(config)?;
    let store = EnumTypeStore::new(&vertices);

    let output = match command {
        Command::Create { file } => {
            let defs = read_definitions(&file)?;
            info!(count = defs.len(), file = %file.display(), "Creating enum definitions");
            let outcome = store.create_all(defs);
            vertices.flush()?;
            report_batch("created", outcome, formatter)?
        }
        Command::Update { file } => {
            let defs = read_definitions(&file)?;
            info!(count = defs.len(), file = %file.display(), "Updating enum definitions");
            let outcome = store.update_all(defs);
            vertices.flush()?;
            report_batch("updated", outcome, formatter)?
        }
        Command::Get { name, guid } => {
            let def = match (name, guid) {
                (Some(name), _) => store.get_by_name(&name)?,
                (None, Some(guid)) => store.get_by_guid(&guid)?,
                (None, None) => return Err("either --name or --guid is required".into()),
            };
            formatter.format_enum_def(&def)
        }
        Command::List => formatter.format_enum_defs(&store.get_all()?),
        Command::Delete { name, guid } => {
            if name.is_empty() && guid.is_empty() {
                return Err("nothing to delete: pass --name or --guid".into());
            }
            let requested = name.len() + guid.len();
            let by_name = store.delete_by_names(name);
            let by_guid = store.delete_by_guids(guid);
            vertices.flush()?;

            let failed: Vec<String> = by_name
                .failed
                .iter()
                .chain(by_guid.failed.iter())
                .map(|(key, e)| format!("{}: {}", key, e))
                .collect();
            let deleted = by_name.success_count() + by_guid.success_count();
            finish_batch("deleted", deleted, requested, &failed, formatter)?
        }
        Command::Search {
            name,
            guid,
            not_name,
        } => {
            let mut filter = SearchFilter::new();
            for n in name {
                filter = filter.with_name(n);
            }
            for g in guid {
                filter = filter.with_guid(g);
            }
            for n in not_name {
                filter = filter.without_name(n);
            }
            formatter.format_enum_defs(&store.search_filter(&filter)?.list)
        }
    };

    Ok(output)
}

/// Read one definition or an array of definitions from a JSON file.
pub fn read_definitions(path: &Path) -> CliResult<Vec<EnumDef>> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let defs = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };

    Ok(defs)
}

fn report_batch(
    verb: &str,
    outcome: BatchOutcome<EnumDef, EnumDef>,
    formatter: &dyn Formatter,
) -> CliResult<String> {
    let requested = outcome.success_count() + outcome.failure_count();
    let failed: Vec<String> = outcome
        .failed
        .iter()
        .map(|(def, e)| format!("{}: {}", def.header.name, e))
        .collect();

    let mut output = formatter.format_enum_defs(&outcome.succeeded);
    let summary = finish_batch(verb, outcome.success_count(), requested, &failed, formatter)?;
    output.push('\n');
    output.push_str(&summary);
    Ok(output)
}

fn finish_batch(
    verb: &str,
    done: usize,
    requested: usize,
    failed: &[String],
    formatter: &dyn Formatter,
) -> CliResult<String> {
    for failure in failed {
        warn!("{}", failure);
        eprintln!("{}", formatter.format_error(failure));
    }

    if failed.is_empty() {
        Ok(formatter.format_message(&format!("{} {} of {} definition(s)", verb, done, requested)))
    } else {
        Err(format!(
            "{} {} of {} definition(s); {} failed",
            verb,
            done,
            requested,
            failed.len()
        )
        .into())
    }
}
