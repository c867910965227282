use serde::Serialize;
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;
use crate::state::{StateEntry, StateFile};

#[derive(Serialize)]
struct Named<'a> {
    name: &'a str,
    #[serde(flatten)]
    entry: &'a StateEntry,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
}

pub fn handle(name: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    let state = StateFile::load(&global.state)?;

    let rendered = match name {
        Some(name) => render_entry(global.output, name, state.get(name)?)?,
        None if state.resources.is_empty() => match global.output {
            OutputFormat::Table => "No resources in state".to_owned(),
            format => output::render_list(format, &[] as &[Named<'_>], row)?,
        },
        None => {
            let items: Vec<Named<'_>> = state
                .resources
                .iter()
                .map(|(name, entry)| Named { name, entry })
                .collect();
            output::render_list(global.output, &items, row)?
        }
    };
    output::print_output(&rendered);
    Ok(())
}

fn row(item: &Named<'_>) -> EntryRow {
    EntryRow {
        name: item.name.to_owned(),
        kind: item.entry.kind.to_string(),
        id: item.entry.id.clone().unwrap_or_else(|| "-".into()),
    }
}

/// One entry: a short header plus its attributes in table mode.
pub fn render_entry(
    format: OutputFormat,
    name: &str,
    entry: &StateEntry,
) -> Result<String, CliError> {
    output::render_single(format, &Named { name, entry }, |item| {
        let id = item.entry.id.as_deref().unwrap_or("(not created)");
        Ok(format!(
            "Name:  {}\nKind:  {}\nID:    {id}\n\n{}",
            item.name,
            item.entry.kind,
            serde_json::to_string_pretty(&item.entry.attributes)?
        ))
    })
}
