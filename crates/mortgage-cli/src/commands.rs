//! Subcommand execution
//!
//! Every command except `fields` loads the list once before acting, the same
//! way the editor does at start-up. Mutations go through [`MortgageEditor`]
//! so validation, notification and the follow-up refresh behave exactly as
//! they do for any other front end.

use crate::render;
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use mortgage_core::{EditorError, MortgageEditor};
use mortgage_schema::RecordId;

/// Parsed subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Fields,
    List { json: bool },
    Create { assignments: Vec<(String, String)> },
    Update { id: RecordId, assignments: Vec<(String, String)> },
    Delete { id: RecordId },
}

impl Action {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Result<Self> {
        match matches.subcommand() {
            Some(("fields", _)) => Ok(Self::Fields),
            Some(("list", args)) => Ok(Self::List {
                json: args.get_flag("json"),
            }),
            Some(("create", args)) => Ok(Self::Create {
                assignments: assignments(args)?,
            }),
            Some(("update", args)) => Ok(Self::Update {
                id: record_id(args)?,
                assignments: assignments(args)?,
            }),
            Some(("delete", args)) => Ok(Self::Delete { id: record_id(args)? }),
            Some((other, _)) => bail!("unknown command '{other}'"),
            None => Ok(Self::List { json: false }),
        }
    }

    fn needs_list(&self) -> bool {
        !matches!(self, Self::Fields)
    }
}

fn record_id(args: &ArgMatches) -> Result<RecordId> {
    args.get_one::<u64>("id")
        .copied()
        .map(RecordId)
        .ok_or_else(|| anyhow!("missing record id"))
}

fn assignments(args: &ArgMatches) -> Result<Vec<(String, String)>> {
    args.get_many::<String>("set")
        .into_iter()
        .flatten()
        .map(|pair| parse_assignment(pair))
        .collect()
}

/// Split `FIELD=VALUE`; the value may be empty or contain `=`
pub(crate) fn parse_assignment(pair: &str) -> Result<(String, String)> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{pair}'"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("missing field name in '{pair}'");
    }
    Ok((name.to_string(), value.to_string()))
}

/// Run `action` and return what should be printed
pub(crate) async fn execute(editor: &MortgageEditor, action: Action) -> Result<String> {
    if action.needs_list() {
        editor
            .refresh()
            .await
            .map_err(|err| explain(editor, err))
            .context("loading the record list")?;
    }

    match action {
        Action::Fields => Ok(render::fields_table(editor.schema())),
        Action::List { json } => {
            let snapshot = editor.snapshot();
            if json {
                Ok(serde_json::to_string_pretty(&snapshot.records)?)
            } else {
                Ok(render::records_table(&snapshot, editor.schema()))
            }
        }
        Action::Create { assignments } => {
            for (name, value) in assignments {
                editor
                    .set_form_field(&name, value)
                    .map_err(|err| explain(editor, err))?;
            }
            editor
                .submit_create()
                .await
                .map_err(|err| explain(editor, err))?;
            Ok(render::records_table(&editor.snapshot(), editor.schema()))
        }
        Action::Update { id, assignments } => {
            editor.start_edit(id).map_err(|err| explain(editor, err))?;
            for (name, value) in assignments {
                editor
                    .set_edit_field(&name, value)
                    .map_err(|err| explain(editor, err))?;
            }
            editor
                .save_edit()
                .await
                .map_err(|err| explain(editor, err))?;
            Ok(render::records_table(&editor.snapshot(), editor.schema()))
        }
        Action::Delete { id } => {
            editor
                .delete_record(id)
                .await
                .map_err(|err| explain(editor, err))?;
            Ok(render::records_table(&editor.snapshot(), editor.schema()))
        }
    }
}

/// Attach the field error table to validation failures
fn explain(editor: &MortgageEditor, err: EditorError) -> anyhow::Error {
    match err.validation_errors() {
        Some(errors) => anyhow!("invalid input\n{}", render::errors_table(errors)),
        None if matches!(err, EditorError::UnknownRecord(_)) => {
            anyhow!("{err} ({} records loaded)", editor.records().len())
        }
        None => anyhow::Error::new(err),
    }
}
