//! `mortgage-editor` command-line front end

mod commands;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::Action;
use mortgage_core::{EditorConfig, LogFormat, MortgageEditor, Notification, Notifier};
use mortgage_http::HttpCollectionClient;
use mortgage_schema::FieldSchema;
use std::path::PathBuf;
use std::sync::Arc;

/// Prints notifications as they arrive
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = render::notification_line(&notification);
        if notification.is_failure() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

fn set_arg() -> Arg {
    Arg::new("set")
        .long("set")
        .short('s')
        .value_name("FIELD=VALUE")
        .action(ArgAction::Append)
        .help("Field value, repeatable")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(u64))
        .help("Record id")
}

fn build_cli() -> Command {
    Command::new("mortgage-editor")
        .version(mortgage_core::VERSION)
        .about("Create, edit and delete mortgage applications")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Collection API root, overrides config and MORTGAGE_API_URL"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .subcommand(Command::new("fields").about("Show the field schema"))
        .subcommand(
            Command::new("list").about("List all records").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("create")
                .about("Create a record from field values")
                .arg(set_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Change fields of an existing record")
                .arg(id_arg())
                .arg(set_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a record")
                .arg(id_arg()),
        )
}

fn load_config(matches: &ArgMatches) -> Result<EditorConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = EditorConfig::load(path.map(PathBuf::as_path))
        .with_context(|| match path {
            Some(path) => format!("loading config from {}", path.display()),
            None => "loading config".to_string(),
        })?;

    if let Some(url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(url.clone());
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        let format = if format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        config = config.with_log_format(format);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let config = load_config(&matches)?;
    logging::init(&config.log);
    tracing::debug!(?config, "configuration loaded");

    let action = Action::from_matches(&matches)?;
    let client = HttpCollectionClient::new(&config.remote)
        .with_context(|| format!("connecting to {}", config.remote.base_url))?;
    let editor = MortgageEditor::new(
        Arc::new(FieldSchema::mortgage()),
        Arc::new(client),
        Arc::new(ConsoleNotifier),
    );

    let output = commands::execute(&editor, action).await?;
    println!("{output}");
    Ok(())
}
