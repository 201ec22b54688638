use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use plant_client::{
    collect_directory, run_upload_session, FileEntry, PlantClient, PollPolicy, SessionOutcome,
};
use plant_core::{resolve, PlantKey, UploadDestination, UploadPhase, ViewProps};
use plant_logging::plant_info;
use serde_json::{json, Value};

pub(crate) const USAGE: &str = "\
usage: plant_app [--log-file] <command> [args...]

commands:
  plant_app upload <raw-files|result-files> <dir-or-file>...
  plant_app status
  plant_app analyze <species> <plant_id> <date>
  plant_app results <species> <plant_id> <date>
  plant_app timeline <species> <plant_id> [vegetation <index> | texture <band> <type>]
  plant_app data <species> <plant_id> <date>
  plant_app task <task_id>
  plant_app plants <species>
  plant_app route <location>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimelineSelector {
    All,
    Vegetation { index_type: String },
    Texture { band_name: String, texture_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Upload {
        destination: UploadDestination,
        paths: Vec<PathBuf>,
    },
    Status,
    Analyze {
        key: PlantKey,
        date: String,
    },
    Results {
        key: PlantKey,
        date: String,
    },
    Timeline {
        key: PlantKey,
        selector: TimelineSelector,
    },
    Data {
        key: PlantKey,
        date: String,
    },
    Task {
        task_id: String,
    },
    Plants {
        species: String,
    },
    Route {
        location: String,
    },
}

/// Parses arguments after the program name.
pub(crate) fn parse(args: &[String]) -> anyhow::Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        bail!("missing command");
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let command = match (name.as_str(), rest.as_slice()) {
        ("upload", [destination, paths @ ..]) if !paths.is_empty() => Command::Upload {
            destination: destination.parse()?,
            paths: paths.iter().map(PathBuf::from).collect(),
        },
        ("status", []) => Command::Status,
        ("analyze", [species, plant_id, date]) => Command::Analyze {
            key: PlantKey::new(*species, *plant_id)?,
            date: date.to_string(),
        },
        ("results", [species, plant_id, date]) => Command::Results {
            key: PlantKey::new(*species, *plant_id)?,
            date: date.to_string(),
        },
        ("timeline", [species, plant_id, selector @ ..]) => Command::Timeline {
            key: PlantKey::new(*species, *plant_id)?,
            selector: parse_selector(selector)?,
        },
        ("data", [species, plant_id, date]) => Command::Data {
            key: PlantKey::new(*species, *plant_id)?,
            date: date.to_string(),
        },
        ("task", [task_id]) => Command::Task {
            task_id: task_id.to_string(),
        },
        ("plants", [species]) => Command::Plants {
            species: species.to_string(),
        },
        ("route", [location]) => Command::Route {
            location: location.to_string(),
        },
        (other, _) => bail!("unrecognised arguments for `{other}`"),
    };
    Ok(command)
}

fn parse_selector(selector: &[&str]) -> anyhow::Result<TimelineSelector> {
    Ok(match selector {
        [] => TimelineSelector::All,
        ["vegetation", index_type] => TimelineSelector::Vegetation {
            index_type: index_type.to_string(),
        },
        ["texture", band_name, texture_type] => TimelineSelector::Texture {
            band_name: band_name.to_string(),
            texture_type: texture_type.to_string(),
        },
        _ => bail!("timeline selector must be `vegetation <index>` or `texture <band> <type>`"),
    })
}

/// Runs one command and returns the JSON to print.
pub(crate) async fn run(
    command: Command,
    client: &PlantClient,
    policy: &PollPolicy,
) -> anyhow::Result<Value> {
    let value = match command {
        Command::Upload { destination, paths } => {
            let files = gather_files(&paths)?;
            plant_info!("Collected {} file(s) for {}", files.len(), destination);
            let outcome = run_upload_session(client, files, destination, policy).await;
            upload_output(outcome)?
        }
        Command::Status => client.get_upload_status().await?,
        Command::Analyze { key, date } => serde_json::to_value(client.analyze_plant(&key, &date).await?)?,
        Command::Results { key, date } => client.get_plant_results(&key, &date).await?,
        Command::Timeline { key, selector } => match selector {
            TimelineSelector::All => serde_json::to_value(client.get_plant_timeline(&key).await?)?,
            TimelineSelector::Vegetation { index_type } => serde_json::to_value(
                client.get_vegetation_timeline(&key, &index_type).await?,
            )?,
            TimelineSelector::Texture {
                band_name,
                texture_type,
            } => serde_json::to_value(
                client
                    .get_texture_timeline(&key, &band_name, &texture_type)
                    .await?,
            )?,
        },
        Command::Data { key, date } => serde_json::to_value(client.get_database_data(&key, &date).await?)?,
        Command::Task { task_id } => serde_json::to_value(client.get_task_status(&task_id).await?)?,
        Command::Plants { species } => {
            serde_json::to_value(client.get_plants_by_species(&species).await?)?
        }
        Command::Route { location } => route_json(&location)?,
    };
    Ok(value)
}

/// The server accepted the files but their processing status was not confirmed.
///
/// Carries the upload report so it is not lost; retrying would upload twice.
#[derive(Debug, thiserror::Error)]
#[error("{message} (files were already uploaded)")]
pub(crate) struct UploadUnconfirmed {
    pub(crate) message: String,
    pub(crate) output: Value,
}

fn upload_output(outcome: SessionOutcome) -> anyhow::Result<Value> {
    let output = outcome.report.as_ref().map(|report| {
        json!({
            "response": report.response,
            "files": report
                .files
                .iter()
                .map(|file| json!({"name": file.name, "bytes": file.bytes}))
                .collect::<Vec<_>>(),
            "status": outcome.state.last_status(),
        })
    });
    match (outcome.state.phase(), output) {
        (UploadPhase::Failed { message }, Some(output)) => Err(UploadUnconfirmed {
            message: message.clone(),
            output,
        }
        .into()),
        (UploadPhase::Failed { message }, None) => Err(anyhow!("{message}")),
        (_, output) => output.context("upload finished without a report"),
    }
}

fn gather_files(paths: &[PathBuf]) -> anyhow::Result<Vec<FileEntry>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(collect_directory(path)?);
        } else {
            files.push(FileEntry::read(path)?);
        }
    }
    Ok(files)
}

fn route_json(location: &str) -> anyhow::Result<Value> {
    let route = resolve(location).with_context(|| format!("no route matches `{location}`"))?;
    let props = match route.props {
        ViewProps::None => json!({}),
        ViewProps::PlantDetails { plant_name } => json!({ "plantName": plant_name }),
        ViewProps::ResultViewer { kind, plant } => json!({ "type": kind, "plant": plant }),
    };
    Ok(json!({
        "name": route.name,
        "view": format!("{:?}", route.view),
        "props": props,
    }))
}
