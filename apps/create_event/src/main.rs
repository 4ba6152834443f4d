use std::{path::PathBuf, sync::Arc, time::Duration as StdDuration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use event_form::{
    navigation::{navigation_items, on_item_selected},
    pickers::{format_date, format_time},
    spawn_form_session, EventFormController, FormInput, FormOptions, FormSessionHandle,
    FormSnapshot, ImagePicker, MediaRequest, SessionError, SubmitOutcome, UnavailableSubmitter,
};
use serde::Serialize;
use shared::{
    domain::{Destination, EventType},
    error::SubmissionError,
};
use tracing_subscriber::EnvFilter;

mod config;

const IMAGE_PICK_TIMEOUT: StdDuration = StdDuration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "create-event", about = "Drive the create-event form from the command line")]
struct Cli {
    /// TOML settings file; defaults to ./create_event.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the form and print the resulting snapshot as JSON.
    Form(FormArgs),
    /// Show the bottom navigation bar and resolve a tab tap.
    Nav {
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        select: String,
    },
}

#[derive(Args, Debug, Default)]
struct FormArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Calendar date, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// 24-hour time, HH:MM.
    #[arg(long, value_parser = parse_time)]
    start_time: Option<NaiveTime>,
    #[arg(long, value_parser = parse_time)]
    end_time: Option<NaiveTime>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long = "type")]
    event_type: Option<String>,
    #[arg(long)]
    link: Option<String>,
    /// Resource reference the image picker resolves with.
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    submit: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| format!("{raw}: {err}"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|err| format!("{raw}: {err}"))
}

/// Stands in for the platform media picker: resolves with `--image`, or
/// reports a cancelled pick.
struct ArgumentImagePicker(Option<String>);

#[async_trait]
impl ImagePicker for ArgumentImagePicker {
    async fn pick(&self, request: MediaRequest) -> Option<String> {
        tracing::debug!(mime_type = request.mime_type, "image picker invoked");
        self.0.clone()
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SubmissionReport {
    Completed { outcome: SubmitOutcome },
    Failed { error: SubmissionError },
}

#[derive(Serialize)]
struct FormReport {
    #[serde(flatten)]
    snapshot: FormSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    submission: Option<SubmissionReport>,
}

#[derive(Serialize)]
struct NavigationReport {
    items: Vec<event_form::navigation::NavigationItem>,
    request: Option<event_form::navigation::NavigationRequest>,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (settings, warnings) = config::load_settings(cli.config.as_deref())?;
    init_tracing(&settings.log_filter);
    for warning in warnings {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Command::Form(args) => run_form(&settings, args).await,
        Command::Nav { current, select } => run_nav(current.as_deref(), &select),
    }
}

async fn run_form(settings: &config::Settings, args: FormArgs) -> Result<()> {
    let options = FormOptions {
        proposed_date_offset: settings.proposed_date_offset()?,
    };
    let inputs = form_inputs(settings, &args)?;
    let (handle, task) = spawn_form_session(
        EventFormController::new(options),
        Arc::new(ArgumentImagePicker(args.image.clone())),
        Arc::new(UnavailableSubmitter),
    );

    for input in inputs {
        handle.send(input).await?;
    }
    if args.image.is_some() {
        pick_image(&handle).await?;
    }

    let submission = if args.submit {
        Some(match handle.submit().await {
            Ok(outcome) => SubmissionReport::Completed { outcome },
            Err(SessionError::Submission(error)) => SubmissionReport::Failed { error },
            Err(err) => return Err(err.into()),
        })
    } else {
        None
    };

    let snapshot = handle.sync().await?;
    handle.close().await?;
    task.await.context("create-event session task failed")?;

    let report = FormReport {
        snapshot,
        submission,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn pick_image(handle: &FormSessionHandle) -> Result<()> {
    handle.pick_image().await?;
    // Barrier so the pick is known to be in flight before waiting on it.
    handle.sync().await?;
    let mut updates = handle.subscribe();
    tokio::time::timeout(IMAGE_PICK_TIMEOUT, updates.wait_for(|s| !s.image_pick_pending))
        .await
        .context("image picker did not resolve")?
        .map_err(|_| SessionError::Closed)?;
    Ok(())
}

/// Replays the arguments the way a user would fill the screen: read-only
/// fields go through their focus intent before the picker confirms.
fn form_inputs(settings: &config::Settings, args: &FormArgs) -> Result<Vec<FormInput>> {
    let mut inputs = Vec::new();

    if let Some(name) = &args.name {
        inputs.push(FormInput::SetName(name.clone()));
    }
    if let Some(location) = &args.location {
        inputs.push(FormInput::SetLocation(location.clone()));
    }
    if let Some(raw) = &args.event_type {
        let event_type = EventType::from_name(raw).ok_or_else(|| {
            let known: Vec<_> = EventType::ALL.iter().map(|kind| kind.name()).collect();
            anyhow!("unknown event type '{raw}' (expected one of {})", known.join(", "))
        })?;
        inputs.push(FormInput::OpenTypeSelector);
        inputs.push(FormInput::SetType(event_type));
    }
    if let Some(price) = &args.price {
        inputs.push(FormInput::SetPrice(price.clone()));
    }
    if let Some(date) = args.date {
        let text = format_date(date, &settings.date_format)
            .with_context(|| format!("cannot format {date} with '{}'", settings.date_format))?;
        inputs.push(FormInput::FocusDate);
        inputs.push(FormInput::ConfirmDate(text));
    }
    if let Some(time) = args.start_time {
        let text = format_time(time, &settings.time_format)
            .with_context(|| format!("cannot format {time} with '{}'", settings.time_format))?;
        inputs.push(FormInput::FocusStartTime);
        inputs.push(FormInput::ConfirmStartTime(text));
    }
    if let Some(time) = args.end_time {
        let text = format_time(time, &settings.time_format)
            .with_context(|| format!("cannot format {time} with '{}'", settings.time_format))?;
        inputs.push(FormInput::FocusEndTime);
        inputs.push(FormInput::ConfirmEndTime(text));
    }
    if let Some(description) = &args.description {
        inputs.push(FormInput::SetDescription(description.clone()));
    }
    if let Some(link) = &args.link {
        inputs.push(FormInput::SetLink(link.clone()));
    }

    Ok(inputs)
}

fn parse_destination(raw: &str) -> Result<Destination> {
    Destination::from_route(raw).ok_or_else(|| {
        let known: Vec<_> = Destination::TABS.iter().map(|tab| tab.route()).collect();
        anyhow!("unknown destination '{raw}' (expected one of {})", known.join(", "))
    })
}

fn run_nav(current: Option<&str>, select: &str) -> Result<()> {
    let current = current.map(parse_destination).transpose()?;
    let target = parse_destination(select)?;

    let report = NavigationReport {
        items: navigation_items(current),
        request: on_item_selected(current, target),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
