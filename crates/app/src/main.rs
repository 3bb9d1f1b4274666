//! Khabari API Client - Main Entry Point
//!
//! Command-line front end: loads settings, opens the persisted session
//! and forwards one user intent to it.

mod cli;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use khabari_application::{Clock, Dispatcher, KeyValueStore, SendError, Session};
use khabari_domain::request::url_sync::parse_query_string;
use khabari_domain::{
    AppSettings, AuthConfig, AuthKind, HttpMethod, QueryParam, UuidV7Generator, format_json,
    is_valid_json,
};
use khabari_infrastructure::{
    JsonFileStore, MemoryStore, ReqwestHttpClient, SystemClock, default_data_dir, load_settings,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, HistoryCommand, SavedCommand, SendArgs, TabsCommand};

type AppSession = Session<ReqwestHttpClient>;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    init_logging(&settings);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting khabari");

    let session = open_session(&cli, &settings).await?;

    match cli.command {
        Command::Send(args) => send(&session, args).await,
        Command::History(command) => history(&session, command).await,
        Command::Saved(command) => saved(&session, command).await,
        Command::Tabs(command) => tabs(&session, command).await,
    }
}

/// Logs go to stderr so stdout carries only response output.
fn init_logging(settings: &AppSettings) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_session(cli: &Cli, settings: &AppSettings) -> Result<AppSession> {
    let storage: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let dir = cli
            .data_dir
            .clone()
            .or_else(|| settings.data_dir.clone())
            .or_else(default_data_dir)
            .context("could not determine a data directory; pass --data-dir")?;
        tracing::debug!(dir = %dir.display(), "using data directory");
        Arc::new(JsonFileStore::new(dir))
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let client = ReqwestHttpClient::with_settings(settings).context("creating HTTP client")?;
    let dispatcher = Dispatcher::new(Arc::new(client), Arc::clone(&clock));

    Session::load(
        dispatcher,
        storage,
        Arc::new(UuidV7Generator),
        clock,
        settings,
    )
    .await
    .context("loading session")
}

fn auth_from_args(args: &SendArgs) -> Option<AuthConfig> {
    if let Some(token) = &args.bearer {
        return Some(AuthConfig::bearer(token.as_str()));
    }
    if let Some((user, password)) = &args.basic {
        return Some(AuthConfig::basic(user.as_str(), password.as_str()));
    }
    args.api_key.as_ref().map(|(name, value)| {
        AuthConfig::api_key(name.as_str(), value.as_str(), args.api_key_in.into())
    })
}

fn prepare_body(body: String, format: bool) -> String {
    if !format {
        return body;
    }
    if is_valid_json(&body) {
        format_json(&body)
    } else {
        tracing::warn!("body is not JSON; leaving it as typed");
        body
    }
}

async fn send(session: &AppSession, args: SendArgs) -> Result<ExitCode> {
    let (method, url) = match args.target.as_slice() {
        [url] => (None, url.clone()),
        [method, url] => (Some(method.parse::<HttpMethod>()?), url.clone()),
        _ => anyhow::bail!("expected [METHOD] URL"),
    };

    // The URL on the command line is a complete edit, so its query (plus
    // any -q pairs) replaces the rows outright.
    session.edit_url(&url).await?;
    let mut params = parse_query_string(&url);
    for (key, value) in &args.query {
        match params.iter_mut().find(|p| &p.key == key) {
            Some(param) => param.value.clone_from(value),
            None => params.push(QueryParam::new(key.as_str(), value.as_str())),
        }
    }
    session.edit_params(params).await?;

    let auth = auth_from_args(&args);
    let no_auth = args.no_auth;
    let headers = args.headers;
    let body = args.body.map(|body| prepare_body(body, args.format_body));
    session
        .edit_request(|request| {
            if let Some(method) = method {
                request.method = method;
            }
            for (name, value) in headers {
                if value.is_empty() {
                    request.headers.remove_ignore_case(&name);
                } else {
                    request.headers.set_ignore_case(name, value);
                }
            }
            if let Some(body) = body {
                request.body = body;
            }
            if no_auth {
                request.switch_auth(AuthKind::None);
            } else if let Some(auth) = auth {
                request.auth = auth;
            }
        })
        .await?;

    let outcome = match session.send_active().await {
        Ok(outcome) => outcome,
        Err(SendError::InvalidBody(message)) => {
            eprintln!("{message}");
            return Ok(ExitCode::from(2));
        }
        Err(SendError::Application(e)) => return Err(e.into()),
    };

    if !outcome.added_to_history {
        tracing::info!("identical request already in history");
    }
    if args.save && session.save_active().await? {
        eprintln!("saved request {}", outcome.request.id());
    }

    match (&outcome.response, &outcome.error) {
        (Some(response), _) => {
            println!("{}", render::response(response, args.include_headers));
            Ok(ExitCode::SUCCESS)
        }
        (None, Some(error)) => {
            eprintln!("error: {error}");
            Ok(ExitCode::FAILURE)
        }
        (None, None) => Ok(ExitCode::FAILURE),
    }
}

async fn history(session: &AppSession, command: HistoryCommand) -> Result<ExitCode> {
    match command {
        HistoryCommand::List => print!("{}", render::items(&session.history(), Utc::now())),
        HistoryCommand::Clear => session.clear_history().await?,
        HistoryCommand::Select { index } => {
            session.select_history(index).await?;
            let tab = session.active_tab();
            println!("{} {}", tab.request.method, tab.title);
            if let Some(response) = &tab.response {
                println!("{}", render::status_line(response));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn saved(session: &AppSession, command: SavedCommand) -> Result<ExitCode> {
    match command {
        SavedCommand::List => print!("{}", render::items(&session.saved(), Utc::now())),
        SavedCommand::Add { index } => {
            let added = match index {
                Some(index) => session.promote_history(index).await?,
                None => session.save_active().await?,
            };
            if !added {
                eprintln!("an identical request is already saved");
            }
        }
        SavedCommand::Remove { request_id } => {
            if session.remove_saved(&request_id).await? == 0 {
                eprintln!("no saved request with id {request_id}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn tabs(session: &AppSession, command: TabsCommand) -> Result<ExitCode> {
    match command {
        TabsCommand::List => {}
        TabsCommand::New => {
            session.add_tab().await?;
        }
        TabsCommand::Close { id } => {
            if !session.close_tab(&id).await? {
                eprintln!("no tab with id {id}");
                return Ok(ExitCode::FAILURE);
            }
        }
        TabsCommand::Select { id } => session.set_active_tab(&id).await?,
        TabsCommand::Section { section } => session.set_section(section.into()).await?,
    }
    let listing = session.read(|store| render::tabs(store.tabs(), store.active_tab_id()));
    print!("{listing}");
    Ok(ExitCode::SUCCESS)
}
