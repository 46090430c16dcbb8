//! Subcommands of `scmctl` and their dispatch onto typed services

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use scm_client::models::{Address, AddressGroup, NatRule, Rulebase, Service, Tag};
use scm_client::resource::{PostFilter, Resource};
use scm_client::{ListQuery, Location, ResourceService, ScmClient};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Address,
    AddressGroup,
    Tag,
    Service,
    SecurityRule,
    NatRule,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RulebaseArg {
    #[default]
    Pre,
    Post,
}

impl From<RulebaseArg> for Rulebase {
    fn from(arg: RulebaseArg) -> Self {
        match arg {
            RulebaseArg::Pre => Rulebase::Pre,
            RulebaseArg::Post => Rulebase::Post,
        }
    }
}

/// Exactly one container must be given
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LocationArgs {
    #[arg(long)]
    pub folder: Option<String>,
    #[arg(long)]
    pub snippet: Option<String>,
    #[arg(long)]
    pub device: Option<String>,
}

impl From<LocationArgs> for Location {
    fn from(args: LocationArgs) -> Self {
        Location {
            folder: args.folder,
            snippet: args.snippet,
            device: args.device,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every object in a container
    List {
        #[arg(value_enum)]
        kind: ResourceKind,
        #[command(flatten)]
        location: LocationArgs,
        /// Only objects defined directly in the queried container
        #[arg(long)]
        exact_match: bool,
        #[arg(long = "exclude-folder")]
        exclude_folders: Vec<String>,
        #[arg(long = "exclude-snippet")]
        exclude_snippets: Vec<String>,
        #[arg(long = "exclude-device")]
        exclude_devices: Vec<String>,
        /// Resource filters as a JSON object, e.g. '{"tags":["web"]}'
        #[arg(long)]
        filter: Option<String>,
    },
    /// Fetch one object by name
    Fetch {
        #[arg(value_enum)]
        kind: ResourceKind,
        name: String,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Get one object by id
    Get {
        #[arg(value_enum)]
        kind: ResourceKind,
        id: Uuid,
    },
    /// Create an object from a JSON or YAML file
    Create {
        #[arg(value_enum)]
        kind: ResourceKind,
        file: PathBuf,
    },
    /// Update an object from a JSON or YAML file; the file must carry `id`
    Update {
        #[arg(value_enum)]
        kind: ResourceKind,
        file: PathBuf,
    },
    /// Delete an object by id
    Delete {
        #[arg(value_enum)]
        kind: ResourceKind,
        id: Uuid,
    },
}

impl Command {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Command::List { kind, .. }
            | Command::Fetch { kind, .. }
            | Command::Get { kind, .. }
            | Command::Create { kind, .. }
            | Command::Update { kind, .. }
            | Command::Delete { kind, .. } => *kind,
        }
    }
}

/// Run `command` against the service for its resource kind
pub async fn run(client: &ScmClient, command: Command, rulebase: Rulebase) -> Result<Value> {
    match command.kind() {
        ResourceKind::Address => execute(client.service::<Address>()?, command).await,
        ResourceKind::AddressGroup => execute(client.service::<AddressGroup>()?, command).await,
        ResourceKind::Tag => execute(client.service::<Tag>()?, command).await,
        ResourceKind::Service => execute(client.service::<Service>()?, command).await,
        ResourceKind::SecurityRule => {
            execute(client.security_rules()?.with_rulebase(rulebase), command).await
        },
        ResourceKind::NatRule => execute(client.service::<NatRule>()?, command).await,
    }
}

async fn execute<R>(service: ResourceService<R>, command: Command) -> Result<Value>
where
    R: Resource,
    R::Create: DeserializeOwned,
    R::Update: DeserializeOwned,
{
    let value = match command {
        Command::List {
            location,
            exact_match,
            exclude_folders,
            exclude_snippets,
            exclude_devices,
            filter,
            ..
        } => {
            let mut query = ListQuery::<R::Filter>::new(location.into());
            query.post = PostFilter {
                exact_match,
                exclude_folders,
                exclude_snippets,
                exclude_devices,
            };
            let filters = match filter {
                Some(raw) => serde_json::from_str(&raw).context("--filter is not valid JSON")?,
                None => Value::Null,
            };

            let records = service.list_with_filters(query, &filters).await?;
            tracing::info!("listed {} {} objects", records.len(), R::KIND);
            serde_json::to_value(records)?
        },
        Command::Fetch { name, location, .. } => {
            serde_json::to_value(service.fetch(&name, &location.into()).await?)?
        },
        Command::Get { id, .. } => serde_json::to_value(service.get(id).await?)?,
        Command::Create { file, .. } => {
            let data: R::Create = read_body(&file)?;
            serde_json::to_value(service.create(&data).await?)?
        },
        Command::Update { file, .. } => {
            let data: R::Update = read_body(&file)?;
            serde_json::to_value(service.update(&data).await?)?
        },
        Command::Delete { id, .. } => {
            service.delete(id).await?;
            json!({ "deleted": id })
        },
    };
    Ok(value)
}

/// Parse a request body; `.yaml`/`.yml` files are YAML, anything else JSON
fn read_body<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_body(path, &content)
}

fn parse_body<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(content).with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(content).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}
