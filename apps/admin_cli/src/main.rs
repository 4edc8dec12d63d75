use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client_core::{
    AccountService, BlogClient, Comments, DateRange, FilterPatch, ImageUpload, ListResource,
    ListState, ListView, Posts, ProfileUpdate, QueryState,
};
use serde::Serialize;
use shared::domain::{CategoryId, SortKey};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_backend_url, DEFAULT_CONFIG_FILE};
use render::{render_error, render_list, RowDisplay};

#[derive(Parser, Debug)]
#[command(name = "blog-admin", about = "Manage your blog posts, comments and account")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Print list results as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Posts {
        #[command(subcommand)]
        action: ListCommand,
    },
    Comments {
        #[command(subcommand)]
        action: ListCommand,
    },
    Account {
        #[command(subcommand)]
        action: AccountCommand,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ListCommand {
    List(ListArgs),
    /// Delete one item, then show the page that remains.
    Delete {
        id: i64,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// One of publishDate:desc, publishDate:asc, likesCount:desc,
    /// likesCount:asc, repliesCount:desc, repliesCount:asc.
    #[arg(long)]
    sort: Option<SortKey>,
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    #[arg(long = "category")]
    categories: Vec<i64>,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Send the email-change confirmation link.
    EmailChange,
    /// Send the password-change link.
    PasswordChange,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Update {
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    Image {
        path: PathBuf,
        #[arg(long)]
        mime_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(url) = &cli.backend_url {
        settings.backend_url = normalize_backend_url(url)?;
    }
    if let Some(token) = cli.token.clone() {
        settings.auth_token = Some(token);
    }
    if let Some(page_size) = cli.page_size {
        if page_size == 0 {
            bail!("--page-size must be greater than zero");
        }
        settings.page_size = page_size;
    }
    debug!(backend_url = %settings.backend_url, page_size = settings.page_size, "settings loaded");

    let client = BlogClient::new(settings.client_context());

    match cli.command {
        Command::Posts { action } => {
            run_list_command::<Posts>(&client, settings.page_size, action, cli.json).await
        }
        Command::Comments { action } => {
            run_list_command::<Comments>(&client, settings.page_size, action, cli.json).await
        }
        Command::Account { action } => run_account_command(&client, action).await,
        Command::Profile { action } => run_profile_command(&client, action, cli.json).await,
    }
}

fn build_query(page_size: u32, args: &ListArgs) -> Result<QueryState> {
    let mut patch = FilterPatch::new();
    if let (Some(from), Some(to)) = (args.from, args.to) {
        patch = patch.date_range(DateRange::new(from, to)?);
    }
    if !args.categories.is_empty() {
        patch = patch.categories(args.categories.iter().copied().map(CategoryId));
    }
    if let Some(search) = &args.search {
        patch = patch.search(search.clone());
    }

    Ok(QueryState::new(page_size)?
        .with_sort(args.sort.unwrap_or_default())
        .with_filters(patch)
        .with_page(args.page))
}

async fn run_list_command<R>(
    client: &BlogClient,
    page_size: u32,
    command: ListCommand,
    json: bool,
) -> Result<()>
where
    R: ListResource,
    R::Id: From<i64>,
    R::Item: RowDisplay,
{
    let (args, delete_id) = match command {
        ListCommand::List(args) => (args, None),
        ListCommand::Delete { id, list } => (list, Some(<R::Id>::from(id))),
    };

    let mut view = ListView::with_query(
        client.resource::<R>(),
        build_query(page_size, &args)?,
        client.context().messages().clone(),
    );
    view.mount().await;
    if let Some(error) = view.state().error() {
        bail!(render_error(error));
    }

    if let Some(id) = delete_id {
        view.delete_item(id)
            .await
            .map_err(|error| anyhow!(render_error(&error)))?;
        println!("deleted {} {id}", R::NAME);
        if let Some(error) = view.state().error() {
            bail!(render_error(error));
        }
    }

    print_list(view.state(), json)
}

#[derive(Serialize)]
struct ListOutput<'a, T> {
    items: &'a [T],
    pagination: Option<&'a shared::protocol::PaginationMetadata>,
}

fn print_list<T: RowDisplay + Serialize>(state: &ListState<T>, json: bool) -> Result<()> {
    if json {
        let output = ListOutput {
            items: state.items(),
            pagination: state.pagination(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_list(state));
    }
    Ok(())
}

async fn run_account_command(client: &BlogClient, command: AccountCommand) -> Result<()> {
    let mut account = AccountService::new(client.clone(), client.context().messages().clone());
    let outcome = match command {
        AccountCommand::EmailChange => account.initiate_email_change().await,
        AccountCommand::PasswordChange => account.initiate_password_change().await,
    };
    outcome.map_err(|error| anyhow!(render_error(&error)))?;
    println!("Check your inbox for a confirmation link.");
    Ok(())
}

async fn run_profile_command(client: &BlogClient, command: ProfileCommand, json: bool) -> Result<()> {
    let mut account = AccountService::new(client.clone(), client.context().messages().clone());
    match command {
        ProfileCommand::Update {
            display_name,
            bio,
            website,
        } => {
            let profile = account
                .update_profile(&ProfileUpdate {
                    display_name,
                    bio,
                    website,
                })
                .await
                .map_err(|error| anyhow!(render_error(&error)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!(
                    "updated profile for {} ({})",
                    profile.username,
                    profile.display_name.as_deref().unwrap_or("no display name")
                );
            }
        }
        ProfileCommand::Image { path, mime_type } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read image '{}'", path.display()))?;
            let mime_type = mime_type
                .or_else(|| mime_guess::from_path(&path).first_raw().map(str::to_string))
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "profile-image".to_string());

            let response = account
                .upload_profile_image(&ImageUpload {
                    filename,
                    mime_type,
                    bytes,
                })
                .await
                .map_err(|error| anyhow!(render_error(&error)))?;
            println!("profile image: {}", response.profile_image_url);
        }
    }
    Ok(())
}
