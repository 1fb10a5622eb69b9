use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gallery_cli::clipboard::SystemClipboard;
use gallery_cli::output;
use gallery_core::config;
use gallery_core::filter::FilterState;
use gallery_core::images::PendingUpload;
use gallery_core::models::ProjectDraft;
use gallery_core::tags::join_tags;
use gallery_core::{Gallery, ProjectId};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    debug!(url = %cfg.remote.url, table = %cfg.remote.table, "configuration loaded");
    let mut gallery = Gallery::from_config(&cfg, Box::new(SystemClipboard));

    match cli.command {
        Commands::List { tag, fields, json } => run_list(&mut gallery, &tag, &fields, json).await,
        Commands::Tags { json } => run_tags(&mut gallery, json).await,
        Commands::Add {
            title,
            tags,
            image,
            password,
        } => run_add(&mut gallery, &title, &tags, image.as_deref(), &password).await,
        Commands::Edit {
            id,
            title,
            tags,
            image,
            password,
        } => run_edit(&mut gallery, id, title, tags, image.as_deref(), &password).await,
        Commands::Delete { id, password, yes } => {
            run_delete(&mut gallery, id, &password, yes).await
        }
        Commands::Copy { id } => run_copy(&mut gallery, id).await,
    }
}

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Browse and manage a tagged project gallery", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects, newest first
    List {
        /// Only show projects carrying this tag ("all" shows everything)
        #[arg(short, long, default_value = "all")]
        tag: String,
        /// Restrict output fields (comma-separated), e.g. id,title,tags,img_url
        #[arg(long, value_delimiter = ',', num_args = 1.., default_values_t = Vec::<String>::new())]
        fields: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List the tags in use
    Tags {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a project
    Add {
        #[arg(long)]
        title: String,
        /// Tags separated by '/', e.g. web/ui
        #[arg(long, default_value = "")]
        tags: String,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
        /// Admin password
        #[arg(long, env = "GALLERY_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Edit a project; omitted fields keep their current value
    Edit {
        id: ProjectId,
        #[arg(long)]
        title: Option<String>,
        /// Tags separated by '/', replaces the current tags
        #[arg(long)]
        tags: Option<String>,
        /// Replacement image; the old one is removed
        #[arg(long)]
        image: Option<PathBuf>,
        /// Admin password
        #[arg(long, env = "GALLERY_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Delete a project and its image
    Delete {
        id: ProjectId,
        /// Admin password
        #[arg(long, env = "GALLERY_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
    /// Copy a project title to the clipboard
    Copy { id: ProjectId },
}

async fn run_list(gallery: &mut Gallery, tag: &str, fields: &[String], json: bool) -> Result<()> {
    gallery.load().await.context("could not load projects")?;
    let filter: FilterState = tag.parse()?;
    gallery.set_filter(filter);
    let visible = gallery.visible();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::projects_json(&visible, fields))?
        );
    } else {
        println!("{}", output::render_projects(&visible, fields));
    }
    Ok(())
}

async fn run_tags(gallery: &mut Gallery, json: bool) -> Result<()> {
    gallery.load().await.context("could not load projects")?;
    let tags = gallery.tags();
    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        println!("{}", output::render_tags(&tags));
    }
    Ok(())
}

async fn read_image(path: Option<&Path>) -> Result<Option<PendingUpload>> {
    match path {
        Some(p) => Ok(Some(
            PendingUpload::from_path(p)
                .await
                .with_context(|| format!("could not read image {}", p.display()))?,
        )),
        None => Ok(None),
    }
}

async fn run_add(
    gallery: &mut Gallery,
    title: &str,
    tags: &str,
    image: Option<&Path>,
    password: &str,
) -> Result<()> {
    gallery.load().await.context("could not load projects")?;
    let draft = ProjectDraft::from_input(title, tags, read_image(image).await?)?;
    let record = gallery.create(draft, password).await?;
    println!("created {}", output::project_line(record, &[]));
    Ok(())
}

async fn run_edit(
    gallery: &mut Gallery,
    id: ProjectId,
    title: Option<String>,
    tags: Option<String>,
    image: Option<&Path>,
    password: &str,
) -> Result<()> {
    gallery.load().await.context("could not load projects")?;
    let current = gallery
        .project(&id)
        .cloned()
        .with_context(|| format!("no project with id {id}"))?;
    let title = title.unwrap_or(current.title);
    let tags = tags.unwrap_or_else(|| join_tags(&current.tags));
    let draft = ProjectDraft::from_input(&title, &tags, read_image(image).await?)?;
    let record = gallery.update(&id, draft, password).await?;
    println!("updated {}", output::project_line(&record, &[]));
    Ok(())
}

async fn run_delete(gallery: &mut Gallery, id: ProjectId, password: &str, yes: bool) -> Result<()> {
    gallery.load().await.context("could not load projects")?;
    let title = gallery
        .project(&id)
        .map(|r| r.title.clone())
        .with_context(|| format!("no project with id {id}"))?;
    if !yes && !confirm(&format!("Really delete \"{title}\"?"))? {
        println!("cancelled");
        return Ok(());
    }
    gallery.delete(&id, password).await?;
    println!("deleted {id}");
    Ok(())
}

async fn run_copy(gallery: &mut Gallery, id: ProjectId) -> Result<()> {
    gallery.load().await.context("could not load projects")?;
    if cfg!(target_os = "linux") && gallery.project(&id).is_some() {
        eprintln!("Holding the clipboard until something else is copied (Ctrl-C to stop)");
    }
    if gallery.copy_title(&id)? {
        println!("{}", gallery.toast().state().message);
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
