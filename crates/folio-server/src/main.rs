//! `folio` — the studio site backend.
//!
//! # Usage
//!
//! ```text
//! folio serve                       # HTTP API on 127.0.0.1:5000
//! folio --config folio.toml serve
//! folio submit inquiryForm -f name=Asha -f phone=0550000000
//! folio render                      # rebuild page sections from data/
//! folio hash-password               # argon2 hash for admin.password_hash
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context as _, anyhow, bail};
use clap::{Parser, Subcommand};
use folio_api::{AppState, AuthConfig, auth::hash_password};
use folio_content::{ContentService, GitPublisher, SiteRenderer};
use folio_core::form::FormValues;
use folio_forms::{FormRegistry, SubmitOutcome};
use folio_server::{
  Backend, ServerConfig,
  config::{AdminConfig, expand_tilde},
  terminal::TerminalPage,
};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio", author, version, about = "Studio site backend")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "folio.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the form endpoint and the admin API.
  Serve,
  /// Submit one form from the terminal, exactly as the page would.
  Submit {
    /// Form id, e.g. `inquiryForm` or `footerContactForm`.
    form_id: String,
    /// Input value as `name=value`; repeatable.
    #[arg(short, long = "field", value_parser = parse_field)]
    fields:  Vec<(String, String)>,
  },
  /// Re-render every page section from the stored content.
  Render,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
  s.split_once('=')
    .map(|(k, v)| (k.trim().to_owned(), v.to_owned()))
    .filter(|(k, _)| !k.is_empty())
    .ok_or_else(|| format!("expected name=value, got {s:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let load = || ServerConfig::load(Some(&cli.config)).context("failed to load configuration");

  match cli.command {
    Command::Serve => serve(load()?).await,
    Command::Submit { ref form_id, ref fields } => submit(load()?, form_id, fields.clone()).await,
    Command::Render => {
      let config = load()?;
      let replaced = content_service(&config.admin).render_all().await?;
      tracing::info!(replaced, "render finished");
      Ok(())
    }
    Command::HashPassword => {
      let password = read_password()?;
      let hash = hash_password(&password).map_err(|e| anyhow!("argon2 error: {e}"))?;
      println!("{hash}");
      Ok(())
    }
  }
}

fn content_service(admin: &AdminConfig) -> ContentService {
  let mut content = ContentService::new(&expand_tilde(&admin.data_dir));
  if let Some(html) = &admin.site_html {
    content = content.with_renderer(SiteRenderer::new(expand_tilde(html)));
  }
  if let Some(repo) = &admin.repo_path {
    content = content.with_publisher(
      GitPublisher::new(expand_tilde(repo), admin.git_branch.clone()),
      admin.auto_push,
    );
  }
  content
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
  let store = Backend::open(&config.store)
    .await
    .context("failed to open document store")?;
  let forms = config.catalog().context("invalid form configuration")?;
  let backend = store.name();

  if config.admin.password_hash.is_empty() {
    tracing::warn!("admin.password_hash is not set; admin API will reject every request");
  }

  let state = AppState {
    store:   Arc::new(store),
    forms:   Arc::new(forms),
    content: Arc::new(content_service(&config.admin)),
    auth:    Arc::new(AuthConfig {
      username:      config.admin.username.clone(),
      password_hash: config.admin.password_hash.clone(),
    }),
  };

  let app = folio_api::router(state, &config.cors_origins);
  let address = config.address();

  tracing::info!(backend, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      tracing::info!("shutting down");
    })
    .await
    .context("server error")?;

  Ok(())
}

async fn submit(
  config: ServerConfig,
  form_id: &str,
  fields: Vec<(String, String)>,
) -> anyhow::Result<()> {
  let catalog = config.catalog().context("invalid form configuration")?;
  let schema = catalog
    .get(form_id)
    .ok_or_else(|| anyhow!("unknown form {form_id:?}"))?;
  let store = Backend::open(&config.store)
    .await
    .context("failed to open document store")?;

  let page = TerminalPage::default().with_form(&schema.id, "Submit");
  let mut registry = FormRegistry::new(Arc::new(store), config.feedback_interval());
  registry.attach(&page, &catalog);

  let mut form: FormValues = fields.into_iter().collect();
  let outcome = registry
    .submit(form_id, &mut form)
    .await
    .ok_or_else(|| anyhow!("form {form_id:?} is not bound"))?;

  // Let the control revert before exiting.
  tokio::time::sleep(config.feedback_interval() + Duration::from_millis(50)).await;

  match outcome {
    SubmitOutcome::Submitted(id) => {
      println!("{id}");
      Ok(())
    }
    SubmitOutcome::Invalid(e) => bail!(e),
    SubmitOutcome::Failed => bail!("submission failed; see log for details"),
    SubmitOutcome::Ignored => bail!("submission already in flight"),
  }
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}
