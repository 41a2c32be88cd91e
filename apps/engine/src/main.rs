//! prompt-engine CLI: runs one adaptation session over a request and prints
//! the analysis or the final prompt.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompt_engine::adapter::attachment;
use prompt_engine::{Config, Ontology, PromptSession, TemplateCatalog, TokioScheduler};

#[derive(Parser)]
#[command(name = "prompt-engine")]
#[command(about = "Adapt a study-prompt template to a free-form request", long_about = None)]
#[command(version)]
struct Cli {
    /// Request text, e.g. "flashcards sobre insuficiência cardíaca para residência"
    input: String,

    /// Attach a .txt, .md or .pdf file as content
    #[arg(short, long)]
    attach: Option<PathBuf>,

    /// Template catalog JSON (overrides CATALOG_PATH)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Manual slot value, repeatable: --set TEMA=Arritmias
    #[arg(short, long = "set", value_name = "SLOT=VALUE")]
    set: Vec<String>,

    /// Use this template id instead of the best match
    #[arg(short, long)]
    template: Option<String>,

    /// Print only the final prompt text
    #[arg(long)]
    text: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("prompt_engine={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!("Starting prompt-engine v{}", env!("CARGO_PKG_VERSION"));

    let catalog = match cli.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => TemplateCatalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => TemplateCatalog::builtin(),
    };
    let catalog = Arc::new(catalog);

    let settings = config.engine_settings();
    let session = PromptSession::new(
        Arc::new(Ontology::medical()),
        catalog.clone(),
        &settings,
        Arc::new(TokioScheduler),
    );

    session.set_input(&cli.input);
    // Wait out the debounce so the run below reflects the full input.
    tokio::time::sleep(settings.debounce + Duration::from_millis(50)).await;

    if let Some(id) = &cli.template {
        let Some(template) = catalog.get(id) else {
            bail!("Unknown template id '{id}'");
        };
        session.select_alternative_template(template.clone());
    }

    if let Some(path) = &cli.attach {
        let content = attachment::load_text(path)
            .with_context(|| format!("Failed to read attachment {}", path.display()))?;
        session.set_attached_content(Some(content));
    }

    for pair in &cli.set {
        let Some((slot, value)) = pair.split_once('=') else {
            bail!("Expected SLOT=VALUE, got '{pair}'");
        };
        session.fill_variable(slot, value);
    }

    if cli.text {
        match session.execution_text() {
            Some(text) => println!("{text}"),
            None => bail!("No template matched the request; try --template <id>"),
        }
    } else {
        let analysis = session.analysis();
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }

    Ok(())
}
