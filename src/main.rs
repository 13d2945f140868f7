use anyhow::{bail, Context, Result};
use clap::Parser;
use fs_err as fs;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use vibe_uigen::cli::{Args, Command};
use vibe_uigen::config::{Config, PersistMode};
use vibe_uigen::history::{History, SqliteHistory};
use vibe_uigen::pipeline::{Generator, Outcome, PipelineSettings};
use vibe_uigen::provider::{make_provider, ProviderSettings};
use vibe_uigen::{server, ux};

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };
    if let Some(p) = args.provider {
        if p != cfg.provider {
            // a model configured for another provider would not resolve
            cfg.model = None;
        }
        cfg.provider = p;
    }
    if let Some(m) = &args.model {
        cfg.model = Some(m.clone());
    }
    if let Some(t) = args.timeout_secs {
        cfg.timeout_secs = t;
    }
    if args.no_history {
        cfg.history_enabled = false;
    }
    Ok(cfg)
}

fn provider_settings(cfg: &Config) -> ProviderSettings {
    let api_key = cfg
        .api_key
        .clone()
        .or_else(|| std::env::var(cfg.provider.key_env()).ok());
    ProviderSettings {
        kind: cfg.provider,
        model: cfg.model_name(),
        api_key,
        api_base: cfg.api_base.clone(),
        ollama_url: cfg.ollama_url.clone(),
        timeout_secs: cfg.timeout_secs,
    }
}

fn open_history(cfg: &Config) -> Result<Option<Arc<dyn History>>> {
    if !cfg.history_enabled {
        return Ok(None);
    }
    let store = SqliteHistory::open(Path::new(&cfg.history_db))?;
    Ok(Some(Arc::new(store)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let cfg = load_config(&args)?;
    let history = open_history(&cfg)?;

    if let Command::History { limit } = &args.command {
        let entries = match &history {
            Some(h) => h.list_recent(*limit)?,
            None => Vec::new(),
        };
        ux::show_history(&entries);
        return Ok(());
    }

    let provider = make_provider(&provider_settings(&cfg))?;
    let mut settings = PipelineSettings::from_config(&cfg, args.debug);
    if matches!(args.command, Command::Generate { .. }) {
        // the process exits right after, so the history write must not be detached
        settings.persist = PersistMode::Inline;
    }
    let generator = Arc::new(Generator::new(provider, history, settings));

    match args.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| cfg.bind.clone());
            server::serve(&addr, generator).await
        }
        Command::Generate { prompt, out, no_progress } => {
            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            let pb = (!no_progress).then(|| ux::spinner("generating"));
            let res = generator.generate(&prompt, &cancel).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            match res.context("generation failed")? {
                Outcome::Rejected(reason) => {
                    ux::show_rejection(reason);
                    bail!("prompt rejected");
                }
                Outcome::Completed(doc) => match out {
                    Some(path) => {
                        fs::write(&path, &doc.code)?;
                        ux::show_written(&path, &doc);
                        Ok(())
                    }
                    None => {
                        println!("{}", doc.code);
                        Ok(())
                    }
                },
            }
        }
        Command::History { .. } => Ok(()),
    }
}
