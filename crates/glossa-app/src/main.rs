use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use glossa_config::Config;
use glossa_config::translator::TranslatorConfig;
use glossa_core::widgets::{DefaultAccessorFactory, Widget};
use glossa_core::{
    AvailabilityState, Collaborators, ElementTable, InitOptions, Locales, Translator,
};
use glossa_service::{DeepLService, PhrasebookService, TranslationService};
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

mod profile;
mod screen;

use self::profile::FilePreferences;
use self::screen::{ConsoleAnimator, Screen};

#[derive(Parser, Debug)]
#[command(version, about = "Translate a demo screen at runtime", long_about = None)]
struct Args {
    /// Device locale, e.g. pl or de_DE. Defaults to the environment
    #[arg(short, long)]
    locale: Option<String>,

    /// Path to a JSON config file
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// Turn translation on and keep it on
    #[arg(long, conflicts_with = "disable")]
    enable: bool,

    /// Turn translation off
    #[arg(long)]
    disable: bool,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = profile::load_config(args.config.as_deref())?;
    if let Some(locale) = &args.locale {
        config.locale.force_locale = Some(locale.clone());
    }
    init_logging(&config.log_filter, args.json_logs);

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {e}");
        }
    };

    tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
        result = run(config, args) => result,
    }
}

fn init_logging(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn build_service(config: &TranslatorConfig) -> anyhow::Result<Arc<dyn TranslationService>> {
    match config.provider.as_str() {
        "deepl" => {
            let service = DeepLService::new(
                config.api_key.clone(),
                config.api_url.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?;
            Ok(Arc::new(service))
        }
        "phrasebook" => {
            let service = match &config.phrasebook_path {
                Some(path) => PhrasebookService::from_json(&fs::read_to_string(path)?)?,
                None => PhrasebookService::builtin()?,
            };
            Ok(Arc::new(service))
        }
        other => anyhow::bail!("Unknown translation provider: {other}"),
    }
}

async fn run(config: Config, args: Args) -> anyhow::Result<()> {
    let service = build_service(&config.translator)?;
    tracing::info!("Using {} translation", service.metadata().name);

    let elements = Arc::new(ElementTable::new());
    let preferences = Arc::new(FilePreferences::open(&config.preferences.path)?);
    let translator: Translator<Widget> = Translator::new(
        &config,
        Collaborators::new(elements, service, preferences)
            .with_animator(Arc::new(ConsoleAnimator)),
    );

    let (state_tx, mut state_rx) = watch::channel(AvailabilityState::Initialising);
    let listener = Arc::new(move |state: &AvailabilityState| {
        tracing::info!(?state, "Translation availability");
        state_tx.send_replace(state.clone());
    });
    translator.add_state_listener(&listener);

    let screen = Screen::build(&translator);
    let locales = Locales {
        default: config.locale.default_locale(),
        supported: config.locale.supported_locales(),
        active: config.locale.active_locale(),
    };
    tracing::info!("Device locale {}, application locale {}", locales.active, locales.default);

    let options = InitOptions::new(locales)
        .factory(Arc::new(DefaultAccessorFactory::new()))
        .prefetch(Arc::new(screen.strings()));
    translator.initialize(options)?;

    println!("Original:\n{}\n", screen.render());

    let state = state_rx.wait_for(AvailabilityState::is_terminal).await?.clone();
    match state {
        AvailabilityState::ModelDownloaded => {}
        AvailabilityState::NotRequired => {
            tracing::info!("Device language is supported, nothing to translate");
            return Ok(());
        }
        other => {
            tracing::warn!("Translation unavailable: {other:?}");
            return Ok(());
        }
    }

    let quiet = config.overlay.fade_out() + config.overlay.fade_in() + Duration::from_millis(100);

    if args.disable {
        translator.set_enabled(false)?;
        screen.settle(quiet).await;
        println!("Translation off:\n{}", screen.render());
        return Ok(());
    }

    translator.set_enabled(true)?;
    screen.settle(quiet).await;
    println!("Translated:\n{}\n", screen.render());

    if !args.enable {
        translator.set_enabled(false)?;
        screen.settle(quiet).await;
        println!("Restored:\n{}", screen.render());
    }

    Ok(())
}
