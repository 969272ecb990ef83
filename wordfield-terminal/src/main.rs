/// Wordfield terminal host
///
/// Runs one sketch in the terminal. Controls:
///   - Arrow keys: orbit, Shift+arrows: pan, +/-: zoom
///   - Enter: advance the term field (save text, then visualize)
///   - 1/2/3: toggle term groups, t: turntable
///   - p/P: camera part, f/g/h/j: change modes
///   - w: wireframe, [ ] { } < >: sliders, i/k/u/o: light
///   - Q/ESC: quit
mod cli;

use std::fs::{self, File};
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;
use wordfield_core::{config, create, Result, WordfieldConfig, SKETCH_NAMES};
use wordfield_terminal::TerminalApp;

fn init_logging(args: &cli::Args) -> Result<()> {
    // stderr shares the screen with the renderer, so only warnings by default
    let fallback = if args.log_file.is_some() {
        "wordfield=info"
    } else {
        "wordfield=warn"
    };
    // --log-level was validated by clap
    let directive: Directive = args
        .log_level
        .as_deref()
        .unwrap_or(fallback)
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::from_default_env().add_directive(directive);

    match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_config(args: &cli::Args) -> Result<WordfieldConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_from_path(path).unwrap_or_else(|e| {
            warn!("Config load failed, using defaults: {e}");
            WordfieldConfig::default()
        }),
        None => WordfieldConfig::default(),
    };

    if let Some(path) = &args.text {
        config.text.source = fs::read_to_string(path)?;
        info!(path = %path.display(), chars = config.text.source.len(), "loaded source text");
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = cli::parse();

    if args.list {
        for name in SKETCH_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    init_logging(&args)?;
    info!("Wordfield v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let sketch = create(&args.sketch, &config)?;

    let mut app = TerminalApp::new(sketch, &config)?;
    app.run()?;

    info!("Shutdown complete");
    Ok(())
}
