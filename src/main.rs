use anyhow::Context;
use clap::{Parser, Subcommand};
use tunestore::config;
use tunestore::lyrics::{update_index, LrcMetadata, LyricTrack};
use tunestore::source::{SourceKind, Sources, Track};
use tunestore::store::{actions::Action, Store};

#[derive(Debug, Parser)]
#[command(name = "tunestore", version, about = "Music source and lyric store (diagnostics)")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Source to query (netease, migu, kugou). Defaults to the configured source.
    #[arg(long, short)]
    source: Option<SourceKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search tracks and print to stdout.
    Search { keyword: String },
    /// Print search-as-you-type suggestions.
    Suggest { keyword: String },
    /// Resolve playable stream URLs (netease batches several ids in one call).
    Url {
        #[arg(required = true)]
        handles: Vec<String>,
    },
    /// Fetch and parse a track's lyric.
    Lyrics {
        handle: String,
        /// Print only the line active at this playback time (seconds).
        #[arg(long)]
        at: Option<f64>,
        /// Dump the raw lyric text instead of the parsed lines.
        #[arg(long)]
        raw: bool,
    },
    /// Select a track through the store and replay its lyric against a simulated clock.
    Follow {
        handle: String,
        /// Clock step in seconds.
        #[arg(long, default_value_t = 0.5)]
        step: f64,
        /// Stop after this many seconds.
        #[arg(long, default_value_t = 60.0)]
        until: f64,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let kind = cli.source.unwrap_or(cfg.store.default_source);
    let sources = Sources::from_config(&cfg)?;

    match cli.command {
        Command::Search { keyword } => {
            let tracks = sources.search(kind, &keyword).await?;
            print_tracks(&tracks);
        }
        Command::Suggest { keyword } => {
            for s in sources.suggest(kind, &keyword).await? {
                if s.artists.is_empty() {
                    println!("{}", s.name);
                } else {
                    println!("{} - {}", s.name, s.artists.join(", "));
                }
            }
        }
        Command::Url { handles } => {
            if kind == SourceKind::NetEase {
                for u in sources.netease.resolve_stream_urls(&handles).await? {
                    println!("{}\t{}", u.id, u.url.as_deref().unwrap_or("-"));
                }
            } else {
                for handle in &handles {
                    let url = sources.resolve_stream_url(kind, handle).await?;
                    println!("{handle}\t{url}");
                }
            }
        }
        Command::Lyrics { handle, at, raw } => {
            let text = sources.fetch_lyric(kind, &handle).await?;
            if raw {
                println!("{}", text.unwrap_or_default());
                return Ok(());
            }

            let meta = LrcMetadata::parse(text.as_deref().unwrap_or_default());
            if !meta.is_empty() {
                eprintln!("{meta:?}");
            }
            let track = LyricTrack::parse_opt(text.as_deref());
            match at {
                Some(seconds) => {
                    let cursor = update_index(&track, seconds);
                    match cursor.active_line(&track) {
                        Some(line) => println!("{}\t{line}", cursor.position()),
                        None => println!("-1"),
                    }
                }
                None => println!("{}", track.to_lrc()),
            }
        }
        Command::Follow {
            handle,
            step,
            until,
        } => {
            anyhow::ensure!(step > 0.0, "--step must be positive");
            let mut store = Store::new(sources, kind);
            store.handle_action(Action::SelectTrack(Track {
                id: handle.clone(),
                name: handle,
                artists: Vec::new(),
                url: None,
                duration_secs: None,
                source: kind,
            }));
            while store.state().lyric_loading || store.state().resolving_url {
                store.pump().await;
            }
            if let Some(err) = &store.state().last_error {
                eprintln!("{err}");
            }
            if !store.state().current_url().is_empty() {
                eprintln!("url: {}", store.state().current_url());
            }

            let mut last = None;
            let mut seconds = 0.0;
            while seconds <= until {
                store.handle_action(Action::Tick { seconds });
                let index = store.state().current_lyric_index();
                if index != last
                    && let Some(line) = store.state().active_line() {
                        println!("{seconds:>7.2}s  {line}");
                    }
                last = index;
                seconds += step;
            }
        }
        Command::Config => {
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}

fn print_tracks(tracks: &[Track]) {
    for (i, t) in tracks.iter().enumerate() {
        let duration = t
            .duration_secs
            .map(|d| format!("  [{}:{:02}]", d / 60, d % 60))
            .unwrap_or_default();
        println!(
            "{:02}. {}{}  ({}={})",
            i + 1,
            t.display_name(),
            duration,
            t.source,
            t.id
        );
    }
}
