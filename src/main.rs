use std::io;

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use dossier::config::AppConfig;
use dossier::core::briefing::source::{needs_url_fix, normalize_sheets_url};
use dossier::core::briefing::{
    admin_overview, character_briefing, load_bootstrap_config, save_bootstrap_config,
    BriefingService, CharacterBriefing, EventConfig, FileSettingsStore, GroupedDocuments,
    SheetSource, Viewer,
};
use dossier::core::logging;
use dossier::tui::app::AppState;
use dossier::tui::text::plain_lines;

/// Default viewer when none is given: the organizer overview.
const EVERYONE: &str = "everyone";
/// Wrap width for bodies printed by `show`.
const TEXT_WIDTH: usize = 78;

#[derive(Parser, Debug)]
#[command(name = "dossier")]
#[command(about = "Dossier - per-character LARP briefings from a published spreadsheet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Character code to open, or `everyone` for the overview
    viewer: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a briefing to stdout
    Show {
        /// Character code, or `everyone` for the overview
        viewer: Option<String>,
    },
    /// Store the published spreadsheet URL
    SetUrl {
        /// Spreadsheet link in export, edit or gid form
        url: String,
    },
    /// Rewrite the stored URL into export form
    FixUrl,
}

fn viewer(arg: Option<&str>) -> Viewer {
    Viewer::parse(arg.unwrap_or(EVERYONE))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load();
    let store = FileSettingsStore::in_dir(&config.data_dir());

    match cli.command {
        Some(Command::SetUrl { url: raw }) => {
            let _log_guard = logging::init(&config.log_dir());
            let mut bootstrap = load_bootstrap_config(&store);
            bootstrap.sheets_url = normalize_sheets_url(&raw).unwrap_or(raw);
            save_bootstrap_config(&store, &bootstrap)?;
            tracing::info!(url = %bootstrap.sheets_url, "Saved spreadsheet URL");
            Ok(())
        }
        Some(Command::FixUrl) => {
            let _log_guard = logging::init(&config.log_dir());
            let mut bootstrap = load_bootstrap_config(&store);
            if !needs_url_fix(&bootstrap.sheets_url) {
                tracing::info!("Spreadsheet URL is already in export form");
                return Ok(());
            }
            match normalize_sheets_url(&bootstrap.sheets_url) {
                Some(fixed) => {
                    bootstrap.sheets_url = fixed;
                    save_bootstrap_config(&store, &bootstrap)?;
                    tracing::info!(url = %bootstrap.sheets_url, "Fixed spreadsheet URL");
                }
                None => tracing::warn!(
                    url = %bootstrap.sheets_url,
                    "No spreadsheet id in the stored URL, use set-url instead"
                ),
            }
            Ok(())
        }
        Some(Command::Show { viewer: arg }) => {
            let viewer = viewer(arg.as_deref());
            let _log_guard = logging::init(&config.log_dir());
            let bootstrap = load_bootstrap_config(&store);
            let service = build_service(&config, &bootstrap);
            let state = service.refresh().await;

            if let Some(advisory) = state.advisory {
                println!("! {advisory}\n");
            }
            match &viewer {
                Viewer::Everyone => {
                    let overview = admin_overview(&state, &bootstrap);
                    println!("{}", overview.config.title);
                    println!(
                        "{} characters, {} documents, last update {}, run {}",
                        overview.stats.total_characters,
                        overview.stats.total_documents,
                        overview.stats.last_update,
                        overview.stats.run_info
                    );
                    for (group, characters) in &overview.roster {
                        println!("\n{group} ({})", characters.len());
                        for character in characters {
                            println!("  {} [{}]", character.name, character.slug);
                        }
                    }
                    print_documents(&overview.broadcast);
                }
                Viewer::Character(slug) => match character_briefing(&state, &bootstrap, slug) {
                    CharacterBriefing::Found(dossier) => {
                        println!("{}", dossier.config.title);
                        println!("{} ({})", dossier.character.name, dossier.character.group);
                        if let Some(profile) = &dossier.profile {
                            println!("\n{}", profile.title);
                            for line in plain_lines(&profile.body, TEXT_WIDTH) {
                                println!("  {line}");
                            }
                        }
                        print_documents(&dossier.documents);
                    }
                    CharacterBriefing::NotFound { slug } => {
                        eprintln!("Character not found: {slug}");
                        std::process::exit(1);
                    }
                },
            }
            Ok(())
        }
        None => {
            let _log_guard = logging::init_tui(&config.log_dir());
            tracing::info!("{} v{} starting", dossier::NAME, dossier::VERSION);
            let bootstrap = load_bootstrap_config(&store);
            let service = build_service(&config, &bootstrap);
            let mut app = AppState::new(viewer(cli.viewer.as_deref()), bootstrap, service);
            app.refresh_after(config.source.refresh_delay());

            // Setup terminal
            enable_raw_mode()?;
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;

            let result = app.run(&mut terminal, config.tui.tick_rate()).await;

            // Restore terminal
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn build_service(config: &AppConfig, bootstrap: &EventConfig) -> BriefingService<SheetSource> {
    let source = SheetSource::new(&bootstrap.sheets_url, config.source.fetch_timeout());
    BriefingService::with_demo_data(source, bootstrap)
}

fn print_documents(documents: &GroupedDocuments) {
    for (kind, docs) in documents {
        println!("\n== {} ==", kind.label());
        for doc in docs {
            println!("\n{}  ({})", doc.title, doc.published_at);
            for line in plain_lines(&doc.body, TEXT_WIDTH) {
                println!("  {line}");
            }
        }
    }
}
