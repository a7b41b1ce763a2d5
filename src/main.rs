use alchemist_page::config::{self, PageConfig};
use alchemist_page::content::{self, Content};
use alchemist_page::page::Page;
use alchemist_page::sim::{RecordingNotifier, SimEnv, SimulatedViewport, VirtualClock};
use alchemist_page::{generate, output, script};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        let dirty = if env!("GIT_DIRTY") == "true" { "+dirty" } else { "" };
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}{dirty}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "alchemist-page")]
#[command(about = "Marketing page for The Alchemist Dine & Wine")]
#[command(long_about = "\
Marketing page for The Alchemist Dine & Wine

Renders the single-page site and drives its interactive state (review
rotation, scroll-aware navigation, menu tabs, mobile menu, reservation form)
in a deterministic simulated browser.

Source directory:

  site/
  ├── config.toml      # Timings, thresholds, colors (optional)
  └── content.toml     # Replaces the built-in restaurant content (optional)

Session scripts (simulate):

  tick 6000                  # advance the clock
  scroll 120                 # scroll the viewport
  toggle-nav                 # hamburger button
  navigate menu              # nav link
  select-category 2          # menu tab
  select-review 4            # review dot
  edit name Jane Doe         # form input
  submit                     # form submit
  unmount / mount            # leave and re-enter the page

Run 'alchemist-page gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory (config.toml, content.toml)
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the page in its initial state
    Build,
    /// Replay a session script against the page and print a state trace
    Simulate {
        /// Script file, one step per line
        script: PathBuf,
        /// Print JSON lines instead of the text trace
        #[arg(long)]
        json: bool,
        /// Write the page as rendered after the last step to this file
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Simulated viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport: f64,
    },
    /// Validate config and content without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let page = load_page(&cli.source)?;
            let index = generate::generate(&cli.output, &page.render_context())?;
            output::print_build_output(&index);
        }
        Command::Simulate {
            script,
            json,
            snapshot,
            viewport,
        } => {
            let page = load_page(&cli.source)?;
            let steps = script::load_script(&script)?;
            let sim = SimEnv {
                clock: VirtualClock::new(),
                viewport: SimulatedViewport::with_layout(
                    viewport,
                    alchemist_page::sim::default_layout(),
                ),
                notifier: RecordingNotifier::new(),
            };
            let trace = script::run_script(&page, &sim, &steps);

            if json {
                output::print_trace_json(&trace)?;
            } else {
                output::print_trace(&trace, page.content().reviews.len(), page.content().menu.len());
            }

            if let Some(path) = snapshot {
                write_snapshot(&path, &page)?;
                if !json {
                    println!("Snapshot → {}", path.display());
                }
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let content = content::load_content(&cli.source)?;
            output::print_check_output(&content, &config);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_page(source: &Path) -> Result<Page, Box<dyn std::error::Error>> {
    let config: PageConfig = config::load_config(source)?;
    let content: Content = content::load_content(source)?;
    Ok(Page::new(content, config))
}

fn write_snapshot(path: &Path, page: &Page) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let html = generate::render_page(&page.render_context()).into_string();
    std::fs::write(path, html)
}
