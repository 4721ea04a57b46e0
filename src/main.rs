use clap::{Parser, Subcommand};
use sheetfolio::loader::{FileTransport, HttpTransport, Loader, Transport};
use sheetfolio::page::{self, Request};
use sheetfolio::{config, generate, output};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetfolio")]
#[command(about = "Static portfolio site generator backed by a spreadsheet")]
#[command(long_about = "\
Static portfolio site generator backed by a spreadsheet

One published CSV is the data source. Each row is a post; the header row
names the columns.

Recognized columns:

  id            Post identifier, used in post/<id>.html
  collection    Gallery the post belongs to
  show          'y' or 'Y' publishes the row; anything else hides it
  prob          Weight for the random pick (default 2, 0 or less excludes)
  title         Post title
  description   Short text on cards and posts
  preview       Teaser line
  category      Meta line under the title (falls back to collection)
  embed         YouTube link, <iframe> snippet, bare URL, or raw HTML
  links         Comma-separated 'Label__https://...' or bare URLs
  tools         'Tools used' line
  content       Long-form Markdown
  pic1, cap1…   Image sequence and captions, ends at the first empty picN
  image_main    Gallery card thumbnail

Run 'sheetfolio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Read records from a local CSV file instead of source.url
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the sheet and write records.json to the output directory
    Fetch,
    /// Load the sheet and print what would be published
    Check,
    /// Render one page to stdout, e.g. 'post.html?id=alpha'
    Render {
        /// Site-relative page URL
        url: String,
    },
    /// Print a weighted-random visible post id
    Random,
    /// Build the full static site
    Build,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheetfolio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Fetch => {
            let (site_config, loader) = load(&cli)?;
            let records = loader.load()?;
            std::fs::create_dir_all(&cli.output)?;
            let path = cli.output.join("records.json");
            let json = serde_json::to_string_pretty(records)?;
            std::fs::write(&path, json)?;
            output::print_records_output(records, &site_config);
            println!("==> Wrote {}", path.display());
        }
        Command::Check => {
            let (site_config, loader) = load(&cli)?;
            let records = loader.load()?;
            output::print_records_output(records, &site_config);
            println!("==> Sheet is valid");
        }
        Command::Render { url } => {
            let (site_config, loader) = load(&cli)?;
            let rendered = generate::render_route(&loader, &Request::parse(url), &site_config);
            println!("{}", rendered.markup.into_string());
            if let Some(err) = rendered.error {
                return Err(err.into());
            }
        }
        Command::Random => {
            let (_, loader) = load(&cli)?;
            println!("{}", page::random(loader.load()?)?);
        }
        Command::Build => {
            let (site_config, loader) = load(&cli)?;
            println!("==> Building {}", cli.output.display());
            let summary = generate::build(&loader, &site_config, &cli.output)?;
            output::print_build_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

type SheetLoader = Loader<Box<dyn Transport>>;

/// Load config.toml and set up the loader: a local file when `--csv` is
/// given, otherwise the configured URL.
fn load(cli: &Cli) -> Result<(config::SiteConfig, SheetLoader), Box<dyn std::error::Error>> {
    let site_config = config::load_config(&cli.config)?;
    let transport: Box<dyn Transport> = match &cli.csv {
        Some(path) => Box::new(FileTransport::new(path.clone())),
        None => {
            site_config.source.require_url()?;
            Box::new(HttpTransport::from_config(&site_config.source)?)
        }
    };
    info!(source = %transport.describe(), "using sheet");
    Ok((site_config, Loader::new(transport)))
}
