mod echo;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use quge_core::{
    AssembleConfig, Assembler, Book, BookWriter, Chapter, EpubWriter, FetchConfig, HttpFetcher, JsonWriter,
    OutputFormat, SiteRegistry, TextWriter, classify, output_file_name, write_book,
};
use tracing_subscriber::EnvFilter;
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Download a serialized novel from a biquge-family site as an e-book
#[derive(Parser, Debug)]
#[command(name = "quge")]
#[command(author = "Quge Contributors")]
#[command(version)]
#[command(about = "Download serialized novels from biquge-family sites as e-books", long_about = None)]
struct Args {
    /// Table-of-contents URL of the book
    #[arg(value_name = "URL", required_unless_present = "list_sites")]
    url: Option<String>,

    /// Output file (default: book title plus extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (epub, text, json)
    #[arg(short, long, default_value = "epub", value_name = "FORMAT")]
    format: OutputFormat,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "60", value_name = "SECS")]
    timeout: u64,

    /// Attempts per page before giving up
    #[arg(long, default_value = "3", value_name = "N")]
    retries: u32,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Chapter pages fetched concurrently
    #[arg(short = 'j', long, default_value = "1", value_name = "N")]
    concurrency: usize,

    /// Only check whether the URL belongs to a supported site
    #[arg(long)]
    check: bool,

    /// List supported sites and exit
    #[arg(long)]
    list_sites: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "quge=debug" } else { "quge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn write_output(book: &Book, format: OutputFormat, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let sink = BufWriter::new(file);

    let mut writer: Box<dyn BookWriter> = match format {
        OutputFormat::Epub => Box::new(EpubWriter::new(sink)),
        OutputFormat::Text => Box::new(TextWriter::new(sink)),
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
    };

    write_book(book, writer.as_mut()).with_context(|| format!("Failed to write to file: {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let registry = SiteRegistry::builtin().context("Failed to load site profiles")?;

    if args.list_sites {
        for host in registry.hosts() {
            println!("{}", host);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let url = args.url.context("No URL given")?;

    if args.check {
        return match classify(&registry, &url) {
            Some(profile) => {
                echo::print_success(&format!("Supported site: {}", profile.host.bright_white()));
                Ok(ExitCode::SUCCESS)
            }
            None => {
                echo::print_error(&format!("Unsupported URL: {}", url));
                Ok(ExitCode::FAILURE)
            }
        };
    }

    if classify(&registry, &url).is_none() {
        let host = Url::parse(&url).ok().and_then(|u| u.host_str().map(str::to_string));
        anyhow::bail!("Unsupported site: {}", host.as_deref().unwrap_or(&url));
    }

    let fetch_config = FetchConfig {
        timeout: args.timeout,
        retries: args.retries,
        user_agent: args.user_agent.unwrap_or_else(|| FetchConfig::default().user_agent),
    };
    let assemble_config = AssembleConfig::builder().concurrency(args.concurrency).build();

    if args.verbose {
        echo::print_step(1, 2, &format!("Fetching {}", url.bright_white().underline()));
    }

    let started = Instant::now();
    let fetcher = HttpFetcher::new(fetch_config).context("Failed to build HTTP client")?;
    let progress = |index: usize, total: usize, chapter: &Chapter| {
        echo::print_chapter(index, total, &chapter.title, chapter.body.len());
    };

    let book = Assembler::new(&registry, &fetcher)
        .with_config(assemble_config)
        .with_fetch_config(fetcher.config().clone())
        .on_chapter(&progress)
        .assemble(&url)
        .await
        .context("Failed to fetch table of contents")?;

    let empty = book.empty_chapters().count();
    if empty > 0 {
        echo::print_warning(&format!("{} of {} chapters came back empty", empty, book.chapters.len()));
    }

    let path = args.output.unwrap_or_else(|| PathBuf::from(output_file_name(&book.title, args.format)));

    if args.verbose {
        echo::print_step(2, 2, &format!("Writing {:?} to {}", args.format, path.display()));
    }

    tracing::debug!(path = %path.display(), format = ?args.format, chapters = book.chapters.len(), "writing book");
    write_output(&book, args.format, &path)?;

    if args.verbose {
        echo::print_book_summary(&book, started.elapsed());
    }

    echo::print_success(&format!("Book written to {}", path.display().bright_white()));
    Ok(ExitCode::SUCCESS)
}
