use clap::{Parser, Subcommand, Args, ValueEnum};
use docsearch::prelude::*;
use docsearch::{query_string, render};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Doctor directory CLI - search, filter, and share views of a doctor catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and sort doctors, printing results and a shareable query string
    Search(SearchArgs),
    /// Show autocomplete suggestions for a name fragment
    Suggest(SuggestArgs),
    /// List the distinct specialties in the catalog
    Specialties(SourceArgs),
    /// Show summary statistics for the catalog
    Stats(SourceArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Catalog endpoint URL (overrides configuration)
    #[arg(long)]
    endpoint: Option<String>,
    /// Read the catalog from a local JSON file instead of the endpoint
    #[arg(long, conflicts_with = "endpoint")]
    catalog_file: Option<PathBuf>,
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Initial query string or page URL, e.g. "?search=rao&sortBy=fees"
    #[arg(long)]
    query: Option<String>,
    /// Name search term
    #[arg(long)]
    search: Option<String>,
    /// Consultation mode
    #[arg(long, value_enum)]
    consultation: Option<ConsultationOpt>,
    /// Specialty to include (repeatable, any-of)
    #[arg(long = "specialty")]
    specialties: Vec<String>,
    /// Sort order
    #[arg(long, value_enum)]
    sort: Option<SortOpt>,
    /// Limit number of results printed
    #[arg(long)]
    limit: Option<usize>,
    /// Output format (defaults to the configured format)
    #[arg(long, value_enum)]
    format: Option<FormatOpt>,
    /// Write results to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also print the filter panel
    #[arg(long)]
    panel: bool,
}

#[derive(Args)]
struct SuggestArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Text typed into the search box
    text: String,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ConsultationOpt {
    Video,
    Clinic,
    All,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SortOpt {
    Fees,
    Experience,
    None,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatOpt {
    Text,
    Json,
    Jsonl,
    Csv,
}

fn main() {
    if let Err(e) = docsearch::logging::init() {
        eprintln!("Warning: {}", e);
    }

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Search(args) => cmd_search(args),
        Commands::Suggest(args) => cmd_suggest(args),
        Commands::Specialties(args) => cmd_specialties(args),
        Commands::Stats(args) => cmd_stats(args),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

fn load_config(args: &SourceArgs) -> Result<DirectoryConfig> {
    let mut config = match &args.config {
        Some(path) => DirectoryConfig::from_file(path)?,
        None => DirectoryConfig::load(),
    };
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

fn load_catalog(args: &SourceArgs, config: &DirectoryConfig) -> Result<Catalog> {
    if let Some(path) = &args.catalog_file {
        tracing::info!(path = %path.display(), "reading doctor catalog");
        return Catalog::from_path(path);
    }

    let loader = CatalogLoader::from_config(config);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(loader.fetch())
}

fn cmd_search(args: SearchArgs) -> Result<()> {
    let config = load_config(&args.source)?;

    let page = docsearch::constants::DEFAULT_PAGE_URL;
    let url = match args.query.as_deref() {
        Some(q) if q.starts_with("http://") || q.starts_with("https://") => {
            url::Url::parse(q).map_err(|e| DirectoryError::Custom {
                message: format!("Invalid page URL '{}': {}", q, e),
                suggestion: Some("Pass a full URL or just the query string, e.g. \"?search=rao\"".to_string()),
            })?
        }
        Some(q) => {
            let mut url = url::Url::parse(page).map_err(|e| DirectoryError::Custom {
                message: e.to_string(),
                suggestion: None,
            })?;
            let q = q.trim_start_matches('?');
            url.set_query((!q.is_empty()).then_some(q));
            url
        }
        None => url::Url::parse(page).map_err(|e| DirectoryError::Custom {
            message: e.to_string(),
            suggestion: None,
        })?,
    };

    let mut session = DirectorySession::with_suggestion_limit(url, config.suggestion_limit);
    session.catalog_loaded(load_catalog(&args.source, &config));

    if let Some(term) = args.search {
        session.set_search_term(term);
    }
    if let Some(consultation) = args.consultation {
        session.set_consultation_type(match consultation {
            ConsultationOpt::Video => ConsultationType::VideoConsult,
            ConsultationOpt::Clinic => ConsultationType::InClinic,
            ConsultationOpt::All => ConsultationType::None,
        });
    }
    for specialty in &args.specialties {
        session.toggle_specialty(specialty, true);
    }
    if let Some(sort) = args.sort {
        session.set_sort_by(match sort {
            SortOpt::Fees => SortBy::Fees,
            SortOpt::Experience => SortBy::Experience,
            SortOpt::None => SortBy::None,
        });
    }

    let view = match session.view() {
        View::Loading => {
            return Err(DirectoryError::Custom {
                message: "Catalog is still loading".to_string(),
                suggestion: None,
            })
        }
        View::Error(message) => {
            return Err(DirectoryError::Custom {
                message: message.to_string(),
                suggestion: Some("Run with RUST_LOG=debug for details".to_string()),
            })
        }
        View::Ready(view) => view,
    };

    let format = match args.format {
        Some(FormatOpt::Text) => OutputFormat::Text,
        Some(FormatOpt::Json) => OutputFormat::Json,
        Some(FormatOpt::Jsonl) => OutputFormat::JsonLines,
        Some(FormatOpt::Csv) => OutputFormat::Csv,
        None => config.default_output_format,
    };

    let mut results = view.results;
    let total = results.len();
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }
    let cards = render::cards(&results, &config.placeholder_photo);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    if args.panel && format == OutputFormat::Text {
        writeln!(out, "{}", render::render_filter_panel(view.specialties, view.state))?;
    }
    render::exporter_for(format).export(&cards, &mut out)?;
    out.flush()?;
    drop(out);

    if let Some(path) = &args.output {
        println!("Exported {} doctors to {}", cards.len(), path.display());
    }
    if format == OutputFormat::Text || args.output.is_some() {
        println!("Total matches: {}", total);
        println!("Query: ?{}", query_string::encode(view.state));
    }
    Ok(())
}

fn cmd_suggest(args: SuggestArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let catalog = load_catalog(&args.source, &config)?;

    let mut search = SearchBox::with_limit(config.suggestion_limit);
    search.input_changed(catalog.records(), args.text.as_str());
    for doctor in search.visible_suggestions(catalog.records()) {
        let specialties = doctor.specialty_display();
        if specialties.is_empty() {
            println!("{}", doctor.display_name());
        } else {
            println!("{} | {}", doctor.display_name(), specialties);
        }
    }
    Ok(())
}

fn cmd_specialties(args: SourceArgs) -> Result<()> {
    let config = load_config(&args)?;
    let catalog = load_catalog(&args, &config)?;
    for specialty in catalog.specialties() {
        println!("{}", specialty);
    }
    Ok(())
}

fn cmd_stats(args: SourceArgs) -> Result<()> {
    let config = load_config(&args)?;
    let catalog = load_catalog(&args, &config)?;
    catalog.statistics().print_summary();
    Ok(())
}
