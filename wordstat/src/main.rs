use anyhow::Result;
use clap::{Parser, Subcommand};
use cloud::{CloudOptions, DEFAULT_MAX_WORDS, DEFAULT_SIZE};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use wordstat::import::import_path;
use wordstat::{compute_tfidf, count_words, render_clouds, repoint, top_words_report, OutputFormat};
use wordstat_core::report::DEFAULT_TOP_N;
use wordstat_core::{Normalizer, SledStore};

#[derive(Parser)]
#[command(name = "wordstat")]
#[command(about = "Per-user word counts, TF-IDF and word clouds for archived chats", long_about = None)]
struct Cli {
    /// Corpus store directory
    #[arg(long, env = "WORDSTAT_DB", default_value = "./wordstat.db", global = true)]
    db: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive messages from JSON/JSONL dump files or a directory of them
    Import {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Chat id for records that do not carry one
        #[arg(long)]
        chat_id: Option<String>,
    },
    /// Count words per user and store the counters
    Count {
        #[arg(long)]
        chat_id: String,
    },
    /// Render one word cloud per user from the stored counters
    Cloud {
        #[arg(long)]
        chat_id: String,
        /// Output directory, removed and recreated on every run
        #[arg(long, default_value = "./output")]
        output: PathBuf,
        /// TrueType/OpenType font used for the words
        #[arg(long, env = "WORDSTAT_FONT")]
        font: Option<PathBuf>,
        /// Image width and height in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: u32,
        #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
        max_words: usize,
    },
    /// Compute TF-IDF per user from the stored counters
    TfIdf {
        #[arg(long)]
        chat_id: String,
    },
    /// Print the highest TF-IDF terms per user
    TopWords {
        #[arg(long)]
        chat_id: String,
        #[arg(short = 'n', long = "top", default_value_t = DEFAULT_TOP_N)]
        n: usize,
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Move every archived message from one chat id to another
    Repoint {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let store = SledStore::open(&cli.db)?;

    match cli.command {
        Commands::Import { input, chat_id } => {
            let stats = import_path(&store, &input, chat_id.as_deref())?;
            println!("imported {} messages from {} files ({} skipped)", stats.messages, stats.files, stats.skipped);
        }
        Commands::Count { chat_id } => {
            let normalizer = Normalizer::russian_english();
            count_words(&store, &normalizer, &chat_id)?;
        }
        Commands::Cloud { chat_id, output, font, size, max_words } => {
            let options = CloudOptions { size, max_words, font };
            let written = render_clouds(&store, &chat_id, &output, &options)?;
            println!("wrote {} images to {}", written.len(), output.display());
            if options.font.is_none() {
                println!("no font given (--font or WORDSTAT_FONT), words were drawn as tiles");
            }
        }
        Commands::TfIdf { chat_id } => {
            compute_tfidf(&store, &chat_id)?;
        }
        Commands::TopWords { chat_id, n, format } => {
            print!("{}", top_words_report(&store, &chat_id, n, format)?);
        }
        Commands::Repoint { from, to } => {
            let moved = repoint(&store, &from, &to)?;
            println!("moved {moved} messages");
        }
    }
    store.flush()?;
    Ok(())
}
