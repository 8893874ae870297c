use std::path::PathBuf;

use clap::Parser;
use quiz_maker::{DEFAULT_TOPICS_PATH, Quiz, QuizError, logging};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON catalog listing the available topics
    #[arg(short, long, default_value = DEFAULT_TOPICS_PATH)]
    topics: PathBuf,

    /// Directory holding the question files; defaults to the catalog's directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Append log records to this file
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

async fn run(args: Args) -> Result<(), QuizError> {
    logging::init(args.log_file.as_deref())?;
    let quiz = Quiz::from_catalog(&args.topics, args.data_dir)?;
    quiz.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
