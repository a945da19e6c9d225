mod args;
mod terminal;

use services::session::{flashcard_deck, lesson_exercises};
use services::{Catalog, LogSpeaker, QuizPlanBuilder, TimedSession, VocabFilter};
use study_core::model::SessionOptions;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{Args, Command, print_usage};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,services=debug,app=debug"));

    // stdout belongs to the study prompt
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_catalog(args: &Args) -> Result<Catalog, Box<dyn std::error::Error>> {
    match &args.catalog {
        Some(path) => Ok(Catalog::load(path)?),
        None => {
            let catalog = Catalog::from_json_str(SAMPLE_CATALOG)?;
            info!(
                vocabulary = catalog.vocabulary().len(),
                questions = catalog.questions().len(),
                "using built-in sample catalog"
            );
            Ok(catalog)
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let Some(parsed) = parsed else {
        print_usage();
        return Ok(());
    };

    let catalog = load_catalog(&parsed)?;
    let speaker = LogSpeaker;

    match parsed.command {
        Command::Flashcards { level, search } => {
            let mut filter = VocabFilter::new().with_level(level);
            if let Some(term) = search {
                filter = filter.with_search(term);
            }
            let deck = flashcard_deck(&catalog, &filter)?;
            info!(cards = deck.len(), "starting flashcards");
            let timed = TimedSession::start(deck, SessionOptions::flashcards())?;
            terminal::run(timed, &speaker).await?;
        }
        Command::Quiz { settings, shuffle } => {
            let plan = QuizPlanBuilder::new(&settings)
                .with_shuffle(shuffle)
                .build(catalog.questions())?;
            info!(
                questions = plan.total(),
                matched = plan.matched,
                time_limit_secs = ?settings.time_limit_secs(),
                "starting quiz"
            );
            let timed = TimedSession::start(plan.questions, settings.session_options())?;
            terminal::run(timed, &speaker).await?;
        }
        Command::Lesson { lesson_id } => {
            let exercises = lesson_exercises(&catalog, lesson_id)?;
            info!(lesson = %lesson_id, exercises = exercises.len(), "starting lesson");
            let timed = TimedSession::start(exercises, SessionOptions::lesson_exercise())?;
            terminal::run(timed, &speaker).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
