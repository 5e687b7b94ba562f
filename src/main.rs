use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use vocab_trainer::app::{run_quiz, write_stats};
use vocab_trainer::config::DEFAULT_CONFIG_PATH;
use vocab_trainer::export::{export_json_to_path, import_json};
use vocab_trainer::models::{EntryFields, VocabularyData, vocabulary_overview};
use vocab_trainer::*;

#[derive(Parser)]
#[command(name = "vocab", version, about = "Vocabulary trainer with SM-2 spaced repetition")]
struct Cli {
    /// Settings file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and add sample entries if it is empty
    Init,

    /// Add a vocabulary entry
    Add {
        term: String,
        translation: String,
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Delete an entry by id
    Delete { id: String },

    /// List all entries
    List,

    /// Show learning statistics
    Stats,

    /// List due entries, most urgent first
    Due,

    /// Start a quiz
    Quiz {
        /// due, new, review or random
        #[arg(long, default_value = "due")]
        mode: SessionMode,

        /// forward, reverse or random (overrides the settings file)
        #[arg(long)]
        direction: Option<DirectionSetting>,

        /// Entries per quiz (overrides the settings file)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Move the trainer's clock forward by one day
    AdvanceDay,

    /// Replace the collection with the contents of a JSON file
    Import { file: PathBuf },

    /// Write the collection to a JSON file
    Export { file: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vocab_trainer=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let mut db = Database::open(&config.storage.database)?;
    let now = db.current_date()?;

    match cli.command {
        Commands::Init => {
            if db.count()? == 0 {
                let mut set = VocabularySet::default();
                for (term, translation) in [("ciao", "hallo"), ("grazie", "danke"), ("per favore", "bitte")] {
                    set.add(EntryFields {
                        term: term.to_string(),
                        translation: translation.to_string(),
                        ..EntryFields::default()
                    })?;
                }
                db.save_all(&set.cards)?;
                println!("Sample data created!");
            }
            if !cli.config.exists() {
                config.save(&cli.config)?;
            }
            println!("Loaded {} entries from {}", db.count()?, config.storage.database.display());
        }
        Commands::Add {
            term,
            translation,
            notes,
            tags,
        } => {
            let mut set = VocabularySet::from_cards(db.load_all()?);
            let card = set
                .add(EntryFields {
                    term,
                    translation,
                    notes,
                    tags,
                })?
                .clone();
            db.upsert(&card)?;
            println!("Added {} ({})", card.term, card.id);
        }
        Commands::Delete { id } => {
            db.delete(&id)?;
            println!("Deleted {id}");
        }
        Commands::List => {
            for card in db.load_all()? {
                println!(
                    "{}  {} = {}  [reps {}, EF {:.2}]",
                    card.id, card.term, card.translation, card.sm2.repetitions, card.sm2.ease_factor
                );
            }
        }
        Commands::Stats => {
            let cards = db.load_all()?;
            write_stats(
                &mut io::stdout(),
                &get_learning_stats(&cards, now),
                &vocabulary_overview(&cards, now),
                now,
            )?;
        }
        Commands::Due => {
            let cards = db.load_all()?;
            for card in sort_by_priority(&get_due_items(&cards, now), now) {
                let next = card
                    .sm2
                    .next_review
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "new".to_string());
                println!("{}  {} = {}  ({next})", card.id, card.term, card.translation);
            }
        }
        Commands::Quiz {
            mode,
            direction,
            count,
        } => {
            let mut settings = config.quiz;
            if let Some(direction) = direction {
                settings.direction = direction;
            }
            if let Some(count) = count {
                settings.words_per_quiz = count.max(1);
            }

            let cards = db.load_all()?;
            let mut rng = rand::thread_rng();
            let queue = build_session(&cards, mode, &settings, now, &mut rng);
            info!(?mode, queued = queue.len(), "starting quiz");

            let summary = run_quiz(
                LearningSession::new(queue),
                &mut db,
                &mut io::stdin().lock(),
                &mut io::stdout(),
                settings.direction,
                now,
                &mut rng,
            )?;
            info!(
                reviewed = summary.reviewed,
                correct = summary.correct,
                aborted = summary.aborted,
                "quiz finished"
            );
        }
        Commands::AdvanceDay => {
            let date = db.advance_day()?;
            println!("Current date: {}", date.format("%Y-%m-%d"));
        }
        Commands::Import { file } => {
            let data = import_json(&file)?;
            db.save_all(&data.cards)?;
            println!("Imported {} entries from {}", data.cards.len(), file.display());
        }
        Commands::Export { file } => {
            let data = VocabularyData::new("vocabulary", db.load_all()?, now);
            export_json_to_path(&data, &file)?;
            println!("Exported {} entries to {}", data.cards.len(), file.display());
        }
    }

    Ok(())
}
