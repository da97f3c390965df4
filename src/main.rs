use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod cli;

#[derive(Parser)]
#[command(name = "verifyd")]
#[command(about = "Search listings and read reviews on Verifyd Trust", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest entities matching a query
    Search {
        /// Free-text query
        query: String,
        /// Maximum suggestions (1-5)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show each reviewer's current review of an entity
    Reviews {
        entity_id: Uuid,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the rating distribution of an entity
    Stats {
        entity_id: Uuid,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Upvote or downvote a review (repeat to remove the vote)
    Vote {
        review_id: Uuid,
        /// Voting user
        #[arg(short, long)]
        user: Uuid,
        direction: Direction,
    },
    /// Show the resolved configuration
    Config,
    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) | None => {
            println!("verifyd {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Search { query, limit }) => {
            cli::browse::cmd_search(&query, limit).await?;
        }
        Some(Commands::Reviews { entity_id, json }) => {
            cli::browse::cmd_reviews(entity_id, json).await?;
        }
        Some(Commands::Stats { entity_id, json }) => {
            cli::browse::cmd_stats(entity_id, json).await?;
        }
        Some(Commands::Vote {
            review_id,
            user,
            direction,
        }) => {
            let kind = match direction {
                Direction::Up => verifyd::model::VoteKind::Upvote,
                Direction::Down => verifyd::model::VoteKind::Downvote,
            };
            cli::vote::cmd_vote(review_id, user, kind).await?;
        }
        Some(Commands::Config) => {
            cli::common::cmd_config()?;
        }
    }

    Ok(())
}
