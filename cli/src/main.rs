use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finquest::auth::{UserClaims, generate_token};
use finquest::course::Course;
use finquest::error::AppResult;
use finquest::utils::Clock;
use finquest::{Config, load_course, progress};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "Admin tool for the finquest course and progress data", long_about = None)]
pub struct Cli {
    /// Read ./config.toml instead of the per-user config
    #[arg(long, global = true)]
    pub local: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect the course catalog
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Mint development tokens
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Read learner progress from the configured store
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// Parse and validate a course file, the built-in course by default
    Validate {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print units, lessons and question points
    Show {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    Issue {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value_t = 24)]
        hours: i64,
        #[arg(long, default_value_t = false)]
        admin: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    Show {
        #[arg(long)]
        user: Uuid,
    },
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

fn read_course(file: Option<PathBuf>) -> AppResult<Course> {
    Ok(match file {
        Some(path) => Course::load(&path)?,
        None => Course::builtin()?,
    })
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    match args.command {
        Commands::Course { action } => match action {
            CourseCommands::Validate { file } => {
                let course = read_course(file)?;
                println!(
                    "Course is valid: {} units, {} lessons",
                    course.units().len(),
                    course.lesson_count()
                );
            }
            CourseCommands::Show { file } => {
                let course = read_course(file)?;
                for unit in course.units() {
                    println!("{} {} ({} xp)", unit.id(), unit.title(), unit.total_xp());
                    for lesson in unit.lessons() {
                        let lock = if lesson.unlocked_by_default() { "open" } else { "locked" };
                        println!(
                            "  {:<8} {:<40} {:>3} pts  {}",
                            lesson.id(),
                            lesson.title(),
                            lesson.total_points(),
                            lock
                        );
                        for q in lesson.questions() {
                            println!("    {:<12} {:<16} {:>3}", q.id(), q.kind().type_name(), q.points());
                        }
                    }
                }
            }
        },

        Commands::Token { action } => match action {
            TokenCommands::Issue { user, hours, admin } => {
                let config = Config::get_or_init(args.local).await;
                let mut claims = UserClaims::new(user, chrono::Duration::hours(hours));
                if admin {
                    claims = claims.with_role("admin");
                }
                match generate_token(&claims, config.app().jwt()) {
                    Ok(token) => println!("{token}"),
                    Err(e) => {
                        eprintln!("Unable to issue token: {e}");
                        std::process::exit(1);
                    }
                }
            }
        },

        Commands::Progress { action } => {
            let config = Config::get_or_init(args.local).await;
            let store = progress::open_store(config.storage(), Clock::System).await?;

            match action {
                ProgressCommands::Show { user } => {
                    let snapshot = store.load_progress(user).await?;
                    let course = load_course(config)?;
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&snapshot).unwrap_or_default()
                    );
                    println!(
                        "{} of {} lessons completed",
                        snapshot.completed_lesson_ids.len(),
                        course.lesson_count()
                    );
                }
                ProgressCommands::Leaderboard { limit } => {
                    let page = store.leaderboard(limit, 0).await?;
                    for entry in page.items {
                        println!(
                            "{:>3}. {} {:>6} xp  {} lessons  streak {}",
                            entry.rank,
                            entry.user_id,
                            entry.total_xp,
                            entry.lessons_completed,
                            entry.current_streak
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
