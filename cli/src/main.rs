use std::path::PathBuf;

use clap::{Parser, Subcommand};
use syllabus::error::{AppError, AppResult};
use syllabus::model::entity::{DraftRecord, DraftRecordCreate};
use syllabus::model::{CrudRepository, DatabaseError, DbConnection, ModelManager, PaginatableRepository};
use syllabus::web::AuthenticatedUser;
use syllabus::wizard::CourseDraft;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for inspecting and seeding saved course drafts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage saved drafts
    Draft {
        #[command(subcommand)]
        action: DraftCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// List saved drafts, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Print the curriculum outline of a saved draft
    Show {
        #[arg(long)]
        id: Uuid,
    },

    /// Store a draft from a JSON file. The curriculum is repaired and checked first.
    Import {
        /// Path to the draft JSON
        #[arg(long)]
        file: PathBuf,
        /// Instructor that will own the draft
        #[arg(long)]
        owner: Uuid,
    },

    /// Delete a saved draft
    Delete {
        #[arg(long)]
        id: Uuid,
    },

    /// Write a saved draft as JSON
    Export {
        #[arg(long)]
        id: Uuid,
        /// Output file, stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

async fn fetch(mm: &ModelManager, actor: &AuthenticatedUser, id: Uuid) -> AppResult<DraftRecord> {
    DraftRecord::find_by_id(mm, actor, id)
        .await?
        .ok_or(AppError::DraftNotFound(id))
}

fn print_outline(draft: &CourseDraft) {
    let basics = draft.basics();
    let title = if basics.title.is_empty() { "(untitled)" } else { basics.title.as_str() };
    println!("{} [{}]", title, draft.id());

    let curriculum = draft.curriculum();
    println!(
        "{} sections, {} lectures, {} min",
        curriculum.sections().len(),
        curriculum.lecture_count(),
        curriculum.total_duration()
    );

    for section in curriculum.sections() {
        println!("{}. {} ({} min)", section.order() + 1, section.title(), section.total_duration());
        for lecture in section.lectures() {
            let preview = if lecture.is_preview() { " preview" } else { "" };
            println!(
                "   {}.{} {} [{}, {} min{}]",
                section.order() + 1,
                lecture.order() + 1,
                lecture.title(),
                lecture.kind(),
                lecture.duration(),
                preview
            );
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let url = std::env::var("DATABASE_URL").map_err(|_| AppError::MissingEnv("DATABASE_URL"))?;
    let mm = ModelManager::new(DbConnection::connect(&url)?);
    let admin = AuthenticatedUser::admin();

    match args.command {
        Commands::Draft { action } => match action {
            DraftCommands::List { limit, offset } => {
                let page = DraftRecord::page(&mm, &admin, limit, offset).await?;
                println!("{} saved drafts", page.total);
                for record in page.items {
                    println!("{}  {}  {}", record.id(), record.updated_at(), record.title());
                }
            }

            DraftCommands::Show { id } => {
                let record = fetch(&mm, &admin, id).await?;
                print_outline(&record.draft()?);
            }

            DraftCommands::Import { file, owner } => {
                let bytes = std::fs::read(file)?;
                let draft: CourseDraft = serde_json::from_slice(&bytes)?;
                let draft = draft.into_verified().map_err(DatabaseError::from)?;

                let record = DraftRecord::save(&mm, &admin, DraftRecordCreate::new(owner, draft)).await?;
                println!("Draft stored: {}", record.id());
            }

            DraftCommands::Delete { id } => {
                fetch(&mm, &admin, id).await?.delete(&mm, &admin).await?;
                println!("Draft deleted: {id}");
            }

            DraftCommands::Export { id, out } => {
                let record = fetch(&mm, &admin, id).await?;
                let json = serde_json::to_string_pretty(&record.draft()?)?;
                match out {
                    Some(path) => std::fs::write(path, json)?,
                    None => println!("{json}"),
                }
            }
        },
    }

    Ok(())
}
