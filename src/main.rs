use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use attendance_calc::config::{self, AppConfig};
use attendance_calc::models::{ComponentSet, ImprovementPlan};
use attendance_calc::store::{HistoryLog, JsonFileStore, NoteBook};
use attendance_calc::{attendance, projection, report, weighted};

#[derive(Parser)]
#[command(name = "attendance-calc")]
#[command(about = "Attendance percentage calculators for university students", long_about = None)]
struct Cli {
    /// Directory holding saved history and notes
    #[arg(long, global = true, env = "ATTENDANCE_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Log calculation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attendance percentage for one subject
    Subject {
        #[arg(long, allow_hyphen_values = true)]
        total: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        attended: Option<String>,
    },
    /// Current standing, planned absences and classes needed for 85% and 75%
    Predict {
        #[arg(long, allow_hyphen_values = true)]
        total: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        attended: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        absences: Option<String>,
    },
    /// Weighted lecture/tutorial/practical/skilling attendance
    Ltps {
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, allow_hyphen_values = true)]
        lecture: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        tutorial: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        practical: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        skilling: Option<String>,
        /// Also write a markdown report
        #[arg(long)]
        report: bool,
        /// Report path, defaults to `<subject>-report.md`
        #[arg(long, requires = "report")]
        out: Option<PathBuf>,
    },
    /// Show saved L-T-P-S calculations
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Export the full history as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write a markdown summary report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Quick notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },
}

#[derive(Subcommand)]
enum NotesCommand {
    /// Save a note
    Add { text: String },
    /// List saved notes, newest first
    List,
    /// Delete a note by id
    Delete { id: Uuid },
}

fn print_plan(plan: &ImprovementPlan) {
    println!(
        "Current attendance: {}% ({})",
        plan.current.percentage, plan.current.status
    );
    println!("{}", plan.current.status.advice());

    if let (Some(projected), Some(absences)) = (plan.projected, plan.planned_absences) {
        let note = if projected.percentage >= 75 {
            "You're still on track!"
        } else {
            "Be careful with more absences!"
        };
        println!(
            "Projected with {absences} absences: {}% ({}). {note}",
            projected.percentage, projected.status
        );
    }

    println!("Improvement plan:");
    println!(
        "- To reach 85%, attend {} more classes consecutively.",
        plan.needed_for_excellent
    );
    println!(
        "- To reach 75% (minimum), attend {} more classes consecutively.",
        plan.needed_for_good
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir, cli.verbose);
    config::init_logging(&config);

    match cli.command {
        Commands::Subject { total, attended } => {
            let result = attendance::compute(total.as_deref(), attended.as_deref())?;
            println!("Your attendance is {}% ({})", result.percentage, result.status);
            println!("{}", result.status.advice());
        }
        Commands::Predict {
            total,
            attended,
            absences,
        } => {
            let plan = projection::plan(total.as_deref(), attended.as_deref(), absences.as_deref())?;
            print_plan(&plan);
        }
        Commands::Ltps {
            subject,
            lecture,
            tutorial,
            practical,
            skilling,
            report,
            out,
        } => {
            let components = ComponentSet::parse(
                lecture.as_deref(),
                tutorial.as_deref(),
                practical.as_deref(),
                skilling.as_deref(),
            )?;
            let result = weighted::compute(&components)?;

            let store = JsonFileStore::open(&config.data_dir)?;
            let saved_in = store.dir().display().to_string();
            let mut history = HistoryLog::new(store);
            let entry = history
                .record(&subject, &result)
                .context("failed to save calculation history")?;
            info!(subject = %entry.subject_label, percentage = %entry.percentage, "saved history entry");

            println!("Overall weighted attendance: {}%", result.percentage);
            println!("Status: {}", result.status);
            println!("Component breakdown:");
            for line in result.breakdown.iter() {
                println!("- {line}");
            }
            println!("Saved to history in {saved_in}.");

            if report {
                let path = out.unwrap_or_else(|| report::report_file_name(&subject));
                std::fs::write(&path, report::build_report(&subject, &result))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Report written to {}.", path.display());
            }
        }
        Commands::History { limit, csv, report } => {
            let history = HistoryLog::new(JsonFileStore::open(&config.data_dir)?);
            let entries = history.entries()?;

            if entries.is_empty() {
                println!("No calculations saved yet.");
            } else {
                println!("Recent calculations:");
                for entry in entries.iter().take(limit) {
                    println!(
                        "- {} ({}) {}% {}",
                        entry.subject_label,
                        entry.timestamp_display,
                        entry.percentage,
                        entry.status
                    );
                }
            }

            if let Some(path) = csv {
                report::export_history_csv(&path, &entries)?;
                println!("Exported {} entries to {}.", entries.len(), path.display());
            }
            if let Some(path) = report {
                std::fs::write(&path, report::build_history_report(&entries, limit))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Report written to {}.", path.display());
            }
        }
        Commands::Notes { command } => {
            let mut notes = NoteBook::new(JsonFileStore::open(&config.data_dir)?);
            match command {
                NotesCommand::Add { text } => match notes.add(&text)? {
                    Some(note) => println!("Saved note {}.", note.id),
                    None => println!("Nothing to save: note is empty."),
                },
                NotesCommand::List => {
                    let saved = notes.notes()?;
                    if saved.is_empty() {
                        println!("No notes yet.");
                    }
                    for note in saved {
                        println!("- [{}] {} ({})", note.id, note.text, note.date);
                    }
                }
                NotesCommand::Delete { id } => {
                    if notes.delete(id)? {
                        println!("Deleted note {id}.");
                    } else {
                        println!("No note with id {id}.");
                    }
                }
            }
        }
    }

    Ok(())
}
