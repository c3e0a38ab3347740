use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use map_core::{aggregate, Column, JourneyTree, PerformerFilter, PerformerRegistry};
use shared::{domain::PerformerId, persist};

#[derive(Parser, Debug)]
#[command(about = "Inspect and convert journey map documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print stage/task/step counts for a map document.
    Summary { file: PathBuf },
    /// Run the grid aggregation and print columns and spans.
    Grid {
        file: PathBuf,
        /// Filter to these performer ids (repeatable).
        #[arg(long = "performer")]
        performers: Vec<String>,
        /// Include steps with no resolvable performer.
        #[arg(long)]
        unassigned: bool,
        /// Emit the layout as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a legacy document in the normalized current shape.
    Normalize { input: PathBuf, output: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Summary { file } => {
            let document = read_document(&file)?;
            let tree = JourneyTree::from_stages(document.stages);
            println!(
                "{}: {} performers, {} stages, {} tasks, {} steps",
                file.display(),
                document.performers.len(),
                tree.stages().len(),
                tree.stages().iter().map(|stage| stage.tasks.len()).sum::<usize>(),
                tree.step_count(),
            );
            for stage in tree.stages() {
                println!("  {} ({} tasks)", stage.name, stage.tasks.len());
                for task in &stage.tasks {
                    println!("    {} ({} steps)", task.name, task.steps.len());
                }
            }
        }
        Command::Grid {
            file,
            performers,
            unassigned,
            json,
        } => {
            let document = read_document(&file)?;
            let registry = PerformerRegistry::with_performers(document.performers);
            let tree = JourneyTree::from_stages(document.stages);
            let filter = PerformerFilter {
                ids: performers.into_iter().map(PerformerId).collect(),
                include_unassigned: unassigned,
            };
            let layout = aggregate(&tree, &registry, &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                for span in &layout.stage_spans {
                    println!(
                        "stage '{}' start={} width={}",
                        span.stage_name, span.start, span.width
                    );
                }
                for span in &layout.task_spans {
                    println!(
                        "task {} start={} width={}",
                        span.task_id, span.start, span.width
                    );
                }
                for (index, column) in layout.columns.iter().enumerate() {
                    match column {
                        Column::Step {
                            step, performers, ..
                        } => {
                            let names: Vec<&str> =
                                performers.iter().map(|p| p.name.as_str()).collect();
                            println!(
                                "col {index}: step '{}' [{}]",
                                step.description,
                                names.join(", ")
                            );
                        }
                        Column::Placeholder { reason, .. } => {
                            println!("col {index}: placeholder ({reason:?})");
                        }
                    }
                }
            }
        }
        Command::Normalize { input, output } => {
            let document = read_document(&input)?;
            let rendered = persist::render_document(&document)
                .context("failed to serialize normalized document")?;
            fs::write(&output, rendered)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            println!("normalized {} -> {}", input.display(), output.display());
        }
    }

    Ok(())
}

fn read_document(path: &PathBuf) -> Result<persist::MapDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    persist::parse_document(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}
