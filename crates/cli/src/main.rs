use anyhow::Context;
use clap::{Parser, Subcommand};
use chart_core::{record_observation, recommend, PatientRegistry, ViralLoad};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;
mod shell;

#[derive(Parser)]
#[command(name = "chart")]
#[command(about = "HIV patient chart and treatment recommendation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the treatment recommendation for a viral load
    Recommend {
        /// Viral load (copies/mL)
        #[arg(allow_negative_numbers = true)]
        viral_load: f64,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the scripted walkthrough against the demo patients
    Demo,
    /// Start the interactive dashboard
    Shell {
        /// Start with no patients instead of the demo patients
        #[arg(long)]
        empty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with page output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("chart=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();

    match cli.command {
        Some(Commands::Recommend { viral_load, json }) => {
            let viral_load = ViralLoad::new(viral_load).context("invalid viral load")?;
            let plan = recommend(viral_load);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", render::recommendation(&plan));
                println!("Summary: {}", plan.summary());
            }
        }
        Some(Commands::Demo) => {
            run_demo(&mut stdout.lock())?;
        }
        Some(Commands::Shell { empty }) => {
            let registry = if empty {
                PatientRegistry::new()
            } else {
                PatientRegistry::with_demo_patients()
            };
            let mut shell = shell::Shell::new(registry, std::io::stdin().lock(), stdout.lock());
            shell.run()?;
            tracing::debug!(
                patients = shell.registry().len(),
                page = ?shell.page(),
                "session ended"
            );
        }
        None => {
            println!("Use 'chart --help' for commands");
        }
    }

    Ok(())
}

/// Adds Alice to the demo registry, records a viral load of 8000 for Hannah, and prints
/// the resulting dashboard, chart and recommendation.
fn run_demo(out: &mut impl Write) -> anyhow::Result<()> {
    let mut registry = PatientRegistry::with_demo_patients();

    let alice = registry.add_patient("Alice", 40, "Female", "Black", "HIV")?;
    writeln!(out, "Added Alice with id {alice}\n")?;
    write!(out, "{}", render::patient_table(&registry.list_patients()))?;

    let hannah_id = registry.find_by_name("Hannah")?.id;
    let plan = record_observation(&mut registry, hannah_id, 8000.0, 500.0)?;

    writeln!(out)?;
    write!(out, "{}", render::recommendation(&plan))?;
    writeln!(out)?;
    write!(out, "{}", render::chart(registry.patient(hannah_id)?))?;

    Ok(())
}
