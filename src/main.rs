use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use turnos::logging;
use turnos::models::{Specialty, TurnoRegistry};
use turnos::storage::{
    Config, ConfigStorage, FileKeyValueStore, TomlConfigStorage, ensure_directories,
};

#[derive(Parser)]
#[command(name = "turnos")]
#[command(about = "Medical appointment registry", long_about = None)]
struct Cli {
    /// Directory holding the appointment data (overrides $XDG_DATA_HOME/turnos)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new appointment
    Register {
        /// Patient name (no digits)
        #[arg(short, long)]
        name: String,

        /// Patient age in years
        #[arg(short, long)]
        age: String,

        /// Specialty name or position (see `turnos specialties`)
        #[arg(short, long, default_value = "")]
        specialty: String,
    },

    /// Remove an appointment by id
    Remove {
        id: u64,
    },

    /// Show registered appointments
    List,

    /// Show estimated wait time per appointment
    Wait,

    /// Show appointment statistics
    Stats,

    /// List available specialties
    Specialties,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (data_dir, config_dir) = ensure_directories(cli.data_dir)?;

    let config_storage = TomlConfigStorage::new(config_dir.join("turnos.toml"));
    let config = config_storage.load()?;
    init_logging(&config, &data_dir)?;
    log::debug!("Using configuration {:?}", config_storage.path());

    let store = FileKeyValueStore::new(data_dir);
    let mut registry = TurnoRegistry::open(store, config.general.storage_key.as_str())?
        .with_slot_minutes(config.general.slot_minutes);

    match cli.command {
        Commands::Register {
            name,
            age,
            specialty,
        } => cmd_register(&mut registry, &name, &age, &specialty),
        Commands::Remove { id } => cmd_remove(&mut registry, id),
        Commands::List => cmd_list(&registry),
        Commands::Wait => cmd_wait(&registry),
        Commands::Stats => cmd_stats(&registry),
        Commands::Specialties => cmd_specialties(),
    }
}

fn init_logging(config: &Config, data_dir: &std::path::Path) -> Result<()> {
    if config.general.log_to_file {
        logging::init_logger(
            &data_dir.join("turnos.log"),
            &config.general.log_level,
            &config.general.stderr_level,
        )
    } else {
        env_logger::init();
        Ok(())
    }
}

type Registry = TurnoRegistry<FileKeyValueStore>;

fn cmd_register(registry: &mut Registry, name: &str, age: &str, specialty: &str) -> Result<()> {
    let appointment = registry.register(name, age, specialty)?;
    println!(
        "Registered appointment #{} for {} ({}) at {}",
        appointment.id, appointment.name, appointment.specialty, appointment.registered_at
    );
    Ok(())
}

fn cmd_remove(registry: &mut Registry, id: u64) -> Result<()> {
    if registry.remove(id)? {
        println!("Appointment #{} removed", id);
    } else {
        println!("Appointment #{} not found", id);
    }
    Ok(())
}

fn cmd_list(registry: &Registry) -> Result<()> {
    if registry.is_empty() {
        println!("No appointments registered");
        return Ok(());
    }

    println!(
        "{:>4}  {:<24} {:>4}  {:<14} {}",
        "ID", "NAME", "AGE", "SPECIALTY", "REGISTERED"
    );
    println!("{}", "=".repeat(60));
    for a in registry.appointments() {
        println!(
            "{:>4}  {:<24} {:>4}  {:<14} {}",
            a.id,
            a.name,
            a.age,
            a.specialty.name(),
            a.registered_at
        );
    }

    Ok(())
}

fn cmd_wait(registry: &Registry) -> Result<()> {
    let Ok(rows) = registry.wait_times() else {
        println!("No appointments registered");
        return Ok(());
    };

    println!("=== WAIT TIMES ===");
    for row in rows {
        println!(
            "#{} - {} ({} years) - {}: {} mins",
            row.id, row.name, row.age, row.specialty, row.wait_minutes
        );
    }

    Ok(())
}

fn cmd_stats(registry: &Registry) -> Result<()> {
    let Ok(stats) = registry.statistics() else {
        println!("No appointments registered");
        return Ok(());
    };

    println!("=== STATISTICS ===");
    println!("Total appointments: {}", stats.total);
    println!("Mean age: {:.1} years", stats.mean_age);
    println!();
    println!("Distribution by specialty:");
    for share in &stats.distribution {
        println!(
            "{}: {} appointments ({:.1}%)",
            share.specialty, share.count, share.percentage
        );
    }

    Ok(())
}

fn cmd_specialties() -> Result<()> {
    for (index, specialty) in Specialty::ALL.iter().enumerate() {
        println!("{}  {}", index, specialty);
    }
    Ok(())
}
