use clap::{Args, Parser, Subcommand};
use dokability_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "doka")]
#[command(about = "Compare drinks by price per unit of alcohol", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep the ledger in memory only (nothing is read or written)
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate value metrics for a drink without recording it
    Calc {
        #[command(flatten)]
        drink: DrinkArgs,

        /// Print metrics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Calculate and record a drink
    Add {
        #[command(flatten)]
        drink: DrinkArgs,

        /// Display name (defaults to "<volume> <abv>%")
        #[arg(long, default_value = "")]
        name: String,
    },

    /// List recorded drinks, best value first (default)
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the best value drink
    Best,

    /// Remove a recorded drink by id
    Remove { id: Uuid },

    /// Remove all recorded drinks
    Clear,

    /// Show the built-in container sizes
    Volumes,
}

#[derive(Args)]
struct DrinkArgs {
    /// Price in currency units
    #[arg(long)]
    price: f64,

    /// Catalog size ("33cl", "1L") or a magnitude ("0.7", "568ml")
    #[arg(long)]
    volume: Option<String>,

    /// Unit for a bare magnitude (ml, cl, l)
    #[arg(long)]
    unit: Option<String>,

    /// Alcohol by volume in percent (defaults by container size)
    #[arg(long)]
    abv: Option<f64>,
}

impl DrinkArgs {
    fn resolve(&self, config: &Config) -> Result<(VolumeOption, f64)> {
        let label = self
            .volume
            .clone()
            .unwrap_or_else(|| config.defaults.volume.clone());
        let volume = resolve_volume(&label, self.unit.as_deref())?;
        let abv = self
            .abv
            .unwrap_or_else(|| default_abv_for(&volume.label));
        Ok((volume, abv))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;

    // Initialize logging
    dokability_core::logging::init_with_level(&config.logging.level);

    // Determine data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    tracing::debug!("Using data directory {:?}", data_dir);

    let command = cli.command.unwrap_or(Commands::List { json: false });

    // Calculating and browsing the catalog never touch the ledger
    let command = match command {
        Commands::Calc { drink, json } => return cmd_calc(&drink, json, &config),
        Commands::Volumes => {
            cmd_volumes();
            return Ok(());
        }
        other => other,
    };

    let mut ledger = if cli.ephemeral {
        Ledger::detached()
    } else {
        Ledger::open(FileStore::new(&data_dir))
    };

    match command {
        Commands::Add { drink, name } => cmd_add(&mut ledger, &drink, &name, &config)?,
        Commands::List { json } => cmd_list(&ledger, json)?,
        Commands::Best => cmd_best(&ledger),
        Commands::Remove { id } => cmd_remove(&mut ledger, id),
        Commands::Clear => cmd_clear(&mut ledger),
        Commands::Calc { .. } | Commands::Volumes => unreachable!("handled above"),
    }

    if let StorageStatus::Failed(reason) = ledger.storage_status() {
        eprintln!("Warning: changes were not saved ({})", reason);
    }

    Ok(())
}

fn cmd_calc(drink: &DrinkArgs, json: bool, config: &Config) -> Result<()> {
    let (volume, abv) = drink.resolve(config)?;
    let metrics = calculate_option(drink.price, &volume, abv);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("\n  {} {}% for {:.2}", volume.label, abv, drink.price);
    display_metrics(&metrics);
    Ok(())
}

fn cmd_add(ledger: &mut Ledger, drink: &DrinkArgs, name: &str, config: &Config) -> Result<()> {
    let (volume, abv) = drink.resolve(config)?;
    let metrics = calculate_option(drink.price, &volume, abv);
    let entry = ledger.add_metrics(name, drink.price, &volume, abv, &metrics);

    let rank = ledger
        .sorted_view()
        .iter()
        .position(|d| d.id() == entry.id())
        .map(|i| i + 1)
        .unwrap_or(0);

    println!("\n✓ Added {}", entry.name());
    println!("  Id: {}", entry.id());
    display_metrics(&metrics);
    println!("  Rank: {} of {}", rank, ledger.count());
    if ledger.is_best_value(&entry) {
        println!("  ★ Best value so far");
    }
    Ok(())
}

fn cmd_list(ledger: &Ledger, json: bool) -> Result<()> {
    let drinks = ledger.sorted_view();

    if json {
        println!("{}", serde_json::to_string_pretty(&drinks)?);
        return Ok(());
    }

    if drinks.is_empty() {
        println!("No drinks yet.");
        return Ok(());
    }

    println!("\n  {} drinks, best value first\n", ledger.count());
    for (i, drink) in drinks.iter().enumerate() {
        // Only the head of the sorted view is the best value
        let marker = if i == 0 { "★" } else { " " };
        let score = drink
            .dokability_score()
            .map(|s| format!("score {:>3}", s))
            .unwrap_or_default();
        println!(
            "{} {:>2}. {:<24} {:>7.2} €  {:>6.3} €/cl  {}",
            marker,
            i + 1,
            drink.name(),
            drink.price(),
            drink.price_per_cl_alcohol(),
            score
        );
        println!("       {}", drink.id());
    }
    println!();
    Ok(())
}

fn cmd_best(ledger: &Ledger) {
    match ledger.best() {
        Some(best) => {
            println!("★ {}", best.name());
            println!("  {:.3} € per cl of alcohol", best.price_per_cl_alcohol());
            println!("  Id: {}", best.id());
        }
        None => println!("No drinks yet."),
    }
}

fn cmd_remove(ledger: &mut Ledger, id: Uuid) {
    let name = ledger.get(id).map(|d| d.name().to_string());
    ledger.remove(id);

    match name {
        Some(name) => println!("✓ Removed {}", name),
        None => println!("No drink with id {} - nothing removed.", id),
    }
}

fn cmd_clear(ledger: &mut Ledger) {
    let count = ledger.count();
    ledger.clear();
    println!("✓ Cleared {} drinks", count);
}

fn cmd_volumes() {
    println!("\n  Size     ml      default ABV");
    for opt in volume_options() {
        println!(
            "  {:<6} {:>6}   {:>4}%",
            opt.label,
            opt.milliliters(),
            default_abv_for(&opt.label)
        );
    }
    println!();
}

fn display_metrics(metrics: &DerivedMetrics) {
    println!("  Volume:        {} ml", metrics.volume_ml);
    println!("  Pure alcohol:  {:.2} ml", metrics.pure_alcohol_ml);
    println!("  Price per cl:  {:.3} €", metrics.price_per_cl_alcohol);
    println!("  ml per euro:   {:.3}", metrics.ml_per_euro);
    println!("  Dokability:    {}/100", metrics.dokability_score);
}
