//! Command-line front end for the macro resolver.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nutriplan_core::db::DEFAULT_SEARCH_LIMIT;
use nutriplan_core::{FoodRepository, JsonFoodRepository, MacroResolver, ResolverConfig};
use nutriplan_llm::{extract_plan, parse_plan, selection_filter, PlanMacroInjector, JSON_START};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nutriplan", author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the food category files (overrides NUTRIPLAN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute macro totals for a free-text food description
    Resolve {
        /// e.g. "100g de arroz, 2 uds de huevo"
        description: String,

        /// Only match foods suitable for this diet ("Vegano", "vegana", "Dieta keto")
        #[arg(long)]
        diet: Option<String>,

        /// Exclude foods mentioning this term (repeatable)
        #[arg(long = "restriction")]
        restrictions: Vec<String>,
    },

    /// List food records whose name contains a term
    Search {
        name: String,

        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Rewrite the macros of every meal in a generated plan
    Plan {
        /// Generator response or bare plan JSON
        file: PathBuf,

        /// Restrict matching using the plan's own restrictions
        #[arg(long)]
        filtered: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriplan=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ResolverConfig::from_env().context("Invalid resolver configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    info!(data_dir = %config.data_dir.display(), "Using food database");

    let repository = JsonFoodRepository::from_config(&config);
    let resolver = MacroResolver::with_config(&repository, &config);

    match cli.command {
        Command::Resolve {
            description,
            diet,
            restrictions,
        } => {
            let filter = selection_filter(diet.as_deref(), &restrictions)?;

            let total = resolver
                .try_resolve_filtered(&description, &filter)
                .context("Failed to resolve description")?;
            println!("{}", serde_json::to_string_pretty(&total)?);
        }

        Command::Search { name, limit } => {
            let records = resolver
                .search(&name, limit)
                .context("Failed to search the food database")?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Command::Plan { file, filtered } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut plan = if content.contains(JSON_START) {
                extract_plan(&content)
            } else {
                parse_plan(&content)
            }
            .with_context(|| format!("No usable plan in {}", file.display()))?;

            // Surface load failures instead of zeroing every meal
            repository
                .foods()
                .context("Failed to load the food database")?;

            let injector = if filtered {
                PlanMacroInjector::for_plan_restrictions(&resolver, &plan)?
            } else {
                PlanMacroInjector::new(&resolver)
            };
            let report = injector.inject(&mut plan);

            if !report.is_complete() {
                eprintln!(
                    "{} ingredient(s) in {} meal(s) were not found in the food database",
                    report.unmatched_count(),
                    report.incomplete_meals.len()
                );
            }
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
