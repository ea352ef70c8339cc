use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

use fridge_recipes::config::AppConfig;
use fridge_recipes::ingredients::{preview, split};
use fridge_recipes::inventory::{
    filter_items, ingredient_names, load_items, FilterMode, InventoryStore, NewFridgeItem,
};
use fridge_recipes::{server, PipelineResult, RecipePipeline};

#[derive(Parser)]
#[command(name = "fridge-recipes")]
#[command(about = "Suggest recipes from the ingredients in your fridge")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split and classify ingredients without calling any external service
    Preview {
        /// Ingredients separated by newlines, commas, 、 or slashes
        text: String,
    },
    /// Ask the configured model for recipe suggestions
    Suggest {
        /// Ingredients separated by newlines, commas, 、 or slashes
        text: Option<String>,

        /// JSON array of fridge items to cook with
        #[arg(long, value_name = "PATH")]
        inventory: Option<PathBuf>,

        /// Only use inventory items that expire soon
        #[arg(long, requires = "inventory")]
        expiring: bool,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the fridge file used by the server
    Fridge {
        /// Defaults to inventory.path from the configuration
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,

        #[command(subcommand)]
        action: FridgeAction,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum FridgeAction {
    /// Record an item
    Add {
        name: String,

        #[arg(long)]
        quantity: Option<String>,

        /// Expiry date as YYYY-MM-DD
        #[arg(long)]
        expires: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },
    /// List items, newest first
    List,
    /// Delete an item by id
    Remove { id: u64 },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    match cli.command {
        Commands::Preview { text } => {
            let classifier = config.classifier.build()?;
            for item in preview(&text, &classifier) {
                println!("{}\t{}", item.category, item.name);
            }
        }
        Commands::Suggest {
            text,
            inventory,
            expiring,
            json,
        } => {
            let mut names = Vec::new();

            if let Some(path) = inventory {
                let items = load_items(&path).await?;
                let mode = if expiring {
                    FilterMode::Expiring
                } else {
                    FilterMode::All
                };
                let today = chrono::Local::now().date_naive();
                let selected = filter_items(
                    &items,
                    mode,
                    None,
                    today,
                    config.inventory.expiring_days,
                );
                info!(
                    "Selected {} of {} items from {}",
                    selected.len(),
                    items.len(),
                    path.display()
                );
                names.extend(ingredient_names(selected));
            }

            if let Some(text) = text {
                names.extend(split(&text));
            }

            if names.is_empty() {
                return Err("No ingredients given; pass TEXT or --inventory".into());
            }

            debug!("Ingredients: {:?}", names);
            let pipeline = RecipePipeline::from_config(&config)?;
            let result = pipeline.run(&names).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Commands::Fridge { store, action } => {
            let Some(path) = store.or_else(|| config.inventory.path.clone()) else {
                return Err("No fridge file; pass --store or set inventory.path".into());
            };
            let store = InventoryStore::open(&path).await?;

            match action {
                FridgeAction::Add {
                    name,
                    quantity,
                    expires,
                    note,
                } => {
                    let item = store
                        .add(NewFridgeItem {
                            name: Some(name),
                            quantity: quantity.map(serde_json::Value::String),
                            expire_date: expires,
                            note,
                        })
                        .await?;
                    println!("Added #{} {}", item.id, item.name);
                }
                FridgeAction::List => {
                    let today = chrono::Local::now().date_naive();
                    for item in store.list().await {
                        let expires = item
                            .expire_date
                            .map(|date| date.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{}\t{}\t{}\t{}\t{:?}",
                            item.id,
                            item.category(),
                            item.name,
                            expires,
                            item.expiry_status(today, config.inventory.expiring_days)
                        );
                    }
                }
                FridgeAction::Remove { id } => {
                    if store.remove(id).await? == 0 {
                        return Err(format!("No fridge item with id {}", id).into());
                    }
                    println!("Removed #{}", id);
                }
            }
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::run(config).await?;
        }
    }

    Ok(())
}

fn print_result(result: &PipelineResult) {
    if let Some(error) = &result.error {
        eprintln!("Model call failed: {}", error);
        return;
    }
    if let Some(raw) = &result.raw {
        eprintln!("Could not read the model's answer:\n{}", raw);
        return;
    }

    for (index, recipe) in result.recipes.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("## {}", recipe.title);
        if !recipe.description.is_empty() {
            println!("{}", recipe.description);
        }
        if let Some(image) = &recipe.image {
            println!("{}", image);
        }
        println!();
        println!("{}", recipe.steps);
    }
}
