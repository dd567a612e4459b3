#![forbid(unsafe_code)]
//! PetChain command line: mint, trade and inspect pets on the local ledger.

use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use petchain::cli::{init_logging, open_service, short_hash};
use petchain::config::{load_config, DEFAULT_CONFIG_PATH};
use petchain::derivation::rarity_label;
use petchain::pet::Pet;
use petchain::service::PetService;
use petchain::transaction::{Transaction, TxPayload};
use petchain::wallet::Wallet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a fresh wallet address
    Wallet,
    /// Mints a new pet for an owner
    CreatePet {
        /// Address of the new owner
        owner: String,
        /// Name of the pet
        name: String,
    },
    /// Transfers a pet between owners
    Trade {
        pet_id: String,
        from: String,
        to: String,
    },
    /// Lists pets, optionally for one owner
    Pets {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Shows a single pet
    Pet { pet_id: String },
    /// Prints every block in the ledger
    Chain,
    /// Checks hashes, links and proof-of-work
    Validate,
    /// Shows transaction history
    History {
        #[arg(long, conflicts_with = "owner")]
        pet: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Prints ledger statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Wallet = cli.command {
        let wallet = Wallet::generate();
        println!("{}", "👛 New wallet".bright_cyan().bold());
        println!("Address: {}", wallet.address.bright_green());
        return Ok(());
    }

    let config = load_config(&cli.config)?;
    init_logging(&config.logging.level);
    let service = open_service(&config)?;

    match cli.command {
        Commands::Wallet => {}
        Commands::CreatePet { owner, name } => {
            println!("{}", format!("⛏️  Mining block for {}...", name).bright_cyan());
            let pet = service.create_pet_async(owner, name).await?;
            println!("{}", "✅ Pet created!".bright_green().bold());
            print_pets(&[pet]);
        }
        Commands::Trade { pet_id, from, to } => {
            println!("{}", format!("⛏️  Mining trade of {}...", pet_id).bright_cyan());
            let pet = service.trade_pet_async(pet_id, from, to).await?;
            println!("{}", "✅ Trade recorded!".bright_green().bold());
            print_pets(&[pet]);
        }
        Commands::Pets { owner } => {
            let pets = match owner {
                Some(owner) => service.pets_by_owner(&owner),
                None => service.all_pets(),
            };
            if pets.is_empty() {
                println!("{}", "No pets found.".yellow());
            } else {
                print_pets(&pets);
            }
        }
        Commands::Pet { pet_id } => match service.pet(&pet_id) {
            Some(pet) => print_pets(&[pet]),
            None => {
                eprintln!("{}", format!("❌ Pet {} not found", pet_id).red().bold());
                std::process::exit(1);
            }
        },
        Commands::Chain => print_chain(&service),
        Commands::Validate => match service.verify_chain() {
            Ok(()) => println!(
                "{}",
                format!("✅ Chain of {} blocks is valid", service.chain_len())
                    .bright_green()
                    .bold()
            ),
            Err(e) => {
                eprintln!("{}", format!("❌ Chain is invalid: {}", e).red().bold());
                std::process::exit(1);
            }
        },
        Commands::History { pet, owner } => {
            let transactions = match (pet, owner) {
                (Some(pet_id), _) => service.pet_history(&pet_id),
                (None, Some(address)) => service.owner_history(&address),
                (None, None) => service.all_transactions(),
            };
            if transactions.is_empty() {
                println!("{}", "No transactions found.".yellow());
            } else {
                print_history(&transactions);
            }
        }
        Commands::Stats => {
            let stats = service.stats();
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec![
                Cell::new("Metric").add_attribute(Attribute::Bold),
                Cell::new("Value").add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec!["Total pets".to_string(), stats.total_pets.to_string()]);
            table.add_row(vec!["Total owners".to_string(), stats.total_owners.to_string()]);
            table.add_row(vec![
                "Total transactions".to_string(),
                stats.total_transactions.to_string(),
            ]);
            table.add_row(vec!["Blocks".to_string(), stats.blockchain_size.to_string()]);
            table.add_row(vec!["Difficulty".to_string(), stats.difficulty.to_string()]);
            let valid = if stats.blockchain_valid {
                Cell::new("yes").fg(TableColor::Green)
            } else {
                Cell::new("NO").fg(TableColor::Red)
            };
            table.add_row(vec![Cell::new("Chain valid"), valid]);
            println!("{}", table);
        }
    }

    Ok(())
}

fn format_millis(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn rarity_color(rarity: u8) -> TableColor {
    match rarity {
        5 => TableColor::Magenta,
        4 => TableColor::Yellow,
        3 => TableColor::Cyan,
        2 => TableColor::Green,
        _ => TableColor::White,
    }
}

fn print_pets(pets: &[Pet]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Color").add_attribute(Attribute::Bold),
            Cell::new("Rarity").add_attribute(Attribute::Bold),
            Cell::new("Owner").add_attribute(Attribute::Bold),
            Cell::new("Updated").add_attribute(Attribute::Bold),
        ]);

    for pet in pets {
        table.add_row(vec![
            Cell::new(&pet.id),
            Cell::new(&pet.name),
            Cell::new(&pet.category),
            Cell::new(&pet.color),
            Cell::new(format!("{} ({})", rarity_label(pet.rarity), pet.rarity))
                .fg(rarity_color(pet.rarity)),
            Cell::new(&pet.owner),
            Cell::new(format_millis(pet.last_updated)),
        ]);
    }

    println!("{}", table);
}

fn print_chain(service: &PetService) {
    let blocks = service.blocks();
    if blocks.is_empty() {
        println!("{}", "The ledger is empty.".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Hash").add_attribute(Attribute::Bold),
            Cell::new("Previous").add_attribute(Attribute::Bold),
            Cell::new("Nonce").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Data").add_attribute(Attribute::Bold),
        ]);

    for (index, block) in blocks.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index),
            Cell::new(short_hash(&block.hash)).fg(TableColor::Cyan),
            Cell::new(short_hash(&block.previous_hash)),
            Cell::new(block.nonce),
            Cell::new(format_millis(block.timestamp)),
            Cell::new(&block.payload),
        ]);
    }

    println!("{}", table);
}

fn print_history(transactions: &[Transaction]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Pet").add_attribute(Attribute::Bold),
            Cell::new("Details").add_attribute(Attribute::Bold),
            Cell::new("Block").add_attribute(Attribute::Bold),
        ]);

    for tx in transactions {
        let (kind, color, details) = match &tx.payload {
            TxPayload::CreatePet(create) => (
                "🐣 Create",
                TableColor::Green,
                format!("{} for {}", create.pet_name, create.owner_address),
            ),
            TxPayload::TradePet(trade) => (
                "🔁 Trade",
                TableColor::Yellow,
                format!("{} → {}", trade.from_owner, trade.to_owner),
            ),
            TxPayload::Unrecognized => continue,
        };
        table.add_row(vec![
            Cell::new(format_millis(tx.block_timestamp)),
            Cell::new(kind).fg(color),
            Cell::new(tx.pet_id().unwrap_or("-")),
            Cell::new(details),
            Cell::new(short_hash(&tx.block_hash)),
        ]);
    }

    println!("{}", table);
}
