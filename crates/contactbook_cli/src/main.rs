//! Command-line front-end for the contact book.
//!
//! # Responsibility
//! - Map subcommands onto `ContactManager` operations.
//! - Pass user-entered strings through unvalidated; the core validates.

use clap::{Args, Parser, Subcommand};
use contactbook_core::config::DEFAULT_DATA_PATH;
use contactbook_core::{
    init_logging, Contact, ContactBookConfig, ContactManager, ContactStore, ContactUpdate,
    StorageBackend,
};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

/// Personal contact list manager
#[derive(Parser, Debug)]
#[command(name = "contactbook", version)]
struct Cli {
    /// Data file (JSON) or database (SQLite) path
    #[arg(long, env = "CONTACTBOOK_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Storage backend: json or sqlite
    #[arg(long, env = "CONTACTBOOK_BACKEND", default_value = "json")]
    backend: StorageBackend,

    /// Absolute directory for rotating log files (stderr when unset)
    #[arg(long, env = "CONTACTBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error (defaults by build mode)
    #[arg(long, env = "CONTACTBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all contacts sorted by last name, then first name
    List,

    /// Add a new contact
    Add {
        first_name: String,
        last_name: String,
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Show one contact by email
    Show { email: String },

    /// Search names, email and company (case-insensitive substring)
    Search { query: String },

    /// Update fields of the contact stored under EMAIL
    Update {
        email: String,

        #[command(flatten)]
        fields: UpdateFields,
    },

    /// Delete a contact by email
    Delete { email: String },

    /// Show contact and company counts
    Stats,
}

/// Fields left unset are not changed; pass an empty string to clear
/// phone, company or notes.
#[derive(Args, Debug)]
struct UpdateFields {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    /// New email address
    #[arg(long = "new-email")]
    new_email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    company: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

impl From<UpdateFields> for ContactUpdate {
    fn from(value: UpdateFields) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.new_email,
            phone: value.phone,
            company: value.company,
            notes: value.notes,
        }
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let config = build_config(&args);

    if let Err(err) = init_logging(&config.logging()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = match config.open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: cannot open {} store: {err}", config.storage);
            return ExitCode::FAILURE;
        }
    };

    let mut manager = ContactManager::open(store);
    let code = run(&mut manager, args.command);

    if let Some(err) = manager.last_save_error() {
        warn!("event=cli_exit module=cli status=error error_code=save_failed");
        eprintln!("error: changes were not saved: {err}");
        return ExitCode::FAILURE;
    }
    code
}

/// Unset `--log-level` keeps the core's build-mode default.
fn build_config(args: &Cli) -> ContactBookConfig {
    let mut builder = ContactBookConfig::builder()
        .storage(args.backend)
        .data_path(&args.data)
        .log_dir(args.log_dir.clone());
    if let Some(level) = &args.log_level {
        builder = builder.log_level(level.as_str());
    }
    builder.build()
}

fn run<S: ContactStore>(manager: &mut ContactManager<S>, command: Commands) -> ExitCode {
    match command {
        Commands::List => {
            let contacts = manager.get_all();
            if contacts.is_empty() {
                println!("No contacts found.");
            } else {
                print_table(&contacts);
                println!("Total: {} contacts", contacts.len());
            }
            ExitCode::SUCCESS
        }
        Commands::Add {
            first_name,
            last_name,
            email,
            phone,
            company,
            notes,
        } => {
            let contact = match Contact::new(&first_name, &last_name, &email) {
                Ok(contact) => contact
                    .with_phone(phone)
                    .with_company(company)
                    .with_notes(notes),
                Err(err) => return fail(&err),
            };
            let label = contact.to_string();
            if manager.add(contact) {
                println!("Added {label}");
                ExitCode::SUCCESS
            } else {
                eprintln!("A contact with email {email} already exists.");
                ExitCode::FAILURE
            }
        }
        Commands::Show { email } => match manager.find_by_email(&email) {
            Some(contact) => {
                print_details(contact);
                ExitCode::SUCCESS
            }
            None => not_found(&email),
        },
        Commands::Search { query } => {
            let results = manager.search(&query);
            if results.is_empty() {
                println!("No contacts match '{query}'.");
            } else {
                print_table(&results);
                println!("Found {} contacts", results.len());
            }
            ExitCode::SUCCESS
        }
        Commands::Update { email, fields } => {
            let update = ContactUpdate::from(fields);
            if update.is_empty() {
                eprintln!("Nothing to update; pass at least one field option.");
                return ExitCode::FAILURE;
            }
            match manager.update_by_email(&email, &update) {
                Ok(true) => {
                    println!("Updated {email}");
                    ExitCode::SUCCESS
                }
                Ok(false) => not_found(&email),
                Err(err) => fail(&err),
            }
        }
        Commands::Delete { email } => {
            if manager.delete_by_email(&email) {
                println!("Deleted {email}");
                ExitCode::SUCCESS
            } else {
                not_found(&email)
            }
        }
        Commands::Stats => {
            let stats = manager.stats();
            println!("Total contacts: {}", stats.total_contacts);
            println!("Unique companies: {}", stats.unique_companies);
            if !stats.companies.is_empty() {
                println!("Companies: {}", stats.companies.join(", "));
            }
            ExitCode::SUCCESS
        }
    }
}

fn print_table(contacts: &[&Contact]) {
    println!(
        "{:<25} {:<30} {:<15} {:<10}",
        "Name", "Email", "Company", "Phone"
    );
    println!("{}", "-".repeat(80));
    for contact in contacts {
        println!(
            "{:<25} {:<30} {:<15} {:<10}",
            contact.full_name(),
            contact.email(),
            contact.company(),
            contact.phone()
        );
    }
}

fn print_details(contact: &Contact) {
    println!("Name:    {}", contact.full_name());
    println!("Email:   {}", contact.email());
    println!("Phone:   {}", contact.phone());
    println!("Company: {}", contact.company());
    println!("Notes:   {}", contact.notes());
    println!("Created: {}", contact.created_at().to_rfc3339());
    println!("Updated: {}", contact.updated_at().to_rfc3339());
}

fn not_found(email: &str) -> ExitCode {
    eprintln!("No contact found with email {email}.");
    ExitCode::FAILURE
}

fn fail(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::FAILURE
}
