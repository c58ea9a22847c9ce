//! Command-line front end for Connect Hub contacts.
//!
//! # Responsibility
//! - Map subcommands onto `ContactStore` operations and print results.
//! - Own user interaction (confirmation prompts, messages); core owns data.

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use contacthub_core::{
    export_to_dir, group_counts, group_name, open_store, ConfirmPrompt, ContactDraft, ContactId,
    ContactStore, CoreConfig, ExportError, FixedAnswer, GroupId, ImportError, LoggingConfig,
    SortMode, SqliteKeyValueStore, StoreError, ViewQuery,
};
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contacthub", version, about = "Local contact manager")]
struct Cli {
    /// SQLite database file; omitted means an in-memory session.
    #[arg(long, env = "CONTACTHUB_DB", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "CONTACTHUB_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Only meaningful together with `--log-dir`.
    #[arg(long, env = "CONTACTHUB_LOG_LEVEL", global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the filtered, searched and sorted contact list.
    List {
        /// Group name (case-insensitive).
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = SortArg::Alphabetical)]
        sort: SortArg,
    },
    /// Print groups with member counts.
    Groups,
    /// Add a contact.
    Add(ContactArgs),
    /// Delete a contact by id.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Create a group.
    AddGroup { name: String },
    /// Delete a group by name; its contacts become unassigned.
    DeleteGroup {
        name: String,
        #[arg(long)]
        yes: bool,
    },
    /// Import contacts from a CSV file.
    Import { file: PathBuf },
    /// Write all contacts to a dated CSV file.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ContactArgs {
    #[arg(long)]
    first: String,
    #[arg(long)]
    last: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    prefix: String,
    #[arg(long, default_value = "")]
    job_title: String,
    #[arg(long, default_value = "")]
    company: String,
    /// Group name (case-insensitive).
    #[arg(long)]
    group: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Alphabetical,
    TimeAdded,
    Newest,
}

impl From<SortArg> for SortMode {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Alphabetical => SortMode::Alphabetical,
            SortArg::TimeAdded => SortMode::TimeAdded,
            SortArg::Newest => SortMode::Newest,
        }
    }
}

/// y/N prompt on stdin.
struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

type Store = ContactStore<SqliteKeyValueStore>;

#[derive(Debug)]
enum CliError {
    Store(StoreError),
    UnknownGroup(String),
    Export(ExportError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(StoreError::Import(err)) => f.write_str(err.user_message()),
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownGroup(name) => write!(f, "no group named `{name}`"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ExportError> for CliError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CoreConfig {
        db_path: cli.db.clone(),
        logging: cli.log_dir.clone().map(|log_dir| {
            let mut logging = LoggingConfig::new(log_dir);
            if let Some(level) = &cli.log_level {
                logging.level = level.clone();
            }
            logging
        }),
        ..CoreConfig::default()
    };

    let result = open_store(&config)
        .map_err(CliError::from)
        .and_then(|mut store| run(&mut store, cli.command));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(store: &mut Store, command: Command) -> Result<(), CliError> {
    match command {
        Command::List {
            group,
            search,
            sort,
        } => {
            let query = ViewQuery {
                group: group.as_deref().map(|name| find_group(store, name)).transpose()?,
                search,
                sort: sort.into(),
            };
            let view = store.view(&query);
            for contact in &view {
                let group = group_name(store.groups(), contact.group_id.as_ref()).unwrap_or("-");
                println!(
                    "{}  {:<28} {:<28} {:<16} {}",
                    contact.id,
                    contact.display_name(),
                    contact.email,
                    contact.phone,
                    group
                );
            }
            println!("{} contacts found", view.len());
        }
        Command::Groups => {
            let counts = group_counts(store.contacts(), store.groups());
            println!("All Contacts ({})", counts.total);
            for group in store.groups() {
                println!("{} ({})", group.name, counts.count_for(&group.id));
            }
        }
        Command::Add(args) => {
            let group_id = args
                .group
                .as_deref()
                .map(|name| find_group(store, name))
                .transpose()?;
            let contact = store.add_contact(ContactDraft {
                prefix: args.prefix,
                first_name: args.first,
                last_name: args.last,
                email: args.email,
                phone: args.phone,
                group_id,
                job_title: args.job_title,
                company: args.company,
            })?;
            println!("added {} ({})", contact.display_name(), contact.id);
        }
        Command::Delete { id, yes } => {
            let prompt = prompt_for(yes);
            match store.delete_contact_confirmed(&ContactId::from(id), prompt.as_ref())? {
                Some(contact) => println!("deleted {}", contact.display_name()),
                None => println!("cancelled"),
            }
        }
        Command::AddGroup { name } => {
            let group = store.add_group(&name)?;
            println!("added group {} ({})", group.name, group.id);
        }
        Command::DeleteGroup { name, yes } => {
            let id = find_group(store, &name)?;
            let prompt = prompt_for(yes);
            match store.delete_group_confirmed(&id, prompt.as_ref())? {
                Some(outcome) => println!(
                    "deleted group {}; {} contacts unassigned",
                    outcome.group.name, outcome.unassigned
                ),
                None => println!("cancelled"),
            }
        }
        Command::Import { file } => {
            let bytes = std::fs::read(&file).map_err(|err| {
                log::warn!("event=cli_import module=cli status=error error={err}");
                StoreError::Import(ImportError::Parse(err.to_string()))
            })?;
            let summary = store.import_csv(&bytes)?;
            println!("{}", summary.user_message());
        }
        Command::Export { dir } => {
            let path = export_to_dir(&dir, store.contacts(), store.groups(), Utc::now())?;
            println!("exported {} contacts to {}", store.contacts().len(), path.display());
        }
    }
    Ok(())
}

fn find_group(store: &Store, name: &str) -> Result<GroupId, CliError> {
    store
        .group_by_name(name)
        .map(|group| group.id.clone())
        .ok_or_else(|| CliError::UnknownGroup(name.to_string()))
}

fn prompt_for(yes: bool) -> Box<dyn ConfirmPrompt> {
    if yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(StdinPrompt)
    }
}
