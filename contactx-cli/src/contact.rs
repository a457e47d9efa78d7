use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;
use contactx_lib::{
    Repository,
    repository::{self, Contact, ContactFields, ContactId},
};
use sysexits::ExitCode;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List contacts by name
    List,
    /// Show every field of a contact
    Show { id: u64 },
    /// Add a new contact
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        /// May be given more than once
        #[arg(long = "email")]
        emails: Vec<String>,
        #[arg(long)]
        telegram: Option<String>,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        discord: Option<String>,
        #[arg(long)]
        reddit: Option<String>,
        /// Path to a profile photo
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Permanently remove a contact
    Remove { id: u64 },
    /// Write a timestamped copy of the database
    Backup {
        /// Defaults to the database's own directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub fn handle(repo: &Repository, cmd: &Command) -> ExitCode {
    match run(repo, cmd) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            match e {
                repository::Error::MissingName => ExitCode::DataErr,
                repository::Error::Io(_) => ExitCode::IoErr,
                _ => ExitCode::Software,
            }
        }
    }
}

fn run(repo: &Repository, cmd: &Command) -> repository::Result<ExitCode> {
    match cmd {
        Command::List => {
            for summary in repo.list_summaries()? {
                println!("{}  {}", format!("{:>4}", summary.id).cyan(), summary.name);
            }
        }
        Command::Show { id } => match repo.get(ContactId::from(*id))? {
            Some(contact) => print_contact(&contact),
            None => return Ok(unknown(*id)),
        },
        Command::Add {
            name,
            phone,
            emails,
            telegram,
            github,
            discord,
            reddit,
            photo,
        } => {
            let fields = ContactFields {
                name: name.trim().to_string(),
                phone: phone.clone().unwrap_or_default(),
                emails: emails.join("\n"),
                telegram: telegram.clone().unwrap_or_default(),
                github: github.clone().unwrap_or_default(),
                discord: discord.clone().unwrap_or_default(),
                reddit: reddit.clone().unwrap_or_default(),
                pgp_key: String::new(),
                photo_path: photo.clone(),
            };

            let id = repo.insert(&fields)?;
            println!("{id}");
        }
        Command::Remove { id } => {
            let id = ContactId::from(*id);
            let Some(contact) = repo.get(id)? else {
                return Ok(unknown(id.get()));
            };

            repo.delete(id)?;
            println!("Removed {}", contact.name.bold());
        }
        Command::Backup { dir } => {
            let dir = dir.clone().unwrap_or_else(|| repo.database_dir());
            let path = repo.backup(&dir)?;
            println!("{}", path.display());
        }
    }

    Ok(ExitCode::Ok)
}

fn unknown(id: u64) -> ExitCode {
    eprintln!("{} no contact with id {id}", "error:".red().bold());
    ExitCode::NoInput
}

fn print_contact(contact: &Contact) {
    println!("{} {}", contact.name.bold(), format!("#{}", contact.id()).dimmed());

    let rows = [
        ("Phone", contact.phone.as_str()),
        ("Telegram", contact.telegram.as_str()),
        ("GitHub", contact.github.as_str()),
        ("Discord", contact.discord.as_str()),
        ("Reddit", contact.reddit.as_str()),
    ];
    for (label, value) in rows.into_iter().filter(|(_, v)| !v.is_empty()) {
        println!("  {} {value}", format!("{:<9}", format!("{label}:")).cyan());
    }

    for email in contact.email_list() {
        println!("  {} {email}", format!("{:<9}", "Email:").cyan());
    }

    if let Some(photo) = &contact.photo_path {
        println!("  {} {}", format!("{:<9}", "Photo:").cyan(), photo.display());
    }

    if !contact.pgp_key.is_empty() {
        println!("  {}", "PGP key:".cyan());
        for line in contact.pgp_key.lines() {
            println!("    {line}");
        }
    }
}
