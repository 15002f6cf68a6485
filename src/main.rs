use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use apptrack::config::Settings;
use apptrack::db::{ApplicationFilter, Database};
use apptrack::models::{
    Application, ApplicationFields, Company, CompanyFields, Contact, ContactFields, HistoryEntry,
    LocationType, Skill, Status,
};

#[derive(Parser)]
#[command(name = "apptrack")]
#[command(about = "Track job applications, companies, contacts, and skills from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Browse everything in a terminal UI
    Tui,

    /// Manage companies
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage applications
    Application {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Manage contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage skills
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },

    /// Populate an empty database with demo data
    Seed,

    /// Dump all tables as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// Add a company
    Add {
        name: String,

        #[arg(short, long)]
        website: Option<String>,

        #[arg(short, long)]
        industry: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all companies
    List,

    /// Show company details
    Show {
        /// Company name or ID
        name: String,
    },

    /// Delete a company and all its applications
    Rm {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Attach a contact to a company
    LinkContact { id: i64, contact_id: i64 },

    /// Attach a skill to a company
    LinkSkill { id: i64, skill: String },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// Add an application
    Add {
        /// Company name or ID
        company: String,

        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        salary_range: Option<String>,

        #[arg(long)]
        platform: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Remote, Hybrid, or On-site
        #[arg(long)]
        location: Option<LocationType>,

        /// Saved, Applied, Interviewing, Offer, Rejected, or Ghosted
        #[arg(long, default_value = "Saved")]
        status: Status,

        /// 0 (none) to 4 (highest)
        #[arg(short, long, default_value = "0")]
        priority: i64,

        /// YYYY-MM-DD
        #[arg(long)]
        date_applied: Option<NaiveDate>,

        /// YYYY-MM-DD, must not precede the applied date
        #[arg(long)]
        follow_up: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List applications
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<Status>,

        /// Filter by company name
        #[arg(short, long)]
        company: Option<String>,

        /// Filter by priority
        #[arg(short, long)]
        priority: Option<i64>,
    },

    /// Show application details
    Show { id: i64 },

    /// Change an application's status (recorded in history)
    SetStatus { id: i64, status: Status },

    /// Show the status history of an application
    History { id: i64 },

    /// Delete an application
    Rm {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Attach a skill to an application
    LinkSkill { id: i64, skill: String },

    /// Attach a contact to an application
    LinkContact { id: i64, contact_id: i64 },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// Add a contact
    Add {
        name: String,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all contacts
    List,

    /// Show contact details
    Show { id: i64 },

    /// Delete a contact
    Rm {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SkillCommands {
    /// Add a skill
    Add { name: String },

    /// List all skills
    List,

    /// Delete a skill
    Rm { name: String },
}

#[derive(Serialize)]
struct ExportDump {
    companies: Vec<Company>,
    applications: Vec<Application>,
    contacts: Vec<Contact>,
    skills: Vec<Skill>,
    history: Vec<HistoryEntry>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let db = Database::open_at(&settings.db_path)?;

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Tui => {
            apptrack::tui::run(&db, &settings.theme)?;
        }

        Commands::Company { command } => {
            db.ensure_initialized()?;
            run_company(&db, command)?;
        }

        Commands::Application { command } => {
            db.ensure_initialized()?;
            run_application(&db, command)?;
        }

        Commands::Contact { command } => {
            db.ensure_initialized()?;
            run_contact(&db, command)?;
        }

        Commands::Skill { command } => {
            db.ensure_initialized()?;
            run_skill(&db, command)?;
        }

        Commands::Seed => {
            let stats = apptrack::seed::run(&db)?;
            println!(
                "Seeded {} companies, {} applications, {} contacts, {} skills.",
                stats.companies, stats.applications, stats.contacts, stats.skills
            );
        }

        Commands::Export { output } => {
            db.ensure_initialized()?;
            let applications = db.list_applications(&ApplicationFilter::default())?;
            let mut history = Vec::new();
            for application in &applications {
                history.extend(db.history_for_application(application.id)?);
            }
            let dump = ExportDump {
                companies: db.list_companies()?,
                applications,
                contacts: db.list_contacts()?,
                skills: db.list_skills()?,
                history,
            };
            let json = serde_json::to_string_pretty(&dump)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

fn run_company(db: &Database, command: CompanyCommands) -> Result<()> {
    match command {
        CompanyCommands::Add {
            name,
            website,
            industry,
            notes,
        } => {
            let id = db.create_company(&CompanyFields {
                name: name.clone(),
                website,
                industry,
                notes,
            })?;
            println!("Added company '{}' (ID: {})", name, id);
        }

        CompanyCommands::List => {
            let companies = db.list_companies()?;
            if companies.is_empty() {
                println!("No companies found.");
            } else {
                println!("{:<6} {:<28} {:<20} {:<30}", "ID", "NAME", "INDUSTRY", "WEBSITE");
                println!("{}", "-".repeat(84));
                for company in companies {
                    println!(
                        "{:<6} {:<28} {:<20} {:<30}",
                        company.id,
                        truncate(&company.name, 26),
                        truncate(&company.industry.unwrap_or_default(), 18),
                        truncate(&company.website.unwrap_or_default(), 28)
                    );
                }
            }
        }

        CompanyCommands::Show { name } => {
            let company = resolve_company(db, &name)?;
            println!("Company #{}", company.id);
            println!("Name: {}", company.name);
            if let Some(website) = &company.website {
                println!("Website: {}", website);
            }
            if let Some(industry) = &company.industry {
                println!("Industry: {}", industry);
            }
            if let Some(notes) = &company.notes {
                println!("Notes: {}", notes);
            }
            let skills = db.skills_for_company(company.id)?;
            if !skills.is_empty() {
                let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
                println!("Skills: {}", names.join(", "));
            }
            let contacts = db.contacts_for_company(company.id)?;
            if !contacts.is_empty() {
                println!("\nContacts ({}):", contacts.len());
                for contact in contacts {
                    println!(
                        "  #{} {} ({})",
                        contact.id,
                        contact.name,
                        contact.email.unwrap_or_else(|| "-".into())
                    );
                }
            }
            let applications = db.applications_for_company(company.id)?;
            if !applications.is_empty() {
                println!("\nApplications ({}):", applications.len());
                for application in applications {
                    println!(
                        "  #{} - {} ({})",
                        application.id, application.title, application.status
                    );
                }
            }
        }

        CompanyCommands::Rm { id, yes } => {
            let company = db
                .get_company(id)?
                .ok_or_else(|| anyhow!("Company #{id} not found"))?;
            let applications = db.applications_for_company(id)?;
            if !yes
                && !confirm(&format!(
                    "Delete '{}' and its {} application(s)?",
                    company.name,
                    applications.len()
                ))?
            {
                println!("Aborted.");
                return Ok(());
            }
            db.delete_company(id)?;
            println!("Deleted company '{}'.", company.name);
        }

        CompanyCommands::LinkContact { id, contact_id } => {
            db.link_company_contact(id, contact_id)?;
            println!("Linked contact #{} to company #{}.", contact_id, id);
        }

        CompanyCommands::LinkSkill { id, skill } => {
            db.link_company_skill(id, &skill)?;
            println!("Linked skill '{}' to company #{}.", skill, id);
        }
    }
    Ok(())
}

fn run_application(db: &Database, command: ApplicationCommands) -> Result<()> {
    match command {
        ApplicationCommands::Add {
            company,
            title,
            description,
            salary_range,
            platform,
            url,
            address,
            location,
            status,
            priority,
            date_applied,
            follow_up,
            notes,
        } => {
            let company = resolve_company(db, &company)?;
            let id = db.create_application(&ApplicationFields {
                company_id: company.id,
                title: title.clone(),
                description,
                salary_range,
                platform,
                url,
                address,
                location_type: location,
                status,
                priority,
                date_applied,
                follow_up_date: follow_up,
                notes,
            })?;
            println!("Added application '{}' at {} (ID: {})", title, company.name, id);
        }

        ApplicationCommands::List {
            status,
            company,
            priority,
        } => {
            let applications = db.list_applications(&ApplicationFilter {
                status,
                company,
                priority,
            })?;
            if applications.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<6} {:<14} {:<4} {:<28} {:<20} {:<12}",
                    "ID", "STATUS", "PRI", "TITLE", "COMPANY", "APPLIED"
                );
                println!("{}", "-".repeat(88));
                for application in applications {
                    let applied = application
                        .date_applied
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into());
                    println!(
                        "{:<6} {:<14} {:<4} {:<28} {:<20} {:<12}",
                        application.id,
                        application.status.to_string(),
                        application.priority,
                        truncate(&application.title, 26),
                        truncate(&application.company_name, 18),
                        applied
                    );
                }
            }
        }

        ApplicationCommands::Show { id } => match db.get_application(id)? {
            Some(application) => {
                println!("Application #{}", application.id);
                println!("Title: {}", application.title);
                println!("Company: {}", application.company_name);
                println!("Status: {}", application.status);
                println!("Priority: {}", application.priority);
                if let Some(location) = application.location_type {
                    println!("Location: {}", location);
                }
                if let Some(salary) = &application.salary_range {
                    println!("Salary: {}", salary);
                }
                if let Some(platform) = &application.platform {
                    println!("Platform: {}", platform);
                }
                if let Some(url) = &application.url {
                    println!("URL: {}", url);
                }
                if let Some(address) = &application.address {
                    println!("Address: {}", address);
                }
                if let Some(applied) = application.date_applied {
                    println!("Applied: {}", applied);
                }
                if let Some(follow_up) = application.follow_up_date {
                    println!("Follow up: {}", follow_up);
                }
                let skills = db.skills_for_application(id)?;
                if !skills.is_empty() {
                    let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
                    println!("Skills: {}", names.join(", "));
                }
                let contacts = db.contacts_for_application(id)?;
                if !contacts.is_empty() {
                    let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
                    println!("Contacts: {}", names.join(", "));
                }
                if let Some(notes) = &application.notes {
                    println!("\n{}", notes);
                }
                if let Some(description) = &application.description {
                    println!("\n--- Description ---\n{}", description);
                }
            }
            None => println!("Application #{} not found.", id),
        },

        ApplicationCommands::SetStatus { id, status } => {
            db.set_application_status(id, status)?;
            println!("Application #{} is now {}.", id, status);
        }

        ApplicationCommands::History { id } => {
            let history = db.history_for_application(id)?;
            if history.is_empty() {
                println!("No status changes recorded for application #{}.", id);
            } else {
                println!("{:<6} {:<20} {:<14} {:<14}", "ID", "CHANGED AT", "FROM", "TO");
                println!("{}", "-".repeat(56));
                for entry in history {
                    println!(
                        "{:<6} {:<20} {:<14} {:<14}",
                        entry.id,
                        entry.changed_at,
                        entry.old_status.to_string(),
                        entry.new_status.to_string()
                    );
                }
            }
        }

        ApplicationCommands::Rm { id, yes } => {
            let application = db
                .get_application(id)?
                .ok_or_else(|| anyhow!("Application #{id} not found"))?;
            if !yes && !confirm(&format!("Delete '{}'?", application.title))? {
                println!("Aborted.");
                return Ok(());
            }
            db.delete_application(id)?;
            println!("Deleted application '{}'.", application.title);
        }

        ApplicationCommands::LinkSkill { id, skill } => {
            db.link_application_skill(id, &skill)?;
            println!("Linked skill '{}' to application #{}.", skill, id);
        }

        ApplicationCommands::LinkContact { id, contact_id } => {
            db.link_application_contact(id, contact_id)?;
            println!("Linked contact #{} to application #{}.", contact_id, id);
        }
    }
    Ok(())
}

fn run_contact(db: &Database, command: ContactCommands) -> Result<()> {
    match command {
        ContactCommands::Add {
            name,
            email,
            phone,
            url,
            notes,
        } => {
            let id = db.create_contact(&ContactFields {
                name: name.clone(),
                email,
                phone,
                url,
                notes,
            })?;
            println!("Added contact '{}' (ID: {})", name, id);
        }

        ContactCommands::List => {
            let contacts = db.list_contacts()?;
            if contacts.is_empty() {
                println!("No contacts found.");
            } else {
                println!("{:<6} {:<24} {:<30} {:<18}", "ID", "NAME", "EMAIL", "PHONE");
                println!("{}", "-".repeat(78));
                for contact in contacts {
                    println!(
                        "{:<6} {:<24} {:<30} {:<18}",
                        contact.id,
                        truncate(&contact.name, 22),
                        truncate(&contact.email.unwrap_or_default(), 28),
                        truncate(&contact.phone.unwrap_or_default(), 16)
                    );
                }
            }
        }

        ContactCommands::Show { id } => match db.get_contact(id)? {
            Some(contact) => {
                println!("Contact #{}", contact.id);
                println!("Name: {}", contact.name);
                if let Some(email) = &contact.email {
                    println!("Email: {}", email);
                }
                if let Some(phone) = &contact.phone {
                    println!("Phone: {}", phone);
                }
                if let Some(url) = &contact.url {
                    println!("URL: {}", url);
                }
                if let Some(notes) = &contact.notes {
                    println!("Notes: {}", notes);
                }
            }
            None => println!("Contact #{} not found.", id),
        },

        ContactCommands::Rm { id, yes } => {
            let contact = db
                .get_contact(id)?
                .ok_or_else(|| anyhow!("Contact #{id} not found"))?;
            if !yes && !confirm(&format!("Delete '{}'?", contact.name))? {
                println!("Aborted.");
                return Ok(());
            }
            db.delete_contact(id)?;
            println!("Deleted contact '{}'.", contact.name);
        }
    }
    Ok(())
}

fn run_skill(db: &Database, command: SkillCommands) -> Result<()> {
    match command {
        SkillCommands::Add { name } => {
            db.create_skill(&name)?;
            println!("Added skill '{}'.", name);
        }

        SkillCommands::List => {
            let skills = db.list_skills()?;
            if skills.is_empty() {
                println!("No skills found.");
            } else {
                for skill in skills {
                    println!("{}", skill.name);
                }
            }
        }

        SkillCommands::Rm { name } => {
            db.delete_skill(&name)?;
            println!("Deleted skill '{}'.", name);
        }
    }
    Ok(())
}

fn resolve_company(db: &Database, name_or_id: &str) -> Result<Company> {
    let company = if let Ok(id) = name_or_id.parse::<i64>() {
        db.get_company(id)?
    } else {
        db.get_company_by_name(name_or_id)?
    };
    company.ok_or_else(|| anyhow!("Company '{}' not found", name_or_id))
}

fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
