use anyhow::{Result, bail};
use chrono::{Duration, Local};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::db::Database;
use crate::models::{ApplicationFields, CompanyFields, ContactFields, LocationType, Status};

const SKILLS: &[&str] = &[
    "Rust", "Python", "SQL", "Docker", "AWS", "React", "TypeScript", "Kubernetes", "PostgreSQL",
    "gRPC",
];

const COMPANIES: &[(&str, &str)] = &[
    ("Acme Analytics", "Data"),
    ("Borealis Systems", "Infrastructure"),
    ("Cobalt Labs", "Developer tools"),
    ("Driftwood Robotics", "Robotics"),
    ("Emberline", "Fintech"),
    ("Foxglove Health", "Healthcare"),
    ("Gearbox Cloud", "Cloud"),
    ("Harborlight", "Logistics"),
];

const TITLES: &[&str] = &[
    "Backend Engineer",
    "Systems Engineer",
    "Platform Engineer",
    "Site Reliability Engineer",
    "Data Engineer",
    "Software Engineer",
];

const PLATFORMS: &[&str] = &["LinkedIn", "company site", "referral", "Hacker News"];

const CONTACT_NAMES: &[&str] = &[
    "Alex Rivera",
    "Sam Okafor",
    "Jordan Leigh",
    "Priya Nair",
    "Chris Tanaka",
    "Morgan Ellis",
    "Dana Whitfield",
    "Robin Castellanos",
];

pub struct SeedStats {
    pub companies: usize,
    pub applications: usize,
    pub contacts: usize,
    pub skills: usize,
}

/// Populate an empty database with plausible demo data. Refuses to touch a
/// database that already has companies.
pub fn run(db: &Database) -> Result<SeedStats> {
    db.ensure_initialized()?;
    if db.counts()?.companies > 0 {
        bail!("database is not empty, refusing to seed");
    }

    let mut rng = rand::thread_rng();

    for skill in SKILLS {
        db.create_skill(skill)?;
    }

    let mut contact_ids = Vec::new();
    for (i, name) in CONTACT_NAMES.iter().enumerate() {
        let slug = name.to_lowercase().replace(' ', ".");
        let id = db.create_contact(&ContactFields {
            name: name.to_string(),
            email: Some(format!("{slug}{i}@example.com")),
            phone: Some(format!("+1-555-01{i:02}")),
            url: None,
            notes: None,
        })?;
        contact_ids.push(id);
    }

    let mut application_count = 0;
    for (name, industry) in COMPANIES {
        let slug = name.to_lowercase().replace(' ', "");
        let company_id = db.create_company(&CompanyFields {
            name: name.to_string(),
            website: Some(format!("https://{slug}.example.com")),
            industry: Some(industry.to_string()),
            notes: None,
        })?;

        let skill_count = rng.gen_range(2..=4);
        for skill in SKILLS.choose_multiple(&mut rng, skill_count) {
            db.link_company_skill(company_id, skill)?;
        }
        let contact_count = rng.gen_range(1..=2);
        for contact_id in contact_ids.choose_multiple(&mut rng, contact_count) {
            db.link_company_contact(company_id, *contact_id)?;
        }

        for _ in 0..rng.gen_range(1..=3) {
            let applied = Local::now().date_naive() - Duration::days(rng.gen_range(3..60));
            let application_id = db.create_application(&ApplicationFields {
                company_id,
                title: TITLES.choose(&mut rng).copied().unwrap_or(TITLES[0]).to_string(),
                description: None,
                salary_range: Some(format!(
                    "${}k-${}k",
                    rng.gen_range(10..16) * 10,
                    rng.gen_range(16..22) * 10
                )),
                platform: PLATFORMS.choose(&mut rng).map(|p| p.to_string()),
                url: None,
                address: None,
                location_type: [LocationType::Remote, LocationType::Hybrid, LocationType::OnSite]
                    .choose(&mut rng)
                    .copied(),
                status: Status::Saved,
                priority: rng.gen_range(0..=4),
                date_applied: Some(applied),
                follow_up_date: Some(applied + Duration::days(rng.gen_range(7..21))),
                notes: None,
            })?;
            application_count += 1;

            // Walk some applications forward so the history table has rows.
            if rng.gen_bool(0.6) {
                db.set_application_status(application_id, Status::Applied)?;
                if rng.gen_bool(0.3) {
                    db.set_application_status(application_id, Status::Interviewing)?;
                }
            }

            let skill_count = rng.gen_range(1..=3);
            for skill in SKILLS.choose_multiple(&mut rng, skill_count) {
                db.link_application_skill(application_id, skill)?;
            }
            let contact_count = rng.gen_range(0..=1);
            for contact_id in contact_ids.choose_multiple(&mut rng, contact_count) {
                db.link_application_contact(application_id, *contact_id)?;
            }
        }
    }

    Ok(SeedStats {
        companies: COMPANIES.len(),
        applications: application_count,
        contacts: CONTACT_NAMES.len(),
        skills: SKILLS.len(),
    })
}
