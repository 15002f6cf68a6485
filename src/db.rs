use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{Connection, params, params_from_iter, types::ToSql};

use crate::error::{Result, StoreError};
use crate::models::{
    Application, ApplicationFields, Company, CompanyFields, Contact, ContactFields, HistoryEntry,
    Skill, Status,
};

/// The schema & integrity layer. All invariants (uniqueness, priority range,
/// date ordering, email shape, cascades, status audit) are enforced here,
/// not trusted to callers.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

/// Optional narrowing for `list_applications`. Empty filter lists everything
/// in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<Status>,
    pub company: Option<String>,
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct Counts {
    pub companies: i64,
    pub applications: i64,
    pub contacts: i64,
    pub skills: i64,
}

impl Database {
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Validation(format!("cannot create {parent:?}: {e}")))?;
        }
        let conn = Connection::open(path)?;
        Self::apply_pragmas(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::apply_pragmas(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    fn apply_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                website TEXT UNIQUE,
                industry TEXT,
                notes TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT,
                salary_range TEXT,
                platform TEXT,
                url TEXT,
                address TEXT,
                location_type TEXT CHECK (location_type IN ('Remote', 'Hybrid', 'On-site')),
                status TEXT NOT NULL DEFAULT 'Saved'
                    CHECK (status IN ('Saved', 'Applied', 'Interviewing', 'Offer', 'Rejected', 'Ghosted')),
                priority INTEGER NOT NULL DEFAULT 0 CHECK (priority BETWEEN 0 AND 4),
                date_applied TEXT,
                follow_up_date TEXT,
                notes TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS skills (
                name TEXT PRIMARY KEY CHECK (length(trim(name)) > 0)
            );

            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                phone TEXT UNIQUE,
                url TEXT,
                notes TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS application_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
                old_status TEXT NOT NULL,
                new_status TEXT NOT NULL,
                changed_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS application_skills (
                application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
                skill_name TEXT NOT NULL REFERENCES skills(name) ON DELETE CASCADE,
                PRIMARY KEY (application_id, skill_name)
            );

            CREATE TABLE IF NOT EXISTS application_contacts (
                application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
                contact_id INTEGER NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
                PRIMARY KEY (application_id, contact_id)
            );

            CREATE TABLE IF NOT EXISTS company_contacts (
                company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                contact_id INTEGER NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
                PRIMARY KEY (company_id, contact_id)
            );

            CREATE TABLE IF NOT EXISTS company_skills (
                company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                skill_name TEXT NOT NULL REFERENCES skills(name) ON DELETE CASCADE,
                PRIMARY KEY (company_id, skill_name)
            );

            CREATE INDEX IF NOT EXISTS idx_applications_company ON applications(company_id);
            CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);
            CREATE INDEX IF NOT EXISTS idx_history_application ON application_history(application_id);

            -- Append one audit row per real status transition, atomically
            -- with the update itself. Non-status updates never fire.
            CREATE TRIGGER IF NOT EXISTS trg_application_status_history
            AFTER UPDATE OF status ON applications
            WHEN old.status != new.status
            BEGIN
                INSERT INTO application_history (application_id, old_status, new_status)
                VALUES (new.id, old.status, new.status);
            END;
            "#,
        )?;
        info!("schema ready at {}", self.path.display());
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='applications'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(StoreError::NotFound(
                "database not initialized, run 'apptrack init' first".into(),
            ));
        }
        Ok(())
    }

    // --- Company operations ---

    pub fn create_company(&self, fields: &CompanyFields) -> Result<i64> {
        fields.validate()?;
        self.conn.execute(
            "INSERT INTO companies (name, website, industry, notes) VALUES (?1, ?2, ?3, ?4)",
            params![fields.name, fields.website, fields.industry, fields.notes],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("created company #{id} '{}'", fields.name);
        Ok(id)
    }

    pub fn get_company(&self, id: i64) -> Result<Option<Company>> {
        let result = self.conn.query_row(
            "SELECT id, name, website, industry, notes, created_at, updated_at
             FROM companies WHERE id = ?1",
            [id],
            Self::row_to_company,
        );
        match result {
            Ok(company) => Ok(Some(company)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        let result = self.conn.query_row(
            "SELECT id, name, website, industry, notes, created_at, updated_at
             FROM companies WHERE LOWER(name) = LOWER(?1)",
            [name],
            Self::row_to_company,
        );
        match result {
            Ok(company) => Ok(Some(company)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_companies(&self) -> Result<Vec<Company>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, website, industry, notes, created_at, updated_at
             FROM companies ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::row_to_company)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn update_company(&self, id: i64, fields: &CompanyFields) -> Result<()> {
        fields.validate()?;
        let changed = self.conn.execute(
            "UPDATE companies
             SET name = ?1, website = ?2, industry = ?3, notes = ?4, updated_at = datetime('now')
             WHERE id = ?5",
            params![fields.name, fields.website, fields.industry, fields.notes, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("company #{id}")));
        }
        Ok(())
    }

    /// Cascades to the company's applications, their history, and any
    /// junction rows on either side.
    pub fn delete_company(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM companies WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("company #{id}")));
        }
        debug!("deleted company #{id}");
        Ok(())
    }

    fn row_to_company(row: &rusqlite::Row) -> rusqlite::Result<Company> {
        Ok(Company {
            id: row.get(0)?,
            name: row.get(1)?,
            website: row.get(2)?,
            industry: row.get(3)?,
            notes: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    // --- Application operations ---

    const APPLICATION_COLS: &'static str =
        "a.id, a.company_id, c.name, a.title, a.description, a.salary_range, a.platform,
         a.url, a.address, a.location_type, a.status, a.priority, a.date_applied,
         a.follow_up_date, a.notes, a.created_at, a.updated_at";

    pub fn create_application(&self, fields: &ApplicationFields) -> Result<i64> {
        fields.validate()?;
        self.conn.execute(
            "INSERT INTO applications
                 (company_id, title, description, salary_range, platform, url, address,
                  location_type, status, priority, date_applied, follow_up_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                fields.company_id,
                fields.title,
                fields.description,
                fields.salary_range,
                fields.platform,
                fields.url,
                fields.address,
                fields.location_type,
                fields.status,
                fields.priority,
                fields.date_applied,
                fields.follow_up_date,
                fields.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("created application #{id} '{}'", fields.title);
        Ok(id)
    }

    pub fn get_application(&self, id: i64) -> Result<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications a JOIN companies c ON a.company_id = c.id WHERE a.id = ?1",
            Self::APPLICATION_COLS
        );
        let result = self.conn.query_row(&sql, [id], Self::row_to_application);
        match result {
            Ok(application) => Ok(Some(application)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let mut sql = format!(
            "SELECT {} FROM applications a JOIN companies c ON a.company_id = c.id WHERE 1=1",
            Self::APPLICATION_COLS
        );
        let mut bind: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND a.status = ?{}", bind.len() + 1));
            bind.push(Box::new(status));
        }
        if let Some(company) = &filter.company {
            sql.push_str(&format!(" AND LOWER(c.name) = LOWER(?{})", bind.len() + 1));
            bind.push(Box::new(company.clone()));
        }
        if let Some(priority) = filter.priority {
            sql.push_str(&format!(" AND a.priority = ?{}", bind.len() + 1));
            bind.push(Box::new(priority));
        }
        sql.push_str(" ORDER BY a.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind), Self::row_to_application)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn applications_for_company(&self, company_id: i64) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications a JOIN companies c ON a.company_id = c.id
             WHERE a.company_id = ?1 ORDER BY a.id",
            Self::APPLICATION_COLS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([company_id], Self::row_to_application)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn applications_for_skill(&self, skill_name: &str) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications a
             JOIN companies c ON a.company_id = c.id
             JOIN application_skills link ON a.id = link.application_id
             WHERE link.skill_name = ?1 ORDER BY a.id",
            Self::APPLICATION_COLS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([skill_name], Self::row_to_application)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Full-field edit. A status change fires the audit trigger as part of
    /// the same statement.
    pub fn update_application(&self, id: i64, fields: &ApplicationFields) -> Result<()> {
        fields.validate()?;
        let changed = self.conn.execute(
            "UPDATE applications
             SET company_id = ?1, title = ?2, description = ?3, salary_range = ?4,
                 platform = ?5, url = ?6, address = ?7, location_type = ?8, status = ?9,
                 priority = ?10, date_applied = ?11, follow_up_date = ?12, notes = ?13,
                 updated_at = datetime('now')
             WHERE id = ?14",
            params![
                fields.company_id,
                fields.title,
                fields.description,
                fields.salary_range,
                fields.platform,
                fields.url,
                fields.address,
                fields.location_type,
                fields.status,
                fields.priority,
                fields.date_applied,
                fields.follow_up_date,
                fields.notes,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("application #{id}")));
        }
        Ok(())
    }

    pub fn set_application_status(&self, id: i64, status: Status) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE applications SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![status, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("application #{id}")));
        }
        debug!("application #{id} status set to {status}");
        Ok(())
    }

    pub fn delete_application(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM applications WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("application #{id}")));
        }
        debug!("deleted application #{id}");
        Ok(())
    }

    pub fn history_for_application(&self, application_id: i64) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, application_id, old_status, new_status, changed_at
             FROM application_history WHERE application_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([application_id], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                application_id: row.get(1)?,
                old_status: row.get(2)?,
                new_status: row.get(3)?,
                changed_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<Application> {
        Ok(Application {
            id: row.get(0)?,
            company_id: row.get(1)?,
            company_name: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            salary_range: row.get(5)?,
            platform: row.get(6)?,
            url: row.get(7)?,
            address: row.get(8)?,
            location_type: row.get(9)?,
            status: row.get(10)?,
            priority: row.get(11)?,
            date_applied: row.get(12)?,
            follow_up_date: row.get(13)?,
            notes: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }

    // --- Contact operations ---

    pub fn create_contact(&self, fields: &ContactFields) -> Result<i64> {
        fields.validate()?;
        self.conn.execute(
            "INSERT INTO contacts (name, email, phone, url, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![fields.name, fields.email, fields.phone, fields.url, fields.notes],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("created contact #{id} '{}'", fields.name);
        Ok(id)
    }

    pub fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
        let result = self.conn.query_row(
            "SELECT id, name, email, phone, url, notes, created_at, updated_at
             FROM contacts WHERE id = ?1",
            [id],
            Self::row_to_contact,
        );
        match result {
            Ok(contact) => Ok(Some(contact)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, url, notes, created_at, updated_at
             FROM contacts ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::row_to_contact)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn update_contact(&self, id: i64, fields: &ContactFields) -> Result<()> {
        fields.validate()?;
        let changed = self.conn.execute(
            "UPDATE contacts
             SET name = ?1, email = ?2, phone = ?3, url = ?4, notes = ?5,
                 updated_at = datetime('now')
             WHERE id = ?6",
            params![fields.name, fields.email, fields.phone, fields.url, fields.notes, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("contact #{id}")));
        }
        Ok(())
    }

    pub fn delete_contact(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("contact #{id}")));
        }
        debug!("deleted contact #{id}");
        Ok(())
    }

    fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            url: row.get(4)?,
            notes: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    // --- Skill operations ---

    pub fn create_skill(&self, name: &str) -> Result<()> {
        crate::models::validate_non_empty("skill name", name)?;
        self.conn
            .execute("INSERT INTO skills (name) VALUES (?1)", [name])?;
        debug!("created skill '{name}'");
        Ok(())
    }

    pub fn get_skill(&self, name: &str) -> Result<Option<Skill>> {
        let result = self.conn.query_row(
            "SELECT name FROM skills WHERE name = ?1",
            [name],
            |row| row.get(0).map(|name| Skill { name }),
        );
        match result {
            Ok(skill) => Ok(Some(skill)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM skills ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get(0).map(|name| Skill { name }))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn delete_skill(&self, name: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM skills WHERE name = ?1", [name])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("skill '{name}'")));
        }
        debug!("deleted skill '{name}'");
        Ok(())
    }

    // --- Relationship operations ---

    pub fn link_application_skill(&self, application_id: i64, skill_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO application_skills (application_id, skill_name) VALUES (?1, ?2)",
            params![application_id, skill_name],
        )?;
        Ok(())
    }

    pub fn unlink_application_skill(&self, application_id: i64, skill_name: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM application_skills WHERE application_id = ?1 AND skill_name = ?2",
            params![application_id, skill_name],
        )?;
        Ok(())
    }

    pub fn link_application_contact(&self, application_id: i64, contact_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO application_contacts (application_id, contact_id) VALUES (?1, ?2)",
            params![application_id, contact_id],
        )?;
        Ok(())
    }

    pub fn unlink_application_contact(&self, application_id: i64, contact_id: i64) -> Result<()> {
        self.conn.execute(
            "DELETE FROM application_contacts WHERE application_id = ?1 AND contact_id = ?2",
            params![application_id, contact_id],
        )?;
        Ok(())
    }

    pub fn link_company_contact(&self, company_id: i64, contact_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO company_contacts (company_id, contact_id) VALUES (?1, ?2)",
            params![company_id, contact_id],
        )?;
        Ok(())
    }

    pub fn link_company_skill(&self, company_id: i64, skill_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO company_skills (company_id, skill_name) VALUES (?1, ?2)",
            params![company_id, skill_name],
        )?;
        Ok(())
    }

    pub fn skills_for_application(&self, application_id: i64) -> Result<Vec<Skill>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name FROM skills s
             JOIN application_skills link ON s.name = link.skill_name
             WHERE link.application_id = ?1 ORDER BY s.name",
        )?;
        let rows = stmt.query_map([application_id], |row| row.get(0).map(|name| Skill { name }))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn skills_for_company(&self, company_id: i64) -> Result<Vec<Skill>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name FROM skills s
             JOIN company_skills link ON s.name = link.skill_name
             WHERE link.company_id = ?1 ORDER BY s.name",
        )?;
        let rows = stmt.query_map([company_id], |row| row.get(0).map(|name| Skill { name }))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn contacts_for_application(&self, application_id: i64) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, c.email, c.phone, c.url, c.notes, c.created_at, c.updated_at
             FROM contacts c
             JOIN application_contacts link ON c.id = link.contact_id
             WHERE link.application_id = ?1 ORDER BY c.id",
        )?;
        let rows = stmt.query_map([application_id], Self::row_to_contact)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn contacts_for_company(&self, company_id: i64) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, c.email, c.phone, c.url, c.notes, c.created_at, c.updated_at
             FROM contacts c
             JOIN company_contacts link ON c.id = link.contact_id
             WHERE link.company_id = ?1 ORDER BY c.id",
        )?;
        let rows = stmt.query_map([company_id], Self::row_to_contact)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // --- Aggregates ---

    pub fn counts(&self) -> Result<Counts> {
        let count = |table: &str| -> Result<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?)
        };
        Ok(Counts {
            companies: count("companies")?,
            applications: count("applications")?,
            contacts: count("contacts")?,
            skills: count("skills")?,
        })
    }
}
