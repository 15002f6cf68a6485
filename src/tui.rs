use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::debug;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::db::Database;
use crate::models::{Application, Company, Contact, HistoryEntry, Skill, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Companies,
    Applications,
    Contacts,
    Skills,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Companies, Tab::Applications, Tab::Contacts, Tab::Skills];

    fn title(&self) -> &'static str {
        match self {
            Tab::Companies => "Companies",
            Tab::Applications => "Applications",
            Tab::Contacts => "Contacts",
            Tab::Skills => "Skills",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// Full read of all four tables, produced by the reload worker.
struct Snapshot {
    companies: Vec<Company>,
    applications: Vec<Application>,
    contacts: Vec<Contact>,
    skills: Vec<Skill>,
}

/// Linked rows for the currently selected record, fetched on selection change.
#[derive(Default)]
struct Detail {
    applications: Vec<Application>,
    contacts: Vec<Contact>,
    skills: Vec<Skill>,
    history: Vec<HistoryEntry>,
}

struct PendingDelete {
    tab: Tab,
    label: String,
}

struct AppState {
    tab: Tab,
    snapshot: Snapshot,
    detail: Detail,
    selected: [usize; 4],
    scroll_offset: u16,
    confirm: Option<PendingDelete>,
    loading: bool,
    reload_gen: u64,
    message: Option<String>,
    accent: Color,
}

impl AppState {
    fn new(snapshot: Snapshot, accent: Color) -> Self {
        Self {
            tab: Tab::Companies,
            snapshot,
            detail: Detail::default(),
            selected: [0; 4],
            scroll_offset: 0,
            confirm: None,
            loading: false,
            reload_gen: 0,
            message: None,
            accent,
        }
    }

    fn current_len(&self) -> usize {
        match self.tab {
            Tab::Companies => self.snapshot.companies.len(),
            Tab::Applications => self.snapshot.applications.len(),
            Tab::Contacts => self.snapshot.contacts.len(),
            Tab::Skills => self.snapshot.skills.len(),
        }
    }

    fn selected_index(&self) -> usize {
        self.selected[self.tab.index()]
    }

    fn next(&mut self) {
        let len = self.current_len();
        let idx = &mut self.selected[self.tab.index()];
        if len > 0 && *idx < len - 1 {
            *idx += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        let idx = &mut self.selected[self.tab.index()];
        if *idx > 0 {
            *idx -= 1;
            self.scroll_offset = 0;
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        for (i, tab) in Tab::ALL.iter().enumerate() {
            let len = match tab {
                Tab::Companies => self.snapshot.companies.len(),
                Tab::Applications => self.snapshot.applications.len(),
                Tab::Contacts => self.snapshot.contacts.len(),
                Tab::Skills => self.snapshot.skills.len(),
            };
            if self.selected[i] >= len {
                self.selected[i] = len.saturating_sub(1);
            }
        }
        self.loading = false;
    }

    fn load_detail(&mut self, db: &Database) {
        self.detail = Detail::default();
        let idx = self.selected_index();
        match self.tab {
            Tab::Companies => {
                if let Some(company) = self.snapshot.companies.get(idx) {
                    self.detail.applications =
                        db.applications_for_company(company.id).unwrap_or_default();
                    self.detail.contacts = db.contacts_for_company(company.id).unwrap_or_default();
                    self.detail.skills = db.skills_for_company(company.id).unwrap_or_default();
                }
            }
            Tab::Applications => {
                if let Some(application) = self.snapshot.applications.get(idx) {
                    self.detail.skills =
                        db.skills_for_application(application.id).unwrap_or_default();
                    self.detail.contacts =
                        db.contacts_for_application(application.id).unwrap_or_default();
                    self.detail.history =
                        db.history_for_application(application.id).unwrap_or_default();
                }
            }
            Tab::Contacts => {}
            Tab::Skills => {
                if let Some(skill) = self.snapshot.skills.get(idx) {
                    self.detail.applications =
                        db.applications_for_skill(&skill.name).unwrap_or_default();
                }
            }
        }
    }
}

fn accent_for_theme(theme: &str) -> Color {
    match theme {
        "tokyo-night" => Color::Magenta,
        "gruvbox" => Color::Yellow,
        "nord" => Color::Blue,
        _ => Color::Cyan,
    }
}

fn load_snapshot(db: &Database) -> crate::error::Result<Snapshot> {
    Ok(Snapshot {
        companies: db.list_companies()?,
        applications: db.list_applications(&Default::default())?,
        contacts: db.list_contacts()?,
        skills: db.list_skills()?,
    })
}

/// One background reload at a time, newest wins: every request bumps the
/// generation, each worker tags its snapshot, and the receive side drops
/// anything older than the latest request.
fn spawn_reload(path: PathBuf, generation: u64, tx: mpsc::Sender<(u64, Snapshot)>) {
    thread::spawn(move || {
        let result = Database::open_at(&path).and_then(|db| load_snapshot(&db));
        if let Ok(snapshot) = result {
            let _ = tx.send((generation, snapshot));
        }
    });
}

pub fn run(db: &Database, theme: &str) -> Result<()> {
    db.ensure_initialized()?;
    let snapshot = load_snapshot(db)?;
    let mut state = AppState::new(snapshot, accent_for_theme(theme));
    state.load_detail(db);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, db);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    db: &Database,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<(u64, Snapshot)>();
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_index()));

    loop {
        while let Ok((generation, snapshot)) = rx.try_recv() {
            if generation == state.reload_gen {
                state.apply_snapshot(snapshot);
                state.load_detail(db);
            } else {
                debug!("dropping stale reload (gen {generation})");
            }
        }
        list_state.select(if state.current_len() == 0 {
            None
        } else {
            Some(state.selected_index())
        });

        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Confirmation overlay swallows all keys; dismissing mutates nothing.
        if state.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    if let Some(pending) = state.confirm.take() {
                        match perform_delete(db, state, pending.tab) {
                            Ok(()) => {
                                state.message = Some(format!("deleted {}", pending.label));
                                request_reload(state, db, &tx);
                            }
                            Err(e) => state.message = Some(format!("delete failed: {e}")),
                        }
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
                    state.confirm = None;
                }
                _ => {}
            }
            continue;
        }

        let prev_tab = state.tab;
        let prev_selected = state.selected_index();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Tab => {
                state.tab = Tab::ALL[(state.tab.index() + 1) % Tab::ALL.len()];
                state.scroll_offset = 0;
            }
            KeyCode::Char('1') => state.tab = Tab::Companies,
            KeyCode::Char('2') => state.tab = Tab::Applications,
            KeyCode::Char('3') => state.tab = Tab::Contacts,
            KeyCode::Char('4') => state.tab = Tab::Skills,
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => {
                state.scroll_offset = state.scroll_offset.saturating_add(3);
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                state.scroll_offset = state.scroll_offset.saturating_sub(3);
            }
            KeyCode::Char('R') => request_reload(state, db, &tx),
            KeyCode::Char('d') => {
                if let Some(label) = selected_label(state) {
                    state.confirm = Some(PendingDelete {
                        tab: state.tab,
                        label,
                    });
                }
            }
            KeyCode::Char(c) if state.tab == Tab::Applications => {
                let status = match c {
                    's' => Some(Status::Saved),
                    'a' => Some(Status::Applied),
                    'i' => Some(Status::Interviewing),
                    'o' => Some(Status::Offer),
                    'x' => Some(Status::Rejected),
                    'g' => Some(Status::Ghosted),
                    _ => None,
                };
                if let Some(status) = status {
                    let idx = state.selected_index();
                    if let Some(application) = state.snapshot.applications.get(idx) {
                        match db.set_application_status(application.id, status) {
                            Ok(()) => {
                                if let Some(a) = state.snapshot.applications.get_mut(idx) {
                                    a.status = status;
                                }
                                state.load_detail(db);
                            }
                            Err(e) => state.message = Some(format!("status change failed: {e}")),
                        }
                    }
                }
            }
            _ => {}
        }
        if state.tab != prev_tab || state.selected_index() != prev_selected {
            state.load_detail(db);
        }
    }
    Ok(())
}

fn request_reload(state: &mut AppState, db: &Database, tx: &mpsc::Sender<(u64, Snapshot)>) {
    state.reload_gen += 1;
    state.loading = true;
    spawn_reload(db.path().to_path_buf(), state.reload_gen, tx.clone());
}

fn selected_label(state: &AppState) -> Option<String> {
    let idx = state.selected_index();
    match state.tab {
        Tab::Companies => state.snapshot.companies.get(idx).map(|c| c.name.clone()),
        Tab::Applications => state.snapshot.applications.get(idx).map(|a| a.title.clone()),
        Tab::Contacts => state.snapshot.contacts.get(idx).map(|c| c.name.clone()),
        Tab::Skills => state.snapshot.skills.get(idx).map(|s| s.name.clone()),
    }
}

fn perform_delete(db: &Database, state: &AppState, tab: Tab) -> crate::error::Result<()> {
    let idx = state.selected[tab.index()];
    match tab {
        Tab::Companies => {
            if let Some(company) = state.snapshot.companies.get(idx) {
                db.delete_company(company.id)?;
            }
        }
        Tab::Applications => {
            if let Some(application) = state.snapshot.applications.get(idx) {
                db.delete_application(application.id)?;
            }
        }
        Tab::Contacts => {
            if let Some(contact) = state.snapshot.contacts.get(idx) {
                db.delete_contact(contact.id)?;
            }
        }
        Tab::Skills => {
            if let Some(skill) = state.snapshot.skills.get(idx) {
                db.delete_skill(&skill.name)?;
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    // Tab bar
    let mut spans: Vec<Span> = Vec::new();
    for tab in Tab::ALL {
        let style = if tab == state.tab {
            Style::default().fg(state.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
    }
    if state.loading {
        spans.push(Span::styled(" reloading...", Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    // Left pane: record list for the active tab
    let items = list_items(state);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " {} ({}) ",
            state.tab.title(),
            state.current_len()
        )))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, panes[0], list_state);

    // Right pane: detail
    let detail = Paragraph::new(build_detail(state))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail, panes[1]);

    // Footer
    let help = match state.tab {
        Tab::Applications => {
            " tab/1-4:switch  j/k:move  J/K:scroll  s/a/i/o/x/g:status  d:delete  R:reload  q:quit"
        }
        _ => " tab/1-4:switch  j/k:move  J/K:scroll  d:delete  R:reload  q:quit",
    };
    let footer = match &state.message {
        Some(msg) => format!("{help}  |  {msg}"),
        None => help.to_string(),
    };
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );

    // Confirmation overlay
    if let Some(pending) = &state.confirm {
        let area = centered_rect(50, 5, frame.area());
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!(
            "delete \"{}\" from {}?\n\n[y]es / [n]o",
            pending.label,
            pending.tab.title().to_lowercase()
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(prompt, area);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn list_items(state: &AppState) -> Vec<ListItem<'static>> {
    match state.tab {
        Tab::Companies => state
            .snapshot
            .companies
            .iter()
            .map(|c| {
                let industry = c.industry.as_deref().unwrap_or("-");
                ListItem::new(format!("#{:<4} {} | {}", c.id, truncate(&c.name, 24), industry))
            })
            .collect(),
        Tab::Applications => state
            .snapshot
            .applications
            .iter()
            .map(|a| {
                let marker = match a.status {
                    Status::Saved => " ",
                    Status::Applied => "+",
                    Status::Interviewing => "*",
                    Status::Offer => "!",
                    Status::Rejected => "x",
                    Status::Ghosted => "~",
                };
                ListItem::new(format!(
                    "{} #{:<4} {} @ {}",
                    marker,
                    a.id,
                    truncate(&a.title, 24),
                    truncate(&a.company_name, 16)
                ))
            })
            .collect(),
        Tab::Contacts => state
            .snapshot
            .contacts
            .iter()
            .map(|c| {
                let email = c.email.as_deref().unwrap_or("-");
                ListItem::new(format!("#{:<4} {} | {}", c.id, truncate(&c.name, 20), email))
            })
            .collect(),
        Tab::Skills => state
            .snapshot
            .skills
            .iter()
            .map(|s| ListItem::new(s.name.clone()))
            .collect(),
    }
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Saved => Style::default().fg(Color::Green),
        Status::Applied => Style::default().fg(Color::Cyan),
        Status::Interviewing => Style::default().fg(Color::Yellow),
        Status::Offer => Style::default().fg(Color::Magenta),
        Status::Rejected => Style::default().fg(Color::Red),
        Status::Ghosted => Style::default().fg(Color::DarkGray),
    }
}

fn build_detail(state: &AppState) -> Text<'static> {
    let idx = state.selected_index();
    let mut lines: Vec<Line> = Vec::new();

    match state.tab {
        Tab::Companies => {
            let Some(company) = state.snapshot.companies.get(idx) else {
                return Text::raw("No company selected");
            };
            lines.push(Line::from(Span::styled(
                company.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if let Some(website) = &company.website {
                lines.push(Line::from(format!("Website: {website}")));
            }
            if let Some(industry) = &company.industry {
                lines.push(Line::from(format!("Industry: {industry}")));
            }
            push_notes(&mut lines, company.notes.as_deref());
            if !state.detail.skills.is_empty() {
                let names: Vec<&str> =
                    state.detail.skills.iter().map(|s| s.name.as_str()).collect();
                lines.push(Line::from(format!("Skills: {}", names.join(", "))));
            }
            if !state.detail.contacts.is_empty() {
                lines.push(Line::from(""));
                lines.push(section_header("Contacts", state.accent));
                for contact in &state.detail.contacts {
                    let email = contact.email.as_deref().unwrap_or("-");
                    lines.push(Line::from(format!("  #{} {} ({email})", contact.id, contact.name)));
                }
            }
            if !state.detail.applications.is_empty() {
                lines.push(Line::from(""));
                lines.push(section_header("Applications", state.accent));
                for application in &state.detail.applications {
                    lines.push(Line::from(vec![
                        Span::raw(format!("  #{} {} ", application.id, application.title)),
                        Span::styled(
                            format!("[{}]", application.status),
                            status_style(application.status),
                        ),
                    ]));
                }
            }
        }
        Tab::Applications => {
            let Some(application) = state.snapshot.applications.get(idx) else {
                return Text::raw("No application selected");
            };
            lines.push(Line::from(Span::styled(
                application.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("at {}", application.company_name)));
            lines.push(Line::from(Span::styled(
                format!("Status: {}", application.status),
                status_style(application.status),
            )));
            lines.push(Line::from(format!("Priority: {}", application.priority)));
            if let Some(location) = application.location_type {
                lines.push(Line::from(format!("Location: {location}")));
            }
            if let Some(salary) = &application.salary_range {
                lines.push(Line::from(format!("Salary: {salary}")));
            }
            if let Some(platform) = &application.platform {
                lines.push(Line::from(format!("Platform: {platform}")));
            }
            if let Some(url) = &application.url {
                lines.push(Line::from(format!("URL: {url}")));
            }
            if let Some(applied) = application.date_applied {
                lines.push(Line::from(format!("Applied: {applied}")));
            }
            if let Some(follow_up) = application.follow_up_date {
                lines.push(Line::from(format!("Follow up: {follow_up}")));
            }
            if !state.detail.skills.is_empty() {
                let names: Vec<&str> =
                    state.detail.skills.iter().map(|s| s.name.as_str()).collect();
                lines.push(Line::from(format!("Skills: {}", names.join(", "))));
            }
            if !state.detail.contacts.is_empty() {
                let names: Vec<&str> =
                    state.detail.contacts.iter().map(|c| c.name.as_str()).collect();
                lines.push(Line::from(format!("Contacts: {}", names.join(", "))));
            }
            push_notes(&mut lines, application.notes.as_deref());
            if !state.detail.history.is_empty() {
                lines.push(Line::from(""));
                lines.push(section_header("History", state.accent));
                for entry in &state.detail.history {
                    lines.push(Line::from(format!(
                        "  {}  {} -> {}",
                        entry.changed_at, entry.old_status, entry.new_status
                    )));
                }
            }
        }
        Tab::Contacts => {
            let Some(contact) = state.snapshot.contacts.get(idx) else {
                return Text::raw("No contact selected");
            };
            lines.push(Line::from(Span::styled(
                contact.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if let Some(email) = &contact.email {
                lines.push(Line::from(format!("Email: {email}")));
            }
            if let Some(phone) = &contact.phone {
                lines.push(Line::from(format!("Phone: {phone}")));
            }
            if let Some(url) = &contact.url {
                lines.push(Line::from(format!("URL: {url}")));
            }
            push_notes(&mut lines, contact.notes.as_deref());
        }
        Tab::Skills => {
            let Some(skill) = state.snapshot.skills.get(idx) else {
                return Text::raw("No skill selected");
            };
            lines.push(Line::from(Span::styled(
                skill.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if !state.detail.applications.is_empty() {
                lines.push(Line::from(""));
                lines.push(section_header("Used by", state.accent));
                for application in &state.detail.applications {
                    lines.push(Line::from(format!(
                        "  #{} {} @ {}",
                        application.id, application.title, application.company_name
                    )));
                }
            }
        }
    }

    Text::from(lines)
}

fn section_header(title: &str, accent: Color) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ))
}

fn push_notes(lines: &mut Vec<Line<'static>>, notes: Option<&str>) {
    if let Some(notes) = notes {
        lines.push(Line::from(""));
        for line in textwrap::fill(notes, 70).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
