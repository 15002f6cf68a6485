use chrono::NaiveDate;

use apptrack::db::{ApplicationFilter, Database};
use apptrack::error::StoreError;
use apptrack::models::{ApplicationFields, CompanyFields, ContactFields, Status};

fn setup() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.init().unwrap();
    db
}

fn add_company(db: &Database, name: &str) -> i64 {
    db.create_company(&CompanyFields {
        name: name.to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn add_application(db: &Database, company_id: i64, title: &str) -> i64 {
    db.create_application(&ApplicationFields {
        company_id,
        title: title.to_string(),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn company_round_trip() {
    let db = setup();
    let id = add_company(&db, "Acme");
    let company = db.get_company(id).unwrap().unwrap();
    assert_eq!(company.name, "Acme");
    assert!(db.get_company(id + 1).unwrap().is_none());
    let by_name = db.get_company_by_name("acme").unwrap().unwrap();
    assert_eq!(by_name.id, id);
}

#[test]
fn duplicate_company_name_is_a_uniqueness_error() {
    let db = setup();
    add_company(&db, "Acme");
    let err = db
        .create_company(&CompanyFields {
            name: "Acme".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Uniqueness(_)));
}

#[test]
fn duplicate_website_is_a_uniqueness_error() {
    let db = setup();
    db.create_company(&CompanyFields {
        name: "Acme".to_string(),
        website: Some("https://acme.example.com".to_string()),
        ..Default::default()
    })
    .unwrap();
    let err = db
        .create_company(&CompanyFields {
            name: "Other".to_string(),
            website: Some("https://acme.example.com".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Uniqueness(_)));
}

#[test]
fn malformed_contact_email_is_a_validation_error() {
    let db = setup();
    let err = db
        .create_contact(&ContactFields {
            name: "Jo".to_string(),
            email: Some("wrong".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn duplicate_contact_email_is_a_uniqueness_error() {
    let db = setup();
    let fields = ContactFields {
        name: "Jo".to_string(),
        email: Some("jo@example.com".to_string()),
        ..Default::default()
    };
    db.create_contact(&fields).unwrap();
    let err = db
        .create_contact(&ContactFields {
            name: "Another Jo".to_string(),
            ..fields
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Uniqueness(_)));
}

#[test]
fn priority_out_of_range_is_rejected() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let err = db
        .create_application(&ApplicationFields {
            company_id,
            title: "Engineer".to_string(),
            priority: 5,
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn follow_up_before_applied_is_rejected() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let err = db
        .create_application(&ApplicationFields {
            company_id,
            title: "Engineer".to_string(),
            date_applied: NaiveDate::from_ymd_opt(2025, 5, 10),
            follow_up_date: NaiveDate::from_ymd_opt(2025, 5, 1),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn application_without_company_is_an_integrity_error() {
    let db = setup();
    let err = db
        .create_application(&ApplicationFields {
            company_id: 42,
            title: "Engineer".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Integrity(_)));
}

#[test]
fn status_change_appends_exactly_one_history_row() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");

    db.set_application_status(application_id, Status::Applied)
        .unwrap();

    let history = db.history_for_application(application_id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_status, Status::Saved);
    assert_eq!(history[0].new_status, Status::Applied);
}

#[test]
fn setting_the_same_status_appends_nothing() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");

    db.set_application_status(application_id, Status::Saved)
        .unwrap();

    assert!(db.history_for_application(application_id).unwrap().is_empty());
}

#[test]
fn non_status_update_appends_nothing() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");

    db.update_application(
        application_id,
        &ApplicationFields {
            company_id,
            title: "Engineer".to_string(),
            notes: Some("followed up by phone".to_string()),
            priority: 3,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(db.history_for_application(application_id).unwrap().is_empty());
}

#[test]
fn full_field_update_with_status_change_is_audited() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");

    db.update_application(
        application_id,
        &ApplicationFields {
            company_id,
            title: "Senior Engineer".to_string(),
            status: Status::Interviewing,
            ..Default::default()
        },
    )
    .unwrap();

    let history = db.history_for_application(application_id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_status, Status::Saved);
    assert_eq!(history[0].new_status, Status::Interviewing);
    let application = db.get_application(application_id).unwrap().unwrap();
    assert_eq!(application.title, "Senior Engineer");
}

#[test]
fn deleting_a_company_cascades_to_applications_and_history() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");
    db.set_application_status(application_id, Status::Applied)
        .unwrap();

    db.delete_company(company_id).unwrap();

    assert!(db.get_application(application_id).unwrap().is_none());
    assert!(db.history_for_application(application_id).unwrap().is_empty());
    assert!(
        db.list_applications(&ApplicationFilter::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn deleting_either_side_removes_junction_rows() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");
    db.create_skill("Rust").unwrap();
    let contact_id = db
        .create_contact(&ContactFields {
            name: "Jo".to_string(),
            ..Default::default()
        })
        .unwrap();

    db.link_application_skill(application_id, "Rust").unwrap();
    db.link_application_contact(application_id, contact_id)
        .unwrap();
    db.link_company_contact(company_id, contact_id).unwrap();
    db.link_company_skill(company_id, "Rust").unwrap();

    // Deleting the skill clears its links but leaves the application alone.
    db.delete_skill("Rust").unwrap();
    assert!(db.skills_for_application(application_id).unwrap().is_empty());
    assert!(db.skills_for_company(company_id).unwrap().is_empty());
    assert!(db.get_application(application_id).unwrap().is_some());

    // Deleting the contact clears the remaining links.
    db.delete_contact(contact_id).unwrap();
    assert!(
        db.contacts_for_application(application_id)
            .unwrap()
            .is_empty()
    );
    assert!(db.contacts_for_company(company_id).unwrap().is_empty());
}

#[test]
fn linking_an_unknown_skill_is_an_integrity_error() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");
    let err = db
        .link_application_skill(application_id, "Cobol")
        .unwrap_err();
    assert!(matches!(err, StoreError::Integrity(_)));
}

#[test]
fn relationship_queries_resolve_both_directions() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    let application_id = add_application(&db, company_id, "Engineer");
    db.create_skill("Rust").unwrap();
    db.create_skill("SQL").unwrap();
    db.link_application_skill(application_id, "SQL").unwrap();
    db.link_application_skill(application_id, "Rust").unwrap();

    let skills = db.skills_for_application(application_id).unwrap();
    let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Rust", "SQL"]);

    let applications = db.applications_for_skill("Rust").unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].id, application_id);

    db.unlink_application_skill(application_id, "Rust").unwrap();
    assert!(db.applications_for_skill("Rust").unwrap().is_empty());

    let contact_id = db
        .create_contact(&ContactFields {
            name: "Jo".to_string(),
            ..Default::default()
        })
        .unwrap();
    db.link_application_contact(application_id, contact_id)
        .unwrap();
    assert_eq!(db.contacts_for_application(application_id).unwrap().len(), 1);
    db.unlink_application_contact(application_id, contact_id)
        .unwrap();
    assert!(
        db.contacts_for_application(application_id)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn updates_replace_fields_and_validate() {
    let db = setup();
    let company_id = add_company(&db, "Acme");
    db.update_company(
        company_id,
        &CompanyFields {
            name: "Acme Corp".to_string(),
            industry: Some("Data".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let company = db.get_company(company_id).unwrap().unwrap();
    assert_eq!(company.name, "Acme Corp");
    assert_eq!(company.industry.as_deref(), Some("Data"));

    let contact_id = db
        .create_contact(&ContactFields {
            name: "Jo".to_string(),
            ..Default::default()
        })
        .unwrap();
    let err = db
        .update_contact(
            contact_id,
            &ContactFields {
                name: "Jo".to_string(),
                email: Some("not-an-email".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    db.update_contact(
        contact_id,
        &ContactFields {
            name: "Jo".to_string(),
            email: Some("jo@example.com".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let contact = db.get_contact(contact_id).unwrap().unwrap();
    assert_eq!(contact.email.as_deref(), Some("jo@example.com"));
}

#[test]
fn skill_round_trip() {
    let db = setup();
    db.create_skill("Rust").unwrap();
    assert!(db.get_skill("Rust").unwrap().is_some());
    assert!(db.get_skill("Cobol").unwrap().is_none());
    assert!(matches!(
        db.create_skill("Rust").unwrap_err(),
        StoreError::Uniqueness(_)
    ));
}

#[test]
fn empty_skill_name_is_rejected() {
    let db = setup();
    assert!(matches!(
        db.create_skill("  ").unwrap_err(),
        StoreError::Validation(_)
    ));
}

#[test]
fn missing_rows_surface_as_not_found() {
    let db = setup();
    assert!(matches!(
        db.delete_company(1).unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        db.set_application_status(1, Status::Applied).unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        db.delete_skill("Rust").unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[test]
fn list_applications_filters_compose() {
    let db = setup();
    let acme = add_company(&db, "Acme");
    let globex = add_company(&db, "Globex");
    let a1 = add_application(&db, acme, "Engineer");
    let a2 = add_application(&db, globex, "Analyst");
    db.set_application_status(a2, Status::Applied).unwrap();

    let all = db.list_applications(&ApplicationFilter::default()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, a1); // insertion order

    let applied = db
        .list_applications(&ApplicationFilter {
            status: Some(Status::Applied),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].id, a2);

    let at_acme = db
        .list_applications(&ApplicationFilter {
            company: Some("acme".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(at_acme.len(), 1);
    assert_eq!(at_acme[0].company_name, "Acme");
}

#[test]
fn uninitialized_database_is_reported() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.ensure_initialized().is_err());
}

#[test]
fn open_at_creates_the_file_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("apptrack.db");
    {
        let db = Database::open_at(&path).unwrap();
        db.init().unwrap();
        add_company(&db, "Acme");
    }
    let db = Database::open_at(&path).unwrap();
    db.ensure_initialized().unwrap();
    assert_eq!(db.list_companies().unwrap().len(), 1);
}

// The end-to-end scenario from the requirements: create, transition, touch a
// non-status field, then cascade away.
#[test]
fn acme_engineer_scenario() {
    let db = setup();
    let acme = add_company(&db, "Acme");
    let engineer = add_application(&db, acme, "Engineer");

    db.set_application_status(engineer, Status::Applied).unwrap();
    let history = db.history_for_application(engineer).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        (history[0].old_status, history[0].new_status),
        (Status::Saved, Status::Applied)
    );

    db.update_application(
        engineer,
        &ApplicationFields {
            company_id: acme,
            title: "Engineer".to_string(),
            status: Status::Applied,
            priority: 2,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(db.history_for_application(engineer).unwrap().len(), 1);

    db.delete_company(acme).unwrap();
    assert!(db.get_application(engineer).unwrap().is_none());
    assert!(db.history_for_application(engineer).unwrap().is_empty());
}

#[test]
fn seeded_database_is_consistent_and_refuses_a_second_run() {
    let db = setup();
    let stats = apptrack::seed::run(&db).unwrap();
    let counts = db.counts().unwrap();
    assert_eq!(counts.companies, stats.companies as i64);
    assert_eq!(counts.applications, stats.applications as i64);
    assert_eq!(counts.contacts, stats.contacts as i64);
    assert_eq!(counts.skills, stats.skills as i64);
    assert!(apptrack::seed::run(&db).is_err());
}
