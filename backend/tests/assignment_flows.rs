//! End-to-end assignment scenarios over the in-memory adapters.
//!
//! Covers the registration-to-assignment happy path, the no-match path, and
//! the exactly-once completion side effects.

use std::sync::Arc;

use mockable::DefaultClock;

use backend::api::{AppState, StatePorts};
use backend::domain::ports::{
    FixtureGeolocationProvider, FixturePaymentGateway, MessageRepository, NotificationRepository,
    TranslatorDirectory,
};
use backend::domain::{
    AssignmentOutcome, CurrencyCode, DisplayName, ErrorCode, Language, Money, ProjectDraft,
    UserId, UserRole,
};
use backend::outbound::{
    InMemoryLedgerStore, InMemoryMessageRepository, InMemoryNotificationRepository,
    InMemoryProjectRepository, InMemoryTranslatorDirectory, InMemoryUserAccountRepository,
};

struct Harness {
    directory: Arc<InMemoryTranslatorDirectory>,
    notifications: Arc<InMemoryNotificationRepository>,
    messages: Arc<InMemoryMessageRepository>,
    state: AppState,
}

impl Harness {
    fn new() -> Self {
        let directory = Arc::new(InMemoryTranslatorDirectory::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let state = AppState::new(StatePorts {
            ledger: Arc::new(InMemoryLedgerStore::new()),
            users: Arc::new(InMemoryUserAccountRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
            directory: Arc::clone(&directory) as Arc<dyn TranslatorDirectory>,
            notifications: Arc::clone(&notifications) as Arc<dyn NotificationRepository>,
            messages: Arc::clone(&messages) as Arc<dyn MessageRepository>,
            gateway: Arc::new(FixturePaymentGateway),
            geolocation: Arc::new(FixtureGeolocationProvider),
            gateway_currency: CurrencyCode::new("INR").expect("valid code"),
            clock: Arc::new(DefaultClock),
        });
        Self {
            directory,
            notifications,
            messages,
            state,
        }
    }

    async fn register(&self, name: &str, role: UserRole) -> UserId {
        let account = self
            .state
            .onboarding
            .register(DisplayName::new(name).expect("valid name"), role)
            .await
            .expect("registration succeeds");
        *account.id()
    }

    fn draft(&self, client_id: UserId, title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_owned(),
            source_language: Language::new("English").expect("valid language"),
            target_language: Language::new("Spanish").expect("valid language"),
            word_count: 500,
            deadline: chrono::Utc::now(),
            price: Money::from_major(60),
            client_id,
        }
    }
}

#[tokio::test]
async fn project_creation_auto_assigns_an_eligible_translator() {
    let harness = Harness::new();
    let client = harness.register("Avery Client", UserRole::Client).await;
    // The starter profile covers English/Spanish with spare capacity.
    let translator = harness
        .register("Noor Translator", UserRole::Translator)
        .await;

    let outcome = harness
        .state
        .assignment
        .create_project(harness.draft(client, "Product brochure"))
        .await
        .expect("project creates");

    let AssignmentOutcome::Assigned(project) = outcome else {
        panic!("expected auto-assignment");
    };
    let assignment = project.assignment().expect("assignment present");
    assert_eq!(assignment.translator_id, translator);
    assert!(assignment.auto_assigned);
    assert!(assignment.match_score > 0.0);

    let profile = harness
        .directory
        .find_by_user_id(&translator)
        .await
        .expect("directory answers")
        .expect("profile exists");
    assert_eq!(profile.active_projects(), 1);

    let client_feed = harness
        .notifications
        .list_for_user(&client)
        .await
        .expect("feed loads");
    assert!(
        client_feed
            .iter()
            .any(|n| n.title() == "Translator Assigned!")
    );
    let translator_feed = harness
        .notifications
        .list_for_user(&translator)
        .await
        .expect("feed loads");
    assert!(
        translator_feed
            .iter()
            .any(|n| n.title() == "New Project Assigned")
    );

    let feed = harness
        .messages
        .list_for_project(project.id())
        .await
        .expect("messages load");
    assert_eq!(feed.len(), 1);
    assert!(feed.iter().all(|m| m.body().contains("Noor Translator")));
}

#[tokio::test]
async fn no_eligible_translator_keeps_the_project_pending() {
    let harness = Harness::new();
    let client = harness.register("Avery Client", UserRole::Client).await;

    let outcome = harness
        .state
        .assignment
        .create_project(harness.draft(client, "Unmatched work"))
        .await
        .expect("creation succeeds without a match");

    let AssignmentOutcome::AwaitingTranslator(project) = outcome else {
        panic!("expected the project to stay pending");
    };
    assert_eq!(project.status().label(), "pending");

    let feed = harness
        .notifications
        .list_for_user(&client)
        .await
        .expect("feed loads");
    assert!(feed.iter().any(|n| n.title() == "Project Pending"));
}

#[tokio::test]
async fn capacity_exhaustion_stops_further_assignment() {
    let harness = Harness::new();
    let client = harness.register("Avery Client", UserRole::Client).await;
    harness
        .register("Noor Translator", UserRole::Translator)
        .await;

    // The starter profile takes three concurrent projects.
    for index in 0..3 {
        let outcome = harness
            .state
            .assignment
            .create_project(harness.draft(client, &format!("Batch {index}")))
            .await
            .expect("project creates");
        assert!(matches!(outcome, AssignmentOutcome::Assigned(_)));
    }

    let outcome = harness
        .state
        .assignment
        .create_project(harness.draft(client, "One too many"))
        .await
        .expect("creation succeeds without a match");
    assert!(matches!(outcome, AssignmentOutcome::AwaitingTranslator(_)));
}

#[tokio::test]
async fn completion_side_effects_fire_exactly_once() {
    let harness = Harness::new();
    let client = harness.register("Avery Client", UserRole::Client).await;
    let translator = harness
        .register("Noor Translator", UserRole::Translator)
        .await;

    let outcome = harness
        .state
        .assignment
        .create_project(harness.draft(client, "Contract translation"))
        .await
        .expect("project creates");
    let project_id = *outcome.project().id();

    let completed = harness
        .state
        .assignment
        .complete_project(&project_id)
        .await
        .expect("completion succeeds");
    assert_eq!(completed.status().label(), "completed");

    let error = harness
        .state
        .assignment
        .complete_project(&project_id)
        .await
        .expect_err("second completion rejected");
    assert_eq!(error.code(), ErrorCode::Conflict);

    let profile = harness
        .directory
        .find_by_user_id(&translator)
        .await
        .expect("directory answers")
        .expect("profile exists");
    assert_eq!(profile.active_projects(), 0);
    assert_eq!(profile.completed_projects(), 1);
}

#[tokio::test]
async fn assigned_projects_walk_the_status_machine() {
    let harness = Harness::new();
    let client = harness.register("Avery Client", UserRole::Client).await;
    harness
        .register("Noor Translator", UserRole::Translator)
        .await;

    let outcome = harness
        .state
        .assignment
        .create_project(harness.draft(client, "Website copy"))
        .await
        .expect("project creates");
    let project_id = *outcome.project().id();

    let started = harness
        .state
        .assignment
        .start_project(&project_id)
        .await
        .expect("starts");
    assert_eq!(started.status().label(), "in-progress");

    let reviewed = harness
        .state
        .assignment
        .submit_for_review(&project_id)
        .await
        .expect("reviews");
    assert_eq!(reviewed.status().label(), "review");

    let error = harness
        .state
        .assignment
        .start_project(&project_id)
        .await
        .expect_err("cannot start from review");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn participants_can_message_and_counterparties_get_notified() {
    let harness = Harness::new();
    let client = harness.register("Avery Client", UserRole::Client).await;
    let translator = harness
        .register("Noor Translator", UserRole::Translator)
        .await;

    let outcome = harness
        .state
        .assignment
        .create_project(harness.draft(client, "Press kit"))
        .await
        .expect("project creates");
    let project_id = *outcome.project().id();

    harness
        .state
        .messaging
        .send_message(&project_id, &client, "How is it going?")
        .await
        .expect("client message sends");

    let counts = harness
        .state
        .messaging
        .unread_counts(&translator)
        .await
        .expect("counts load");
    assert_eq!(counts.messages, 1);
    // Assignment plus the new-message alert.
    assert!(counts.notifications >= 2);

    let feed = harness
        .state
        .messaging
        .project_feed(&project_id)
        .await
        .expect("feed loads");
    // Welcome message plus the client's question, oldest first.
    assert_eq!(feed.len(), 2);
    assert!(feed.first().is_some_and(|m| m.body().contains("Welcome")));
}
