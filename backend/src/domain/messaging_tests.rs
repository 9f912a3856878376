//! Regression coverage for the messaging service.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;

use super::*;
use crate::domain::currency::CurrencyCode;
use crate::domain::error::ErrorCode;
use crate::domain::money::Money;
use crate::domain::ports::{
    MockMessageRepository, MockNotificationRepository, MockProjectRepository,
    MockUserAccountRepository,
};
use crate::domain::project::{Assignment, ProjectDraft};
use crate::domain::translator::Language;
use crate::domain::user::{DisplayName, UserAccount, UserRole};

struct Collaborators {
    projects: MockProjectRepository,
    users: MockUserAccountRepository,
    notifications: MockNotificationRepository,
    messages: MockMessageRepository,
}

impl Collaborators {
    fn new() -> Self {
        Self {
            projects: MockProjectRepository::new(),
            users: MockUserAccountRepository::new(),
            notifications: MockNotificationRepository::new(),
            messages: MockMessageRepository::new(),
        }
    }

    fn into_service(self) -> MessagingService {
        MessagingService::new(
            Arc::new(self.projects),
            Arc::new(self.users),
            Arc::new(self.notifications),
            Arc::new(self.messages),
            Arc::new(DefaultClock),
        )
    }
}

fn account(id: UserId, name: &str, role: UserRole) -> UserAccount {
    UserAccount::new(
        id,
        DisplayName::new(name).expect("valid name"),
        role,
        CurrencyCode::base(),
    )
}

fn pending_project(client_id: UserId) -> Project {
    Project::new(
        ProjectDraft {
            title: "Press release".to_owned(),
            source_language: Language::new("English").expect("valid language"),
            target_language: Language::new("Spanish").expect("valid language"),
            word_count: 300,
            deadline: Utc::now(),
            price: Money::from_major(30),
            client_id,
        },
        Utc::now(),
    )
    .expect("valid draft")
}

fn assigned_project(client_id: UserId, translator_id: UserId) -> Project {
    let mut project = pending_project(client_id);
    project
        .assign(
            Assignment {
                translator_id,
                translator_name: "Noor Translator".to_owned(),
                match_score: 90.0,
                auto_assigned: true,
                assigned_at: Utc::now(),
            },
            Utc::now(),
        )
        .expect("assigns");
    project
}

#[tokio::test]
async fn client_message_reaches_the_assigned_translator() {
    let client_id = UserId::random();
    let translator_id = UserId::random();
    let project = assigned_project(client_id, translator_id);
    let project_id = *project.id();
    let mut mocks = Collaborators::new();

    mocks
        .projects
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(project)));
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(account(*id, "Avery Client", UserRole::Client))));
    mocks
        .messages
        .expect_push()
        .withf(move |message| {
            message.recipient_id() == Some(&translator_id)
                && message.sender_name() == "Avery Client"
                && message.body() == "How is it going?"
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_push()
        .withf(move |notification| {
            notification.user_id() == &translator_id && notification.title() == "New Message"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = mocks.into_service();
    let message = service
        .send_message(&project_id, &client_id, "How is it going?")
        .await
        .expect("message sends");
    assert!(!message.is_read());
}

#[tokio::test]
async fn translator_message_notifies_the_client() {
    let client_id = UserId::random();
    let translator_id = UserId::random();
    let project = assigned_project(client_id, translator_id);
    let project_id = *project.id();
    let mut mocks = Collaborators::new();

    mocks
        .projects
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(project)));
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(account(*id, "Noor Translator", UserRole::Translator))));
    mocks
        .messages
        .expect_push()
        .withf(move |message| message.recipient_id() == Some(&client_id))
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_push()
        .withf(move |notification| notification.user_id() == &client_id)
        .times(1)
        .return_once(|_| Ok(()));

    let service = mocks.into_service();
    service
        .send_message(&project_id, &translator_id, "Draft attached.")
        .await
        .expect("message sends");
}

#[tokio::test]
async fn outsiders_cannot_send_messages() {
    let project = assigned_project(UserId::random(), UserId::random());
    let project_id = *project.id();
    let outsider = UserId::random();
    let mut mocks = Collaborators::new();

    mocks
        .projects
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(project)));
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(account(*id, "Random Person", UserRole::Client))));
    mocks.messages.expect_push().times(0);

    let service = mocks.into_service();
    let error = service
        .send_message(&project_id, &outsider, "Hello?")
        .await
        .expect_err("outsider rejected");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn unassigned_project_messages_carry_no_recipient() {
    let client_id = UserId::random();
    let project = pending_project(client_id);
    let project_id = *project.id();
    let mut mocks = Collaborators::new();

    mocks
        .projects
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(project)));
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(account(*id, "Avery Client", UserRole::Client))));
    mocks
        .messages
        .expect_push()
        .withf(|message| message.recipient_id().is_none())
        .times(1)
        .return_once(|_| Ok(()));
    mocks.notifications.expect_push().times(0);

    let service = mocks.into_service();
    service
        .send_message(&project_id, &client_id, "Looking forward to a match!")
        .await
        .expect("message sends");
}

#[tokio::test]
async fn blank_bodies_are_rejected_before_any_lookup() {
    let mocks = Collaborators::new();
    let service = mocks.into_service();

    let error = service
        .send_message(&crate::domain::project::ProjectId::random(), &UserId::random(), "   ")
        .await
        .expect_err("blank body rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn unread_counts_combine_both_feeds() {
    let user_id = UserId::random();
    let mut mocks = Collaborators::new();

    mocks
        .notifications
        .expect_unread_count()
        .return_once(|_| Ok(3));
    mocks.messages.expect_unread_count().return_once(|_| Ok(2));

    let service = mocks.into_service();
    let counts = service.unread_counts(&user_id).await.expect("counts load");
    assert_eq!(
        counts,
        UnreadCounts {
            notifications: 3,
            messages: 2,
        }
    );
}
