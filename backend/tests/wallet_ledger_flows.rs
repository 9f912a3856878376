//! End-to-end wallet scenarios over the in-memory adapters.
//!
//! These suites exercise the ledger service against the reference
//! persistence implementation and a scripted gateway double, covering the
//! money-movement properties: commissions, fee absorption, and the
//! all-or-nothing policy on gateway failure.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;

use backend::domain::ports::{
    CaptureRequest, GatewayOrder, GatewayPayout, LedgerStore, NotificationRepository,
    PaymentGateway, PaymentGatewayError, PayoutRequest, UserAccountRepository,
};
use backend::domain::{
    Assignment, CurrencyCode, DepositRequest, DisplayName, ErrorCode, LedgerOwner, LedgerService,
    Money, PaymentRequest, Project, ProjectDraft, Language, SettleDepositRequest, Transaction,
    TransactionKind, TransactionStatus, UserAccount, UserId, UserRole, WithdrawRequest,
};
use backend::outbound::{
    InMemoryLedgerStore, InMemoryNotificationRepository, InMemoryProjectRepository,
    InMemoryUserAccountRepository,
};

/// Gateway double that follows a fixed script.
#[derive(Debug, Default)]
struct ScriptedGateway {
    reject_capture: bool,
    reject_payout: bool,
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &CurrencyCode,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        Ok(GatewayOrder {
            order_ref: "order_test".to_owned(),
            amount_minor,
            currency: currency.clone(),
        })
    }

    async fn capture_payment(&self, _request: &CaptureRequest) -> Result<(), PaymentGatewayError> {
        if self.reject_capture {
            return Err(PaymentGatewayError::rejected("card declined"));
        }
        Ok(())
    }

    async fn create_payout(
        &self,
        _request: &PayoutRequest,
    ) -> Result<GatewayPayout, PaymentGatewayError> {
        if self.reject_payout {
            return Err(PaymentGatewayError::rejected("payout blocked"));
        }
        Ok(GatewayPayout {
            payout_ref: "pout_test".to_owned(),
        })
    }
}

struct Harness {
    ledger_store: Arc<InMemoryLedgerStore>,
    users: Arc<InMemoryUserAccountRepository>,
    projects: Arc<InMemoryProjectRepository>,
    notifications: Arc<InMemoryNotificationRepository>,
    service: LedgerService,
}

impl Harness {
    fn new(gateway: ScriptedGateway) -> Self {
        let ledger_store = Arc::new(InMemoryLedgerStore::new());
        let users = Arc::new(InMemoryUserAccountRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let service = LedgerService::new(
            Arc::clone(&ledger_store),
            Arc::clone(&users),
            Arc::clone(&projects),
            Arc::clone(&notifications),
            Arc::new(gateway),
            CurrencyCode::new("INR").expect("valid code"),
            Arc::new(DefaultClock),
        );
        Self {
            ledger_store,
            users,
            projects,
            notifications,
            service,
        }
    }

    async fn add_account(&self, name: &str, role: UserRole) -> UserId {
        let account = UserAccount::new(
            UserId::random(),
            DisplayName::new(name).expect("valid name"),
            role,
            CurrencyCode::base(),
        );
        let id = *account.id();
        self.users.upsert(&account).await.expect("account stores");
        id
    }

    async fn seed_balance(&self, user_id: UserId, amount: Money) {
        let entry = Transaction::builder(
            LedgerOwner::user(user_id),
            TransactionKind::Earning,
            amount,
            Utc::now(),
        )
        .description("seeded earnings")
        .build()
        .expect("valid entry");
        self.ledger_store
            .append(vec![entry])
            .await
            .expect("seed lands");
    }

    async fn balance(&self, user_id: UserId) -> Money {
        self.service
            .balance(&LedgerOwner::user(user_id))
            .await
            .expect("balance folds")
    }

    async fn commission_balance(&self) -> Money {
        self.service
            .platform_commission_balance()
            .await
            .expect("commission folds")
    }
}

async fn deposit(harness: &Harness, user_id: UserId, amount: Money) -> Transaction {
    let intent = harness
        .service
        .initiate_deposit(DepositRequest {
            user_id,
            amount,
            payment_method: "card".to_owned(),
        })
        .await
        .expect("deposit initiates");
    harness
        .service
        .settle_deposit(SettleDepositRequest {
            user_id,
            transaction_id: *intent.transaction.id(),
            payment_ref: "pay_test".to_owned(),
            signature: "sig_test".to_owned(),
        })
        .await
        .expect("deposit settles")
}

#[tokio::test]
async fn client_deposit_credits_wallet_and_platform_commission() {
    let harness = Harness::new(ScriptedGateway::default());
    let client = harness.add_account("Avery Client", UserRole::Client).await;

    let settled = deposit(&harness, client, Money::from_major(100)).await;

    assert_eq!(settled.status(), TransactionStatus::Completed);
    assert_eq!(harness.balance(client).await, Money::from_major(100));
    assert_eq!(harness.commission_balance().await, Money::from_major(5));

    let feed = harness
        .notifications
        .list_for_user(&client)
        .await
        .expect("feed loads");
    assert!(feed.iter().any(|n| n.title() == "Funds Deposited!"));
}

#[tokio::test]
async fn translator_deposit_carries_no_commission() {
    let harness = Harness::new(ScriptedGateway::default());
    let translator = harness
        .add_account("Noor Translator", UserRole::Translator)
        .await;

    deposit(&harness, translator, Money::from_major(40)).await;

    assert_eq!(harness.balance(translator).await, Money::from_major(40));
    assert_eq!(harness.commission_balance().await, Money::ZERO);
}

#[tokio::test]
async fn rejected_capture_leaves_the_wallet_untouched() {
    let harness = Harness::new(ScriptedGateway {
        reject_capture: true,
        ..ScriptedGateway::default()
    });
    let client = harness.add_account("Avery Client", UserRole::Client).await;

    let intent = harness
        .service
        .initiate_deposit(DepositRequest {
            user_id: client,
            amount: Money::from_major(100),
            payment_method: "card".to_owned(),
        })
        .await
        .expect("deposit initiates");
    let error = harness
        .service
        .settle_deposit(SettleDepositRequest {
            user_id: client,
            transaction_id: *intent.transaction.id(),
            payment_ref: "pay_test".to_owned(),
            signature: "sig_test".to_owned(),
        })
        .await
        .expect_err("capture rejected");

    assert_eq!(error.code(), ErrorCode::GatewayFailure);
    assert_eq!(harness.balance(client).await, Money::ZERO);
    assert_eq!(harness.commission_balance().await, Money::ZERO);

    let history = harness
        .service
        .history(&LedgerOwner::user(client))
        .await
        .expect("history loads");
    assert_eq!(history.len(), 1);
    assert!(
        history
            .iter()
            .all(|entry| entry.status() == TransactionStatus::Failed)
    );
}

#[tokio::test]
async fn withdrawal_debits_wallet_and_absorbs_the_fee() {
    let harness = Harness::new(ScriptedGateway::default());
    let translator = harness
        .add_account("Noor Translator", UserRole::Translator)
        .await;
    harness.seed_balance(translator, Money::from_major(200)).await;

    let receipt = harness
        .service
        .withdraw(WithdrawRequest {
            user_id: translator,
            amount: Money::from_major(50),
            payment_method: "bank_transfer".to_owned(),
        })
        .await
        .expect("withdrawal succeeds");

    assert_eq!(receipt.disbursed, Money::from_major(49));
    assert_eq!(harness.balance(translator).await, Money::from_major(150));
    assert_eq!(harness.commission_balance().await, Money::from_major(1));
}

#[tokio::test]
async fn overdrawn_withdrawal_fails_without_state_change() {
    let harness = Harness::new(ScriptedGateway::default());
    let translator = harness
        .add_account("Noor Translator", UserRole::Translator)
        .await;
    harness.seed_balance(translator, Money::from_major(50)).await;

    let error = harness
        .service
        .withdraw(WithdrawRequest {
            user_id: translator,
            amount: Money::from_major(1_000),
            payment_method: "bank_transfer".to_owned(),
        })
        .await
        .expect_err("insufficient balance rejected");

    assert_eq!(error.code(), ErrorCode::InsufficientBalance);
    assert_eq!(harness.balance(translator).await, Money::from_major(50));

    let feed = harness
        .notifications
        .list_for_user(&translator)
        .await
        .expect("feed loads");
    assert!(feed.iter().any(|n| n.title() == "Withdrawal Failed"));
}

#[tokio::test]
async fn rejected_payout_fails_the_withdrawal_without_debit() {
    let harness = Harness::new(ScriptedGateway {
        reject_payout: true,
        ..ScriptedGateway::default()
    });
    let translator = harness
        .add_account("Noor Translator", UserRole::Translator)
        .await;
    harness.seed_balance(translator, Money::from_major(200)).await;

    let error = harness
        .service
        .withdraw(WithdrawRequest {
            user_id: translator,
            amount: Money::from_major(50),
            payment_method: "bank_transfer".to_owned(),
        })
        .await
        .expect_err("payout rejected");

    assert_eq!(error.code(), ErrorCode::GatewayFailure);
    assert_eq!(harness.balance(translator).await, Money::from_major(200));
    assert_eq!(harness.commission_balance().await, Money::ZERO);
}

#[tokio::test]
async fn paying_a_completed_project_credits_the_translator() {
    let harness = Harness::new(ScriptedGateway::default());
    let client = harness.add_account("Avery Client", UserRole::Client).await;
    let translator = harness
        .add_account("Noor Translator", UserRole::Translator)
        .await;
    harness.seed_balance(client, Money::from_major(200)).await;

    let now = Utc::now();
    let mut project = Project::new(
        ProjectDraft {
            title: "Annual report".to_owned(),
            source_language: Language::new("English").expect("valid language"),
            target_language: Language::new("German").expect("valid language"),
            word_count: 2_000,
            deadline: now,
            price: Money::from_major(80),
            client_id: client,
        },
        now,
    )
    .expect("valid draft");
    project
        .assign(
            Assignment {
                translator_id: translator,
                translator_name: "Noor Translator".to_owned(),
                match_score: 91.0,
                auto_assigned: true,
                assigned_at: now,
            },
            now,
        )
        .expect("assigns");
    project.complete(now).expect("completes");
    use backend::domain::ports::ProjectRepository;
    harness.projects.insert(&project).await.expect("stores");

    let receipt = harness
        .service
        .pay(PaymentRequest {
            user_id: client,
            project_id: *project.id(),
            amount: Money::from_major(80),
        })
        .await
        .expect("payment succeeds");

    assert_eq!(receipt.payment.kind(), TransactionKind::Payment);
    assert_eq!(receipt.earning.kind(), TransactionKind::Earning);
    assert_eq!(harness.balance(client).await, Money::from_major(120));
    assert_eq!(harness.balance(translator).await, Money::from_major(80));
}

#[tokio::test]
async fn derived_balance_matches_a_replayed_fold_of_history() {
    // The transaction log is the single source of truth; a balance computed
    // through the service must equal an independent fold over history.
    let harness = Harness::new(ScriptedGateway::default());
    let client = harness.add_account("Avery Client", UserRole::Client).await;

    deposit(&harness, client, Money::from_major(100)).await;
    deposit(&harness, client, Money::from_major(25)).await;
    harness
        .service
        .withdraw(WithdrawRequest {
            user_id: client,
            amount: Money::from_major(30),
            payment_method: "bank_transfer".to_owned(),
        })
        .await
        .expect("withdrawal succeeds");

    let history = harness
        .service
        .history(&LedgerOwner::user(client))
        .await
        .expect("history loads");
    let replayed: i64 = history.iter().map(Transaction::signed_minor_units).sum();
    assert_eq!(
        harness.balance(client).await,
        Money::from_minor(replayed)
    );
    assert_eq!(harness.balance(client).await, Money::from_major(95));
}
