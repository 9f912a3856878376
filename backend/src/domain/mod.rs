//! Domain entities, pure algorithms, and driving services.
//!
//! Everything here is transport agnostic: inbound adapters translate HTTP
//! requests into these types, and driven adapters implement the port traits
//! under [`ports`]. Monetary amounts are integer minor units of the
//! settlement currency ([`Money`]); the transaction log is the single source
//! of truth for every balance.

pub mod assignment;
pub mod currency;
pub mod error;
pub mod ledger;
pub mod matching;
pub mod message;
pub mod messaging;
pub mod money;
pub mod notification;
pub mod onboarding;
pub mod ports;
pub mod project;
pub mod transaction;
pub mod translator;
pub mod user;

pub use self::assignment::{AssignmentOutcome, AssignmentService};
pub use self::currency::{
    currency_for_country, find_currency, Currency, CurrencyCode, CurrencyConverter,
    CurrencyValidationError, DecimalStyle, BASE_CURRENCY, CURRENCIES,
};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::ledger::{
    DepositIntent, DepositRequest, LedgerService, PaymentReceipt, PaymentRequest,
    SettleDepositRequest, WithdrawRequest, WithdrawalReceipt, DEPOSIT_COMMISSION_BPS,
    WITHDRAWAL_FEE_BPS,
};
pub use self::matching::{best_match, is_eligible, rank_candidates, Candidate, MatchScore};
pub use self::message::Message;
pub use self::messaging::{MessagingService, UnreadCounts};
pub use self::money::Money;
pub use self::notification::{Notification, NotificationKind};
pub use self::onboarding::OnboardingService;
pub use self::project::{
    Assignment, Project, ProjectDraft, ProjectId, ProjectStateError, ProjectStatus,
    ProjectValidationError,
};
pub use self::transaction::{
    LedgerOwner, Transaction, TransactionBuilder, TransactionKind, TransactionStatus,
    TransactionValidationError,
};
pub use self::translator::{
    Language, Rating, TranslatorProfile, TranslatorProfileDraft, TranslatorValidationError,
};
pub use self::user::{DisplayName, UserAccount, UserId, UserRole, UserValidationError};
