//! Translator profile data model.
//!
//! A profile describes one translator's languages, track record, and
//! concurrent-workload capacity. The capacity invariant
//! `0 <= active <= max_concurrent` holds after every mutation: slot release
//! saturates at zero and slot reservation refuses to exceed the maximum.

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::user::UserId;

/// Validation errors raised by translator profile constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorValidationError {
    /// No supported language supplied.
    NoLanguages,
    /// A language entry is blank.
    BlankLanguage,
    /// Rating is outside the 0–5 scale.
    RatingOutOfRange,
    /// Active count exceeds the concurrent capacity.
    ActiveExceedsCapacity,
    /// Price per word is not positive.
    NonPositivePrice,
}

impl fmt::Display for TranslatorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLanguages => write!(f, "profile must list at least one language"),
            Self::BlankLanguage => write!(f, "languages must not be blank"),
            Self::RatingOutOfRange => write!(f, "rating must be between 0 and 5"),
            Self::ActiveExceedsCapacity => {
                write!(f, "active projects must not exceed concurrent capacity")
            }
            Self::NonPositivePrice => write!(f, "price per word must be positive"),
        }
    }
}

impl std::error::Error for TranslatorValidationError {}

/// Named language a translator works in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Spanish")]
pub struct Language(String);

impl Language {
    /// Validate and construct a language name.
    pub fn new(name: impl Into<String>) -> Result<Self, TranslatorValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TranslatorValidationError::BlankLanguage);
        }
        Ok(Self(name))
    }

    /// Borrow the language name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.0
    }
}

impl TryFrom<String> for Language {
    type Error = TranslatorValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Star rating on the 0–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f32", into = "f32")]
#[schema(value_type = f32, example = 4.9)]
pub struct Rating(f32);

impl Rating {
    /// Validate and construct a rating.
    pub fn new(value: f32) -> Result<Self, TranslatorValidationError> {
        if !(0.0..=5.0).contains(&value) || !value.is_finite() {
            return Err(TranslatorValidationError::RatingOutOfRange);
        }
        Ok(Self(value))
    }

    /// The raw rating value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl From<Rating> for f32 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<f32> for Rating {
    type Error = TranslatorValidationError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unvalidated input for building a [`TranslatorProfile`].
#[derive(Debug, Clone)]
pub struct TranslatorProfileDraft {
    /// Profile identifier.
    pub id: Uuid,
    /// Owning translator account.
    pub user_id: UserId,
    /// Languages the translator works in.
    pub languages: BTreeSet<Language>,
    /// Document specialisation tags (legal, medical, technical, ...).
    pub specializations: BTreeSet<String>,
    /// Star rating.
    pub rating: Rating,
    /// Lifetime completed projects.
    pub completed_projects: u32,
    /// Currently assigned projects.
    pub active_projects: u32,
    /// Maximum concurrent projects.
    pub max_concurrent_projects: NonZeroU32,
    /// Whether the translator accepts new work.
    pub is_available: bool,
    /// Price per word in settlement currency.
    pub price_per_word: Money,
    /// Average response time in hours.
    pub response_time_hours: u32,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

/// Translator profile exposed through the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorProfile {
    id: Uuid,
    user_id: UserId,
    languages: BTreeSet<Language>,
    specializations: BTreeSet<String>,
    rating: Rating,
    completed_projects: u32,
    active_projects: u32,
    max_concurrent_projects: NonZeroU32,
    is_available: bool,
    price_per_word: Money,
    response_time_hours: u32,
    created_at: DateTime<Utc>,
}

impl TranslatorProfile {
    /// Validate a draft into a profile.
    pub fn new(draft: TranslatorProfileDraft) -> Result<Self, TranslatorValidationError> {
        if draft.languages.is_empty() {
            return Err(TranslatorValidationError::NoLanguages);
        }
        if draft.active_projects > draft.max_concurrent_projects.get() {
            return Err(TranslatorValidationError::ActiveExceedsCapacity);
        }
        if !draft.price_per_word.is_positive() {
            return Err(TranslatorValidationError::NonPositivePrice);
        }
        Ok(Self {
            id: draft.id,
            user_id: draft.user_id,
            languages: draft.languages,
            specializations: draft.specializations,
            rating: draft.rating,
            completed_projects: draft.completed_projects,
            active_projects: draft.active_projects,
            max_concurrent_projects: draft.max_concurrent_projects,
            is_available: draft.is_available,
            price_per_word: draft.price_per_word,
            response_time_hours: draft.response_time_hours,
            created_at: draft.created_at,
        })
    }

    /// Profile identifier.
    #[must_use]
    pub const fn id(&self) -> &Uuid {
        &self.id
    }

    /// Owning translator account.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Languages the translator works in.
    #[must_use]
    pub const fn languages(&self) -> &BTreeSet<Language> {
        &self.languages
    }

    /// Specialisation tags.
    #[must_use]
    pub const fn specializations(&self) -> &BTreeSet<String> {
        &self.specializations
    }

    /// Star rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Lifetime completed projects.
    #[must_use]
    pub const fn completed_projects(&self) -> u32 {
        self.completed_projects
    }

    /// Currently assigned projects.
    #[must_use]
    pub const fn active_projects(&self) -> u32 {
        self.active_projects
    }

    /// Maximum concurrent projects.
    #[must_use]
    pub const fn max_concurrent_projects(&self) -> NonZeroU32 {
        self.max_concurrent_projects
    }

    /// Whether the translator accepts new work.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.is_available
    }

    /// Price per word in settlement currency.
    #[must_use]
    pub const fn price_per_word(&self) -> Money {
        self.price_per_word
    }

    /// Average response time in hours.
    #[must_use]
    pub const fn response_time_hours(&self) -> u32 {
        self.response_time_hours
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when the profile covers both languages of a pair.
    #[must_use]
    pub fn covers_pair(&self, source: &Language, target: &Language) -> bool {
        self.languages.contains(source) && self.languages.contains(target)
    }

    /// True when another assignment fits under the concurrent capacity.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.active_projects < self.max_concurrent_projects.get()
    }

    /// Reserve one assignment slot.
    ///
    /// Returns `false` without mutating when the translator is unavailable
    /// or already at capacity.
    pub fn reserve_slot(&mut self) -> bool {
        if !self.is_available || !self.has_capacity() {
            return false;
        }
        self.active_projects += 1;
        true
    }

    /// Release one assignment slot, saturating at zero.
    pub fn release_slot(&mut self) {
        self.active_projects = self.active_projects.saturating_sub(1);
    }

    /// Record a completed project: releases the slot and bumps the lifetime
    /// counter.
    pub fn record_completion(&mut self) {
        self.release_slot();
        self.completed_projects = self.completed_projects.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the capacity invariant.

    use rstest::rstest;

    use super::*;

    fn draft() -> TranslatorProfileDraft {
        TranslatorProfileDraft {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            languages: [
                Language::new("English").expect("valid language"),
                Language::new("Spanish").expect("valid language"),
            ]
            .into_iter()
            .collect(),
            specializations: ["legal".to_owned()].into_iter().collect(),
            rating: Rating::new(4.5).expect("valid rating"),
            completed_projects: 10,
            active_projects: 0,
            max_concurrent_projects: NonZeroU32::new(2).expect("non-zero"),
            is_available: true,
            price_per_word: Money::from_minor(12),
            response_time_hours: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reserve_stops_at_capacity() {
        let mut profile = TranslatorProfile::new(draft()).expect("valid profile");
        assert!(profile.reserve_slot());
        assert!(profile.reserve_slot());
        assert!(!profile.reserve_slot());
        assert_eq!(profile.active_projects(), 2);
    }

    #[test]
    fn reserve_refuses_unavailable_profiles() {
        let mut unavailable = draft();
        unavailable.is_available = false;
        let mut profile = TranslatorProfile::new(unavailable).expect("valid profile");
        assert!(!profile.reserve_slot());
        assert_eq!(profile.active_projects(), 0);
    }

    #[test]
    fn release_saturates_at_zero() {
        let mut profile = TranslatorProfile::new(draft()).expect("valid profile");
        profile.release_slot();
        assert_eq!(profile.active_projects(), 0);
    }

    #[test]
    fn completion_updates_both_counters() {
        let mut profile = TranslatorProfile::new(draft()).expect("valid profile");
        assert!(profile.reserve_slot());
        profile.record_completion();
        assert_eq!(profile.active_projects(), 0);
        assert_eq!(profile.completed_projects(), 11);
    }

    #[rstest]
    #[case(5.1)]
    #[case(-0.1)]
    #[case(f32::NAN)]
    fn rating_rejects_out_of_range(#[case] value: f32) {
        assert!(Rating::new(value).is_err());
    }

    #[test]
    fn draft_with_excess_active_is_rejected() {
        let mut invalid = draft();
        invalid.active_projects = 3;
        assert_eq!(
            TranslatorProfile::new(invalid).expect_err("capacity enforced"),
            TranslatorValidationError::ActiveExceedsCapacity
        );
    }
}
