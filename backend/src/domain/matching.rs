//! Translator matching engine.
//!
//! Pure scoring over directory profiles. Eligibility requires both project
//! languages, availability, and spare capacity; eligible profiles are ranked
//! by a weighted score out of 100. Ties break on the lowest profile id so
//! selection is deterministic regardless of directory ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::project::Project;
use super::translator::TranslatorProfile;

/// Weight of the star rating component.
pub const RATING_WEIGHT: f64 = 40.0;
/// Weight of the lifetime experience component.
pub const EXPERIENCE_WEIGHT: f64 = 30.0;
/// Weight of the spare-capacity component.
pub const HEADROOM_WEIGHT: f64 = 20.0;
/// Weight of the responsiveness component.
pub const RESPONSIVENESS_WEIGHT: f64 = 10.0;

/// Completed-project count at which the experience component saturates.
const EXPERIENCE_CEILING: f64 = 200.0;
/// Response time in hours at which the responsiveness component bottoms out.
const RESPONSE_CEILING_HOURS: f64 = 24.0;

/// Weighted match score in the 0–100 range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = f64, example = 87.5)]
pub struct MatchScore(f64);

impl MatchScore {
    /// The raw score value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

/// One eligible profile with its computed score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The scored profile.
    pub profile: TranslatorProfile,
    /// Weighted match score.
    pub score: MatchScore,
}

/// True when a profile may take the project at all.
#[must_use]
pub fn is_eligible(profile: &TranslatorProfile, project: &Project) -> bool {
    profile.covers_pair(project.source_language(), project.target_language())
        && profile.is_available()
        && profile.has_capacity()
}

/// Weighted score of one profile, independent of any project.
#[must_use]
pub fn score_profile(profile: &TranslatorProfile) -> MatchScore {
    let rating = f64::from(profile.rating().value()) / 5.0 * RATING_WEIGHT;

    let experience =
        (f64::from(profile.completed_projects()) / EXPERIENCE_CEILING).min(1.0) * EXPERIENCE_WEIGHT;

    let headroom = (1.0
        - f64::from(profile.active_projects()) / f64::from(profile.max_concurrent_projects().get()))
        * HEADROOM_WEIGHT;

    let responsiveness = (1.0
        - (f64::from(profile.response_time_hours()) / RESPONSE_CEILING_HOURS).min(1.0))
        * RESPONSIVENESS_WEIGHT;

    MatchScore(rating + experience + headroom + responsiveness)
}

/// Eligible profiles ranked best-first.
///
/// Scores are compared descending; equal scores fall back to the lowest
/// profile id, making the ranking stable under any input ordering.
#[must_use]
pub fn rank_candidates(project: &Project, profiles: &[TranslatorProfile]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = profiles
        .iter()
        .filter(|profile| is_eligible(profile, project))
        .map(|profile| Candidate {
            profile: profile.clone(),
            score: score_profile(profile),
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.score
            .value()
            .partial_cmp(&a.score.value())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.profile.id().cmp(b.profile.id()))
    });
    candidates
}

/// Best eligible profile for a project, or `None` when nobody qualifies.
#[must_use]
pub fn best_match(project: &Project, profiles: &[TranslatorProfile]) -> Option<Candidate> {
    rank_candidates(project, profiles).into_iter().next()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for eligibility and score ordering.

    use std::collections::BTreeSet;
    use std::num::NonZeroU32;

    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::money::Money;
    use crate::domain::project::ProjectDraft;
    use crate::domain::translator::{Language, Rating, TranslatorProfileDraft};
    use crate::domain::user::UserId;

    fn language(name: &str) -> Language {
        Language::new(name).expect("valid language")
    }

    fn profile(
        languages: &[&str],
        rating: f32,
        completed: u32,
        active: u32,
        max: u32,
        response_hours: u32,
    ) -> TranslatorProfile {
        TranslatorProfile::new(TranslatorProfileDraft {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            languages: languages.iter().map(|name| language(name)).collect(),
            specializations: BTreeSet::new(),
            rating: Rating::new(rating).expect("valid rating"),
            completed_projects: completed,
            active_projects: active,
            max_concurrent_projects: NonZeroU32::new(max).expect("non-zero"),
            is_available: true,
            price_per_word: Money::from_minor(10),
            response_time_hours: response_hours,
            created_at: Utc::now(),
        })
        .expect("valid profile")
    }

    fn english_spanish_project() -> Project {
        Project::new(
            ProjectDraft {
                title: "Website copy".to_owned(),
                source_language: language("English"),
                target_language: language("Spanish"),
                word_count: 500,
                deadline: Utc::now(),
                price: Money::from_major(60),
                client_id: UserId::random(),
            },
            Utc::now(),
        )
        .expect("valid draft")
    }

    #[test]
    fn perfect_profile_scores_full_marks() {
        let perfect = profile(&["English", "Spanish"], 5.0, 200, 0, 5, 0);
        let score = score_profile(&perfect).value();
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn strong_profile_beats_weak_profile() {
        // Rating 5.0 / 200 completed / idle / 1h response must strictly beat
        // rating 3.0 / 0 completed / idle / 24h response.
        let strong = profile(&["English", "Spanish"], 5.0, 200, 0, 5, 1);
        let weak = profile(&["English", "Spanish"], 3.0, 0, 0, 5, 24);
        assert!(score_profile(&strong).value() > score_profile(&weak).value());
    }

    #[rstest]
    #[case::missing_target(&["English", "French"] as &[&str])]
    #[case::missing_source(&["Spanish", "Portuguese"])]
    fn language_mismatch_is_ineligible(#[case] languages: &[&str]) {
        let project = english_spanish_project();
        let candidate = profile(languages, 5.0, 100, 0, 5, 1);
        assert!(!is_eligible(&candidate, &project));
    }

    #[test]
    fn full_capacity_is_ineligible() {
        let project = english_spanish_project();
        let full = profile(&["English", "Spanish"], 5.0, 100, 3, 3, 1);
        assert!(!is_eligible(&full, &project));
        assert!(best_match(&project, &[full]).is_none());
    }

    #[test]
    fn unavailable_profile_is_ineligible() {
        let project = english_spanish_project();
        let draft = TranslatorProfileDraft {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            languages: [language("English"), language("Spanish")].into_iter().collect(),
            specializations: BTreeSet::new(),
            rating: Rating::new(5.0).expect("valid rating"),
            completed_projects: 50,
            active_projects: 0,
            max_concurrent_projects: NonZeroU32::new(3).expect("non-zero"),
            is_available: false,
            price_per_word: Money::from_minor(10),
            response_time_hours: 1,
            created_at: Utc::now(),
        };
        let unavailable = TranslatorProfile::new(draft).expect("valid profile");
        assert!(!is_eligible(&unavailable, &project));
    }

    #[test]
    fn ranking_orders_by_score_then_id() {
        let project = english_spanish_project();
        let better = profile(&["English", "Spanish"], 4.9, 150, 0, 5, 1);
        let worse = profile(&["English", "Spanish"], 4.0, 20, 2, 4, 6);
        let ranked = rank_candidates(&project, &[worse.clone(), better.clone()]);

        let ids: Vec<&Uuid> = ranked.iter().map(|c| c.profile.id()).collect();
        assert_eq!(ids, vec![better.id(), worse.id()]);
    }

    #[test]
    fn equal_scores_break_ties_on_lowest_id() {
        let project = english_spanish_project();
        let twin_a = profile(&["English", "Spanish"], 4.5, 80, 1, 4, 3);
        let twin_b = profile(&["English", "Spanish"], 4.5, 80, 1, 4, 3);
        let lowest = *twin_a.id().min(twin_b.id());

        let ranked = rank_candidates(&project, &[twin_a.clone(), twin_b.clone()]);
        assert_eq!(ranked.first().map(|c| c.profile.id()), Some(&lowest));

        let reversed = rank_candidates(&project, &[twin_b, twin_a]);
        assert_eq!(reversed.first().map(|c| c.profile.id()), Some(&lowest));
    }

    #[test]
    fn no_eligible_profiles_yields_none() {
        let project = english_spanish_project();
        assert!(best_match(&project, &[]).is_none());
    }
}
