//! Mask recommendation from averaged measurements and the user questionnaire.
//!
//! Size comes from [`size::size_score`]. Each mask type starts at a neutral
//! baseline and accumulates the signed adjustments of every matching rule in
//! [`rules::RULES`]; scores are clamped to `0..=100` and ranked highest first,
//! with ties going to the type listed first in [`MaskType::ALL`].

pub mod rules;
pub mod size;

use crate::{
    calibration::Gender,
    constants::{BASELINE_SCORE, MATERIAL_DELTA},
    measurement::{FrontalMeasurement, ProfileMeasurement},
};
use log::debug;
use rules::{Note, Rule, RuleContext, RULES};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Age bracket from the questionnaire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "20s")]
    Twenties,
    #[default]
    #[serde(rename = "30s")]
    Thirties,
    #[serde(rename = "40s")]
    Forties,
    #[serde(rename = "50s")]
    Fifties,
    #[serde(rename = "60+")]
    SixtyPlus,
}

impl AgeGroup {
    pub const ALL: [Self; 5] = [
        Self::Twenties,
        Self::Thirties,
        Self::Forties,
        Self::Fifties,
        Self::SixtyPlus,
    ];
}

/// Low / medium / high answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    Nasal,
    Pillow,
    Full,
}

impl MaskType {
    /// Every candidate type, in tie-break order
    pub const ALL: [Self; 3] = [Self::Nasal, Self::Pillow, Self::Full];

    fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nasal => "nasal",
            Self::Pillow => "pillow",
            Self::Full => "full",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskSize {
    S,
    M,
    L,
}

impl fmt::Display for MaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        };
        f.write_str(name)
    }
}

/// Questionnaire answers, fixed for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub gender: Gender,
    pub age_group: AgeGroup,
    /// Movement during sleep
    pub tossing: Level,
    pub mouth_breathing: bool,
    /// Prescribed CPAP pressure bracket
    pub pressure: Level,
    pub preferred_types: Vec<MaskType>,
}

/// Score and notes for one mask type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecommendation {
    pub mask_type: MaskType,
    /// In `0..=100`
    pub score: u8,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub size: MaskSize,
    /// Sum of the four band scores the size was derived from
    pub size_score: u8,
    /// Every mask type exactly once, best first
    pub ranked_types: Vec<TypeRecommendation>,
    pub overall_reasons: Vec<String>,
}

impl Recommendation {
    /// Highest ranked type
    #[must_use]
    pub fn best(&self) -> Option<&TypeRecommendation> {
        self.ranked_types.first()
    }

    #[must_use]
    pub fn score_of(&self, mask_type: MaskType) -> Option<u8> {
        self.ranked_types
            .iter()
            .find(|t| t.mask_type == mask_type)
            .map(|t| t.score)
    }
}

/// Recommend a size and rank the mask types using the built-in rule table
#[must_use]
pub fn recommend(
    front: &FrontalMeasurement,
    profile: &ProfileMeasurement,
    user: &UserProfile,
) -> Recommendation {
    recommend_with_rules(RULES, front, profile, user)
}

/// Same as [`recommend`] with a caller-supplied rule table
#[must_use]
pub fn recommend_with_rules(
    rules: &[Rule],
    front: &FrontalMeasurement,
    profile: &ProfileMeasurement,
    user: &UserProfile,
) -> Recommendation {
    let size_score = size::size_score(front);
    let size = size::classify_size_score(size_score);

    let ctx = RuleContext { front, profile, user };
    let mut ranked_types = score_types(rules, &ctx);
    ranked_types.sort_by_key(|t| (Reverse(t.score), t.mask_type.rank()));

    debug!(
        "Recommended size {size} (score {size_score}), ranking {:?}",
        ranked_types
            .iter()
            .map(|t| (t.mask_type, t.score))
            .collect::<Vec<_>>()
    );

    Recommendation {
        size,
        size_score,
        ranked_types,
        overall_reasons: overall_reasons(size, size_score, user),
    }
}

fn score_types(rules: &[Rule], ctx: &RuleContext<'_>) -> Vec<TypeRecommendation> {
    let mut scores = [BASELINE_SCORE; MaskType::ALL.len()];
    let mut records: Vec<TypeRecommendation> = MaskType::ALL
        .iter()
        .map(|&mask_type| TypeRecommendation {
            mask_type,
            score: 0,
            reasons: Vec::new(),
            warnings: Vec::new(),
        })
        .collect();

    for rule in rules.iter().filter(|rule| (rule.applies)(ctx)) {
        debug!("Rule {} applies", rule.name);
        for effect in rule.effects {
            let index = effect.mask.rank();
            scores[index] += effect.delta;
            let record = &mut records[index];
            match effect.note {
                Note::Reason(text) if effect.delta.abs() >= MATERIAL_DELTA => {
                    record.reasons.push(text.to_string());
                }
                Note::Warning(text) => record.warnings.push(text.to_string()),
                Note::Reason(_) | Note::None => {}
            }
        }
    }

    for (record, score) in records.iter_mut().zip(scores) {
        record.score = u8::try_from(score.clamp(0, 100)).unwrap_or(100);
    }
    records
}

fn overall_reasons(size: MaskSize, size_score: u8, user: &UserProfile) -> Vec<String> {
    let mut reasons = vec![format!(
        "Size {size} from facial measurements (score {size_score} of 12)"
    )];
    if user.mouth_breathing {
        reasons.push("Mouth breathing favors a full-face mask".to_string());
    }
    if user.pressure == Level::High {
        reasons.push("High pressure favors a mask with a larger seal".to_string());
    }
    if user.tossing == Level::High {
        reasons.push("Frequent movement favors minimal-contact masks".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEASUREMENT_CONFIDENCE;

    fn front() -> FrontalMeasurement {
        FrontalMeasurement {
            ipd_px: 252.0,
            scale_factor_mm_per_px: 0.25,
            nose_width_mm: 38.0,
            face_length_mm: 190.0,
            face_width_mm: 140.0,
            philtrum_length_mm: 15.0,
            mouth_width_mm: 50.0,
            bridge_width_mm: 32.0,
            chin_angle_deg: 120.0,
            confidence: MEASUREMENT_CONFIDENCE,
        }
    }

    fn profile() -> ProfileMeasurement {
        ProfileMeasurement {
            nose_height_mm: 22.0,
            jaw_projection_mm: -4.0,
        }
    }

    fn user() -> UserProfile {
        UserProfile {
            tossing: Level::Low,
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_baseline_with_empty_rule_table() {
        let rec = recommend_with_rules(&[], &front(), &profile(), &user());
        assert_eq!(rec.size, MaskSize::M);
        assert_eq!(rec.size_score, 8);
        let order: Vec<_> = rec.ranked_types.iter().map(|t| t.mask_type).collect();
        assert_eq!(order, MaskType::ALL);
        assert!(rec.ranked_types.iter().all(|t| t.score == 50));
    }

    #[test]
    fn test_thirties_default_ranking() {
        // 30s: nasal +15, pillow +10
        let rec = recommend(&front(), &profile(), &user());
        assert_eq!(rec.score_of(MaskType::Nasal), Some(65));
        assert_eq!(rec.score_of(MaskType::Pillow), Some(60));
        assert_eq!(rec.score_of(MaskType::Full), Some(50));
        assert_eq!(rec.best().map(|t| t.mask_type), Some(MaskType::Nasal));
    }

    #[test]
    fn test_ties_follow_type_order() {
        let user = UserProfile {
            age_group: AgeGroup::Twenties,
            ..user()
        };
        let rec = recommend(&front(), &profile(), &user);
        assert_eq!(rec.ranked_types[0].mask_type, MaskType::Nasal);
        assert_eq!(rec.ranked_types[1].mask_type, MaskType::Pillow);
        assert_eq!(rec.ranked_types[0].score, rec.ranked_types[1].score);
    }

    #[test]
    fn test_mouth_breathing_raises_full_and_warns() {
        let without = recommend(&front(), &profile(), &user());
        let breathing = UserProfile {
            mouth_breathing: true,
            ..user()
        };
        let with = recommend(&front(), &profile(), &breathing);

        assert!(with.score_of(MaskType::Full) > without.score_of(MaskType::Full));
        assert_eq!(with.best().map(|t| t.mask_type), Some(MaskType::Full));
        for t in &with.ranked_types {
            if t.mask_type == MaskType::Full {
                assert!(!t.reasons.is_empty());
            } else {
                assert_eq!(t.warnings.len(), 1);
            }
        }
        assert!(with.overall_reasons.iter().any(|r| r.contains("Mouth breathing")));
    }

    #[test]
    fn test_immaterial_reasons_are_dropped() {
        let user = UserProfile {
            tossing: Level::Medium,
            ..user()
        };
        let rec = recommend(&front(), &profile(), &user);
        let pillow = rec.ranked_types.iter().find(|t| t.mask_type == MaskType::Pillow).unwrap();
        // 30s +10 is material, medium tossing +5 is not
        assert_eq!(pillow.score, 65);
        assert_eq!(pillow.reasons.len(), 1);
    }

    #[test]
    fn test_scores_are_clamped() {
        let user = UserProfile {
            age_group: AgeGroup::SixtyPlus,
            mouth_breathing: true,
            pressure: Level::High,
            preferred_types: vec![MaskType::Full],
            ..user()
        };
        let wide = FrontalMeasurement {
            mouth_width_mm: 60.0,
            ..front()
        };
        let rec = recommend(&wide, &profile(), &user);
        assert_eq!(rec.score_of(MaskType::Full), Some(100));
    }

    #[test]
    fn test_measurement_rules() {
        let narrow = FrontalMeasurement {
            bridge_width_mm: 25.0,
            philtrum_length_mm: 10.0,
            ..front()
        };
        let recessed = ProfileMeasurement {
            nose_height_mm: 15.0,
            jaw_projection_mm: -12.0,
        };
        let rec = recommend(&narrow, &recessed, &user());
        let nasal = rec.ranked_types.iter().find(|t| t.mask_type == MaskType::Nasal).unwrap();
        let full = rec.ranked_types.iter().find(|t| t.mask_type == MaskType::Full).unwrap();
        assert_eq!(nasal.warnings.len(), 2);
        assert_eq!(full.warnings.len(), 1);
        // 30s +10, short nose +10, short philtrum +10, narrow bridge +10
        assert_eq!(rec.score_of(MaskType::Pillow), Some(90));
        assert_eq!(rec.best().map(|t| t.mask_type), Some(MaskType::Pillow));
    }

    #[test]
    fn test_overall_reasons_order() {
        let user = UserProfile {
            mouth_breathing: true,
            pressure: Level::High,
            tossing: Level::High,
            ..user()
        };
        let rec = recommend(&front(), &profile(), &user);
        assert_eq!(rec.overall_reasons.len(), 4);
        assert!(rec.overall_reasons[0].starts_with("Size M"));
        assert!(rec.overall_reasons[1].contains("Mouth breathing"));
        assert!(rec.overall_reasons[2].contains("High pressure"));
        assert!(rec.overall_reasons[3].contains("movement"));
    }

    #[test]
    fn test_questionnaire_yaml() {
        let yaml = "gender: female\nage_group: 60+\ntossing: high\nmouth_breathing: true\npressure: low\npreferred_types: [pillow, full]\n";
        let user: UserProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.age_group, AgeGroup::SixtyPlus);
        assert_eq!(user.tossing, Level::High);
        assert_eq!(user.pressure, Level::Low);
        assert_eq!(user.preferred_types, vec![MaskType::Pillow, MaskType::Full]);
    }
}
