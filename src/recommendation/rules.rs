//! Declarative scoring rules.
//!
//! Each [`Rule`] pairs a condition on the inputs with the score adjustments it
//! applies. Rules are evaluated in table order; order only matters for the
//! order of reasons and warnings on each type.

use super::{AgeGroup, Level, MaskType, UserProfile};
use super::MaskType::{Full, Nasal, Pillow};
use crate::measurement::{FrontalMeasurement, ProfileMeasurement};

/// Inputs a rule condition may inspect
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub front: &'a FrontalMeasurement,
    pub profile: &'a ProfileMeasurement,
    pub user: &'a UserProfile,
}

/// Text attached to an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    None,
    /// Kept only when the adjustment is material
    Reason(&'static str),
    /// Always kept
    Warning(&'static str),
}

/// One signed score adjustment for one mask type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub mask: MaskType,
    pub delta: i32,
    pub note: Note,
}

const fn effect(mask: MaskType, delta: i32, note: Note) -> Effect {
    Effect { mask, delta, note }
}

/// Condition plus the effects it triggers
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub effects: &'static [Effect],
}

/// Nose height at or above this favors a nasal mask (mm)
pub const TALL_NOSE_MM: f64 = 28.0;
/// Nose height below this favors nasal pillows (mm)
pub const SHORT_NOSE_MM: f64 = 18.0;
/// Philtrum below this leaves little room for a nasal cushion (mm)
pub const SHORT_PHILTRUM_MM: f64 = 12.0;
/// Mouth width at or above this favors a full-face mask (mm)
pub const WIDE_MOUTH_MM: f64 = 55.0;
/// Bridge width below this risks nasal cushion leaks (mm)
pub const NARROW_BRIDGE_MM: f64 = 28.0;
/// Jaw projection below this (chin well behind the nose) risks full-face leaks (mm)
pub const RECESSED_JAW_MM: f64 = -10.0;

fn age_20s(ctx: &RuleContext<'_>) -> bool {
    ctx.user.age_group == AgeGroup::Twenties
}

fn age_30s(ctx: &RuleContext<'_>) -> bool {
    ctx.user.age_group == AgeGroup::Thirties
}

fn age_40s(ctx: &RuleContext<'_>) -> bool {
    ctx.user.age_group == AgeGroup::Forties
}

fn age_50s(ctx: &RuleContext<'_>) -> bool {
    ctx.user.age_group == AgeGroup::Fifties
}

fn age_60_plus(ctx: &RuleContext<'_>) -> bool {
    ctx.user.age_group == AgeGroup::SixtyPlus
}

fn mouth_breathing(ctx: &RuleContext<'_>) -> bool {
    ctx.user.mouth_breathing
}

fn high_pressure(ctx: &RuleContext<'_>) -> bool {
    ctx.user.pressure == Level::High
}

fn low_pressure(ctx: &RuleContext<'_>) -> bool {
    ctx.user.pressure == Level::Low
}

fn high_tossing(ctx: &RuleContext<'_>) -> bool {
    ctx.user.tossing == Level::High
}

fn medium_tossing(ctx: &RuleContext<'_>) -> bool {
    ctx.user.tossing == Level::Medium
}

fn tall_nose(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.nose_height_mm >= TALL_NOSE_MM
}

fn short_nose(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.nose_height_mm < SHORT_NOSE_MM
}

fn short_philtrum(ctx: &RuleContext<'_>) -> bool {
    ctx.front.philtrum_length_mm < SHORT_PHILTRUM_MM
}

fn wide_mouth(ctx: &RuleContext<'_>) -> bool {
    ctx.front.mouth_width_mm >= WIDE_MOUTH_MM
}

fn narrow_bridge(ctx: &RuleContext<'_>) -> bool {
    ctx.front.bridge_width_mm < NARROW_BRIDGE_MM
}

fn recessed_jaw(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.jaw_projection_mm < RECESSED_JAW_MM
}

fn prefers_nasal(ctx: &RuleContext<'_>) -> bool {
    ctx.user.preferred_types.contains(&Nasal)
}

fn prefers_pillow(ctx: &RuleContext<'_>) -> bool {
    ctx.user.preferred_types.contains(&Pillow)
}

fn prefers_full(ctx: &RuleContext<'_>) -> bool {
    ctx.user.preferred_types.contains(&Full)
}

const AGE_REASON: Note = Note::Reason("Commonly chosen in this age group");
const PREFERENCE_REASON: Note = Note::Reason("Matches your stated preference");

/// The scoring table, evaluated top to bottom
pub static RULES: &[Rule] = &[
    Rule {
        name: "age_20s",
        applies: age_20s,
        effects: &[effect(Nasal, 15, AGE_REASON), effect(Pillow, 15, AGE_REASON)],
    },
    Rule {
        name: "age_30s",
        applies: age_30s,
        effects: &[effect(Nasal, 15, AGE_REASON), effect(Pillow, 10, AGE_REASON)],
    },
    Rule {
        name: "age_40s",
        applies: age_40s,
        effects: &[
            effect(Nasal, 10, AGE_REASON),
            effect(Pillow, 5, AGE_REASON),
            effect(Full, 5, AGE_REASON),
        ],
    },
    Rule {
        name: "age_50s",
        applies: age_50s,
        effects: &[effect(Nasal, 5, AGE_REASON), effect(Full, 10, AGE_REASON)],
    },
    Rule {
        name: "age_60_plus",
        applies: age_60_plus,
        effects: &[
            effect(Pillow, -5, Note::None),
            effect(Full, 15, Note::Reason("Stable seal and easy fitting")),
        ],
    },
    Rule {
        name: "mouth_breathing",
        applies: mouth_breathing,
        effects: &[
            effect(Full, 30, Note::Reason("Covers mouth breathing")),
            effect(Nasal, 0, Note::Warning("Mouth breathing may cause leaks; a chin strap may be needed")),
            effect(Pillow, 0, Note::Warning("Mouth breathing may cause leaks; a chin strap may be needed")),
        ],
    },
    Rule {
        name: "high_pressure",
        applies: high_pressure,
        effects: &[
            effect(Pillow, -20, Note::Warning("High pressure can be uncomfortable in the nostrils")),
            effect(Full, 10, Note::Reason("Spreads high pressure over a larger area")),
        ],
    },
    Rule {
        name: "low_pressure",
        applies: low_pressure,
        effects: &[effect(Pillow, 10, Note::Reason("Works well at low pressure"))],
    },
    Rule {
        name: "high_tossing",
        applies: high_tossing,
        effects: &[
            effect(Pillow, 15, Note::Reason("Minimal contact stays sealed while moving")),
            effect(Full, -15, Note::Warning("Large cushion may shift when you move in sleep")),
        ],
    },
    Rule {
        name: "medium_tossing",
        applies: medium_tossing,
        effects: &[effect(Pillow, 5, Note::Reason("Light contact suits some movement"))],
    },
    Rule {
        name: "tall_nose",
        applies: tall_nose,
        effects: &[effect(Nasal, 10, Note::Reason("Nose height gives a nasal cushion a good seal"))],
    },
    Rule {
        name: "short_nose",
        applies: short_nose,
        effects: &[effect(Pillow, 10, Note::Reason("Low nose height suits nasal pillows"))],
    },
    Rule {
        name: "short_philtrum",
        applies: short_philtrum,
        effects: &[
            effect(Nasal, 0, Note::Warning("Short philtrum may crowd the cushion against the lip")),
            effect(Pillow, 10, Note::Reason("Fits a short philtrum")),
        ],
    },
    Rule {
        name: "wide_mouth",
        applies: wide_mouth,
        effects: &[effect(Full, 10, Note::Reason("Wide mouth suits a full-face cushion"))],
    },
    Rule {
        name: "narrow_bridge",
        applies: narrow_bridge,
        effects: &[
            effect(Nasal, 0, Note::Warning("Narrow bridge may leak around a nasal cushion")),
            effect(Pillow, 10, Note::Reason("Does not rest on the nasal bridge")),
        ],
    },
    Rule {
        name: "recessed_jaw",
        applies: recessed_jaw,
        effects: &[effect(Full, 0, Note::Warning("Recessed jaw may leak at the bottom of the cushion"))],
    },
    Rule {
        name: "prefers_nasal",
        applies: prefers_nasal,
        effects: &[effect(Nasal, 10, PREFERENCE_REASON)],
    },
    Rule {
        name: "prefers_pillow",
        applies: prefers_pillow,
        effects: &[effect(Pillow, 10, PREFERENCE_REASON)],
    },
    Rule {
        name: "prefers_full",
        applies: prefers_full,
        effects: &[effect(Full, 10, PREFERENCE_REASON)],
    },
];
