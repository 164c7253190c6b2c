//! Built-in progression tables.
//!
//! Thresholds assume a perfect day earns 22 points: the first evolution
//! lands on day 2, the first title on day 3, and the curve slows from there.

use super::tier::{Tier, TierTable};

pub const SPIRIT_GUIDE_TABLE: &str = "spirit_guide";
pub const USER_TITLE_TABLE: &str = "user_title";

/// Spirit Guide evolution stages.
pub fn spirit_guide_stages() -> TierTable {
    TierTable::builtin(
        SPIRIT_GUIDE_TABLE,
        vec![
            Tier::new("ember", "Ember", 0, "A faint flicker, barely holding on").with_icon("🕯️"),
            // day 2
            Tier::new("shade", "Shade", 44, "Growing more defined, gaining form")
                .with_icon("👻")
                .with_transition_message(
                    "Your dedication has given me form. I am no longer just an ember... \
                     I am becoming something more.",
                ),
            Tier::new("specter", "Specter", 100, "Radiant and strong, a true presence")
                .with_icon("✨")
                .with_transition_message(
                    "I can feel the light coursing through me! The demons... they notice now. \
                     They fear what we are becoming.",
                ),
            Tier::new("wraith", "Wraith", 200, "A force of ethereal power")
                .with_icon("🌟")
                .with_transition_message(
                    "I remember now... fragments of who I was before. \
                     Your strength is restoring my memories.",
                ),
            Tier::new("guardian", "Guardian", 400, "A powerful protector, shield of light")
                .with_icon("🛡️")
                .with_transition_message(
                    "I can protect you now. Not just guide, PROTECT. \
                     The demons will not touch you while I stand.",
                ),
            // about one month of perfect days
            Tier::new("sentinel", "Sentinel", 700, "Warrior of the light, blade drawn")
                .with_icon("⚔️")
                .with_transition_message(
                    "A full cycle of the moon, and look what we have become. \
                     I am no longer your guide. I am your sword.",
                ),
            Tier::new("seraph", "Seraph", 1200, "Transcendent being of pure radiance")
                .with_icon("👼")
                .with_transition_message(
                    "The transformation is nearly complete. I ascend... \
                     and you ascend with me. We are bound eternal.",
                ),
            Tier::new("radiant", "Radiant", 2000, "Blazing with divine light")
                .with_icon("☀️")
                .with_transition_message(
                    "Three moons of battle. Three moons of victory. \
                     I AM the light now. And so are you.",
                ),
            Tier::new("ascendant", "Ascendant", 3500, "Beyond mortal comprehension")
                .with_icon("🔱")
                .with_transition_message(
                    "There are no more stages. We have transcended. \
                     The demons speak of us in whispers. We are legend.",
                ),
        ],
    )
}

/// User titles. Independent of the guide: same total, different thresholds.
pub fn user_titles() -> TierTable {
    TierTable::builtin(
        USER_TITLE_TABLE,
        vec![
            Tier::new("initiate", "Initiate", 0, "Beginning the journey"),
            Tier::new("acolyte", "Acolyte", 50, "Learning the ways of light"),
            Tier::new("warrior", "Warrior", 150, "Proven in battle"),
            Tier::new("knight", "Knight of Light", 350, "Sworn defender against darkness"),
            Tier::new("champion", "Champion", 600, "Victor of countless face-offs"),
            Tier::new("crusader", "Crusader", 1000, "Marching ever forward in holy purpose"),
            Tier::new("paladin", "Paladin", 1800, "Master of body and spirit"),
            Tier::new("lightbringer", "Lightbringer", 3000, "Bearer of the sacred flame"),
            Tier::new("ascended", "Ascended", 5000, "Beyond mortal limits"),
        ],
    )
}

/// Both progression axes, resolved independently against one total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionTables {
    pub spirit_guide: TierTable,
    pub user_title: TierTable,
}

impl ProgressionTables {
    pub fn new(spirit_guide: TierTable, user_title: TierTable) -> Self {
        Self {
            spirit_guide,
            user_title,
        }
    }
}

impl Default for ProgressionTables {
    fn default() -> Self {
        Self::new(spirit_guide_stages(), user_titles())
    }
}
