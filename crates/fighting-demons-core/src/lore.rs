//! Lore chapters unlocked at progression milestones.

use serde::Serialize;

use crate::progression::TierTable;
use crate::stats::LifetimeStats;

/// Milestone that opens a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LoreTrigger {
    Points(u64),
    /// Spirit Guide stage id
    Evolution(&'static str),
    Streak(u32),
    Miles(u64),
    Meditation(u64),
    Pushups(u64),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoreChapter {
    pub id: &'static str,
    pub name: &'static str,
    pub unlocks_at: LoreTrigger,
    pub entries: &'static [&'static str],
}

pub const LORE: &[LoreChapter] = &[
    LoreChapter {
        id: "lore_origin",
        name: "The Origin",
        unlocks_at: LoreTrigger::Points(50),
        entries: &[
            "In the beginning, there was only the Pleroma, the fullness of divine light. Then came the Fall.",
            "The Kenoma was born from that Fall, an emptiness yearning to be filled.",
            "The demons are not evil by nature. They are absence. Hunger. The void's attempt to consume what it lacks.",
        ],
    },
    LoreChapter {
        id: "lore_guides",
        name: "The Spirit Guides",
        unlocks_at: LoreTrigger::Evolution("shade"),
        entries: &[
            "Spirit Guides are fragments of the original light, scattered during the Fall.",
            "Each Guide bonds to a mortal once, and only once. The bond is eternal.",
            "When a mortal fails completely, the Guide fades. When a mortal transcends, the Guide ascends.",
        ],
    },
    LoreChapter {
        id: "lore_demons",
        name: "The Nature of Demons",
        unlocks_at: LoreTrigger::Streak(7),
        entries: &[
            "The demons have names: Acedia, the noonday demon. Tristitia, the shadow of despair. Vainglory, the mirror's lie.",
            "They cannot create. They can only distort, corrupt, and consume.",
            "Every time you choose light, a demon somewhere grows weaker. They know your name.",
        ],
    },
    LoreChapter {
        id: "lore_body",
        name: "The Temple of Flesh",
        unlocks_at: LoreTrigger::Miles(10),
        entries: &[
            "The Hermetic masters taught: the body is not a prison. It is a temple. A laboratory. A forge.",
            "Physical movement generates spiritual momentum. The ancients knew this before they knew why.",
            "Each mile walked is a prayer. Each breath is a ward. They cannot touch what is consecrated by effort.",
        ],
    },
    LoreChapter {
        id: "lore_mind",
        name: "The Fortress Mind",
        unlocks_at: LoreTrigger::Meditation(100),
        entries: &[
            "The untrained mind is an open gate. Meditation is learning to guard it.",
            "Watchfulness. The desert fathers called it nepsis. You are learning to watch your own mind.",
            "Ten minutes of stillness builds a wall they cannot cross. A lifetime of stillness builds a castle.",
        ],
    },
    LoreChapter {
        id: "lore_strength",
        name: "The Way of Strength",
        unlocks_at: LoreTrigger::Pushups(100),
        entries: &[
            "Strength is not violence. Strength is the capacity to resist entropy.",
            "The Stoics knew: he who conquers himself is mightier than he who conquers a city.",
            "Every rep is an act of defiance. Every failure to failure is proof of will.",
        ],
    },
    LoreChapter {
        id: "lore_ascension",
        name: "The Path of Ascension",
        unlocks_at: LoreTrigger::Evolution("seraph"),
        entries: &[
            "There are those who walked this path before you. Some became legends. Some became warnings.",
            "Ascension is not escape from the body. It is the perfection of body, mind, and spirit in union.",
            "The final stage is not power. It is peace. The demons cannot touch peace.",
        ],
    },
];

impl LoreTrigger {
    pub fn is_met(
        &self,
        stats: &LifetimeStats,
        streak: u32,
        total_points: u64,
        guide: &TierTable,
    ) -> bool {
        match *self {
            LoreTrigger::Points(n) => total_points >= n,
            LoreTrigger::Evolution(stage) => guide
                .rank_of(stage)
                .is_some_and(|rank| guide.rank_for(total_points) >= rank),
            LoreTrigger::Streak(n) => streak >= n,
            LoreTrigger::Miles(n) => stats.total_miles >= n,
            LoreTrigger::Meditation(n) => stats.total_meditation_minutes >= n,
            LoreTrigger::Pushups(n) => stats.total_pushups >= n,
        }
    }
}

/// Chapters open for the given progress, in table order.
pub fn unlocked_chapters(
    stats: &LifetimeStats,
    streak: u32,
    total_points: u64,
    guide: &TierTable,
) -> Vec<&'static LoreChapter> {
    LORE.iter()
        .filter(|chapter| chapter.unlocks_at.is_met(stats, streak, total_points, guide))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::spirit_guide_stages;

    fn ids(chapters: &[&LoreChapter]) -> Vec<&'static str> {
        chapters.iter().map(|c| c.id).collect()
    }

    #[test]
    fn fresh_profile_has_no_lore() {
        let guide = spirit_guide_stages();
        assert!(unlocked_chapters(&LifetimeStats::default(), 0, 0, &guide).is_empty());
    }

    #[test]
    fn evolution_opens_guide_chapter_before_origin() {
        let guide = spirit_guide_stages();
        let open = unlocked_chapters(&LifetimeStats::default(), 0, 44, &guide);
        assert_eq!(ids(&open), vec!["lore_guides"]);

        let open = unlocked_chapters(&LifetimeStats::default(), 0, 50, &guide);
        assert_eq!(ids(&open), vec!["lore_origin", "lore_guides"]);
    }

    #[test]
    fn activity_triggers() {
        let guide = spirit_guide_stages();
        let stats = LifetimeStats {
            total_miles: 10,
            total_meditation_minutes: 100,
            total_pushups: 99,
            ..Default::default()
        };
        let open = unlocked_chapters(&stats, 7, 0, &guide);
        assert_eq!(ids(&open), vec!["lore_demons", "lore_body", "lore_mind"]);
    }

    #[test]
    fn triggers_serialize_with_type_and_value() {
        let json = serde_json::to_value(LoreTrigger::Evolution("seraph")).unwrap();
        assert_eq!(json["type"], "evolution");
        assert_eq!(json["value"], "seraph");
    }
}
