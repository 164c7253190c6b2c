//! Point-driven progression: Spirit Guide stages and user titles.
//!
//! Both axes read the same cumulative total through separate threshold
//! tables. Everything here is pure; callers supply the totals.

mod tables;
mod tier;
mod transition;

pub use tables::{
    spirit_guide_stages, user_titles, ProgressionTables, SPIRIT_GUIDE_TABLE, USER_TITLE_TABLE,
};
pub use tier::{Tier, TierTable};
pub use transition::{detect_transition, AxisProgress, ProgressReport, TierTransition};
