//! Face-off commands.
//!
//! Every subcommand accepts `--at` (RFC 3339 with offset) to act at a
//! chosen instant instead of now.

use chrono::{DateTime, Duration, FixedOffset};
use clap::Subcommand;
use fighting_demons_core::{ActivityKind, FaceOffSlot, FaceOffSubmission};

use super::{instant, open_engine, print_json, CmdResult};

#[derive(Subcommand)]
pub enum FaceoffAction {
    /// Mark a face-off complete
    Complete {
        /// dawn, noon or dusk
        slot: FaceOffSlot,
        /// Pushups in the set
        #[arg(long)]
        pushups: Option<u32>,
        /// Pullups in the set
        #[arg(long)]
        pullups: Option<u32>,
        /// Mile walked or run
        #[arg(long)]
        mile: bool,
        /// Minutes meditated
        #[arg(long)]
        meditation: Option<u32>,
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
    },
    /// Postpone a face-off
    Defer {
        slot: FaceOffSlot,
        /// Minutes to postpone by (defaults to config)
        #[arg(long, conflicts_with = "until")]
        minutes: Option<u32>,
        /// Explicit end of the deferral
        #[arg(long)]
        until: Option<DateTime<FixedOffset>>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
    },
    /// Show the state of today's slots
    Status {
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
    },
    /// Log training outside a face-off (no points)
    Log {
        /// mile, pushups, pullups or meditation
        #[arg(value_parser = parse_activity)]
        activity: ActivityKind,
        /// Reps, minutes, or miles
        amount: u32,
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
    },
}

fn parse_activity(s: &str) -> Result<ActivityKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "mile" | "miles" => Ok(ActivityKind::Mile),
        "pushups" | "pushup" => Ok(ActivityKind::Pushups),
        "pullups" | "pullup" => Ok(ActivityKind::Pullups),
        "meditation" => Ok(ActivityKind::Meditation),
        other => Err(format!("unknown activity '{other}'")),
    }
}

pub fn run(action: FaceoffAction) -> CmdResult {
    let mut engine = open_engine()?;
    match action {
        FaceoffAction::Complete {
            slot,
            pushups,
            pullups,
            mile,
            meditation,
            at,
        } => {
            let submission = FaceOffSubmission {
                slot,
                at: instant(at),
                pushups,
                pullups,
                mile,
                meditation_minutes: meditation,
            };
            let outcome = engine.complete_face_off(submission)?;
            if let Some(message) = outcome
                .evolution
                .as_ref()
                .and_then(|t| t.celebration_message())
            {
                eprintln!("{message}");
            }
            print_json(&outcome)
        }
        FaceoffAction::Defer {
            slot,
            minutes,
            until,
            reason,
            at,
        } => {
            let now = instant(at);
            let until = until.or_else(|| minutes.map(|m| now + Duration::minutes(i64::from(m))));
            let record = engine.defer_face_off(slot, now, until, reason)?;
            print_json(record.slot(slot))
        }
        FaceoffAction::Status { at } => print_json(&engine.slot_statuses(instant(at))?),
        FaceoffAction::Log {
            activity,
            amount,
            at,
        } => print_json(&engine.log_activity(activity, amount, instant(at))?),
    }
}
