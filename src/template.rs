//! Built-in phase and task catalog for each release type.
//!
//! The catalog is static data: it is never mutated, so concurrent readers need
//! no synchronisation.

use crate::fields::{Priority, ReleaseType};
use crate::fields::Priority::{High, Low, Medium};

/// A task as it appears in a template, before dates and state are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub id: &'static str,
    pub task: &'static str,
    pub priority: Priority,
    pub category: &'static str,
}

/// A phase of a template with its week window relative to release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTemplate {
    pub name: &'static str,
    pub start_week: i64,
    pub end_week: i64,
    pub tasks: &'static [TaskTemplate],
}

/// The full template set for one release type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseTemplate {
    pub name: &'static str,
    pub timeline_weeks: u32,
    pub phases: &'static [PhaseTemplate],
}

const fn t(id: &'static str, task: &'static str, priority: Priority, category: &'static str) -> TaskTemplate {
    TaskTemplate { id, task, priority, category }
}

static SINGLE: ReleaseTemplate = ReleaseTemplate {
    name: "Single Release",
    timeline_weeks: 8,
    phases: &[
        PhaseTemplate {
            name: "Pre-Production",
            start_week: -8,
            end_week: -6,
            tasks: &[
                t("track_finalization", "Finalize track selection and arrangement", High, "production"),
                t("split_sheets", "Create and verify split sheets", High, "legal"),
                t("pro_registration", "Register with PRO (ASCAP/BMI/SESAC)", Medium, "legal"),
                t("marketing_strategy", "Develop marketing strategy and timeline", High, "marketing"),
                t("budget_planning", "Set release budget and allocate resources", Medium, "business"),
            ],
        },
        PhaseTemplate {
            name: "Production",
            start_week: -6,
            end_week: -4,
            tasks: &[
                t("mixing_mastering", "Complete mixing and mastering", High, "production"),
                t("artwork_creation", "Create high-resolution artwork (3000x3000px)", High, "design"),
                t("metadata_prep", "Prepare metadata (ISRC, genre, mood tags)", High, "distribution"),
                t("exclusive_content", "Prepare exclusive fan content", Medium, "fan_engagement"),
            ],
        },
        PhaseTemplate {
            name: "Pre-Release",
            start_week: -4,
            end_week: -1,
            tasks: &[
                t("distribution_submit", "Submit release to distribution", High, "distribution"),
                t("epk_creation", "Generate smart links and EPK", High, "marketing"),
                t("playlist_pitching", "Pitch to playlist curators", Medium, "promotion"),
                t("social_content", "Schedule social media content", Medium, "marketing"),
                t("press_outreach", "Reach out to music blogs and press", Medium, "promotion"),
            ],
        },
        PhaseTemplate {
            name: "Release Week",
            start_week: 0,
            end_week: 0,
            tasks: &[
                t("monitor_analytics", "Monitor analytics dashboard", High, "analytics"),
                t("fan_engagement", "Engage with fans through exclusive content", Medium, "fan_engagement"),
                t("social_sharing", "Share on social media platforms", High, "marketing"),
                t("playlist_tracking", "Track playlist adds and features", Medium, "promotion"),
            ],
        },
        PhaseTemplate {
            name: "Post-Release",
            start_week: 1,
            end_week: 4,
            tasks: &[
                t("performance_analysis", "Analyze performance metrics", High, "analytics"),
                t("followup_content", "Plan follow-up content and campaigns", Medium, "marketing"),
                t("sync_licensing", "Consider sync licensing opportunities", Low, "licensing"),
                t("next_release_prep", "Begin planning next release", Low, "planning"),
            ],
        },
    ],
};

static EP: ReleaseTemplate = ReleaseTemplate {
    name: "EP Release",
    timeline_weeks: 12,
    phases: &[
        PhaseTemplate {
            name: "Pre-Production",
            start_week: -12,
            end_week: -8,
            tasks: &[
                t("track_selection", "Finalize 3-6 track selection and order", High, "production"),
                t("split_sheets_multi", "Create split sheets for all tracks", High, "legal"),
                t("pro_registration", "Register all tracks with PRO", Medium, "legal"),
                t("ep_concept", "Develop EP concept and theme", High, "creative"),
                t("marketing_strategy_ep", "Plan comprehensive marketing strategy", High, "marketing"),
            ],
        },
        PhaseTemplate {
            name: "Production",
            start_week: -8,
            end_week: -6,
            tasks: &[
                t("mixing_mastering_ep", "Complete mixing and mastering for all tracks", High, "production"),
                t("artwork_package", "Create artwork package (cover + individual singles)", High, "design"),
                t("metadata_all_tracks", "Prepare metadata for all tracks", High, "distribution"),
                t("bonus_content", "Create bonus content for fans", Medium, "fan_engagement"),
            ],
        },
        PhaseTemplate {
            name: "Pre-Release",
            start_week: -6,
            end_week: -1,
            tasks: &[
                t("lead_single", "Release lead single 4 weeks before EP", High, "strategy"),
                t("distribution_submit_ep", "Submit EP to distribution", High, "distribution"),
                t("press_kit", "Create comprehensive press kit", High, "promotion"),
                t("playlist_campaign", "Launch playlist pitching campaign", Medium, "promotion"),
                t("content_calendar", "Execute social media content calendar", Medium, "marketing"),
            ],
        },
        PhaseTemplate {
            name: "Release Week",
            start_week: 0,
            end_week: 0,
            tasks: &[
                t("ep_launch", "Launch EP with coordinated campaign", High, "marketing"),
                t("live_engagement", "Host live listening party or Q&A", Medium, "fan_engagement"),
                t("press_interviews", "Conduct press interviews and features", Medium, "promotion"),
            ],
        },
        PhaseTemplate {
            name: "Post-Release",
            start_week: 1,
            end_week: 8,
            tasks: &[
                t("single_rollout", "Continue single rollout from EP tracks", Medium, "strategy"),
                t("performance_review", "Comprehensive performance analysis", High, "analytics"),
                t("sync_opportunities", "Pursue sync licensing for EP tracks", Medium, "licensing"),
            ],
        },
    ],
};

static ALBUM: ReleaseTemplate = ReleaseTemplate {
    name: "Album Release",
    timeline_weeks: 16,
    phases: &[
        PhaseTemplate {
            name: "Pre-Production",
            start_week: -16,
            end_week: -12,
            tasks: &[
                t("album_concept", "Finalize album concept and track listing", High, "creative"),
                t("split_sheets_album", "Create split sheets for all album tracks", High, "legal"),
                t("album_strategy", "Develop comprehensive album strategy", High, "strategy"),
                t("budget_planning_album", "Plan album budget and funding", High, "business"),
            ],
        },
        PhaseTemplate {
            name: "Production",
            start_week: -12,
            end_week: -8,
            tasks: &[
                t("album_mixing_mastering", "Complete mixing and mastering for full album", High, "production"),
                t("album_artwork", "Create album artwork and packaging design", High, "design"),
                t("vinyl_cd_prep", "Prepare for physical release (vinyl, CD)", Medium, "distribution"),
            ],
        },
        PhaseTemplate {
            name: "Pre-Release Campaign",
            start_week: -8,
            end_week: -1,
            tasks: &[
                t("lead_singles", "Release 2-3 lead singles with gaps", High, "strategy"),
                t("pre_order", "Set up pre-order and pre-save campaigns", High, "marketing"),
                t("album_press", "Launch comprehensive press campaign", High, "promotion"),
                t("tour_planning", "Plan album release tour", Medium, "live_performance"),
            ],
        },
        PhaseTemplate {
            name: "Release Week",
            start_week: 0,
            end_week: 0,
            tasks: &[
                t("album_launch", "Execute full album launch campaign", High, "marketing"),
                t("release_show", "Host album release show/event", Medium, "live_performance"),
            ],
        },
        PhaseTemplate {
            name: "Post-Release Campaign",
            start_week: 1,
            end_week: 12,
            tasks: &[
                t("album_cycle", "Continue album cycle with additional singles", High, "strategy"),
                t("tour_execution", "Execute album tour", Medium, "live_performance"),
                t("sync_album", "Pursue sync opportunities for album tracks", Medium, "licensing"),
            ],
        },
    ],
};

/// Look up the template set for a release type.
pub fn template_for(release_type: ReleaseType) -> &'static ReleaseTemplate {
    match release_type {
        ReleaseType::Single => &SINGLE,
        ReleaseType::Ep => &EP,
        ReleaseType::Album => &ALBUM,
    }
}

/// Hours assumed for an unlisted task.
pub const DEFAULT_TASK_HOURS: u32 = 3;

/// Baseline effort in hours for the tasks that have one.
pub fn base_hours(task_id: &str) -> u32 {
    match task_id {
        "track_finalization" => 8,
        "split_sheets" => 2,
        "pro_registration" => 1,
        "marketing_strategy" => 6,
        "mixing_mastering" => 16,
        "artwork_creation" => 8,
        "metadata_prep" => 2,
        "distribution_submit" => 2,
        "epk_creation" => 4,
        "playlist_pitching" => 6,
        "social_content" => 8,
        "monitor_analytics" => 2,
        "fan_engagement" => 3,
        "performance_analysis" => 4,
        _ => DEFAULT_TASK_HOURS,
    }
}

/// Effort multiplier for an artist level. Unknown levels get 1.0.
pub fn level_multiplier(artist_level: &str) -> f64 {
    match artist_level.trim().to_lowercase().as_str() {
        "independent" => 1.5,
        "emerging" => 1.2,
        "established" => 1.0,
        _ => 1.0,
    }
}
