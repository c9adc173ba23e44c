// crates/apex-capture/src/presets.rs
// ============================================================================
// Module: Debug Level Presets
// Description: Named per-category verbosity bundles (spec.md §4.3).
// Purpose: Map issue-class intent to a debug level the platform understands.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Preset`] names a bundle of per-category verbosities. Merging two
//! presets (e.g. when a caller wants both `soql_analysis` and
//! `governor_limits`) takes the per-category max, per spec.md §4.3.

use serde::Deserialize;
use serde::Serialize;

/// Debug level categories recognized by the platform's trace flag model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Category {
    /// Database operations (SOQL/DML).
    Database,
    /// Workflow and process automation.
    Workflow,
    /// Validation rule evaluation.
    Validation,
    /// External callouts.
    Callout,
    /// Apex code execution.
    ApexCode,
    /// Apex CPU profiling.
    ApexProfiling,
    /// Visualforce page rendering.
    Visualforce,
    /// System-level operations (limits, jobs).
    System,
}

/// All categories, in a fixed iteration order.
pub const ALL_CATEGORIES: &[Category] = &[
    Category::Database,
    Category::Workflow,
    Category::Validation,
    Category::Callout,
    Category::ApexCode,
    Category::ApexProfiling,
    Category::Visualforce,
    Category::System,
];

/// Per-category verbosity, ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verbosity {
    /// No logging for this category.
    None,
    /// Error-level only.
    Error,
    /// Warning-level and above.
    Warn,
    /// Informational and above.
    Info,
    /// Debug-level and above.
    Debug,
    /// Fine-grained and above.
    Fine,
    /// Finer-grained and above.
    Finer,
    /// Maximum verbosity.
    Finest,
}

/// A named bundle of per-category verbosities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name, as referenced by `capture.preset` config.
    pub name: &'static str,
    /// Verbosity for each of the eight categories, in [`ALL_CATEGORIES`] order.
    pub levels: [Verbosity; 8],
}

impl Preset {
    /// Returns the verbosity assigned to `category`.
    #[must_use]
    pub fn level_for(&self, category: Category) -> Verbosity {
        let index = ALL_CATEGORIES.iter().position(|c| *c == category).unwrap_or(0);
        self.levels[index]
    }
}

/// Merges two presets by taking the per-category max verbosity (spec.md §4.3).
#[must_use]
pub fn merge_presets(a: &Preset, b: &Preset) -> Preset {
    let mut levels = a.levels;
    for (slot, other) in levels.iter_mut().zip(b.levels.iter()) {
        if *other > *slot {
            *slot = *other;
        }
    }
    Preset { name: "merged", levels }
}

/// The nine named presets recognized by `capture.preset` (spec.md §4.3), in
/// `[Database, Workflow, Validation, Callout, ApexCode, ApexProfiling,
/// Visualforce, System]` order.
pub const NAMED_PRESETS: &[Preset] = &[
    Preset {
        name: "minimal",
        levels: [
            Verbosity::Error,
            Verbosity::Error,
            Verbosity::Error,
            Verbosity::Error,
            Verbosity::Info,
            Verbosity::None,
            Verbosity::Error,
            Verbosity::Error,
        ],
    },
    Preset {
        name: "soql_analysis",
        levels: [
            Verbosity::Finest,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Debug,
            Verbosity::None,
            Verbosity::Warn,
            Verbosity::Info,
        ],
    },
    Preset {
        name: "governor_limits",
        levels: [
            Verbosity::Info,
            Verbosity::Info,
            Verbosity::Info,
            Verbosity::Info,
            Verbosity::Info,
            Verbosity::None,
            Verbosity::Info,
            Verbosity::Finest,
        ],
    },
    Preset {
        name: "triggers",
        levels: [
            Verbosity::Info,
            Verbosity::Fine,
            Verbosity::Fine,
            Verbosity::Warn,
            Verbosity::Fine,
            Verbosity::None,
            Verbosity::Warn,
            Verbosity::Info,
        ],
    },
    Preset {
        name: "cpu_hotspots",
        levels: [
            Verbosity::Info,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Debug,
            Verbosity::Finest,
            Verbosity::Warn,
            Verbosity::Info,
        ],
    },
    Preset {
        name: "exceptions",
        levels: [
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Fine,
            Verbosity::None,
            Verbosity::Warn,
            Verbosity::Info,
        ],
    },
    Preset {
        name: "callouts",
        levels: [
            Verbosity::Info,
            Verbosity::Warn,
            Verbosity::Warn,
            Verbosity::Finest,
            Verbosity::Debug,
            Verbosity::None,
            Verbosity::Warn,
            Verbosity::Info,
        ],
    },
    Preset {
        name: "ai_optimized",
        levels: [
            Verbosity::Fine,
            Verbosity::Fine,
            Verbosity::Info,
            Verbosity::Fine,
            Verbosity::Finer,
            Verbosity::Debug,
            Verbosity::Warn,
            Verbosity::Info,
        ],
    },
    Preset {
        name: "full_diagnostic",
        levels: [Verbosity::Finest; 8],
    },
];

/// Looks up a named preset by name.
#[must_use]
pub fn preset_by_name(name: &str) -> Option<&'static Preset> {
    NAMED_PRESETS.iter().find(|preset| preset.name == name)
}
