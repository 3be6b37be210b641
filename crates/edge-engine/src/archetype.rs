// Team archetype classification.
//
// A first-match decision list over a team's percentile axes. Rule order is
// load-bearing: the first rule whose predicate holds wins, and "Competitor"
// is the terminal default. Reasons describe the inputs, not the decision.

use serde::Serialize;

use crate::config::ArchetypeConfig;
use crate::rounding::round1;

/// Maximum number of reasons attached to a classification.
pub const MAX_REASONS: usize = 4;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Qualitative competitive posture of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Archetype {
    #[serde(rename = "Dynasty Juggernaut")]
    DynastyJuggernaut,
    #[serde(rename = "All-In Contender")]
    AllInContender,
    #[serde(rename = "Fragile Contender")]
    FragileContender,
    #[serde(rename = "Productive Struggle")]
    ProductiveStruggle,
    #[serde(rename = "Rebuilder")]
    Rebuilder,
    #[serde(rename = "Dead Zone")]
    DeadZone,
    #[serde(rename = "Competitor")]
    Competitor,
}

impl Archetype {
    /// Every label the classifier can return.
    pub const ALL: [Archetype; 7] = [
        Archetype::DynastyJuggernaut,
        Archetype::AllInContender,
        Archetype::FragileContender,
        Archetype::ProductiveStruggle,
        Archetype::Rebuilder,
        Archetype::DeadZone,
        Archetype::Competitor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Archetype::DynastyJuggernaut => "Dynasty Juggernaut",
            Archetype::AllInContender => "All-In Contender",
            Archetype::FragileContender => "Fragile Contender",
            Archetype::ProductiveStruggle => "Productive Struggle",
            Archetype::Rebuilder => "Rebuilder",
            Archetype::DeadZone => "Dead Zone",
            Archetype::Competitor => "Competitor",
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The percentile axes the classifier reads, all 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeInputs {
    pub power: f64,
    pub window: f64,
    pub draft: f64,
    /// Current-production percentile, when the league reports one.
    pub max_pf: Option<f64>,
}

impl ArchetypeInputs {
    /// Current-production signal: max-PF when known, power otherwise.
    pub fn low_now(&self) -> f64 {
        self.max_pf.unwrap_or(self.power)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

type Predicate = fn(&ArchetypeInputs, &ArchetypeConfig) -> bool;

/// Ordered (label, predicate) pairs. Comparisons are strict except the dead
/// zone power band, which is inclusive on both ends.
const RULES: [(Archetype, Predicate); 6] = [
    (Archetype::DynastyJuggernaut, |i, c| {
        i.power > c.dynasty_juggernaut.power_min && i.window > c.dynasty_juggernaut.window_min
    }),
    (Archetype::AllInContender, |i, c| {
        i.power > c.all_in_contender.power_min && i.draft < c.all_in_contender.draft_max
    }),
    (Archetype::FragileContender, |i, c| {
        i.power > c.fragile_contender.power_min && i.window < c.fragile_contender.window_max
    }),
    (Archetype::ProductiveStruggle, |i, c| {
        i.low_now() < c.productive_struggle.low_now_max
            && i.draft > c.productive_struggle.draft_min
            && i.window > c.productive_struggle.window_min
    }),
    (Archetype::Rebuilder, |i, c| i.power < c.rebuilder.power_max),
    (Archetype::DeadZone, |i, c| {
        i.power >= c.dead_zone.power_min
            && i.power <= c.dead_zone.power_max
            && i.draft < c.dead_zone.draft_max
            && i.window < c.dead_zone.window_max
    }),
];

/// First matching label, or `Competitor`.
pub fn classify_label(inputs: &ArchetypeInputs, config: &ArchetypeConfig) -> Archetype {
    RULES
        .iter()
        .find(|(_, matches)| matches(inputs, config))
        .map(|(label, _)| *label)
        .unwrap_or(Archetype::Competitor)
}

// ---------------------------------------------------------------------------
// Reasons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonAxis {
    Power,
    Window,
    Draft,
    MaxPf,
}

impl ReasonAxis {
    pub fn label(&self) -> &'static str {
        match self {
            ReasonAxis::Power => "Power",
            ReasonAxis::Window => "Window",
            ReasonAxis::Draft => "Draft capital",
            ReasonAxis::MaxPf => "Max PF",
        }
    }

    /// Bucket word for a percentile on this axis.
    pub fn bucket(&self, pct: f64) -> &'static str {
        match self {
            ReasonAxis::Power => match pct {
                p if p >= 80.0 => "elite starters",
                p if p >= 60.0 => "strong starters",
                p if p >= 40.0 => "average starters",
                _ => "weak starters",
            },
            ReasonAxis::Window => match pct {
                p if p >= 70.0 => "long window",
                p if p >= 40.0 => "steady window",
                _ => "closing window",
            },
            ReasonAxis::Draft => match pct {
                p if p >= 70.0 => "deep draft capital",
                p if p >= 40.0 => "average draft capital",
                _ => "thin draft capital",
            },
            ReasonAxis::MaxPf => match pct {
                p if p >= 80.0 => "elite production",
                p if p >= 60.0 => "strong production",
                p if p >= 40.0 => "average production",
                _ => "weak production",
            },
        }
    }
}

/// One human-readable line about an input axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reason {
    pub axis: ReasonAxis,
    #[serde(serialize_with = "round1")]
    pub percentile: f64,
    pub bucket: &'static str,
    pub text: String,
}

impl Reason {
    fn new(axis: ReasonAxis, percentile: f64) -> Self {
        let bucket = axis.bucket(percentile);
        let whole = percentile.round().clamp(0.0, 100.0) as u32;
        Reason {
            axis,
            percentile,
            bucket,
            text: format!("{} {}{} percentile ({})", axis.label(), whole, ordinal_suffix(whole), bucket),
        }
    }
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Reasons in fixed axis order (power, window, draft, max PF), skipping an
/// absent max PF and capped at `MAX_REASONS`.
pub fn reasons(inputs: &ArchetypeInputs) -> Vec<Reason> {
    let mut out = vec![
        Reason::new(ReasonAxis::Power, inputs.power),
        Reason::new(ReasonAxis::Window, inputs.window),
        Reason::new(ReasonAxis::Draft, inputs.draft),
    ];
    if let Some(pf) = inputs.max_pf {
        out.push(Reason::new(ReasonAxis::MaxPf, pf));
    }
    out.truncate(MAX_REASONS);
    out
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub archetype: Archetype,
    pub reasons: Vec<Reason>,
}

/// Label plus reasons for one team.
pub fn classify(inputs: &ArchetypeInputs, config: &ArchetypeConfig) -> Classification {
    Classification {
        archetype: classify_label(inputs, config),
        reasons: reasons(inputs),
    }
}
