use serde::{Deserialize, Serialize};
use std::fmt;

/// Medical department an appointment is booked for.
///
/// The set is closed and ordered; [`Specialty::ALL`] is the canonical order used
/// for selectors and for the statistics breakdown. Records keep the variant
/// itself, so reordering the table never changes stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    Cardiology,
    Pediatrics,
    Traumatology,
}

impl Specialty {
    /// Every specialty, in display order
    pub const ALL: [Specialty; 3] = [
        Specialty::Cardiology,
        Specialty::Pediatrics,
        Specialty::Traumatology,
    ];

    /// Human-readable name (also the serialized form)
    pub fn name(&self) -> &'static str {
        match self {
            Specialty::Cardiology => "Cardiology",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Traumatology => "Traumatology",
        }
    }

    /// Resolve a raw selector coming from the input boundary.
    ///
    /// Accepts a zero-based position into [`Specialty::ALL`] or a name
    /// (case-insensitive). Blank, out-of-range and unknown selectors resolve to
    /// `None`.
    pub fn resolve(selector: &str) -> Option<Specialty> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }

        if let Ok(index) = selector.parse::<usize>() {
            return Self::ALL.get(index).copied();
        }

        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(selector))
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
