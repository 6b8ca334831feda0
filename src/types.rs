use serde::{Deserialize, Serialize};

/// A requested production line, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Free-text identifier, may contain spaces.
    pub name: String,
    /// Blank category (box, sheet, ...).
    pub blank_type: String,
    /// Blank width in mm.
    pub width: u32,
    /// Blank length in mm.
    pub length: u32,
    /// Material identifier; only orders of the same material can share a roll.
    pub material: String,
    /// Requested quantity of blanks.
    pub count: u32,
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {}x{}mm)",
            self.name, self.blank_type, self.length, self.width
        )
    }
}

/// One feasible way to co-produce two orders on a single roll.
///
/// Transient: produced by the planner, classified and rendered, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub order_a: Order,
    pub order_b: Order,
    /// Lanes of order A across the roll width.
    pub lanes_a: u32,
    /// Lanes of order B across the roll width.
    pub lanes_b: u32,
    /// Chosen catalog roll width in mm.
    pub roll_width: u32,
    /// Leftover width after all lanes, in mm.
    pub trim: u32,
    /// Shared roll length in mm.
    pub roll_length: f64,
    /// Blank rows cut from the roll for each order.
    pub lines_a: u64,
    pub lines_b: u64,
    /// Quantities actually produced at this roll length.
    pub produced_a: u64,
    pub produced_b: u64,
    /// Signed deviation of produced from requested, in percent.
    pub deviation_a: f64,
    pub deviation_b: f64,
}

impl Candidate {
    /// Signed maximum of the two deviations. Drives both the acceptance
    /// ceiling and the tier split; a large under-production on one order
    /// can be masked by a smaller over-production on the other.
    pub fn max_deviation(&self) -> f64 {
        self.deviation_a.max(self.deviation_b)
    }

    pub fn tier(&self, allowed_deviation_percent: f64) -> Tier {
        if self.max_deviation() < allowed_deviation_percent {
            Tier::Optimal
        } else {
            Tier::Negotiable
        }
    }
}

/// Classification of an accepted candidate by deviation from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Within the nominal tolerance band.
    Optimal,
    /// Acceptable only if the customer agrees to a relaxed tolerance.
    Negotiable,
}
