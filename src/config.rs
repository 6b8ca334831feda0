use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("roll width catalog is empty")]
    Empty,
    #[error("roll width catalog must be strictly ascending: {0}mm is followed by {1}mm")]
    NotAscending(u32, u32),
}

/// The fixed set of physically stocked roll widths, in mm, strictly
/// ascending. Sortedness is validated at construction; a violation is a
/// configuration error, not something to silently re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RollCatalog {
    widths: Vec<u32>,
}

impl RollCatalog {
    pub fn new(widths: Vec<u32>) -> Result<Self, CatalogError> {
        if widths.is_empty() {
            return Err(CatalogError::Empty);
        }
        for pair in widths.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CatalogError::NotAscending(pair[0], pair[1]));
            }
        }
        Ok(Self { widths })
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn max_width(&self) -> u32 {
        *self.widths.last().unwrap_or(&0)
    }

    /// Smallest catalog width that leaves at least `min_trim` mm of margin
    /// over `required_width`, or `None` if no stocked roll is wide enough.
    /// The lookup enforces the trim floor; the feasibility filter enforces
    /// the trim ceiling separately.
    pub fn minimal_fitting_width(&self, required_width: u32, min_trim: u32) -> Option<u32> {
        self.widths
            .iter()
            .copied()
            .find(|&w| w as u64 >= required_width as u64 + min_trim as u64)
    }
}

impl<'de> Deserialize<'de> for RollCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let widths = Vec::<u32>::deserialize(deserializer)?;
        RollCatalog::new(widths).map_err(serde::de::Error::custom)
    }
}

impl Default for RollCatalog {
    fn default() -> Self {
        Self {
            widths: PlannerConfig::DEFAULT_ROLL_WIDTHS.to_vec(),
        }
    }
}

/// All tunable inputs of the planner, passed explicitly into the search
/// entry point so tests and the HTTP API can vary any of them without
/// touching global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Nominal tolerance band, in percent. The acceptance ceiling is four
    /// times this value.
    pub allowed_deviation_percent: f64,
    /// Largest acceptable trim, in mm.
    pub max_trim: u32,
    /// Smallest acceptable trim margin, in mm.
    pub min_trim: u32,
    /// Cap on the combined lane count of both orders.
    pub max_lanes: u32,
    /// Orders requesting fewer blanks than this are dropped at load time.
    pub min_order_count: u32,
    /// Physical upper bound on a single order's lane footprint, in mm.
    /// Deliberately independent of the catalog's maximum width.
    pub lane_footprint_limit: u32,
    pub catalog: RollCatalog,
}

impl PlannerConfig {
    pub const DEFAULT_ALLOWED_DEVIATION_PERCENT: f64 = 10.0;
    pub const DEFAULT_MAX_TRIM: u32 = 300;
    pub const DEFAULT_MIN_TRIM: u32 = 30;
    pub const DEFAULT_MAX_LANES: u32 = 4;
    pub const DEFAULT_MIN_ORDER_COUNT: u32 = 100;
    pub const DEFAULT_LANE_FOOTPRINT_LIMIT: u32 = 1700;
    pub const DEFAULT_ROLL_WIDTHS: [u32; 9] =
        [1050, 1200, 1300, 1350, 1450, 1500, 1550, 1600, 1750];

    /// Relaxed acceptance ceiling: candidates above it are discarded
    /// before they ever reach the reporter.
    pub fn acceptance_ceiling(&self) -> f64 {
        self.allowed_deviation_percent * 4.0
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            allowed_deviation_percent: Self::DEFAULT_ALLOWED_DEVIATION_PERCENT,
            max_trim: Self::DEFAULT_MAX_TRIM,
            min_trim: Self::DEFAULT_MIN_TRIM,
            max_lanes: Self::DEFAULT_MAX_LANES,
            min_order_count: Self::DEFAULT_MIN_ORDER_COUNT,
            lane_footprint_limit: Self::DEFAULT_LANE_FOOTPRINT_LIMIT,
            catalog: RollCatalog::default(),
        }
    }
}
