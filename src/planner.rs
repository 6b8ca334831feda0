use crate::config::PlannerConfig;
use crate::types::{Candidate, Order};

/// One enumerated lane split: orders picked by position (`a < b`) with a
/// lane count for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSplit {
    pub a: usize,
    pub b: usize,
    pub lanes_a: u32,
    pub lanes_b: u32,
}

/// Lazy enumeration of every candidate lane split over a slice of orders.
///
/// For each position pair `a < b` (pairs are positional, identical orders
/// at different positions stay distinct), `lanes_a` runs from 1 while the
/// first order's lane footprint stays under the physical limit, and
/// `lanes_b` runs from 1 while the combined lane count stays within the
/// cap. Restartable: building a new iterator replays the same sequence.
pub struct LaneSplits<'a> {
    orders: &'a [Order],
    max_lanes: u32,
    footprint_limit: u32,
    a: usize,
    b: usize,
    lanes_a: u32,
    lanes_b: u32,
}

impl<'a> LaneSplits<'a> {
    pub fn new(orders: &'a [Order], config: &PlannerConfig) -> Self {
        Self {
            orders,
            max_lanes: config.max_lanes,
            footprint_limit: config.lane_footprint_limit,
            a: 0,
            b: 1,
            lanes_a: 1,
            lanes_b: 1,
        }
    }
}

impl Iterator for LaneSplits<'_> {
    type Item = LaneSplit;

    fn next(&mut self) -> Option<LaneSplit> {
        let n = self.orders.len();
        loop {
            if self.a + 1 >= n {
                return None;
            }
            if self.b >= n {
                self.a += 1;
                self.b = self.a + 1;
                self.lanes_a = 1;
                self.lanes_b = 1;
                continue;
            }
            // lanes_a exhausted for this pair: footprint limit reached, or
            // no room left for at least one lane of the second order
            let footprint = self.lanes_a as u64 * self.orders[self.a].width as u64;
            if footprint >= self.footprint_limit as u64 || self.lanes_a >= self.max_lanes {
                self.b += 1;
                self.lanes_a = 1;
                self.lanes_b = 1;
                continue;
            }
            if self.lanes_a + self.lanes_b > self.max_lanes {
                self.lanes_a += 1;
                self.lanes_b = 1;
                continue;
            }
            let split = LaneSplit {
                a: self.a,
                b: self.b,
                lanes_a: self.lanes_a,
                lanes_b: self.lanes_b,
            };
            self.lanes_b += 1;
            return Some(split);
        }
    }
}

struct RollFit {
    width: u32,
    trim: u32,
}

/// Feasibility filter, short-circuiting in a fixed order: catalog ceiling,
/// fitting width, trim ceiling, material match. The trim floor is already
/// enforced by the catalog lookup itself.
fn fit_roll(
    a: &Order,
    b: &Order,
    lanes_a: u32,
    lanes_b: u32,
    config: &PlannerConfig,
) -> Option<RollFit> {
    let required = lanes_a as u64 * a.width as u64 + lanes_b as u64 * b.width as u64;
    if required > config.catalog.max_width() as u64 {
        return None;
    }
    let required = required as u32;
    let width = config.catalog.minimal_fitting_width(required, config.min_trim)?;
    let trim = width - required;
    if trim > config.max_trim {
        return None;
    }
    if a.material != b.material {
        return None;
    }
    Some(RollFit { width, trim })
}

/// Resolves the shared roll length and the resulting deviations.
///
/// Each order's natural length is what it would need produced alone at its
/// lane count; the shared length is their arithmetic mean, clamped upward
/// so the longer-running order is not starved past the base tolerance
/// band. Candidates whose signed max deviation exceeds the 4x acceptance
/// ceiling are discarded here and never reach the reporter.
fn resolve(
    a: &Order,
    b: &Order,
    lanes_a: u32,
    lanes_b: u32,
    fit: RollFit,
    config: &PlannerConfig,
) -> Option<Candidate> {
    let natural_a = (a.count as u64 / lanes_a as u64) * a.length as u64;
    let natural_b = (b.count as u64 / lanes_b as u64) * b.length as u64;

    let mut roll_length = (natural_a + natural_b) as f64 / 2.0;
    let min_factor = (100.0 - config.allowed_deviation_percent + 1.0) / 100.0;
    let floor_length = natural_a.max(natural_b) as f64 * min_factor;
    if roll_length < floor_length {
        roll_length = floor_length;
    }

    let lines_a = (roll_length / a.length as f64).floor() as u64;
    let lines_b = (roll_length / b.length as f64).floor() as u64;
    let produced_a = lanes_a as u64 * lines_a;
    let produced_b = lanes_b as u64 * lines_b;
    let deviation_a = (produced_a as f64 - a.count as f64) / a.count as f64 * 100.0;
    let deviation_b = (produced_b as f64 - b.count as f64) / b.count as f64 * 100.0;

    // Signed maximum: a deep under-production on one order can hide behind
    // a smaller over-production on the other.
    if deviation_a.max(deviation_b) > config.acceptance_ceiling() {
        return None;
    }

    Some(Candidate {
        order_a: a.clone(),
        order_b: b.clone(),
        lanes_a,
        lanes_b,
        roll_width: fit.width,
        trim: fit.trim,
        roll_length,
        lines_a,
        lines_b,
        produced_a,
        produced_b,
        deviation_a,
        deviation_b,
    })
}

/// The search entry point: a pure function of orders and configuration.
/// Returns every accepted candidate in generation order.
pub fn plan(orders: &[Order], config: &PlannerConfig) -> Vec<Candidate> {
    LaneSplits::new(orders, config)
        .filter_map(|split| {
            let a = &orders[split.a];
            let b = &orders[split.b];
            let fit = fit_roll(a, b, split.lanes_a, split.lanes_b, config)?;
            resolve(a, b, split.lanes_a, split.lanes_b, fit, config)
        })
        .collect()
}
