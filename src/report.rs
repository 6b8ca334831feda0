use crate::config::PlannerConfig;
use crate::types::{Candidate, Tier};

/// Splits accepted candidates into the two tolerance tiers, keeping
/// generation order within each.
pub fn partition_tiers<'a>(
    candidates: &'a [Candidate],
    allowed_deviation_percent: f64,
) -> (Vec<&'a Candidate>, Vec<&'a Candidate>) {
    candidates
        .iter()
        .partition(|c| c.tier(allowed_deviation_percent) == Tier::Optimal)
}

/// Roll length in km, floored to 10m steps as the planners are used to
/// reading it.
fn roll_length_km(roll_length_mm: f64) -> f64 {
    (roll_length_mm as u64 / 10_000) as f64 / 100.0
}

/// Trim as a percentage of the roll width, floored to one decimal.
fn trim_percent(trim: u32, roll_width: u32) -> f64 {
    (trim as u64 * 1000 / roll_width as u64) as f64 / 10.0
}

pub fn render_candidate(c: &Candidate, number: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nOption {}:\n", number));
    out.push_str(&format!(
        "Roll length: {:.2}km | Roll width: {}mm | Trim: {}mm ({:.1}%)\n",
        roll_length_km(c.roll_length),
        c.roll_width,
        c.trim,
        trim_percent(c.trim, c.roll_width),
    ));
    out.push_str(&format!("Material: {}\n", c.order_a.material));
    out.push_str(&format!("\n1. {}:\n", c.order_a));
    out.push_str(&format!("   Lanes: {}\n", c.lanes_a));
    out.push_str(&format!(
        "   Requested: {} | Produced: {} | Deviation: {:.2}%\n",
        c.order_a.count, c.produced_a, c.deviation_a
    ));
    out.push_str(&format!("\n2. {}:\n", c.order_b));
    out.push_str(&format!("   Lanes: {}\n", c.lanes_b));
    out.push_str(&format!(
        "   Requested: {} | Produced: {} | Deviation: {:.2}%\n",
        c.order_b.count, c.produced_b, c.deviation_b
    ));
    out.push_str(&"=".repeat(100));
    out.push('\n');
    out
}

/// Renders the full two-tier report. Option numbering runs continuously
/// across both tiers; candidates appear in generation order.
pub fn render_report(candidates: &[Candidate], config: &PlannerConfig) -> String {
    if candidates.is_empty() {
        return format!(
            "No feasible slitting combinations found (allowed deviation: ±{}%)\n",
            config.allowed_deviation_percent
        );
    }

    let (optimal, negotiable) = partition_tiers(candidates, config.allowed_deviation_percent);
    let mut out = String::new();
    let mut number = 0;

    out.push_str(&format!(
        "Optimal slitting options (deviation < {}%):\n",
        config.allowed_deviation_percent
    ));
    if optimal.is_empty() {
        out.push_str("(none)\n");
    }
    for c in &optimal {
        number += 1;
        out.push_str(&render_candidate(c, number));
    }

    out.push_str(&format!(
        "\nPossible if the customer agrees to a relaxed tolerance (deviation ≤ {}%):\n",
        config.acceptance_ceiling()
    ));
    if negotiable.is_empty() {
        out.push_str("(none)\n");
    }
    for c in &negotiable {
        number += 1;
        out.push_str(&render_candidate(c, number));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn order(name: &str, count: u32) -> Order {
        Order {
            name: name.to_string(),
            blank_type: "box".to_string(),
            width: 500,
            length: 1000,
            material: "T22(1)".to_string(),
            count,
        }
    }

    fn candidate(dev_a: f64, dev_b: f64) -> Candidate {
        Candidate {
            order_a: order("First order", 1000),
            order_b: order("Second order", 1000),
            lanes_a: 1,
            lanes_b: 1,
            roll_width: 1050,
            trim: 50,
            roll_length: 1_000_000.0,
            lines_a: 1000,
            lines_b: 1000,
            produced_a: 1000,
            produced_b: 1000,
            deviation_a: dev_a,
            deviation_b: dev_b,
        }
    }

    #[test]
    fn test_roll_length_km_floors_to_10m() {
        assert_eq!(roll_length_km(1_000_000.0), 1.0);
        // 1_234_567mm = 1.234567km, floored to 1.23
        assert_eq!(roll_length_km(1_234_567.0), 1.23);
    }

    #[test]
    fn test_trim_percent_floors_one_decimal() {
        // 50/1050 = 4.7619%, floored to 4.7
        assert_eq!(trim_percent(50, 1050), 4.7);
        assert_eq!(trim_percent(300, 1500), 20.0);
    }

    #[test]
    fn test_render_candidate_reports_all_fields() {
        let text = render_candidate(&candidate(0.0, -1.5), 3);
        assert!(text.contains("Option 3:"));
        assert!(text.contains("Roll length: 1.00km"));
        assert!(text.contains("Roll width: 1050mm"));
        assert!(text.contains("Trim: 50mm (4.7%)"));
        assert!(text.contains("Material: T22(1)"));
        assert!(text.contains("First order (box 1000x500mm)"));
        assert!(text.contains("Second order (box 1000x500mm)"));
        assert!(text.contains("Lanes: 1"));
        assert!(text.contains("Requested: 1000 | Produced: 1000 | Deviation: 0.00%"));
        assert!(text.contains("Deviation: -1.50%"));
    }

    #[test]
    fn test_report_partitions_and_numbers_continuously() {
        let candidates = vec![candidate(25.0, 3.0), candidate(2.0, 1.0)];
        let config = PlannerConfig::default();
        let text = render_report(&candidates, &config);
        // the optimal candidate is numbered first even though it was
        // generated second
        let opt_pos = text.find("Optimal slitting options").unwrap();
        let neg_pos = text.find("relaxed tolerance").unwrap();
        assert!(opt_pos < neg_pos);
        assert!(text.find("Option 1:").unwrap() < neg_pos);
        assert!(text.find("Option 2:").unwrap() > neg_pos);
    }

    #[test]
    fn test_empty_report() {
        let config = PlannerConfig::default();
        let text = render_report(&[], &config);
        assert!(text.contains("No feasible slitting combinations"));
        assert!(text.contains("±10%"));
    }

    #[test]
    fn test_report_generation_order_within_tier() {
        let mut first = candidate(1.0, 0.0);
        first.trim = 60;
        let second = candidate(2.0, 0.0);
        let config = PlannerConfig::default();
        let text = render_report(&[first, second], &config);
        assert!(text.find("Trim: 60mm").unwrap() < text.find("Trim: 50mm").unwrap());
    }
}
