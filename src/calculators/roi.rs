//! Return-on-investment estimate for a JellyGuard installation.
//!
//! Inputs are the facility size, how many jellyfish shutdowns the plant
//! suffers per year, and what each shutdown costs. Operating and installation
//! costs come from fixed per-size tables.

use serde::Deserialize;

/// Share of shutdowns prevented (conservative end of the measured range).
pub const EFFICIENCY_RATE: f64 = 0.95;

/// Slider range for shutdowns per year.
pub const SHUTDOWNS_RANGE: (f64, f64) = (0.0, 10.0);
/// Slider range and step for the cost of one shutdown, in dollars.
pub const SHUTDOWN_COST_RANGE: (f64, f64) = (800_000.0, 2_500_000.0);
/// Slider step for the cost of one shutdown.
pub const SHUTDOWN_COST_STEP: f64 = 100_000.0;

/// Installation tier, which fixes operating and installation costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilitySize {
	/// Single intake.
	Small,
	/// A few intakes; the default.
	#[default]
	Medium,
	/// Many intakes.
	Large,
}

impl FacilitySize {
	/// Yearly running cost of the system.
	pub const fn operating_cost(self) -> f64 {
		match self {
			Self::Small => 12_000.0,
			Self::Medium => 28_500.0,
			Self::Large => 45_000.0,
		}
	}

	/// One-off installation cost.
	pub const fn installation_cost(self) -> f64 {
		match self {
			Self::Small => 180_000.0,
			Self::Medium => 350_000.0,
			Self::Large => 550_000.0,
		}
	}
}

/// Calculator inputs.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct RoiInput {
	/// Installation tier.
	pub facility: FacilitySize,
	/// Jellyfish shutdowns suffered per year.
	pub shutdowns_per_year: f64,
	/// Dollars lost per shutdown.
	pub cost_per_shutdown: f64,
}

impl Default for RoiInput {
	fn default() -> Self {
		Self {
			facility: FacilitySize::Medium,
			shutdowns_per_year: 4.0,
			cost_per_shutdown: 1_500_000.0,
		}
	}
}

/// Calculator outputs, in dollars unless noted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoiEstimate {
	/// What shutdowns cost today, per year.
	pub annual_loss: f64,
	/// Losses avoided per year.
	pub projected_savings: f64,
	/// Avoided losses minus operating cost.
	pub net_annual_savings: f64,
	/// Months until installation pays for itself; 0 when it never does.
	pub payback_months: u32,
	/// Cumulative net gain after five years, floored at zero.
	pub five_year_savings: f64,
}

fn non_negative(value: f64) -> f64 {
	if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Computes the estimate. Negative or non-finite inputs count as zero.
pub fn estimate(input: &RoiInput) -> RoiEstimate {
	let annual_loss = non_negative(input.shutdowns_per_year) * non_negative(input.cost_per_shutdown);
	let projected_savings = annual_loss * EFFICIENCY_RATE;
	let install = input.facility.installation_cost();
	let net_annual_savings = projected_savings - input.facility.operating_cost();

	let payback_months = if net_annual_savings > 0.0 {
		(install / net_annual_savings * 12.0).round() as u32
	} else {
		0
	};

	RoiEstimate {
		annual_loss,
		projected_savings,
		net_annual_savings,
		payback_months,
		five_year_savings: (net_annual_savings * 5.0 - install).max(0.0),
	}
}

/// Whole-dollar US currency, e.g. `$5,700,000`.
pub fn format_currency(value: f64) -> String {
	let rounded = value.round();
	let digits = format!("{:.0}", rounded.abs());
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(ch);
	}
	if rounded < 0.0 {
		format!("-${grouped}")
	} else {
		format!("${grouped}")
	}
}

/// Milliseconds between count-up steps (60 steps over 1.5 s).
pub const COUNT_UP_INTERVAL_MS: u32 = 25;

/// Animates a displayed figure from zero to its target in fixed steps.
#[derive(Clone, Copy, Debug)]
pub struct CountUp {
	target: f64,
	step: u32,
	steps: u32,
}

impl CountUp {
	/// Steps from zero to the target.
	pub const STEPS: u32 = 60;

	/// A count starting at zero.
	pub fn new(target: f64) -> Self {
		Self {
			target,
			step: 0,
			steps: Self::STEPS,
		}
	}

	/// Advances one step and returns the value to display.
	///
	/// Intermediate values are floored; the final step shows the exact target.
	pub fn tick(&mut self) -> f64 {
		self.step = (self.step + 1).min(self.steps);
		if self.is_done() {
			self.target
		} else {
			(self.target * f64::from(self.step) / f64::from(self.steps)).floor()
		}
	}

	/// Whether the target is showing.
	pub fn is_done(&self) -> bool {
		self.step >= self.steps
	}

	/// Restarts the count toward a new target.
	pub fn retarget(&mut self, target: f64) {
		*self = Self::new(target);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_medium_facility() {
		let est = estimate(&RoiInput::default());
		assert_eq!(est.annual_loss, 6_000_000.0);
		assert_eq!(est.projected_savings, 5_700_000.0);
		assert_eq!(est.net_annual_savings, 5_671_500.0);
		assert_eq!(est.payback_months, 1);
		assert_eq!(est.five_year_savings, 28_007_500.0);
	}

	#[test]
	fn payback_rounds_to_nearest_month() {
		// net = 200_000 * 0.95 - 12_000 = 178_000; 180_000 / 178_000 * 12 = 12.13
		let est = estimate(&RoiInput {
			facility: FacilitySize::Small,
			shutdowns_per_year: 1.0,
			cost_per_shutdown: 200_000.0,
		});
		assert_eq!(est.payback_months, 12);

		// net = 100_000 * 0.95 - 12_000 = 83_000; 180_000 / 83_000 * 12 = 26.02
		let est = estimate(&RoiInput {
			facility: FacilitySize::Small,
			shutdowns_per_year: 1.0,
			cost_per_shutdown: 100_000.0,
		});
		assert_eq!(est.payback_months, 26);
	}

	#[test]
	fn no_payback_when_net_savings_are_not_positive() {
		let est = estimate(&RoiInput {
			shutdowns_per_year: 0.0,
			..RoiInput::default()
		});
		assert_eq!(est.net_annual_savings, -28_500.0);
		assert_eq!(est.payback_months, 0);
		assert_eq!(est.five_year_savings, 0.0);

		// Exactly break-even.
		let est = estimate(&RoiInput {
			facility: FacilitySize::Small,
			shutdowns_per_year: 1.0,
			cost_per_shutdown: 12_000.0 / EFFICIENCY_RATE,
		});
		assert!(est.net_annual_savings.abs() < 1e-6);
		assert_eq!(est.five_year_savings, 0.0);
	}

	#[test]
	fn negative_inputs_count_as_zero() {
		let est = estimate(&RoiInput {
			facility: FacilitySize::Large,
			shutdowns_per_year: -3.0,
			cost_per_shutdown: f64::NAN,
		});
		assert_eq!(est.annual_loss, 0.0);
		assert_eq!(est.payback_months, 0);
	}

	#[test]
	fn currency_formatting() {
		assert_eq!(format_currency(0.0), "$0");
		assert_eq!(format_currency(999.4), "$999");
		assert_eq!(format_currency(5_700_000.0), "$5,700,000");
		assert_eq!(format_currency(28_007_500.0), "$28,007,500");
		assert_eq!(format_currency(-1234.0), "-$1,234");
	}

	#[test]
	fn count_up_floors_then_lands_on_target() {
		let mut count = CountUp::new(100.5);
		let first = count.tick();
		assert_eq!(first, 1.0);
		let mut last = first;
		while !count.is_done() {
			let next = count.tick();
			assert!(next >= last);
			last = next;
		}
		assert_eq!(last, 100.5);
		assert_eq!(count.tick(), 100.5);

		count.retarget(10.0);
		assert!(!count.is_done());
	}
}
