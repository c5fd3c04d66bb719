//! JellyGuard versus traditional jellyfish mitigation, metric by metric.

/// A compared quantity. For cost, power and maintenance lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
	/// Share of jellyfish removed.
	Efficacy,
	/// Annual operating cost.
	Cost,
	/// Average power draw.
	Power,
	/// Service visits per year.
	Maintenance,
	/// Eco-friendliness score.
	Environmental,
}

impl Metric {
	/// Every metric, in display order.
	pub const ALL: [Metric; 5] = [
		Metric::Efficacy,
		Metric::Cost,
		Metric::Power,
		Metric::Maintenance,
		Metric::Environmental,
	];

	/// Whether smaller values win this metric.
	pub const fn lower_is_better(self) -> bool {
		matches!(self, Metric::Cost | Metric::Power | Metric::Maintenance)
	}

	/// Heading shown above the metric's bars.
	pub const fn title(self) -> &'static str {
		match self {
			Metric::Efficacy => "Removal Efficacy",
			Metric::Cost => "Annual Operating Cost",
			Metric::Power => "Power Consumption",
			Metric::Maintenance => "Maintenance Frequency",
			Metric::Environmental => "Environmental Impact",
		}
	}

	/// Suffix appended to displayed values (cost has its own format).
	pub const fn unit(self) -> &'static str {
		match self {
			Metric::Efficacy | Metric::Environmental => "%",
			Metric::Cost => "",
			Metric::Power => " kW",
			Metric::Maintenance => "x/yr",
		}
	}
}

/// One row of the comparison table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solution {
	/// Display name.
	pub name: &'static str,
	/// Share of jellyfish removed, percent.
	pub efficacy: f64,
	/// Annual operating cost in dollars.
	pub cost: f64,
	/// Average draw in kW.
	pub power: f64,
	/// Service visits per year.
	pub maintenance: f64,
	/// Eco-friendliness score, percent.
	pub environmental: f64,
}

impl Solution {
	/// This solution's figure for `metric`.
	pub const fn value(&self, metric: Metric) -> f64 {
		match metric {
			Metric::Efficacy => self.efficacy,
			Metric::Cost => self.cost,
			Metric::Power => self.power,
			Metric::Maintenance => self.maintenance,
			Metric::Environmental => self.environmental,
		}
	}
}

/// Midpoints of the published ranges for each approach.
pub static SOLUTIONS: [Solution; 4] = [
	Solution {
		name: "JellyGuard",
		efficacy: 96.5,
		cost: 28_500.0,
		power: 5.0,
		maintenance: 4.0,
		environmental: 100.0,
	},
	Solution {
		name: "Chemical",
		efficacy: 72.5,
		cost: 190_000.0,
		power: 27.5,
		maintenance: 365.0,
		environmental: 0.0,
	},
	Solution {
		name: "Mechanical",
		efficacy: 80.0,
		cost: 375_000.0,
		power: 40.0,
		maintenance: 52.0,
		environmental: 20.0,
	},
	Solution {
		name: "Manual",
		efficacy: 50.0,
		cost: 350_000.0,
		power: 0.0,
		maintenance: 365.0,
		environmental: 40.0,
	},
];

/// Largest value of `metric` across the table; bar widths are relative to it.
pub fn max_value(metric: Metric) -> f64 {
	SOLUTIONS.iter().map(|s| s.value(metric)).fold(0.0, f64::max)
}

/// Bar width in percent of the widest bar. Zero when `max` is not positive.
pub fn bar_percent(value: f64, max: f64) -> f64 {
	if max <= 0.0 || !max.is_finite() || !value.is_finite() {
		return 0.0;
	}
	(value / max * 100.0).clamp(0.0, 100.0)
}

/// The best value for `metric`: minimum when lower is better, else maximum.
pub fn best_value(metric: Metric) -> f64 {
	let values = SOLUTIONS.iter().map(|s| s.value(metric));
	if metric.lower_is_better() {
		values.fold(f64::INFINITY, f64::min)
	} else {
		values.fold(f64::NEG_INFINITY, f64::max)
	}
}

/// The first solution holding the best value for `metric`.
pub fn best(metric: Metric) -> &'static Solution {
	let target = best_value(metric);
	SOLUTIONS
		.iter()
		.find(|s| s.value(metric) == target)
		.unwrap_or(&SOLUTIONS[0])
}

/// Whether `solution` ties for the best value of `metric`.
pub fn is_best(solution: &Solution, metric: Metric) -> bool {
	solution.value(metric) == best_value(metric)
}

/// `$29K` for thousands (rounded half up), `$950` below that.
pub fn format_cost(value: f64) -> String {
	if value >= 1000.0 {
		format!("${}K", (value / 1000.0).round())
	} else {
		format!("${value}")
	}
}

/// A value with its metric's unit.
pub fn format_value(metric: Metric, value: f64) -> String {
	match metric {
		Metric::Cost => format_cost(value),
		_ => format!("{value}{}", metric.unit()),
	}
}

/// Cubic ease-out of a progress clamped into `[0, 1]`.
pub fn ease_out_cubic(progress: f64) -> f64 {
	let p = progress.clamp(0.0, 1.0);
	1.0 - (1.0 - p).powi(3)
}

/// Milliseconds between bar animation steps (60 steps over 2 s).
pub const BAR_INTERVAL_MS: u32 = 33;

/// Grows every bar from zero to full width with an ease-out curve.
#[derive(Clone, Copy, Debug, Default)]
pub struct BarAnimation {
	step: u32,
}

impl BarAnimation {
	/// Steps from empty to full.
	pub const STEPS: u32 = 60;

	/// Advances one step and returns the eased fraction of full width.
	pub fn tick(&mut self) -> f64 {
		self.step = (self.step + 1).min(Self::STEPS);
		self.progress()
	}

	/// Eased fraction of full width at the current step.
	pub fn progress(&self) -> f64 {
		ease_out_cubic(f64::from(self.step) / f64::from(Self::STEPS))
	}

	/// Whether the bars have reached full width.
	pub fn is_done(&self) -> bool {
		self.step >= Self::STEPS
	}

	/// Animated width of a bar, in percent.
	pub fn width(&self, solution: &Solution, metric: Metric) -> f64 {
		bar_percent(solution.value(metric), max_value(metric)) * self.progress()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn jellyguard_wins_every_metric_but_power() {
		for metric in Metric::ALL {
			let winner = best(metric);
			if metric == Metric::Power {
				assert_eq!(winner.name, "Manual");
			} else {
				assert_eq!(winner.name, "JellyGuard", "{metric:?}");
			}
		}
	}

	#[test]
	fn bar_percent_handles_degenerate_max() {
		assert_eq!(bar_percent(5.0, 0.0), 0.0);
		assert_eq!(bar_percent(5.0, -1.0), 0.0);
		assert_eq!(bar_percent(20.0, 40.0), 50.0);
		let eco = SOLUTIONS[0].value(Metric::Environmental);
		assert_eq!(bar_percent(eco, max_value(Metric::Environmental)), 100.0);
	}

	#[test]
	fn cost_bars_are_relative_to_the_priciest() {
		assert_eq!(max_value(Metric::Cost), 375_000.0);
		let pct = bar_percent(28_500.0, max_value(Metric::Cost));
		assert!((pct - 7.6).abs() < 1e-9);
	}

	#[test]
	fn formatting() {
		assert_eq!(format_cost(28_500.0), "$29K");
		assert_eq!(format_cost(190_000.0), "$190K");
		assert_eq!(format_cost(950.0), "$950");
		assert_eq!(format_value(Metric::Efficacy, 96.5), "96.5%");
		assert_eq!(format_value(Metric::Power, 5.0), "5 kW");
		assert_eq!(format_value(Metric::Cost, 375_000.0), "$375K");
	}

	#[test]
	fn ease_out_is_monotonic_and_bounded() {
		assert_eq!(ease_out_cubic(0.0), 0.0);
		assert_eq!(ease_out_cubic(1.0), 1.0);
		assert_eq!(ease_out_cubic(2.0), 1.0);
		assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);

		let mut anim = BarAnimation::default();
		let mut last = 0.0;
		while !anim.is_done() {
			let p = anim.tick();
			assert!(p >= last);
			last = p;
		}
		assert_eq!(anim.width(&SOLUTIONS[0], Metric::Efficacy), 100.0);
	}
}
