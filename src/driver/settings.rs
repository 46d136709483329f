use crate::Result;
use core::ops::RangeInclusive;
use core::time::Duration;
use ohno::app_err;
use serde::{Deserialize, Serialize};

const PERCENT: RangeInclusive<f64> = 0.0..=100.0;
const PROBABILITY: RangeInclusive<f64> = 0.0..=1.0;

/// All the knobs that shape the animation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub leak: LeakSettings,

    #[serde(default)]
    pub fill: FillSettings,

    #[serde(default)]
    pub drain: DrainSettings,

    #[serde(default)]
    pub particles: ParticleSettings,
}

/// Where the leak springs and how it gets repaired.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LeakSettings {
    /// Leak threshold for the very first cycle
    pub initial_threshold: f64,

    /// Lower bound for the threshold picked after each repair
    pub threshold_min: f64,

    /// Upper bound (exclusive) for the threshold picked after each repair
    pub threshold_max: f64,

    /// How long the "patching" message stays up before flow resumes
    #[serde(with = "humantime_serde")]
    pub repair_delay: Duration,

    /// Fewest drips released when the leak opens
    pub drip_burst_min: u32,

    /// Most drips released when the leak opens
    pub drip_burst_max: u32,

    /// Delay between consecutive drips of the opening burst
    #[serde(with = "humantime_serde")]
    pub drip_stagger: Duration,
}

/// How the bar fills.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillSettings {
    /// Shortest fill tick period; one period is drawn per fill loop
    #[serde(with = "humantime_serde")]
    pub period_min: Duration,

    /// Longest fill tick period (exclusive)
    #[serde(with = "humantime_serde")]
    pub period_max: Duration,

    /// Upper bound (exclusive) of the random increment added each tick
    pub increment_max: f64,

    /// Chance per tick of an extra stutter increment
    pub stutter_chance: f64,

    /// Size of the stutter increment
    pub stutter_amount: f64,

    /// Chance per tick of a bubble in the input container
    pub bubble_chance: f64,
}

/// How the bar drains once leaking.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrainSettings {
    /// Drain tick period
    #[serde(with = "humantime_serde")]
    pub period: Duration,

    /// Lower bound of the random decrement subtracted each tick
    pub decrement_min: f64,

    /// Upper bound (exclusive) of the random decrement subtracted each tick
    pub decrement_max: f64,

    /// Progress at or below which the drain stops and the repair begins
    pub floor: f64,

    /// Below this level the shake variant scales the decrement by `slow_factor`
    pub slow_below: f64,

    /// Decrement multiplier used below `slow_below`
    pub slow_factor: f64,

    /// Chance per tick of a bubble in the output container
    pub bubble_chance: f64,

    /// Chance per tick of a drip from the leak
    pub drip_chance: f64,
}

/// How long decorative particles live.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleSettings {
    #[serde(with = "humantime_serde")]
    pub bubble_lifetime: Duration,

    #[serde(with = "humantime_serde")]
    pub drip_lifetime: Duration,
}

impl Default for LeakSettings {
    fn default() -> Self {
        Self {
            initial_threshold: 85.0,
            threshold_min: 75.0,
            threshold_max: 95.0,
            repair_delay: Duration::from_secs(2),
            drip_burst_min: 2,
            drip_burst_max: 4,
            drip_stagger: Duration::from_millis(300),
        }
    }
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            period_min: Duration::from_millis(20),
            period_max: Duration::from_millis(50),
            increment_max: 2.0,
            stutter_chance: 0.1,
            stutter_amount: 0.1,
            bubble_chance: 0.15,
        }
    }
}

impl Default for DrainSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(40),
            decrement_min: 1.5,
            decrement_max: 3.5,
            floor: 5.0,
            slow_below: 50.0,
            slow_factor: 0.5,
            bubble_chance: 0.3,
            drip_chance: 0.2,
        }
    }
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            bubble_lifetime: Duration::from_millis(1500),
            drip_lifetime: Duration::from_secs(1),
        }
    }
}

impl Settings {
    /// Check that every value is in range and that ranges are well formed.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting
    pub fn validate(&self) -> Result<()> {
        let leak = &self.leak;
        let fill = &self.fill;
        let drain = &self.drain;

        for (name, value) in [
            ("leak.initial_threshold", leak.initial_threshold),
            ("leak.threshold_min", leak.threshold_min),
            ("leak.threshold_max", leak.threshold_max),
            ("fill.increment_max", fill.increment_max),
            ("fill.stutter_chance", fill.stutter_chance),
            ("fill.stutter_amount", fill.stutter_amount),
            ("fill.bubble_chance", fill.bubble_chance),
            ("drain.decrement_min", drain.decrement_min),
            ("drain.decrement_max", drain.decrement_max),
            ("drain.floor", drain.floor),
            ("drain.slow_below", drain.slow_below),
            ("drain.slow_factor", drain.slow_factor),
            ("drain.bubble_chance", drain.bubble_chance),
            ("drain.drip_chance", drain.drip_chance),
        ] {
            if !value.is_finite() {
                return Err(app_err!("{name} must be a finite number, got {value}"));
            }
        }

        check_percent("leak.initial_threshold", leak.initial_threshold)?;
        check_percent("leak.threshold_min", leak.threshold_min)?;
        check_percent("leak.threshold_max", leak.threshold_max)?;
        if leak.threshold_min > leak.threshold_max {
            return Err(app_err!(
                "leak.threshold_min ({}) must not exceed leak.threshold_max ({})",
                leak.threshold_min,
                leak.threshold_max
            ));
        }

        if leak.drip_burst_min > leak.drip_burst_max {
            return Err(app_err!(
                "leak.drip_burst_min ({}) must not exceed leak.drip_burst_max ({})",
                leak.drip_burst_min,
                leak.drip_burst_max
            ));
        }

        if fill.period_min.is_zero() {
            return Err(app_err!("fill.period_min must be greater than zero"));
        }

        if fill.period_min > fill.period_max {
            return Err(app_err!(
                "fill.period_min ({:?}) must not exceed fill.period_max ({:?})",
                fill.period_min,
                fill.period_max
            ));
        }

        if fill.increment_max <= 0.0 {
            return Err(app_err!("fill.increment_max must be positive, got {}", fill.increment_max));
        }

        check_probability("fill.stutter_chance", fill.stutter_chance)?;
        if fill.stutter_amount < 0.0 {
            return Err(app_err!("fill.stutter_amount must not be negative, got {}", fill.stutter_amount));
        }
        check_probability("fill.bubble_chance", fill.bubble_chance)?;

        if drain.period.is_zero() {
            return Err(app_err!("drain.period must be greater than zero"));
        }

        if drain.decrement_min <= 0.0 {
            return Err(app_err!("drain.decrement_min must be positive, got {}", drain.decrement_min));
        }

        if drain.decrement_min > drain.decrement_max {
            return Err(app_err!(
                "drain.decrement_min ({}) must not exceed drain.decrement_max ({})",
                drain.decrement_min,
                drain.decrement_max
            ));
        }

        check_percent("drain.floor", drain.floor)?;
        if drain.floor >= leak.threshold_min.min(leak.initial_threshold) {
            return Err(app_err!(
                "drain.floor ({}) must be below every leak threshold (lowest is {})",
                drain.floor,
                leak.threshold_min.min(leak.initial_threshold)
            ));
        }

        check_percent("drain.slow_below", drain.slow_below)?;
        if !(drain.slow_factor > 0.0 && drain.slow_factor <= 1.0) {
            return Err(app_err!("drain.slow_factor must be in (0, 1], got {}", drain.slow_factor));
        }

        check_probability("drain.bubble_chance", drain.bubble_chance)?;
        check_probability("drain.drip_chance", drain.drip_chance)?;

        Ok(())
    }
}

fn check_percent(name: &str, value: f64) -> Result<()> {
    if PERCENT.contains(&value) {
        Ok(())
    } else {
        Err(app_err!("{name} must be between 0 and 100, got {value}"))
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if PROBABILITY.contains(&value) {
        Ok(())
    } else {
        Err(app_err!("{name} must be between 0 and 1, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut settings = Settings::default();
        settings.leak.threshold_max = 120.0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("leak.threshold_max"));
    }

    #[test]
    fn test_inverted_threshold_range() {
        let mut settings = Settings::default();
        settings.leak.threshold_min = 90.0;
        settings.leak.threshold_max = 80.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_equal_threshold_bounds_are_allowed() {
        let mut settings = Settings::default();
        settings.leak.threshold_min = 80.0;
        settings.leak.threshold_max = 80.0;
        settings.validate().unwrap();
    }

    #[test]
    fn test_inverted_drip_burst() {
        let mut settings = Settings::default();
        settings.leak.drip_burst_min = 5;
        settings.leak.drip_burst_max = 1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_fill_period() {
        let mut settings = Settings::default();
        settings.fill.period_min = Duration::ZERO;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_drain_decrement_would_never_finish() {
        let mut settings = Settings::default();
        settings.drain.decrement_min = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_floor_must_sit_below_threshold() {
        let mut settings = Settings::default();
        settings.drain.floor = 80.0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("drain.floor"));
    }

    #[test]
    fn test_probability_out_of_range() {
        let mut settings = Settings::default();
        settings.drain.drip_chance = 1.5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("drain.drip_chance"));
    }

    #[test]
    fn test_slow_factor_zero_rejected() {
        let mut settings = Settings::default();
        settings.drain.slow_factor = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_negative_stutter_rejected() {
        let mut settings = Settings::default();
        settings.fill.stutter_amount = -0.5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("fill.stutter_amount"));
    }

    #[test]
    fn test_infinite_decrement_rejected() {
        let settings: Settings = toml::from_str("[drain]\ndecrement_max = inf\n").unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("drain.decrement_max"), "{err}");
    }

    #[test]
    fn test_nan_increment_rejected() {
        let settings: Settings = toml::from_str("[fill]\nincrement_max = nan\n").unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("fill.increment_max"), "{err}");
    }

    #[test]
    fn test_non_finite_values_rejected_everywhere() {
        let cases: [fn(&mut Settings, f64); 5] = [
            |s, v| s.fill.stutter_amount = v,
            |s, v| s.drain.decrement_min = v,
            |s, v| s.drain.slow_below = v,
            |s, v| s.leak.initial_threshold = v,
            |s, v| s.drain.floor = v,
        ];

        for set in cases {
            for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                let mut settings = Settings::default();
                set(&mut settings, value);
                assert!(settings.validate().is_err(), "{value} should be rejected");
            }
        }
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[drain]
floor = 10.0
"#,
        )
        .unwrap();

        assert!((settings.drain.floor - 10.0).abs() < f64::EPSILON);
        assert_eq!(settings.drain.period, Duration::from_millis(40));
        assert_eq!(settings.fill, FillSettings::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Settings, _> = toml::from_str(
            r#"
[fill]
speed = 3
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_humantime_durations() {
        let settings: Settings = toml::from_str(
            r#"
[leak]
repair_delay = "1s 500ms"
"#,
        )
        .unwrap();
        assert_eq!(settings.leak.repair_delay, Duration::from_millis(1500));
    }
}
