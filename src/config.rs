use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub export_dir: PathBuf,
    pub default_budget: f64,
    pub budget_min: f64,
    pub budget_max: f64,
    pub budget_step: f64,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/sales.csv"),
            export_dir: PathBuf::from("."),
            default_budget: 500_000.0,
            budget_min: 50_000.0,
            budget_max: 10_000_000.0,
            budget_step: 50_000.0,
            preview_rows: 5,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}

// Budget amounts must be finite; `f64::from_str` happily accepts "NaN" and "inf".
fn parse_amount(key: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => match v.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(ConfigError::InvalidValue { key, value: v }),
        },
    }
}

impl DashboardConfig {
    /// Read settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let cfg = Self {
            csv_path: lookup("SALES_CSV_PATH").map(PathBuf::from).unwrap_or(d.csv_path),
            export_dir: lookup("SALES_EXPORT_DIR").map(PathBuf::from).unwrap_or(d.export_dir),
            default_budget: parse_amount("SALES_DEFAULT_BUDGET", lookup("SALES_DEFAULT_BUDGET"), d.default_budget)?,
            budget_min: parse_amount("SALES_BUDGET_MIN", lookup("SALES_BUDGET_MIN"), d.budget_min)?,
            budget_max: parse_amount("SALES_BUDGET_MAX", lookup("SALES_BUDGET_MAX"), d.budget_max)?,
            budget_step: parse_amount("SALES_BUDGET_STEP", lookup("SALES_BUDGET_STEP"), d.budget_step)?,
            preview_rows: parse_var("SALES_PREVIEW_ROWS", lookup("SALES_PREVIEW_ROWS"), d.preview_rows)?,
        };
        if cfg.budget_min > cfg.budget_max {
            return Err(ConfigError::InvalidBudgetBounds {
                min: cfg.budget_min,
                max: cfg.budget_max,
            });
        }
        Ok(cfg)
    }

    /// Snap a requested budget onto the step grid inside `[min, max]`.
    pub fn clamp_budget(&self, budget: f64) -> f64 {
        if !budget.is_finite() {
            return self.default_budget;
        }
        let clamped = budget.clamp(self.budget_min, self.budget_max);
        if self.budget_step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.budget_min) / self.budget_step).round();
        (self.budget_min + steps * self.budget_step).min(self.budget_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn unset_keys_use_defaults() {
        let cfg = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("SALES_CSV_PATH", "/tmp/q3.csv"),
            ("SALES_DEFAULT_BUDGET", "250000"),
            ("SALES_PREVIEW_ROWS", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from("/tmp/q3.csv"));
        assert_eq!(cfg.default_budget, 250_000.0);
        assert_eq!(cfg.preview_rows, 3);
    }

    #[test]
    fn rejects_bad_values() {
        let err = DashboardConfig::from_lookup(lookup(&[("SALES_BUDGET_MIN", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SALES_BUDGET_MIN", .. }));

        let err = DashboardConfig::from_lookup(lookup(&[("SALES_BUDGET_MIN", "20000000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBudgetBounds { .. }));

        for key in [
            "SALES_DEFAULT_BUDGET",
            "SALES_BUDGET_MIN",
            "SALES_BUDGET_MAX",
            "SALES_BUDGET_STEP",
        ] {
            for raw in ["NaN", "inf", "-inf"] {
                let err = DashboardConfig::from_lookup(lookup(&[(key, raw)])).unwrap_err();
                assert!(
                    matches!(err, ConfigError::InvalidValue { key: k, .. } if k == key),
                    "{key}={raw} was accepted"
                );
            }
        }
    }

    #[test]
    fn clamps_budget_to_grid() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.clamp_budget(10.0), 50_000.0);
        assert_eq!(cfg.clamp_budget(99_000_000.0), 10_000_000.0);
        assert_eq!(cfg.clamp_budget(124_000.0), 100_000.0);
        assert_eq!(cfg.clamp_budget(126_000.0), 150_000.0);
        assert_eq!(cfg.clamp_budget(f64::NAN), 500_000.0);
    }
}
