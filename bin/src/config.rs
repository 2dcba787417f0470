//! Momentum parameter loading for the CLI.
//!
//! Parameters come from a JSON file (`--config` or `SURGE_CONFIG`), falling
//! back to the defaults, with individual flags layered on top. The result is
//! always re-validated.

use anyhow::{Context, Result};
use clap::Args;
use std::{
    fs,
    path::{Path, PathBuf},
};
use surge::MomentumParameters;

/// Parameter flags shared by the commands that score.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ParamArgs {
    /// JSON parameter file ({"windows": [...], "weights": [...], "min_history_days": N})
    #[arg(long, env = "SURGE_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Window lengths in trading days, comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) windows: Option<Vec<usize>>,

    /// Window weights, comma separated and parallel to the windows
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub(crate) weights: Option<Vec<f64>>,

    /// Minimum number of prices an instrument needs to be ranked
    #[arg(long)]
    pub(crate) min_history: Option<usize>,
}

impl ParamArgs {
    /// Effective parameters after the file and flag overrides.
    pub(crate) fn resolve(&self) -> Result<MomentumParameters> {
        let base = match &self.config {
            Some(path) => load_file(path)?,
            None => MomentumParameters::default(),
        };
        apply_overrides(
            base,
            self.windows.clone(),
            self.weights.clone(),
            self.min_history,
        )
    }
}

/// Read and validate a JSON parameter file.
pub(crate) fn load_file(path: &Path) -> Result<MomentumParameters> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file {}", path.display()))?;
    parse_params(&text).with_context(|| format!("invalid parameter file {}", path.display()))
}

/// Parse parameters from JSON; omitted fields take their defaults.
pub(crate) fn parse_params(json: &str) -> Result<MomentumParameters> {
    Ok(serde_json::from_str(json)?)
}

/// Replace individual fields of `base` and re-validate.
pub(crate) fn apply_overrides(
    base: MomentumParameters,
    windows: Option<Vec<usize>>,
    weights: Option<Vec<f64>>,
    min_history: Option<usize>,
) -> Result<MomentumParameters> {
    if windows.is_none() && weights.is_none() && min_history.is_none() {
        return Ok(base);
    }

    let params = MomentumParameters::new(
        windows.unwrap_or_else(|| base.windows().to_vec()),
        weights.unwrap_or_else(|| base.weights().to_vec()),
        min_history.unwrap_or(base.min_history_days()),
    )?;
    Ok(params)
}

/// Trading days to fetch so that the history filter and the 3-month
/// look-back can both be satisfied.
pub(crate) fn default_lookback(params: &MomentumParameters) -> usize {
    (params.min_history_days() + 1).max(params.full_history_rows() + 63)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_full_file() {
        let params =
            parse_params(r#"{"windows": [21, 63], "weights": [0.25, 0.75], "min_history_days": 100}"#)
                .unwrap();
        assert_eq!(params.windows(), [21, 63]);
        assert_eq!(params.weights(), [0.25, 0.75]);
        assert_eq!(params.min_history_days(), 100);
    }

    #[test]
    fn test_parse_partial_file_uses_defaults() {
        let params = parse_params(r#"{"min_history_days": 300}"#).unwrap();
        assert_eq!(params.windows(), MomentumParameters::default().windows());
        assert_eq!(params.min_history_days(), 300);
    }

    #[rstest]
    #[case::length_mismatch(r#"{"windows": [21, 63], "weights": [1.0]}"#)]
    #[case::zero_window(r#"{"windows": [0], "weights": [1.0]}"#)]
    #[case::empty(r#"{"windows": [], "weights": []}"#)]
    #[case::not_json("windows = [21]")]
    fn test_invalid_files_rejected(#[case] json: &str) {
        assert!(parse_params(json).is_err());
    }

    #[test]
    fn test_overrides() {
        let base = MomentumParameters::default();
        let params = apply_overrides(base.clone(), None, None, Some(50)).unwrap();
        assert_eq!(params.min_history_days(), 50);
        assert_eq!(params.windows(), base.windows());

        let params =
            apply_overrides(base.clone(), Some(vec![10, 20]), Some(vec![0.5, -0.5]), None).unwrap();
        assert_eq!(params.windows(), [10, 20]);
        assert_eq!(params.weights(), [0.5, -0.5]);

        // Windows alone no longer match the default weights
        assert!(apply_overrides(base, Some(vec![10, 20]), None, None).is_err());
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let base = MomentumParameters::new(vec![5], vec![2.0], 7).unwrap();
        assert_eq!(apply_overrides(base.clone(), None, None, None).unwrap(), base);
    }

    #[test]
    fn test_default_lookback() {
        assert_eq!(default_lookback(&MomentumParameters::default()), 316);
        let long_filter = MomentumParameters::default().with_min_history_days(500);
        assert_eq!(default_lookback(&long_filter), 501);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/nonexistent/surge.json")).unwrap_err();
        assert!(err.to_string().contains("reading parameter file"));
    }
}
