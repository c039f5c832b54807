//! Statistical transformations for Grammar of Graphics.
//!
//! A stat transforms a layer's aesthetic-named data before a geom draws it.
//! Every stat, built-in or third-party, implements [`StatTransform`]; the
//! pipeline only ever talks to that trait.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::data::DataFrame;
use super::geom::Geom;
use super::stat_spring::StatSpring;
use crate::spring::SpringParams;

/// A statistical transformation plugin.
///
/// [`compute_layer`](StatTransform::compute_layer) drives the hooks in order:
/// required-aesthetic check, missing-value removal,
/// [`setup_params`](StatTransform::setup_params),
/// [`setup_data`](StatTransform::setup_data) and finally
/// [`compute_panel`](StatTransform::compute_panel).
pub trait StatTransform: fmt::Debug + Send + Sync {
    /// Short name used in messages, e.g. `"stat_spring"`.
    fn name(&self) -> &'static str;

    /// Aesthetics that must be mapped.
    fn required_aes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Aesthetics that are understood when mapped.
    fn optional_aes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Geom used when the stat is added on its own.
    fn default_geom(&self) -> Geom {
        Geom::point()
    }

    /// Validate parameters against the layer data.
    fn setup_params(&self, _data: &DataFrame) -> Result<()> {
        Ok(())
    }

    /// Adjust the layer data before computation.
    fn setup_data(&self, data: DataFrame) -> Result<DataFrame> {
        Ok(data)
    }

    /// Transform the data of a single panel.
    fn compute_panel(&self, data: DataFrame) -> Result<DataFrame>;

    /// Run the stat over a layer.
    ///
    /// Rows with a missing or non-finite required aesthetic are dropped; a
    /// warning is logged unless `na_rm` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetics`] if a required aesthetic is not
    /// mapped, or whatever the hooks return.
    fn compute_layer(&self, data: DataFrame, na_rm: bool) -> Result<DataFrame> {
        check_required_aes(self.name(), self.required_aes(), &data)?;
        let data = remove_missing(self.name(), self.required_aes(), data, na_rm);

        debug!(stat = self.name(), rows = data.nrow(), "computing stat layer");
        self.setup_params(&data)?;
        let data = self.setup_data(data)?;
        self.compute_panel(data)
    }
}

/// Fail with [`Error::MissingAesthetics`] if any of `required` is absent.
pub(crate) fn check_required_aes(
    component: &str,
    required: &[&str],
    data: &DataFrame,
) -> Result<()> {
    let missing: Vec<&str> = required.iter().copied().filter(|a| !data.has_column(a)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingAesthetics { component: component.to_string(), missing: missing.join(", ") })
    }
}

fn remove_missing(stat: &str, required: &[&str], data: DataFrame, na_rm: bool) -> DataFrame {
    if required.is_empty() {
        return data;
    }
    let columns: Vec<Vec<Option<f32>>> =
        required.iter().filter_map(|a| data.numeric(a)).collect();
    let keep: Vec<usize> = (0..data.nrow())
        .filter(|&i| columns.iter().all(|col| col[i].is_some()))
        .collect();

    let removed = data.nrow() - keep.len();
    if removed == 0 {
        return data;
    }
    if !na_rm {
        warn!(stat, removed, "Removed rows containing missing values");
    }
    data.take_rows(&keep)
}

/// The identity stat: data passes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatIdentity;

impl StatTransform for StatIdentity {
    fn name(&self) -> &'static str {
        "stat_identity"
    }

    fn compute_panel(&self, data: DataFrame) -> Result<DataFrame> {
        Ok(data)
    }

    fn compute_layer(&self, data: DataFrame, _na_rm: bool) -> Result<DataFrame> {
        Ok(data)
    }
}

/// Statistical transformation selected for a layer.
#[derive(Debug, Clone, Default)]
pub enum Stat {
    /// No transformation (identity).
    #[default]
    Identity,
    /// Replace each segment with a spring.
    Spring(StatSpring),
    /// A user-supplied plugin.
    Custom(Arc<dyn StatTransform>),
}

static IDENTITY: StatIdentity = StatIdentity;

impl Stat {
    /// Create an identity stat (no transformation).
    #[must_use]
    pub fn identity() -> Self {
        Stat::Identity
    }

    /// Create a spring stat.
    #[must_use]
    pub fn spring(params: SpringParams) -> Self {
        Stat::Spring(StatSpring::new(params))
    }

    /// Wrap a third-party stat.
    #[must_use]
    pub fn custom(stat: impl StatTransform + 'static) -> Self {
        Stat::Custom(Arc::new(stat))
    }

    /// The plugin implementing this stat.
    #[must_use]
    pub fn transform(&self) -> &dyn StatTransform {
        match self {
            Stat::Identity => &IDENTITY,
            Stat::Spring(spring) => spring,
            Stat::Custom(custom) => custom.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::geom::GeomType;

    /// Doubles `y`; used to exercise the plugin hooks.
    #[derive(Debug)]
    struct StatDouble;

    impl StatTransform for StatDouble {
        fn name(&self) -> &'static str {
            "stat_double"
        }

        fn required_aes(&self) -> &'static [&'static str] {
            &["x", "y"]
        }

        fn compute_panel(&self, data: DataFrame) -> Result<DataFrame> {
            let mut out = data.clone();
            let y: Vec<f32> = data.get_f32("y").unwrap_or_default().iter().map(|v| v * 2.0).collect();
            out.add_column_f32("y", &y);
            Ok(out)
        }
    }

    #[test]
    fn test_stat_identity() {
        assert!(matches!(Stat::identity(), Stat::Identity));
        assert_eq!(Stat::default().transform().name(), "stat_identity");
    }

    #[test]
    fn test_identity_passes_through() {
        let data = DataFrame::from_xy(&[1.0, f32::NAN], &[2.0, 3.0]);
        let out = Stat::identity().transform().compute_layer(data, false).unwrap();
        assert_eq!(out.nrow(), 2);
    }

    #[test]
    fn test_stat_spring_constructor() {
        let stat = Stat::spring(SpringParams::default().with_tension(2.0));
        match &stat {
            Stat::Spring(s) => assert_eq!(s.params().tension, 2.0),
            _ => panic!("Expected Spring stat"),
        }
        assert_eq!(stat.transform().name(), "stat_spring");
        assert!(matches!(stat.transform().default_geom().geom_type, GeomType::Path { .. }));
    }

    #[test]
    fn test_custom_stat_runs_hooks() {
        let stat = Stat::custom(StatDouble);
        let out = stat
            .transform()
            .compute_layer(DataFrame::from_xy(&[1.0, 2.0], &[3.0, 4.0]), false)
            .unwrap();
        assert_eq!(out.get_f32("y").unwrap(), vec![6.0, 8.0]);
    }

    #[test]
    fn test_custom_stat_missing_aes() {
        let mut data = DataFrame::new();
        data.add_column_f32("x", &[1.0]);
        let err = Stat::custom(StatDouble).transform().compute_layer(data, false).unwrap_err();
        match err {
            Error::MissingAesthetics { component, missing } => {
                assert_eq!(component, "stat_double");
                assert_eq!(missing, "y");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_rows_removed() {
        let mut data = DataFrame::from_xy(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        data.add_column("y", vec![1.0f32.into(), crate::grammar::DataValue::Null, f32::NAN.into()]);
        let out = Stat::custom(StatDouble).transform().compute_layer(data, true).unwrap();
        assert_eq!(out.nrow(), 1);
        assert_eq!(out.get_f32("x").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_stat_clone_shares_custom() {
        let stat = Stat::custom(StatDouble);
        let copy = stat.clone();
        assert_eq!(copy.transform().name(), "stat_double");
    }
}
