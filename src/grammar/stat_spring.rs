//! The spring stat.
//!
//! Turns every `(x, y) -> (xend, yend)` row into the points of a coil, one
//! path group per input row. Columns other than the positions are carried
//! along, replicated for each coil point.

use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::Point;
use crate::spring::{create_spring, SpringParams};

use super::data::{DataFrame, DataValue};
use super::geom::Geom;
use super::stat::{check_required_aes, StatTransform};

const POSITION_AES: [&str; 4] = ["x", "y", "xend", "yend"];

/// Stat drawing springs between segment endpoints.
///
/// Mapped `diameter` and `tension` aesthetics override the layer parameters
/// row by row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatSpring {
    params: SpringParams,
}

impl StatSpring {
    /// Create the stat with the given layer parameters.
    #[must_use]
    pub fn new(params: SpringParams) -> Self {
        Self { params }
    }

    /// Layer parameters.
    #[must_use]
    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    /// Mutable layer parameters.
    pub fn params_mut(&mut self) -> &mut SpringParams {
        &mut self.params
    }

    fn row_params(&self, diameter: Option<f32>, tension: Option<f32>) -> SpringParams {
        SpringParams {
            diameter: diameter.unwrap_or(self.params.diameter),
            tension: tension.unwrap_or(self.params.tension),
            n: self.params.n,
        }
    }
}

impl StatTransform for StatSpring {
    fn name(&self) -> &'static str {
        "stat_spring"
    }

    fn required_aes(&self) -> &'static [&'static str] {
        &POSITION_AES
    }

    fn optional_aes(&self) -> &'static [&'static str] {
        &["diameter", "tension"]
    }

    fn default_geom(&self) -> Geom {
        Geom::path()
    }

    fn setup_params(&self, _data: &DataFrame) -> Result<()> {
        self.params.validate()
    }

    /// Give every row its own group so each spring is drawn as its own path.
    fn setup_data(&self, mut data: DataFrame) -> Result<DataFrame> {
        let n = data.nrow();
        let groups: Vec<DataValue> = match data.get("group") {
            None => (1..=n).map(|row| DataValue::Text(row.to_string())).collect(),
            Some(col) => {
                let keys: Vec<String> = (0..n)
                    .map(|i| col.get(i).map_or_else(|| DataValue::Null.to_string(), ToString::to_string))
                    .collect();
                let mut seen = HashSet::new();
                if keys.iter().all(|k| seen.insert(k.as_str())) {
                    return Ok(data);
                }
                keys.iter()
                    .enumerate()
                    .map(|(i, key)| DataValue::Text(format!("{key}-{}", i + 1)))
                    .collect()
            }
        };
        data.add_column("group", groups);
        Ok(data)
    }

    fn compute_panel(&self, data: DataFrame) -> Result<DataFrame> {
        check_required_aes(self.name(), self.required_aes(), &data)?;

        let column = |name: &str| data.numeric(name).unwrap_or_default();
        let (x, y, xend, yend) = (column("x"), column("y"), column("xend"), column("yend"));
        let diameter = data.numeric("diameter");
        let tension = data.numeric("tension");
        let at = |col: &Option<Vec<Option<f32>>>, i: usize| col.as_ref().and_then(|c| c[i]);

        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut source_rows = Vec::new();

        for i in 0..data.nrow() {
            let from = Point::new(x[i].unwrap_or(f32::NAN), y[i].unwrap_or(f32::NAN));
            let to = Point::new(xend[i].unwrap_or(f32::NAN), yend[i].unwrap_or(f32::NAN));
            let params = self.row_params(at(&diameter, i), at(&tension, i));

            let coil = create_spring(from, to, &params)?;
            source_rows.extend(std::iter::repeat(i).take(coil.len()));
            for p in coil {
                xs.push(p.x);
                ys.push(p.y);
            }
        }

        let carried = data.without_columns(&POSITION_AES).take_rows(&source_rows);
        let mut out = DataFrame::new();
        out.add_column_f32("x", &xs);
        out.add_column_f32("y", &ys);
        for name in carried.columns() {
            if let Some(values) = carried.get(name) {
                out.add_column(name, values.to_vec());
            }
        }
        Ok(out)
    }
}
