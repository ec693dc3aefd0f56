use crate::error::FindError;
use crate::lookup::lookup;
use crate::sampler::sample_delay;
use crate::table::{Columns, ScaleTable};
use rand::Rng;
use std::path::Path;
use tracing::debug;

/// Wait time for a caller that has been charging for `elapsed_time` slots.
///
/// The table at `source` is read with the default columns on every call.
/// Use [`Finder`] to build it once.
pub fn find(source: impl AsRef<Path>, elapsed_time: i64) -> Result<i64, FindError> {
    find_with_rng(
        source,
        &Columns::default(),
        elapsed_time,
        &mut rand::thread_rng(),
    )
}

pub fn find_with_rng<R: Rng + ?Sized>(
    source: impl AsRef<Path>,
    columns: &Columns,
    elapsed_time: i64,
    rng: &mut R,
) -> Result<i64, FindError> {
    let table = ScaleTable::from_path(source.as_ref(), columns)?;
    Finder::from_table(table).wait_time(rng, elapsed_time)
}

/// Holds a built table and samples wait times against it.
#[derive(Clone, Debug)]
pub struct Finder {
    table: ScaleTable,
}

impl Finder {
    pub fn open(source: impl AsRef<Path>, columns: &Columns) -> Result<Self, FindError> {
        Ok(Self::from_table(ScaleTable::from_path(
            source.as_ref(),
            columns,
        )?))
    }

    pub fn from_table(table: ScaleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ScaleTable {
        &self.table
    }

    pub fn scale_at(&self, elapsed_time: i64) -> Result<f64, FindError> {
        lookup(elapsed_time, &self.table)
    }

    pub fn wait_time<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        elapsed_time: i64,
    ) -> Result<i64, FindError> {
        let scale = self.scale_at(elapsed_time)?;
        let wait = sample_delay(rng, scale)?;
        debug!(elapsed_time, scale, wait, "wait time");
        Ok(wait)
    }

    /// `count` independent wait times for the same elapsed time.
    pub fn wait_times<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        elapsed_time: i64,
        count: usize,
    ) -> Result<Vec<i64>, FindError> {
        let scale = self.scale_at(elapsed_time)?;
        (0..count).map(|_| sample_delay(rng, scale)).collect()
    }
}
