use hifitime::Duration;
use std::fs::{self, File};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovalSample {
    /// Time since the start of the sweep, taken after the tick's step.
    pub elapsed: Duration,
    pub removed: usize,
    pub removed_fraction: f64,
}

impl RemovalSample {
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed.to_seconds() / 3600.0
    }
}

/// Append-only record of the removed fraction, one sample per tick.
#[derive(Debug, Clone, Default)]
pub struct RemovalTimeSeries {
    samples: Vec<RemovalSample>,
}

impl RemovalTimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, sample: RemovalSample) {
        debug_assert!(
            self.samples
                .last()
                .map_or(true, |last| sample.removed_fraction >= last.removed_fraction),
            "removed fraction regressed"
        );
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&RemovalSample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemovalSample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[RemovalSample] {
        &self.samples
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record([
            "Elapsed (s)",
            "Elapsed (hr)",
            "Removed",
            "Removed Fraction",
        ])?;
        for sample in &self.samples {
            writer.write_record(&[
                sample.elapsed.to_seconds().to_string(),
                sample.elapsed_hours().to_string(),
                sample.removed.to_string(),
                sample.removed_fraction.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the series to `path`, creating parent directories as needed.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> crate::errors::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        self.write_csv(File::create(path)?)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RemovalTimeSeries {
    type Item = &'a RemovalSample;
    type IntoIter = std::slice::Iter<'a, RemovalSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
