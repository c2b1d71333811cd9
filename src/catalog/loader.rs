//! Reads the fragment dataset (one CSV row per tracked object) into a [`DebrisCatalog`].

use super::debris_catalog::{DebrisCatalog, FragmentId, FragmentRecord};
use crate::errors::DataLoadError;
use crate::models::OrbitalElements;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Which records make it into the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    /// Exact value of the `Name` column.
    pub family: String,
    /// Records must have a semi-major axis strictly above this value [m].
    pub min_semi_major_axis: f64,
    /// Number of matching records to keep, in file order.
    pub count: usize,
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Semi-Major-Axis [m]")]
    semi_major_axis: f64,
    #[serde(rename = "Eccentricity")]
    eccentricity: f64,
    #[serde(rename = "Inclination [rad]")]
    inclination: f64,
    #[serde(
        rename = "Longitude of the ascending node [rad]",
        alias = "Longitude-of-ascending-node [rad]"
    )]
    raan: f64,
    #[serde(
        rename = "Argument of periapsis [rad]",
        alias = "Argument-of-periapsis [rad]"
    )]
    arg_periapsis: f64,
    #[serde(rename = "Mean Anomaly [rad]", alias = "Mean-Anomaly [rad]")]
    mean_anomaly: f64,
}

impl DatasetRow {
    fn elements(&self) -> OrbitalElements {
        OrbitalElements::new(
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.arg_periapsis,
            self.mean_anomaly,
        )
    }
}

/// Loads the catalog from a CSV file. The file is closed before this returns, whether or not
/// parsing succeeded.
pub fn load_catalog(
    path: impl AsRef<Path>,
    filter: &CatalogFilter,
) -> Result<DebrisCatalog, DataLoadError> {
    let path = path.as_ref();
    info!("Loading fragment dataset from {:?}", path);

    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_catalog(BufReader::new(file), filter)
}

/// Parses CSV data, keeping the first `filter.count` rows of the requested family above the
/// altitude cutoff. Reading stops once enough rows are collected.
pub fn read_catalog<R: Read>(
    reader: R,
    filter: &CatalogFilter,
) -> Result<DebrisCatalog, DataLoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    // `count` is user input; grow with the rows actually kept
    let mut fragments = Vec::new();
    let mut family_rows = 0;

    for (row, result) in rdr.deserialize::<DatasetRow>().enumerate() {
        if fragments.len() == filter.count {
            break;
        }
        let record = result?;
        if record.name != filter.family {
            continue;
        }
        family_rows += 1;
        if record.semi_major_axis <= filter.min_semi_major_axis {
            continue;
        }

        let elements = record.elements();
        validate_elements(row, &elements)?;
        fragments.push(FragmentRecord::new(FragmentId(row), record.name, elements));
    }

    if fragments.len() < filter.count {
        return Err(DataLoadError::InsufficientRecords {
            family: filter.family.clone(),
            requested: filter.count,
            available: fragments.len(),
        });
    }

    debug!(
        "{} '{}' rows scanned, {} kept above a = {:.1} km",
        family_rows,
        filter.family,
        fragments.len(),
        filter.min_semi_major_axis / 1000.0
    );
    info!("Loaded {} fragments of '{}'", fragments.len(), filter.family);

    Ok(DebrisCatalog::new(fragments))
}

fn validate_elements(row: usize, elements: &OrbitalElements) -> Result<(), DataLoadError> {
    let invalid = |reason: String| DataLoadError::InvalidRecord { row, reason };

    if !elements.is_finite() {
        return Err(invalid("non-finite orbital element".to_string()));
    }
    if elements.a <= 0.0 {
        return Err(invalid(format!("semi-major axis {} m is not positive", elements.a)));
    }
    if !elements.is_elliptical() {
        return Err(invalid(format!(
            "eccentricity {} is outside [0, 1)",
            elements.e
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Name,Semi-Major-Axis [m],Eccentricity,Inclination [rad],Longitude of the ascending node [rad],Argument of periapsis [rad],Mean Anomaly [rad]";

    fn dataset(rows: &[&str]) -> String {
        let mut data = String::from(HEADER);
        for row in rows {
            data.push('\n');
            data.push_str(row);
        }
        data
    }

    fn filter(count: usize) -> CatalogFilter {
        CatalogFilter {
            family: "Kosmos 2251-Collision-Fragment".to_string(),
            min_semi_major_axis: 7_167_137.0,
            count,
        }
    }

    #[test]
    fn keeps_first_matching_rows_in_file_order() {
        let data = dataset(&[
            "Kosmos 2251-Collision-Fragment,7200000,0.01,1.29,0.5,0.1,0.2",
            "Iridium 33-Collision-Fragment,7300000,0.01,1.50,0.5,0.1,0.2",
            "Kosmos 2251-Collision-Fragment,7100000,0.01,1.29,0.5,0.1,0.2",
            "Kosmos 2251-Collision-Fragment,7250000,0.02,1.30,0.6,0.2,0.3",
            "Kosmos 2251-Collision-Fragment,7260000,0.03,1.31,0.7,0.3,0.4",
        ]);

        let catalog = read_catalog(data.as_bytes(), &filter(2)).unwrap();
        assert_eq!(catalog.len(), 2);

        let ids: Vec<usize> = catalog.iter().map(|f| f.id.0).collect();
        assert_eq!(ids, vec![0, 3]);
        assert_eq!(catalog.get(1).unwrap().elements.e, 0.02);
        assert_eq!(catalog.removed_count(), 0);
    }

    #[test]
    fn too_few_matching_rows_is_an_error() {
        let data = dataset(&[
            "Kosmos 2251-Collision-Fragment,7200000,0.01,1.29,0.5,0.1,0.2",
            "Kosmos 2251-Collision-Fragment,7000000,0.01,1.29,0.5,0.1,0.2",
        ]);

        match read_catalog(data.as_bytes(), &filter(2)) {
            Err(DataLoadError::InsufficientRecords {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected InsufficientRecords, got {:?}", other),
        }
    }

    #[test]
    fn huge_count_against_small_dataset_is_insufficient() {
        let data = dataset(&["Kosmos 2251-Collision-Fragment,7200000,0.01,1.29,0.5,0.1,0.2"]);

        match read_catalog(data.as_bytes(), &filter(1usize << 40)) {
            Err(DataLoadError::InsufficientRecords {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 1 << 40);
                assert_eq!(available, 1);
            }
            other => panic!("expected InsufficientRecords, got {:?}", other),
        }
    }

    #[test]
    fn malformed_number_is_an_error() {
        let data = dataset(&["Kosmos 2251-Collision-Fragment,abc,0.01,1.29,0.5,0.1,0.2"]);
        assert!(matches!(
            read_catalog(data.as_bytes(), &filter(1)),
            Err(DataLoadError::Csv(_))
        ));
    }

    #[test]
    fn hyperbolic_fragment_is_rejected() {
        let data = dataset(&["Kosmos 2251-Collision-Fragment,7200000,1.2,1.29,0.5,0.1,0.2"]);
        assert!(matches!(
            read_catalog(data.as_bytes(), &filter(1)),
            Err(DataLoadError::InvalidRecord { row: 0, .. })
        ));
    }

    #[test]
    fn extra_columns_and_hyphenated_headers_are_accepted() {
        let data = "Id,Name,Semi-Major-Axis [m],Eccentricity,Inclination [rad],Longitude-of-ascending-node [rad],Argument-of-periapsis [rad],Mean-Anomaly [rad]\n\
                    7,Kosmos 2251-Collision-Fragment,7200000,0.01,1.29,0.5,0.1,0.2\n";
        let catalog = read_catalog(data.as_bytes(), &filter(1)).unwrap();
        assert_eq!(catalog.get(0).unwrap().elements.raan, 0.5);
    }

    #[test]
    fn load_catalog_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            dataset(&["Kosmos 2251-Collision-Fragment,7200000,0.01,1.29,0.5,0.1,0.2"]).as_bytes(),
        )
        .unwrap();

        let catalog = load_catalog(file.path(), &filter(1)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().name, "Kosmos 2251-Collision-Fragment");
    }

    #[test]
    fn missing_file_is_an_open_error() {
        assert!(matches!(
            load_catalog("/nonexistent/fragments.csv", &filter(1)),
            Err(DataLoadError::Open { .. })
        ));
    }
}
