//! Load-once motor catalog backed by a directory of `.eng` files.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::MotorError;
use crate::curve::ThrustCurve;
use crate::parse::parse_eng;

const MOTOR_EXTENSION: &str = "eng";

/// Inclusive numeric bounds used by [`MotorFilter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    fn widen(range: Option<Self>, value: f64) -> Option<Self> {
        Some(match range {
            Some(r) => Self::new(r.min.min(value), r.max.max(value)),
            None => Self::new(value, value),
        })
    }
}

/// Selection criteria; unset fields match every motor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotorFilter {
    /// Display name or raw code, compared case-insensitively.
    pub manufacturer: Option<String>,
    pub diameter_mm: Option<ValueRange>,
    pub length_mm: Option<ValueRange>,
    pub impulse_ns: Option<ValueRange>,
    pub average_thrust_n: Option<ValueRange>,
    pub burn_time_s: Option<ValueRange>,
}

impl MotorFilter {
    pub fn matches(&self, curve: &ThrustCurve) -> bool {
        let manufacturer_ok = self.manufacturer.as_deref().is_none_or(|m| {
            curve.manufacturer.eq_ignore_ascii_case(m)
                || curve.manufacturer_code.eq_ignore_ascii_case(m)
        });
        let within = |range: &Option<ValueRange>, value: f64| {
            range.as_ref().is_none_or(|r| r.contains(value))
        };
        manufacturer_ok
            && within(&self.diameter_mm, curve.diameter_mm)
            && within(&self.length_mm, curve.length_mm)
            && within(&self.impulse_ns, curve.impulse_ns())
            && within(&self.average_thrust_n, curve.average_thrust_n())
            && within(&self.burn_time_s, curve.burn_time_s())
    }
}

/// Catalog-wide bounds used to seed range selectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogRanges {
    pub length_mm: ValueRange,
    pub impulse_ns: ValueRange,
    pub average_thrust_n: ValueRange,
    pub burn_time_s: ValueRange,
}

/// Motor catalog. Files are read on first use and kept for the lifetime of the repository.
#[derive(Debug)]
pub struct ThrustCurveRepository {
    directory: Option<PathBuf>,
    curves: OnceLock<Vec<ThrustCurve>>,
}

impl ThrustCurveRepository {
    /// Catalog backed by `directory`; nothing is read until the first query.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: Some(directory.as_ref().to_path_buf()),
            curves: OnceLock::new(),
        }
    }

    /// Catalog over already-parsed curves, e.g. a small fixture set in tests.
    pub fn from_curves(mut curves: Vec<ThrustCurve>) -> Self {
        curves.sort_by(|a, b| a.id.cmp(&b.id));
        let cell = OnceLock::new();
        let _ = cell.set(curves);
        Self {
            directory: None,
            curves: cell,
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Parse every motor file. Any unreadable or malformed file aborts the load.
    pub fn load_all(&self) -> Result<&[ThrustCurve], MotorError> {
        if let Some(curves) = self.curves.get() {
            return Ok(curves);
        }
        let loaded = match &self.directory {
            Some(dir) => load_directory(dir)?,
            None => Vec::new(),
        };
        Ok(self.curves.get_or_init(|| loaded))
    }

    /// Exact lookup by file identifier such as `Estes_D12.eng`.
    pub fn find_by_id(&self, id: &str) -> Result<&ThrustCurve, MotorError> {
        self.load_all()?
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| MotorError::NotFound { id: id.to_string() })
    }

    /// Motors matching every criterion of `filter`, in catalog order.
    pub fn filter(&self, filter: &MotorFilter) -> Result<Vec<&ThrustCurve>, MotorError> {
        Ok(self
            .load_all()?
            .iter()
            .filter(|c| filter.matches(c))
            .collect())
    }

    /// Sorted unique manufacturer display names.
    pub fn manufacturers(&self) -> Result<Vec<String>, MotorError> {
        let mut names: Vec<String> = self
            .load_all()?
            .iter()
            .map(|c| c.manufacturer.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Sorted unique case diameters (mm).
    pub fn diameters(&self) -> Result<Vec<f64>, MotorError> {
        let mut diameters: Vec<f64> = self.load_all()?.iter().map(|c| c.diameter_mm).collect();
        diameters.sort_by(f64::total_cmp);
        diameters.dedup();
        Ok(diameters)
    }

    /// Min/max of the filterable metrics; `None` for an empty catalog.
    pub fn ranges(&self) -> Result<Option<CatalogRanges>, MotorError> {
        let mut length = None;
        let mut impulse = None;
        let mut thrust = None;
        let mut burn = None;
        for curve in self.load_all()? {
            length = ValueRange::widen(length, curve.length_mm);
            impulse = ValueRange::widen(impulse, curve.impulse_ns());
            thrust = ValueRange::widen(thrust, curve.average_thrust_n());
            burn = ValueRange::widen(burn, curve.burn_time_s());
        }
        Ok(match (length, impulse, thrust, burn) {
            (Some(length_mm), Some(impulse_ns), Some(average_thrust_n), Some(burn_time_s)) => {
                Some(CatalogRanges {
                    length_mm,
                    impulse_ns,
                    average_thrust_n,
                    burn_time_s,
                })
            }
            _ => None,
        })
    }
}

/// Sorted motor files among `entries`. An unreadable entry fails the whole scan.
fn motor_paths<I>(entries: I) -> std::io::Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() && has_motor_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_directory(dir: &Path) -> Result<Vec<ThrustCurve>, MotorError> {
    let io_err = |source: std::io::Error| MotorError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let listing = std::fs::read_dir(dir).map_err(io_err)?;
    let entries = motor_paths(listing.map(|entry| entry.map(|e| e.path()))).map_err(io_err)?;

    let mut curves = Vec::with_capacity(entries.len());
    for path in entries {
        let id = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MotorError::Malformed {
                file: path.display().to_string(),
                line: 0,
                reason: "file name is not valid UTF-8".to_string(),
            })?
            .to_string();
        let text = std::fs::read_to_string(&path).map_err(|source| MotorError::Io {
            path: path.clone(),
            source,
        })?;
        let curve = parse_eng(&id, &text)?;
        debug!(id = %curve.id, impulse_ns = curve.impulse_ns(), "parsed motor");
        curves.push(curve);
    }
    info!(count = curves.len(), directory = %dir.display(), "loaded motor catalog");
    Ok(curves)
}

fn has_motor_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(MOTOR_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const D12: &str = "; Estes D12\nD12 24 70 0-3-5-7 0.0211 0.0424 E\n0.05 5.0\n0.3 32.0\n0.6 11.0\n1.6 10.0\n1.7 0.0\n";
    const G80: &str = "G80T 29 124 4-7-10 0.0625 0.1249 A\n0.02 80.0\n0.8 95.0\n1.4 60.0\n1.6 0.0\n";
    const A8: &str = "A8 18 70 0-3-5 0.0033 0.0163 E\n0.1 9.0\n0.3 3.0\n0.5 0.0\n";

    fn fixture() -> ThrustCurveRepository {
        ThrustCurveRepository::from_curves(vec![
            parse_eng("Estes_D12.eng", D12).unwrap(),
            parse_eng("AeroTech_G80T.eng", G80).unwrap(),
            parse_eng("Estes_A8.eng", A8).unwrap(),
        ])
    }

    #[test]
    fn find_by_id_is_exact() {
        let repo = fixture();
        assert_eq!(repo.find_by_id("Estes_D12.eng").unwrap().designation, "D12");
        assert!(matches!(
            repo.find_by_id("Estes_D12"),
            Err(MotorError::NotFound { .. })
        ));
    }

    #[test]
    fn filter_by_manufacturer_and_ranges() {
        let repo = fixture();
        let estes = repo
            .filter(&MotorFilter {
                manufacturer: Some("estes industries".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(estes.len(), 2);

        let by_code = repo
            .filter(&MotorFilter {
                manufacturer: Some("A".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].id, "AeroTech_G80T.eng");

        let small = repo
            .filter(&MotorFilter {
                diameter_mm: Some(ValueRange::new(18.0, 24.0)),
                impulse_ns: Some(ValueRange::new(10.0, 40.0)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(small.len(), 1);
        assert_eq!(small[0].id, "Estes_D12.eng");
    }

    #[test]
    fn empty_filter_result_is_not_an_error() {
        let repo = fixture();
        let none = repo
            .filter(&MotorFilter {
                burn_time_s: Some(ValueRange::new(100.0, 200.0)),
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn catalog_summaries() {
        let repo = fixture();
        assert_eq!(
            repo.manufacturers().unwrap(),
            vec!["AeroTech".to_string(), "Estes Industries".to_string()]
        );
        assert_eq!(repo.diameters().unwrap(), vec![18.0, 24.0, 29.0]);
        let ranges = repo.ranges().unwrap().unwrap();
        assert_eq!(ranges.length_mm, ValueRange::new(70.0, 124.0));
        assert!(ranges.impulse_ns.min < ranges.impulse_ns.max);
    }

    #[test]
    fn load_is_idempotent_and_skips_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Estes_D12.eng"), D12).unwrap();
        fs::write(dir.path().join("AeroTech_G80T.ENG"), G80).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a motor").unwrap();

        let repo = ThrustCurveRepository::new(dir.path());
        let first: Vec<String> = repo.load_all().unwrap().iter().map(|c| c.id.clone()).collect();
        assert_eq!(first, vec!["AeroTech_G80T.ENG", "Estes_D12.eng"]);

        // Files added after the first load are not picked up: the catalog is cached.
        fs::write(dir.path().join("Estes_A8.eng"), A8).unwrap();
        assert_eq!(repo.load_all().unwrap().len(), 2);

        let again = ThrustCurveRepository::new(dir.path());
        fs::remove_file(dir.path().join("Estes_A8.eng")).unwrap();
        assert_eq!(again.load_all().unwrap(), repo.load_all().unwrap());
    }

    #[test]
    fn malformed_file_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Estes_D12.eng"), D12).unwrap();
        fs::write(dir.path().join("Broken_X1.eng"), "X1 18 70\n0.1 2\n").unwrap();
        let repo = ThrustCurveRepository::new(dir.path());
        assert!(matches!(
            repo.load_all(),
            Err(MotorError::Malformed { .. })
        ));
    }

    #[test]
    fn unreadable_directory_entry_aborts_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let motor = dir.path().join("Estes_D12.eng");
        fs::write(&motor, D12).unwrap();
        let entries = vec![
            Ok(motor.clone()),
            Err(std::io::Error::other("entry vanished")),
        ];
        let err = motor_paths(entries).unwrap_err();
        assert_eq!(err.to_string(), "entry vanished");

        let paths = motor_paths(vec![Ok(dir.path().join("notes.txt")), Ok(motor.clone())]);
        assert_eq!(paths.unwrap(), [motor]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let repo = ThrustCurveRepository::new("/definitely/not/a/motor/dir");
        assert!(matches!(repo.load_all(), Err(MotorError::Io { .. })));
    }
}
