// =============================================================================
// GangaWatch Dashboard - Forecast Artifacts
// =============================================================================
// Table of Contents:
// 1. Artifact Kinds
// 2. Artifact Store
// 3. Tests
// =============================================================================
//
// Layout under the data root (read-only, produced offline):
//
//   {city}/forecasts/{scenario}_{parameter}_forecast.csv
//   {city}/visualizations/{scenario}_{parameter}_forecast.png
//   {city}/visualizations/{scenario}_{parameter}_predictions.png
// =============================================================================

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::catalog::Selection;
use crate::error::{AppError, AppResult};
use crate::forecast::ForecastTable;

// -----------------------------------------------------------------------------
// 1. Artifact Kinds
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    ForecastTable,
    ForecastChart,
    PredictionsChart,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::ForecastTable,
        ArtifactKind::ForecastChart,
        ArtifactKind::PredictionsChart,
    ];

    fn directory(self) -> &'static str {
        match self {
            ArtifactKind::ForecastTable => "forecasts",
            ArtifactKind::ForecastChart | ArtifactKind::PredictionsChart => "visualizations",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::ForecastTable => "forecast.csv",
            ArtifactKind::ForecastChart => "forecast.png",
            ArtifactKind::PredictionsChart => "predictions.png",
        }
    }

    /// Path relative to the data root.
    pub fn relative_path(self, selection: &Selection) -> PathBuf {
        let file_name = format!(
            "{}_{}_{}",
            selection.scenario.name,
            selection.parameter,
            self.suffix()
        );
        [selection.city, self.directory(), file_name.as_str()]
            .iter()
            .collect()
    }
}

/// The two chart kinds as they appear in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Forecast,
    Predictions,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Forecast => "forecast",
            ChartKind::Predictions => "predictions",
        }
    }
}

impl From<ChartKind> for ArtifactKind {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Forecast => ArtifactKind::ForecastChart,
            ChartKind::Predictions => ArtifactKind::PredictionsChart,
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forecast" => Ok(ChartKind::Forecast),
            "predictions" => Ok(ChartKind::Predictions),
            other => Err(AppError::NotFound(format!("Unknown chart kind: {}", other))),
        }
    }
}

/// Which artifacts exist for a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub forecast_table: bool,
    pub forecast_chart: bool,
    pub predictions_chart: bool,
}

impl Availability {
    pub fn get(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::ForecastTable => self.forecast_table,
            ArtifactKind::ForecastChart => self.forecast_chart,
            ArtifactKind::PredictionsChart => self.predictions_chart,
        }
    }

    fn set(&mut self, kind: ArtifactKind, present: bool) {
        match kind {
            ArtifactKind::ForecastTable => self.forecast_table = present,
            ArtifactKind::ForecastChart => self.forecast_chart = present,
            ArtifactKind::PredictionsChart => self.predictions_chart = present,
        }
    }
}

/// Result of trying to load the forecast CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Missing,
    Loaded(ForecastTable),
    Unreadable(String),
}

// -----------------------------------------------------------------------------
// 2. Artifact Store
// -----------------------------------------------------------------------------

/// Read-only view of the artifact tree.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, selection: &Selection, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.relative_path(selection))
    }

    /// Whether the artifact is present. Errors during the check count as absent.
    pub async fn exists(&self, selection: &Selection, kind: ArtifactKind) -> bool {
        let path = self.path(selection, kind);
        is_file(&path).await
    }

    pub async fn availability(&self, selection: &Selection) -> Availability {
        let mut availability = Availability::default();
        for kind in ArtifactKind::ALL {
            availability.set(kind, self.exists(selection, kind).await);
        }
        availability
    }

    /// Read an artifact. Anything `exists` reports as absent is `NotFound`.
    pub async fn read_bytes(
        &self,
        selection: &Selection,
        kind: ArtifactKind,
    ) -> AppResult<Vec<u8>> {
        let path = self.path(selection, kind);
        if !is_file(&path).await {
            return Err(AppError::NotFound(format!(
                "No artifact for {} / {} / {}",
                selection.city, selection.scenario.name, selection.parameter
            )));
        }
        Ok(tokio::fs::read(&path).await?)
    }

    /// Load the forecast CSV, keeping at most `max_rows` rows.
    pub async fn load_table(&self, selection: &Selection, max_rows: usize) -> TableStatus {
        let bytes = match self.read_bytes(selection, ArtifactKind::ForecastTable).await {
            Ok(bytes) => bytes,
            Err(AppError::NotFound(_)) => return TableStatus::Missing,
            Err(e) => {
                tracing::warn!(city = selection.city, error = %e, "Forecast table read failed");
                return TableStatus::Unreadable(e.to_string());
            }
        };

        // Parsing walks every row; run it on the blocking pool.
        let parsed = tokio::task::spawn_blocking(move || {
            ForecastTable::from_reader(bytes.as_slice(), max_rows)
        })
        .await;

        match parsed {
            Ok(Ok(table)) => {
                tracing::debug!(
                    city = selection.city,
                    scenario = selection.scenario.name,
                    parameter = selection.parameter,
                    rows = table.total_rows,
                    "Loaded forecast table"
                );
                TableStatus::Loaded(table)
            }
            Ok(Err(e)) => {
                tracing::warn!(city = selection.city, error = %e, "Forecast table parse failed");
                TableStatus::Unreadable(e.to_string())
            }
            Err(e) => {
                tracing::error!(
                    city = selection.city,
                    error = %e,
                    "Forecast table parse task failed"
                );
                TableStatus::Unreadable(e.to_string())
            }
        }
    }
}

async fn is_file(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Artifact check failed");
            false
        }
    }
}

// -----------------------------------------------------------------------------
// 3. Tests
// -----------------------------------------------------------------------------
