//! Progress panel: metric series and body scans

use super::{PanelError, PanelResult};
use crate::ai::AiService;
use crate::models::{ActivityLevel, BodyScanMetrics, Gender, ProgressDataPoint, ProgressMetric, User};
use crate::plans::content::{analyze_body_scan, BodyScanSummary};
use crate::store::LocalStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PROGRESS_METRICS_KEY: &str = "progress_metrics";
pub const BODY_SCANS_KEY: &str = "body_scans";

/// Series every user starts with
pub fn default_metrics() -> Vec<ProgressMetric> {
    vec![
        ProgressMetric::new("Body Weight", "kg"),
        ProgressMetric::new("Workout Duration", "min"),
        ProgressMetric::new("Max Push-ups", "reps"),
    ]
}

/// Body scan form; age and gender fall back to the profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyScanInput {
    pub date: Option<NaiveDate>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyScanResult {
    pub scan: BodyScanMetrics,
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub metrics: Vec<ProgressMetric>,
    pub body_scans: Vec<BodyScanMetrics>,
}

pub struct ProgressPanel {
    store: LocalStore,
    user_id: String,
    metrics: Vec<ProgressMetric>,
    body_scans: Vec<BodyScanMetrics>,
}

impl ProgressPanel {
    pub fn load(store: LocalStore, user_id: &str) -> Self {
        let metrics = store
            .load::<Vec<ProgressMetric>>(PROGRESS_METRICS_KEY, Some(user_id))
            .unwrap_or_else(default_metrics);
        let body_scans = store
            .load::<Vec<BodyScanMetrics>>(BODY_SCANS_KEY, Some(user_id))
            .unwrap_or_default();

        Self {
            store,
            user_id: user_id.to_string(),
            metrics,
            body_scans,
        }
    }

    pub fn metrics(&self) -> &[ProgressMetric] {
        &self.metrics
    }

    pub fn body_scans(&self) -> &[BodyScanMetrics] {
        &self.body_scans
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            metrics: self.metrics.clone(),
            body_scans: self.body_scans.clone(),
        }
    }

    /// Add a point to a series, keeping it ordered by date
    pub fn log_metric(&mut self, name: &str, date: NaiveDate, value: f64) -> PanelResult<&ProgressMetric> {
        if !value.is_finite() {
            return Err(PanelError::Validation("Invalid value.".to_string()));
        }
        let index = self
            .metrics
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| PanelError::NotFound(format!("metric '{}'", name)))?;

        let metric = &mut self.metrics[index];
        metric.data.push(ProgressDataPoint { date, value });
        metric.data.sort_by_key(|p| p.date);

        self.store.save(PROGRESS_METRICS_KEY, &self.metrics, Some(&self.user_id));
        tracing::debug!(user_id = %self.user_id, metric = %name, "Logged progress point");
        Ok(&self.metrics[index])
    }

    /// Store a scan and ask for a short analysis of it
    pub async fn add_body_scan(
        &mut self,
        input: BodyScanInput,
        user: &User,
        ai: &AiService,
    ) -> PanelResult<BodyScanResult> {
        let date = input
            .date
            .ok_or_else(|| PanelError::Validation("The scan date is required.".to_string()))?;

        let scan = BodyScanMetrics {
            date,
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            body_fat_percentage: input.body_fat_percentage,
            muscle_mass_kg: input.muscle_mass_kg,
            bmi: input.bmi,
            age: input.age.or(user.age),
            gender: input.gender.or(user.gender),
            activity_level: input.activity_level,
        };

        self.body_scans.push(scan.clone());
        self.body_scans.sort_by_key(|s| s.date);
        self.persist_scans();

        let summary = BodyScanSummary {
            weight_kg: scan.weight_kg,
            height_cm: scan.height_cm,
            age: scan.age,
            gender: scan.gender,
            activity_level: scan.activity_level,
        };
        let analysis = analyze_body_scan(ai, &summary).await;

        Ok(BodyScanResult { scan, analysis })
    }

    /// Remove every scan taken on `date`
    pub fn delete_body_scan(&mut self, date: NaiveDate) -> PanelResult<()> {
        let before = self.body_scans.len();
        self.body_scans.retain(|s| s.date != date);
        if self.body_scans.len() == before {
            return Err(PanelError::NotFound(format!("body scan on {}", date)));
        }
        self.persist_scans();
        Ok(())
    }

    /// All metric points as `metric,unit,date,value` rows
    pub fn export_csv(&self) -> PanelResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["metric", "unit", "date", "value"])
            .map_err(|e| PanelError::Export(e.to_string()))?;

        for metric in &self.metrics {
            for point in &metric.data {
                writer
                    .write_record([
                        metric.name.as_str(),
                        metric.unit.as_str(),
                        point.date.to_string().as_str(),
                        point.value.to_string().as_str(),
                    ])
                    .map_err(|e| PanelError::Export(e.to_string()))?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PanelError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| PanelError::Export(e.to_string()))
    }

    fn persist_scans(&self) {
        self.store.save(BODY_SCANS_KEY, &self.body_scans, Some(&self.user_id));
    }
}
