//! Attrition-risk enrichment.
//!
//! The score itself comes from an external prediction service. Enrichment is
//! two independent writes: the core record is persisted first, the score is
//! written back afterwards. A failed second step leaves the first in place;
//! re-running the update (or posting to the write-back endpoint) is the
//! compensating action, and repeating it only overwrites `riskscore`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use entity::employees;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{HrError, HrResult},
    repo::EmployeeRepo,
};

#[async_trait]
pub trait RiskScorer: Send + Sync {
    /// Attrition risk as a percentage in `[0, 100]`.
    async fn score(&self, features: &RiskFeatures) -> HrResult<f64>;
}

/// Features understood by the prediction service. Unknown values are left
/// out so the service falls back to its own defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiskFeatures {
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "Department", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "Education", skip_serializing_if = "Option::is_none")]
    pub education: Option<u8>,
    #[serde(rename = "Gender", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "JobRole", skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    #[serde(rename = "MonthlyIncome", skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<u64>,
    #[serde(rename = "PerformanceRating", skip_serializing_if = "Option::is_none")]
    pub performance_rating: Option<i32>,
}

impl RiskFeatures {
    pub fn from_employee(employee: &employees::Model, today: NaiveDate) -> Self {
        Self {
            age: employee.dob.and_then(|dob| age_on(dob, today)),
            department: Some(employee.department.clone()),
            education: employee.education.as_deref().and_then(education_level),
            gender: employee.gender.as_deref().and_then(normalize_gender),
            job_role: Some(employee.position.clone()),
            monthly_income: employee.salary.map(|salary| (salary / 12.0).round() as u64),
            performance_rating: employee.performance_rating,
        }
    }
}

/// Whole years between `dob` and `today`; `None` for dates in the future.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Maps free-text education onto the service's 1..=5 scale.
pub fn education_level(text: &str) -> Option<u8> {
    const LEVELS: [(u8, &[&str]); 5] = [
        (5, &["phd", "ph.d", "doctor"]),
        (4, &["master", "mba", "msc", "m.sc"]),
        (3, &["bachelor", "bsc", "b.sc", "btech", "b.tech", "undergraduate"]),
        (2, &["college", "associate", "diploma"]),
        (1, &["high school", "secondary", "ged"]),
    ];
    let lower = text.to_lowercase();
    LEVELS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(level, _)| *level)
}

fn normalize_gender(text: &str) -> Option<String> {
    match text.trim().to_lowercase().as_str() {
        "male" | "m" => Some("Male".into()),
        "female" | "f" => Some("Female".into()),
        _ => None,
    }
}

/// Converts the service's probability into a stored percentage.
pub fn probability_to_percent(probability: f64) -> HrResult<f64> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(HrError::ExternalService(format!(
            "risk_score {probability} outside [0, 1]"
        )));
    }
    Ok((probability * 10_000.0).round() / 100.0)
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    risk_score: Option<f64>,
    employee_leaving: Option<String>,
    error: Option<String>,
}

/// Prediction service reached over plain HTTP: `POST` the features as JSON,
/// read back `{"risk_score": p, "employee_leaving": "Yes"|"No"}`.
#[derive(Clone, Debug)]
pub struct HttpRiskScorer {
    client: Client,
    endpoint: String,
}

impl HttpRiskScorer {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> HrResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(external)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RiskScorer for HttpRiskScorer {
    #[instrument(name = "hr.risk.score", skip_all, fields(endpoint = %self.endpoint))]
    async fn score(&self, features: &RiskFeatures) -> HrResult<f64> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .map_err(external)?
            .error_for_status()
            .map_err(external)?;
        let body: PredictionResponse = response.json().await.map_err(external)?;
        if let Some(error) = body.error {
            return Err(HrError::ExternalService(error));
        }
        let probability = body
            .risk_score
            .ok_or_else(|| HrError::ExternalService("response carried no risk_score".into()))?;
        let percent = probability_to_percent(probability)?;
        debug!(
            percent,
            leaving = body.employee_leaving.as_deref().unwrap_or("unknown"),
            "risk scored"
        );
        Ok(percent)
    }
}

fn external(err: reqwest::Error) -> HrError {
    HrError::ExternalService(err.to_string())
}

/// What happened to the best-effort enrichment of one record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RiskOutcome {
    Scored { score: f64 },
    Skipped,
    Failed { error: String },
}

/// Scores `employee` and writes the result back. Returns the freshest copy of
/// the record: the re-read row on success, the untouched input otherwise.
pub async fn enrich(
    repo: &EmployeeRepo,
    scorer: Option<&dyn RiskScorer>,
    employee: employees::Model,
) -> (employees::Model, RiskOutcome) {
    let Some(scorer) = scorer else {
        return (employee, RiskOutcome::Skipped);
    };
    let features = RiskFeatures::from_employee(&employee, Utc::now().date_naive());
    let score = match scorer.score(&features).await {
        Ok(score) => score,
        Err(err) => {
            warn!(employee_id = %employee.employee_id, error = %err, "risk scoring failed");
            return (
                employee,
                RiskOutcome::Failed {
                    error: err.to_string(),
                },
            );
        }
    };
    match repo.set_risk_score(employee.employee_id, score).await {
        Ok(updated) => {
            info!(employee_id = %updated.employee_id, score, "risk score stored");
            (updated, RiskOutcome::Scored { score })
        }
        Err(err) => {
            warn!(employee_id = %employee.employee_id, error = %err, "risk score write-back failed");
            (
                employee,
                RiskOutcome::Failed {
                    error: err.to_string(),
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee() -> employees::Model {
        employees::Model {
            employee_id: Uuid::new_v4(),
            name: "Rachel Brown".into(),
            email: "rachel.brown@company.com".into(),
            phone: None,
            department: "Customer Support".into(),
            position: "Lead".into(),
            employment_type: None,
            start_date: None,
            dob: Some(date(1990, 6, 15)),
            gender: Some("female".into()),
            manager: None,
            salary: Some(60_000.0),
            skills: None,
            education: Some("Master of Science".into()),
            certifications: None,
            performance_rating: Some(3),
            goals: None,
            location: None,
            risk_score: None,
        }
    }

    async fn spawn_prediction_service(reply: Value) -> (String, Arc<Mutex<Option<Value>>>) {
        let seen = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let app = Router::new().route(
            "/predict",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                let reply = reply.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/predict"), seen)
    }

    #[test]
    fn age_counts_completed_years() {
        assert_eq!(age_on(date(1990, 6, 15), date(2025, 6, 14)), Some(34));
        assert_eq!(age_on(date(1990, 6, 15), date(2025, 6, 15)), Some(35));
        assert_eq!(age_on(date(2030, 1, 1), date(2025, 1, 1)), None);
    }

    #[test]
    fn education_text_maps_to_levels() {
        assert_eq!(education_level("PhD in Physics"), Some(5));
        assert_eq!(education_level("MBA"), Some(4));
        assert_eq!(education_level("Bachelor of Arts, City College"), Some(3));
        assert_eq!(education_level("Associate degree"), Some(2));
        assert_eq!(education_level("High School"), Some(1));
        assert_eq!(education_level("self-taught"), None);
    }

    #[test]
    fn features_skip_unknown_values() {
        let mut record = employee();
        record.dob = None;
        record.gender = Some("non-binary".into());
        record.education = None;
        let features = RiskFeatures::from_employee(&record, date(2025, 1, 1));
        let encoded = serde_json::to_value(&features).unwrap();
        assert_eq!(
            encoded,
            json!({
                "Department": "Customer Support",
                "JobRole": "Lead",
                "MonthlyIncome": 5000,
                "PerformanceRating": 3,
            })
        );
    }

    #[test]
    fn probability_becomes_two_decimal_percentage() {
        assert_eq!(probability_to_percent(0.7312).unwrap(), 73.12);
        assert_eq!(probability_to_percent(0.0).unwrap(), 0.0);
        assert_eq!(probability_to_percent(1.0).unwrap(), 100.0);
        assert!(probability_to_percent(1.5).is_err());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        assert_eq!(
            serde_json::to_value(RiskOutcome::Scored { score: 12.5 }).unwrap(),
            json!({"status": "scored", "score": 12.5})
        );
        assert_eq!(
            serde_json::to_value(RiskOutcome::Skipped).unwrap(),
            json!({"status": "skipped"})
        );
    }

    #[tokio::test]
    async fn http_scorer_posts_features_and_reads_probability() {
        let (endpoint, seen) =
            spawn_prediction_service(json!({"risk_score": 0.8123, "employee_leaving": "Yes"}))
                .await;
        let scorer = HttpRiskScorer::new(endpoint, Some(Duration::from_secs(5))).unwrap();
        let features = RiskFeatures::from_employee(&employee(), date(2025, 6, 15));

        let score = scorer.score(&features).await.unwrap();

        assert_eq!(score, 81.23);
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["Age"], 35);
        assert_eq!(body["Education"], 4);
        assert_eq!(body["Gender"], "Female");
    }

    #[tokio::test]
    async fn http_scorer_surfaces_service_errors() {
        let (endpoint, _) = spawn_prediction_service(json!({"error": "model not loaded"})).await;
        let scorer = HttpRiskScorer::new(endpoint, None).unwrap();
        let err = scorer.score(&RiskFeatures::default()).await.unwrap_err();
        assert!(matches!(err, HrError::ExternalService(msg) if msg == "model not loaded"));
    }

    #[tokio::test]
    async fn http_scorer_reports_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let scorer = HttpRiskScorer::new(format!("http://{addr}/predict"), None).unwrap();
        let err = scorer.score(&RiskFeatures::default()).await.unwrap_err();
        assert!(matches!(err, HrError::ExternalService(_)));
    }
}
