//! HR vertical slice: the employee data-access contract, request schemas,
//! risk-score enrichment and dashboard aggregates.

pub mod error;
pub mod model;
pub mod repo;
pub mod risk;
pub mod seed;
pub mod stats;

pub use entity::employees::{self, EmploymentType};
pub use error::{HrError, HrResult};
pub use model::{EmployeeFilter, EmployeePatch, NewEmployee, RiskScoreUpdate};
pub use repo::EmployeeRepo;
pub use risk::{HttpRiskScorer, RiskFeatures, RiskOutcome, RiskScorer, enrich};
pub use stats::{DashboardSummary, RiskLevel};
