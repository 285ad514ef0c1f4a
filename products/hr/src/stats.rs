//! Read-only aggregates behind the dashboard overview.

use std::collections::BTreeMap;

use entity::employees;
use serde::Serialize;
use uuid::Uuid;

const TOP_RISK_LIMIT: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Unscored,
}

impl RiskLevel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => RiskLevel::Unscored,
            Some(s) if s > 80.0 => RiskLevel::Critical,
            Some(s) if s > 60.0 => RiskLevel::High,
            Some(s) if s > 40.0 => RiskLevel::Medium,
            Some(_) => RiskLevel::Low,
        }
    }

    /// Critical and high both count as "high risk" on the overview cards.
    pub fn is_high_risk(self) -> bool {
        matches!(self, RiskLevel::Critical | RiskLevel::High)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RiskLevelCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unscored: usize,
}

impl RiskLevelCounts {
    fn bump(&mut self, level: RiskLevel) {
        let slot = match level {
            RiskLevel::Critical => &mut self.critical,
            RiskLevel::High => &mut self.high,
            RiskLevel::Medium => &mut self.medium,
            RiskLevel::Low => &mut self.low,
            RiskLevel::Unscored => &mut self.unscored,
        };
        *slot += 1;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub headcount: usize,
    pub average_risk_score: Option<f64>,
    pub high_risk: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskHighlight {
    #[serde(rename = "employeeid")]
    pub employee_id: Uuid,
    pub name: String,
    pub department: String,
    pub position: String,
    #[serde(rename = "riskscore")]
    pub risk_score: f64,
    pub level: RiskLevel,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub scored_employees: usize,
    pub average_risk_score: Option<f64>,
    pub high_risk_employees: usize,
    pub risk_levels: RiskLevelCounts,
    pub departments: Vec<DepartmentSummary>,
    pub top_risk: Vec<RiskHighlight>,
}

#[derive(Default)]
struct Accumulator {
    headcount: usize,
    scored: usize,
    score_sum: f64,
    high_risk: usize,
}

impl Accumulator {
    fn add(&mut self, score: Option<f64>) {
        self.headcount += 1;
        if let Some(score) = score {
            self.scored += 1;
            self.score_sum += score;
        }
        if RiskLevel::from_score(score).is_high_risk() {
            self.high_risk += 1;
        }
    }

    fn average(&self) -> Option<f64> {
        (self.scored > 0).then(|| round2(self.score_sum / self.scored as f64))
    }
}

impl DashboardSummary {
    pub fn from_employees(records: &[employees::Model]) -> Self {
        let mut overall = Accumulator::default();
        let mut levels = RiskLevelCounts::default();
        let mut by_department: BTreeMap<&str, Accumulator> = BTreeMap::new();

        for record in records {
            overall.add(record.risk_score);
            levels.bump(RiskLevel::from_score(record.risk_score));
            by_department
                .entry(record.department.as_str())
                .or_default()
                .add(record.risk_score);
        }

        let mut departments = by_department
            .into_iter()
            .map(|(department, acc)| DepartmentSummary {
                department: department.to_string(),
                headcount: acc.headcount,
                average_risk_score: acc.average(),
                high_risk: acc.high_risk,
            })
            .collect::<Vec<_>>();
        // BTreeMap already ordered names; a stable sort keeps that as the tiebreak.
        departments.sort_by(|a, b| b.headcount.cmp(&a.headcount));

        let mut scored = records
            .iter()
            .filter_map(|r| r.risk_score.map(|score| (r, score)))
            .collect::<Vec<_>>();
        scored.sort_by(|(a, sa), (b, sb)| sb.total_cmp(sa).then_with(|| a.name.cmp(&b.name)));
        let top_risk = scored
            .into_iter()
            .take(TOP_RISK_LIMIT)
            .map(|(r, score)| RiskHighlight {
                employee_id: r.employee_id,
                name: r.name.clone(),
                department: r.department.clone(),
                position: r.position.clone(),
                risk_score: score,
                level: RiskLevel::from_score(Some(score)),
            })
            .collect();

        Self {
            total_employees: overall.headcount,
            scored_employees: overall.scored,
            average_risk_score: overall.average(),
            high_risk_employees: overall.high_risk,
            risk_levels: levels,
            departments,
            top_risk,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, department: &str, score: Option<f64>) -> employees::Model {
        employees::Model {
            employee_id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            department: department.into(),
            position: "Staff".into(),
            employment_type: None,
            start_date: None,
            dob: None,
            gender: None,
            manager: None,
            salary: None,
            skills: None,
            education: None,
            certifications: None,
            performance_rating: None,
            goals: None,
            location: None,
            risk_score: score,
        }
    }

    #[test]
    fn bands_follow_profile_thresholds() {
        assert_eq!(RiskLevel::from_score(Some(92.0)), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(Some(80.0)), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(Some(60.5)), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(Some(45.0)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(Some(40.0)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(None), RiskLevel::Unscored);
    }

    #[test]
    fn summary_aggregates_overall_and_per_department() {
        let records = vec![
            record("Jane Miller", "Engineering", Some(92.0)),
            record("Michael Chen", "Engineering", Some(28.0)),
            record("Tom Smith", "Sales", Some(87.0)),
            record("Emily Davis", "Product", None),
            record("Alex Johnson", "Engineering", Some(45.0)),
        ];
        let summary = DashboardSummary::from_employees(&records);

        assert_eq!(summary.total_employees, 5);
        assert_eq!(summary.scored_employees, 4);
        assert_eq!(summary.average_risk_score, Some(63.0));
        assert_eq!(summary.high_risk_employees, 2);
        assert_eq!(
            summary.risk_levels,
            RiskLevelCounts {
                critical: 2,
                high: 0,
                medium: 1,
                low: 1,
                unscored: 1,
            }
        );

        let names = summary
            .departments
            .iter()
            .map(|d| d.department.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Engineering", "Product", "Sales"]);
        let engineering = &summary.departments[0];
        assert_eq!(engineering.headcount, 3);
        assert_eq!(engineering.average_risk_score, Some(55.0));
        assert_eq!(engineering.high_risk, 1);
        assert_eq!(summary.departments[1].average_risk_score, None);

        let top = summary
            .top_risk
            .iter()
            .map(|h| h.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(top, vec!["Jane Miller", "Tom Smith", "Alex Johnson", "Michael Chen"]);
    }

    #[test]
    fn empty_store_has_no_averages() {
        let summary = DashboardSummary::from_employees(&[]);
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.average_risk_score, None);
        assert!(summary.departments.is_empty());
        assert!(summary.top_risk.is_empty());
    }
}
