use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One person's HR record. Column and JSON names are lower-case without
/// separators, matching the hosted table the dashboard was built against.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "employeeid")]
    #[serde(rename = "employeeid")]
    pub employee_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(indexed)]
    pub department: String,
    pub position: String,
    #[sea_orm(column_name = "employmenttype")]
    #[serde(rename = "employmenttype")]
    pub employment_type: Option<EmploymentType>,
    #[sea_orm(column_name = "startdate")]
    #[serde(rename = "startdate")]
    pub start_date: Option<Date>,
    pub dob: Option<Date>,
    pub gender: Option<String>,
    pub manager: Option<String>,
    pub salary: Option<f64>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub certifications: Option<String>,
    #[sea_orm(column_name = "performancerating")]
    #[serde(rename = "performancerating")]
    pub performance_rating: Option<i32>,
    pub goals: Option<String>,
    pub location: Option<String>,
    #[sea_orm(column_name = "riskscore")]
    #[serde(rename = "riskscore")]
    pub risk_score: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Skills are stored as one comma-delimited string.
    pub fn skill_list(&self) -> Vec<&str> {
        self.skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}

#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum EmploymentType {
    #[sea_orm(string_value = "Full-time")]
    #[serde(rename = "Full-time")]
    FullTime,
    #[sea_orm(string_value = "Part-time")]
    #[serde(rename = "Part-time")]
    PartTime,
    #[sea_orm(string_value = "Contract")]
    #[serde(rename = "Contract")]
    Contract,
    #[sea_orm(string_value = "Intern")]
    #[serde(rename = "Intern")]
    Intern,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Intern,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Intern => "Intern",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmploymentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown employment type `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn employment_type_uses_display_labels_on_the_wire() {
        let encoded = serde_json::to_value(EmploymentType::PartTime).unwrap();
        assert_eq!(encoded, json!("Part-time"));
        let decoded: EmploymentType = serde_json::from_value(json!("Intern")).unwrap();
        assert_eq!(decoded, EmploymentType::Intern);
        assert!(serde_json::from_value::<EmploymentType>(json!("Temp")).is_err());
    }

    #[test]
    fn employment_type_labels_match_store_values() {
        for kind in EmploymentType::ALL {
            assert_eq!(kind.to_value(), kind.as_str());
        }
    }

    #[test]
    fn employment_type_parses_store_labels() {
        assert_eq!(
            "Part-time".parse::<EmploymentType>(),
            Ok(EmploymentType::PartTime)
        );
        assert_eq!(
            "Seasonal".parse::<EmploymentType>(),
            Err("unknown employment type `Seasonal`".to_string())
        );
    }

    #[test]
    fn skill_list_splits_and_trims() {
        let model = Model {
            employee_id: Uuid::nil(),
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            phone: None,
            department: "Engineering".into(),
            position: "Developer".into(),
            employment_type: None,
            start_date: None,
            dob: None,
            gender: None,
            manager: None,
            salary: None,
            skills: Some(" Rust, SQL ,, Kubernetes ".into()),
            education: None,
            certifications: None,
            performance_rating: None,
            goals: None,
            location: None,
            risk_score: None,
        };
        assert_eq!(model.skill_list(), vec!["Rust", "SQL", "Kubernetes"]);
    }
}
