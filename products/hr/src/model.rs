//! Typed request bodies for the employee endpoints.
//!
//! Create requires `name`, `email`, `department` and `position`; every other
//! column is optional. Patches leave absent fields untouched. Unknown JSON
//! fields are ignored because edit forms echo the whole record back.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use entity::employees::{self, EmploymentType};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::error::{HrError, HrResult};

const MAX_NAME: usize = 256;
const MAX_EMAIL: usize = 320;
const MAX_PHONE: usize = 64;
const MAX_TEXT: usize = 2048;

/// Optional columns shared by create and update.
///
/// Each field is tri-state: an absent key leaves the column alone, `null`
/// clears it, anything else writes it. Blank strings also clear, including
/// for dates and the employment type, because the edit form submits empty
/// inputs as `""`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EmployeeDetails {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(
        rename = "employmenttype",
        default,
        deserialize_with = "nullable_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub employment_type: Option<Option<EmploymentType>>,
    #[serde(
        rename = "startdate",
        default,
        deserialize_with = "nullable_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable_parsed", skip_serializing_if = "Option::is_none")]
    pub dob: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub manager: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub salary: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub skills: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub education: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Option<String>>,
    #[serde(
        rename = "performancerating",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub performance_rating: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub goals: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
}

impl EmployeeDetails {
    /// Writes every field present in `self`.
    fn write_present(self, active: &mut employees::ActiveModel) -> HrResult<()> {
        if let Some(phone) = self.phone {
            active.phone = Set(optional("phone", phone, MAX_PHONE)?);
        }
        if let Some(kind) = self.employment_type {
            active.employment_type = Set(kind);
        }
        if let Some(date) = self.start_date {
            active.start_date = Set(date);
        }
        if let Some(dob) = self.dob {
            active.dob = Set(dob);
        }
        if let Some(gender) = self.gender {
            active.gender = Set(optional("gender", gender, MAX_PHONE)?);
        }
        if let Some(manager) = self.manager {
            active.manager = Set(optional("manager", manager, MAX_NAME)?);
        }
        if let Some(salary) = self.salary {
            active.salary = Set(salary.map(validate_salary).transpose()?);
        }
        if let Some(skills) = self.skills {
            active.skills = Set(optional("skills", skills, MAX_TEXT)?);
        }
        if let Some(education) = self.education {
            active.education = Set(optional("education", education, MAX_TEXT)?);
        }
        if let Some(certifications) = self.certifications {
            active.certifications = Set(optional("certifications", certifications, MAX_TEXT)?);
        }
        if let Some(rating) = self.performance_rating {
            active.performance_rating = Set(rating.map(validate_rating).transpose()?);
        }
        if let Some(goals) = self.goals {
            active.goals = Set(optional("goals", goals, MAX_TEXT)?);
        }
        if let Some(location) = self.location {
            active.location = Set(optional("location", location, MAX_NAME)?);
        }
        Ok(())
    }
}

/// A present key always yields `Some`; `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Like [`nullable`] for string-encoded values, with blank strings read as `null`.
fn nullable_parsed<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?
        .as_deref()
        .map(str::trim)
    {
        None | Some("") => Ok(Some(None)),
        Some(raw) => raw
            .parse()
            .map(|value| Some(Some(value)))
            .map_err(de::Error::custom),
    }
}

/// Body of `POST /employees`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NewEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    #[serde(flatten)]
    pub details: EmployeeDetails,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            department: Some(department.into()),
            position: Some(position.into()),
            details: EmployeeDetails::default(),
        }
    }

    pub fn with_details(mut self, details: EmployeeDetails) -> Self {
        self.details = details;
        self
    }

    pub(crate) fn into_active_model(self, id: Uuid) -> HrResult<employees::ActiveModel> {
        let missing = [
            ("name", &self.name),
            ("email", &self.email),
            ("department", &self.department),
            ("position", &self.position),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value.as_deref()))
        .map(|(field, _)| field)
        .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(HrError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let mut active = employees::ActiveModel {
            employee_id: Set(id),
            name: Set(required("name", self.name, MAX_NAME)?),
            email: Set(validate_email(required("email", self.email, MAX_EMAIL)?)?),
            department: Set(required("department", self.department, MAX_NAME)?),
            position: Set(required("position", self.position, MAX_NAME)?),
            phone: Set(None),
            employment_type: Set(None),
            start_date: Set(None),
            dob: Set(None),
            gender: Set(None),
            manager: Set(None),
            salary: Set(None),
            skills: Set(None),
            education: Set(None),
            certifications: Set(None),
            performance_rating: Set(None),
            goals: Set(None),
            location: Set(None),
            risk_score: Set(None),
        };
        self.details.write_present(&mut active)?;
        Ok(active)
    }
}

/// Body of `PUT /employees/{id}`. The identifier comes from the path and the
/// risk score only changes through enrichment or the write-back endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    #[serde(flatten)]
    pub details: EmployeeDetails,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply(self, active: &mut employees::ActiveModel) -> HrResult<()> {
        if let Some(name) = self.name {
            active.name = Set(required("name", Some(name), MAX_NAME)?);
        }
        if let Some(email) = self.email {
            active.email = Set(validate_email(required("email", Some(email), MAX_EMAIL)?)?);
        }
        if let Some(department) = self.department {
            active.department = Set(required("department", Some(department), MAX_NAME)?);
        }
        if let Some(position) = self.position {
            active.position = Set(required("position", Some(position), MAX_NAME)?);
        }
        self.details.write_present(active)
    }
}

/// Body of the risk-score write-back.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct RiskScoreUpdate {
    #[serde(rename = "riskscore")]
    pub risk_score: f64,
}

/// Query string of `GET /employees`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmployeeFilter {
    pub q: Option<String>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    pub fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// `all` is what the dashboard's department picker sends for "no filter".
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("all"))
    }
}

pub(crate) fn validate_risk_score(score: f64) -> HrResult<f64> {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(HrError::validation(
            "riskscore must be between 0 and 100",
        ));
    }
    Ok(score)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn required(field: &str, value: Option<String>, max: usize) -> HrResult<String> {
    optional(field, value, max)?
        .ok_or_else(|| HrError::validation(format!("{field} cannot be empty")))
}

fn optional(field: &str, value: Option<String>, max: usize) -> HrResult<Option<String>> {
    let Some(trimmed) = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };
    validate_length(field, &trimmed, max)?;
    Ok(Some(trimmed))
}

fn validate_length(field: &str, value: &str, max: usize) -> HrResult<()> {
    if value.chars().count() > max {
        return Err(HrError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: String) -> HrResult<String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(HrError::validation(format!("{email} is not a valid email")));
    }
    Ok(email)
}

fn validate_rating(rating: i32) -> HrResult<i32> {
    if !(1..=5).contains(&rating) {
        return Err(HrError::validation(
            "performancerating must be between 1 and 5",
        ));
    }
    Ok(rating)
}

fn validate_salary(salary: f64) -> HrResult<f64> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(HrError::validation("salary must be a non-negative number"));
    }
    Ok(salary)
}
