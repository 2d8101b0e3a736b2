//! Request and response records for the REST endpoints
//!
//! Drafts use the form's camelCase field names; the endpoints take
//! snake_case columns. Projection renames keys, splits the enrollment
//! period into two dates and sends absent optionals as `null`.

use crate::state::{Activity, FieldValue, FormDraft, FormKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("Missing value for {0}")]
    Missing(&'static str),

    #[error("Unexpected value type for {0}")]
    WrongType(&'static str),
}

type Projected<T> = Result<T, ProjectionError>;

/// Text is sent trimmed, the same text the length rules counted
fn text(draft: &FormDraft, name: &'static str) -> Projected<String> {
    match draft.get(name) {
        Some(FieldValue::Text(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ProjectionError::WrongType(name)),
        None => Err(ProjectionError::Missing(name)),
    }
}

fn optional_text(draft: &FormDraft, name: &'static str) -> Projected<Option<String>> {
    match draft.get(name) {
        None => Ok(None),
        Some(_) => text(draft, name).map(Some),
    }
}

fn flag(draft: &FormDraft, name: &'static str) -> Projected<bool> {
    match draft.get(name) {
        Some(FieldValue::Flag(b)) => Ok(*b),
        Some(_) => Err(ProjectionError::WrongType(name)),
        None => Err(ProjectionError::Missing(name)),
    }
}

fn date(draft: &FormDraft, name: &'static str) -> Projected<NaiveDate> {
    match draft.get(name) {
        Some(FieldValue::Date(d)) => Ok(*d),
        Some(_) => Err(ProjectionError::WrongType(name)),
        None => Err(ProjectionError::Missing(name)),
    }
}

fn date_range(draft: &FormDraft, name: &'static str) -> Projected<(NaiveDate, NaiveDate)> {
    match draft.get(name) {
        Some(FieldValue::DateRange { start, end }) => Ok((*start, *end)),
        Some(_) => Err(ProjectionError::WrongType(name)),
        None => Err(ProjectionError::Missing(name)),
    }
}

fn list(draft: &FormDraft, name: &'static str) -> Projected<Vec<String>> {
    match draft.get(name) {
        Some(FieldValue::List(items)) => Ok(items.clone()),
        Some(_) => Err(ProjectionError::WrongType(name)),
        None => Ok(Vec::new()),
    }
}

fn activities(draft: &FormDraft, name: &'static str) -> Projected<Vec<Activity>> {
    match draft.get(name) {
        Some(FieldValue::Activities(items)) => Ok(items.clone()),
        Some(_) => Err(ProjectionError::WrongType(name)),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
fn put_text(draft: &mut FormDraft, name: &str, value: Option<String>) {
    if let Some(value) = value {
        draft.set(name, FieldValue::Text(value));
    }
}

/// `POST /rest/v1/clients`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub id_number: Option<String>,
    pub contact_number: String,
    pub alternative_contact: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub occupation: Option<String>,
    pub marital_status: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub emergency_contact_relation: String,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub current_medications: Option<String>,
    pub consent_to_contact: bool,
    pub consent_to_share_data: bool,
}

impl ClientRegistrationRequest {
    pub fn from_draft(draft: &FormDraft) -> Projected<Self> {
        Ok(Self {
            first_name: text(draft, "firstName")?,
            last_name: text(draft, "lastName")?,
            date_of_birth: date(draft, "dateOfBirth")?,
            gender: text(draft, "gender")?,
            id_number: optional_text(draft, "idNumber")?,
            contact_number: text(draft, "contactNumber")?,
            alternative_contact: optional_text(draft, "alternativeContact")?,
            email: optional_text(draft, "email")?,
            address: text(draft, "address")?,
            occupation: optional_text(draft, "occupation")?,
            marital_status: text(draft, "maritalStatus")?,
            emergency_contact_name: text(draft, "emergencyContactName")?,
            emergency_contact_number: text(draft, "emergencyContactNumber")?,
            emergency_contact_relation: text(draft, "emergencyContactRelation")?,
            allergies: optional_text(draft, "allergies")?,
            chronic_conditions: optional_text(draft, "chronicConditions")?,
            current_medications: optional_text(draft, "currentMedications")?,
            consent_to_contact: flag(draft, "consentToContact")?,
            consent_to_share_data: flag(draft, "consentToShareData")?,
        })
    }

    #[cfg(test)]
    pub fn into_draft(self) -> FormDraft {
        let mut draft = FormDraft::new()
            .with("firstName", FieldValue::Text(self.first_name))
            .with("lastName", FieldValue::Text(self.last_name))
            .with("dateOfBirth", FieldValue::Date(self.date_of_birth))
            .with("gender", FieldValue::Text(self.gender))
            .with("contactNumber", FieldValue::Text(self.contact_number))
            .with("address", FieldValue::Text(self.address))
            .with("maritalStatus", FieldValue::Text(self.marital_status))
            .with(
                "emergencyContactName",
                FieldValue::Text(self.emergency_contact_name),
            )
            .with(
                "emergencyContactNumber",
                FieldValue::Text(self.emergency_contact_number),
            )
            .with(
                "emergencyContactRelation",
                FieldValue::Text(self.emergency_contact_relation),
            )
            .with("consentToContact", FieldValue::Flag(self.consent_to_contact))
            .with(
                "consentToShareData",
                FieldValue::Flag(self.consent_to_share_data),
            );
        put_text(&mut draft, "idNumber", self.id_number);
        put_text(&mut draft, "alternativeContact", self.alternative_contact);
        put_text(&mut draft, "email", self.email);
        put_text(&mut draft, "occupation", self.occupation);
        put_text(&mut draft, "allergies", self.allergies);
        put_text(&mut draft, "chronicConditions", self.chronic_conditions);
        put_text(&mut draft, "currentMedications", self.current_medications);
        draft
    }
}

/// `POST /rest/v1/client_enrollments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnrollmentRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub referral_source: Option<String>,
    pub notes: Option<String>,
    pub consent_given: bool,
    pub enrollment_start_date: NaiveDate,
    pub enrollment_end_date: NaiveDate,
    pub programs: Vec<String>,
}

impl ClientEnrollmentRequest {
    pub fn from_draft(draft: &FormDraft) -> Projected<Self> {
        let (start, end) = date_range(draft, "enrollmentDate")?;
        Ok(Self {
            first_name: text(draft, "firstName")?,
            last_name: text(draft, "lastName")?,
            date_of_birth: date(draft, "dateOfBirth")?,
            gender: text(draft, "gender")?,
            contact_number: optional_text(draft, "contactNumber")?,
            address: optional_text(draft, "address")?,
            referral_source: optional_text(draft, "referralSource")?,
            notes: optional_text(draft, "notes")?,
            consent_given: flag(draft, "consentGiven")?,
            enrollment_start_date: start,
            enrollment_end_date: end,
            programs: list(draft, "programs")?,
        })
    }

    #[cfg(test)]
    pub fn into_draft(self) -> FormDraft {
        let mut draft = FormDraft::new()
            .with("firstName", FieldValue::Text(self.first_name))
            .with("lastName", FieldValue::Text(self.last_name))
            .with("dateOfBirth", FieldValue::Date(self.date_of_birth))
            .with("gender", FieldValue::Text(self.gender))
            .with("consentGiven", FieldValue::Flag(self.consent_given))
            .with(
                "enrollmentDate",
                FieldValue::DateRange {
                    start: self.enrollment_start_date,
                    end: self.enrollment_end_date,
                },
            )
            .with("programs", FieldValue::List(self.programs));
        put_text(&mut draft, "contactNumber", self.contact_number);
        put_text(&mut draft, "address", self.address);
        put_text(&mut draft, "referralSource", self.referral_source);
        put_text(&mut draft, "notes", self.notes);
        draft
    }
}

/// `POST /rest/v1/health_programs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthProgramRequest {
    pub title: String,
    pub disease_type: String,
    pub description: String,
    pub goal: String,
    pub objectives: Vec<String>,
    pub target_audience: String,
    pub activities: Vec<Activity>,
    pub partners: Option<Vec<String>>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl HealthProgramRequest {
    pub fn from_draft(draft: &FormDraft) -> Projected<Self> {
        let partners = list(draft, "partners")?;
        Ok(Self {
            title: text(draft, "title")?,
            disease_type: text(draft, "diseaseType")?,
            description: text(draft, "description")?,
            goal: text(draft, "goal")?,
            objectives: list(draft, "objectives")?,
            target_audience: text(draft, "targetAudience")?,
            activities: activities(draft, "activities")?,
            partners: (!partners.is_empty()).then_some(partners),
            start_date: date(draft, "startDate")?,
            end_date: date(draft, "endDate")?,
        })
    }

    #[cfg(test)]
    pub fn into_draft(self) -> FormDraft {
        FormDraft::new()
            .with("title", FieldValue::Text(self.title))
            .with("diseaseType", FieldValue::Text(self.disease_type))
            .with("description", FieldValue::Text(self.description))
            .with("goal", FieldValue::Text(self.goal))
            .with("objectives", FieldValue::List(self.objectives))
            .with("targetAudience", FieldValue::Text(self.target_audience))
            .with("activities", FieldValue::Activities(self.activities))
            .with(
                "partners",
                FieldValue::List(self.partners.unwrap_or_default()),
            )
            .with("startDate", FieldValue::Date(self.start_date))
            .with("endDate", FieldValue::Date(self.end_date))
    }
}

/// A projected draft, ready for its endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRequest {
    Registration(ClientRegistrationRequest),
    Enrollment(ClientEnrollmentRequest),
    HealthProgram(HealthProgramRequest),
}

impl SubmissionRequest {
    pub fn from_draft(kind: FormKind, draft: &FormDraft) -> Projected<Self> {
        Ok(match kind {
            FormKind::Registration => {
                Self::Registration(ClientRegistrationRequest::from_draft(draft)?)
            }
            FormKind::Enrollment => Self::Enrollment(ClientEnrollmentRequest::from_draft(draft)?),
            FormKind::HealthProgram => {
                Self::HealthProgram(HealthProgramRequest::from_draft(draft)?)
            }
        })
    }

    /// Reverse projection back to form field names
    #[cfg(test)]
    pub fn into_draft(self) -> FormDraft {
        match self {
            Self::Registration(r) => r.into_draft(),
            Self::Enrollment(r) => r.into_draft(),
            Self::HealthProgram(r) => r.into_draft(),
        }
    }
}

/// Error body returned by the endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

/// Row id as returned by the database: serial or uuid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A row of the `clients_search` view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ClientRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match on name, contact number or address
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.contact_number.as_deref(),
            self.address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|v| v.to_lowercase().contains(&query))
            || self.full_name().to_lowercase().contains(&query)
    }

    /// Display form of the record status
    pub fn status_label(&self) -> &'static str {
        match self.status.as_deref() {
            Some("active") => "Active",
            Some("inactive") => "Inactive",
            Some("pending") => "Pending",
            _ => "Unknown",
        }
    }

    /// Date part of the creation timestamp
    pub fn created_on(&self) -> Option<NaiveDate> {
        let created = self.created_at.as_deref()?;
        created.get(..10).and_then(crate::state::parse_date)
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        let dob = self.date_of_birth.as_deref()?;
        dob.get(..10).and_then(crate::state::parse_date)
    }
}
