//! Upstream resource shapes
//!
//! Upstream identifiers arrive as JSON numbers on some endpoints and as
//! strings on others; both are normalized to `String` here.

use growteam_auth::Organisation;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        }
    }
}

/// Accept an identifier sent as a JSON string or number
pub fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub fn flexible_id_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct StaffProfile {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "firstName", alias = "first_name")]
    pub firstname: Option<String>,
    #[serde(default, alias = "lastName", alias = "last_name")]
    pub lastname: Option<String>,
    #[serde(default)]
    pub organisations: Vec<OrganisationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganisationRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<OrganisationRecord> for Organisation {
    fn from(record: OrganisationRecord) -> Self {
        Organisation {
            id: record.id,
            name: record.name.unwrap_or_default(),
        }
    }
}

/// `GET /v1/applicant`
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicantProfile {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "firstName", alias = "first_name")]
    pub firstname: Option<String>,
    #[serde(default, alias = "lastName", alias = "last_name")]
    pub lastname: Option<String>,
    #[serde(default, alias = "phone")]
    pub mobile: Option<String>,
    #[serde(default, rename = "linkedInUrl", alias = "linkedin_url", alias = "linkedinUrl")]
    pub linked_in_url: Option<String>,
}

/// Reference to another upstream record by id
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "firstName", alias = "first_name")]
    pub firstname: Option<String>,
    #[serde(default, alias = "lastName", alias = "last_name")]
    pub lastname: Option<String>,
}

/// `GET /v1/applicant/application/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "firstName", alias = "first_name")]
    pub firstname: Option<String>,
    #[serde(default, alias = "lastName", alias = "last_name")]
    pub lastname: Option<String>,
    #[serde(default, rename = "applicantId", alias = "applicant_id", deserialize_with = "flexible_id_opt")]
    pub applicant_id: Option<String>,
    #[serde(default, rename = "vacancyId", alias = "vacancy_id", deserialize_with = "flexible_id_opt")]
    pub vacancy_id: Option<String>,
    #[serde(default)]
    pub applicant: Option<RecordRef>,
    #[serde(default)]
    pub vacancy: Option<RecordRef>,
}

impl ApplicationRecord {
    pub fn applicant_id(&self) -> Option<&str> {
        self.applicant_id
            .as_deref()
            .or(self.applicant.as_ref().map(|a| a.id.as_str()))
    }

    pub fn vacancy_id(&self) -> Option<&str> {
        self.vacancy_id
            .as_deref()
            .or(self.vacancy.as_ref().map(|v| v.id.as_str()))
    }

    /// Email from the record itself, then from the embedded applicant
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.applicant.as_ref().and_then(|a| a.email.as_deref()))
            .filter(|e| !e.trim().is_empty())
    }

    pub fn firstname(&self) -> Option<&str> {
        self.firstname
            .as_deref()
            .or(self.applicant.as_ref().and_then(|a| a.firstname.as_deref()))
    }

    pub fn lastname(&self) -> Option<&str> {
        self.lastname
            .as_deref()
            .or(self.applicant.as_ref().and_then(|a| a.lastname.as_deref()))
    }
}
