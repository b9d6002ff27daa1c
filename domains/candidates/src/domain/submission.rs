//! Resume submission form
//!
//! The browser's multipart parts are kept in order and forwarded unchanged;
//! only the fields needed for validation are pulled out.

use bytes::Bytes;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use validator::{Validate, ValidationError, ValidationErrors};

use super::error::ProxyError;

lazy_static::lazy_static! {
    static ref LINKEDIN_URL: Regex =
        Regex::new(r"(?i)^https?://([a-z0-9-]+\.)*linkedin\.com(:\d+)?(/\S*)?$").unwrap();
}

pub const LINKEDIN_FIELD: &str = "linkedInUrl";
pub const POSITION_FIELDS: [&str; 2] = ["vacancyId", "positionId"];

/// One multipart part as received
#[derive(Debug, Clone)]
pub enum SubmissionPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Bytes,
    },
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_sources"))]
pub struct Submission {
    parts: Vec<SubmissionPart>,
    #[validate(custom(
        function = "validate_linkedin_url",
        message = "Must be an http(s) linkedin.com URL"
    ))]
    linked_in_url: Option<String>,
    has_resume: bool,
    #[validate(required(message = "A vacancyId or positionId is required"))]
    position_id: Option<String>,
}

fn validate_linkedin_url(url: &str) -> Result<(), ValidationError> {
    if LINKEDIN_URL.is_match(url) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_linkedin_url"))
    }
}

fn validate_sources(submission: &Submission) -> Result<(), ValidationError> {
    if !submission.has_resume && submission.linked_in_url.is_none() {
        return Err(ValidationError::new("resume_or_linkedin_required")
            .with_message("A resume file or LinkedIn URL is required".into()));
    }
    Ok(())
}

impl Submission {
    pub fn from_parts(parts: Vec<SubmissionPart>) -> Self {
        let mut linked_in_url = None;
        let mut position_id = None;
        let mut has_resume = false;

        for part in &parts {
            match part {
                SubmissionPart::Text { name, value } => {
                    let value = value.trim();
                    if value.is_empty() {
                        continue;
                    }
                    if name == LINKEDIN_FIELD {
                        linked_in_url = Some(value.to_string());
                    } else if POSITION_FIELDS.contains(&name.as_str()) && position_id.is_none() {
                        position_id = Some(value.to_string());
                    }
                }
                SubmissionPart::File { bytes, .. } => has_resume |= !bytes.is_empty(),
            }
        }

        Self {
            parts,
            linked_in_url,
            has_resume,
            position_id,
        }
    }

    pub fn position_id(&self) -> Option<&str> {
        self.position_id.as_deref()
    }

    pub fn has_resume(&self) -> bool {
        self.has_resume
    }

    /// Validate, reporting the first problem under its form field name
    pub fn check(&self) -> Result<(), ProxyError> {
        self.validate().map_err(|errors| first_error(&errors))
    }

    /// Rebuild the same parts as an outgoing multipart body
    pub fn into_form(self) -> Form {
        self.parts.into_iter().fold(Form::new(), |form, part| match part {
            SubmissionPart::Text { name, value } => form.text(name, value),
            SubmissionPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => form.part(name, file_part(file_name, content_type, bytes)),
        })
    }
}

fn file_part(file_name: Option<String>, content_type: Option<String>, bytes: Bytes) -> Part {
    let build = || {
        let part = Part::bytes(bytes.to_vec());
        match &file_name {
            Some(name) => part.file_name(name.clone()),
            None => part,
        }
    };

    match content_type {
        Some(mime) => build().mime_str(&mime).unwrap_or_else(|_| build()),
        None => build(),
    }
}

fn first_error(errors: &ValidationErrors) -> ProxyError {
    let fields = errors.field_errors();
    let order = [
        ("linked_in_url", LINKEDIN_FIELD),
        ("position_id", POSITION_FIELDS[0]),
        ("__all__", "resume"),
    ];

    for (key, field) in order {
        if let Some(error) = fields.get(key).and_then(|errs| errs.first()) {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            return ProxyError::Validation {
                field: field.to_string(),
                message,
            };
        }
    }

    ProxyError::Validation {
        field: "form".to_string(),
        message: errors.to_string(),
    }
}
