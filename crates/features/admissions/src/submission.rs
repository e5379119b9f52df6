//! Maps a draft onto the backend's registration payload.
//!
//! The payload travels as `multipart/form-data`: one `data` part with the JSON object and one
//! part per locally picked file. Blank inputs never reach the wire.

use crate::draft::{Attachments, EnrollmentFields, FileField, FileSlot, ProfileFields};
use crate::error::{AdmissionsError, AdmissionsErrorExt};
use campus_domain::vocabulary::{MaritalStatus, Sex};
use serde_json::{Map, Value};
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// A file part of the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub part: &'static str,
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPayload {
    pub data: Map<String, Value>,
    pub files: Vec<Attachment>,
}

impl SubmissionPayload {
    /// The body of the `data` part.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Serialization`] if the object cannot be encoded.
    pub fn data_json(&self) -> Result<String, AdmissionsError> {
        serde_json::to_string(&self.data).context("Failed to encode registration payload")
    }
}

/// What the backend answered to an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub status: u16,
    /// Response body, `Value::Null` when it was empty or not JSON.
    pub body: Value,
}

/// Port to the registration endpoints.
pub trait SubmissionSink: Send + Sync + 'static {
    /// Sends the payload. Non-success statuses are returned as [`AdmissionsError::Rejected`].
    fn submit(
        &self,
        endpoint: &str,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<SubmissionReceipt, AdmissionsError>> + Send;
}

/// Accumulates the JSON object, dropping every value that is blank or fails conversion.
#[derive(Debug, Default)]
pub struct PayloadBuilder {
    data: Map<String, Value>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl PayloadBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed text.
    pub fn text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = present(value) {
            self.data.insert(key.to_owned(), Value::from(v));
        }
        self
    }

    /// Sent exactly as typed, provided it is not blank.
    pub fn verbatim(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.data.insert(key.to_owned(), Value::from(v));
        }
        self
    }

    /// Whole-string integer parse: `"12abc"` is dropped rather than truncated.
    pub fn integer(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(n) = present(value).and_then(|v| v.parse::<i64>().ok()) {
            self.data.insert(key.to_owned(), Value::from(n));
        }
        self
    }

    /// A UI label translated to the backend vocabulary. Unknown labels are dropped.
    pub fn vocabulary<T: FromStr>(
        &mut self,
        key: &str,
        value: Option<&str>,
        upstream: impl Fn(T) -> &'static str,
    ) -> &mut Self {
        if let Some(term) = present(value).and_then(|v| T::from_str(v).ok()) {
            self.data.insert(key.to_owned(), Value::from(upstream(term)));
        }
        self
    }

    /// `YYYY-MM-DD`, only when day, month and year are all numeric.
    pub fn date(
        &mut self,
        key: &str,
        day: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
    ) -> &mut Self {
        let part = |v: Option<&str>| present(v).and_then(|v| v.parse::<u32>().ok());
        if let (Some(d), Some(m), Some(y)) = (part(day), part(month), part(year)) {
            self.data.insert(key.to_owned(), Value::from(format!("{y:04}-{m:02}-{d:02}")));
        }
        self
    }

    #[must_use]
    pub fn finish(self) -> Map<String, Value> {
        self.data
    }
}

/// Writes the fields both flows share.
pub fn map_profile(out: &mut PayloadBuilder, p: &ProfileFields) {
    let s = Option::<String>::as_deref;
    out.text("firstNameENG", s(&p.first_name))
        .text("firstNameAMH", s(&p.first_name_amh))
        .text("fatherNameENG", s(&p.middle_name))
        .text("fatherNameAMH", s(&p.middle_name_amh))
        .text("grandfatherNameENG", s(&p.last_name))
        .text("grandfatherNameAMH", s(&p.last_name_amh))
        .text("motherNameENG", s(&p.mother_name))
        .text("motherNameAMH", s(&p.mother_name_amh))
        .vocabulary("gender", s(&p.sex), Sex::upstream)
        .integer("age", s(&p.age))
        .date("dateOfBirthEC", s(&p.birth_day), s(&p.birth_month), s(&p.birth_year))
        .vocabulary("maritalStatus", s(&p.marital_status), MaritalStatus::upstream)
        .text("phoneNumber", s(&p.phone_number))
        .text("email", s(&p.email))
        .text("impairmentCode", s(&p.impairment))
        .text("placeOfBirthRegionCode", s(&p.birth_region))
        .text("placeOfBirthZoneCode", s(&p.birth_zone))
        .text("placeOfBirthWoredaCode", s(&p.birth_woreda))
        .text("currentAddressRegionCode", s(&p.current_region))
        .text("currentAddressZoneCode", s(&p.current_zone))
        .text("currentAddressWoredaCode", s(&p.current_woreda))
        .text("currentAddressKebele", s(&p.kebele))
        .text("currentAddressHouseNumber", s(&p.house_number))
        .text("contactPersonFirstNameENG", s(&p.contact_first_name))
        .text("contactPersonLastNameENG", s(&p.contact_last_name))
        .text("contactPersonPhoneNumber", s(&p.contact_phone))
        .text("contactPersonRelation", s(&p.contact_relation))
        .integer("schoolBackgroundId", s(&p.school_background))
        .text("schoolName", s(&p.school_name))
        .integer("grade12Result", s(&p.grade12_result))
        .text("nationalExamId", s(&p.national_exam_id))
        .integer("departmentEnrolledId", s(&p.department))
        .text("programModalityCode", s(&p.program_modality));
}

/// Writes the registrar-only account and enrollment fields.
pub fn map_enrollment(out: &mut PayloadBuilder, e: &EnrollmentFields) {
    let s = Option::<String>::as_deref;
    out.text("username", s(&e.username))
        .verbatim("password", s(&e.password))
        .integer("studentRecentStatusId", s(&e.student_status))
        .integer("batchClassYearSemesterId", s(&e.bcys))
        .date("dateEnrolledGC", s(&e.enrolled_day), s(&e.enrolled_month), s(&e.enrolled_year))
        .text("remark", s(&e.remark));
}

/// File parts for locally picked files. Remote references are already on the server.
#[must_use]
pub fn file_parts(attachments: &Attachments) -> Vec<Attachment> {
    FileSlot::iter()
        .filter_map(|slot| match attachments.get(slot)? {
            FileField::Local(file) => Some(Attachment {
                part: slot.part_name(),
                path: file.path.clone(),
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
            }),
            FileField::Remote { .. } => None,
        })
        .collect()
}
