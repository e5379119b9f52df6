//! Registration drafts: one explicit record per flow.
//!
//! Every text input is an `Option<String>` keyed in storage by its camelCase form name; the
//! matching field enums give the same name through `Display`/`FromStr` so the console and the
//! persisted JSON agree on one vocabulary.

use crate::error::AdmissionsError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

macro_rules! text_fields {
    (
        $(#[$meta:meta])*
        $record:ident, $field:ident {
            $( $name:ident => $variant:ident = $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $record {
            $(
                #[serde(rename = $wire, skip_serializing_if = "Option::is_none")]
                pub $name: Option<String>,
            )+
        }

        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
        )]
        pub enum $field {
            $( #[strum(serialize = $wire)] $variant, )+
        }

        impl $record {
            #[must_use]
            pub fn get(&self, field: $field) -> Option<&str> {
                match field {
                    $( $field::$variant => self.$name.as_deref(), )+
                }
            }

            pub fn slot_mut(&mut self, field: $field) -> &mut Option<String> {
                match field {
                    $( $field::$variant => &mut self.$name, )+
                }
            }
        }
    };
}

text_fields! {
    /// Personal, address, contact and schooling data shared by both flows.
    ProfileFields, ProfileField {
        first_name => FirstName = "firstName",
        first_name_amh => FirstNameAmh = "firstNameAMH",
        middle_name => MiddleName = "middleName",
        middle_name_amh => MiddleNameAmh = "middleNameAMH",
        last_name => LastName = "lastName",
        last_name_amh => LastNameAmh = "lastNameAMH",
        mother_name => MotherName = "motherName",
        mother_name_amh => MotherNameAmh = "motherNameAMH",
        sex => Sex = "sex",
        age => Age = "age",
        birth_day => BirthDay = "birthDay",
        birth_month => BirthMonth = "birthMonth",
        birth_year => BirthYear = "birthYear",
        marital_status => MaritalStatus = "maritalStatus",
        phone_number => PhoneNumber = "phoneNumber",
        email => Email = "email",
        impairment => Impairment = "impairment",
        birth_region => BirthRegion = "birthRegion",
        birth_zone => BirthZone = "birthZone",
        birth_woreda => BirthWoreda = "birthWoreda",
        current_region => CurrentRegion = "currentRegion",
        current_zone => CurrentZone = "currentZone",
        current_woreda => CurrentWoreda = "currentWoreda",
        kebele => Kebele = "kebele",
        house_number => HouseNumber = "houseNumber",
        contact_first_name => ContactFirstName = "contactFirstName",
        contact_last_name => ContactLastName = "contactLastName",
        contact_phone => ContactPhone = "contactPhone",
        contact_relation => ContactRelation = "contactRelation",
        school_background => SchoolBackground = "schoolBackground",
        school_name => SchoolName = "schoolName",
        grade12_result => Grade12Result = "grade12Result",
        national_exam_id => NationalExamId = "nationalExamId",
        department => Department = "department",
        program_modality => ProgramModality = "programModality",
    }
}

text_fields! {
    /// Account and enrollment data only the registrar enters.
    EnrollmentFields, EnrollmentField {
        username => Username = "username",
        password => Password = "password",
        student_status => StudentStatus = "studentStatus",
        bcys => Bcys = "bcys",
        enrolled_day => EnrolledDay = "enrolledDay",
        enrolled_month => EnrolledMonth = "enrolledMonth",
        enrolled_year => EnrolledYear = "enrolledYear",
        remark => Remark = "remark",
    }
}

/// A file picked by the operator, or one the backend already holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FileField {
    Local(LocalFile),
    Remote { url: String },
}

impl PartialEq for FileField {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Local(a), Self::Local(b)) => {
                a.path == b.path && a.file_name == b.file_name && a.content_type == b.content_type
            },
            (Self::Remote { url: a }, Self::Remote { url: b }) => a == b,
            _ => false,
        }
    }
}

impl Eq for FileField {}

impl FileField {
    #[must_use]
    pub const fn as_local(&self) -> Option<&LocalFile> {
        match self {
            Self::Local(file) => Some(file),
            Self::Remote { .. } => None,
        }
    }

    /// Session-only preview URI, or the remote URL itself.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::Local(file) => file.preview.as_deref(),
            Self::Remote { url } => Some(url),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
    /// Never persisted; re-issued when a draft is restored.
    #[serde(skip)]
    pub preview: Option<String>,
}

impl LocalFile {
    /// Describes a file on disk, guessing its content type from the extension.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
        let content_type = content_type_for(&path).to_owned();
        Self { path, file_name, content_type, preview: None }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        },
        _ => "application/octet-stream",
    }
}

/// The two file inputs of the wizard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum FileSlot {
    Photo,
    Document,
}

impl FileSlot {
    /// Multipart part name used on submission.
    #[must_use]
    pub const fn part_name(self) -> &'static str {
        match self {
            Self::Photo => campus_domain::constants::PHOTO_PART,
            Self::Document => campus_domain::constants::DOCUMENT_PART,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<FileField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<FileField>,
}

impl Attachments {
    #[must_use]
    pub const fn get(&self, slot: FileSlot) -> Option<&FileField> {
        match slot {
            FileSlot::Photo => self.photo.as_ref(),
            FileSlot::Document => self.document.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: FileSlot) -> &mut Option<FileField> {
        match slot {
            FileSlot::Photo => &mut self.photo,
            FileSlot::Document => &mut self.document,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FileField> {
        [self.photo.as_mut(), self.document.as_mut()].into_iter().flatten()
    }
}

/// Common surface of the per-flow draft records.
pub trait Draft:
    fmt::Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Text field identifier; its string form is the storage name.
    type Field: fmt::Debug
        + Copy
        + Eq
        + fmt::Display
        + FromStr
        + From<ProfileField>
        + Send
        + Sync
        + 'static;

    fn text(&self, field: Self::Field) -> Option<&str>;
    fn text_mut(&mut self, field: Self::Field) -> &mut Option<String>;
    fn profile(&self) -> &ProfileFields;
    fn attachments(&self) -> &Attachments;
    fn attachments_mut(&mut self) -> &mut Attachments;

    /// Resolves a field by its storage name.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::UnknownField`] when no field carries that name.
    fn field_named(name: &str) -> Result<Self::Field, AdmissionsError> {
        name.parse::<Self::Field>().map_err(|_| AdmissionsError::UnknownField {
            message: name.to_owned().into(),
            context: None,
        })
    }
}

/// Self-service applicant draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDraft {
    #[serde(flatten)]
    pub profile: ProfileFields,
    #[serde(flatten)]
    pub attachments: Attachments,
}

impl Draft for ApplicantDraft {
    type Field = ProfileField;

    fn text(&self, field: ProfileField) -> Option<&str> {
        self.profile.get(field)
    }

    fn text_mut(&mut self, field: ProfileField) -> &mut Option<String> {
        self.profile.slot_mut(field)
    }

    fn profile(&self) -> &ProfileFields {
        &self.profile
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }
}

/// Registrar-assisted draft: the applicant profile plus account and enrollment data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrarDraft {
    #[serde(flatten)]
    pub profile: ProfileFields,
    #[serde(flatten)]
    pub enrollment: EnrollmentFields,
    #[serde(flatten)]
    pub attachments: Attachments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrarField {
    Profile(ProfileField),
    Enrollment(EnrollmentField),
}

impl From<ProfileField> for RegistrarField {
    fn from(field: ProfileField) -> Self {
        Self::Profile(field)
    }
}

impl From<EnrollmentField> for RegistrarField {
    fn from(field: EnrollmentField) -> Self {
        Self::Enrollment(field)
    }
}

impl FromStr for RegistrarField {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileField::from_str(s)
            .map(Self::Profile)
            .or_else(|_| EnrollmentField::from_str(s).map(Self::Enrollment))
    }
}

impl fmt::Display for RegistrarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(field) => field.fmt(f),
            Self::Enrollment(field) => field.fmt(f),
        }
    }
}

impl Draft for RegistrarDraft {
    type Field = RegistrarField;

    fn text(&self, field: RegistrarField) -> Option<&str> {
        match field {
            RegistrarField::Profile(field) => self.profile.get(field),
            RegistrarField::Enrollment(field) => self.enrollment.get(field),
        }
    }

    fn text_mut(&mut self, field: RegistrarField) -> &mut Option<String> {
        match field {
            RegistrarField::Profile(field) => self.profile.slot_mut(field),
            RegistrarField::Enrollment(field) => self.enrollment.slot_mut(field),
        }
    }

    fn profile(&self) -> &ProfileFields {
        &self.profile
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn field_names_match_serialized_keys() {
        let mut draft = ApplicantDraft::default();
        for field in ProfileField::iter() {
            *draft.text_mut(field) = Some(field.to_string());
        }

        let value = serde_json::to_value(&draft).unwrap();
        for field in ProfileField::iter() {
            let name = field.to_string();
            assert_eq!(value[&name], json!(name), "{field:?}");
        }
    }

    #[test]
    fn registrar_fields_resolve_across_groups() {
        assert_eq!(
            RegistrarDraft::field_named("phoneNumber").unwrap(),
            RegistrarField::Profile(ProfileField::PhoneNumber)
        );
        assert_eq!(
            RegistrarDraft::field_named("bcys").unwrap(),
            RegistrarField::Enrollment(EnrollmentField::Bcys)
        );
        assert!(matches!(
            ApplicantDraft::field_named("password"),
            Err(AdmissionsError::UnknownField { .. })
        ));
    }

    #[test]
    fn drafts_tolerate_missing_and_unknown_keys() {
        let draft: RegistrarDraft =
            serde_json::from_value(json!({ "firstName": "Abebe", "legacyField": 1 })).unwrap();
        assert_eq!(draft.profile.first_name.as_deref(), Some("Abebe"));
        assert_eq!(draft.enrollment, EnrollmentFields::default());
    }

    #[test]
    fn previews_are_not_persisted() {
        let mut file = LocalFile::from_path("/tmp/Photo.JPG");
        file.preview = Some("preview://abc".to_owned());
        let draft = ApplicantDraft {
            attachments: Attachments { photo: Some(FileField::Local(file)), document: None },
            ..ApplicantDraft::default()
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value["photo"],
            json!({
                "kind": "local",
                "path": "/tmp/Photo.JPG",
                "fileName": "Photo.JPG",
                "contentType": "image/jpeg"
            })
        );

        let restored: ApplicantDraft = serde_json::from_value(value).unwrap();
        assert_eq!(restored, draft);
        assert!(restored.attachments.photo.as_ref().and_then(FileField::preview).is_none());
    }

    #[test]
    fn unknown_extensions_are_octet_streams() {
        assert_eq!(LocalFile::from_path("scan.tiff").content_type, "application/octet-stream");
        assert_eq!(LocalFile::from_path("transcript.pdf").content_type, "application/pdf");
    }
}
