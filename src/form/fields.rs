//! Form field collection and validation.
//!
//! # Responsibilities
//! - Map the form-type tag to a submission category and subject line
//! - Check the email field shape
//! - Inject the derived fields the backend files submissions by

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Flat field-name → value map, as collected from a form.
pub type Fields = BTreeMap<String, String>;

/// Injected human-readable subject line.
pub const SUBJECT_FIELD: &str = "_subject";
/// Injected form-type tag.
pub const FORM_TYPE_FIELD: &str = "formType";
/// Injected sheet / category identifier.
pub const SHEET_FIELD: &str = "sheet";
/// Injected path of the page the form was sent from.
pub const PAGE_FIELD: &str = "page";
/// Optional field checked for email shape.
pub const EMAIL_FIELD: &str = "email";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// Submission category, derived from the form's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Business staffing request.
    Business,
    /// Courier registration.
    Courier,
    /// Driver registration; the fallback for any other tag.
    Driver,
}

impl FormKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "bedrift" => FormKind::Business,
            "courier" => FormKind::Courier,
            _ => FormKind::Driver,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormKind::Business => "Bedrift-forespørsel",
            FormKind::Courier => "Courier-registrering",
            FormKind::Driver => "Sjåfør-registrering",
        }
    }

    /// Subject line shown in the backend's inbox.
    pub fn subject(self) -> String {
        format!("veikraft — {}", self.label())
    }
}

/// Input problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Ugyldig e-postadresse.")]
    InvalidEmail,

    #[error("Skjemaet mangler kategori.")]
    MissingCategory,
}

/// `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate collected fields and add the derived ones.
pub fn prepare_submission(
    fields: &Fields,
    form_type: &str,
    page_path: &str,
) -> Result<Fields, FormError> {
    let form_type = form_type.trim();
    if form_type.is_empty() {
        return Err(FormError::MissingCategory);
    }

    if let Some(email) = fields.get(EMAIL_FIELD).filter(|e| !e.is_empty()) {
        if !validate_email(email) {
            return Err(FormError::InvalidEmail);
        }
    }

    let kind = FormKind::from_tag(form_type);
    let mut payload = fields.clone();
    payload.insert(SUBJECT_FIELD.to_string(), kind.subject());
    payload.insert(FORM_TYPE_FIELD.to_string(), form_type.to_string());
    payload.insert(SHEET_FIELD.to_string(), form_type.to_string());
    payload.insert(PAGE_FIELD.to_string(), page_path.to_string());
    Ok(payload)
}
