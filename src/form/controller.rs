//! Submit flow of a single modal form.

use std::ops::Deref;

use crate::form::client::{FormClient, SubmitOutcome};
use crate::form::fields::{prepare_submission, FormError, Fields};

/// The submit button: disabled with a loading indicator while in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitControl {
    disabled: bool,
    loading: bool,
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Disable the control until the returned guard is dropped.
    pub fn begin(&mut self) -> InFlight<'_> {
        self.disabled = true;
        self.loading = true;
        InFlight { control: self }
    }
}

/// Held for the duration of a request; re-enables the control on drop,
/// whichever way the request ended.
#[derive(Debug)]
pub struct InFlight<'a> {
    control: &'a mut SubmitControl,
}

impl Deref for InFlight<'_> {
    type Target = SubmitControl;

    fn deref(&self) -> &SubmitControl {
        self.control
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.control.disabled = false;
        self.control.loading = false;
    }
}

/// Inline status line under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub success: bool,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// One form on the page: its values, submit control and message line.
#[derive(Debug, Clone)]
pub struct FormController {
    form_type: String,
    page_path: String,
    fields: Fields,
    control: SubmitControl,
    message: Option<StatusMessage>,
}

impl FormController {
    pub fn new(form_type: impl Into<String>, page_path: impl Into<String>) -> Self {
        Self {
            form_type: form_type.into(),
            page_path: page_path.into(),
            fields: Fields::new(),
            control: SubmitControl::default(),
            message: None,
        }
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Clear every entered value.
    pub fn reset(&mut self) {
        self.fields.clear();
    }

    /// Validate, send and report. Input errors leave the form editable and
    /// send nothing; on success the form is cleared.
    pub async fn submit(&mut self, client: &FormClient) -> Result<SubmitOutcome, FormError> {
        let payload = match prepare_submission(&self.fields, &self.form_type, &self.page_path) {
            Ok(payload) => payload,
            Err(e) => {
                self.message = Some(StatusMessage::failure(e.to_string()));
                return Err(e);
            }
        };

        let outcome = {
            let _in_flight = self.control.begin();
            self.message = Some(StatusMessage::success(""));
            client.send(&payload).await
        };

        if outcome.is_success() {
            self.reset();
            self.message = Some(StatusMessage::success(outcome.message()));
        } else {
            self.message = Some(StatusMessage::failure(outcome.message()));
        }

        Ok(outcome)
    }
}
