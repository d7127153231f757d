//! The upload → preview → analyze → results cycle.

use crate::analysis::{encode_data_uri, PredictionResult};
use crate::error::{RequestError, UploadError};
use crate::{PredictRequest, ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Upload,
    Preview,
    Loading,
    Results,
}

pub fn is_accepted_type(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
}

/// The two acceptance predicates: declared type and size. Content is not
/// sniffed here.
pub fn validate(mime_type: &str, size: u64) -> Result<(), UploadError> {
    if !is_accepted_type(mime_type) {
        return Err(UploadError::UnsupportedType(mime_type.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(size));
    }
    Ok(())
}

/// An image the user picked. Only constructible once it has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let mime_type = mime_type.into();
        validate(&mime_type, bytes.len() as u64)?;
        Ok(Self {
            name: name.into(),
            mime_type,
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size_text(&self) -> String {
        format_size(self.size())
    }

    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.mime_type, &self.bytes)
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{} B", bytes)
    } else if bytes_f < KB * KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{:.1} MB", bytes_f / (KB * KB))
    }
}

/// Owns the view state, the selected file and the latest result.
#[derive(Debug, Default)]
pub struct UploadController {
    view: ViewState,
    selected: Option<SelectedFile>,
    result: Option<PredictionResult>,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// Validates and accepts a candidate file in one step. On rejection the
    /// controller is left untouched.
    pub fn offer(&mut self, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<(), UploadError> {
        let file = SelectedFile::new(name, mime_type, bytes)?;
        self.select(file)
    }

    /// Replaces the selection and moves to `Preview`. Refused while a
    /// request is outstanding.
    pub fn select(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        if self.view == ViewState::Loading {
            return Err(UploadError::Busy);
        }
        log::debug!("selected {} ({} bytes)", file.name(), file.size());
        self.selected = Some(file);
        self.result = None;
        self.view = ViewState::Preview;
        Ok(())
    }

    /// Moves `Preview` to `Loading` and hands back the request to send.
    pub fn begin_analysis(&mut self) -> Result<PredictRequest, UploadError> {
        let file = self.selected.as_ref().ok_or(UploadError::EmptySelection)?;
        if self.view != ViewState::Preview {
            return Err(UploadError::Busy);
        }
        let request = PredictRequest {
            image: file.to_data_uri(),
        };
        self.view = ViewState::Loading;
        Ok(request)
    }

    /// Applies the outcome of the request started by `begin_analysis`.
    ///
    /// Success stores the result and moves to `Results`; failure resets to
    /// `Upload` and hands the error back for the caller to report. Returns
    /// `Ok(None)` when no request is outstanding, so a late reply is dropped.
    pub fn complete_analysis(
        &mut self,
        outcome: Result<PredictionResult, RequestError>,
    ) -> Result<Option<&PredictionResult>, RequestError> {
        if self.view != ViewState::Loading {
            log::warn!("dropping analysis reply received in {:?}", self.view);
            return Ok(None);
        }
        match outcome {
            Ok(result) => {
                self.view = ViewState::Results;
                Ok(Some(&*self.result.insert(result)))
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.view = ViewState::Upload;
        self.selected = None;
        self.result = None;
    }
}
