//! Entry points that funnel URL input into [`Ingestor::ingest`](crate::ingest::Ingestor::ingest):
//! textarea submissions from the record-edit form, and direct API calls.

mod api;
mod form;

pub use api::{add_from_url, InputError, UrlInput};
pub use form::{
    parse_form_key, process_form, sanitize_field_name, split_urls, EditContext, FormOutcome,
    FormTarget, EDIT_FORM_NAME, FORM_KEY_PREFIX,
};
