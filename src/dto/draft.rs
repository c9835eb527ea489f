use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{dao::models::DraftGameRow, dto::format_timestamp};

/// Drafts bigger than this (serialized) are refused.
const MAX_DRAFT_BYTES: usize = 16 * 1024;

/// Unsent setup form the client wants to keep between visits.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDraftRequest {
    /// Form content, stored as sent.
    #[schema(value_type = Object)]
    pub game_data: serde_json::Value,
}

impl Validate for SaveDraftRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !self.game_data.is_object() {
            let mut err = ValidationError::new("draft_shape");
            err.message = Some("Draft must be a JSON object".into());
            errors.add("game_data", err);
        } else if self.game_data.to_string().len() > MAX_DRAFT_BYTES {
            let mut err = ValidationError::new("draft_size");
            err.message = Some(format!("Draft must not exceed {MAX_DRAFT_BYTES} bytes").into());
            errors.add("game_data", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Saved setup form.
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftGameView {
    /// Form content as last saved.
    #[schema(value_type = Object)]
    pub game_data: serde_json::Value,
    /// RFC 3339 timestamp of the last save.
    pub last_updated: String,
}

impl From<DraftGameRow> for DraftGameView {
    fn from(row: DraftGameRow) -> Self {
        Self {
            game_data: row.game_data,
            last_updated: format_timestamp(row.last_updated),
        }
    }
}
