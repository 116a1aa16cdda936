//! Project detail extraction step

use obc_providers::{PROJECT_LOCATION, StructuredModel, StructuredResponse, first_json_object};
use serde::Deserialize;

use crate::error::Result;
use crate::events::{TraceSender, WorkflowEvent};
use crate::prompts;
use crate::state::{ConversationState, UNKNOWN};

/// Extracted project details with `"unknown"` defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub project_type: String,
    pub city: String,
    pub geo_state: String,
}

impl Default for ProjectDetails {
    fn default() -> Self {
        Self {
            project_type: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            geo_state: UNKNOWN.to_string(),
        }
    }
}

/// Fill the project fields from the user input. Extraction never fails a
/// turn: on provider error or undecodable output the fields stay
/// `"unknown"`, which suppresses the search step downstream.
pub async fn run(
    model: &dyn StructuredModel,
    state: &mut ConversationState,
    trace: &TraceSender,
) -> Result<()> {
    let details = match model
        .invoke(prompts::EXTRACTOR_INSTRUCTION, &state.user_input, &PROJECT_LOCATION)
        .await
    {
        Ok(response) => decode(&response),
        Err(e) => {
            tracing::warn!("could not extract project details: {}", e);
            ProjectDetails::default()
        }
    };

    state.project_type = details.project_type;
    state.city = details.city;
    state.geo_state = details.geo_state;

    trace.emit(WorkflowEvent::DetailsExtracted {
        project_type: state.project_type.clone(),
        city: state.city.clone(),
        geo_state: state.geo_state.clone(),
    });
    Ok(())
}

/// The well-typed record shape: all three fields present as strings.
#[derive(Debug, Deserialize)]
struct TypedLocation {
    project_type: String,
    city: String,
    geo_state: String,
}

impl From<TypedLocation> for ProjectDetails {
    fn from(typed: TypedLocation) -> Self {
        Self {
            project_type: typed.project_type,
            city: typed.city,
            geo_state: typed.geo_state,
        }
    }
}

/// Decode a provider response into project details, in priority order:
/// a well-typed record, then a JSON object embedded in a text payload,
/// then a plain key-value mapping with per-field `"unknown"` defaults.
/// Anything else leaves every field `"unknown"`.
fn decode(response: &StructuredResponse) -> ProjectDetails {
    match response {
        StructuredResponse::Record(map) => {
            let value = serde_json::Value::Object(map.clone());
            match serde_json::from_value::<TypedLocation>(value) {
                Ok(typed) => typed.into(),
                Err(_) => from_mapping(map),
            }
        }
        StructuredResponse::Text(text) => first_json_object(text)
            .and_then(|object| serde_json::from_str::<TypedLocation>(object).ok())
            .map(Into::into)
            .unwrap_or_default(),
    }
}

/// Field-wise lookup over a partial mapping.
fn from_mapping(map: &serde_json::Map<String, serde_json::Value>) -> ProjectDetails {
    let field = |name: &str| {
        map.get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };
    ProjectDetails {
        project_type: field("project_type"),
        city: field("city"),
        geo_state: field("geo_state"),
    }
}
