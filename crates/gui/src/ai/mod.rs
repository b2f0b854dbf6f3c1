//! AI suggestion bridge
//!
//! Turns a free-text request into shape suggestions from a generative
//! model, then into ready-to-insert [`ShapeObject`]s. The network call sits
//! behind [`SuggestionBackend`]; parsing and defaulting are pure functions.

mod gemini;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use shared::{
    ShapeObject, ShapeType, SuggestedShape, Vec3, DEFAULT_COLOR, UNIT_SCALE, ZERO_ROTATION,
};
use thiserror::Error;

pub use gemini::{build_request_body, response_schema, GeminiBackend};

use crate::i18n::t;
use crate::state::scene::new_shape_id;

/// Failures of a suggestion request
#[derive(Error, Debug)]
pub enum AiError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Boxed future returned by a backend
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>>;

/// The seam to the external model: send an instruction, get raw text back
pub trait SuggestionBackend: Send + Sync {
    fn generate<'a>(&'a self, instruction: &'a str) -> GenerateFuture<'a>;
}

/// Fixed instruction wrapped around the user's request
pub fn build_instruction(prompt: &str) -> String {
    let kinds = ShapeType::AI_KINDS
        .iter()
        .map(|k| format!("'{}'", k.as_str()))
        .collect::<Vec<_>>()
        .join(" | ");
    format!(
        "Conçois un objet 3D simple pour l'impression 3D basé sur la demande suivante : \"{prompt}\".\n\
         Réponds uniquement par un tableau JSON d'objets contenant :\n\
         - type: {kinds}\n\
         - position: [x, y, z] (entre -10 et 10)\n\
         - scale: [x, y, z] (entre 0.5 et 5)\n\
         - color: code hexadécimal\n\
         - name: nom court descriptif\n\
         Assure-toi que les objets sont posés sur le plateau (y >= 0)."
    )
}

/// Ask the backend for suggestions.
///
/// Transport failures are errors; an unusable reply is not, it simply
/// yields no suggestions.
pub async fn suggest(
    backend: &dyn SuggestionBackend,
    prompt: &str,
) -> Result<Vec<SuggestedShape>, AiError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AiError::EmptyPrompt);
    }

    let instruction = build_instruction(prompt);
    let text = backend.generate(&instruction).await?;
    let suggestions = parse_suggestions(&text);
    tracing::info!("AI returned {} suggestion(s)", suggestions.len());
    Ok(suggestions)
}

/// Parse the model's reply. Never fails: anything that is not a JSON
/// array yields an empty list.
pub fn parse_suggestions(text: &str) -> Vec<SuggestedShape> {
    let body = strip_code_fence(text);
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Failed to parse AI response: {e}");
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        tracing::warn!("AI response is not a JSON array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let suggestion = suggestion_from_value(item);
            if suggestion.is_none() {
                tracing::warn!("Skipping non-object AI suggestion: {item}");
            }
            suggestion
        })
        .collect()
}

/// Turn suggestions into shapes with fresh ids and defaults for whatever
/// the model left out. `existing` is the current object count, used to
/// number fallback names.
pub fn materialize(suggestions: &[SuggestedShape], existing: usize) -> Vec<ShapeObject> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| ShapeObject {
            id: new_shape_id(),
            kind: s.kind.unwrap_or_default(),
            position: s.position.unwrap_or([0.0, 0.0, 0.0]),
            rotation: ZERO_ROTATION,
            scale: s.scale.unwrap_or(UNIT_SCALE),
            color: s.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            name: s
                .name
                .clone()
                .unwrap_or_else(|| format!("{} {}", t("ai.fallback_name"), existing + i + 1)),
        })
        .collect()
}

/// Remove a surrounding markdown code fence (```json ... ```), if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Field-by-field extraction so one malformed field does not discard the
/// others
fn suggestion_from_value(item: &Value) -> Option<SuggestedShape> {
    let obj = item.as_object()?;
    Some(SuggestedShape {
        kind: obj
            .get("type")
            .and_then(Value::as_str)
            .map(|s| ShapeType::from(s.to_string())),
        position: obj.get("position").and_then(vec3_from_value),
        scale: obj.get("scale").and_then(vec3_from_value),
        color: obj.get("color").and_then(Value::as_str).map(str::to_string),
        name: obj.get("name").and_then(Value::as_str).map(str::to_string),
    })
}

fn vec3_from_value(value: &Value) -> Option<Vec3> {
    let arr = value.as_array()?;
    if arr.len() < 3 {
        return None;
    }
    Some([arr[0].as_f64()?, arr[1].as_f64()?, arr[2].as_f64()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_array() {
        let text = r##"[{"type":"sphere","position":[0,1,0],"scale":[2,2,2],"color":"#ff0000","name":"Head"}]"##;
        let parsed = parse_suggestions(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, Some(ShapeType::Sphere));
        assert_eq!(parsed[0].position, Some([0.0, 1.0, 0.0]));
        assert_eq!(parsed[0].scale, Some([2.0, 2.0, 2.0]));
        assert_eq!(parsed[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(parsed[0].name.as_deref(), Some("Head"));
    }

    #[test]
    fn test_parse_invalid_json_is_empty() {
        assert!(parse_suggestions("not json").is_empty());
        assert!(parse_suggestions("").is_empty());
    }

    #[test]
    fn test_parse_non_array_is_empty() {
        assert!(parse_suggestions(r#"{"type":"box"}"#).is_empty());
        assert!(parse_suggestions("42").is_empty());
    }

    #[test]
    fn test_parse_code_fence() {
        let text = "```json\n[{\"type\":\"cone\"}]\n```";
        let parsed = parse_suggestions(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, Some(ShapeType::Cone));

        let bare = "```\n[]\n```";
        assert!(parse_suggestions(bare).is_empty());
    }

    #[test]
    fn test_parse_tolerates_bad_fields() {
        let text = r#"[{"type":"cylinder","position":"up","scale":[1,2],"name":7}, "junk"]"#;
        let parsed = parse_suggestions(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, Some(ShapeType::Cylinder));
        assert_eq!(parsed[0].position, None);
        assert_eq!(parsed[0].scale, None);
        assert_eq!(parsed[0].name, None);
    }

    #[test]
    fn test_parse_unknown_type_becomes_box() {
        let parsed = parse_suggestions(r#"[{"type":"teapot"}]"#);
        assert_eq!(parsed[0].kind, Some(ShapeType::Box));
    }

    #[test]
    fn test_materialize_defaults() {
        let shapes = materialize(&[SuggestedShape::default(), SuggestedShape::default()], 3);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].kind, ShapeType::Box);
        assert_eq!(shapes[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(shapes[0].rotation, [0.0, 0.0, 0.0]);
        assert_eq!(shapes[0].scale, [1.0, 1.0, 1.0]);
        assert_eq!(shapes[0].color, DEFAULT_COLOR);
        assert_eq!(shapes[0].name, "IA Object 4");
        assert_eq!(shapes[1].name, "IA Object 5");
        assert_ne!(shapes[0].id, shapes[1].id);
    }

    #[test]
    fn test_materialize_keeps_given_fields() {
        let suggestion = SuggestedShape {
            kind: Some(ShapeType::Torus),
            position: Some([1.0, 2.0, 3.0]),
            scale: Some([0.5, 0.5, 0.5]),
            color: Some("#00ff00".into()),
            name: Some("Ring".into()),
        };
        let shape = &materialize(&[suggestion], 0)[0];
        assert_eq!(shape.kind, ShapeType::Torus);
        assert_eq!(shape.position, [1.0, 2.0, 3.0]);
        assert_eq!(shape.scale, [0.5, 0.5, 0.5]);
        assert_eq!(shape.color, "#00ff00");
        assert_eq!(shape.name, "Ring");
    }

    #[test]
    fn test_instruction_mentions_prompt_and_constraints() {
        let text = build_instruction("a snowman");
        assert!(text.contains("\"a snowman\""));
        assert!(text.contains("y >= 0"));
        assert!(text.contains("'torusKnot'"));
        assert!(!text.contains("'star'"));
    }
}
