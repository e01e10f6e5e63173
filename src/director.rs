/*!
 * Director: structured content planning on top of the text router.
 *
 * Every operation here sends a JSON-demanding prompt through the
 * [`TextRouter`] and then validates the shape of what came back. Models
 * routinely wrap arrays in an object key, so each operation accepts both
 * the bare shape and the wrapped one before rejecting a response.
 */

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DirectorError;
use crate::routing::text::TextRouter;

/// Scene durations above this are clamped at decode time
const MAX_SCENE_DURATION_SECS: f64 = 5.0;

/// Narration pace used to derive the word target from a duration
const WORDS_PER_MINUTE: f64 = 150.0;

/// Script configuration for a video
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScriptConfig {
    /// Description for the published video
    #[serde(default)]
    pub youtube_description: String,

    /// Full narration script for a single narrator
    pub audio_script: String,

    /// Relevant keywords for the video
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// One visual scene of the video
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Scene {
    /// Image generation prompt for this scene
    pub image_prompt: String,

    /// Scene duration in seconds, at most 5.0
    #[serde(deserialize_with = "deserialize_clamped_duration")]
    pub duration: f64,

    /// Part of the audio script this scene covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration_segment: Option<String>,

    /// Path of the generated image, filled in by the pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// Complete plan for one video, persisted as the render blueprint
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Blueprint {
    /// Video title
    pub title: String,

    /// Description for the published video
    pub description: String,

    /// Ordered visual scenes
    pub scenes: Vec<Scene>,
}

fn deserialize_clamped_duration<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.min(MAX_SCENE_DURATION_SECS))
}

/// Content planner driving all structured text operations
pub struct Director {
    /// Text router used for every operation
    text: TextRouter,
}

impl Director {
    /// Create a director over an already-built text router
    pub fn new(text: TextRouter) -> Self {
        Self { text }
    }

    /// Generate five candidate titles for a topic.
    ///
    /// Accepts either a bare JSON array or an object with a "titles" key;
    /// non-string entries are dropped. An empty result is an error.
    pub async fn generate_titles(&self, topic: &str) -> Result<Vec<String>, DirectorError> {
        let prompt = format!(
            "Generate 5 viral, click-worthy YouTube video titles for a video about \"{topic}\".\n\
             The titles should be catchy, use strong hooks, and appeal to a broad audience.\n\
             Return ONLY a JSON array of strings, like this:\n\
             [\"Title 1\", \"Title 2\", \"Title 3\", \"Title 4\", \"Title 5\"]"
        );

        let response = self.text.generate_json(&prompt).await?;

        let items = match response {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("titles") {
                Some(Value::Array(items)) => items,
                _ => return Err(DirectorError::EmptyTitles),
            },
            _ => return Err(DirectorError::EmptyTitles),
        };

        let titles: Vec<String> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(title) => Some(title),
                _ => None,
            })
            .collect();

        if titles.is_empty() {
            return Err(DirectorError::EmptyTitles);
        }

        Ok(titles)
    }

    /// Generate the script configuration for a titled video.
    ///
    /// When a target duration is given the prompt carries a word target at
    /// 150 words per minute; otherwise it just asks for a concise script.
    pub async fn generate_script_config(
        &self,
        title: &str,
        target_duration_secs: Option<u32>,
    ) -> Result<ScriptConfig, DirectorError> {
        let duration_line = match target_duration_secs {
            Some(secs) => {
                let words = ((f64::from(secs) / 60.0) * WORDS_PER_MINUTE).ceil() as u64;
                format!(
                    "The video should be approximately {secs} seconds long. \
                     At 150 words per minute, the script should be around {words} words."
                )
            }
            None => "The video should be concise and engaging.".to_string(),
        };

        let prompt = format!(
            "You are a YouTube content strategist. Create a configuration for a video about: \"{title}\".\n\
             {duration_line}\n\n\
             Return a JSON object with the following keys:\n\
             - \"youtube_description\": A catchy description for the video.\n\
             - \"audio_script\": The full, engaging narration script for the video. It should be written for a single narrator.\n\
             - \"keywords\": An array of 5-10 relevant keywords.\n\n\
             Ensure the \"audio_script\" is engaging, conversational, and fits the target duration."
        );

        let response = self.text.generate_json(&prompt).await?;
        info!("Script configuration generated for: {}", title);

        let config: ScriptConfig = serde_json::from_value(response)
            .map_err(|e| DirectorError::InvalidScriptConfig(e.to_string()))?;

        if config.audio_script.trim().is_empty() {
            return Err(DirectorError::InvalidScriptConfig(
                "audio_script is empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Break an audio script into visual scenes.
    ///
    /// Accepts either a bare JSON array or an object with a "scenes" key.
    /// Scene durations above five seconds are clamped during decoding.
    pub async fn generate_scenes(&self, audio_script: &str) -> Result<Vec<Scene>, DirectorError> {
        let prompt = format!(
            "You are a visual director. Based on the following audio script, break it down into a sequence of visual scenes.\n\n\
             Audio Script:\n\
             \"{audio_script}\"\n\n\
             Return a JSON array of objects, where each object represents a scene and has:\n\
             - \"image_prompt\": A detailed image generation prompt for this scene.\n\
             \x20 - **STYLE CONSTRAINT**: All images MUST be 2D or 2.5D vector art, flat design, or cel-shaded illustrations. NO photorealistic images. NO text in images.\n\
             \x20 - Describe the visual content clearly (characters, setting, action).\n\
             - \"duration\": The duration of this scene in seconds (maximum 5 seconds).\n\
             - \"narration_segment\": The part of the audio script that corresponds to this scene (optional, for reference).\n\n\
             Ensure the scenes cover the entire script flow. If a segment is long, break it into multiple scenes."
        );

        let response = self.text.generate_json(&prompt).await?;

        let items = match response {
            Value::Array(_) => response,
            Value::Object(mut map) => match map.remove("scenes") {
                Some(scenes @ Value::Array(_)) => scenes,
                _ => {
                    return Err(DirectorError::InvalidScenes(
                        "response is not a scene list".to_string(),
                    ));
                }
            },
            _ => {
                return Err(DirectorError::InvalidScenes(
                    "response is not a scene list".to_string(),
                ));
            }
        };

        let scenes: Vec<Scene> = serde_json::from_value(items)
            .map_err(|e| DirectorError::InvalidScenes(e.to_string()))?;

        if scenes.is_empty() {
            return Err(DirectorError::InvalidScenes(
                "scene list is empty".to_string(),
            ));
        }

        Ok(scenes)
    }
}
