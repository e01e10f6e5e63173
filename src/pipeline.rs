/*!
 * Pipeline coordinator: runs the full topic-to-video flow for one job.
 *
 * Stages run in a fixed order with a per-stage failure policy. Fatal stages
 * (script configuration, scene breakdown, rendering) abort the job; every
 * other stage logs the failure to the progress log and continues, so one
 * degraded asset never throws away the work already done.
 */

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use log::{error, info};

use crate::app_config::{Config, ImageDriver, TextDriver, VoiceDriver};
use crate::director::{Blueprint, Director};
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::progress::{ProgressLevel, ProgressLog};
use crate::routing::image::ImageRouter;
use crate::routing::text::TextRouter;
use crate::routing::voice::VoiceRouter;

/// Per-job driver overrides carried as plain data.
///
/// Names resolve through each driver's `from_name`, so an unknown name
/// silently selects that kind's default driver.
#[derive(Debug, Clone, Default)]
pub struct DriverPreferences {
    /// Preferred text driver name
    pub text_driver: Option<String>,
    /// Explicit text fallback name
    pub text_fallback: Option<String>,
    /// Preferred image driver name
    pub image_driver: Option<String>,
    /// Explicit image fallback name
    pub image_fallback: Option<String>,
    /// Preferred voice driver name
    pub voice_driver: Option<String>,
    /// Explicit voice fallback name
    pub voice_fallback: Option<String>,
}

impl DriverPreferences {
    fn resolved_text(&self) -> (Option<TextDriver>, Option<TextDriver>) {
        (
            self.text_driver.as_deref().map(TextDriver::from_name),
            self.text_fallback.as_deref().map(TextDriver::from_name),
        )
    }

    fn resolved_image(&self) -> (Option<ImageDriver>, Option<ImageDriver>) {
        (
            self.image_driver.as_deref().map(ImageDriver::from_name),
            self.image_fallback.as_deref().map(ImageDriver::from_name),
        )
    }

    fn resolved_voice(&self) -> (Option<VoiceDriver>, Option<VoiceDriver>) {
        (
            self.voice_driver.as_deref().map(VoiceDriver::from_name),
            self.voice_fallback.as_deref().map(VoiceDriver::from_name),
        )
    }
}

/// Everything needed to run one video generation job
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Topic the video is about
    pub topic: String,

    /// Chosen title; the topic stands in when absent
    pub title: Option<String>,

    /// Whether image fallback drivers may be used
    pub use_backups: bool,

    /// Per-job driver overrides
    pub preferences: DriverPreferences,

    /// Unique job identifier, also the artifact directory name
    pub job_id: String,

    /// Target video duration in seconds
    pub target_duration_secs: Option<u32>,

    /// Skip the renderer and log the command to run instead
    pub manual_render: bool,
}

impl GenerationRequest {
    /// The title used throughout the job: explicit title or the topic
    pub fn effective_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.topic)
    }
}

/// Coordinator for the video generation stages
pub struct VideoPipeline {
    /// Application configuration
    config: Config,

    /// Shared progress log observed by pollers
    progress: ProgressLog,
}

impl VideoPipeline {
    /// Create a pipeline over a shared progress log
    pub fn new(config: Config, progress: ProgressLog) -> Self {
        Self { config, progress }
    }

    fn log_info(&self, job_id: &str, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.progress.append(job_id, ProgressLevel::Info, message);
    }

    fn log_error(&self, job_id: &str, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.progress.append(job_id, ProgressLevel::Error, message);
    }

    /// Run a job, building per-job routers from its driver preferences.
    ///
    /// Returns the job's artifact directory on success.
    pub async fn run(&self, request: &GenerationRequest) -> Result<PathBuf, PipelineError> {
        let (text_driver, text_fallback) = request.preferences.resolved_text();
        let (image_driver, image_fallback) = request.preferences.resolved_image();
        let (voice_driver, voice_fallback) = request.preferences.resolved_voice();

        let director = Director::new(TextRouter::from_config(
            &self.config,
            text_driver,
            text_fallback,
        ));
        let voice = VoiceRouter::from_config(&self.config, voice_driver, voice_fallback);
        let image = ImageRouter::from_config(
            &self.config,
            image_driver,
            image_fallback,
            request.use_backups,
        );

        self.run_with_components(request, &director, &voice, &image)
            .await
    }

    /// Run a job over already-built components (used by tests)
    pub async fn run_with_components(
        &self,
        request: &GenerationRequest,
        director: &Director,
        voice: &VoiceRouter,
        image: &ImageRouter,
    ) -> Result<PathBuf, PipelineError> {
        let job_id = &request.job_id;
        self.log_info(
            job_id,
            format!("Job preferences: {:?}", request.preferences),
        );
        self.log_info(
            job_id,
            format!("Starting video processing for topic: {}", request.topic),
        );

        let base_path = self.config.storage_root.join(job_id);
        FileManager::ensure_dir(&base_path).map_err(|e| PipelineError::fatal("init", e))?;

        // 1. Script configuration: without a script nothing downstream can run
        self.log_info(job_id, "Generating script configuration...");
        let script_config = director
            .generate_script_config(request.effective_title(), request.target_duration_secs)
            .await
            .map_err(|e| {
                self.log_error(job_id, format!("Script configuration failed: {}", e));
                PipelineError::fatal("script_config", e)
            })?;

        FileManager::write_json_pretty(&base_path.join("script_config.json"), &script_config)
            .map_err(|e| PipelineError::fatal("script_config", e))?;
        self.log_info(
            job_id,
            format!("Script configuration generated. {}", base_path.display()),
        );

        // 2. Narration audio, before scenes so the breakdown follows the
        //    narration flow. Failure degrades the job instead of aborting it.
        self.log_info(job_id, "Generating narration audio...");
        let audio_path = base_path.join("narration.mp3");
        match voice.generate(&script_config.audio_script, &audio_path).await {
            Ok(path) => {
                self.log_info(
                    job_id,
                    format!("Narration audio saved to {}", path.display()),
                );
            }
            Err(e) => {
                self.log_error(job_id, format!("Audio generation failed: {}", e));
            }
        }

        // 3. Scene breakdown
        self.log_info(job_id, "Breaking script into scenes...");
        let scenes = director
            .generate_scenes(&script_config.audio_script)
            .await
            .map_err(|e| {
                self.log_error(job_id, format!("Scene breakdown failed: {}", e));
                PipelineError::fatal("scenes", e)
            })?;

        let blueprint_path = base_path.join("scenes.json");
        let mut blueprint = Blueprint {
            title: request.effective_title().to_string(),
            description: script_config.youtube_description.clone(),
            scenes,
        };
        FileManager::write_json_pretty(&blueprint_path, &blueprint)
            .map_err(|e| PipelineError::fatal("scenes", e))?;
        self.log_info(
            job_id,
            format!("Scenes generated: {}", blueprint.scenes.len()),
        );

        // 4. Scene images, sequential. A failed scene keeps its slot in the
        //    blueprint with no image path.
        for (index, scene) in blueprint.scenes.iter_mut().enumerate() {
            if scene.image_prompt.is_empty() {
                continue;
            }

            self.log_info(job_id, format!("Generating image for scene {}...", index));
            let image_path = base_path.join(format!("scene_{}.png", index));
            match image.generate(&scene.image_prompt, &image_path).await {
                Ok(path) => {
                    scene.image_path = Some(path.display().to_string());
                    self.log_info(
                        job_id,
                        format!("Image for scene {} saved to {}", index, path.display()),
                    );
                }
                Err(e) => {
                    self.log_error(
                        job_id,
                        format!("Image generation failed for scene {}: {}", index, e),
                    );
                }
            }
        }

        // Re-persist the blueprint with image paths filled in
        FileManager::write_json_pretty(&blueprint_path, &blueprint)
            .map_err(|e| PipelineError::fatal("scenes", e))?;

        // 5. Thumbnail
        self.log_info(job_id, "Generating thumbnail...");
        let thumbnail_path = base_path.join("thumbnail.png");
        let thumbnail_prompt = format!(
            "A captivating and engaging youtube thumbnail for a video about: {}. \
             Style: 2D illustration, flat design, high quality, vibrant colors.",
            request.effective_title()
        );
        match image.generate(&thumbnail_prompt, &thumbnail_path).await {
            Ok(path) => {
                self.log_info(job_id, format!("Thumbnail saved to {}", path.display()));
            }
            Err(e) => {
                self.log_error(job_id, format!("Thumbnail generation failed: {}", e));
            }
        }

        // 6. Render
        let final_video_path = base_path.join("final_video.mp4");
        self.render(
            job_id,
            &blueprint_path,
            &final_video_path,
            &audio_path,
            &thumbnail_path,
            request.manual_render,
        )
        .await?;

        Ok(base_path)
    }

    /// Invoke the external renderer, or log its command in manual mode.
    ///
    /// The renderer receives four positional arguments: blueprint path,
    /// output video path, narration audio path, thumbnail path.
    async fn render(
        &self,
        job_id: &str,
        blueprint_path: &std::path::Path,
        final_video_path: &std::path::Path,
        audio_path: &std::path::Path,
        thumbnail_path: &std::path::Path,
        manual: bool,
    ) -> Result<(), PipelineError> {
        let renderer = &self.config.renderer;

        let mut args: Vec<String> = Vec::new();
        if !renderer.script.is_empty() {
            args.push(renderer.script.clone());
        }
        args.push(blueprint_path.display().to_string());
        args.push(final_video_path.display().to_string());
        args.push(audio_path.display().to_string());
        args.push(thumbnail_path.display().to_string());

        let command_str = format!("{} {}", renderer.program, args.join(" "));

        if manual {
            self.log_info(job_id, "MANUAL RENDER MODE: Skipping renderer execution.");
            self.log_info(job_id, "Run the following command manually:");
            self.log_info(job_id, command_str);
            return Ok(());
        }

        self.log_info(job_id, "Starting video rendering...");
        self.log_info(job_id, format!("Command: {}", command_str));

        let child = tokio::process::Command::new(&renderer.program)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = tokio::time::timeout(Duration::from_secs(renderer.timeout_secs), child)
            .await
            .map_err(|_| {
                let message = format!(
                    "Video rendering timed out after {} seconds",
                    renderer.timeout_secs
                );
                self.log_error(job_id, message.clone());
                PipelineError::StageFatal {
                    stage: "render",
                    message,
                }
            })?
            .map_err(|e| {
                self.log_error(job_id, format!("Failed to start renderer: {}", e));
                PipelineError::fatal("render", e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            self.log_error(job_id, format!("Video rendering failed: {}", stderr));
            return Err(PipelineError::StageFatal {
                stage: "render",
                message: stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        self.log_info(
            job_id,
            format!("Video rendering completed: {}", stdout.trim()),
        );
        self.log_info(
            job_id,
            format!("Final video saved to: {}", final_video_path.display()),
        );
        Ok(())
    }
}
