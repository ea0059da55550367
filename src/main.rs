use iced::{Element, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

mod background;
mod color;
mod config;
mod error;
mod generate;
mod http;
mod logging;
mod processing;
mod state;
mod ui;

use background::Service;
use config::Settings;
use error::{Outcome, SuiteError};
use generate::{AiModel, GenerationRequest};
use processing::analysis::{self, ImageAnalysis};
use processing::batch::{self, BatchOperation, BatchReport, IMAGE_EXTENSIONS};
use processing::convert::{self, OutputFormat, DEFAULT_QUALITY};
use processing::enhance::{self, Enhancement, DEFAULT_INTENSITY};
use processing::resize::{self, ResampleQuality, ResizeMode, ResizeRequest};
use processing::{filters, icons};
use state::keys::{self, GeneratorKeys, RemoveBgKey};
use state::params::FilterParams;
use ui::{Slot, Tab, Tool};

/// Main application state
struct ImageSuite {
    settings: Settings,
    tab: Tab,
    tool: Tool,
    /// A blocking job is in flight; action buttons are disabled
    busy: bool,
    /// Selected input image per slot
    inputs: HashMap<Slot, PathBuf>,
    /// Last result per slot
    results: HashMap<Slot, Outcome>,

    // Format
    format: OutputFormat,
    quality: u8,

    // AI Gen
    prompt: String,
    model: AiModel,
    size: &'static str,
    openai_key_input: String,
    anthropic_key_input: String,
    deepseek_key_input: String,
    /// Keys saved from the AI Gen tab
    keys: GeneratorKeys,
    /// Keys from settings and the environment
    configured_keys: GeneratorKeys,
    keys_status: String,

    // Enhance
    enhancement: Enhancement,
    intensity: f32,

    // BG Remove
    service: Service,
    removebg_key_input: String,
    removebg_key: RemoveBgKey,
    configured_removebg_key: RemoveBgKey,
    removebg_key_status: String,

    // Batch
    batch_files: Vec<PathBuf>,
    batch_operation: BatchOperation,
    batch_report: Option<BatchReport>,

    // Tools
    analysis_json: String,
    analysis: Option<ImageAnalysis>,
    filter_params: FilterParams,
    resize_mode: ResizeMode,
    width_input: String,
    height_input: String,
    maintain_ratio: bool,
    resample: ResampleQuality,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),
    ToolSelected(Tool),
    /// Open the file picker for a slot's input image
    PickImage(Slot),
    /// A blocking job for a slot completed
    Finished(Slot, Outcome),

    FormatSelected(OutputFormat),
    QualityChanged(u8),
    Convert,

    PromptChanged(String),
    ModelSelected(AiModel),
    SizeSelected(&'static str),
    OpenAiKeyChanged(String),
    AnthropicKeyChanged(String),
    DeepSeekKeyChanged(String),
    SaveKeys,
    Generate,

    EnhancementSelected(Enhancement),
    IntensityChanged(f32),
    Enhance,

    ServiceSelected(Service),
    RemoveBgKeyChanged(String),
    SaveRemoveBgKey,
    RemoveBackground,

    PickBatchFiles,
    PickBatchFolder,
    ClearBatch,
    BatchOperationSelected(BatchOperation),
    RunBatch,
    BatchFinished(BatchReport),

    Analyze,
    Analyzed(String, Option<ImageAnalysis>),
    BrightnessChanged(i32),
    ContrastChanged(i32),
    SaturationChanged(i32),
    HueChanged(i32),
    ResetFilters,
    ApplyFilters,
    ResizeModeSelected(ResizeMode),
    WidthChanged(String),
    HeightChanged(String),
    RatioToggled(bool),
    ResampleSelected(ResampleQuality),
    ResizeCrop,

    MakeIcons,
}

/// Run `job` on the blocking pool; a join failure becomes an error string
async fn blocking<T, F>(job: F) -> Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| SuiteError::Task(e.to_string()).to_string())
}

/// Run an operation for `slot` in the background and report back with `Finished`
fn run_slot<F>(slot: Slot, job: F) -> Task<Message>
where
    F: FnOnce() -> Outcome + Send + 'static,
{
    Task::perform(blocking(job), move |result| {
        Message::Finished(slot, result.unwrap_or_else(Outcome::failure))
    })
}

fn pick_image(title: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(title)
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
}

/// Parse a width/height field into `1..=MAX_DIMENSION`
fn parse_dimension(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (1..=resize::MAX_DIMENSION).contains(v))
}

impl ImageSuite {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        let configured_keys = GeneratorKeys::from_settings(&settings);
        let configured_removebg_key = RemoveBgKey::from_settings(&settings);

        info!(
            "🎨 Image Suite ready (outputs for generated images: {})",
            settings.output_dir.display()
        );

        (
            ImageSuite {
                settings,
                tab: Tab::default(),
                tool: Tool::default(),
                busy: false,
                inputs: HashMap::new(),
                results: HashMap::new(),
                format: OutputFormat::Png,
                quality: DEFAULT_QUALITY,
                prompt: String::new(),
                model: AiModel::default(),
                size: generate::DEFAULT_SIZE,
                openai_key_input: String::new(),
                anthropic_key_input: String::new(),
                deepseek_key_input: String::new(),
                keys: GeneratorKeys::default(),
                configured_keys,
                keys_status: String::new(),
                enhancement: Enhancement::ColorEnhancement,
                intensity: DEFAULT_INTENSITY,
                service: Service::default(),
                removebg_key_input: String::new(),
                removebg_key: RemoveBgKey::default(),
                configured_removebg_key,
                removebg_key_status: String::new(),
                batch_files: Vec::new(),
                batch_operation: BatchOperation::default(),
                batch_report: None,
                analysis_json: String::new(),
                analysis: None,
                filter_params: FilterParams::default(),
                resize_mode: ResizeMode::Resize,
                width_input: "800".to_string(),
                height_input: "600".to_string(),
                maintain_ratio: true,
                resample: ResampleQuality::default(),
            },
            Task::none(),
        )
    }

    /// Input path for a slot; empty when nothing was picked
    fn input(&self, slot: Slot) -> PathBuf {
        self.inputs.get(&slot).cloned().unwrap_or_default()
    }

    /// Generator keys for a request: typed, then saved, then configured
    fn request_keys(&self) -> GeneratorKeys {
        self.keys.resolve(
            [
                &self.openai_key_input,
                &self.anthropic_key_input,
                &self.deepseek_key_input,
            ],
            &self.configured_keys,
        )
    }

    fn request_removebg_key(&self) -> Option<String> {
        keys::resolve(
            &self.removebg_key_input,
            self.removebg_key.get(),
            self.configured_removebg_key.get(),
        )
    }

    /// Mark the app busy and start a slot job
    fn start<F>(&mut self, slot: Slot, job: F) -> Task<Message>
    where
        F: FnOnce() -> Outcome + Send + 'static,
    {
        self.busy = true;
        self.results.remove(&slot);
        run_slot(slot, job)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => self.tab = tab,
            Message::ToolSelected(tool) => self.tool = tool,
            Message::PickImage(slot) => {
                if let Some(path) = pick_image("Select Image") {
                    info!("{} input: {}", slot, path.display());
                    self.inputs.insert(slot, path);
                    self.results.remove(&slot);
                }
            }
            Message::Finished(slot, outcome) => {
                self.busy = false;
                self.results.insert(slot, outcome);
            }

            Message::FormatSelected(format) => self.format = format,
            Message::QualityChanged(quality) => self.quality = quality,
            Message::Convert => {
                let (input, format, quality) = (self.input(Slot::Format), self.format, self.quality);
                return self.start(Slot::Format, move || {
                    convert::convert_image(&input, format, quality)
                });
            }

            Message::PromptChanged(prompt) => self.prompt = prompt,
            Message::ModelSelected(model) => self.model = model,
            Message::SizeSelected(size) => self.size = size,
            Message::OpenAiKeyChanged(key) => self.openai_key_input = key,
            Message::AnthropicKeyChanged(key) => self.anthropic_key_input = key,
            Message::DeepSeekKeyChanged(key) => self.deepseek_key_input = key,
            Message::SaveKeys => {
                self.keys_status = self.keys.save(
                    &self.openai_key_input,
                    &self.anthropic_key_input,
                    &self.deepseek_key_input,
                );
            }
            Message::Generate => {
                let request = GenerationRequest {
                    prompt: self.prompt.clone(),
                    model: self.model,
                    size: self.size.to_string(),
                };
                let keys = self.request_keys();
                let endpoints = self.settings.endpoints.clone();
                let output_dir = self.settings.output_dir.clone();
                return self.start(Slot::Generate, move || {
                    generate::generate_image(&request, &keys, &endpoints, &output_dir)
                });
            }

            Message::EnhancementSelected(kind) => self.enhancement = kind,
            Message::IntensityChanged(intensity) => self.intensity = intensity,
            Message::Enhance => {
                let (input, kind, intensity) =
                    (self.input(Slot::Enhance), self.enhancement, self.intensity);
                return self.start(Slot::Enhance, move || {
                    enhance::enhance_image(&input, kind, intensity)
                });
            }

            Message::ServiceSelected(service) => self.service = service,
            Message::RemoveBgKeyChanged(key) => self.removebg_key_input = key,
            Message::SaveRemoveBgKey => {
                self.removebg_key_status = self.removebg_key.save(&self.removebg_key_input);
            }
            Message::RemoveBackground => {
                let input = self.input(Slot::Background);
                let service = self.service;
                let model_path = self.settings.model_path.clone();
                let key = self.request_removebg_key();
                let endpoint = self.settings.endpoints.removebg.clone();
                return self.start(Slot::Background, move || {
                    background::remove_background(
                        &input,
                        service,
                        &model_path,
                        key.as_deref(),
                        &endpoint,
                    )
                });
            }

            Message::PickBatchFiles => {
                if let Some(files) = FileDialog::new()
                    .set_title("Select Images")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_files()
                {
                    self.batch_files.extend(files);
                    self.batch_report = None;
                }
            }
            Message::PickBatchFolder => {
                if let Some(folder) = FileDialog::new().set_title("Select Folder").pick_folder() {
                    self.batch_files.push(folder);
                    self.batch_report = None;
                }
            }
            Message::ClearBatch => {
                self.batch_files.clear();
                self.batch_report = None;
            }
            Message::BatchOperationSelected(operation) => self.batch_operation = operation,
            Message::RunBatch => {
                let paths = self.batch_files.clone();
                let operation = self.batch_operation;
                let model_path = self.settings.model_path.clone();
                self.busy = true;
                self.batch_report = None;
                return Task::perform(
                    blocking(move || batch::process_batch(&paths, operation, &model_path)),
                    |result| {
                        Message::BatchFinished(result.unwrap_or_else(|status| BatchReport {
                            outputs: Vec::new(),
                            status: Outcome::failure(status).status,
                        }))
                    },
                );
            }
            Message::BatchFinished(report) => {
                self.busy = false;
                info!("Batch finished with {} outputs", report.outputs.len());
                self.batch_report = Some(report);
            }

            Message::Analyze => {
                let input = self.input(Slot::Analysis);
                self.busy = true;
                self.analysis = None;
                return Task::perform(
                    blocking(move || {
                        let (value, analysis) = analysis::analyze_image(&input);
                        let json = serde_json::to_string_pretty(&value)
                            .unwrap_or_else(|_| value.to_string());
                        (json, analysis)
                    }),
                    |result| match result {
                        Ok((json, analysis)) => Message::Analyzed(json, analysis),
                        Err(status) => Message::Analyzed(
                            serde_json::json!({ "error": status }).to_string(),
                            None,
                        ),
                    },
                );
            }
            Message::Analyzed(json, analysis) => {
                self.busy = false;
                self.analysis_json = json;
                self.analysis = analysis;
            }
            Message::BrightnessChanged(v) => self.filter_params.brightness = v,
            Message::ContrastChanged(v) => self.filter_params.contrast = v,
            Message::SaturationChanged(v) => self.filter_params.saturation = v,
            Message::HueChanged(v) => self.filter_params.hue = v,
            Message::ResetFilters => self.filter_params.reset(),
            Message::ApplyFilters => {
                let (input, params) = (self.input(Slot::Filters), self.filter_params);
                return self.start(Slot::Filters, move || filters::apply_custom_filter(&input, &params));
            }
            Message::ResizeModeSelected(mode) => self.resize_mode = mode,
            Message::WidthChanged(width) => self.width_input = width,
            Message::HeightChanged(height) => self.height_input = height,
            Message::RatioToggled(on) => self.maintain_ratio = on,
            Message::ResampleSelected(quality) => self.resample = quality,
            Message::ResizeCrop => {
                let (Some(width), Some(height)) = (
                    parse_dimension(&self.width_input),
                    parse_dimension(&self.height_input),
                ) else {
                    warn!(
                        "Rejected resize dimensions {:?} x {:?}",
                        self.width_input, self.height_input
                    );
                    self.results.insert(
                        Slot::Resize,
                        Outcome::failure(format!(
                            "Processing error: Width and height must be numbers from 1 to {}",
                            resize::MAX_DIMENSION
                        )),
                    );
                    return Task::none();
                };
                let input = self.input(Slot::Resize);
                let request = ResizeRequest {
                    mode: self.resize_mode,
                    width,
                    height,
                    maintain_ratio: self.maintain_ratio,
                    quality: self.resample,
                };
                return self.start(Slot::Resize, move || resize::resize_crop_image(&input, &request));
            }

            Message::MakeIcons => {
                let input = self.input(Slot::Icons);
                return self.start(Slot::Icons, move || icons::make_android_icons(&input));
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        ui::tabs::layout(self)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("⚠️  {}; using default settings", e);
            Settings::default()
        }
    };
    logging::init(&settings.log_level);

    iced::application("Image Suite", ImageSuite::update, ImageSuite::view)
        .theme(ImageSuite::theme)
        .centered()
        .run_with(move || ImageSuite::new(settings))
}
