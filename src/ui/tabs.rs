/// Per-tab views
use iced::widget::image::Handle;
use iced::widget::{
    button, canvas, checkbox, column, container, image, pick_list, row, scrollable, slider, text,
    text_input, Column,
};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;
use std::path::Path;

use super::histogram::Histogram;
use super::{Slot, Tab, Tool};
use crate::background::Service;
use crate::generate::{self, AiModel};
use crate::processing::batch::{BatchOperation, IMAGE_EXTENSIONS};
use crate::processing::convert::OutputFormat;
use crate::processing::enhance::{Enhancement, INTENSITY_RANGE};
use crate::processing::resize::{ResampleQuality, ResizeMode};
use crate::state::params::{HUE_RANGE, PERCENT_RANGE};
use crate::{ImageSuite, Message};

const PREVIEW_WIDTH: f32 = 360.0;

/// Whole window: tab bar plus the selected tab
pub(crate) fn layout(app: &ImageSuite) -> Element<'_, Message> {
    let tabs: Vec<Element<Message>> = Tab::ALL
        .iter()
        .map(|&tab| {
            button(text(tab.label()))
                .padding(10)
                .style(if tab == app.tab { button::primary } else { button::secondary })
                .on_press(Message::TabSelected(tab))
                .into()
        })
        .collect();

    let body = match app.tab {
        Tab::Format => format_tab(app),
        Tab::Generate => generate_tab(app),
        Tab::Enhance => enhance_tab(app),
        Tab::Background => background_tab(app),
        Tab::Batch => batch_tab(app),
        Tab::Tools => tools_tab(app),
        Tab::Icons => icons_tab(app),
    };

    let content = column![
        text("🎨 Image Suite").size(32),
        Wrap::with_elements(tabs).spacing(6.0).line_spacing(6.0),
        scrollable(container(body).padding(10).width(Length::Fill)),
    ]
    .spacing(16)
    .padding(20);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Button that is disabled while a job runs
fn action<'a>(label: &'a str, message: Message, busy: bool) -> Element<'a, Message> {
    button(text(if busy { "Working..." } else { label }))
        .padding(10)
        .on_press_maybe((!busy).then_some(message))
        .into()
}

fn preview<'a>(path: &Path) -> Option<Element<'a, Message>> {
    let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    (is_image && path.is_file()).then(|| {
        image(Handle::from_path(path))
            .width(Length::Fixed(PREVIEW_WIDTH))
            .into()
    })
}

/// Input picker with the chosen file and its preview
fn image_input(app: &ImageSuite, slot: Slot) -> Element<'_, Message> {
    let mut col = Column::new().spacing(8).push(
        button(text("Choose Image"))
            .padding(8)
            .on_press(Message::PickImage(slot)),
    );
    match app.inputs.get(&slot) {
        Some(path) => {
            col = col.push(text(path.display().to_string()).size(14));
            if let Some(img) = preview(path) {
                col = col.push(img);
            }
        }
        None => col = col.push(text("No image selected").size(14)),
    }
    col.into()
}

/// Status line and preview of the last result
fn result_view(app: &ImageSuite, slot: Slot) -> Element<'_, Message> {
    let mut col = Column::new().spacing(8);
    if let Some(outcome) = app.results.get(&slot) {
        col = col.push(text(&outcome.status));
        if let Some(path) = &outcome.output {
            col = col.push(text(path.display().to_string()).size(14));
            if let Some(img) = preview(path) {
                col = col.push(img);
            }
        }
    }
    col.into()
}

fn labeled<'a>(label: &'a str, control: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    row![text(label).width(Length::Fixed(160.0)), control.into()]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
}

fn format_tab(app: &ImageSuite) -> Element<'_, Message> {
    column![
        text("Format Conversion").size(24),
        image_input(app, Slot::Format),
        labeled(
            "Output format",
            pick_list(OutputFormat::ALL, Some(app.format), Message::FormatSelected),
        ),
        labeled(
            "Quality",
            row![
                slider(10..=100, app.quality, Message::QualityChanged).width(Length::Fixed(240.0)),
                text(app.quality.to_string()),
            ]
            .spacing(10),
        ),
        action("Convert", Message::Convert, app.busy),
        result_view(app, Slot::Format),
    ]
    .spacing(12)
    .into()
}

fn generate_tab(app: &ImageSuite) -> Element<'_, Message> {
    column![
        text("AI Image Generation").size(24),
        text_input("Describe the image you want...", &app.prompt)
            .on_input(Message::PromptChanged)
            .padding(8),
        labeled(
            "Model",
            pick_list(AiModel::ALL, Some(app.model), Message::ModelSelected),
        ),
        labeled(
            "Size",
            pick_list(generate::IMAGE_SIZES, Some(app.size), Message::SizeSelected),
        ),
        action("Generate", Message::Generate, app.busy),
        result_view(app, Slot::Generate),
        text("API Keys").size(20),
        labeled(
            "OpenAI",
            text_input("sk-...", &app.openai_key_input)
                .secure(true)
                .on_input(Message::OpenAiKeyChanged),
        ),
        labeled(
            "Anthropic",
            text_input("sk-ant-...", &app.anthropic_key_input)
                .secure(true)
                .on_input(Message::AnthropicKeyChanged),
        ),
        labeled(
            "DeepSeek",
            text_input("API key", &app.deepseek_key_input)
                .secure(true)
                .on_input(Message::DeepSeekKeyChanged),
        ),
        button(text("Save API Keys")).padding(8).on_press(Message::SaveKeys),
        text(&app.keys_status),
    ]
    .spacing(12)
    .into()
}

fn enhance_tab(app: &ImageSuite) -> Element<'_, Message> {
    column![
        text("Image Enhancement").size(24),
        image_input(app, Slot::Enhance),
        labeled(
            "Enhancement",
            pick_list(Enhancement::ALL, Some(app.enhancement), Message::EnhancementSelected),
        ),
        labeled(
            "Intensity",
            row![
                slider(
                    INTENSITY_RANGE.0..=INTENSITY_RANGE.1,
                    app.intensity,
                    Message::IntensityChanged
                )
                .step(0.1)
                .width(Length::Fixed(240.0)),
                text(format!("{:.1}", app.intensity)),
            ]
            .spacing(10),
        ),
        action("Enhance", Message::Enhance, app.busy),
        result_view(app, Slot::Enhance),
    ]
    .spacing(12)
    .into()
}

fn background_tab(app: &ImageSuite) -> Element<'_, Message> {
    let mut col = column![
        text("Background Removal").size(24),
        image_input(app, Slot::Background),
        labeled(
            "Service",
            pick_list(Service::ALL, Some(app.service), Message::ServiceSelected),
        ),
    ]
    .spacing(12);

    if app.service == Service::RemoveBg {
        col = col
            .push(labeled(
                "Remove.bg API key",
                text_input("API key", &app.removebg_key_input)
                    .secure(true)
                    .on_input(Message::RemoveBgKeyChanged),
            ))
            .push(
                button(text("Save Remove.bg Key"))
                    .padding(8)
                    .on_press(Message::SaveRemoveBgKey),
            )
            .push(text(&app.removebg_key_status));
    }

    col.push(action("Remove Background", Message::RemoveBackground, app.busy))
        .push(result_view(app, Slot::Background))
        .into()
}

fn batch_tab(app: &ImageSuite) -> Element<'_, Message> {
    let files = app
        .batch_files
        .iter()
        .fold(Column::new().spacing(4), |col, path| {
            col.push(text(path.display().to_string()).size(14))
        });

    let mut col = column![
        text("Batch Processing").size(24),
        row![
            button(text("Add Images")).padding(8).on_press(Message::PickBatchFiles),
            button(text("Add Folder")).padding(8).on_press(Message::PickBatchFolder),
            button(text("Clear")).padding(8).on_press(Message::ClearBatch),
        ]
        .spacing(8),
        text(format!("{} item(s) selected", app.batch_files.len())),
        files,
        labeled(
            "Operation",
            pick_list(
                BatchOperation::ALL,
                Some(app.batch_operation),
                Message::BatchOperationSelected
            ),
        ),
        action("Process Batch", Message::RunBatch, app.busy),
    ]
    .spacing(12);

    if let Some(report) = &app.batch_report {
        col = col
            .push(text(&report.status))
            .push(text(format!("{} file(s) written", report.outputs.len())));
    }
    col.into()
}

fn tools_tab(app: &ImageSuite) -> Element<'_, Message> {
    let tools = row(Tool::ALL.iter().map(|&tool| {
        button(text(tool.label()))
            .padding(8)
            .style(if tool == app.tool { button::primary } else { button::secondary })
            .on_press(Message::ToolSelected(tool))
            .into()
    }))
    .spacing(8);

    let body = match app.tool {
        Tool::Analysis => analysis_tool(app),
        Tool::Filters => filters_tool(app),
        Tool::Resize => resize_tool(app),
    };

    column![tools, body].spacing(16).into()
}

fn analysis_tool(app: &ImageSuite) -> Element<'_, Message> {
    let mut col = column![
        text("Image Analysis").size(24),
        image_input(app, Slot::Analysis),
        action("Analyze", Message::Analyze, app.busy),
    ]
    .spacing(12);

    if !app.analysis_json.is_empty() {
        col = col.push(text(&app.analysis_json).size(14));
    }
    if let Some(analysis) = &app.analysis {
        col = col.push(
            canvas(Histogram {
                data: &analysis.histogram,
            })
            .width(Length::Fill)
            .height(Length::Fixed(160.0)),
        );
    }
    col.into()
}

fn percent_slider<'a>(
    label: &'a str,
    value: i32,
    range: (i32, i32),
    on_change: fn(i32) -> Message,
) -> Element<'a, Message> {
    labeled(
        label,
        row![
            slider(range.0..=range.1, value, on_change).width(Length::Fixed(240.0)),
            text(value.to_string()),
        ]
        .spacing(10),
    )
}

fn filters_tool(app: &ImageSuite) -> Element<'_, Message> {
    let params = &app.filter_params;
    column![
        text("Custom Filters").size(24),
        image_input(app, Slot::Filters),
        percent_slider("Brightness", params.brightness, PERCENT_RANGE, Message::BrightnessChanged),
        percent_slider("Contrast", params.contrast, PERCENT_RANGE, Message::ContrastChanged),
        percent_slider("Saturation", params.saturation, PERCENT_RANGE, Message::SaturationChanged),
        percent_slider("Hue", params.hue, HUE_RANGE, Message::HueChanged),
        row![
            action("Apply Filters", Message::ApplyFilters, app.busy),
            button(text("Reset")).padding(10).on_press(Message::ResetFilters),
        ]
        .spacing(8),
        result_view(app, Slot::Filters),
    ]
    .spacing(12)
    .into()
}

fn resize_tool(app: &ImageSuite) -> Element<'_, Message> {
    column![
        text("Resize & Crop").size(24),
        image_input(app, Slot::Resize),
        labeled(
            "Mode",
            pick_list(ResizeMode::ALL, Some(app.resize_mode), Message::ResizeModeSelected),
        ),
        labeled(
            "Width",
            text_input("800", &app.width_input).on_input(Message::WidthChanged),
        ),
        labeled(
            "Height",
            text_input("600", &app.height_input).on_input(Message::HeightChanged),
        ),
        checkbox("Maintain aspect ratio", app.maintain_ratio).on_toggle(Message::RatioToggled),
        labeled(
            "Quality",
            pick_list(ResampleQuality::ALL, Some(app.resample), Message::ResampleSelected),
        ),
        action("Process", Message::ResizeCrop, app.busy),
        result_view(app, Slot::Resize),
    ]
    .spacing(12)
    .into()
}

fn icons_tab(app: &ImageSuite) -> Element<'_, Message> {
    column![
        text("Android Icons").size(24),
        text("Packs launcher icons for mdpi through xxxhdpi into a ZIP").size(14),
        image_input(app, Slot::Icons),
        action("Generate Icons", Message::MakeIcons, app.busy),
        result_view(app, Slot::Icons),
    ]
    .spacing(12)
    .into()
}
