use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::widget::{button, column, container, image, row, stack};
use iced::{event, keyboard, Alignment, Element, Event, Length, Subscription, Task};

use facecam_core::capture::infrastructure::ffmpeg_camera::FfmpegCamera;
use facecam_core::detection::domain::face_detector::SharedDetector;
use facecam_core::session::app_controller::{AppController, ControllerError, StopMode};
use facecam_core::shared::config::AppConfig;
use facecam_core::shared::display_image::DisplayImage;
use facecam_core::snapshot::snapshot_request::{LabeledSnapshot, SnapshotRequest};
use facecam_core::snapshot::snapshot_writer::SnapshotWriter;
use facecam_core::video::infrastructure::image_file_writer::ImageFileWriter;

use crate::dialogs;
use crate::widgets::{label_prompt, video_panel};

const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(15);

#[derive(Debug, Clone)]
pub enum Message {
    StartPressed,
    StopPressed,
    SnapshotPressed,
    QuitRequested,
    PollFrames,
    LabelChanged(String),
    LabelSubmitted,
    LabelCancelled,
    SnapshotConfirmed(bool),
    NoticeClosed,
}

/// Where the snapshot flow currently stands.
enum SnapshotStage {
    Idle,
    Naming { request: SnapshotRequest, input: String },
    Confirming(LabeledSnapshot),
}

pub struct App {
    controller: AppController,
    frames: Receiver<DisplayImage>,
    current: Option<image::Handle>,
    snapshot: SnapshotStage,
}

impl App {
    pub fn new(config: AppConfig, detector: SharedDetector) -> (Self, Task<Message>) {
        let backend = FfmpegCamera::new(config.frame_width, config.frame_height);
        let snapshots =
            SnapshotWriter::new(config.snapshot_dir.clone(), Box::new(ImageFileWriter::new()));
        let controller = AppController::new(config, Box::new(backend), detector, snapshots);
        let frames = controller.frames();

        (
            Self {
                controller,
                frames,
                current: None,
                snapshot: SnapshotStage::Idle,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartPressed => {
                if let Err(e) = self.controller.start() {
                    return notify(&e);
                }
            }
            Message::StopPressed => match self.controller.stop(StopMode::CloseFeed) {
                Ok(()) => self.current = None,
                Err(e) => return notify(&e),
            },
            Message::QuitRequested => {
                let _ = self.controller.stop(StopMode::Quit);
                return iced::exit();
            }
            Message::PollFrames => {
                // Only the newest frame is worth showing.
                if let Some(latest) = self.frames.try_iter().last() {
                    if self.controller.is_running() {
                        let (w, h) = (latest.width(), latest.height());
                        self.current = Some(image::Handle::from_rgba(w, h, latest.into_rgba()));
                    }
                }
            }
            Message::SnapshotPressed => {
                if !matches!(self.snapshot, SnapshotStage::Idle) {
                    return Task::none();
                }
                match self.controller.begin_snapshot() {
                    Ok(request) => {
                        self.snapshot = SnapshotStage::Naming {
                            request,
                            input: String::new(),
                        };
                    }
                    Err(e) => return notify(&e),
                }
            }
            Message::LabelChanged(value) => {
                if let SnapshotStage::Naming { input, .. } = &mut self.snapshot {
                    *input = value;
                }
            }
            Message::LabelSubmitted => return self.label_answered(true),
            Message::LabelCancelled => return self.label_answered(false),
            Message::SnapshotConfirmed(confirmed) => {
                let stage = std::mem::replace(&mut self.snapshot, SnapshotStage::Idle);
                if let SnapshotStage::Confirming(labeled) = stage {
                    return match self.controller.resolve_snapshot(labeled, confirmed) {
                        Ok(outcome) => dialogs::show(outcome.notice()),
                        Err(e) => notify(&e),
                    };
                }
            }
            Message::NoticeClosed => {}
        }
        Task::none()
    }

    /// Moves the snapshot flow past the label prompt. A cancelled prompt is
    /// handled like an empty name.
    fn label_answered(&mut self, submitted: bool) -> Task<Message> {
        let (request, input) = match std::mem::replace(&mut self.snapshot, SnapshotStage::Idle) {
            SnapshotStage::Naming { request, input } => (request, input),
            other => {
                self.snapshot = other;
                return Task::none();
            }
        };

        let answer = submitted.then_some(input.as_str());
        match request.with_label(answer) {
            Ok(labeled) => {
                let task =
                    dialogs::confirm(labeled.confirmation_title(), labeled.confirmation_prompt());
                self.snapshot = SnapshotStage::Confirming(labeled);
                task
            }
            Err(e) => notify(&ControllerError::from(e)),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let controls = row![
            button("Start camera").on_press(Message::StartPressed),
            button("Stop camera").on_press(Message::StopPressed),
            button("Take snapshot").on_press(Message::SnapshotPressed),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let content = column![
            video_panel::view(self.current.as_ref()),
            container(controls)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(12),
        ]
        .height(Length::Fill);

        match &self.snapshot {
            SnapshotStage::Naming { input, .. } => stack![content, label_prompt::view(input)].into(),
            _ => content.into(),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let keys = if self.quit_key_enabled() {
            event::listen_with(quit_key)
        } else {
            Subscription::none()
        };
        if self.controller.is_running() {
            Subscription::batch([
                keys,
                iced::time::every(FRAME_POLL_INTERVAL).map(|_| Message::PollFrames),
            ])
        } else {
            keys
        }
    }

    /// `Q` is typed into the name field, not treated as quit, while a
    /// snapshot is being named or confirmed.
    fn quit_key_enabled(&self) -> bool {
        matches!(self.snapshot, SnapshotStage::Idle)
    }
}

fn notify(error: &ControllerError) -> Task<Message> {
    dialogs::show(error.notice())
}

/// `Q` quits, unless a focused widget consumed the key.
fn quit_key(event: Event, status: event::Status, _window: iced::window::Id) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => match key.as_ref() {
            keyboard::Key::Character(c) if c.eq_ignore_ascii_case("q") => {
                Some(Message::QuitRequested)
            }
            _ => None,
        },
        _ => None,
    }
}
