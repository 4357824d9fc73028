mod app;
mod dialogs;
mod widgets;

use facecam_core::detection::domain::face_detector::share;
use facecam_core::detection::infrastructure::cascade_face_detector::{
    backend_version, CascadeFaceDetector,
};
use facecam_core::shared::config::AppConfig;

use app::App;

const WINDOW_TITLE: &str = "Face Detection - Press Q to Exit";
const CONTROL_BAR_HEIGHT: f32 = 56.0;

fn main() -> iced::Result {
    env_logger::init();
    log::info!("OpenCV {}", backend_version());

    let config = AppConfig::default();

    // No window is built unless the classifier loads.
    let detector = match CascadeFaceDetector::load(&config.cascade_path, config.cascade.clone()) {
        Ok(detector) => share(detector),
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let window_size = iced::Size::new(
        config.frame_width as f32,
        config.frame_height as f32 + CONTROL_BAR_HEIGHT,
    );

    iced::application(
        move || App::new(config.clone(), detector.clone()),
        App::update,
        App::view,
    )
    .title(WINDOW_TITLE)
    .subscription(App::subscription)
    .window(iced::window::Settings {
        size: window_size,
        ..Default::default()
    })
    .run()
}
