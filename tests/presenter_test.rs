// End-to-end tests for the splash presenter against the headless window system
use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tauri_plugin_native_splash::effect::ANIMATION_DURATION;
use tauri_plugin_native_splash::geometry::{Point, Rect, Size};
use tauri_plugin_native_splash::image_source::MemoryBundle;
use tauri_plugin_native_splash::platform::headless::HeadlessWindowSystem;
use tauri_plugin_native_splash::{QueueDispatcher, SplashConfig, SplashPresenter};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

fn screen() -> Rect {
    Rect::new(Point::new(0.0, 25.0), Size::new(1440.0, 875.0))
}

fn setup(bundle: MemoryBundle) -> (SplashPresenter<HeadlessWindowSystem>, Arc<QueueDispatcher>) {
    init_logger();
    let dispatcher = Arc::new(QueueDispatcher::new());
    let presenter = SplashPresenter::new(
        HeadlessWindowSystem::new(Some(screen())),
        dispatcher.clone(),
        Arc::new(bundle),
    );
    (presenter, dispatcher)
}

fn logo_config() -> SplashConfig {
    SplashConfig {
        window_width: 300,
        window_height: 200,
        image_resource_name: "logo".to_string(),
        image_resource_extension: "png".to_string(),
        ..Default::default()
    }
}

fn after_animation() -> Instant {
    Instant::now() + ANIMATION_DURATION + Duration::from_millis(50)
}

#[test]
fn test_logo_scenario_centers_image() {
    let (presenter, _) = setup(MemoryBundle::new().with_asset("logo.png", png_bytes(100, 80)));
    presenter.set_configuration_provider(logo_config());

    presenter.show();

    let windows = presenter.window_system().live_windows();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].frame.size, Size::new(300.0, 200.0));

    let image = windows[0].image.as_ref().expect("image placed");
    assert_eq!(image.rect.origin, Point::new(100.0, 60.0));
    assert_eq!(image.rect.size, Size::new(100.0, 80.0));
}

#[test]
fn test_pixel_buffer_scenario() {
    let (presenter, _) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(SplashConfig {
        image_resource_name: String::new(),
        image_pixels: vec![0x80; 64],
        image_width: 4,
        image_height: 4,
        ..logo_config()
    });

    presenter.show();

    let windows = presenter.window_system().live_windows();
    let image = windows[0].image.as_ref().expect("image placed");
    assert_eq!(image.rect.size, Size::new(4.0, 4.0));
    assert_eq!(image.rect.origin, Point::new(148.0, 98.0));
}

#[test]
fn test_short_pixel_buffer_shows_blank_window() {
    let (presenter, _) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(SplashConfig {
        image_resource_name: String::new(),
        image_pixels: vec![0x80; 63],
        image_width: 4,
        image_height: 4,
        ..logo_config()
    });

    presenter.show();

    let windows = presenter.window_system().live_windows();
    assert_eq!(windows.len(), 1);
    assert!(windows[0].visible);
    assert!(windows[0].image.is_none());
}

#[test]
fn test_bundled_resource_has_priority() {
    let (presenter, _) = setup(MemoryBundle::new().with_asset("logo.png", png_bytes(100, 80)));
    presenter.set_configuration_provider(SplashConfig {
        image_pixels: vec![0; 16],
        image_width: 2,
        image_height: 2,
        retina_image_resource_name: Some("logo@2x".to_string()),
        ..logo_config()
    });

    presenter.show();

    let windows = presenter.window_system().live_windows();
    let image = windows[0].image.as_ref().expect("image placed");
    // 覆盖尺寸作用于资源图片；retina 缺失时只有基础表示
    assert_eq!(image.rect.size, Size::new(2.0, 2.0));
    assert_eq!(image.representations, 1);
}

#[test]
fn test_show_twice_creates_one_window() {
    let (presenter, _) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(logo_config());

    presenter.show();
    presenter.show();

    assert_eq!(presenter.window_system().windows().len(), 1);
    assert!(presenter.is_shown());
}

#[test]
fn test_close_when_hidden_is_noop() {
    let (presenter, dispatcher) = setup(MemoryBundle::new());

    presenter.close("");
    presenter.close("fade");
    dispatcher.pump_at(after_animation());

    assert!(!presenter.is_shown());
    assert!(presenter.window_system().windows().is_empty());
}

#[test]
fn test_close_empty_effect_releases_synchronously() {
    let (presenter, dispatcher) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(logo_config());
    presenter.show();

    presenter.close("");

    assert!(!presenter.is_shown());
    let windows = presenter.window_system().windows();
    assert!(windows[0].released);
    assert!(!windows[0].visible);
    assert_eq!(dispatcher.pending(), 0);
}

#[test]
fn test_effect_names_dispatch_without_crashing() {
    let cases = [
        (" ", 0.0),
        ("FADE", 0.0),
        ("fade", 0.0),
        ("SlideUpFade", 0.0),
        ("slide_up_fade", 50.0),
        ("Slide_Down_Fade", -50.0),
    ];

    for (effect, dy) in cases {
        let (presenter, dispatcher) = setup(MemoryBundle::new());
        presenter.set_configuration_provider(logo_config());
        presenter.show();
        let start = presenter.window_system().windows()[0].frame;

        presenter.close(effect);

        let record = &presenter.window_system().windows()[0];
        let transition = record.transitions.last().expect("dismiss animation");
        assert_eq!(transition.alpha, 0.0, "effect {effect}");
        assert_eq!(transition.frame, start.translated(0.0, dy), "effect {effect}");
        assert_eq!(transition.duration, ANIMATION_DURATION);

        dispatcher.pump_at(after_animation());
        assert!(!presenter.is_shown(), "effect {effect}");
    }
}

#[test]
fn test_show_rejected_while_dismissing() {
    let (presenter, dispatcher) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(logo_config());
    presenter.show();
    presenter.close("fade");

    presenter.show();
    assert_eq!(presenter.window_system().windows().len(), 1);

    dispatcher.pump_at(after_animation());
    presenter.show();
    assert_eq!(presenter.window_system().windows().len(), 2);
    assert_eq!(presenter.window_system().live_windows().len(), 1);
}

#[test]
fn test_off_thread_show_blocks_until_ui_thread_runs_it() {
    let (presenter, dispatcher) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(logo_config());

    let worker_presenter = presenter.clone();
    let worker = thread::spawn(move || {
        worker_presenter.show();
        worker_presenter.is_shown()
    });

    while !worker.is_finished() {
        dispatcher.pump();
        thread::sleep(Duration::from_millis(1));
    }

    assert!(worker.join().expect("worker thread"), "shown when show() returns");
}

#[test]
fn test_off_thread_close_is_fire_and_forget() {
    let (presenter, dispatcher) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(logo_config());
    presenter.show();

    let worker_presenter = presenter.clone();
    thread::spawn(move || worker_presenter.close(""))
        .join()
        .expect("worker thread");

    assert!(presenter.is_shown(), "nothing happens until the UI thread pumps");
    assert_eq!(dispatcher.pump(), 1);
    assert!(!presenter.is_shown());
}

#[test]
fn test_window_centered_on_visible_frame() {
    let (presenter, _) = setup(MemoryBundle::new());
    presenter.set_configuration_provider(logo_config());
    presenter.show();

    let frame = presenter.window_system().live_windows()[0].frame;
    let center = screen().center();
    assert!((frame.origin.x + frame.size.width / 2.0 - center.x).abs() < 1e-9);
    assert!((frame.origin.y + frame.size.height / 2.0 - center.y).abs() < 1e-9);
}
