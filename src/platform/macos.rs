//! macOS 窗口系统（cocoa / objc）
//!
//! 使用 AppKit 创建启动窗口：
//! - `NSWindow`：无边框、缓冲、透明背景、`NSFloatingWindowLevel`、无阴影
//! - `NSImageView`：按比例缩放显示图片，图片由若干 `NSBitmapImageRep` 组成
//! - `NSAnimationContext` 分组 + `animator` 代理完成透明度与位置动画
//!
//! 所有调用都发生在主线程（由 `UiDispatcher` 保证）。
//! 坐标为 AppKit 屏幕坐标（左下角原点）。
//!
//! cocoa 已封装的类型（`NSScreen` / `NSWindow` / `NSView` / `NSColor`）走其 trait；
//! 图片与动画相关的类 cocoa 没有封装，直接 `msg_send!`。

#![allow(unexpected_cfgs)]

use std::ptr;

use cocoa::appkit::{
    NSBackingStoreType, NSColor, NSScreen, NSView, NSWindow, NSWindowStyleMask,
};
use cocoa::base::{id, nil, NO, YES};
use cocoa::foundation::{NSInteger, NSPoint, NSRect, NSSize, NSString, NSUInteger};
use objc::{class, msg_send, sel, sel_impl};

use crate::error::SplashError;
use crate::geometry::{Point, Rect, Size};
use crate::image_source::{BitmapRep, SplashImage};

use super::{SplashWindow, Transition, WindowSpec, WindowSystem};

const NS_FLOATING_WINDOW_LEVEL: NSInteger = 3;
const NS_IMAGE_SCALE_PROPORTIONALLY_UP_OR_DOWN: NSUInteger = 3;
const NS_DEVICE_RGB_COLOR_SPACE: &str = "NSDeviceRGBColorSpace";

fn to_ns_point(point: Point) -> NSPoint {
    NSPoint::new(point.x, point.y)
}

fn to_ns_size(size: Size) -> NSSize {
    NSSize::new(size.width, size.height)
}

fn to_ns_rect(rect: Rect) -> NSRect {
    NSRect::new(to_ns_point(rect.origin), to_ns_size(rect.size))
}

fn from_ns_rect(rect: NSRect) -> Rect {
    Rect::new(
        Point::new(rect.origin.x, rect.origin.y),
        Size::new(rect.size.width, rect.size.height),
    )
}

/// AppKit 窗口系统
#[derive(Debug, Clone, Copy, Default)]
pub struct CocoaWindowSystem;

impl WindowSystem for CocoaWindowSystem {
    type Window = CocoaWindow;

    fn main_screen_visible_frame(&self) -> Option<Rect> {
        unsafe {
            let screen = NSScreen::mainScreen(nil);
            if screen.is_null() {
                return None;
            }
            Some(from_ns_rect(NSScreen::visibleFrame(screen)))
        }
    }

    fn create_window(&self, spec: &WindowSpec) -> Result<CocoaWindow, SplashError> {
        let content_rect = to_ns_rect(Rect::from_size(spec.frame.size));

        unsafe {
            let window = NSWindow::initWithContentRect_styleMask_backing_defer_(
                NSWindow::alloc(nil),
                content_rect,
                NSWindowStyleMask::NSBorderlessWindowMask,
                NSBackingStoreType::NSBackingStoreBuffered,
                NO,
            );
            if window.is_null() {
                return Err(SplashError::Window("NSWindow initialisation returned nil".to_string()));
            }

            NSWindow::setReleasedWhenClosed_(window, NO);
            NSWindow::setOpaque_(window, NO);
            NSWindow::setBackgroundColor_(window, NSColor::clearColor(nil));
            NSWindow::setLevel_(window, NS_FLOATING_WINDOW_LEVEL);
            NSWindow::setHasShadow_(window, NO);

            let title = NSString::alloc(nil).init_str(&spec.title);
            NSWindow::setTitle_(window, title);
            let _: () = msg_send![title, release];

            NSWindow::setFrameOrigin_(window, to_ns_point(spec.frame.origin));

            let content_view = NSView::initWithFrame_(NSView::alloc(nil), content_rect);
            NSWindow::setContentView_(window, content_view);
            let _: () = msg_send![content_view, release];

            Ok(CocoaWindow { window })
        }
    }
}

/// 持有一个 `NSWindow` 强引用，`Drop` 时关闭并释放
pub struct CocoaWindow {
    window: id,
}

// 只在主线程上被访问，由 UiDispatcher 保证
unsafe impl Send for CocoaWindow {}

/// 创建一份预乘 RGBA 的 `NSBitmapImageRep`（+1 引用）
fn bitmap_rep(rep: &BitmapRep, size: Size) -> Result<id, SplashError> {
    let width = rep.pixel_width as NSInteger;
    let height = rep.pixel_height as NSInteger;
    let bytes_per_row = width * 4;
    if rep.pixels.len() != (bytes_per_row * height) as usize {
        return Err(SplashError::Window(format!(
            "bitmap length {} does not match {}x{}",
            rep.pixels.len(),
            width,
            height
        )));
    }

    let bits_per_sample: NSInteger = 8;
    let samples_per_pixel: NSInteger = 4;
    let bits_per_pixel: NSInteger = 32;
    let logical_size = to_ns_size(size);

    unsafe {
        let planes: *mut *mut u8 = ptr::null_mut();
        let color_space = NSString::alloc(nil).init_str(NS_DEVICE_RGB_COLOR_SPACE);
        let bitmap: id = msg_send![class!(NSBitmapImageRep), alloc];
        let bitmap: id = msg_send![bitmap,
            initWithBitmapDataPlanes: planes
            pixelsWide: width
            pixelsHigh: height
            bitsPerSample: bits_per_sample
            samplesPerPixel: samples_per_pixel
            hasAlpha: YES
            isPlanar: NO
            colorSpaceName: color_space
            bytesPerRow: bytes_per_row
            bitsPerPixel: bits_per_pixel];
        let _: () = msg_send![color_space, release];

        if bitmap == nil {
            return Err(SplashError::Window("NSBitmapImageRep initialisation returned nil".to_string()));
        }

        let data: *mut u8 = msg_send![bitmap, bitmapData];
        if data.is_null() {
            let _: () = msg_send![bitmap, release];
            return Err(SplashError::Window("NSBitmapImageRep has no backing store".to_string()));
        }
        ptr::copy_nonoverlapping(rep.pixels.as_ptr(), data, rep.pixels.len());

        let _: () = msg_send![bitmap, setSize: logical_size];
        Ok(bitmap)
    }
}

impl SplashWindow for CocoaWindow {
    fn frame(&self) -> Rect {
        unsafe { from_ns_rect(NSWindow::frame(self.window)) }
    }

    fn set_alpha(&mut self, alpha: f64) {
        unsafe { NSWindow::setAlphaValue_(self.window, alpha) }
    }

    fn set_image(&mut self, image: &SplashImage, rect: Rect) -> Result<(), SplashError> {
        let image_size = to_ns_size(image.size);
        let view_frame = to_ns_rect(rect);

        unsafe {
            let ns_image: id = msg_send![class!(NSImage), alloc];
            let ns_image: id = msg_send![ns_image, initWithSize: image_size];
            if ns_image == nil {
                return Err(SplashError::Window("NSImage initialisation returned nil".to_string()));
            }

            for rep in &image.representations {
                match bitmap_rep(rep, image.size) {
                    Ok(bitmap) => {
                        let _: () = msg_send![ns_image, addRepresentation: bitmap];
                        let _: () = msg_send![bitmap, release];
                    }
                    Err(err) => {
                        let _: () = msg_send![ns_image, release];
                        return Err(err);
                    }
                }
            }

            let view: id = msg_send![class!(NSImageView), alloc];
            let view: id = msg_send![view, initWithFrame: view_frame];
            let _: () = msg_send![view, setImage: ns_image];
            let _: () = msg_send![view, setImageScaling: NS_IMAGE_SCALE_PROPORTIONALLY_UP_OR_DOWN];

            NSView::addSubview_(NSWindow::contentView(self.window), view);

            let _: () = msg_send![view, release];
            let _: () = msg_send![ns_image, release];
        }
        Ok(())
    }

    fn order_front(&mut self) {
        unsafe { NSWindow::makeKeyAndOrderFront_(self.window, nil) }
    }

    fn animate(&mut self, transition: Transition) {
        let moves = self.frame() != transition.frame;
        let duration = transition.duration.as_secs_f64();
        let alpha = transition.alpha;
        let target = to_ns_rect(transition.frame);

        unsafe {
            let context_class = class!(NSAnimationContext);
            let _: () = msg_send![context_class, beginGrouping];
            let context: id = msg_send![context_class, currentContext];
            let _: () = msg_send![context, setDuration: duration];

            let animator: id = msg_send![self.window, animator];
            let _: () = msg_send![animator, setAlphaValue: alpha];
            if moves {
                let _: () = msg_send![animator, setFrame: target display: YES];
            }

            let _: () = msg_send![context_class, endGrouping];
        }
    }

    fn order_out(&mut self) {
        unsafe { NSWindow::orderOut_(self.window, nil) }
    }
}

impl Drop for CocoaWindow {
    fn drop(&mut self) {
        unsafe {
            NSWindow::close(self.window);
            let _: () = msg_send![self.window, release];
        }
    }
}
