#[cfg(feature = "integration-tests")]
use crate::common::test_utils::gpu::{OffscreenTarget, TARGET_FORMAT};

#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
const SIZE: [u32; 2] = [256, 256];

#[cfg(feature = "integration-tests")]
fn setup(
    max_quads: u32,
) -> (
    batch_ngin::context::GpuContext,
    batch_ngin::BatchRenderer<batch_ngin::render::WgpuBackend>,
    OffscreenTarget,
) {
    use batch_ngin::{BatchRenderer, RendererConfig, context::GpuContext, render::WgpuBackend};

    batch_ngin::init_logger();
    let ctx = GpuContext::headless_blocking().expect("headless GPU context");
    let config = RendererConfig::new(max_quads, 16).with_thread_count(2);
    let mut backend = WgpuBackend::new(&ctx, TARGET_FORMAT, &config).expect("wgpu backend");
    backend.clear_colour = wgpu::Color::BLUE;
    let renderer = BatchRenderer::new(config, backend).expect("batch renderer");
    let target = OffscreenTarget::new(&ctx.device, SIZE);
    (ctx, renderer, target)
}

/// The camera sees x and y in [-2, 2] at z = 0: 64 pixels per unit.
#[cfg(feature = "integration-tests")]
fn camera() -> batch_ngin::Camera {
    use batch_ngin::{Camera, Deg, Vector3};
    Camera::new(Vector3::new(0.0, 0.0, -2.0), Deg(90.0), 1.0)
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour() {
    let (ctx, mut renderer, target) = setup(16);

    renderer.backend_mut().begin_frame(target.view(), target.size);
    renderer.begin_scene(&camera());
    renderer.end_scene();

    assert_eq!(renderer.backend().submissions(), 1);
    let img = target.read(&ctx.device, &ctx.queue);
    assert_eq!(*img.get_pixel(128, 128), image::Rgba([0, 0, 255, 255]));
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_centered_red_quad() {
    use batch_ngin::{Transform, Vector3};

    let (ctx, mut renderer, target) = setup(16);

    renderer.backend_mut().begin_frame(target.view(), target.size);
    renderer.begin_scene(&camera());
    renderer.draw_quad(&Transform::new(), Vector3::new(1.0, 0.0, 0.0));
    renderer.end_scene();

    let img = target.read(&ctx.device, &ctx.queue);
    assert_eq!(*img.get_pixel(128, 128), image::Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(0, 0), image::Rgba([0, 0, 255, 255]));
    assert_eq!(*img.get_pixel(128, 60), image::Rgba([0, 0, 255, 255]));
}

#[test]
#[cfg(feature = "integration-tests")]
fn later_batches_keep_earlier_ones() {
    use batch_ngin::{Transform, Vector3};

    let (ctx, mut renderer, target) = setup(1);

    renderer.backend_mut().begin_frame(target.view(), target.size);
    renderer.begin_scene(&camera());
    renderer.draw_quad(
        &Transform::new().with_location(Vector3::new(-1.0, 0.0, 0.0)),
        Vector3::new(1.0, 0.0, 0.0),
    );
    renderer.draw_quad(
        &Transform::new().with_location(Vector3::new(1.0, 0.0, 0.0)),
        Vector3::new(0.0, 1.0, 0.0),
    );
    renderer.end_scene();

    assert_eq!(renderer.stats().draw_calls, 2);
    assert_eq!(renderer.backend().submissions(), 2);
    let img = target.read(&ctx.device, &ctx.queue);
    assert_eq!(*img.get_pixel(64, 128), image::Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(192, 128), image::Rgba([0, 255, 0, 255]));
    assert_eq!(*img.get_pixel(128, 128), image::Rgba([0, 0, 255, 255]));
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_sample_bound_texture() {
    use batch_ngin::{Transform, Vector3, data_structures::texture::Texture};

    let (ctx, mut renderer, target) = setup(16);
    let green = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        2,
        2,
        image::Rgba([0, 255, 0, 255]),
    ));
    let texture = Texture::from_image(&ctx.device, &ctx.queue, &green, Some("green"))
        .expect("texture upload");
    let handle = renderer.backend_mut().register_texture(texture);
    assert_eq!(handle.id(), 1);
    assert_eq!((handle.width(), handle.height()), (2, 2));
    let uploaded = renderer
        .backend()
        .texture(&handle)
        .expect("registered texture");
    assert_eq!(uploaded.texture.width(), 2);
    assert_eq!(uploaded.size, [2, 2]);

    renderer.backend_mut().begin_frame(target.view(), target.size);
    renderer.begin_scene(&camera());
    renderer.draw_textured_quad(
        &Transform::new().with_location(Vector3::new(-1.0, 0.0, 0.0)),
        &handle,
        4.0,
        Vector3::new(1.0, 1.0, 1.0),
    );
    renderer.draw_quad(
        &Transform::new().with_location(Vector3::new(1.0, 0.0, 0.0)),
        Vector3::new(1.0, 0.0, 0.0),
    );
    renderer.end_scene();

    assert_eq!(renderer.stats().draw_calls, 1);
    let img = target.read(&ctx.device, &ctx.queue);
    assert_eq!(*img.get_pixel(64, 128), image::Rgba([0, 255, 0, 255]));
    assert_eq!(*img.get_pixel(192, 128), image::Rgba([255, 0, 0, 255]));
}

#[test]
#[cfg(feature = "integration-tests")]
fn rejects_more_slots_than_the_shader_has() {
    use batch_ngin::{RendererConfig, context::GpuContext, render::WgpuBackend};

    let ctx = GpuContext::headless_blocking().expect("headless GPU context");
    let config = RendererConfig::new(16, 32);
    assert!(WgpuBackend::new(&ctx, TARGET_FORMAT, &config).is_err());
}
