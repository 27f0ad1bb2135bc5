use glam::Vec3;
use procdraw::renderer::{BlendMode, RectMode, Texture, TextureId};
use procdraw::{RecordingBackend, RenderSettings, Renderer};

fn run() -> Result<(), procdraw::RenderError> {
    let settings = RenderSettings::load();
    let mut renderer = Renderer::new(RecordingBackend::new(), settings)?;
    let checker = Texture::new(TextureId::new(1000), 128, 128);

    for frame in 0..3 {
        renderer.begin_frame();
        renderer.background("#202830")?;

        renderer.fill("rgba(255, 128, 0, 0.8)")?;
        renderer.rect(20.0, 20.0, 200.0, 120.0);

        renderer.push_matrix();
        renderer.translate(400.0, 300.0, 0.0);
        renderer.rotate_y(frame as f32 * 0.25);
        renderer.no_stroke();
        renderer.draw_box(80.0, 80.0, 80.0, Some(&checker));
        renderer.pop_matrix();

        renderer.stroke("#fff")?;
        renderer.blend_mode(BlendMode::Additive);
        renderer.image_mode(RectMode::Center);
        renderer.image(&checker, 640.0, 360.0, Some((64.0, 64.0)), None)?;
        renderer.triangle(
            Vec3::new(10.0, 400.0, 0.0),
            Vec3::new(90.0, 400.0, 0.0),
            Vec3::new(50.0, 340.0, 0.0),
        )?;
        renderer.defaults();

        let commands = renderer.backend_mut().take_commands();
        let draws = commands.iter().filter(|c| c.is_draw()).count();
        log::info!("frame {frame}: {} commands, {draws} draws", commands.len());
    }

    let errors = renderer.release();
    log::info!(
        "released with {} error(s), {} buffers still live",
        errors.len(),
        renderer.backend().live_buffers()
    );
    Ok(())
}

fn main() {
    procdraw::init_logging();
    if let Err(err) = run() {
        eprintln!("Application error: {err}");
    }
}
