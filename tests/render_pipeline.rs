//! Renderer behavior observed through the command log of a `RecordingBackend`.

use glam::{Mat4, Vec3};
use procdraw::math::Color;
use procdraw::renderer::shaders::{UNIFORM_COLOR, UNIFORM_MODEL_VIEW, UNIFORM_SAMPLER};
use procdraw::renderer::{
    Command, IndexFormat, ProgramId, RectMode, Texture, TextureId, Topology,
};
use procdraw::settings::Resolution;
use procdraw::{BackendError, RecordingBackend, RenderError, RenderSettings, Renderer};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn renderer() -> Renderer<RecordingBackend> {
    let settings = RenderSettings {
        resolution: Resolution {
            width: 640,
            height: 480,
        },
        ..RenderSettings::default()
    };
    let mut r = Renderer::new(RecordingBackend::new(), settings).expect("renderer");
    r.backend_mut().take_commands();
    r
}

fn texture() -> Texture {
    Texture::new(TextureId::new(900), 64, 32)
}

fn draws(r: &Renderer<RecordingBackend>) -> Vec<Command> {
    r.backend().draw_calls().cloned().collect()
}

/// `(program, color)` for every `uColor` upload, in order.
fn colors(r: &Renderer<RecordingBackend>) -> Vec<(ProgramId, [f32; 4])> {
    r.backend()
        .commands()
        .iter()
        .filter_map(|c| match c {
            Command::BindUniformVec4 { program, name, value } if name == UNIFORM_COLOR => {
                Some((*program, *value))
            }
            _ => None,
        })
        .collect()
}

fn model_views(r: &Renderer<RecordingBackend>) -> Vec<Mat4> {
    r.backend()
        .commands()
        .iter()
        .filter_map(|c| match c {
            Command::BindUniformMatrix { name, value, .. } if name == UNIFORM_MODEL_VIEW => {
                Some(*value)
            }
            _ => None,
        })
        .collect()
}

fn uploads(r: &Renderer<RecordingBackend>) -> usize {
    r.backend()
        .commands()
        .iter()
        .filter(|c| {
            matches!(
                c,
                Command::CreateVertexBuffer { .. } | Command::CreateIndexBuffer { .. }
            )
        })
        .count()
}

#[test]
fn failed_construction_releases_what_it_created() {
    let mut backend = RecordingBackend::new();
    backend.fail_allocations_after(3);

    let failed = matches!(
        Renderer::new(&mut backend, RenderSettings::default()),
        Err(RenderError::Backend(BackendError::Allocation(_)))
    );
    assert!(failed);
    assert_eq!(backend.live_buffers(), 0);
    assert_eq!(backend.live_programs(), 0);
}

#[test]
fn failed_cleanup_still_reports_the_construction_error() {
    let mut backend = RecordingBackend::new();
    backend.fail_allocations_after(0);
    backend.fail_releases(true);

    let failed = matches!(
        Renderer::new(&mut backend, RenderSettings::default()),
        Err(RenderError::Backend(BackendError::Allocation(_)))
    );
    assert!(failed);

    let deletes: Vec<&Command> = backend
        .commands()
        .iter()
        .filter(|c| matches!(c, Command::DeleteProgram(_)))
        .collect();
    assert_eq!(
        deletes,
        vec![
            &Command::DeleteProgram(ProgramId::new(2)),
            &Command::DeleteProgram(ProgramId::new(1)),
        ]
    );
}

#[test]
fn construction_builds_programs_and_unit_geometry_once() {
    let r = Renderer::new(RecordingBackend::new(), RenderSettings::default()).unwrap();
    let compiled = r
        .backend()
        .commands()
        .iter()
        .filter(|c| matches!(c, Command::CompileProgram(_)))
        .count();
    assert_eq!(compiled, 2);
    assert_eq!(uploads(&r), 7);
    assert_eq!(r.backend().live_buffers(), 7);
}

#[test]
fn default_rect_draws_outline_then_fill() {
    let mut r = renderer();
    let depth = r.stack_depth();
    let before = r.model_view();

    r.rect(10.0, 10.0, 50.0, 30.0);

    assert_eq!(r.stack_depth(), depth);
    assert_eq!(r.model_view(), before);
    assert_eq!(
        draws(&r),
        vec![
            Command::DrawArrays {
                topology: Topology::LineStrip,
                first: 0,
                count: 5
            },
            Command::DrawArrays {
                topology: Topology::TriangleStrip,
                first: 0,
                count: 4
            },
        ]
    );

    let colors: Vec<[f32; 4]> = colors(&r).into_iter().map(|(_, c)| c).collect();
    assert_eq!(colors, vec![Color::BLACK.to_array(), Color::WHITE.to_array()]);

    let expected = Mat4::from_translation(Vec3::new(10.0, 10.0, 0.0))
        * Mat4::from_scale(Vec3::new(50.0, 30.0, 1.0));
    for mv in model_views(&r) {
        assert!(mv.abs_diff_eq(expected, 1e-6), "{mv:?}");
    }
    assert_eq!(uploads(&r), 0);
}

#[test]
fn center_mode_shifts_rect_by_half_its_size() {
    let mut r = renderer();
    r.rect_mode(RectMode::Center);
    r.no_stroke();
    r.rect(100.0, 100.0, 40.0, 20.0);

    let mv = model_views(&r)[0];
    let corner = mv.transform_point3(Vec3::ZERO);
    assert!(corner.abs_diff_eq(Vec3::new(80.0, 90.0, 0.0), 1e-5), "{corner:?}");
}

#[test]
fn transparent_stroke_and_body_draw_nothing() {
    let mut r = renderer();
    r.no_stroke();
    r.no_fill();
    r.tint("rgba(0,0,0,0)").unwrap();

    r.rect(0.0, 0.0, 10.0, 10.0);
    r.draw_box(1.0, 1.0, 1.0, None);
    r.draw_box(1.0, 1.0, 1.0, Some(&texture()));
    r.image(&texture(), 0.0, 0.0, None, None).unwrap();
    r.triangle(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();

    assert_eq!(draws(&r).len(), 0);
    assert_eq!(uploads(&r), 0);
    assert_eq!(r.stack_depth(), 0);
}

#[test]
fn box_draws_indexed_outline_then_body() {
    let mut r = renderer();
    r.draw_box(2.0, 3.0, 4.0, None);

    let draws = draws(&r);
    assert_eq!(draws.len(), 2);
    match (&draws[0], &draws[1]) {
        (
            Command::DrawElements {
                topology: Topology::Lines,
                count: 48,
                format: IndexFormat::Uint16,
                ..
            },
            Command::DrawElements {
                topology: Topology::Triangles,
                count: 36,
                format: IndexFormat::Uint16,
                ..
            },
        ) => {}
        other => panic!("unexpected draws {other:?}"),
    }

    let expected = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
    assert!(model_views(&r).iter().all(|mv| mv.abs_diff_eq(expected, 1e-6)));
    assert_eq!(r.stack_depth(), 0);
}

#[test]
fn textured_box_is_gated_on_tint_not_fill() {
    let mut r = renderer();
    r.no_stroke();
    r.no_fill();
    r.draw_box(1.0, 1.0, 1.0, Some(&texture()));
    assert_eq!(draws(&r).len(), 1);
    assert!(r.backend().commands().iter().any(|c| matches!(
        c,
        Command::BindTexture { name, texture, .. } if name == UNIFORM_SAMPLER && *texture == TextureId::new(900)
    )));

    r.backend_mut().take_commands();
    r.fill("#ff0000").unwrap();
    r.tint("rgba(255,255,255,0)").unwrap();
    r.draw_box(1.0, 1.0, 1.0, Some(&texture()));
    assert_eq!(draws(&r).len(), 0);
}

#[test]
fn flat_and_textured_passes_use_different_programs() {
    let mut r = renderer();
    r.image(&texture(), 0.0, 0.0, None, None).unwrap();

    let colors = colors(&r);
    assert_eq!(colors.len(), 2);
    assert_ne!(colors[0].0, colors[1].0);
    assert_eq!(colors[0].1, Color::BLACK.to_array());
    assert_eq!(colors[1].1, Color::WHITE.to_array());
}

#[test]
fn invisible_tint_hides_the_whole_image() {
    let mut r = renderer();
    r.stroke("#000").unwrap();
    r.tint("rgba(255,255,255,0)").unwrap();
    let uv = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

    r.image(&texture(), 0.0, 0.0, None, None).unwrap();
    r.image(&texture(), 10.0, 10.0, Some((4.0, 4.0)), Some(&uv)).unwrap();

    assert!(draws(&r).is_empty(), "{:?}", draws(&r));
    assert_eq!(uploads(&r), 0);
    assert_eq!(r.stack_depth(), 0);
}

#[test]
fn image_defaults_to_texture_size() {
    let mut r = renderer();
    r.no_stroke();
    r.image(&texture(), 5.0, 6.0, None, None).unwrap();

    let expected = Mat4::from_translation(Vec3::new(5.0, 6.0, 0.0))
        * Mat4::from_scale(Vec3::new(64.0, 32.0, 1.0));
    assert!(model_views(&r)[0].abs_diff_eq(expected, 1e-6));
    assert_eq!(
        draws(&r),
        vec![Command::DrawArrays {
            topology: Topology::TriangleStrip,
            first: 0,
            count: 4
        }]
    );
}

#[test]
fn custom_texture_coordinates_use_a_transient_buffer() {
    let mut r = renderer();
    r.no_stroke();
    r.image_mode(RectMode::Center);
    let uv = [[0.0, 0.0], [0.5, 0.0], [0.0, 0.5], [0.5, 0.5]];
    r.image(&texture(), 32.0, 16.0, Some((10.0, 10.0)), Some(&uv)).unwrap();

    let created = r.backend().commands().iter().find_map(|c| match c {
        Command::CreateVertexBuffer { buffer, data, item_size: 2 } => Some((*buffer, data.clone())),
        _ => None,
    });
    let (buffer, data) = created.expect("transient texcoord buffer");
    assert_eq!(data, vec![0.0, 0.0, 0.5, 0.0, 0.0, 0.5, 0.5, 0.5]);
    assert!(r.backend().commands().contains(&Command::DeleteBuffer(buffer)));
    assert_eq!(r.backend().live_buffers(), 7);

    let corner = model_views(&r)[0].transform_point3(Vec3::ZERO);
    assert!(corner.abs_diff_eq(Vec3::new(27.0, 11.0, 0.0), 1e-5));
}

#[test]
fn triangle_uploads_and_releases_its_vertices() {
    let mut r = renderer();
    r.triangle(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 10.0, 0.0))
        .unwrap();

    assert_eq!(
        draws(&r),
        vec![
            Command::DrawArrays {
                topology: Topology::LineLoop,
                first: 0,
                count: 3
            },
            Command::DrawArrays {
                topology: Topology::TriangleStrip,
                first: 0,
                count: 3
            },
        ]
    );
    assert_eq!(uploads(&r), 1);
    assert_eq!(r.backend().live_buffers(), 7);
    assert_eq!(r.stack_depth(), 0);
}

#[test]
fn primitives_preserve_caller_stack_depth() {
    let mut r = renderer();
    r.push_matrix();
    r.translate(3.0, 4.0, 0.0);
    r.push_matrix();
    let depth = r.stack_depth();
    let current = r.model_view();

    r.rect(0.0, 0.0, 1.0, 1.0);
    r.draw_box(1.0, 2.0, 3.0, None);
    r.draw_box(1.0, 2.0, 3.0, Some(&texture()));
    r.image(&texture(), 1.0, 1.0, Some((2.0, 2.0)), None).unwrap();
    r.triangle(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();

    assert_eq!(r.stack_depth(), depth);
    assert_eq!(r.model_view(), current);
}

#[test]
fn random_push_pop_sequences_track_depth() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let mut r = renderer();
        let mut expected: usize = 0;
        for _ in 0..rng.gen_range(1..64) {
            if rng.gen_bool(0.55) {
                r.translate(rng.gen_range(-5.0..5.0), 0.0, 0.0);
                r.push_matrix();
                expected += 1;
            } else {
                let before = r.model_view();
                r.pop_matrix();
                if expected == 0 {
                    assert_eq!(r.model_view(), before);
                } else {
                    expected -= 1;
                }
            }
            assert_eq!(r.stack_depth(), expected);
        }
    }
}

#[test]
fn primitives_leave_nothing_live_after_release() {
    let mut r = renderer();
    r.rect(0.0, 0.0, 4.0, 4.0);
    r.triangle(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
    let uv = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
    r.image(&texture(), 0.0, 0.0, None, Some(&uv)).unwrap();

    assert!(r.release().is_empty());
    assert_eq!(r.backend().live_buffers(), 0);
    assert_eq!(r.backend().live_programs(), 0);
}
