use std::cell::RefCell;
use std::rc::Rc;

use leptos::mount::mount_to;
use leptos::prelude::*;
use leptos::wasm_bindgen::JsCast;

mod controls;
pub mod rotation;
mod slider_widget;

use controls::RotationControls;
use rotation::{Axis, Frame, RotationMatrix, Vector3};

/// Callback to request a 3D canvas redraw (used for reactive rendering).
pub type RequestRedraw = Rc<dyn Fn()>;

/// Default angle for both rotation stages, matching the slider midpoint of
/// the first quadrant.
const DEFAULT_ANGLE_DEG: f64 = 45.0;

/// One (axis, angle) pair per rotation stage, degrees at this boundary.
/// The stages are applied in slice order; see [`RotationMatrix::compose`].
fn rotated_frame(stages: &[(Axis, f64)]) -> Frame {
    let matrices: Vec<RotationMatrix> = stages
        .iter()
        .map(|&(axis, angle_deg)| {
            RotationMatrix::from_axis_angle(axis.unit_vector(), (angle_deg as f32).to_radians())
        })
        .collect();
    Frame::default().rotated(&RotationMatrix::compose(&matrices))
}

fn format_basis_vector(v: Vector3) -> String {
    format!("({:+.3}, {:+.3}, {:+.3})", v.x, v.y, v.z)
}

// ---------------------------------------------------------------------------
// FrameReadout
// ---------------------------------------------------------------------------
#[component]
fn FrameReadout(frame: Memo<Frame>) -> impl IntoView {
    view! {
        <div class="control-section frame-readout">
            <h2>"Rotated frame"</h2>
            <pre>
                {move || {
                    let f = frame.get();
                    format!(
                        "x' = {}\ny' = {}\nz' = {}",
                        format_basis_vector(f.x),
                        format_basis_vector(f.y),
                        format_basis_vector(f.z),
                    )
                }}
            </pre>
        </div>
    }
}

// ---------------------------------------------------------------------------
// App root
// ---------------------------------------------------------------------------
#[component]
fn App(
    #[prop(optional)] frame_for_renderer: Option<Rc<RefCell<Frame>>>,
    #[prop(optional)] request_redraw: Option<RequestRedraw>,
) -> impl IntoView {
    let angle1_deg = RwSignal::new(DEFAULT_ANGLE_DEG);
    let axis1 = RwSignal::new(Axis::X);
    let angle2_deg = RwSignal::new(DEFAULT_ANGLE_DEG);
    let axis2 = RwSignal::new(Axis::X);

    // Full recomputation from the four inputs on every interaction; no state
    // survives between updates.
    let rotated = Memo::new(move |_| {
        rotated_frame(&[
            (axis1.get(), angle1_deg.get()),
            (axis2.get(), angle2_deg.get()),
        ])
    });

    // Sync the rotated frame to the three-d renderer and request a redraw
    // when it changes.
    if let Some(shared) = frame_for_renderer {
        let redraw = request_redraw;
        Effect::new(move || {
            let frame = rotated.get();
            *shared.borrow_mut() = frame;
            if let Some(ref r) = redraw {
                r();
            }
        });
    }

    view! {
        <h1>"Coordinate Frame Rotation"</h1>
        <p class="order-note">
            "Rotation 1 is applied first, then rotation 2: the combined matrix is R2 · R1."
        </p>
        <RotationControls label="Rotation 1" angle_deg=angle1_deg axis=axis1 />
        <RotationControls label="Rotation 2" angle_deg=angle2_deg axis=axis2 />
        <FrameReadout frame=rotated />
    }
}

// ---------------------------------------------------------------------------
// three-d renderer + Leptos mount
// ---------------------------------------------------------------------------

/// Orient the unit arrow mesh (authored along +X) to point along `dir`.
/// A degenerate direction (zero or NaN) produces a degenerate transform,
/// which renders as garbage rather than crashing.
fn arrow_transform(dir: Vector3) -> three_d::Mat4 {
    use three_d::*;
    Mat4::from(Quat::from_arc(
        vec3(1.0, 0.0, 0.0),
        vec3(dir.x, dir.y, dir.z).normalize(),
        None,
    ))
}

/// Arrow instances for the three basis vectors of `frame`: X red, Y green,
/// Z blue, with `alpha` distinguishing the reference frame (opaque) from the
/// rotated frame (translucent).
fn frame_instances(frame: &Frame, alpha: u8) -> three_d::Instances {
    use three_d::*;
    let transformations = frame.columns().iter().map(|&dir| arrow_transform(dir)).collect();
    Instances {
        transformations,
        colors: Some(vec![
            Srgba::new(221, 64, 64, alpha),
            Srgba::new(64, 191, 64, alpha),
            Srgba::new(64, 106, 221, alpha),
        ]),
        ..Default::default()
    }
}

/// Returns true if the window event should trigger a redraw (user interaction with 3D view).
#[cfg(target_arch = "wasm32")]
fn window_event_needs_redraw(event: &winit::event::WindowEvent) -> bool {
    use winit::event::WindowEvent;
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::Touch(_)
            | WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. }
    )
}

#[cfg(target_arch = "wasm32")]
fn run_three_d(
    frame_for_renderer: Rc<RefCell<Frame>>,
    request_redraw: RequestRedraw,
    event_loop: winit::event_loop::EventLoop<()>,
) {
    use three_d::*;
    use winit::event::{Event, WindowEvent};
    use winit::event_loop::ControlFlow;
    use winit::platform::web::WindowBuilderExtWebSys;
    use winit::window::WindowBuilder;

    wasm_bindgen_futures::spawn_local(async move {
        let canvas_element = leptos::tachys::dom::document()
            .get_element_by_id("frame-canvas")
            .expect("should find #frame-canvas element")
            .unchecked_into::<leptos::web_sys::HtmlCanvasElement>();

        let dpr = leptos::web_sys::window().unwrap().device_pixel_ratio();
        let css_width = canvas_element.client_width() as f64;
        let css_height = canvas_element.client_height() as f64;
        canvas_element.set_width((css_width * dpr) as u32);
        canvas_element.set_height((css_height * dpr) as u32);

        let inner_size = winit::dpi::LogicalSize::new(css_width, css_height);
        let window = WindowBuilder::new()
            .with_title("Coordinate Frame Rotation".to_string())
            .with_canvas(Some(canvas_element))
            .with_inner_size(inner_size)
            .with_prevent_default(true)
            .build(&event_loop)
            .expect("failed to create window");
        window.focus_window();

        let surface_settings = SurfaceSettings::default();
        let gl = WindowedContext::from_winit_window(&window, surface_settings)
            .or_else(|_| {
                log::warn!("multisampled WebGL context unavailable, retrying without");
                let mut fallback = surface_settings;
                fallback.multisamples = 0;
                WindowedContext::from_winit_window(&window, fallback)
            })
            .expect("failed to create WebGL context");

        let mut frame_input_generator = FrameInputGenerator::from_winit_window(&window);

        // Shared unit arrow along +X; instances orient it per basis vector.
        let mut arrow = CpuMesh::arrow(0.85, 0.5, 16);
        arrow
            .transform(Mat4::from_nonuniform_scale(1.0, 0.03, 0.03))
            .expect("arrow transform");

        let mut reference_material = PhysicalMaterial::new_opaque(
            &gl,
            &CpuMaterial {
                albedo: Srgba::WHITE,
                roughness: 0.7,
                metallic: 0.3,
                ..Default::default()
            },
        );
        reference_material.render_states.cull = Cull::Back;
        let reference_arrows = Gm::new(
            InstancedMesh::new(&gl, &frame_instances(&Frame::default(), 255), &arrow),
            reference_material,
        );

        let mut rotated_material = PhysicalMaterial::new_transparent(
            &gl,
            &CpuMaterial {
                albedo: Srgba::WHITE,
                roughness: 0.7,
                metallic: 0.3,
                ..Default::default()
            },
        );
        rotated_material.render_states.cull = Cull::Back;
        let mut rotated_arrows = Gm::new(
            InstancedMesh::new(&gl, &frame_instances(&Frame::default(), 150), &arrow),
            rotated_material,
        );

        // Unit basis vectors only, so the scene stays inside [-1, 1] per axis.
        let (w, h): (u32, u32) = window.inner_size().into();
        let viewport = Viewport::new_at_origo(w, h);
        let mut camera = Camera::new_perspective(
            viewport,
            vec3(2.2, 1.6, 1.2),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            degrees(45.0),
            0.1,
            100.0,
        );
        let mut control = OrbitControl::new(camera.target(), 1.0, 20.0);

        let light0 = DirectionalLight::new(&gl, 1.0, Srgba::WHITE, vec3(0.0, -0.5, -0.5));
        let light1 = DirectionalLight::new(&gl, 1.0, Srgba::WHITE, vec3(0.0, 0.5, 0.5));

        // Request initial render (frame Effect will also trigger on mount)
        request_redraw();

        event_loop.run(move |event, _, control_flow| {
            match &event {
                Event::UserEvent(()) => {
                    // Rotation changed from Leptos - request a redraw
                    window.request_redraw();
                }
                Event::MainEventsCleared => {
                    // Reactive loop: do NOT request redraw here. We only redraw on
                    // UserEvent (rotation change) or WindowEvent (user interaction).
                }
                Event::RedrawRequested(_) => {
                    let mut frame_input = frame_input_generator.generate(&gl);
                    let canvas_viewport = {
                        let canvas = leptos::tachys::dom::document()
                            .get_element_by_id("frame-canvas")
                            .unwrap()
                            .unchecked_into::<leptos::web_sys::HtmlCanvasElement>();
                        let dpr = leptos::web_sys::window().unwrap().device_pixel_ratio();
                        let css_width = canvas.client_width() as f64;
                        let css_height = canvas.client_height() as f64;
                        let buffer_width = (css_width * dpr) as u32;
                        let buffer_height = (css_height * dpr) as u32;
                        if canvas.width() != buffer_width || canvas.height() != buffer_height {
                            canvas.set_width(buffer_width);
                            canvas.set_height(buffer_height);
                        }
                        Viewport {
                            x: 0,
                            y: 0,
                            width: buffer_width,
                            height: buffer_height,
                        }
                    };

                    camera.set_viewport(canvas_viewport);
                    control.handle_events(&mut camera, &mut frame_input.events);

                    let rotated = frame_for_renderer.borrow();
                    rotated_arrows
                        .geometry
                        .set_instances(&frame_instances(&rotated, 150));
                    frame_input
                        .screen()
                        .clear(ClearState::color_and_depth(0.0, 0.0, 0.0, 1.0, 1.0))
                        .render(
                            &camera,
                            (&reference_arrows).into_iter().chain(&rotated_arrows),
                            &[&light0, &light1],
                        );

                    let _ = gl.swap_buffers();

                    // Reactive: wait for next event instead of continuous 60 FPS
                    *control_flow = ControlFlow::Wait;
                }
                Event::WindowEvent { event, .. } => {
                    frame_input_generator.handle_winit_window_event(event);
                    match event {
                        WindowEvent::Resized(physical_size) => {
                            gl.resize(*physical_size);
                        }
                        WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                            gl.resize(**new_inner_size);
                        }
                        WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                        _ => {}
                    }
                    if window_event_needs_redraw(event) {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        });
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn run_three_d(_frame_for_renderer: Rc<RefCell<Frame>>) {
    // Native build: the controls mount, but the 3D view needs a browser canvas.
    unimplemented!("3D frame view is WASM-only for now; use trunk serve");
}

pub fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        use winit::event_loop::EventLoop;

        let frame_for_renderer = Rc::new(RefCell::new(Frame::default()));
        let frame_for_app = frame_for_renderer.clone();

        let event_loop = EventLoop::new();
        let redraw_proxy = event_loop.create_proxy();
        let request_redraw: RequestRedraw = Rc::new(move || {
            let _ = redraw_proxy.send_event(());
        });
        let request_redraw_for_app = request_redraw.clone();

        let leptos_root = leptos::tachys::dom::document()
            .get_element_by_id("leptos-app")
            .expect("should find #leptos-app element")
            .unchecked_into::<leptos::web_sys::HtmlElement>();

        mount_to(leptos_root, move || {
            view! {
                <App frame_for_renderer=frame_for_app.clone() request_redraw=request_redraw_for_app.clone() />
            }
        })
        .forget();

        run_three_d(frame_for_renderer, request_redraw, event_loop);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let frame_for_renderer = Rc::new(RefCell::new(Frame::default()));
        let frame_for_app = frame_for_renderer.clone();

        let leptos_root = leptos::tachys::dom::document()
            .get_element_by_id("leptos-app")
            .expect("should find #leptos-app element")
            .unchecked_into::<leptos::web_sys::HtmlElement>();

        mount_to(leptos_root, move || {
            view! {
                <App frame_for_renderer=frame_for_app.clone() />
            }
        })
        .forget();

        run_three_d(frame_for_renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_frames_near(a: Frame, b: Frame) {
        for (ca, cb) in a.columns().iter().zip(b.columns()) {
            for i in 0..3 {
                assert!(
                    (ca[i] - cb[i]).abs() < 1e-5,
                    "frames differ: {:?} vs {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn zero_angle_stages_leave_the_frame_alone() {
        let frame = rotated_frame(&[(Axis::X, 0.0), (Axis::Z, 0.0)]);
        assert_eq!(frame, Frame::default());
    }

    #[test]
    fn identity_stages_match_the_single_rotation() {
        let combined = rotated_frame(&[(Axis::X, 90.0), (Axis::Y, 0.0), (Axis::Z, 0.0)]);
        let single = rotated_frame(&[(Axis::X, 90.0)]);
        assert_frames_near(combined, single);
    }

    #[test]
    fn stage_order_matters() {
        let xy = rotated_frame(&[(Axis::X, 90.0), (Axis::Y, 90.0)]);
        let yx = rotated_frame(&[(Axis::Y, 90.0), (Axis::X, 90.0)]);
        assert_ne!(xy, yx);
    }

    #[test]
    fn full_turn_stages_return_to_the_identity_basis() {
        let frame = rotated_frame(&[(Axis::Y, 360.0), (Axis::Z, 360.0)]);
        assert_frames_near(frame, Frame::default());
    }

    #[test]
    fn readout_formats_signed_components() {
        let s = format_basis_vector(Vector3::new(0.0, 1.0, -0.5));
        assert_eq!(s, "(+0.000, +1.000, -0.500)");
    }
}
