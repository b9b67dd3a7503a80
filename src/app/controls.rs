//! Controls for one rotation stage: an angle slider in degrees and a
//! dropdown choosing the rotation axis.

use leptos::prelude::*;
use leptos::wasm_bindgen::JsCast;
use leptos::web_sys::HtmlSelectElement;

use crate::app::rotation::Axis;
use crate::app::slider_widget::{CustomSlider, CustomSliderConfig};

fn select_event_value(ev: &leptos::web_sys::Event) -> String {
    ev.target()
        .unwrap()
        .unchecked_into::<HtmlSelectElement>()
        .value()
}

#[component]
pub fn RotationControls(
    /// Heading shown above the controls (e.g., "Rotation 1").
    label: &'static str,
    /// Angle in degrees, bounded to [0, 360] by the slider.
    angle_deg: RwSignal<f64>,
    /// Rotation axis, one of the three standard basis vectors.
    axis: RwSignal<Axis>,
) -> impl IntoView {
    let angle_config = CustomSliderConfig::angle_degrees_full_turn();

    let on_axis_change = move |ev: leptos::web_sys::Event| {
        let value = select_event_value(&ev);
        if let Some(selected) = Axis::from_label(&value) {
            axis.set(selected);
        }
    };

    view! {
        <div class="control-section">
            <h2>{label}</h2>
            <CustomSlider
                label="angle (°)"
                config=angle_config
                value=angle_deg
            />
            <div class="axis-row">
                "Axis: "
                <select
                    prop:value=move || axis.get().label()
                    on:change=on_axis_change
                >
                    {Axis::ALL.iter().map(|a| {
                        let label = a.label();
                        view! { <option value=label>{label}</option> }
                    }).collect_view()}
                </select>
            </div>
        </div>
    }
}
