use chrono::{DateTime, Local};
use gloo_net::http::Request;
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::reading_details::ReadingDetails;
use super::sensor_map::SensorMap;
use crate::config::{SENSORS_ENDPOINT, TYPE_FILTER_KEY};
use crate::markers::plan_markers;
use crate::model::{sensor_type_options, SensorFeed, SensorReading};

/// Owns the sensor data: loads it, lets the user pick a sensor type and shows
/// whatever the map reports as clicked.
#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let feed = use_state(SensorFeed::default);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let loaded_at = use_state(|| None::<DateTime<Local>>);
    let reload = use_state(|| 0u32);
    let selected_type = use_state(stored_type_filter);
    let clicked = use_state(|| None::<SensorReading>);

    // Fetch readings on mount and on every reload request
    {
        let feed = feed.clone();
        let loading = loading.clone();
        let error = error.clone();
        let loaded_at = loaded_at.clone();

        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match fetch_readings().await {
                        Ok(readings) => {
                            gloo_console::log!("loaded", readings.len(), "sensor readings");
                            feed.set(SensorFeed::new(readings));
                            loaded_at.set(Some(Local::now()));
                            error.set(None);
                        }
                        Err(e) => {
                            gloo_console::error!("Failed to load sensor readings:", e.clone());
                            error.set(Some(e));
                        }
                    }
                    loading.set(false);
                });
                || ()
            },
            *reload,
        );
    }

    let on_reload = {
        let reload = reload.clone();
        Callback::from(move |_: MouseEvent| {
            reload.set(*reload + 1);
        })
    };

    let on_type_change = {
        let selected_type = selected_type.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            if value.is_empty() {
                LocalStorage::delete(TYPE_FILTER_KEY);
                selected_type.set(None);
            } else {
                if let Err(e) = LocalStorage::set(TYPE_FILTER_KEY, value.clone()) {
                    gloo_console::warn!("Could not store type filter:", e.to_string());
                }
                selected_type.set(Some(value));
            }
        })
    };

    let on_marker_click = {
        let clicked = clicked.clone();
        Callback::from(move |reading: SensorReading| {
            clicked.set(Some(reading));
        })
    };

    let current_type = (*selected_type).clone().unwrap_or_default();
    let mapped = plan_markers(feed.readings(), selected_type.as_deref()).len();

    html! {
        <div class="dashboard-container">
            <header class="dashboard-header">
                <h1>{"🌡 Sensor map"}</h1>
                <div class="dashboard-controls">
                    <select class="type-filter" onchange={on_type_change}>
                        <option value="" selected={current_type.is_empty()}>{"All sensors"}</option>
                        { for sensor_type_options(feed.readings(), selected_type.as_deref()).into_iter().map(|tag| {
                            let is_selected = tag == current_type;
                            html! { <option value={tag.clone()} selected={is_selected}>{tag}</option> }
                        }) }
                    </select>
                    <button class="btn" onclick={on_reload}>{"Reload"}</button>
                </div>
                <small class="dashboard-status">
                    {format!("{} readings, {} on map", feed.len(), mapped)}
                    if let Some(at) = *loaded_at {
                        {format!(" · loaded {}", at.format("%H:%M:%S"))}
                    }
                </small>
            </header>

            if let Some(err) = &*error {
                <div class="error">{format!("Error: {}", err)}</div>
            }

            <main class="dashboard-main">
                if *loading {
                    <div class="loading">{"Loading sensor readings..."}</div>
                } else {
                    <SensorMap
                        feed={(*feed).clone()}
                        selected_type={(*selected_type).clone()}
                        on_marker_click={on_marker_click}
                    />
                }
                <ReadingDetails reading={(*clicked).clone()} />
            </main>
        </div>
    }
}

fn stored_type_filter() -> Option<String> {
    LocalStorage::get::<String>(TYPE_FILTER_KEY)
        .ok()
        .filter(|tag| !tag.is_empty())
}

async fn fetch_readings() -> Result<Vec<SensorReading>, String> {
    let request = Request::get(SENSORS_ENDPOINT)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if request.status() == 200 {
        request
            .json::<Vec<SensorReading>>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!("Server error: {}", request.status()))
    }
}
