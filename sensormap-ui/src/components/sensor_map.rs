use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;
use yew::prelude::*;
use yew::{use_effect_with_deps, use_mut_ref, use_reducer};

use crate::config::{
    ICON_ANCHOR, ICON_SIZE, MAP_CENTER, MAP_ZOOM, POPUP_ANCHOR, SIMULATION_PERIOD_MS, TILE_ATTRIBUTION,
    TILE_URL,
};
use crate::markers::{plan_markers, MarkerPlan};
use crate::model::{SensorFeed, SensorReading};
use crate::simulation::simulate_tick;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L)]
    type Map;

    #[wasm_bindgen(js_namespace = L)]
    type TileLayer;

    #[wasm_bindgen(js_namespace = L)]
    type LayerGroup;

    #[wasm_bindgen(js_namespace = L)]
    type Marker;

    #[wasm_bindgen(js_namespace = L)]
    type Icon;

    #[wasm_bindgen(js_namespace = L)]
    type LatLng;

    #[wasm_bindgen(constructor, js_namespace = L)]
    fn new(element: &Element, options: &JsValue) -> Map;

    #[wasm_bindgen(constructor, js_namespace = L)]
    fn new(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(constructor, js_namespace = L)]
    fn new() -> LayerGroup;

    #[wasm_bindgen(constructor, js_namespace = L)]
    fn new(latlng: &LatLng, options: &JsValue) -> Marker;

    #[wasm_bindgen(constructor, js_namespace = L)]
    fn new(options: &JsValue) -> Icon;

    #[wasm_bindgen(constructor, js_namespace = L)]
    fn new(lat: f64, lng: f64) -> LatLng;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, center: &LatLng, zoom: u8);

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &Map, options: &JsValue);

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_map(this: &Map);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &Map);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_group_to(this: &LayerGroup, map: &Map);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LayerGroup, layer: &Marker);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_marker_to(this: &Marker, group: &LayerGroup);

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Marker, content: &str);

    #[wasm_bindgen(method, js_name = setPopupContent)]
    fn set_popup_content(this: &Marker, content: &str);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Marker, latlng: &LatLng);

    #[wasm_bindgen(method, js_name = setIcon)]
    fn set_icon(this: &Marker, icon: &Icon);

    #[wasm_bindgen(method, js_name = on)]
    fn on(this: &Marker, event: &str, handler: &js_sys::Function);
}

#[derive(Properties, Clone, PartialEq)]
pub struct SensorMapProps {
    pub feed: SensorFeed,
    #[prop_or_default]
    pub selected_type: Option<String>,
    pub on_marker_click: Callback<SensorReading>,
}

/// The widget's own copy of the readings. The simulation mutates this, never
/// the feed it was taken from.
#[derive(Debug, PartialEq)]
struct WorkingCopy {
    readings: Vec<SensorReading>,
    /// Bumped on every change; drives marker redraws.
    generation: u64,
}

impl WorkingCopy {
    fn new(feed: &SensorFeed) -> Self {
        Self {
            readings: feed.readings().to_vec(),
            generation: 0,
        }
    }
}

enum WorkingCopyAction {
    Reset(SensorFeed),
    Simulate,
}

impl Reducible for WorkingCopy {
    type Action = WorkingCopyAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let readings = match action {
            WorkingCopyAction::Reset(feed) => feed.readings().to_vec(),
            WorkingCopyAction::Simulate => simulate_tick(&self.readings, &mut rand::thread_rng()),
        };
        Rc::new(WorkingCopy {
            readings,
            generation: self.generation + 1,
        })
    }
}

/// What the widget body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapContent {
    NoData,
    Map,
}

impl MapContent {
    /// Only an empty working copy hides the map; readings that all lack
    /// coordinates still get a map, just without markers.
    fn for_readings(readings: &[SensorReading]) -> Self {
        if readings.is_empty() {
            MapContent::NoData
        } else {
            MapContent::Map
        }
    }
}

/// Leaflet instance held by the widget. `Unavailable` remembers a failed
/// mount so redraws do not retry it.
enum MapSlot<M> {
    Empty,
    Ready(M),
    Unavailable,
}

impl<M> MapSlot<M> {
    fn ready_or_mount(&mut self, mount: impl FnOnce() -> Option<M>) -> Option<&mut M> {
        if let MapSlot::Empty = self {
            *self = match mount() {
                Some(map) => MapSlot::Ready(map),
                None => MapSlot::Unavailable,
            };
        }
        match self {
            MapSlot::Ready(map) => Some(map),
            _ => None,
        }
    }

    /// Drop a mounted map; a failed mount stays failed.
    fn release(&mut self) {
        if let MapSlot::Ready(_) = self {
            *self = MapSlot::Empty;
        }
    }

    fn clear(&mut self) {
        *self = MapSlot::Empty;
    }
}

#[function_component(SensorMap)]
pub fn sensor_map(props: &SensorMapProps) -> Html {
    let map_ref = use_node_ref();
    let working = use_reducer(|| WorkingCopy::new(&props.feed));
    let leaflet = use_mut_ref(|| MapSlot::<LeafletMap>::Empty);

    // Marker closures read the callback through this cell so a parent
    // re-render does not force every marker to be rebuilt.
    let click_target = use_mut_ref(Callback::<SensorReading>::noop);
    *click_target.borrow_mut() = props.on_marker_click.clone();

    // New feed: replace the working copy and re-arm the simulation timer
    {
        let working = working.clone();

        use_effect_with_deps(
            move |feed: &SensorFeed| {
                working.dispatch(WorkingCopyAction::Reset(feed.clone()));

                let ticker = working.clone();
                let interval = Interval::new(SIMULATION_PERIOD_MS, move || {
                    gloo_console::log!("simulating", ticker.readings.len(), "sensor readings");
                    ticker.dispatch(WorkingCopyAction::Simulate);
                });

                move || {
                    drop(interval);
                }
            },
            props.feed.clone(),
        );
    }

    // Sync Leaflet with the working copy and the type filter
    {
        let deps = (working.generation, props.selected_type.clone());
        let map_ref = map_ref.clone();
        let leaflet = leaflet.clone();
        let working = working.clone();
        let click_target = click_target.clone();

        use_effect_with_deps(
            move |(_, selected_type): &(u64, Option<String>)| {
                let mut slot = leaflet.borrow_mut();
                match MapContent::for_readings(&working.readings) {
                    // The map element is gone; release the Leaflet instance with it
                    MapContent::NoData => slot.release(),
                    MapContent::Map => {
                        if let Some(element) = map_ref.cast::<Element>() {
                            if let Some(map) = slot.ready_or_mount(|| LeafletMap::mount(&element)) {
                                let plans = plan_markers(&working.readings, selected_type.as_deref());
                                map.sync_markers(&plans, &click_target);
                            }
                        }
                    }
                }
                || {}
            },
            deps,
        );
    }

    // Tear the map down on unmount
    {
        let leaflet = leaflet.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    leaflet.borrow_mut().clear();
                }
            },
            (),
        );
    }

    html! {
        <div class="sensor-map-container">
            if MapContent::for_readings(&working.readings) == MapContent::NoData {
                <p class="sensor-map-empty">{"📡 No sensor data available"}</p>
            } else {
                <div class="sensor-map" ref={map_ref} style="height: 500px; width: 100%;"></div>
            }
        </div>
    }
}

/// A marker on the map and the reading its click handler reports.
struct PlacedMarker {
    marker: Marker,
    icon_url: &'static str,
    reading: Rc<RefCell<SensorReading>>,
    _on_click: Closure<dyn FnMut()>,
}

/// Leaflet map owned by one `SensorMap` instance. Dropping it removes the map
/// from the page.
struct LeafletMap {
    map: Map,
    layer: LayerGroup,
    markers: HashMap<usize, PlacedMarker>,
}

impl LeafletMap {
    fn mount(element: &Element) -> Option<Self> {
        if !leaflet_available() {
            gloo_console::warn!("Leaflet (global `L`) is not loaded; sensor map disabled");
            return None;
        }

        element.set_inner_html("");

        let rect = element.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            if let Some(html_element) = element.dyn_ref::<web_sys::HtmlElement>() {
                let _ = html_element.style().set_property("min-height", "500px");
                let _ = html_element.style().set_property("display", "block");
            }
        }

        let map = Map::new(element, &JsValue::from(js_sys::Object::new()));
        map.set_view(&LatLng::new(MAP_CENTER.0, MAP_CENTER.1), MAP_ZOOM);

        let tile_options = js_sys::Object::new();
        set_option(&tile_options, "attribution", &TILE_ATTRIBUTION.into());
        TileLayer::new(TILE_URL, &tile_options.into()).add_to(&map);

        let layer = LayerGroup::new();
        layer.add_group_to(&map);

        map.invalidate_size(&JsValue::from(js_sys::Object::new()));

        Some(Self {
            map,
            layer,
            markers: HashMap::new(),
        })
    }

    /// Bring the markers in line with `plans`: update the ones that stay,
    /// add new ones, drop the rest. Open popups survive a simulation tick.
    fn sync_markers(&mut self, plans: &[MarkerPlan<'_>], click_target: &Rc<RefCell<Callback<SensorReading>>>) {
        let keep: Vec<usize> = plans.iter().map(|plan| plan.index).collect();
        let stale: Vec<usize> = self
            .markers
            .keys()
            .filter(|index| !keep.contains(*index))
            .copied()
            .collect();
        for index in stale {
            if let Some(placed) = self.markers.remove(&index) {
                self.layer.remove_layer(&placed.marker);
            }
        }

        for plan in plans {
            let latlng = LatLng::new(plan.position.0, plan.position.1);

            if let Some(placed) = self.markers.get_mut(&plan.index) {
                placed.marker.set_lat_lng(&latlng);
                if placed.icon_url != plan.icon_url {
                    placed.marker.set_icon(&marker_icon(plan.icon_url));
                    placed.icon_url = plan.icon_url;
                }
                placed.marker.set_popup_content(&plan.popup);
                *placed.reading.borrow_mut() = plan.reading.clone();
                continue;
            }

            let marker_options = js_sys::Object::new();
            set_option(&marker_options, "icon", &marker_icon(plan.icon_url));
            let marker = Marker::new(&latlng, &marker_options.into());
            marker.bind_popup(&plan.popup);

            let reading = Rc::new(RefCell::new(plan.reading.clone()));
            let on_click = {
                let reading = reading.clone();
                let click_target = click_target.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let clicked = reading.borrow().clone();
                    click_target.borrow().emit(clicked);
                })
            };
            marker.on("click", on_click.as_ref().unchecked_ref());
            marker.add_marker_to(&self.layer);

            self.markers.insert(
                plan.index,
                PlacedMarker {
                    marker,
                    icon_url: plan.icon_url,
                    reading,
                    _on_click: on_click,
                },
            );
        }
    }
}

impl Drop for LeafletMap {
    fn drop(&mut self) {
        self.markers.clear();
        self.map.remove_map();
    }
}

fn leaflet_available() -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &"L".into()).ok())
        .map(|l_obj| !l_obj.is_undefined())
        .unwrap_or(false)
}

fn marker_icon(icon_url: &str) -> Icon {
    let options = js_sys::Object::new();
    set_option(&options, "iconUrl", &icon_url.into());
    set_option(&options, "iconSize", &pixel_pair(ICON_SIZE.0 as i32, ICON_SIZE.1 as i32));
    set_option(&options, "iconAnchor", &pixel_pair(ICON_ANCHOR.0 as i32, ICON_ANCHOR.1 as i32));
    set_option(&options, "popupAnchor", &pixel_pair(POPUP_ANCHOR.0, POPUP_ANCHOR.1));
    Icon::new(&options.into())
}

fn pixel_pair(x: i32, y: i32) -> JsValue {
    js_sys::Array::of2(&x.into(), &y.into()).into()
}

fn set_option(options: &js_sys::Object, key: &str, value: &JsValue) {
    // Reflect::set only fails on frozen objects or proxies
    let _ = js_sys::Reflect::set(options, &key.into(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reading;
    use crate::simulation::{CO2_RANGE, TEMPERATURE_RANGE};

    fn in_range(value: Option<f64>, (min, max): (f64, f64)) -> bool {
        value.map_or(false, |v| v >= min && v <= max)
    }

    #[test]
    fn test_new_feed_replaces_simulated_copy() {
        let first = SensorFeed::new(vec![
            reading("DHT22", Some(50.74), Some(25.32)),
            reading("MQ-135", Some(50.75), Some(25.33)),
        ]);
        let state = Rc::new(WorkingCopy::new(&first));
        assert_eq!(state.generation, 0);

        let state = state.reduce(WorkingCopyAction::Reset(first.clone()));
        assert_eq!(state.generation, 1);
        assert_eq!(state.readings, first.readings());

        let state = state.reduce(WorkingCopyAction::Simulate);
        assert_eq!(state.generation, 2);
        assert!(in_range(state.readings[0].temperature, TEMPERATURE_RANGE));
        assert!(in_range(state.readings[1].co2, CO2_RANGE));
        // The feed itself is never touched by the simulation
        assert_eq!(first.readings()[0].temperature, None);

        let second = SensorFeed::new(vec![reading("PMS5003", Some(1.0), Some(2.0))]);
        let state = state.reduce(WorkingCopyAction::Reset(second.clone()));
        assert_eq!(state.generation, 3);
        assert_eq!(state.readings, second.readings());
    }

    #[test]
    fn test_simulating_empty_copy() {
        let state = Rc::new(WorkingCopy::new(&SensorFeed::default()));
        let state = state.reduce(WorkingCopyAction::Simulate);
        assert!(state.readings.is_empty());
        assert_eq!(state.generation, 1);
        assert_eq!(MapContent::for_readings(&state.readings), MapContent::NoData);
    }

    #[test]
    fn test_map_content() {
        assert_eq!(MapContent::for_readings(&[]), MapContent::NoData);
        assert_eq!(
            MapContent::for_readings(&[reading("DHT22", Some(50.74), Some(25.32))]),
            MapContent::Map
        );
        // No coordinates anywhere still means a map, just an empty one
        assert_eq!(
            MapContent::for_readings(&[reading("DHT22", None, None)]),
            MapContent::Map
        );
    }

    #[test]
    fn test_slot_mounts_once() {
        let mut mounts = 0;
        let mut slot = MapSlot::Empty;

        for _ in 0..3 {
            let map = slot.ready_or_mount(|| {
                mounts += 1;
                Some(7_u32)
            });
            assert_eq!(map.copied(), Some(7));
        }
        assert_eq!(mounts, 1);

        slot.release();
        assert_eq!(slot.ready_or_mount(|| Some(8)).copied(), Some(8));
    }

    #[test]
    fn test_slot_remembers_failed_mount() {
        let mut attempts = 0;
        let mut slot = MapSlot::<u32>::Empty;

        for _ in 0..3 {
            let map = slot.ready_or_mount(|| {
                attempts += 1;
                None
            });
            assert!(map.is_none());
        }
        assert_eq!(attempts, 1);

        // Losing the data does not retry the mount either
        slot.release();
        assert!(slot.ready_or_mount(|| Some(1)).is_none());

        slot.clear();
        assert_eq!(slot.ready_or_mount(|| Some(1)).copied(), Some(1));
    }
}
