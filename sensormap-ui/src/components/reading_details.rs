use yew::prelude::*;

use crate::format::reading_fields;
use crate::model::SensorReading;

#[derive(Properties, Clone, PartialEq)]
pub struct ReadingDetailsProps {
    pub reading: Option<SensorReading>,
}

/// Side panel for the last marker the user clicked.
#[function_component(ReadingDetails)]
pub fn reading_details(props: &ReadingDetailsProps) -> Html {
    html! {
        <aside class="reading-details">
            <h3>{"Selected sensor"}</h3>
            if let Some(reading) = &props.reading {
                <dl>
                    if let Some(id) = reading.id {
                        <dt>{"#"}</dt>
                        <dd>{id.to_string()}</dd>
                    }
                    { for reading_fields(reading).into_iter().map(|field| html! {
                        <>
                            <dt>{format!("{} {}", field.icon, field.label)}</dt>
                            <dd>{field.value}</dd>
                        </>
                    }) }
                </dl>
            } else {
                <p class="reading-details-empty">{"Click a marker to see its readings"}</p>
            }
        </aside>
    }
}
