use chrono::Utc;
use mongodb::bson::doc;
use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        event::{EventDescription, EventPatch, EventSpec},
        message::Message,
        valid::Valid,
    },
    db::event::{Event, NewEvent},
    mongodb::{Coll, Id},
};

const EVENT: &str = "Event";

pub fn routes() -> Vec<Route> {
    routes![
        create_event,
        get_events,
        get_event,
        get_events_by_creator,
        update_event,
        delete_event,
    ]
}

#[post("/", data = "<spec>")]
async fn create_event(
    spec: Valid<EventSpec>,
    new_events: Coll<NewEvent>,
    events: Coll<Event>,
) -> Result<Json<EventDescription>> {
    let event = spec.into_inner().into_new_event(Utc::now());
    let new_id = new_events.insert_one(&event).await?;

    // Retrieve the full event information including ID.
    let event = events.find_by_id(new_id).await?.ok_or_else(|| {
        Error::Internal(format!("Event {new_id} vanished straight after insert"))
    })?;
    Ok(Json(event.into()))
}

#[get("/")]
async fn get_events(events: Coll<Event>) -> Result<Json<Vec<EventDescription>>> {
    let events = events.find(doc! {}).await?;
    Ok(Json(events.into_iter().map(EventDescription::from).collect()))
}

#[get("/<event_id>")]
async fn get_event(event_id: Option<Id>, events: Coll<Event>) -> Result<Json<EventDescription>> {
    let event_id = event_id.ok_or_else(|| Error::not_found(EVENT))?;
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| Error::not_found(EVENT))?;
    Ok(Json(event.into()))
}

#[get("/creator/<creator_id>")]
async fn get_events_by_creator(
    creator_id: &str,
    events: Coll<Event>,
) -> Result<Json<Vec<EventDescription>>> {
    let events = events.find(doc! { "created_by": creator_id }).await?;
    Ok(Json(events.into_iter().map(EventDescription::from).collect()))
}

#[put("/<event_id>", data = "<patch>")]
async fn update_event(
    event_id: Option<Id>,
    patch: Valid<EventPatch>,
    events: Coll<Event>,
) -> Result<Json<Message>> {
    let event_id = event_id.ok_or_else(|| Error::not_found(EVENT))?;
    let fields = patch.into_inner().into_fields()?;
    if !events.set_fields(event_id, fields).await? {
        return Err(Error::not_found(EVENT));
    }
    Ok(Json(Message::new("Event updated successfully")))
}

#[delete("/<event_id>")]
async fn delete_event(event_id: Option<Id>, events: Coll<Event>) -> Result<Json<Message>> {
    let event_id = event_id.ok_or_else(|| Error::not_found(EVENT))?;
    if !events.delete_one(event_id).await? {
        return Err(Error::not_found(EVENT));
    }
    Ok(Json(Message::new("Event deleted successfully")))
}
