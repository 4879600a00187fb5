use chrono::Utc;
use mongodb::bson::doc;
use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        attendance::{AttendanceDescription, AttendanceSpec},
        message::{Created, Message},
        valid::Valid,
    },
    db::attendance::{Attendance, NewAttendance},
    mongodb::{Coll, Id},
};

const ATTENDANCE: &str = "Attendance";

pub fn routes() -> Vec<Route> {
    routes![
        record_attendance,
        get_attendances,
        get_attendance,
        get_event_attendances,
        get_user_attendances,
        delete_attendance,
    ]
}

/// Record that a user attended an event. Neither ID is checked against the
/// users or events collections.
#[post("/", data = "<spec>")]
async fn record_attendance(
    spec: Valid<AttendanceSpec>,
    new_attendances: Coll<NewAttendance>,
) -> Result<Json<Created>> {
    let attendance = spec.into_inner().into_new_attendance(Utc::now());
    let id = new_attendances.insert_one(&attendance).await?;
    Ok(Json(Created::new("Attendance recorded", id)))
}

#[get("/")]
async fn get_attendances(
    attendances: Coll<Attendance>,
) -> Result<Json<Vec<AttendanceDescription>>> {
    list(&attendances, doc! {}).await
}

#[get("/<attendance_id>")]
async fn get_attendance(
    attendance_id: Option<Id>,
    attendances: Coll<Attendance>,
) -> Result<Json<AttendanceDescription>> {
    let attendance_id = attendance_id.ok_or_else(|| Error::not_found(ATTENDANCE))?;
    let attendance = attendances
        .find_by_id(attendance_id)
        .await?
        .ok_or_else(|| Error::not_found(ATTENDANCE))?;
    Ok(Json(attendance.into()))
}

#[get("/event/<event_id>")]
async fn get_event_attendances(
    event_id: &str,
    attendances: Coll<Attendance>,
) -> Result<Json<Vec<AttendanceDescription>>> {
    list(&attendances, doc! { "event_id": event_id }).await
}

#[get("/user/<user_id>")]
async fn get_user_attendances(
    user_id: &str,
    attendances: Coll<Attendance>,
) -> Result<Json<Vec<AttendanceDescription>>> {
    list(&attendances, doc! { "user_id": user_id }).await
}

#[delete("/<attendance_id>")]
async fn delete_attendance(
    attendance_id: Option<Id>,
    attendances: Coll<Attendance>,
) -> Result<Json<Message>> {
    let attendance_id = attendance_id.ok_or_else(|| Error::not_found(ATTENDANCE))?;
    if !attendances.delete_one(attendance_id).await? {
        return Err(Error::not_found(ATTENDANCE));
    }
    Ok(Json(Message::new("Attendance deleted")))
}

async fn list(
    attendances: &Coll<Attendance>,
    filter: mongodb::bson::Document,
) -> Result<Json<Vec<AttendanceDescription>>> {
    let attendances = attendances.find(filter).await?;
    Ok(Json(
        attendances
            .into_iter()
            .map(AttendanceDescription::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::{json, serde_json, Value},
    };

    use crate::error::ErrorDetail;

    use super::*;

    #[backend_test]
    async fn record_then_get(client: Client, attendances: Coll<Attendance>) {
        let spec = AttendanceSpec::example("u1", "e1");
        let before = Utc::now() - Duration::seconds(1);
        let created = record(&client, &spec).await;
        assert_eq!(created.message, "Attendance recorded");

        let stored = attendances.find_by_id(*created.id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.event_id, "e1");

        let response = client
            .get(format!("/attendances/{}", created.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let fetched: AttendanceDescription = response.into_json().await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.questionnaire_answers, spec.questionnaire_answers.unwrap());
        assert_eq!(fetched.questionnaire_answers["q3"], json!(["Keynote", "Workshop"]));
        assert!(fetched.attended_at >= before);
        assert!(fetched.attended_at <= Utc::now() + Duration::seconds(1));
    }

    #[backend_test]
    async fn dangling_references_are_accepted(client: Client) {
        // Neither the user nor the event exist.
        let spec = AttendanceSpec::example(&Id::new().to_string(), "no-such-event");
        record(&client, &spec).await;

        let listed = get_list(&client, "/attendances/event/no-such-event").await;
        assert_eq!(listed.len(), 1);
    }

    #[backend_test]
    async fn answers_are_optional(client: Client) {
        let response = post(&client, json!({"user_id": "u1", "event_id": "e1"})).await;
        assert_eq!(response.status(), Status::Ok);
        let created: Created = response.into_json().await.unwrap();

        let response = client
            .get(format!("/attendances/{}", created.id))
            .dispatch()
            .await;
        let fetched: Value = response.into_json().await.unwrap();
        assert_eq!(fetched["questionnaire_answers"], json!({}));
    }

    #[backend_test]
    async fn invalid_records_are_rejected(client: Client, attendances: Coll<Attendance>) {
        for body in [
            json!({"user_id": "u1"}),
            json!({"user_id": "u1", "event_id": 4}),
            json!({"user_id": "u1", "event_id": "e1", "questionnaire_answers": ["yes"]}),
        ] {
            let response = post(&client, body).await;
            assert_eq!(response.status(), Status::UnprocessableEntity);
        }
        assert!(attendances.find(doc! {}).await.unwrap().is_empty());
    }

    #[backend_test]
    async fn attended_at_comes_from_the_server(client: Client) {
        let response = post(
            &client,
            json!({"user_id": "u1", "event_id": "e1", "attended_at": "1999-01-01T00:00:00"}),
        )
        .await;
        assert_eq!(response.status(), Status::Ok);
        let listed = get_list(&client, "/attendances").await;
        assert!(listed[0].attended_at > Utc::now() - Duration::minutes(1));
    }

    #[backend_test]
    async fn filter_by_event_and_user(client: Client) {
        let a = record(&client, &AttendanceSpec::example("u1", "e1")).await;
        let b = record(&client, &AttendanceSpec::example("u2", "e1")).await;
        let c = record(&client, &AttendanceSpec::example("u1", "e2")).await;

        let ids = |listed: Vec<AttendanceDescription>| -> Vec<_> {
            listed.into_iter().map(|a| a.id).collect()
        };

        assert_eq!(
            ids(get_list(&client, "/attendances").await),
            vec![a.id, b.id, c.id]
        );
        assert_eq!(
            ids(get_list(&client, "/attendances/event/e1").await),
            vec![a.id, b.id]
        );
        assert_eq!(
            ids(get_list(&client, "/attendances/user/u1").await),
            vec![a.id, c.id]
        );
        assert!(get_list(&client, "/attendances/user/u3").await.is_empty());
        assert!(get_list(&client, "/attendances/event/e3").await.is_empty());
    }

    #[backend_test]
    async fn delete_twice(client: Client) {
        let created = record(&client, &AttendanceSpec::example("u1", "e1")).await;
        let uri = format!("/attendances/{}", created.id);

        let response = client.delete(uri.as_str()).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let message: Message = response.into_json().await.unwrap();
        assert_eq!(message.message, "Attendance deleted");

        let response = client.delete(uri.as_str()).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let detail: ErrorDetail = response.into_json().await.unwrap();
        assert_eq!(detail.detail, "Attendance not found");

        let response = client.get(uri.as_str()).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get("/attendances/zzz").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    async fn post(client: &Client, body: Value) -> rocket::local::asynchronous::LocalResponse<'_> {
        client
            .post("/attendances")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await
    }

    async fn record(client: &Client, spec: &AttendanceSpec) -> Created {
        let response = post(client, serde_json::to_value(spec).unwrap()).await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json().await.unwrap()
    }

    async fn get_list(client: &Client, uri: &str) -> Vec<AttendanceDescription> {
        let response = client.get(uri).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json().await.unwrap()
    }
}
