use rocket::{serde::json::Json, Build, Request, Rocket};

use crate::error::ErrorDetail;
use crate::model::api::valid::ValidationReport;

mod attendance;
mod events;
mod users;

/// Mount every resource and register the JSON error catchers.
pub fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/users", users::routes())
        .mount("/events", events::routes())
        .mount("/attendances", attendance::routes())
        .register("/", catchers![unprocessable, not_found, internal_error])
}

/// Render the report left behind by a failed `Valid<T>` guard.
#[catch(422)]
fn unprocessable(req: &Request) -> Json<ValidationReport> {
    let report = req.local_cache(ValidationReport::default);
    if report.detail.is_empty() {
        return Json(ValidationReport::body("Unprocessable request body"));
    }
    Json(report.clone())
}

#[catch(404)]
fn not_found() -> Json<ErrorDetail> {
    Json(ErrorDetail::new("Not Found"))
}

#[catch(500)]
fn internal_error() -> Json<ErrorDetail> {
    Json(ErrorDetail::new("Internal Server Error"))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
    };

    use super::*;

    #[backend_test]
    async fn unknown_routes_are_json(client: Client) {
        let response = client.get("/nowhere").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let detail: ErrorDetail = response.into_json().await.unwrap();
        assert_eq!(detail.detail, "Not Found");
    }

    #[backend_test]
    async fn rejected_bodies_are_described(client: Client) {
        let response = client
            .post("/events")
            .header(ContentType::JSON)
            .body(r#"{"title": "Demo"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let report: ValidationReport = response.into_json().await.unwrap();
        let locs: Vec<_> = report.detail.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, vec!["created_by", "active", "start_time", "end_time"]);
        assert!(report.detail.iter().all(|e| e.msg == "Field required"));

        let response = client
            .post("/events")
            .header(ContentType::JSON)
            .body("[]")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let report: ValidationReport = response.into_json().await.unwrap();
        assert_eq!(report.detail[0].loc, "body");
    }
}
