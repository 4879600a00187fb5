use rocket::{
    data::{self, Data, FromData},
    http::Status,
    outcome::Outcome,
    serde::json::{serde_json, Error as JsonError, Json, Value},
    Request,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Field-by-field structure of a request body, so that every offending field
/// can be reported at once rather than only the first one serde trips over.
pub trait CheckFields {
    fn check_fields(fields: &mut Fields<'_>);
}

/// A JSON request body that has been decoded and has passed its field checks.
///
/// On failure the request fails with 422, and the [`ValidationReport`] is
/// left in the request's local cache for the catcher to render.
#[derive(Debug)]
pub struct Valid<T>(T);

impl<T> Valid<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The dotted path of the field, or `body` when the problem is with the
    /// body as a whole.
    pub loc: String,
    pub msg: String,
}

/// Why a request body was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub detail: Vec<FieldError>,
}

impl ValidationReport {
    pub fn body(msg: impl Into<String>) -> Self {
        Self {
            detail: vec![FieldError {
                loc: "body".to_string(),
                msg: msg.into(),
            }],
        }
    }

    /// Run the field checks of `T` over a decoded JSON object.
    pub fn check<T: CheckFields>(body: &serde_json::Map<String, Value>) -> Self {
        let mut detail = Vec::new();
        T::check_fields(&mut Fields {
            body,
            prefix: String::new(),
            errors: &mut detail,
        });
        Self { detail }
    }
}

impl From<JsonError<'_>> for ValidationReport {
    fn from(err: JsonError<'_>) -> Self {
        match err {
            JsonError::Parse(_, e) => Self::body(e.to_string()),
            other => Self::body(other.to_string()),
        }
    }
}

/// Whether a field may be omitted or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and not `null`.
    Required,
    /// May be omitted or `null`.
    Optional,
    /// May be omitted, but not `null`.
    NotNull,
}

/// The fields of one JSON object under check, collecting failures.
pub struct Fields<'a> {
    body: &'a serde_json::Map<String, Value>,
    prefix: String,
    errors: &'a mut Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub fn push(&mut self, name: &str, msg: impl Into<String>) {
        self.errors.push(FieldError {
            loc: format!("{}{name}", self.prefix),
            msg: msg.into(),
        });
    }

    fn value(&mut self, name: &str, presence: Presence) -> Option<&'a Value> {
        let body: &'a serde_json::Map<String, Value> = self.body;
        match (body.get(name), presence) {
            (None, Presence::Required) => {
                self.push(name, "Field required");
                None
            }
            (None, _) | (Some(Value::Null), Presence::Optional) => None,
            (Some(Value::Null), _) => {
                self.push(name, "Field may not be null");
                None
            }
            (Some(value), _) => Some(value),
        }
    }

    /// Decode one field with a custom decoder, returning it if it is present
    /// and well formed.
    pub fn decode_with<T>(
        &mut self,
        name: &str,
        presence: Presence,
        decode: impl FnOnce(&'a Value) -> Result<T, serde_json::Error>,
    ) -> Option<T> {
        let value = self.value(name, presence)?;
        match decode(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                self.push(name, e.to_string());
                None
            }
        }
    }

    pub fn decode<T: DeserializeOwned>(&mut self, name: &str, presence: Presence) -> Option<T> {
        self.decode_with(name, presence, |value| T::deserialize(value))
    }

    /// Record a rule violation unless `ok`.
    pub fn rule(&mut self, name: &str, ok: bool, msg: &str) {
        if !ok {
            self.push(name, msg);
        }
    }

    /// Check a list of objects, each against the fields of `C`.
    pub fn each<C: CheckFields>(&mut self, name: &str, presence: Presence) {
        let items = match self.value(name, presence) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.push(name, "Input should be a valid list");
                return;
            }
            None => return,
        };
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::Object(body) => C::check_fields(&mut Fields {
                    body,
                    prefix: format!("{}{name}.{index}.", self.prefix),
                    errors: &mut *self.errors,
                }),
                _ => self.push(
                    &format!("{name}.{index}"),
                    "Input should be a valid dictionary",
                ),
            }
        }
    }
}

/// Check every field of the body, then decode it.
fn decode<T: DeserializeOwned + CheckFields>(value: Value) -> Result<T, ValidationReport> {
    let body = match value {
        Value::Object(body) => body,
        _ => return Err(ValidationReport::body("Input should be a valid dictionary")),
    };
    let report = ValidationReport::check::<T>(&body);
    if !report.detail.is_empty() {
        return Err(report);
    }
    serde_json::from_value(Value::Object(body)).map_err(|e| ValidationReport::body(e.to_string()))
}

#[rocket::async_trait]
impl<'r, T> FromData<'r> for Valid<T>
where
    T: DeserializeOwned + CheckFields + Send,
{
    type Error = ValidationReport;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        // The content type is not checked: any body is read as JSON.
        let report = match Json::<Value>::from_data(req, data).await {
            Outcome::Success(Json(value)) => match decode::<T>(value) {
                Ok(value) => return Outcome::Success(Valid(value)),
                Err(report) => report,
            },
            Outcome::Error((_, err)) => ValidationReport::from(err),
            Outcome::Forward(forward) => return Outcome::Forward(forward),
        };
        let report = req.local_cache(move || report).clone();
        Outcome::Error((Status::UnprocessableEntity, report))
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        #[allow(dead_code)]
        label: String,
    }

    impl CheckFields for Item {
        fn check_fields(fields: &mut Fields<'_>) {
            fields.decode::<String>("label", Presence::Required);
        }
    }

    #[derive(Debug, Deserialize)]
    struct Order {
        #[allow(dead_code)]
        count: u32,
        #[allow(dead_code)]
        note: Option<String>,
        #[allow(dead_code)]
        items: Option<Vec<Item>>,
    }

    impl CheckFields for Order {
        fn check_fields(fields: &mut Fields<'_>) {
            if let Some(count) = fields.decode::<u32>("count", Presence::Required) {
                fields.rule("count", count > 0, "must be positive");
            }
            fields.decode::<String>("note", Presence::Optional);
            fields.each::<Item>("items", Presence::Optional);
        }
    }

    fn locs(body: Value) -> Vec<String> {
        match decode::<Order>(body) {
            Ok(_) => vec![],
            Err(report) => report.detail.into_iter().map(|e| e.loc).collect(),
        }
    }

    #[test]
    fn well_formed_bodies_decode() {
        assert!(locs(json!({"count": 2})).is_empty());
        assert!(locs(json!({"count": 2, "note": null, "items": [{"label": "a"}]})).is_empty());
    }

    #[test]
    fn every_offending_field_is_reported() {
        assert_eq!(locs(json!({"note": 4})), vec!["count", "note"]);
        assert_eq!(locs(json!({"count": 0})), vec!["count"]);
        assert_eq!(
            locs(json!({"count": "x", "items": [{"label": "a"}, {}, 3]})),
            vec!["count", "items.1.label", "items.2"]
        );
        assert_eq!(locs(json!({"count": 1, "items": {}})), vec!["items"]);
    }

    #[test]
    fn non_objects_are_rejected_as_a_whole() {
        assert_eq!(locs(json!([1, 2])), vec!["body"]);
    }

    #[test]
    fn missing_and_null_have_distinct_messages() {
        let report = decode::<Order>(json!({})).unwrap_err();
        assert_eq!(report.detail[0].msg, "Field required");

        let mut body = serde_json::Map::new();
        body.insert("label".to_string(), Value::Null);
        let report = ValidationReport::check::<Item>(&body);
        assert_eq!(report.detail[0].msg, "Field may not be null");
    }
}
