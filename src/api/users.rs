use mongodb::bson::doc;
use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        message::{Created, Message},
        user::{UserDescription, UserPatch, UserSpec},
        valid::Valid,
    },
    db::user::{NewUser, User},
    mongodb::{Coll, Id},
};

const USER: &str = "User";

pub fn routes() -> Vec<Route> {
    routes![create_user, get_users, get_user, update_user, delete_user]
}

#[post("/", data = "<spec>")]
async fn create_user(spec: Valid<UserSpec>, new_users: Coll<NewUser>) -> Result<Json<Created>> {
    let user: NewUser = spec.into_inner().into();
    let id = new_users.insert_one(&user).await?;
    Ok(Json(Created::new("User created", id)))
}

#[get("/")]
async fn get_users(users: Coll<User>) -> Result<Json<Vec<UserDescription>>> {
    let users = users.find(doc! {}).await?;
    Ok(Json(users.into_iter().map(UserDescription::from).collect()))
}

#[get("/<user_id>")]
async fn get_user(user_id: Option<Id>, users: Coll<User>) -> Result<Json<UserDescription>> {
    let user_id = user_id.ok_or_else(|| Error::not_found(USER))?;
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| Error::not_found(USER))?;
    Ok(Json(user.into()))
}

#[put("/<user_id>", data = "<patch>")]
async fn update_user(
    user_id: Option<Id>,
    patch: Valid<UserPatch>,
    users: Coll<User>,
) -> Result<Json<Message>> {
    let user_id = user_id.ok_or_else(|| Error::not_found(USER))?;
    let fields = patch.into_inner().into_fields();
    if !users.set_fields(user_id, fields).await? {
        return Err(Error::not_found(USER));
    }
    Ok(Json(Message::new("User updated successfully")))
}

#[delete("/<user_id>")]
async fn delete_user(user_id: Option<Id>, users: Coll<User>) -> Result<Json<Message>> {
    let user_id = user_id.ok_or_else(|| Error::not_found(USER))?;
    if !users.delete_one(user_id).await? {
        return Err(Error::not_found(USER));
    }
    Ok(Json(Message::new("User deleted successfully")))
}
