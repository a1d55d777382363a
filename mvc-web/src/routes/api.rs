use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use mvc_database::{
    ledger,
    FieldValue,
    models::{User, users},
    record,
};
use mvc_utils::webhook::process_webhook;

use crate::{ApiError, AppState};

type ApiResult<T> = Result<T, ApiError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hello/:name", get(hello))
        .route("/webhook", post(webhook))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(show_user).patch(update_user).delete(delete_user),
        )
        .route("/users/:id/balance", get(balance))
        .route("/users/:id/deposit", post(deposit))
        .route("/users/:id/withdraw", post(withdraw))
        .route("/transfers", post(transfer))
}

#[derive(Debug, Deserialize)]
struct NewUser {
    name: String,
    email: String,
    password: String,
}

impl NewUser {
    fn validate(&self) -> ApiResult<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("name must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(ApiError::bad_request("email must be an email address"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("password must not be empty"));
        }
        Ok(())
    }
}

/// Partial update of a user; absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
struct UserChanges {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

impl UserChanges {
    fn fields(&self) -> ApiResult<Vec<(&'static str, FieldValue)>> {
        let mut fields = Vec::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ApiError::bad_request("name must not be empty"));
            }
            fields.push(("name", FieldValue::from(name.trim())));
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ApiError::bad_request("email must be an email address"));
            }
            fields.push(("email", FieldValue::from(email.as_str())));
        }
        if let Some(password) = &self.password {
            if password.is_empty() {
                return Err(ApiError::bad_request("password must not be empty"));
            }
            fields.push(("password_hash", users::hash_password(password).into()));
        }

        Ok(fields)
    }
}

#[derive(Debug, Deserialize)]
struct AmountBody {
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct TransferBody {
    from_user_id: i64,
    to_user_id: i64,
    amount: i64,
}

async fn hello(Path(name): Path<String>) -> String {
    format!("Hello, {name}!")
}

async fn webhook(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<String> {
    let Json(data) = payload?;
    info!("webhook received");
    Ok(process_webhook(&data))
}

async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(record::all::<User>(&state.db).await?))
}

async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(body) = payload?;
    body.validate()?;

    let user = users::create_user(&state.db, body.name.trim(), &body.email, &body.password).await?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn show_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<User>> {
    let Path(id) = id?;
    record::get::<User>(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("user {id} does not exist")))
}

async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserChanges>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    let fields = changes.fields()?;

    let user = record::update::<User>(&state.db, id, &fields)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {id} does not exist")))?;
    info!(user_id = id, "user updated");
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<User>> {
    let Path(id) = id?;
    let user = record::delete::<User>(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {id} does not exist")))?;
    info!(user_id = id, "user deleted");
    Ok(Json(user))
}

async fn balance(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let amount = ledger::balance_of(&state.db, id).await?;
    Ok(Json(json!({ "user_id": id, "amount": amount })))
}

async fn deposit(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AmountBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let balance = ledger::deposit(&state.db, id, body.amount).await?;
    Ok(Json(json!({ "user_id": id, "amount": balance.amount })))
}

async fn withdraw(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AmountBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let balance = ledger::withdraw(&state.db, id, body.amount).await?;
    Ok(Json(json!({ "user_id": id, "amount": balance.amount })))
}

async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = payload?;
    let (sender, receiver) =
        ledger::transfer(&state.db, body.from_user_id, body.to_user_id, body.amount).await?;

    Ok(Json(json!({
        "from": sender,
        "to": receiver,
    })))
}
