//! Controller-under-test fixtures: a stubbed user API.
//!
//! # Design
//! `StubUserController` behaves like a mock: every handler records the
//! arguments it was called with, then answers with whatever the test
//! programmed for that route. Routes nobody programmed answer 501, the same
//! way an unimplemented controller would. `create_user` and `delete_user`
//! declare their own 204 status and need no programming.
//!
//! Sample users come from factory functions so every test gets its own
//! instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// A type no user payload decodes into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub species: String,
    pub legs: u8,
}

pub fn guybrush() -> User {
    User {
        id: Uuid::from_u128(0x82fe4f3e_3c4b_11ee_be56_0242ac120002),
        name: "Guybrush Threepwood".to_string(),
    }
}

pub fn griswold() -> User {
    User {
        id: Uuid::from_u128(0xd45af7e2_3c4b_11ee_be56_0242ac120002),
        name: "Griswold Goodsoup".to_string(),
    }
}

/// A recorded handler call with its captured arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    GetAllUsers,
    GetUser { id: Uuid, authorization: Option<String> },
    GetUserDetails { id: Uuid, authorization: Option<String> },
    CreateUser { user: User },
    PutUser { id: Uuid, user: User },
    PatchUser { id: Uuid, user: User },
    DeleteUser { id: Uuid },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Route {
    GetAllUsers,
    GetUser,
    GetUserDetails,
    PutUser,
    PatchUser,
}

/// Canned answer for a programmed route.
#[derive(Clone, Debug)]
pub struct StubResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl StubResponse {
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Panics on an invalid header name or value, so a badly programmed stub
    /// fails where it is programmed.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::try_from(name)
            .unwrap_or_else(|e| panic!("invalid stub header name '{name}': {e}"));
        let value = HeaderValue::try_from(value)
            .unwrap_or_else(|e| panic!("invalid stub header value for '{name}': {e}"));
        self.headers.insert(name, value);
        self
    }

    /// JSON body. Panics if `body` cannot be serialized.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Self {
        let json = serde_json::to_string(body)
            .unwrap_or_else(|e| panic!("stub body is not serializable: {e}"));
        self.body = Some(json);
        self
    }

    fn not_implemented(handler: &str) -> Self {
        Self {
            status: StatusCode::NOT_IMPLEMENTED,
            headers: HeaderMap::new(),
            body: Some(format!("Not yet implemented: UserController.{handler}")),
        }
    }
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        if self.body.is_some() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        (self.status, headers, self.body.unwrap_or_default()).into_response()
    }
}

#[derive(Debug, Default)]
pub struct StubUserController {
    invocations: Mutex<Vec<Invocation>>,
    responses: Mutex<HashMap<(Route, Option<Uuid>), StubResponse>>,
}

impl StubUserController {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn when_get_all_users(&self, response: StubResponse) {
        self.program(Route::GetAllUsers, None, response);
    }

    pub fn when_get_user(&self, id: Uuid, response: StubResponse) {
        self.program(Route::GetUser, Some(id), response);
    }

    pub fn when_get_user_details(&self, id: Uuid, response: StubResponse) {
        self.program(Route::GetUserDetails, Some(id), response);
    }

    pub fn when_put_user(&self, id: Uuid, response: StubResponse) {
        self.program(Route::PutUser, Some(id), response);
    }

    pub fn when_patch_user(&self, id: Uuid, response: StubResponse) {
        self.program(Route::PatchUser, Some(id), response);
    }

    /// Every call received so far, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn was_invoked(&self, expected: &Invocation) -> bool {
        self.invocations().iter().any(|call| call == expected)
    }

    fn program(&self, route: Route, id: Option<Uuid>, response: StubResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((route, id), response);
    }

    fn record(&self, invocation: Invocation) {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation);
    }

    fn answer(&self, route: Route, id: Option<Uuid>, handler: &str) -> StubResponse {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(route, id))
            .cloned()
            .unwrap_or_else(|| StubResponse::not_implemented(handler))
    }
}

type Controller = Arc<StubUserController>;

pub fn app(controller: Controller) -> Router {
    Router::new()
        .route("/api/v1/users", get(get_all_users).post(create_user))
        .route(
            "/api/v1/users/{id}",
            get(get_user).put(put_user).patch(patch_user).delete(delete_user),
        )
        .route("/api/v1/users/{id}/details", get(get_user_details))
        .with_state(controller)
}

async fn get_all_users(State(controller): State<Controller>) -> StubResponse {
    controller.record(Invocation::GetAllUsers);
    controller.answer(Route::GetAllUsers, None, "get_all_users")
}

async fn get_user(
    State(controller): State<Controller>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> StubResponse {
    let authorization = authorization_header(&headers);
    controller.record(Invocation::GetUser { id, authorization });
    controller.answer(Route::GetUser, Some(id), "get_user")
}

async fn get_user_details(
    State(controller): State<Controller>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> StubResponse {
    let authorization = authorization_header(&headers);
    controller.record(Invocation::GetUserDetails { id, authorization });
    controller.answer(Route::GetUserDetails, Some(id), "get_user_details")
}

fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn create_user(State(controller): State<Controller>, Json(user): Json<User>) -> StatusCode {
    controller.record(Invocation::CreateUser { user });
    StatusCode::NO_CONTENT
}

async fn put_user(
    State(controller): State<Controller>,
    Path(id): Path<Uuid>,
    Json(user): Json<User>,
) -> StubResponse {
    controller.record(Invocation::PutUser { id, user });
    controller.answer(Route::PutUser, Some(id), "put_user")
}

async fn patch_user(
    State(controller): State<Controller>,
    Path(id): Path<Uuid>,
    Json(user): Json<User>,
) -> StubResponse {
    controller.record(Invocation::PatchUser { id, user });
    controller.answer(Route::PatchUser, Some(id), "patch_user")
}

async fn delete_user(State(controller): State<Controller>, Path(id): Path<Uuid>) -> StatusCode {
    controller.record(Invocation::DeleteUser { id });
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let json = serde_json::to_value(guybrush()).unwrap();
        assert_eq!(json["id"], "82fe4f3e-3c4b-11ee-be56-0242ac120002");
        assert_eq!(json["name"], "Guybrush Threepwood");
    }

    #[test]
    fn user_roundtrips_through_json() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Roundtrip".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn user_payload_does_not_decode_as_animal() {
        let json = serde_json::to_string(&griswold()).unwrap();
        assert!(serde_json::from_str::<Animal>(&json).is_err());
    }

    #[test]
    fn factories_return_equal_independent_values() {
        let mut first = guybrush();
        first.name.push_str(" the Mighty Pirate");
        assert_ne!(first, guybrush());
        assert_eq!(guybrush(), guybrush());
    }

    #[test]
    fn unprogrammed_route_answers_not_implemented() {
        let controller = StubUserController::new();
        let response = controller.answer(Route::GetUser, Some(guybrush().id), "get_user");
        assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            response.body.as_deref(),
            Some("Not yet implemented: UserController.get_user")
        );
    }

    #[test]
    fn programmed_response_is_keyed_by_id() {
        let controller = StubUserController::new();
        controller.when_get_user(guybrush().id, StubResponse::status(StatusCode::OK));
        assert_eq!(
            controller
                .answer(Route::GetUser, Some(guybrush().id), "get_user")
                .status,
            StatusCode::OK
        );
        assert_eq!(
            controller
                .answer(Route::GetUser, Some(griswold().id), "get_user")
                .status,
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn invocations_are_recorded_in_order() {
        let controller = StubUserController::new();
        controller.record(Invocation::GetAllUsers);
        controller.record(Invocation::DeleteUser { id: griswold().id });
        assert_eq!(
            controller.invocations(),
            vec![
                Invocation::GetAllUsers,
                Invocation::DeleteUser { id: griswold().id }
            ]
        );
        assert!(controller.was_invoked(&Invocation::GetAllUsers));
        assert!(!controller.was_invoked(&Invocation::GetUser {
            id: griswold().id,
            authorization: None,
        }));
    }

    #[test]
    fn json_body_gets_json_content_type() {
        let response = StubResponse::status(StatusCode::OK)
            .with_json(&guybrush())
            .into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    #[should_panic(expected = "invalid stub header name")]
    fn invalid_stub_header_panics_when_programmed() {
        let _ = StubResponse::status(StatusCode::OK).with_header("bad name", "v");
    }

    #[test]
    #[should_panic(expected = "stub body is not serializable")]
    fn unserializable_stub_body_panics_when_programmed() {
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys are not JSON object keys");
        let _ = StubResponse::status(StatusCode::OK).with_json(&bad);
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let response = StubResponse::status(StatusCode::OK)
            .with_header("Content-Type", "application/vnd.users+json")
            .with_json(&guybrush())
            .into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.users+json"
        );
    }
}
