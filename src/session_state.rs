use std::future::ready;
use std::future::Ready;

use actix_session::Session;
use actix_session::SessionExt;
use actix_session::SessionGetError;
use actix_session::SessionInsertError;
use actix_web::FromRequest;
use uuid::Uuid;

/// Wrapper around `actix_session::Session`, so that keys are methods rather
/// than strings scattered across handlers
pub struct TypedSession(Session);

impl TypedSession {
    const VISITOR_ID_KEY: &'static str = "visitor_id";

    pub fn insert_visitor_id(
        &self,
        visitor_id: Uuid,
    ) -> Result<(), SessionInsertError> {
        self.0.insert(Self::VISITOR_ID_KEY, visitor_id)
    }

    pub fn get_visitor_id(&self) -> Result<Option<Uuid>, SessionGetError> {
        self.0.get(Self::VISITOR_ID_KEY)
    }
}

impl FromRequest for TypedSession {
    // reuse the error returned by `Session`'s own `FromRequest` impl
    type Error = <Session as FromRequest>::Error;

    // no I/O is needed to get at the session, so the future is ready
    // immediately
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
