use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::error::{Error, ErrorCategory};
use crate::model::MemberId;
use crate::Actor;

/// Set by the gateway after it authenticated the caller.
pub const MEMBER_ID_HEADER: &str = "x-member-id";

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(value) = req.headers().get(MEMBER_ID_HEADER) else {
            return ready(Ok(Actor::Anonymous));
        };

        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok());

        ready(match id {
            Some(id) => Ok(Actor::Member(MemberId(id))),
            None => Err(Error::new(ErrorCategory::InvalidRequest)
                .with_message("Invalid member id header")),
        })
    }
}
