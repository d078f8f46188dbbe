use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("{0}")]
  InvalidArgs(String),
  #[error("unknown payout status: {0}")]
  InvalidStatus(String),
  #[error("payout amount exceeds available balance")]
  InsufficientBalance,
  #[error("influencer not found")]
  InfluencerNotFound,
  #[error("discount code not found or inactive")]
  CodeNotFound,
  #[error("payout not found")]
  PayoutNotFound,
  #[error("discount code already exists")]
  CodeExists,
  #[error("email already registered")]
  EmailExists,
  #[error("illegal payout transition: {from} -> {to}")]
  IllegalTransition { from: &'static str, to: &'static str },
  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),
  #[error("{0}")]
  Internal(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::InvalidArgs(_) | Self::InvalidStatus(_) | Self::InsufficientBalance => {
        StatusCode::BAD_REQUEST
      }
      Self::InfluencerNotFound | Self::CodeNotFound | Self::PayoutNotFound => {
        StatusCode::NOT_FOUND
      }
      Self::CodeExists | Self::EmailExists | Self::IllegalTransition { .. } => {
        StatusCode::CONFLICT
      }
      Self::Db(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Serialize)]
struct Body {
  success: bool,
  msg: String,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("request failed: {self}");
    }
    (status, Json(Body { success: false, msg: self.to_string() })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn taxonomy_maps_to_http() {
    assert_eq!(Error::InvalidArgs("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(Error::InvalidStatus("paid".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(Error::InsufficientBalance.status(), StatusCode::BAD_REQUEST);
    assert_eq!(Error::CodeNotFound.status(), StatusCode::NOT_FOUND);
    assert_eq!(Error::CodeExists.status(), StatusCode::CONFLICT);
    assert_eq!(
      Error::IllegalTransition { from: "completed", to: "pending" }.status(),
      StatusCode::CONFLICT
    );
  }
}
