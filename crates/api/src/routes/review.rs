//! Route definitions for the `/reviews` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// GET    /?taskId={id}  -> list
/// POST   /              -> create (admin)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (admin, own review)
/// DELETE /{id}          -> delete (admin, own review)
/// POST   /{id}/reply    -> reply (task owner)
/// DELETE /{id}/reply    -> delete_reply (task owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(review::list).post(review::create))
        .route(
            "/{id}",
            get(review::get_by_id)
                .put(review::update)
                .delete(review::delete),
        )
        .route(
            "/{id}/reply",
            post(review::reply).delete(review::delete_reply),
        )
}
