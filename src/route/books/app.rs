use axum::{
    routing::{get, post},
    Router,
};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/",
            get(super::list_books::list_books).post(super::create_book::create_book),
        )
        .route("/import", post(super::import_books::import_books))
        .route(
            "/:id",
            get(super::get_book::get_book)
                .put(super::replace_book::replace_book)
                .patch(super::update_book::update_book)
                .delete(super::delete_book::delete_book),
        )
}
