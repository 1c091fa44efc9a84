pub mod data;
pub mod health;
pub mod system_status;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// GET    /data                 all time-slot records, keyed by slot
/// POST   /data                 save one record
/// DELETE /data                 delete every record
/// POST   /data/batch           save many records, per-key errors
/// GET    /data/{time_slot}     one record (empty mappings if absent)
/// DELETE /data/{time_slot}     delete one record
/// GET    /time-slots           slots that have persisted data
/// GET    /system-status        global active flag
/// POST   /system-status        update global active flag
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/data",
            get(data::list_all)
                .post(data::save)
                .delete(data::delete_all),
        )
        .route("/data/batch", post(data::save_batch))
        .route(
            "/data/{time_slot}",
            get(data::get_one).delete(data::delete_one),
        )
        .route("/time-slots", get(data::list_slots))
        .route(
            "/system-status",
            get(system_status::get_status).post(system_status::set_status),
        )
}
