use salvo::cors::{AllowHeaders, AllowOrigin, Cors};
use salvo::http::Method;
use salvo::logging::Logger;
use salvo::prelude::*;

use crate::handlers::{self, AppState, InjectState, auth, reports, users};

/// Route tree of the gateway
///
/// `login`, `download` and `health` are public; everything else sits behind
/// [`handlers::require_session`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .hoop(InjectState(state))
        .push(Router::with_path("login").post(auth::login))
        .push(Router::with_path("download/{filename}").get(reports::download))
        .push(Router::with_path("health").get(handlers::health_check))
        .push(
            Router::new()
                .hoop(handlers::require_session)
                .push(Router::with_path("logout").post(auth::logout))
                .push(
                    Router::with_path("users")
                        .get(users::list_users)
                        .push(Router::with_path("add").post(users::add_user))
                        .push(Router::with_path("{id}").delete(users::remove_user)),
                )
                .push(Router::with_path("import").post(users::import_users))
                .push(Router::with_path("export").get(reports::export_users)),
        )
}

/// Any origin may call the gateway, as browsers on the operator's LAN do.
fn cors() -> Cors {
    Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::any())
}

pub fn service(state: AppState) -> Service {
    Service::new(router(state))
        .hoop(Logger::new())
        .hoop(cors().into_handler())
}
