use crate::{
    auth::{
        auth_dto::{AuthResponse, LoginRequest, RegisterRequest},
        auth_handlers,
    },
    chat::{
        chat_dto::{
            ChatMessageResponse, ChatRoomResponse, ChatTargetResponse, CreateRoomRequest,
            SendMessageRequest,
        },
        chat_handlers,
        chat_models::ChatContextType,
    },
    community::{
        community_dto::{
            CreateClubPostRequest, CreateCommentRequest, CreateEventPostRequest,
            PaginatedClubPosts, PaginatedEventPosts, PaginatedMessages, PaginatedRooms,
        },
        community_handlers,
        community_models::{ClubPost, Comment, EventPost},
    },
    middleware::auth_middleware,
    state::AppState,
    user::{user_dto::UpdateProfileRequest, user_handlers, user_models::UserResponse},
};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::auth_handlers::register,
        crate::auth::auth_handlers::login,
        crate::user::user_handlers::get_current_user,
        crate::user::user_handlers::update_current_user,
        crate::community::community_handlers::create_event_post,
        crate::community::community_handlers::list_event_posts,
        crate::community::community_handlers::get_event_post,
        crate::community::community_handlers::create_comment,
        crate::community::community_handlers::list_comments,
        crate::community::community_handlers::create_club_post,
        crate::community::community_handlers::list_club_posts,
        crate::community::community_handlers::get_club_post,
        crate::chat::chat_handlers::get_target_user,
        crate::chat::chat_handlers::open_room,
        crate::chat::chat_handlers::open_room_with_event_author,
        crate::chat::chat_handlers::open_room_with_comment_author,
        crate::chat::chat_handlers::open_room_with_club_leader,
        crate::chat::chat_handlers::list_rooms,
        crate::chat::chat_handlers::get_messages,
        crate::chat::chat_handlers::send_message,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            UpdateProfileRequest,
            CreateEventPostRequest,
            CreateCommentRequest,
            CreateClubPostRequest,
            EventPost,
            Comment,
            ClubPost,
            PaginatedEventPosts,
            PaginatedClubPosts,
            ChatContextType,
            CreateRoomRequest,
            SendMessageRequest,
            ChatTargetResponse,
            ChatRoomResponse,
            ChatMessageResponse,
            PaginatedRooms,
            PaginatedMessages,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User profile endpoints"),
        (name = "community", description = "Event, comment and club post endpoints"),
        (name = "chats", description = "1:1 chat rooms and messages")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<_> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route(
            "/me",
            get(user_handlers::get_current_user).put(user_handlers::update_current_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let event_routes = Router::new()
        .route(
            "/",
            get(community_handlers::list_event_posts).post(community_handlers::create_event_post),
        )
        .route("/:event_id", get(community_handlers::get_event_post))
        .route(
            "/:event_id/comments",
            get(community_handlers::list_comments).post(community_handlers::create_comment),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let club_routes = Router::new()
        .route(
            "/",
            get(community_handlers::list_club_posts).post(community_handlers::create_club_post),
        )
        .route("/:club_post_id", get(community_handlers::get_club_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let chat_routes = Router::new()
        .route("/target-user", get(chat_handlers::get_target_user))
        .route(
            "/rooms",
            get(chat_handlers::list_rooms).post(chat_handlers::open_room),
        )
        .route(
            "/events/:event_id/rooms",
            post(chat_handlers::open_room_with_event_author),
        )
        .route(
            "/comments/:comment_id/rooms",
            post(chat_handlers::open_room_with_comment_author),
        )
        .route(
            "/clubs/:club_post_id/rooms",
            post(chat_handlers::open_room_with_club_leader),
        )
        .route(
            "/rooms/:room_id/messages",
            get(chat_handlers::get_messages).post(chat_handlers::send_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // WebSocket route resolves its own identity: the handshake may be
    // anonymous and bind an identity later via a `connect` frame
    let ws_routes = Router::new().route("/ws", get(crate::websocket::ws_handler));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/events", event_routes)
        .nest("/clubs", club_routes)
        .nest("/chats", chat_routes)
        .merge(ws_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}
