mod progression;
mod score;
mod shared;
mod user;
mod wardrobe;

use axum::{
    routing::{get, post},
    Router,
};
use score::repository::InMemoryScoreRepository;
use shared::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::models::UserModel;
use user::repository::InMemoryUserRepository;
use wardrobe::repository::InMemoryWardrobeRepository;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting score and progression server");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let score_repository = Arc::new(InMemoryScoreRepository::new());
    let user_repository = Arc::new(InMemoryUserRepository::with_users(seed_users()));
    let wardrobe_repository = Arc::new(InMemoryWardrobeRepository::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let score_repository = Arc::new(score::repository::PostgresScoreRepository::new(pool.clone()));
    // let user_repository = Arc::new(user::repository::PostgresUserRepository::new(pool.clone()));
    // let wardrobe_repository = Arc::new(wardrobe::repository::PostgresWardrobeRepository::new(pool));

    let app_state = AppState::new(score_repository, user_repository, wardrobe_repository);

    let app = Router::new()
        .route("/api/leaderboard", get(score::handlers::get_top_scores))
        .route(
            "/api/leaderboard/create",
            post(score::handlers::submit_score),
        )
        .route(
            "/api/leaderboard/average",
            get(score::handlers::get_average_score),
        )
        .route(
            "/api/leaderboard/average/:user_id",
            get(score::handlers::get_average_score_by_user),
        )
        .route(
            "/api/leaderboard/:user_id",
            get(score::handlers::get_top_scores_by_user),
        )
        .route("/api/user/:user_id", get(user::handlers::get_user))
        .route(
            "/api/user/:user_id/next-rank-xp",
            get(progression::handlers::get_required_xp),
        )
        .route(
            "/api/user/:user_id/rankup",
            post(progression::handlers::attempt_rank_up),
        )
        .route(
            "/api/user/:user_id/reward",
            post(progression::handlers::reward_user),
        )
        .route(
            "/api/wardrobe",
            get(wardrobe::handlers::list_items).post(wardrobe::handlers::create_item),
        )
        .route(
            "/api/wardrobe/eligibility/:user_id/:item_id",
            get(wardrobe::handlers::check_eligibility),
        )
        .route("/api/wardrobe/:item_id", get(wardrobe::handlers::get_item))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}

/// Dev-mode fixture users so the in-memory server is usable out of the box.
fn seed_users() -> Vec<UserModel> {
    let users = vec![
        UserModel::new("alice".to_string(), "alice@example.com".to_string()),
        UserModel::new("bob".to_string(), "bob@example.com".to_string()),
    ];

    for user in &users {
        info!(user_id = %user.id, display_name = %user.display_name, "Seeded dev user");
    }

    users
}
