use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub category: Vec<String>,
    pub description: String,
    pub date: String,
    pub cover_image: String,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlog {
    pub title: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub cover_image: String,
    pub content: String,
}

/// Blogs in insertion order.
pub type Db = Arc<RwLock<Vec<Blog>>>;

pub fn app() -> Router {
    app_with_blogs(Vec::new())
}

pub fn app_with_blogs(blogs: Vec<Blog>) -> Router {
    let db: Db = Arc::new(RwLock::new(blogs));
    Router::new()
        .route("/blogs", get(list_blogs).post(create_blog))
        .route("/blogs/{id}", get(get_blog))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_blogs(listener, Vec::new()).await
}

pub async fn run_with_blogs(listener: TcpListener, blogs: Vec<Blog>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_blogs(blogs)).await
}

async fn list_blogs(State(db): State<Db>) -> Json<Vec<Blog>> {
    let blogs = db.read().await;
    Json(blogs.clone())
}

async fn create_blog(
    State(db): State<Db>,
    Json(input): Json<CreateBlog>,
) -> (StatusCode, Json<Blog>) {
    let blog = Blog {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        category: input.category,
        description: input.description,
        date: input.date,
        cover_image: input.cover_image,
        content: input.content,
    };
    info!(id = %blog.id, title = %blog.title, "created blog");
    db.write().await.push(blog.clone());
    (StatusCode::CREATED, Json(blog))
}

async fn get_blog(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Blog>, StatusCode> {
    let blogs = db.read().await;
    blogs
        .iter()
        .find(|blog| blog.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
