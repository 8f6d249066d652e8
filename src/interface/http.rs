//! HTTP Server for bookshelf
//!
//! HTTP (axum) <-> application::CatalogService
//!
//! GET/POST /books, GET/PUT/DELETE /books/:id

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        rejection::{BytesRejection, FormRejection, JsonRejection},
        FromRequest, Path, Query, Request, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;

use crate::application::error::AppError;
use crate::application::service::CatalogService;
use crate::domain::error::DomainError;
use crate::domain::model::book::{Book, BookInput};
use crate::domain::model::catalog::Catalog;
use crate::domain::model::id::BookId;
use crate::domain::model::query::{BookFilter, Pagination};
use crate::domain::repository::CatalogStore;

type Shared<R> = Arc<CatalogService<R>>;

// =============================================================================
// Router
// =============================================================================

/// ルーティングを組み立てる。ストアは差し替え可能。
pub fn router<R>(service: CatalogService<R>) -> Router
where
    R: CatalogStore + Send + Sync + 'static,
{
    Router::new()
        .route("/books", get(list_books::<R>).post(create_book::<R>))
        .route(
            "/books/:id",
            get(get_book::<R>)
                .put(update_book::<R>)
                .delete(delete_book::<R>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(service))
}

// =============================================================================
// Errors
// =============================================================================

/// ハンドラのエラー。ボディは常に `{"error": <message>}`。
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    /// ボディを読めなかった、または解釈できなかった。
    Body { status: StatusCode, message: String },
    /// ストア処理のブロッキングタスクが完了しなかった。
    Task(JoinError),
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::App(e)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self::App(AppError::Domain(e))
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        Self::Task(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Body {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(e: FormRejection) -> Self {
        Self::Body {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(e: BytesRejection) -> Self {
        Self::Body {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::App(AppError::Domain(DomainError::MissingRequired))
            | Self::App(AppError::Domain(DomainError::DuplicateIsbn(_))) => {
                StatusCode::BAD_REQUEST
            }
            Self::App(AppError::Domain(DomainError::BookNotFound(_))) => StatusCode::NOT_FOUND,
            Self::App(AppError::StorageRead(_))
            | Self::App(AppError::StorageWrite(_))
            | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Body { status, .. } => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::App(e) => e.to_string(),
            Self::Body { message, .. } => message.clone(),
            Self::Task(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// =============================================================================
// Request body
// =============================================================================

/// 作成・更新のボディ。Content-Typeで JSON / URLエンコードフォームを切り替える。
///
/// ボディが空、またはどちらでもないContent-Typeなら全項目省略の入力になる。
#[derive(Debug)]
pub struct BookBody(pub BookInput);

#[async_trait]
impl<S> FromRequest<S> for BookBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if mime == "application/x-www-form-urlencoded" {
            let Form(input) = Form::<BookInput>::from_request(req, state).await?;
            return Ok(Self(input));
        }

        let bytes = Bytes::from_request(req, state).await?;
        let is_json = mime == "application/json" || mime.ends_with("+json");
        if !is_json || bytes.is_empty() {
            return Ok(Self(BookInput::default()));
        }
        let Json(input) = Json::<BookInput>::from_bytes(&bytes)?;
        Ok(Self(input))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /books` のクエリ。値は文字列のまま受けて数値変換はドメイン側で行う。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<String>,
}

/// ストアは同期I/Oなのでブロッキング用スレッドで呼ぶ。
async fn blocking<R, T, F>(service: Shared<R>, op: F) -> Result<T, ApiError>
where
    R: CatalogStore + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&CatalogService<R>) -> Result<T, AppError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || op(service.as_ref())).await?;
    Ok(result?)
}

async fn list_books<R>(
    State(service): State<Shared<R>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Book>>, ApiError>
where
    R: CatalogStore + Send + Sync + 'static,
{
    let filter = BookFilter::from_params(
        params.genre.as_deref(),
        params.author.as_deref(),
        params.publication_year.as_deref(),
    );
    let page = Pagination::from_params(params.page.as_deref(), params.limit.as_deref());
    let books = blocking(service, move |svc| svc.list(&filter, page)).await?;
    Ok(Json(books))
}

async fn create_book<R>(
    State(service): State<Shared<R>>,
    BookBody(input): BookBody,
) -> Result<(StatusCode, Json<Catalog>), ApiError>
where
    R: CatalogStore + Send + Sync + 'static,
{
    let (_book, catalog) = blocking(service, move |svc| svc.create(input)).await?;
    Ok((StatusCode::CREATED, Json(catalog)))
}

async fn get_book<R>(
    State(service): State<Shared<R>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError>
where
    R: CatalogStore + Send + Sync + 'static,
{
    let id = BookId::from(id);
    let book = blocking(service, move |svc| svc.get(&id)).await?;
    Ok(Json(book))
}

async fn update_book<R>(
    State(service): State<Shared<R>>,
    Path(id): Path<String>,
    BookBody(input): BookBody,
) -> Result<Json<Book>, ApiError>
where
    R: CatalogStore + Send + Sync + 'static,
{
    let id = BookId::from(id);
    let book = blocking(service, move |svc| svc.update(&id, input)).await?;
    Ok(Json(book))
}

async fn delete_book<R>(
    State(service): State<Shared<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: CatalogStore + Send + Sync + 'static,
{
    let id = BookId::from(id);
    blocking(service, move |svc| svc.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
