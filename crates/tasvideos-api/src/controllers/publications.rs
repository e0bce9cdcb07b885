use std::collections::HashMap;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use sea_orm::sea_query::{Expr, Func, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use sea_orm_migration::MigratorTrait;
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};
use validator::Validate;

use tasvideos_core::extractors::{Pagination, Path, ValidatedQuery};
use tasvideos_core::query::{FieldSelection, SortDirective, validate_sort};
use tasvideos_core::{ApiError, ApiModule, ApiResponse, AppState};

use crate::migrations::Migrator;
use crate::models::publication::{self, PublicationResponse, sort_column, sortable_field_names};
use crate::models::{publication_author, publication_flag, user};

// ── Request types ──

/// Filter, sort and projection parameters for the publication list.
///
/// Paging lives in [`Pagination`], read from the same query string.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PublicationsRequest {
    /// Comma-separated sort fields, `-` prefix for descending, e.g. `-createTimestamp,title`
    pub sort: Option<String>,

    /// Comma-separated response properties to return
    pub fields: Option<String>,

    /// Comma-separated system codes, e.g. `NES,SNES`
    pub systems: Option<String>,

    /// Comma-separated publication classes, e.g. `Standard,Stars`
    pub class_names: Option<String>,

    /// Earliest game release year, inclusive
    #[serde(rename = "startYear")]
    #[validate(range(min = 1, max = 9999, message = "must be between 1 and 9999"))]
    pub start_year: Option<i32>,

    /// Latest game release year, inclusive
    #[serde(rename = "endYear")]
    #[validate(range(min = 1, max = 9999, message = "must be between 1 and 9999"))]
    pub end_year: Option<i32>,

    /// Comma-separated flag tokens; a publication matches if it has any of them
    pub flags: Option<String>,

    /// Comma-separated author user ids
    pub author_ids: Option<String>,

    /// Comma-separated game ids
    pub game_ids: Option<String>,

    /// Include obsoleted publications
    #[serde(default)]
    pub show_obsoleted: bool,

    /// Return only obsoleted publications
    #[serde(default)]
    pub only_obsoleted: bool,
}

/// Which publications a list request keeps, in normalized form.
///
/// String tokens are lowercased; empty lists mean "no restriction".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublicationTokens {
    pub systems: Vec<String>,
    pub class_names: Vec<String>,
    pub flags: Vec<String>,
    pub author_ids: Vec<i32>,
    pub game_ids: Vec<i32>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub obsoleted: ObsoletedFilter,
}

/// Treatment of publications superseded by a newer one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ObsoletedFilter {
    #[default]
    Exclude,
    Include,
    Only,
}

impl PublicationsRequest {
    pub fn tokens(&self) -> Result<PublicationTokens, ApiError> {
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                return Err(ApiError::invalid_field(
                    "endYear",
                    "must not be earlier than startYear",
                ));
            }
        }

        let obsoleted = if self.only_obsoleted {
            ObsoletedFilter::Only
        } else if self.show_obsoleted {
            ObsoletedFilter::Include
        } else {
            ObsoletedFilter::Exclude
        };

        Ok(PublicationTokens {
            systems: split_tokens(self.systems.as_deref()),
            class_names: split_tokens(self.class_names.as_deref()),
            flags: split_tokens(self.flags.as_deref()),
            author_ids: parse_ids("authorIds", self.author_ids.as_deref())?,
            game_ids: parse_ids("gameIds", self.game_ids.as_deref())?,
            start_year: self.start_year,
            end_year: self.end_year,
            obsoleted,
        })
    }

    pub fn sort_directives(&self) -> Vec<SortDirective> {
        SortDirective::parse_list(self.sort.as_deref().unwrap_or(""))
    }
}

fn split_tokens(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn parse_ids(param: &str, raw: Option<&str>) -> Result<Vec<i32>, ApiError> {
    split_tokens(raw)
        .iter()
        .map(|token| {
            token.parse::<i32>().map_err(|_| {
                ApiError::invalid_field(param, format!("'{token}' is not a valid id"))
            })
        })
        .collect()
}

// ── Query composition ──

/// Narrow a publication select to the rows matching `tokens`.
pub fn filter_by_tokens(
    mut query: Select<publication::Entity>,
    tokens: &PublicationTokens,
) -> Select<publication::Entity> {
    use publication::Column;

    if !tokens.systems.is_empty() {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(Column::SystemCode))).is_in(tokens.systems.clone()),
        );
    }
    if !tokens.class_names.is_empty() {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(Column::ClassName)))
                .is_in(tokens.class_names.clone()),
        );
    }
    if let Some(start) = tokens.start_year {
        query = query.filter(Column::Year.gte(start));
    }
    if let Some(end) = tokens.end_year {
        query = query.filter(Column::Year.lte(end));
    }
    if !tokens.game_ids.is_empty() {
        query = query.filter(Column::GameId.is_in(tokens.game_ids.clone()));
    }
    if !tokens.author_ids.is_empty() {
        query = query.filter(
            Column::Id.in_subquery(
                Query::select()
                    .column(publication_author::Column::PublicationId)
                    .from(publication_author::Entity)
                    .and_where(
                        publication_author::Column::UserId.is_in(tokens.author_ids.clone()),
                    )
                    .to_owned(),
            ),
        );
    }
    if !tokens.flags.is_empty() {
        query = query.filter(
            Column::Id.in_subquery(
                Query::select()
                    .column(publication_flag::Column::PublicationId)
                    .from(publication_flag::Entity)
                    .and_where(
                        Expr::expr(Func::lower(Expr::col(publication_flag::Column::Flag)))
                            .is_in(tokens.flags.clone()),
                    )
                    .to_owned(),
            ),
        );
    }

    match tokens.obsoleted {
        ObsoletedFilter::Exclude => query.filter(Column::ObsoletedById.is_null()),
        ObsoletedFilter::Include => query,
        ObsoletedFilter::Only => query.filter(Column::ObsoletedById.is_not_null()),
    }
}

/// Apply validated sort directives, then `id` ascending as the tiebreaker.
fn apply_sort(
    mut query: Select<publication::Entity>,
    directives: &[SortDirective],
) -> Result<Select<publication::Entity>, ApiError> {
    for directive in directives {
        let column = sort_column(&directive.field)
            .ok_or_else(|| ApiError::invalid_field("sort", "unknown sort field"))?;
        let order = if directive.is_descending() {
            Order::Desc
        } else {
            Order::Asc
        };
        query = query.order_by(column, order);
    }
    Ok(query.order_by_asc(publication::Column::Id))
}

/// Attach authors and flags to each publication, keeping input order.
async fn to_responses(
    db: &DatabaseConnection,
    publications: Vec<publication::Model>,
) -> Result<Vec<PublicationResponse>, ApiError> {
    if publications.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = publications.iter().map(|p| p.id).collect();

    let mut authors: HashMap<i32, Vec<String>> = HashMap::new();
    let author_rows = publication_author::Entity::find()
        .filter(publication_author::Column::PublicationId.is_in(ids.clone()))
        .find_also_related(user::Entity)
        .all(db)
        .await?;
    for (link, author) in author_rows {
        if let Some(author) = author {
            authors
                .entry(link.publication_id)
                .or_default()
                .push(author.user_name);
        }
    }

    let mut flags: HashMap<i32, Vec<String>> = HashMap::new();
    let flag_rows = publication_flag::Entity::find()
        .filter(publication_flag::Column::PublicationId.is_in(ids))
        .all(db)
        .await?;
    for row in flag_rows {
        flags.entry(row.publication_id).or_default().push(row.flag);
    }

    Ok(publications
        .into_iter()
        .map(|p| {
            let id = p.id;
            PublicationResponse::from_parts(
                p,
                authors.remove(&id).unwrap_or_default(),
                flags.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/publications", get(list_publications))
        .route("/api/v1/publications/{id}", get(get_publication))
}

// ── Handlers ──

/// Get a single publication by ID.
#[utoipa::path(
    get,
    path = "/api/v1/publications/{id}",
    params(
        ("id" = i32, Path, description = "Publication ID")
    ),
    responses(
        (status = 200, description = "Publication found", body = ApiResponse<PublicationResponse>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Publication not found")
    ),
    tag = "publications"
)]
pub async fn get_publication(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<PublicationResponse>, ApiError> {
    let found = publication::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Publication with id {id} not found")))?;

    let response = to_responses(&state.db, vec![found])
        .await?
        .pop()
        .ok_or_else(|| ApiError::Internal(format!("publication {id} vanished while loading")))?;
    Ok(ApiResponse::success(response))
}

/// List publications with filtering, sorting, paging and field selection.
#[utoipa::path(
    get,
    path = "/api/v1/publications",
    params(Pagination, PublicationsRequest),
    responses(
        (status = 200, description = "Matching publications", body = ApiResponse<Vec<PublicationResponse>>),
        (status = 400, description = "Invalid sort field or filter parameter")
    ),
    tag = "publications"
)]
pub async fn list_publications(
    State(state): State<AppState>,
    pagination: Result<Pagination, ApiError>,
    ValidatedQuery(request): ValidatedQuery<PublicationsRequest>,
) -> Result<ApiResponse<Vec<serde_json::Value>>, ApiError> {
    let directives = request.sort_directives();
    // Report a bad sort together with bad paging values.
    let pagination = match (validate_sort(&directives, &sortable_field_names()), pagination) {
        (Ok(()), Ok(pagination)) => pagination,
        (Err(sort), Err(paging)) => return Err(sort.merge(paging)),
        (Err(e), Ok(_)) | (Ok(()), Err(e)) => return Err(e),
    };
    let tokens = request.tokens()?;

    let query = filter_by_tokens(publication::Entity::find(), &tokens);
    let publications = apply_sort(query, &directives)?
        .offset(pagination.offset)
        .limit(pagination.limit)
        .all(&state.db)
        .await?;

    tracing::debug!(
        count = publications.len(),
        offset = pagination.offset,
        limit = pagination.limit,
        "listed publications"
    );

    let responses = to_responses(&state.db, publications).await?;
    let values = responses
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::Internal(format!("failed to serialize publication: {e}")))?;

    let selection = FieldSelection::parse(request.fields.as_deref());
    Ok(ApiResponse::success(selection.project_all(values)))
}

// ── Module ──

/// Publication catalog: routes, schema migrations and API docs.
pub struct PublicationsModule;

#[async_trait::async_trait]
impl ApiModule for PublicationsModule {
    fn name(&self) -> &str {
        "publications"
    }

    fn routes(&self) -> Router<AppState> {
        routes()
    }

    async fn migrate(&self, db: &DatabaseConnection) -> Result<(), ApiError> {
        Migrator::up(db, None).await?;
        Ok(())
    }

    async fn rollback(&self, db: &DatabaseConnection, steps: u32) -> Result<(), ApiError> {
        Migrator::down(db, Some(steps)).await?;
        Ok(())
    }

    fn openapi_spec(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(crate::openapi::PublicationsApiDoc::openapi())
    }
}
