use utoipa::OpenApi;

use crate::controllers::publications;
use crate::models::PermissionTo;
use crate::models::publication::PublicationResponse;

/// OpenAPI fragment for the publication catalog, merged into `/api-docs`.
#[derive(OpenApi)]
#[openapi(
    paths(publications::get_publication, publications::list_publications),
    components(schemas(PublicationResponse, PermissionTo)),
    tags(
        (name = "publications", description = "Published movies: lookup, filtering and sorting")
    )
)]
pub struct PublicationsApiDoc;
