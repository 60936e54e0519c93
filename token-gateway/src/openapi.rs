use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const TOKEN_TAG: &str = "Token API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = TOKEN_TAG, description = "Authorization code exchange"),
    ),
    info(
        title = "Token Gateway API",
        description = "Exchanges authorization codes and returns the caller's resource record",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
