use utoipa::OpenApi;

use crate::api::handlers::Item;
use crate::errors::ErrorRecord;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "REST Error Mapper",
        version = "0.1.0",
        description = "Demo service whose error responses carry a structured error record that clients map back into typed exceptions."
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::create_item,
        crate::api::handlers::get_item,
    ),
    components(schemas(Item, ErrorRecord)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Item endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses_reference_error_record() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert!(doc["components"]["schemas"]["ErrorRecord"].is_object());
        let not_found = &doc["paths"]["/items/{id}"]["get"]["responses"]["404"];
        assert_eq!(
            not_found["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/ErrorRecord"
        );
    }
}
