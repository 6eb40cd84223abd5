// Prints the OpenAPI document for the demo service
// Run with: cargo run --bin openapi_export > openapi.json

use rest_error_mapper::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
