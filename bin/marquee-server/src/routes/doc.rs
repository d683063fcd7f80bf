use crate::routes::{health, v1};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "marquee-server",
    description = "Actor and movie catalog API",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(v1::api_docs());
    root
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_catalog_route_is_documented() {
        let docs = get_docs();
        for path in [
            "/health",
            "/api/v1/actors",
            "/api/v1/actors/{id}",
            "/api/v1/movies",
            "/api/v1/movies/{id}",
        ] {
            assert!(docs.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
