use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the extension frontends.
///
/// Origins come from `CORS_ALLOWED_ORIGINS` (comma separated, `http(s)://`
/// only). With nothing valid configured, only the local extension test
/// harness origins are allowed.
pub fn cors_middleware() -> Cors {
    let allowed_raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    let mut origins = parse_origins(&allowed_raw);

    if origins.is_empty() {
        origins = vec![
            "http://localhost:8080".to_string(),
            "https://localhost:8080".to_string(),
        ];
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // The frontend sends its extension token in Authorization
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}
