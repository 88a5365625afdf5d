//! API documentation, mounted only in development.
//!
//! `/openapi.json` serves the raw document and `/docs` renders it with Redoc.

use axum::{response::Html, Json};
use serde_json::{json, Value};

/// Builds the OpenAPI 3.0 description of the public routes.
pub fn openapi_document() -> Value {
    let error = json!({ "$ref": "#/components/schemas/Error" });
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "User Statistics API",
            "description": "User registry with cached statistics, backed by PostgreSQL and Redis",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Service banner",
                    "responses": { "200": { "description": "Banner" } }
                }
            },
            "/health": {
                "get": {
                    "summary": "Aggregated health of the database and cache",
                    "responses": { "200": { "description": "healthy or degraded" } }
                }
            },
            "/users": {
                "get": {
                    "summary": "List users, newest first",
                    "responses": {
                        "200": {
                            "description": "Users",
                            "content": { "application/json": { "schema": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/User" }
                            } } }
                        },
                        "503": { "description": "Database unavailable", "content": { "application/json": { "schema": error } } }
                    }
                },
                "post": {
                    "summary": "Create a user",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/CreateUserRequest" } } }
                    },
                    "responses": {
                        "200": {
                            "description": "Created user",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/User" } } }
                        },
                        "400": { "description": "User already exists or invalid input", "content": { "application/json": { "schema": error } } },
                        "503": { "description": "Database unavailable", "content": { "application/json": { "schema": error } } }
                    }
                }
            },
            "/statistics": {
                "get": {
                    "summary": "Cached system statistics",
                    "responses": {
                        "200": {
                            "description": "Statistics snapshot",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/SystemStatistics" } } }
                        },
                        "503": { "description": "Cache or database unavailable", "content": { "application/json": { "schema": error } } }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "CreateUserRequest": {
                    "type": "object",
                    "required": ["username", "email"],
                    "properties": {
                        "username": { "type": "string" },
                        "email": { "type": "string" },
                        "full_name": { "type": "string", "nullable": true }
                    }
                },
                "User": {
                    "type": "object",
                    "required": ["id", "username", "email", "created_at"],
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "username": { "type": "string" },
                        "email": { "type": "string" },
                        "full_name": { "type": "string", "nullable": true },
                        "created_at": { "type": "string", "format": "date-time" }
                    }
                },
                "SystemStatistics": {
                    "type": "object",
                    "properties": {
                        "total_users": { "type": "integer", "format": "int64" },
                        "cache_status": { "type": "string" },
                        "database_status": { "type": "string" },
                        "timestamp": { "type": "string", "format": "date-time" }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}

/// Path of the raw OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

const DOCS_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>User Statistics API</title>
    <meta charset="utf-8"/>
  </head>
  <body>
    <redoc spec-url="/openapi.json"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;

/// Handler for GET /openapi.json
pub async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

/// Handler for GET /docs
pub async fn docs_page_handler() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
