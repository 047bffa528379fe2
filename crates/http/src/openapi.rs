//! OpenAPI document assembled from module fragments

use serde_json::{json, Value};

use booklist_kernel::ModuleRegistry;

/// Prefix every module is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Absolute path of a module-relative route
pub fn module_path(module_name: &str, path: &str) -> String {
    if path == "/" || path.is_empty() {
        format!("{}/{}", API_PREFIX, module_name)
    } else {
        format!("{}/{}{}", API_PREFIX, module_name, path)
    }
}

/// Build the merged OpenAPI document for all registered modules
pub fn merged_spec(registry: &ModuleRegistry) -> Value {
    let mut openapi_spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "BookList API",
            "version": "1.0.0",
            "description": "Catalog of book records"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    // Shared body for message-only errors
    openapi_spec["components"]["schemas"]["ErrorMessage"] = json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string"
            }
        },
        "required": ["message"]
    });

    openapi_spec["paths"]["/"] = plain_text_path("Welcome message");
    openapi_spec["paths"]["/healthz"] = plain_text_path("Health check");

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                openapi_spec["paths"][module_path(module.name(), path)] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

fn plain_text_path(summary: &str) -> Value {
    json!({
        "get": {
            "summary": summary,
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    })
}
