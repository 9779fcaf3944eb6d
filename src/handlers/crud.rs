//! CRUD-over-files handler.
//!
//! # Responsibilities
//! - Serve `/api/<Entity>[/<id>]` with POST/GET/PUT/DELETE
//! - Validate JSON bodies before touching the store
//! - Translate store failures into status codes
//!
//! # Design Decisions
//! - The store is behind the `EntityStore` trait so tests can substitute it
//! - POST generates the ID; PUT is create-or-update at a caller-chosen ID

use std::collections::HashMap;
use std::sync::Arc;

use super::Handler;
use crate::http::{Request, Response};
use crate::storage::{EntityStore, FileStore};

const API_PREFIX: &str = "/api/";

pub struct CrudHandler {
    store: Arc<dyn EntityStore>,
}

impl CrudHandler {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn create(args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        let data_path = args.get("data_path")?;
        let store = match FileStore::new(data_path) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(%data_path, %error, "failed to open crud data path");
                return None;
            }
        };
        tracing::info!(%data_path, "using crud data path");
        Some(Box::new(Self::new(Arc::new(store))))
    }

    fn json_response(status_code: u16, reason_phrase: &str, body: &str) -> Response {
        let mut res = Response::plain_text(status_code, reason_phrase, body);
        res.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        res
    }

    fn post(&self, req: &Request, entity: &str) -> Response {
        tracing::info!(%entity, "handling POST");
        let body = match validate_json_body(&req.body) {
            Ok(body) => body,
            Err(res) => return res,
        };

        let id = match self.store.create(entity) {
            Ok(id) => id,
            Err(error) => {
                tracing::error!(%entity, %error, "failed to create entity");
                return Self::json_response(
                    500,
                    "Internal Server Error",
                    "Failed to create entity\n",
                );
            }
        };
        if let Err(error) = self.store.write(entity, &id, body) {
            tracing::error!(%entity, %id, %error, "failed to write entity data");
            return Self::json_response(
                500,
                "Internal Server Error",
                "Failed to write entity data\n",
            );
        }
        tracing::info!(%entity, %id, "entity created");
        Self::json_response(201, "Created", &format!("{{\"id\": \"{id}\"}}\n"))
    }

    fn get(&self, entity: &str, id: &str) -> Response {
        tracing::info!(%entity, %id, "handling GET");
        if id.is_empty() {
            let ids = match self.store.list(entity) {
                Ok(ids) => ids,
                Err(_) => {
                    return Self::json_response(
                        404,
                        "Not Found",
                        "Entity type does not exist\n",
                    )
                }
            };
            let list = ids
                .iter()
                .map(|id| format!("\"{id}\""))
                .collect::<Vec<_>>()
                .join(", ");
            return Self::json_response(200, "OK", &format!("[{list}]\n"));
        }

        match self.store.read(entity, id) {
            Ok(data) => Self::json_response(200, "OK", &data),
            Err(_) => Self::json_response(404, "Not Found", "Entity not found\n"),
        }
    }

    fn put(&self, req: &Request, entity: &str, id: &str) -> Response {
        tracing::info!(%entity, %id, "handling PUT");
        if id.is_empty() {
            return Self::json_response(
                400,
                "Bad Request",
                "ID must be specified for PUT operation\n",
            );
        }
        let body = match validate_json_body(&req.body) {
            Ok(body) => body,
            Err(res) => return res,
        };

        let existed = self.store.exists(entity, id);
        if let Err(error) = self.store.put(entity, id, body) {
            tracing::error!(%entity, %id, %error, "failed to write entity data");
            return Self::json_response(
                500,
                "Internal Server Error",
                "Failed to write entity data\n",
            );
        }

        let (status, reason) = if existed { (200, "OK") } else { (201, "Created") };
        tracing::info!(%entity, %id, updated = existed, "entity written");
        Self::json_response(status, reason, &format!("{{\"id\": \"{id}\"}}\n"))
    }

    fn delete(&self, entity: &str, id: &str) -> Response {
        tracing::info!(%entity, %id, "handling DELETE");
        if id.is_empty() {
            return Self::json_response(
                400,
                "Bad Request",
                "ID must be specified for DELETE operation\n",
            );
        }
        match self.store.delete(entity, id) {
            Ok(()) => Self::json_response(
                200,
                "OK",
                &format!("{{\"id\": \"{id}\", \"deleted\": true}}\n"),
            ),
            Err(_) => Self::json_response(404, "Not Found", "Entity not found\n"),
        }
    }
}

impl Handler for CrudHandler {
    fn handle(&self, req: &Request) -> Response {
        let path = match req.uri.strip_prefix(API_PREFIX) {
            Some(path) => path,
            None => {
                tracing::debug!(uri = %req.uri, "invalid api prefix");
                return Self::json_response(404, "Not Found", "Invalid API prefix");
            }
        };

        let (entity, id) = match path.split_once('/') {
            Some((entity, id)) => (entity, id),
            None => (path, ""),
        };
        if entity.is_empty() {
            return Self::json_response(400, "Bad Request", "Missing entity type.");
        }

        match req.method.as_str() {
            "POST" => self.post(req, entity),
            "GET" => self.get(entity, id),
            "PUT" => self.put(req, entity, id),
            "DELETE" => self.delete(entity, id),
            _ => Self::json_response(
                405,
                "Method Not Allowed",
                "Unsupported operation for given URI.",
            ),
        }
    }
}

/// Reject empty, whitespace-only, or non-JSON bodies. A valid body comes
/// back as text: JSON that parses is UTF-8.
fn validate_json_body(body: &[u8]) -> Result<&str, Response> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CrudHandler::json_response(
            400,
            "Bad Request",
            "Empty or whitespace-only body\n",
        ));
    }
    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(_) => {
            return Err(CrudHandler::json_response(
                400,
                "Bad Format",
                "Invalid JSON format\n",
            ))
        }
    };
    if serde_json::from_str::<serde_json::Value>(text).is_err() {
        return Err(CrudHandler::json_response(
            400,
            "Bad Format",
            "Invalid JSON format\n",
        ));
    }
    Ok(text)
}
