use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Map, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{authz, models, routes};

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::rbac::list_roles,
		routes::rbac::get_org_role_permissions,
		routes::rbac::get_project_role_permissions,
		routes::rbac::get_my_permissions,
		routes::rbac::has_named_permission,
		routes::rbac::evaluate,
		routes::rbac::can_edit_task,
		routes::rbac::can_delete_task
	),
	components(
		schemas(
			models::rbac::OrgRole,
			models::rbac::ProjectRole,
			models::rbac::OrgPermission,
			models::rbac::ProjectPermission,
			models::rbac::EffectivePermissions,
			models::project::ProjectListScope,
			authz::PermissionScope,
			authz::GateRequest,
			routes::health::HealthResponse,
			routes::rbac::OrgRoleGrants,
			routes::rbac::ProjectRoleGrants,
			routes::rbac::RoleTables,
			routes::rbac::MyPermissionsResponse,
			routes::rbac::EvaluateRequest,
			routes::rbac::TaskCheckRequest,
			routes::rbac::DecisionResponse
		)
	),
	tags(
		(name = "Health", description = "Liveness"),
		(name = "RBAC", description = "Role tables and permission decisions")
	)
)]
pub struct ApiDoc;

pub fn build_openapi(port: u16) -> anyhow::Result<utoipa::openapi::OpenApi> {
	let mut doc = serde_json::to_value(ApiDoc::openapi())?;

	ensure_security_components(&mut doc);
	ensure_openapi_version(&mut doc);
	add_examples(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(serde_json::from_value(doc)?)
}

pub fn swagger_routes(doc: &utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true)
		.with_credentials(true)
		.persist_authorization(true);

	let doc_json = Arc::new(serde_json::to_value(doc)?);

	let json_route = get(move || {
		let doc_json = Arc::clone(&doc_json);
		async move { Json((*doc_json).clone()) }
	});

	Ok(Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config)))
}

fn ensure_security_components(doc: &mut Value) {
	let Some(root) = doc.as_object_mut() else { return; };
	let Some(components) = root
		.entry("components")
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
	else {
		return;
	};
	let Some(schemes) = components
		.entry("securitySchemes")
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
	else {
		return;
	};

	schemes.insert(
		"bearerAuth".to_string(),
		json!({
			"type": "http",
			"scheme": "bearer",
			"bearerFormat": "JWT"
		}),
	);
}

fn ensure_openapi_version(doc: &mut Value) {
	if let Some(root) = doc.as_object_mut() {
		root.entry("openapi")
			.or_insert_with(|| Value::String("3.1.0".to_string()));
	}
}

fn add_examples(doc: &mut Value) {
	if let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) {
		for item in paths.values_mut() {
			if let Some(operations) = item.as_object_mut() {
				for operation in operations.values_mut() {
					apply_request_examples(operation);
				}
			}
		}
	}
}

fn apply_request_examples(operation: &mut Value) {
	let Some(request_body) = operation.get_mut("requestBody") else { return; };
	let Some(content) = request_body.get_mut("content").and_then(Value::as_object_mut) else { return; };
	let Some(app_json) = content.get_mut("application/json").and_then(Value::as_object_mut) else { return; };
	let Some(schema) = app_json.get("schema").and_then(Value::as_object) else { return; };
	let Some(reference) = schema.get("$ref").and_then(Value::as_str) else { return; };

	let example = match reference {
		"#/components/schemas/EvaluateRequest" => Some(json!({
			"project_id": "00000000-0000-0000-0000-000000000000",
			"permission": "manage_members"
		})),
		"#/components/schemas/TaskCheckRequest" => Some(json!({
			"project_id": "00000000-0000-0000-0000-000000000000",
			"assignee_id": "00000000-0000-0000-0000-000000000000"
		})),
		_ => None,
	};

	if let Some(example) = example {
		app_json.insert("example".to_string(), example);
	}
}

fn ensure_servers(doc: &mut Value, port: u16) {
	let server_url = format!("http://localhost:{}", port);

	match doc.get_mut("servers") {
		Some(Value::Array(arr)) => {
			let has = arr.iter().any(|v| v.get("url").and_then(Value::as_str) == Some(server_url.as_str()));
			if !has {
				arr.push(json!({ "url": server_url }));
			}
		}
		_ => {
			doc["servers"] = json!([{ "url": server_url }]);
		}
	}
}
