async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
struct ActionListResponse {
    schema_version: String,
    actions: Vec<ActionDefinition>,
}

async fn list_actions(State(state): State<AppState>) -> Json<ActionListResponse> {
    let service = state.service.lock().await;
    Json(ActionListResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        actions: service.list_actions().to_vec(),
    })
}

#[derive(Debug, Serialize)]
struct UpgradeListResponse {
    schema_version: String,
    upgrades: Vec<UpgradeDefinition>,
}

async fn list_upgrades(State(state): State<AppState>) -> Json<UpgradeListResponse> {
    let service = state.service.lock().await;
    Json(UpgradeListResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        upgrades: service.list_upgrades().to_vec(),
    })
}
