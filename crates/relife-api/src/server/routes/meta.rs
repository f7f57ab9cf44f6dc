#[derive(Debug, Serialize)]
struct MetaResponse {
    schema_version: String,
    meta: MetaState,
}

async fn get_meta(State(state): State<AppState>) -> Result<Json<MetaResponse>, HttpApiError> {
    let service = state.service.lock().await;
    let meta = service.get_meta().map_err(HttpApiError::from_store)?;
    Ok(Json(MetaResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        meta,
    }))
}

#[derive(Debug, Deserialize)]
struct UpgradeRequest {
    upgrade_id: String,
}

async fn purchase_upgrade(
    State(state): State<AppState>,
    Json(request): Json<UpgradeRequest>,
) -> Result<Json<UpgradePurchaseResult>, HttpApiError> {
    let service = state.service.lock().await;
    let result = service
        .purchase_upgrade(&request.upgrade_id)
        .map_err(HttpApiError::from_store)?;
    Ok(Json(result))
}
