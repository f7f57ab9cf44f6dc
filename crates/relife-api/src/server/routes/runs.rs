#[derive(Debug, Deserialize)]
struct ActionRequest {
    action_id: String,
}

async fn create_run(State(state): State<AppState>) -> Result<Json<RunSnapshot>, HttpApiError> {
    let service = state.service.lock().await;
    let snapshot = service.start_run().map_err(HttpApiError::from_store)?;
    Ok(Json(snapshot))
}

async fn get_run(
    Path(run_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RunSnapshot>, HttpApiError> {
    let service = state.service.lock().await;
    match service.get_run(&run_id).map_err(HttpApiError::from_store)? {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err(HttpApiError::run_not_found(&run_id)),
    }
}

async fn apply_action(
    Path(run_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<TurnResult>, HttpApiError> {
    let service = state.service.lock().await;
    match service
        .apply_action(&run_id, &request.action_id)
        .map_err(HttpApiError::from_store)?
    {
        Some(result) => Ok(Json(result)),
        None => Err(HttpApiError::run_not_found(&run_id)),
    }
}

async fn next_month(
    Path(run_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MonthResolution>, HttpApiError> {
    let service = state.service.lock().await;
    match service
        .resolve_month(&run_id)
        .map_err(HttpApiError::from_store)?
    {
        Some(resolution) => Ok(Json(resolution)),
        None => Err(HttpApiError::run_not_found(&run_id)),
    }
}
