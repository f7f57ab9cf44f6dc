#[derive(Clone)]
struct AppState {
    service: Arc<Mutex<GameService>>,
}

impl AppState {
    fn new(service: GameService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }
}
