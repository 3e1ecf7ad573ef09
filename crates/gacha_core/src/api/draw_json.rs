// Draw JSON API
// Stateless: the caller sends the banner and its pity state, gets results and the next state back

use super::banner_json::ViolationReport;
use crate::banner::{BannerConfig, BannerValidator, CatalogItem, ItemCatalog};
use crate::error::{GachaError, InvalidStateError};
use crate::gacha::{seeded, DrawEngine, DrawResult, PityState};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

// ========== Request/Response Structures ==========

#[derive(Debug, Serialize, Deserialize)]
pub struct DrawRequest {
    pub banner: BannerConfig,
    /// Omitted for a player's first pull on this banner
    #[serde(default)]
    pub state: Option<serde_json::Value>,
    #[serde(default = "default_count")]
    pub count: u32,
    /// Fixed seed for replays; random otherwise
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub catalog: Option<Vec<CatalogItem>>,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrawResponse {
    pub success: bool,
    pub results: Vec<DrawResult>,
    /// Indices into `results` in reveal order
    pub display_order: Vec<usize>,
    pub state: Option<PityState>,
    pub seed: Option<u64>,
    pub error: Option<String>,
    pub violations: Vec<ViolationReport>,
}

impl DrawResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            results: vec![],
            display_order: vec![],
            state: None,
            seed: None,
            error: Some(error),
            violations: vec![],
        }
    }
}

// ========== Public API Functions ==========

/// Draw `count` pulls from the request's banner and state
pub fn draw_json(request_json: &str) -> String {
    let response = match serde_json::from_str::<DrawRequest>(request_json) {
        Ok(request) => handle_draw(request),
        Err(e) => DrawResponse::failure(format!("Invalid request format: {}", e)),
    };

    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"success":false,"error":"Serialization failed"}"#.to_string())
}

fn handle_draw(request: DrawRequest) -> DrawResponse {
    let catalog = request.catalog.map(ItemCatalog::from_items);
    let validated = match &catalog {
        Some(catalog) => BannerValidator::validate_with_catalog(request.banner, catalog),
        None => BannerValidator::validate(request.banner),
    };
    let config = match validated {
        Ok(config) => config,
        Err(e) => {
            warn!("Draw rejected: {}", e);
            let mut response = DrawResponse::failure("Banner config invalid".to_string());
            response.violations = e.violations.iter().map(Into::into).collect();
            return response;
        }
    };

    if !config.is_enabled() {
        warn!("Draw rejected: banner '{}' is disabled", config.banner_id());
        return DrawResponse::failure(format!("Banner '{}' is disabled", config.banner_id()));
    }

    let state = match request.state {
        None => PityState::new(),
        Some(value) => match serde_json::from_value::<PityState>(value) {
            Ok(state) => state,
            Err(e) => {
                let e = InvalidStateError::Malformed(e.to_string());
                warn!("Draw rejected: {}", e);
                return DrawResponse::failure(e.to_string());
            }
        },
    };

    let seed = request.seed.unwrap_or_else(rand::random);
    let engine = match &catalog {
        Some(catalog) => DrawEngine::with_catalog(&config, catalog),
        None => DrawEngine::new(&config),
    };

    match engine.draw_batch(&state, request.count, &mut seeded(seed)) {
        Ok(outcome) => {
            let display_order = outcome.display_indices(catalog.as_ref());
            info!(
                "Drew {} on banner '{}' (seed {}): best {:?}",
                request.count,
                config.banner_id(),
                seed,
                outcome.best_rarity()
            );
            DrawResponse {
                success: true,
                results: outcome.results.clone(),
                display_order,
                state: Some(outcome.state),
                seed: Some(seed),
                error: None,
                violations: vec![],
            }
        }
        Err(e) => {
            if let GachaError::EmptyPool(_) = e {
                error!("Draw defect on banner '{}': {}", config.banner_id(), e);
            } else {
                debug!("Draw rejected: {}", e);
            }
            DrawResponse::failure(e.to_string())
        }
    }
}
