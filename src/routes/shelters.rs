use actix_web::{web, HttpResponse, Responder};
use chrono::Timelike;
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

use crate::config::RankingSettings;
use crate::core::{FilterSpec, SearchQuery, ShelterRanker};
use crate::models::{
    adapt_listings, EmergencyQuery, EmergencyResponse, ErrorResponse, HealthResponse, NearbyQuery, PageQuery,
    PageResponse, PointQuery, RankResponse, RankSheltersRequest, RankedShelter, ShelterView, SnapshotResponse,
};
use crate::services::{CatalogError, ShelterCatalog};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ShelterCatalog>,
    pub ranker: ShelterRanker,
    pub ranking: RankingSettings,
}

/// Configure all shelter-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/shelters/rank", web::post().to(rank_shelters))
        .route("/shelters/nearby", web::get().to(nearby_shelters))
        .route("/shelters/snapshot", web::get().to(offline_snapshot))
        .route("/shelters", web::get().to(list_shelters))
        .route("/shelters/{id}", web::get().to(shelter_detail))
        .route("/emergency/nearest", web::get().to(emergency_nearest));
}

/// Caller supplied hour, or the server's local wall-clock hour
fn resolve_hour(hour: Option<u8>) -> u8 {
    hour.unwrap_or_else(|| chrono::Local::now().hour() as u8)
}

fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn catalog_unavailable(err: CatalogError) -> HttpResponse {
    tracing::error!("Shelter catalog error: {}", err);
    match &err {
        CatalogError::Listing(_) | CatalogError::Rejected(_) => HttpResponse::BadGateway().json(ErrorResponse {
            error: "Shelter listing unavailable".to_string(),
            message: err.to_string(),
            status_code: 502,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to load shelters".to_string(),
            message: err.to_string(),
            status_code: 500,
        }),
    }
}

fn ranked_views(state: &AppState, ranked: &[RankedShelter<'_>], hour: u8) -> Vec<ShelterView> {
    ranked
        .iter()
        .map(|r| ShelterView::ranked(r, state.ranker.is_open(r.shelter, hour)))
        .collect()
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (status, shelters) = match state.catalog.shelters().await {
        Ok(shelters) => ("healthy", Some(shelters.len())),
        Err(e) => {
            tracing::warn!("Health check could not load shelters: {}", e);
            ("degraded", None)
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        shelters,
    })
}

/// Rank a caller supplied shelter list
///
/// POST /api/v1/shelters/rank
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.7128,
///   "longitude": -74.006,
///   "filters": ["open_now", "family"],
///   "hour": 22,
///   "shelters": [{ "id": "1", "latitude": 40.72, "longitude": -74.0, "capacity": 80, "available_beds": 12 }]
/// }
/// ```
async fn rank_shelters(
    state: web::Data<AppState>,
    req: web::Json<RankSheltersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let origin = req.origin();
    let hour = resolve_hour(req.hour);
    let (records, rejected) = adapt_listings(req.shelters);

    let ranked = state.ranker.rank(origin, &records, &req.filters, hour);
    let results = ranked_views(&state, &ranked, hour);

    tracing::info!(
        "Ranked {} of {} shelters ({} rejected) at hour {}",
        results.len(),
        records.len(),
        rejected.len(),
        hour
    );

    HttpResponse::Ok().json(RankResponse {
        count: results.len(),
        results,
        hour,
        rejected,
    })
}

/// Rank the catalog around a point
///
/// GET /api/v1/shelters/nearby?lat=..&lng=..&filters=open_now,family&radiusKm=10&limit=20
async fn nearby_shelters(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let shelters = match state.catalog.shelters().await {
        Ok(shelters) => shelters,
        Err(e) => return catalog_unavailable(e),
    };

    let hour = resolve_hour(query.hour);
    let search = SearchQuery {
        filters: query.filter_spec(),
        current_hour: hour,
        radius_km: Some(
            query
                .radius_km
                .unwrap_or(state.ranking.default_radius_km)
                .min(state.ranking.max_radius_km),
        ),
        limit: Some(query.limit.unwrap_or(state.ranking.default_limit).min(state.ranking.max_limit)),
    };

    let ranked = state.ranker.search(query.origin(), &shelters, &search);
    let results = ranked_views(&state, &ranked, hour);

    tracing::debug!(
        "Nearby search at ({}, {}) returned {} of {} shelters",
        query.lat,
        query.lng,
        results.len(),
        shelters.len()
    );

    HttpResponse::Ok().json(RankResponse {
        count: results.len(),
        results,
        hour,
        rejected: Vec::new(),
    })
}

/// Paginated catalog in provider order
///
/// GET /api/v1/shelters?page=1&limit=20&hour=22
async fn list_shelters(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let shelters = match state.catalog.shelters().await {
        Ok(shelters) => shelters,
        Err(e) => return catalog_unavailable(e),
    };

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(state.ranking.default_limit).min(state.ranking.max_limit);
    let skip = (page as usize - 1).saturating_mul(limit);
    let total = shelters.len();
    let hour = resolve_hour(query.hour);

    let results = shelters
        .iter()
        .skip(skip)
        .take(limit)
        .map(|s| ShelterView::new(s, None, state.ranker.is_open(s, hour)))
        .collect();

    HttpResponse::Ok().json(PageResponse {
        page,
        limit,
        total,
        has_next: skip.saturating_add(limit) < total,
        results,
    })
}

/// Single shelter, with distance when a reference point is supplied
///
/// GET /api/v1/shelters/{id}?lat=..&lng=..
async fn shelter_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PointQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let shelter_id = path.into_inner();
    let shelter = match state.catalog.find(&shelter_id).await {
        Ok(Some(shelter)) => shelter,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Shelter not found".to_string(),
                message: format!("No shelter with id {}", shelter_id),
                status_code: 404,
            });
        }
        Err(e) => return catalog_unavailable(e),
    };

    let hour = resolve_hour(query.hour);
    let distance = query
        .origin()
        .map(|origin| crate::core::distance_km(origin, shelter.location));

    HttpResponse::Ok().json(ShelterView::new(&shelter, distance, state.ranker.is_open(&shelter, hour)))
}

/// Offline snapshot for clients that lose connectivity
///
/// GET /api/v1/shelters/snapshot?lat=..&lng=..
async fn offline_snapshot(
    state: web::Data<AppState>,
    query: web::Query<PointQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let shelters = match state.catalog.shelters().await {
        Ok(shelters) => shelters,
        Err(e) => return catalog_unavailable(e),
    };

    let hour = resolve_hour(query.hour);
    let limit = state.ranking.snapshot_limit;

    let results: Vec<ShelterView> = match query.origin() {
        Some(origin) => {
            let mut ranked = state.ranker.rank(origin, &shelters, &FilterSpec::new(), hour);
            ranked.truncate(limit);
            ranked_views(&state, &ranked, hour)
        }
        None => shelters
            .iter()
            .take(limit)
            .map(|s| ShelterView::new(s, None, state.ranker.is_open(s, hour)))
            .collect(),
    };

    HttpResponse::Ok().json(SnapshotResponse {
        generated_at: chrono::Utc::now(),
        count: results.len(),
        results,
    })
}

/// Closest open shelter with a free bed
///
/// GET /api/v1/emergency/nearest?lat=..&lng=..
async fn emergency_nearest(
    state: web::Data<AppState>,
    query: web::Query<EmergencyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let shelters = match state.catalog.shelters().await {
        Ok(shelters) => shelters,
        Err(e) => return catalog_unavailable(e),
    };

    let hour = resolve_hour(query.hour);
    let best = state.ranker.nearest_available(query.origin(), &shelters, hour);

    match &best {
        Some(b) => tracing::info!("Emergency lookup: {} at {:.2} km", b.shelter.id, b.distance_km),
        None => tracing::warn!("Emergency lookup at ({}, {}) found no available shelter", query.lat, query.lng),
    }

    HttpResponse::Ok().json(EmergencyResponse {
        shelter: best.map(|b| ShelterView::ranked(&b, true)),
    })
}
