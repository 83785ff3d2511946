use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{MatchError, PeerMatcher};
use crate::models::{
    is_known_interest, ErrorResponse, FindPeersRequest, FindPeersResponse, HealthResponse,
    MatchedPeer, RegisterStudentRequest, RegisterStudentResponse, SaveInterestsRequest,
    SaveInterestsResponse, INTEREST_VOCABULARY,
};
use crate::services::{PostgresClient, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub matcher: PeerMatcher,
}

/// Configure all peer-matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/interests/vocabulary", web::get().to(get_vocabulary))
        .route("/interests", web::get().to(get_interests))
        .route("/interests", web::put().to(save_interests))
        .route("/students", web::get().to(get_student))
        .route("/students", web::post().to(register_student))
        .route("/peers/find", web::post().to(find_peers));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Fixed interest vocabulary
///
/// GET /api/v1/interests/vocabulary
async fn get_vocabulary() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "interests": INTEREST_VOCABULARY,
        "count": INTEREST_VOCABULARY.len(),
    }))
}

/// Get a student's saved interests
///
/// GET /api/v1/interests?studentId={id}
async fn get_interests(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let student_id = match query.get("studentId").and_then(|id| id.parse::<i64>().ok()) {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing studentId parameter".to_string(),
                message: "studentId query parameter is required and must be an integer".to_string(),
                status_code: 400,
            });
        }
    };

    match state.postgres.get_interests(student_id).await {
        Ok(interests) => HttpResponse::Ok().json(serde_json::json!({
            "studentId": student_id,
            "interests": interests,
            "count": interests.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch interests for {}: {}", student_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interests".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Replace a student's saved interests
///
/// PUT /api/v1/interests
///
/// Request body:
/// ```json
/// {
///   "studentId": 1,
///   "interests": ["math", "physics"]
/// }
/// ```
async fn save_interests(
    state: web::Data<AppState>,
    req: web::Json<SaveInterestsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if let Some(unknown) = first_unknown_interest(&req.interests) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Unknown interest".to_string(),
            message: format!("'{}' is not in the interest vocabulary", unknown),
            status_code: 400,
        });
    }

    // Reject saves for unregistered students up front
    if let Err(e) = state.postgres.get_student(req.student_id).await {
        return store_error_response(e, "Failed to look up student");
    }

    match state.postgres.replace_interests(req.student_id, &req.interests).await {
        Ok(()) => HttpResponse::Ok().json(SaveInterestsResponse {
            success: true,
            saved: req.interests.len(),
        }),
        Err(e) => {
            tracing::error!("Failed to save interests for {}: {}", req.student_id, e);
            store_error_response(e, "Failed to save interests")
        }
    }
}

/// Look up a student by email (the identity the rest of the application
/// knows a logged-in user by)
///
/// GET /api/v1/students?email={email}
async fn get_student(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let email = match query.get("email") {
        Some(email) => email,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing email parameter".to_string(),
                message: "email query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.postgres.get_student_by_email(email).await {
        Ok(student) => HttpResponse::Ok().json(student),
        Err(e) => {
            tracing::debug!("Student lookup failed for {}: {}", email, e);
            store_error_response(e, "Failed to look up student")
        }
    }
}

/// Register a new student with initial interests
///
/// POST /api/v1/students
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "interests": ["math"]
/// }
/// ```
async fn register_student(
    state: web::Data<AppState>,
    req: web::Json<RegisterStudentRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if let Some(unknown) = first_unknown_interest(&req.interests) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Unknown interest".to_string(),
            message: format!("'{}' is not in the interest vocabulary", unknown),
            status_code: 400,
        });
    }

    match state
        .postgres
        .register_student(&req.name, &req.email, &req.interests)
        .await
    {
        Ok(student_id) => {
            tracing::info!("Registered student {} ({})", student_id, req.email);
            HttpResponse::Created().json(RegisterStudentResponse { student_id })
        }
        Err(e) => {
            tracing::error!("Failed to register student {}: {}", req.email, e);
            store_error_response(e, "Failed to register student")
        }
    }
}

/// Find matching peers for a student
///
/// POST /api/v1/peers/find
///
/// Request body:
/// ```json
/// {
///   "studentId": 1,
///   "topN": 5
/// }
/// ```
async fn find_peers(
    state: web::Data<AppState>,
    req: web::Json<FindPeersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let student_id = req.student_id;
    // Cap top_n to keep response sizes bounded
    let top_n = req.top_n.min(50) as usize;

    tracing::info!("Finding peers for student: {}, top_n: {}", student_id, top_n);

    // Fresh snapshot of the assignment relation on every request
    let assignments = match state.postgres.get_assignments().await {
        Ok(assignments) => assignments,
        Err(e) => {
            tracing::error!("Failed to fetch assignments: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interest assignments".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::debug!("Loaded {} interest assignments", assignments.len());

    let result = match state.matcher.find_peers(&assignments, student_id, top_n) {
        Ok(result) => result,
        Err(MatchError::EmptyPopulation) => {
            tracing::info!("No interest data on file, returning empty match list");
            return HttpResponse::Ok().json(FindPeersResponse {
                matches: vec![],
                total_students: 0,
            });
        }
        Err(e @ MatchError::StudentNotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Student has no recorded interests".to_string(),
                message: e.to_string(),
                status_code: 404,
            });
        }
    };

    // Enrich ids with display names for the presentation layer
    let ids: Vec<i64> = result.matches.iter().map(|m| m.student_id).collect();
    let names = match state.postgres.get_student_names(&ids).await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("Failed to fetch student names, returning ids only: {}", e);
            std::collections::HashMap::new()
        }
    };

    let matches: Vec<MatchedPeer> = result
        .matches
        .into_iter()
        .map(|m| MatchedPeer {
            student_id: m.student_id,
            name: names
                .get(&m.student_id)
                .cloned()
                .unwrap_or_else(|| format!("Student {}", m.student_id)),
            score: m.score,
        })
        .collect();

    tracing::info!(
        "Returning {} peers for student {} (population {})",
        matches.len(),
        student_id,
        result.total_students
    );

    HttpResponse::Ok().json(FindPeersResponse {
        matches,
        total_students: result.total_students,
    })
}

fn first_unknown_interest(interests: &[String]) -> Option<&String> {
    interests.iter().find(|i| !is_known_interest(i.as_str()))
}

fn store_error_response(error: StoreError, context: &str) -> HttpResponse {
    match &error {
        StoreError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: context.to_string(),
            message: error.to_string(),
            status_code: 404,
        }),
        StoreError::UnknownInterest(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: context.to_string(),
            message: error.to_string(),
            status_code: 400,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: context.to_string(),
            message: error.to_string(),
            status_code: 500,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_first_unknown_interest() {
        let interests = vec!["math".to_string(), "astrology".to_string()];
        assert_eq!(first_unknown_interest(&interests).unwrap(), "astrology");

        let interests = vec!["math".to_string(), "physics".to_string()];
        assert!(first_unknown_interest(&interests).is_none());
    }
}
