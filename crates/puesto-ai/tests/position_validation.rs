//! Integration scenarios for the job-position validation workflow.
//!
//! Scenarios go through the public service facade and HTTP router only, from
//! loosely structured judge output to the stored 2-of-3 decision.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use puesto_ai::workflows::positions::{
        EvaluationConfig, NotifierError, PositionId, PositionValidationService, RepositoryError,
        ReviewNotifier, ReviewRequest, ValidationRecord, ValidationRepository,
    };

    #[derive(Default, Clone)]
    pub(super) struct Repository {
        records: Arc<Mutex<HashMap<PositionId, ValidationRecord>>>,
    }

    impl ValidationRepository for Repository {
        fn upsert(&self, record: ValidationRecord) -> Result<(), RepositoryError> {
            self.records
                .lock()
                .expect("repository mutex poisoned")
                .insert(record.outcome.position_id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &PositionId) -> Result<Option<ValidationRecord>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .get(id)
                .cloned())
        }

        fn rejected(&self, limit: usize) -> Result<Vec<ValidationRecord>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .values()
                .filter(|record| !record.outcome.classification().is_approved())
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct Notifier {
        requests: Arc<Mutex<Vec<ReviewRequest>>>,
    }

    impl Notifier {
        pub(super) fn requests(&self) -> Vec<ReviewRequest> {
            self.requests.lock().expect("notifier mutex poisoned").clone()
        }
    }

    impl ReviewNotifier for Notifier {
        fn publish(&self, request: ReviewRequest) -> Result<(), NotifierError> {
            self.requests
                .lock()
                .expect("notifier mutex poisoned")
                .push(request);
            Ok(())
        }
    }

    pub(super) fn service() -> (Arc<PositionValidationService<Repository, Notifier>>, Notifier) {
        let notifier = Notifier::default();
        let service = Arc::new(PositionValidationService::new(
            Arc::new(Repository::default()),
            Arc::new(notifier.clone()),
            EvaluationConfig::default(),
        ));
        (service, notifier)
    }
}

mod judge_output {
    use puesto_ai::workflows::positions::{
        normalize_judge_response, Classification, Criterion, CriterionVerdict, PositionId,
        PositionInput, ValidationEngine, EvaluationConfig,
    };
    use serde_json::json;

    use super::common::service;

    fn judged(level: &str, functions: serde_json::Value) -> PositionInput {
        PositionInput {
            position_id: PositionId(format!("PZA-{level}")),
            level_code: level.to_string(),
            functions: normalize_judge_response(&functions),
        }
    }

    #[test]
    fn director_of_area_with_one_out_of_range_function_is_approved() {
        let input = judged(
            "M33",
            json!({ "funciones": [
                { "verbo": "Coordinar", "alcance": "institucional", "consecuencias": "táctico",
                  "complejidad": "analítica", "verbo_apropiado": true, "alineacion": "alineada" },
                { "verbo": "Supervisar", "alcance": "institucional", "consecuencias": "táctico",
                  "complejidad": "analítica", "verbo_apropiado": true, "alineacion": "parcial" },
                { "verbo": "Aprobar", "alcance": "estratégico nacional", "consecuencias": "sistémico",
                  "complejidad": "innovadora", "verbo_apropiado": false, "alineacion": "no alineada" }
            ]}),
        );

        let outcome = ValidationEngine::new(EvaluationConfig::default()).validate(&input);

        assert_eq!(outcome.classification(), Classification::Aprobado);
        let impact = outcome.criterion(Criterion::ImpactCoherence);
        assert_eq!(impact.critical_count, 1);
        assert_eq!(impact.result, CriterionVerdict::Pass);
        let alignment = outcome.criterion(Criterion::NormativeAlignment);
        assert_eq!(
            (alignment.critical_count, alignment.moderate_count, alignment.approved_count),
            (1, 1, 1)
        );
    }

    #[test]
    fn unparseable_judge_output_is_rejected_for_review() {
        let (service, notifier) = service();
        let input = judged(
            "O21",
            json!([{ "verb": "Gestionar" }, { "verb": "Operar", "scope": "cósmico" }]),
        );

        let outcome = service.validate(&input).expect("validates");

        assert_eq!(outcome.classification(), Classification::Rechazado);
        assert_eq!(outcome.final_decision.criteria_passed, 0);
        assert_eq!(notifier.requests().len(), 1);
        assert_eq!(notifier.requests()[0].failed_criteria.len(), 3);
    }

    #[test]
    fn stored_outcome_matches_returned_outcome() {
        let (service, _) = service();
        let input = judged("P11", json!([]));

        let outcome = service.validate(&input).expect("validates");
        let record = service
            .get(&PositionId("PZA-P11".to_string()))
            .expect("stored");

        assert_eq!(record.outcome, outcome);
        assert_eq!(record.status_view().classification, "APROBADO");
    }
}

mod http {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use puesto_ai::workflows::positions::position_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::service;

    #[tokio::test]
    async fn validate_then_fetch_status() {
        let (service, _) = service();
        let router = position_router(service);

        let body = json!({
            "puesto_id": "UAF-L21-07",
            "nivel": "L21",
            "funciones": [
                { "verbo": "Planear", "alcance": "institucional", "consecuencias": "táctico",
                  "complejidad": "estratégica", "verbo_apropiado": "sí", "alineacion": "alineada" }
            ]
        });
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/positions/validate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/positions/UAF-L21-07")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["classification"], "APROBADO");
        assert_eq!(value["criteria_passed"], 3);
        assert_eq!(value["accion_requerida"], "Ninguna");
    }
}
