mod common;

use common::Harness;
use db::models::{assessment_instance, instance_question, submission};
use futures::future::join_all;
use serde_json::json;
use services::ServiceError;
use services::assessment_service::start_assessment_instance;
use services::regrade_service::{RegradeState, RegradeStatus};
use services::submission_service::RecordSubmission;
use util::assessment_config::ConfigChanges;

#[tokio::test]
async fn record_is_rejected_while_question_is_locked() {
    let h = Harness::homework().await;
    let iq = h.iq("addVectors");

    let guard = h.locks.try_acquire(iq).unwrap();
    let err = h
        .submissions
        .record_submission(RecordSubmission::graded(iq, json!({"a": 1}), 1.0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ConcurrentModification { instance_question_id } if instance_question_id == iq
    ));
    assert_eq!(submission::Model::count_for_instance_question(&h.db, iq).await.unwrap(), 0);

    // Other questions of the same instance are unaffected.
    assert_eq!(h.correct("addNumbers").await.question.points, 1.0);

    drop(guard);
    assert_eq!(h.correct("addVectors").await.question.points, 2.0);
}

#[tokio::test]
async fn regrade_is_rejected_while_any_question_is_locked() {
    let h = Harness::homework().await;
    h.correct("addVectors").await;

    let guard = h.locks.try_acquire(h.iq("fossilFuelsRadio")).unwrap();
    let changes = ConfigChanges::new().with_question_max_points("addVectors", 1.0);
    let err = h
        .regrades
        .regrade_assessment_instance(h.instance_id(), &changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ConcurrentModification { .. }));
    assert_eq!(h.regrades.state(h.instance_id()).await, RegradeState::Idle);

    let iq = instance_question::Model::get_by_id(&h.db, h.iq("addVectors")).await.unwrap().unwrap();
    assert_eq!(iq.max_points, 11.0);
    assert_eq!(iq.points, 2.0);

    // The locks a failed regrade managed to take were released.
    assert!(!h.locks.is_locked(h.iq("addNumbers")));
    assert!(!h.locks.is_locked(h.iq("addVectors")));

    drop(guard);
    let result = h
        .regrades
        .regrade_assessment_instance(h.instance_id(), &changes)
        .await
        .unwrap();
    assert_eq!(result.assessment.points, 1.0);
}

#[tokio::test]
async fn racing_submissions_never_interleave() {
    let h = Harness::homework().await;
    let iq = h.iq("addVectors");

    let attempts = (0..8).map(|i| {
        h.submissions
            .record_submission(RecordSubmission::graded(iq, json!({ "attempt": i }), 1.0))
    });
    let results = join_all(attempts).await;

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert!(accepted >= 1);
    for r in &results {
        if let Err(err) = r {
            assert!(matches!(err, ServiceError::ConcurrentModification { .. }));
        }
    }

    let history = submission::Model::get_by_instance_question_id(&h.db, iq).await.unwrap();
    assert_eq!(history.len(), accepted);

    let stored = instance_question::Model::get_by_id(&h.db, iq).await.unwrap().unwrap();
    assert_eq!(stored.number_attempts as usize, accepted);
    let best = history.iter().filter_map(|s| s.points).fold(0.0, f64::max);
    assert_eq!(stored.points, best);

    let ai = assessment_instance::Model::get_by_id(&h.db, h.instance_id()).await.unwrap().unwrap();
    assert_eq!(ai.points, stored.points);
}

#[tokio::test]
async fn assessment_regrade_skips_busy_instance_and_continues() {
    let h = Harness::homework().await;
    let second = start_assessment_instance(&h.db, h.assessment_id(), 2).await.unwrap();
    let third = start_assessment_instance(&h.db, h.assessment_id(), 3).await.unwrap();
    let busy_iq = second.instance_questions[0].id;

    let guard = h.locks.try_acquire(busy_iq).unwrap();
    let changes = ConfigChanges::new().with_assessment_max_points(13.0);
    let report = h.regrades.regrade_assessment(h.assessment_id(), &changes).await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.skipped_instance_ids(), vec![second.instance.id]);
    assert!(report.skipped[0].busy);
    assert_eq!(report.result_for(h.instance_id()).unwrap().status, RegradeStatus::Completed);
    assert!(report.result_for(third.instance.id).is_some());

    let max_of = |id: i64| {
        let db = h.db.clone();
        async move {
            assessment_instance::Model::get_by_id(&db, id)
                .await
                .unwrap()
                .unwrap()
                .max_points
        }
    };
    assert_eq!(max_of(h.instance_id()).await, 13.0);
    assert_eq!(max_of(second.instance.id).await, 30.0);
    assert_eq!(max_of(third.instance.id).await, 13.0);
    assert_eq!(h.regrades.state(second.instance.id).await, RegradeState::Idle);

    drop(guard);
    let retry = h.regrades.regrade_assessment(h.assessment_id(), &changes).await.unwrap();
    assert!(retry.is_complete());
    assert_eq!(retry.results.len(), 3);
    assert_eq!(max_of(second.instance.id).await, 13.0);
}
