mod common;

use common::{Harness, approx};
use db::models::{assessment, assessment_question, instance_question, submission};
use serde_json::json;
use scoring::types::QuestionScore;
use services::ServiceError;
use services::regrade_service::{RegradeState, RegradeStatus};
use services::scores::instance_scores;
use services::submission_service::RecordSubmission;
use util::assessment_config::ConfigChanges;

#[tokio::test]
async fn homework_sequence_then_regrade() {
    let h = Harness::homework().await;

    // (qid, correct, question points, assessment points)
    let steps = [
        ("addVectors", true, 2.0, 2.0),
        ("fossilFuelsRadio", true, 3.0, 5.0),
        ("addVectors", false, 2.0, 5.0),
        ("addVectors", true, 4.0, 7.0),
        ("addVectors", true, 8.0, 11.0),
        ("addVectors", true, 11.0, 14.0),
        ("addVectors", true, 11.0, 14.0),
        ("addNumbers", false, 0.0, 14.0),
        ("addNumbers", true, 1.0, 15.0),
        ("fossilFuelsRadio", true, 9.0, 21.0),
        ("fossilFuelsRadio", false, 9.0, 21.0),
        ("fossilFuelsRadio", true, 12.0, 24.0),
        ("fossilFuelsRadio", false, 12.0, 24.0),
    ];

    for (i, (qid, correct, question_points, total)) in steps.iter().enumerate() {
        let outcome = if *correct { h.correct(qid).await } else { h.incorrect(qid).await };
        assert_eq!(outcome.question.points, *question_points, "step {} ({qid})", i + 1);
        assert_eq!(outcome.assessment.points, *total, "step {} total", i + 1);

        if i == 6 {
            assert_eq!(outcome.question.score_perc, 100.0);
            assert!(approx(outcome.assessment.score_perc, 14.0 / 30.0 * 100.0));
        }
    }

    let before = instance_scores(&h.db, h.instance_id()).await.unwrap();
    assert_eq!(before.points, 24.0);
    assert_eq!(before.max_points, 30.0);
    assert!(approx(before.score_perc, 80.0));

    let changes = ConfigChanges::new().with_assessment_max_points(13.0);
    let report = h.regrades.regrade_assessment(h.assessment_id(), &changes).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.results.len(), 1);

    let result = report.results.into_iter().next().unwrap();
    assert_eq!(result.status, RegradeStatus::Completed);
    assert!(result.failures.is_empty());
    assert_eq!(h.regrades.state(h.instance_id()).await, RegradeState::Completed);

    let by_qid = |qid: &str| result.questions.iter().find(|q| q.qid == qid).unwrap().clone();
    assert_eq!((by_qid("addNumbers").score.points, by_qid("addNumbers").max_points), (1.0, 5.0));
    assert_eq!((by_qid("addVectors").score.points, by_qid("addVectors").max_points), (11.0, 11.0));
    assert_eq!(
        (by_qid("fossilFuelsRadio").score.points, by_qid("fossilFuelsRadio").max_points),
        (12.0, 14.0)
    );

    assert_eq!(result.assessment.points, 24.0);
    assert_eq!(result.assessment.max_points, 13.0);
    assert_eq!(result.assessment.credited_points, 13.0);
    assert_eq!(result.assessment.credited_score_perc, 100.0);

    let stored = assessment::Model::get_by_id(&h.db, h.assessment_id()).await.unwrap().unwrap();
    assert_eq!(stored.max_points, 13.0);

    let after = instance_scores(&h.db, h.instance_id()).await.unwrap();
    assert_eq!(after.credited_points, 13.0);
    let bar = after.scorebar.unwrap();
    assert_eq!(bar.width, 100);
    assert_eq!(bar.label, "184.62%");

    let fossil = after.questions.iter().find(|q| q.qid == "fossilFuelsRadio").unwrap();
    let fossil_bar = fossil.scorebar.clone().unwrap();
    assert_eq!(fossil_bar.width, 85);
    assert_eq!(fossil_bar.label, "85.71%");
    assert!(fossil_bar.label_inside);
}

#[tokio::test]
async fn regrade_is_idempotent() {
    let h = Harness::homework().await;
    h.correct("addVectors").await;
    h.correct("addVectors").await;
    h.grade("fossilFuelsRadio", 0.5).await;

    let changes = ConfigChanges::new()
        .with_assessment_max_points(20.0)
        .with_question_max_points("addVectors", 3.0);

    let first = h.regrades.regrade_assessment_instance(h.instance_id(), &changes).await.unwrap();
    let second = h.regrades.regrade_assessment_instance(h.instance_id(), &changes).await.unwrap();

    assert_eq!(first.questions, second.questions);
    assert_eq!(first.assessment, second.assessment);
    assert_eq!(first.assessment.points, 3.0 + 1.5);
}

#[tokio::test]
async fn regrade_leaves_history_untouched() {
    let h = Harness::homework().await;
    for _ in 0..4 {
        h.correct("addVectors").await;
    }
    h.incorrect("addVectors").await;

    let iq = h.iq("addVectors");
    let history_before = submission::Model::get_by_instance_question_id(&h.db, iq).await.unwrap();

    let changes = ConfigChanges::new().with_question_max_points("addVectors", 5.0);
    let report = h.regrades.regrade_assessment(h.assessment_id(), &changes).await.unwrap();
    let regraded = report.results[0].questions.iter().find(|q| q.qid == "addVectors").unwrap();
    assert_eq!(regraded.score.points, 5.0);
    assert_eq!(regraded.score.score_perc, 100.0);

    let history_after = submission::Model::get_by_instance_question_id(&h.db, iq).await.unwrap();
    assert_eq!(history_before, history_after);
    assert_eq!(
        submission::Model::count_for_instance_question(&h.db, iq).await.unwrap(),
        5
    );

    let question = assessment_question::Model::get_by_qid(&h.db, h.assessment_id(), "addVectors")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(question.max_points, 5.0);
}

#[tokio::test]
async fn zero_max_points_is_a_partial_failure() {
    let h = Harness::homework().await;
    h.correct("addNumbers").await;
    h.correct("addVectors").await;
    h.correct("fossilFuelsRadio").await;

    let changes = ConfigChanges::new().with_question_max_points("addNumbers", 0.0);
    let result = h
        .regrades
        .regrade_assessment_instance(h.instance_id(), &changes)
        .await
        .unwrap();

    assert_eq!(result.status, RegradeStatus::PartialFailure);
    assert_eq!(result.failed_instance_question_ids(), vec![h.iq("addNumbers")]);
    assert_eq!(result.questions.len(), 2);
    assert_eq!(result.assessment.points, 2.0 + 3.0);
    assert_eq!(h.regrades.state(h.instance_id()).await, RegradeState::Completed);

    let iq = instance_question::Model::get_by_id(&h.db, h.iq("addNumbers")).await.unwrap().unwrap();
    assert_eq!(iq.points, 0.0);
    assert_eq!(iq.score_perc, 0.0);

    let err = result.into_result().unwrap_err();
    assert!(matches!(
        err,
        ServiceError::RegradePartialFailure { failed, .. } if failed == vec![h.iq("addNumbers")]
    ));
}

#[tokio::test]
async fn unknown_question_in_changes_changes_nothing() {
    let h = Harness::homework().await;
    h.correct("addVectors").await;

    let changes = ConfigChanges::new()
        .with_assessment_max_points(10.0)
        .with_question_max_points("noSuchQuestion", 3.0);
    let err = h.regrades.regrade_assessment(h.assessment_id(), &changes).await.unwrap_err();
    assert!(matches!(err, ServiceError::Config(_)));

    let stored = assessment::Model::get_by_id(&h.db, h.assessment_id()).await.unwrap().unwrap();
    assert_eq!(stored.max_points, 30.0);
    assert_eq!(h.regrades.state(h.instance_id()).await, RegradeState::Idle);
}

#[tokio::test]
async fn negative_changes_are_rejected() {
    let h = Harness::homework().await;
    let changes = ConfigChanges::new().with_question_max_points("addVectors", -1.0);
    let err = h
        .regrades
        .regrade_assessment_instance(h.instance_id(), &changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Config(_)));
}

#[tokio::test]
async fn saved_answers_do_not_change_scores() {
    let h = Harness::homework().await;
    h.correct("addVectors").await;

    let saved = h
        .submissions
        .record_submission(RecordSubmission::saved(h.iq("addVectors"), json!({"draft": true})))
        .await
        .unwrap();
    assert_eq!(saved.submission.score, None);
    assert_eq!(saved.submission.points, None);
    assert_eq!(saved.question.points, 2.0);
    assert_eq!(saved.assessment.points, 2.0);

    let iq = instance_question::Model::get_by_id(&h.db, h.iq("addVectors")).await.unwrap().unwrap();
    assert_eq!(iq.number_attempts, 1);
    assert_eq!(iq.current_value, 4.0);

    // The next correct answer still climbs the ladder.
    assert_eq!(h.correct("addVectors").await.question.points, 6.0);
}

#[tokio::test]
async fn grading_disabled_accepts_saves_only() {
    let h = Harness::new(
        r#"{
            "title": "Exam 1",
            "assessment_type": "exam",
            "allow_real_time_grading": false,
            "questions": [ { "qid": "q1", "max_points": 10 } ]
        }"#,
    )
    .await;
    let iq = h.iq("q1");

    let err = h
        .submissions
        .record_submission(RecordSubmission::graded(iq, json!({"a": 1}), 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::GradingDisabled { .. }));
    assert_eq!(submission::Model::count_for_instance_question(&h.db, iq).await.unwrap(), 0);

    h.submissions
        .record_submission(RecordSubmission::saved(iq, json!({"a": 1})))
        .await
        .unwrap();
    assert_eq!(submission::Model::count_for_instance_question(&h.db, iq).await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_answers_are_not_recorded() {
    let h = Harness::homework().await;
    let iq = h.iq("addNumbers");

    let empty = h
        .submissions
        .record_submission(RecordSubmission::graded(iq, json!({}), 1.0))
        .await
        .unwrap_err();
    assert!(matches!(empty, ServiceError::InvalidAnswer(_)));

    let out_of_range = h
        .submissions
        .record_submission(RecordSubmission::graded(iq, json!({"a": 1}), 1.5))
        .await
        .unwrap_err();
    assert!(matches!(out_of_range, ServiceError::InvalidAnswer(_)));

    let not_a_number = h
        .submissions
        .record_submission(RecordSubmission::graded(iq, json!({"a": 1}), f64::NAN))
        .await
        .unwrap_err();
    assert!(matches!(not_a_number, ServiceError::InvalidAnswer(_)));

    assert_eq!(submission::Model::count_for_instance_question(&h.db, iq).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_instance_question_is_not_found() {
    let h = Harness::homework().await;
    let err = h
        .submissions
        .record_submission(RecordSubmission::graded(9999, json!({"a": 1}), 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn exam_questions_keep_the_best_flat_score() {
    let h = Harness::new(
        r#"{
            "title": "Exam 1",
            "questions": [
                { "qid": "q1", "max_points": 10 },
                { "qid": "q2", "max_points": 6 }
            ]
        }"#,
    )
    .await;

    assert_eq!(h.grade("q1", 0.5).await.submission.points, Some(5.0));
    let outcome = h.grade("q1", 0.3).await;
    assert_eq!(outcome.submission.points, Some(3.0));
    assert_eq!(outcome.question.points, 5.0);

    let outcome = h.grade("q2", 1.0).await;
    assert_eq!(outcome.assessment.points, 11.0);
    assert_eq!(outcome.assessment.max_points, 16.0);
}

#[tokio::test]
async fn grading_a_zero_max_question_still_succeeds() {
    let h = Harness::homework().await;
    h.correct("addNumbers").await;
    h.correct("addVectors").await;

    let changes = ConfigChanges::new().with_question_max_points("addVectors", 0.0);
    let regrade = h
        .regrades
        .regrade_assessment_instance(h.instance_id(), &changes)
        .await
        .unwrap();
    assert_eq!(regrade.status, RegradeStatus::PartialFailure);
    assert_eq!(regrade.assessment.points, 1.0);

    let outcome = h.correct("addVectors").await;
    assert_eq!(outcome.question, QuestionScore::default());
    assert_eq!(outcome.submission.points, Some(0.0));
    assert_eq!(outcome.assessment.points, 1.0);

    let iq = instance_question::Model::get_by_id(&h.db, h.iq("addVectors")).await.unwrap().unwrap();
    assert_eq!(iq.number_attempts, 2);
    assert_eq!((iq.points, iq.score_perc), (0.0, 0.0));

    // The instance total is still recomputed on that path.
    let outcome = h.correct("addNumbers").await;
    assert_eq!(outcome.question.points, 3.0);
    assert_eq!(outcome.assessment.points, 3.0);
}
