#![allow(dead_code)]

use std::collections::HashMap;

use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::json;
use services::assessment_service::{CreatedAssessment, StartedInstance, create_assessment, start_assessment_instance};
use services::locks::InstanceQuestionLocks;
use services::regrade_service::RegradeOrchestrator;
use services::submission_service::{RecordSubmission, SubmissionOutcome, SubmissionService};
use util::assessment_config::AssessmentConfig;

pub const HW1: &str = r#"{
    "title": "HW1",
    "assessment_type": "homework",
    "max_points": 30,
    "questions": [
        { "qid": "addNumbers", "title": "Add two numbers", "max_points": 5, "init_points": 1 },
        { "qid": "addVectors", "title": "Addition of vectors in Cartesian coordinates", "max_points": 11, "init_points": 2 },
        { "qid": "fossilFuelsRadio", "title": "Advantages of fossil fuels (radio)", "max_points": 14, "init_points": 3 }
    ]
}"#;

pub struct Harness {
    pub db: DatabaseConnection,
    pub locks: InstanceQuestionLocks,
    pub submissions: SubmissionService,
    pub regrades: RegradeOrchestrator,
    pub assessment: CreatedAssessment,
    pub instance: StartedInstance,
    iq_by_qid: HashMap<String, i64>,
}

impl Harness {
    pub async fn new(config_json: &str) -> Self {
        let config: AssessmentConfig = serde_json::from_str(config_json).unwrap();
        let db = setup_test_db().await;
        let locks = InstanceQuestionLocks::new();

        let assessment = create_assessment(&db, &config).await.unwrap();
        let instance = start_assessment_instance(&db, assessment.assessment.id, 1).await.unwrap();

        let iq_by_qid = assessment
            .questions
            .iter()
            .map(|q| {
                let iq = instance.instance_question_for(q.id).unwrap();
                (q.qid.clone(), iq.id)
            })
            .collect();

        Self {
            submissions: SubmissionService::new(db.clone(), locks.clone()),
            regrades: RegradeOrchestrator::new(db.clone(), locks.clone()),
            db,
            locks,
            assessment,
            instance,
            iq_by_qid,
        }
    }

    pub async fn homework() -> Self {
        Self::new(HW1).await
    }

    pub fn iq(&self, qid: &str) -> i64 {
        self.iq_by_qid[qid]
    }

    pub fn instance_id(&self) -> i64 {
        self.instance.instance.id
    }

    pub fn assessment_id(&self) -> i64 {
        self.assessment.assessment.id
    }

    pub async fn grade(&self, qid: &str, score: f64) -> SubmissionOutcome {
        self.submissions
            .record_submission(RecordSubmission::graded(self.iq(qid), json!({ "answer": score }), score))
            .await
            .unwrap()
    }

    pub async fn correct(&self, qid: &str) -> SubmissionOutcome {
        self.grade(qid, 1.0).await
    }

    pub async fn incorrect(&self, qid: &str) -> SubmissionOutcome {
        self.grade(qid, 0.0).await
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
