use chrono::Utc;
use wp_core::entities::{
    ActionPlan, Assessment, CareerAnalysis, CareerPath, RecommendedStream, RiasecProfile,
    UserProfile,
};
use wp_core::enums::AssessmentStatus;

pub fn student() -> UserProfile {
    UserProfile {
        id: "usr-00000001".into(),
        name: "Asha".into(),
        email: "asha@example.com".into(),
        class_level: Some("10".into()),
        age: Some(15),
        created_at: Utc::now(),
    }
}

pub fn completed_assessment() -> Assessment {
    let now = Utc::now();
    let mut a = Assessment::new("asm-00000001", "usr-00000001", now);
    a.status = AssessmentStatus::Completed;
    a.completed_at = Some(now);
    a.scores.riasec.investigative = 82;
    a.scores.riasec.social = 75;
    a.scores.riasec.realistic = 40;
    a
}

pub fn sample_analysis() -> CareerAnalysis {
    CareerAnalysis {
        summary: "A curious student who enjoys helping people.".into(),
        riasec_profile: RiasecProfile {
            dominant_trait: "Investigative".into(),
            secondary_trait: "Social".into(),
            description: String::new(),
        },
        recommended_stream: RecommendedStream {
            primary: "Science".into(),
            reasoning: "Balanced aptitude profile.".into(),
            alternatives: vec![],
        },
        career_paths: vec![CareerPath {
            title: "Research Scientist".into(),
            description: String::new(),
            match_score: 95,
            required_education: "B.Sc + M.Sc".into(),
            entrance_exams: vec!["IISER Aptitude Test".into()],
            top_colleges: vec![],
        }],
        strengths: vec!["Logical reasoning".into()],
        development_areas: vec![],
        action_plan: ActionPlan::default(),
        resources: vec![],
    }
}
