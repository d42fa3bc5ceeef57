//! Deterministic analysis used when the model cannot be.

use wp_core::entities::{
    ActionPlan, CareerAnalysis, CareerPath, RecommendedStream, Resource, RiasecProfile, UserProfile,
};
use wp_core::enums::RiasecType;
use wp_core::scores::Scores;

pub const STREAM_SCIENCE_PCM: &str = "Science (PCM)";
pub const STREAM_COMMERCE: &str = "Commerce";
pub const STREAM_ARTS: &str = "Arts/Humanities";
pub const STREAM_SCIENCE: &str = "Science";

const ALL_STREAMS: [&str; 4] = [STREAM_SCIENCE_PCM, STREAM_COMMERCE, STREAM_ARTS, STREAM_SCIENCE];

struct CareerTemplate {
    title: &'static str,
    description: &'static str,
    required_education: &'static str,
    entrance_exams: &'static [&'static str],
    top_colleges: &'static [&'static str],
}

const fn template_for(kind: RiasecType) -> CareerTemplate {
    match kind {
        RiasecType::Realistic => CareerTemplate {
            title: "Mechanical Engineer",
            description: "Designs, builds and maintains machines, engines and manufacturing systems.",
            required_education: "B.Tech / B.E. in Mechanical Engineering",
            entrance_exams: &["JEE Main", "JEE Advanced"],
            top_colleges: &["IIT Bombay", "IIT Madras", "NIT Trichy"],
        },
        RiasecType::Investigative => CareerTemplate {
            title: "Research Scientist",
            description: "Investigates questions in the natural sciences through experiments and analysis.",
            required_education: "B.Sc / BS-MS followed by M.Sc and PhD",
            entrance_exams: &["IISER Aptitude Test", "NEST", "KVPY"],
            top_colleges: &["IISc Bangalore", "IISER Pune", "NISER Bhubaneswar"],
        },
        RiasecType::Artistic => CareerTemplate {
            title: "Designer",
            description: "Creates visual, product or communication designs that solve real problems.",
            required_education: "B.Des in Communication, Product or Fashion Design",
            entrance_exams: &["NID DAT", "UCEED", "NIFT Entrance"],
            top_colleges: &["NID Ahmedabad", "IIT Bombay IDC", "NIFT Delhi"],
        },
        RiasecType::Social => CareerTemplate {
            title: "Psychologist / Counsellor",
            description: "Helps people understand and manage their thoughts, emotions and behaviour.",
            required_education: "BA / B.Sc in Psychology followed by MA / M.Sc",
            entrance_exams: &["CUET"],
            top_colleges: &["Lady Shri Ram College", "Christ University", "TISS Mumbai"],
        },
        RiasecType::Enterprising => CareerTemplate {
            title: "Business Manager / Entrepreneur",
            description: "Leads teams and ventures, making decisions about strategy, people and money.",
            required_education: "BBA followed by MBA",
            entrance_exams: &["IPMAT", "CUET", "CAT"],
            top_colleges: &["IIM Indore", "Shaheed Sukhdev College of Business Studies", "NMIMS Mumbai"],
        },
        RiasecType::Conventional => CareerTemplate {
            title: "Chartered Accountant",
            description: "Audits accounts, advises on tax and keeps organisations financially compliant.",
            required_education: "B.Com alongside the CA Foundation, Intermediate and Final",
            entrance_exams: &["CA Foundation"],
            top_colleges: &["ICAI", "Shri Ram College of Commerce", "St. Xavier's College Kolkata"],
        },
    }
}

fn career_from(template: &CareerTemplate, match_score: u8) -> CareerPath {
    CareerPath {
        title: template.title.to_string(),
        description: template.description.to_string(),
        match_score,
        required_education: template.required_education.to_string(),
        entrance_exams: template.entrance_exams.iter().map(|s| (*s).to_string()).collect(),
        top_colleges: template.top_colleges.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Stream recommendation by fixed thresholds, checked in order.
#[must_use]
pub const fn recommend_stream(scores: &Scores) -> &'static str {
    let numerical = scores.aptitude.numerical;
    if numerical > 65 && scores.academic.mathematics > 65 {
        STREAM_SCIENCE_PCM
    } else if numerical > 60 && scores.riasec.conventional > 60 {
        STREAM_COMMERCE
    } else if scores.riasec.artistic > 70 || scores.riasec.social > 70 {
        STREAM_ARTS
    } else {
        STREAM_SCIENCE
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the rule-based analysis. Same shape as a generated one.
#[must_use]
pub fn fallback_analysis(scores: &Scores, profile: &UserProfile) -> CareerAnalysis {
    let ranked = scores.riasec.ranked();
    let dominant = ranked[0].0;
    let secondary = ranked[1].0;
    let stream = recommend_stream(scores);

    let mut aptitudes = scores.aptitude.entries();
    aptitudes.sort_by(|a, b| b.1.cmp(&a.1));
    let strengths: Vec<String> = aptitudes
        .iter()
        .take(3)
        .map(|(key, _)| format!("{} aptitude", title_case(key)))
        .collect();
    let development_areas: Vec<String> = aptitudes
        .iter()
        .rev()
        .take(2)
        .map(|(key, _)| format!("{} aptitude", title_case(key)))
        .collect();

    let primary = template_for(dominant);
    let second = template_for(secondary);
    let career_paths = vec![
        career_from(&primary, 95),
        career_from(&second, 85),
        CareerPath {
            title: format!("{dominant}-{secondary} Interdisciplinary Roles"),
            description: format!(
                "Roles that combine {} and {} interests, such as {} work with a {} focus.",
                dominant.as_str(),
                secondary.as_str(),
                primary.title,
                second.title
            ),
            match_score: 75,
            required_education: format!("An undergraduate degree in the {stream} stream"),
            entrance_exams: vec!["CUET".to_string()],
            top_colleges: vec!["University of Delhi".to_string(), "Ashoka University".to_string()],
        },
    ];

    CareerAnalysis {
        summary: format!(
            "{} shows strongest interest in {dominant} and {secondary} activities. \
             Based on aptitude and academic scores, the {stream} stream is the best fit.",
            profile.name
        ),
        riasec_profile: RiasecProfile {
            dominant_trait: dominant.label().to_string(),
            secondary_trait: secondary.label().to_string(),
            description: format!(
                "A {dominant}-{secondary} profile: scores of {} and {} out of 100.",
                ranked[0].1, ranked[1].1
            ),
        },
        recommended_stream: RecommendedStream {
            primary: stream.to_string(),
            reasoning: format!(
                "Numerical aptitude {}, mathematics {}, artistic {}, social {}, conventional {}.",
                scores.aptitude.numerical,
                scores.academic.mathematics,
                scores.riasec.artistic,
                scores.riasec.social,
                scores.riasec.conventional
            ),
            alternatives: ALL_STREAMS
                .iter()
                .filter(|s| **s != stream)
                .map(|s| (*s).to_string())
                .collect(),
        },
        career_paths,
        strengths,
        development_areas,
        action_plan: ActionPlan {
            short_term: vec![
                format!("Talk to a teacher or counsellor about the {stream} stream"),
                format!("Explore what a {} does day to day", primary.title),
            ],
            medium_term: vec![
                format!("Prepare for {}", primary.entrance_exams.join(" / ")),
                "Join a club or project that builds your top strengths".to_string(),
            ],
            long_term: vec![format!("Pursue {}", primary.required_education)],
        },
        resources: vec![
            Resource {
                title: "National Career Service".to_string(),
                url: "https://www.ncs.gov.in".to_string(),
                description: "Government portal with career information and counselling.".to_string(),
            },
            Resource {
                title: "SWAYAM".to_string(),
                url: "https://swayam.gov.in".to_string(),
                description: "Free online courses to explore subjects before choosing.".to_string(),
            },
        ],
    }
}
