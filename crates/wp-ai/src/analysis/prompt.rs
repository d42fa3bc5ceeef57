//! Career analysis prompt.

use std::fmt::Write as _;

use wp_core::entities::UserProfile;
use wp_core::scores::Scores;

const RESPONSE_SHAPE: &str = r#"{
  "summary": "2-3 sentence overview of the student's profile",
  "riasecProfile": {
    "dominantTrait": "one of Realistic, Investigative, Artistic, Social, Enterprising, Conventional",
    "secondaryTrait": "one of Realistic, Investigative, Artistic, Social, Enterprising, Conventional",
    "description": "what this combination means for the student"
  },
  "recommendedStream": {
    "primary": "Science (PCM) | Science (PCB) | Science | Commerce | Arts/Humanities",
    "reasoning": "why this stream fits the scores",
    "alternatives": ["other suitable streams"]
  },
  "careerPaths": [
    {
      "title": "career name",
      "description": "what the work involves",
      "matchScore": 0,
      "requiredEducation": "degree path",
      "entranceExams": ["relevant entrance exams"],
      "topColleges": ["well-known institutions"]
    }
  ],
  "strengths": ["observed strengths"],
  "developmentAreas": ["areas to work on"],
  "actionPlan": {
    "shortTerm": ["next 3 months"],
    "mediumTerm": ["next 1-2 years"],
    "longTerm": ["3+ years"]
  },
  "resources": [
    {"title": "resource name", "url": "https://...", "description": "why it helps"}
  ]
}"#;

fn write_map(out: &mut String, heading: &str, entries: &[(&'static str, u32)]) {
    let _ = writeln!(out, "{heading}:");
    for (key, value) in entries {
        let _ = writeln!(out, "  - {key}: {value}/100");
    }
}

/// Build the prompt for a full career analysis.
#[must_use]
pub fn build_analysis_prompt(scores: &Scores, profile: &UserProfile) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(
        "You are an experienced career counsellor for secondary-school students in India. \
         Analyse the psychometric assessment below and recommend a stream and careers.\n\n",
    );

    out.push_str("Student profile:\n");
    let _ = writeln!(out, "  - name: {}", profile.name);
    let _ = writeln!(
        out,
        "  - class: {}",
        profile.class_level.as_deref().unwrap_or("not provided")
    );
    match profile.age {
        Some(age) => {
            let _ = writeln!(out, "  - age: {age}");
        }
        None => out.push_str("  - age: not provided\n"),
    }
    out.push('\n');

    write_map(&mut out, "RIASEC interest scores", &scores.riasec.entries());
    write_map(&mut out, "Aptitude scores", &scores.aptitude.entries());
    write_map(&mut out, "Big Five personality scores", &scores.personality.entries());
    write_map(&mut out, "Academic scores", &scores.academic.entries());

    out.push_str(
        "\nRespond with a single JSON object and nothing else, using exactly this shape:\n",
    );
    out.push_str(RESPONSE_SHAPE);
    out.push_str(
        "\n\nRules:\n\
         - careerPaths must contain at least 3 entries ranked by matchScore, highest first.\n\
         - matchScore is an integer from 0 to 100.\n\
         - Base every recommendation on the scores above.\n",
    );
    out
}
