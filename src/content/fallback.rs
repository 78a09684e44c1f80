//! Deterministic fallback synthesis.
//!
//! When the generator exhausts its retries the pipeline still owes its
//! caller content, so each kind has a synthesizer that builds a value
//! from the request's context fields alone. The results are plain but
//! always satisfy the kind's shape contract and minimum length.

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use super::request::{ContentKind, ContentRequest};

/// Synthesize a fallback value for an exhausted request.
pub fn synthesize(request: &ContentRequest) -> Value {
    match request.kind {
        ContentKind::Post | ContentKind::Comment => free_text(request),
        ContentKind::Profile => profile(),
        ContentKind::Experience => experience(request),
        ContentKind::Skill => skills(),
        ContentKind::Education => education(),
    }
}

fn name_or_default(request: &ContentRequest) -> String {
    let name = request.context_field("name");
    if name.is_empty() {
        "A community member".to_string()
    } else {
        name.to_string()
    }
}

fn title_or_default(request: &ContentRequest) -> String {
    let title = request.context_field("title");
    if title.is_empty() {
        "their field".to_string()
    } else {
        title.to_string()
    }
}

fn free_text(request: &ContentRequest) -> Value {
    let name = name_or_default(request);
    let title = title_or_default(request);

    let templates = [
        format!("{name} shared an update about their work in {title}."),
        format!("{name} is working on an interesting project in {title}."),
        format!("{name} learned something new about {title} today."),
        format!("{name} is excited about recent developments in {title}."),
    ];

    let mut rng = rand::thread_rng();
    let text = templates
        .choose(&mut rng)
        .cloned()
        .unwrap_or_else(|| templates[0].clone());

    json!({ "content": text })
}

fn profile() -> Value {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect();
    json!({
        "name": format!("Sim Resident {suffix}"),
        "title": "Industry Professional",
        "bio": "Professional sharing notes and lessons from day-to-day work."
    })
}

fn experience(request: &ContentRequest) -> Value {
    let name = name_or_default(request);
    let title = title_or_default(request);
    let first_name = name.split_whitespace().next().unwrap_or("Their").to_string();

    let mut rng = rand::thread_rng();
    let start = Utc::now() - Duration::days(rng.gen_range(365..1825));

    json!([{
        "title": title,
        "company": format!("{first_name}'s Company"),
        "location": "Various Locations",
        "startDate": start.format("%Y-%m-%d").to_string(),
        "endDate": null,
        "current": true,
        "description": format!("Professional experience in {}.", title.to_lowercase()),
        "employmentType": "Full-time",
        "industry": "Professional Services"
    }])
}

fn skills() -> Value {
    json!([
        { "name": "Communication", "category": "Soft Skills" },
        { "name": "Problem Solving", "category": "Soft Skills" },
        { "name": "Teamwork", "category": "Soft Skills" },
        { "name": "Time Management", "category": "Soft Skills" },
        { "name": "Leadership", "category": "Soft Skills" }
    ])
}

fn education() -> Value {
    let mut rng = rand::thread_rng();
    let start = Utc::now() - Duration::days(rng.gen_range(1460..2920));
    let end = start + Duration::days(1460);

    json!([{
        "school": "University of Professional Studies",
        "degree": "Bachelor of Science",
        "fieldOfStudy": "Computer Science",
        "startDate": start.format("%Y-%m-%d").to_string(),
        "endDate": end.format("%Y-%m-%d").to_string(),
        "current": false,
        "grade": "3.5/4.0",
        "activities": "Student Organization",
        "description": "General studies in computer science and related fields"
    }])
}
