//! Account bootstrap and background profile enrichment.
//!
//! Simulated accounts carry a `sim-` sub marker so repeated runs reuse
//! the pool instead of growing it. New accounts get their display
//! profile from the content pipeline (with a do-not-repeat list of
//! existing names), then experience, skills, and education are filled
//! in by independent background tasks on a `JoinSet`; those tasks write
//! to disjoint records keyed by the new account's id, so they need no
//! coordination with the tick loop, and their failures are logged, not
//! propagated.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::content::{parse_iso_date, ContentKind, ContentPipeline, ContentRequest};
use crate::error::{Result, SimError};
use crate::store::{Account, AgentId, Education, Experience, Skill, Store};

/// Attempts at drawing a profile whose name is not already taken.
const MAX_NAME_TRIES: u32 = 3;

/// Reuse existing simulated accounts, creating more until `count` exist.
pub async fn get_or_create_accounts(
    store: &Arc<dyn Store>,
    pipeline: &ContentPipeline,
    count: usize,
) -> Result<Vec<Account>> {
    let mut accounts = store.list_simulated_accounts().await?;

    if accounts.len() >= count {
        tracing::info!("Found {} existing simulated accounts", accounts.len());
        accounts.truncate(count);
        return Ok(accounts);
    }

    let missing = count - accounts.len();
    tracing::info!(
        "Found {} accounts, creating {} more",
        accounts.len(),
        missing
    );

    for i in 0..missing {
        tracing::info!("Creating account {}/{missing}", i + 1);
        let account = create_account(store, pipeline).await?;
        accounts.push(account);
    }

    for account in &accounts {
        tracing::info!("Agent: {} ({})", account.name, account.id);
    }

    Ok(accounts)
}

/// Create one account from a generated (or fallback) profile.
async fn create_account(store: &Arc<dyn Store>, pipeline: &ContentPipeline) -> Result<Account> {
    let mut exclusions = store.list_simulated_names().await?;

    for _ in 0..MAX_NAME_TRIES {
        let request = ContentRequest::new(ContentKind::Profile)
            .with_exclusions(exclusions.clone());
        let result = pipeline.produce(&request).await;
        let fallback = result.is_fallback();
        let profile = result.into_value();

        let name = field(&profile, "name");
        let taken = store
            .list_simulated_names()
            .await?
            .iter()
            .any(|existing| existing == &name);

        // Fallback names carry a random suffix; collisions only matter
        // for generated names
        if taken && !fallback {
            tracing::warn!("Name '{name}' already exists, retrying with a grown exclusion list");
            exclusions.push(name);
            continue;
        }

        let account = build_account(&profile);
        store.insert_account(account.clone()).await?;
        tracing::info!("Created account: {} ({})", account.name, account.id);
        return Ok(account);
    }

    Err(SimError::Generator(format!(
        "could not draw an unused profile name in {MAX_NAME_TRIES} attempts"
    )))
}

fn build_account(profile: &Value) -> Account {
    let mut rng = rand::thread_rng();
    let name = field(profile, "name");
    let username = format!(
        "{}{}",
        name.to_lowercase().replace(' ', ""),
        rng.gen_range(100..1000)
    );
    let now = Utc::now();

    Account {
        id: AgentId::random(),
        sub: format!("sim-{}", rng.gen_range(10000..100000)),
        username,
        name,
        title: field(profile, "title"),
        bio: field(profile, "bio"),
        avatar_url: format!("https://i.pravatar.cc/150?u={}", rng.gen_range(1..=1000)),
        created_at: now,
        updated_at: now,
    }
}

/// Dispatch experience/skills/education generation for every account as
/// independent background jobs, returning a handle that drains and logs
/// their results. The tick loop never waits on this.
pub fn spawn_profile_enrichment(
    store: Arc<dyn Store>,
    pipeline: ContentPipeline,
    accounts: Vec<Account>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut jobs: JoinSet<(String, Result<()>)> = JoinSet::new();

        for account in accounts {
            for kind in [ContentKind::Experience, ContentKind::Skill, ContentKind::Education] {
                let store = Arc::clone(&store);
                let pipeline = pipeline.clone();
                let account = account.clone();
                jobs.spawn(async move {
                    let label = format!("{kind:?} for {}", account.name);
                    let result = enrich(&store, &pipeline, &account, kind).await;
                    (label, result)
                });
            }
        }

        while let Some(joined) = jobs.join_next().await {
            match joined {
                Ok((label, Ok(()))) => tracing::info!("Enrichment done: {label}"),
                Ok((label, Err(e))) => tracing::error!("Enrichment failed: {label}: {e}"),
                Err(e) => tracing::error!("Enrichment task panicked: {e}"),
            }
        }
    })
}

async fn enrich(
    store: &Arc<dyn Store>,
    pipeline: &ContentPipeline,
    account: &Account,
    kind: ContentKind,
) -> Result<()> {
    let mut request = ContentRequest::new(kind)
        .with_context("name", &account.name)
        .with_context("title", &account.title)
        .with_context("bio", &account.bio);

    if kind == ContentKind::Skill {
        let count = rand::thread_rng().gen_range(3..=5);
        request = request.with_context("count", count.to_string());
    }

    let result = pipeline.produce(&request).await;
    let entries = result
        .value()
        .as_array()
        .cloned()
        .unwrap_or_default();

    for entry in &entries {
        match kind {
            ContentKind::Experience => {
                store
                    .insert_experience(experience_from_value(&account.id, entry)?)
                    .await?;
            },
            ContentKind::Skill => {
                store.insert_skill(skill_from_value(&account.id, entry)?).await?;
            },
            ContentKind::Education => {
                store
                    .insert_education(education_from_value(&account.id, entry)?)
                    .await?;
            },
            _ => unreachable!("enrich only handles profile sub-entities"),
        }
    }

    tracing::info!(
        "Stored {} {kind:?} entries for {}",
        entries.len(),
        account.name
    );
    Ok(())
}

fn field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn optional_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn experience_from_value(user: &AgentId, entry: &Value) -> Result<Experience> {
    let end_date = match entry.get("endDate").and_then(Value::as_str) {
        Some(s) => Some(parse_iso_date(s)?),
        None => None,
    };

    Ok(Experience {
        user: user.clone(),
        title: field(entry, "title"),
        company: field(entry, "company"),
        location: field(entry, "location"),
        start_date: parse_iso_date(&field(entry, "startDate"))?,
        end_date,
        current: entry.get("current").and_then(Value::as_bool).unwrap_or(false),
        description: field(entry, "description"),
        employment_type: field(entry, "employmentType"),
        industry: field(entry, "industry"),
    })
}

fn skill_from_value(user: &AgentId, entry: &Value) -> Result<Skill> {
    Ok(Skill {
        user: user.clone(),
        name: field(entry, "name"),
        category: field(entry, "category"),
        endorsements: rand::thread_rng().gen_range(0..=20),
    })
}

fn education_from_value(user: &AgentId, entry: &Value) -> Result<Education> {
    let end_date = match entry.get("endDate").and_then(Value::as_str) {
        Some(s) => Some(parse_iso_date(s)?),
        None => None,
    };

    Ok(Education {
        user: user.clone(),
        school: field(entry, "school"),
        degree: field(entry, "degree"),
        field_of_study: field(entry, "fieldOfStudy"),
        start_date: parse_iso_date(&field(entry, "startDate"))?,
        end_date,
        current: entry.get("current").and_then(Value::as_bool).unwrap_or(false),
        grade: optional_field(entry, "grade"),
        activities: optional_field(entry, "activities"),
        description: optional_field(entry, "description"),
    })
}
