//! Topic and event membership bookkeeping.
//!
//! Engineers reference topics by key and events by name; the topic and event
//! documents keep the reverse `engineers` arrays. Each step below is a single
//! document write, sequenced without a transaction.

use std::collections::HashSet;

use crate::database::{RefCollection, Repository};
use crate::models::{Engineer, Event, Topic};
use crate::utils::{AppError, AppResult};

pub const MISSING_TOPIC: &str = "Engineer has a topic that does not exist";
pub const INVALID_EVENT: &str = "Not a valid event";

/// Camel-case key of a topic display name: `"Cyber Security"` -> `"cyberSecurity"`.
pub fn topic_key(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Maps display names to topic keys, keeping input order and dropping blanks.
/// Names that map to a key already seen are dropped; the first spelling wins.
pub fn configure_new_topics(display_names: &[String]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    display_names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| (name.to_string(), topic_key(name)))
        .filter(|(_, key)| seen.insert(key.clone()))
        .collect()
}

pub fn parse_events(names: &[String]) -> AppResult<Vec<Event>> {
    let mut events = Vec::new();
    for name in names {
        let event: Event = name.parse().map_err(|e: String| {
            log::warn!("⚠️  {}", e);
            AppError::Internal(INVALID_EVENT.to_string())
        })?;
        if !events.contains(&event) {
            events.push(event);
        }
    }
    Ok(events)
}

pub async fn topic_display_names(repo: &dyn Repository, keys: &[String]) -> AppResult<Vec<String>> {
    let mut names = Vec::with_capacity(keys.len());
    for key in keys {
        let topic = repo
            .get_topic(key)
            .await?
            .ok_or_else(|| AppError::Internal(MISSING_TOPIC.to_string()))?;
        names.push(topic.topic_name);
    }
    Ok(names)
}

/// Adds `uid` to the topic, creating the topic when nobody referenced it yet.
pub async fn attach_topic(repo: &dyn Repository, key: &str, display_name: &str, uid: &str) -> AppResult<()> {
    if repo.add_reference(RefCollection::Topics, key, uid).await? {
        log::debug!("   ➕ {} joined topic {}", uid, key);
        return Ok(());
    }
    repo.create_topic(&Topic::new(key, display_name, uid)).await?;
    log::info!("🏷️  Created topic {} ({})", key, display_name);
    Ok(())
}

/// Adds `uid` to a topic that must already exist.
pub async fn attach_existing_topic(repo: &dyn Repository, key: &str, uid: &str) -> AppResult<()> {
    if !repo.add_reference(RefCollection::Topics, key, uid).await? {
        log::error!("❌ Topic {} does not exist", key);
        return Err(AppError::Internal(MISSING_TOPIC.to_string()));
    }
    Ok(())
}

/// Removes `uid` from the topic and deletes the topic once it is unreferenced.
pub async fn detach_topic(repo: &dyn Repository, key: &str, uid: &str) -> AppResult<()> {
    if !repo.remove_reference(RefCollection::Topics, key, uid).await? {
        log::warn!("⚠️  Topic {} already gone while removing {}", key, uid);
        return Ok(());
    }
    if repo.delete_topic_if_empty(key).await? {
        log::info!("🗑️  Deleted empty topic {}", key);
    }
    Ok(())
}

pub async fn attach_event(repo: &dyn Repository, event: Event, uid: &str) -> AppResult<()> {
    let key = event.doc_id();
    if !repo.add_reference(RefCollection::Events, &key, uid).await? {
        repo.ensure_event(&key).await?;
        repo.add_reference(RefCollection::Events, &key, uid).await?;
    }
    log::debug!("   ➕ {} joined event {}", uid, event);
    Ok(())
}

pub async fn detach_event(repo: &dyn Repository, event: Event, uid: &str) -> AppResult<()> {
    repo.remove_reference(RefCollection::Events, &event.doc_id(), uid).await?;
    log::debug!("   ➖ {} left event {}", uid, event);
    Ok(())
}

/// Moves the engineer's topic membership from `current` keys to the `wanted` topics.
/// Returns the new list of keys.
pub async fn reconcile_topics(
    repo: &dyn Repository,
    uid: &str,
    current: &[String],
    wanted: &[(String, String)],
) -> AppResult<Vec<String>> {
    let wanted_keys: Vec<String> = wanted.iter().map(|(_, key)| key.clone()).collect();

    for (display_name, key) in wanted {
        if !current.contains(key) {
            attach_topic(repo, key, display_name, uid).await?;
        }
    }
    for key in current {
        if !wanted_keys.contains(key) {
            detach_topic(repo, key, uid).await?;
        }
    }

    Ok(wanted_keys)
}

pub async fn reconcile_events(repo: &dyn Repository, uid: &str, current: &[Event], wanted: &[Event]) -> AppResult<()> {
    for event in wanted {
        if !current.contains(event) {
            attach_event(repo, *event, uid).await?;
        }
    }
    for event in current {
        if !wanted.contains(event) {
            detach_event(repo, *event, uid).await?;
        }
    }
    Ok(())
}

/// Drops every topic and event reference held by the engineer.
pub async fn release_all(repo: &dyn Repository, engineer: &Engineer) -> AppResult<()> {
    for key in &engineer.topics {
        detach_topic(repo, key, &engineer.uid).await?;
    }
    for name in &engineer.events {
        match name.parse::<Event>() {
            Ok(event) => detach_event(repo, event, &engineer.uid).await?,
            Err(e) => log::warn!("⚠️  Skipping stored event of {}: {}", engineer.uid, e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryRepository;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_topic_key_camel_case() {
        assert_eq!(topic_key("Cyber Security"), "cyberSecurity");
        assert_eq!(topic_key("MACHINE learning SYSTEMS"), "machineLearningSystems");
        assert_eq!(topic_key("  Robotics  "), "robotics");
        assert_eq!(topic_key(""), "");
    }

    #[test]
    fn test_configure_new_topics_keeps_order_and_dedups() {
        let configured = configure_new_topics(&names(&["Cyber Security", "", "AI", "cyber  security", "Ai"]));
        assert_eq!(
            configured,
            vec![
                ("Cyber Security".to_string(), "cyberSecurity".to_string()),
                ("AI".to_string(), "ai".to_string()),
            ]
        );
        assert!(configure_new_topics(&[]).is_empty());
    }

    #[test]
    fn test_parse_events() {
        let events = parse_events(&names(&["outreach", "Mentoring", "Outreach"])).unwrap();
        assert_eq!(events, vec![Event::Outreach, Event::Mentoring]);

        let err = parse_events(&names(&["Hackathon"])).unwrap_err();
        assert_eq!(err.message(), INVALID_EVENT);
    }

    #[tokio::test]
    async fn test_attach_creates_then_unions() {
        let repo = InMemoryRepository::new();
        attach_topic(&repo, "ai", "AI", "u1").await.unwrap();
        attach_topic(&repo, "ai", "AI", "u2").await.unwrap();
        attach_topic(&repo, "ai", "AI", "u2").await.unwrap();

        let topic = repo.topic("ai").unwrap();
        assert_eq!(topic.topic_name, "AI");
        assert_eq!(topic.engineers, vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_attach_existing_requires_topic() {
        let repo = InMemoryRepository::new();
        let err = attach_existing_topic(&repo, "missing", "u1").await.unwrap_err();
        assert_eq!(err.message(), MISSING_TOPIC);
    }

    #[tokio::test]
    async fn test_detach_deletes_empty_topic() {
        let repo = InMemoryRepository::new();
        attach_topic(&repo, "ai", "AI", "u1").await.unwrap();
        attach_topic(&repo, "ai", "AI", "u2").await.unwrap();

        detach_topic(&repo, "ai", "u1").await.unwrap();
        assert_eq!(repo.topic("ai").unwrap().engineers, vec!["u2"]);

        detach_topic(&repo, "ai", "u2").await.unwrap();
        assert!(repo.topic("ai").is_none());
    }

    #[tokio::test]
    async fn test_reconcile_topics_adds_and_removes() {
        let repo = InMemoryRepository::new();
        attach_topic(&repo, "ai", "AI", "u1").await.unwrap();
        attach_topic(&repo, "robotics", "Robotics", "u1").await.unwrap();
        attach_topic(&repo, "robotics", "Robotics", "u2").await.unwrap();

        let wanted = configure_new_topics(&names(&["Robotics", "Cyber Security"]));
        let keys = reconcile_topics(&repo, "u1", &names(&["ai", "robotics"]), &wanted)
            .await
            .unwrap();

        assert_eq!(keys, vec!["robotics", "cyberSecurity"]);
        assert!(repo.topic("ai").is_none());
        assert_eq!(repo.topic("robotics").unwrap().engineers, vec!["u1", "u2"]);
        assert_eq!(repo.topic("cyberSecurity").unwrap().engineers, vec!["u1"]);
    }

    #[tokio::test]
    async fn test_events_are_created_on_demand_and_diffed() {
        let repo = InMemoryRepository::new();
        attach_event(&repo, Event::Outreach, "u1").await.unwrap();
        assert_eq!(repo.event("outreach").unwrap().engineers, vec!["u1"]);

        reconcile_events(&repo, "u1", &[Event::Outreach], &[Event::Conference])
            .await
            .unwrap();
        assert!(repo.event("outreach").unwrap().engineers.is_empty());
        assert_eq!(repo.event("conference").unwrap().engineers, vec!["u1"]);
    }
}
