use crate::database::Repository;
use crate::models::Event;

/// Makes sure every event has its document so signups can union into it.
/// Existing documents are left untouched.
pub async fn seed_events(repo: &dyn Repository) {
    let mut created = 0;

    for event in Event::ALL {
        match repo.ensure_event(&event.doc_id()).await {
            Ok(true) => created += 1,
            Ok(false) => {}
            Err(e) => log::error!("   ❌ Failed to seed event {}: {}", event.as_str(), e),
        }
    }

    if created == 0 {
        log::info!("📅 Events: {} documents already in DB, skipping seed", Event::ALL.len());
    } else {
        log::info!("📅 Events: created {} of {} event documents", created, Event::ALL.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryRepository;

    #[tokio::test]
    async fn test_seed_creates_missing_events_once() {
        let repo = InMemoryRepository::new();
        repo.ensure_event("outreach").await.unwrap();
        repo.add_reference(crate::database::RefCollection::Events, "outreach", "e1")
            .await
            .unwrap();

        seed_events(&repo).await;
        seed_events(&repo).await;

        for event in Event::ALL {
            assert!(repo.event(&event.doc_id()).is_some());
        }
        assert_eq!(repo.event("outreach").unwrap().engineers, vec!["e1"]);
    }
}
