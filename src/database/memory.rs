//! In-process `Repository` used by the service and handler tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{RefCollection, Repository};
use crate::models::{
    Engineer, EventDoc, PageRequest, ProfileState, ReviewFeedback, Shortlist, Topic, User,
    UserFeedback,
};
use crate::utils::AppResult;

#[derive(Default)]
struct Collections {
    engineers: BTreeMap<String, Engineer>,
    topics: BTreeMap<String, Topic>,
    events: BTreeMap<String, EventDoc>,
    users: BTreeMap<String, User>,
    shortlists: BTreeMap<String, Shortlist>,
    feedback: HashMap<String, ReviewFeedback>,
    user_feedback: Vec<UserFeedback>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    inner: Mutex<Collections>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(&self, key: &str) -> Option<EventDoc> {
        self.inner.lock().unwrap().events.get(key).cloned()
    }

    pub fn topic(&self, key: &str) -> Option<Topic> {
        self.inner.lock().unwrap().topics.get(key).cloned()
    }

    pub fn insert_topic(&self, topic: Topic) {
        self.inner.lock().unwrap().topics.insert(topic.key.clone(), topic);
    }
}

fn references<'a>(data: &'a mut Collections, collection: RefCollection, key: &str) -> Option<&'a mut Vec<String>> {
    match collection {
        RefCollection::Topics => data.topics.get_mut(key).map(|t| &mut t.engineers),
        RefCollection::Events => data.events.get_mut(key).map(|e| &mut e.engineers),
        RefCollection::Shortlist => data.shortlists.get_mut(key).map(|s| &mut s.engineers),
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_engineer(&self, uid: &str) -> AppResult<Option<Engineer>> {
        Ok(self.inner.lock().unwrap().engineers.get(uid).cloned())
    }

    async fn put_engineer(&self, engineer: &Engineer) -> AppResult<()> {
        self.inner.lock().unwrap().engineers.insert(engineer.uid.clone(), engineer.clone());
        Ok(())
    }

    async fn set_engineer_state(&self, uid: &str, state: ProfileState) -> AppResult<()> {
        if let Some(engineer) = self.inner.lock().unwrap().engineers.get_mut(uid) {
            engineer.verified = state;
        }
        Ok(())
    }

    async fn delete_engineer(&self, uid: &str) -> AppResult<()> {
        self.inner.lock().unwrap().engineers.remove(uid);
        Ok(())
    }

    async fn engineers_in_state(&self, state: ProfileState) -> AppResult<Vec<Engineer>> {
        let data = self.inner.lock().unwrap();
        Ok(data.engineers.values().filter(|e| e.verified == state).cloned().collect())
    }

    async fn list_engineers(&self, page: &PageRequest) -> AppResult<Vec<Engineer>> {
        let data = self.inner.lock().unwrap();
        let items = data.engineers.iter().map(|(k, v)| (k.clone(), v.clone()));
        Ok(page.apply(items, |e: &Engineer, f| e.sort_value(f)))
    }

    async fn count_engineers(&self) -> AppResult<u64> {
        Ok(self.inner.lock().unwrap().engineers.len() as u64)
    }

    async fn get_topic(&self, key: &str) -> AppResult<Option<Topic>> {
        Ok(self.topic(key))
    }

    async fn create_topic(&self, topic: &Topic) -> AppResult<()> {
        self.insert_topic(topic.clone());
        Ok(())
    }

    async fn all_topics(&self) -> AppResult<Vec<Topic>> {
        Ok(self.inner.lock().unwrap().topics.values().cloned().collect())
    }

    async fn delete_topic_if_empty(&self, key: &str) -> AppResult<bool> {
        let mut data = self.inner.lock().unwrap();
        let empty = data.topics.get(key).map_or(false, |t| t.engineers.is_empty());
        if empty {
            data.topics.remove(key);
        }
        Ok(empty)
    }

    async fn ensure_event(&self, key: &str) -> AppResult<bool> {
        let mut data = self.inner.lock().unwrap();
        if data.events.contains_key(key) {
            return Ok(false);
        }
        data.events.insert(key.to_string(), EventDoc { key: key.to_string(), engineers: vec![] });
        Ok(true)
    }

    async fn add_reference(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<bool> {
        let mut data = self.inner.lock().unwrap();
        match references(&mut data, collection, key) {
            Some(engineers) => {
                if !engineers.iter().any(|e| e == uid) {
                    engineers.push(uid.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_reference(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<bool> {
        let mut data = self.inner.lock().unwrap();
        match references(&mut data, collection, key) {
            Some(engineers) => {
                engineers.retain(|e| e != uid);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_reference_everywhere(&self, collection: RefCollection, uid: &str) -> AppResult<u64> {
        let mut data = self.inner.lock().unwrap();
        let lists: Vec<&mut Vec<String>> = match collection {
            RefCollection::Topics => data.topics.values_mut().map(|t| &mut t.engineers).collect(),
            RefCollection::Events => data.events.values_mut().map(|e| &mut e.engineers).collect(),
            RefCollection::Shortlist => data.shortlists.values_mut().map(|s| &mut s.engineers).collect(),
        };
        let mut changed = 0;
        for engineers in lists {
            let before = engineers.len();
            engineers.retain(|e| e != uid);
            if engineers.len() != before {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn put_review_feedback(&self, uid: &str, feedback: &ReviewFeedback) -> AppResult<()> {
        self.inner.lock().unwrap().feedback.insert(uid.to_string(), feedback.clone());
        Ok(())
    }

    async fn get_review_feedback(&self, uid: &str) -> AppResult<Option<ReviewFeedback>> {
        Ok(self.inner.lock().unwrap().feedback.get(uid).cloned())
    }

    async fn delete_review_feedback(&self, uid: &str) -> AppResult<()> {
        self.inner.lock().unwrap().feedback.remove(uid);
        Ok(())
    }

    async fn get_user(&self, uid: &str) -> AppResult<Option<User>> {
        Ok(self.inner.lock().unwrap().users.get(uid).cloned())
    }

    async fn put_user(&self, user: &User) -> AppResult<()> {
        self.inner.lock().unwrap().users.insert(user.uid.clone(), user.clone());
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> AppResult<()> {
        self.inner.lock().unwrap().users.remove(uid);
        Ok(())
    }

    async fn list_users(&self, page: &PageRequest) -> AppResult<Vec<User>> {
        let data = self.inner.lock().unwrap();
        let items = data.users.iter().map(|(k, v)| (k.clone(), v.clone()));
        Ok(page.apply(items, |u: &User, f| u.sort_value(f)))
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.inner.lock().unwrap().users.len() as u64)
    }

    async fn get_shortlist(&self, uid: &str) -> AppResult<Option<Shortlist>> {
        Ok(self.inner.lock().unwrap().shortlists.get(uid).cloned())
    }

    async fn put_shortlist(&self, shortlist: &Shortlist) -> AppResult<()> {
        self.inner.lock().unwrap().shortlists.insert(shortlist.uid.clone(), shortlist.clone());
        Ok(())
    }

    async fn delete_shortlist(&self, uid: &str) -> AppResult<()> {
        self.inner.lock().unwrap().shortlists.remove(uid);
        Ok(())
    }

    async fn insert_user_feedback(&self, feedback: &UserFeedback) -> AppResult<()> {
        self.inner.lock().unwrap().user_feedback.push(feedback.clone());
        Ok(())
    }

    async fn user_feedback_by_time(&self) -> AppResult<Vec<UserFeedback>> {
        let mut items = self.inner.lock().unwrap().user_feedback.clone();
        items.sort_by_key(|f| f.time.timestamp_millis());
        Ok(items)
    }
}
