//! Document access used by the services.
//!
//! Every method is a single-document (or single-collection) operation. Multi
//! document bookkeeping such as topic membership is sequenced by the services
//! without a transaction, so concurrent writers can still leave reverse
//! references out of sync.

use async_trait::async_trait;
use firestore::FirestoreQueryDirection;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Firestore, ENGINEERS, EVENTS, FEEDBACK, SHORTLIST, TOPICS, USERS, USER_FEEDBACK};
use crate::models::{
    Engineer, EventDoc, PageRequest, ProfileState, ReviewFeedback, Shortlist, Topic, User, UserFeedback,
};
use crate::utils::AppResult;

/// Collections whose documents keep an `engineers` reverse-reference array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefCollection {
    Topics,
    Events,
    Shortlist,
}

impl RefCollection {
    pub fn name(&self) -> &'static str {
        match self {
            RefCollection::Topics => TOPICS,
            RefCollection::Events => EVENTS,
            RefCollection::Shortlist => SHORTLIST,
        }
    }
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_engineer(&self, uid: &str) -> AppResult<Option<Engineer>>;
    /// Creates or fully replaces the engineer document.
    async fn put_engineer(&self, engineer: &Engineer) -> AppResult<()>;
    async fn set_engineer_state(&self, uid: &str, state: ProfileState) -> AppResult<()>;
    async fn delete_engineer(&self, uid: &str) -> AppResult<()>;
    async fn engineers_in_state(&self, state: ProfileState) -> AppResult<Vec<Engineer>>;
    async fn list_engineers(&self, page: &PageRequest) -> AppResult<Vec<Engineer>>;
    async fn count_engineers(&self) -> AppResult<u64>;

    async fn get_topic(&self, key: &str) -> AppResult<Option<Topic>>;
    async fn create_topic(&self, topic: &Topic) -> AppResult<()>;
    async fn all_topics(&self) -> AppResult<Vec<Topic>>;
    /// Deletes the topic only when no engineer references it. Returns whether it was deleted.
    async fn delete_topic_if_empty(&self, key: &str) -> AppResult<bool>;
    /// Creates the event document if absent. Returns whether it was created.
    async fn ensure_event(&self, key: &str) -> AppResult<bool>;

    /// Array-union `uid` into `engineers`. Returns false when the document does not exist.
    async fn add_reference(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<bool>;
    /// Array-remove `uid` from `engineers`. Returns false when the document does not exist.
    async fn remove_reference(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<bool>;
    /// Array-remove `uid` from every document of the collection. Returns how many changed.
    async fn remove_reference_everywhere(&self, collection: RefCollection, uid: &str) -> AppResult<u64>;

    async fn put_review_feedback(&self, uid: &str, feedback: &ReviewFeedback) -> AppResult<()>;
    async fn get_review_feedback(&self, uid: &str) -> AppResult<Option<ReviewFeedback>>;
    async fn delete_review_feedback(&self, uid: &str) -> AppResult<()>;

    async fn get_user(&self, uid: &str) -> AppResult<Option<User>>;
    async fn put_user(&self, user: &User) -> AppResult<()>;
    async fn delete_user(&self, uid: &str) -> AppResult<()>;
    async fn list_users(&self, page: &PageRequest) -> AppResult<Vec<User>>;
    async fn count_users(&self) -> AppResult<u64>;

    async fn get_shortlist(&self, uid: &str) -> AppResult<Option<Shortlist>>;
    async fn put_shortlist(&self, shortlist: &Shortlist) -> AppResult<()>;
    async fn delete_shortlist(&self, uid: &str) -> AppResult<()>;

    async fn insert_user_feedback(&self, feedback: &UserFeedback) -> AppResult<()>;
    /// All site feedback, oldest first.
    async fn user_feedback_by_time(&self) -> AppResult<Vec<UserFeedback>>;
}

/// The `engineers` array of a topic, event or shortlist document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct References {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    id: String,
    #[serde(default)]
    engineers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VerifiedField {
    verified: ProfileState,
}

impl Firestore {
    async fn get<T>(&self, collection: &str, id: &str) -> AppResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        Ok(self.db.fluent().select().by_id_in(collection).obj().one(id).await?)
    }

    /// Creates or replaces the whole document.
    async fn put<T>(&self, collection: &str, id: &str, document: &T) -> AppResult<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.db
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(document)
            .execute::<T>()
            .await?;
        Ok(())
    }

    async fn insert<T>(&self, collection: &str, id: &str, document: &T) -> AppResult<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.db
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(document)
            .execute::<T>()
            .await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.db.fluent().delete().from(collection).document_id(id).execute().await?;
        Ok(())
    }

    async fn all<T>(&self, collection: &str) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        Ok(self.db.fluent().select().from(collection).obj().query().await?)
    }

    /// One admin listing page. Firestore orders by the field and narrows to
    /// values at or past the cursor; ties on the cursor value are resolved by
    /// document id in `PageRequest::apply`.
    async fn find_page<T>(
        &self,
        collection: &str,
        page: &PageRequest,
        id: impl Fn(&T) -> String,
        sort_value: impl Fn(&T, &str) -> Option<String>,
    ) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let candidates: Vec<T> = match (page.order_by.as_deref(), &page.after) {
            (Some(field), Some(cursor)) => {
                let value = cursor.sort_value.clone().unwrap_or_default();
                self.db
                    .fluent()
                    .select()
                    .from(collection)
                    .filter(|q| q.for_all([q.field(field).greater_than_or_equal(value.as_str())]))
                    .order_by([(field.to_string(), FirestoreQueryDirection::Ascending)])
                    .obj()
                    .query()
                    .await?
            }
            (Some(field), None) => self
                .db
                .fluent()
                .select()
                .from(collection)
                .order_by([(field.to_string(), FirestoreQueryDirection::Ascending)])
                .obj()
                .query()
                .await?,
            (None, _) => self.all(collection).await?,
        };

        Ok(page.apply(candidates.into_iter().map(|item| (id(&item), item)), sort_value))
    }

    async fn references(&self, collection: RefCollection, key: &str) -> AppResult<Option<References>> {
        self.get(collection.name(), key).await
    }

    async fn array_union(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<()> {
        self.db
            .fluent()
            .update()
            .in_col(collection.name())
            .document_id(key)
            .transforms(|t| t.fields([t.field("engineers").append_missing_elements([uid])]))
            .only_transform()
            .execute::<References>()
            .await?;
        Ok(())
    }

    async fn array_remove(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<()> {
        self.db
            .fluent()
            .update()
            .in_col(collection.name())
            .document_id(key)
            .transforms(|t| t.fields([t.field("engineers").remove_all_from_array([uid])]))
            .only_transform()
            .execute::<References>()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for Firestore {
    async fn get_engineer(&self, uid: &str) -> AppResult<Option<Engineer>> {
        self.get(ENGINEERS, uid).await
    }

    async fn put_engineer(&self, engineer: &Engineer) -> AppResult<()> {
        self.put(ENGINEERS, &engineer.uid, engineer).await
    }

    async fn set_engineer_state(&self, uid: &str, state: ProfileState) -> AppResult<()> {
        self.db
            .fluent()
            .update()
            .fields(["verified"])
            .in_col(ENGINEERS)
            .document_id(uid)
            .object(&VerifiedField { verified: state })
            .execute::<VerifiedField>()
            .await?;
        Ok(())
    }

    async fn delete_engineer(&self, uid: &str) -> AppResult<()> {
        self.delete(ENGINEERS, uid).await
    }

    async fn engineers_in_state(&self, state: ProfileState) -> AppResult<Vec<Engineer>> {
        Ok(self
            .db
            .fluent()
            .select()
            .from(ENGINEERS)
            .filter(|q| q.for_all([q.field("verified").eq(state.as_str())]))
            .obj()
            .query()
            .await?)
    }

    async fn list_engineers(&self, page: &PageRequest) -> AppResult<Vec<Engineer>> {
        self.find_page(ENGINEERS, page, |e: &Engineer| e.uid.clone(), |e, f| e.sort_value(f))
            .await
    }

    async fn count_engineers(&self) -> AppResult<u64> {
        Ok(self.all::<References>(ENGINEERS).await?.len() as u64)
    }

    async fn get_topic(&self, key: &str) -> AppResult<Option<Topic>> {
        self.get(TOPICS, key).await
    }

    async fn create_topic(&self, topic: &Topic) -> AppResult<()> {
        self.insert(TOPICS, &topic.key, topic).await
    }

    async fn all_topics(&self) -> AppResult<Vec<Topic>> {
        self.all(TOPICS).await
    }

    async fn delete_topic_if_empty(&self, key: &str) -> AppResult<bool> {
        match self.references(RefCollection::Topics, key).await? {
            Some(topic) if topic.engineers.is_empty() => {
                self.delete(TOPICS, key).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ensure_event(&self, key: &str) -> AppResult<bool> {
        if self.references(RefCollection::Events, key).await?.is_some() {
            return Ok(false);
        }
        let event = EventDoc {
            key: key.to_string(),
            engineers: vec![],
        };
        self.insert(EVENTS, key, &event).await?;
        Ok(true)
    }

    async fn add_reference(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<bool> {
        if self.references(collection, key).await?.is_none() {
            return Ok(false);
        }
        self.array_union(collection, key, uid).await?;
        Ok(true)
    }

    async fn remove_reference(&self, collection: RefCollection, key: &str, uid: &str) -> AppResult<bool> {
        if self.references(collection, key).await?.is_none() {
            return Ok(false);
        }
        self.array_remove(collection, key, uid).await?;
        Ok(true)
    }

    async fn remove_reference_everywhere(&self, collection: RefCollection, uid: &str) -> AppResult<u64> {
        let holders: Vec<References> = self
            .db
            .fluent()
            .select()
            .from(collection.name())
            .filter(|q| q.for_all([q.field("engineers").array_contains(uid)]))
            .obj()
            .query()
            .await?;

        for holder in &holders {
            self.array_remove(collection, &holder.id, uid).await?;
        }
        Ok(holders.len() as u64)
    }

    async fn put_review_feedback(&self, uid: &str, feedback: &ReviewFeedback) -> AppResult<()> {
        self.put(FEEDBACK, uid, feedback).await
    }

    async fn get_review_feedback(&self, uid: &str) -> AppResult<Option<ReviewFeedback>> {
        self.get(FEEDBACK, uid).await
    }

    async fn delete_review_feedback(&self, uid: &str) -> AppResult<()> {
        self.delete(FEEDBACK, uid).await
    }

    async fn get_user(&self, uid: &str) -> AppResult<Option<User>> {
        self.get(USERS, uid).await
    }

    async fn put_user(&self, user: &User) -> AppResult<()> {
        self.put(USERS, &user.uid, user).await
    }

    async fn delete_user(&self, uid: &str) -> AppResult<()> {
        self.delete(USERS, uid).await
    }

    async fn list_users(&self, page: &PageRequest) -> AppResult<Vec<User>> {
        self.find_page(USERS, page, |u: &User| u.uid.clone(), |u, f| u.sort_value(f))
            .await
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.all::<References>(USERS).await?.len() as u64)
    }

    async fn get_shortlist(&self, uid: &str) -> AppResult<Option<Shortlist>> {
        self.get(SHORTLIST, uid).await
    }

    async fn put_shortlist(&self, shortlist: &Shortlist) -> AppResult<()> {
        self.put(SHORTLIST, &shortlist.uid, shortlist).await
    }

    async fn delete_shortlist(&self, uid: &str) -> AppResult<()> {
        self.delete(SHORTLIST, uid).await
    }

    async fn insert_user_feedback(&self, feedback: &UserFeedback) -> AppResult<()> {
        self.insert(USER_FEEDBACK, &feedback.id, feedback).await
    }

    async fn user_feedback_by_time(&self) -> AppResult<Vec<UserFeedback>> {
        Ok(self
            .db
            .fluent()
            .select()
            .from(USER_FEEDBACK)
            .order_by([("time".to_string(), FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await?)
    }
}
