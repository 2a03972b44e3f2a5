//! In-process student store, used when no database is configured and in tests.

use crate::domain::student::{Student, StudentId, StudentRecord};
use crate::storage::student::store::{ListQuery, StoreError, StudentPage, StudentStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    rows: BTreeMap<StudentId, StudentRecord>,
    last_id: i64,
}

impl Inner {
    fn email_taken(&self, email: &str, excluding: Option<StudentId>) -> bool {
        self.rows
            .iter()
            .any(|(id, r)| Some(*id) != excluding && r.email == email)
    }
}

#[derive(Default)]
pub struct InMemoryStudentStore {
    inner: RwLock<Inner>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn matches_query(record: &StudentRecord, query: &ListQuery, needle: Option<&str>) -> bool {
    if let Some(active) = query.is_active {
        if record.is_active != active {
            return false;
        }
    }
    match needle {
        Some(n) => record.name.to_lowercase().contains(n) || record.email.to_lowercase().contains(n),
        None => true,
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn exists_with_email(
        &self,
        email: &str,
        excluding: Option<StudentId>,
    ) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.email_taken(email, excluding))
    }

    async fn insert(&self, record: &StudentRecord) -> Result<Student, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&record.email, None) {
            return Err(StoreError::DuplicateEmail(record.email.clone()));
        }
        inner.last_id += 1;
        let id = StudentId(inner.last_id);
        inner.rows.insert(id, record.clone());
        Ok(Student::new(id, record.clone()))
    }

    async fn update(&self, id: StudentId, record: &StudentRecord) -> Result<Student, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if inner.email_taken(&record.email, Some(id)) {
            return Err(StoreError::DuplicateEmail(record.email.clone()));
        }
        inner.rows.insert(id, record.clone());
        Ok(Student::new(id, record.clone()))
    }

    async fn get(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).map(|r| Student::new(id, r.clone())))
    }

    async fn list(&self, query: &ListQuery) -> Result<StudentPage, StoreError> {
        let inner = self.inner.read().await;
        let needle = query.search_term().map(str::to_lowercase);

        // BTreeMap iterates by id, so a stable sort keeps id order within equal dates.
        let mut hits: Vec<Student> = inner
            .rows
            .iter()
            .filter(|(_, r)| matches_query(r, query, needle.as_deref()))
            .map(|(id, r)| Student::new(*id, r.clone()))
            .collect();
        hits.sort_by(|a, b| b.record.enrollment_date.cmp(&a.record.enrollment_date));

        let total = hits.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let items = hits
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .collect();
        Ok(StudentPage::new(items, query, total))
    }

    async fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(name: &str, email: &str, enrolled: (i32, u32, u32), active: bool) -> StudentRecord {
        StudentRecord {
            name: name.to_string(),
            email: email.to_string(),
            age: 20,
            grade: Decimal::new(850, 2),
            enrollment_date: NaiveDate::from_ymd_opt(enrolled.0, enrolled.1, enrolled.2).unwrap(),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryStudentStore::new();
        let a = store.insert(&record("Ann Lee", "ann@example.com", (2024, 1, 1), true)).await.unwrap();
        let b = store.insert(&record("Bob Ray", "bob@example.com", (2024, 1, 1), true)).await.unwrap();
        assert_eq!(a.id, StudentId(1));
        assert_eq!(b.id, StudentId(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_email_lookup_excludes_own_identity() {
        let store = InMemoryStudentStore::new();
        let a = store.insert(&record("Ann Lee", "ann@example.com", (2024, 1, 1), true)).await.unwrap();
        assert!(store.exists_with_email("ann@example.com", None).await.unwrap());
        assert!(!store.exists_with_email("ann@example.com", Some(a.id)).await.unwrap());
        // Exact, case-sensitive match.
        assert!(!store.exists_with_email("ANN@example.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_backstop() {
        let store = InMemoryStudentStore::new();
        store.insert(&record("Ann Lee", "ann@example.com", (2024, 1, 1), true)).await.unwrap();
        let b = store.insert(&record("Bob Ray", "bob@example.com", (2024, 1, 1), true)).await.unwrap();

        let err = store
            .insert(&record("Ann Other", "ann@example.com", (2024, 1, 1), true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));

        let err = store
            .update(b.id, &record("Bob Ray", "ann@example.com", (2024, 1, 1), true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));

        // Keeping its own email is fine.
        store
            .update(b.id, &record("Bob Rayner", "bob@example.com", (2024, 1, 1), false))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = InMemoryStudentStore::new();
        let r = record("Ann Lee", "ann@example.com", (2024, 1, 1), true);
        assert!(matches!(store.update(StudentId(9), &r).await, Err(StoreError::NotFound(StudentId(9)))));
        assert!(matches!(store.delete(StudentId(9)).await, Err(StoreError::NotFound(_))));

        let a = store.insert(&r).await.unwrap();
        store.delete(a.id).await.unwrap();
        assert!(store.get(a.id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_orders_filters_and_paginates() {
        let store = InMemoryStudentStore::new();
        store.insert(&record("Ann Lee", "ann@example.com", (2023, 9, 1), true)).await.unwrap();
        store.insert(&record("Bob Ray", "bob@example.com", (2024, 9, 1), false)).await.unwrap();
        store.insert(&record("Cid Moe", "cid@school.org", (2024, 9, 1), true)).await.unwrap();
        store.insert(&record("Dee Fox", "dee@example.com", (2022, 9, 1), true)).await.unwrap();

        let page = store.list(&ListQuery::default()).await.unwrap();
        let ids: Vec<i64> = page.items.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 1);

        let page = store
            .list(&ListQuery { page: 2, per_page: 3, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, StudentId(4));
        assert_eq!(page.total_pages, 2);

        let page = store
            .list(&ListQuery { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].record.name, "Bob Ray");

        let page = store
            .list(&ListQuery { search: Some("SCHOOL".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].record.name, "Cid Moe");
    }
}
