//! Investor-education courses and their lesson content.

use serde::Deserialize;

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Price in rupees; 0 means free
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "lessonsCount")]
    pub lessons_count: u32,
    #[serde(default = "super::default_status")]
    pub status: String,
}

/// One lesson inside `/course/{id}/content`.
#[derive(Debug, Clone, Deserialize)]
pub struct Lesson {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: Option<u32>,
    #[serde(default, alias = "videoUrl")]
    pub video_url: Option<String>,
}

/// `data` payload of `/course/list`.
#[derive(Debug, Deserialize)]
struct CourseListData {
    #[serde(default, alias = "courseList")]
    courses: Vec<Course>,
    pagination: PageMeta,
}

/// `data` payload of `/course/{id}/content`.
#[derive(Debug, Deserialize)]
struct CourseContentData {
    #[serde(default, alias = "lessonList")]
    lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
}

impl CourseDraft {
    fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("price", self.price.to_string()),
        ]
    }
}

pub struct CourseContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<Course>,
    page: u32,
    limit: u32,
}

impl<'a> CourseContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn store(&self) -> &ResourceStore<Course> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32) {
        self.page = page;
        self.limit = limit;

        let ticket = self.store.begin_fetch();
        let query = super::page_query(page, limit);

        match self.client.get::<CourseListData>("/course/list", &query).await {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.courses, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    /// Lesson list for one course. A failure is recorded in the shared
    /// state like any other read, and the caller gets it back too since
    /// there is no list to fall back on.
    pub async fn content(&mut self, id: &str) -> Result<Vec<Lesson>, ApiError> {
        let path = format!("/course/{}/content", id);
        match self.client.get::<CourseContentData>(&path, &[]).await {
            Ok(data) => Ok(data.lessons),
            Err(e) => {
                self.store.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, draft: &CourseDraft) -> Result<(), ApiError> {
        self.mutate("/course/create".to_string(), draft.form()).await
    }

    pub async fn update(&mut self, id: &str, draft: &CourseDraft) -> Result<(), ApiError> {
        self.mutate(format!("/course/{}/update", id), draft.form()).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.mutate(format!("/course/{}/delete", id), Vec::new()).await
    }

    async fn mutate(
        &mut self,
        path: String,
        form: Vec<(&'static str, String)>,
    ) -> Result<(), ApiError> {
        if let Err(e) = self.client.post_ack(&path, &form).await {
            self.store.record_error(e.to_string());
            return Err(e);
        }
        self.fetch(self.page, self.limit).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_defaults() {
        let course: Course = serde_json::from_str(
            r#"{"_id": "c1", "title": "Mutual Funds 101", "lessonsCount": 8}"#,
        )
        .unwrap();
        assert_eq!(course.lessons_count, 8);
        assert_eq!(course.price, 0.0);
        assert_eq!(course.status, "active");
    }

    #[test]
    fn test_content_payload_unwraps_lesson_list() {
        let data: CourseContentData = serde_json::from_str(
            r#"{"lessonList": [{"_id": "l1", "title": "What is NAV?", "durationMinutes": 12}]}"#,
        )
        .unwrap();
        assert_eq!(data.lessons.len(), 1);
        assert_eq!(data.lessons[0].duration_minutes, Some(12));
        assert!(data.lessons[0].video_url.is_none());
    }
}
