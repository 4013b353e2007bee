//! REST client for the Schoolhouse backend.

use crate::config::ClientConfig;
use crate::error::ClientError;
use reqwest::Method;
use schoolhouse_api::types::*;
use schoolhouse_api::{ApiData, ListParams, MessageResponse};
use schoolhouse_core::EntityId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Shared bearer-token slot. The login flow rotates it; every request reads
/// the current value.
#[derive(Clone, Default)]
pub struct TokenCell(Arc<RwLock<Option<String>>>);

impl TokenCell {
    pub fn new(initial: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    pub fn set(&self, token: Option<String>) {
        let mut slot = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = token;
    }

    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    token: TokenCell,
}

impl RestClient {
    pub fn new(config: &ClientConfig, token: TokenCell) -> Result<Self, ClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.post_data("/auth/login", request).await
    }

    // ------------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------------

    pub async fn list_students(&self, params: &ListParams) -> Result<StudentListData, ClientError> {
        self.get_data("/students", Some(params)).await
    }

    pub async fn get_student(&self, id: EntityId) -> Result<StudentResponse, ClientError> {
        self.get_data::<StudentResponse, ()>(&format!("/students/{}", id), None)
            .await
    }

    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::POST, "/students", Some(request)).await
    }

    pub async fn update_student(
        &self,
        id: EntityId,
        request: &UpdateStudentRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::PATCH, &format!("/students/{}", id), Some(request))
            .await
    }

    pub async fn delete_student(&self, id: EntityId) -> Result<MessageResponse, ClientError> {
        self.send_message::<()>(Method::DELETE, &format!("/students/{}", id), None)
            .await
    }

    // ------------------------------------------------------------------------
    // Parents
    // ------------------------------------------------------------------------

    pub async fn list_parents(&self, params: &ListParams) -> Result<ParentListData, ClientError> {
        self.get_data("/parents", Some(params)).await
    }

    pub async fn get_parent(&self, id: EntityId) -> Result<ParentResponse, ClientError> {
        self.get_data::<ParentResponse, ()>(&format!("/parents/{}", id), None)
            .await
    }

    pub async fn create_parent(
        &self,
        request: &CreateParentRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::POST, "/parents", Some(request)).await
    }

    pub async fn update_parent(
        &self,
        id: EntityId,
        request: &UpdateParentRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::PATCH, &format!("/parents/{}", id), Some(request))
            .await
    }

    pub async fn delete_parent(&self, id: EntityId) -> Result<MessageResponse, ClientError> {
        self.send_message::<()>(Method::DELETE, &format!("/parents/{}", id), None)
            .await
    }

    // ------------------------------------------------------------------------
    // Teachers
    // ------------------------------------------------------------------------

    pub async fn list_teachers(&self, params: &ListParams) -> Result<TeacherListData, ClientError> {
        self.get_data("/teachers", Some(params)).await
    }

    pub async fn get_teacher(&self, id: EntityId) -> Result<TeacherResponse, ClientError> {
        self.get_data::<TeacherResponse, ()>(&format!("/teachers/{}", id), None)
            .await
    }

    pub async fn create_teacher(
        &self,
        request: &CreateTeacherRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::POST, "/teachers", Some(request)).await
    }

    pub async fn update_teacher(
        &self,
        id: EntityId,
        request: &UpdateTeacherRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::PATCH, &format!("/teachers/{}", id), Some(request))
            .await
    }

    pub async fn delete_teacher(&self, id: EntityId) -> Result<MessageResponse, ClientError> {
        self.send_message::<()>(Method::DELETE, &format!("/teachers/{}", id), None)
            .await
    }

    // ------------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------------

    pub async fn list_classes(&self, params: &ListParams) -> Result<ClassListData, ClientError> {
        self.get_data("/classes", Some(params)).await
    }

    pub async fn get_class(&self, id: EntityId) -> Result<ClassResponse, ClientError> {
        self.get_data::<ClassResponse, ()>(&format!("/classes/{}", id), None)
            .await
    }

    pub async fn create_class(
        &self,
        request: &CreateClassRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::POST, "/classes", Some(request)).await
    }

    pub async fn update_class(
        &self,
        id: EntityId,
        request: &UpdateClassRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::PATCH, &format!("/classes/{}", id), Some(request))
            .await
    }

    pub async fn delete_class(&self, id: EntityId) -> Result<MessageResponse, ClientError> {
        self.send_message::<()>(Method::DELETE, &format!("/classes/{}", id), None)
            .await
    }

    // ------------------------------------------------------------------------
    // Attendance
    // ------------------------------------------------------------------------

    pub async fn list_attendance(
        &self,
        params: &ListParams,
    ) -> Result<AttendanceListData, ClientError> {
        self.get_data("/attendance", Some(params)).await
    }

    pub async fn record_attendance(
        &self,
        request: &RecordAttendanceRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::POST, "/attendance", Some(request)).await
    }

    pub async fn update_attendance(
        &self,
        id: EntityId,
        request: &UpdateAttendanceRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::PATCH, &format!("/attendance/{}", id), Some(request))
            .await
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    pub async fn get_settings(&self) -> Result<SettingsResponse, ClientError> {
        self.get_data::<SettingsResponse, ()>("/settings", None).await
    }

    pub async fn update_settings(
        &self,
        request: &UpdateSettingsRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send_message(Method::PATCH, "/settings", Some(request)).await
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(token) = self.token.get() {
            request = request.bearer_auth(token);
        }
        request
    }

    /// GET a `{ "data": ... }` envelope and unwrap it.
    async fn get_data<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.request(Method::GET, path);
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        let envelope: ApiData<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// POST a body and unwrap a `{ "data": ... }` envelope.
    async fn post_data<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let envelope: ApiData<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Issue a mutation and decode its `{ "message": ... }` envelope.
    async fn send_message<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<MessageResponse, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&text)?)
        } else {
            let message = serde_json::from_str::<MessageResponse>(&text)
                .map(|envelope| envelope.message)
                .unwrap_or_else(|_| {
                    if text.trim().is_empty() {
                        format!("HTTP {}", status.as_u16())
                    } else {
                        text
                    }
                });
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
