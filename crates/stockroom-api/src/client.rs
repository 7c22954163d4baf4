//! # HTTP Client
//!
//! reqwest implementation of the boundary traits against the REST contract.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Inventory                          Reservations                        │
//! │  GET    /inventory/                 GET    /reservations/               │
//! │  GET    /inventory/:id              POST   /reservations/               │
//! │  POST   /inventory/add              PATCH  /reservations/:id/status     │
//! │  POST   /inventory/:id/addChild     GET    /reservations/item/:itemId   │
//! │  PUT    /inventory/:id              GET    /reservations/user/:userId   │
//! │  PUT    /inventory/:id/retire                                           │
//! │  DELETE /inventory/:id              Users / Session                     │
//! │  POST   /inventory/:id/uploadImage  GET    /users/      POST /users/... │
//! │  DELETE /inventory/image/:imageId   PATCH  /users/:userId/role          │
//! │                                     PATCH  /users/verify                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All bodies are JSON except image upload (multipart, field `"image"`).
//! Every non-2xx response is normalized into [`ApiError`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockroom_core::{
    BaseUser, Item, ItemDraft, ItemImage, ItemPatch, NewReservation, Reservation, Role, User,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::traits::{
    CreateAccountOptions, InventoryApi, ReservationApi, ReservationChange, SessionApi,
    UserDirectoryApi,
};
use crate::upload::{progress_chunks, UploadImageRequest};

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Error body shape the server attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct NameBody<'a> {
    #[serde(rename = "fullName")]
    full_name: &'a str,
}

#[derive(Debug, Serialize)]
struct RoleBody {
    role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyBody<'a> {
    user_id: i64,
    verification_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    user_id: i64,
    reset_code: &'a str,
    password: &'a str,
}

/// Retirement payload. `date: null` un-retires, so the field is always
/// serialized, never skipped.
#[derive(Debug, Serialize)]
struct RetireBody {
    date: Option<DateTime<Utc>>,
}

/// Child creation payload: the draft fields plus the base-item reference.
#[derive(Debug, Serialize)]
struct ChildDraftBody<'a> {
    item: i64,
    #[serde(flatten)]
    draft: &'a ItemDraft,
}

// =============================================================================
// HTTP API
// =============================================================================

/// reqwest-backed implementation of the boundary traits.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpApi {
    /// Builds a client for the given configuration.
    ///
    /// The configured timeout is applied per request; uploads are exempt
    /// because they carry their own cancellation token.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::from)?;
        Ok(HttpApi { client, config })
    }

    /// Builds a client from environment configuration.
    pub fn from_env() -> ApiResult<Self> {
        HttpApi::new(ApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Normalizes a non-2xx response into an [`ApiError`].
    ///
    /// Prefers the server's `description` field; falls back to the status
    /// reason phrase when the body is absent or unreadable.
    async fn error_from(resp: reqwest::Response) -> ApiError {
        let status = resp.status();
        let description = match resp.json::<ErrorBody>().await {
            Ok(body) if !body.description.is_empty() => body.description,
            _ => status
                .canonical_reason()
                .unwrap_or("Unexpected error")
                .to_string(),
        };
        ApiError::new(status.as_u16(), description)
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
        if resp.status().is_success() {
            resp.json().await.map_err(ApiError::from)
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    async fn expect_empty(resp: reqwest::Response) -> ApiResult<()> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        let resp = self
            .client
            .get(self.url(path))
            .timeout(self.config.timeout)
            .send()
            .await?;
        Self::parse_json(resp).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path, "POST");
        let resp = self
            .client
            .post(self.url(path))
            .timeout(self.config.timeout)
            .json(body)
            .send()
            .await?;
        Self::parse_json(resp).await
    }

    async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        debug!(path, "POST");
        let resp = self
            .client
            .post(self.url(path))
            .timeout(self.config.timeout)
            .json(body)
            .send()
            .await?;
        Self::expect_empty(resp).await
    }

    async fn put_empty<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        debug!(path, "PUT");
        let resp = self
            .client
            .put(self.url(path))
            .timeout(self.config.timeout)
            .json(body)
            .send()
            .await?;
        Self::expect_empty(resp).await
    }

    async fn patch_empty<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        debug!(path, "PATCH");
        let resp = self
            .client
            .patch(self.url(path))
            .timeout(self.config.timeout)
            .json(body)
            .send()
            .await?;
        Self::expect_empty(resp).await
    }

    async fn delete_empty(&self, path: &str) -> ApiResult<()> {
        debug!(path, "DELETE");
        let resp = self
            .client
            .delete(self.url(path))
            .timeout(self.config.timeout)
            .send()
            .await?;
        Self::expect_empty(resp).await
    }
}

// =============================================================================
// Inventory
// =============================================================================

impl InventoryApi for HttpApi {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        let start = Instant::now();
        let items: Vec<Item> = self.get_json("inventory/").await?;
        info!(
            count = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "inventory loaded"
        );
        Ok(items)
    }

    async fn get_item(&self, id: i64) -> ApiResult<Item> {
        self.get_json(&format!("inventory/{}", id)).await
    }

    async fn add_item(&self, draft: &ItemDraft) -> ApiResult<Item> {
        self.post_json("inventory/add", draft).await
    }

    async fn add_child_item(
        &self,
        parent_id: i64,
        base_item_id: i64,
        draft: &ItemDraft,
    ) -> ApiResult<Item> {
        let body = ChildDraftBody {
            item: base_item_id,
            draft,
        };
        self.post_json(&format!("inventory/{}/addChild", parent_id), &body)
            .await
    }

    async fn update_item(&self, patch: &ItemPatch) -> ApiResult<()> {
        self.put_empty(&format!("inventory/{}", patch.id), patch).await
    }

    async fn delete_item(&self, id: i64) -> ApiResult<()> {
        self.delete_empty(&format!("inventory/{}", id)).await
    }

    async fn retire_item(&self, id: i64, date: Option<DateTime<Utc>>) -> ApiResult<()> {
        self.put_empty(&format!("inventory/{}/retire", id), &RetireBody { date })
            .await
    }

    async fn upload_image(&self, request: UploadImageRequest) -> ApiResult<ItemImage> {
        // Fast path: token fired before we even build the request.
        if let Some(token) = &request.cancel {
            if token.is_cancelled() {
                return Err(ApiError::cancelled());
            }
        }

        let total = request.total_bytes();
        let body = reqwest::Body::wrap_stream(progress_chunks(
            request.bytes.clone(),
            request.progress.clone(),
        ));
        let part = reqwest::multipart::Part::stream_with_length(body, total)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let path = format!("inventory/{}/uploadImage", request.item_id);
        debug!(path = path.as_str(), total, "POST multipart");

        let send = async {
            let resp = self.client.post(self.url(&path)).multipart(form).send().await?;
            Self::parse_json::<ItemImage>(resp).await
        };

        match &request.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ApiError::cancelled()),
                    result = send => {
                        // Token fired while the response was in flight.
                        if token.is_cancelled() {
                            Err(ApiError::cancelled())
                        } else {
                            result
                        }
                    }
                }
            }
            None => send.await,
        }
    }

    async fn delete_image(&self, image_id: i64) -> ApiResult<()> {
        self.delete_empty(&format!("inventory/image/{}", image_id)).await
    }
}

// =============================================================================
// Reservations
// =============================================================================

impl ReservationApi for HttpApi {
    async fn list_reservations(&self) -> ApiResult<Vec<Reservation>> {
        let start = Instant::now();
        let reservations: Vec<Reservation> = self.get_json("reservations/").await?;
        info!(
            count = reservations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "reservations loaded"
        );
        Ok(reservations)
    }

    async fn create_reservation(&self, opts: &NewReservation) -> ApiResult<Reservation> {
        self.post_json("reservations/", opts).await
    }

    async fn update_reservation(&self, id: i64, change: &ReservationChange) -> ApiResult<()> {
        self.patch_empty(&format!("reservations/{}/status", id), change)
            .await
    }

    async fn reservations_for_item(&self, item_id: i64) -> ApiResult<Vec<Reservation>> {
        self.get_json(&format!("reservations/item/{}", item_id)).await
    }

    async fn reservations_for_user(&self, user_id: i64) -> ApiResult<Vec<Reservation>> {
        self.get_json(&format!("reservations/user/{}", user_id)).await
    }
}

// =============================================================================
// User Directory
// =============================================================================

impl UserDirectoryApi for HttpApi {
    async fn list_users(&self) -> ApiResult<Vec<BaseUser>> {
        self.get_json("users/").await
    }

    async fn update_role(&self, user_id: i64, role: Role) -> ApiResult<()> {
        self.patch_empty(&format!("users/{}/role", user_id), &RoleBody { role })
            .await
    }
}

// =============================================================================
// Session
// =============================================================================

impl SessionApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        self.post_json("users/login", &LoginBody { email, password }).await
    }

    async fn register(&self, opts: &CreateAccountOptions) -> ApiResult<()> {
        self.post_empty("users/register", opts).await
    }

    async fn resend_verification_email(&self, email: &str) -> ApiResult<()> {
        self.post_empty("users/resendVerificationEmail", &EmailBody { email })
            .await
    }

    async fn verify_account(&self, user_id: i64, verification_code: &str) -> ApiResult<()> {
        self.patch_empty(
            "users/verify",
            &VerifyBody {
                user_id,
                verification_code,
            },
        )
        .await
    }

    async fn send_password_reset_email(&self, email: &str) -> ApiResult<()> {
        self.post_empty("users/sendPasswordResetEmail", &EmailBody { email })
            .await
    }

    async fn reset_password(
        &self,
        user_id: i64,
        reset_code: &str,
        password: &str,
    ) -> ApiResult<()> {
        self.patch_empty(
            "users/resetPassword",
            &ResetPasswordBody {
                user_id,
                reset_code,
                password,
            },
        )
        .await
    }

    async fn send_update_email(&self, new_email: &str) -> ApiResult<()> {
        self.post_empty("users/sendUpdateEmail", &EmailBody { email: new_email })
            .await
    }

    async fn update_email(&self, new_email: &str) -> ApiResult<()> {
        self.patch_empty("users/email", &EmailBody { email: new_email }).await
    }

    async fn update_name(&self, full_name: &str) -> ApiResult<()> {
        self.patch_empty("users/name", &NameBody { full_name }).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
