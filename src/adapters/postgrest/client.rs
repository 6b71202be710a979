//! PostgREST record readers.
//!
//! Both queries are single-row reads: the `Accept` header asks PostgREST to
//! return one JSON object instead of an array, and PostgREST answers
//! `406 Not Acceptable` when zero or several rows match.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use user_context::adapters::postgrest::{PostgrestClient, PostgrestConfig};
//!
//! let client = Arc::new(PostgrestClient::new(PostgrestConfig::new(url, anon_key))?);
//! let store = UserSessionStore::new(client.clone(), client);
//! ```

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::domain::foundation::AccessToken;
use crate::domain::membership::{Subscription, SubscriptionStatus};
use crate::domain::user::UserDetails;
use crate::ports::{QueryError, SubscriptionReader, UserDetailsReader, UserScope};

use super::PostgrestConfig;

const USERS: &str = "users";
const SUBSCRIPTIONS: &str = "subscriptions";

/// Subscription columns with the price and its product embedded.
const SUBSCRIPTION_SELECT: &str = "*,prices(*,products(*))";

/// Media type for PostgREST single-object responses.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Record readers over the PostgREST API.
pub struct PostgrestClient {
    config: PostgrestConfig,
    http_client: reqwest::Client,
}

impl PostgrestClient {
    /// Create a client with the configured request timeout.
    pub fn new(config: PostgrestConfig) -> Result<Self, QueryError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| QueryError::Client(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// `GET /users?select=*&id=eq.{user_id}` as a single-row request.
    pub fn user_details_request(&self, scope: &UserScope) -> Result<reqwest::Request, QueryError> {
        let id_filter = format!("eq.{}", scope.user_id);

        self.single_row(USERS, scope)
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .build()
            .map_err(|e| QueryError::Client(e.to_string()))
    }

    /// `GET /subscriptions?select=*,prices(*,products(*))&user_id=eq.{user_id}&status=in.(trialing,active)`
    /// as a single-row request.
    pub fn current_subscription_request(
        &self,
        scope: &UserScope,
    ) -> Result<reqwest::Request, QueryError> {
        let user_filter = format!("eq.{}", scope.user_id);
        let statuses: Vec<&str> = SubscriptionStatus::CURRENT
            .iter()
            .map(SubscriptionStatus::as_str)
            .collect();
        let status_filter = format!("in.({})", statuses.join(","));

        self.single_row(SUBSCRIPTIONS, scope)
            .query(&[
                ("select", SUBSCRIPTION_SELECT),
                ("user_id", user_filter.as_str()),
                ("status", status_filter.as_str()),
            ])
            .build()
            .map_err(|e| QueryError::Client(e.to_string()))
    }

    /// Common request shape: auth headers, schema and single-object `Accept`.
    ///
    /// Without a session token the anon key is the bearer, as the backend's
    /// own client libraries do.
    fn single_row(&self, relation: &str, scope: &UserScope) -> reqwest::RequestBuilder {
        let anon_key = self.config.anon_key.expose_secret();
        let bearer = scope
            .access_token
            .as_ref()
            .map(AccessToken::expose)
            .unwrap_or(anon_key.as_str());

        self.http_client
            .get(format!("{}/{}", self.config.rest_url, relation))
            .header("apikey", anon_key.as_str())
            .bearer_auth(bearer)
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Accept-Profile", self.config.schema.as_str())
    }

    /// Send a single-row request and decode the object.
    async fn execute<T: DeserializeOwned>(
        &self,
        relation: &'static str,
        request: reqwest::Request,
    ) -> Result<T, QueryError> {
        let response = self.http_client.execute(request).await.map_err(|e| {
            tracing::debug!(relation, error = %e, "PostgREST request failed");
            QueryError::network(e.to_string())
        })?;

        let status = response.status();

        if status == StatusCode::NOT_ACCEPTABLE {
            return Err(QueryError::NotSingleRow { relation });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(QueryError::Unauthorized { relation });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| QueryError::decode(relation, e.to_string()))
    }
}

#[async_trait]
impl UserDetailsReader for PostgrestClient {
    async fn fetch_user_details(&self, scope: &UserScope) -> Result<UserDetails, QueryError> {
        let request = self.user_details_request(scope)?;
        self.execute(USERS, request).await
    }
}

#[async_trait]
impl SubscriptionReader for PostgrestClient {
    async fn fetch_current_subscription(
        &self,
        scope: &UserScope,
    ) -> Result<Subscription, QueryError> {
        let request = self.current_subscription_request(scope)?;
        self.execute(SUBSCRIPTIONS, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;

    fn client() -> PostgrestClient {
        PostgrestClient::new(PostgrestConfig::new("https://abcdefgh.supabase.co", "anon-key"))
            .unwrap()
    }

    fn scope_with_token() -> UserScope {
        UserScope::new(
            UserId::new("user-123").unwrap(),
            Some(AccessToken::new("user-jwt").unwrap()),
        )
    }

    fn query_of(request: &reqwest::Request) -> HashMap<String, String> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> &'a str {
        request.headers()[name].to_str().unwrap()
    }

    #[test]
    fn user_details_request_targets_users_by_id() {
        let request = client().user_details_request(&scope_with_token()).unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/users");

        let query = query_of(&request);
        assert_eq!(query["select"], "*");
        assert_eq!(query["id"], "eq.user-123");
    }

    #[test]
    fn subscription_request_embeds_price_and_filters_status() {
        let request = client()
            .current_subscription_request(&scope_with_token())
            .unwrap();

        assert_eq!(request.url().path(), "/rest/v1/subscriptions");

        let query = query_of(&request);
        assert_eq!(query["select"], "*,prices(*,products(*))");
        assert_eq!(query["user_id"], "eq.user-123");
        assert_eq!(query["status"], "in.(trialing,active)");
    }

    #[test]
    fn requests_ask_for_a_single_object_with_session_token() {
        let request = client().user_details_request(&scope_with_token()).unwrap();

        assert_eq!(header(&request, "accept"), "application/vnd.pgrst.object+json");
        assert_eq!(header(&request, "apikey"), "anon-key");
        assert_eq!(header(&request, "authorization"), "Bearer user-jwt");
        assert_eq!(header(&request, "accept-profile"), "public");
    }

    #[test]
    fn requests_fall_back_to_anon_key_without_token() {
        let scope = UserScope::new(UserId::new("user-123").unwrap(), None);
        let request = client().current_subscription_request(&scope).unwrap();

        assert_eq!(header(&request, "authorization"), "Bearer anon-key");
    }

    #[test]
    fn custom_schema_is_selected_with_accept_profile() {
        let client = PostgrestClient::new(
            PostgrestConfig::new("https://abcdefgh.supabase.co", "anon-key").with_schema("billing"),
        )
        .unwrap();
        let request = client.user_details_request(&scope_with_token()).unwrap();

        assert_eq!(header(&request, "accept-profile"), "billing");
    }
}
