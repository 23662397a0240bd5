//! The form bridge: turns a signup or login submission into one JSON `POST`
//! and reports the result in the shared message element.
//!
//! Flow Overview: the submit event's default navigation is suppressed first,
//! then both inputs are read verbatim, sent to the form's endpoint, and the
//! status decides the message. A successful login also moves the returned
//! token into durable storage under the configured key. Each form admits one
//! pending submission; a second submit while the first is in flight is
//! answered with `Outcome::Busy` and sends nothing.
//!
//! Credentials and tokens cross this module, so none of them are logged.

mod guard;
pub mod types;

use crate::{
    config::BridgeConfig,
    errors::BridgeError,
    page::{Page, SubmitIntent},
    storage::DurableStorage,
    transport::{HttpResponse, Transport},
};
use guard::InFlight;
use std::fmt;
use tracing::{debug, error, instrument, warn};
pub use types::{AuthResult, Credentials};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "✅ Sign Up Successful!";
pub const SIGNUP_FAILURE_MESSAGE: &str = "❌ Sign Up Failed!";
pub const LOGIN_SUCCESS_MESSAGE: &str = "✅ Login Successful!";
pub const LOGIN_FAILURE_MESSAGE: &str = "❌ Login Failed!";
pub const NETWORK_ERROR_MESSAGE: &str = "❌ Network Error!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormKind {
    Signup,
    Login,
}

impl FormKind {
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Signup => SIGNUP_SUCCESS_MESSAGE,
            Self::Login => LOGIN_SUCCESS_MESSAGE,
        }
    }

    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Signup => SIGNUP_FAILURE_MESSAGE,
            Self::Login => LOGIN_FAILURE_MESSAGE,
        }
    }

    /// One-line report for a submission that ended in an error rather than
    /// an outcome, for surfaces without a log subscriber.
    #[must_use]
    pub fn error_report(self, err: &BridgeError) -> String {
        format!("formbridge: {self} submission failed: {err}")
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signup => formatter.write_str("signup"),
            Self::Login => formatter.write_str("login"),
        }
    }
}

/// Result of one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx response; for login the token has been stored.
    Success,
    /// Non-2xx response.
    Failure { status: u16 },
    /// No usable response: connection failure, timeout or an unparseable login body.
    NetworkError,
    /// 2xx login whose token could not be written to durable storage.
    StorageFailure,
    /// Another submission of the same form is still pending; nothing was sent.
    Busy,
}

impl Outcome {
    /// Text for the message element, or `None` when the element is left untouched.
    #[must_use]
    pub const fn message(self, form: FormKind) -> Option<&'static str> {
        match self {
            Self::Success => Some(form.success_message()),
            Self::Failure { .. } | Self::StorageFailure => Some(form.failure_message()),
            Self::NetworkError => Some(NETWORK_ERROR_MESSAGE),
            Self::Busy => None,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Connects the signup and login forms of one page to the backend.
#[derive(Debug)]
pub struct FormBridge<P, S, T> {
    config: BridgeConfig,
    page: P,
    storage: S,
    transport: T,
    signup_in_flight: InFlight,
    login_in_flight: InFlight,
}

impl<P, S, T> FormBridge<P, S, T>
where
    P: Page,
    S: DurableStorage,
    T: Transport,
{
    pub fn new(config: BridgeConfig, page: P, storage: S, transport: T) -> Self {
        Self {
            config,
            page,
            storage,
            transport,
            signup_in_flight: InFlight::default(),
            login_in_flight: InFlight::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True while a submission of `form` is awaiting its response.
    pub fn is_pending(&self, form: FormKind) -> bool {
        self.in_flight(form).is_pending()
    }

    /// Handles a submit event end to end: suppress navigation, read the
    /// inputs, send, update the message element.
    ///
    /// # Errors
    /// Returns `BridgeError::MissingElement` if an input or the message element
    /// is absent from the page. Missing inputs are detected before any request.
    #[instrument(skip_all, fields(form = %form))]
    pub async fn handle_submit(
        &self,
        form: FormKind,
        event: &impl SubmitIntent,
    ) -> Result<Outcome, BridgeError> {
        event.prevent_default();

        let ids = self.config.form_ids(form);
        let username = self
            .page
            .input_value(&ids.username_id)
            .ok_or_else(|| BridgeError::MissingElement(ids.username_id.clone()))?;
        let password = self
            .page
            .input_value(&ids.password_id)
            .ok_or_else(|| BridgeError::MissingElement(ids.password_id.clone()))?;

        self.submit(form, Credentials::new(username, password)).await
    }

    /// # Errors
    /// Returns `BridgeError::MissingElement` if the message element is absent.
    pub async fn submit_signup(&self, credentials: Credentials) -> Result<Outcome, BridgeError> {
        self.submit(FormKind::Signup, credentials).await
    }

    /// # Errors
    /// Returns `BridgeError::MissingElement` if the message element is absent.
    pub async fn submit_login(&self, credentials: Credentials) -> Result<Outcome, BridgeError> {
        self.submit(FormKind::Login, credentials).await
    }

    /// Sends already-extracted credentials through `form`'s path.
    ///
    /// # Errors
    /// Returns `BridgeError::MissingElement` if the message element is absent.
    pub async fn submit(
        &self,
        form: FormKind,
        credentials: Credentials,
    ) -> Result<Outcome, BridgeError> {
        let Some(_in_flight) = self.in_flight(form).try_begin() else {
            warn!(%form, "submission ignored, previous request still pending");
            return Ok(Outcome::Busy);
        };

        let outcome = match form {
            FormKind::Signup => self.signup(credentials).await,
            FormKind::Login => self.login(credentials).await,
        };

        if let Some(message) = outcome.message(form) {
            self.page
                .set_inner_text(&self.config.message_element_id, message)?;
        }

        Ok(outcome)
    }

    async fn signup(&self, credentials: Credentials) -> Outcome {
        let response = match self.post(FormKind::Signup, credentials).await {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };

        // the signup body is never inspected
        if response.ok() {
            debug!(status = response.status, "signup accepted");
            Outcome::Success
        } else {
            warn!(status = response.status, "signup rejected");
            Outcome::Failure {
                status: response.status,
            }
        }
    }

    async fn login(&self, credentials: Credentials) -> Outcome {
        let response = match self.post(FormKind::Login, credentials).await {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };

        if !response.ok() {
            warn!(status = response.status, "login rejected");
            return Outcome::Failure {
                status: response.status,
            };
        }

        let result = match AuthResult::from_body(&response.body) {
            Ok(result) => result,
            Err(err) => {
                warn!(status = response.status, "login response unusable: {err}");
                return Outcome::NetworkError;
            }
        };

        if let Err(err) = self
            .storage
            .set_item(&self.config.storage_key, &result.token)
        {
            error!(key = %self.config.storage_key, "failed to persist token: {err}");
            return Outcome::StorageFailure;
        }

        debug!(status = response.status, key = %self.config.storage_key, "login accepted, token stored");
        Outcome::Success
    }

    /// Encodes and sends the credentials; they are dropped once the request completes.
    async fn post(&self, form: FormKind, credentials: Credentials) -> Result<HttpResponse, Outcome> {
        let body = credentials.to_json().map_err(|err| {
            warn!(%form, "{err}");
            Outcome::NetworkError
        })?;
        drop(credentials);

        let url = self.config.endpoint(form);
        debug!(%form, url, "sending request");

        self.transport.post_json(url, body).await.map_err(|err| {
            warn!(%form, url, "request failed: {err}");
            Outcome::NetworkError
        })
    }

    fn in_flight(&self, form: FormKind) -> &InFlight {
        match form {
            FormKind::Signup => &self.signup_in_flight,
            FormKind::Login => &self.login_in_flight,
        }
    }
}
