//! Guest-token and authorized-login endpoints.
//!
//! The guest token is one POST. The authorized login replays the website's
//! PKCE OAuth2 exchange: fetch the login page and scrape its configuration
//! blob, post credentials, post back the scraped `wctx`/`wresult` fields,
//! let the transport follow the callback redirect and read the
//! authorization code off the final URL, then exchange code + verifier for
//! an access token. The exchange step delegates to an embedded
//! [`JsonEndpoint`], whose steps the flow forwards transparently.

use chrono::{Duration, Utc};
use serde_json::json;

use crate::auth::pkce::{state_nonce, CodeVerifier};
use crate::auth::scrape::{extract_hidden_fields, extract_session_config, SessionConfig};
use crate::auth::token_cache::{CachedToken, TokenCache};
use crate::auth::{AuthError, AuthToken};
use crate::clients::{
    base_headers, handlers, run, ApiError, Endpoint, ErrorHandler, JsonEndpoint, RequestInfo,
    ResponseError, ResponseInfo, SessionInfo, Step,
};
use crate::config::Constants;

/// Host handing out anonymous guest tokens.
const GUEST_TOKEN_BASE_URL: &str = "https://api.ingka.ikea.com";

/// Client id the website presents for guest-token requests.
const GUEST_CLIENT_ID: &str = "e026b58d-dd69-425f-a67f-1e9a5087b87b";

fn token_from_json(value: &serde_json::Value) -> Result<AuthToken, ApiError> {
    let access_token = value
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .ok_or(AuthError::MalformedTokenResponse)?;
    let expires_at = value
        .get("expires_in")
        .and_then(serde_json::Value::as_i64)
        .map(|seconds| Utc::now() + Duration::seconds(seconds));
    Ok(AuthToken {
        access_token: access_token.to_string(),
        expires_at,
    })
}

/// Builds the guest-token endpoint: one anonymous POST.
#[must_use]
pub fn get_guest_token(constants: &Constants) -> GuestTokenEndpoint {
    let mut headers = base_headers(constants);
    headers.insert("X-Client-Id".to_string(), GUEST_CLIENT_ID.to_string());
    let session = SessionInfo::new(GUEST_TOKEN_BASE_URL, headers);

    let request = RequestInfo::post("guest/token")
        .json_body(json!({ "retailUnit": constants.country().as_ref() }))
        .build()
        .expect("static guest-token request is valid");

    GuestTokenEndpoint {
        session,
        request: Some(request),
    }
}

/// Endpoint producing an anonymous guest token.
#[derive(Debug)]
pub struct GuestTokenEndpoint {
    session: SessionInfo,
    request: Option<RequestInfo>,
}

impl Endpoint for GuestTokenEndpoint {
    type Output = AuthToken;

    fn session_info(&self) -> &SessionInfo {
        &self.session
    }

    fn error_handlers(&self) -> &[ErrorHandler] {
        handlers::DEFAULT
    }

    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError> {
        let request = self
            .request
            .take()
            .expect("endpoint started more than once");
        Ok(Step::Request(request))
    }

    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError> {
        if !response.is_ok() {
            return Err(ResponseError::from_response(&response).into());
        }
        Ok(Step::Done(token_from_json(response.json()?)?))
    }
}

/// Fetches a guest token, consulting the on-disk cache first.
///
/// Read-then-write-on-miss: a fresh cached token is returned without any
/// network traffic; otherwise a new token is fetched and stored.
///
/// # Errors
///
/// Returns [`ApiError`] if the fetch fails or the cache cannot be written.
pub async fn get_guest_token_cached(
    constants: &Constants,
    cache: &TokenCache,
) -> Result<AuthToken, ApiError> {
    if let Some(cached) = cache.fresh_guest() {
        return Ok(AuthToken {
            access_token: cached.token,
            expires_at: cached.expires_at,
        });
    }

    let token = run(get_guest_token(constants)).await?;
    let mut tokens = cache.load();
    tokens.guest = Some(CachedToken {
        token: token.access_token.clone(),
        expires_at: token.expires_at,
    });
    cache.store(&tokens)?;
    Ok(token)
}

#[derive(Debug)]
enum Stage {
    Start,
    AwaitLoginPage,
    AwaitCredentials,
    AwaitCallback,
    AwaitExchange,
    Finished,
}

/// The authorized PKCE login flow.
///
/// A 4-request state machine emulating the browser login. Every step
/// depends on the vendor's current page structure and **may break without
/// notice**; the scraping seams live in [`scrape`](crate::auth::scrape).
///
/// Cookies are threaded explicitly: `Set-Cookie` values from each response
/// are carried forward as a `Cookie` header on subsequent requests, keeping
/// the transport itself cookie-free.
///
/// # Example
///
/// ```rust,ignore
/// use ikea_api::{run, Constants};
/// use ikea_api::auth::LoginFlow;
///
/// let flow = LoginFlow::new(&Constants::default(), "user@example.com", "hunter2");
/// let token = run(flow).await?;
/// ```
#[derive(Debug)]
pub struct LoginFlow {
    session: SessionInfo,
    username: String,
    password: String,
    verifier: CodeVerifier,
    state: String,
    redirect_uri: String,
    cookies: Vec<String>,
    config: Option<SessionConfig>,
    stage: Stage,
    exchange: Option<JsonEndpoint>,
}

impl LoginFlow {
    /// Creates a login flow for the given credentials.
    #[must_use]
    pub fn new(
        constants: &Constants,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let session = SessionInfo::new(constants.local_base_url(), base_headers(constants));
        let redirect_uri = format!("{}/profile/login/callback", constants.local_base_url());
        Self {
            session,
            username: username.into(),
            password: password.into(),
            verifier: CodeVerifier::new(),
            state: state_nonce(),
            redirect_uri,
            cookies: Vec::new(),
            config: None,
            stage: Stage::Start,
            exchange: None,
        }
    }

    fn collect_cookies(&mut self, response: &ResponseInfo) {
        for value in response.header_values("set-cookie") {
            if let Some(pair) = value.split(';').next() {
                let pair = pair.trim();
                if !pair.is_empty() {
                    self.cookies.push(pair.to_string());
                }
            }
        }
    }

    fn cookie_header(&self) -> String {
        self.cookies.join("; ")
    }

    fn config(&self) -> &SessionConfig {
        self.config
            .as_ref()
            .expect("session config scraped before later stages")
    }

    fn credentials_request(&self) -> Result<RequestInfo, ApiError> {
        let config = self.config();
        let mut builder =
            RequestInfo::post(format!("https://{}/usernamepassword/login", config.auth_domain))
                .json_body(json!({
                    "client_id": config.client_id,
                    "redirect_uri": self.redirect_uri,
                    "response_type": "code",
                    "scope": config.scope,
                    "state": self.state,
                    "code_challenge": self.verifier.challenge(),
                    "code_challenge_method": "S256",
                    "connection": "Username-Password-Authentication",
                    "username": self.username,
                    "password": self.password,
                }));
        if !self.cookies.is_empty() {
            builder = builder.header("Cookie", self.cookie_header());
        }
        Ok(builder.build()?)
    }

    fn callback_request(&self, wctx: &str, wresult: &str) -> Result<RequestInfo, ApiError> {
        let config = self.config();
        let body = format!(
            "wctx={}&wresult={}",
            urlencoding::encode(wctx),
            urlencoding::encode(wresult)
        );
        let mut builder =
            RequestInfo::post(format!("https://{}/login/callback", config.auth_domain))
                .body(body)
                .header("Content-Type", "application/x-www-form-urlencoded");
        if !self.cookies.is_empty() {
            builder = builder.header("Cookie", self.cookie_header());
        }
        Ok(builder.build()?)
    }

    fn exchange_request(&self, code: &str) -> Result<RequestInfo, ApiError> {
        let config = self.config();
        Ok(
            RequestInfo::post(format!("https://{}/oauth/token", config.auth_domain))
                .json_body(json!({
                    "grant_type": "authorization_code",
                    "client_id": config.client_id,
                    "code_verifier": self.verifier.as_ref(),
                    "code": code,
                    "redirect_uri": self.redirect_uri,
                }))
                .build()?,
        )
    }
}

impl Endpoint for LoginFlow {
    type Output = AuthToken;

    fn session_info(&self) -> &SessionInfo {
        &self.session
    }

    // Intermediate responses are HTML pages; statuses are checked per step,
    // so no blanket handlers apply.
    fn error_handlers(&self) -> &[ErrorHandler] {
        &[]
    }

    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError> {
        assert!(
            matches!(self.stage, Stage::Start),
            "endpoint started more than once"
        );
        self.stage = Stage::AwaitLoginPage;
        Ok(Step::Request(RequestInfo::get("profile/login/").build()?))
    }

    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError> {
        match self.stage {
            Stage::AwaitLoginPage => {
                self.collect_cookies(&response);
                if !response.is_ok() {
                    return Err(ResponseError::from_response(&response).into());
                }
                self.config = Some(extract_session_config(response.text())?);
                self.stage = Stage::AwaitCredentials;
                Ok(Step::Request(self.credentials_request()?))
            }
            Stage::AwaitCredentials => {
                self.collect_cookies(&response);
                if !response.is_ok() {
                    // Wrong credentials surface here as a vendor error page.
                    return Err(ResponseError::from_response(&response).into());
                }
                let fields = extract_hidden_fields(response.text())?;
                self.stage = Stage::AwaitCallback;
                Ok(Step::Request(
                    self.callback_request(&fields.wctx, &fields.wresult)?,
                ))
            }
            Stage::AwaitCallback => {
                self.collect_cookies(&response);
                let code = response
                    .url()
                    .and_then(|url| {
                        url.query_pairs()
                            .find(|(key, _)| key == "code")
                            .map(|(_, value)| value.into_owned())
                    })
                    .ok_or(AuthError::MissingAuthorizationCode)?;

                let request = self.exchange_request(&code)?;
                let mut exchange =
                    JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT);
                let step = exchange.begin()?;
                self.exchange = Some(exchange);
                self.stage = Stage::AwaitExchange;
                match step {
                    Step::Request(request) => Ok(Step::Request(request)),
                    Step::Done(value) => {
                        self.stage = Stage::Finished;
                        Ok(Step::Done(token_from_json(&value)?))
                    }
                }
            }
            Stage::AwaitExchange => {
                if !response.is_ok() {
                    return Err(ResponseError::from_response(&response).into());
                }
                let exchange = self
                    .exchange
                    .as_mut()
                    .expect("exchange endpoint exists in this stage");
                match exchange.resume(response)? {
                    Step::Request(request) => Ok(Step::Request(request)),
                    Step::Done(value) => {
                        self.stage = Stage::Finished;
                        Ok(Step::Done(token_from_json(&value)?))
                    }
                }
            }
            Stage::Start | Stage::Finished => panic!("endpoint resumed after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::prelude::*;
    use std::collections::HashMap;
    use url::Url;

    fn response(code: u16, body: &str) -> ResponseInfo {
        ResponseInfo::new(code, None, HashMap::new(), body.to_string())
    }

    fn response_with(
        code: u16,
        url: Option<&str>,
        headers: &[(&str, &str)],
        body: &str,
    ) -> ResponseInfo {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            map.entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }
        ResponseInfo::new(
            code,
            url.map(|u| Url::parse(u).unwrap()),
            map,
            body.to_string(),
        )
    }

    fn login_page() -> String {
        let blob = serde_json::json!({
            "clientId": "web-client",
            "authDomain": "auth.example.test",
            "scope": "openid profile email",
        });
        let encoded = BASE64_STANDARD.encode(blob.to_string());
        format!(r#"<div id="session-config" data-config="{encoded}"></div>"#)
    }

    #[test]
    fn test_guest_token_endpoint_shape_and_result() {
        let mut endpoint = get_guest_token(&Constants::default());

        let request = endpoint.begin().unwrap().into_request().unwrap();
        assert_eq!(request.path, "guest/token");
        assert_eq!(
            request.json_body.unwrap()["retailUnit"],
            serde_json::json!("us")
        );

        let step = endpoint
            .resume(response(
                200,
                r#"{"access_token":"guest-abc","expires_in":3600}"#,
            ))
            .unwrap();
        let token = step.into_done().unwrap();
        assert_eq!(token.access_token, "guest-abc");
        assert!(!token.expired());
    }

    #[test]
    fn test_guest_token_endpoint_rejects_error_status() {
        let mut endpoint = get_guest_token(&Constants::default());
        endpoint.begin().unwrap();

        let result = endpoint.resume(response(403, r#"{"message":"blocked"}"#));
        assert!(matches!(result, Err(ApiError::Api(_))));
    }

    #[test]
    fn test_guest_token_missing_access_token_is_auth_error() {
        let mut endpoint = get_guest_token(&Constants::default());
        endpoint.begin().unwrap();

        let result = endpoint.resume(response(200, r#"{"token_type":"Bearer"}"#));
        assert!(matches!(
            result,
            Err(ApiError::Auth(AuthError::MalformedTokenResponse))
        ));
    }

    #[test]
    fn test_login_flow_walks_all_four_requests() {
        let mut flow = LoginFlow::new(&Constants::default(), "user@example.com", "hunter2");

        // Step 1: login page.
        let request = flow.begin().unwrap().into_request().unwrap();
        assert_eq!(request.path, "profile/login/");

        // Step 2: credentials post, built from the scraped config.
        let page = response_with(
            200,
            None,
            &[("set-cookie", "session=s1; Path=/; HttpOnly")],
            &login_page(),
        );
        let request = flow.resume(page).unwrap().into_request().unwrap();
        assert_eq!(
            request.path,
            "https://auth.example.test/usernamepassword/login"
        );
        let body = request.json_body.as_ref().unwrap();
        assert_eq!(body["client_id"], "web-client");
        assert_eq!(body["username"], "user@example.com");
        assert_eq!(body["code_challenge_method"], "S256");
        assert_eq!(
            request.headers.as_ref().unwrap().get("Cookie").unwrap(),
            "session=s1"
        );

        // Step 3: hidden fields posted back to the callback.
        let credential_page = response(
            200,
            r#"<input name="wctx" value="ctx"><input name="wresult" value="res">"#,
        );
        let request = flow.resume(credential_page).unwrap().into_request().unwrap();
        assert_eq!(request.path, "https://auth.example.test/login/callback");
        assert_eq!(request.body.as_deref(), Some("wctx=ctx&wresult=res"));

        // Step 4: code extracted from the redirect target URL.
        let redirected = response_with(
            200,
            Some("https://www.ikea.com/us/en/profile/login/callback?code=auth-code-1&state=x"),
            &[],
            "",
        );
        let request = flow.resume(redirected).unwrap().into_request().unwrap();
        assert_eq!(request.path, "https://auth.example.test/oauth/token");
        let body = request.json_body.as_ref().unwrap();
        assert_eq!(body["code"], "auth-code-1");
        assert_eq!(body["grant_type"], "authorization_code");

        // Completion: token parsed from the exchange response.
        let token = flow
            .resume(response(200, r#"{"access_token":"authed","expires_in":60}"#))
            .unwrap()
            .into_done()
            .unwrap();
        assert_eq!(token.access_token, "authed");
    }

    #[test]
    fn test_login_flow_fails_without_authorization_code() {
        let mut flow = LoginFlow::new(&Constants::default(), "user", "pass");
        flow.begin().unwrap();
        flow.resume(response(200, &login_page())).unwrap();
        flow.resume(response(
            200,
            r#"<input name="wctx" value="c"><input name="wresult" value="r">"#,
        ))
        .unwrap();

        let no_code = response_with(
            200,
            Some("https://www.ikea.com/us/en/profile/login/callback?state=x"),
            &[],
            "",
        );
        assert!(matches!(
            flow.resume(no_code),
            Err(ApiError::Auth(AuthError::MissingAuthorizationCode))
        ));
    }

    #[test]
    fn test_login_flow_surfaces_credential_rejection() {
        let mut flow = LoginFlow::new(&Constants::default(), "user", "wrong");
        flow.begin().unwrap();
        flow.resume(response(200, &login_page())).unwrap();

        let rejected = response(401, r#"{"error":"invalid credentials"}"#);
        match flow.resume(rejected) {
            Err(ApiError::Api(e)) => assert_eq!(e.code, 401),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "resumed after completion")]
    fn test_login_flow_is_single_use() {
        let mut flow = LoginFlow::new(&Constants::default(), "user", "pass");
        flow.begin().unwrap();
        flow.resume(response(200, &login_page())).unwrap();
        flow.resume(response(
            200,
            r#"<input name="wctx" value="c"><input name="wresult" value="r">"#,
        ))
        .unwrap();
        flow.resume(response_with(
            200,
            Some("https://www.ikea.com/us/en/profile/login/callback?code=c1"),
            &[],
            "",
        ))
        .unwrap();
        flow.resume(response(200, r#"{"access_token":"t"}"#))
            .unwrap();
        // Flow is finished; one more resume is a programmer error.
        let _ = flow.resume(response(200, "{}"));
    }
}
