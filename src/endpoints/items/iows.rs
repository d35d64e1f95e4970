//! Legacy catalog item lookup with kind reconciliation.
//!
//! Every code in a batch must be tagged `ART` (single article) or `SPR`
//! (combination) in the request URL, but the right tag is not knowable in
//! advance. The endpoint assumes `ART` for everything, reads the structured
//! error the server returns for misclassified codes, retags exactly those
//! and resubmits; codes that fail again are dropped and the remainder is
//! resubmitted once more. Three attempts total; the loop can only shrink
//! or correct the batch, never grow it.

use std::fmt;

use crate::clients::{
    base_headers, ApiError, Endpoint, ErrorHandler, ItemLookupError, RequestInfo, ResponseError,
    ResponseInfo, SessionInfo, Step,
};
use crate::config::Constants;

const IOWS_BASE_URL: &str = "https://iows.ikea.com/retail/iows";

/// Consumer/contract pair the service requires on every call.
const CONSUMER: &str = "MAMMUT";
const CONTRACT: &str = "37249";

/// The kind tag a code is classified under in the request URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// A single article.
    Art,
    /// A combination (set of articles sold together).
    Spr,
}

impl ItemKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Art => "ART",
            Self::Spr => "SPR",
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::Art => Self::Spr,
            Self::Spr => Self::Art,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The legacy catalog endpoint group.
#[derive(Debug)]
pub struct IowsItems {
    session: SessionInfo,
}

impl IowsItems {
    /// Creates the group for the given locale.
    #[must_use]
    pub fn new(constants: &Constants) -> Self {
        let mut headers = base_headers(constants);
        headers.insert("Consumer".to_string(), CONSUMER.to_string());
        headers.insert("Contract".to_string(), CONTRACT.to_string());
        let base = format!(
            "{IOWS_BASE_URL}/{}/{}/catalog/items",
            constants.country().as_ref(),
            constants.language().as_ref()
        );
        Self {
            session: SessionInfo::new(base, headers),
        }
    }

    /// Builds the batch lookup endpoint for the given codes.
    #[must_use]
    pub fn get_items<S: AsRef<str>>(&self, item_codes: &[S]) -> IowsItemsEndpoint {
        let items = item_codes
            .iter()
            .map(|code| TaggedItem {
                code: code.as_ref().to_string(),
                kind: ItemKind::Art,
            })
            .collect();
        IowsItemsEndpoint {
            session: self.session.clone(),
            items,
            attempt: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct TaggedItem {
    code: String,
    kind: ItemKind,
}

/// Batch item lookup with the bounded reconciliation loop.
#[derive(Debug)]
pub struct IowsItemsEndpoint {
    session: SessionInfo,
    items: Vec<TaggedItem>,
    attempt: u8,
}

/// Upper bound on lookup attempts: initial, retagged, shrunk.
const MAX_ATTEMPTS: u8 = 3;

impl IowsItemsEndpoint {
    fn request(&self) -> RequestInfo {
        let specs: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{},{}", item.kind, item.code))
            .collect();
        RequestInfo::get(specs.join(";"))
            .build()
            .expect("static catalog request is valid")
    }

    fn retag(&mut self, codes: &[String]) {
        for item in &mut self.items {
            if codes.contains(&item.code) {
                item.kind = item.kind.other();
            }
        }
    }

    fn drop_codes(&mut self, codes: &[String]) {
        self.items.retain(|item| !codes.contains(&item.code));
    }
}

impl Endpoint for IowsItemsEndpoint {
    type Output = serde_json::Value;

    fn session_info(&self) -> &SessionInfo {
        &self.session
    }

    // Misclassification errors arrive as non-2xx responses this endpoint
    // consumes internally, so no blanket handlers apply.
    fn error_handlers(&self) -> &[ErrorHandler] {
        &[]
    }

    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError> {
        assert_eq!(self.attempt, 0, "endpoint started more than once");
        self.attempt = 1;
        Ok(Step::Request(self.request()))
    }

    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError> {
        assert!(
            (1..MAX_ATTEMPTS + 1).contains(&self.attempt),
            "endpoint resumed after completion"
        );

        if response.is_ok() {
            self.attempt = MAX_ATTEMPTS + 1;
            return Ok(Step::Done(response.json()?.clone()));
        }

        let offenders = misclassified_codes(&response);
        if offenders.is_empty() {
            // Not the structured misclassification envelope; surface as-is.
            return Err(ResponseError::from_response(&response).into());
        }

        match self.attempt {
            1 => {
                tracing::warn!(codes = ?offenders, "retagging misclassified item codes");
                self.retag(&offenders);
            }
            2 => {
                tracing::warn!(codes = ?offenders, "dropping unresolvable item codes");
                self.drop_codes(&offenders);
                if self.items.is_empty() {
                    return Err(ItemLookupError { codes: offenders }.into());
                }
            }
            _ => {
                return Err(ItemLookupError { codes: offenders }.into());
            }
        }

        self.attempt += 1;
        Ok(Step::Request(self.request()))
    }
}

/// Pulls the misclassified codes out of the structured error envelope.
///
/// The envelope nests one or many errors, each carrying an attribute list
/// with an `ITEM_NO` entry.
fn misclassified_codes(response: &ResponseInfo) -> Vec<String> {
    let Ok(body) = response.json() else {
        return Vec::new();
    };

    let errors = match body.pointer("/ErrorList/Error") {
        Some(serde_json::Value::Array(errors)) => errors.clone(),
        Some(single @ serde_json::Value::Object(_)) => vec![single.clone()],
        _ => return Vec::new(),
    };

    let mut codes = Vec::new();
    for error in &errors {
        let attributes = match error.pointer("/ErrorAttributeList/ErrorAttribute") {
            Some(serde_json::Value::Array(attributes)) => attributes.clone(),
            Some(single @ serde_json::Value::Object(_)) => vec![single.clone()],
            _ => continue,
        };
        for attribute in &attributes {
            let is_item_no = attribute.get("Name").and_then(serde_json::Value::as_str)
                == Some("ITEM_NO");
            if !is_item_no {
                continue;
            }
            if let Some(code) = attribute.get("Value") {
                let code = code
                    .as_str()
                    .map_or_else(|| code.to_string(), ToString::to_string);
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
    }
    codes
}
