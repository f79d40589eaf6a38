//! JWT claim types shared by the access and refresh token flavors.

use serde::{Deserialize, Serialize};

/// `typ` claim value of access tokens
pub const TYP_ACCESS: &str = "access";

/// `typ` claim value of refresh tokens
pub const TYP_REFRESH: &str = "refresh";

/// Claims carried by every HailGo-issued JWT.
///
/// Access tokens carry `roles`, refresh tokens carry `fid`; the unused field
/// is omitted from the serialized payload rather than written as null so the
/// wire shape stays interoperable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Subject: the phone for access tokens, the user id for refresh tokens
    pub sub: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,

    /// Token ID; for refresh tokens this equals the session row id
    pub jti: String,

    /// Token flavor, `access` or `refresh`
    pub typ: String,

    /// User identifier
    pub uid: i64,

    /// Granted roles (access tokens only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Session family identifier (refresh tokens only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fid: Option<String>,

    /// Global token version at issuance time
    pub ver: i64,
}

impl Claims {
    /// Whether this is an access token by claim shape
    pub fn is_access(&self) -> bool {
        self.typ == TYP_ACCESS
    }

    /// Whether this is a refresh token by claim shape
    pub fn is_refresh(&self) -> bool {
        self.typ == TYP_REFRESH
    }
}
