// ── Composite resource ids ──
//
// A resource instance is identified by one string. Multi-part identities
// are joined with `:`; parts are never escaped, so a part containing `:`
// cannot round-trip. `encode_checked` refuses such parts, and empty ones,
// up front.

use std::fmt;

use crate::error::CoreError;

pub const SEPARATOR: char = ':';

/// Join `parts` with the separator.
pub fn encode<S: AsRef<str>>(parts: &[S]) -> String {
    let mut id = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            id.push(SEPARATOR);
        }
        id.push_str(part.as_ref());
    }
    id
}

/// Like [`encode`], but rejects empty parts and parts containing the separator.
pub fn encode_checked<S: AsRef<str>>(parts: &[S], hint: &str) -> Result<String, CoreError> {
    if parts.iter().any(|p| p.as_ref().is_empty()) {
        return Err(CoreError::InvalidIdFormat {
            id: encode(parts),
            hint: format!("{hint} (parts must not be empty)"),
        });
    }
    if let Some(bad) = parts.iter().find(|p| p.as_ref().contains(SEPARATOR)) {
        return Err(CoreError::InvalidIdFormat {
            id: bad.as_ref().to_owned(),
            hint: format!("{hint} (parts must not contain '{SEPARATOR}')"),
        });
    }
    Ok(encode(parts))
}

/// Split `id` into exactly `arity` parts.
pub fn decode(id: &str, arity: usize, hint: &str) -> Result<Vec<String>, CoreError> {
    let parts: Vec<String> = id.split(SEPARATOR).map(str::to_owned).collect();
    if parts.len() != arity {
        return Err(CoreError::InvalidIdFormat {
            id: id.to_owned(),
            hint: hint.to_owned(),
        });
    }
    Ok(parts)
}

/// Parse one id part as an integer.
pub fn parse_int_part(part: &str, name: &str) -> Result<i64, CoreError> {
    part.parse().map_err(|_| CoreError::InvalidIdFormat {
        id: part.to_owned(),
        hint: format!("integer {name}"),
    })
}

// ── Typed ids ────────────────────────────────────────────────────────

/// `configID:securityPolicyID:ruleID`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleId {
    pub config_id: i64,
    pub policy_id: String,
    pub rule_id: i64,
}

impl RuleId {
    pub const HINT: &'static str = "configID:securityPolicyID:ruleID";

    pub fn parse(id: &str) -> Result<Self, CoreError> {
        let parts = decode(id, 3, Self::HINT)?;
        Ok(Self {
            config_id: parse_int_part(&parts[0], "configID")?,
            policy_id: parts[1].clone(),
            rule_id: parse_int_part(&parts[2], "ruleID")?,
        })
    }

    pub fn encode(&self) -> Result<String, CoreError> {
        encode_checked(
            &[
                self.config_id.to_string(),
                self.policy_id.clone(),
                self.rule_id.to_string(),
            ],
            Self::HINT,
        )
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.config_id, self.policy_id, self.rule_id)
    }
}

/// `domain:cidrMapName`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CidrMapId {
    pub domain: String,
    pub name: String,
}

impl CidrMapId {
    pub const HINT: &'static str = "domain:cidrMapName";

    pub fn parse(id: &str) -> Result<Self, CoreError> {
        let mut parts = decode(id, 2, Self::HINT)?.into_iter();
        match (parts.next(), parts.next()) {
            (Some(domain), Some(name)) => Ok(Self { domain, name }),
            _ => Err(CoreError::InvalidIdFormat {
                id: id.to_owned(),
                hint: Self::HINT.to_owned(),
            }),
        }
    }

    pub fn encode(&self) -> Result<String, CoreError> {
        encode_checked(&[self.domain.as_str(), self.name.as_str()], Self::HINT)
    }
}

impl fmt::Display for CidrMapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.name)
    }
}
